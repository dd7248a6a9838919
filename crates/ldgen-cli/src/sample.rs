//! # Reference Page
//!
//! The ten-block structured-data page used to check the whole pipeline:
//! each block is built through the typed builders, composed with its
//! context, and emitted in a fixed order. Consumers index blocks by
//! position, so the order here is part of the contract.

use ldgen_core::{
    breadcrumb_list, compose, compose_default, BuildError, LdEntity, LdValue, Page, SchemaType,
};

/// Block index of the Article document.
pub const ARTICLE_INDEX: usize = 0;
/// Block index of the Breadcrumb document.
pub const BREADCRUMB_INDEX: usize = 1;
/// Block index of the Blog document.
pub const BLOG_INDEX: usize = 2;
/// Block index of the Course document.
pub const COURSE_INDEX: usize = 3;
/// Block index of the Local Business document.
pub const LOCAL_BUSINESS_INDEX: usize = 4;
/// Block index of the Logo document.
pub const LOGO_INDEX: usize = 5;
/// Block index of the Product document.
pub const PRODUCT_INDEX: usize = 6;
/// Block index of the Social Profile document.
pub const SOCIAL_PROFILE_INDEX: usize = 7;
/// Block index of the Corporate Contact document.
pub const CORPORATE_CONTACT_INDEX: usize = 8;
/// Block index of the NewsArticle document.
pub const NEWS_ARTICLE_INDEX: usize = 9;

/// Version of every reference schema.
pub const SAMPLE_SCHEMA_VERSION: &str = "1.0.0";

/// Schema name for each block, by index.
pub const SAMPLE_SCHEMAS: [&str; 10] = [
    "Article",
    "Breadcrumb",
    "Blog",
    "Course",
    "Local Business",
    "Logo",
    "Product",
    "Social Profile",
    "Corporate Contact",
    "NewsArticle",
];

const PHOTOS: [&str; 3] = [
    "https://example.com/photos/1x1/photo.jpg",
    "https://example.com/photos/4x3/photo.jpg",
    "https://example.com/photos/16x9/photo.jpg",
];

/// Build the reference page.
pub fn sample_page() -> Result<Page, BuildError> {
    let mut page = Page::new();
    page.push(compose_default(article()?));
    page.push(compose_default(breadcrumb()?));
    page.push(compose_default(blog()?));
    page.push(compose_default(course()?));
    page.push(compose_default(local_business()?));
    page.push(compose_default(logo()?));
    page.push(compose("http://schema.org/", product()?));
    page.push(compose_default(social_profile()?));
    page.push(compose("https://schema.org", corporate_contact()?));
    page.push(compose_default(news_article()?));
    Ok(page)
}

fn web_page(id: &str) -> Result<LdEntity, BuildError> {
    SchemaType::WebPage.builder().set("@id", id).build()
}

fn jane_blogs() -> Result<LdEntity, BuildError> {
    SchemaType::Person.builder().set("name", "Jane Blogs").build()
}

fn publisher() -> Result<LdEntity, BuildError> {
    let logo = SchemaType::ImageObject
        .builder()
        .set("url", "https://www.example.com/photos/logo.jpg")
        .build()?;
    SchemaType::Organization
        .builder()
        .set("name", "Gary Meehan")
        .set("logo", logo)
        .build()
}

fn photos() -> LdValue {
    LdValue::from(PHOTOS.to_vec())
}

fn article() -> Result<LdEntity, BuildError> {
    SchemaType::Article
        .builder()
        .set("mainEntityOfPage", web_page("https://example.com/article")?)
        .set("headline", "Article headline")
        .set("image", photos())
        .set("datePublished", "2015-02-05T08:00:00+08:00")
        .set("dateModified", "2015-02-05T09:00:00+08:00")
        .set("author", jane_blogs()?)
        .set("publisher", publisher()?)
        .set("description", "This is a mighty good description of this article.")
        .build()
}

fn breadcrumb() -> Result<LdEntity, BuildError> {
    breadcrumb_list([
        ("https://example.com/books", "Books"),
        ("https://example.com/books/authors", "Authors"),
        ("https://example.com/books/authors/annleckie", "Ann Leckie"),
        (
            "https://example.com/books/authors/annleckie/ancillaryjustice",
            "Ancillary Justice",
        ),
    ])
}

fn blog() -> Result<LdEntity, BuildError> {
    SchemaType::Blog
        .builder()
        .set("mainEntityOfPage", web_page("https://example.com/blog")?)
        .set("headline", "Blog headline")
        .set("image", photos())
        .set("datePublished", "2015-02-05T08:00:00+08:00")
        .set("dateModified", "2015-02-05T09:00:00+08:00")
        .set("author", jane_blogs()?)
        .set("description", "This is a mighty good description of this blog.")
        .build()
}

fn course() -> Result<LdEntity, BuildError> {
    // The provider link is missing its colon on the published page; it is
    // carried as text.
    let provider = SchemaType::Organization
        .builder()
        .set("name", "Course Provider")
        .set("sameAs", "https//www.example.com/provider")
        .build()?;
    SchemaType::Course
        .builder()
        .set("name", "Course Name")
        .set("description", "Course description goes right here")
        .set("provider", provider)
        .build()
}

fn local_business() -> Result<LdEntity, BuildError> {
    let address = SchemaType::PostalAddress
        .builder()
        .set("streetAddress", "1600 Saratoga Ave")
        .set("addressLocality", "San Jose")
        .set("addressRegion", "CA")
        .set("postalCode", "95129")
        .set("addressCountry", "US")
        .build()?;
    let geo = SchemaType::GeoCoordinates
        .builder()
        .set("latitude", "37.293058")
        .set("longitude", "-121.988331")
        .build()?;
    SchemaType::Store
        .builder()
        .set("@id", "http://davesdeptstore.example.com")
        .set("name", "Dave's Department Store")
        .set("description", "Dave's latest department store in San Jose, now open")
        .set(
            "url",
            "http://www.example.com/store-locator/sl/San-Jose-Westgate-Store/1427",
        )
        .set("telephone", "+14088717984")
        .set("address", address)
        .set("geo", geo)
        .set("image", photos())
        .build()
}

fn logo() -> Result<LdEntity, BuildError> {
    SchemaType::Organization
        .builder()
        .set("url", "http://www.your-site.com")
        .set("logo", "http://www.your-site.com/images/logo.jpg")
        .build()
}

fn product() -> Result<LdEntity, BuildError> {
    let brand = SchemaType::Thing.builder().set("name", "ACME").build()?;
    let rating = SchemaType::Rating
        .builder()
        .set("bestRating", "5")
        .set("ratingValue", "5")
        .set("worstRating", "1")
        .build()?;
    let review = SchemaType::Review
        .builder()
        .set("author", "Jim")
        .set("datePublished", "2017-01-06T03:37:40Z")
        .set(
            "reviewBody",
            "This is my favorite product yet! Thanks Nate for the example products and reviews.",
        )
        .set("name", "So awesome!!!")
        .set("reviewRating", rating)
        .build()?;
    let aggregate = SchemaType::AggregateRating
        .builder()
        .set("ratingValue", "4.4")
        .set("reviewCount", "89")
        .build()?;
    let seller = SchemaType::Organization
        .builder()
        .set("name", "Executive Objects")
        .build()?;
    let offer = SchemaType::Offer
        .builder()
        .set("priceCurrency", "USD")
        .set("price", "119.99")
        .set("priceValidUntil", "2020-11-05")
        .set("itemCondition", "http://schema.org/UsedCondition")
        .set("availability", "http://schema.org/InStock")
        .set("url", "https://www.example.com/executive-anvil")
        .set("seller", seller)
        .build()?;
    SchemaType::Product
        .builder()
        .set("name", "Executive Anvil")
        .set("image", photos())
        .set(
            "description",
            "Sleeker than ACME's Classic Anvil, the Executive Anvil is perfect for the business traveler looking for something to drop from a height.",
        )
        .set("mpn", "925872")
        .set("brand", brand)
        .set("review", vec![review])
        .set("aggregateRating", aggregate)
        .set("offers", offer)
        .build()
}

fn social_profile() -> Result<LdEntity, BuildError> {
    SchemaType::Person
        .builder()
        .set("name", "your name")
        .set("url", "http://www.your-site.com")
        .set(
            "sameAs",
            vec![
                "http://www.facebook.com/your-profile",
                "http://instagram.com/yourProfile",
                "http://www.linkedin.com/in/yourprofile",
                "http://plus.google.com/your_profile",
            ],
        )
        .build()
}

fn corporate_contact() -> Result<LdEntity, BuildError> {
    let sales = SchemaType::ContactPoint
        .builder()
        .set("telephone", "+1-401-555-1212")
        .set("contactType", "customer service")
        .set("areaServed", "US")
        .set("availableLanguage", vec!["English", "Spanish", "French"])
        .build()?;
    let toll_free = SchemaType::ContactPoint
        .builder()
        .set("telephone", "+1-877-746-0909")
        .set("contactType", "customer service")
        .set("contactOption", "TollFree")
        .set("availableLanguage", "English")
        .build()?;
    let support = SchemaType::ContactPoint
        .builder()
        .set("telephone", "+1-877-453-1304")
        .set("contactType", "technical support")
        .set("contactOption", "TollFree")
        .set("areaServed", vec!["US", "CA"])
        .set("availableLanguage", vec!["English", "French"])
        .build()?;
    SchemaType::Organization
        .builder()
        .set("url", "http://www.your-company-site.com")
        .set("logo", "http://www.example.com/logo.png")
        .set("contactPoint", vec![sales, toll_free, support])
        .build()
}

fn news_article() -> Result<LdEntity, BuildError> {
    SchemaType::NewsArticle
        .builder()
        .set("mainEntityOfPage", web_page("https://example.com/newsarticle")?)
        .set("headline", "News Article headline")
        .set("image", photos())
        .set("articleSection", "politics")
        .set("keywords", "prayuth, taksin, thai")
        .set("dateCreated", "2015-02-05T08:00:00+08:00")
        .set("datePublished", "2015-02-05T08:00:00+08:00")
        .set("dateModified", "2015-02-05T09:00:00+08:00")
        .set("author", jane_blogs()?)
        .set("publisher", publisher()?)
        .set("description", "This is a mighty good description of this news article.")
        .set("articleBody", "This is article body of news article")
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_page_has_one_block_per_schema() {
        let page = sample_page().unwrap();
        assert_eq!(page.len(), SAMPLE_SCHEMAS.len());
    }

    #[test]
    fn root_types_sit_at_their_indices() {
        let page = sample_page().unwrap();
        let expected = [
            (ARTICLE_INDEX, SchemaType::Article),
            (BREADCRUMB_INDEX, SchemaType::BreadcrumbList),
            (BLOG_INDEX, SchemaType::Blog),
            (COURSE_INDEX, SchemaType::Course),
            (LOCAL_BUSINESS_INDEX, SchemaType::Store),
            (LOGO_INDEX, SchemaType::Organization),
            (PRODUCT_INDEX, SchemaType::Product),
            (SOCIAL_PROFILE_INDEX, SchemaType::Person),
            (CORPORATE_CONTACT_INDEX, SchemaType::Organization),
            (NEWS_ARTICLE_INDEX, SchemaType::NewsArticle),
        ];
        for (index, schema_type) in expected {
            assert_eq!(page.get(index).unwrap().root().schema_type(), schema_type, "index {index}");
        }
    }

    #[test]
    fn contexts_follow_the_published_page() {
        let page = sample_page().unwrap();
        assert_eq!(page.get(PRODUCT_INDEX).unwrap().context(), "http://schema.org/");
        assert_eq!(page.get(CORPORATE_CONTACT_INDEX).unwrap().context(), "https://schema.org");
        assert_eq!(page.get(ARTICLE_INDEX).unwrap().context(), "http://schema.org");
    }
}
