//! # Field Catalog
//!
//! The recognized field set of every [`SchemaType`]. A type's builder
//! accepts exactly these fields plus `@id`, which any JSON-LD node may
//! carry.
//!
//! Value kinds are deliberately loose where schema.org and real pages are
//! loose: ratings and prices are "number" but accept numeric text
//! (`"4.4"`), and `Organization.sameAs` is text because hand-authored
//! profile links are not always well-formed URLs.

use crate::entity::SchemaType;

/// What a single field value may be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// Text (a URL is also text).
    Text,
    /// Absolute URL. Text that parses as one is promoted.
    Url,
    /// ISO-8601 date-time text, not inspected.
    DateTime,
    /// ISO-8601 date text, not inspected.
    Date,
    /// JSON number or numeric text, not inspected.
    Number,
    /// JSON integer.
    Integer,
    /// A built entity of one of these types.
    Entity(&'static [SchemaType]),
    /// An untyped `{ "@id", "name"? }` node whose `@id` is an absolute URL.
    Reference,
}

impl ValueKind {
    /// Short description used in error messages.
    pub fn describe(&self) -> String {
        match self {
            ValueKind::Text => "text".to_string(),
            ValueKind::Url => "URL".to_string(),
            ValueKind::DateTime => "date-time text".to_string(),
            ValueKind::Date => "date text".to_string(),
            ValueKind::Number => "number".to_string(),
            ValueKind::Integer => "integer".to_string(),
            ValueKind::Entity(types) => {
                let names: Vec<&str> = types.iter().map(|t| t.as_str()).collect();
                format!("{} entity", names.join("/"))
            }
            ValueKind::Reference => "node with an @id URL".to_string(),
        }
    }
}

/// How many values a field takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Multiplicity {
    /// Exactly one value.
    One,
    /// A single value or a list, preserved as given.
    OneOrMany,
    /// Always a list.
    Many,
}

/// One recognized field.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    /// JSON-LD property name.
    pub name: &'static str,
    /// Whether `build()` fails without it.
    pub required: bool,
    /// Single value, list, or either.
    pub multiplicity: Multiplicity,
    /// Accepted kinds, tried in order.
    pub kinds: &'static [ValueKind],
}

/// The recognized field set of one type.
#[derive(Debug)]
pub struct EntityDefinition {
    /// Type these fields belong to.
    pub schema_type: SchemaType,
    /// Fields in canonical order.
    pub fields: &'static [FieldSpec],
}

impl EntityDefinition {
    /// Look up a field by name. `@id` is accepted on every type.
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .or_else(|| (name == "@id").then_some(&NODE_ID))
    }

    /// Required fields, in catalog order.
    pub fn required(&self) -> impl Iterator<Item = &FieldSpec> {
        self.fields.iter().filter(|f| f.required)
    }
}

const fn req(name: &'static str, kinds: &'static [ValueKind]) -> FieldSpec {
    FieldSpec { name, required: true, multiplicity: Multiplicity::One, kinds }
}

const fn opt(name: &'static str, kinds: &'static [ValueKind]) -> FieldSpec {
    FieldSpec { name, required: false, multiplicity: Multiplicity::One, kinds }
}

const fn opt_many(name: &'static str, kinds: &'static [ValueKind]) -> FieldSpec {
    FieldSpec { name, required: false, multiplicity: Multiplicity::OneOrMany, kinds }
}

const fn req_many(name: &'static str, kinds: &'static [ValueKind]) -> FieldSpec {
    FieldSpec { name, required: true, multiplicity: Multiplicity::OneOrMany, kinds }
}

const fn req_list(name: &'static str, kinds: &'static [ValueKind]) -> FieldSpec {
    FieldSpec { name, required: true, multiplicity: Multiplicity::Many, kinds }
}

static NODE_ID: FieldSpec = opt("@id", TEXT);

const TEXT: &[ValueKind] = &[ValueKind::Text];
const URL: &[ValueKind] = &[ValueKind::Url];
const DATE_TIME: &[ValueKind] = &[ValueKind::DateTime];
const DATE: &[ValueKind] = &[ValueKind::Date];
const NUMBER: &[ValueKind] = &[ValueKind::Number];
const INTEGER: &[ValueKind] = &[ValueKind::Integer];
const IMAGE: &[ValueKind] = &[ValueKind::Url, ValueKind::Entity(&[SchemaType::ImageObject])];
const AGENT: &[ValueKind] = &[ValueKind::Entity(&[SchemaType::Person, SchemaType::Organization])];
const AUTHOR: &[ValueKind] = &[
    ValueKind::Entity(&[SchemaType::Person, SchemaType::Organization]),
    ValueKind::Text,
];
const PUBLISHER: &[ValueKind] = &[ValueKind::Entity(&[SchemaType::Organization])];
const MAIN_ENTITY: &[ValueKind] = &[ValueKind::Entity(&[SchemaType::WebPage]), ValueKind::Url];
const ADDRESS: &[ValueKind] = &[ValueKind::Entity(&[SchemaType::PostalAddress])];
const GEO: &[ValueKind] = &[ValueKind::Entity(&[SchemaType::GeoCoordinates])];
const CONTACT_POINT: &[ValueKind] = &[ValueKind::Entity(&[SchemaType::ContactPoint])];
const LIST_ITEM: &[ValueKind] = &[ValueKind::Entity(&[SchemaType::ListItem])];
const ITEM: &[ValueKind] = &[ValueKind::Reference, ValueKind::Url];
const BRAND: &[ValueKind] = &[ValueKind::Entity(&[
    SchemaType::Thing,
    SchemaType::Brand,
    SchemaType::Organization,
])];
const REVIEW: &[ValueKind] = &[ValueKind::Entity(&[SchemaType::Review])];
const RATING: &[ValueKind] = &[ValueKind::Entity(&[SchemaType::Rating])];
const AGGREGATE_RATING: &[ValueKind] = &[ValueKind::Entity(&[SchemaType::AggregateRating])];
const OFFER: &[ValueKind] = &[ValueKind::Entity(&[SchemaType::Offer])];

static ARTICLE_FIELDS: &[FieldSpec] = &[
    opt("mainEntityOfPage", MAIN_ENTITY),
    req("headline", TEXT),
    opt_many("image", IMAGE),
    req("datePublished", DATE_TIME),
    opt("dateModified", DATE_TIME),
    opt_many("author", AUTHOR),
    opt("publisher", PUBLISHER),
    opt("description", TEXT),
];

static NEWS_ARTICLE_FIELDS: &[FieldSpec] = &[
    opt("mainEntityOfPage", MAIN_ENTITY),
    req("headline", TEXT),
    opt_many("image", IMAGE),
    opt_many("articleSection", TEXT),
    opt("keywords", TEXT),
    opt("dateCreated", DATE_TIME),
    req("datePublished", DATE_TIME),
    opt("dateModified", DATE_TIME),
    opt_many("author", AUTHOR),
    opt("publisher", PUBLISHER),
    opt("description", TEXT),
    opt("articleBody", TEXT),
];

static COURSE_FIELDS: &[FieldSpec] = &[
    req("name", TEXT),
    req("description", TEXT),
    opt("provider", AGENT),
    opt("url", URL),
    opt("courseCode", TEXT),
];

static BREADCRUMB_LIST_FIELDS: &[FieldSpec] = &[req_list("itemListElement", LIST_ITEM)];

static LIST_ITEM_FIELDS: &[FieldSpec] = &[
    req("position", INTEGER),
    req("item", ITEM),
    opt("name", TEXT),
];

static WEB_PAGE_FIELDS: &[FieldSpec] = &[
    req("@id", URL),
    opt("name", TEXT),
    opt("url", URL),
];

static ORGANIZATION_FIELDS: &[FieldSpec] = &[
    opt("name", TEXT),
    opt("url", URL),
    opt("logo", IMAGE),
    opt_many("sameAs", TEXT),
    opt_many("contactPoint", CONTACT_POINT),
    opt("address", ADDRESS),
    opt("telephone", TEXT),
    opt("email", TEXT),
    opt("description", TEXT),
];

static PERSON_FIELDS: &[FieldSpec] = &[
    req("name", TEXT),
    opt("url", URL),
    opt_many("sameAs", URL),
    opt_many("image", IMAGE),
    opt("jobTitle", TEXT),
    opt("email", TEXT),
    opt("telephone", TEXT),
];

static IMAGE_OBJECT_FIELDS: &[FieldSpec] = &[
    req("url", URL),
    opt("width", NUMBER),
    opt("height", NUMBER),
    opt("caption", TEXT),
];

static LOCAL_BUSINESS_FIELDS: &[FieldSpec] = &[
    req("name", TEXT),
    opt("description", TEXT),
    opt("url", URL),
    opt("telephone", TEXT),
    req("address", ADDRESS),
    opt("geo", GEO),
    opt_many("image", IMAGE),
    opt("priceRange", TEXT),
    opt_many("openingHours", TEXT),
    opt_many("sameAs", TEXT),
];

static POSTAL_ADDRESS_FIELDS: &[FieldSpec] = &[
    req("streetAddress", TEXT),
    opt("addressLocality", TEXT),
    opt("addressRegion", TEXT),
    opt("postalCode", TEXT),
    opt("addressCountry", TEXT),
];

static GEO_COORDINATES_FIELDS: &[FieldSpec] = &[
    req("latitude", NUMBER),
    req("longitude", NUMBER),
];

static PRODUCT_FIELDS: &[FieldSpec] = &[
    req("name", TEXT),
    opt_many("image", IMAGE),
    opt("description", TEXT),
    opt("sku", TEXT),
    opt("mpn", TEXT),
    opt("gtin13", TEXT),
    opt("brand", BRAND),
    opt_many("review", REVIEW),
    opt("aggregateRating", AGGREGATE_RATING),
    opt_many("offers", OFFER),
];

static THING_FIELDS: &[FieldSpec] = &[
    req("name", TEXT),
    opt("url", URL),
    opt("description", TEXT),
];

static BRAND_FIELDS: &[FieldSpec] = &[
    req("name", TEXT),
    opt("logo", IMAGE),
    opt("url", URL),
];

static REVIEW_FIELDS: &[FieldSpec] = &[
    req_many("author", AUTHOR),
    opt("datePublished", DATE_TIME),
    opt("reviewBody", TEXT),
    opt("name", TEXT),
    opt("reviewRating", RATING),
];

static RATING_FIELDS: &[FieldSpec] = &[
    opt("bestRating", NUMBER),
    req("ratingValue", NUMBER),
    opt("worstRating", NUMBER),
];

static AGGREGATE_RATING_FIELDS: &[FieldSpec] = &[
    req("ratingValue", NUMBER),
    opt("reviewCount", NUMBER),
    opt("ratingCount", NUMBER),
    opt("bestRating", NUMBER),
    opt("worstRating", NUMBER),
];

static OFFER_FIELDS: &[FieldSpec] = &[
    req("priceCurrency", TEXT),
    req("price", NUMBER),
    opt("priceValidUntil", DATE),
    opt("itemCondition", URL),
    opt("availability", URL),
    opt("url", URL),
    opt("seller", AGENT),
];

static CONTACT_POINT_FIELDS: &[FieldSpec] = &[
    req("telephone", TEXT),
    req("contactType", TEXT),
    opt_many("contactOption", TEXT),
    opt_many("areaServed", TEXT),
    opt_many("availableLanguage", TEXT),
    opt("email", TEXT),
];

macro_rules! definitions {
    ($($name:ident => $ty:ident, $fields:ident;)*) => {
        $(static $name: EntityDefinition = EntityDefinition {
            schema_type: SchemaType::$ty,
            fields: $fields,
        };)*
    };
}

definitions! {
    ARTICLE => Article, ARTICLE_FIELDS;
    NEWS_ARTICLE => NewsArticle, NEWS_ARTICLE_FIELDS;
    BLOG => Blog, ARTICLE_FIELDS;
    BLOG_POSTING => BlogPosting, ARTICLE_FIELDS;
    COURSE => Course, COURSE_FIELDS;
    BREADCRUMB_LIST => BreadcrumbList, BREADCRUMB_LIST_FIELDS;
    LIST_ITEM_DEF => ListItem, LIST_ITEM_FIELDS;
    WEB_PAGE => WebPage, WEB_PAGE_FIELDS;
    ORGANIZATION => Organization, ORGANIZATION_FIELDS;
    PERSON => Person, PERSON_FIELDS;
    IMAGE_OBJECT => ImageObject, IMAGE_OBJECT_FIELDS;
    LOCAL_BUSINESS => LocalBusiness, LOCAL_BUSINESS_FIELDS;
    STORE => Store, LOCAL_BUSINESS_FIELDS;
    POSTAL_ADDRESS => PostalAddress, POSTAL_ADDRESS_FIELDS;
    GEO_COORDINATES => GeoCoordinates, GEO_COORDINATES_FIELDS;
    PRODUCT => Product, PRODUCT_FIELDS;
    THING => Thing, THING_FIELDS;
    BRAND_DEF => Brand, BRAND_FIELDS;
    REVIEW_DEF => Review, REVIEW_FIELDS;
    RATING_DEF => Rating, RATING_FIELDS;
    AGGREGATE_RATING_DEF => AggregateRating, AGGREGATE_RATING_FIELDS;
    OFFER_DEF => Offer, OFFER_FIELDS;
    CONTACT_POINT_DEF => ContactPoint, CONTACT_POINT_FIELDS;
}

/// The field catalog entry for a type.
pub fn definition(schema_type: SchemaType) -> &'static EntityDefinition {
    match schema_type {
        SchemaType::Article => &ARTICLE,
        SchemaType::NewsArticle => &NEWS_ARTICLE,
        SchemaType::Blog => &BLOG,
        SchemaType::BlogPosting => &BLOG_POSTING,
        SchemaType::Course => &COURSE,
        SchemaType::BreadcrumbList => &BREADCRUMB_LIST,
        SchemaType::ListItem => &LIST_ITEM_DEF,
        SchemaType::WebPage => &WEB_PAGE,
        SchemaType::Organization => &ORGANIZATION,
        SchemaType::Person => &PERSON,
        SchemaType::ImageObject => &IMAGE_OBJECT,
        SchemaType::LocalBusiness => &LOCAL_BUSINESS,
        SchemaType::Store => &STORE,
        SchemaType::PostalAddress => &POSTAL_ADDRESS,
        SchemaType::GeoCoordinates => &GEO_COORDINATES,
        SchemaType::Product => &PRODUCT,
        SchemaType::Thing => &THING,
        SchemaType::Brand => &BRAND_DEF,
        SchemaType::Review => &REVIEW_DEF,
        SchemaType::Rating => &RATING_DEF,
        SchemaType::AggregateRating => &AGGREGATE_RATING_DEF,
        SchemaType::Offer => &OFFER_DEF,
        SchemaType::ContactPoint => &CONTACT_POINT_DEF,
    }
}
