//! Entity catalog: the fixed registry of content kinds and their field shapes.
//!
//! # Responsibility
//! - Declare every content kind, its storage table and its fields.
//! - Expose metadata that drives generic repository behavior and payload
//!   validation.
//!
//! # Invariants
//! - The catalog is compile-time data; nothing mutates it at runtime.
//! - Table names are unique and double as the stable kind slug.
//! - Localized fields are always required (default language at creation).
//! - Only `StorageShape::List` kinds support `displayOrder`/`isActive`.

/// Content kind discriminator.
///
/// Each kind owns exactly one storage table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ContentKind {
    TeamMember,
    BlogPost,
    JobPosition,
    CompanyValue,
    PartnerLogo,
    ReferenceProject,
    HomepageStatistic,
    SectorContent,
    ContactInfo,
    Service,
    Testimonial,
    FaqItem,
    Milestone,
    Certification,
    OfficeLocation,
    ContactMessage,
    DemoRequest,
    JobApplication,
    CareerContent,
    AboutContent,
    ContactContent,
}

/// Every kind in catalog order.
pub const ALL_KINDS: &[ContentKind] = &[
    ContentKind::TeamMember,
    ContentKind::BlogPost,
    ContentKind::JobPosition,
    ContentKind::CompanyValue,
    ContentKind::PartnerLogo,
    ContentKind::ReferenceProject,
    ContentKind::HomepageStatistic,
    ContentKind::SectorContent,
    ContentKind::ContactInfo,
    ContentKind::Service,
    ContentKind::Testimonial,
    ContentKind::FaqItem,
    ContentKind::Milestone,
    ContentKind::Certification,
    ContentKind::OfficeLocation,
    ContentKind::ContactMessage,
    ContentKind::DemoRequest,
    ContentKind::JobApplication,
    ContentKind::CareerContent,
    ContentKind::AboutContent,
    ContentKind::ContactContent,
];

impl ContentKind {
    /// Stable slug, equal to the storage table name.
    pub fn as_str(self) -> &'static str {
        self.schema().table
    }

    /// Parses a kind slug. Accepts `-` as well as `_` separators.
    pub fn parse(value: &str) -> Option<Self> {
        let normalized = value.trim().replace('-', "_");
        ALL_KINDS
            .iter()
            .copied()
            .find(|kind| kind.as_str() == normalized)
    }

    /// Returns the catalog entry for this kind.
    pub fn schema(self) -> &'static KindSchema {
        match self {
            Self::TeamMember => &TEAM_MEMBER,
            Self::BlogPost => &BLOG_POST,
            Self::JobPosition => &JOB_POSITION,
            Self::CompanyValue => &COMPANY_VALUE,
            Self::PartnerLogo => &PARTNER_LOGO,
            Self::ReferenceProject => &REFERENCE_PROJECT,
            Self::HomepageStatistic => &HOMEPAGE_STATISTIC,
            Self::SectorContent => &SECTOR_CONTENT,
            Self::ContactInfo => &CONTACT_INFO,
            Self::Service => &SERVICE,
            Self::Testimonial => &TESTIMONIAL,
            Self::FaqItem => &FAQ_ITEM,
            Self::Milestone => &MILESTONE,
            Self::Certification => &CERTIFICATION,
            Self::OfficeLocation => &OFFICE_LOCATION,
            Self::ContactMessage => &CONTACT_MESSAGE,
            Self::DemoRequest => &DEMO_REQUEST,
            Self::JobApplication => &JOB_APPLICATION,
            Self::CareerContent => &CAREER_CONTENT,
            Self::AboutContent => &ABOUT_CONTENT,
            Self::ContactContent => &CONTACT_CONTENT,
        }
    }
}

impl std::fmt::Display for ContentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a kind's rows are identified and stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageShape {
    /// Collection of rows with generated ids.
    List,
    /// At most one row per string section key.
    Keyed,
}

impl StorageShape {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::List => "list",
            Self::Keyed => "keyed",
        }
    }
}

/// Value type of one catalog field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    /// Plain string.
    Text,
    /// Language -> string map.
    Localized,
    /// Free-form array of strings.
    List,
    /// Signed integer.
    Integer,
    /// Boolean flag.
    Bool,
}

impl FieldType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Localized => "localized text",
            Self::List => "string array",
            Self::Integer => "integer",
            Self::Bool => "boolean",
        }
    }
}

/// One declared field of a kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// Wire name (camelCase).
    pub name: &'static str,
    pub ty: FieldType,
    /// Must be present at creation. A present localized field always needs
    /// its default-language value.
    pub required: bool,
}

impl FieldSpec {
    const fn new(name: &'static str, ty: FieldType, required: bool) -> Self {
        Self { name, ty, required }
    }

    pub fn is_required(&self) -> bool {
        self.required
    }
}

const fn text(name: &'static str) -> FieldSpec {
    FieldSpec::new(name, FieldType::Text, true)
}

const fn opt_text(name: &'static str) -> FieldSpec {
    FieldSpec::new(name, FieldType::Text, false)
}

const fn localized(name: &'static str) -> FieldSpec {
    FieldSpec::new(name, FieldType::Localized, true)
}

const fn opt_localized(name: &'static str) -> FieldSpec {
    FieldSpec::new(name, FieldType::Localized, false)
}

const fn list(name: &'static str) -> FieldSpec {
    FieldSpec::new(name, FieldType::List, false)
}

const fn opt_integer(name: &'static str) -> FieldSpec {
    FieldSpec::new(name, FieldType::Integer, false)
}

const fn flag(name: &'static str) -> FieldSpec {
    FieldSpec::new(name, FieldType::Bool, false)
}

/// Catalog entry for one content kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KindSchema {
    pub kind: ContentKind,
    /// Storage table and kind slug.
    pub table: &'static str,
    pub storage: StorageShape,
    /// Supports `displayOrder`.
    pub ordered: bool,
    /// Supports `isActive`.
    pub toggleable: bool,
    /// Readable through the public surface.
    pub public: bool,
    /// Accepts creation from public form submissions.
    pub accepts_submissions: bool,
    /// Triggers the submission notifier after `create`.
    pub notify_on_create: bool,
    pub fields: &'static [FieldSpec],
}

impl KindSchema {
    const fn list(kind: ContentKind, table: &'static str, fields: &'static [FieldSpec]) -> Self {
        Self {
            kind,
            table,
            storage: StorageShape::List,
            ordered: true,
            toggleable: true,
            public: true,
            accepts_submissions: false,
            notify_on_create: false,
            fields,
        }
    }

    const fn submission(
        kind: ContentKind,
        table: &'static str,
        fields: &'static [FieldSpec],
    ) -> Self {
        Self {
            kind,
            table,
            storage: StorageShape::List,
            ordered: false,
            toggleable: false,
            public: false,
            accepts_submissions: true,
            notify_on_create: true,
            fields,
        }
    }

    const fn keyed(kind: ContentKind, table: &'static str, fields: &'static [FieldSpec]) -> Self {
        Self {
            kind,
            table,
            storage: StorageShape::Keyed,
            ordered: false,
            toggleable: false,
            public: true,
            accepts_submissions: false,
            notify_on_create: false,
            fields,
        }
    }

    /// Looks up a declared field by wire name.
    pub fn field(&self, name: &str) -> Option<&'static FieldSpec> {
        self.fields.iter().find(|field| field.name == name)
    }

    /// Iterates declared localized fields.
    pub fn localized_fields(&self) -> impl Iterator<Item = &'static FieldSpec> {
        self.fields
            .iter()
            .filter(|field| field.ty == FieldType::Localized)
    }
}

static TEAM_MEMBER: KindSchema = KindSchema::list(
    ContentKind::TeamMember,
    "team_members",
    TEAM_MEMBER_FIELDS,
);
const TEAM_MEMBER_FIELDS: &[FieldSpec] = &[
    text("name"),
    localized("role"),
    opt_localized("bio"),
    opt_text("photoUrl"),
    opt_text("linkedinUrl"),
    opt_text("email"),
];

static BLOG_POST: KindSchema = KindSchema::list(
    ContentKind::BlogPost,
    "blog_posts",
    BLOG_POST_FIELDS,
);
const BLOG_POST_FIELDS: &[FieldSpec] = &[
    text("slug"),
    localized("title"),
    opt_localized("excerpt"),
    localized("content"),
    opt_text("coverImage"),
    opt_text("author"),
    opt_text("category"),
    opt_text("publishedAt"),
    list("tags"),
    flag("featured"),
];

static JOB_POSITION: KindSchema = KindSchema::list(
    ContentKind::JobPosition,
    "job_positions",
    JOB_POSITION_FIELDS,
);
const JOB_POSITION_FIELDS: &[FieldSpec] = &[
    localized("title"),
    text("department"),
    text("location"),
    text("employmentType"),
    opt_localized("description"),
    list("requirements"),
    list("responsibilities"),
];

static COMPANY_VALUE: KindSchema = KindSchema::list(
    ContentKind::CompanyValue,
    "company_values",
    COMPANY_VALUE_FIELDS,
);
const COMPANY_VALUE_FIELDS: &[FieldSpec] = &[
    localized("title"),
    opt_localized("description"),
    opt_text("iconName"),
];

static PARTNER_LOGO: KindSchema = KindSchema::list(
    ContentKind::PartnerLogo,
    "partner_logos",
    PARTNER_LOGO_FIELDS,
);
const PARTNER_LOGO_FIELDS: &[FieldSpec] = &[
    text("name"),
    text("logoUrl"),
    opt_text("websiteUrl"),
];

static REFERENCE_PROJECT: KindSchema = KindSchema::list(
    ContentKind::ReferenceProject,
    "reference_projects",
    REFERENCE_PROJECT_FIELDS,
);
const REFERENCE_PROJECT_FIELDS: &[FieldSpec] = &[
    localized("title"),
    text("client"),
    text("sector"),
    opt_localized("description"),
    opt_text("duration"),
    opt_text("imageUrl"),
    list("results"),
    list("technologies"),
];

static HOMEPAGE_STATISTIC: KindSchema = KindSchema::list(
    ContentKind::HomepageStatistic,
    "homepage_statistics",
    HOMEPAGE_STATISTIC_FIELDS,
);
const HOMEPAGE_STATISTIC_FIELDS: &[FieldSpec] = &[
    text("value"),
    localized("label"),
    opt_text("iconName"),
];

static SECTOR_CONTENT: KindSchema = KindSchema::list(
    ContentKind::SectorContent,
    "sector_contents",
    SECTOR_CONTENT_FIELDS,
);
const SECTOR_CONTENT_FIELDS: &[FieldSpec] = &[
    text("sector"),
    localized("title"),
    opt_localized("description"),
    opt_text("iconName"),
    opt_text("imageUrl"),
    list("features"),
];

static CONTACT_INFO: KindSchema = KindSchema::list(
    ContentKind::ContactInfo,
    "contact_infos",
    CONTACT_INFO_FIELDS,
);
const CONTACT_INFO_FIELDS: &[FieldSpec] = &[
    text("channel"),
    localized("label"),
    text("value"),
    opt_text("iconName"),
    opt_text("link"),
];

static SERVICE: KindSchema = KindSchema::list(
    ContentKind::Service,
    "services",
    SERVICE_FIELDS,
);
const SERVICE_FIELDS: &[FieldSpec] = &[
    localized("title"),
    opt_localized("description"),
    opt_text("iconName"),
    list("highlights"),
];

static TESTIMONIAL: KindSchema = KindSchema::list(
    ContentKind::Testimonial,
    "testimonials",
    TESTIMONIAL_FIELDS,
);
const TESTIMONIAL_FIELDS: &[FieldSpec] = &[
    text("authorName"),
    opt_text("authorTitle"),
    opt_text("company"),
    localized("quote"),
    opt_integer("rating"),
];

static FAQ_ITEM: KindSchema = KindSchema::list(
    ContentKind::FaqItem,
    "faq_items",
    FAQ_ITEM_FIELDS,
);
const FAQ_ITEM_FIELDS: &[FieldSpec] = &[
    localized("question"),
    localized("answer"),
    opt_text("category"),
];

static MILESTONE: KindSchema = KindSchema::list(
    ContentKind::Milestone,
    "milestones",
    MILESTONE_FIELDS,
);
const MILESTONE_FIELDS: &[FieldSpec] = &[
    text("year"),
    localized("title"),
    opt_localized("description"),
];

static CERTIFICATION: KindSchema = KindSchema::list(
    ContentKind::Certification,
    "certifications",
    CERTIFICATION_FIELDS,
);
const CERTIFICATION_FIELDS: &[FieldSpec] = &[
    text("name"),
    opt_text("issuer"),
    opt_text("imageUrl"),
    opt_text("validUntil"),
];

static OFFICE_LOCATION: KindSchema = KindSchema::list(
    ContentKind::OfficeLocation,
    "office_locations",
    OFFICE_LOCATION_FIELDS,
);
const OFFICE_LOCATION_FIELDS: &[FieldSpec] = &[
    localized("city"),
    text("address"),
    opt_text("phone"),
    opt_text("email"),
    opt_text("mapUrl"),
    flag("headquarters"),
];

static CONTACT_MESSAGE: KindSchema = KindSchema::submission(
    ContentKind::ContactMessage,
    "contact_messages",
    CONTACT_MESSAGE_FIELDS,
);
const CONTACT_MESSAGE_FIELDS: &[FieldSpec] = &[
    text("name"),
    text("email"),
    opt_text("phone"),
    opt_text("company"),
    opt_text("subject"),
    text("message"),
];

static DEMO_REQUEST: KindSchema = KindSchema::submission(
    ContentKind::DemoRequest,
    "demo_requests",
    DEMO_REQUEST_FIELDS,
);
const DEMO_REQUEST_FIELDS: &[FieldSpec] = &[
    text("name"),
    text("email"),
    text("company"),
    opt_text("phone"),
    opt_text("sector"),
    opt_text("message"),
];

static JOB_APPLICATION: KindSchema = KindSchema::submission(
    ContentKind::JobApplication,
    "job_applications",
    JOB_APPLICATION_FIELDS,
);
const JOB_APPLICATION_FIELDS: &[FieldSpec] = &[
    opt_text("positionId"),
    text("name"),
    text("email"),
    opt_text("phone"),
    opt_text("resumeUrl"),
    opt_text("coverLetter"),
];

static CAREER_CONTENT: KindSchema = KindSchema::keyed(
    ContentKind::CareerContent,
    "career_contents",
    CAREER_CONTENT_FIELDS,
);
const CAREER_CONTENT_FIELDS: &[FieldSpec] = &[
    localized("title"),
    opt_localized("body"),
    opt_text("imageUrl"),
    list("benefits"),
];

static ABOUT_CONTENT: KindSchema = KindSchema::keyed(
    ContentKind::AboutContent,
    "about_contents",
    ABOUT_CONTENT_FIELDS,
);
const ABOUT_CONTENT_FIELDS: &[FieldSpec] = &[
    localized("title"),
    opt_localized("body"),
    opt_text("imageUrl"),
];

static CONTACT_CONTENT: KindSchema = KindSchema::keyed(
    ContentKind::ContactContent,
    "contact_contents",
    CONTACT_CONTENT_FIELDS,
);
const CONTACT_CONTENT_FIELDS: &[FieldSpec] = &[
    localized("title"),
    opt_localized("body"),
    opt_text("mapEmbedUrl"),
];

#[cfg(test)]
mod tests {
    use super::{ContentKind, FieldType, StorageShape, ALL_KINDS};
    use std::collections::HashSet;

    #[test]
    fn schema_kind_matches_discriminator() {
        for kind in ALL_KINDS {
            assert_eq!(kind.schema().kind, *kind);
        }
    }

    #[test]
    fn table_names_are_unique() {
        let tables: HashSet<&str> = ALL_KINDS.iter().map(|kind| kind.as_str()).collect();
        assert_eq!(tables.len(), ALL_KINDS.len());
    }

    #[test]
    fn field_names_are_unique_and_not_reserved() {
        for kind in ALL_KINDS {
            let mut seen = HashSet::new();
            for field in kind.schema().fields {
                assert!(seen.insert(field.name), "{kind}: duplicate {}", field.name);
                assert!(
                    !["id", "section", "displayOrder", "isActive", "createdAt", "updatedAt"]
                        .contains(&field.name),
                    "{kind}: reserved field {}",
                    field.name
                );
            }
        }
    }

    #[test]
    fn parse_accepts_slugs_with_either_separator() {
        assert_eq!(
            ContentKind::parse("company_values"),
            Some(ContentKind::CompanyValue)
        );
        assert_eq!(
            ContentKind::parse("company-values"),
            Some(ContentKind::CompanyValue)
        );
        assert_eq!(ContentKind::parse("unknown"), None);
    }

    #[test]
    fn only_list_kinds_support_order_and_visibility() {
        for kind in ALL_KINDS {
            let schema = kind.schema();
            if schema.storage == StorageShape::Keyed {
                assert!(!schema.ordered && !schema.toggleable);
            }
            if schema.accepts_submissions {
                assert!(!schema.public, "{kind}: submissions must stay admin-only");
            }
        }
    }

    #[test]
    fn headline_fields_are_required_and_descriptions_optional() {
        let schema = ContentKind::CompanyValue.schema();
        let localized: Vec<&str> = schema.localized_fields().map(|field| field.name).collect();
        assert_eq!(localized, vec!["title", "description"]);
        assert!(schema.field("title").unwrap().is_required());
        assert!(!schema.field("description").unwrap().is_required());
        for kind in ALL_KINDS {
            if kind.schema().storage == StorageShape::Keyed {
                assert!(kind.schema().field("title").unwrap().is_required());
                assert!(!kind.schema().field("body").unwrap().is_required());
            }
        }
        assert_eq!(
            schema.field("iconName").map(|field| field.ty),
            Some(FieldType::Text)
        );
    }
}
