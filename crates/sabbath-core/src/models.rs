//! Typed content models
//!
//! One struct per entity kind, the [`Entity`] tagged variant over them, and
//! the explicit [`EntityKind`] table that maps each kind to its collection,
//! schema and list defaults.

use crate::types::{Document, FieldType, Schema, SchemaField, ValidationError, Validator, Value};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Language stored when the input does not name one
pub const DEFAULT_LANG: &str = "hu";

/// Challenge length when the input does not name one
pub const DEFAULT_DURATION_DAYS: i64 = 7;

/// Allowed challenge length, inclusive
pub const DURATION_DAYS_RANGE: (i64, i64) = (1, 90);

/// The four content collections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    BlogPost,
    Tip,
    Challenge,
    EbookTest,
}

impl EntityKind {
    /// Every kind, in seeding order
    pub const ALL: [EntityKind; 4] = [
        EntityKind::BlogPost,
        EntityKind::Tip,
        EntityKind::Challenge,
        EntityKind::EbookTest,
    ];

    /// Storage collection name
    pub fn collection(&self) -> &'static str {
        match self {
            EntityKind::BlogPost => "blogpost",
            EntityKind::Tip => "tip",
            EntityKind::Challenge => "challenge",
            EntityKind::EbookTest => "ebooktest",
        }
    }

    /// Plural key used in routes and seed summaries
    pub fn plural(&self) -> &'static str {
        match self {
            EntityKind::BlogPost => "blogposts",
            EntityKind::Tip => "tips",
            EntityKind::Challenge => "challenges",
            EntityKind::EbookTest => "ebooktests",
        }
    }

    /// Page size used when a list request gives no limit
    pub fn default_limit(&self) -> i64 {
        match self {
            EntityKind::BlogPost => 20,
            _ => 50,
        }
    }

    /// Input schema for this kind
    pub fn schema(&self) -> Schema {
        let tags = || {
            SchemaField::new("tags", FieldType::StringList).with_default(Vec::<String>::new())
        };
        let lang = || SchemaField::new("lang", FieldType::String).with_default(DEFAULT_LANG);
        let text = |name: &str| SchemaField::new(name, FieldType::String);

        let schema = Schema::new(self.collection());
        match self {
            EntityKind::BlogPost => schema
                .add_field(text("title"))
                .add_field(text("slug").with_description("URL-safe unique identifier"))
                .add_field(text("excerpt").optional())
                .add_field(text("content").with_description("Markdown or HTML body"))
                .add_field(text("cover_image").optional())
                .add_field(tags())
                .add_field(text("author").optional())
                .add_field(SchemaField::new("published_at", FieldType::Timestamp).optional())
                .add_field(lang()),
            EntityKind::Tip => schema
                .add_field(text("title"))
                .add_field(text("description"))
                .add_field(text("category").optional())
                .add_field(
                    text("difficulty")
                        .optional()
                        .with_description("easy | medium | hard"),
                )
                .add_field(tags())
                .add_field(lang()),
            EntityKind::Challenge => schema
                .add_field(text("title"))
                .add_field(text("description"))
                .add_field(
                    SchemaField::new(
                        "duration_days",
                        FieldType::integer_in(DURATION_DAYS_RANGE.0, DURATION_DAYS_RANGE.1),
                    )
                    .with_default(DEFAULT_DURATION_DAYS),
                )
                .add_field(text("focus").optional())
                .add_field(tags())
                .add_field(lang()),
            EntityKind::EbookTest => schema
                .add_field(text("title"))
                .add_field(text("description").optional())
                .add_field(
                    SchemaField::new("questions", FieldType::StringList)
                        .with_default(Vec::<String>::new()),
                )
                .add_field(
                    SchemaField::new("recommended_reads", FieldType::StringList)
                        .with_default(Vec::<String>::new()),
                )
                .add_field(tags())
                .add_field(lang()),
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.collection())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlogPost {
    pub title: String,
    pub slug: String,
    pub excerpt: Option<String>,
    pub content: String,
    pub cover_image: Option<String>,
    pub tags: Vec<String>,
    pub author: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub lang: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tip {
    pub title: String,
    pub description: String,
    pub category: Option<String>,
    /// easy | medium | hard
    pub difficulty: Option<String>,
    pub tags: Vec<String>,
    pub lang: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Challenge {
    pub title: String,
    pub description: String,
    pub duration_days: i64,
    pub focus: Option<String>,
    pub tags: Vec<String>,
    pub lang: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EbookTest {
    pub title: String,
    pub description: Option<String>,
    pub questions: Vec<String>,
    pub recommended_reads: Vec<String>,
    pub tags: Vec<String>,
    pub lang: String,
}

impl BlogPost {
    pub fn new(title: impl Into<String>, slug: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            slug: slug.into(),
            excerpt: None,
            content: content.into(),
            cover_image: None,
            tags: Vec::new(),
            author: None,
            published_at: None,
            lang: DEFAULT_LANG.to_string(),
        }
    }
}

impl Tip {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            category: None,
            difficulty: None,
            tags: Vec::new(),
            lang: DEFAULT_LANG.to_string(),
        }
    }
}

impl Challenge {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            duration_days: DEFAULT_DURATION_DAYS,
            focus: None,
            tags: Vec::new(),
            lang: DEFAULT_LANG.to_string(),
        }
    }
}

impl EbookTest {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            questions: Vec::new(),
            recommended_reads: Vec::new(),
            tags: Vec::new(),
            lang: DEFAULT_LANG.to_string(),
        }
    }
}

/// A validated record of any kind
#[derive(Debug, Clone, PartialEq)]
pub enum Entity {
    BlogPost(BlogPost),
    Tip(Tip),
    Challenge(Challenge),
    EbookTest(EbookTest),
}

impl Entity {
    /// Validate untyped input as `kind`
    pub fn validate(kind: EntityKind, input: &serde_json::Value) -> Result<Self, ValidationError> {
        let fields = Validator::new().validate(input, &kind.schema())?;
        let mut reader = FieldReader(fields);

        Ok(match kind {
            EntityKind::BlogPost => Entity::BlogPost(BlogPost {
                title: reader.string("title"),
                slug: reader.string("slug"),
                excerpt: reader.opt_string("excerpt"),
                content: reader.string("content"),
                cover_image: reader.opt_string("cover_image"),
                tags: reader.strings("tags"),
                author: reader.opt_string("author"),
                published_at: reader.opt_timestamp("published_at"),
                lang: reader.string("lang"),
            }),
            EntityKind::Tip => Entity::Tip(Tip {
                title: reader.string("title"),
                description: reader.string("description"),
                category: reader.opt_string("category"),
                difficulty: reader.opt_string("difficulty"),
                tags: reader.strings("tags"),
                lang: reader.string("lang"),
            }),
            EntityKind::Challenge => Entity::Challenge(Challenge {
                title: reader.string("title"),
                description: reader.string("description"),
                duration_days: reader.int("duration_days"),
                focus: reader.opt_string("focus"),
                tags: reader.strings("tags"),
                lang: reader.string("lang"),
            }),
            EntityKind::EbookTest => Entity::EbookTest(EbookTest {
                title: reader.string("title"),
                description: reader.opt_string("description"),
                questions: reader.strings("questions"),
                recommended_reads: reader.strings("recommended_reads"),
                tags: reader.strings("tags"),
                lang: reader.string("lang"),
            }),
        })
    }

    pub fn kind(&self) -> EntityKind {
        match self {
            Entity::BlogPost(_) => EntityKind::BlogPost,
            Entity::Tip(_) => EntityKind::Tip,
            Entity::Challenge(_) => EntityKind::Challenge,
            Entity::EbookTest(_) => EntityKind::EbookTest,
        }
    }

    /// Slug of a blog post; other kinds have none
    pub fn slug(&self) -> Option<&str> {
        match self {
            Entity::BlogPost(post) => Some(&post.slug),
            _ => None,
        }
    }

    /// Convert into a document ready for insertion (no identifier yet)
    pub fn into_document(self) -> Document {
        match self {
            Entity::BlogPost(p) => Document::new()
                .with_field("title", p.title)
                .with_field("slug", p.slug)
                .with_field("excerpt", p.excerpt)
                .with_field("content", p.content)
                .with_field("cover_image", p.cover_image)
                .with_field("tags", p.tags)
                .with_field("author", p.author)
                .with_field("published_at", p.published_at)
                .with_field("lang", p.lang),
            Entity::Tip(t) => Document::new()
                .with_field("title", t.title)
                .with_field("description", t.description)
                .with_field("category", t.category)
                .with_field("difficulty", t.difficulty)
                .with_field("tags", t.tags)
                .with_field("lang", t.lang),
            Entity::Challenge(c) => Document::new()
                .with_field("title", c.title)
                .with_field("description", c.description)
                .with_field("duration_days", c.duration_days)
                .with_field("focus", c.focus)
                .with_field("tags", c.tags)
                .with_field("lang", c.lang),
            Entity::EbookTest(e) => Document::new()
                .with_field("title", e.title)
                .with_field("description", e.description)
                .with_field("questions", e.questions)
                .with_field("recommended_reads", e.recommended_reads)
                .with_field("tags", e.tags)
                .with_field("lang", e.lang),
        }
    }
}

impl From<BlogPost> for Entity {
    fn from(post: BlogPost) -> Self {
        Entity::BlogPost(post)
    }
}

impl From<Tip> for Entity {
    fn from(tip: Tip) -> Self {
        Entity::Tip(tip)
    }
}

impl From<Challenge> for Entity {
    fn from(challenge: Challenge) -> Self {
        Entity::Challenge(challenge)
    }
}

impl From<EbookTest> for Entity {
    fn from(test: EbookTest) -> Self {
        Entity::EbookTest(test)
    }
}

/// Reads typed values out of validator output.
///
/// The validator guarantees presence and type of every schema field, so
/// lookups fall back to empty values instead of failing.
struct FieldReader(BTreeMap<String, Value>);

impl FieldReader {
    fn take(&mut self, name: &str) -> Value {
        self.0.remove(name).unwrap_or(Value::Null)
    }

    fn string(&mut self, name: &str) -> String {
        self.opt_string(name).unwrap_or_default()
    }

    fn opt_string(&mut self, name: &str) -> Option<String> {
        match self.take(name) {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    fn strings(&mut self, name: &str) -> Vec<String> {
        match self.take(name) {
            Value::Array(items) => items
                .into_iter()
                .filter_map(|item| match item {
                    Value::String(s) => Some(s),
                    _ => None,
                })
                .collect(),
            _ => Vec::new(),
        }
    }

    fn int(&mut self, name: &str) -> i64 {
        self.take(name).as_i64().unwrap_or_default()
    }

    fn opt_timestamp(&mut self, name: &str) -> Option<DateTime<Utc>> {
        self.take(name).as_timestamp()
    }
}
