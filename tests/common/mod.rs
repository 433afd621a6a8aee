//! Shared test fixtures
//!
//! Entity types used across the integration tests: a blog post with a
//! realistic scalar schema, a tagged article exercising list-valued fan-out,
//! a bare note, and an account with several unique indexes.

#![allow(dead_code)]

use prismdb::{
    Config, Entity, FieldDef, FieldKind, IndexDef, MemoryConnector, Meta, PositionDef, Repository,
    Schema, Value,
};
use serde::{Deserialize, Serialize};

// =============================================================================
// BlogPost
// =============================================================================

pub const ORDER_BY_DISPLAY_ORDER: &str = "DisplayOrder";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BlogPost {
    pub meta: Meta,
    pub title: String,
    pub seo_title: String,
    pub body: String,
    pub author: String,
    pub display_order: i64,
    pub published: bool,
    pub group: i64,
}

impl Entity for BlogPost {
    const TYPE_NAME: &'static str = "BlogPost";

    const SCHEMA: Schema = Schema {
        fields: &[
            FieldDef { name: "Title", kind: FieldKind::Str },
            FieldDef { name: "SeoTitle", kind: FieldKind::Str },
            FieldDef { name: "Body", kind: FieldKind::Str },
            FieldDef { name: "Author", kind: FieldKind::Str },
            FieldDef { name: "DisplayOrder", kind: FieldKind::Int },
            FieldDef { name: "Published", kind: FieldKind::Bool },
            FieldDef { name: "Group", kind: FieldKind::Int },
        ],
        positions: &[PositionDef {
            name: ORDER_BY_DISPLAY_ORDER,
            properties: &["DisplayOrder"],
        }],
        indexes: &[
            IndexDef {
                name: "SeoTitle_UX",
                unique: true,
                properties: &["SeoTitle"],
            },
            IndexDef {
                name: "Published_IX",
                unique: false,
                properties: &["Published"],
            },
            IndexDef {
                name: "Published-Group_IX",
                unique: false,
                properties: &["Group", "Published"],
            },
        ],
    };

    fn meta(&self) -> &Meta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut Meta {
        &mut self.meta
    }

    fn attribute(&self, name: &str) -> Value {
        match name {
            "Title" => Value::from(self.title.as_str()),
            "SeoTitle" => Value::from(self.seo_title.as_str()),
            "Body" => Value::from(self.body.as_str()),
            "Author" => Value::from(self.author.as_str()),
            "DisplayOrder" => Value::from(self.display_order),
            "Published" => Value::from(self.published),
            "Group" => Value::from(self.group),
            _ => Value::Null,
        }
    }
}

/// The i-th entity of the standard 100-post scenario
pub fn post(i: i64) -> BlogPost {
    BlogPost {
        meta: Meta::default(),
        title: format!("Blog {i}"),
        seo_title: format!("blog-number-{i}"),
        body: "body sample".to_string(),
        author: "Miki the black cat".to_string(),
        display_order: i,
        published: i % 2 == 1,
        group: i % 20,
    }
}

pub fn post_repository() -> (MemoryConnector, Repository<BlogPost>) {
    let connector = MemoryConnector::new();
    let repository = Repository::open(&connector, Config::default()).unwrap();
    (connector, repository)
}

/// Populate the standard scenario and return the created entities
pub fn seed_posts(repository: &Repository<BlogPost>, count: i64) -> Vec<BlogPost> {
    (0..count).map(|i| repository.create(post(i)).unwrap()).collect()
}

// =============================================================================
// TaggedArticle (list-valued attributes)
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaggedArticle {
    pub meta: Meta,
    pub category: String,
    pub tags: Vec<String>,
    pub regions: Vec<String>,
}

impl Entity for TaggedArticle {
    const TYPE_NAME: &'static str = "TaggedArticle";

    const SCHEMA: Schema = Schema {
        fields: &[
            FieldDef { name: "Category", kind: FieldKind::Str },
            FieldDef { name: "Tags", kind: FieldKind::List },
            FieldDef { name: "Regions", kind: FieldKind::List },
        ],
        positions: &[],
        indexes: &[
            IndexDef {
                name: "Category-Tags_IX",
                unique: false,
                properties: &["Category", "Tags"],
            },
            IndexDef {
                name: "Tags-Regions_IX",
                unique: false,
                properties: &["Tags", "Regions"],
            },
        ],
    };

    fn meta(&self) -> &Meta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut Meta {
        &mut self.meta
    }

    fn attribute(&self, name: &str) -> Value {
        match name {
            "Category" => Value::from(self.category.as_str()),
            "Tags" => Value::from(&self.tags),
            "Regions" => Value::from(&self.regions),
            _ => Value::Null,
        }
    }
}

pub fn article(category: &str, tags: &[&str], regions: &[&str]) -> TaggedArticle {
    TaggedArticle {
        meta: Meta::default(),
        category: category.to_string(),
        tags: tags.iter().map(|s| s.to_string()).collect(),
        regions: regions.iter().map(|s| s.to_string()).collect(),
    }
}

// =============================================================================
// Note (no declared indexes)
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub meta: Meta,
    pub text: String,
}

impl Entity for Note {
    const TYPE_NAME: &'static str = "Note";

    const SCHEMA: Schema = Schema::EMPTY;

    fn meta(&self) -> &Meta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut Meta {
        &mut self.meta
    }

    fn attribute(&self, _name: &str) -> Value {
        Value::Null
    }
}

// =============================================================================
// Account (two unique indexes)
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub meta: Meta,
    pub email: String,
    pub username: String,
    pub nickname: Option<String>,
}

impl Entity for Account {
    const TYPE_NAME: &'static str = "Account";

    const SCHEMA: Schema = Schema {
        fields: &[
            FieldDef { name: "Email", kind: FieldKind::Str },
            FieldDef { name: "Username", kind: FieldKind::Str },
            FieldDef { name: "Nickname", kind: FieldKind::Str },
        ],
        positions: &[],
        indexes: &[
            IndexDef {
                name: "Email_UX",
                unique: true,
                properties: &["Email"],
            },
            IndexDef {
                name: "Username_UX",
                unique: true,
                properties: &["Username"],
            },
            IndexDef {
                name: "Nickname_UX",
                unique: true,
                properties: &["Nickname"],
            },
        ],
    };

    fn meta(&self) -> &Meta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut Meta {
        &mut self.meta
    }

    fn attribute(&self, name: &str) -> Value {
        match name {
            "Email" => Value::from(self.email.as_str()),
            "Username" => Value::from(self.username.as_str()),
            "Nickname" => Value::from(self.nickname.clone()),
            _ => Value::Null,
        }
    }
}

pub fn account(id: &str, email: &str, username: &str) -> Account {
    Account {
        meta: Meta {
            id: id.to_string(),
            created_on: 1_000_000,
            ..Meta::default()
        },
        email: email.to_string(),
        username: username.to_string(),
        nickname: None,
    }
}
