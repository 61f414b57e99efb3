//! # Document Tag Schema
//!
//! Versioned key/value annotations attached to every document transaction.
//! They embed enough of the Document Record to verify a transaction without
//! the index store.
//!
//! ## Schema v1
//!
//! | Order | Name | Value |
//! |-------|------|-------|
//! | 1 | `App-Name` | `Arxweave` |
//! | 2 | `Schema-Version` | `1` |
//! | 3 | `Encode` | payload transport encoding (`base64`) |
//! | 4 | `Content-Type` | media type of the decoded payload |
//! | 5 | `arXivID` | document id |
//! | 6 | `authors` | JSON array of `{"name": ..}` |
//! | 7 | `updated` | last update timestamp |
//! | 8 | `published` | publication timestamp |
//! | 9 | `title` | title |
//! | 10 | `summary` | abstract |
//! | 11 | `pdfLink` | content link |

use serde::{Deserialize, Serialize};
use shared_types::{Author, DocumentId, DocumentMetadata};
use std::fmt;
use std::str::FromStr;

use super::errors::LedgerError;

/// Value of the `App-Name` tag.
pub const APP_NAME: &str = "Arxweave";

/// Current tag schema version.
pub const TAG_SCHEMA_VERSION: &str = "1";

/// Payload encoding of documents fetched from the archive.
pub const BASE64_ENCODING: &str = "base64";

/// Media type of archive documents.
pub const PDF_CONTENT_TYPE: &str = "application/pdf";

/// A single transaction tag.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    /// Tag name.
    pub name: String,
    /// Tag value.
    pub value: String,
}

impl Tag {
    /// Create a tag.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Tag names defined by schema v1.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TagName {
    /// `App-Name`
    AppName,
    /// `Schema-Version`
    SchemaVersion,
    /// `Encode`
    Encode,
    /// `Content-Type`
    ContentType,
    /// `arXivID`
    DocumentId,
    /// `authors`
    Authors,
    /// `updated`
    Updated,
    /// `published`
    Published,
    /// `title`
    Title,
    /// `summary`
    Summary,
    /// `pdfLink`
    ContentLink,
}

impl TagName {
    /// All names in emission order.
    pub const ALL: [TagName; 11] = [
        TagName::AppName,
        TagName::SchemaVersion,
        TagName::Encode,
        TagName::ContentType,
        TagName::DocumentId,
        TagName::Authors,
        TagName::Updated,
        TagName::Published,
        TagName::Title,
        TagName::Summary,
        TagName::ContentLink,
    ];

    /// Wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            TagName::AppName => "App-Name",
            TagName::SchemaVersion => "Schema-Version",
            TagName::Encode => "Encode",
            TagName::ContentType => "Content-Type",
            TagName::DocumentId => "arXivID",
            TagName::Authors => "authors",
            TagName::Updated => "updated",
            TagName::Published => "published",
            TagName::Title => "title",
            TagName::Summary => "summary",
            TagName::ContentLink => "pdfLink",
        }
    }
}

impl fmt::Display for TagName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TagName {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TagName::ALL
            .iter()
            .copied()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| LedgerError::InvalidTag(format!("unknown tag name '{s}'")))
    }
}

/// Typed view over the schema v1 tags of a document transaction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DocumentTags {
    /// Document id.
    pub document_id: DocumentId,
    /// Bibliographic metadata.
    pub metadata: DocumentMetadata,
    /// Payload transport encoding.
    pub encoding: String,
    /// Media type of the decoded payload.
    pub content_type: String,
}

impl DocumentTags {
    /// Tags for a base64-encoded PDF document.
    pub fn from_metadata(document_id: &DocumentId, metadata: &DocumentMetadata) -> Self {
        Self {
            document_id: document_id.clone(),
            metadata: metadata.clone(),
            encoding: BASE64_ENCODING.to_string(),
            content_type: PDF_CONTENT_TYPE.to_string(),
        }
    }

    /// Override the payload encoding and media type.
    pub fn with_content(mut self, encoding: &str, content_type: &str) -> Self {
        self.encoding = encoding.to_string();
        self.content_type = content_type.to_string();
        self
    }

    fn value(&self, name: TagName) -> String {
        match name {
            TagName::AppName => APP_NAME.to_string(),
            TagName::SchemaVersion => TAG_SCHEMA_VERSION.to_string(),
            TagName::Encode => self.encoding.clone(),
            TagName::ContentType => self.content_type.clone(),
            TagName::DocumentId => self.document_id.to_string(),
            TagName::Authors => self.metadata.authors_json(),
            TagName::Updated => self.metadata.updated.clone(),
            TagName::Published => self.metadata.published.clone(),
            TagName::Title => self.metadata.title.clone(),
            TagName::Summary => self.metadata.summary.clone(),
            TagName::ContentLink => self.metadata.content_link.clone(),
        }
    }

    /// Render the tags in schema order.
    pub fn to_tags(&self) -> Vec<Tag> {
        TagName::ALL
            .iter()
            .map(|name| Tag::new(name.as_str(), self.value(*name)))
            .collect()
    }

    /// Read schema v1 tags back. Unknown names are ignored; every schema name
    /// must be present exactly once.
    pub fn parse(tags: &[Tag]) -> Result<Self, LedgerError> {
        let lookup = |name: TagName| single_value(tags, name);

        let version = lookup(TagName::SchemaVersion)?;
        if version != TAG_SCHEMA_VERSION {
            return Err(LedgerError::UnsupportedSchema(version.to_string()));
        }
        let app = lookup(TagName::AppName)?;
        if app != APP_NAME {
            return Err(LedgerError::InvalidTag(format!("foreign App-Name '{app}'")));
        }

        let document_id = DocumentId::parse(lookup(TagName::DocumentId)?)
            .map_err(|e| LedgerError::InvalidTag(e.to_string()))?;
        let authors: Vec<Author> = serde_json::from_str(lookup(TagName::Authors)?)
            .map_err(|e| LedgerError::InvalidTag(format!("authors: {e}")))?;

        Ok(Self {
            document_id,
            metadata: DocumentMetadata {
                authors,
                title: lookup(TagName::Title)?.to_string(),
                summary: lookup(TagName::Summary)?.to_string(),
                published: lookup(TagName::Published)?.to_string(),
                updated: lookup(TagName::Updated)?.to_string(),
                content_link: lookup(TagName::ContentLink)?.to_string(),
            },
            encoding: lookup(TagName::Encode)?.to_string(),
            content_type: lookup(TagName::ContentType)?.to_string(),
        })
    }
}

fn single_value(tags: &[Tag], name: TagName) -> Result<&str, LedgerError> {
    let mut matches = tags.iter().filter(|t| t.name == name.as_str());
    let first = matches
        .next()
        .ok_or_else(|| LedgerError::InvalidTag(format!("missing tag '{name}'")))?;
    if matches.next().is_some() {
        return Err(LedgerError::InvalidTag(format!("duplicate tag '{name}'")));
    }
    Ok(first.value.as_str())
}
