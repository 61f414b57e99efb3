//! arXiv Atom feed parsing.
//!
//! Only the first `<entry>` of the feed is read. Namespace prefixes are
//! ignored; `arxiv:` extension elements are skipped.

use quick_xml::events::Event;
use quick_xml::Reader;
use shared_types::{Author, DocumentId, DocumentMetadata};

use crate::domain::FetchError;

/// Raw fields of an Atom entry.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AtomEntry {
    /// Entry id (the abstract page URL).
    pub id: String,
    /// Last update timestamp.
    pub updated: String,
    /// Publication timestamp.
    pub published: String,
    /// Title.
    pub title: String,
    /// Abstract.
    pub summary: String,
    /// Author names in feed order.
    pub authors: Vec<String>,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Field {
    Id,
    Updated,
    Published,
    Title,
    Summary,
    AuthorName,
}

/// Parse the first entry of an Atom feed. `Ok(None)` when the feed has none.
pub fn parse_first_entry(xml: &str) -> Result<Option<AtomEntry>, FetchError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut entry: Option<AtomEntry> = None;
    let mut in_author = false;
    let mut field: Option<Field> = None;
    let mut author_name = String::new();

    loop {
        let event = reader.read_event().map_err(|e| {
            FetchError::Parse(format!("at byte {}: {e}", reader.buffer_position()))
        })?;

        match event {
            Event::Start(e) => {
                let local = e.local_name();
                let name = local.as_ref();
                if name == b"entry" {
                    entry = Some(AtomEntry::default());
                    continue;
                }
                // arXiv extension elements reuse Atom names (e.g. arxiv:comment)
                if entry.is_none() || e.name().prefix().is_some_and(|p| p.as_ref() == b"arxiv") {
                    continue;
                }
                field = match name {
                    b"id" if !in_author => Some(Field::Id),
                    b"updated" => Some(Field::Updated),
                    b"published" => Some(Field::Published),
                    b"title" => Some(Field::Title),
                    b"summary" => Some(Field::Summary),
                    b"author" => {
                        in_author = true;
                        author_name.clear();
                        None
                    }
                    b"name" if in_author => Some(Field::AuthorName),
                    _ => None,
                };
            }
            Event::Text(t) => {
                let text = t
                    .unescape()
                    .map_err(|e| FetchError::Parse(e.to_string()))?;
                append(&mut entry, field, &mut author_name, &text);
            }
            Event::CData(c) => {
                let text = String::from_utf8_lossy(&c.into_inner()).into_owned();
                append(&mut entry, field, &mut author_name, &text);
            }
            Event::End(e) => {
                let local = e.local_name();
                match local.as_ref() {
                    b"entry" if entry.is_some() => break,
                    b"author" if in_author => {
                        in_author = false;
                        if let Some(entry) = entry.as_mut() {
                            let name = collapse_whitespace(&author_name);
                            if !name.is_empty() {
                                entry.authors.push(name);
                            }
                        }
                    }
                    _ => {}
                }
                field = None;
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(entry)
}

fn append(entry: &mut Option<AtomEntry>, field: Option<Field>, author: &mut String, text: &str) {
    let (Some(entry), Some(field)) = (entry.as_mut(), field) else {
        return;
    };
    let target = match field {
        Field::Id => &mut entry.id,
        Field::Updated => &mut entry.updated,
        Field::Published => &mut entry.published,
        Field::Title => &mut entry.title,
        Field::Summary => &mut entry.summary,
        Field::AuthorName => author,
    };
    target.push_str(text);
}

/// Collapse runs of whitespace (including newlines) to single spaces.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

impl AtomEntry {
    /// Convert into document metadata. The content link is the entry id with
    /// the abstract path replaced by the PDF path.
    pub fn into_metadata(self, document_id: &DocumentId) -> Result<DocumentMetadata, FetchError> {
        let id = self.id.trim();
        // arXiv reports unknown or malformed ids as an entry pointing at its
        // error documentation
        if id.is_empty() || id.contains("/api/errors") {
            return Err(FetchError::NotFound(document_id.clone()));
        }
        let title = collapse_whitespace(&self.title);
        if title.is_empty() {
            return Err(FetchError::NotFound(document_id.clone()));
        }

        Ok(DocumentMetadata {
            authors: self.authors.into_iter().map(Author::new).collect(),
            title,
            summary: collapse_whitespace(&self.summary),
            published: self.published.trim().to_string(),
            updated: self.updated.trim().to_string(),
            content_link: id.replacen("/abs/", "/pdf/", 1),
        })
    }
}
