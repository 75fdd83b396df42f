//! Document records as supplied by the ingestion collaborator.
//!
//! The engine never walks the filesystem itself: a collaborator feeds
//! it `Result<DocumentRecord, DocumentError>` items, so unreadable
//! documents stay visible to the index builder as skippable errors
//! instead of silently vanishing.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Stable document identifier (typically a relative path or citation
/// key).
pub type DocId = String;

/// Years outside this range are treated as noise in identifiers
/// (page numbers, report ids).
const YEAR_MIN: i32 = 1990;
const YEAR_MAX: i32 = 2100;

/// A single document's ingestion view: identifier, optional creation
/// year, the raw (un-normalized) tag strings, and optional body text.
///
/// The body is only consulted for length and abstract-presence
/// signals, never for semantic analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentRecord {
    pub id: DocId,
    pub year: Option<i32>,
    pub raw_tags: Vec<String>,
    pub body: Option<String>,
}

impl DocumentRecord {
    pub fn new(id: impl Into<DocId>, raw_tags: Vec<String>) -> Self {
        DocumentRecord {
            id: id.into(),
            year: None,
            raw_tags,
            body: None,
        }
    }

    pub fn with_year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Fill `year` from the identifier when none was supplied.
    pub fn with_year_from_id(mut self) -> Self {
        if self.year.is_none() {
            self.year = year_from_identifier(&self.id);
        }
        self
    }
}

/// A document that could not be read or parsed. Non-fatal: the index
/// builder records it and continues.
#[derive(Debug, Clone, Error)]
pub enum DocumentError {
    #[error("could not read document '{id}': {reason}")]
    Unreadable { id: DocId, reason: String },

    #[error("could not parse document '{id}': {reason}")]
    Unparseable { id: DocId, reason: String },
}

impl DocumentError {
    pub fn id(&self) -> &str {
        match self {
            DocumentError::Unreadable { id, .. } | DocumentError::Unparseable { id, .. } => id,
        }
    }
}

/// Extract a creation year from a document identifier.
///
/// Identifiers in article collections usually embed the publication
/// year ("smith_2019_deep_learning.md"). The first 4-digit run inside
/// the plausible range wins; anything else yields `None`.
pub fn year_from_identifier(id: &str) -> Option<i32> {
    static YEAR_PATTERN: OnceLock<Regex> = OnceLock::new();
    let pattern = YEAR_PATTERN.get_or_init(|| Regex::new(r"\d{4}").expect("literal pattern"));
    for found in pattern.find_iter(id) {
        if let Ok(year) = found.as_str().parse::<i32>() {
            if (YEAR_MIN..=YEAR_MAX).contains(&year) {
                return Some(year);
            }
        }
    }
    None
}
