//! Source domain model
//!
//! A `Source` is one bibliography record (book, article, website, ...).
//! Two equivalences are used throughout the crate:
//!
//! - identity (`same_identity`): title, author and detail. Used for
//!   duplicate detection.
//! - full (`PartialEq`): every content field. Used for exact removal and
//!   for comparing snapshots. The `pinned` flag is presentation state and
//!   takes part in neither.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::list::Entry;

/// The closed set of bibliography fields every source carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum BibField {
    Journal,
    Publisher,
    City,
    Volume,
    Pages,
    Year,
}

impl BibField {
    /// All fields, in display order.
    pub const ALL: [BibField; 6] = [
        BibField::Journal,
        BibField::Publisher,
        BibField::City,
        BibField::Volume,
        BibField::Pages,
        BibField::Year,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            BibField::Journal => "Journal",
            BibField::Publisher => "Publisher",
            BibField::City => "City",
            BibField::Volume => "Volume",
            BibField::Pages => "Pages",
            BibField::Year => "Year",
        }
    }
}

impl fmt::Display for BibField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when a field name is not one of [`BibField::ALL`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown bibliography field: {0}")]
pub struct UnknownBibField(pub String);

impl FromStr for BibField {
    type Err = UnknownBibField;

    /// Parse a field name (case-insensitive)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        BibField::ALL
            .into_iter()
            .find(|field| field.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownBibField(wanted.to_string()))
    }
}

/// A bibliography source record
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Source {
    pub title: String,
    pub source_type: String,
    pub author: String,
    #[serde(default)]
    pub detail: String,
    #[serde(default)]
    pub tags: BTreeSet<String>,
    #[serde(default = "empty_bib_fields")]
    bib_fields: BTreeMap<BibField, String>,
    #[serde(default)]
    pub pinned: bool,
}

fn empty_bib_fields() -> BTreeMap<BibField, String> {
    BibField::ALL
        .into_iter()
        .map(|field| (field, String::new()))
        .collect()
}

impl Source {
    /// Create a new source with empty detail, no tags and blank bibliography fields
    pub fn new(
        title: impl Into<String>,
        source_type: impl Into<String>,
        author: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            source_type: source_type.into(),
            author: author.into(),
            detail: String::new(),
            tags: BTreeSet::new(),
            bib_fields: empty_bib_fields(),
            pinned: false,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = detail.into();
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Return a copy with one bibliography field replaced.
    pub fn with_bib_field(mut self, field: BibField, value: impl Into<String>) -> Self {
        self.bib_fields.insert(field, value.into());
        self
    }

    /// Value of a bibliography field (empty when unset)
    pub fn bib_field(&self, field: BibField) -> &str {
        self.bib_fields.get(&field).map(String::as_str).unwrap_or("")
    }

    pub fn bib_fields(&self) -> impl Iterator<Item = (BibField, &str)> {
        BibField::ALL
            .into_iter()
            .map(move |field| (field, self.bib_field(field)))
    }

    /// Identity equivalence: same title, author and detail.
    pub fn same_identity(&self, other: &Source) -> bool {
        self.title == other.title && self.author == other.author && self.detail == other.detail
    }

    /// Case-insensitive keyword match used by `find`.
    pub fn matches_keyword(&self, keyword: &str) -> bool {
        let keyword = keyword.to_lowercase();
        [&self.title, &self.author, &self.source_type, &self.detail]
            .iter()
            .any(|text| text.to_lowercase().contains(&keyword))
            || self
                .tags
                .iter()
                .any(|tag| tag.to_lowercase().contains(&keyword))
    }
}

impl PartialEq for Source {
    fn eq(&self, other: &Self) -> bool {
        self.same_identity(other)
            && self.source_type == other.source_type
            && self.tags == other.tags
            && BibField::ALL
                .iter()
                .all(|f| self.bib_field(*f) == other.bib_field(*f))
    }
}

impl Eq for Source {}

impl Entry for Source {
    fn same_identity(&self, other: &Self) -> bool {
        Source::same_identity(self, other)
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}) by {}", self.title, self.source_type, self.author)?;
        if !self.detail.is_empty() {
            write!(f, "; {}", self.detail)?;
        }
        if !self.tags.is_empty() {
            let tags: Vec<&str> = self.tags.iter().map(String::as_str).collect();
            write!(f, " [{}]", tags.join(", "))?;
        }
        Ok(())
    }
}
