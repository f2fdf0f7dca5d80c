use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Column order of the exported tabular file.
pub const FIELD_NAMES: [&str; 11] = [
    "url",
    "title",
    "description",
    "authors",
    "publish_date",
    "text",
    "section",
    "subsection",
    "keywords",
    "characters",
    "image_url",
];

/// One extracted newspaper article.
///
/// Every field except `url` is filled opportunistically: extraction leaves a
/// field at its default when no markup variant carried it, and that is not an
/// error. A record with empty `text` is still valid and exported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleRecord {
    pub url: String,
    pub title: String,
    pub description: String,
    pub authors: String,
    pub publish_date: String,
    pub text: String,
    pub section: String,
    pub subsection: String,
    pub keywords: Vec<String>,
    pub characters: Vec<String>,
    pub image_url: String,
}

impl ArticleRecord {
    /// Creates an empty record for `url`. The URL is the one mandatory,
    /// immutable field; an empty one is rejected up front.
    pub fn new(url: impl Into<String>) -> Result<Self> {
        let url = url.into();
        if url.is_empty() {
            return Err(Error::InvalidUrl(url));
        }
        Ok(Self {
            url,
            title: String::new(),
            description: String::new(),
            authors: String::new(),
            publish_date: String::new(),
            text: String::new(),
            section: String::new(),
            subsection: String::new(),
            keywords: Vec::new(),
            characters: Vec::new(),
            image_url: String::new(),
        })
    }

    /// Flat projection in `FIELD_NAMES` order; keyword and character
    /// sequences are joined with `"; "` in encounter order.
    pub fn as_row(&self) -> [String; 11] {
        [
            self.url.clone(),
            self.title.clone(),
            self.description.clone(),
            self.authors.clone(),
            self.publish_date.clone(),
            self.text.clone(),
            self.section.clone(),
            self.subsection.clone(),
            self.keywords.join("; "),
            self.characters.join("; "),
            self.image_url.clone(),
        ]
    }
}

/// Iterator over every day in `[start, end)`, stepped by one day.
#[derive(Debug, Clone, Copy)]
pub struct DateSpan {
    current: NaiveDate,
    end: NaiveDate,
}

impl DateSpan {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            current: start,
            end,
        }
    }
}

impl Iterator for DateSpan {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<NaiveDate> {
        if self.current >= self.end {
            return None;
        }
        let date = self.current;
        self.current = self.current.succ_opt()?;
        Some(date)
    }
}
