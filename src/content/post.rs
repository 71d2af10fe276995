//! Post and content block models

use serde::Serialize;

/// A published article
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    /// Record identifier, always present
    pub id: String,

    /// Post title
    pub title: Option<String>,

    /// URL slug as written in the database
    pub slug: Option<String>,

    /// Creation time, ISO-8601 as returned by the API
    pub created_ts: Option<String>,

    /// Last edit time, ISO-8601 as returned by the API
    pub last_edited_ts: Option<String>,

    /// Body content in document order
    pub contents: Vec<ContentBlock>,
}

impl Post {
    /// A post carrying only its identifier
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: None,
            slug: None,
            created_ts: None,
            last_edited_ts: None,
            contents: Vec::new(),
        }
    }
}

/// One renderable unit of body content
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum ContentBlock {
    #[serde(rename = "paragraph")]
    Paragraph { text: Option<String> },
    #[serde(rename = "quote")]
    Quote { text: Option<String> },
    #[serde(rename = "heading_2")]
    Heading2 { text: Option<String> },
    #[serde(rename = "heading_3")]
    Heading3 { text: Option<String> },
    #[serde(rename = "code")]
    Code {
        text: Option<String>,
        language: Option<String>,
    },
}

impl ContentBlock {
    /// Text of the block, if any
    pub fn text(&self) -> Option<&str> {
        match self {
            ContentBlock::Paragraph { text }
            | ContentBlock::Quote { text }
            | ContentBlock::Heading2 { text }
            | ContentBlock::Heading3 { text }
            | ContentBlock::Code { text, .. } => text.as_deref(),
        }
    }
}
