//! Line classifier — turns one raw source line into a [`Line`].
//!
//! A line is cleaned (trimmed, inner whitespace collapsed, a leading `"* "`
//! continuation marker removed) and matched against the tag grammar. Tagged
//! lines are split on single spaces and their fields are picked by position
//! after the tag token.

use crate::error::{DocError, Result};
use crate::grammar::{Category, Tag};
use crate::types::TypeExpr;
use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

static RE_WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// One classified documentation line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Line {
    Start,
    End,
    Flag {
        tag: Tag,
    },
    Label {
        tag: Tag,
        name: String,
    },
    Description {
        tag: Tag,
        desc: String,
    },
    Value {
        tag: Tag,
        #[serde(rename = "type")]
        ty: TypeExpr,
        name: String,
    },
    UnnamedValueDesc {
        tag: Tag,
        #[serde(rename = "type")]
        ty: TypeExpr,
        desc: String,
    },
    NamedValueDesc {
        tag: Tag,
        #[serde(rename = "type")]
        ty: TypeExpr,
        name: String,
        desc: String,
    },
    Text {
        tag: Tag,
        #[serde(skip_serializing_if = "Option::is_none")]
        desc: Option<String>,
    },
    /// Untagged `*`-prefixed line inside a block.
    Raw {
        desc: String,
    },
}

impl Line {
    /// Tag of the line, `None` for raw free text.
    pub fn tag(&self) -> Option<Tag> {
        match self {
            Line::Start => Some(Tag::Start),
            Line::End => Some(Tag::End),
            Line::Flag { tag }
            | Line::Label { tag, .. }
            | Line::Description { tag, .. }
            | Line::Value { tag, .. }
            | Line::UnnamedValueDesc { tag, .. }
            | Line::NamedValueDesc { tag, .. }
            | Line::Text { tag, .. } => Some(*tag),
            Line::Raw { .. } => None,
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            Line::Label { name, .. } | Line::Value { name, .. } | Line::NamedValueDesc { name, .. } => {
                Some(name)
            }
            _ => None,
        }
    }

    pub fn desc(&self) -> Option<&str> {
        match self {
            Line::Description { desc, .. }
            | Line::UnnamedValueDesc { desc, .. }
            | Line::NamedValueDesc { desc, .. }
            | Line::Raw { desc } => Some(desc),
            Line::Text { desc, .. } => desc.as_deref(),
            _ => None,
        }
    }

    pub fn ty(&self) -> Option<&TypeExpr> {
        match self {
            Line::Value { ty, .. } | Line::UnnamedValueDesc { ty, .. } | Line::NamedValueDesc { ty, .. } => {
                Some(ty)
            }
            _ => None,
        }
    }
}

/// Classify a raw line. `file` and `line_no` only feed error messages.
///
/// Returns `Ok(None)` for lines that are not documentation at all.
pub fn classify(raw: &str, file: &str, line_no: usize) -> Result<Option<Line>> {
    let cleaned = RE_WHITESPACE.replace_all(raw.trim(), " ");
    let cleaned: &str = &cleaned;
    let stripped = cleaned.strip_prefix("* ").unwrap_or(cleaned);

    let Some(tag) = Tag::match_prefix(stripped) else {
        if cleaned.starts_with('*') {
            let desc = cleaned.trim_start_matches(['*', ' ']).to_string();
            return Ok(Some(Line::Raw { desc }));
        }
        return Ok(None);
    };

    let fields = Fields {
        tokens: stripped.split(' ').collect(),
        tag,
        file,
        line_no,
    };
    fields.extract().map(Some)
}

/// Whether a raw line opens a block. Nothing else on the line is extracted,
/// so tag lines outside a block never fail.
pub fn is_block_start(raw: &str) -> bool {
    let cleaned = RE_WHITESPACE.replace_all(raw.trim(), " ");
    let cleaned: &str = &cleaned;
    let stripped = cleaned.strip_prefix("* ").unwrap_or(cleaned);
    Tag::match_prefix(stripped) == Some(Tag::Start)
}

/// Tokens of a tagged line, tag token at position 0.
struct Fields<'a> {
    tokens: Vec<&'a str>,
    tag: Tag,
    file: &'a str,
    line_no: usize,
}

impl Fields<'_> {
    fn extract(&self) -> Result<Line> {
        let tag = self.tag;
        let line = match tag.category() {
            Category::Block => match tag {
                Tag::Start => Line::Start,
                _ => Line::End,
            },
            Category::Flag => Line::Flag { tag },
            Category::Label => Line::Label {
                tag,
                name: self.token(1)?,
            },
            Category::Description => Line::Description {
                tag,
                desc: self.rest(1),
            },
            Category::Value => Line::Value {
                tag,
                ty: TypeExpr::parse(&self.token(1)?),
                name: self.token(2)?,
            },
            Category::UnnamedValueDesc => Line::UnnamedValueDesc {
                tag,
                ty: TypeExpr::parse(&self.token(1)?),
                desc: self.rest(2),
            },
            Category::NamedValueDesc => Line::NamedValueDesc {
                tag,
                ty: TypeExpr::parse(&self.token(1)?),
                name: self.token(2)?,
                desc: self.rest(3),
            },
            Category::Text => {
                let rest = self.rest(1);
                Line::Text {
                    tag,
                    desc: (!rest.is_empty()).then_some(rest),
                }
            }
        };
        Ok(line)
    }

    fn token(&self, index: usize) -> Result<String> {
        self.tokens
            .get(index)
            .filter(|t| !t.is_empty())
            .map(|t| t.to_string())
            .ok_or_else(|| DocError::MissingTagContent {
                tag: self.tag,
                file: self.file.to_string(),
                line: self.line_no,
            })
    }

    fn rest(&self, index: usize) -> String {
        self.tokens.get(index..).map(|t| t.join(" ")).unwrap_or_default()
    }
}
