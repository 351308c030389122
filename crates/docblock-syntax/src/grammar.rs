//! Tag grammar table — the closed vocabulary of recognized doc tags.
//!
//! Every tag belongs to exactly one [`Category`], and the category decides
//! which fields the line classifier extracts from a tagged line.

use serde::{Serialize, Serializer};
use std::fmt;

/// Shape of the payload carried by a tagged line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    /// Block delimiters, no payload.
    Block,
    /// Presence-only flags.
    Flag,
    /// `@tag name`
    Label,
    /// `@tag free text...`
    Description,
    /// `@tag {type} name`
    Value,
    /// `@tag {type} free text...`
    UnnamedValueDesc,
    /// `@tag {type} name free text...`
    NamedValueDesc,
    /// `@tag` followed by multi-line text, line breaks preserved.
    Text,
}

/// A recognized tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Tag {
    Start,
    End,
    Ignore,
    Private,
    Constructor,
    Module,
    Namespace,
    Class,
    Method,
    MemberOf,
    MethodOf,
    Requires,
    Override,
    Type,
    Todo,
    Var,
    Returns,
    Param,
    Property,
    Example,
}

/// Tags that name a block, in priority order.
pub const IDENTIFIER_TAGS: [Tag; 5] = [Tag::Module, Tag::Namespace, Tag::Class, Tag::Method, Tag::Var];

/// Tags that name a block's structural parent, in priority order.
pub const PARENT_TAGS: [Tag; 2] = [Tag::MemberOf, Tag::MethodOf];

impl Tag {
    /// All tags in matching order.
    pub const ALL: [Tag; 20] = [
        Tag::Start,
        Tag::End,
        Tag::Ignore,
        Tag::Private,
        Tag::Constructor,
        Tag::Module,
        Tag::Namespace,
        Tag::Class,
        Tag::Method,
        Tag::MemberOf,
        Tag::MethodOf,
        Tag::Requires,
        Tag::Override,
        Tag::Type,
        Tag::Todo,
        Tag::Var,
        Tag::Returns,
        Tag::Param,
        Tag::Property,
        Tag::Example,
    ];

    pub fn category(self) -> Category {
        match self {
            Tag::Start | Tag::End => Category::Block,
            Tag::Ignore | Tag::Private | Tag::Constructor => Category::Flag,
            Tag::Module
            | Tag::Namespace
            | Tag::Class
            | Tag::Method
            | Tag::MemberOf
            | Tag::MethodOf
            | Tag::Requires
            | Tag::Override
            | Tag::Type => Category::Label,
            Tag::Todo => Category::Description,
            Tag::Var => Category::Value,
            Tag::Returns => Category::UnnamedValueDesc,
            Tag::Param | Tag::Property => Category::NamedValueDesc,
            Tag::Example => Category::Text,
        }
    }

    /// Literal prefix that introduces the tag in source text.
    pub fn prefix(self) -> &'static str {
        match self {
            Tag::Start => "/**",
            Tag::End => "*/",
            Tag::Ignore => "@ignore",
            Tag::Private => "@private",
            Tag::Constructor => "@constructor",
            Tag::Module => "@module",
            Tag::Namespace => "@namespace",
            Tag::Class => "@class",
            Tag::Method => "@method",
            Tag::MemberOf => "@memberOf",
            Tag::MethodOf => "@methodOf",
            Tag::Requires => "@requires",
            Tag::Override => "@override",
            Tag::Type => "@type",
            Tag::Todo => "@todo",
            Tag::Var => "@var",
            Tag::Returns => "@returns",
            Tag::Param => "@param",
            Tag::Property => "@property",
            Tag::Example => "@example",
        }
    }

    /// Tag name as used by the field accessor and in serialized output.
    pub fn name(self) -> &'static str {
        match self {
            Tag::Start => "START",
            Tag::End => "END",
            other => &other.prefix()[1..],
        }
    }

    pub fn from_name(name: &str) -> Option<Tag> {
        Tag::ALL.into_iter().find(|t| t.name() == name)
    }

    /// Find the first tag whose prefix introduces `line`.
    ///
    /// Block delimiters match as plain prefixes. `@` tags must be followed by
    /// whitespace or the end of the line, so `@methodOf` never reads as `@method`.
    pub fn match_prefix(line: &str) -> Option<Tag> {
        Tag::ALL.into_iter().find(|tag| {
            let Some(rest) = line.strip_prefix(tag.prefix()) else {
                return false;
            };
            tag.category() == Category::Block || rest.is_empty() || rest.starts_with(char::is_whitespace)
        })
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for Tag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}
