//! Type annotations: `{string=}`, `{?number|string}`, `{!(Array|Object)}`.

use serde::Serialize;
use std::fmt;

/// Modifier attached to a type annotation. The three are mutually exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TypeOption {
    /// Trailing `=`
    Optional,
    /// Leading `?`
    Nullable,
    /// Leading `!`
    NonNullable,
}

impl TypeOption {
    pub fn label(self) -> &'static str {
        match self {
            TypeOption::Optional => "optional",
            TypeOption::Nullable => "nullable",
            TypeOption::NonNullable => "non nullable",
        }
    }
}

/// A parsed `{...}` annotation: union members plus at most one modifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeExpr {
    pub types: Vec<String>,
    pub options: Vec<TypeOption>,
}

impl TypeExpr {
    /// Parse the content of a type token.
    ///
    /// Modifiers are tested in the order optional, nullable, non-nullable and
    /// the first match wins. One layer of enclosing parentheses is removed
    /// before the union is split on `|`.
    pub fn parse(text: &str) -> TypeExpr {
        let inner = text.strip_prefix('{').unwrap_or(text);
        let inner = inner.strip_suffix('}').unwrap_or(inner);

        let (inner, option) = if let Some(rest) = inner.strip_suffix('=') {
            (rest.trim_end_matches('='), Some(TypeOption::Optional))
        } else if let Some(rest) = inner.strip_prefix('?') {
            (rest.trim_start_matches('?'), Some(TypeOption::Nullable))
        } else if let Some(rest) = inner.strip_prefix('!') {
            (rest.trim_start_matches('!'), Some(TypeOption::NonNullable))
        } else {
            (inner, None)
        };

        let inner = inner
            .strip_prefix('(')
            .and_then(|s| s.strip_suffix(')'))
            .unwrap_or(inner);

        TypeExpr {
            types: inner.split('|').map(str::to_string).collect(),
            options: option.into_iter().collect(),
        }
    }

    pub fn has(&self, option: TypeOption) -> bool {
        self.options.contains(&option)
    }

    pub fn is_optional(&self) -> bool {
        self.has(TypeOption::Optional)
    }
}

impl fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        if self.has(TypeOption::Nullable) {
            f.write_str("?")?;
        } else if self.has(TypeOption::NonNullable) {
            f.write_str("!")?;
        }
        f.write_str(&self.types.join("|"))?;
        if self.has(TypeOption::Optional) {
            f.write_str("=")?;
        }
        f.write_str("}")
    }
}
