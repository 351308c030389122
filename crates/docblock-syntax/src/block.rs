//! Documentation blocks: accumulation of classified lines and the read-only
//! queries (identity, path, field projection) made on a closed block.

use crate::error::{DocError, Result};
use crate::grammar::{Category, Tag, IDENTIFIER_TAGS, PARENT_TAGS};
use crate::line::Line;
use crate::types::TypeExpr;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// One occurrence of a tag: the tag line followed by any free-text lines
/// attached to it.
pub type Entry = Vec<Line>;

/// Structural kind of a block, decided by its identifier tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockKind {
    Module,
    Namespace,
    Class,
    Method,
    Var,
}

impl BlockKind {
    fn from_tag(tag: Tag) -> Option<BlockKind> {
        match tag {
            Tag::Module => Some(BlockKind::Module),
            Tag::Namespace => Some(BlockKind::Namespace),
            Tag::Class => Some(BlockKind::Class),
            Tag::Method => Some(BlockKind::Method),
            Tag::Var => Some(BlockKind::Var),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BlockKind::Module => "module",
            BlockKind::Namespace => "namespace",
            BlockKind::Class => "class",
            BlockKind::Method => "method",
            BlockKind::Var => "var",
        }
    }
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A closed documentation block.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Block {
    file: String,
    line: usize,
    desc: Entry,
    tags: BTreeMap<Tag, Vec<Entry>>,
}

/// `@returns`-style projection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypedDesc<'a> {
    #[serde(rename = "type")]
    pub ty: &'a TypeExpr,
    pub desc: String,
}

/// `@param`-style projection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NamedTypedDesc<'a> {
    pub name: &'a str,
    #[serde(rename = "type")]
    pub ty: &'a TypeExpr,
    pub desc: String,
}

/// Result of the category-aware field accessor [`Block::get`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Field<'a> {
    /// Flag presence.
    Flag(bool),
    /// The block's own description, fragments joined by spaces.
    Description(String),
    /// Label and value entries, as accumulated.
    Entries(&'a [Entry]),
    /// Description-category entries, one space-joined string each.
    Notes(Vec<String>),
    Typed(Vec<TypedDesc<'a>>),
    Named(Vec<NamedTypedDesc<'a>>),
    /// Text-category entries, fragments joined by newlines.
    Text(Vec<String>),
}

impl Block {
    pub fn new(file: impl Into<String>, line: usize) -> Block {
        Block {
            file: file.into(),
            line,
            desc: Vec::new(),
            tags: BTreeMap::new(),
        }
    }

    /// File the block was read from.
    pub fn file(&self) -> &str {
        &self.file
    }

    /// 1-based line of the block's start delimiter.
    pub fn line(&self) -> usize {
        self.line
    }

    pub fn entries(&self, tag: Tag) -> &[Entry] {
        self.tags.get(&tag).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn has(&self, tag: Tag) -> bool {
        self.tags.contains_key(&tag)
    }

    /// `@private` or `@ignore` blocks are left out of rendered output.
    pub fn is_hidden(&self) -> bool {
        self.has(Tag::Private) || self.has(Tag::Ignore)
    }

    fn identifier(&self) -> Result<(Tag, BlockKind)> {
        IDENTIFIER_TAGS
            .into_iter()
            .filter(|tag| self.has(*tag))
            .find_map(|tag| Some((tag, BlockKind::from_tag(tag)?)))
            .ok_or_else(|| DocError::MissingIdentifier {
                file: self.file.clone(),
                line: self.line,
            })
    }

    pub fn kind(&self) -> Result<BlockKind> {
        self.identifier().map(|(_, kind)| kind)
    }

    /// Name given by the identifier tag.
    pub fn id(&self) -> Result<&str> {
        let (tag, _) = self.identifier()?;
        Ok(self.first_name(tag).unwrap_or_default())
    }

    /// Full dotted name of the structural parent, `None` for modules.
    pub fn parent_path(&self) -> Result<Option<&str>> {
        if self.kind()? == BlockKind::Module {
            return Ok(None);
        }
        PARENT_TAGS
            .into_iter()
            .find_map(|tag| self.first_name(tag))
            .map(Some)
            .ok_or_else(|| DocError::MissingParent {
                file: self.file.clone(),
                line: self.line,
            })
    }

    /// Last segment of the parent path, `None` for modules.
    pub fn parent(&self) -> Result<Option<&str>> {
        Ok(self
            .parent_path()?
            .map(|p| p.rsplit('.').next().unwrap_or(p)))
    }

    /// Location of the block in the documentation hierarchy.
    pub fn path(&self) -> Result<String> {
        let id = self.id()?;
        Ok(match self.parent_path()? {
            Some(parent) => format!("{}.{}", parent, id),
            None => id.to_string(),
        })
    }

    fn first_name(&self, tag: Tag) -> Option<&str> {
        self.entries(tag).first()?.first()?.name()
    }

    /// The block's own free-text description.
    pub fn description(&self) -> String {
        join_spaced(&self.desc)
    }

    pub fn params(&self) -> Vec<NamedTypedDesc<'_>> {
        self.named(Tag::Param)
    }

    pub fn properties(&self) -> Vec<NamedTypedDesc<'_>> {
        self.named(Tag::Property)
    }

    pub fn returns(&self) -> Vec<TypedDesc<'_>> {
        self.typed(Tag::Returns)
    }

    pub fn examples(&self) -> Vec<String> {
        self.entries(Tag::Example).iter().map(|e| join_lines(e)).collect()
    }

    pub fn todos(&self) -> Vec<String> {
        self.entries(Tag::Todo).iter().map(|e| join_spaced(e)).collect()
    }

    /// Names carried by every occurrence of a label tag.
    pub fn labels(&self, tag: Tag) -> Vec<&str> {
        self.entries(tag)
            .iter()
            .filter_map(|e| e.first()?.name())
            .collect()
    }

    fn typed(&self, tag: Tag) -> Vec<TypedDesc<'_>> {
        self.entries(tag)
            .iter()
            .filter_map(|entry| {
                Some(TypedDesc {
                    ty: entry.first()?.ty()?,
                    desc: join_spaced(entry),
                })
            })
            .collect()
    }

    fn named(&self, tag: Tag) -> Vec<NamedTypedDesc<'_>> {
        self.entries(tag)
            .iter()
            .filter_map(|entry| {
                let head = entry.first()?;
                Some(NamedTypedDesc {
                    name: head.name()?,
                    ty: head.ty()?,
                    desc: join_spaced(entry),
                })
            })
            .collect()
    }

    /// Category-aware projection of a tag by name. `"desc"` selects the
    /// block's own description; unknown names give `None`.
    pub fn get(&self, name: &str) -> Option<Field<'_>> {
        if name == "desc" {
            return Some(Field::Description(self.description()));
        }
        let tag = Tag::from_name(name)?;
        let field = match tag.category() {
            Category::Block => return None,
            Category::Flag => Field::Flag(self.has(tag)),
            Category::Label | Category::Value => Field::Entries(self.entries(tag)),
            Category::Description => {
                Field::Notes(self.entries(tag).iter().map(|e| join_spaced(e)).collect())
            }
            Category::UnnamedValueDesc => Field::Typed(self.typed(tag)),
            Category::NamedValueDesc => Field::Named(self.named(tag)),
            Category::Text => {
                Field::Text(self.entries(tag).iter().map(|e| join_lines(e)).collect())
            }
        };
        Some(field)
    }
}

fn join_spaced(entry: &[Line]) -> String {
    entry
        .iter()
        .filter_map(Line::desc)
        .filter(|d| !d.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Newline-joined fragments, blank lines at either end dropped.
fn join_lines(entry: &[Line]) -> String {
    let lines: Vec<&str> = entry.iter().filter_map(Line::desc).collect();
    let start = lines.iter().position(|l| !l.is_empty()).unwrap_or(lines.len());
    let end = lines.iter().rposition(|l| !l.is_empty()).map_or(start, |i| i + 1);
    lines[start..end].join("\n")
}

/// Where free-text lines currently attach.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Attach {
    Description,
    Entry { tag: Tag, index: usize },
}

/// Whether a block still accepts lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockState {
    Open,
    Closed,
}

/// Accumulates classified lines into a [`Block`].
#[derive(Debug)]
pub struct BlockBuilder {
    block: Block,
    attach: Attach,
    state: BlockState,
}

impl BlockBuilder {
    pub fn new(file: impl Into<String>, line: usize) -> BlockBuilder {
        BlockBuilder {
            block: Block::new(file, line),
            attach: Attach::Description,
            state: BlockState::Open,
        }
    }

    pub fn state(&self) -> BlockState {
        self.state
    }

    /// Apply one classified line. Lines pushed after the block closed are
    /// ignored.
    pub fn push(&mut self, line: Line) -> BlockState {
        if self.state == BlockState::Closed {
            return self.state;
        }
        match line {
            Line::End => self.state = BlockState::Closed,
            Line::Start => {}
            Line::Raw { .. } => self.attached().push(line),
            tagged => {
                let Some(tag) = tagged.tag() else {
                    return self.state;
                };
                let entries = self.block.tags.entry(tag).or_default();
                entries.push(vec![tagged]);
                self.attach = Attach::Entry {
                    tag,
                    index: entries.len() - 1,
                };
            }
        }
        self.state
    }

    fn attached(&mut self) -> &mut Entry {
        let Attach::Entry { tag, index } = self.attach else {
            return &mut self.block.desc;
        };
        match self.block.tags.get_mut(&tag).and_then(|e| e.get_mut(index)) {
            Some(entry) => entry,
            None => &mut self.block.desc,
        }
    }

    /// Hand out the block. An open block yields `UnterminatedBlock`.
    pub fn finish(self) -> Result<Block> {
        match self.state {
            BlockState::Closed => Ok(self.block),
            BlockState::Open => Err(DocError::UnterminatedBlock {
                file: self.block.file,
                line: self.block.line,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::line::classify;

    fn build(lines: &[&str]) -> Block {
        let mut builder = BlockBuilder::new("test.js", 1);
        for (i, raw) in lines.iter().enumerate() {
            if let Some(line) = classify(raw, "test.js", i + 2).unwrap() {
                builder.push(line);
            }
        }
        builder.finish().unwrap()
    }

    #[test]
    fn module_identity() {
        let block = build(&[" * The root module.", " * @module Foo", " */"]);
        assert_eq!(block.kind().unwrap(), BlockKind::Module);
        assert_eq!(block.id().unwrap(), "Foo");
        assert_eq!(block.path().unwrap(), "Foo");
        assert_eq!(block.parent().unwrap(), None);
        assert_eq!(block.description(), "The root module.");
    }

    #[test]
    fn method_identity() {
        let block = build(&[" * @method bar", " * @memberOf Foo.Baz", " */"]);
        assert_eq!(block.kind().unwrap(), BlockKind::Method);
        assert_eq!(block.path().unwrap(), "Foo.Baz.bar");
        assert_eq!(block.parent().unwrap(), Some("Baz"));
    }

    #[test]
    fn method_of_is_a_parent_tag() {
        let block = build(&[" * @method bar", " * @methodOf Foo", " */"]);
        assert_eq!(block.path().unwrap(), "Foo.bar");
    }

    #[test]
    fn var_identity_uses_value_name() {
        let block = build(&[" * @var {number} seed", " * @memberOf ran", " */"]);
        assert_eq!(block.kind().unwrap(), BlockKind::Var);
        assert_eq!(block.id().unwrap(), "seed");
    }

    #[test]
    fn identifier_priority() {
        let block = build(&[" * @method run", " * @class Runner", " * @memberOf app", " */"]);
        assert_eq!(block.kind().unwrap(), BlockKind::Class);
        assert_eq!(block.id().unwrap(), "Runner");
    }

    #[test]
    fn missing_identifier() {
        let block = build(&[" * Just text.", " */"]);
        assert!(matches!(block.kind(), Err(DocError::MissingIdentifier { line: 1, .. })));
        assert!(block.path().is_err());
    }

    #[test]
    fn missing_parent() {
        let block = build(&[" * @class Foo", " */"]);
        assert!(matches!(block.path(), Err(DocError::MissingParent { .. })));
        assert!(matches!(block.parent(), Err(DocError::MissingParent { .. })));
    }

    #[test]
    fn params_keep_their_own_continuations() {
        let block = build(&[
            " * Samples values.",
            " * @method sample",
            " * @memberOf ran.dist.Distribution",
            " * @param {number} n Number of",
            " *   values to draw.",
            " * @param {Function=} rng Custom",
            " * generator.",
            " * @returns {number[]} Drawn",
            " * values.",
            " */",
        ]);
        let params = block.params();
        assert_eq!(params.len(), 2);
        assert_eq!(params[0].name, "n");
        assert_eq!(params[0].desc, "Number of values to draw.");
        assert_eq!(params[1].name, "rng");
        assert!(params[1].ty.is_optional());
        assert_eq!(params[1].desc, "Custom generator.");
        assert_eq!(block.returns()[0].desc, "Drawn values.");
        assert_eq!(block.description(), "Samples values.");
    }

    #[test]
    fn examples_preserve_line_breaks() {
        let block = build(&[
            " * @method f",
            " * @memberOf m",
            " * @example",
            " * const x = f(1)",
            " * console.log(x)",
            " */",
        ]);
        assert_eq!(block.examples(), vec!["const x = f(1)\nconsole.log(x)"]);
    }

    #[test]
    fn field_accessor_by_category() {
        let block = build(&[
            " * Desc.",
            " * @method f",
            " * @memberOf m",
            " * @private",
            " * @todo speed",
            " * up",
            " * @returns {?string} Maybe.",
            " */",
        ]);
        assert_eq!(block.get("private"), Some(Field::Flag(true)));
        assert_eq!(block.get("ignore"), Some(Field::Flag(false)));
        assert_eq!(block.get("desc"), Some(Field::Description("Desc.".into())));
        assert_eq!(block.get("todo"), Some(Field::Notes(vec!["speed up".into()])));
        match block.get("memberOf") {
            Some(Field::Entries(entries)) => assert_eq!(entries.len(), 1),
            other => panic!("unexpected {:?}", other),
        }
        match block.get("returns") {
            Some(Field::Typed(items)) => assert_eq!(items[0].desc, "Maybe."),
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(block.get("nonsense"), None);
        assert_eq!(block.get("END"), None);
        assert!(block.is_hidden());
    }

    #[test]
    fn unterminated() {
        let mut builder = BlockBuilder::new("a.js", 4);
        builder.push(Line::Raw { desc: "x".into() });
        assert_eq!(builder.state(), BlockState::Open);
        assert!(matches!(
            builder.finish(),
            Err(DocError::UnterminatedBlock { line: 4, .. })
        ));
    }

    #[test]
    fn lines_after_close_are_ignored() {
        let mut builder = BlockBuilder::new("a.js", 1);
        assert_eq!(builder.push(Line::End), BlockState::Closed);
        builder.push(Line::Raw { desc: "late".into() });
        assert_eq!(builder.finish().unwrap().description(), "");
    }
}
