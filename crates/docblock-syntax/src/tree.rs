//! Documentation tree — blocks keyed by the dot-segments of their paths.

use crate::block::Block;
use crate::error::{DocError, Result};
use std::collections::{BTreeMap, HashMap};
use tracing::warn;

/// What to do when a block resolves to a path that already holds one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DuplicatePolicy {
    /// Replace the earlier block.
    #[default]
    LastWins,
    /// Keep the earlier block and drop the new one.
    FirstWins,
    /// Fail with [`DocError::DuplicatePath`].
    Reject,
}

/// One node per path segment. Intermediate nodes carry no entry until a
/// block resolves to exactly their path.
#[derive(Debug, Default)]
pub struct Node {
    entry: Option<Block>,
    children: BTreeMap<String, Node>,
    seq: usize,
}

impl Node {
    pub fn entry(&self) -> Option<&Block> {
        self.entry.as_ref()
    }

    pub fn children_map(&self) -> &BTreeMap<String, Node> {
        &self.children
    }

    pub fn child(&self, segment: &str) -> Option<&Node> {
        self.children.get(segment)
    }

    /// Children ordered by descending source line of their entries. Nodes
    /// without an entry count as line 1 and come after any entry on the same
    /// line; remaining ties keep creation order.
    pub fn children(&self) -> Vec<&Node> {
        self.ordered().into_iter().map(|(_, node)| node).collect()
    }

    fn ordered(&self) -> Vec<(&String, &Node)> {
        let mut nodes: Vec<_> = self.children.iter().collect();
        nodes.sort_by(|(_, a), (_, b)| {
            b.sort_line()
                .cmp(&a.sort_line())
                .then(b.entry.is_some().cmp(&a.entry.is_some()))
                .then(a.seq.cmp(&b.seq))
        });
        nodes
    }

    fn sort_line(&self) -> usize {
        self.entry.as_ref().map(Block::line).unwrap_or(1)
    }
}

/// The hierarchy built from every successfully parsed file.
#[derive(Debug, Default)]
pub struct DocTree {
    root: Node,
    next_seq: usize,
    policy: DuplicatePolicy,
}

impl DocTree {
    pub fn new() -> DocTree {
        DocTree::default()
    }

    pub fn with_policy(policy: DuplicatePolicy) -> DocTree {
        DocTree {
            policy,
            ..DocTree::default()
        }
    }

    pub fn policy(&self) -> DuplicatePolicy {
        self.policy
    }

    /// Implicit root at the empty path.
    pub fn root(&self) -> &Node {
        &self.root
    }

    /// Insert a block at its resolved path.
    pub fn insert(&mut self, block: Block) -> Result<()> {
        let path = block.path()?;
        self.insert_at(&path, block)
    }

    /// Insert a block at an explicit dotted path, creating missing
    /// intermediate nodes.
    pub fn insert_at(&mut self, path: &str, block: Block) -> Result<()> {
        if let Some(existing) = self.lookup(path).and_then(Node::entry) {
            match self.policy {
                DuplicatePolicy::Reject => return Err(duplicate(path, &block, existing)),
                DuplicatePolicy::FirstWins => {
                    warn!(path, file = block.file(), line = block.line(), "duplicate path, keeping earlier block");
                    return Ok(());
                }
                DuplicatePolicy::LastWins => {
                    warn!(path, file = block.file(), line = block.line(), "duplicate path, replacing earlier block");
                }
            }
        }

        let mut node = &mut self.root;
        for segment in path.split('.') {
            node = node.children.entry(segment.to_string()).or_insert_with(|| {
                let seq = self.next_seq;
                self.next_seq += 1;
                Node {
                    seq,
                    ..Node::default()
                }
            });
        }
        node.entry = Some(block);
        Ok(())
    }

    /// Insert every block of one file. Paths are resolved and, under the
    /// reject policy, checked for duplicates before anything is inserted, so
    /// a failing batch leaves the tree untouched.
    pub fn insert_all(&mut self, blocks: Vec<Block>) -> Result<()> {
        let mut resolved = Vec::with_capacity(blocks.len());
        for block in blocks {
            resolved.push((block.path()?, block));
        }

        if self.policy == DuplicatePolicy::Reject {
            let mut seen: HashMap<&str, &Block> = HashMap::new();
            for (path, block) in &resolved {
                let earlier = seen
                    .get(path.as_str())
                    .copied()
                    .or_else(|| self.lookup(path).and_then(Node::entry));
                if let Some(existing) = earlier {
                    return Err(duplicate(path, block, existing));
                }
                seen.insert(path.as_str(), block);
            }
        }

        for (path, block) in resolved {
            self.insert_at(&path, block)?;
        }
        Ok(())
    }

    pub fn lookup(&self, path: &str) -> Option<&Node> {
        path.split('.')
            .try_fold(&self.root, |node, segment| node.children.get(segment))
    }

    /// Number of nodes carrying a block.
    pub fn len(&self) -> usize {
        self.walk().filter(|(_, node)| node.entry.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.root.children.is_empty()
    }

    /// Depth-first traversal in declaration order.
    pub fn walk(&self) -> Walk<'_> {
        Walk::new(&self.root, String::new())
    }
}

fn duplicate(path: &str, block: &Block, existing: &Block) -> DocError {
    DocError::DuplicatePath {
        path: path.to_string(),
        file: block.file().to_string(),
        line: block.line(),
        previous_file: existing.file().to_string(),
        previous_line: existing.line(),
    }
}

/// Stack-driven traversal yielding `(path, node)`. Children are pushed in
/// descending line order, so they pop in declaration order.
pub struct Walk<'a> {
    stack: Vec<(String, &'a Node)>,
}

impl<'a> Walk<'a> {
    /// Walk the subtree below `node`, whose own path is `path`.
    pub fn new(node: &'a Node, path: String) -> Walk<'a> {
        let mut walk = Walk { stack: Vec::new() };
        walk.push_children(&path, node);
        walk
    }

    fn push_children(&mut self, path: &str, node: &'a Node) {
        for (segment, child) in node.ordered() {
            let child_path = if path.is_empty() {
                segment.clone()
            } else {
                format!("{}.{}", path, segment)
            };
            self.stack.push((child_path, child));
        }
    }

    /// Drop the children of the node returned last by `next`.
    pub fn skip_children(&mut self, node: &'a Node) {
        let count = node.children.len();
        self.stack.truncate(self.stack.len().saturating_sub(count));
    }
}

impl<'a> Iterator for Walk<'a> {
    type Item = (String, &'a Node);

    fn next(&mut self) -> Option<Self::Item> {
        let (path, node) = self.stack.pop()?;
        self.push_children(&path, node);
        Some((path, node))
    }
}
