//! Renderer module — trait-based format dispatch over the documentation tree.

pub mod html;
pub mod json;

use anyhow::{anyhow, Result};
use docblock_syntax::{Block, DocTree, Node};

/// Settings shared by every renderer.
pub struct RenderContext {
    /// Project name substituted into page templates.
    pub name: String,
    /// HTML template; the built-in one is used when absent.
    pub template: Option<String>,
    /// Include `@private` / `@ignore` blocks and their subtrees.
    pub show_private: bool,
}

impl RenderContext {
    /// Whether a node (and everything below it) is left out of the output.
    pub fn hides(&self, node: &Node) -> bool {
        !self.show_private && node.entry().is_some_and(Block::is_hidden)
    }
}

/// Trait for rendering a documentation tree into a specific output format.
pub trait Renderer {
    fn render(&self, tree: &DocTree, ctx: &RenderContext) -> Result<String>;
    fn file_name(&self) -> &str;
}

/// Create a renderer for the given format name.
pub fn create_renderer(format: &str) -> Result<Box<dyn Renderer>> {
    match format {
        "json" => Ok(Box::new(json::JsonRenderer)),
        "html" => Ok(Box::new(html::HtmlRenderer)),
        _ => Err(anyhow!("unknown format: {}. Use json or html", format)),
    }
}

/// Visible nodes carrying a block, in declaration order. Hidden nodes are
/// pruned together with their subtrees.
pub fn visible_blocks<'a>(tree: &'a DocTree, ctx: &RenderContext) -> Vec<(String, &'a Node)> {
    let mut walk = tree.walk();
    let mut out = Vec::new();
    while let Some((path, node)) = walk.next() {
        if ctx.hides(node) {
            walk.skip_children(node);
            continue;
        }
        if node.entry().is_some() {
            out.push((path, node));
        }
    }
    out
}
