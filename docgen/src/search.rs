//! Search index — the dotted paths a page can jump to.

use crate::render::{visible_blocks, RenderContext};
use docblock_syntax::DocTree;

/// Paths of every visible block, in declaration order.
pub fn build_index(tree: &DocTree, ctx: &RenderContext) -> Vec<String> {
    visible_blocks(tree, ctx)
        .into_iter()
        .map(|(path, _)| path)
        .collect()
}
