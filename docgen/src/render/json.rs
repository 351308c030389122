//! JSON renderer — the documentation tree as nested objects.
//!
//! Each path segment maps to `{ "entry": ..., "children": {...} }`, with
//! `entry` null for intermediate nodes. Every block is exported, private ones
//! included; their `tags` carry the `private`/`ignore` markers.

use crate::render::{RenderContext, Renderer};
use anyhow::Result;
use docblock_syntax::{Block, DocTree, Node};
use serde_json::{json, Map, Value};

pub struct JsonRenderer;

impl Renderer for JsonRenderer {
    fn render(&self, tree: &DocTree, _ctx: &RenderContext) -> Result<String> {
        let root = children_json(tree.root())?;
        let mut out = serde_json::to_string_pretty(&root)?;
        out.push('\n');
        Ok(out)
    }

    fn file_name(&self) -> &str {
        "api.json"
    }
}

fn children_json(node: &Node) -> Result<Value> {
    let mut children = Map::new();
    for (segment, child) in node.children_map() {
        children.insert(segment.clone(), node_json(child)?);
    }
    Ok(Value::Object(children))
}

fn node_json(node: &Node) -> Result<Value> {
    let entry = match node.entry() {
        Some(block) => block_json(block)?,
        None => Value::Null,
    };
    Ok(json!({
        "entry": entry,
        "children": children_json(node)?,
    }))
}

/// Raw block content plus the resolved identity and projected fields.
fn block_json(block: &Block) -> Result<Value> {
    let mut value = serde_json::to_value(block)?;
    if let Value::Object(ref mut map) = value {
        map.insert("type".into(), serde_json::to_value(block.kind()?)?);
        map.insert("id".into(), json!(block.id()?));
        map.insert("path".into(), json!(block.path()?));
        map.insert("parent".into(), json!(block.parent()?));
        map.insert("desc".into(), json!(block.description()));
        map.insert("params".into(), serde_json::to_value(block.params())?);
        map.insert("returns".into(), serde_json::to_value(block.returns())?);
        map.insert("examples".into(), json!(block.examples()));
    }
    Ok(value)
}
