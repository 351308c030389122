//! HTML renderer — single API page built from a template.
//!
//! The menu groups modules, namespaces and classes into collapsible levels
//! (`s1`, `s2`, `s3`); the main content lists module and namespace headings
//! followed by a card per class, method and variable.

use crate::render::{visible_blocks, RenderContext, Renderer};
use crate::search;
use anyhow::Result;
use docblock_syntax::{Block, BlockKind, DocTree, Node, Tag, TypeOption};
use regex::Regex;
use std::sync::LazyLock;

static RE_CODE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\{(.*?)\}").unwrap());

static RE_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[(.*?)\]\{@link (.*?)\}").unwrap());

/// Built-in page used when no template is given.
pub const DEFAULT_TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>{{NAME}}</title>
<style>
body { font-family: system-ui, sans-serif; display: flex; margin: 0; }
nav { width: 16em; padding: 1em; border-right: 1px solid #ddd; }
nav input { display: none; }
nav label { display: block; font-weight: bold; cursor: pointer; }
nav div { display: none; margin-left: 1em; }
nav input:checked + label + div { display: block; }
nav a { display: block; }
main { flex: 1; max-width: 56em; padding: 1em 2em; }
code { background: #f4f4f4; padding: 0.15em 0.3em; border-radius: 3px; }
pre { background: #f4f4f4; padding: 1em; border-radius: 5px; overflow-x: auto; }
.card { border: 1px solid #ddd; border-radius: 5px; padding: 1em; }
.fifth { width: 20%; }
</style>
</head>
<body>
<nav id="{{NAME_SIMPLIFIED}}-menu">
{{API_MENU}}
</nav>
<main>
<h1>{{NAME}}</h1>
{{API_CONTENT}}
</main>
<script>const SEARCH_LIST = {{SEARCH_LIST}};</script>
</body>
</html>
"#;

pub struct HtmlRenderer;

impl Renderer for HtmlRenderer {
    fn render(&self, tree: &DocTree, ctx: &RenderContext) -> Result<String> {
        let mut menu = String::new();
        let mut main = String::new();

        for (_, node) in visible_blocks(tree, ctx) {
            let Some(block) = node.entry() else {
                continue;
            };
            let kind = block.kind()?;
            if kind == BlockKind::Module {
                menu.push_str(&render_menu(node, ctx));
            }
            match kind {
                BlockKind::Module | BlockKind::Namespace => {
                    let path = block.path()?;
                    main.push_str(&format!(
                        "<h2 id='api-{}'>{}</h2>{}\n<br>",
                        path,
                        path,
                        prose(&block.description())
                    ));
                }
                BlockKind::Class | BlockKind::Method => main.push_str(&render_method(block)?),
                BlockKind::Var => main.push_str(&render_var(block)?),
            }
        }

        let search_list = serde_json::to_string(&search::build_index(tree, ctx))?;
        let template = ctx.template.as_deref().unwrap_or(DEFAULT_TEMPLATE);
        Ok(template
            .replace("{{NAME}}", &ctx.name)
            .replace("{{NAME_SIMPLIFIED}}", &ctx.name.replace('-', ""))
            .replace("{{API_MENU}}", &menu)
            .replace("{{API_CONTENT}}", &main)
            .replace("{{SEARCH_LIST}}", &search_list))
    }

    fn file_name(&self) -> &str {
        "index.html"
    }
}

/// Menu entry for a node. Entry-less nodes pass their children through.
fn render_menu(node: &Node, ctx: &RenderContext) -> String {
    if ctx.hides(node) {
        return String::new();
    }
    let Some(block) = node.entry() else {
        return render_submenu(node, ctx);
    };
    let (Ok(kind), Ok(path), Ok(id)) = (block.kind(), block.path(), block.id()) else {
        return String::new();
    };

    let level = match kind {
        BlockKind::Method | BlockKind::Var => {
            return format!("<a href='#api-{}'>{}</a>", path, id);
        }
        BlockKind::Class => "s3",
        BlockKind::Namespace => "s2",
        BlockKind::Module => "s1",
    };
    let input_id = format!("{}-{}", level, path);
    tagify("", "input", &[("id", input_id.as_str()), ("type", "checkbox")])
        + &tagify(id, "label", &[("for", input_id.as_str())])
        + &tagify(&render_submenu(node, ctx), "div", &[("class", level)])
}

fn render_submenu(node: &Node, ctx: &RenderContext) -> String {
    node.children()
        .into_iter()
        .rev()
        .map(|child| render_menu(child, ctx))
        .collect()
}

/// Card for a class or method: call signature, description, parameter and
/// return tables, overridden member.
fn render_method(block: &Block) -> Result<String> {
    let path = block.path()?;
    let params = block.params();
    let mut html = String::new();

    let mut code = String::new();
    for (i, param) in params.iter().enumerate() {
        if param.ty.is_optional() {
            code.push('[');
        }
        if i > 0 {
            code.push_str(", ");
        }
        code.push_str(param.name);
    }
    code.push_str(&"]".repeat(params.iter().filter(|p| p.ty.is_optional()).count()));
    html.push_str(&tagify(&format!("{}({})", path, code), "pre", &[]));
    html.push('\n');

    html.push_str(&format!("<br>{}\n", prose(&block.description())));

    if !params.is_empty() {
        let mut table = tagify(
            &tagify(
                "<th class='fifth'>arg</th><th class='fifth'>type</th><th>description</th>",
                "tr",
                &[],
            ),
            "thead",
            &[],
        );
        for param in &params {
            let mut desc = prose(&param.desc);
            for option in [TypeOption::Optional, TypeOption::Nullable, TypeOption::NonNullable] {
                if param.ty.has(option) {
                    desc.push(' ');
                    desc.push_str(&tagify(option.label(), "code", &[]));
                }
            }
            let row = format!(
                "<td><i>{}</i></td><td>{}</td>{}",
                param.name,
                type_codes(&param.ty.types),
                tagify(&desc, "td", &[])
            );
            table.push_str(&tagify(&row, "tr", &[]));
        }
        html.push_str(&format!("<br>{}\n", tagify(&table, "table", &[])));
    }

    if let Some(ret) = block.returns().first() {
        let table = tagify(
            &tagify("<th class='fifth'>return</th><th>description</th>", "tr", &[]),
            "thead",
            &[],
        ) + &tagify(
            &format!(
                "<td><i>{}</i></td><td>{}</td>",
                type_codes(&ret.ty.types),
                prose(&ret.desc)
            ),
            "tr",
            &[],
        );
        html.push_str(&tagify(&table, "table", &[]));
    }

    if let Some(parent) = block.labels(Tag::Override).first() {
        html.push_str(&format!("<br>Overrides: {}", prose(parent)));
    }

    for example in block.examples() {
        html.push_str(&tagify(&tagify(&html_escape(&example), "code", &[]), "pre", &[]));
    }

    Ok(format!(
        "<h3 id='api-{}'>{}</h3>\n{}<br>",
        path,
        block.id()?,
        tagify(&html, "div", &[("class", "card")])
    ))
}

fn render_var(block: &Block) -> Result<String> {
    let path = block.path()?;
    let ty = block
        .entries(Tag::Var)
        .first()
        .and_then(|entry| entry.first())
        .and_then(|line| line.ty())
        .map(|ty| type_codes(&ty.types))
        .unwrap_or_default();
    let body = format!(
        "{}\n<br>{}\n",
        tagify(&path, "pre", &[]),
        prose(&block.description())
    ) + &ty;
    Ok(format!(
        "<h3 id='api-{}'>{}</h3>\n{}<br>",
        path,
        block.id()?,
        tagify(&body, "div", &[("class", "card")])
    ))
}

fn type_codes(types: &[String]) -> String {
    types
        .iter()
        .map(|t| tagify(&html_escape(t), "code", &[]))
        .collect::<Vec<_>>()
        .join(" ")
}

fn tagify(text: &str, tag: &str, attrs: &[(&str, &str)]) -> String {
    let mut out = format!("<{}", tag);
    for (key, value) in attrs {
        out.push_str(&format!(" {}='{}'", key, value));
    }
    out.push('>');
    out.push_str(text);
    out.push_str(&format!("</{}>", tag));
    out
}

/// Escaped text with `[text]{@link url}` links and `{...}` code spans.
fn prose(text: &str) -> String {
    let escaped = html_escape(text);
    let linked = RE_LINK.replace_all(&escaped, "<a href=\"$2\" target=\"_blank\">$1</a>");
    RE_CODE.replace_all(&linked, "<code>$1</code>").into_owned()
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
