//! Rich-text sanitizer
//!
//! Turns the presentational HTML of requirement descriptions into the XHTML
//! subset ReqIF accepts. The passes run in a fixed order over the parsed
//! tree:
//!
//! 1. `u`, `strike` and `s` become spans with a text-decoration style
//! 2. `font` becomes a span carrying its color, size and face as CSS
//! 3. `div`, `colgroup`, `col` and `tbody` are unwrapped
//! 4. `bordercolor` on tables moves into the style attribute
//! 5. attributes illegal on specific tags are stripped
//! 6. `img` becomes `object`, exporting the image file as a side effect
//! 7. allowed tags get the `reqif-xhtml:` prefix, everything else is unwrapped

use crate::core::export::context::ExportContext;
use crate::core::transform::html::{self, Element, Node};
use crate::core::transform::images::export_image;
use crate::domain::Result;

/// Namespace prefix of XHTML content inside ReqIF
pub const XHTML_PREFIX: &str = "reqif-xhtml:";

/// Tags allowed inside ReqIF XHTML values
pub const ALLOWED_TAGS: &[&str] = &[
    // text
    "abbr", "acronym", "address", "blockquote", "br", "cite", "code", "dfn", "em", "kbd", "p",
    "pre", "q", "samp", "span", "strong", "var", "h1", "h2", "h3", "h4", "h5", "h6",
    // lists
    "dl", "dt", "dd", "ol", "ul", "li",
    // hypertext
    "a",
    // edit
    "del", "ins",
    // presentation
    "b", "big", "hr", "i", "small", "sub", "sup", "tt",
    // tables
    "caption", "table", "td", "th", "tr",
    // objects
    "object", "param",
];

const UNWRAPPED_TAGS: &[&str] = &["div", "colgroup", "col", "tbody"];

/// Elements removed together with their content
const DISCARDED_TAGS: &[&str] = &["script", "style", "head", "title"];

const ILLEGAL_ATTRIBUTES: &[(&str, &str)] = &[
    ("p", "align"),
    ("td", "width"),
    ("td", "nowrap"),
    ("ul", "type"),
    ("li", "align"),
    ("blockquote", "dir"),
];

/// Sanitizes one description into a ReqIF XHTML fragment
///
/// The result is the content of the surrounding `reqif-xhtml:div`, already
/// serialized.
///
/// # Errors
///
/// Returns a format error if a converted image cannot be written or the
/// fragment cannot be serialized.
pub fn sanitize(ctx: &mut ExportContext, html: &str) -> Result<String> {
    let mut nodes = html::parse_fragment(html);

    html::for_each_element(&mut nodes, &mut replace_decorations);
    html::for_each_element(&mut nodes, &mut replace_font);
    let mut nodes = html::unwrap_elements(nodes, &|e| {
        UNWRAPPED_TAGS.contains(&e.name.as_str())
    });
    html::for_each_element(&mut nodes, &mut fold_border_color);
    html::for_each_element(&mut nodes, &mut strip_illegal_attributes);
    rewrite_images(ctx, &mut nodes)?;

    let mut nodes = html::unwrap_elements(discard(nodes), &|e| {
        !ALLOWED_TAGS.contains(&e.name.as_str())
    });
    html::for_each_element(&mut nodes, &mut |e| {
        e.name = format!("{XHTML_PREFIX}{}", e.name);
    });

    html::to_xml(&nodes)
}

fn prepend_style(element: &mut Element, declarations: &str) {
    let style = match element.remove_attr("style") {
        Some(old) if !old.trim().is_empty() => {
            format!("{declarations}{}", old.trim().to_lowercase())
        }
        _ => declarations.to_string(),
    };
    if !style.is_empty() {
        element.set_attr("style", style);
    }
}

fn replace_decorations(element: &mut Element) {
    let declaration = match element.name.as_str() {
        "u" => "text-decoration:underline",
        "strike" | "s" => "text-decoration:line-through",
        _ => return,
    };
    element.name = "span".to_string();
    let has_style = element.attr("style").is_some_and(|s| !s.trim().is_empty());
    if has_style {
        prepend_style(element, &format!("{declaration};"));
    } else {
        element.set_attr("style", declaration);
    }
}

fn replace_font(element: &mut Element) {
    if element.name != "font" {
        return;
    }
    let mut style = String::new();
    for (attribute, property) in [("color", "color"), ("size", "font-size"), ("face", "font-family")] {
        if let Some(value) = element.remove_attr(attribute) {
            style.push_str(&format!("{property}:{value};"));
        }
    }
    element.remove_attr("lang");
    prepend_style(element, &style);
    element.name = "span".to_string();
}

fn fold_border_color(element: &mut Element) {
    if element.name != "table" {
        return;
    }
    if let Some(color) = element.remove_attr("bordercolor") {
        prepend_style(element, &format!("border-color:{color};"));
    }
}

fn strip_illegal_attributes(element: &mut Element) {
    for (tag, attribute) in ILLEGAL_ATTRIBUTES {
        if element.name == *tag {
            element.remove_attr(attribute);
        }
    }
}

fn rewrite_images(ctx: &mut ExportContext, nodes: &mut [Node]) -> Result<()> {
    for node in nodes {
        let Node::Element(element) = node else {
            continue;
        };
        if element.name == "img" {
            rewrite_image(ctx, element)?;
        } else {
            rewrite_images(ctx, &mut element.children)?;
        }
    }
    Ok(())
}

/// Turns an `img` into an `object`; a dropped image keeps its `img` name and
/// disappears with the final unwrap
fn rewrite_image(ctx: &mut ExportContext, element: &mut Element) -> Result<()> {
    let id = element.attr("id").unwrap_or_default().to_string();
    let Some(image_id) = id.strip_prefix("img").and_then(|n| n.parse::<u32>().ok()) else {
        tracing::warn!(id = %id, "Image without a usable id, image dropped");
        ctx.record_dropped_image();
        return Ok(());
    };
    let Some(file_name) = element.attr("src_original").map(str::to_string) else {
        tracing::warn!(image_id, "Image without an original file name, image dropped");
        ctx.record_dropped_image();
        return Ok(());
    };

    if let Some(object) = export_image(ctx, image_id, &file_name)? {
        element.name = "object".to_string();
        element.attrs = vec![
            ("data".to_string(), object.data),
            ("type".to_string(), object.media_type),
        ];
        element.children.clear();
    }
    Ok(())
}

fn discard(nodes: Vec<Node>) -> Vec<Node> {
    nodes
        .into_iter()
        .filter_map(|node| match node {
            Node::Element(e) if DISCARDED_TAGS.contains(&e.name.as_str()) => None,
            Node::Element(mut e) => {
                e.children = discard(std::mem::take(&mut e.children));
                Some(Node::Element(e))
            }
            text => Some(text),
        })
        .collect()
}
