//! Owned HTML fragment tree
//!
//! Descriptions are parsed once with scraper into this small tree; the
//! sanitizer passes rewrite it in place and the result is serialized with
//! quick-xml, which always produces well-formed markup.

use crate::domain::{ReqportError, Result};
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use scraper::{ElementRef, Html};

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    Text(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub name: String,
    pub attrs: Vec<(String, String)>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Sets an attribute, replacing an existing value in place
    pub fn set_attr(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self.attrs.iter_mut().find(|(k, _)| k == name) {
            Some(slot) => slot.1 = value,
            None => self.attrs.push((name.to_string(), value)),
        }
    }

    pub fn remove_attr(&mut self, name: &str) -> Option<String> {
        let index = self.attrs.iter().position(|(k, _)| k == name)?;
        Some(self.attrs.remove(index).1)
    }
}

/// Parses an HTML fragment into top-level nodes
///
/// Document scaffolding (`html`, `head`, `body`) is not part of the result.
pub fn parse_fragment(html: &str) -> Vec<Node> {
    let document = Html::parse_fragment(html);
    let mut nodes = convert_children(document.root_element());
    // A fragment holding a whole document still yields its body only
    while let [Node::Element(e)] = nodes.as_slice() {
        if !matches!(e.name.as_str(), "html" | "body") {
            break;
        }
        let Some(Node::Element(e)) = nodes.pop() else {
            break;
        };
        nodes = e.children;
    }
    nodes
}

fn convert_children(element: ElementRef<'_>) -> Vec<Node> {
    let mut nodes = Vec::new();
    for child in element.children() {
        if let Some(child_element) = ElementRef::wrap(child) {
            let value = child_element.value();
            if value.name() == "head" {
                continue;
            }
            nodes.push(Node::Element(Element {
                name: value.name().to_string(),
                attrs: value
                    .attrs()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
                children: convert_children(child_element),
            }));
        } else if let Some(text) = child.value().as_text() {
            let text: &str = text;
            nodes.push(Node::Text(text.to_string()));
        }
    }
    nodes
}

/// Applies `f` to every element, parents before children
pub fn for_each_element(nodes: &mut [Node], f: &mut dyn FnMut(&mut Element)) {
    for node in nodes {
        if let Node::Element(element) = node {
            f(element);
            for_each_element(&mut element.children, f);
        }
    }
}

/// Replaces every element matching `unwrap` with its children
pub fn unwrap_elements(nodes: Vec<Node>, unwrap: &dyn Fn(&Element) -> bool) -> Vec<Node> {
    let mut out = Vec::with_capacity(nodes.len());
    for node in nodes {
        match node {
            Node::Element(mut element) => {
                let children = std::mem::take(&mut element.children);
                let children = unwrap_elements(children, unwrap);
                if unwrap(&element) {
                    out.extend(children);
                } else {
                    element.children = children;
                    out.push(Node::Element(element));
                }
            }
            text => out.push(text),
        }
    }
    out
}

/// Serializes nodes as compact XML
///
/// # Errors
///
/// Returns a format error if the XML writer fails.
pub fn to_xml(nodes: &[Node]) -> Result<String> {
    let mut writer = Writer::new(Vec::new());
    write_nodes(&mut writer, nodes)?;
    String::from_utf8(writer.into_inner())
        .map_err(|e| ReqportError::Format(format!("xhtml: {e}")))
}

fn write_nodes(writer: &mut Writer<Vec<u8>>, nodes: &[Node]) -> Result<()> {
    for node in nodes {
        match node {
            Node::Text(text) => writer
                .write_event(Event::Text(BytesText::new(text)))
                .map_err(ReqportError::format)?,
            Node::Element(element) => {
                let mut start = BytesStart::new(element.name.as_str());
                for (k, v) in &element.attrs {
                    start.push_attribute((k.as_str(), v.as_str()));
                }
                if element.children.is_empty() {
                    writer
                        .write_event(Event::Empty(start))
                        .map_err(ReqportError::format)?;
                } else {
                    writer
                        .write_event(Event::Start(start))
                        .map_err(ReqportError::format)?;
                    write_nodes(writer, &element.children)?;
                    writer
                        .write_event(Event::End(BytesEnd::new(element.name.as_str())))
                        .map_err(ReqportError::format)?;
                }
            }
        }
    }
    Ok(())
}

const BLOCK_ELEMENTS: &[&str] = &[
    "p", "div", "li", "tr", "table", "ul", "ol", "dl", "dt", "dd", "blockquote", "pre", "h1", "h2",
    "h3", "h4", "h5", "h6", "hr",
];

/// Text content with line breaks at `br` and block boundaries
///
/// Lines are right-trimmed, runs of blank lines collapse to one and the
/// whole text is trimmed.
pub fn to_text(nodes: &[Node]) -> String {
    let mut raw = String::new();
    collect_text(nodes, &mut raw);

    let mut out = String::with_capacity(raw.len());
    let mut blank = false;
    for line in raw.lines().map(str::trim_end) {
        if line.trim().is_empty() {
            blank = !out.is_empty();
            continue;
        }
        if !out.is_empty() {
            out.push('\n');
            if blank {
                out.push('\n');
            }
        }
        blank = false;
        out.push_str(line);
    }
    out.trim().to_string()
}

fn collect_text(nodes: &[Node], out: &mut String) {
    for node in nodes {
        match node {
            Node::Text(text) => out.push_str(text),
            Node::Element(element) if element.name == "br" => out.push('\n'),
            Node::Element(element) => {
                let block = BLOCK_ELEMENTS.contains(&element.name.as_str());
                if block && !out.ends_with('\n') && !out.is_empty() {
                    out.push('\n');
                }
                collect_text(&element.children, out);
                if element.name == "td" || element.name == "th" {
                    out.push('\t');
                }
                if block && !out.ends_with('\n') {
                    out.push('\n');
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_fragment() {
        let nodes = parse_fragment("<p>Hello <b>world</b></p>tail");
        assert_eq!(nodes.len(), 2);
        match &nodes[0] {
            Node::Element(p) => {
                assert_eq!(p.name, "p");
                assert_eq!(p.children.len(), 2);
            }
            other => panic!("unexpected node {other:?}"),
        }
        assert_eq!(nodes[1], Node::Text("tail".to_string()));
    }

    #[test]
    fn test_parse_ignores_body_tags() {
        let nodes = parse_fragment("<body><p>a</p></body>");
        assert_eq!(to_xml(&nodes).unwrap(), "<p>a</p>");
    }

    #[test]
    fn test_attr_helpers() {
        let mut element = Element::new("font");
        element.set_attr("color", "red");
        element.set_attr("color", "blue");
        assert_eq!(element.attr("color"), Some("blue"));
        assert_eq!(element.remove_attr("color"), Some("blue".to_string()));
        assert_eq!(element.attr("color"), None);
    }

    #[test]
    fn test_unwrap_keeps_children_in_place() {
        let nodes = parse_fragment("<div>a<span>b</span></div><p>c</p>");
        let nodes = unwrap_elements(nodes, &|e| e.name == "div");
        assert_eq!(to_xml(&nodes).unwrap(), "a<span>b</span><p>c</p>");
    }

    #[test]
    fn test_to_xml_escapes_and_closes() {
        let nodes = parse_fragment("<p title=\"a&quot;b\">1 &lt; 2 &amp; 3<br></p>");
        assert_eq!(
            to_xml(&nodes).unwrap(),
            "<p title=\"a&quot;b\">1 &lt; 2 &amp; 3<br/></p>"
        );
    }

    #[test]
    fn test_to_text_line_breaks() {
        let nodes = parse_fragment("<p>First &amp; line</p><p>Second<br>Third</p>  ");
        assert_eq!(to_text(&nodes), "First & line\nSecond\nThird");
    }
}
