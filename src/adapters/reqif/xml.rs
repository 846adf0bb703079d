//! Streaming XML output with an open-element stack
//!
//! The ReqIF document is written phase by phase, so elements opened in one
//! phase are closed in a later one. The sink remembers every open element;
//! after a failure [`XmlSink::close_all`] closes them so the partial file is
//! still well-formed.

use crate::domain::{ReqportError, Result};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::io::Write;

pub struct XmlSink<W: Write> {
    writer: Writer<W>,
    open: Vec<String>,
}

impl<W: Write> XmlSink<W> {
    /// Indented output, two spaces per level
    pub fn new(inner: W) -> Self {
        Self {
            writer: Writer::new_with_indent(inner, b' ', 2),
            open: Vec::new(),
        }
    }

    fn write(&mut self, event: Event<'_>) -> Result<()> {
        self.writer.write_event(event).map_err(ReqportError::format)
    }

    /// `<?xml version="1.0" encoding="UTF-8"?>`
    pub fn declaration(&mut self) -> Result<()> {
        self.write(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
    }

    /// Opens an element; it stays open until [`end`](Self::end)
    pub fn start(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<()> {
        let mut start = BytesStart::new(name);
        for attr in attrs {
            start.push_attribute(*attr);
        }
        self.write(Event::Start(start))?;
        self.open.push(name.to_string());
        Ok(())
    }

    /// Closes the innermost open element
    pub fn end(&mut self) -> Result<()> {
        let name = self
            .open
            .pop()
            .ok_or_else(|| ReqportError::Format("No open XML element to close".to_string()))?;
        self.write(Event::End(BytesEnd::new(name)))
    }

    /// Writes an element without content
    pub fn empty(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<()> {
        let mut start = BytesStart::new(name);
        for attr in attrs {
            start.push_attribute(*attr);
        }
        self.write(Event::Empty(start))
    }

    /// Writes `<name>text</name>`, escaping the text
    pub fn text_element(&mut self, name: &str, text: &str) -> Result<()> {
        self.start(name, &[])?;
        self.write(Event::Text(BytesText::new(text)))?;
        self.end()
    }

    /// Writes already escaped markup verbatim
    pub fn raw(&mut self, markup: &str) -> Result<()> {
        self.write(Event::Text(BytesText::from_escaped(markup)))
    }

    /// Number of open elements
    pub fn depth(&self) -> usize {
        self.open.len()
    }

    /// Closes every open element, innermost first
    pub fn close_all(&mut self) -> Result<()> {
        while !self.open.is_empty() {
            self.end()?;
        }
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }
}
