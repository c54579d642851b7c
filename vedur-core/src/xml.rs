//! Generic XML → JSON tree conversion.
//!
//! The XML weather service answers with small attribute-heavy documents. They
//! are turned into a `serde_json::Value` with a fixed shape so the normalizer
//! can walk them without per-document types:
//!
//! - the root is an object keyed by the root tag name;
//! - an element without attributes or children becomes its text (`""` if empty);
//! - otherwise it is an object with attributes under `$`, text under `_` and
//!   every child tag mapped to an array of child nodes in document order.
//!
//! Whitespace-only text next to child elements is dropped.

use quick_xml::{
    Reader,
    events::{BytesStart, Event},
};
use serde_json::{Map, Value};

use crate::error::{Result, VedurError};

/// Key holding an element's attributes.
pub const ATTR_KEY: &str = "$";
/// Key holding an element's text when it also has attributes or children.
pub const TEXT_KEY: &str = "_";

#[derive(Debug)]
struct Node {
    name: String,
    attrs: Map<String, Value>,
    text: String,
    children: Map<String, Value>,
}

impl Node {
    fn open(start: &BytesStart<'_>) -> Result<Self> {
        let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
        let mut attrs = Map::new();
        for attr in start.attributes() {
            let attr =
                attr.map_err(|e| VedurError::xml(format!("bad attribute in <{name}>: {e}")))?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let value = attr
                .unescape_value()
                .map_err(|e| VedurError::xml(format!("bad attribute value in <{name}>: {e}")))?;
            attrs.insert(key, Value::String(value.into_owned()));
        }
        Ok(Self { name, attrs, text: String::new(), children: Map::new() })
    }

    fn push_child(&mut self, name: String, value: Value) {
        match self.children.get_mut(&name) {
            Some(Value::Array(items)) => items.push(value),
            _ => {
                self.children.insert(name, Value::Array(vec![value]));
            }
        }
    }

    fn into_value(self) -> (String, Value) {
        let Node { name, attrs, text, children } = self;
        let blank = text.trim().is_empty();

        if attrs.is_empty() && children.is_empty() {
            return (name, Value::String(text));
        }

        let mut obj = Map::new();
        if !attrs.is_empty() {
            obj.insert(ATTR_KEY.to_string(), Value::Object(attrs));
        }
        if !blank {
            obj.insert(TEXT_KEY.to_string(), Value::String(text));
        }
        obj.extend(children);
        (name, Value::Object(obj))
    }
}

/// Parse an XML document into the tree shape described in the module docs.
pub fn parse_xml(body: &str) -> Result<Value> {
    let mut reader = Reader::from_str(body);
    let mut stack: Vec<Node> = Vec::new();
    let mut root: Option<(String, Value)> = None;

    loop {
        let event = match reader.read_event() {
            Ok(event) => event,
            Err(e) => {
                return Err(VedurError::xml(format!("at byte {}: {e}", reader.buffer_position())));
            }
        };

        match event {
            Event::Start(start) => {
                if stack.is_empty() && root.is_some() {
                    return Err(VedurError::xml("more than one root element"));
                }
                stack.push(Node::open(&start)?);
            }
            Event::Empty(start) => {
                if stack.is_empty() && root.is_some() {
                    return Err(VedurError::xml("more than one root element"));
                }
                close(Node::open(&start)?, &mut stack, &mut root);
            }
            Event::End(_) => {
                let node = stack.pop().ok_or_else(|| VedurError::xml("unexpected closing tag"))?;
                close(node, &mut stack, &mut root);
            }
            Event::Text(text) => {
                let text = text.unescape().map_err(|e| VedurError::xml(e.to_string()))?;
                match stack.last_mut() {
                    Some(node) => node.text.push_str(&text),
                    None if text.trim().is_empty() => {}
                    None => return Err(VedurError::xml("text outside of the root element")),
                }
            }
            Event::CData(data) => {
                let node = stack
                    .last_mut()
                    .ok_or_else(|| VedurError::xml("CDATA outside of the root element"))?;
                node.text.push_str(&String::from_utf8_lossy(&data));
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(VedurError::xml(format!("unclosed element <{}>", open.name)));
    }

    let (name, value) = root.ok_or_else(|| VedurError::xml("document has no root element"))?;
    let mut doc = Map::new();
    doc.insert(name, value);
    Ok(Value::Object(doc))
}

fn close(node: Node, stack: &mut [Node], root: &mut Option<(String, Value)>) {
    let (name, value) = node.into_value();
    match stack.last_mut() {
        Some(parent) => parent.push_child(name, value),
        None => *root = Some((name, value)),
    }
}
