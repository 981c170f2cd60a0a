//! Shared document graph
//!
//! `serde_json::Value` owns its children, so a parsed body can never refer
//! back to itself. Callers that assemble bodies in code sometimes alias
//! containers instead (a product whose `related` list holds the product
//! itself). `Document` models that shape with reference-counted containers,
//! and [`crate::sanitizer::sanitize_document`] walks it without looping.
//!
//! A cyclic document leaks unless one of its containers is [`Document::clear`]ed.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use serde_json::{Map, Number, Value};

use crate::error::DocumentError;

pub type ArrayRef = Rc<RefCell<Vec<Document>>>;
pub type ObjectRef = Rc<RefCell<BTreeMap<String, Document>>>;

#[derive(Clone)]
pub enum Document {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Array(ArrayRef),
    Object(ObjectRef),
}

impl Document {
    pub fn array(items: Vec<Document>) -> Self {
        Document::Array(Rc::new(RefCell::new(items)))
    }

    pub fn object<K: Into<String>>(entries: Vec<(K, Document)>) -> Self {
        let map = entries
            .into_iter()
            .map(|(key, value)| (key.into(), value))
            .collect();
        Document::Object(Rc::new(RefCell::new(map)))
    }

    /// True when both documents are the same container instance.
    /// Scalars are never pointer-equal.
    pub fn ptr_eq(&self, other: &Document) -> bool {
        match (self, other) {
            (Document::Array(a), Document::Array(b)) => Rc::ptr_eq(a, b),
            (Document::Object(a), Document::Object(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Document::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn push(&self, item: Document) -> Result<(), DocumentError> {
        match self {
            Document::Array(items) => {
                items.borrow_mut().push(item);
                Ok(())
            }
            _ => Err(DocumentError::NotAnArray),
        }
    }

    pub fn insert(&self, key: impl Into<String>, value: Document) -> Result<(), DocumentError> {
        match self {
            Document::Object(entries) => {
                entries.borrow_mut().insert(key.into(), value);
                Ok(())
            }
            _ => Err(DocumentError::NotAnObject),
        }
    }

    /// Element at `index` of an array (a cheap handle clone)
    pub fn index(&self, index: usize) -> Option<Document> {
        match self {
            Document::Array(items) => items.borrow().get(index).cloned(),
            _ => None,
        }
    }

    /// Value under `key` of an object (a cheap handle clone)
    pub fn get(&self, key: &str) -> Option<Document> {
        match self {
            Document::Object(entries) => entries.borrow().get(key).cloned(),
            _ => None,
        }
    }

    /// Empty this container, dropping any cycle that runs through it.
    pub fn clear(&self) {
        match self {
            Document::Array(items) => items.borrow_mut().clear(),
            Document::Object(entries) => entries.borrow_mut().clear(),
            _ => {}
        }
    }

    /// Convert to JSON. Fails if a container contains itself.
    pub fn to_value(&self) -> Result<Value, DocumentError> {
        let mut ancestors = Vec::new();
        to_value_inner(self, &mut ancestors)
    }
}

fn to_value_inner(doc: &Document, ancestors: &mut Vec<*const ()>) -> Result<Value, DocumentError> {
    Ok(match doc {
        Document::Null => Value::Null,
        Document::Bool(b) => Value::Bool(*b),
        Document::Number(n) => Value::Number(n.clone()),
        Document::String(s) => Value::String(s.clone()),
        Document::Array(items) => {
            let id = Rc::as_ptr(items) as *const ();
            if ancestors.contains(&id) {
                return Err(DocumentError::Cycle);
            }
            ancestors.push(id);
            let values = items
                .borrow()
                .iter()
                .map(|item| to_value_inner(item, ancestors))
                .collect::<Result<Vec<_>, _>>()?;
            ancestors.pop();
            Value::Array(values)
        }
        Document::Object(entries) => {
            let id = Rc::as_ptr(entries) as *const ();
            if ancestors.contains(&id) {
                return Err(DocumentError::Cycle);
            }
            ancestors.push(id);
            let mut map = Map::new();
            for (key, value) in entries.borrow().iter() {
                map.insert(key.clone(), to_value_inner(value, ancestors)?);
            }
            ancestors.pop();
            Value::Object(map)
        }
    })
}

impl From<Value> for Document {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Document::Null,
            Value::Bool(b) => Document::Bool(b),
            Value::Number(n) => Document::Number(n),
            Value::String(s) => Document::String(s),
            Value::Array(items) => Document::array(items.into_iter().map(Document::from).collect()),
            Value::Object(map) => Document::object(
                map.into_iter()
                    .map(|(key, value)| (key, Document::from(value)))
                    .collect(),
            ),
        }
    }
}

impl From<&str> for Document {
    fn from(value: &str) -> Self {
        Document::String(value.to_string())
    }
}

impl From<String> for Document {
    fn from(value: String) -> Self {
        Document::String(value)
    }
}

impl TryFrom<&Document> for Value {
    type Error = DocumentError;

    fn try_from(doc: &Document) -> Result<Self, Self::Error> {
        doc.to_value()
    }
}

// Containers print as a summary; a derived impl would recurse forever on a cycle.
impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Document::Null => f.write_str("Null"),
            Document::Bool(b) => write!(f, "Bool({b})"),
            Document::Number(n) => write!(f, "Number({n})"),
            Document::String(s) => write!(f, "String({s:?})"),
            Document::Array(items) => {
                let ptr = Rc::as_ptr(items);
                match items.try_borrow() {
                    Ok(list) => write!(f, "Array({ptr:p}, len={})", list.len()),
                    Err(_) => write!(f, "Array({ptr:p}, borrowed)"),
                }
            }
            Document::Object(entries) => {
                let ptr = Rc::as_ptr(entries);
                match entries.try_borrow() {
                    Ok(map) => {
                        let keys: Vec<_> = map.keys().collect();
                        write!(f, "Object({ptr:p}, keys={keys:?})")
                    }
                    Err(_) => write!(f, "Object({ptr:p}, borrowed)"),
                }
            }
        }
    }
}
