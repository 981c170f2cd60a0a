//! Markup sanitization for accepted request bodies
//!
//! Strings keep their content but lose script and iframe blocks, inline
//! event handler attributes and `javascript:` / `data:text/html` schemes.
//! Anything else, including `&` and quotes, is preserved; only surrounding
//! whitespace is trimmed.

use std::borrow::Cow;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;

use crate::document::Document;

lazy_static! {
    /// `<script ...>...</script>`, up to the first closing tag
    static ref SCRIPT_BLOCK: Regex = Regex::new(r"(?is)<script\b[^>]*>.*?</script\s*>").unwrap();

    /// `<iframe ...>...</iframe>`, up to the first closing tag
    static ref IFRAME_BLOCK: Regex = Regex::new(r"(?is)<iframe\b[^>]*>.*?</iframe\s*>").unwrap();

    /// `onclick="..."`, `onload='...'` and unquoted `onerror=value`
    static ref EVENT_HANDLER: Regex =
        Regex::new(r#"(?i)\s*\bon\w+\s*=\s*(?:"[^"]*"|'[^']*'|[^\s>]*)"#).unwrap();

    static ref JAVASCRIPT_SCHEME: Regex = Regex::new(r"(?i)javascript:").unwrap();

    static ref DATA_HTML_SCHEME: Regex = Regex::new(r"(?i)data:text/html").unwrap();
}

/// Removal passes attempted before falling back to [`neutralize`]
const MAX_PASSES: usize = 8;

/// Sanitize a single string.
///
/// The removal pass is repeated until nothing changes, so a removal that
/// splices a new `<script>` or `javascript:` together is caught as well.
/// Input still changing after `MAX_PASSES` passes is neutralized instead,
/// which keeps the work linear in the input size. Either way the result is
/// a fixed point: sanitizing it again returns it unchanged.
pub fn sanitize_str(value: &str) -> String {
    sanitize_counted(value).0
}

/// Sanitized string plus the number of removal passes it took
fn sanitize_counted(value: &str) -> (String, usize) {
    let mut current = value.to_string();
    for pass in 1..=MAX_PASSES {
        let next = strip_once(&current);
        if next == current {
            return (current, pass);
        }
        current = next;
    }

    tracing::warn!(
        len = current.len(),
        "markup still changing after {} sanitize passes, neutralizing",
        MAX_PASSES
    );
    (neutralize(&current), MAX_PASSES)
}

/// Entity-escape `<`, `=` and `:` after one last removal pass.
///
/// Every removal pattern needs at least one of those characters, so the
/// output is left alone by [`strip_once`] apart from trimming, and it is
/// already trimmed.
fn neutralize(value: &str) -> String {
    let stripped = strip_once(value);
    let mut output = String::with_capacity(stripped.len());
    for c in stripped.chars() {
        match c {
            '<' => output.push_str("&lt;"),
            '=' => output.push_str("&#61;"),
            ':' => output.push_str("&#58;"),
            _ => output.push(c),
        }
    }
    output
}

fn strip_once(value: &str) -> String {
    let value = SCRIPT_BLOCK.replace_all(value, "");
    let value = replace_owned(&IFRAME_BLOCK, value);
    let value = replace_owned(&EVENT_HANDLER, value);
    let value = replace_owned(&JAVASCRIPT_SCHEME, value);
    let value = replace_owned(&DATA_HTML_SCHEME, value);
    value.trim().to_string()
}

fn replace_owned<'a>(pattern: &Regex, value: Cow<'a, str>) -> Cow<'a, str> {
    let replaced = match pattern.replace_all(&value, "") {
        Cow::Borrowed(_) => None,
        Cow::Owned(replaced) => Some(replaced),
    };
    replaced.map_or(value, Cow::Owned)
}

/// Sanitize every string reachable from `value`, in place.
///
/// Parsed JSON is an owned tree and cannot refer back to itself, so the
/// recursion always terminates. Its depth is bounded by the parser's own
/// nesting limit.
pub fn sanitize_json_value(value: &mut Value) {
    match value {
        Value::String(s) => {
            *s = sanitize_str(s);
        }
        Value::Array(items) => {
            for item in items {
                sanitize_json_value(item);
            }
        }
        Value::Object(map) => {
            for (_, v) in map {
                sanitize_json_value(v);
            }
        }
        Value::Null | Value::Bool(_) | Value::Number(_) => {}
    }
}

/// Owned variant of [`sanitize_json_value`]
pub fn sanitize(mut value: Value) -> Value {
    sanitize_json_value(&mut value);
    value
}

/// Sanitize a shared document graph.
///
/// Containers are rebuilt, except that a container reached again while it
/// is still being sanitized (a cycle back to one of its ancestors) is
/// returned as the very same instance instead of being descended into.
/// Containers shared without forming a cycle are sanitized at each place
/// they appear.
pub fn sanitize_document(doc: &Document) -> Document {
    let mut ancestors = Vec::new();
    sanitize_node(doc, &mut ancestors)
}

fn sanitize_node(doc: &Document, ancestors: &mut Vec<*const ()>) -> Document {
    match doc {
        Document::String(s) => Document::String(sanitize_str(s)),
        Document::Array(items) => {
            let id = Rc::as_ptr(items) as *const ();
            if ancestors.contains(&id) {
                return doc.clone();
            }
            ancestors.push(id);
            let cleaned: Vec<Document> = items
                .borrow()
                .iter()
                .map(|item| sanitize_node(item, ancestors))
                .collect();
            ancestors.pop();
            Document::Array(Rc::new(RefCell::new(cleaned)))
        }
        Document::Object(entries) => {
            let id = Rc::as_ptr(entries) as *const ();
            if ancestors.contains(&id) {
                return doc.clone();
            }
            ancestors.push(id);
            let cleaned: BTreeMap<String, Document> = entries
                .borrow()
                .iter()
                .map(|(key, value)| (key.clone(), sanitize_node(value, ancestors)))
                .collect();
            ancestors.pop();
            Document::Object(Rc::new(RefCell::new(cleaned)))
        }
        Document::Null | Document::Bool(_) | Document::Number(_) => doc.clone(),
    }
}
