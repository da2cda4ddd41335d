//! Parsing, selection and serialization of trees.
//!
//! A tree is a plain `serde_json::Value`. Selection walks the namespaces produced by
//! [`Namespace::parse`](crate::namespace::Namespace::parse) and never creates anything.

use crate::errors::Result;
use crate::namespace::Namespace;
use serde_json::{Map, Value};
use std::borrow::Cow;

/// parses JSON text into a tree.
#[inline]
pub fn parse<'a, S>(text: S) -> Result<Value>
where
    S: Into<Cow<'a, str>>,
{
    Ok(serde_json::from_str(&text.into())?)
}

/// creates a new, empty, object tree.
#[inline]
pub fn new_tree() -> Value {
    Value::Object(Map::new())
}

/// deep copies a node.
#[inline]
pub fn clone(node: &Value) -> Value {
    node.clone()
}

#[inline]
pub fn to_text(tree: &Value) -> Result<String> {
    Ok(serde_json::to_string(tree)?)
}

#[inline]
pub fn to_text_pretty(tree: &Value) -> Result<String> {
    Ok(serde_json::to_string_pretty(tree)?)
}

/// resolves `path` against `tree` returning the node found, if any.
///
/// A path that does not resolve is `Ok(None)`; only a malformed path or a filter matching more
/// than one element is an error.
pub fn select<'a>(tree: &'a Value, path: &str) -> Result<Option<&'a Value>> {
    let namespaces = Namespace::parse(path)?;
    walk(tree, &namespaces, path)
}

/// mutable counterpart of [`select`].
pub fn select_mut<'a>(tree: &'a mut Value, path: &str) -> Result<Option<&'a mut Value>> {
    let namespaces = Namespace::parse(path)?;
    walk_mut(tree, &namespaces, path)
}

pub(crate) fn walk<'a>(
    tree: &'a Value,
    namespaces: &[Namespace],
    path: &str,
) -> Result<Option<&'a Value>> {
    let mut current = tree;
    for ns in namespaces {
        let next = match ns {
            Namespace::Object { id } => current.as_object().and_then(|m| m.get(id)),
            Namespace::Array { id, index } => member(current, id)
                .and_then(Value::as_array)
                .and_then(|arr| arr.get(*index)),
            Namespace::Filter { id, filter } => match member(current, id).and_then(Value::as_array)
            {
                Some(arr) => filter.position(arr, path)?.map(|idx| &arr[idx]),
                None => None,
            },
        };
        match next {
            Some(v) => current = v,
            None => return Ok(None),
        }
    }
    Ok(Some(current))
}

pub(crate) fn walk_mut<'a>(
    tree: &'a mut Value,
    namespaces: &[Namespace],
    path: &str,
) -> Result<Option<&'a mut Value>> {
    let mut current = tree;
    for ns in namespaces {
        let next = match ns {
            Namespace::Object { id } => current.as_object_mut().and_then(|m| m.get_mut(id)),
            Namespace::Array { id, index } => member_mut(current, id)
                .and_then(Value::as_array_mut)
                .and_then(|arr| arr.get_mut(*index)),
            Namespace::Filter { id, filter } => {
                match member_mut(current, id).and_then(Value::as_array_mut) {
                    Some(arr) => match filter.position(arr, path)? {
                        Some(idx) => arr.get_mut(idx),
                        None => None,
                    },
                    None => None,
                }
            }
        };
        match next {
            Some(v) => current = v,
            None => return Ok(None),
        }
    }
    Ok(Some(current))
}

// arrays may be addressed without an id eg. the second index of `grid[0][1]`
#[inline]
pub(crate) fn member<'a>(current: &'a Value, id: &str) -> Option<&'a Value> {
    if id.is_empty() {
        Some(current)
    } else {
        current.as_object().and_then(|m| m.get(id))
    }
}

#[inline]
pub(crate) fn member_mut<'a>(current: &'a mut Value, id: &str) -> Option<&'a mut Value> {
    if id.is_empty() {
        Some(current)
    } else {
        current.as_object_mut().and_then(|m| m.get_mut(id))
    }
}
