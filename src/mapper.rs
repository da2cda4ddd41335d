use crate::editor::{add_or_replace_with, check_destination};
use crate::engine;
use crate::errors::{Error, Result};
use crate::path::flatten;
use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// MapOptions controls how a mapped value is written to the destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapOptions {
    /// collapse a composite destination path into one camel cased key instead of building
    /// nested objects.
    pub flatten_composite_destination: bool,

    /// write `null` at the destination when the source path does not resolve.
    pub create_if_source_missing: bool,
}

impl Default for MapOptions {
    fn default() -> Self {
        MapOptions {
            flatten_composite_destination: true,
            create_if_source_missing: false,
        }
    }
}

impl MapOptions {
    #[inline]
    pub fn flatten(mut self, flatten: bool) -> Self {
        self.flatten_composite_destination = flatten;
        self
    }

    #[inline]
    pub fn create_if_missing(mut self, create: bool) -> Self {
        self.create_if_source_missing = create;
        self
    }
}

/// copies the value at `source_path` in `source` to `dest_path` in `dest` using the default
/// options.
#[inline]
pub fn map(dest: &mut Value, dest_path: &str, source: &Value, source_path: &str) -> Result<()> {
    map_with(dest, dest_path, source, source_path, &MapOptions::default())
}

/// copies the value at `path` in `source` to the same path in `dest`.
#[inline]
pub fn map_same(dest: &mut Value, path: &str, source: &Value) -> Result<()> {
    map(dest, path, source, path)
}

/// copies the value at `source_path` in `source` to `dest_path` in `dest`.
///
/// A later mapping to the same destination replaces the earlier one. What happens when the
/// source does not resolve is decided by [`MapOptions::create_if_source_missing`].
pub fn map_with(
    dest: &mut Value,
    dest_path: &str,
    source: &Value,
    source_path: &str,
    options: &MapOptions,
) -> Result<()> {
    let found = engine::select(source, source_path)?.cloned();
    write(dest, dest_path, found, options)
}

/// maps within a single tree, the source value is copied before the destination is written.
pub fn map_self(
    tree: &mut Value,
    dest_path: &str,
    source_path: &str,
    options: &MapOptions,
) -> Result<()> {
    let found = engine::select(tree, source_path)?.cloned();
    write(tree, dest_path, found, options)
}

/// writes a mapped value, `None` meaning the source did not resolve.
pub fn write(
    dest: &mut Value,
    dest_path: &str,
    value: Option<Value>,
    options: &MapOptions,
) -> Result<()> {
    check_destination(dest_path)?;
    match value {
        Some(v) => add_or_replace_with(dest, dest_path, v, options),
        None if options.create_if_source_missing => {
            debug!("source missing, creating '{}' as null", dest_path);
            add_or_replace_with(dest, dest_path, Value::Null, options)
        }
        None => {
            debug!("source missing, skipping '{}'", dest_path);
            Ok(())
        }
    }
}

/// builds a new object from `source`, see [`copy_into`].
#[inline]
pub fn clone_paths<S>(source: &Value, paths: &[S]) -> Result<Value>
where
    S: AsRef<str>,
{
    let mut dest = engine::new_tree();
    copy_into(&mut dest, source, paths)?;
    Ok(dest)
}

/// deep copies parts of `source` into `dest`.
///
/// With no `paths` every top level member is copied under its own key. Otherwise each path that
/// resolves is copied under its flattened name. Unlike [`map`] the first writer wins, a key
/// already present in `dest` is left alone.
pub fn copy_into<S>(dest: &mut Value, source: &Value, paths: &[S]) -> Result<()>
where
    S: AsRef<str>,
{
    let to = dest
        .as_object_mut()
        .ok_or_else(|| Error::NotAContainer(String::from("$")))?;

    if paths.is_empty() {
        if let Some(from) = source.as_object() {
            for (k, v) in from {
                if !to.contains_key(k) {
                    to.insert(k.clone(), engine::clone(v));
                }
            }
        }
        return Ok(());
    }

    for path in paths {
        let path = path.as_ref();
        if let Some(found) = engine::select(source, path)? {
            let key = flatten(path);
            if to.contains_key(&key) {
                debug!("'{}' already copied, keeping the first value", key);
                continue;
            }
            to.insert(key, engine::clone(found));
        }
    }
    Ok(())
}

/// renders `path:value` for every path resolving to a string, number or boolean, joined by `, `.
///
/// Meant for logging and debugging, paths that are missing or hold `null`, objects or arrays
/// are left out.
pub fn to_csv<S>(tree: &Value, paths: &[S]) -> Result<String>
where
    S: AsRef<str>,
{
    let mut entries = Vec::with_capacity(paths.len());
    for path in paths {
        let path = path.as_ref();
        let rendered = match engine::select(tree, path)? {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            Some(Value::Bool(b)) => b.to_string(),
            _ => continue,
        };
        entries.push(format!("{}:{}", path, rendered));
    }
    Ok(entries.join(", "))
}
