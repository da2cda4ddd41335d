use crate::engine::{self, member_mut, walk_mut};
use crate::errors::{Error, Result};
use crate::mapper::MapOptions;
use crate::namespace::Namespace;
use crate::path::{flatten, is_composite, remove_root_prefix, SEPARATOR};
use log::{debug, trace};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// returns true when `path` resolves to a node in `tree`, a present `null` counts as present.
#[inline]
pub fn exists(tree: &Value, path: &str) -> Result<bool> {
    Ok(engine::select(tree, path)?.is_some())
}

/// returns true when `path` resolves to an array.
#[inline]
pub fn is_array(tree: &Value, path: &str) -> Result<bool> {
    Ok(engine::select(tree, path)?.map_or(false, Value::is_array))
}

/// coerces a node into `T`.
///
/// A present `null` is a value like any other, `T` has to be able to hold it (`Option<_>`,
/// `Value`, `()`) or the result is an [`Error::Coercion`].
pub fn coerce<T>(node: &Value, path: &str) -> Result<T>
where
    T: DeserializeOwned,
{
    serde_json::from_value(node.clone()).map_err(|cause| Error::Coercion {
        path: path.to_string(),
        cause,
    })
}

/// resolves `path` and coerces what is found, `None` when nothing is found.
#[inline]
pub fn try_get_value<T>(tree: &Value, path: &str) -> Result<Option<T>>
where
    T: DeserializeOwned,
{
    match engine::select(tree, path)? {
        Some(node) => Ok(Some(coerce(node, path)?)),
        None => Ok(None),
    }
}

/// resolves `path` and coerces what is found, missing values come back as `T::default()`.
#[inline]
pub fn get<T>(tree: &Value, path: &str) -> Result<T>
where
    T: DeserializeOwned + Default,
{
    Ok(try_get_value(tree, path)?.unwrap_or_default())
}

/// top level members of `tree`, empty when `tree` is not an object.
pub fn properties(tree: &Value) -> Vec<(&str, &Value)> {
    tree.as_object()
        .map(|m| m.iter().map(|(k, v)| (k.as_str(), v)).collect())
        .unwrap_or_default()
}

/// writes `value` at `path` using the default [`MapOptions`], which flattens composite paths
/// into a single key.
#[inline]
pub fn add_or_replace(tree: &mut Value, path: &str, value: Value) -> Result<()> {
    add_or_replace_with(tree, path, value, &MapOptions::default())
}

/// same as [`add_or_replace`] but reports failure as `false` instead of an error.
pub fn try_add_or_replace(tree: &mut Value, path: &str, value: Value) -> bool {
    match add_or_replace(tree, path, value) {
        Ok(()) => true,
        Err(e) => {
            debug!("unable to write '{}': {}", path, e);
            false
        }
    }
}

/// writes `value` at `path`, replacing whatever was there.
///
/// When `options` flattens, the value always lands on the single key `flatten(path)`. Otherwise a
/// simple path is written as is and a composite path is expanded into nested objects, reusing
/// objects already present along the way. Descending through a value that is not an object is
/// an [`Error::NotAContainer`].
pub fn add_or_replace_with(
    tree: &mut Value,
    path: &str,
    value: Value,
    options: &MapOptions,
) -> Result<()> {
    check_destination(path)?;
    if options.flatten_composite_destination {
        insert(tree, flatten(path), value)
    } else if !is_composite(path) {
        insert(tree, remove_root_prefix(path).to_string(), value)
    } else {
        insert_nested(tree, remove_root_prefix(path), value)
    }
}

/// a destination becomes key text, so only plain member names are accepted: no indices, filters
/// or quoted members, no empty segments and not the root itself.
pub(crate) fn check_destination(path: &str) -> Result<()> {
    let normalized = remove_root_prefix(path);
    let plain = !normalized.is_empty()
        && normalized != "$"
        && !normalized.contains(|c: char| c == '[' || c == ']')
        && normalized.split(SEPARATOR).all(|segment| !segment.is_empty());
    if plain {
        Ok(())
    } else {
        Err(Error::InvalidPath(format!("'{}' is not a writable destination", path)))
    }
}

#[inline]
fn root_object(tree: &mut Value) -> Result<&mut Map<String, Value>> {
    tree.as_object_mut()
        .ok_or_else(|| Error::NotAContainer(String::from("$")))
}

#[inline]
fn insert(tree: &mut Value, key: String, value: Value) -> Result<()> {
    trace!("writing '{}'", key);
    root_object(tree)?.insert(key, value);
    Ok(())
}

fn insert_nested(tree: &mut Value, path: &str, value: Value) -> Result<()> {
    let mut segments: Vec<&str> = path.split(SEPARATOR).collect();
    let last = segments.pop().unwrap_or_default();

    let mut current = root_object(tree)?;
    for (depth, segment) in segments.iter().enumerate() {
        let next = current
            .entry(*segment)
            .or_insert_with(|| Value::Object(Map::new()));
        current = match next {
            Value::Object(m) => m,
            _ => return Err(Error::NotAContainer(segments[..=depth].join("."))),
        };
    }
    trace!("writing '{}'", path);
    current.insert(last.to_string(), value);
    Ok(())
}

/// removes the node at `path` returning it, `None` when there was nothing to remove.
pub fn remove(tree: &mut Value, path: &str) -> Result<Option<Value>> {
    let mut namespaces = Namespace::parse(path)?;
    let last = match namespaces.pop() {
        Some(ns) => ns,
        None => return Ok(None), // the root itself is never removed
    };
    let parent = match walk_mut(tree, &namespaces, path)? {
        Some(p) => p,
        None => return Ok(None),
    };

    let removed = match last {
        Namespace::Object { id } => parent.as_object_mut().and_then(|m| m.shift_remove(&id)),
        Namespace::Array { id, index } => match member_mut(parent, &id).and_then(Value::as_array_mut)
        {
            Some(arr) if index < arr.len() => Some(arr.remove(index)),
            _ => None,
        },
        Namespace::Filter { id, filter } => {
            match member_mut(parent, &id).and_then(Value::as_array_mut) {
                Some(arr) => filter.position(arr, path)?.map(|idx| arr.remove(idx)),
                None => None,
            }
        }
    };
    Ok(removed)
}

/// removes every one of `paths`, paths that do not resolve are skipped.
pub fn remove_all<S>(tree: &mut Value, paths: &[S]) -> Result<()>
where
    S: AsRef<str>,
{
    for path in paths {
        let path = path.as_ref();
        if remove(tree, path)?.is_none() {
            trace!("nothing to remove at '{}'", path);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn menu() -> Value {
        json!({
            "menu": {
                "id": "file",
                "value": "File",
                "popup": {
                    "menuitem": [
                        {"value": "New", "onclick": "CreateNewDoc()"},
                        {"value": "Open", "onclick": "OpenDoc()"},
                        {"value": "Close", "onclick": "CloseDoc()"}
                    ]
                }
            },
            "id": "Menu1"
        })
    }

    #[test]
    fn test_exists() -> Result<()> {
        let tree = menu();
        assert!(exists(&tree, "id")?);
        assert!(!exists(&tree, "myid")?);
        assert!(exists(&tree, "menu.popup")?);
        assert!(!exists(&tree, "myid.value")?);

        let tree = json!({"nothing": null});
        assert!(exists(&tree, "nothing")?);
        Ok(())
    }

    #[test]
    fn test_is_array() -> Result<()> {
        let tree = menu();
        assert!(!is_array(&tree, "menu.popup")?);
        assert!(is_array(&tree, "menu.popup.menuitem")?);
        assert!(!is_array(&tree, "menu.missing")?);
        Ok(())
    }

    #[test]
    fn test_try_get_value() -> Result<()> {
        let tree = menu();
        assert_eq!(Some(String::from("Menu1")), try_get_value(&tree, "id")?);
        assert_eq!(None, try_get_value::<String>(&tree, "id1")?);
        assert_eq!(String::new(), get::<String>(&tree, "menu.id2")?);
        assert_eq!(String::from("file"), get::<String>(&tree, "menu.id")?);
        Ok(())
    }

    #[test]
    fn test_coercion_failure() {
        let tree = menu();
        match try_get_value::<i64>(&tree, "id") {
            Err(Error::Coercion { path, .. }) => assert_eq!("id", path),
            other => panic!("expected coercion error, got {:?}", other),
        }
        assert!(get::<Vec<String>>(&tree, "menu").is_err());
    }

    #[test]
    fn test_coerce_null() -> Result<()> {
        let tree = json!({"nothing": null});
        assert_eq!(None, get::<Option<i64>>(&tree, "nothing")?);
        assert_eq!(Some(Value::Null), try_get_value::<Value>(&tree, "nothing")?);

        match get::<String>(&tree, "nothing") {
            Err(Error::Coercion { path, .. }) => assert_eq!("nothing", path),
            other => panic!("expected coercion error, got {:?}", other),
        }
        match try_get_value::<i64>(&tree, "nothing") {
            Err(Error::Coercion { .. }) => {}
            other => panic!("expected coercion error, got {:?}", other),
        }
        Ok(())
    }

    #[test]
    fn test_add_or_replace() -> Result<()> {
        let mut tree = menu();
        add_or_replace(&mut tree, "newProperty", json!(1234))?;
        assert_eq!(1234, get::<i64>(&tree, "newProperty")?);

        add_or_replace(&mut tree, "id", json!(1234))?;
        assert_eq!(1234, get::<i64>(&tree, "id")?);

        // replaced in place, no duplicate and the key keeps its position
        let keys: Vec<&str> = properties(&tree).into_iter().map(|(k, _)| k).collect();
        assert_eq!(vec!["menu", "id", "newProperty"], keys);
        Ok(())
    }

    #[test]
    fn test_add_or_replace_flattens() -> Result<()> {
        let mut tree = engine::new_tree();
        add_or_replace(&mut tree, "$.person.home.city", json!("Coolsville"))?;
        assert_eq!(json!({"personHomeCity": "Coolsville"}), tree);
        Ok(())
    }

    #[test]
    fn test_add_or_replace_nested() -> Result<()> {
        let options = MapOptions {
            flatten_composite_destination: false,
            ..MapOptions::default()
        };
        let mut tree = json!({"address": {"line1": "Freaky Town"}});
        add_or_replace_with(&mut tree, "address.line2", json!("Freaksville"), &options)?;
        add_or_replace_with(&mut tree, "$.geo.lat.deg", json!(51), &options)?;
        add_or_replace_with(&mut tree, "name", json!("Scooby"), &options)?;

        let expected = json!({
            "address": {"line1": "Freaky Town", "line2": "Freaksville"},
            "geo": {"lat": {"deg": 51}},
            "name": "Scooby"
        });
        assert_eq!(expected, tree);
        Ok(())
    }

    #[test]
    fn test_add_or_replace_nested_collision() {
        let options = MapOptions {
            flatten_composite_destination: false,
            ..MapOptions::default()
        };
        let mut tree = json!({"address": "somewhere"});
        match add_or_replace_with(&mut tree, "address.line1", json!("x"), &options) {
            Err(Error::NotAContainer(at)) => assert_eq!("address", at),
            other => panic!("expected collision, got {:?}", other),
        }
        assert_eq!(json!({"address": "somewhere"}), tree);
    }

    #[test]
    fn test_add_or_replace_reads_back() -> Result<()> {
        let mut tree = engine::new_tree();
        for path in &["a[0]", "$", "", "a..b", "['x']", "items[?(@.id == 1)]", "a."] {
            match add_or_replace(&mut tree, path, json!(7)) {
                Err(Error::InvalidPath(_)) => {}
                other => panic!("expected invalid path for '{}', got {:?}", path, other),
            }
        }
        assert_eq!(json!({}), tree);

        add_or_replace(&mut tree, "$.a", json!(7))?;
        add_or_replace(&mut tree, "$b", json!(8))?;
        assert_eq!(Some(7), try_get_value(&tree, "a")?);
        assert_eq!(Some(8), try_get_value(&tree, "$b")?);
        Ok(())
    }

    #[test]
    fn test_try_add_or_replace() {
        let mut tree = menu();
        assert!(try_add_or_replace(&mut tree, "newProperty", json!(1234)));

        let mut scalar = json!("not an object");
        assert!(!try_add_or_replace(&mut scalar, "newProperty", json!(1234)));
    }

    #[test]
    fn test_remove_all() -> Result<()> {
        let mut tree = menu();
        let before = menu();
        remove_all::<&str>(&mut tree, &[])?;
        assert_eq!(before, tree);

        remove_all(&mut tree, &["id", "menu.id", "does.not.exist"])?;
        assert!(!exists(&tree, "id")?);
        assert!(!exists(&tree, "menu.id")?);
        assert!(exists(&tree, "menu.value")?);
        assert!(exists(&tree, "menu.popup")?);
        Ok(())
    }

    #[test]
    fn test_remove_array_elements() -> Result<()> {
        let mut tree = menu();
        let removed = remove(&mut tree, "menu.popup.menuitem[?(@.value == 'Open')]")?;
        assert_eq!(Some(json!({"value": "Open", "onclick": "OpenDoc()"})), removed);

        let removed = remove(&mut tree, "menu.popup.menuitem[0]")?;
        assert_eq!(Some(json!({"value": "New", "onclick": "CreateNewDoc()"})), removed);
        assert_eq!(None, remove(&mut tree, "menu.popup.menuitem[5]")?);

        assert_eq!(
            json!([{"value": "Close", "onclick": "CloseDoc()"}]),
            tree["menu"]["popup"]["menuitem"]
        );
        Ok(())
    }

    #[test]
    fn test_properties() {
        let tree = menu();
        assert_eq!(2, properties(&tree).len());
        assert!(properties(&json!([1, 2])).is_empty());
    }
}
