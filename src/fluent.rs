//! Chainable combinators over a tree.
//!
//! Every mutating method hands back the tree it was called on, so a destination can be built up
//! in one expression:
//!
//! ```rust
//! use jsonmapper::prelude::*;
//! use jsonmapper::errors::Result;
//! use serde_json::json;
//!
//! fn build() -> Result<()> {
//!     let source = json!({"id": "Menu1", "menu": {"value": "File"}});
//!
//!     let mut mapped = jsonmapper::engine::new_tree();
//!     mapped
//!         .map("newId", &source, "id")?
//!         .map("newObject.value", &source, "menu.value")?
//!         .add_or_replace("additionalProperty", 123)?
//!         .apply_if_exists("newId", |tree| {
//!             tree.add_or_replace("hasId", true)?;
//!             Ok(())
//!         })?;
//!
//!     assert_eq!("Menu1", mapped.get_or_default::<String>("newId")?);
//!     assert_eq!("File", mapped.get_or_default::<String>("newObjectValue")?);
//!     assert!(mapped.get_or_default::<bool>("hasId")?);
//!     Ok(())
//! }
//! # build().unwrap();
//! ```

use crate::editor;
use crate::engine;
use crate::errors::Result;
use crate::mapper::{self, MapOptions};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

/// JsonTree adds path based reads, writes and conditional combinators to `serde_json::Value`.
pub trait JsonTree {
    fn exists(&self, path: &str) -> Result<bool>;

    fn is_array_at(&self, path: &str) -> Result<bool>;

    /// coerces the value at `path`, `None` when it is missing.
    fn try_get_value<T>(&self, path: &str) -> Result<Option<T>>
    where
        T: DeserializeOwned;

    /// coerces the value at `path`, `T::default()` when it is missing.
    fn get_or_default<T>(&self, path: &str) -> Result<T>
    where
        T: DeserializeOwned + Default;

    fn properties(&self) -> Vec<(&str, &Value)>;

    fn clone_paths<S>(&self, paths: &[S]) -> Result<Value>
    where
        S: AsRef<str>;

    fn to_csv<S>(&self, paths: &[S]) -> Result<String>
    where
        S: AsRef<str>;

    fn add_or_replace<V>(&mut self, path: &str, value: V) -> Result<&mut Self>
    where
        V: Into<Value>;

    fn add_or_replace_with<V>(
        &mut self,
        path: &str,
        value: V,
        options: &MapOptions,
    ) -> Result<&mut Self>
    where
        V: Into<Value>;

    fn try_add_or_replace<V>(&mut self, path: &str, value: V) -> bool
    where
        V: Into<Value>;

    /// writes the value `producer` builds from the tree as it currently is, adding `path` or
    /// replacing what is there.
    fn add_or_replace_from<R, F>(&mut self, path: &str, producer: F) -> Result<&mut Self>
    where
        R: Serialize,
        F: FnOnce(&Self) -> R;

    fn remove_all<S>(&mut self, paths: &[S]) -> Result<&mut Self>
    where
        S: AsRef<str>;

    fn map(&mut self, dest_path: &str, source: &Value, source_path: &str) -> Result<&mut Self>;

    fn map_with(
        &mut self,
        dest_path: &str,
        source: &Value,
        source_path: &str,
        options: &MapOptions,
    ) -> Result<&mut Self>;

    fn map_same(&mut self, path: &str, source: &Value) -> Result<&mut Self>;

    fn map_self(
        &mut self,
        dest_path: &str,
        source_path: &str,
        options: &MapOptions,
    ) -> Result<&mut Self>;

    /// runs `mutator` when `predicate`, given the tree, returns true.
    fn apply_if<P, F>(&mut self, predicate: P, mutator: F) -> Result<&mut Self>
    where
        P: FnOnce(&Self) -> bool,
        F: FnOnce(&mut Self) -> Result<()>;

    /// runs `mutator` when `predicate` returns true.
    fn apply_when<P, F>(&mut self, predicate: P, mutator: F) -> Result<&mut Self>
    where
        P: FnOnce() -> bool,
        F: FnOnce(&mut Self) -> Result<()>;

    fn apply_if_exists<F>(&mut self, path: &str, mutator: F) -> Result<&mut Self>
    where
        F: FnOnce(&mut Self) -> Result<()>;

    /// runs `mutator` with a copy of the node found at `path`, if any.
    fn apply_if_exists_with<F>(&mut self, path: &str, mutator: F) -> Result<&mut Self>
    where
        F: FnOnce(&mut Self, Value) -> Result<()>;

    fn apply_if_not_exists<F>(&mut self, path: &str, mutator: F) -> Result<&mut Self>
    where
        F: FnOnce(&mut Self) -> Result<()>;

    /// replaces the value at `path` with `transform` applied to it, nothing happens when `path`
    /// is missing. The result may be of a different type than the original.
    fn update<T, R, F>(&mut self, path: &str, transform: F) -> Result<&mut Self>
    where
        T: DeserializeOwned,
        R: Serialize,
        F: FnOnce(T) -> R;

    /// replaces the value at `path` with `value` when `path` exists.
    fn update_value<R>(&mut self, path: &str, value: R) -> Result<&mut Self>
    where
        R: Serialize;
}

impl JsonTree for Value {
    #[inline]
    fn exists(&self, path: &str) -> Result<bool> {
        editor::exists(self, path)
    }

    #[inline]
    fn is_array_at(&self, path: &str) -> Result<bool> {
        editor::is_array(self, path)
    }

    #[inline]
    fn try_get_value<T>(&self, path: &str) -> Result<Option<T>>
    where
        T: DeserializeOwned,
    {
        editor::try_get_value(self, path)
    }

    #[inline]
    fn get_or_default<T>(&self, path: &str) -> Result<T>
    where
        T: DeserializeOwned + Default,
    {
        editor::get(self, path)
    }

    #[inline]
    fn properties(&self) -> Vec<(&str, &Value)> {
        editor::properties(self)
    }

    #[inline]
    fn clone_paths<S>(&self, paths: &[S]) -> Result<Value>
    where
        S: AsRef<str>,
    {
        mapper::clone_paths(self, paths)
    }

    #[inline]
    fn to_csv<S>(&self, paths: &[S]) -> Result<String>
    where
        S: AsRef<str>,
    {
        mapper::to_csv(self, paths)
    }

    #[inline]
    fn add_or_replace<V>(&mut self, path: &str, value: V) -> Result<&mut Self>
    where
        V: Into<Value>,
    {
        editor::add_or_replace(self, path, value.into())?;
        Ok(self)
    }

    #[inline]
    fn add_or_replace_with<V>(
        &mut self,
        path: &str,
        value: V,
        options: &MapOptions,
    ) -> Result<&mut Self>
    where
        V: Into<Value>,
    {
        editor::add_or_replace_with(self, path, value.into(), options)?;
        Ok(self)
    }

    #[inline]
    fn try_add_or_replace<V>(&mut self, path: &str, value: V) -> bool
    where
        V: Into<Value>,
    {
        editor::try_add_or_replace(self, path, value.into())
    }

    fn add_or_replace_from<R, F>(&mut self, path: &str, producer: F) -> Result<&mut Self>
    where
        R: Serialize,
        F: FnOnce(&Self) -> R,
    {
        let value = serde_json::to_value(producer(self))?;
        editor::add_or_replace(self, path, value)?;
        Ok(self)
    }

    #[inline]
    fn remove_all<S>(&mut self, paths: &[S]) -> Result<&mut Self>
    where
        S: AsRef<str>,
    {
        editor::remove_all(self, paths)?;
        Ok(self)
    }

    #[inline]
    fn map(&mut self, dest_path: &str, source: &Value, source_path: &str) -> Result<&mut Self> {
        mapper::map(self, dest_path, source, source_path)?;
        Ok(self)
    }

    #[inline]
    fn map_with(
        &mut self,
        dest_path: &str,
        source: &Value,
        source_path: &str,
        options: &MapOptions,
    ) -> Result<&mut Self> {
        mapper::map_with(self, dest_path, source, source_path, options)?;
        Ok(self)
    }

    #[inline]
    fn map_same(&mut self, path: &str, source: &Value) -> Result<&mut Self> {
        mapper::map_same(self, path, source)?;
        Ok(self)
    }

    #[inline]
    fn map_self(
        &mut self,
        dest_path: &str,
        source_path: &str,
        options: &MapOptions,
    ) -> Result<&mut Self> {
        mapper::map_self(self, dest_path, source_path, options)?;
        Ok(self)
    }

    fn apply_if<P, F>(&mut self, predicate: P, mutator: F) -> Result<&mut Self>
    where
        P: FnOnce(&Self) -> bool,
        F: FnOnce(&mut Self) -> Result<()>,
    {
        if predicate(self) {
            mutator(self)?;
        }
        Ok(self)
    }

    fn apply_when<P, F>(&mut self, predicate: P, mutator: F) -> Result<&mut Self>
    where
        P: FnOnce() -> bool,
        F: FnOnce(&mut Self) -> Result<()>,
    {
        if predicate() {
            mutator(self)?;
        }
        Ok(self)
    }

    fn apply_if_exists<F>(&mut self, path: &str, mutator: F) -> Result<&mut Self>
    where
        F: FnOnce(&mut Self) -> Result<()>,
    {
        if editor::exists(self, path)? {
            mutator(self)?;
        }
        Ok(self)
    }

    fn apply_if_exists_with<F>(&mut self, path: &str, mutator: F) -> Result<&mut Self>
    where
        F: FnOnce(&mut Self, Value) -> Result<()>,
    {
        if let Some(node) = engine::select(self, path)?.cloned() {
            mutator(self, node)?;
        }
        Ok(self)
    }

    fn apply_if_not_exists<F>(&mut self, path: &str, mutator: F) -> Result<&mut Self>
    where
        F: FnOnce(&mut Self) -> Result<()>,
    {
        if !editor::exists(self, path)? {
            mutator(self)?;
        }
        Ok(self)
    }

    fn update<T, R, F>(&mut self, path: &str, transform: F) -> Result<&mut Self>
    where
        T: DeserializeOwned,
        R: Serialize,
        F: FnOnce(T) -> R,
    {
        if let Some(current) = editor::try_get_value::<T>(self, path)? {
            let updated = serde_json::to_value(transform(current))?;
            editor::add_or_replace(self, path, updated)?;
        }
        Ok(self)
    }

    fn update_value<R>(&mut self, path: &str, value: R) -> Result<&mut Self>
    where
        R: Serialize,
    {
        if editor::exists(self, path)? {
            editor::add_or_replace(self, path, serde_json::to_value(value)?)?;
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::new_tree;
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
    fn test_if_exists() -> Result<()> {
        let mut json = menu();
        json.apply_if_exists("id", |j| {
            j.add_or_replace("newProperty", 123)?;
            Ok(())
        })?;
        assert_eq!(123, json.get_or_default::<i64>("newProperty")?);

        let mut json = menu();
        json.apply_if_exists("id1", |j| {
            j.add_or_replace("newProperty", 123)?;
            Ok(())
        })?;
        assert!(!json.exists("newProperty")?);
        Ok(())
    }

    #[test]
    fn test_if_not_exists() -> Result<()> {
        let mut json = menu();
        json.apply_if_not_exists("id1", |j| {
            j.add_or_replace("newProperty", 123)?;
            Ok(())
        })?;
        assert_eq!(123, json.get_or_default::<i64>("newProperty")?);

        let mut json = menu();
        json.apply_if_not_exists("id", |j| {
            j.add_or_replace("newProperty", 123)?;
            Ok(())
        })?;
        assert!(!json.exists("newProperty")?);
        Ok(())
    }

    #[test]
    fn test_apply_if() -> Result<()> {
        let mut json = menu();
        json.apply_if(|_| true, |j| {
            j.add_or_replace("newProperty", 123)?;
            Ok(())
        })?;
        assert_eq!(123, json.get_or_default::<i64>("newProperty")?);

        let mut json = menu();
        json.apply_if(
            |j| j.get_or_default::<String>("id").map(|id| id == "Other").unwrap_or(false),
            |j| {
                j.add_or_replace("newProperty", 123)?;
                Ok(())
            },
        )?;
        assert!(!json.exists("newProperty")?);

        let enabled = false;
        json.apply_when(|| enabled, |j| {
            j.add_or_replace("newProperty", 123)?;
            Ok(())
        })?;
        assert!(!json.exists("newProperty")?);
        Ok(())
    }

    #[test]
    fn test_mutator_error_propagates() {
        let mut json = menu();
        let res = json.apply_if_exists("id", |j| {
            j.get_or_default::<i64>("id")?;
            Ok(())
        });
        assert!(res.is_err());
    }

    #[test]
    fn test_update() -> Result<()> {
        let mut json = menu();
        json.update("id", |_: String| "hello")?;
        assert_eq!("hello", json.get_or_default::<String>("id")?);

        let mut json = menu();
        json.update("id", |s: String| s.len() as i64 * 1000)?;
        assert_eq!(5000, json.get_or_default::<i64>("id")?);

        let mut json = menu();
        json.update("id1", |_: String| "hello")?;
        assert!(!json.exists("id1")?);
        Ok(())
    }

    #[test]
    fn test_update_value() -> Result<()> {
        let mut json = menu();
        json.update_value("id", "hello")?;
        assert_eq!("hello", json.get_or_default::<String>("id")?);

        json.update_value("id", 1234)?;
        assert_eq!(1234, json.get_or_default::<i64>("id")?);

        json.update_value("missing", 1234)?;
        assert!(!json.exists("missing")?);
        Ok(())
    }

    #[test]
    fn test_update_wrong_type() {
        let mut json = menu();
        assert!(json.update("menu", |s: String| s).is_err());
    }

    #[test]
    fn test_update_null() -> Result<()> {
        let mut json = json!({"age": null});
        let res = json.update("age", |n: i64| n + 10);
        assert!(res.is_err());
        assert_eq!(json!({"age": null}), json);

        json.update("age", |n: Option<i64>| n.map_or(1, |n| n + 10))?;
        assert_eq!(json!({"age": 1}), json);
        Ok(())
    }

    #[test]
    fn test_add_or_replace_from() -> Result<()> {
        let mut json = menu();
        json.add_or_replace_from("itemCount", |j| {
            j["menu"]["popup"]["menuitem"]
                .as_array()
                .map_or(0, Vec::len)
        })?;
        assert_eq!(3, json.get_or_default::<i64>("itemCount")?);

        json.add_or_replace_from("id", |_| 1234)?
            .add_or_replace_from("label", |j| {
                format!("{}:{}", j["id"], j["menu"]["value"].as_str().unwrap_or_default())
            })?;
        assert_eq!(1234, json.get_or_default::<i64>("id")?);
        assert_eq!("1234:File", json.get_or_default::<String>("label")?);

        let keys: Vec<&str> = json.properties().into_iter().map(|(k, _)| k).collect();
        assert_eq!(vec!["menu", "id", "itemCount", "label"], keys);
        Ok(())
    }

    #[test]
    fn test_building_up_objects() -> Result<()> {
        let mut address = new_tree();
        address
            .add_or_replace("line1", "Freaky Town")?
            .add_or_replace("line2", "Freaksville")?;

        let mut jo = new_tree();
        jo.add_or_replace("name", "Scooby Doo")?
            .add_or_replace("age", 23)?
            .add_or_replace("address", address)?;

        assert_eq!("Scooby Doo", jo.get_or_default::<String>("name")?);
        assert_eq!(23, jo.get_or_default::<i64>("age")?);
        assert_eq!("Freaky Town", jo.get_or_default::<String>("address.line1")?);
        assert_eq!("Freaksville", jo.get_or_default::<String>("address.line2")?);
        Ok(())
    }

    #[test]
    fn test_conditional_change() -> Result<()> {
        let mut jo = new_tree();
        jo.add_or_replace("name", "Scooby Doo")?
            .add_or_replace("age", 23)?
            .apply_if_exists("name", |o| {
                o.add_or_replace("name", "Scrappy Doo")?;
                Ok(())
            })?
            .apply_if_exists_with("age", |o, token| {
                let current_age: i64 = editor::coerce(&token, "age")?;
                o.update_value("age", current_age - 10)?;
                Ok(())
            })?;

        assert_eq!("Scrappy Doo", jo.get_or_default::<String>("name")?);
        assert_eq!(13, jo.get_or_default::<i64>("age")?);
        Ok(())
    }

    #[test]
    fn test_mapping_and_adding() -> Result<()> {
        let json = menu();
        let mut mapped = new_tree();
        mapped
            .map("newId", &json, "id")?
            .map("openDoc", &json, "menu.popup.menuitem[?(@.value == 'Open')]")?
            .map_with(
                "newObject.value",
                &json,
                "menu.value",
                &MapOptions::default().flatten(false),
            )?
            .add_or_replace("additionalProperty", 123)?;

        assert_eq!("Menu1", mapped.get_or_default::<String>("newId")?);
        assert_eq!("OpenDoc()", mapped.get_or_default::<String>("openDoc.onclick")?);
        assert_eq!("File", mapped.get_or_default::<String>("newObject.value")?);
        assert_eq!(123, mapped.get_or_default::<i64>("additionalProperty")?);
        Ok(())
    }

    #[test]
    fn test_self_mapping() -> Result<()> {
        let mut json = menu();
        json.map_self("menuId", "id", &MapOptions::default())?
            .map_self("id", "id1", &MapOptions::default().create_if_missing(true))?;
        assert_eq!("Menu1", json.get_or_default::<String>("menuId")?);
        assert!(json.exists("id")?);
        assert_eq!(Value::Null, json["id"]);
        Ok(())
    }

    #[test]
    fn test_remove_and_clone() -> Result<()> {
        let mut json = menu();
        json.remove_all(&["menu.popup"])?;
        assert!(!json.exists("menu.popup")?);

        let copy = json.clone_paths(&["id", "menu"])?;
        assert!(copy.exists("id")?);
        assert!(copy.exists("menu")?);
        assert_eq!("id:Menu1", copy.to_csv(&["id"])?);
        assert_eq!(2, copy.properties().len());
        assert!(!copy.is_array_at("menu")?);
        Ok(())
    }
}
