//! # jsonmapper
//!
//! jsonmapper builds new JSON objects out of existing ones by copying, renaming, flattening or
//! computing values addressed by dotted paths such as `menu.popup.menuitem[0]` or
//! `$.items[?(@.name == 'x')]`.
//!
//! Values that are not found are simply skipped unless asked otherwise through [`MapOptions`],
//! by default a composite destination like `person.home.city` is flattened into the single key
//! `personHomeCity`.
//!
//! [`MapOptions`]: mapper::MapOptions
//!
//! ```rust
//! use jsonmapper::prelude::*;
//! use jsonmapper::errors::Result;
//! use serde_json::json;
//!
//! fn test_example() -> Result<()> {
//!     let source = jsonmapper::engine::parse(r#"
//!         {
//!             "id": "Menu1",
//!             "menu": {
//!                 "value": "File",
//!                 "popup": {"menuitem": [{"value": "Open", "onclick": "OpenDoc()"}]}
//!             }
//!         }"#)?;
//!
//!     let mut dest = jsonmapper::engine::new_tree();
//!     dest.map("menuId", &source, "id")?
//!         .map("menu.value", &source, "$.menu.value")?
//!         .map_with(
//!             "actions.open",
//!             &source,
//!             "menu.popup.menuitem[?(@.value == 'Open')].onclick",
//!             &MapOptions::default().flatten(false),
//!         )?
//!         .apply_if_not_exists("version", |d| {
//!             d.add_or_replace("version", 1)?;
//!             Ok(())
//!         })?;
//!
//!     let expected = json!({
//!         "menuId": "Menu1",
//!         "menuValue": "File",
//!         "actions": {"open": "OpenDoc()"},
//!         "version": 1
//!     });
//!     assert_eq!(expected, dest);
//!     Ok(())
//! }
//! # test_example().unwrap();
//! ```
//!
//! or store the mappings and apply them to many inputs
//!
//! ```rust
//! use jsonmapper::prelude::*;
//! use jsonmapper::errors::Result;
//! use serde::{Serialize, Deserialize};
//!
//! fn test_struct() -> Result<()> {
//!     #[derive(Debug, Serialize)]
//!     struct From {
//!         existing: String,
//!     }
//!
//!     #[derive(Debug, Deserialize, PartialEq)]
//!     struct To {
//!         new: String,
//!     }
//!
//!     let trans = TransformerBuilder::default()
//!         .add_direct("existing", "new")?
//!         .build()?;
//!
//!     let from = From {
//!         existing: String::from("existing_value"),
//!     };
//!
//!     let expected = To {
//!         new: String::from("existing_value"),
//!     };
//!     let res: To = trans.apply_to(from)?;
//!     assert_eq!(expected, res);
//!     Ok(())
//! }
//! # test_struct().unwrap();
//! ```
//!
pub mod editor;
pub mod engine;
pub mod errors;
pub mod fluent;
pub mod mapper;
pub mod namespace;
pub mod path;
pub mod rules;
pub mod transformer;

pub mod prelude {
    pub use crate::fluent::JsonTree;
    pub use crate::mapper::MapOptions;
    pub use crate::rules::{Mapping, Rule};
    pub use crate::transformer::{Mode, TransformerBuilder};
}
