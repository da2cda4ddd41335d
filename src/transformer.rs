use crate::engine;
use crate::errors::Result;
use crate::mapper::MapOptions;
use crate::rules::{Mapping, Rule};
use log::trace;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::borrow::Cow;

/// Mode decides what a Transformer does with a top level array. `Many2Many` maps every element
/// on its own and returns an array, `One2One` hands the whole array to the rules as one input so
/// elements can be addressed as `[0]`, `[1]`...
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub enum Mode {
    One2One,
    Many2Many, // does One2One when input is NOT an array
}

impl Default for Mode {
    fn default() -> Self {
        Mode::Many2Many
    }
}

/// TransformerBuilder is used to construct a new Transformer. Once a Transformer is built it is
/// immutable.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct TransformerBuilder {
    rules: Vec<Box<dyn Rule>>,
    mode: Mode,
}

impl TransformerBuilder {
    /// sets the mode for which the Transformer will operate.
    #[inline]
    pub fn mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    /// add allows any custom rule(s) to be added to the transformation beyond the built-in ones.
    #[inline]
    pub fn add<R>(mut self, rule: R) -> Result<Self>
    where
        R: Rule + 'static,
    {
        self.rules.push(Box::new(rule));
        Ok(self)
    }

    /// adds mappings that may have been saved outside of this library for building UI's or other
    /// means of generically building transformations.
    #[inline]
    pub fn add_mappings(mut self, mappings: Vec<Mapping>) -> Result<Self> {
        for mapping in mappings {
            self = self.add_mapping(mapping)?;
        }
        Ok(self)
    }

    /// adds a single mapping that may have been saved outside of this library for building UI's or
    /// other means of generically building transformations.
    #[inline]
    pub fn add_mapping(mut self, mapping: Mapping) -> Result<Self> {
        self.rules.push(mapping.parse()?);
        Ok(self)
    }

    /// adds a direct mapping from an existing value to a new value on the output using the
    /// default options.
    #[inline]
    pub fn add_direct<'a, S>(self, from: S, to: S) -> Result<Self>
    where
        S: Into<Cow<'a, str>>,
    {
        self.add_direct_with(from, to, MapOptions::default())
    }

    #[inline]
    pub fn add_direct_with<'a, S>(self, from: S, to: S, options: MapOptions) -> Result<Self>
    where
        S: Into<Cow<'a, str>>,
    {
        self.add_mapping(Mapping::Direct {
            from: from.into(),
            to: to.into(),
            options,
        })
    }

    /// adds a constant value to a value on the output.
    #[inline]
    pub fn add_constant<'a, S, F>(self, from: F, to: S) -> Result<Self>
    where
        S: Into<Cow<'a, str>>,
        F: Into<Value>,
    {
        self.add_mapping(Mapping::Constant {
            from: from.into(),
            to: to.into(),
            options: MapOptions::default(),
        })
    }

    /// removes paths from the output built by the preceding rules.
    #[inline]
    pub fn add_remove<'a, S>(self, paths: Vec<S>) -> Result<Self>
    where
        S: Into<Cow<'a, str>>,
    {
        self.add_mapping(Mapping::Remove {
            paths: paths.into_iter().map(Into::into).collect(),
        })
    }

    /// copies paths, or the whole top level when `paths` is empty, to the output. Values already
    /// present on the output are kept.
    #[inline]
    pub fn add_copy<'a, S>(self, paths: Vec<S>) -> Result<Self>
    where
        S: Into<Cow<'a, str>>,
    {
        self.add_mapping(Mapping::Copy {
            paths: paths.into_iter().map(Into::into).collect(),
        })
    }

    pub fn build(self) -> Result<Transformer> {
        Ok(Transformer {
            rules: self.rules,
            mode: self.mode,
        })
    }
}

/// Transformer is used to apply the mappings that have been built to any Serializable data.
#[derive(Debug, Serialize, Deserialize)]
pub struct Transformer {
    rules: Vec<Box<dyn Rule>>,
    mode: Mode,
}

impl Transformer {
    /// applies the mappings to a tree, building a new one.
    #[inline]
    pub fn apply(&self, source: &Value) -> Result<Value> {
        match source {
            Value::Array(v) if self.mode == Mode::Many2Many => {
                let mut new_arr = Vec::with_capacity(v.len());
                for value in v {
                    new_arr.push(self.apply_one(value)?);
                }
                Ok(Value::Array(new_arr))
            }
            _ => self.apply_one(source),
        }
    }

    /// applies the mappings to JSON within a string
    #[inline]
    pub fn apply_from_str<'a, S>(&self, input: S) -> Result<Value>
    where
        S: Into<Cow<'a, str>>,
    {
        self.apply(&engine::parse(input)?)
    }

    /// applies the mappings to any serializable data and returns your desired structure.
    #[inline]
    pub fn apply_to<S, D>(&self, input: S) -> Result<D>
    where
        S: Serialize,
        D: DeserializeOwned,
    {
        let results = self.apply(&serde_json::to_value(input)?)?;
        Ok(serde_json::from_value::<D>(results)?)
    }

    fn apply_one(&self, source: &Value) -> Result<Value> {
        let mut dest = engine::new_tree();
        for rule in &self.rules {
            trace!("applying {:?}", rule);
            rule.apply(source, &mut dest)?;
        }
        Ok(dest)
    }
}
