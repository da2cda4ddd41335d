use crate::editor;
use crate::engine;
use crate::errors::Result;
use crate::mapper::{self, MapOptions};
use crate::namespace::Namespace;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::borrow::Cow;
use std::fmt::Debug;

/// Rule is a single step of a stored mapping. Rules read from the untouched input and write
/// to the destination being built.
#[typetag::serde]
pub trait Rule: Debug + Send + Sync {
    fn apply(&self, from: &Value, to: &mut Value) -> Result<()>;
}

///
/// Mapping is the type of rule we will be creating, it is how mappings are saved outside of
/// this library eg. in a configuration file.
///
#[derive(Debug, Serialize, Deserialize)]
pub enum Mapping<'a> {
    Direct {
        from: Cow<'a, str>,
        to: Cow<'a, str>,
        #[serde(default)]
        options: MapOptions,
    },
    Constant {
        from: Value,
        to: Cow<'a, str>,
        #[serde(default)]
        options: MapOptions,
    },
    Remove {
        paths: Vec<Cow<'a, str>>,
    },
    Copy {
        #[serde(default)]
        paths: Vec<Cow<'a, str>>,
    },
}

impl<'a> Mapping<'a> {
    /// validates the mapping's paths and turns it into the rule that carries it out.
    pub fn parse(self) -> Result<Box<dyn Rule>> {
        let rule: Box<dyn Rule> = match self {
            Mapping::Direct { from, to, options } => {
                Namespace::parse(from.as_ref())?;
                Box::new(Transform {
                    source: Source::Path(from.into_owned()),
                    destination: destination(to)?,
                    options,
                })
            }
            Mapping::Constant { from, to, options } => Box::new(Transform {
                source: Source::Constant(from),
                destination: destination(to)?,
                options,
            }),
            Mapping::Remove { paths } => Box::new(Removal {
                paths: validated(paths)?,
            }),
            Mapping::Copy { paths } => Box::new(CopyPaths {
                paths: validated(paths)?,
            }),
        };
        Ok(rule)
    }
}

#[inline]
fn destination(to: Cow<'_, str>) -> Result<String> {
    editor::check_destination(&to)?;
    Ok(to.into_owned())
}

#[inline]
fn validated(paths: Vec<Cow<'_, str>>) -> Result<Vec<String>> {
    paths
        .into_iter()
        .map(|p| {
            Namespace::parse(p.as_ref())?;
            Ok(p.into_owned())
        })
        .collect()
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub(crate) enum Source {
    Path(String),
    Constant(Value),
}

/// Transform writes the value of a source path, or a constant, to a destination path.
#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub(crate) struct Transform {
    source: Source,
    destination: String,
    options: MapOptions,
}

#[typetag::serde]
impl Rule for Transform {
    fn apply(&self, from: &Value, to: &mut Value) -> Result<()> {
        let field = match &self.source {
            Source::Path(path) => engine::select(from, path)?.cloned(),
            Source::Constant(v) => Some(v.clone()),
        };
        mapper::write(to, &self.destination, field, &self.options)
    }
}

/// Removal drops paths from what has been built so far.
#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub(crate) struct Removal {
    paths: Vec<String>,
}

#[typetag::serde]
impl Rule for Removal {
    fn apply(&self, _from: &Value, to: &mut Value) -> Result<()> {
        editor::remove_all(to, &self.paths)
    }
}

/// CopyPaths deep copies paths, or every top level member when none are given, keeping the first
/// value written to a key.
#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub(crate) struct CopyPaths {
    paths: Vec<String>,
}

#[typetag::serde]
impl Rule for CopyPaths {
    fn apply(&self, from: &Value, to: &mut Value) -> Result<()> {
        mapper::copy_into(to, from, &self.paths)
    }
}
