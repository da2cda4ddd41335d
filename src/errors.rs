use failure::Fail;

pub type Result<T> = std::result::Result<T, Error>;

/// Error is the single error type returned by every fallible operation in this crate.
///
/// A path that simply does not resolve is never an error, operations report it as absent
/// or do nothing.
#[derive(Debug, Fail)]
pub enum Error {
    #[fail(display = "invalid path: {}", _0)]
    InvalidPath(String),

    #[fail(display = "path '{}' matched {} nodes, expected one", path, count)]
    AmbiguousPath { path: String, count: usize },

    #[fail(display = "value at '{}' could not be coerced: {}", path, cause)]
    Coercion {
        path: String,
        #[cause]
        cause: serde_json::Error,
    },

    #[fail(display = "'{}' does not hold an object, cannot write beneath it", _0)]
    NotAContainer(String),

    #[fail(display = "{}", _0)]
    Json(#[cause] serde_json::Error),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json(err)
    }
}
