use crate::errors::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::borrow::Cow;
use std::iter::Peekable;
use std::str::Chars;

/// represents a single namespace level for traversing JSON structures.
///
/// # Example
/// `test.value` would be represented by two Namespace Object's `test` and `value` while
/// `items[?(@.name == 'x')]` is a single Filter over the `items` array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Namespace {
    Object { id: String },
    Array { id: String, index: usize },
    Filter { id: String, filter: Filter },
}

/// the test applied by a filter to the value found at its field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Comparison {
    Exists,
    Equal(Value),
    NotEqual(Value),
}

/// Filter selects the one element of an array whose `field` passes the `comparison`.
///
/// `field` is relative to the element, an empty field compares the element itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Filter {
    pub field: Vec<String>,
    pub comparison: Comparison,
}

impl Filter {
    pub fn matches(&self, candidate: &Value) -> bool {
        let found = self
            .field
            .iter()
            .try_fold(candidate, |current, id| current.get(id.as_str()));

        match (&self.comparison, found) {
            (Comparison::Exists, found) => found.is_some(),
            (Comparison::Equal(expected), Some(v)) => same_value(v, expected),
            (Comparison::NotEqual(expected), Some(v)) => !same_value(v, expected),
            (_, None) => false,
        }
    }

    /// returns the index of the single element matching this filter, more than one match is an
    /// error since a path must identify exactly one node.
    pub(crate) fn position(&self, arr: &[Value], path: &str) -> Result<Option<usize>> {
        let mut matched = arr
            .iter()
            .enumerate()
            .filter(|(_, v)| self.matches(v))
            .map(|(i, _)| i);

        let first = matched.next();
        let others = matched.count();
        if others > 0 {
            return Err(Error::AmbiguousPath {
                path: path.to_string(),
                count: others + 1,
            });
        }
        Ok(first)
    }

    /// parses the inside of a filter selector eg. `?(@.value == 'Open')`
    fn parse(expr: &str, path: &str) -> Result<Self> {
        let invalid = || Error::InvalidPath(format!("bad filter '{}' in '{}'", expr, path));

        let expr = expr.trim_start_matches('?').trim();
        let expr = if expr.starts_with('(') && expr.ends_with(')') {
            expr[1..expr.len() - 1].trim()
        } else {
            expr
        };

        // the left hand side never holds quotes so the first operator found is the real one
        let operator = match (expr.find("=="), expr.find("!=")) {
            (Some(eq), Some(ne)) => Some((eq.min(ne), eq < ne)),
            (Some(eq), None) => Some((eq, true)),
            (None, Some(ne)) => Some((ne, false)),
            (None, None) => None,
        };

        let (lhs, comparison) = match operator {
            Some((idx, is_equal)) => {
                let literal = parse_literal(&expr[idx + 2..]).ok_or_else(invalid)?;
                let comparison = if is_equal {
                    Comparison::Equal(literal)
                } else {
                    Comparison::NotEqual(literal)
                };
                (&expr[..idx], comparison)
            }
            None => (expr, Comparison::Exists),
        };

        let lhs = lhs.trim();
        if !lhs.starts_with('@') {
            return Err(invalid());
        }
        let field = match &lhs[1..] {
            "" => Vec::new(),
            rest if rest.starts_with('.') && rest.len() > 1 => {
                rest[1..].split('.').map(String::from).collect()
            }
            _ => return Err(invalid()),
        };

        Ok(Filter { field, comparison })
    }
}

// numbers compare by value so `3` matches `3.0`
#[inline]
fn same_value(found: &Value, expected: &Value) -> bool {
    match (found, expected) {
        (Value::Number(a), Value::Number(b)) => a == b || a.as_f64() == b.as_f64(),
        _ => found == expected,
    }
}

#[inline]
fn parse_literal(raw: &str) -> Option<Value> {
    let raw = raw.trim();
    let quoted = raw.len() >= 2
        && ((raw.starts_with('\'') && raw.ends_with('\''))
            || (raw.starts_with('"') && raw.ends_with('"')));
    if quoted {
        return Some(Value::String(raw[1..raw.len() - 1].to_string()));
    }
    serde_json::from_str(raw).ok()
}

impl Namespace {
    /// parse takes a path eg. `$.object.nested[0][1].nested.field` and turns it into the list of
    /// namespaces used to walk a tree.
    ///
    /// The root marker `$` is optional. Besides dotted member names the parser understands array
    /// indices `[0]`, quoted member names `['a.b']` for keys containing dots and filters
    /// `[?(@.field == 'value')]`. An empty path or a lone `$` is the root itself and parses to
    /// no namespaces at all.
    pub fn parse<'a, S>(input: S) -> Result<Vec<Namespace>>
    where
        S: Into<Cow<'a, str>>,
    {
        let input = input.into();
        let path: &str = &input;
        let trimmed = if path == "$" {
            ""
        } else if path.starts_with("$.") || path.starts_with("$[") {
            path[1..].trim_start_matches('.')
        } else {
            path
        };

        let invalid = |reason: &str| Error::InvalidPath(format!("{} in '{}'", reason, path));

        let mut namespaces = Vec::new();
        let mut id = String::new();
        // set once the current segment has seen a `[...]`, only `.` or `[` may follow it
        let mut bracketed = false;
        let mut chars = trimmed.chars().peekable();

        while let Some(c) = chars.next() {
            match c {
                '.' => {
                    if !bracketed {
                        if id.is_empty() {
                            return Err(invalid("empty member name"));
                        }
                        namespaces.push(Namespace::Object {
                            id: std::mem::take(&mut id),
                        });
                    }
                    bracketed = false;
                    if chars.peek().is_none() {
                        return Err(invalid("trailing separator"));
                    }
                }
                '[' => {
                    let inner = read_bracket(&mut chars).ok_or_else(|| invalid("unclosed `[`"))?;
                    let inner = inner.trim();
                    if inner.starts_with('?') {
                        namespaces.push(Namespace::Filter {
                            id: std::mem::take(&mut id),
                            filter: Filter::parse(inner, path)?,
                        });
                    } else if inner.starts_with('\'') || inner.starts_with('"') {
                        let key = match parse_literal(inner) {
                            Some(Value::String(key)) => key,
                            _ => return Err(invalid("unterminated quoted member")),
                        };
                        if !id.is_empty() {
                            namespaces.push(Namespace::Object {
                                id: std::mem::take(&mut id),
                            });
                        }
                        namespaces.push(Namespace::Object { id: key });
                    } else {
                        namespaces.push(Namespace::Array {
                            id: std::mem::take(&mut id),
                            index: inner.parse().map_err(|_| invalid("bad index"))?,
                        });
                    }
                    bracketed = true;
                }
                _ if bracketed => return Err(invalid("unexpected character after `]`")),
                _ => id.push(c),
            }
        }

        if !id.is_empty() {
            namespaces.push(Namespace::Object { id });
        }
        Ok(namespaces)
    }
}

/// consumes up to and including the `]` closing an already consumed `[`, returning what was
/// between them. Quotes and nested brackets are skipped over.
fn read_bracket(chars: &mut Peekable<Chars<'_>>) -> Option<String> {
    let mut inner = String::new();
    let mut depth = 1;
    let mut quote = None;

    for c in chars {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '\'') | (None, '"') => quote = Some(c),
            (None, '[') => depth += 1,
            (None, ']') => {
                depth -= 1;
                if depth == 0 {
                    return Some(inner);
                }
            }
            _ => {}
        }
        inner.push(c);
    }
    None
}
