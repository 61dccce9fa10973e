//! Variable paths such as `user.name` or `items[0]`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One step below the root of a variable path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PathSegment {
    /// Fixed key or index: `.name`, `->name`, `[0]`, `['key']`.
    Key(String),
    /// Key taken from another variable: `[i]`.
    Lookup(VarPath),
}

/// A reference to a bound value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VarPath {
    /// Name of the root variable, without sigil.
    pub root: String,
    /// Steps below the root.
    pub segments: Vec<PathSegment>,
}

impl VarPath {
    /// A path naming a single variable.
    pub fn simple(root: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            segments: Vec::new(),
        }
    }

    /// Parse a complete path. Returns `None` unless all of `input` is a path.
    ///
    /// # Example
    ///
    /// ```
    /// use vellum::syntax::{PathSegment, VarPath};
    ///
    /// let path = VarPath::parse("$user->address.city").unwrap();
    /// assert_eq!(path.root, "user");
    /// assert_eq!(path.segments.len(), 2);
    /// assert!(VarPath::parse("not a path").is_none());
    /// ```
    pub fn parse(input: &str) -> Option<Self> {
        let mut scanner = Scanner { input, pos: 0 };
        let path = scanner.path()?;
        (scanner.pos == input.len()).then_some(path)
    }

    /// Length in bytes of the longest path prefix of `input`, if any.
    pub fn prefix_len(input: &str) -> Option<usize> {
        let mut scanner = Scanner { input, pos: 0 };
        scanner.path().map(|_| scanner.pos)
    }
}

impl fmt::Display for VarPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.root)?;
        for segment in &self.segments {
            match segment {
                PathSegment::Key(key) if is_identifier(key) => write!(f, ".{}", key)?,
                PathSegment::Key(key) => write!(f, "[{:?}]", key)?,
                PathSegment::Lookup(path) => write!(f, "[{}]", path)?,
            }
        }
        Ok(())
    }
}

/// Whether `s` is a plain identifier (`[A-Za-z_][A-Za-z0-9_]*`).
pub fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Strip an optional `$` sigil and check the rest is an identifier.
pub fn identifier(s: &str) -> Option<&str> {
    let name = s.strip_prefix('$').unwrap_or(s);
    is_identifier(name).then_some(name)
}

struct Scanner<'a> {
    input: &'a str,
    pos: usize,
}

impl Scanner<'_> {
    fn rest(&self) -> &str {
        &self.input[self.pos..]
    }

    fn path(&mut self) -> Option<VarPath> {
        if self.rest().starts_with('$') {
            self.pos += 1;
        }
        let root = self.ident()?;
        let mut segments = Vec::new();

        loop {
            let rest = self.rest();
            if let Some(after) = rest.strip_prefix("->") {
                if starts_ident(after) {
                    self.pos += 2;
                    segments.push(PathSegment::Key(self.ident()?));
                    continue;
                }
            } else if let Some(after) = rest.strip_prefix('.') {
                if after.starts_with(|c: char| c.is_ascii_alphanumeric() || c == '_') {
                    self.pos += 1;
                    segments.push(PathSegment::Key(self.word()));
                    continue;
                }
            } else if rest.starts_with('[') {
                let saved = self.pos;
                match self.bracket() {
                    Some(segment) => {
                        segments.push(segment);
                        continue;
                    }
                    None => self.pos = saved,
                }
            }
            break;
        }

        Some(VarPath { root, segments })
    }

    fn ident(&mut self) -> Option<String> {
        if !starts_ident(self.rest()) {
            return None;
        }
        Some(self.word())
    }

    fn word(&mut self) -> String {
        let len = self
            .rest()
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
            .unwrap_or(self.rest().len());
        let word = self.rest()[..len].to_string();
        self.pos += len;
        word
    }

    fn bracket(&mut self) -> Option<PathSegment> {
        self.pos += 1;
        let rest = self.rest();
        let segment = match rest.chars().next()? {
            quote @ ('\'' | '"') => {
                let close = rest[1..].find(quote)? + 1;
                let key = rest[1..close].to_string();
                self.pos += close + 1;
                PathSegment::Key(key)
            }
            c if c.is_ascii_digit() => {
                let len = rest.find(|c: char| !c.is_ascii_digit()).unwrap_or(rest.len());
                let key = rest[..len].to_string();
                self.pos += len;
                PathSegment::Key(key)
            }
            _ => PathSegment::Lookup(self.path()?),
        };
        if !self.rest().starts_with(']') {
            return None;
        }
        self.pos += 1;
        Some(segment)
    }
}

fn starts_ident(s: &str) -> bool {
    s.starts_with(|c: char| c.is_ascii_alphabetic() || c == '_')
}
