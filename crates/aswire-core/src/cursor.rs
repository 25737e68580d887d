//! Decode position tracking.
//!
//! A `Cursor` is built on the stack for each nested value: it points at its
//! parent cursor, so the full JSON path is only rendered when an error is
//! actually produced.

use crate::config::DecodeConfig;
use crate::error::{Error, Problem};
use std::fmt::Write;

#[derive(Debug, Clone, Copy)]
enum Segment<'a> {
    Root,
    Field(&'static str),
    Key(&'a str),
    Index(usize),
}

/// Where in a message the decoder currently is.
#[derive(Debug, Clone, Copy)]
pub struct Cursor<'a> {
    owner: &'static str,
    segment: Segment<'a>,
    parent: Option<&'a Cursor<'a>>,
    config: &'a DecodeConfig,
}

impl<'a> Cursor<'a> {
    /// Cursor for the top-level value of a message of type `owner`.
    #[must_use]
    pub fn root(owner: &'static str, config: &'a DecodeConfig) -> Self {
        Self {
            owner,
            segment: Segment::Root,
            parent: None,
            config,
        }
    }

    /// Name of the protocol type whose fields are being read.
    #[must_use]
    pub fn owner(&self) -> &'static str {
        self.owner
    }

    #[must_use]
    pub fn config(&self) -> &'a DecodeConfig {
        self.config
    }

    /// Step into the field `name` of the current object.
    #[must_use]
    pub fn field<'b>(&'b self, name: &'static str) -> Cursor<'b> {
        Cursor {
            owner: self.owner,
            segment: Segment::Field(name),
            parent: Some(self),
            config: self.config,
        }
    }

    /// Step into element `index` of the current array.
    #[must_use]
    pub fn index<'b>(&'b self, index: usize) -> Cursor<'b> {
        Cursor {
            owner: self.owner,
            segment: Segment::Index(index),
            parent: Some(self),
            config: self.config,
        }
    }

    /// Step into the entry `key` of a JSON object used as a map.
    #[must_use]
    pub fn key<'b>(&'b self, key: &'b str) -> Cursor<'b> {
        Cursor {
            owner: self.owner,
            segment: Segment::Key(key),
            parent: Some(self),
            config: self.config,
        }
    }

    /// Same position, now reading the fields of a nested `owner` value.
    #[must_use]
    pub fn with_owner(&self, owner: &'static str) -> Self {
        Self { owner, ..*self }
    }

    /// Render the JSON path, e.g. `$.regions[0].targets[2]`.
    #[must_use]
    pub fn path(&self) -> String {
        let mut segments = Vec::new();
        let mut current = Some(self);
        while let Some(cursor) = current {
            segments.push(cursor.segment);
            current = cursor.parent;
        }

        let mut out = String::from("$");
        for segment in segments.iter().rev() {
            match segment {
                Segment::Root => {}
                Segment::Field(name) => {
                    let _ = write!(out, ".{name}");
                }
                Segment::Key(key) => {
                    let _ = write!(out, "[{key:?}]");
                }
                Segment::Index(i) => {
                    let _ = write!(out, "[{i}]");
                }
            }
        }
        out
    }

    /// A `MalformedMessage` error located at this cursor.
    #[must_use]
    pub fn malformed(&self, problem: Problem) -> Error {
        Error::MalformedMessage {
            type_name: self.owner,
            path: self.path(),
            problem,
        }
    }

    /// An `AmbiguousUnion` error located at this cursor.
    #[must_use]
    pub fn ambiguous(&self, alternatives: Vec<&'static str>) -> Error {
        Error::AmbiguousUnion {
            type_name: self.owner,
            path: self.path(),
            alternatives,
        }
    }
}
