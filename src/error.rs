//! Error taxonomy for column resolution and certified-count aggregation.
//!
//! [`SchemaError`] covers role resolution against a file header. Only
//! [`SchemaError::MissingColumn`] is fatal; [`SchemaError::AmbiguousColumn`]
//! is carried as a warning on the resolved schema.
//!
//! [`EngineError`] covers everything a counting or ranking call can fail
//! with. Every variant leaves the engine's cache exactly as it was before the
//! failing call.

use std::fmt;

use thiserror::Error;

use crate::schema::Role;

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("Header did not contain any of the {role} columns: {}", .candidates.join(", "))]
    MissingColumn {
        role: Role,
        candidates: Vec<String>,
    },
    #[error(
        "Header contained more than one {role} column ({}); using '{chosen}'",
        .matches.join(", ")
    )]
    AmbiguousColumn {
        role: Role,
        matches: Vec<String>,
        chosen: String,
    },
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Schema(#[from] SchemaError),
    #[error("Columns must be text or a list of text, found {found}")]
    InvalidColumnType { found: ValueKind },
    #[error("Count must be an integer, found {found}")]
    InvalidCount { found: ValueKind },
    #[error("'{column}' is not in file header.")]
    UnknownColumn { column: String },
    #[error("Count must not be negative, found {n}")]
    NegativeCount { n: i64 },
    #[error(
        "Row {row} has {width} field(s) but column '{column}' is at position {}",
        .index + 1
    )]
    MalformedRow {
        row: u64,
        width: usize,
        column: String,
        index: usize,
    },
    #[error(transparent)]
    Input(#[from] anyhow::Error),
}

/// Shape of an untyped value that failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Null,
    Bool,
    Integer,
    Float,
    Text,
    Sequence,
    Mapping,
    Tagged,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ValueKind::Null => "null",
            ValueKind::Bool => "boolean",
            ValueKind::Integer => "integer",
            ValueKind::Float => "float",
            ValueKind::Text => "text",
            ValueKind::Sequence => "sequence",
            ValueKind::Mapping => "mapping",
            ValueKind::Tagged => "tagged value",
        };
        f.write_str(label)
    }
}
