use std::fmt;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ObjError>;

/// Which per-corner attribute list a reference points into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attribute {
    Position,
    TextureCoordinate,
    Normal,
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Attribute::Position => "position",
            Attribute::TextureCoordinate => "texture coordinate",
            Attribute::Normal => "normal",
        };

        return f.write_str(name);
    }
}

/// Identity of a primitive inside a document: owning object, owning group
/// and 0-based position within that group.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PrimitiveId {
    pub object: String,
    pub group: String,
    pub ordinal: usize,
}

impl fmt::Display for PrimitiveId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        return write!(f, "{}/{}#{}", self.object, self.group, self.ordinal);
    }
}

#[derive(Debug, Error)]
pub enum ObjError {
    #[error("failed to read mesh stream: {0}")]
    Io(#[from] std::io::Error),

    /// Syntax, arity or numeric failure. `row` is 1-based; 0 means the
    /// failure is not tied to a source line.
    #[error("malformed record at line {row}: {reason}")]
    MalformedRecord { row: usize, reason: String },

    #[error("primitive {primitive}: {attribute} index {index} out of range (have {len})")]
    IndexOutOfRange {
        primitive: PrimitiveId,
        attribute: Attribute,
        index: usize,
        len: usize,
    },

    #[error("primitive {primitive}: degenerate, only {count} corners")]
    DegeneratePrimitive { primitive: PrimitiveId, count: usize },
}

impl ObjError {
    pub(crate) fn malformed(row: usize, reason: impl Into<String>) -> Self {
        return ObjError::MalformedRecord {
            row,
            reason: reason.into(),
        };
    }

    /// The offending primitive, for errors raised during assembly.
    pub fn primitive(&self) -> Option<&PrimitiveId> {
        match self {
            ObjError::IndexOutOfRange { primitive, .. } => Some(primitive),
            ObjError::DegeneratePrimitive { primitive, .. } => Some(primitive),
            _ => None,
        }
    }
}
