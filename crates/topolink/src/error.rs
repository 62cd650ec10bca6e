//! Error types for Topolink operations.
//!
//! This module provides the main error type [`TopolinkError`] covering the
//! structural lookups, model invariants and editor state errors that can occur
//! while a drawing is being edited.
//!
//! Alignment that cannot find a target is not an error: it logs a warning,
//! records a blink on the affected vertices and reports that nothing moved.

use std::{io, ops::Range};

use thiserror::Error;

use topolink_core::identifier::Id;
use topolink_parser::ParseError;

use crate::drawing::{ElementId, VertexId};

/// Broad classification of a [`TopolinkError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A referenced vertex, element, bundle or connection point does not exist.
    Structural,
    /// An edit would break a model invariant.
    Invariant,
    /// The editor was driven out of order (operation boundaries).
    Usage,
    /// An anchor reference could not be parsed.
    Parse,
    /// A drawing description file is malformed.
    Description,
    /// Reading or writing a file failed.
    Io,
}

/// The main error type for Topolink operations.
#[derive(Debug, Error)]
pub enum TopolinkError {
    #[error("unknown vertex {0}")]
    UnknownVertex(VertexId),

    #[error("unknown element {0}")]
    UnknownElement(ElementId),

    #[error("unknown element `{0}`")]
    UnknownElementName(Id),

    #[error("element `{host}` has no connection point `{point}`")]
    UnknownConnectionPoint { host: Id, point: String },

    #[error("bundle `{bundle}` has no segment after vertex {index}")]
    UnknownBundleSegment { bundle: Id, index: usize },

    #[error("`{owner}` has no segment {index}")]
    UnknownSegment { owner: Id, index: usize },

    #[error("element names must not be empty")]
    EmptyName,

    #[error("an element named `{0}` already exists")]
    DuplicateName(Id),

    #[error("database id {0} is already in use")]
    DuplicateDbId(u64),

    #[error("`{host}` already has a connection point named `{point}`")]
    DuplicateConnectionPoint { host: Id, point: Id },

    #[error("`{0}` is not a bundle link")]
    NotABundle(Id),

    #[error("`{0}` is not a component")]
    NotAComponent(Id),

    #[error("`{0}` does not own vertices")]
    NotAVertexOwner(Id),

    #[error("connection point `{point}` on `{host}` is already in use")]
    InactiveConnectionPoint { host: Id, point: Id },

    #[error("invalid anchor for vertex {vertex}: {reason}")]
    InvalidAnchor {
        vertex: VertexId,
        reason: &'static str,
    },

    #[error("`{owner}` needs at least {minimum} vertices")]
    TooFewVertices { owner: Id, minimum: usize },

    #[error("an operation is already in progress")]
    OperationInProgress,

    #[error("no operation is in progress")]
    NoOpenOperation,

    #[error("no drag gesture is in progress")]
    NoDragInProgress,

    #[error("vertex {index} of `{element}`: {source}")]
    InVertex {
        element: Id,
        index: usize,
        #[source]
        source: Box<TopolinkError>,
    },

    #[error(transparent)]
    Parse(#[from] ParseError),

    /// A drawing description that could not be deserialized, with the full
    /// source text and the byte range of the offending item when known.
    #[error("invalid drawing description: {message}")]
    Description {
        message: String,
        src: String,
        span: Option<Range<usize>>,
    },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl TopolinkError {
    /// Returns the broad classification of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UnknownVertex(_)
            | Self::UnknownElement(_)
            | Self::UnknownElementName(_)
            | Self::UnknownConnectionPoint { .. }
            | Self::UnknownBundleSegment { .. }
            | Self::UnknownSegment { .. } => ErrorKind::Structural,
            Self::EmptyName
            | Self::DuplicateName(_)
            | Self::DuplicateDbId(_)
            | Self::DuplicateConnectionPoint { .. }
            | Self::NotABundle(_)
            | Self::NotAComponent(_)
            | Self::NotAVertexOwner(_)
            | Self::InactiveConnectionPoint { .. }
            | Self::InvalidAnchor { .. }
            | Self::TooFewVertices { .. } => ErrorKind::Invariant,
            Self::OperationInProgress | Self::NoOpenOperation | Self::NoDragInProgress => {
                ErrorKind::Usage
            }
            Self::InVertex { source, .. } => source.kind(),
            Self::Parse(_) => ErrorKind::Parse,
            Self::Description { .. } => ErrorKind::Description,
            Self::Io(_) => ErrorKind::Io,
        }
    }
}

/// Result type used throughout the crate.
pub type Result<T, E = TopolinkError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_classification() {
        assert_eq!(
            TopolinkError::UnknownElementName(Id::new("ghost")).kind(),
            ErrorKind::Structural
        );
        assert_eq!(TopolinkError::DuplicateDbId(7).kind(), ErrorKind::Invariant);
        assert_eq!(
            TopolinkError::OperationInProgress.kind(),
            ErrorKind::Usage
        );
    }

    #[test]
    fn test_vertex_context_keeps_kind() {
        let err = TopolinkError::InVertex {
            element: Id::new("uplink"),
            index: 1,
            source: Box::new(TopolinkError::NotABundle(Id::new("uplink"))),
        };
        assert_eq!(err.kind(), ErrorKind::Invariant);
        assert_eq!(err.to_string(), "vertex 1 of `uplink`: `uplink` is not a bundle link");
    }

    #[test]
    fn test_description_error_kind() {
        let err = TopolinkError::Description {
            message: "missing field `name`".to_string(),
            src: "[[component]]\n".to_string(),
            span: Some(0..13),
        };
        assert_eq!(err.kind(), ErrorKind::Description);
        assert_eq!(err.to_string(), "invalid drawing description: missing field `name`");
    }

    #[test]
    fn test_messages_carry_identifiers() {
        let err = TopolinkError::InactiveConnectionPoint {
            host: Id::new("router1"),
            point: Id::new("eth0"),
        };
        assert_eq!(
            err.to_string(),
            "connection point `eth0` on `router1` is already in use"
        );
    }
}
