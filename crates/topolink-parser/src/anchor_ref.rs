//! Parsed anchor references.

use std::fmt;

use topolink_core::{geometry::Point, identifier::Id};

/// A connection point addressed by name or by position in its host's list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointRef {
    Name(Id),
    Ordinal(usize),
}

impl fmt::Display for PointRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name(name) => write!(f, "{name}"),
            Self::Ordinal(idx) => write!(f, "{idx}"),
        }
    }
}

/// The serialized form of a vertex anchor.
///
/// Names are not checked against any drawing here; resolving them into
/// live references is the job of the drawing that owns the vertex.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AnchorRef {
    /// `(x, y)`
    Position(Point),
    /// `host:point`
    Connection { host: Id, point: PointRef },
    /// `@bundle:after_vertex:distance`
    Bundle {
        bundle: Id,
        after_vertex: usize,
        distance: f32,
    },
}

impl AnchorRef {
    /// Returns `false` if any numeric field is NaN or infinite.
    pub fn is_finite(&self) -> bool {
        match self {
            Self::Position(p) => p.x().is_finite() && p.y().is_finite(),
            Self::Connection { .. } => true,
            Self::Bundle { distance, .. } => distance.is_finite(),
        }
    }
}

impl fmt::Display for AnchorRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Position(p) => write!(f, "({}, {})", p.x(), p.y()),
            Self::Connection { host, point } => write!(f, "{host}:{point}"),
            Self::Bundle {
                bundle,
                after_vertex,
                distance,
            } => write!(f, "@{bundle}:{after_vertex}:{distance}"),
        }
    }
}
