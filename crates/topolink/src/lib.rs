//! Topolink - Topology and geometry engine for interactive network diagram editors.
//!
//! Components, links and areas are placed on a canvas and connected to one
//! another. Every editable point (a vertex) is described indirectly, by a
//! free position, a connection to some other element's connection point, or
//! a distance along a bundle link, and this crate resolves those descriptions
//! into coordinates, re-snaps vertices into clean layouts and makes every
//! edit undoable.
//!
//! # Overview
//!
//! - [`drawing`] - The arena of elements and vertices, anchors and their
//!   resolution.
//! - [`align`] - Alignment heuristics for a single vertex.
//! - [`zorder`] - Stacking order with transient elevation.
//! - [`history`] - Operations and the undo/redo stack.
//! - [`Editor`] - The facade tying these together for interactive use.
//! - [`description`] - Loading a drawing from a serialized description.
//!
//! # Examples
//!
//! ```
//! use topolink::{AlignMode, Editor, config::EditorConfig, drawing::{Anchor, Drawing}};
//! use topolink_core::{geometry::Point, identifier::Id};
//!
//! let mut editor = Editor::new(Drawing::default(), EditorConfig::default());
//! let link = editor
//!     .add_link(
//!         Id::new("uplink"),
//!         false,
//!         vec![
//!             Anchor::Position(Point::new(100.0, 100.0)),
//!             Anchor::Position(Point::new(104.0, 300.0)),
//!         ],
//!     )
//!     .unwrap();
//!
//! let tail = editor.drawing().element(link).unwrap().vertices()[1];
//! assert!(editor.align_vertex(tail, AlignMode::Normal).unwrap());
//! assert_eq!(editor.drawing().coords(tail).unwrap(), Point::new(100.0, 300.0));
//! ```

pub mod align;
pub mod config;
pub mod description;
pub mod drawing;
pub mod editor;
pub mod history;
pub mod schedule;
pub mod zorder;

mod error;

pub use topolink_core::{direction, geometry, identifier};

pub use align::AlignMode;
pub use editor::{DragConstraint, Editor};
pub use error::{ErrorKind, Result, TopolinkError};
