//! Plain-text report of resolved vertex coordinates.
//!
//! One line per vertex, elements in drawing order:
//!
//! ```text
//! uplink[0] router:east -> (120, 80)
//! uplink[1] (300, 80) -> (300, 80)
//! ```

use std::fmt::Write as _;

use topolink::{Result, drawing::Drawing};

/// Renders every vertex with its anchor reference and resolved coordinate.
pub fn render(drawing: &Drawing) -> Result<String> {
    let mut out = String::new();
    for element in drawing.elements() {
        for (index, vertex) in element.vertices().iter().enumerate() {
            let anchor = drawing
                .anchor_ref(*vertex)?
                .map_or_else(|| "-".to_string(), |anchor| anchor.to_string());
            let point = drawing.coords(*vertex)?;
            // Writing to a String cannot fail.
            let _ = writeln!(
                out,
                "{}[{index}] {anchor} -> ({}, {})",
                element.name(),
                point.x(),
                point.y()
            );
        }
    }
    Ok(out)
}
