//! CLI logic for the Topolink drawing tool.
//!
//! Loads a drawing description, optionally aligns it, and writes the
//! resolved coordinate of every vertex.

pub mod error_adapter;

mod args;
mod config;
mod report;

pub use args::Args;

use std::fs;

use log::{info, warn};

use topolink::{
    Editor, TopolinkError,
    description::DrawingDescription,
    drawing::{Drawing, Element, ElementId},
};

/// Run the Topolink CLI application
///
/// # Errors
///
/// Returns `TopolinkError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Malformed drawing descriptions and anchor references
/// - References to elements or points that do not exist
pub fn run(args: &Args) -> Result<(), TopolinkError> {
    info!(
        input_path = args.input,
        output_path = args.output;
        "Processing drawing"
    );

    let app_config = config::load_config(args.config.as_ref())?;

    let source = fs::read_to_string(&args.input)?;
    let description = parse_description(source)?;
    let drawing = Drawing::from_description(&description, app_config.editor().bounds_margin())?;
    let mut editor = Editor::new(drawing, app_config.editor().clone());

    if args.align {
        let owners: Vec<ElementId> = editor.drawing().elements().map(Element::id).collect();
        for owner in owners {
            editor.align_all_vertices(owner)?;
        }
        let blinks = editor.take_blinks();
        if !blinks.is_empty() {
            warn!(count = blinks.len(); "Some vertices could not be aligned");
        }
    }

    let report = report::render(editor.drawing())?;
    fs::write(&args.output, report)?;

    info!(output_file = args.output; "Report written");

    Ok(())
}

/// Deserializes a drawing description, keeping the source text for reporting.
fn parse_description(source: String) -> Result<DrawingDescription, TopolinkError> {
    toml::from_str(&source).map_err(move |err| TopolinkError::Description {
        message: err.message().to_string(),
        span: err.span(),
        src: source,
    })
}

#[cfg(test)]
mod tests {
    use topolink::ErrorKind;

    use super::*;

    #[test]
    fn test_malformed_description_keeps_span() {
        let source = "[[link]]\nname = 3\nvertices = [\"(0, 0)\", \"(1, 1)\"]\n";
        let err = parse_description(source.to_string()).unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Description);
        match err {
            TopolinkError::Description { src, span, .. } => {
                assert_eq!(src, source);
                let span = span.expect("toml reports a span");
                assert!(source[span].contains('3'));
            }
            other => panic!("Expected Description, got {other:?}"),
        }
    }
}
