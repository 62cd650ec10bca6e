//! Error adapter for converting TopolinkError to miette diagnostics.
//!
//! This module provides the bridge between the library's error type and
//! miette's rich diagnostic formatting used in the CLI. Anchor references
//! that fail to parse are rendered with the offending text and a label at
//! the position where parsing stopped. Malformed description files are
//! rendered against the whole file. Every other error gets a stable code
//! derived from its [`ErrorKind`].

use std::{fmt, ops::Range};

use miette::{Diagnostic as MietteDiagnostic, LabeledSpan, SourceSpan};

use topolink::{ErrorKind, TopolinkError};
use topolink_parser::ParseError;

/// Adapter for an anchor reference that failed to parse.
pub struct ParseAdapter<'a> {
    err: &'a ParseError,
    /// The anchor reference text, for displaying the snippet
    src: &'a str,
    /// Where the reference came from, e.g. "vertex 1 of `uplink`".
    context: Option<String>,
}

impl<'a> ParseAdapter<'a> {
    pub fn new(err: &'a ParseError, context: Option<String>) -> Self {
        Self {
            err,
            src: err.input(),
            context,
        }
    }
}

impl fmt::Debug for ParseAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParseAdapter")
            .field("err", &self.err)
            .field("context", &self.context)
            .finish()
    }
}

impl fmt::Display for ParseAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.context {
            Some(context) => write!(f, "{context}: invalid anchor reference"),
            None => write!(f, "invalid anchor reference"),
        }
    }
}

impl std::error::Error for ParseAdapter<'_> {}

impl MietteDiagnostic for ParseAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new("topolink::parse"))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(
            "anchors are written `(x, y)`, `host:point` or `@bundle:vertex:distance`",
        ))
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        Some(&self.src as &dyn miette::SourceCode)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let label = LabeledSpan::new_primary_with_span(
            Some(self.err.message().to_string()),
            error_span(self.err),
        );
        Some(Box::new(std::iter::once(label)))
    }
}

/// Adapter for a drawing description file that failed to deserialize.
#[derive(Debug)]
pub struct DescriptionAdapter<'a> {
    message: &'a str,
    src: &'a str,
    span: Option<Range<usize>>,
}

impl fmt::Display for DescriptionAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid drawing description")
    }
}

impl std::error::Error for DescriptionAdapter<'_> {}

impl MietteDiagnostic for DescriptionAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(error_code(ErrorKind::Description)))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self.span {
            Some(_) => None,
            None => Some(Box::new(self.message)),
        }
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        Some(&self.src as &dyn miette::SourceCode)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let span = self.span.clone()?;
        let start = span.start.min(self.src.len());
        let len = span.end.min(self.src.len()).saturating_sub(start);
        let label = LabeledSpan::new_primary_with_span(
            Some(self.message.to_string()),
            SourceSpan::new(start.into(), len),
        );
        Some(Box::new(std::iter::once(label)))
    }
}

/// Adapter for every [`TopolinkError`] that is not a parse failure.
pub struct ErrorAdapter<'a>(pub &'a TopolinkError);

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(error_code(self.0.kind())))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self.0.kind() {
            ErrorKind::Structural => Some(Box::new("check that every referenced name exists")),
            _ => None,
        }
    }
}

/// A reportable error that can be rendered by miette.
#[derive(Debug)]
pub enum Reportable<'a> {
    /// A malformed anchor reference with its source text.
    Parse(ParseAdapter<'a>),
    /// A malformed description file with its source text.
    Description(DescriptionAdapter<'a>),
    /// Any other error.
    Error(ErrorAdapter<'a>),
}

impl fmt::Display for Reportable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reportable::Parse(p) => fmt::Display::fmt(p, f),
            Reportable::Description(d) => fmt::Display::fmt(d, f),
            Reportable::Error(e) => fmt::Display::fmt(e, f),
        }
    }
}

impl std::error::Error for Reportable<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Reportable::Parse(_) | Reportable::Description(_) => None,
            Reportable::Error(e) => e.source(),
        }
    }
}

impl MietteDiagnostic for Reportable<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Reportable::Parse(p) => p.code(),
            Reportable::Description(d) => d.code(),
            Reportable::Error(e) => e.code(),
        }
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Reportable::Parse(p) => p.help(),
            Reportable::Description(d) => d.help(),
            Reportable::Error(e) => e.help(),
        }
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        match self {
            Reportable::Parse(p) => p.source_code(),
            Reportable::Description(d) => d.source_code(),
            Reportable::Error(e) => e.source_code(),
        }
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        match self {
            Reportable::Parse(p) => p.labels(),
            Reportable::Description(d) => d.labels(),
            Reportable::Error(e) => e.labels(),
        }
    }
}

/// Convert a [`TopolinkError`] into a list of reportable errors.
///
/// Parse failures, including those wrapped in vertex context, become a
/// [`Reportable::Parse`]; everything else a single [`Reportable::Error`].
pub fn to_reportables(err: &TopolinkError) -> Vec<Reportable<'_>> {
    match err {
        TopolinkError::Parse(parse_err) => {
            vec![Reportable::Parse(ParseAdapter::new(parse_err, None))]
        }
        TopolinkError::Description { message, src, span } => {
            vec![Reportable::Description(DescriptionAdapter {
                message,
                src,
                span: span.clone(),
            })]
        }
        TopolinkError::InVertex {
            element,
            index,
            source,
        } => match source.as_ref() {
            TopolinkError::Parse(parse_err) => vec![Reportable::Parse(ParseAdapter::new(
                parse_err,
                Some(format!("vertex {index} of `{element}`")),
            ))],
            _ => vec![Reportable::Error(ErrorAdapter(err))],
        },
        _ => vec![Reportable::Error(ErrorAdapter(err))],
    }
}

fn error_code(kind: ErrorKind) -> &'static str {
    match kind {
        ErrorKind::Structural => "topolink::structural",
        ErrorKind::Invariant => "topolink::invariant",
        ErrorKind::Usage => "topolink::usage",
        ErrorKind::Parse => "topolink::parse",
        ErrorKind::Description => "topolink::description",
        ErrorKind::Io => "topolink::io",
    }
}

/// Span of the parse failure within the untrimmed input.
fn error_span(err: &ParseError) -> SourceSpan {
    let input = err.input();
    let leading = input.len() - input.trim_start().len();
    let start = (leading + err.offset()).min(input.len());
    let len = usize::from(start < input.len());
    SourceSpan::new(start.into(), len)
}
