//! # Topolink Parser
//!
//! Parser for the textual anchor references stored in drawing files and
//! typed by users. A vertex anchor is written in one of three forms:
//!
//! | Form                         | Meaning                                       |
//! |------------------------------|-----------------------------------------------|
//! | `(x, y)`                     | Free position                                 |
//! | `host:point`                 | Connection to a named (or ordinal) point       |
//! | `@bundle:after:distance`     | Attachment to a bundle, `distance` past vertex `after` |
//!
//! ## Usage
//!
//! ```
//! # use topolink_parser::{parse_anchor, AnchorRef, PointRef};
//! let anchor = parse_anchor("router1:eth0").unwrap();
//! assert!(matches!(anchor, AnchorRef::Connection { point: PointRef::Name(_), .. }));
//!
//! let anchor = parse_anchor("@trunk:1:42.5").unwrap();
//! assert_eq!(anchor.to_string(), "@trunk:1:42.5");
//! ```

mod anchor_ref;
pub mod error;

pub use anchor_ref::{AnchorRef, PointRef};
pub use error::ParseError;

use log::trace;
use winnow::{
    Parser as _,
    ascii::{dec_uint, float, space0},
    combinator::{alt, cut_err, delimited, eof, preceded, separated_pair, terminated},
    error::{ModalResult, StrContext, StrContextValue},
    token::take_while,
};

use topolink_core::{geometry::Point, identifier::Id};

/// Parse an anchor reference.
///
/// Surrounding whitespace is ignored.
///
/// # Errors
///
/// Returns [`ParseError`] if the text matches none of the three forms, or
/// if a coordinate or distance is not a finite number.
///
/// # Example
///
/// ```
/// # use topolink_parser::{parse_anchor, AnchorRef};
/// # use topolink_core::geometry::Point;
/// let anchor = parse_anchor(" (120, 80) ").unwrap();
/// assert_eq!(anchor, AnchorRef::Position(Point::new(120.0, 80.0)));
/// ```
pub fn parse_anchor(source: &str) -> Result<AnchorRef, ParseError> {
    trace!(source = source; "Parsing anchor reference");

    let trimmed = source.trim();
    let anchor = terminated(alt((position, bundle, connection)), eof)
        .context(StrContext::Label("anchor reference"))
        .parse(trimmed)
        .map_err(|err| ParseError::new(source, err.offset(), err.inner().to_string()))?;

    if !anchor.is_finite() {
        return Err(ParseError::new(
            source,
            0,
            "coordinates and distances must be finite numbers",
        ));
    }

    Ok(anchor)
}

fn name<'a>(input: &mut &'a str) -> ModalResult<&'a str> {
    take_while(1.., |c: char| {
        c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.')
    })
    .context(StrContext::Label("name"))
    .parse_next(input)
}

fn position(input: &mut &str) -> ModalResult<AnchorRef> {
    delimited(
        ('(', space0),
        cut_err(separated_pair(float, (space0, ',', space0), float)),
        (space0, cut_err(')')),
    )
    .map(|(x, y): (f32, f32)| AnchorRef::Position(Point::new(x, y)))
    .context(StrContext::Expected(StrContextValue::Description("`(x, y)`")))
    .parse_next(input)
}

fn bundle(input: &mut &str) -> ModalResult<AnchorRef> {
    preceded('@', cut_err((name, ':', dec_uint, ':', float)))
        .map(
            |(bundle, _, after_vertex, _, distance): (&str, char, usize, char, f32)| {
                AnchorRef::Bundle {
                    bundle: Id::new(bundle),
                    after_vertex,
                    distance,
                }
            },
        )
        .context(StrContext::Expected(StrContextValue::Description(
            "`@bundle:vertex:distance`",
        )))
        .parse_next(input)
}

/// Ordinals are written without leading zeros; `007` is a name.
fn ordinal(input: &mut &str) -> ModalResult<usize> {
    take_while(1.., |c: char| c.is_ascii_digit())
        .verify(|digits: &str| digits == "0" || !digits.starts_with('0'))
        .try_map(str::parse::<usize>)
        .parse_next(input)
}

fn point_ref(input: &mut &str) -> ModalResult<PointRef> {
    alt((
        terminated(ordinal, eof).map(PointRef::Ordinal),
        name.map(|name| PointRef::Name(Id::new(name))),
    ))
    .parse_next(input)
}

fn connection(input: &mut &str) -> ModalResult<AnchorRef> {
    separated_pair(name, ':', point_ref)
        .map(|(host, point)| AnchorRef::Connection {
            host: Id::new(host),
            point,
        })
        .context(StrContext::Expected(StrContextValue::Description(
            "`host:point`",
        )))
        .parse_next(input)
}
