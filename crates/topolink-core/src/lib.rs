//! Topolink Core Types
//!
//! Foundational types shared by the Topolink crates:
//!
//! - **Identifiers**: String-interned element names ([`identifier::Id`])
//! - **Geometry**: Points, bounds and segment vectors ([`geometry`] module)
//! - **Directions**: Preferred directions of connection points ([`direction`] module)

pub mod direction;
pub mod geometry;
pub mod identifier;
