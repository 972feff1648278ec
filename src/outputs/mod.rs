//! Output emission for the three tools.
//!
//! Primary output always goes to stdout; diagnostics stay on stderr. The
//! two submodules cover the two presentation modes every tool offers:
//!
//! - [`json`]: pretty-printed JSON documents (two-space indent, non-ASCII
//!   preserved literally)
//! - [`human`]: the human-readable listings

pub mod human;
pub mod json;
