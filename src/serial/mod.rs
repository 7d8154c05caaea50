//! Document materialization.
//!
//! Turns a finished `Document` tree into XML text: the XML declaration, an
//! optional header comment, then the element tree, indented one unit per
//! nesting level. Text and attribute values are escaped on the way out.

pub mod xml;

pub use xml::{materialize, write_document, SerializeOptions};
