//! Node type definitions.
//!
//! The `NodeKind` enum represents the node types the serialization engine
//! produces. Each variant carries the node-type-specific payload.

use super::Attribute;

/// The kind of a node and its associated data.
///
/// Navigation links (parent, children, siblings) are stored in `NodeData`,
/// not here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// The document node. There is exactly one per `Document`.
    Document,

    /// An element node, e.g., `<count type="int">`.
    Element {
        /// The element's tag name.
        name: String,
        /// Attributes on this element, in insertion order.
        attributes: Vec<Attribute>,
    },

    /// A text node holding the canonical form of a primitive value.
    Text {
        /// The unescaped text content.
        content: String,
    },
}
