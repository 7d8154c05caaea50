//! Error types for object-graph serialization.
//!
//! Every fallible operation in the crate returns [`Error`]. There is no
//! recovery mode: the first error aborts the whole `serialize` call and no
//! partial document is handed back. The only silent omission left in the
//! engine is a `none` value, which by definition produces no node.

use std::path::PathBuf;

use crate::encoding::EncodingError;

/// The error type returned when an object graph cannot be serialized.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A mapping key is neither a string, a scalar, nor a tuple of scalars,
    /// so the key encoder has no suffix for it.
    #[error("unsupported mapping key of type `{key_type}`")]
    UnsupportedKey {
        /// The type name of the offending key (or tuple element).
        key_type: String,
    },

    /// A value with no supported shape reached the engine.
    #[error("unsupported value of type `{type_name}` at {path}")]
    UnsupportedValue {
        /// The type name recorded on the opaque value.
        type_name: String,
        /// Slash-separated element path of the node the value belonged to.
        path: String,
    },

    /// A field name, encoded key, or root type name is not a valid element name.
    #[error("`{name}` is not a valid element name (under {path})")]
    InvalidElementName {
        /// The rejected name.
        name: String,
        /// Slash-separated element path of the would-be parent.
        path: String,
    },

    /// A numeric array was built from inconsistent parts.
    #[error("invalid numeric array: {reason}")]
    InvalidArray {
        /// What was wrong with the shape or the elements.
        reason: String,
    },

    /// An element name starting with `key_` could not be decoded.
    #[error("malformed encoded key `{name}`")]
    InvalidKeyEncoding {
        /// The name that failed to decode.
        name: String,
    },

    /// The configured output encoding cannot be used.
    #[error(transparent)]
    Encoding(#[from] EncodingError),

    /// Writing the rendered document failed.
    #[error("failed to write {}: {source}", path.display())]
    Io {
        /// Destination file.
        path: PathBuf,
        /// The underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
}
