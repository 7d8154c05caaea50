//! Output encoding.
//!
//! Rendered documents are built as UTF-8 `String`s. When an output encoding is
//! configured, this module resolves its label and transcodes the finished text
//! through `encoding_rs` before it is written out. Characters the target
//! encoding cannot represent are emitted as decimal character references
//! (`&#NNNN;`). That is only well-formed inside text and attribute values, so
//! the materializer first checks element names and the header comment with
//! [`ensure_representable`].

/// An error that occurs while resolving or applying an output encoding.
#[derive(Debug, Clone, thiserror::Error)]
#[error("encoding error: {message}")]
pub struct EncodingError {
    /// A human-readable description of the encoding error.
    pub message: String,
}

impl EncodingError {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Resolves an encoding label to an `encoding_rs` encoding usable for output.
///
/// Labels are matched case-insensitively against the WHATWG label table
/// (`"latin1"`, `"ISO-8859-1"`, `"utf8"`, ...).
///
/// # Errors
///
/// Returns `EncodingError` if the label is unknown, or if it names an
/// encoding `encoding_rs` can only decode (UTF-16, `replacement`).
pub fn output_encoding(label: &str) -> Result<&'static encoding_rs::Encoding, EncodingError> {
    let encoding = encoding_rs::Encoding::for_label(label.as_bytes())
        .ok_or_else(|| EncodingError::new(format!("unsupported encoding: {label}")))?;
    if encoding.output_encoding() != encoding {
        return Err(EncodingError::new(format!(
            "cannot produce output in {}",
            encoding.name()
        )));
    }
    Ok(encoding)
}

/// Checks that `text` can be written in `encoding` without falling back to
/// character references. `what` names the text in the error message.
///
/// # Errors
///
/// Returns `EncodingError` if any character of `text` is unmappable.
pub fn ensure_representable(
    what: &str,
    text: &str,
    encoding: &'static encoding_rs::Encoding,
) -> Result<(), EncodingError> {
    let (_, _, unmappable) = encoding.encode(text);
    if unmappable {
        return Err(EncodingError::new(format!(
            "{what} `{text}` cannot be represented in {}",
            encoding.name()
        )));
    }
    Ok(())
}

/// Transcodes UTF-8 text into the named output encoding.
///
/// # Errors
///
/// See [`output_encoding`].
pub fn encode_text(text: &str, label: &str) -> Result<Vec<u8>, EncodingError> {
    let encoding = output_encoding(label)?;
    let (bytes, _used, unmappable) = encoding.encode(text);
    if unmappable {
        log::debug!(
            "characters not representable in {} were written as character references",
            encoding.name()
        );
    }
    Ok(bytes.into_owned())
}
