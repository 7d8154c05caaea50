//! XML materializer.
//!
//! Renders a serialized `Document` tree as indented XML text and writes it
//! to disk.

use std::path::Path;

use crate::encoding;
use crate::error::Error;
use crate::tree::{Document, NodeId, NodeKind};

/// Options controlling how a document is rendered.
///
/// # Examples
///
/// ```
/// use objxml::serial::SerializeOptions;
///
/// let options = SerializeOptions::default().indent_str("    ").encoding("ISO-8859-1");
/// assert!(options.indent);
/// assert_eq!(options.encoding.as_deref(), Some("ISO-8859-1"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerializeOptions {
    /// Whether to put each element on its own line, indented by depth.
    /// Defaults to `true`.
    pub indent: bool,
    /// The string written once per nesting level when `indent` is `true`.
    /// Defaults to a tab followed by two spaces.
    pub indent_str: String,
    /// Output encoding label. `None` writes UTF-8 without an `encoding`
    /// pseudo-attribute in the declaration.
    pub encoding: Option<String>,
}

impl Default for SerializeOptions {
    fn default() -> Self {
        Self {
            indent: true,
            indent_str: "\t  ".to_string(),
            encoding: None,
        }
    }
}

impl SerializeOptions {
    /// Enables or disables indented output.
    #[must_use]
    pub fn indent(mut self, indent: bool) -> Self {
        self.indent = indent;
        self
    }

    /// Sets the indentation unit for each nesting level.
    #[must_use]
    pub fn indent_str(mut self, s: &str) -> Self {
        self.indent_str = s.to_string();
        self
    }

    /// Sets the output encoding label, e.g. `"ISO-8859-1"`.
    #[must_use]
    pub fn encoding(mut self, label: &str) -> Self {
        self.encoding = Some(label.to_string());
        self
    }
}

/// Renders a document to XML text.
///
/// The first line is the XML declaration. A `header` comment, if given, is
/// placed on the line right after it. Leaf elements keep their text inline;
/// elements with children put each child on its own line.
///
/// # Errors
///
/// Returns `Error::Encoding` if `options.encoding` names an unknown or
/// decode-only encoding.
///
/// # Examples
///
/// ```
/// use objxml::Document;
/// use objxml::serial::{materialize, SerializeOptions};
///
/// let mut doc = Document::new();
/// let root = doc.create_element("Config");
/// doc.append_child(doc.root(), root);
/// let xml = materialize(&doc, &SerializeOptions::default(), Some("generated")).unwrap();
/// assert_eq!(xml, "<?xml version=\"1.0\" ?>\n<!--generated-->\n<Config/>\n");
/// ```
pub fn materialize(
    doc: &Document,
    options: &SerializeOptions,
    header: Option<&str>,
) -> Result<String, Error> {
    let mut output = String::new();

    output.push_str("<?xml version=\"1.0\" ");
    if let Some(label) = &options.encoding {
        let target = encoding::output_encoding(label)?;
        check_markup_encodable(doc, header, target)?;
        output.push_str("encoding=\"");
        output.push_str(target.name());
        output.push('"');
    }
    output.push_str("?>\n");

    if let Some(header) = header {
        output.push_str("<!--");
        write_comment_text(&mut output, header);
        output.push_str("-->\n");
    }

    for child in doc.children(doc.root()) {
        serialize_node(doc, child, &mut output, options, 0);
    }

    if !output.ends_with('\n') {
        output.push('\n');
    }
    Ok(output)
}

/// Writes already-rendered document text to `path`, transcoding it when an
/// output encoding is configured.
///
/// # Errors
///
/// Returns `Error::Encoding` for an unusable encoding and `Error::Io` if the
/// file cannot be written.
pub fn write_document(text: &str, path: &Path, options: &SerializeOptions) -> Result<(), Error> {
    let bytes = match &options.encoding {
        Some(label) => encoding::encode_text(text, label)?,
        None => text.as_bytes().to_vec(),
    };
    std::fs::write(path, &bytes).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    log::debug!("wrote {} bytes to {}", bytes.len(), path.display());
    Ok(())
}

/// Character references are only interpreted in text and attribute values,
/// so element names and the header comment must be representable as-is.
fn check_markup_encodable(
    doc: &Document,
    header: Option<&str>,
    target: &'static encoding_rs::Encoding,
) -> Result<(), Error> {
    if let Some(header) = header {
        encoding::ensure_representable("header comment", header, target)?;
    }
    for id in doc.descendants(doc.root()) {
        if let Some(name) = doc.node_name(id) {
            encoding::ensure_representable("element name", name, target)?;
        }
    }
    Ok(())
}

fn write_indent(out: &mut String, options: &SerializeOptions, depth: usize) {
    if options.indent {
        for _ in 0..depth {
            out.push_str(&options.indent_str);
        }
    }
}

fn serialize_node(doc: &Document, id: NodeId, out: &mut String, options: &SerializeOptions, depth: usize) {
    match &doc.node(id).kind {
        NodeKind::Element { name, attributes } => {
            write_indent(out, options, depth);
            out.push('<');
            out.push_str(name);
            for attr in attributes {
                out.push(' ');
                out.push_str(&attr.name);
                out.push_str("=\"");
                write_escaped_attr(out, &attr.value);
                out.push('"');
            }

            match doc.first_child(id) {
                None => out.push_str("/>"),
                Some(first) if matches!(doc.node(first).kind, NodeKind::Text { .. }) => {
                    out.push('>');
                    for child in doc.children(id) {
                        serialize_node(doc, child, out, options, depth + 1);
                    }
                    out.push_str("</");
                    out.push_str(name);
                    out.push('>');
                }
                Some(_) => {
                    out.push('>');
                    if options.indent {
                        out.push('\n');
                    }
                    for child in doc.children(id) {
                        serialize_node(doc, child, out, options, depth + 1);
                    }
                    write_indent(out, options, depth);
                    out.push_str("</");
                    out.push_str(name);
                    out.push('>');
                }
            }
            if options.indent {
                out.push('\n');
            }
        }
        NodeKind::Text { content } => write_escaped_text(out, content),
        NodeKind::Document => {
            // Should not appear as a child node
        }
    }
}

/// Writes a hexadecimal character reference (`&#xHH;`) for a Unicode code point.
fn write_hex_char_ref(out: &mut String, ch: char) {
    use std::fmt::Write;
    let _ = write!(out, "&#x{:X};", ch as u32);
}

/// Escapes text content:
/// - `<`, `>`, `&` become named entity references
/// - `\r` becomes `&#13;`
/// - `\t` and `\n` pass through
/// - other control characters below 0x20 are hex-encoded
fn write_escaped_text(out: &mut String, text: &str) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\r' => out.push_str("&#13;"),
            '\t' | '\n' => out.push(ch),
            c if (c as u32) < 0x20 => write_hex_char_ref(out, c),
            _ => out.push(ch),
        }
    }
}

/// Escapes an attribute value. Whitespace other than the space character is
/// written as a character reference so it survives attribute normalization.
fn write_escaped_attr(out: &mut String, text: &str) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\t' => out.push_str("&#9;"),
            '\n' => out.push_str("&#10;"),
            '\r' => out.push_str("&#13;"),
            c if (c as u32) < 0x20 => write_hex_char_ref(out, c),
            _ => out.push(ch),
        }
    }
}

/// Writes comment text, breaking up `--` sequences and a trailing `-`,
/// neither of which may appear inside an XML comment.
fn write_comment_text(out: &mut String, text: &str) {
    let mut prev_dash = false;
    for ch in text.chars() {
        if ch == '-' && prev_dash {
            out.push(' ');
        }
        prev_dash = ch == '-';
        out.push(ch);
    }
    if prev_dash {
        out.push(' ');
    }
}
