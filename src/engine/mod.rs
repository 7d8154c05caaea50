//! The serialization engine.
//!
//! Walks a [`Value`] tree depth-first and mirrors it into a [`Document`]:
//!
//! - the root element is named after the root value's type;
//! - a primitive becomes text inside its element, tagged with
//!   `type="<subtype>"`;
//! - a composite tags its element with `type="<kind>"` and gets one child
//!   element per field, entry, or member;
//! - a `none` field of a record or named tuple produces no element at all;
//!   a `none` member of a sequence, set, or mapping keeps its element (so
//!   indices stay aligned) but leaves it empty and untagged.
//!
//! All state of a call lives in a private `Context` that is created when the
//! call starts and consumed when it ends, so a [`Serializer`] can be shared
//! between threads and reused freely.

mod tags;

pub use tags::child_tag;

use std::borrow::Borrow;
use std::fmt;
use std::path::Path;

use crate::error::Error;
use crate::exclusion::{DeclaredExclusions, ExclusionLookup};
use crate::keys::make_keys_serializable;
use crate::serial::{materialize, write_document, SerializeOptions};
use crate::tree::{Document, NodeId};
use crate::util::name::is_valid_element_name;
use crate::value::{classify, Instance, NamedTuple, Scalar, ToValue, Value, ValueKind};

const TYPE_ATTR: &str = "type";
const CLASS_NAME_ATTR: &str = "class_name";
const MODULE_ATTR: &str = "module";
const NAMEDTUPLE_NAME_ATTR: &str = "namedtuple_name";

/// Serializes object graphs into type-tagged XML documents.
///
/// # Examples
///
/// ```
/// use objxml::{Instance, Serializer, ToValue, Value};
///
/// struct Counter {
///     count: i64,
/// }
///
/// impl ToValue for Counter {
///     fn to_value(&self) -> Value {
///         Instance::new("Counter", "demo").field("count", &self.count).into()
///     }
/// }
///
/// let xml = Serializer::new().render(&Counter { count: 7 }, None).unwrap();
/// assert!(xml.contains("<count type=\"int\">7</count>"));
/// ```
pub struct Serializer {
    exclusions: Box<dyn ExclusionLookup + Send + Sync>,
    options: SerializeOptions,
}

impl Serializer {
    /// Creates a serializer using [`DeclaredExclusions`] and default
    /// rendering options.
    #[must_use]
    pub fn new() -> Self {
        Self {
            exclusions: Box::new(DeclaredExclusions),
            options: SerializeOptions::default(),
        }
    }

    /// Replaces the attribute exclusion lookup.
    #[must_use]
    pub fn with_exclusions(mut self, lookup: impl ExclusionLookup + Send + Sync + 'static) -> Self {
        self.exclusions = Box::new(lookup);
        self
    }

    /// Replaces the rendering options.
    #[must_use]
    pub fn with_options(mut self, options: SerializeOptions) -> Self {
        self.options = options;
        self
    }

    /// The rendering options in use.
    #[must_use]
    pub fn options(&self) -> &SerializeOptions {
        &self.options
    }

    /// Builds the document tree for `root`.
    ///
    /// # Errors
    ///
    /// Fails on the first unsupported value, unsupported mapping key, or
    /// invalid element name; no partial document is returned.
    pub fn to_document<T: ToValue + ?Sized>(&self, root: &T) -> Result<Document, Error> {
        let value = root.to_value();
        let type_name = value.type_name();
        let kind = classify(&value);
        log::debug!("serializing `{type_name}` ({kind})");
        if kind == ValueKind::Unsupported {
            return Err(Error::UnsupportedValue {
                type_name: type_name.to_string(),
                path: "/".to_string(),
            });
        }

        let mut ctx = Context {
            doc: Document::new(),
            exclusions: self.exclusions.as_ref(),
        };
        let document_node = ctx.doc.root();
        let root_element = ctx.append_element(document_node, type_name)?;
        ctx.visit(&value, root_element)?;

        log::debug!(
            "serialized `{type_name}` into {} nodes",
            ctx.doc.node_count()
        );
        Ok(ctx.doc)
    }

    /// Builds and renders the document for `root`, with an optional header
    /// comment after the XML declaration.
    ///
    /// # Errors
    ///
    /// See [`to_document`](Self::to_document); also fails if the configured
    /// output encoding is unusable.
    pub fn render<T: ToValue + ?Sized>(&self, root: &T, header: Option<&str>) -> Result<String, Error> {
        let doc = self.to_document(root)?;
        materialize(&doc, &self.options, header)
    }

    /// Serializes `root`, writing the rendered text to `output_path` when one
    /// is given, and returns the text.
    ///
    /// # Errors
    ///
    /// See [`render`](Self::render); also returns `Error::Io` if the file
    /// cannot be written. A partially written file is not removed.
    pub fn serialize<T: ToValue + ?Sized>(
        &self,
        root: &T,
        output_path: Option<&Path>,
        header: Option<&str>,
    ) -> Result<String, Error> {
        let text = self.render(root, header)?;
        if let Some(path) = output_path {
            write_document(&text, path, &self.options)?;
        }
        Ok(text)
    }
}

impl Default for Serializer {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Serializer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Serializer")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

/// Builds the document tree for `root` with the default [`Serializer`].
///
/// # Errors
///
/// See [`Serializer::to_document`].
pub fn to_document<T: ToValue + ?Sized>(root: &T) -> Result<Document, Error> {
    Serializer::new().to_document(root)
}

/// Renders `root` to XML text with the default [`Serializer`].
///
/// # Errors
///
/// See [`Serializer::render`].
pub fn to_string<T: ToValue + ?Sized>(root: &T, header: Option<&str>) -> Result<String, Error> {
    Serializer::new().render(root, header)
}

/// Renders `root` and writes it to `path` with the default [`Serializer`].
///
/// # Errors
///
/// See [`Serializer::serialize`].
pub fn to_file<T: ToValue + ?Sized>(root: &T, path: &Path, header: Option<&str>) -> Result<(), Error> {
    Serializer::new().serialize(root, Some(path), header).map(drop)
}

/// Per-call state: the document being built and the lookup it consults.
struct Context<'a> {
    doc: Document,
    exclusions: &'a dyn ExclusionLookup,
}

impl Context<'_> {
    fn visit(&mut self, value: &Value, parent: NodeId) -> Result<(), Error> {
        let kind = classify(value);
        log::trace!(
            "<{}> <- {kind}",
            self.doc.node_name(parent).unwrap_or_default()
        );
        if kind.is_composite() {
            self.doc.set_attribute(parent, TYPE_ATTR, kind.name());
        }

        match value {
            Value::None => Ok(()),
            Value::Scalar(scalar) => {
                self.visit_scalar(scalar, parent);
                Ok(())
            }
            Value::Instance(instance) => self.visit_instance(instance, parent),
            Value::NamedTuple(tuple) => self.visit_named_tuple(tuple, parent),
            Value::List(items) | Value::Tuple(items) | Value::Set(items) => {
                self.visit_indexed(items, parent)
            }
            Value::NdArray(array) => self.visit_indexed(array.elements(), parent),
            Value::Dict(entries) => self.visit_dict(entries, parent),
            Value::Opaque { type_name } => Err(Error::UnsupportedValue {
                type_name: type_name.clone(),
                path: self.path_of(parent),
            }),
        }
    }

    fn visit_scalar(&mut self, scalar: &Scalar, parent: NodeId) {
        self.doc.set_attribute(parent, TYPE_ATTR, scalar.kind().name());
        let text = self.doc.create_text(scalar.to_string());
        self.doc.append_child(parent, text);
    }

    fn visit_instance(&mut self, instance: &Instance, parent: NodeId) -> Result<(), Error> {
        let class = instance.class();
        let excluded = self.exclusions.excluded_attributes(class);
        self.doc.set_attribute(parent, CLASS_NAME_ATTR, class.name());
        self.doc.set_attribute(parent, MODULE_ATTR, class.module());

        for (name, value) in instance.fields() {
            if value.is_none() || excluded.iter().any(|e| e == name) {
                continue;
            }
            let child = self.append_element(parent, name)?;
            self.visit(value, child)?;
        }
        Ok(())
    }

    fn visit_named_tuple(&mut self, tuple: &NamedTuple, parent: NodeId) -> Result<(), Error> {
        self.doc.set_attribute(parent, NAMEDTUPLE_NAME_ATTR, tuple.name());
        for (name, value) in tuple.fields() {
            if value.is_none() || name.starts_with("__") {
                continue;
            }
            let child = self.append_element(parent, name)?;
            self.visit(value, child)?;
        }
        Ok(())
    }

    fn visit_indexed<I>(&mut self, items: I, parent: NodeId) -> Result<(), Error>
    where
        I: IntoIterator,
        I::Item: Borrow<Value>,
    {
        let parent_tag = self.doc.node_name(parent).unwrap_or_default().to_string();
        for (index, item) in items.into_iter().enumerate() {
            let child = self.append_element(parent, &child_tag(&parent_tag, index))?;
            self.visit(item.borrow(), child)?;
        }
        Ok(())
    }

    fn visit_dict(&mut self, entries: &[(Value, Value)], parent: NodeId) -> Result<(), Error> {
        for (name, value) in make_keys_serializable(entries)? {
            let child = self.append_element(parent, &name)?;
            self.visit(value, child)?;
        }
        Ok(())
    }

    /// Creates an element named `name` under `parent`, rejecting names that
    /// would not render as a well-formed tag.
    fn append_element(&mut self, parent: NodeId, name: &str) -> Result<NodeId, Error> {
        if !is_valid_element_name(name) {
            return Err(Error::InvalidElementName {
                name: name.to_string(),
                path: self.path_of(parent),
            });
        }
        let element = self.doc.create_element(name);
        self.doc.append_child(parent, element);
        Ok(element)
    }

    fn path_of(&self, id: NodeId) -> String {
        let path = self.doc.element_path(id);
        if path.is_empty() {
            "/".to_string()
        } else {
            path
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exclusion::ExclusionTable;
    use crate::value::NumericArray;
    use pretty_assertions::assert_eq;

    fn root_of(doc: &Document) -> NodeId {
        doc.root_element().unwrap()
    }

    fn child_names(doc: &Document, id: NodeId) -> Vec<String> {
        doc.children(id)
            .filter_map(|c| doc.node_name(c).map(str::to_string))
            .collect()
    }

    fn record(fields: Vec<(&str, Value)>) -> Value {
        fields
            .into_iter()
            .fold(Instance::new("Rec", "tests"), |inst, (name, value)| {
                inst.field(name, &value)
            })
            .into()
    }

    #[test]
    fn test_count_scenario() {
        let doc = to_document(&record(vec![("count", 7_i64.to_value())])).unwrap();
        let root = root_of(&doc);
        assert_eq!(doc.node_name(root), Some("Rec"));
        assert_eq!(doc.attribute(root, "type"), Some("instance"));
        assert_eq!(doc.attribute(root, "class_name"), Some("Rec"));
        assert_eq!(doc.attribute(root, "module"), Some("tests"));

        let count = doc.child_element(root, "count").unwrap();
        assert_eq!(doc.attribute(count, "type"), Some("int"));
        assert_eq!(doc.text_content(count), "7");
        assert_eq!(child_names(&doc, root), vec!["count"]);
    }

    #[test]
    fn test_every_primitive_subtype_becomes_a_leaf() {
        let scalars = [
            Scalar::Int(-1),
            Scalar::Int8(8),
            Scalar::Int16(16),
            Scalar::Int32(32),
            Scalar::Int64(64),
            Scalar::UInt8(8),
            Scalar::UInt16(16),
            Scalar::UInt32(32),
            Scalar::UInt64(64),
            Scalar::Float(0.5),
            Scalar::Float32(1.25),
            Scalar::Float64(2.0),
            Scalar::Bool(false),
            Scalar::Str("hello".to_string()),
            Scalar::Complex64(num_complex::Complex32::new(1.0, 1.0)),
            Scalar::Complex128(num_complex::Complex64::new(0.0, -1.0)),
        ];
        for scalar in scalars {
            let doc = to_document(&record(vec![("v", Value::Scalar(scalar.clone()))])).unwrap();
            let leaf = doc.child_element(root_of(&doc), "v").unwrap();
            assert_eq!(doc.attribute(leaf, "type"), Some(scalar.kind().name()));
            assert_eq!(doc.text_content(leaf), scalar.to_string());
            assert_eq!(doc.children(leaf).count(), 1);
        }
    }

    #[test]
    fn test_none_fields_are_omitted() {
        let doc = to_document(&record(vec![
            ("a", 1_i64.to_value()),
            ("missing", Value::None),
            ("b", None::<i64>.to_value()),
        ]))
        .unwrap();
        assert_eq!(child_names(&doc, root_of(&doc)), vec!["a"]);
    }

    #[test]
    fn test_none_fields_omitted_in_nested_instance() {
        let inner: Value = Instance::new("Inner", "tests")
            .field("x", &1_i64)
            .field("y", &None::<f64>)
            .into();
        let doc = to_document(&record(vec![("inner", inner), ("gone", Value::None)])).unwrap();
        let root = root_of(&doc);
        assert_eq!(child_names(&doc, root), vec!["inner"]);
        let inner = doc.child_element(root, "inner").unwrap();
        assert_eq!(child_names(&doc, inner), vec!["x"]);
    }

    #[test]
    fn test_none_named_tuple_fields_are_omitted() {
        let tuple = NamedTuple::new("Span")
            .field("start", &0_i64)
            .field("end", &None::<i64>);
        let doc = to_document(&record(vec![("span", tuple.into())])).unwrap();
        let span = doc.child_element(root_of(&doc), "span").unwrap();
        assert_eq!(doc.attribute(span, "namedtuple_name"), Some("Span"));
        assert_eq!(child_names(&doc, span), vec!["start"]);
    }

    #[test]
    fn test_none_sequence_member_keeps_its_index() {
        let items = Value::List(vec![1_i64.to_value(), Value::None, 3_i64.to_value()]);
        let doc = to_document(&record(vec![("items", items)])).unwrap();
        let items = doc.child_element(root_of(&doc), "items").unwrap();
        assert_eq!(child_names(&doc, items), vec!["items_e0", "items_e1", "items_e2"]);
        let hole = doc.child_element(items, "items_e1").unwrap();
        assert!(doc.attributes(hole).is_empty());
        assert_eq!(doc.first_child(hole), None);
    }

    #[test]
    fn test_sequence_children_named_by_index() {
        for (value, kind) in [
            (vec![1_i64, 2, 3].to_value(), "list"),
            ((1_i64, 2_i64, 3_i64).to_value(), "tuple"),
            (NumericArray::from_vec(vec![1_i64, 2, 3]).into(), "ndarray"),
        ] {
            let doc = to_document(&record(vec![("items", value)])).unwrap();
            let items = doc.child_element(root_of(&doc), "items").unwrap();
            assert_eq!(doc.attribute(items, "type"), Some(kind));
            assert_eq!(child_names(&doc, items), vec!["items_e0", "items_e1", "items_e2"]);
        }
    }

    #[test]
    fn test_ndarray_elements_carry_width() {
        let array = NumericArray::from_vec(vec![1.5_f32]);
        let doc = to_document(&record(vec![("a", array.into())])).unwrap();
        let a = doc.child_element(root_of(&doc), "a").unwrap();
        let e0 = doc.child_element(a, "a_e0").unwrap();
        assert_eq!(doc.attribute(e0, "type"), Some("float32"));
        assert_eq!(doc.text_content(e0), "1.5");
    }

    #[test]
    fn test_matrix_rows_nest() {
        let matrix = NumericArray::from_shape_vec(vec![2, 2], vec![1_u8, 2, 3, 4]).unwrap();
        let doc = to_document(&record(vec![("m", matrix.into())])).unwrap();
        let m = doc.child_element(root_of(&doc), "m").unwrap();
        let row = doc.child_element(m, "m_e1").unwrap();
        assert_eq!(doc.attribute(row, "type"), Some("ndarray"));
        assert_eq!(child_names(&doc, row), vec!["m_e1_e0", "m_e1_e1"]);
        assert_eq!(doc.text_content(row), "34");
    }

    #[test]
    fn test_set_members() {
        let set = Value::Set(vec![Value::str("x"), Value::str("y")]);
        let doc = to_document(&record(vec![("tags", set)])).unwrap();
        let tags = doc.child_element(root_of(&doc), "tags").unwrap();
        assert_eq!(doc.attribute(tags, "type"), Some("set"));
        assert_eq!(child_names(&doc, tags).len(), 2);
    }

    #[test]
    fn test_dict_keys_are_encoded() {
        let dict = Value::Dict(vec![
            (1_i64.to_value(), Value::str("x")),
            ((2_i64, 3_i64).to_value(), Value::str("y")),
            (Value::str("name"), Value::str("z")),
        ]);
        let doc = to_document(&record(vec![("d", dict)])).unwrap();
        let d = doc.child_element(root_of(&doc), "d").unwrap();
        assert_eq!(doc.attribute(d, "type"), Some("dict"));
        assert_eq!(child_names(&doc, d), vec!["key_1_", "key_2_3_tuple", "name"]);
        let y = doc.child_element(d, "key_2_3_tuple").unwrap();
        assert_eq!(doc.text_content(y), "y");
    }

    #[test]
    fn test_named_tuple_skips_dunder_fields() {
        let tuple = NamedTuple::new("Pair")
            .field("left", &1_i64)
            .field("__hidden", &2_i64)
            .field("right", &3_i64);
        let doc = to_document(&record(vec![("p", tuple.into())])).unwrap();
        let p = doc.child_element(root_of(&doc), "p").unwrap();
        assert_eq!(doc.attribute(p, "type"), Some("namedtuple"));
        assert_eq!(doc.attribute(p, "namedtuple_name"), Some("Pair"));
        assert_eq!(child_names(&doc, p), vec!["left", "right"]);
    }

    #[test]
    fn test_declared_exclusions_skip_fields() {
        let value: Value = Instance::new("Cached", "tests")
            .field("a", &1_i64)
            .field("_cache", &2_i64)
            .exclude(["_cache"])
            .into();
        let doc = to_document(&value).unwrap();
        assert_eq!(child_names(&doc, root_of(&doc)), vec!["a"]);
    }

    #[test]
    fn test_table_exclusions_replace_declared() {
        let value: Value = Instance::new("User", "app")
            .field("name", "ada")
            .field("password", "hunter2")
            .field("_cache", &0_i64)
            .exclude(["_cache"])
            .into();
        let serializer =
            Serializer::new().with_exclusions(ExclusionTable::new().exclude("app", "User", ["password"]));
        let doc = serializer.to_document(&value).unwrap();
        assert_eq!(child_names(&doc, root_of(&doc)), vec!["name", "_cache"]);
    }

    #[test]
    fn test_nested_instances() {
        let inner: Value = Instance::new("Inner", "tests").field("x", &1_i64).into();
        let doc = to_document(&record(vec![("inner", inner)])).unwrap();
        let inner = doc.child_element(root_of(&doc), "inner").unwrap();
        assert_eq!(doc.attribute(inner, "type"), Some("instance"));
        assert_eq!(doc.attribute(inner, "class_name"), Some("Inner"));
        assert_eq!(child_names(&doc, inner), vec!["x"]);
    }

    #[test]
    fn test_unsupported_value_reports_path() {
        let value = record(vec![(
            "conns",
            Value::List(vec![
                1_i64.to_value(),
                Value::Opaque {
                    type_name: "Socket".to_string(),
                },
            ]),
        )]);
        let err = to_document(&value).unwrap_err();
        assert_eq!(
            err.to_string(),
            "unsupported value of type `Socket` at Rec/conns/conns_e1"
        );
    }

    #[test]
    fn test_unsupported_root_is_reported_before_naming() {
        let err = to_document(&Value::Opaque {
            type_name: "std::fs::File".to_string(),
        })
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "unsupported value of type `std::fs::File` at /"
        );
    }

    #[test]
    fn test_unsupported_key_is_fatal() {
        let dict = Value::Dict(vec![(Value::List(vec![]), Value::str("v"))]);
        let err = to_document(&record(vec![("d", dict)])).unwrap_err();
        assert!(matches!(err, Error::UnsupportedKey { .. }));
    }

    #[test]
    fn test_invalid_field_name() {
        let err = to_document(&record(vec![("two words", 1_i64.to_value())])).unwrap_err();
        assert_eq!(
            err.to_string(),
            "`two words` is not a valid element name (under Rec)"
        );
    }

    #[test]
    fn test_root_kinds() {
        let doc = to_document(&vec![true]).unwrap();
        let root = root_of(&doc);
        assert_eq!(doc.node_name(root), Some("list"));
        assert_eq!(child_names(&doc, root), vec!["list_e0"]);

        let doc = to_document(&7_i32).unwrap();
        let root = root_of(&doc);
        assert_eq!(doc.node_name(root), Some("int32"));
        assert_eq!(doc.text_content(root), "7");

        let doc = to_document(&Value::None).unwrap();
        let root = root_of(&doc);
        assert_eq!(doc.node_name(root), Some("NoneType"));
        assert!(doc.attributes(root).is_empty());
    }

    #[test]
    fn test_empty_composite_is_still_tagged() {
        let doc = to_document(&record(vec![("items", Value::List(vec![]))])).unwrap();
        let items = doc.child_element(root_of(&doc), "items").unwrap();
        assert_eq!(doc.attribute(items, "type"), Some("list"));
        assert_eq!(doc.first_child(items), None);
    }

    #[test]
    fn test_serializer_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Serializer>();
    }

    #[test]
    fn test_independent_calls_match() {
        let value = record(vec![
            ("a", vec![1_i64, 2].to_value()),
            ("b", (1.5_f32, "s").to_value()),
        ]);
        let serializer = Serializer::new();
        assert_eq!(
            serializer.render(&value, None).unwrap(),
            serializer.render(&value, None).unwrap()
        );
    }
}
