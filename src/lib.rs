//! # objxml
//!
//! Serializes in-memory object graphs (scalars, records, named tuples,
//! lists, tuples, sets, numeric arrays, and mappings) into self-describing
//! XML. Every element records the type of the value it holds, and records
//! also carry their class and module, so the document keeps enough metadata
//! to rebuild the graph later.
//!
//! ## Quick Start
//!
//! ```
//! use objxml::{Instance, ToValue, Value};
//!
//! struct Inventory {
//!     owner: String,
//!     counts: Vec<i64>,
//! }
//!
//! impl ToValue for Inventory {
//!     fn to_value(&self) -> Value {
//!         Instance::new("Inventory", "shop")
//!             .field("owner", &self.owner)
//!             .field("counts", &self.counts)
//!             .into()
//!     }
//! }
//!
//! let inv = Inventory { owner: "ada".to_string(), counts: vec![3, 4] };
//! let xml = objxml::to_string(&inv, None).unwrap();
//! assert!(xml.contains("<Inventory type=\"instance\" class_name=\"Inventory\" module=\"shop\">"));
//! assert!(xml.contains("<counts_e1 type=\"int\">4</counts_e1>"));
//! ```

pub mod encoding;
pub mod engine;
pub mod error;
pub mod exclusion;
pub mod keys;
pub mod serial;
pub mod tree;
pub mod util;
pub mod value;

// Re-export primary types at the crate root for convenience.
pub use engine::{child_tag, to_document, to_file, to_string, Serializer};
pub use error::Error;
pub use exclusion::{DeclaredExclusions, ExclusionLookup, ExclusionTable};
pub use keys::{decode_key, encode_key, Key};
pub use serial::SerializeOptions;
pub use tree::{Attribute, Document, NodeId};
pub use value::{
    classify, Instance, NamedTuple, NumericArray, Scalar, ScalarKind, ToValue, Value, ValueKind,
};
