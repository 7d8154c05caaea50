//! Utility modules for objxml.
//!
//! Contains the XML name predicates the engine uses to check element names
//! before they enter the tree.

pub mod name;
