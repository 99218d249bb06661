//! Identity keys, the in-memory graph model and the protocol that builds it.
//!
//! # Key Components
//!
//! - [`identity`] - Composite value keys for assemblies, namespaces, types and members
//! - [`model`] - Arena-backed graph of nodes and usage edges, behind [`model::QueryRoot`]
//! - [`builder`] - Nested-scope state machine that populates the model
//!
//! # Examples
//!
//! ```rust
//! use dotimpact::metadata::{identity::AssemblyKey, model::QueryRoot};
//!
//! let mut root = QueryRoot::new();
//! let key = AssemblyKey::new("App").namespace("N").type_key("A");
//! let first = root.find_or_create_type(&key);
//! let second = root.find_or_create_type(&key);
//! assert_eq!(first, second);
//! assert_eq!(root.type_count(), 1);
//! ```

/// Nested-scope builder protocol
pub mod builder;
/// Identity keys of model nodes
pub mod identity;
/// Graph model and query root
pub mod model;
