//! Usage analysis over a completed model.
//!
//! The analysis layer reads a [`crate::metadata::model::QueryRoot`] and derives facts that
//! are not stored in it, offering them to change-impact consumers.
//!
//! # Architecture
//!
//! - [`closure`] - Direct and transitive usage sets, plus the reverse impact query
//!
//! # Usage
//!
//! ```rust
//! use dotimpact::{analysis::UsageClosure, metadata::model::QueryRoot};
//!
//! let root = QueryRoot::new();
//! let closure = UsageClosure::new(&root);
//! assert!(closure.compute_all()?.is_empty());
//! # Ok::<(), dotimpact::Error>(())
//! ```

pub mod closure;

pub use closure::UsageClosure;
