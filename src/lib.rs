// Copyright 2025 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]
#![deny(unsafe_code)]

//! # dotimpact
//!
//! Structural and usage modeling of compiled .NET modules for change-impact analysis.
//!
//! `dotimpact` builds an in-memory graph of assemblies, namespaces, types and members from
//! decoded module metadata, records every reference between them, and computes for each
//! method the transitive closure of what it uses. Given a modified member, the reverse
//! closure tells which methods are affected, so only that subset of a large system (for
//! example a test suite) needs re-processing.
//!
//! ## Features
//!
//! - **Stable identity** - Composite keys deduplicate nodes across repeated visitation
//! - **Strict builder protocol** - Nested scopes that fail fast when a driver desynchronizes
//! - **Two traversal strategies** - Reflection order and declaration order, same model
//! - **Primary and secondary visitation** - Full detail for your code, signatures for dependencies
//! - **Cycle-safe closures** - Memoized, parallel, with a reverse impact query
//! - **Failure isolation** - A broken module never corrupts the others
//!
//! ## Quick Start
//!
//! ```rust
//! use dotimpact::prelude::*;
//!
//! let app = AssemblyKey::new("App");
//! let n = app.namespace("N");
//! let (a, b) = (n.type_key("A"), n.type_key("B"));
//! let foo = a.method("Foo", vec![]);
//! let bar = b.method("Bar", vec![]);
//!
//! let module = DecodedModule::new(app)
//!     .with_type(DecodedType::new(a).with_method(
//!         DecodedMethod::new(foo.clone()).with_body([NodeKey::Method(bar.clone())]),
//!     ))
//!     .with_type(DecodedType::new(b).with_method(DecodedMethod::new(bar.clone())));
//!
//! let result = Mapper::new().include(module).map()?;
//! let closure = result.closure();
//!
//! let foo = result.root.find_method(&foo).unwrap();
//! let bar = result.root.find_method(&bar).unwrap();
//! assert!(closure.indirectly_uses(foo)?.contains(NodeRef::Member(bar)));
//! assert_eq!(closure.impacted_by(NodeRef::Member(bar)), vec![foo]);
//! # Ok::<(), dotimpact::Error>(())
//! ```
//!
//! ## Architecture
//!
//! Data flows through the modules in this order:
//!
//! - [`inspection`] - Decoded module structures and the traversal drivers
//! - [`metadata::builder`] - The nested-scope protocol drivers emit
//! - [`metadata::model`] - The graph the protocol populates, behind [`metadata::model::QueryRoot`]
//! - [`analysis`] - Direct, transitive and reverse usage sets
//! - [`project`] - Multi-module mapping sessions with per-module failure isolation
//!
//! Decoding the binary module format is not part of this crate. A decoder plugs in through
//! [`inspection::ModuleSource`], a bytecode scanner through [`inspection::BodyScanner`].
//!
//! ## Logging
//!
//! The crate emits [`tracing`] events (module visits at `debug`, guard skips at `trace`,
//! module failures at `warn`) and installs no subscriber.
//!
//! ### Testing
//!
//! ```bash
//! cargo test
//! cargo bench --bench closure
//! ```
#[macro_use]
pub(crate) mod error;

/// Shared functionality which is used in unit tests
#[cfg(test)]
pub(crate) mod test;

/// Convenient re-exports of the most commonly used types and traits.
///
/// # Example
///
/// ```rust
/// use dotimpact::prelude::*;
///
/// let root = QueryRoot::new();
/// assert_eq!(root.type_count(), 0);
/// ```
pub mod prelude;

/// Identity keys, graph model and builder protocol
pub mod metadata;

/// Decoded module structures and traversal drivers
pub mod inspection;

/// Usage closures over a completed model
pub mod analysis;

/// Multi-module mapping sessions
pub mod project;

/// `dotimpact` Result type
///
/// A type alias for [`std::result::Result<T, Error>`] where the error type is always [`Error`].
/// This is used consistently throughout the crate for all fallible operations.
pub type Result<T> = std::result::Result<T, Error>;

/// `dotimpact` Error type
///
/// The main error type for all operations in this crate.
///
/// # Examples
///
/// ```rust
/// use dotimpact::{Error, metadata::{builder::ModelBuilder, model::QueryRoot}};
///
/// let mut root = QueryRoot::new();
/// let mut builder = ModelBuilder::new(&mut root);
/// match builder.end_method() {
///     Ok(()) => println!("balanced"),
///     Err(Error::ProtocolViolation { message, .. }) => println!("desync: {}", message),
///     Err(e) => println!("Error: {}", e),
/// }
/// ```
pub use error::Error;
