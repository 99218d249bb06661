//! Identity keys for assemblies, namespaces, types and members.
//!
//! Keys are plain values with structural equality. They are what the decoder hands to the
//! builder protocol, and what the model uses to find-or-create nodes: two references to the
//! same entity always produce equal keys, regardless of which module they were decoded from.
//!
//! # Key Components
//!
//! - [`AssemblyKey`] - One compiled module
//! - [`NamespaceKey`] - Embeds its [`AssemblyKey`]
//! - [`TypeKey`] - Embeds its [`NamespaceKey`], plus simple name and generic arity
//! - [`MemberKey`] / [`MethodKey`] - Embed their [`TypeKey`], plus name and (for methods)
//!   the [`MethodSignature`] overload discriminator
//! - [`NodeKey`] - A kind-tagged key of any usage target
//!
//! # Examples
//!
//! ```rust
//! use dotimpact::metadata::identity::{AssemblyKey, TypeKey};
//!
//! let system = AssemblyKey::new("mscorlib").namespace("System");
//! let string = system.type_key("String");
//! let concat = string.method("Concat", vec![string.clone(), string.clone()]);
//!
//! assert_eq!(concat.declaring_type(), &string);
//! assert_eq!(string, TypeKey::from_full_name(AssemblyKey::new("mscorlib"), "System.String"));
//! ```

mod keys;

pub use keys::{AssemblyKey, MemberKey, MethodKey, MethodSignature, NamespaceKey, NodeKey, TypeKey};
