//! In-memory structural and usage graph.
//!
//! The model is an ownership tree (Assembly ⊃ Namespace ⊃ Type ⊃ Member) plus usage edges
//! that cross the tree freely and may form cycles. All nodes are stored in arenas owned by
//! the [`QueryRoot`] and addressed by id ([`AssemblyId`], [`NamespaceId`], [`TypeId`],
//! [`MemberId`]); usage edges and weak references (base type, interfaces, attributes,
//! parameters, accessors) are ids, never owning links.
//!
//! # Key Components
//!
//! - [`QueryRoot`] - Arena owner, find-or-create entry point and read-only façade
//! - [`Assembly`], [`Namespace`], [`Type`], [`Member`] - The ownership tree
//! - [`Usage`], [`UsageSet`], [`UsageKind`] - Recorded references between nodes
//! - [`Node`] - Name and usage capability shared by types and members
//!
//! # Identity
//!
//! Every find-or-create call is idempotent under key equality: a second call with an equal
//! key returns the existing node and leaves the owning collection unchanged. The only
//! failure is [`crate::Error::KindMismatch`], when a member key already resolves to a
//! member of another kind.

mod assembly;
mod ids;
mod member;
mod root;
mod types;
mod usage;

pub use assembly::{Assembly, Namespace};
pub use ids::{AssemblyId, MemberId, NamespaceId, TypeId};
pub use member::{Member, MemberKind, MethodFlags, MethodInfo};
pub use root::{ExternalType, QueryRoot, SystemType, SYSTEM_ASSEMBLY, SYSTEM_NAMESPACE};
pub use types::{Type, TypeFlags};
pub use usage::{Node, NodeRef, Usage, UsageKind, UsageSet};
