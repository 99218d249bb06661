//! Scope records of the builder protocol.

use strum::Display;

use crate::metadata::model::{AssemblyId, MemberId, NamespaceId, NodeRef, TypeId};

/// The kind of an open builder scope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum ScopeKind {
    /// Between StartAssembly and EndAssembly
    Assembly,
    /// Between StartNamespace and EndNamespace
    Namespace,
    /// Between StartType and EndType
    Type,
    /// Between StartField and EndField
    Field,
    /// Between StartProperty and EndProperty
    Property,
    /// Between StartEvent and EndEvent
    Event,
    /// Between StartMethod and EndMethod
    Method,
}

/// One open scope, together with the node it opened
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// An open assembly
    Assembly(AssemblyId),
    /// An open namespace
    Namespace(NamespaceId),
    /// An open type
    Type(TypeId),
    /// An open field
    Field(MemberId),
    /// An open property
    Property(MemberId),
    /// An open event
    Event(MemberId),
    /// An open method
    Method(MemberId),
}

impl Scope {
    /// The kind of this scope
    #[must_use]
    pub fn kind(&self) -> ScopeKind {
        match self {
            Scope::Assembly(_) => ScopeKind::Assembly,
            Scope::Namespace(_) => ScopeKind::Namespace,
            Scope::Type(_) => ScopeKind::Type,
            Scope::Field(_) => ScopeKind::Field,
            Scope::Property(_) => ScopeKind::Property,
            Scope::Event(_) => ScopeKind::Event,
            Scope::Method(_) => ScopeKind::Method,
        }
    }

    /// The member opened by this scope, for member scopes
    #[must_use]
    pub fn member(&self) -> Option<MemberId> {
        match self {
            Scope::Field(id) | Scope::Property(id) | Scope::Event(id) | Scope::Method(id) => {
                Some(*id)
            }
            _ => None,
        }
    }

    /// The node usages and attributes attach to while this scope is innermost
    #[must_use]
    pub fn usage_target(&self) -> Option<NodeRef> {
        match self {
            Scope::Type(id) => Some(NodeRef::Type(*id)),
            _ => self.member().map(NodeRef::Member),
        }
    }
}
