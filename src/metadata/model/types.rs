//! Type nodes and their flags.

use std::collections::HashMap;

use bitflags::bitflags;

use crate::metadata::{
    identity::{MemberKey, TypeKey},
    model::{MemberId, NamespaceId, Node, NodeRef, TypeId, UsageKind, UsageSet},
};

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    /// Flags describing a type node
    pub struct TypeFlags: u8 {
        /// Type is an interface
        const INTERFACE = 0x01;
        /// Type is abstract
        const ABSTRACT = 0x02;
        /// Type was visited, but only through a secondary (signature-only) visitation
        const SIGNATURE_ONLY = 0x04;
        /// Type has only been seen as a reference target, never visited
        const PLACEHOLDER = 0x08;
        /// Type was created from an external descriptor and never visited
        const EXTERNAL = 0x10;
    }
}

/// A type, owned by exactly one namespace.
///
/// Base type, interfaces and attributes are references into the arena and may point into
/// other assemblies. The type owns its members, keyed by [`MemberKey`].
#[derive(Debug)]
pub struct Type {
    pub(crate) id: TypeId,
    pub(crate) key: TypeKey,
    pub(crate) namespace: NamespaceId,
    pub(crate) flags: TypeFlags,
    pub(crate) base_type: Option<TypeId>,
    pub(crate) interfaces: Vec<TypeId>,
    pub(crate) attributes: Vec<TypeId>,
    pub(crate) members: Vec<MemberId>,
    pub(crate) member_index: HashMap<MemberKey, MemberId>,
    pub(crate) usages: UsageSet,
}

impl Type {
    pub(crate) fn new(id: TypeId, key: TypeKey, namespace: NamespaceId) -> Self {
        Type {
            id,
            key,
            namespace,
            flags: TypeFlags::PLACEHOLDER,
            base_type: None,
            interfaces: Vec::new(),
            attributes: Vec::new(),
            members: Vec::new(),
            member_index: HashMap::new(),
            usages: UsageSet::new(),
        }
    }

    /// Arena id of this type
    #[must_use]
    pub fn id(&self) -> TypeId {
        self.id
    }

    /// Identity key of this type
    #[must_use]
    pub fn key(&self) -> &TypeKey {
        &self.key
    }

    /// The owning namespace
    #[must_use]
    pub fn namespace(&self) -> NamespaceId {
        self.namespace
    }

    /// All flags of this type
    #[must_use]
    pub fn flags(&self) -> TypeFlags {
        self.flags
    }

    /// Type is an interface
    #[must_use]
    pub fn is_interface(&self) -> bool {
        self.flags.contains(TypeFlags::INTERFACE)
    }

    /// Type is abstract
    #[must_use]
    pub fn is_abstract(&self) -> bool {
        self.flags.contains(TypeFlags::ABSTRACT)
    }

    /// Type carries no body or member detail: either a placeholder or only visited through
    /// a secondary visitation.
    #[must_use]
    pub fn is_signature_only(&self) -> bool {
        self.flags
            .intersects(TypeFlags::SIGNATURE_ONLY | TypeFlags::PLACEHOLDER)
    }

    /// Type has never been visited
    #[must_use]
    pub fn is_placeholder(&self) -> bool {
        self.flags.contains(TypeFlags::PLACEHOLDER)
    }

    /// Type was created from an external descriptor and never visited
    #[must_use]
    pub fn is_external(&self) -> bool {
        self.flags.contains(TypeFlags::EXTERNAL)
    }

    /// The base type, if one was recorded
    #[must_use]
    pub fn base_type(&self) -> Option<TypeId> {
        self.base_type
    }

    /// Implemented interfaces, deduplicated, in recording order
    #[must_use]
    pub fn interfaces(&self) -> &[TypeId] {
        &self.interfaces
    }

    /// Attribute types applied to this type, deduplicated
    #[must_use]
    pub fn attributes(&self) -> &[TypeId] {
        &self.attributes
    }

    /// Members of this type in creation order
    #[must_use]
    pub fn members(&self) -> &[MemberId] {
        &self.members
    }

    /// Look up a member of this type
    #[must_use]
    pub fn find_member(&self, key: &MemberKey) -> Option<MemberId> {
        self.member_index.get(key).copied()
    }

    /// Usages recorded at type level (base type, interfaces, generic constraints)
    #[must_use]
    pub fn usages(&self) -> &UsageSet {
        &self.usages
    }

    /// Type-level usages without references to this type or its members
    #[must_use]
    pub fn directly_uses(&self) -> UsageSet {
        self.usages.remove_references_to_type(self.id)
    }

    pub(crate) fn set_base_type(&mut self, base: TypeId) {
        self.base_type = Some(base);
    }

    pub(crate) fn add_interface(&mut self, interface: TypeId) -> bool {
        if self.interfaces.contains(&interface) {
            return false;
        }
        self.interfaces.push(interface);
        true
    }

    pub(crate) fn add_attribute(&mut self, attribute: TypeId) -> bool {
        if self.attributes.contains(&attribute) {
            return false;
        }
        self.attributes.push(attribute);
        true
    }

    /// Last write wins for the interface/abstract bits; the visitation bits are untouched.
    pub(crate) fn set_flags(&mut self, is_interface: bool, is_abstract: bool) {
        self.flags.set(TypeFlags::INTERFACE, is_interface);
        self.flags.set(TypeFlags::ABSTRACT, is_abstract);
    }

    /// A primary visitation is never downgraded by a later secondary one.
    pub(crate) fn mark_visited(&mut self, signature_only: bool) {
        let fully_visited = !self
            .flags
            .intersects(TypeFlags::PLACEHOLDER | TypeFlags::SIGNATURE_ONLY);
        self.flags
            .remove(TypeFlags::PLACEHOLDER | TypeFlags::EXTERNAL);
        if !signature_only {
            self.flags.remove(TypeFlags::SIGNATURE_ONLY);
        } else if !fully_visited {
            self.flags.insert(TypeFlags::SIGNATURE_ONLY);
        }
    }

    pub(crate) fn insert_member(&mut self, key: MemberKey, member: MemberId) {
        self.member_index.insert(key, member);
        self.members.push(member);
    }
}

impl Node for Type {
    fn node_ref(&self) -> NodeRef {
        NodeRef::Type(self.id)
    }

    fn usage_kind(&self) -> UsageKind {
        UsageKind::Type
    }

    fn name(&self) -> String {
        self.key.to_string()
    }

    fn owning_type(&self) -> TypeId {
        self.id
    }
}
