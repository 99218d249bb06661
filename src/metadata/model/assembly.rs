//! Assembly and namespace nodes, the upper two levels of the ownership tree.

use std::collections::HashMap;

use crate::metadata::{
    identity::{AssemblyKey, NamespaceKey, TypeKey},
    model::{AssemblyId, NamespaceId, TypeId},
};

/// One compiled module of the model.
///
/// A primary assembly was fully analyzed; a dependency (`is_dependency`) was only modeled
/// far enough to resolve usages from primary code. Assemblies that were never decoded but
/// are referenced by some type key are created as dependencies.
#[derive(Debug)]
pub struct Assembly {
    pub(crate) id: AssemblyId,
    pub(crate) key: AssemblyKey,
    pub(crate) is_dependency: bool,
    pub(crate) namespaces: Vec<NamespaceId>,
    pub(crate) namespace_index: HashMap<NamespaceKey, NamespaceId>,
    pub(crate) decode_error: Option<String>,
}

impl Assembly {
    pub(crate) fn new(id: AssemblyId, key: AssemblyKey) -> Self {
        Assembly {
            id,
            key,
            is_dependency: true,
            namespaces: Vec::new(),
            namespace_index: HashMap::new(),
            decode_error: None,
        }
    }

    /// Arena id of this assembly
    #[must_use]
    pub fn id(&self) -> AssemblyId {
        self.id
    }

    /// Identity key of this assembly
    #[must_use]
    pub fn key(&self) -> &AssemblyKey {
        &self.key
    }

    /// Returns true if this assembly was only modeled as a reference target
    #[must_use]
    pub fn is_dependency(&self) -> bool {
        self.is_dependency
    }

    /// Namespaces of this assembly in creation order
    #[must_use]
    pub fn namespaces(&self) -> &[NamespaceId] {
        &self.namespaces
    }

    /// Look up a namespace of this assembly
    #[must_use]
    pub fn find_namespace(&self, key: &NamespaceKey) -> Option<NamespaceId> {
        self.namespace_index.get(key).copied()
    }

    /// Returns true if traversal of this assembly was aborted part way
    #[must_use]
    pub fn is_incomplete(&self) -> bool {
        self.decode_error.is_some()
    }

    /// The error that aborted traversal of this assembly, if any
    #[must_use]
    pub fn decode_error(&self) -> Option<&str> {
        self.decode_error.as_deref()
    }
}

/// A namespace, owned by exactly one [`Assembly`].
#[derive(Debug)]
pub struct Namespace {
    pub(crate) id: NamespaceId,
    pub(crate) key: NamespaceKey,
    pub(crate) assembly: AssemblyId,
    pub(crate) types: Vec<TypeId>,
    pub(crate) type_index: HashMap<TypeKey, TypeId>,
}

impl Namespace {
    pub(crate) fn new(id: NamespaceId, key: NamespaceKey, assembly: AssemblyId) -> Self {
        Namespace {
            id,
            key,
            assembly,
            types: Vec::new(),
            type_index: HashMap::new(),
        }
    }

    /// Arena id of this namespace
    #[must_use]
    pub fn id(&self) -> NamespaceId {
        self.id
    }

    /// Identity key of this namespace
    #[must_use]
    pub fn key(&self) -> &NamespaceKey {
        &self.key
    }

    /// The owning assembly
    #[must_use]
    pub fn assembly(&self) -> AssemblyId {
        self.assembly
    }

    /// Types of this namespace in creation order
    #[must_use]
    pub fn types(&self) -> &[TypeId] {
        &self.types
    }

    /// Look up a type of this namespace
    #[must_use]
    pub fn find_type(&self, key: &TypeKey) -> Option<TypeId> {
        self.type_index.get(key).copied()
    }
}
