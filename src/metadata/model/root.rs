//! The query root: arena owner and find-or-create entry point of the model.
//!
//! A [`QueryRoot`] is constructed explicitly for one analysis run. It owns every node of the
//! model in flat arenas and keeps the ownership tree (assembly, namespace, type, member)
//! through per-level key indices. During a build it is mutated through
//! [`crate::metadata::builder::ModelBuilder`]; once complete it is read-only and can be
//! shared across threads.

use std::collections::HashMap;

use strum::{AsRefStr, EnumIter};

use crate::{
    metadata::{
        identity::{AssemblyKey, MemberKey, NamespaceKey, NodeKey, TypeKey},
        model::{
            Assembly, AssemblyId, Member, MemberId, MemberKind, Namespace, NamespaceId, Node,
            NodeRef, Type, TypeFlags, TypeId, Usage, UsageKind,
        },
    },
    Error, Result,
};

/// Name of the assembly that hosts the built-in [`SystemType`]s
pub const SYSTEM_ASSEMBLY: &str = "mscorlib";

/// Name of the namespace that hosts the built-in [`SystemType`]s
pub const SYSTEM_NAMESPACE: &str = "System";

/// A descriptor of a type known outside the model, which can be mapped onto a type node.
pub trait ExternalType {
    /// The identity key this descriptor denotes
    fn type_key(&self) -> TypeKey;
}

impl ExternalType for TypeKey {
    fn type_key(&self) -> TypeKey {
        self.clone()
    }
}

/// Built-in runtime types, hosted by [`SYSTEM_ASSEMBLY`]
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, EnumIter)]
pub enum SystemType {
    Void,
    Boolean,
    Char,
    SByte,
    Byte,
    Int16,
    UInt16,
    Int32,
    UInt32,
    Int64,
    UInt64,
    Single,
    Double,
    Decimal,
    String,
    Object,
    IntPtr,
    UIntPtr,
    TypedReference,
}

impl ExternalType for SystemType {
    fn type_key(&self) -> TypeKey {
        AssemblyKey::new(SYSTEM_ASSEMBLY)
            .namespace(SYSTEM_NAMESPACE)
            .type_key(self.as_ref())
    }
}

/// Owner of all assemblies and nodes of one analysis run.
///
/// # Examples
///
/// ```rust
/// use dotimpact::metadata::{identity::AssemblyKey, model::{QueryRoot, SystemType}};
///
/// let mut root = QueryRoot::new();
/// let key = AssemblyKey::new("App").namespace("N").type_key("A");
///
/// let first = root.find_or_create_type(&key);
/// let second = root.find_or_create_type(&key);
/// assert_eq!(first, second);
/// assert_eq!(root.type_count(), 1);
///
/// let string = root.from_system_type(SystemType::String);
/// assert!(root.get_type(string).is_external());
/// ```
#[derive(Debug, Default)]
pub struct QueryRoot {
    assemblies: Vec<Assembly>,
    assembly_index: HashMap<AssemblyKey, AssemblyId>,
    namespaces: Vec<Namespace>,
    types: Vec<Type>,
    members: Vec<Member>,
}

impl QueryRoot {
    /// Create an empty root
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // --- find-or-create ---

    /// Find the assembly with `key`, creating it as a dependency on a miss
    pub fn find_or_create_assembly(&mut self, key: &AssemblyKey) -> AssemblyId {
        if let Some(&id) = self.assembly_index.get(key) {
            return id;
        }
        let id = AssemblyId::new(self.assemblies.len());
        self.assemblies.push(Assembly::new(id, key.clone()));
        self.assembly_index.insert(key.clone(), id);
        id
    }

    /// Find the namespace with `key`, creating it (and its assembly) on a miss
    pub fn find_or_create_namespace(&mut self, key: &NamespaceKey) -> NamespaceId {
        let assembly = self.find_or_create_assembly(key.assembly());
        if let Some(id) = self.assemblies[assembly.index()].find_namespace(key) {
            return id;
        }
        let id = NamespaceId::new(self.namespaces.len());
        self.namespaces
            .push(Namespace::new(id, key.clone(), assembly));
        let owner = &mut self.assemblies[assembly.index()];
        owner.namespace_index.insert(key.clone(), id);
        owner.namespaces.push(id);
        id
    }

    /// Find the type with `key`, creating a placeholder (and its namespace) on a miss
    pub fn find_or_create_type(&mut self, key: &TypeKey) -> TypeId {
        let namespace = self.find_or_create_namespace(key.namespace());
        if let Some(id) = self.namespaces[namespace.index()].find_type(key) {
            return id;
        }
        let id = TypeId::new(self.types.len());
        self.types.push(Type::new(id, key.clone(), namespace));
        let owner = &mut self.namespaces[namespace.index()];
        owner.type_index.insert(key.clone(), id);
        owner.types.push(id);
        id
    }

    /// Find the member with `key`, creating a placeholder of `kind` on a miss.
    ///
    /// # Errors
    /// Returns [`Error::KindMismatch`] if `key` already resolves to a member of another kind,
    /// and [`Error::ProtocolViolation`] if `kind` is [`UsageKind::Type`].
    pub fn find_or_create_member(&mut self, key: &MemberKey, kind: UsageKind) -> Result<MemberId> {
        let declaring_type = self.find_or_create_type(key.declaring_type());
        if let Some(id) = self.types[declaring_type.index()].find_member(key) {
            let found = self.members[id.index()].kind.usage_kind();
            if found != kind {
                return Err(Error::KindMismatch {
                    key: key.clone(),
                    expected: kind,
                    found,
                });
            }
            return Ok(id);
        }

        let payload = MemberKind::empty(kind)
            .ok_or_else(|| protocol_error!("{} cannot be created as a member", key))?;
        let id = MemberId::new(self.members.len());
        self.members
            .push(Member::new(id, key.clone(), declaring_type, payload));
        self.types[declaring_type.index()]
            .insert_member(key.clone(), id);
        Ok(id)
    }

    /// Find or create a method placeholder
    ///
    /// # Errors
    /// Returns [`Error::KindMismatch`] if `key` names a non-method member.
    pub fn find_or_create_method(&mut self, key: &MemberKey) -> Result<MemberId> {
        self.find_or_create_member(key, UsageKind::Method)
    }

    /// Find or create the node a [`NodeKey`] denotes
    ///
    /// # Errors
    /// Returns [`Error::KindMismatch`] if the member exists with a different kind.
    pub fn find_or_create_node(&mut self, key: &NodeKey) -> Result<NodeRef> {
        match key {
            NodeKey::Type(type_key) => Ok(NodeRef::Type(self.find_or_create_type(type_key))),
            NodeKey::Method(member)
            | NodeKey::Field(member)
            | NodeKey::Property(member)
            | NodeKey::Event(member) => Ok(NodeRef::Member(
                self.find_or_create_member(member, key.kind())?,
            )),
        }
    }

    /// Map an external descriptor onto its type node.
    ///
    /// Unless the type has been visited, the node is a placeholder flagged
    /// [`TypeFlags::EXTERNAL`]. Visiting it later clears the flag.
    pub fn from_external_type<E: ExternalType + ?Sized>(&mut self, descriptor: &E) -> TypeId {
        let id = self.find_or_create_type(&descriptor.type_key());
        let ty = &mut self.types[id.index()];
        if ty.is_placeholder() {
            ty.flags.insert(TypeFlags::EXTERNAL);
        }
        id
    }

    /// Map a built-in runtime type onto its type node
    pub fn from_system_type(&mut self, system_type: SystemType) -> TypeId {
        self.from_external_type(&system_type)
    }

    /// Flag an assembly whose traversal was aborted
    pub(crate) fn mark_incomplete(&mut self, key: &AssemblyKey, message: String) {
        let id = self.find_or_create_assembly(key);
        self.assemblies[id.index()].decode_error = Some(message);
    }

    // --- lookups ---

    /// Look up an assembly by key
    #[must_use]
    pub fn find_assembly(&self, key: &AssemblyKey) -> Option<&Assembly> {
        self.assembly_index
            .get(key)
            .map(|id| &self.assemblies[id.index()])
    }

    /// Look up a namespace by key
    #[must_use]
    pub fn find_namespace(&self, key: &NamespaceKey) -> Option<NamespaceId> {
        self.find_assembly(key.assembly())?.find_namespace(key)
    }

    /// Look up a type by key
    #[must_use]
    pub fn find_type(&self, key: &TypeKey) -> Option<TypeId> {
        let namespace = self.find_namespace(key.namespace())?;
        self.namespaces[namespace.index()].find_type(key)
    }

    /// Look up a member of any kind by key
    #[must_use]
    pub fn find_member(&self, key: &MemberKey) -> Option<MemberId> {
        let declaring_type = self.find_type(key.declaring_type())?;
        self.types[declaring_type.index()].find_member(key)
    }

    /// Look up a method by key; `None` if the key names a non-method member
    #[must_use]
    pub fn find_method(&self, key: &MemberKey) -> Option<MemberId> {
        self.find_member(key)
            .filter(|id| self.members[id.index()].is_method())
    }

    /// Look up an external descriptor without creating a placeholder
    #[must_use]
    pub fn find_external_type<E: ExternalType + ?Sized>(&self, descriptor: &E) -> Option<TypeId> {
        self.find_type(&descriptor.type_key())
    }

    /// Resolve a usage target to its node, if it exists with the expected kind
    #[must_use]
    pub fn resolve(&self, key: &NodeKey) -> Option<NodeRef> {
        match key {
            NodeKey::Type(type_key) => self.find_type(type_key).map(NodeRef::Type),
            NodeKey::Method(member)
            | NodeKey::Field(member)
            | NodeKey::Property(member)
            | NodeKey::Event(member) => self
                .find_member(member)
                .filter(|id| {
                    self.members[id.index()].kind.usage_kind() == key.kind()
                })
                .map(NodeRef::Member),
        }
    }

    // --- node access ---

    /// Access an assembly by id
    ///
    /// # Panics
    /// Panics if `id` was not issued by this root.
    #[must_use]
    pub fn get_assembly(&self, id: AssemblyId) -> &Assembly {
        &self.assemblies[id.index()]
    }

    /// Access a namespace by id
    ///
    /// # Panics
    /// Panics if `id` was not issued by this root.
    #[must_use]
    pub fn get_namespace(&self, id: NamespaceId) -> &Namespace {
        &self.namespaces[id.index()]
    }

    /// Access a type by id
    ///
    /// # Panics
    /// Panics if `id` was not issued by this root.
    #[must_use]
    pub fn get_type(&self, id: TypeId) -> &Type {
        &self.types[id.index()]
    }

    /// Access a member by id
    ///
    /// # Panics
    /// Panics if `id` was not issued by this root.
    #[must_use]
    pub fn get_member(&self, id: MemberId) -> &Member {
        &self.members[id.index()]
    }

    pub(crate) fn assembly_mut(&mut self, id: AssemblyId) -> &mut Assembly {
        &mut self.assemblies[id.index()]
    }

    pub(crate) fn type_mut(&mut self, id: TypeId) -> &mut Type {
        &mut self.types[id.index()]
    }

    pub(crate) fn member_mut(&mut self, id: MemberId) -> &mut Member {
        &mut self.members[id.index()]
    }

    /// The node behind a usage target
    #[must_use]
    pub fn node(&self, target: NodeRef) -> &dyn Node {
        match target {
            NodeRef::Type(id) => self.get_type(id),
            NodeRef::Member(id) => self.get_member(id),
        }
    }

    /// A usage record of the node behind `target`
    #[must_use]
    pub fn usage_of(&self, target: NodeRef) -> Usage {
        self.node(target).usage()
    }

    /// The type that is, or declares, the node behind `target`
    #[must_use]
    pub fn owning_type(&self, target: NodeRef) -> TypeId {
        match target {
            NodeRef::Type(id) => id,
            NodeRef::Member(id) => self.get_member(id).declaring_type(),
        }
    }

    // --- enumeration ---

    /// All assemblies in creation order
    pub fn assemblies(&self) -> impl Iterator<Item = &Assembly> + '_ {
        self.assemblies.iter()
    }

    /// All namespaces in creation order
    pub fn namespaces(&self) -> impl Iterator<Item = &Namespace> + '_ {
        self.namespaces.iter()
    }

    /// All types in creation order
    pub fn types(&self) -> impl Iterator<Item = &Type> + '_ {
        self.types.iter()
    }

    /// All members in creation order
    pub fn members(&self) -> impl Iterator<Item = &Member> + '_ {
        self.members.iter()
    }

    /// All methods in creation order
    pub fn methods(&self) -> impl Iterator<Item = &Member> + '_ {
        self.members.iter().filter(|member| member.is_method())
    }

    /// Types of the given namespace
    pub fn types_in(&self, namespace: NamespaceId) -> impl Iterator<Item = &Type> + '_ {
        self.namespaces[namespace.index()]
            .types
            .iter()
            .map(|id| &self.types[id.index()])
    }

    /// Members of the given type
    pub fn members_of(&self, type_id: TypeId) -> impl Iterator<Item = &Member> + '_ {
        self.types[type_id.index()]
            .members
            .iter()
            .map(|id| &self.members[id.index()])
    }

    /// Types owned by the given assembly
    pub fn types_of_assembly(&self, assembly: AssemblyId) -> impl Iterator<Item = &Type> + '_ {
        self.assemblies[assembly.index()]
            .namespaces
            .iter()
            .flat_map(|namespace| self.types_in(*namespace))
    }

    /// Number of assemblies
    #[must_use]
    pub fn assembly_count(&self) -> usize {
        self.assemblies.len()
    }

    /// Number of types across all assemblies
    #[must_use]
    pub fn type_count(&self) -> usize {
        self.types.len()
    }

    /// Number of members across all types
    #[must_use]
    pub fn member_count(&self) -> usize {
        self.members.len()
    }
}
