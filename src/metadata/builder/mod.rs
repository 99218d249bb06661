//! Nested-scope builder protocol used by traversal drivers to populate the model.
//!
//! A [`ModelBuilder`] borrows a [`QueryRoot`] mutably for the duration of one module
//! traversal and keeps an explicit stack of open [`Scope`]s. Every `start_*` pushes a scope
//! and every `end_*` must close the innermost open scope of the same kind; anything else is
//! a [`crate::Error::ProtocolViolation`] and means the driver is out of sync.
//!
//! # Scope Nesting
//!
//! | Scope     | May be opened inside              |
//! |-----------|-----------------------------------|
//! | Assembly  | nothing (idle)                    |
//! | Namespace | idle, Assembly, Type (nested type) |
//! | Type      | Namespace of the type's key       |
//! | Field, Property, Event | Type declaring the member |
//! | Method    | Type declaring the method, or a Property/Event of it (accessors) |
//!
//! # Mutators
//!
//! The remaining operations do not open scopes. Type mutators apply to the innermost open
//! Type, member mutators to the innermost open member of their kind. [`ModelBuilder::use_type`],
//! [`ModelBuilder::use_node`] and [`ModelBuilder::has_attribute`] attach to the innermost
//! scope, which must be a member or a type.
//!
//! # Reopening
//!
//! Starting a key that already exists reopens the existing node. This is how a type first
//! seen only as a usage target is filled in once its own module is visited. A primary
//! visitation is never downgraded by a later signature-only one.
//!
//! # Examples
//!
//! ```rust
//! use dotimpact::metadata::{builder::ModelBuilder, identity::AssemblyKey, model::QueryRoot};
//!
//! let namespace = AssemblyKey::new("App").namespace("N");
//! let a = namespace.type_key("A");
//! let foo = a.method("Foo", vec![]);
//!
//! let mut root = QueryRoot::new();
//! let mut builder = ModelBuilder::new(&mut root);
//! builder.start_namespace(&namespace)?;
//! builder.start_type(&a, false)?;
//! builder.start_method(&foo, false)?;
//! builder.use_type(&namespace.type_key("B"))?;
//! builder.end_method()?;
//! builder.end_type()?;
//! builder.end_namespace()?;
//! builder.finish()?;
//!
//! assert_eq!(root.type_count(), 2);
//! # Ok::<(), dotimpact::Error>(())
//! ```

mod scope;

pub use scope::{Scope, ScopeKind};

use crate::{
    metadata::{
        identity::{AssemblyKey, MemberKey, NamespaceKey, NodeKey, TypeKey},
        model::{
            AssemblyId, MemberId, MethodFlags, NamespaceId, NodeRef, QueryRoot, TypeId, UsageKind,
        },
    },
    Result,
};

/// Scope-stack state machine that mutates a [`QueryRoot`].
pub struct ModelBuilder<'r> {
    root: &'r mut QueryRoot,
    scopes: Vec<Scope>,
}

fn describe(scope: Option<&Scope>) -> String {
    match scope {
        Some(scope) => format!("{} scope", scope.kind()),
        None => "no open scope".to_string(),
    }
}

impl<'r> ModelBuilder<'r> {
    /// Create a builder in the idle state
    pub fn new(root: &'r mut QueryRoot) -> Self {
        ModelBuilder {
            root,
            scopes: Vec::new(),
        }
    }

    /// Read access to the model under construction
    #[must_use]
    pub fn root(&self) -> &QueryRoot {
        self.root
    }

    /// Number of open scopes
    #[must_use]
    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    /// The innermost open scope
    #[must_use]
    pub fn current_scope(&self) -> Option<Scope> {
        self.scopes.last().copied()
    }

    /// Close the builder.
    ///
    /// # Errors
    /// Returns [`crate::Error::ProtocolViolation`] if any scope is still open.
    pub fn finish(self) -> Result<()> {
        if self.scopes.is_empty() {
            return Ok(());
        }
        let open: Vec<String> = self
            .scopes
            .iter()
            .map(|scope| scope.kind().to_string())
            .collect();
        Err(protocol_error!(
            "builder finished with open scopes: {}",
            open.join(" > ")
        ))
    }

    // --- paired operations ---

    /// Open a module.
    ///
    /// # Errors
    /// Returns [`crate::Error::ProtocolViolation`] unless the builder is idle.
    pub fn start_assembly(&mut self, key: &AssemblyKey, is_dependency: bool) -> Result<AssemblyId> {
        if !self.scopes.is_empty() {
            return Err(protocol_error!(
                "StartAssembly {} inside {}",
                key,
                describe(self.scopes.last())
            ));
        }
        let id = self.root.find_or_create_assembly(key);
        let assembly = self.root.assembly_mut(id);
        assembly.is_dependency = assembly.is_dependency && is_dependency;
        self.scopes.push(Scope::Assembly(id));
        Ok(id)
    }

    /// Close the innermost assembly scope.
    ///
    /// # Errors
    /// Returns [`crate::Error::ProtocolViolation`] if it is not the innermost scope.
    pub fn end_assembly(&mut self) -> Result<()> {
        self.end(ScopeKind::Assembly)
    }

    /// Open a namespace.
    ///
    /// # Errors
    /// Returns [`crate::Error::ProtocolViolation`] if a member scope is innermost, or if the
    /// namespace belongs to another assembly than the open one.
    pub fn start_namespace(&mut self, key: &NamespaceKey) -> Result<NamespaceId> {
        match self.scopes.last() {
            None | Some(Scope::Assembly(_)) | Some(Scope::Type(_)) => {}
            other => {
                return Err(protocol_error!(
                    "StartNamespace {} inside {}",
                    key,
                    describe(other)
                ))
            }
        }
        if let Some(assembly) = self.innermost_assembly() {
            let open = self.root.get_assembly(assembly).key();
            if open != key.assembly() {
                return Err(protocol_error!(
                    "StartNamespace {} inside assembly {}",
                    key,
                    open
                ));
            }
        }
        let id = self.root.find_or_create_namespace(key);
        self.scopes.push(Scope::Namespace(id));
        Ok(id)
    }

    /// Close the innermost namespace scope.
    ///
    /// # Errors
    /// Returns [`crate::Error::ProtocolViolation`] if it is not the innermost scope.
    pub fn end_namespace(&mut self) -> Result<()> {
        self.end(ScopeKind::Namespace)
    }

    /// Open a type. `signature_only` marks a secondary visitation.
    ///
    /// # Errors
    /// Returns [`crate::Error::ProtocolViolation`] unless the namespace of `key` is the
    /// innermost scope.
    pub fn start_type(&mut self, key: &TypeKey, signature_only: bool) -> Result<TypeId> {
        match self.scopes.last() {
            Some(Scope::Namespace(namespace)) => {
                let open = self.root.get_namespace(*namespace).key();
                if open != key.namespace() {
                    return Err(protocol_error!(
                        "StartType {} inside namespace {}",
                        key,
                        open
                    ));
                }
            }
            other => {
                return Err(protocol_error!(
                    "StartType {} inside {}",
                    key,
                    describe(other)
                ))
            }
        }
        let id = self.root.find_or_create_type(key);
        self.root.type_mut(id).mark_visited(signature_only);
        self.scopes.push(Scope::Type(id));
        Ok(id)
    }

    /// Close the innermost type scope.
    ///
    /// # Errors
    /// Returns [`crate::Error::ProtocolViolation`] if it is not the innermost scope.
    pub fn end_type(&mut self) -> Result<()> {
        self.end(ScopeKind::Type)
    }

    /// Open a field.
    ///
    /// # Errors
    /// Returns [`crate::Error::ProtocolViolation`] unless the declaring type is innermost,
    /// and [`crate::Error::KindMismatch`] if the key names another kind of member.
    pub fn start_field(&mut self, key: &MemberKey) -> Result<MemberId> {
        let id = self.start_member(key, UsageKind::Field)?;
        self.scopes.push(Scope::Field(id));
        Ok(id)
    }

    /// Close the innermost field scope.
    ///
    /// # Errors
    /// Returns [`crate::Error::ProtocolViolation`] if it is not the innermost scope.
    pub fn end_field(&mut self) -> Result<()> {
        self.end(ScopeKind::Field)
    }

    /// Open a property.
    ///
    /// # Errors
    /// Returns [`crate::Error::ProtocolViolation`] unless the declaring type is innermost,
    /// and [`crate::Error::KindMismatch`] if the key names another kind of member.
    pub fn start_property(&mut self, key: &MemberKey) -> Result<MemberId> {
        let id = self.start_member(key, UsageKind::Property)?;
        self.scopes.push(Scope::Property(id));
        Ok(id)
    }

    /// Close the innermost property scope.
    ///
    /// # Errors
    /// Returns [`crate::Error::ProtocolViolation`] if it is not the innermost scope.
    pub fn end_property(&mut self) -> Result<()> {
        self.end(ScopeKind::Property)
    }

    /// Open an event.
    ///
    /// # Errors
    /// Returns [`crate::Error::ProtocolViolation`] unless the declaring type is innermost,
    /// and [`crate::Error::KindMismatch`] if the key names another kind of member.
    pub fn start_event(&mut self, key: &MemberKey) -> Result<MemberId> {
        let id = self.start_member(key, UsageKind::Event)?;
        self.scopes.push(Scope::Event(id));
        Ok(id)
    }

    /// Close the innermost event scope.
    ///
    /// # Errors
    /// Returns [`crate::Error::ProtocolViolation`] if it is not the innermost scope.
    pub fn end_event(&mut self) -> Result<()> {
        self.end(ScopeKind::Event)
    }

    /// Open a method. `signature_only` marks a method visited without its body.
    ///
    /// # Errors
    /// Returns [`crate::Error::ProtocolViolation`] unless the declaring type (or one of its
    /// properties or events) is innermost, and [`crate::Error::KindMismatch`] if the key
    /// names another kind of member.
    pub fn start_method(&mut self, key: &MemberKey, signature_only: bool) -> Result<MemberId> {
        let was_placeholder = self
            .root
            .find_method(key)
            .map_or(true, |id| self.root.get_member(id).is_placeholder());
        let id = self.start_member(key, UsageKind::Method)?;
        if let Some(info) = self.root.member_mut(id).method_mut() {
            info.signature_only = signature_only && (was_placeholder || info.signature_only);
        }
        self.scopes.push(Scope::Method(id));
        Ok(id)
    }

    /// Close the innermost method scope.
    ///
    /// # Errors
    /// Returns [`crate::Error::ProtocolViolation`] if it is not the innermost scope.
    pub fn end_method(&mut self) -> Result<()> {
        self.end(ScopeKind::Method)
    }

    // --- type mutators ---

    /// Set the interface/abstract flags of the innermost open type.
    ///
    /// # Errors
    /// Returns [`crate::Error::ProtocolViolation`] if no type is open.
    pub fn set_type_flags(&mut self, is_interface: bool, is_abstract: bool) -> Result<()> {
        let id = self.require_type("SetTypeFlags")?;
        self.root.type_mut(id).set_flags(is_interface, is_abstract);
        Ok(())
    }

    /// Set the base type of the innermost open type.
    ///
    /// # Errors
    /// Returns [`crate::Error::ProtocolViolation`] if no type is open.
    pub fn set_base_type(&mut self, base: &TypeKey) -> Result<TypeId> {
        let id = self.require_type("SetBaseType")?;
        let base = self.root.find_or_create_type(base);
        self.root.type_mut(id).set_base_type(base);
        Ok(base)
    }

    /// Record an implemented interface on the innermost open type.
    ///
    /// # Errors
    /// Returns [`crate::Error::ProtocolViolation`] if no type is open.
    pub fn implements_interface(&mut self, interface: &TypeKey) -> Result<TypeId> {
        let id = self.require_type("ImplementsInterface")?;
        let interface = self.root.find_or_create_type(interface);
        self.root.type_mut(id).add_interface(interface);
        Ok(interface)
    }

    // --- member mutators ---

    /// Set return type (`None` for void) and parameter types of the innermost open method.
    ///
    /// # Errors
    /// Returns [`crate::Error::ProtocolViolation`] if no method is open.
    pub fn set_method_prototype(
        &mut self,
        return_type: Option<&TypeKey>,
        parameters: &[TypeKey],
    ) -> Result<()> {
        let id = self.require_member(ScopeKind::Method, "SetMethodPrototype")?;
        let return_type = return_type.map(|key| self.root.find_or_create_type(key));
        let parameters: Vec<TypeId> = parameters
            .iter()
            .map(|key| self.root.find_or_create_type(key))
            .collect();
        let method = self.root.member_mut(id);
        method.set_member_type(return_type);
        if let Some(info) = method.method_mut() {
            info.parameters = parameters;
        }
        Ok(())
    }

    /// Set the modifier flags of the innermost open method.
    ///
    /// # Errors
    /// Returns [`crate::Error::ProtocolViolation`] if no method is open.
    pub fn set_method_flags(&mut self, flags: MethodFlags) -> Result<()> {
        let id = self.require_member(ScopeKind::Method, "SetMethodFlags")?;
        if let Some(info) = self.root.member_mut(id).method_mut() {
            info.flags = flags;
        }
        Ok(())
    }

    /// Set the type of the innermost open field.
    ///
    /// # Errors
    /// Returns [`crate::Error::ProtocolViolation`] if no field is open.
    pub fn set_field_type(&mut self, field_type: &TypeKey) -> Result<TypeId> {
        self.set_declared_type(ScopeKind::Field, field_type, "SetFieldType")
    }

    /// Set the type of the innermost open property.
    ///
    /// # Errors
    /// Returns [`crate::Error::ProtocolViolation`] if no property is open.
    pub fn set_property_type(&mut self, property_type: &TypeKey) -> Result<TypeId> {
        self.set_declared_type(ScopeKind::Property, property_type, "SetPropertyType")
    }

    /// Set the delegate type of the innermost open event.
    ///
    /// # Errors
    /// Returns [`crate::Error::ProtocolViolation`] if no event is open.
    pub fn set_event_type(&mut self, event_type: &TypeKey) -> Result<TypeId> {
        self.set_declared_type(ScopeKind::Event, event_type, "SetEventType")
    }

    /// Link a property to its getter.
    ///
    /// # Errors
    /// Returns [`crate::Error::KindMismatch`] if either key names another kind of member.
    pub fn set_property_getter(&mut self, property: &MemberKey, getter: &MemberKey) -> Result<()> {
        self.set_accessor(property, UsageKind::Property, getter, true)
    }

    /// Link a property to its setter.
    ///
    /// # Errors
    /// Returns [`crate::Error::KindMismatch`] if either key names another kind of member.
    pub fn set_property_setter(&mut self, property: &MemberKey, setter: &MemberKey) -> Result<()> {
        self.set_accessor(property, UsageKind::Property, setter, false)
    }

    /// Link an event to its adder.
    ///
    /// # Errors
    /// Returns [`crate::Error::KindMismatch`] if either key names another kind of member.
    pub fn set_event_adder(&mut self, event: &MemberKey, adder: &MemberKey) -> Result<()> {
        self.set_accessor(event, UsageKind::Event, adder, true)
    }

    /// Link an event to its remover.
    ///
    /// # Errors
    /// Returns [`crate::Error::KindMismatch`] if either key names another kind of member.
    pub fn set_event_remover(&mut self, event: &MemberKey, remover: &MemberKey) -> Result<()> {
        self.set_accessor(event, UsageKind::Event, remover, false)
    }

    // --- usages ---

    /// Record a usage of a type on the innermost scope, which must be a member or a type.
    ///
    /// # Errors
    /// Returns [`crate::Error::ProtocolViolation`] unless a member or a type is the innermost
    /// scope.
    pub fn use_type(&mut self, key: &TypeKey) -> Result<()> {
        let holder = self.usage_holder("UseType")?;
        let target = NodeRef::Type(self.root.find_or_create_type(key));
        self.attach_usage(holder, target);
        Ok(())
    }

    /// Record a usage of any node on the innermost open member or type. Member targets are
    /// created as placeholders in their declaring type when missing.
    ///
    /// # Errors
    /// Returns [`crate::Error::ProtocolViolation`] unless a member or a type is the innermost
    /// scope, and [`crate::Error::KindMismatch`] if the target exists with another kind.
    pub fn use_node(&mut self, key: &NodeKey) -> Result<()> {
        let holder = self.usage_holder("UseNode")?;
        let target = self.root.find_or_create_node(key)?;
        self.attach_usage(holder, target);
        Ok(())
    }

    /// Record an applied attribute on the innermost open member or type.
    ///
    /// # Errors
    /// Returns [`crate::Error::ProtocolViolation`] unless a member or a type is the innermost
    /// scope.
    pub fn has_attribute(&mut self, attribute: &TypeKey) -> Result<()> {
        let holder = self.usage_holder("HasAttribute")?;
        let attribute = self.root.find_or_create_type(attribute);
        match holder {
            NodeRef::Type(id) => {
                self.root.type_mut(id).add_attribute(attribute);
            }
            NodeRef::Member(id) => {
                self.root.member_mut(id).add_attribute(attribute);
            }
        }
        Ok(())
    }

    // --- internals ---

    fn end(&mut self, kind: ScopeKind) -> Result<()> {
        match self.scopes.last() {
            Some(scope) if scope.kind() == kind => {
                self.scopes.pop();
                Ok(())
            }
            other => Err(protocol_error!(
                "End{} with {} innermost",
                kind,
                describe(other)
            )),
        }
    }

    fn start_member(&mut self, key: &MemberKey, kind: UsageKind) -> Result<MemberId> {
        let owner = match self.scopes.last() {
            Some(Scope::Type(id)) => *id,
            Some(Scope::Property(_) | Scope::Event(_)) if kind == UsageKind::Method => {
                self.innermost_type()
                    .ok_or_else(|| protocol_error!("accessor {} outside of a type", key))?
            }
            other => {
                return Err(protocol_error!(
                    "Start{} {} inside {}",
                    kind,
                    key,
                    describe(other)
                ))
            }
        };
        let open = self.root.get_type(owner).key();
        if open != key.declaring_type() {
            return Err(protocol_error!(
                "Start{} {} inside type {}",
                kind,
                key,
                open
            ));
        }
        let id = self.root.find_or_create_member(key, kind)?;
        self.root.member_mut(id).placeholder = false;
        Ok(id)
    }

    fn innermost_assembly(&self) -> Option<AssemblyId> {
        self.scopes.iter().rev().find_map(|scope| match scope {
            Scope::Assembly(id) => Some(*id),
            _ => None,
        })
    }

    fn innermost_type(&self) -> Option<TypeId> {
        self.scopes.iter().rev().find_map(|scope| match scope {
            Scope::Type(id) => Some(*id),
            _ => None,
        })
    }

    fn require_type(&self, operation: &str) -> Result<TypeId> {
        self.innermost_type()
            .ok_or_else(|| protocol_error!("{} without an open type", operation))
    }

    fn require_member(&self, kind: ScopeKind, operation: &str) -> Result<MemberId> {
        self.scopes
            .iter()
            .rev()
            .find(|scope| scope.kind() == kind)
            .and_then(Scope::member)
            .ok_or_else(|| protocol_error!("{} without an open {}", operation, kind))
    }

    fn usage_holder(&self, operation: &str) -> Result<NodeRef> {
        match self.scopes.last() {
            Some(scope) => scope.usage_target().ok_or_else(|| {
                protocol_error!("{} with {} as innermost scope", operation, scope.kind())
            }),
            None => Err(protocol_error!(
                "{} without an open member or type",
                operation
            )),
        }
    }

    fn attach_usage(&mut self, holder: NodeRef, target: NodeRef) {
        let usage = self.root.usage_of(target);
        match holder {
            NodeRef::Type(id) => {
                self.root.type_mut(id).usages.insert(usage);
            }
            NodeRef::Member(id) => {
                self.root.member_mut(id).usages.insert(usage);
            }
        }
    }

    fn set_declared_type(
        &mut self,
        kind: ScopeKind,
        declared: &TypeKey,
        operation: &str,
    ) -> Result<TypeId> {
        let id = self.require_member(kind, operation)?;
        let declared = self.root.find_or_create_type(declared);
        self.root.member_mut(id).set_member_type(Some(declared));
        Ok(declared)
    }

    fn set_accessor(
        &mut self,
        owner: &MemberKey,
        owner_kind: UsageKind,
        accessor: &MemberKey,
        first: bool,
    ) -> Result<()> {
        let owner = self.root.find_or_create_member(owner, owner_kind)?;
        let accessor = self.root.find_or_create_method(accessor)?;
        self.root.member_mut(owner).set_accessor(first, accessor);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{metadata::model::TypeFlags, Error};

    fn namespace() -> NamespaceKey {
        AssemblyKey::new("App").namespace("N")
    }

    fn type_key(name: &str) -> TypeKey {
        namespace().type_key(name)
    }

    fn open_type(builder: &mut ModelBuilder<'_>, name: &str) -> TypeId {
        builder.start_namespace(&namespace()).unwrap();
        builder.start_type(&type_key(name), false).unwrap()
    }

    fn close_type(builder: &mut ModelBuilder<'_>) {
        builder.end_type().unwrap();
        builder.end_namespace().unwrap();
    }

    #[test]
    fn test_balanced_protocol_succeeds() {
        let mut root = QueryRoot::new();
        let mut builder = ModelBuilder::new(&mut root);
        open_type(&mut builder, "A");
        builder
            .start_method(&type_key("A").method("Foo", vec![]), false)
            .unwrap();
        builder.end_method().unwrap();
        close_type(&mut builder);
        assert_eq!(builder.depth(), 0);
        builder.finish().unwrap();
    }

    #[test]
    fn test_missing_end_method_is_violation() {
        let mut root = QueryRoot::new();
        let mut builder = ModelBuilder::new(&mut root);
        open_type(&mut builder, "A");
        builder
            .start_method(&type_key("A").method("Foo", vec![]), false)
            .unwrap();

        let result = builder.end_type();
        assert!(matches!(result, Err(Error::ProtocolViolation { .. })));
        // the mismatched End leaves the stack untouched
        assert_eq!(builder.current_scope().map(|s| s.kind()), Some(ScopeKind::Method));
    }

    #[test]
    fn test_end_without_start_is_violation() {
        let mut root = QueryRoot::new();
        let mut builder = ModelBuilder::new(&mut root);
        assert!(matches!(
            builder.end_namespace(),
            Err(Error::ProtocolViolation { .. })
        ));
    }

    #[test]
    fn test_finish_with_open_scopes_is_violation() {
        let mut root = QueryRoot::new();
        let mut builder = ModelBuilder::new(&mut root);
        open_type(&mut builder, "A");
        let error = builder.finish().unwrap_err();
        assert!(error.to_string().contains("Namespace > Type"));
    }

    #[test]
    fn test_start_type_requires_matching_namespace() {
        let mut root = QueryRoot::new();
        let mut builder = ModelBuilder::new(&mut root);
        assert!(builder.start_type(&type_key("A"), false).is_err());

        builder
            .start_namespace(&AssemblyKey::new("App").namespace("Other"))
            .unwrap();
        assert!(matches!(
            builder.start_type(&type_key("A"), false),
            Err(Error::ProtocolViolation { .. })
        ));
    }

    #[test]
    fn test_start_member_requires_declaring_type() {
        let mut root = QueryRoot::new();
        let mut builder = ModelBuilder::new(&mut root);
        open_type(&mut builder, "A");
        let result = builder.start_field(&type_key("B").member("x"));
        assert!(matches!(result, Err(Error::ProtocolViolation { .. })));
    }

    #[test]
    fn test_namespace_must_match_open_assembly() {
        let mut root = QueryRoot::new();
        let mut builder = ModelBuilder::new(&mut root);
        builder
            .start_assembly(&AssemblyKey::new("App"), false)
            .unwrap();
        assert!(builder
            .start_namespace(&AssemblyKey::new("Lib").namespace("N"))
            .is_err());
        builder.start_namespace(&namespace()).unwrap();
    }

    #[test]
    fn test_use_type_attaches_to_innermost_member() {
        let mut root = QueryRoot::new();
        let mut builder = ModelBuilder::new(&mut root);
        let a = open_type(&mut builder, "A");
        builder.use_type(&type_key("Base")).unwrap();
        let foo = builder
            .start_method(&type_key("A").method("Foo", vec![]), false)
            .unwrap();
        builder.use_type(&type_key("B")).unwrap();
        builder.end_method().unwrap();
        close_type(&mut builder);
        builder.finish().unwrap();

        let base = root.find_type(&type_key("Base")).unwrap();
        let b = root.find_type(&type_key("B")).unwrap();
        assert!(root.get_type(a).usages().contains(NodeRef::Type(base)));
        assert!(!root.get_type(a).usages().contains(NodeRef::Type(b)));
        assert!(root.get_member(foo).usages().contains(NodeRef::Type(b)));
        assert!(root.get_type(b).is_placeholder());
    }

    #[test]
    fn test_use_without_scope_is_violation() {
        let mut root = QueryRoot::new();
        let mut builder = ModelBuilder::new(&mut root);
        builder.start_namespace(&namespace()).unwrap();
        assert!(matches!(
            builder.use_type(&type_key("B")),
            Err(Error::ProtocolViolation { .. })
        ));
        assert!(builder.has_attribute(&type_key("Attr")).is_err());
    }

    #[test]
    fn test_use_node_creates_member_placeholder() {
        let mut root = QueryRoot::new();
        let mut builder = ModelBuilder::new(&mut root);
        open_type(&mut builder, "A");
        let bar = type_key("B").method("Bar", vec![]);
        builder
            .start_method(&type_key("A").method("Foo", vec![]), false)
            .unwrap();
        builder.use_node(&NodeKey::Method(bar.clone())).unwrap();
        builder.end_method().unwrap();
        close_type(&mut builder);

        let bar_id = root.find_method(&bar).unwrap();
        assert!(root.get_member(bar_id).is_placeholder());
        assert!(root
            .get_type(root.get_member(bar_id).declaring_type())
            .is_placeholder());
    }

    #[test]
    fn test_use_node_kind_mismatch_propagates() {
        let mut root = QueryRoot::new();
        let mut builder = ModelBuilder::new(&mut root);
        open_type(&mut builder, "A");
        let value = type_key("A").member("Value");
        builder.start_field(&value).unwrap();
        builder.end_field().unwrap();
        let result = builder.use_node(&NodeKey::Property(value));
        assert!(matches!(result, Err(Error::KindMismatch { .. })));
    }

    #[test]
    fn test_reopen_mutates_existing_nodes() {
        let mut root = QueryRoot::new();
        let foo = type_key("A").method("Foo", vec![]);
        {
            let mut builder = ModelBuilder::new(&mut root);
            open_type(&mut builder, "B");
            builder
                .start_method(&type_key("B").method("Baz", vec![]), false)
                .unwrap();
            builder.use_node(&NodeKey::Method(foo.clone())).unwrap();
            builder.end_method().unwrap();
            close_type(&mut builder);
            builder.finish().unwrap();
        }
        let types_before = root.type_count();
        let placeholder = root.find_method(&foo).unwrap();
        assert!(root.get_member(placeholder).is_placeholder());

        let mut builder = ModelBuilder::new(&mut root);
        let a = open_type(&mut builder, "A");
        let reopened = builder.start_method(&foo, false).unwrap();
        builder.end_method().unwrap();
        close_type(&mut builder);
        builder.finish().unwrap();

        assert_eq!(reopened, placeholder);
        assert_eq!(root.type_count(), types_before);
        assert!(!root.get_member(reopened).is_placeholder());
        assert!(!root.get_type(a).is_placeholder());
        assert_eq!(root.get_type(a).members(), &[reopened]);
    }

    #[test]
    fn test_signature_only_flag() {
        let mut root = QueryRoot::new();
        let mut builder = ModelBuilder::new(&mut root);
        builder.start_namespace(&namespace()).unwrap();
        let a = builder.start_type(&type_key("A"), true).unwrap();
        let foo = builder
            .start_method(&type_key("A").method("Foo", vec![]), true)
            .unwrap();
        builder.end_method().unwrap();
        close_type(&mut builder);

        let ty = root.get_type(a);
        assert!(ty.flags().contains(TypeFlags::SIGNATURE_ONLY));
        assert!(!ty.is_placeholder());
        assert!(root
            .get_member(foo)
            .as_method()
            .unwrap()
            .is_signature_only());
    }

    #[test]
    fn test_type_mutators() {
        let mut root = QueryRoot::new();
        let mut builder = ModelBuilder::new(&mut root);
        let a = open_type(&mut builder, "A");
        builder.set_type_flags(false, true).unwrap();
        let base = builder.set_base_type(&type_key("Base")).unwrap();
        let iface = builder.implements_interface(&type_key("IThing")).unwrap();
        builder.implements_interface(&type_key("IThing")).unwrap();
        builder
            .has_attribute(&type_key("SerializableAttribute"))
            .unwrap();
        close_type(&mut builder);

        let ty = root.get_type(a);
        assert!(ty.is_abstract());
        assert_eq!(ty.base_type(), Some(base));
        assert_eq!(ty.interfaces(), &[iface]);
        assert_eq!(ty.attributes().len(), 1);
    }

    #[test]
    fn test_method_prototype_and_flags() {
        let mut root = QueryRoot::new();
        let mut builder = ModelBuilder::new(&mut root);
        open_type(&mut builder, "A");
        let int32 = AssemblyKey::new("mscorlib")
            .namespace("System")
            .type_key("Int32");
        let key = type_key("A")
            .method("Add", vec![int32.clone(), int32.clone()]);
        let add = builder.start_method(&key, false).unwrap();
        builder
            .set_method_prototype(Some(&int32), &[int32.clone(), int32.clone()])
            .unwrap();
        builder
            .set_method_flags(MethodFlags::STATIC | MethodFlags::VIRTUAL)
            .unwrap();
        builder.end_method().unwrap();
        assert!(builder.set_method_flags(MethodFlags::STATIC).is_err());
        close_type(&mut builder);

        let int32 = root.find_type(&int32).unwrap();
        let method = root.get_member(add);
        assert_eq!(method.return_type(), Some(int32));
        let info = method.as_method().unwrap();
        assert_eq!(info.parameters(), &[int32, int32]);
        assert!(info.flags().contains(MethodFlags::STATIC));
        assert!(!info.flags().contains(MethodFlags::CONSTRUCTOR));
    }

    #[test]
    fn test_property_accessors_inside_property_scope() {
        let mut root = QueryRoot::new();
        let mut builder = ModelBuilder::new(&mut root);
        open_type(&mut builder, "A");
        let name = type_key("A").member("Name");
        let getter = type_key("A").method("get_Name", vec![]);
        let string = AssemblyKey::new("mscorlib")
            .namespace("System")
            .type_key("String");

        let property = builder.start_property(&name).unwrap();
        builder.set_property_type(&string).unwrap();
        let getter_id = builder.start_method(&getter, false).unwrap();
        builder.use_type(&string).unwrap();
        builder.end_method().unwrap();
        builder.set_property_getter(&name, &getter).unwrap();
        builder.end_property().unwrap();
        close_type(&mut builder);
        builder.finish().unwrap();

        let string = root.find_type(&string).unwrap();
        let property = root.get_member(property);
        assert_eq!(property.getter(), Some(getter_id));
        assert_eq!(property.setter(), None);
        assert_eq!(property.member_type(), Some(string));
        assert!(root.get_member(getter_id).is_getter());
        assert!(root
            .get_member(getter_id)
            .usages()
            .contains(NodeRef::Type(string)));
        assert!(property.usages().is_empty());
    }

    #[test]
    fn test_nested_type_inside_type_scope() {
        let mut root = QueryRoot::new();
        let mut builder = ModelBuilder::new(&mut root);
        let outer = open_type(&mut builder, "Outer");
        builder.start_namespace(&namespace()).unwrap();
        let inner = builder.start_type(&type_key("Outer/Inner"), false).unwrap();
        builder.use_type(&type_key("B")).unwrap();
        close_type(&mut builder);
        builder.use_type(&type_key("C")).unwrap();
        close_type(&mut builder);
        builder.finish().unwrap();

        let b = root.find_type(&type_key("B")).unwrap();
        let c = root.find_type(&type_key("C")).unwrap();
        assert!(root.get_type(inner).usages().contains(NodeRef::Type(b)));
        assert!(root.get_type(outer).usages().contains(NodeRef::Type(c)));
        assert!(!root.get_type(outer).usages().contains(NodeRef::Type(b)));
    }

    #[test]
    fn test_use_under_nested_namespace_is_violation() {
        let mut root = QueryRoot::new();
        let mut builder = ModelBuilder::new(&mut root);
        let outer = open_type(&mut builder, "Outer");
        builder.start_namespace(&namespace()).unwrap();

        let error = builder.use_type(&type_key("B")).unwrap_err();
        assert!(matches!(error, Error::ProtocolViolation { .. }));
        assert!(error.to_string().contains("Namespace"));
        assert!(matches!(
            builder.has_attribute(&type_key("Attr")),
            Err(Error::ProtocolViolation { .. })
        ));
        builder.end_namespace().unwrap();
        close_type(&mut builder);
        builder.finish().unwrap();

        assert!(root.get_type(outer).usages().is_empty());
        assert!(root.get_type(outer).attributes().is_empty());
    }

    #[test]
    fn test_primary_assembly_is_not_downgraded() {
        let mut root = QueryRoot::new();
        let key = AssemblyKey::new("App");
        {
            let mut builder = ModelBuilder::new(&mut root);
            builder.start_assembly(&key, false).unwrap();
            builder.end_assembly().unwrap();
            builder.start_assembly(&key, true).unwrap();
            builder.end_assembly().unwrap();
            builder.finish().unwrap();
        }
        assert!(!root.find_assembly(&key).unwrap().is_dependency());
    }
}
