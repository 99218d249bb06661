//! Composite identity keys for every node of the usage model.
//!
//! Each key embeds the key of its parent plus a local discriminator, so a [`MemberKey`]
//! carries its [`TypeKey`], which carries its [`NamespaceKey`], which carries its
//! [`AssemblyKey`]. Equality and hashing are structural over the whole chain.
//!
//! Overloads are disambiguated by [`MethodSignature`]: the ordered parameter type keys and
//! the generic arity of the method. Non-method members (fields, properties, events) carry
//! no signature, which keeps a field `Count` and a method `Count()` apart.

use std::fmt;

use crate::metadata::model::UsageKind;

/// Identifies one compiled module.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AssemblyKey {
    name: String,
}

impl AssemblyKey {
    /// Create a new key from the simple assembly name (e.g. `mscorlib`)
    pub fn new(name: impl Into<String>) -> Self {
        AssemblyKey { name: name.into() }
    }

    /// The simple assembly name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Build the key of a namespace inside this assembly
    #[must_use]
    pub fn namespace(&self, name: impl Into<String>) -> NamespaceKey {
        NamespaceKey::new(self.clone(), name)
    }
}

impl fmt::Display for AssemblyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Identifies a namespace within one assembly. The empty name is the global namespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NamespaceKey {
    assembly: AssemblyKey,
    name: String,
}

impl NamespaceKey {
    /// Create a new namespace key
    pub fn new(assembly: AssemblyKey, name: impl Into<String>) -> Self {
        NamespaceKey {
            assembly,
            name: name.into(),
        }
    }

    /// The owning assembly
    #[must_use]
    pub fn assembly(&self) -> &AssemblyKey {
        &self.assembly
    }

    /// The dotted namespace name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns true for the unnamed global namespace
    #[must_use]
    pub fn is_global(&self) -> bool {
        self.name.is_empty()
    }

    /// Build the key of a non-generic type inside this namespace
    #[must_use]
    pub fn type_key(&self, name: impl Into<String>) -> TypeKey {
        TypeKey::new(self.clone(), name)
    }
}

impl fmt::Display for NamespaceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]{}", self.assembly, self.name)
    }
}

/// Identifies a type by namespace, simple name and generic arity.
///
/// `List` and `` List`1 `` are different types; the arity is part of the identity and is
/// rendered with the usual backtick suffix.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeKey {
    namespace: NamespaceKey,
    name: String,
    generic_arity: u32,
}

impl TypeKey {
    /// Create a key for a non-generic type
    pub fn new(namespace: NamespaceKey, name: impl Into<String>) -> Self {
        Self::generic(namespace, name, 0)
    }

    /// Create a key for a generic type definition with `generic_arity` parameters
    pub fn generic(namespace: NamespaceKey, name: impl Into<String>, generic_arity: u32) -> Self {
        TypeKey {
            namespace,
            name: name.into(),
            generic_arity,
        }
    }

    /// Split a dotted full name (`System.Collections.Hashtable`) at its last dot into
    /// namespace and simple name.
    pub fn from_full_name(assembly: AssemblyKey, full_name: &str) -> Self {
        match full_name.rsplit_once('.') {
            Some((namespace, name)) => Self::new(NamespaceKey::new(assembly, namespace), name),
            None => Self::new(NamespaceKey::new(assembly, ""), full_name),
        }
    }

    /// The owning namespace
    #[must_use]
    pub fn namespace(&self) -> &NamespaceKey {
        &self.namespace
    }

    /// The owning assembly
    #[must_use]
    pub fn assembly(&self) -> &AssemblyKey {
        self.namespace.assembly()
    }

    /// The simple type name, without arity suffix
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of generic parameters of the type definition
    #[must_use]
    pub fn generic_arity(&self) -> u32 {
        self.generic_arity
    }

    /// Returns the full name (Namespace.Name`Arity) without the assembly
    #[must_use]
    pub fn full_name(&self) -> String {
        let mut full = if self.namespace.is_global() {
            self.name.clone()
        } else {
            format!("{}.{}", self.namespace.name(), self.name)
        };
        if self.generic_arity > 0 {
            full.push('`');
            full.push_str(&self.generic_arity.to_string());
        }
        full
    }

    /// Build the key of a field, property or event declared on this type
    #[must_use]
    pub fn member(&self, name: impl Into<String>) -> MemberKey {
        MemberKey::new(self.clone(), name)
    }

    /// Build the key of a non-generic method declared on this type
    #[must_use]
    pub fn method(&self, name: impl Into<String>, parameters: Vec<TypeKey>) -> MemberKey {
        MemberKey::method(self.clone(), name, MethodSignature::new(parameters))
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]{}", self.assembly(), self.full_name())
    }
}

/// Overload discriminator of a method: ordered parameter types plus generic arity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct MethodSignature {
    parameters: Vec<TypeKey>,
    generic_arity: u32,
}

impl MethodSignature {
    /// Signature of a non-generic method
    #[must_use]
    pub fn new(parameters: Vec<TypeKey>) -> Self {
        MethodSignature {
            parameters,
            generic_arity: 0,
        }
    }

    /// Signature of a generic method
    #[must_use]
    pub fn generic(parameters: Vec<TypeKey>, generic_arity: u32) -> Self {
        MethodSignature {
            parameters,
            generic_arity,
        }
    }

    /// The ordered parameter type keys
    #[must_use]
    pub fn parameters(&self) -> &[TypeKey] {
        &self.parameters
    }

    /// Number of generic method parameters
    #[must_use]
    pub fn generic_arity(&self) -> u32 {
        self.generic_arity
    }
}

/// Identifies a member of a type.
///
/// Methods carry a [`MethodSignature`]; fields, properties and events do not.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MemberKey {
    declaring_type: TypeKey,
    name: String,
    signature: Option<MethodSignature>,
}

/// Key of a method; a [`MemberKey`] that carries a [`MethodSignature`].
pub type MethodKey = MemberKey;

impl MemberKey {
    /// Key of a field, property or event
    pub fn new(declaring_type: TypeKey, name: impl Into<String>) -> Self {
        MemberKey {
            declaring_type,
            name: name.into(),
            signature: None,
        }
    }

    /// Key of a method with the given overload signature
    pub fn method(
        declaring_type: TypeKey,
        name: impl Into<String>,
        signature: MethodSignature,
    ) -> Self {
        MemberKey {
            declaring_type,
            name: name.into(),
            signature: Some(signature),
        }
    }

    /// The type that declares this member
    #[must_use]
    pub fn declaring_type(&self) -> &TypeKey {
        &self.declaring_type
    }

    /// The member name (e.g. `get_Count`, `.ctor`)
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The overload signature, present for methods only
    #[must_use]
    pub fn signature(&self) -> Option<&MethodSignature> {
        self.signature.as_ref()
    }
}

impl fmt::Display for MemberKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.declaring_type, self.name)?;
        if let Some(signature) = &self.signature {
            if signature.generic_arity > 0 {
                write!(f, "``{}", signature.generic_arity)?;
            }
            f.write_str("(")?;
            for (index, parameter) in signature.parameters.iter().enumerate() {
                if index > 0 {
                    f.write_str(", ")?;
                }
                f.write_str(&parameter.full_name())?;
            }
            f.write_str(")")?;
        }
        Ok(())
    }
}

/// Key of any node a usage can point at, tagged with the node's kind.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NodeKey {
    /// A type
    Type(TypeKey),
    /// A method or constructor
    Method(MemberKey),
    /// A field
    Field(MemberKey),
    /// A property
    Property(MemberKey),
    /// An event
    Event(MemberKey),
}

impl NodeKey {
    /// The usage kind a reference to this node produces
    #[must_use]
    pub fn kind(&self) -> UsageKind {
        match self {
            NodeKey::Type(_) => UsageKind::Type,
            NodeKey::Method(_) => UsageKind::Method,
            NodeKey::Field(_) => UsageKind::Field,
            NodeKey::Property(_) => UsageKind::Property,
            NodeKey::Event(_) => UsageKind::Event,
        }
    }

    /// The type that is, or declares, this node
    #[must_use]
    pub fn type_key(&self) -> &TypeKey {
        match self {
            NodeKey::Type(key) => key,
            NodeKey::Method(key)
            | NodeKey::Field(key)
            | NodeKey::Property(key)
            | NodeKey::Event(key) => key.declaring_type(),
        }
    }

    /// The member key, if this node is a member
    #[must_use]
    pub fn member_key(&self) -> Option<&MemberKey> {
        match self {
            NodeKey::Type(_) => None,
            NodeKey::Method(key)
            | NodeKey::Field(key)
            | NodeKey::Property(key)
            | NodeKey::Event(key) => Some(key),
        }
    }
}

impl fmt::Display for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKey::Type(key) => key.fmt(f),
            NodeKey::Method(key)
            | NodeKey::Field(key)
            | NodeKey::Property(key)
            | NodeKey::Event(key) => key.fmt(f),
        }
    }
}

impl From<TypeKey> for NodeKey {
    fn from(key: TypeKey) -> Self {
        NodeKey::Type(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn system() -> NamespaceKey {
        AssemblyKey::new("mscorlib").namespace("System")
    }

    #[test]
    fn test_keys_embed_parent() {
        let int32 = system().type_key("Int32");
        assert_eq!(int32.assembly().name(), "mscorlib");
        assert_eq!(int32.namespace().name(), "System");
        assert_eq!(int32.full_name(), "System.Int32");
        assert_eq!(int32.to_string(), "[mscorlib]System.Int32");
    }

    #[test]
    fn test_type_key_equality_includes_arity() {
        let generic = AssemblyKey::new("mscorlib")
            .namespace("System.Collections.Generic");
        let list = TypeKey::new(generic.clone(), "List");
        let list_t = TypeKey::generic(generic.clone(), "List", 1);
        assert_ne!(list, list_t);
        assert_eq!(list_t, TypeKey::generic(generic, "List", 1));
        assert_eq!(list_t.full_name(), "System.Collections.Generic.List`1");
    }

    #[test]
    fn test_same_name_in_other_assembly_differs() {
        let a = TypeKey::from_full_name(AssemblyKey::new("A"), "N.T");
        let b = TypeKey::from_full_name(AssemblyKey::new("B"), "N.T");
        assert_ne!(a, b);
        assert_eq!(a.name(), b.name());
    }

    #[test]
    fn test_from_full_name_global_namespace() {
        let key = TypeKey::from_full_name(AssemblyKey::new("App"), "Program");
        assert!(key.namespace().is_global());
        assert_eq!(key.full_name(), "Program");
    }

    #[test]
    fn test_overloads_never_collide() {
        let console = system().type_key("Console");
        let int32 = system().type_key("Int32");
        let string = system().type_key("String");

        let by_int = console.method("WriteLine", vec![int32.clone()]);
        let by_string = console.method("WriteLine", vec![string.clone()]);
        let no_args = console.method("WriteLine", vec![]);
        let generic = MemberKey::method(
            console.clone(),
            "WriteLine",
            MethodSignature::generic(vec![int32.clone()], 1),
        );

        let set: HashSet<_> = [&by_int, &by_string, &no_args, &generic].into_iter().collect();
        assert_eq!(set.len(), 4);
        assert_eq!(by_int, console.method("WriteLine", vec![int32]));
    }

    #[test]
    fn test_field_and_parameterless_method_are_distinct() {
        let list = system().type_key("Array");
        assert_ne!(list.member("Length"), list.method("Length", vec![]));
    }

    #[test]
    fn test_member_display() {
        let console = system().type_key("Console");
        let key = console.method(
            "WriteLine",
            vec![system().type_key("String"), system().type_key("Object")],
        );
        assert_eq!(
            key.to_string(),
            "[mscorlib]System.Console::WriteLine(System.String, System.Object)"
        );
        assert_eq!(console.member("Out").to_string(), "[mscorlib]System.Console::Out");
    }

    #[test]
    fn test_node_key_kind_and_type() {
        let console = system().type_key("Console");
        let node = NodeKey::Field(console.member("Out"));
        assert_eq!(node.kind(), UsageKind::Field);
        assert_eq!(node.type_key(), &console);
        assert!(NodeKey::from(console).member_key().is_none());
    }
}
