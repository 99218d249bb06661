//! Decoded-element structures handed over by a module decoder.
//!
//! A decoder turns one compiled module into a [`DecodedModule`]: a tree of declared types
//! with their members, each carrying the identity keys of everything it refers to. The
//! structures hold no references into the model; drivers translate them into builder
//! protocol events.

use crate::{
    metadata::{
        identity::{AssemblyKey, MemberKey, NodeKey, TypeKey},
        model::MethodFlags,
    },
    Result,
};

/// The decoder collaborator: produces the decoded form of one module.
pub trait ModuleSource: Send + Sync {
    /// Display name used in logging and failure reports
    fn name(&self) -> String;

    /// Returns true if the module is only referenced, and should be modeled signatures-only
    fn is_dependency(&self) -> bool {
        false
    }

    /// Decode the module.
    ///
    /// # Errors
    /// Returns [`crate::Error::Decode`] if the module is malformed or unreadable.
    fn decode(&self) -> Result<DecodedModule>;
}

/// A reference to a type, including generic instance arguments
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeRef {
    /// The referenced (open) type
    pub key: TypeKey,
    /// Arguments of a generic instance, in order
    pub generic_arguments: Vec<TypeRef>,
}

impl TypeRef {
    /// A plain reference
    #[must_use]
    pub fn new(key: TypeKey) -> Self {
        TypeRef {
            key,
            generic_arguments: Vec::new(),
        }
    }

    /// A generic instance reference
    #[must_use]
    pub fn generic(key: TypeKey, generic_arguments: Vec<TypeRef>) -> Self {
        TypeRef {
            key,
            generic_arguments,
        }
    }
}

impl From<TypeKey> for TypeRef {
    fn from(key: TypeKey) -> Self {
        TypeRef::new(key)
    }
}

/// A generic parameter declared on a type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenericParameter {
    /// Key the parameter is referenced by
    pub key: TypeKey,
    /// Constraint types
    pub constraints: Vec<TypeRef>,
}

/// Instruction-level references of a method body, as resolved by the decoder
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MethodBody {
    /// Referenced nodes in instruction order, duplicates allowed
    pub references: Vec<NodeKey>,
}

/// A decoded method or constructor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedMethod {
    /// Identity of the method
    pub key: MemberKey,
    /// Return type; `None` for void
    pub return_type: Option<TypeRef>,
    /// Parameter types in order
    pub parameters: Vec<TypeRef>,
    /// Modifier flags
    pub flags: MethodFlags,
    /// Applied attribute types
    pub attributes: Vec<TypeKey>,
    /// Method body, absent for abstract and extern methods
    pub body: Option<MethodBody>,
}

impl DecodedMethod {
    /// A parameterless void method without body
    #[must_use]
    pub fn new(key: MemberKey) -> Self {
        DecodedMethod {
            key,
            return_type: None,
            parameters: Vec::new(),
            flags: MethodFlags::empty(),
            attributes: Vec::new(),
            body: None,
        }
    }

    /// Attach a body referencing `references`
    #[must_use]
    pub fn with_body<I: IntoIterator<Item = NodeKey>>(mut self, references: I) -> Self {
        self.body = Some(MethodBody {
            references: references.into_iter().collect(),
        });
        self
    }

    /// Set the return type
    #[must_use]
    pub fn returning(mut self, return_type: TypeRef) -> Self {
        self.return_type = Some(return_type);
        self
    }
}

/// A decoded field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedField {
    /// Identity of the field
    pub key: MemberKey,
    /// Declared type
    pub field_type: TypeRef,
    /// Applied attribute types
    pub attributes: Vec<TypeKey>,
}

/// A decoded property with its accessors
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedProperty {
    /// Identity of the property
    pub key: MemberKey,
    /// Declared type
    pub property_type: TypeRef,
    /// Applied attribute types
    pub attributes: Vec<TypeKey>,
    /// `get_` accessor
    pub getter: Option<DecodedMethod>,
    /// `set_` accessor
    pub setter: Option<DecodedMethod>,
}

/// A decoded event with its accessors
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedEvent {
    /// Identity of the event
    pub key: MemberKey,
    /// Delegate type
    pub event_type: TypeRef,
    /// Applied attribute types
    pub attributes: Vec<TypeKey>,
    /// `add_` accessor
    pub adder: Option<DecodedMethod>,
    /// `remove_` accessor
    pub remover: Option<DecodedMethod>,
}

/// A decoded type definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedType {
    /// Identity of the type
    pub key: TypeKey,
    /// Type is an interface
    pub is_interface: bool,
    /// Type is abstract
    pub is_abstract: bool,
    /// Base type, absent for interfaces and the root object type
    pub base_type: Option<TypeRef>,
    /// Implemented interfaces
    pub interfaces: Vec<TypeRef>,
    /// Declared generic parameters
    pub generic_parameters: Vec<GenericParameter>,
    /// Applied attribute types
    pub attributes: Vec<TypeKey>,
    /// Declared fields
    pub fields: Vec<DecodedField>,
    /// Declared properties
    pub properties: Vec<DecodedProperty>,
    /// Declared events
    pub events: Vec<DecodedEvent>,
    /// Instance and static constructors
    pub constructors: Vec<DecodedMethod>,
    /// Declared methods other than constructors and accessors
    pub methods: Vec<DecodedMethod>,
    /// Types nested in this one
    pub nested_types: Vec<DecodedType>,
}

impl DecodedType {
    /// An empty class definition
    #[must_use]
    pub fn new(key: TypeKey) -> Self {
        DecodedType {
            key,
            is_interface: false,
            is_abstract: false,
            base_type: None,
            interfaces: Vec::new(),
            generic_parameters: Vec::new(),
            attributes: Vec::new(),
            fields: Vec::new(),
            properties: Vec::new(),
            events: Vec::new(),
            constructors: Vec::new(),
            methods: Vec::new(),
            nested_types: Vec::new(),
        }
    }

    /// Add a method
    #[must_use]
    pub fn with_method(mut self, method: DecodedMethod) -> Self {
        self.methods.push(method);
        self
    }

    /// Set the base type
    #[must_use]
    pub fn with_base(mut self, base: TypeRef) -> Self {
        self.base_type = Some(base);
        self
    }

    /// Add an implemented interface
    #[must_use]
    pub fn with_interface(mut self, interface: TypeRef) -> Self {
        self.interfaces.push(interface);
        self
    }

    /// Iterate this type and all types nested in it, depth first
    pub fn walk(&self) -> Box<dyn Iterator<Item = &DecodedType> + '_> {
        Box::new(
            std::iter::once(self)
                .chain(self.nested_types.iter().flat_map(DecodedType::walk)),
        )
    }
}

/// The decoded form of one compiled module
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedModule {
    /// Identity of the module
    pub key: AssemblyKey,
    /// Top-level type definitions
    pub types: Vec<DecodedType>,
    /// Module is only referenced by the analyzed modules
    pub dependency: bool,
}

impl DecodedModule {
    /// An empty module
    #[must_use]
    pub fn new(key: AssemblyKey) -> Self {
        DecodedModule {
            key,
            types: Vec::new(),
            dependency: false,
        }
    }

    /// Mark the module as a referenced dependency
    #[must_use]
    pub fn as_dependency(mut self) -> Self {
        self.dependency = true;
        self
    }

    /// Add a top-level type
    #[must_use]
    pub fn with_type(mut self, ty: DecodedType) -> Self {
        self.types.push(ty);
        self
    }

    /// Iterate every type definition including nested ones
    pub fn all_types(&self) -> impl Iterator<Item = &DecodedType> + '_ {
        self.types.iter().flat_map(DecodedType::walk)
    }
}

impl ModuleSource for DecodedModule {
    fn name(&self) -> String {
        self.key.name().to_string()
    }

    fn is_dependency(&self) -> bool {
        self.dependency
    }

    fn decode(&self) -> Result<DecodedModule> {
        Ok(self.clone())
    }
}
