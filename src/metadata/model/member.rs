//! Member nodes: fields, properties, events and methods.
//!
//! All member variants share a [`Member`] record (key, declaring type, declared type,
//! attributes, usages) and differ in their [`MemberKind`] payload. For a method, the
//! declared type is the return type.

use bitflags::bitflags;

use crate::metadata::{
    identity::MemberKey,
    model::{MemberId, Node, NodeRef, TypeId, UsageKind, UsageSet},
};

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    /// Method modifier flags
    pub struct MethodFlags: u8 {
        /// Method is an instance or static constructor
        const CONSTRUCTOR = 0x01;
        /// Method has no body
        const ABSTRACT = 0x02;
        /// Method takes part in virtual dispatch
        const VIRTUAL = 0x04;
        /// Method has no `this`
        const STATIC = 0x08;
    }
}

/// Method specific detail
#[derive(Debug, Clone, Default)]
pub struct MethodInfo {
    pub(crate) parameters: Vec<TypeId>,
    pub(crate) flags: MethodFlags,
    pub(crate) signature_only: bool,
}

impl MethodInfo {
    /// Parameter types in declaration order
    #[must_use]
    pub fn parameters(&self) -> &[TypeId] {
        &self.parameters
    }

    /// Modifier flags
    #[must_use]
    pub fn flags(&self) -> MethodFlags {
        self.flags
    }

    /// Returns true if the method was only visited for its signature
    #[must_use]
    pub fn is_signature_only(&self) -> bool {
        self.signature_only
    }
}

/// Variant payload of a [`Member`]
#[derive(Debug, Clone)]
pub enum MemberKind {
    /// A field
    Field,
    /// A property with optional accessor methods
    Property {
        /// The `get_` accessor
        getter: Option<MemberId>,
        /// The `set_` accessor
        setter: Option<MemberId>,
    },
    /// An event with optional accessor methods
    Event {
        /// The `add_` accessor
        adder: Option<MemberId>,
        /// The `remove_` accessor
        remover: Option<MemberId>,
    },
    /// A method or constructor
    Method(MethodInfo),
}

impl MemberKind {
    /// Empty payload for a new member of the given kind; `None` for [`UsageKind::Type`]
    #[must_use]
    pub fn empty(kind: UsageKind) -> Option<Self> {
        match kind {
            UsageKind::Type => None,
            UsageKind::Field => Some(MemberKind::Field),
            UsageKind::Property => Some(MemberKind::Property {
                getter: None,
                setter: None,
            }),
            UsageKind::Event => Some(MemberKind::Event {
                adder: None,
                remover: None,
            }),
            UsageKind::Method => Some(MemberKind::Method(MethodInfo::default())),
        }
    }

    /// The usage kind of a member carrying this payload
    #[must_use]
    pub fn usage_kind(&self) -> UsageKind {
        match self {
            MemberKind::Field => UsageKind::Field,
            MemberKind::Property { .. } => UsageKind::Property,
            MemberKind::Event { .. } => UsageKind::Event,
            MemberKind::Method(_) => UsageKind::Method,
        }
    }
}

/// A member, owned by exactly one type.
#[derive(Debug)]
pub struct Member {
    pub(crate) id: MemberId,
    pub(crate) key: MemberKey,
    pub(crate) declaring_type: TypeId,
    pub(crate) member_type: Option<TypeId>,
    pub(crate) attributes: Vec<TypeId>,
    pub(crate) usages: UsageSet,
    pub(crate) placeholder: bool,
    pub(crate) kind: MemberKind,
}

impl Member {
    pub(crate) fn new(
        id: MemberId,
        key: MemberKey,
        declaring_type: TypeId,
        kind: MemberKind,
    ) -> Self {
        Member {
            id,
            key,
            declaring_type,
            member_type: None,
            attributes: Vec::new(),
            usages: UsageSet::new(),
            placeholder: true,
            kind,
        }
    }

    /// Arena id of this member
    #[must_use]
    pub fn id(&self) -> MemberId {
        self.id
    }

    /// Identity key of this member
    #[must_use]
    pub fn key(&self) -> &MemberKey {
        &self.key
    }

    /// The type that declares this member
    #[must_use]
    pub fn declaring_type(&self) -> TypeId {
        self.declaring_type
    }

    /// Field, property or event type; return type for methods
    #[must_use]
    pub fn member_type(&self) -> Option<TypeId> {
        self.member_type
    }

    /// Attribute types applied to this member, deduplicated
    #[must_use]
    pub fn attributes(&self) -> &[TypeId] {
        &self.attributes
    }

    /// Variant payload
    #[must_use]
    pub fn kind(&self) -> &MemberKind {
        &self.kind
    }

    /// Member has only been seen as a reference target, never visited
    #[must_use]
    pub fn is_placeholder(&self) -> bool {
        self.placeholder
    }

    /// All usages recorded against this member, including self-type references
    #[must_use]
    pub fn usages(&self) -> &UsageSet {
        &self.usages
    }

    /// Usages of this member without references to its declaring type or that type's members
    #[must_use]
    pub fn directly_uses(&self) -> UsageSet {
        self.usages.remove_references_to_type(self.declaring_type)
    }

    /// Returns true for methods and constructors
    #[must_use]
    pub fn is_method(&self) -> bool {
        matches!(self.kind, MemberKind::Method(_))
    }

    /// Method detail, if this member is a method
    #[must_use]
    pub fn as_method(&self) -> Option<&MethodInfo> {
        match &self.kind {
            MemberKind::Method(info) => Some(info),
            _ => None,
        }
    }

    /// The return type, if this member is a method with a non-void return
    #[must_use]
    pub fn return_type(&self) -> Option<TypeId> {
        if self.is_method() {
            self.member_type
        } else {
            None
        }
    }

    /// Method is named like a property getter
    #[must_use]
    pub fn is_getter(&self) -> bool {
        self.is_method() && self.key.name().starts_with("get_")
    }

    /// Method is named like a property setter
    #[must_use]
    pub fn is_setter(&self) -> bool {
        self.is_method() && self.key.name().starts_with("set_")
    }

    /// Property getter
    #[must_use]
    pub fn getter(&self) -> Option<MemberId> {
        match self.kind {
            MemberKind::Property { getter, .. } => getter,
            _ => None,
        }
    }

    /// Property setter
    #[must_use]
    pub fn setter(&self) -> Option<MemberId> {
        match self.kind {
            MemberKind::Property { setter, .. } => setter,
            _ => None,
        }
    }

    /// Event adder
    #[must_use]
    pub fn adder(&self) -> Option<MemberId> {
        match self.kind {
            MemberKind::Event { adder, .. } => adder,
            _ => None,
        }
    }

    /// Event remover
    #[must_use]
    pub fn remover(&self) -> Option<MemberId> {
        match self.kind {
            MemberKind::Event { remover, .. } => remover,
            _ => None,
        }
    }

    pub(crate) fn set_member_type(&mut self, member_type: Option<TypeId>) {
        self.member_type = member_type;
    }

    pub(crate) fn add_attribute(&mut self, attribute: TypeId) -> bool {
        if self.attributes.contains(&attribute) {
            return false;
        }
        self.attributes.push(attribute);
        true
    }

    pub(crate) fn method_mut(&mut self) -> Option<&mut MethodInfo> {
        match &mut self.kind {
            MemberKind::Method(info) => Some(info),
            _ => None,
        }
    }

    /// Sets the first (`getter`/`adder`) or second (`setter`/`remover`) accessor slot.
    /// Returns false for kinds without accessors.
    pub(crate) fn set_accessor(&mut self, first: bool, accessor: MemberId) -> bool {
        match &mut self.kind {
            MemberKind::Property { getter, setter } => {
                *(if first { getter } else { setter }) = Some(accessor);
                true
            }
            MemberKind::Event { adder, remover } => {
                *(if first { adder } else { remover }) = Some(accessor);
                true
            }
            _ => false,
        }
    }
}

impl Node for Member {
    fn node_ref(&self) -> NodeRef {
        NodeRef::Member(self.id)
    }

    fn usage_kind(&self) -> UsageKind {
        self.kind.usage_kind()
    }

    fn name(&self) -> String {
        self.key.to_string()
    }

    fn owning_type(&self) -> TypeId {
        self.declaring_type
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::{identity::AssemblyKey, model::Usage};
    use strum::IntoEnumIterator;

    fn owner() -> crate::metadata::identity::TypeKey {
        AssemblyKey::new("App").namespace("N").type_key("A")
    }

    #[test]
    fn test_empty_kind_round_trips_usage_kind() {
        for kind in UsageKind::iter() {
            match MemberKind::empty(kind) {
                Some(payload) => assert_eq!(payload.usage_kind(), kind),
                None => assert_eq!(kind, UsageKind::Type),
            }
        }
    }

    #[test]
    fn test_getter_setter_naming() {
        let getter = Member::new(
            MemberId::new(0),
            owner().method("get_Name", vec![]),
            TypeId::new(0),
            MemberKind::Method(MethodInfo::default()),
        );
        assert!(getter.is_getter());
        assert!(!getter.is_setter());

        let field = Member::new(
            MemberId::new(1),
            owner().member("get_Field"),
            TypeId::new(0),
            MemberKind::Field,
        );
        assert!(!field.is_getter());
    }

    #[test]
    fn test_accessor_slots() {
        let mut property = Member::new(
            MemberId::new(0),
            owner().member("Name"),
            TypeId::new(0),
            MemberKind::empty(UsageKind::Property).unwrap(),
        );
        assert!(property.set_accessor(true, MemberId::new(1)));
        assert!(property.set_accessor(false, MemberId::new(2)));
        assert_eq!(property.getter(), Some(MemberId::new(1)));
        assert_eq!(property.setter(), Some(MemberId::new(2)));
        assert_eq!(property.adder(), None);

        let mut field = Member::new(
            MemberId::new(3),
            owner().member("count"),
            TypeId::new(0),
            MemberKind::Field,
        );
        assert!(!field.set_accessor(true, MemberId::new(1)));
    }

    #[test]
    fn test_directly_uses_strips_declaring_type() {
        let mut method = Member::new(
            MemberId::new(0),
            owner().method("Foo", vec![]),
            TypeId::new(0),
            MemberKind::Method(MethodInfo::default()),
        );
        let own_type = NodeRef::Type(TypeId::new(0));
        let own_helper = NodeRef::Member(MemberId::new(1));
        let foreign = NodeRef::Member(MemberId::new(5));
        method
            .usages
            .insert(Usage::new(own_type, UsageKind::Type, TypeId::new(0)));
        method
            .usages
            .insert(Usage::new(own_helper, UsageKind::Method, TypeId::new(0)));
        method
            .usages
            .insert(Usage::new(foreign, UsageKind::Method, TypeId::new(3)));
        assert_eq!(method.usages().len(), 3);

        let direct = method.directly_uses();
        assert_eq!(direct.len(), 1);
        assert!(direct.contains(foreign));
        assert!(!direct.contains(own_helper));
    }
}
