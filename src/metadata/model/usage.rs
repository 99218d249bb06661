//! Usage records and ordered, duplicate-free usage sets.
//!
//! A [`Usage`] is an immutable reference to a node plus the kind of that node and the type
//! that is, or declares, the node. Two usages
//! are equal when they point at the same node, whatever the reason the reference was
//! recorded (field type, base type, call instruction, ...). A [`UsageSet`] keeps the first
//! occurrence of each target in insertion order and coalesces later duplicates.

use std::collections::HashSet;
use std::hash::{Hash, Hasher};

use strum::{Display, EnumIter};

use crate::metadata::model::{MemberId, TypeId};

/// The kind of node a usage points at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum UsageKind {
    /// A type
    Type,
    /// A method or constructor
    Method,
    /// A field
    Field,
    /// A property
    Property,
    /// An event
    Event,
}

/// Arena address of any node that can be the target of a usage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NodeRef {
    /// A type node
    Type(TypeId),
    /// A member node (field, property, event or method)
    Member(MemberId),
}

/// Capability shared by every node that can be referenced: it has a name and can produce a
/// usage record of itself.
pub trait Node {
    /// Arena address of this node
    fn node_ref(&self) -> NodeRef;

    /// Kind of usage a reference to this node produces
    fn usage_kind(&self) -> UsageKind;

    /// Human readable name of this node
    fn name(&self) -> String;

    /// The type that is, or declares, this node
    fn owning_type(&self) -> TypeId;

    /// A usage record pointing at this node
    fn usage(&self) -> Usage {
        Usage::new(self.node_ref(), self.usage_kind(), self.owning_type())
    }
}

/// A recorded reference to a node.
///
/// Equality and hashing only consider the target, so a usage created as a field type and
/// one created by a call instruction coalesce when they point at the same node.
#[derive(Debug, Clone, Copy)]
pub struct Usage {
    target: NodeRef,
    kind: UsageKind,
    owner: TypeId,
}

impl Usage {
    /// Create a new usage of `target`, which is `owner` itself or a member declared on it
    #[must_use]
    pub const fn new(target: NodeRef, kind: UsageKind, owner: TypeId) -> Self {
        Usage {
            target,
            kind,
            owner,
        }
    }

    /// The referenced node
    #[must_use]
    pub const fn target(&self) -> NodeRef {
        self.target
    }

    /// The kind of the referenced node
    #[must_use]
    pub const fn kind(&self) -> UsageKind {
        self.kind
    }

    /// The type that is, or declares, the referenced node
    #[must_use]
    pub const fn owner(&self) -> TypeId {
        self.owner
    }

    /// The referenced method, if the target is one
    #[must_use]
    pub fn method(&self) -> Option<MemberId> {
        match (self.target, self.kind) {
            (NodeRef::Member(id), UsageKind::Method) => Some(id),
            _ => None,
        }
    }
}

impl PartialEq for Usage {
    fn eq(&self, other: &Self) -> bool {
        self.target == other.target
    }
}

impl Eq for Usage {}

impl Hash for Usage {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.target.hash(state);
    }
}

/// Unique, insertion-ordered collection of [`Usage`] records.
///
/// Set equality ignores order.
#[derive(Debug, Clone, Default)]
pub struct UsageSet {
    usages: Vec<Usage>,
    targets: HashSet<NodeRef>,
}

impl UsageSet {
    /// Create an empty set
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct targets
    #[must_use]
    pub fn len(&self) -> usize {
        self.usages.len()
    }

    /// Returns true if no usage has been recorded
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.usages.is_empty()
    }

    /// Iterate usages in first-insertion order
    pub fn iter(&self) -> std::slice::Iter<'_, Usage> {
        self.usages.iter()
    }

    /// Returns true if a usage of `target` is present
    #[must_use]
    pub fn contains(&self, target: NodeRef) -> bool {
        self.targets.contains(&target)
    }

    /// Record a usage of `node`. Returns false if the node was already used.
    pub fn use_node<N: Node + ?Sized>(&mut self, node: &N) -> bool {
        self.insert(node.usage())
    }

    /// Add a usage record, coalescing by target. Returns false if the target was present.
    pub fn insert(&mut self, usage: Usage) -> bool {
        if self.targets.insert(usage.target) {
            self.usages.push(usage);
            true
        } else {
            false
        }
    }

    /// Add every usage of `other` that is not yet present
    pub fn union(&mut self, other: &UsageSet) {
        for usage in &other.usages {
            self.insert(*usage);
        }
    }

    /// Returns a filtered copy without usages that target `type_id` or one of its members
    #[must_use]
    pub fn remove_references_to_type(&self, type_id: TypeId) -> UsageSet {
        self.usages
            .iter()
            .filter(|usage| usage.owner != type_id)
            .copied()
            .collect()
    }

    /// Iterate the usages of the given kind
    pub fn of_kind(&self, kind: UsageKind) -> impl Iterator<Item = &Usage> + '_ {
        self.usages.iter().filter(move |usage| usage.kind == kind)
    }

    /// Iterate the methods used by this set
    pub fn methods(&self) -> impl Iterator<Item = MemberId> + '_ {
        self.usages.iter().filter_map(Usage::method)
    }

    /// Iterate the types used by this set
    pub fn types(&self) -> impl Iterator<Item = TypeId> + '_ {
        self.usages.iter().filter_map(|usage| match usage.target {
            NodeRef::Type(id) => Some(id),
            NodeRef::Member(_) => None,
        })
    }

    /// Returns true if every target of `self` is also a target of `other`
    #[must_use]
    pub fn is_subset(&self, other: &UsageSet) -> bool {
        self.targets.is_subset(&other.targets)
    }
}

impl PartialEq for UsageSet {
    fn eq(&self, other: &Self) -> bool {
        self.targets == other.targets
    }
}

impl Eq for UsageSet {}

impl FromIterator<Usage> for UsageSet {
    fn from_iter<I: IntoIterator<Item = Usage>>(iter: I) -> Self {
        let mut set = UsageSet::new();
        for usage in iter {
            set.insert(usage);
        }
        set
    }
}

impl<'a> IntoIterator for &'a UsageSet {
    type Item = &'a Usage;
    type IntoIter = std::slice::Iter<'a, Usage>;

    fn into_iter(self) -> Self::IntoIter {
        self.usages.iter()
    }
}
