//! Direct and transitive usage sets of methods.
//!
//! [`UsageClosure`] answers two questions over a completed [`QueryRoot`]:
//!
//! - **Forward**: what does a method use, directly or through the methods it calls
//!   ([`UsageClosure::indirectly_uses`])
//! - **Reverse**: which methods are affected when a node changes
//!   ([`UsageClosure::impacted_by`])
//!
//! # Algorithm
//!
//! The indirect usage set of `m` is the union of the direct usage sets of every method
//! reachable from `m` along method-kind usage edges, `m` included. Traversal is breadth
//! first with a visited set keyed by method id, so cyclic call graphs terminate and each
//! method and edge is processed once. `m` itself ends up in its own result only when some
//! reachable method uses it, i.e. through a cycle. Calls between members of one type are
//! stripped from direct usage sets, so only cycles that cross types count.
//!
//! # Thread Safety
//!
//! The closure borrows the model immutably. Results are memoized in a [`DashMap`] so
//! concurrent callers share them, and [`UsageClosure::compute_all`] fans out per method
//! with rayon.
//!
//! Computing closures on a model that is still being built gives stale results; the borrow
//! on the root rules this out at compile time.

use std::{
    collections::{HashMap, HashSet, VecDeque},
    sync::{Arc, OnceLock},
};

use dashmap::DashMap;
use rayon::prelude::*;
use tracing::debug;

use crate::{
    metadata::{
        identity::NodeKey,
        model::{MemberId, NodeRef, QueryRoot, UsageSet},
    },
    Error, Result,
};

/// Memoizing usage closure engine over a completed model.
pub struct UsageClosure<'r> {
    root: &'r QueryRoot,
    cache: DashMap<MemberId, Arc<UsageSet>>,
    /// Reverse direct-usage edges: node -> methods using it directly
    dependents: OnceLock<HashMap<NodeRef, Vec<MemberId>>>,
}

impl<'r> UsageClosure<'r> {
    /// Create a closure engine over `root`
    #[must_use]
    pub fn new(root: &'r QueryRoot) -> Self {
        UsageClosure {
            root,
            cache: DashMap::new(),
            dependents: OnceLock::new(),
        }
    }

    /// The model this engine reads
    #[must_use]
    pub fn root(&self) -> &'r QueryRoot {
        self.root
    }

    /// Usages of a type or member with self-type references removed
    #[must_use]
    pub fn directly_uses(&self, node: NodeRef) -> UsageSet {
        match node {
            NodeRef::Type(id) => self.root.get_type(id).directly_uses(),
            NodeRef::Member(id) => self.root.get_member(id).directly_uses(),
        }
    }

    /// The transitive usage set of `method`.
    ///
    /// # Errors
    /// Returns [`Error::NotFound`] if `method` is not a method of this model.
    pub fn indirectly_uses(&self, method: MemberId) -> Result<Arc<UsageSet>> {
        self.require_method(method)?;
        if let Some(cached) = self.cache.get(&method) {
            return Ok(Arc::clone(cached.value()));
        }

        let closure = Arc::new(self.expand(method));
        self.cache.insert(method, Arc::clone(&closure));
        Ok(closure)
    }

    /// Compute the transitive usage set of every method in parallel.
    ///
    /// # Errors
    /// Never fails for a consistent model; errors of individual methods are propagated.
    pub fn compute_all(&self) -> Result<HashMap<MemberId, Arc<UsageSet>>> {
        let methods: Vec<MemberId> = self.root.methods().map(|method| method.id()).collect();
        let closures = methods
            .par_iter()
            .map(|&method| {
                self.indirectly_uses(method)
                    .map(|closure| (method, closure))
            })
            .collect::<Result<HashMap<_, _>>>()?;

        debug!(
            methods = methods.len(),
            cached = self.cache.len(),
            "computed usage closures"
        );
        Ok(closures)
    }

    /// Every method whose transitive usage set contains `node`, in id order.
    ///
    /// This is the change-impact query: the returned methods are the ones that need
    /// re-processing when `node` changes.
    #[must_use]
    pub fn impacted_by(&self, node: NodeRef) -> Vec<MemberId> {
        let dependents = self.dependents();
        let mut impacted: HashSet<MemberId> = HashSet::new();
        let mut queue: VecDeque<MemberId> = dependents
            .get(&node)
            .map(|users| users.iter().copied().collect())
            .unwrap_or_default();

        while let Some(method) = queue.pop_front() {
            if !impacted.insert(method) {
                continue;
            }
            if let Some(callers) = dependents.get(&NodeRef::Member(method)) {
                queue.extend(
                    callers
                        .iter()
                        .copied()
                        .filter(|caller| !impacted.contains(caller)),
                );
            }
        }

        let mut impacted: Vec<MemberId> = impacted.into_iter().collect();
        impacted.sort_unstable();
        impacted
    }

    /// [`UsageClosure::impacted_by`] for a node given by key.
    ///
    /// # Errors
    /// Returns [`Error::NotFound`] if no node with this key (and kind) exists.
    pub fn impacted_by_key(&self, key: &NodeKey) -> Result<Vec<MemberId>> {
        let node = self
            .root
            .resolve(key)
            .ok_or_else(|| Error::NotFound(key.to_string()))?;
        Ok(self.impacted_by(node))
    }

    /// Number of memoized closures
    #[must_use]
    pub fn cached_count(&self) -> usize {
        self.cache.len()
    }

    fn require_method(&self, method: MemberId) -> Result<()> {
        if method.index() >= self.root.member_count() {
            return Err(Error::NotFound(format!("{:?}", method)));
        }
        let member = self.root.get_member(method);
        if !member.is_method() {
            return Err(Error::NotFound(format!("{} is not a method", member.key())));
        }
        Ok(())
    }

    fn expand(&self, start: MemberId) -> UsageSet {
        let mut closure = UsageSet::new();
        let mut visited: HashSet<MemberId> = HashSet::from([start]);
        let mut queue: VecDeque<MemberId> = VecDeque::from([start]);

        while let Some(method) = queue.pop_front() {
            let direct = self.root.get_member(method).directly_uses();
            for callee in direct.methods() {
                if visited.insert(callee) {
                    queue.push_back(callee);
                }
            }
            closure.union(&direct);
        }
        closure
    }

    fn dependents(&self) -> &HashMap<NodeRef, Vec<MemberId>> {
        self.dependents.get_or_init(|| {
            let mut dependents: HashMap<NodeRef, Vec<MemberId>> = HashMap::new();
            for method in self.root.methods() {
                for usage in method.directly_uses().iter() {
                    dependents
                        .entry(usage.target())
                        .or_default()
                        .push(method.id());
                }
            }
            dependents
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::{method_graph, method_key};

    #[test]
    fn test_cycle_terminates_and_includes_both() {
        let root = method_graph(&[("A", &["B"]), ("B", &["A"])]);
        let closure = UsageClosure::new(&root);
        let a = root.find_method(&method_key("A")).unwrap();
        let b = root.find_method(&method_key("B")).unwrap();

        let uses = closure.indirectly_uses(a).unwrap();
        assert!(uses.contains(NodeRef::Member(b)));
        assert!(uses.contains(NodeRef::Member(a)));
        assert_eq!(uses.len(), 2);
    }

    #[test]
    fn test_self_is_not_trivially_included() {
        let root = method_graph(&[("A", &["B"]), ("B", &["C"]), ("C", &[])]);
        let closure = UsageClosure::new(&root);
        let a = root.find_method(&method_key("A")).unwrap();
        let c = root.find_method(&method_key("C")).unwrap();

        let uses = closure.indirectly_uses(a).unwrap();
        assert_eq!(uses.len(), 2);
        assert!(!uses.contains(NodeRef::Member(a)));
        assert!(uses.contains(NodeRef::Member(c)));
        assert!(closure.indirectly_uses(c).unwrap().is_empty());
    }

    #[test]
    fn test_recursion_within_declaring_type_is_stripped() {
        let root = method_graph(&[("A", &["A"])]);
        let closure = UsageClosure::new(&root);
        let a = root.find_method(&method_key("A")).unwrap();
        assert!(root.get_member(a).usages().contains(NodeRef::Member(a)));
        assert!(closure.indirectly_uses(a).unwrap().is_empty());
    }

    #[test]
    fn test_results_are_memoized() {
        let root = method_graph(&[("A", &["B"]), ("B", &[])]);
        let closure = UsageClosure::new(&root);
        let a = root.find_method(&method_key("A")).unwrap();
        let first = closure.indirectly_uses(a).unwrap();
        let second = closure.indirectly_uses(a).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(closure.cached_count(), 1);
    }

    #[test]
    fn test_compute_all_covers_every_method() {
        let root = method_graph(&[
            ("A", &["B"]),
            ("B", &["C"]),
            ("C", &["A"]),
            ("D", &[]),
        ]);
        let closure = UsageClosure::new(&root);
        let all = closure.compute_all().unwrap();
        assert_eq!(all.len(), 4);
        for method in root.methods() {
            let direct = closure.directly_uses(NodeRef::Member(method.id()));
            assert!(direct.is_subset(&all[&method.id()]));
        }
    }

    #[test]
    fn test_non_method_is_not_found() {
        let root = method_graph(&[("A", &[])]);
        let closure = UsageClosure::new(&root);
        assert!(matches!(
            closure.indirectly_uses(MemberId::new(42)),
            Err(Error::NotFound(_))
        ));
    }

    #[test]
    fn test_impacted_by_follows_callers() {
        let root = method_graph(&[
            ("A", &["B"]),
            ("B", &["C"]),
            ("C", &[]),
            ("D", &["C"]),
            ("E", &[]),
        ]);
        let closure = UsageClosure::new(&root);
        let id = |name: &str| root.find_method(&method_key(name)).unwrap();

        let impacted = closure.impacted_by(NodeRef::Member(id("C")));
        let mut expected = vec![id("A"), id("B"), id("D")];
        expected.sort_unstable();
        assert_eq!(impacted, expected);
        assert!(closure.impacted_by(NodeRef::Member(id("A"))).is_empty());
        assert_eq!(
            closure
                .impacted_by_key(&NodeKey::Method(method_key("E")))
                .unwrap(),
            Vec::<MemberId>::new()
        );
    }
}
