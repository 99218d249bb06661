//! Visitation configuration for traversal drivers
//!
//! Controls how much detail a driver extracts from a decoded module. Primary modules are
//! modeled completely, dependency modules only as far as needed to resolve usages.

use std::collections::HashSet;

use crate::metadata::identity::{MemberKey, TypeKey};

/// Configuration for one module traversal
///
/// Allow lists restrict which types and methods are visited at all. A type that is not
/// visited still appears in the model as a placeholder if anything references it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisitationOptions {
    /// Scan method bodies for instruction-level references (primary visitation only)
    pub include_method_bodies: bool,

    /// Only visit these types, if set
    pub type_allow_list: Option<HashSet<TypeKey>>,

    /// Only visit these methods, if set
    pub method_allow_list: Option<HashSet<MemberKey>>,

    /// Populate full member detail and attributes; otherwise signatures only
    pub primary_visitation: bool,

    /// Maximum recursion depth into base/interface definitions and generic arguments (default: 64)
    pub max_depth: usize,
}

impl Default for VisitationOptions {
    fn default() -> Self {
        Self::primary()
    }
}

impl VisitationOptions {
    /// Full detail including method bodies
    #[must_use]
    pub fn primary() -> Self {
        Self {
            include_method_bodies: true,
            type_allow_list: None,
            method_allow_list: None,
            primary_visitation: true,
            max_depth: 64,
        }
    }

    /// Signatures, base types and interfaces only, as used for dependency modules
    #[must_use]
    pub fn secondary() -> Self {
        Self {
            include_method_bodies: false,
            type_allow_list: None,
            method_allow_list: None,
            primary_visitation: false,
            max_depth: 64,
        }
    }

    /// Full member structure and attributes, but no method bodies
    #[must_use]
    pub fn signatures_only() -> Self {
        Self {
            include_method_bodies: false,
            ..Self::primary()
        }
    }

    /// The secondary variant of these options. Allow lists are dropped, the depth limit is kept.
    #[must_use]
    pub fn to_secondary(&self) -> Self {
        Self {
            max_depth: self.max_depth,
            ..Self::secondary()
        }
    }

    /// Restrict visitation to the given types
    #[must_use]
    pub fn with_type_allow_list<I: IntoIterator<Item = TypeKey>>(mut self, types: I) -> Self {
        self.type_allow_list = Some(types.into_iter().collect());
        self
    }

    /// Restrict visitation to the given methods
    #[must_use]
    pub fn with_method_allow_list<I: IntoIterator<Item = MemberKey>>(mut self, methods: I) -> Self {
        self.method_allow_list = Some(methods.into_iter().collect());
        self
    }

    /// Enable or disable body scanning
    #[must_use]
    pub fn with_method_bodies(mut self, include: bool) -> Self {
        self.include_method_bodies = include;
        self
    }

    /// Set the recursion limit
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Returns true if the type passes the type allow list
    #[must_use]
    pub fn should_visit_type(&self, key: &TypeKey) -> bool {
        self.type_allow_list
            .as_ref()
            .map_or(true, |allowed| allowed.contains(key))
    }

    /// Returns true if the method passes the method allow list
    #[must_use]
    pub fn should_visit_method(&self, key: &MemberKey) -> bool {
        self.method_allow_list
            .as_ref()
            .map_or(true, |allowed| allowed.contains(key))
    }

    /// Returns true if method bodies are scanned under these options
    #[must_use]
    pub fn scans_bodies(&self) -> bool {
        self.primary_visitation && self.include_method_bodies
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::identity::AssemblyKey;

    #[test]
    fn test_visitation_presets() {
        let primary = VisitationOptions::primary();
        assert!(primary.primary_visitation);
        assert!(primary.include_method_bodies);
        assert!(primary.scans_bodies());
        assert_eq!(primary.max_depth, 64);

        let secondary = VisitationOptions::secondary();
        assert!(!secondary.primary_visitation);
        assert!(!secondary.scans_bodies());

        let signatures = VisitationOptions::signatures_only();
        assert!(signatures.primary_visitation);
        assert!(!signatures.scans_bodies());

        assert_eq!(VisitationOptions::default(), primary);
    }

    #[test]
    fn test_to_secondary_keeps_depth() {
        let namespace = AssemblyKey::new("App").namespace("N");
        let options = VisitationOptions::primary()
            .with_type_allow_list([namespace.type_key("A")])
            .with_max_depth(8);
        let secondary = options.to_secondary();
        assert_eq!(secondary.max_depth, 8);
        assert!(secondary.type_allow_list.is_none());
        assert!(!secondary.primary_visitation);
    }

    #[test]
    fn test_allow_lists() {
        let namespace = AssemblyKey::new("App").namespace("N");
        let a = namespace.type_key("A");
        let b = namespace.type_key("B");
        let foo = a.method("Foo", vec![]);

        let open = VisitationOptions::primary();
        assert!(open.should_visit_type(&b));
        assert!(open.should_visit_method(&foo));

        let restricted = VisitationOptions::primary()
            .with_type_allow_list([a.clone()])
            .with_method_allow_list(Vec::new());
        assert!(restricted.should_visit_type(&a));
        assert!(!restricted.should_visit_type(&b));
        assert!(!restricted.should_visit_method(&foo));
    }
}
