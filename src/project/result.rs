//! Mapping result types and statistics.
//!
//! This module provides the result of a mapping session, tracking the modules that were
//! modeled and the ones that failed.

use crate::{
    analysis::UsageClosure,
    metadata::{identity::AssemblyKey, model::QueryRoot},
};

/// A module that could not be modeled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleFailure {
    /// Display name of the module source
    pub module: String,
    /// Rendered error
    pub message: String,
}

/// Result of a mapping session.
///
/// Holds the model built from every module that was decoded, together with the keys of
/// the modules modeled completely and the failures of the remaining ones. A module that
/// failed to decode contributes nothing; a module that failed mid-traversal keeps the
/// nodes it already produced and its assembly is flagged incomplete.
///
/// # Usage
///
/// ```rust
/// use dotimpact::{inspection::DecodedModule, metadata::identity::AssemblyKey, project::Mapper};
///
/// let result = Mapper::new()
///     .include(DecodedModule::new(AssemblyKey::new("App")))
///     .map()?;
///
/// if result.is_complete_success() {
///     println!("Modeled {} modules", result.success_count());
/// } else {
///     println!("Modeled {} modules, {} failed", result.success_count(), result.failure_count());
/// }
/// # Ok::<(), dotimpact::Error>(())
/// ```
#[derive(Debug, Default)]
pub struct MappingResult {
    /// The model of all modeled modules
    pub root: QueryRoot,
    /// Modules modeled without error, in mapping order
    pub loaded: Vec<AssemblyKey>,
    /// Modules that failed to decode or to traverse
    pub failures: Vec<ModuleFailure>,
}

impl MappingResult {
    /// Create an empty result
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if every module was modeled without error.
    pub fn is_complete_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// Check if any module failed.
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }

    /// Get the number of modules modeled without error.
    pub fn success_count(&self) -> usize {
        self.loaded.len()
    }

    /// Get the number of failed modules.
    pub fn failure_count(&self) -> usize {
        self.failures.len()
    }

    /// Closure engine over the model
    #[must_use]
    pub fn closure(&self) -> UsageClosure<'_> {
        UsageClosure::new(&self.root)
    }

    pub(crate) fn record_success(&mut self, key: AssemblyKey) {
        self.loaded.push(key);
    }

    pub(crate) fn record_failure(&mut self, module: String, message: String) {
        self.failures.push(ModuleFailure { module, message });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts() {
        let mut result = MappingResult::new();
        assert!(result.is_complete_success());

        result.record_success(AssemblyKey::new("App"));
        let reason = "bad header".to_string();
        result.record_failure("Broken".to_string(), reason);
        assert_eq!(result.success_count(), 1);
        assert_eq!(result.failure_count(), 1);
        assert!(result.has_failures());
        assert_eq!(result.failures[0].module, "Broken");
    }
}
