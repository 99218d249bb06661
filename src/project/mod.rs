//! Multi-module mapping sessions.
//!
//! This module provides the [`Mapper`], which decodes a set of modules, drives a traversal
//! over each of them into one shared [`crate::metadata::model::QueryRoot`], and isolates
//! failures per module.
//!
//! # Architecture
//!
//! - **Primary modules** are visited with the configured [`VisitationOptions`]
//! - **Dependency modules** are visited with the secondary variant of those options, so
//!   they only contribute signatures, base types and interfaces
//! - Each module gets a fresh [`ModelBuilder`]; an error leaves the other modules intact
//!
//! Modules are mapped one after another on the calling thread. Cross-module usages resolve
//! through the shared root by key, so a usage may name a type of a module mapped later;
//! it stays a placeholder until that module is visited.
//!
//! # Usage Examples
//!
//! ```rust
//! use dotimpact::{
//!     inspection::{DecodedMethod, DecodedModule, DecodedType},
//!     metadata::{
//!         identity::{AssemblyKey, NodeKey},
//!         model::NodeRef,
//!     },
//!     project::Mapper,
//! };
//!
//! let app = AssemblyKey::new("App");
//! let lib = AssemblyKey::new("Lib");
//! let helper = lib.namespace("L").type_key("Helper").method("Run", vec![]);
//! let main = app.namespace("N").type_key("Program");
//!
//! let caller = DecodedMethod::new(main.method("Main", vec![]))
//!     .with_body([NodeKey::Method(helper.clone())]);
//! let callee = DecodedMethod::new(helper.clone());
//!
//! let result = Mapper::new()
//!     .include(DecodedModule::new(app).with_type(DecodedType::new(main).with_method(caller)))
//!     .include_dependency(
//!         DecodedModule::new(lib)
//!             .with_type(DecodedType::new(helper.declaring_type().clone()).with_method(callee)),
//!     )
//!     .map()?;
//!
//! assert!(result.is_complete_success());
//! let run = result.root.find_method(&helper).unwrap();
//! let impacted = result.closure().impacted_by(NodeRef::Member(run));
//! assert_eq!(impacted.len(), 1);
//! # Ok::<(), dotimpact::Error>(())
//! ```

mod result;

pub use result::{MappingResult, ModuleFailure};

use tracing::{debug, warn};

use crate::{
    inspection::{BodyScanner, DriverKind, ModuleSource, ReferenceScanner, VisitationOptions},
    metadata::{builder::ModelBuilder, identity::AssemblyKey, model::QueryRoot},
    Result,
};

/// Configuration of a mapping session
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MapperConfig {
    /// Traversal strategy
    pub driver: DriverKind,
    /// Options for primary modules; dependency modules use [`VisitationOptions::to_secondary`]
    pub options: VisitationOptions,
    /// Abort on the first failing module instead of recording it
    pub strict: bool,
}

impl MapperConfig {
    /// Select the traversal strategy
    #[must_use]
    pub fn with_driver(mut self, driver: DriverKind) -> Self {
        self.driver = driver;
        self
    }

    /// Set the options for primary modules
    #[must_use]
    pub fn with_options(mut self, options: VisitationOptions) -> Self {
        self.options = options;
        self
    }

    /// Enable or disable strict mode
    #[must_use]
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }
}

/// Builder for a mapping session over primary and dependency modules.
pub struct Mapper {
    config: MapperConfig,
    scanner: Box<dyn BodyScanner>,
    primary: Vec<Box<dyn ModuleSource>>,
    dependencies: Vec<Box<dyn ModuleSource>>,
}

impl Mapper {
    /// Create a mapper with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(MapperConfig::default())
    }

    /// Create a mapper with the given configuration.
    #[must_use]
    pub fn with_config(config: MapperConfig) -> Self {
        Mapper {
            config,
            scanner: Box::new(ReferenceScanner),
            primary: Vec::new(),
            dependencies: Vec::new(),
        }
    }

    /// Replace the body scanner.
    #[must_use]
    pub fn with_scanner<S: BodyScanner + 'static>(mut self, scanner: S) -> Self {
        self.scanner = Box::new(scanner);
        self
    }

    /// Add a module. It is modeled in full unless [`ModuleSource::is_dependency`] says otherwise.
    #[must_use]
    pub fn include<M: ModuleSource + 'static>(mut self, module: M) -> Self {
        if module.is_dependency() {
            self.dependencies.push(Box::new(module));
        } else {
            self.primary.push(Box::new(module));
        }
        self
    }

    /// Add a referenced module, modeled signatures-only, whatever the source reports.
    #[must_use]
    pub fn include_dependency<M: ModuleSource + 'static>(mut self, module: M) -> Self {
        self.dependencies.push(Box::new(module));
        self
    }

    /// The session configuration
    #[must_use]
    pub fn config(&self) -> &MapperConfig {
        &self.config
    }

    /// Number of included modules
    #[must_use]
    pub fn module_count(&self) -> usize {
        self.primary.len() + self.dependencies.len()
    }

    /// Decode and model every included module, primary modules first.
    ///
    /// # Errors
    /// Only in strict mode: the error of the first failing module. Otherwise failures are
    /// recorded in [`MappingResult::failures`].
    pub fn map(self) -> Result<MappingResult> {
        let mut result = MappingResult::new();
        let secondary = self.config.options.to_secondary();
        let modules = self
            .primary
            .iter()
            .map(|source| (source, &self.config.options))
            .chain(self.dependencies.iter().map(|source| (source, &secondary)));

        for (source, options) in modules {
            match self.map_module(&mut result.root, source.as_ref(), options) {
                Ok(key) => result.record_success(key),
                Err(error) => {
                    if self.config.strict {
                        return Err(error);
                    }
                    result.record_failure(source.name(), error.to_string());
                }
            }
        }

        debug!(
            loaded = result.success_count(),
            failed = result.failure_count(),
            types = result.root.type_count(),
            members = result.root.member_count(),
            "mapping finished"
        );
        Ok(result)
    }

    fn map_module(
        &self,
        root: &mut QueryRoot,
        source: &dyn ModuleSource,
        options: &VisitationOptions,
    ) -> Result<AssemblyKey> {
        let module = source.decode().map_err(|error| {
            warn!(module = %source.name(), %error, "module failed to decode");
            error
        })?;

        let outcome = {
            let mut builder = ModelBuilder::new(root);
            self.config
                .driver
                .visit_module(&module, &mut builder, options, self.scanner.as_ref())
                .and_then(|()| builder.finish())
        };
        if let Err(error) = outcome {
            warn!(module = %module.key, %error, "module traversal aborted");
            root.mark_incomplete(&module.key, error.to_string());
            return Err(error);
        }
        Ok(module.key)
    }
}

impl Default for Mapper {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        inspection::{DecodedField, DecodedMethod, DecodedModule, DecodedType},
        metadata::identity::NodeKey,
        test::{app_namespace, scenario_module, system_type},
        Error,
    };

    struct Unreadable;

    impl ModuleSource for Unreadable {
        fn name(&self) -> String {
            "Unreadable".to_string()
        }

        fn decode(&self) -> Result<DecodedModule> {
            Err(Error::Decode {
                module: self.name(),
                message: "truncated metadata header".to_string(),
            })
        }
    }

    #[test]
    fn test_decode_failure_is_isolated() {
        let result = Mapper::new()
            .include(Unreadable)
            .include(scenario_module())
            .map()
            .unwrap();

        assert_eq!(result.success_count(), 1);
        assert_eq!(result.failure_count(), 1);
        assert_eq!(result.failures[0].module, "Unreadable");
        assert_eq!(result.root.type_count(), 2);
        assert_eq!(result.root.assembly_count(), 1);
    }

    #[test]
    fn test_strict_mode_aborts() {
        let result = Mapper::with_config(MapperConfig::default().with_strict(true))
            .include(Unreadable)
            .include(scenario_module())
            .map();
        assert!(matches!(result, Err(Error::Decode { .. })));
    }

    #[test]
    fn test_traversal_failure_flags_assembly() {
        let namespace = app_namespace();
        let a = namespace.type_key("A");
        let value = a.member("Value");
        // the body names the field as a property
        let mut ty = DecodedType::new(a.clone()).with_method(
            DecodedMethod::new(a.method("Foo", vec![]))
                .with_body([NodeKey::Property(value.clone())]),
        );
        ty.fields.push(DecodedField {
            key: value,
            field_type: system_type("Int32").into(),
            attributes: Vec::new(),
        });
        let broken = DecodedModule::new(namespace.assembly().clone())
            .with_type(ty);

        let result = Mapper::new().include(broken).map().unwrap();
        assert_eq!(result.failure_count(), 1);
        assert!(result.failures[0].message.contains("Property"));
        let assembly = result.root.find_assembly(namespace.assembly()).unwrap();
        assert!(assembly.is_incomplete());
    }

    #[test]
    fn test_dependencies_use_secondary_options() {
        let explicit = Mapper::new().include_dependency(scenario_module());
        let reported = Mapper::new().include(scenario_module().as_dependency());

        for mapper in [explicit, reported] {
            let result = mapper.map().unwrap();
            let foo = result
                .root
                .find_method(&app_namespace().type_key("A").method("Foo", vec![]))
                .unwrap();
            assert!(result.root.get_member(foo).usages().is_empty());
            assert!(result
                .root
                .find_assembly(&AssemblyKey::new("App"))
                .unwrap()
                .is_dependency());
        }
    }
}
