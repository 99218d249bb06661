//! Traversal of decoded modules into builder protocol events.
//!
//! This module sits between the decoder collaborator and the [`crate::metadata::builder`].
//! A [`ModuleSource`] produces a [`DecodedModule`]; a [`TraversalDriver`] walks it and
//! emits Start/End and mutator events on a [`ModelBuilder`], under the policy described by
//! [`VisitationOptions`].
//!
//! # Key Components
//!
//! - [`DecodedModule`], [`DecodedType`], [`DecodedMethod`] and friends - Decoder output
//! - [`TopDownDriver`] - Supertypes first, then members in declaration order
//! - [`ReflectionDriver`] - Members first, supertypes last
//! - [`VisitationOptions`] - Primary/secondary visitation, allow lists, body scanning
//! - [`BodyScanner`] - Turns method bodies into usages
//! - [`RecursionGuard`] - Skips re-entered definitions and bounds nesting depth
//!
//! Both drivers emit the same set of events for a module, in a different order. Because the
//! builder attaches usages by scope and find-or-create is idempotent, the resulting models
//! are identical.
//!
//! # Examples
//!
//! ```rust
//! use dotimpact::{
//!     inspection::{
//!         DecodedMethod, DecodedModule, DecodedType, DriverKind, ReferenceScanner,
//!         VisitationOptions,
//!     },
//!     metadata::{
//!         builder::ModelBuilder,
//!         identity::{AssemblyKey, NodeKey},
//!         model::QueryRoot,
//!     },
//! };
//!
//! let app = AssemblyKey::new("App");
//! let n = app.namespace("N");
//! let bar = n.type_key("B").method("Bar", vec![]);
//! let foo = DecodedMethod::new(n.type_key("A").method("Foo", vec![]))
//!     .with_body([NodeKey::Method(bar)]);
//! let module = DecodedModule::new(app)
//!     .with_type(DecodedType::new(n.type_key("A")).with_method(foo));
//!
//! let mut root = QueryRoot::new();
//! let mut builder = ModelBuilder::new(&mut root);
//! let options = VisitationOptions::primary();
//! DriverKind::TopDown.visit_module(&module, &mut builder, &options, &ReferenceScanner)?;
//! builder.finish()?;
//! assert_eq!(root.type_count(), 2);
//! # Ok::<(), dotimpact::Error>(())
//! ```

mod decoded;
mod guard;
mod options;
mod reflection;
mod scanner;
mod topdown;
mod visitor;

pub use decoded::{
    DecodedEvent, DecodedField, DecodedMethod, DecodedModule, DecodedProperty, DecodedType,
    GenericParameter, MethodBody, ModuleSource, TypeRef,
};
pub use guard::RecursionGuard;
pub use options::VisitationOptions;
pub use reflection::ReflectionDriver;
pub use scanner::{BodyScanner, ReferenceScanner};
pub use topdown::TopDownDriver;
pub use visitor::Visitor;

use strum::{Display, EnumIter};
use tracing::debug;

use crate::{metadata::builder::ModelBuilder, Result};

/// Available traversal strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumIter)]
pub enum DriverKind {
    /// [`ReflectionDriver`]
    Reflection,
    /// [`TopDownDriver`]
    #[default]
    TopDown,
}

impl DriverKind {
    /// Visit `module` with the driver of this kind.
    ///
    /// # Errors
    /// See [`TraversalDriver::visit_module`].
    pub fn visit_module(
        self,
        module: &DecodedModule,
        builder: &mut ModelBuilder<'_>,
        options: &VisitationOptions,
        scanner: &dyn BodyScanner,
    ) -> Result<()> {
        let driver: &dyn TraversalDriver = match self {
            DriverKind::Reflection => &ReflectionDriver,
            DriverKind::TopDown => &TopDownDriver,
        };
        driver.visit_module(module, builder, options, scanner)
    }
}

/// A traversal strategy over a decoded module.
pub trait TraversalDriver {
    /// Which strategy this is
    fn kind(&self) -> DriverKind;

    /// Visit one type definition, its members and its nested types.
    ///
    /// Implementations call [`Visitor::begin`] first and [`Visitor::complete`] last.
    ///
    /// # Errors
    /// Propagates builder errors and [`crate::Error::RecursionLimit`].
    fn visit_type<'m>(&self, visitor: &mut Visitor<'m, '_, '_>, ty: &'m DecodedType) -> Result<()>;

    /// Visit a whole module inside one assembly scope.
    ///
    /// The assembly is opened as a dependency unless `options` request primary visitation.
    ///
    /// # Errors
    /// Propagates builder errors and [`crate::Error::RecursionLimit`]. The builder is left
    /// with open scopes when an error is returned.
    fn visit_module(
        &self,
        module: &DecodedModule,
        builder: &mut ModelBuilder<'_>,
        options: &VisitationOptions,
        scanner: &dyn BodyScanner,
    ) -> Result<()> {
        debug!(
            module = %module.key,
            driver = %self.kind(),
            primary = options.primary_visitation,
            types = module.types.len(),
            "visiting module"
        );
        builder
            .start_assembly(&module.key, !options.primary_visitation)?;
        let mut visitor = Visitor::new(module, builder, options, scanner);
        for ty in &module.types {
            self.visit_type(&mut visitor, ty)?;
        }
        visitor.builder().end_assembly()
    }
}
