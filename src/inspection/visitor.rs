//! Visitation state and the element visitors shared by both drivers.
//!
//! A [`Visitor`] carries everything one module traversal needs: the builder, the options,
//! the body scanner, both recursion guards, and an index of the module's own type
//! definitions so drivers can recurse into base types and interfaces declared locally.
//! Drivers only decide the order in which the element visitors below are called.

use std::collections::{HashMap, HashSet};

use tracing::trace;

use crate::{
    inspection::{
        BodyScanner, DecodedEvent, DecodedField, DecodedMethod, DecodedModule, DecodedProperty,
        DecodedType, RecursionGuard, TypeRef, VisitationOptions,
    },
    metadata::{builder::ModelBuilder, identity::TypeKey, model::MethodFlags},
    Result,
};

/// State of one module traversal
pub struct Visitor<'m, 'b, 'r> {
    builder: &'b mut ModelBuilder<'r>,
    options: &'m VisitationOptions,
    scanner: &'m dyn BodyScanner,
    definitions: RecursionGuard<TypeKey>,
    references: RecursionGuard<TypeRef>,
    completed: HashSet<TypeKey>,
    index: HashMap<&'m TypeKey, &'m DecodedType>,
}

impl<'m, 'b, 'r> Visitor<'m, 'b, 'r> {
    pub(crate) fn new(
        module: &'m DecodedModule,
        builder: &'b mut ModelBuilder<'r>,
        options: &'m VisitationOptions,
        scanner: &'m dyn BodyScanner,
    ) -> Self {
        Visitor {
            builder,
            options,
            scanner,
            definitions: RecursionGuard::new(options.max_depth),
            references: RecursionGuard::new(options.max_depth),
            completed: HashSet::new(),
            index: module.all_types().map(|ty| (&ty.key, ty)).collect(),
        }
    }

    /// Options of this traversal
    #[must_use]
    pub fn options(&self) -> &VisitationOptions {
        self.options
    }

    /// The underlying builder
    pub fn builder(&mut self) -> &mut ModelBuilder<'r> {
        &mut *self.builder
    }

    /// Number of type definitions completed so far
    #[must_use]
    pub fn completed_count(&self) -> usize {
        self.completed.len()
    }

    /// Claim `ty` for visitation.
    ///
    /// Returns `Ok(false)` if the type was already completed, is filtered by the type allow
    /// list, or is in progress further up the recursion.
    ///
    /// # Errors
    /// Returns [`crate::Error::RecursionLimit`] past `max_depth` nested definitions.
    pub fn begin(&mut self, ty: &DecodedType) -> Result<bool> {
        if self.completed.contains(&ty.key) || !self.options.should_visit_type(&ty.key) {
            return Ok(false);
        }
        if !self.definitions.enter(&ty.key)? {
            trace!(type_key = %ty.key, "type already in progress, skipping");
            return Ok(false);
        }
        Ok(true)
    }

    /// Release `ty` after its scope was closed
    pub fn complete(&mut self, ty: &DecodedType) {
        self.definitions.leave();
        self.completed.insert(ty.key.clone());
    }

    /// Definitions of the base type and interfaces of `ty` declared in this module
    #[must_use]
    pub fn local_supertypes(&self, ty: &DecodedType) -> Vec<&'m DecodedType> {
        ty.base_type
            .iter()
            .chain(ty.interfaces.iter())
            .filter_map(|reference| self.index.get(&reference.key).copied())
            .collect()
    }

    /// StartNamespace, StartType and SetTypeFlags
    ///
    /// # Errors
    /// Propagates builder protocol errors.
    pub fn open_type(&mut self, ty: &DecodedType) -> Result<()> {
        self.builder.start_namespace(ty.key.namespace())?;
        self.builder
            .start_type(&ty.key, !self.options.primary_visitation)?;
        self.builder.set_type_flags(ty.is_interface, ty.is_abstract)
    }

    /// EndType and EndNamespace
    ///
    /// # Errors
    /// Propagates builder protocol errors.
    pub fn close_type(&mut self) -> Result<()> {
        self.builder.end_type()?;
        self.builder.end_namespace()
    }

    /// Forward a type reference and, recursively, its generic arguments as usages
    ///
    /// # Errors
    /// Propagates builder errors and [`crate::Error::RecursionLimit`].
    pub fn forward(&mut self, reference: &TypeRef) -> Result<()> {
        self.builder.use_type(&reference.key)?;
        if reference.generic_arguments.is_empty() {
            return Ok(());
        }
        if !self.references.enter(reference)? {
            trace!(type_key = %reference.key, "generic reference already in progress, skipping");
            return Ok(());
        }
        let result = reference
            .generic_arguments
            .iter()
            .try_for_each(|argument| self.forward(argument));
        self.references.leave();
        result
    }

    /// Record attribute applications on the innermost scope (primary visitation only)
    ///
    /// # Errors
    /// Propagates builder protocol errors.
    pub fn visit_attributes(&mut self, attributes: &[TypeKey]) -> Result<()> {
        if !self.options.primary_visitation {
            return Ok(());
        }
        for attribute in attributes {
            self.builder.has_attribute(attribute)?;
            self.builder.use_type(attribute)?;
        }
        Ok(())
    }

    /// Forward generic parameters and their constraints
    ///
    /// # Errors
    /// Propagates builder errors.
    pub fn visit_generic_parameters(&mut self, ty: &DecodedType) -> Result<()> {
        for parameter in &ty.generic_parameters {
            self.builder.use_type(&parameter.key)?;
            for constraint in &parameter.constraints {
                self.forward(constraint)?;
            }
        }
        Ok(())
    }

    /// ImplementsInterface for every interface, forwarded as usages
    ///
    /// # Errors
    /// Propagates builder errors.
    pub fn visit_interfaces(&mut self, ty: &DecodedType) -> Result<()> {
        for interface in &ty.interfaces {
            self.builder.implements_interface(&interface.key)?;
            self.forward(interface)?;
        }
        Ok(())
    }

    /// SetBaseType, forwarded as a usage
    ///
    /// # Errors
    /// Propagates builder errors.
    pub fn visit_base(&mut self, ty: &DecodedType) -> Result<()> {
        if let Some(base) = &ty.base_type {
            self.builder.set_base_type(&base.key)?;
            self.forward(base)?;
        }
        Ok(())
    }

    /// Fields, properties and events (primary visitation only)
    ///
    /// # Errors
    /// Propagates builder errors.
    pub fn visit_data_members(&mut self, ty: &DecodedType) -> Result<()> {
        if !self.options.primary_visitation {
            return Ok(());
        }
        for property in &ty.properties {
            self.visit_property(property)?;
        }
        for field in &ty.fields {
            self.visit_field(field)?;
        }
        for event in &ty.events {
            self.visit_event(event)?;
        }
        Ok(())
    }

    /// Constructors, then methods
    ///
    /// # Errors
    /// Propagates builder errors.
    pub fn visit_methods(&mut self, ty: &DecodedType) -> Result<()> {
        for constructor in &ty.constructors {
            self.visit_method(constructor, true)?;
        }
        for method in &ty.methods {
            self.visit_method(method, false)?;
        }
        Ok(())
    }

    fn visit_field(&mut self, field: &DecodedField) -> Result<()> {
        self.builder.start_field(&field.key)?;
        self.builder.set_field_type(&field.field_type.key)?;
        self.forward(&field.field_type)?;
        self.visit_attributes(&field.attributes)?;
        self.builder.end_field()
    }

    fn visit_property(&mut self, property: &DecodedProperty) -> Result<()> {
        self.builder.start_property(&property.key)?;
        self.builder.set_property_type(&property.property_type.key)?;
        self.forward(&property.property_type)?;
        self.visit_attributes(&property.attributes)?;
        if let Some(getter) = &property.getter {
            if self.visit_method(getter, false)? {
                self.builder
                    .set_property_getter(&property.key, &getter.key)?;
            }
        }
        if let Some(setter) = &property.setter {
            if self.visit_method(setter, false)? {
                self.builder
                    .set_property_setter(&property.key, &setter.key)?;
            }
        }
        self.builder.end_property()
    }

    fn visit_event(&mut self, event: &DecodedEvent) -> Result<()> {
        self.builder.start_event(&event.key)?;
        self.builder.set_event_type(&event.event_type.key)?;
        self.forward(&event.event_type)?;
        self.visit_attributes(&event.attributes)?;
        if let Some(adder) = &event.adder {
            if self.visit_method(adder, false)? {
                self.builder.set_event_adder(&event.key, &adder.key)?;
            }
        }
        if let Some(remover) = &event.remover {
            if self.visit_method(remover, false)? {
                self.builder.set_event_remover(&event.key, &remover.key)?;
            }
        }
        self.builder.end_event()
    }

    /// Returns false if the method allow list filtered the method out
    fn visit_method(&mut self, method: &DecodedMethod, constructor: bool) -> Result<bool> {
        if !self.options.should_visit_method(&method.key) {
            return Ok(false);
        }
        let scan_body = self.options.scans_bodies();
        self.builder.start_method(&method.key, !scan_body)?;

        let parameters: Vec<TypeKey> = method
            .parameters
            .iter()
            .map(|parameter| parameter.key.clone())
            .collect();
        self.builder.set_method_prototype(
            method.return_type.as_ref().map(|reference| &reference.key),
            &parameters,
        )?;
        let mut flags = method.flags;
        if constructor {
            flags |= MethodFlags::CONSTRUCTOR;
        }
        self.builder.set_method_flags(flags)?;

        if let Some(return_type) = &method.return_type {
            self.forward(return_type)?;
        }
        for parameter in &method.parameters {
            self.forward(parameter)?;
        }
        self.visit_attributes(&method.attributes)?;

        if scan_body {
            if let Some(body) = &method.body {
                let scanner = self.scanner;
                scanner.scan(body, &mut *self.builder)?;
            }
        }
        self.builder.end_method()?;
        Ok(true)
    }
}
