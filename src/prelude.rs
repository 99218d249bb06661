//! # dotimpact Prelude
//!
//! This module provides a convenient prelude for the most commonly used types and traits
//! from the dotimpact library. Import this module to get quick access to the essential
//! types for building and querying a usage model.

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all dotimpact operations
pub use crate::Error;

/// The result type used throughout dotimpact
pub use crate::Result;

// ================================================================================================
// Main Entry Points
// ================================================================================================

/// Mapping sessions over primary and dependency modules
pub use crate::project::{Mapper, MapperConfig, MappingResult, ModuleFailure};

/// Transitive usage queries
pub use crate::analysis::UsageClosure;

// ================================================================================================
// Identity Keys
// ================================================================================================

/// Composite keys of model nodes
pub use crate::metadata::identity::{
    AssemblyKey, MemberKey, MethodKey, MethodSignature, NamespaceKey, NodeKey, TypeKey,
};

// ================================================================================================
// Graph Model
// ================================================================================================

/// Query root and arena ids
pub use crate::metadata::model::{
    AssemblyId, ExternalType, MemberId, NamespaceId, QueryRoot, SystemType, TypeId,
};

/// Model nodes
pub use crate::metadata::model::{Assembly, Member, MemberKind, Namespace, Type};

/// Usage records
pub use crate::metadata::model::{Node, NodeRef, Usage, UsageKind, UsageSet};

/// Node flags
pub use crate::metadata::model::{MethodFlags, TypeFlags};

/// Builder protocol
pub use crate::metadata::builder::ModelBuilder;

// ================================================================================================
// Inspection
// ================================================================================================

/// Decoded module structures
pub use crate::inspection::{
    DecodedEvent, DecodedField, DecodedMethod, DecodedModule, DecodedProperty, DecodedType,
    MethodBody, ModuleSource, TypeRef,
};

/// Traversal configuration and collaborators
pub use crate::inspection::{BodyScanner, DriverKind, ReferenceScanner, VisitationOptions};
