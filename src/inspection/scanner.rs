//! Method body scanning.

use crate::{inspection::MethodBody, metadata::builder::ModelBuilder, Result};

/// The body-scanner collaborator.
///
/// Called with the enclosing method scope open. Implementations emit one usage per
/// referenced node through [`ModelBuilder::use_type`] or [`ModelBuilder::use_node`].
pub trait BodyScanner: Send + Sync {
    /// Emit the usages of `body`.
    ///
    /// # Errors
    /// Propagates builder errors, e.g. [`crate::Error::KindMismatch`] for a reference that
    /// contradicts an already modeled member.
    fn scan(&self, body: &MethodBody, builder: &mut ModelBuilder<'_>) -> Result<()>;
}

/// Forwards every decoded body reference unchanged
#[derive(Debug, Clone, Copy, Default)]
pub struct ReferenceScanner;

impl BodyScanner for ReferenceScanner {
    fn scan(&self, body: &MethodBody, builder: &mut ModelBuilder<'_>) -> Result<()> {
        for reference in &body.references {
            builder.use_node(reference)?;
        }
        Ok(())
    }
}
