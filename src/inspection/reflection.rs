//! Reflection-order traversal.

use crate::{
    inspection::{DecodedType, DriverKind, TraversalDriver, Visitor},
    Result,
};

/// Visits member collections first and recurses into the base type and interfaces last.
///
/// This is the order a reflection API hands elements out in: members of the type itself,
/// then its declaration detail, then whatever it derives from.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReflectionDriver;

impl TraversalDriver for ReflectionDriver {
    fn kind(&self) -> DriverKind {
        DriverKind::Reflection
    }

    fn visit_type<'m>(&self, visitor: &mut Visitor<'m, '_, '_>, ty: &'m DecodedType) -> Result<()> {
        if !visitor.begin(ty)? {
            return Ok(());
        }

        visitor.open_type(ty)?;
        visitor.visit_data_members(ty)?;
        visitor.visit_methods(ty)?;
        for nested in &ty.nested_types {
            self.visit_type(visitor, nested)?;
        }
        visitor.visit_attributes(&ty.attributes)?;
        visitor.visit_generic_parameters(ty)?;
        visitor.visit_interfaces(ty)?;
        visitor.visit_base(ty)?;
        visitor.close_type()?;

        // still on the guard, so a supertype deriving back from `ty` is skipped
        let supertypes = visitor.local_supertypes(ty);
        for supertype in supertypes {
            self.visit_type(visitor, supertype)?;
        }

        visitor.complete(ty);
        Ok(())
    }
}
