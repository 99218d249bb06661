//! Declaration-order traversal.

use crate::{
    inspection::{DecodedType, DriverKind, TraversalDriver, Visitor},
    Result,
};

/// Resolves base type and interfaces first, then visits members in declaration order.
///
/// Supertypes declared in the same module are completed before the type that derives from
/// them is opened, so a derived type always finds its base fully modeled.
#[derive(Debug, Clone, Copy, Default)]
pub struct TopDownDriver;

impl TraversalDriver for TopDownDriver {
    fn kind(&self) -> DriverKind {
        DriverKind::TopDown
    }

    fn visit_type<'m>(&self, visitor: &mut Visitor<'m, '_, '_>, ty: &'m DecodedType) -> Result<()> {
        if !visitor.begin(ty)? {
            return Ok(());
        }
        for supertype in visitor.local_supertypes(ty) {
            self.visit_type(visitor, supertype)?;
        }

        visitor.open_type(ty)?;
        visitor.visit_interfaces(ty)?;
        visitor.visit_generic_parameters(ty)?;
        visitor.visit_attributes(&ty.attributes)?;
        visitor.visit_base(ty)?;
        visitor.visit_data_members(ty)?;
        visitor.visit_methods(ty)?;
        for nested in &ty.nested_types {
            self.visit_type(visitor, nested)?;
        }
        visitor.close_type()?;

        visitor.complete(ty);
        Ok(())
    }
}
