//! Arena identifiers for model nodes.
//!
//! Every node lives in an arena owned by the [`crate::metadata::model::QueryRoot`] and is
//! addressed by one of the index newtypes below. Ids are handed out sequentially by the
//! root and stay valid for its whole lifetime; usage edges store ids, never owning links.

use std::fmt;

macro_rules! define_id {
    ($name:ident, $prefix:literal, $doc:literal) => {
        #[doc = $doc]
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(pub(crate) usize);

        impl $name {
            /// Creates a new id from a raw arena index.
            #[must_use]
            #[inline]
            pub(crate) const fn new(index: usize) -> Self {
                $name(index)
            }

            /// Returns the raw arena index of this id.
            #[must_use]
            #[inline]
            pub const fn index(self) -> usize {
                self.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "{}"), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "{}"), self.0)
            }
        }
    };
}

define_id!(
    AssemblyId,
    "asm",
    "Identifier of an [`crate::metadata::model::Assembly`] node."
);
define_id!(
    NamespaceId,
    "ns",
    "Identifier of a [`crate::metadata::model::Namespace`] node."
);
define_id!(
    TypeId,
    "ty",
    "Identifier of a [`crate::metadata::model::Type`] node."
);
define_id!(
    MemberId,
    "m",
    "Identifier of a [`crate::metadata::model::Member`] node."
);
