//! The conversion graph
//!
//! Every directed pair of kinds has one [`Rule`]. [`ConversionEdge`] drives the
//! conversion engine and [`TypeCompatibility`] is what callers linking two
//! variables see; both come from the same table.

use crate::kind::ValueKind;

/// How a value of one kind reaches another
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ConversionEdge {
    /// Same kind; the value is returned unchanged
    Identity,
    /// Lossless and total, applied without caller opt-in
    Implicit,
    /// May lose information or fail; requires `AllowExplicit`
    Explicit,
    /// No conversion exists
    Unsupported,
}

impl ConversionEdge {
    /// Edge from `from` to `to`
    pub const fn between(from: ValueKind, to: ValueKind) -> Self {
        rule(from, to).edge
    }

    pub const fn is_allowed(self) -> bool {
        !matches!(self, Self::Unsupported)
    }
}

/// Whether a link between two variables is permitted and what it risks
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct TypeCompatibility {
    /// A conversion exists
    pub allowed: bool,
    /// The conversion can lose information
    pub possible_loss: bool,
    /// The conversion can fail for some inputs
    pub might_fail: bool,
}

impl TypeCompatibility {
    pub const INCOMPATIBLE: Self = Self {
        allowed: false,
        possible_loss: false,
        might_fail: false,
    };

    const fn new(allowed: bool, possible_loss: bool, might_fail: bool) -> Self {
        Self {
            allowed,
            possible_loss,
            might_fail,
        }
    }
}

/// Compatibility of linking a `source` variable to a `target` variable
pub const fn linking_rules(source: ValueKind, target: ValueKind) -> TypeCompatibility {
    rule(source, target).compatibility
}

#[derive(Copy, Clone)]
struct Rule {
    edge: ConversionEdge,
    compatibility: TypeCompatibility,
}

impl Rule {
    const IDENTITY: Self = Self {
        edge: ConversionEdge::Identity,
        compatibility: TypeCompatibility::new(true, false, false),
    };

    const UNSUPPORTED: Self = Self {
        edge: ConversionEdge::Unsupported,
        compatibility: TypeCompatibility::INCOMPATIBLE,
    };

    const fn implicit(possible_loss: bool) -> Self {
        Self {
            edge: ConversionEdge::Implicit,
            compatibility: TypeCompatibility::new(true, possible_loss, false),
        }
    }

    const fn explicit(possible_loss: bool, might_fail: bool) -> Self {
        Self {
            edge: ConversionEdge::Explicit,
            compatibility: TypeCompatibility::new(true, possible_loss, might_fail),
        }
    }
}

const fn rule(from: ValueKind, to: ValueKind) -> Rule {
    use ValueKind::{Boolean, Integer, Real, String};

    if from as u8 == to as u8 {
        return Rule::IDENTITY;
    }
    if from.is_array() != to.is_array() {
        return Rule::UNSUPPORTED;
    }

    match (from.element_kind(), to.element_kind()) {
        (Boolean, Integer | Real | String) => Rule::implicit(false),
        // Integer -> Real rounds beyond 2^53; accepted by convention
        (Integer, Boolean | Real) => Rule::implicit(true),
        (Integer, String) => Rule::implicit(false),
        // Total, but collapses every non-zero real to `true`
        (Real, Boolean) => Rule::explicit(true, false),
        (Real, String) => Rule::implicit(false),
        (Real, Integer) => Rule::explicit(true, true),
        (String, Boolean | Integer | Real) => Rule::explicit(false, true),
        _ => Rule::UNSUPPORTED,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_for_every_kind() {
        for kind in ValueKind::ALL {
            assert_eq!(ConversionEdge::between(kind, kind), ConversionEdge::Identity);
            let compat = linking_rules(kind, kind);
            assert!(compat.allowed && !compat.possible_loss && !compat.might_fail);
        }
    }

    #[test]
    fn test_scalar_edges() {
        use ValueKind::*;
        assert_eq!(ConversionEdge::between(Boolean, Integer), ConversionEdge::Implicit);
        assert_eq!(ConversionEdge::between(Integer, Boolean), ConversionEdge::Implicit);
        assert_eq!(ConversionEdge::between(Integer, Real), ConversionEdge::Implicit);
        assert_eq!(ConversionEdge::between(Real, Integer), ConversionEdge::Explicit);
        assert_eq!(ConversionEdge::between(Real, Boolean), ConversionEdge::Explicit);
        assert_eq!(ConversionEdge::between(String, Real), ConversionEdge::Explicit);
        assert_eq!(ConversionEdge::between(Real, String), ConversionEdge::Implicit);
        assert_eq!(ConversionEdge::between(File, String), ConversionEdge::Unsupported);
        assert_eq!(ConversionEdge::between(String, File), ConversionEdge::Unsupported);
    }

    #[test]
    fn test_arrays_follow_elements_and_never_mix_with_scalars() {
        use ValueKind::*;
        assert_eq!(
            ConversionEdge::between(IntegerArray, RealArray),
            ConversionEdge::Implicit
        );
        assert_eq!(
            ConversionEdge::between(RealArray, IntegerArray),
            ConversionEdge::Explicit
        );
        assert_eq!(ConversionEdge::between(Integer, IntegerArray), ConversionEdge::Unsupported);
        assert_eq!(ConversionEdge::between(RealArray, Real), ConversionEdge::Unsupported);
        assert_eq!(linking_rules(RealArray, Real), TypeCompatibility::INCOMPATIBLE);
    }

    #[test]
    fn test_compatibility_flags() {
        use ValueKind::*;
        assert_eq!(linking_rules(Real, Integer), TypeCompatibility::new(true, true, true));
        assert_eq!(linking_rules(String, Integer), TypeCompatibility::new(true, false, true));
        assert_eq!(linking_rules(Boolean, String), TypeCompatibility::new(true, false, false));
        assert_eq!(linking_rules(Integer, Real), TypeCompatibility::new(true, true, false));
        assert_eq!(linking_rules(Real, Boolean), TypeCompatibility::new(true, true, false));
        assert_eq!(
            linking_rules(RealArray, BooleanArray),
            TypeCompatibility::new(true, true, false)
        );
    }

    #[test]
    fn test_edges_and_compatibility_agree() {
        for from in ValueKind::ALL {
            for to in ValueKind::ALL {
                let edge = ConversionEdge::between(from, to);
                let compat = linking_rules(from, to);
                assert_eq!(edge.is_allowed(), compat.allowed);
                match edge {
                    ConversionEdge::Implicit => assert!(!compat.might_fail, "{from} -> {to}"),
                    ConversionEdge::Explicit => {
                        assert!(compat.possible_loss || compat.might_fail, "{from} -> {to}");
                    }
                    _ => {}
                }
            }
        }
    }
}
