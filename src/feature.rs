use std::fmt::{self, Display};

/// A named debug/trace feature: one bit of the logger's 32-bit debug and
/// trace masks.
///
/// Features are usually declared once as constants:
///
/// ```
/// use slog_sinks::Feature;
///
/// const CSV: Feature = Feature::new("CSV", 0);
/// const SQL: Feature = Feature::new("SQL", 7);
///
/// assert_eq!(CSV.mask() | SQL.mask(), 0b1000_0001);
/// ```
///
/// The name is what debug records carry as their label, e.g. `[SQL]`.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Feature {
    name: &'static str,
    bit: u32,
}

impl Feature {
    /// Creates a feature on bit position `bit`. Positions wrap modulo 32.
    pub const fn new(name: &'static str, bit: u32) -> Feature {
        Feature { name, bit: bit % 32 }
    }

    /// The feature's name.
    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The feature's bit position, `0..=31`.
    #[inline]
    pub fn bit(&self) -> u32 {
        self.bit
    }

    /// The single-bit mask selecting this feature.
    #[inline]
    pub const fn mask(&self) -> u32 {
        1 << self.bit
    }
}

impl Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Combines several features into one mask.
pub fn mask_of(features: &[Feature]) -> u32 {
    features.iter().fold(0, |mask, feature| mask | feature.mask())
}

#[test]
fn test_feature_mask() {
    const A: Feature = Feature::new("A", 3);
    const B: Feature = Feature::new("B", 35);

    assert_eq!(A.mask(), 8);
    assert_eq!(B.bit(), 3);
    assert_eq!(mask_of(&[A, Feature::new("C", 31)]), 0x8000_0008);
    assert_eq!(mask_of(&[]), 0);
    assert_eq!(A.to_string(), "A");
}
