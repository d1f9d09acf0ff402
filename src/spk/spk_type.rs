use std::{convert::TryFrom, fmt};

use crate::ephem_errors::EphemError;

/// SPK segment data types as numbered by NAIF.
///
/// Only the two uniform Chebyshev types can be evaluated by this crate; the
/// others are recognised so kernels mixing types can still be listed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum SpkDataType {
    ModifiedDifferenceArray = 1,
    ChebyshevPositionOnly = 2,
    ChebyshevPositionVelocity = 3,
    Reserved4 = 4,
    TwoBodyDiscreteStates = 5,
    Reserved6 = 6,
    Reserved7 = 7,
    EquallySpacedLagrange = 8,
    UnequallySpacedLagrange = 9,
    TwoLineElements = 10,
    Reserved11 = 11,
    HermiteUniform = 12,
    HermiteNonUniform = 13,
    ChebyshevNonUniform = 14,
    PrecessingConic = 15,
    Reserved16 = 16,
    EquinoctialElements = 17,
    ESAHermiteLagrange = 18,
    ESAPiecewiseInterpolation = 19,
    ChebyshevVelocityOnly = 20,
    ExtendedModifiedDifferenceArray = 21,
}

const ALL_TYPES: [SpkDataType; 21] = {
    use SpkDataType::*;
    [
        ModifiedDifferenceArray,
        ChebyshevPositionOnly,
        ChebyshevPositionVelocity,
        Reserved4,
        TwoBodyDiscreteStates,
        Reserved6,
        Reserved7,
        EquallySpacedLagrange,
        UnequallySpacedLagrange,
        TwoLineElements,
        Reserved11,
        HermiteUniform,
        HermiteNonUniform,
        ChebyshevNonUniform,
        PrecessingConic,
        Reserved16,
        EquinoctialElements,
        ESAHermiteLagrange,
        ESAPiecewiseInterpolation,
        ChebyshevVelocityOnly,
        ExtendedModifiedDifferenceArray,
    ]
};

impl SpkDataType {
    pub fn to_i32(self) -> i32 {
        self as i32
    }

    /// Number of Chebyshev components stored per record, for the evaluable types.
    ///
    /// Type 2 stores the three position components; type 3 adds three velocity
    /// components.
    pub fn component_count(self) -> Option<usize> {
        match self {
            SpkDataType::ChebyshevPositionOnly => Some(3),
            SpkDataType::ChebyshevPositionVelocity => Some(6),
            _ => None,
        }
    }

    pub fn is_supported(self) -> bool {
        self.component_count().is_some()
    }
}

impl From<SpkDataType> for i32 {
    fn from(data_type: SpkDataType) -> Self {
        data_type.to_i32()
    }
}

impl TryFrom<i32> for SpkDataType {
    type Error = EphemError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        ALL_TYPES
            .iter()
            .copied()
            .find(|t| t.to_i32() == value)
            .ok_or(EphemError::InvalidSpkDataType(value))
    }
}

impl fmt::Display for SpkDataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use SpkDataType::*;
        let s = match self {
            ModifiedDifferenceArray => "Modified Difference Array",
            ChebyshevPositionOnly => "Chebyshev Position Only",
            ChebyshevPositionVelocity => "Chebyshev Position Velocity",
            Reserved4 | Reserved6 | Reserved7 | Reserved11 | Reserved16 => "Reserved",
            TwoBodyDiscreteStates => "Two Body Discrete States",
            EquallySpacedLagrange => "Equally Spaced Lagrange",
            UnequallySpacedLagrange => "Unequally Spaced Lagrange",
            TwoLineElements => "Two Line Elements",
            HermiteUniform => "Hermite Uniform",
            HermiteNonUniform => "Hermite Non Uniform",
            ChebyshevNonUniform => "Chebyshev Non Uniform",
            PrecessingConic => "Precessing Conic",
            EquinoctialElements => "Equinoctial Elements",
            ESAHermiteLagrange => "ESA Hermite Lagrange",
            ESAPiecewiseInterpolation => "ESA Piecewise Interpolation",
            ChebyshevVelocityOnly => "Chebyshev Velocity Only",
            ExtendedModifiedDifferenceArray => "Extended Modified Difference Array",
        };
        write!(f, "{s}")
    }
}

#[cfg(test)]
mod test_spk_type {
    use super::*;

    #[test]
    fn test_round_trip_all_codes() {
        for code in 1..=21 {
            let data_type = SpkDataType::try_from(code).unwrap();
            assert_eq!(i32::from(data_type), code);
        }
        assert_eq!(
            SpkDataType::try_from(22),
            Err(EphemError::InvalidSpkDataType(22))
        );
        assert_eq!(
            SpkDataType::try_from(0),
            Err(EphemError::InvalidSpkDataType(0))
        );
    }

    #[test]
    fn test_component_count() {
        assert_eq!(SpkDataType::ChebyshevPositionOnly.component_count(), Some(3));
        assert_eq!(
            SpkDataType::ChebyshevPositionVelocity.component_count(),
            Some(6)
        );
        assert!(!SpkDataType::HermiteUniform.is_supported());
    }

    #[test]
    fn test_display() {
        assert_eq!(
            SpkDataType::ChebyshevPositionOnly.to_string(),
            "Chebyshev Position Only"
        );
        assert_eq!(SpkDataType::Reserved16.to_string(), "Reserved");
    }
}
