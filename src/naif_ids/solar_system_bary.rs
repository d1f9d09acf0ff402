use std::fmt;

use crate::ephem_errors::EphemError;

/// The two bodies at the root of every SPK chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum SolarSystemBary {
    SSB = 0,
    Sun = 10,
}

impl SolarSystemBary {
    pub const ALL: [SolarSystemBary; 2] = [SolarSystemBary::SSB, SolarSystemBary::Sun];

    pub fn from_id(id: i32) -> Result<Self, EphemError> {
        Self::ALL
            .into_iter()
            .find(|b| b.to_id() == id)
            .ok_or_else(|| EphemError::UnknownTarget(format!("NAIF id {id}")))
    }

    pub fn to_id(self) -> i32 {
        self as i32
    }

    pub fn name(self) -> &'static str {
        match self {
            SolarSystemBary::SSB => "Solar System Barycenter",
            SolarSystemBary::Sun => "Sun",
        }
    }
}

impl From<SolarSystemBary> for i32 {
    fn from(body: SolarSystemBary) -> Self {
        body.to_id()
    }
}

impl TryFrom<i32> for SolarSystemBary {
    type Error = EphemError;

    fn try_from(id: i32) -> Result<Self, Self::Error> {
        SolarSystemBary::from_id(id)
    }
}

impl fmt::Display for SolarSystemBary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod test_solar_system_bary {
    use super::*;

    #[test]
    fn test_ids() {
        assert_eq!(SolarSystemBary::from_id(0).unwrap(), SolarSystemBary::SSB);
        assert_eq!(SolarSystemBary::from_id(10).unwrap(), SolarSystemBary::Sun);
        assert!(SolarSystemBary::from_id(3).is_err());
        assert_eq!(i32::from(SolarSystemBary::Sun), 10);
        assert_eq!(SolarSystemBary::SSB.to_string(), "Solar System Barycenter");
    }
}
