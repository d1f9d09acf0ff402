//! # NAIF body identifiers
//!
//! SPK kernels name bodies by NAIF integer codes. This module maps the codes
//! of the bodies carried by JPL planetary ephemerides to typed enums and to
//! human-readable names, and resolves free-text names back to codes.
//!
//! | codes        | family                          | enum                    |
//! |--------------|---------------------------------|-------------------------|
//! | 0, 10        | Solar System Barycenter, Sun    | [`SolarSystemBary`]     |
//! | 1..9         | planetary system barycenters    | [`PlanetaryBary`]       |
//! | 199..999     | planet mass centers             | [`PlanetMassCenter`]    |
//! | n01..n98     | natural satellites              | [`SatelliteMassCenter`] |
//!
//! Name lookup is case-insensitive and treats `-`, `_` and repeated blanks as
//! a single space, so `"earth-moon barycenter"`, `"EARTH MOON BARYCENTER"` and
//! `"emb"` all resolve to 3. Numeric strings are read as codes.

pub mod planet_bary;
pub mod planet_mass;
pub mod satellite_mass;
pub mod solar_system_bary;

use std::{fmt, str::FromStr};

use itertools::Itertools;

pub use planet_bary::PlanetaryBary;
pub use planet_mass::PlanetMassCenter;
pub use satellite_mass::SatelliteMassCenter;
pub use solar_system_bary::SolarSystemBary;

use crate::ephem_errors::EphemError;

/// A body with a known NAIF code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NaifIds {
    SSB(SolarSystemBary),
    PB(PlanetaryBary),
    PMC(PlanetMassCenter),
    SMC(SatelliteMassCenter),
}

/// Alternative spellings accepted by [`body_id`], already normalized.
const ALIASES: &[(&str, i32)] = &[
    ("ssb", 0),
    ("emb", 3),
    ("earth barycenter", 3),
    ("luna", 301),
];

impl NaifIds {
    pub fn from_id(id: i32) -> Result<Self, EphemError> {
        SolarSystemBary::from_id(id)
            .map(NaifIds::SSB)
            .or_else(|_| PlanetaryBary::from_id(id).map(NaifIds::PB))
            .or_else(|_| PlanetMassCenter::from_id(id).map(NaifIds::PMC))
            .or_else(|_| SatelliteMassCenter::from_id(id).map(NaifIds::SMC))
            .map_err(|_| EphemError::UnknownTarget(format!("NAIF id {id}")))
    }

    pub fn to_id(&self) -> i32 {
        match self {
            NaifIds::SSB(body) => body.to_id(),
            NaifIds::PB(body) => body.to_id(),
            NaifIds::PMC(body) => body.to_id(),
            NaifIds::SMC(body) => body.to_id(),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            NaifIds::SSB(body) => body.name(),
            NaifIds::PB(body) => body.name(),
            NaifIds::PMC(body) => body.name(),
            NaifIds::SMC(body) => body.name(),
        }
    }

    /// Every body known to this module, barycenters first.
    pub fn all() -> impl Iterator<Item = NaifIds> {
        SolarSystemBary::ALL
            .into_iter()
            .map(NaifIds::SSB)
            .chain(PlanetaryBary::ALL.into_iter().map(NaifIds::PB))
            .chain(PlanetMassCenter::ALL.into_iter().map(NaifIds::PMC))
            .chain(SatelliteMassCenter::ALL.into_iter().map(NaifIds::SMC))
    }
}

pub(crate) fn normalize(name: &str) -> String {
    name.split(|c: char| c.is_whitespace() || c == '-' || c == '_')
        .filter(|word| !word.is_empty())
        .map(|word| word.to_lowercase())
        .join(" ")
}

/// Name of a body code, if the code is one of the known bodies.
pub fn body_name(id: i32) -> Option<&'static str> {
    NaifIds::from_id(id).ok().map(|body| body.name())
}

/// Resolve a body name, an alias or a numeric string to a NAIF code.
pub fn body_id(name: &str) -> Option<i32> {
    if let Ok(code) = name.trim().parse::<i32>() {
        return Some(code);
    }
    let wanted = normalize(name);
    ALIASES
        .iter()
        .find(|(alias, _)| *alias == wanted)
        .map(|&(_, code)| code)
        .or_else(|| {
            NaifIds::all()
                .find(|body| normalize(body.name()) == wanted)
                .map(|body| body.to_id())
        })
}

impl From<NaifIds> for i32 {
    fn from(naif_id: NaifIds) -> Self {
        naif_id.to_id()
    }
}

impl TryFrom<i32> for NaifIds {
    type Error = EphemError;

    fn try_from(id: i32) -> Result<Self, Self::Error> {
        NaifIds::from_id(id)
    }
}

impl FromStr for NaifIds {
    type Err = EphemError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        body_id(s)
            .ok_or_else(|| EphemError::UnknownTarget(s.to_string()))
            .and_then(NaifIds::from_id)
    }
}

impl fmt::Display for NaifIds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod test_naif_id {
    use super::*;

    #[test]
    fn test_naif_ids_from_id() {
        assert_eq!(
            NaifIds::from_id(0).unwrap(),
            NaifIds::SSB(SolarSystemBary::SSB)
        );
        assert_eq!(
            NaifIds::from_id(10).unwrap(),
            NaifIds::SSB(SolarSystemBary::Sun)
        );
        assert_eq!(
            NaifIds::from_id(3).unwrap(),
            NaifIds::PB(PlanetaryBary::EarthMoon)
        );
        assert_eq!(
            NaifIds::from_id(199).unwrap(),
            NaifIds::PMC(PlanetMassCenter::Mercury)
        );
        assert_eq!(
            NaifIds::from_id(401).unwrap(),
            NaifIds::SMC(SatelliteMassCenter::Phobos)
        );
        assert_eq!(
            NaifIds::from_id(1000),
            Err(EphemError::UnknownTarget("NAIF id 1000".into()))
        );
        assert!(NaifIds::from_id(11).is_err());
    }

    #[test]
    fn test_naif_ids_round_trip() {
        for body in NaifIds::all() {
            assert_eq!(NaifIds::try_from(i32::from(body)).unwrap(), body);
        }
    }

    #[test]
    fn test_body_names() {
        assert_eq!(body_name(301), Some("Moon"));
        assert_eq!(body_name(3), Some("Earth-Moon Barycenter"));
        assert_eq!(body_name(-31), None);
    }

    #[test]
    fn test_body_id_lookup() {
        assert_eq!(body_id("mars"), Some(499));
        assert_eq!(body_id("  MARS barycenter "), Some(4));
        assert_eq!(body_id("Earth-Moon Barycenter"), Some(3));
        assert_eq!(body_id("earth_moon_barycenter"), Some(3));
        assert_eq!(body_id("EMB"), Some(3));
        assert_eq!(body_id("ssb"), Some(0));
        assert_eq!(body_id("sun"), Some(10));
        assert_eq!(body_id("499"), Some(499));
        assert_eq!(body_id("-31"), Some(-31));
        assert_eq!(body_id("vulcan"), None);
    }

    #[test]
    fn test_from_str() {
        assert_eq!(
            "titan".parse::<NaifIds>().unwrap(),
            NaifIds::SMC(SatelliteMassCenter::Titan)
        );
        assert!("vulcan".parse::<NaifIds>().is_err());
        assert!("12345".parse::<NaifIds>().is_err());
    }
}
