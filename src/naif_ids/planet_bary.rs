use std::fmt;

use crate::ephem_errors::EphemError;

/// Barycenters of the planetary systems, NAIF codes 1 to 9.
///
/// A planet barycenter is the centre of mass of the planet and all of its
/// satellites; JPL ephemerides give these relative to the Solar System
/// Barycenter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum PlanetaryBary {
    Mercury = 1,
    Venus = 2,
    EarthMoon = 3,
    Mars = 4,
    Jupiter = 5,
    Saturn = 6,
    Uranus = 7,
    Neptune = 8,
    Pluto = 9,
}

impl PlanetaryBary {
    pub const ALL: [PlanetaryBary; 9] = [
        PlanetaryBary::Mercury,
        PlanetaryBary::Venus,
        PlanetaryBary::EarthMoon,
        PlanetaryBary::Mars,
        PlanetaryBary::Jupiter,
        PlanetaryBary::Saturn,
        PlanetaryBary::Uranus,
        PlanetaryBary::Neptune,
        PlanetaryBary::Pluto,
    ];

    pub fn from_id(id: i32) -> Result<Self, EphemError> {
        Self::ALL
            .into_iter()
            .find(|b| b.to_id() == id)
            .ok_or_else(|| EphemError::UnknownTarget(format!("planetary barycenter id {id}")))
    }

    pub fn to_id(self) -> i32 {
        self as i32
    }

    pub fn name(self) -> &'static str {
        match self {
            PlanetaryBary::Mercury => "Mercury Barycenter",
            PlanetaryBary::Venus => "Venus Barycenter",
            PlanetaryBary::EarthMoon => "Earth-Moon Barycenter",
            PlanetaryBary::Mars => "Mars Barycenter",
            PlanetaryBary::Jupiter => "Jupiter Barycenter",
            PlanetaryBary::Saturn => "Saturn Barycenter",
            PlanetaryBary::Uranus => "Uranus Barycenter",
            PlanetaryBary::Neptune => "Neptune Barycenter",
            PlanetaryBary::Pluto => "Pluto Barycenter",
        }
    }
}

impl From<PlanetaryBary> for i32 {
    fn from(planet: PlanetaryBary) -> Self {
        planet.to_id()
    }
}

impl TryFrom<i32> for PlanetaryBary {
    type Error = EphemError;

    fn try_from(id: i32) -> Result<Self, Self::Error> {
        PlanetaryBary::from_id(id)
    }
}

impl fmt::Display for PlanetaryBary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
