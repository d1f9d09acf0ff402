use std::fmt;

use crate::ephem_errors::EphemError;

/// Planet mass centers, NAIF codes `n99`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum PlanetMassCenter {
    Mercury = 199,
    Venus = 299,
    Earth = 399,
    Mars = 499,
    Jupiter = 599,
    Saturn = 699,
    Uranus = 799,
    Neptune = 899,
    Pluto = 999,
}

impl PlanetMassCenter {
    pub const ALL: [PlanetMassCenter; 9] = [
        PlanetMassCenter::Mercury,
        PlanetMassCenter::Venus,
        PlanetMassCenter::Earth,
        PlanetMassCenter::Mars,
        PlanetMassCenter::Jupiter,
        PlanetMassCenter::Saturn,
        PlanetMassCenter::Uranus,
        PlanetMassCenter::Neptune,
        PlanetMassCenter::Pluto,
    ];

    pub fn from_id(id: i32) -> Result<Self, EphemError> {
        Self::ALL
            .into_iter()
            .find(|b| b.to_id() == id)
            .ok_or_else(|| EphemError::UnknownTarget(format!("planet mass center id {id}")))
    }

    pub fn to_id(self) -> i32 {
        self as i32
    }

    /// Barycenter code of the planet's system (`n99 -> n`).
    pub fn system(self) -> i32 {
        self.to_id() / 100
    }

    pub fn name(self) -> &'static str {
        match self {
            PlanetMassCenter::Mercury => "Mercury",
            PlanetMassCenter::Venus => "Venus",
            PlanetMassCenter::Earth => "Earth",
            PlanetMassCenter::Mars => "Mars",
            PlanetMassCenter::Jupiter => "Jupiter",
            PlanetMassCenter::Saturn => "Saturn",
            PlanetMassCenter::Uranus => "Uranus",
            PlanetMassCenter::Neptune => "Neptune",
            PlanetMassCenter::Pluto => "Pluto",
        }
    }
}

impl From<PlanetMassCenter> for i32 {
    fn from(planet: PlanetMassCenter) -> Self {
        planet.to_id()
    }
}

impl TryFrom<i32> for PlanetMassCenter {
    type Error = EphemError;

    fn try_from(id: i32) -> Result<Self, Self::Error> {
        PlanetMassCenter::from_id(id)
    }
}

impl fmt::Display for PlanetMassCenter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod test_planet_mass {
    use super::*;

    #[test]
    fn test_planet_mass_ids() {
        assert_eq!(
            PlanetMassCenter::from_id(399).unwrap(),
            PlanetMassCenter::Earth
        );
        assert_eq!(PlanetMassCenter::Mars.to_id(), 499);
        assert_eq!(PlanetMassCenter::Jupiter.system(), 5);
        assert!(PlanetMassCenter::from_id(398).is_err());
        assert_eq!(PlanetMassCenter::Neptune.to_string(), "Neptune");
    }
}
