use std::fmt;

use crate::ephem_errors::EphemError;

/// Natural satellites carried by the JPL planetary and satellite ephemerides.
///
/// NAIF numbers satellites `n01..n98` after their planet `n`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum SatelliteMassCenter {
    Moon = 301,
    Phobos = 401,
    Deimos = 402,
    Io = 501,
    Europa = 502,
    Ganymede = 503,
    Callisto = 504,
    Mimas = 601,
    Enceladus = 602,
    Tethys = 603,
    Dione = 604,
    Rhea = 605,
    Titan = 606,
    Hyperion = 607,
    Iapetus = 608,
    Ariel = 701,
    Umbriel = 702,
    Titania = 703,
    Oberon = 704,
    Miranda = 705,
    Triton = 801,
    Nereid = 802,
    Charon = 901,
}

impl SatelliteMassCenter {
    pub const ALL: [SatelliteMassCenter; 23] = {
        use SatelliteMassCenter::*;
        [
            Moon, Phobos, Deimos, Io, Europa, Ganymede, Callisto, Mimas, Enceladus, Tethys, Dione,
            Rhea, Titan, Hyperion, Iapetus, Ariel, Umbriel, Titania, Oberon, Miranda, Triton,
            Nereid, Charon,
        ]
    };

    pub fn from_id(id: i32) -> Result<Self, EphemError> {
        Self::ALL
            .into_iter()
            .find(|b| b.to_id() == id)
            .ok_or_else(|| EphemError::UnknownTarget(format!("satellite id {id}")))
    }

    pub fn to_id(self) -> i32 {
        self as i32
    }

    /// Barycenter code of the satellite's planetary system.
    pub fn system(self) -> i32 {
        self.to_id() / 100
    }

    pub fn name(self) -> &'static str {
        use SatelliteMassCenter::*;
        match self {
            Moon => "Moon",
            Phobos => "Phobos",
            Deimos => "Deimos",
            Io => "Io",
            Europa => "Europa",
            Ganymede => "Ganymede",
            Callisto => "Callisto",
            Mimas => "Mimas",
            Enceladus => "Enceladus",
            Tethys => "Tethys",
            Dione => "Dione",
            Rhea => "Rhea",
            Titan => "Titan",
            Hyperion => "Hyperion",
            Iapetus => "Iapetus",
            Ariel => "Ariel",
            Umbriel => "Umbriel",
            Titania => "Titania",
            Oberon => "Oberon",
            Miranda => "Miranda",
            Triton => "Triton",
            Nereid => "Nereid",
            Charon => "Charon",
        }
    }
}

impl From<SatelliteMassCenter> for i32 {
    fn from(satellite: SatelliteMassCenter) -> Self {
        satellite.to_id()
    }
}

impl TryFrom<i32> for SatelliteMassCenter {
    type Error = EphemError;

    fn try_from(id: i32) -> Result<Self, Self::Error> {
        SatelliteMassCenter::from_id(id)
    }
}

impl fmt::Display for SatelliteMassCenter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
