#![allow(dead_code)]

use camino::Utf8PathBuf;
use jplephem::daf::Endianness;
use jplephem::spk::spk_writer::ChebyshevSeries;
use jplephem::spk::{SpkDataType, SpkWriter};
use jplephem::{Kernel, SeriesKey};
use nalgebra::Vector3;
use tempfile::TempDir;

pub const DAY: f64 = 86_400.0;

/// Records of the synthetic kernel: 4 records of 8 days from J2000.
pub const RECORD_DAYS: f64 = 8.0;
pub const N_RECORDS: usize = 4;
pub const END: f64 = RECORD_DAYS * N_RECORDS as f64 * DAY;

pub const COMMENTS: &str = "; synthetic.bsp LOG FILE\n\
    ;\n\
    JPL planetary and lunar ephemeris DE999\n\
    Integrated 1 January 2000\n\
    \n\
    Time span covered by ephemeris:\n\
    \n\
    01-JAN-2000 12:00 to   02-FEB-2000 12:00\n\
    JD   2451545.0   to   JD   2451577.0\n";

/// Circular motion of `radius` km and `period_days` in the XY plane, with a
/// constant Z offset so every component is exercised.
pub fn circular(
    radius: f64,
    period_days: f64,
    z: f64,
) -> impl Fn(f64) -> (Vector3<f64>, Vector3<f64>) + Copy {
    move |t| {
        let w = std::f64::consts::TAU / (period_days * DAY);
        let (sin, cos) = (w * t).sin_cos();
        (
            Vector3::new(radius * cos, radius * sin, z),
            Vector3::new(-radius * w * sin, radius * w * cos, 0.0),
        )
    }
}

/// The analytic motions stored in [`planetary_writer`], by series.
pub fn motions() -> Vec<(SeriesKey, impl Fn(f64) -> (Vector3<f64>, Vector3<f64>) + Copy)> {
    vec![
        (SeriesKey::new(0, 3), circular(1.496e8, 365.25, 1000.0)),
        (SeriesKey::new(0, 10), circular(7.0e5, 4332.0, -50.0)),
        (SeriesKey::new(3, 399), circular(-4671.0, 27.32, 10.0)),
        (SeriesKey::new(3, 301), circular(3.797e5, 27.32, -800.0)),
        (SeriesKey::new(0, 4), circular(2.279e8, 686.98, 3.0e6)),
        (SeriesKey::new(4, 499), circular(20.0, 0.3, 0.0)),
    ]
}

/// Analytic state of one stored series.
pub fn expected(key: SeriesKey, t: f64) -> (Vector3<f64>, Vector3<f64>) {
    motions()
        .into_iter()
        .find(|(k, _)| *k == key)
        .map(|(_, motion)| motion(t))
        .unwrap()
}

/// Kernel with Sun, EMB, Earth, Moon, Mars barycenter and Mars, fitted on
/// [`N_RECORDS`] records of [`RECORD_DAYS`] days.
pub fn planetary_writer(data_type: SpkDataType) -> SpkWriter {
    let mut writer = SpkWriter::new()
        .with_internal_name("SYNTHETIC EPHEMERIS")
        .with_comment(COMMENTS);
    for (key, motion) in motions() {
        // Mars' fast spin needs shorter records to be fitted accurately.
        let (intlen, n_records) = if key.target == 499 {
            (DAY / 16.0, N_RECORDS * RECORD_DAYS as usize * 16)
        } else {
            (RECORD_DAYS * DAY, N_RECORDS)
        };
        let series = ChebyshevSeries::fit(key, data_type, 0.0, intlen, n_records, 14, motion)
            .unwrap()
            .with_source("DE-0999LE-0999");
        writer.add_series(&series).unwrap();
    }
    writer
}

pub fn planetary_kernel(data_type: SpkDataType) -> Kernel {
    Kernel::from_bytes(planetary_writer(data_type).to_bytes()).unwrap()
}

pub fn big_endian_kernel() -> Kernel {
    let writer = planetary_writer(SpkDataType::ChebyshevPositionOnly)
        .with_endianness(Endianness::Big);
    Kernel::from_bytes(writer.to_bytes()).unwrap()
}

/// Write `writer` to `synthetic.bsp` in a fresh temporary directory.
///
/// The directory is removed when the returned guard is dropped.
pub fn write_temp(writer: &SpkWriter) -> (TempDir, Utf8PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = Utf8PathBuf::from_path_buf(dir.path().join("synthetic.bsp")).unwrap();
    writer.write_to(&path).unwrap();
    (dir, path)
}
