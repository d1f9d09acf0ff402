mod common;

use approx::{assert_abs_diff_eq, assert_relative_eq};
use hifitime::Epoch;
use jplephem::spk::spk_writer::ChebyshevSeries;
use jplephem::spk::{SpkDataType, SpkWriter};
use jplephem::{Combination, EphemError, Kernel, SeriesKey};
use nalgebra::Vector3;

use common::{expected, planetary_kernel, DAY, END};

const SAMPLE_TIMES: [f64; 6] = [0.0, 0.37 * DAY, 8.0 * DAY, 13.5 * DAY, 31.99 * DAY, END];

fn earth(t: f64) -> (Vector3<f64>, Vector3<f64>) {
    let (p1, v1) = expected(SeriesKey::new(0, 3), t);
    let (p2, v2) = expected(SeriesKey::new(3, 399), t);
    (p1 + p2, v1 + v2)
}

#[test]
fn test_earth_is_emb_plus_offset() {
    for data_type in [
        SpkDataType::ChebyshevPositionOnly,
        SpkDataType::ChebyshevPositionVelocity,
    ] {
        let kernel = planetary_kernel(data_type);
        for t in SAMPLE_TIMES {
            let (p, v) = earth(t);
            let state = kernel.position_and_velocity("Earth", t).unwrap();
            assert_abs_diff_eq!(state.position, p, epsilon = 1e-5);
            assert_abs_diff_eq!(state.velocity, v, epsilon = 1e-8);
        }
    }
}

#[test]
fn test_position_matches_state_position_exactly() {
    let kernel = planetary_kernel(SpkDataType::ChebyshevPositionOnly);
    for target in [3, 10, 301, 399, 499] {
        for t in SAMPLE_TIMES {
            assert_eq!(
                kernel.position(target, t).unwrap(),
                kernel.position_and_velocity(target, t).unwrap().position
            );
        }
    }
}

#[test]
fn test_velocity_matches_finite_difference() {
    let kernel = planetary_kernel(SpkDataType::ChebyshevPositionOnly);
    let h = 1.0;
    for target in ["moon", "mars", "sun"] {
        for t in [1.0 * DAY, 11.1 * DAY, 30.0 * DAY] {
            let velocity = kernel.position_and_velocity(target, t).unwrap().velocity;
            let slope = (kernel.position(target, t + h).unwrap()
                - kernel.position(target, t - h).unwrap())
                / (2.0 * h);
            assert_abs_diff_eq!(velocity, slope, epsilon = 1e-5);
        }
    }
}

#[test]
fn test_coverage_bounds() {
    let kernel = planetary_kernel(SpkDataType::ChebyshevPositionOnly);
    assert_eq!(kernel.coverage("earth").unwrap(), (0.0, END));

    assert!(kernel.position(399, 0.0).is_ok());
    assert!(kernel.position(399, END).is_ok());
    assert_eq!(
        kernel.position(399, END + 1.0),
        Err(EphemError::OutOfRange {
            time: END + 1.0,
            start: 0.0,
            end: END
        })
    );
    assert!(matches!(
        kernel.position(399, -1.0),
        Err(EphemError::OutOfRange { .. })
    ));
    assert!(matches!(
        kernel.position(399, f64::NAN),
        Err(EphemError::OutOfRange { .. })
    ));
}

#[test]
fn test_records_partition_the_coverage() {
    let kernel = planetary_kernel(SpkDataType::ChebyshevPositionOnly);
    for key in kernel.series_list() {
        let segment = kernel.series(key.center, key.target).unwrap()[0];
        let n = segment.record_count().unwrap();
        let (start, end) = segment.coverage();

        assert_eq!(segment.record_bounds(0).unwrap().0, start);
        assert_eq!(segment.record_bounds(n - 1).unwrap().1, end);
        for i in 1..n {
            assert_eq!(
                segment.record_bounds(i - 1).unwrap().1,
                segment.record_bounds(i).unwrap().0
            );
            // A boundary instant belongs to the record that starts there.
            let boundary = segment.record_bounds(i).unwrap().0;
            assert_eq!(segment.locate(boundary).unwrap(), i);
        }
        assert_eq!(segment.locate(end).unwrap(), n - 1);
    }
}

#[test]
fn test_continuity_at_record_boundaries() {
    let kernel = planetary_kernel(SpkDataType::ChebyshevPositionOnly);
    for key in kernel.series_list() {
        let segment = kernel.series(key.center, key.target).unwrap()[0];
        for i in 1..segment.record_count().unwrap() {
            let boundary = segment.record_bounds(i).unwrap().0;
            let left = segment.record(i - 1).unwrap().state(boundary);
            let right = segment.record(i).unwrap().state(boundary);
            assert_abs_diff_eq!(left.0, right.0, epsilon = 1e-5);
            assert_abs_diff_eq!(left.1, right.1, epsilon = 1e-8);
        }
    }
}

#[test]
fn test_record_ends_reproduce_sampled_values() {
    let kernel = planetary_kernel(SpkDataType::ChebyshevPositionVelocity);
    let segment = kernel.series(0, 3).unwrap()[0];
    let record = segment.record(2).unwrap();
    let (start, end) = record.bounds();
    for t in [start, end] {
        let (p, v) = record.state(t);
        let (p_ref, v_ref) = expected(SeriesKey::new(0, 3), t);
        assert_relative_eq!(p, p_ref, max_relative = 1e-13);
        assert_relative_eq!(v, v_ref, max_relative = 1e-11);
    }
}

#[test]
fn test_degree_two_record_midpoint() {
    let key = SeriesKey::new(0, 10);
    let mut series = ChebyshevSeries::new(key, SpkDataType::ChebyshevPositionOnly, -DAY, 2.0 * DAY);
    series.push_record(vec![0.0, 1.0, 0.0, 2.0, 0.0, 0.0, 0.0, 0.0, 5.0]);
    let mut writer = SpkWriter::new();
    writer.add_series(&series).unwrap();
    let kernel = Kernel::from_bytes(writer.to_bytes()).unwrap();

    assert_eq!(kernel.position(10, 0.0).unwrap(), Vector3::new(0.0, 2.0, -5.0));
    assert_eq!(kernel.position(10, DAY).unwrap(), Vector3::new(1.0, 2.0, 5.0));
    let state = kernel.position_and_velocity(10, 0.0).unwrap();
    assert_eq!(state.velocity.x, 1.0 / DAY);
    assert_eq!(kernel.series(0, 10).unwrap()[0].degree().unwrap(), 2);
}

#[test]
fn test_unknown_targets() {
    let kernel = planetary_kernel(SpkDataType::ChebyshevPositionOnly);
    for target in ["Pluto", "pluto barycenter", "Titan", "Vulcan"] {
        assert!(matches!(
            kernel.position(target, 0.0),
            Err(EphemError::UnknownTarget(_))
        ));
    }
    assert!(matches!(
        kernel.positions(9, &[0.0, 1.0]),
        Err(EphemError::UnknownTarget(_))
    ));
    assert!(matches!(kernel.coverage(0), Err(EphemError::UnknownTarget(_))));
}

#[test]
fn test_vectorised_queries() {
    let kernel = planetary_kernel(SpkDataType::ChebyshevPositionOnly);
    let positions = kernel.positions("moon", &SAMPLE_TIMES).unwrap();
    let states = kernel.positions_and_velocities("moon", &SAMPLE_TIMES).unwrap();
    assert_eq!(positions.len(), SAMPLE_TIMES.len());
    for ((t, p), s) in SAMPLE_TIMES.iter().zip(&positions).zip(&states) {
        assert_eq!(*p, kernel.position("moon", *t).unwrap());
        assert_eq!(*s, kernel.position_and_velocity("moon", *t).unwrap());
    }

    let with_bad_time = [0.0, DAY, END + DAY, 2.0 * DAY];
    assert_eq!(
        kernel.positions("moon", &with_bad_time),
        Err(EphemError::OutOfRange {
            time: END + DAY,
            start: 0.0,
            end: END
        })
    );
    assert!(kernel.positions_and_velocities("moon", &with_bad_time).is_err());
}

#[test]
fn test_geocentric_moon_and_custom_rules() {
    let mut kernel = planetary_kernel(SpkDataType::ChebyshevPositionOnly);
    let t = 5.0 * DAY;
    let geocentric = kernel.position("geocentric moon", t).unwrap();
    let moon = kernel.position("moon", t).unwrap();
    let earth = kernel.position("earth", t).unwrap();
    assert_abs_diff_eq!(geocentric, moon - earth, epsilon = 1e-6);

    kernel.resolver_mut().insert(
        "heliocentric mars",
        Combination::Difference(SeriesKey::new(0, 4), SeriesKey::new(0, 10)),
    );
    let heliocentric = kernel.position("heliocentric mars", t).unwrap();
    assert_abs_diff_eq!(
        heliocentric,
        kernel.position(4, t).unwrap() - kernel.position("sun", t).unwrap(),
        epsilon = 1e-6
    );
}

#[test]
fn test_epoch_queries() {
    let kernel = planetary_kernel(SpkDataType::ChebyshevPositionOnly);
    let epoch = Epoch::from_et_seconds(3.0 * DAY);
    assert_abs_diff_eq!(
        kernel.position_at("mars", &epoch).unwrap(),
        kernel.position("mars", 3.0 * DAY).unwrap(),
        epsilon = 1e-3
    );
    assert_abs_diff_eq!(
        kernel.state_at(399, &epoch).unwrap().velocity,
        kernel.position_and_velocity(399, 3.0 * DAY).unwrap().velocity,
        epsilon = 1e-9
    );
}

#[test]
fn test_big_endian_kernel_gives_same_states() {
    let little = planetary_kernel(SpkDataType::ChebyshevPositionOnly);
    let big = common::big_endian_kernel();
    assert!(big
        .to_string()
        .starts_with("File type DAF/SPK and format BIG-IEEE with 6 segments:"));
    for t in SAMPLE_TIMES {
        assert_eq!(
            big.position_and_velocity("moon", t).unwrap(),
            little.position_and_velocity("moon", t).unwrap()
        );
    }
}

#[test]
fn test_open_read_and_source() {
    let writer = common::planetary_writer(SpkDataType::ChebyshevPositionOnly);
    let (_dir, path) = common::write_temp(&writer);

    let opened = Kernel::open(&path).unwrap();
    let streamed = Kernel::from_reader(std::fs::File::open(&path).unwrap()).unwrap();
    let sourced = Kernel::from_source(&format!("path:{path}")).unwrap();
    assert_eq!(opened.path(), Some(path.as_path()));
    assert_eq!(streamed.path(), None);
    for kernel in [&streamed, &sourced] {
        assert_eq!(
            kernel.position("earth", DAY).unwrap(),
            opened.position("earth", DAY).unwrap()
        );
    }
    assert!(opened.to_string().starts_with(path.as_str()));
    assert!(matches!(
        Kernel::open(path.with_file_name("missing.bsp")),
        Err(EphemError::Io { .. })
    ));
}

#[test]
fn test_header_and_comments() {
    let kernel = planetary_kernel(SpkDataType::ChebyshevPositionOnly);
    assert_eq!(kernel.comments().unwrap(), common::COMMENTS);
    let header = kernel.header().unwrap();
    assert_eq!(header.version, "DE999");
    assert_eq!(header.start_jd, 2451545.0);
    assert_eq!(header.end_jd, 2451577.0);
}

#[test]
fn test_shared_between_threads() {
    let kernel = std::sync::Arc::new(planetary_kernel(SpkDataType::ChebyshevPositionOnly));
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let kernel = std::sync::Arc::clone(&kernel);
            std::thread::spawn(move || kernel.position("mars", i as f64 * DAY).unwrap())
        })
        .collect();
    for (i, handle) in handles.into_iter().enumerate() {
        assert_eq!(
            handle.join().unwrap(),
            kernel.position("mars", i as f64 * DAY).unwrap()
        );
    }
}
