//! Cutting an SPK down to a time window.
//!
//! For every selected series, only the records overlapping the window are
//! copied, verbatim, into a new kernel with a rebuilt directory. The new
//! summaries declare the window (clipped to the original coverage) as their
//! coverage, and the comment area gets a preface describing the excerpt
//! followed by the original comments.

use camino::Utf8Path;
use tracing::{debug, warn};

use super::{Spk, SpkWriter};
use crate::constants::{jd_to_seconds, DIRECTORY_WORDS};
use crate::ephem_errors::{EphemError, Result};
use crate::time::calendar_day;

/// Comment text placed before the original comments of an excerpt.
pub fn excerpt_preface(start_jd: f64, end_jd: f64) -> String {
    format!(
        ";\n\
         ; This is an ephemeris excerpt created by jplephem {}, which was\n\
         ; asked to narrow the ephemeris to Julian dates {:.1} - {:.1}\n\
         ; (proleptic Gregorian dates {} through {}).\n\
         ;\n\
         ; Here is the comments area from the original ephemeris file:\n\
         ; ----------------------------------------------------------------------\n",
        env!("CARGO_PKG_VERSION"),
        start_jd,
        end_jd,
        calendar_day(jd_to_seconds(start_jd)),
        calendar_day(jd_to_seconds(end_jd)),
    )
}

/// Build an excerpt of `spk` covering Julian dates `start_jd..end_jd` (TDB).
///
/// Arguments
/// -----------------
/// * `spk`: Source kernel.
/// * `start_jd`, `end_jd`: Window to keep.
/// * `targets`: Target codes to keep; every series when `None`.
///
/// Return
/// ----------
/// * A writer holding the excerpt. Series without any record in the window,
///   or whose declared coverage misses the window, are dropped; series of
///   data types other than 2 and 3 are skipped.
///
/// See also
/// ------------
/// * [`write_excerpt`] – Same, written straight to a file.
pub fn excerpt(
    spk: &Spk,
    start_jd: f64,
    end_jd: f64,
    targets: Option<&[i32]>,
) -> Result<SpkWriter> {
    if start_jd.is_nan() || end_jd.is_nan() || start_jd > end_jd {
        return Err(EphemError::OutOfRange {
            time: start_jd,
            start: start_jd,
            end: end_jd,
        });
    }
    let (start, end) = (jd_to_seconds(start_jd), jd_to_seconds(end_jd));
    let header = spk.daf().header();

    let comment = excerpt_preface(start_jd, end_jd) + &spk.comments()?;
    let mut writer = SpkWriter::new()
        .with_internal_name(&header.internal_filename)
        .with_endianness(header.endianness)
        .with_comment(&comment);

    let wanted = |target: i32| targets.is_none_or(|list| list.contains(&target));
    for segment in spk.segments().iter().filter(|s| wanted(s.key().target)) {
        let Ok(directory) = segment.directory() else {
            warn!(key = %segment.key(), "skipping segment of unsupported data type");
            continue;
        };

        let (seg_start, seg_end) = segment.coverage();
        let (lo, hi) = (start.max(seg_start), end.min(seg_end));
        if lo > hi {
            debug!(key = %segment.key(), "window misses the declared coverage");
            continue;
        }

        let n = directory.n_records as f64;
        let first = ((start - directory.init) / directory.intlen).floor().clamp(0.0, n) as usize;
        let last =
            ((end - directory.init) / directory.intlen + 1.0).floor().clamp(0.0, n) as usize;
        if first == last {
            continue;
        }

        let rsize = directory.rsize;
        let mut words = segment
            .array()?
            .slice(rsize * first, rsize * (last - first))
            .ok_or_else(|| EphemError::Format(format!("segment {} is truncated", segment.key())))?
            .to_vec();
        let mut footer = [0.0; DIRECTORY_WORDS];
        footer[0] = directory.init + first as f64 * directory.intlen;
        footer[1] = directory.intlen;
        footer[2] = rsize as f64;
        footer[3] = (last - first) as f64;
        words.extend_from_slice(&footer);

        let summary = segment.summary();
        writer.add_raw(
            &summary.source,
            (lo, hi),
            segment.key(),
            summary.frame_id,
            summary.data_type,
            &words,
        )?;
        debug!(key = %segment.key(), records = last - first, "excerpted segment");
    }
    Ok(writer)
}

/// Write an excerpt of `spk` to `output`.
///
/// See also
/// ------------
/// * [`excerpt`] – Selection rules.
pub fn write_excerpt(
    spk: &Spk,
    output: impl AsRef<Utf8Path>,
    start_jd: f64,
    end_jd: f64,
    targets: Option<&[i32]>,
) -> Result<()> {
    excerpt(spk, start_jd, end_jd, targets)?.write_to(output)
}
