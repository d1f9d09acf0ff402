//! # Constants for kernel decoding and time conversion
//!
//! This module centralizes the **physical constants**, **file layout sizes**, and **time-scale
//! anchors** shared by the DAF reader, the SPK series evaluator and the public kernel API.
//!
//! ## Overview
//!
//! - Astronomical constants and unit conversions (km ↔ AU, days ↔ seconds)
//! - DAF container geometry (record size, word size, FTP validation string)
//! - J2000 anchors used to convert ET seconds to Julian dates

// -------------------------------------------------------------------------------------------------
// Physical constants and unit conversions
// -------------------------------------------------------------------------------------------------

/// Number of seconds in a Julian day
pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// Astronomical Unit in kilometers (IAU 2012)
pub const AU: f64 = 149_597_870.7;

/// Julian date of the J2000.0 epoch (2000-01-01 12:00:00 TDB)
pub const T0: f64 = 2_451_545.0;

/// Conversion factor between Julian Date and Modified Julian Date
pub const JDTOMJD: f64 = 2_400_000.5;

// -------------------------------------------------------------------------------------------------
// DAF container geometry
// -------------------------------------------------------------------------------------------------

/// Size in bytes of one DAF physical record.
pub const RECORD_BYTES: usize = 1024;

/// Size in bytes of one DAF word (an IEEE-754 double).
pub const WORD_BYTES: usize = 8;

/// Number of words in one DAF record.
pub const WORDS_PER_RECORD: usize = RECORD_BYTES / WORD_BYTES;

/// Number of text characters stored in each comment record.
pub const COMMENT_CHARS_PER_RECORD: usize = 1000;

/// End-of-transmission byte terminating the comment area.
pub const COMMENT_EOT: u8 = 0x04;

/// FTP validation string stored in the file record of every binary DAF.
///
/// A kernel transferred in ASCII mode gets its line endings rewritten, which
/// corrupts this sentinel; the reader uses it to reject damaged files.
pub const FTPSTR: &[u8; 28] = b"FTPSTR:\r:\n:\r\n:\r\x00:\x81:\x10\xce:ENDFTP";

/// Byte offset of the FTP validation string inside the file record.
pub const FTPSTR_OFFSET: usize = 699;

/// Number of control words (`next`, `prev`, `nsum`) heading a summary record.
pub const SUMMARY_CONTROL_WORDS: usize = 3;

/// Number of trailing directory words (`init`, `intlen`, `rsize`, `n`) of a Chebyshev array.
pub const DIRECTORY_WORDS: usize = 4;

/// Convert ET seconds past J2000 into a Julian date (TDB).
pub fn seconds_to_jd(seconds: f64) -> f64 {
    T0 + seconds / SECONDS_PER_DAY
}

/// Convert a Julian date (TDB) into ET seconds past J2000.
pub fn jd_to_seconds(jd: f64) -> f64 {
    (jd - T0) * SECONDS_PER_DAY
}
