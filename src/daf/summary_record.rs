//! Summary and name records of a DAF.
//!
//! Array summaries live in a doubly linked list of summary records. Each
//! record opens with three control words `(next, prev, nsum)` stored as
//! doubles, followed by `nsum` packed summaries of `ND` doubles and `NI`
//! integers. The record right after a summary record holds the names of the
//! arrays it describes, one fixed-width slot per summary.

use nom::{multi::count, IResult, Parser};

use super::daf_header::Endianness;
use crate::ephem_errors::{EphemError, Result};

/// Control words heading a summary record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SummaryControl {
    /// Record number of the next summary record, 0 at the end of the chain.
    pub next: usize,
    /// Record number of the previous summary record, 0 at the start.
    pub prev: usize,
    /// Number of summaries stored in this record.
    pub nsum: usize,
}

impl SummaryControl {
    pub fn parse(input: &[u8], endianness: Endianness) -> Result<(&[u8], Self)> {
        let (input, (next, prev, nsum)) = (
            |i| endianness.parse_f64(i),
            |i| endianness.parse_f64(i),
            |i| endianness.parse_f64(i),
        )
            .parse(input)?;
        Ok((
            input,
            SummaryControl {
                next: control_word(next, "next")?,
                prev: control_word(prev, "prev")?,
                nsum: control_word(nsum, "nsum")?,
            },
        ))
    }
}

fn control_word(value: f64, label: &str) -> Result<usize> {
    if value.is_finite() && value >= 0.0 && value.fract() == 0.0 && value <= u32::MAX as f64 {
        Ok(value as usize)
    } else {
        Err(EphemError::Format(format!(
            "summary record control word {label} = {value} is not a record count"
        )))
    }
}

/// One array summary together with its name.
#[derive(Debug, Clone, PartialEq)]
pub struct DafSummary {
    /// Array name from the name record, trimmed.
    pub name: String,
    /// The `ND` double precision components.
    pub doubles: Vec<f64>,
    /// The `NI` integer components; the last two are the array word addresses.
    pub integers: Vec<i32>,
}

impl DafSummary {
    /// Decode the `ND` doubles and `NI` integers of one packed summary.
    pub fn parse_values(
        input: &[u8],
        nd: usize,
        ni: usize,
        endianness: Endianness,
    ) -> IResult<&[u8], (Vec<f64>, Vec<i32>)> {
        (
            count(|i| endianness.parse_f64(i), nd),
            count(|i| endianness.parse_i32(i), ni),
        )
            .parse(input)
    }

    /// First word address of the array (1-based).
    pub fn start_word(&self) -> i32 {
        self.integers[self.integers.len() - 2]
    }

    /// Last word address of the array (1-based, inclusive).
    pub fn end_word(&self) -> i32 {
        self.integers[self.integers.len() - 1]
    }
}
