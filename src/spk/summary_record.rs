use std::fmt;

use hifitime::Epoch;

use super::{spk_type::SpkDataType, SeriesKey};
use crate::constants::seconds_to_jd;
use crate::daf::DafSummary;
use crate::ephem_errors::{EphemError, Result};
use crate::naif_ids::body_name;

/// SPK view of a DAF array summary (`ND = 2`, `NI = 6`).
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    /// Array name, the "source" of the segment.
    pub source: String,
    /// Start of the declared coverage, ET seconds past J2000.
    pub start_epoch: f64,
    /// End of the declared coverage, ET seconds past J2000.
    pub end_epoch: f64,
    pub target: i32,
    pub center: i32,
    pub frame_id: i32,
    pub data_type: i32,
    /// First word of the array (1-based).
    pub initial_addr: i32,
    /// Last word of the array (1-based, inclusive).
    pub final_addr: i32,
}

impl Summary {
    /// Interpret a raw DAF summary as an SPK segment descriptor.
    pub fn from_daf(summary: &DafSummary) -> Result<Self> {
        match (summary.doubles.as_slice(), summary.integers.as_slice()) {
            (
                &[start_epoch, end_epoch, ..],
                &[target, center, frame_id, data_type, initial_addr, final_addr, ..],
            ) => Ok(Summary {
                source: summary.name.clone(),
                start_epoch,
                end_epoch,
                target,
                center,
                frame_id,
                data_type,
                initial_addr,
                final_addr,
            }),
            _ => Err(EphemError::Format(format!(
                "summary {:?} has {} doubles and {} integers, an SPK needs 2 and 6",
                summary.name,
                summary.doubles.len(),
                summary.integers.len()
            ))),
        }
    }

    pub fn key(&self) -> SeriesKey {
        SeriesKey::new(self.center, self.target)
    }

    pub fn spk_type(&self) -> Result<SpkDataType> {
        SpkDataType::try_from(self.data_type)
    }

    pub fn start_jd(&self) -> f64 {
        seconds_to_jd(self.start_epoch)
    }

    pub fn end_jd(&self) -> f64 {
        seconds_to_jd(self.end_epoch)
    }

    /// One-line listing: `JD..JD  Center (id) -> Target (id)`.
    ///
    /// The verbose form adds the frame, data type and source name on a second
    /// line.
    pub fn describe(&self, verbose: bool) -> String {
        let center = body_name(self.center).unwrap_or("Unknown Center");
        let target = body_name(self.target).unwrap_or("Unknown Target");
        let mut text = format!(
            "{:.2}..{:.2}  {} ({}) -> {} ({})",
            self.start_jd(),
            self.end_jd(),
            center,
            self.center,
            target,
            self.target
        );
        if verbose {
            text.push_str(&format!(
                "\n  frame={} data_type={} source={}",
                self.frame_id, self.data_type, self.source
            ));
        }
        text
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name_or_id = |id: i32| body_name(id).map_or_else(|| id.to_string(), str::to_string);
        let data_type = self
            .spk_type()
            .map_or_else(|_| format!("Unknown ({})", self.data_type), |t| t.to_string());

        let fields = [
            ("source", self.source.clone()),
            ("start_epoch", Epoch::from_et_seconds(self.start_epoch).to_string()),
            ("end_epoch", Epoch::from_et_seconds(self.end_epoch).to_string()),
            ("target", name_or_id(self.target)),
            ("center", name_or_id(self.center)),
            ("frame_id", self.frame_id.to_string()),
            ("data_type", data_type),
            ("initial_addr", self.initial_addr.to_string()),
            ("final_addr", self.final_addr.to_string()),
        ];

        let label_width = fields.iter().map(|(k, _)| k.len()).max().unwrap_or(10);
        let value_width = fields.iter().map(|(_, v)| v.len()).max().unwrap_or(10);

        let border = format!(
            "+{:-<label$}+{:-<value$}+",
            "",
            "",
            label = label_width + 2,
            value = value_width + 2
        );

        writeln!(f, "{border}")?;
        writeln!(
            f,
            "| {:<label_width$} | {:<value_width$} |",
            "Field", "Value",
        )?;
        writeln!(f, "{border}")?;
        for (label, value) in fields {
            writeln!(f, "| {label:<label_width$} | {value:<value_width$} |")?;
        }
        writeln!(f, "{border}")
    }
}
