//! In-memory DAF builder.
//!
//! [`DafWriter`] lays out a complete DAF from a list of arrays: file record,
//! comment area, as many summary/name record pairs as the summaries need, then
//! the array data packed word after word. Word addresses in the summaries are
//! assigned at serialization time.

use std::fs;
use std::io::Write;

use camino::Utf8Path;
use tracing::debug;

use super::daf_header::Endianness;
use crate::constants::{
    COMMENT_CHARS_PER_RECORD, COMMENT_EOT, FTPSTR, FTPSTR_OFFSET, RECORD_BYTES,
    SUMMARY_CONTROL_WORDS, WORDS_PER_RECORD, WORD_BYTES,
};
use crate::ephem_errors::{EphemError, Result};

#[derive(Debug, Clone)]
struct PendingArray {
    name: String,
    doubles: Vec<f64>,
    integers: Vec<i32>,
    data: Vec<f64>,
}

/// Builder for a DAF file.
///
/// The last two of the `NI` summary integers are the array word addresses and
/// are filled in by the writer, so [`DafWriter::add_array`] takes `NI - 2`
/// integers.
#[derive(Debug, Clone)]
pub struct DafWriter {
    idword: String,
    internal_name: String,
    nd: usize,
    ni: usize,
    endianness: Endianness,
    comment: String,
    arrays: Vec<PendingArray>,
}

impl DafWriter {
    /// Start an empty DAF, e.g. `DafWriter::new("DAF/SPK", 2, 6)`.
    pub fn new(idword: &str, nd: usize, ni: usize) -> Self {
        DafWriter {
            idword: idword.to_string(),
            internal_name: String::new(),
            nd,
            ni: ni.max(2),
            endianness: Endianness::Little,
            comment: String::new(),
            arrays: Vec::new(),
        }
    }

    pub fn with_internal_name(mut self, name: &str) -> Self {
        self.internal_name = name.to_string();
        self
    }

    /// Comment area text. Line breaks are stored as NUL characters.
    pub fn with_comment(mut self, comment: &str) -> Self {
        self.comment = comment.to_string();
        self
    }

    pub fn with_endianness(mut self, endianness: Endianness) -> Self {
        self.endianness = endianness;
        self
    }

    /// Queue one array and its summary values.
    ///
    /// Arguments
    /// -----------------
    /// * `name`: Array name, truncated to the name slot width.
    /// * `doubles`: The `ND` summary doubles.
    /// * `integers`: The first `NI - 2` summary integers.
    /// * `data`: The array words.
    ///
    /// Return
    /// ----------
    /// * [`EphemError::Format`] when the summary value counts do not match the
    ///   layout given to [`DafWriter::new`].
    pub fn add_array(
        &mut self,
        name: &str,
        doubles: &[f64],
        integers: &[i32],
        data: &[f64],
    ) -> Result<()> {
        if doubles.len() != self.nd || integers.len() != self.ni - 2 {
            return Err(EphemError::Format(format!(
                "summary of {name:?} has {} doubles and {} integers, expected {} and {}",
                doubles.len(),
                integers.len(),
                self.nd,
                self.ni - 2
            )));
        }
        self.arrays.push(PendingArray {
            name: name.to_string(),
            doubles: doubles.to_vec(),
            integers: integers.to_vec(),
            data: data.to_vec(),
        });
        Ok(())
    }

    fn summary_words(&self) -> usize {
        self.nd + self.ni.div_ceil(2)
    }

    fn comment_records(&self) -> Vec<Vec<u8>> {
        if self.comment.is_empty() {
            return Vec::new();
        }
        let mut text: Vec<u8> = self
            .comment
            .bytes()
            .map(|b| if b == b'\n' { 0 } else { b })
            .collect();
        text.push(COMMENT_EOT);

        text.chunks(COMMENT_CHARS_PER_RECORD)
            .map(|chunk| {
                let mut record = chunk.to_vec();
                record.resize(COMMENT_CHARS_PER_RECORD, b' ');
                record.resize(RECORD_BYTES, 0);
                record
            })
            .collect()
    }

    /// Serialize the DAF.
    pub fn to_bytes(&self) -> Vec<u8> {
        let e = self.endianness;
        let step = self.summary_words() * WORD_BYTES;
        let per_record = (WORDS_PER_RECORD - SUMMARY_CONTROL_WORDS) / self.summary_words();

        let comments = self.comment_records();
        let fward = 2 + comments.len();
        let summary_records = self.arrays.len().div_ceil(per_record).max(1);
        let bward = fward + 2 * (summary_records - 1);
        let first_data_record = fward + 2 * summary_records;

        let mut next_word = (first_data_record - 1) * WORDS_PER_RECORD + 1;
        let mut addresses = Vec::with_capacity(self.arrays.len());
        for array in &self.arrays {
            let start = next_word;
            next_word += array.data.len();
            addresses.push((start, next_word - 1));
        }
        let free = next_word;

        let mut out = Vec::with_capacity((first_data_record - 1) * RECORD_BYTES + free * 8);

        // file record
        out.extend_from_slice(&padded(&self.idword, 8, b' '));
        e.write_i32(&mut out, self.nd as i32);
        e.write_i32(&mut out, self.ni as i32);
        out.extend_from_slice(&padded(&self.internal_name, 60, b' '));
        e.write_i32(&mut out, fward as i32);
        e.write_i32(&mut out, bward as i32);
        e.write_i32(&mut out, free as i32);
        out.extend_from_slice(e.locfmt().as_bytes());
        out.resize(FTPSTR_OFFSET, 0);
        out.extend_from_slice(FTPSTR);
        out.resize(RECORD_BYTES, 0);

        for record in comments {
            out.extend_from_slice(&record);
        }

        let mut chunks: Vec<_> = self
            .arrays
            .iter()
            .zip(addresses.iter().copied())
            .collect::<Vec<_>>()
            .chunks(per_record)
            .map(|c| c.to_vec())
            .collect();
        if chunks.is_empty() {
            chunks.push(Vec::new());
        }

        for (k, chunk) in chunks.iter().enumerate() {
            let number = fward + 2 * k;
            let next = if k + 1 == chunks.len() { 0 } else { number + 2 };
            let prev = if k == 0 { 0 } else { number - 2 };

            let start = out.len();
            e.write_f64(&mut out, next as f64);
            e.write_f64(&mut out, prev as f64);
            e.write_f64(&mut out, chunk.len() as f64);
            for &(array, (first, last)) in chunk {
                let summary_start = out.len();
                for &d in &array.doubles {
                    e.write_f64(&mut out, d);
                }
                for &i in &array.integers {
                    e.write_i32(&mut out, i);
                }
                e.write_i32(&mut out, first as i32);
                e.write_i32(&mut out, last as i32);
                out.resize(summary_start + step, 0);
            }
            out.resize(start + RECORD_BYTES, 0);

            let names_start = out.len();
            for (array, _) in chunk {
                out.extend_from_slice(&padded(&array.name, step, b' '));
            }
            out.resize(names_start + RECORD_BYTES, b' ');
        }

        for array in &self.arrays {
            for &word in &array.data {
                e.write_f64(&mut out, word);
            }
        }
        let total = out.len().div_ceil(RECORD_BYTES) * RECORD_BYTES;
        out.resize(total, 0);

        debug!(
            arrays = self.arrays.len(),
            bytes = out.len(),
            "serialized DAF"
        );
        out
    }

    /// Serialize into any writer.
    pub fn write<W: Write>(&self, mut writer: W) -> Result<()> {
        writer.write_all(&self.to_bytes())?;
        writer.flush()?;
        Ok(())
    }

    /// Serialize into a file, replacing it if present.
    pub fn write_to(&self, path: impl AsRef<Utf8Path>) -> Result<()> {
        let path = path.as_ref();
        fs::write(path, self.to_bytes()).map_err(|err| EphemError::io(path, err))
    }
}

fn padded(text: &str, width: usize, fill: u8) -> Vec<u8> {
    let mut bytes: Vec<u8> = text.bytes().take(width).collect();
    bytes.resize(width, fill);
    bytes
}
