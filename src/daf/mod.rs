//! # Double precision Array File (DAF) container
//!
//! A DAF is a sequence of 1024-byte records holding a file record, an optional
//! comment area, a linked list of summary/name record pairs, and the arrays of
//! doubles the summaries point to. SPK ephemerides and binary PCK kernels are
//! both DAFs.
//!
//! [`Daf`] keeps the file bytes behind a [`ByteSource`] and decodes words on
//! demand: opening a kernel reads the file record and nothing else, and an
//! array is only touched when a caller asks for one of its words.
//!
//! ## Addressing
//!
//! Records are numbered from 1. Arrays are addressed in 8-byte *words*, also
//! numbered from 1, so word `w` starts at byte `(w - 1) * 8`.
//!
//! ## See also
//! ------------
//! * [`DAFHeader`] – File record decoder.
//! * [`DafWriter`] – Builds DAF files in memory.
//! * [`crate::spk::Spk`] – SPK interpretation of the arrays.

mod byte_source;
mod daf_header;
mod daf_writer;
mod summary_record;

use std::collections::HashSet;
use std::io::Read;

use camino::Utf8Path;
use tracing::{debug, trace};

pub use byte_source::ByteSource;
pub use daf_header::{DAFHeader, Endianness};
pub use daf_writer::DafWriter;
pub use summary_record::{DafSummary, SummaryControl};

use crate::constants::{
    COMMENT_CHARS_PER_RECORD, COMMENT_EOT, RECORD_BYTES, WORD_BYTES,
};
use crate::ephem_errors::{EphemError, Result};

/// An opened DAF container.
#[derive(Debug)]
pub struct Daf {
    source: ByteSource,
    header: DAFHeader,
}

impl Daf {
    /// Memory map and open a DAF file.
    pub fn open(path: impl AsRef<Utf8Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!(%path, "opening DAF");
        Self::from_source(ByteSource::map_file(path)?)
    }

    /// Read a whole DAF from a stream.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Self::from_source(ByteSource::read_from(reader)?)
    }

    /// Open a DAF held in memory.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self> {
        Self::from_source(ByteSource::Owned(bytes))
    }

    fn from_source(source: ByteSource) -> Result<Self> {
        let header = DAFHeader::read(&source)?;
        let records = source.len() / RECORD_BYTES;
        if header.fward as usize > records || header.bward as usize > records {
            return Err(EphemError::Format(format!(
                "summary records FWARD={} BWARD={} lie beyond the {records} records of the file",
                header.fward, header.bward
            )));
        }
        debug!(
            idword = %header.idword,
            format = header.endianness.locfmt(),
            nd = header.nd,
            ni = header.ni,
            "read DAF file record"
        );
        Ok(Daf { source, header })
    }

    pub fn header(&self) -> &DAFHeader {
        &self.header
    }

    pub fn endianness(&self) -> Endianness {
        self.header.endianness
    }

    /// Total size of the backing bytes.
    pub fn len_bytes(&self) -> usize {
        self.source.len()
    }

    /// Bytes of record `number` (1-based).
    pub fn record(&self, number: usize) -> Result<&[u8]> {
        let start = number
            .checked_sub(1)
            .ok_or_else(|| EphemError::Format("record numbers start at 1".into()))?
            .checked_mul(RECORD_BYTES);
        start
            .and_then(|start| self.source.get(start..start.checked_add(RECORD_BYTES)?))
            .ok_or_else(|| {
                EphemError::Format(format!(
                    "record {number} lies beyond the end of the {}-byte file",
                    self.source.len()
                ))
            })
    }

    /// Text of the comment area, records `2..FWARD`.
    ///
    /// NUL characters are line breaks; the text ends at the EOT byte. A file
    /// without comment records yields an empty string.
    pub fn comments(&self) -> Result<String> {
        let fward = self.header.fward as usize;
        let mut raw = Vec::new();
        for number in 2..fward {
            raw.extend_from_slice(&self.record(number)?[..COMMENT_CHARS_PER_RECORD]);
        }
        if raw.is_empty() {
            return Ok(String::new());
        }

        let end = raw
            .iter()
            .position(|&b| b == COMMENT_EOT)
            .ok_or_else(|| EphemError::Format("comment area has no EOT terminator".into()))?;
        let text: Vec<u8> = raw[..end]
            .iter()
            .map(|&b| if b == 0 { b'\n' } else { b })
            .collect();
        String::from_utf8(text)
            .map_err(|_| EphemError::Format("comment area is not valid text".into()))
    }

    /// Walk the summary record chain and decode every array summary.
    ///
    /// Summaries come back in file order. Pointers leaving the file, a chain
    /// that loops, or a record claiming more summaries than it can hold are
    /// reported as [`EphemError::Format`].
    pub fn summaries(&self) -> Result<Vec<DafSummary>> {
        let header = &self.header;
        let (nd, ni) = (header.nd as usize, header.ni as usize);
        let step = header.summary_bytes();
        let capacity = header.summaries_per_record();

        let mut summaries = Vec::new();
        let mut visited = HashSet::new();
        let mut number = header.fward as usize;

        while number != 0 {
            if !visited.insert(number) {
                return Err(EphemError::Format(format!(
                    "summary record chain loops back to record {number}"
                )));
            }
            let summary_record = self.record(number)?;
            let name_record = self.record(number + 1)?;
            let (body, control) = SummaryControl::parse(summary_record, header.endianness)?;
            if control.nsum > capacity {
                return Err(EphemError::Format(format!(
                    "summary record {number} claims {} summaries, at most {capacity} fit",
                    control.nsum
                )));
            }
            trace!(record = number, nsum = control.nsum, "summary record");

            for i in 0..control.nsum {
                let (_, (doubles, integers)) =
                    DafSummary::parse_values(&body[i * step..], nd, ni, header.endianness)?;
                let name = String::from_utf8_lossy(&name_record[i * step..(i + 1) * step])
                    .trim_end_matches(['\0', ' '])
                    .to_string();
                summaries.push(DafSummary {
                    name,
                    doubles,
                    integers,
                });
            }
            number = control.next;
        }

        debug!(count = summaries.len(), "decoded DAF summaries");
        Ok(summaries)
    }

    /// View of words `start..=end` (1-based) decoded lazily.
    ///
    /// Fails with [`EphemError::Format`] if the range is inverted or runs
    /// past the end of the file.
    pub fn words(&self, start: usize, end: usize) -> Result<Words<'_>> {
        if start == 0 || end + 1 < start {
            return Err(EphemError::Format(format!(
                "invalid word range {start}..{end}"
            )));
        }
        let bytes = self
            .source
            .get((start - 1) * WORD_BYTES..end * WORD_BYTES)
            .ok_or_else(|| {
                EphemError::Format(format!(
                    "array words {start}..{end} run past the end of the {}-byte file",
                    self.source.len()
                ))
            })?;
        Ok(Words {
            bytes,
            endianness: self.header.endianness,
        })
    }

    /// Decode words `start..=end` (1-based) into a vector.
    pub fn read_array(&self, start: usize, end: usize) -> Result<Vec<f64>> {
        Ok(self.words(start, end)?.to_vec())
    }
}

/// Borrowed run of DAF words, decoded on access.
#[derive(Debug, Clone, Copy)]
pub struct Words<'a> {
    bytes: &'a [u8],
    endianness: Endianness,
}

impl<'a> Words<'a> {
    pub fn len(&self) -> usize {
        self.bytes.len() / WORD_BYTES
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Word at `index` (0-based within the view).
    pub fn get(&self, index: usize) -> Option<f64> {
        self.bytes
            .get(index * WORD_BYTES..(index + 1) * WORD_BYTES)
            .map(|b| self.endianness.read_f64(b))
    }

    /// Sub-view of `count` words starting at `offset` (0-based).
    pub fn slice(&self, offset: usize, count: usize) -> Option<Words<'a>> {
        self.bytes
            .get(offset * WORD_BYTES..(offset + count) * WORD_BYTES)
            .map(|bytes| Words {
                bytes,
                endianness: self.endianness,
            })
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = f64> + 'a {
        let endianness = self.endianness;
        self.bytes
            .chunks_exact(WORD_BYTES)
            .map(move |b| endianness.read_f64(b))
    }

    pub fn to_vec(&self) -> Vec<f64> {
        self.iter().collect()
    }
}

#[cfg(test)]
mod test_daf {
    use super::*;

    fn sample() -> Vec<u8> {
        let mut writer = DafWriter::new("DAF/SPK", 2, 6).with_comment("line one\nline two");
        writer
            .add_array("FIRST", &[0.0, 10.0], &[1, 0, 1, 2], &[1.0, 2.0, 3.0])
            .unwrap();
        writer
            .add_array("SECOND", &[10.0, 20.0], &[2, 0, 1, 2], &[4.0, 5.0])
            .unwrap();
        writer.to_bytes()
    }

    #[test]
    fn test_summaries_and_arrays() {
        let daf = Daf::from_bytes(sample()).unwrap();
        let summaries = daf.summaries().unwrap();
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].name, "FIRST");
        assert_eq!(summaries[1].doubles, vec![10.0, 20.0]);
        assert_eq!(&summaries[1].integers[..4], &[2, 0, 1, 2]);

        let first = &summaries[0];
        let values = daf
            .read_array(first.start_word() as usize, first.end_word() as usize)
            .unwrap();
        assert_eq!(values, vec![1.0, 2.0, 3.0]);

        let second = &summaries[1];
        assert_eq!(second.start_word(), first.end_word() + 1);
        let words = daf
            .words(second.start_word() as usize, second.end_word() as usize)
            .unwrap();
        assert_eq!(words.len(), 2);
        assert_eq!(words.get(1), Some(5.0));
        assert_eq!(words.get(2), None);
        assert_eq!(words.slice(1, 1).map(|w| w.to_vec()), Some(vec![5.0]));
    }

    #[test]
    fn test_comments() {
        let daf = Daf::from_bytes(sample()).unwrap();
        assert_eq!(daf.comments().unwrap(), "line one\nline two");
    }

    #[test]
    fn test_words_out_of_file() {
        let daf = Daf::from_bytes(sample()).unwrap();
        let words = daf.len_bytes() / WORD_BYTES;
        assert!(matches!(
            daf.words(words, words + 1),
            Err(EphemError::Format(_))
        ));
        assert!(matches!(daf.words(0, 3), Err(EphemError::Format(_))));
    }

    #[test]
    fn test_cyclic_chain_is_rejected() {
        let mut bytes = sample();
        let fward = Daf::from_bytes(bytes.clone()).unwrap().header().fward as usize;
        let offset = (fward - 1) * RECORD_BYTES;
        bytes[offset..offset + 8].copy_from_slice(&(fward as f64).to_le_bytes());
        let daf = Daf::from_bytes(bytes).unwrap();
        assert!(matches!(daf.summaries(), Err(EphemError::Format(_))));
    }

    #[test]
    fn test_record_pointer_beyond_file() {
        let daf = Daf::from_bytes(sample()).unwrap();
        assert!(matches!(daf.record(usize::MAX), Err(EphemError::Format(_))));
        assert!(matches!(daf.record(0), Err(EphemError::Format(_))));

        let mut bytes = sample();
        let fward = daf.header().fward as usize;
        let offset = (fward - 1) * RECORD_BYTES;
        bytes[offset..offset + 8].copy_from_slice(&4.0e9f64.to_le_bytes());
        let daf = Daf::from_bytes(bytes).unwrap();
        assert!(matches!(daf.summaries(), Err(EphemError::Format(_))));
    }

    #[test]
    fn test_forward_pointer_beyond_file() {
        let mut bytes = sample();
        bytes[76..80].copy_from_slice(&i32::MAX.to_le_bytes());
        bytes[80..84].copy_from_slice(&i32::MAX.to_le_bytes());
        assert!(matches!(Daf::from_bytes(bytes), Err(EphemError::Format(_))));
    }

    #[test]
    fn test_summary_count_over_capacity() {
        let mut bytes = sample();
        let fward = Daf::from_bytes(bytes.clone()).unwrap().header().fward as usize;
        let offset = (fward - 1) * RECORD_BYTES + 16;
        bytes[offset..offset + 8].copy_from_slice(&400.0f64.to_le_bytes());
        let daf = Daf::from_bytes(bytes).unwrap();
        assert!(matches!(daf.summaries(), Err(EphemError::Format(_))));
    }
}
