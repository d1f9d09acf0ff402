//! DAF file record decoding.
//!
//! The first 1024-byte record of every DAF container (SPK, PCK, ...) describes
//! the binary layout of the rest of the file. This module decodes it into a
//! [`DAFHeader`], detects the byte order the file was written with, and checks
//! the record for the kinds of damage a kernel typically suffers (truncation,
//! an ASCII-mode FTP transfer, a foreign file type).
//!
//! # What the file record contains
//!
//! | bytes    | field                                                   |
//! |----------|---------------------------------------------------------|
//! | 0..8     | `LOCIDW` identifier, `"DAF/SPK "`, `"DAF/PCK "`, `"NAIF/DAF"` |
//! | 8..12    | `ND`, doubles per array summary                         |
//! | 12..16   | `NI`, integers per array summary                        |
//! | 16..76   | internal file name                                      |
//! | 76..80   | `FWARD`, record number of the first summary record      |
//! | 80..84   | `BWARD`, record number of the last summary record       |
//! | 84..88   | `FREE`, first free word address                         |
//! | 88..96   | `LOCFMT`, `"LTL-IEEE"` or `"BIG-IEEE"`                  |
//! | 699..727 | FTP validation string                                   |
//!
//! # Byte order
//!
//! Modern files name their byte order in `LOCFMT`. Legacy `NAIF/DAF` files
//! predate that field, so both orders are tried and the one that decodes
//! `ND == 2` wins.
//!
//! # See also
//! ------------
//! * [`crate::daf::Daf`] – Uses the header to walk summaries and arrays.
//! * [`crate::daf::DafWriter`] – Produces file records this parser accepts.

use std::fmt;

use byteorder::{BigEndian, ByteOrder, LittleEndian};
use nom::{bytes::complete::take, IResult};

use crate::constants::{
    FTPSTR, FTPSTR_OFFSET, RECORD_BYTES, SUMMARY_CONTROL_WORDS, WORDS_PER_RECORD,
};
use crate::ephem_errors::{EphemError, Result};

/// Byte order of the numeric data stored in a DAF file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endianness {
    Little,
    Big,
}

impl Endianness {
    /// Map a `LOCFMT` tag to a byte order, `None` for unknown tags.
    pub fn from_locfmt(locfmt: &[u8]) -> Option<Self> {
        match locfmt {
            b"LTL-IEEE" => Some(Endianness::Little),
            b"BIG-IEEE" => Some(Endianness::Big),
            _ => None,
        }
    }

    /// The `LOCFMT` tag written for this byte order.
    pub fn locfmt(self) -> &'static str {
        match self {
            Endianness::Little => "LTL-IEEE",
            Endianness::Big => "BIG-IEEE",
        }
    }

    /// Decode one 8-byte word. `bytes` must hold at least 8 bytes.
    #[inline]
    pub fn read_f64(self, bytes: &[u8]) -> f64 {
        match self {
            Endianness::Little => LittleEndian::read_f64(bytes),
            Endianness::Big => BigEndian::read_f64(bytes),
        }
    }

    /// Decode one 4-byte integer. `bytes` must hold at least 4 bytes.
    #[inline]
    pub fn read_i32(self, bytes: &[u8]) -> i32 {
        match self {
            Endianness::Little => LittleEndian::read_i32(bytes),
            Endianness::Big => BigEndian::read_i32(bytes),
        }
    }

    pub fn write_f64(self, out: &mut Vec<u8>, value: f64) {
        let mut buf = [0u8; 8];
        match self {
            Endianness::Little => LittleEndian::write_f64(&mut buf, value),
            Endianness::Big => BigEndian::write_f64(&mut buf, value),
        }
        out.extend_from_slice(&buf);
    }

    pub fn write_i32(self, out: &mut Vec<u8>, value: i32) {
        let mut buf = [0u8; 4];
        match self {
            Endianness::Little => LittleEndian::write_i32(&mut buf, value),
            Endianness::Big => BigEndian::write_i32(&mut buf, value),
        }
        out.extend_from_slice(&buf);
    }

    /// nom parser for one integer in this byte order.
    pub(crate) fn parse_i32(self, input: &[u8]) -> IResult<&[u8], i32> {
        nom::number::complete::i32(self.into())(input)
    }

    /// nom parser for one double in this byte order.
    pub(crate) fn parse_f64(self, input: &[u8]) -> IResult<&[u8], f64> {
        nom::number::complete::f64(self.into())(input)
    }
}

impl From<Endianness> for nom::number::Endianness {
    fn from(endianness: Endianness) -> Self {
        match endianness {
            Endianness::Little => nom::number::Endianness::Little,
            Endianness::Big => nom::number::Endianness::Big,
        }
    }
}

/// Decoded DAF file record.
///
/// Text fields are trimmed of their blank padding.
#[derive(Debug, PartialEq, Clone)]
pub struct DAFHeader {
    /// Identifier word, e.g. `"DAF/SPK"`.
    pub idword: String,
    /// Internal kernel name (60 bytes on disk).
    pub internal_filename: String,
    /// Number of double precision components in each summary (ND).
    pub nd: i32,
    /// Number of integer components in each summary (NI).
    pub ni: i32,
    /// Record number of the first summary record.
    pub fward: i32,
    /// Record number of the last summary record.
    pub bward: i32,
    /// First free word address (1-based).
    pub free: i32,
    /// Byte order the numeric data was written with.
    pub endianness: Endianness,
}

impl DAFHeader {
    /// Decode the fixed fields of a file record in a known byte order.
    ///
    /// The FTP validation string is left to [`DAFHeader::read`], since legacy
    /// files carry no such string.
    ///
    /// Arguments
    /// -----------------
    /// * `input`: The first bytes of the file, at least 96 bytes long.
    /// * `endianness`: Byte order used to decode the integer fields.
    ///
    /// Return
    /// ----------
    /// * An [`IResult`] holding the remaining input and the decoded header.
    pub fn parse(input: &[u8], endianness: Endianness) -> IResult<&[u8], Self> {
        let (input, idword) = take(8usize)(input)?;
        let (input, nd) = endianness.parse_i32(input)?;
        let (input, ni) = endianness.parse_i32(input)?;
        let (input, ifname) = take(60usize)(input)?;
        let (input, fward) = endianness.parse_i32(input)?;
        let (input, bward) = endianness.parse_i32(input)?;
        let (input, free) = endianness.parse_i32(input)?;
        let (input, _locfmt) = take(8usize)(input)?;
        Ok((
            input,
            DAFHeader {
                idword: trim_text(idword),
                internal_filename: trim_text(ifname),
                nd,
                ni,
                fward,
                bward,
                free,
                endianness,
            },
        ))
    }

    /// Detect the byte order of a file record, decode and validate it.
    ///
    /// Arguments
    /// -----------------
    /// * `record`: The first [`RECORD_BYTES`] bytes of the file.
    ///
    /// Return
    /// ----------
    /// * The validated header, or [`EphemError::Format`] when the record is
    ///   short, carries an unknown identifier or byte-order tag, has a damaged
    ///   FTP string, or declares an impossible summary layout.
    ///
    /// See also
    /// ------------
    /// * [`DAFHeader::parse`] – Field decoder once the byte order is known.
    pub fn read(record: &[u8]) -> Result<Self> {
        if record.len() < RECORD_BYTES {
            return Err(EphemError::Format(format!(
                "file record is {} bytes long, expected {RECORD_BYTES}",
                record.len()
            )));
        }

        let idword = &record[0..8];
        let endianness = if idword == b"NAIF/DAF" {
            [Endianness::Little, Endianness::Big]
                .into_iter()
                .find(|e| e.read_i32(&record[8..12]) == 2)
                .ok_or_else(|| {
                    EphemError::Format(
                        "legacy NAIF/DAF file with ND != 2 in either byte order".into(),
                    )
                })?
        } else if idword.starts_with(b"DAF/") {
            if &record[FTPSTR_OFFSET..FTPSTR_OFFSET + FTPSTR.len()] != FTPSTR {
                return Err(EphemError::Format(
                    "FTP validation string is damaged (was the file transferred in ASCII mode?)"
                        .into(),
                ));
            }
            Endianness::from_locfmt(&record[88..96]).ok_or_else(|| {
                EphemError::Format(format!(
                    "unknown binary format {:?}",
                    String::from_utf8_lossy(&record[88..96])
                ))
            })?
        } else {
            return Err(EphemError::Format(format!(
                "file starts with {:?}, not a DAF identifier",
                String::from_utf8_lossy(idword)
            )));
        };

        let (_, header) = Self::parse(record, endianness)?;
        header.validate()?;
        Ok(header)
    }

    fn validate(&self) -> Result<()> {
        if !(0..=124).contains(&self.nd) || !(2..=250).contains(&self.ni) {
            return Err(EphemError::Format(format!(
                "summary layout ND={} NI={} is out of range",
                self.nd, self.ni
            )));
        }
        if self.summary_words() + SUMMARY_CONTROL_WORDS > WORDS_PER_RECORD {
            return Err(EphemError::Format(format!(
                "a summary of {} words does not fit in a summary record",
                self.summary_words()
            )));
        }
        if self.fward < 2 || self.bward < self.fward {
            return Err(EphemError::Format(format!(
                "summary record pointers FWARD={} BWARD={} are invalid",
                self.fward, self.bward
            )));
        }
        Ok(())
    }

    /// Size of one packed summary in words: `ND + ceil(NI / 2)`.
    pub fn summary_words(&self) -> usize {
        self.nd as usize + (self.ni as usize).div_ceil(2)
    }

    /// Size of one packed summary (and of one name slot) in bytes.
    pub fn summary_bytes(&self) -> usize {
        self.summary_words() * 8
    }

    /// Maximum number of summaries one summary record can hold.
    pub fn summaries_per_record(&self) -> usize {
        (WORDS_PER_RECORD - SUMMARY_CONTROL_WORDS) / self.summary_words()
    }
}

fn trim_text(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes)
        .trim_end_matches(['\0', ' '])
        .to_string()
}

impl fmt::Display for DAFHeader {
    /// Render a fixed-width table summarizing the file record.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const LABEL_WIDTH: usize = 18;
        const VALUE_WIDTH: usize = 50;

        let border = format!(
            "+{:-<label$}+{:-<value$}+",
            "",
            "",
            label = LABEL_WIDTH + 1,
            value = VALUE_WIDTH + 1
        );
        let rows = [
            ("ID Word", format!("{} (Format ID)", self.idword)),
            ("Internal Name", self.internal_filename.clone()),
            ("ND (doubles)", format!("{} doubles per summary", self.nd)),
            ("NI (integers)", format!("{} integers per summary", self.ni)),
            ("Forward Ptr", format!("first summary record: {}", self.fward)),
            ("Backward Ptr", format!("last summary record: {}", self.bward)),
            ("Free Addr", format!("next free word: {}", self.free)),
            ("Binary Format", self.endianness.locfmt().to_string()),
        ];

        writeln!(f, "{border}")?;
        writeln!(
            f,
            "| {:<label$}| {:<value$}|",
            "DAF File Record",
            "",
            label = LABEL_WIDTH,
            value = VALUE_WIDTH
        )?;
        writeln!(f, "{border}")?;
        for (label, value) in rows {
            writeln!(
                f,
                "| {:<label$}| {:<value$}|",
                label,
                value,
                label = LABEL_WIDTH,
                value = VALUE_WIDTH
            )?;
        }
        writeln!(f, "{border}")
    }
}

#[cfg(test)]
mod test_daf_header {
    use super::*;

    fn file_record(idword: &[u8; 8], locfmt: &[u8; 8], endianness: Endianness) -> Vec<u8> {
        let mut record = Vec::with_capacity(RECORD_BYTES);
        record.extend_from_slice(idword);
        endianness.write_i32(&mut record, 2);
        endianness.write_i32(&mut record, 6);
        record.extend_from_slice(&[b' '; 60]);
        endianness.write_i32(&mut record, 4);
        endianness.write_i32(&mut record, 4);
        endianness.write_i32(&mut record, 1_000);
        record.extend_from_slice(locfmt);
        record.resize(FTPSTR_OFFSET, 0);
        record.extend_from_slice(FTPSTR);
        record.resize(RECORD_BYTES, 0);
        record
    }

    #[test]
    fn test_read_little_endian() {
        let record = file_record(b"DAF/SPK ", b"LTL-IEEE", Endianness::Little);
        let header = DAFHeader::read(&record).unwrap();
        assert_eq!(header.idword, "DAF/SPK");
        assert_eq!((header.nd, header.ni), (2, 6));
        assert_eq!((header.fward, header.bward, header.free), (4, 4, 1_000));
        assert_eq!(header.endianness, Endianness::Little);
        assert_eq!(header.summary_words(), 5);
        assert_eq!(header.summaries_per_record(), 25);
    }

    #[test]
    fn test_read_big_endian() {
        let record = file_record(b"DAF/SPK ", b"BIG-IEEE", Endianness::Big);
        let header = DAFHeader::read(&record).unwrap();
        assert_eq!(header.endianness, Endianness::Big);
        assert_eq!(header.fward, 4);
    }

    #[test]
    fn test_legacy_idword_detects_byte_order() {
        let mut record = file_record(b"NAIF/DAF", b"\0\0\0\0\0\0\0\0", Endianness::Big);
        record[FTPSTR_OFFSET..FTPSTR_OFFSET + FTPSTR.len()].fill(0);
        let header = DAFHeader::read(&record).unwrap();
        assert_eq!(header.endianness, Endianness::Big);
        assert_eq!(header.nd, 2);
    }

    #[test]
    fn test_rejected_records() {
        let record = file_record(b"XYZ/SPK ", b"LTL-IEEE", Endianness::Little);
        assert!(matches!(DAFHeader::read(&record), Err(EphemError::Format(_))));

        let record = file_record(b"DAF/SPK ", b"VAX-GFLT", Endianness::Little);
        assert!(matches!(DAFHeader::read(&record), Err(EphemError::Format(_))));

        let mut record = file_record(b"DAF/SPK ", b"LTL-IEEE", Endianness::Little);
        record[FTPSTR_OFFSET + 8] = b'\n';
        assert!(matches!(DAFHeader::read(&record), Err(EphemError::Format(_))));

        let record = file_record(b"DAF/SPK ", b"LTL-IEEE", Endianness::Little);
        assert!(matches!(
            DAFHeader::read(&record[..512]),
            Err(EphemError::Format(_))
        ));
    }

    #[test]
    fn test_display_daf_header() {
        let header = DAFHeader {
            idword: "DAF/SPK".to_string(),
            internal_filename: "NIO2SPK".to_string(),
            nd: 2,
            ni: 6,
            fward: 62,
            bward: 62,
            free: 14974889,
            endianness: Endianness::Little,
        };

        let expected = r#"+-------------------+---------------------------------------------------+
| DAF File Record   |                                                   |
+-------------------+---------------------------------------------------+
| ID Word           | DAF/SPK (Format ID)                               |
| Internal Name     | NIO2SPK                                           |
| ND (doubles)      | 2 doubles per summary                             |
| NI (integers)     | 6 integers per summary                            |
| Forward Ptr       | first summary record: 62                          |
| Backward Ptr      | last summary record: 62                           |
| Free Addr         | next free word: 14974889                          |
| Binary Format     | LTL-IEEE                                          |
+-------------------+---------------------------------------------------+
"#;
        assert_eq!(format!("{header}"), expected);
    }
}
