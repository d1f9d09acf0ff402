//! Text header of JPL planetary ephemerides, read from the SPK comment area.
//!
//! JPL kernels such as `de440.bsp` copy the release header into their
//! comments:
//!
//! ```text
//! JPL planetary and lunar ephemeris DE440
//! Integrated 25 June 2020
//!
//! Time span covered by ephemeris:
//!
//! 31-DEC-1549 00:00 to   25-JAN-2650 00:00
//! JD   2287184.5   to   JD   2688976.5
//! ```
//!
//! The parser skips any text around these lines and tolerates variable
//! spacing. The integration date line is optional. Kernels without such a
//! header (excerpts of non-JPL files, synthetic kernels) simply have none.

use std::fmt;

use nom::{
    bytes::complete::{tag, take_till1, take_until},
    character::complete::{multispace0, not_line_ending, space1},
    combinator::opt,
    number::complete::double,
    sequence::preceded,
    IResult, Parser,
};

const VERSION_MARKER: &str = "JPL planetary and lunar ephemeris";
const CREATION_MARKER: &str = "Integrated ";
const SPAN_MARKER: &str = "Time span covered by ephemeris:";

/// Release information of a JPL ephemeris.
#[derive(Debug, PartialEq, Clone)]
pub struct JPLEphemHeader {
    /// Ephemeris name, e.g. `"DE440"`.
    pub version: String,
    pub creation_date: Option<String>,
    /// Calendar start of the coverage, as written (`31-DEC-1549 00:00`).
    pub start_ephem: String,
    pub end_ephem: String,
    pub start_jd: f64,
    pub end_jd: f64,
}

fn version(input: &str) -> IResult<&str, &str> {
    let (input, _) = take_until(VERSION_MARKER)(input)?;
    let (input, _) = (tag(VERSION_MARKER), space1).parse(input)?;
    take_till1(|c: char| c.is_whitespace())(input)
}

fn creation_date(input: &str) -> IResult<&str, Option<&str>> {
    // Only look before the coverage block, so a stray "Integrated" further
    // down the comments is not picked up.
    let block_end = input.find(SPAN_MARKER).unwrap_or(input.len());
    let (_, date) = opt(preceded(
        (take_until(CREATION_MARKER), tag(CREATION_MARKER)),
        not_line_ending,
    ))
    .parse(&input[..block_end])?;
    Ok((input, date.map(str::trim)))
}

fn date_range(input: &str) -> IResult<&str, (&str, &str)> {
    let (input, _) = (take_until(SPAN_MARKER), tag(SPAN_MARKER), multispace0).parse(input)?;
    let (input, (start, _, end)) =
        (take_until(" to "), (tag(" to"), space1), not_line_ending).parse(input)?;
    Ok((input, (start.trim(), end.trim())))
}

fn jd_range(input: &str) -> IResult<&str, (f64, f64)> {
    let (input, (_, start_jd, _, _, end_jd)) = (
        (multispace0, tag("JD"), space1),
        |s| double(s),
        (space1, tag("to"), space1),
        (tag("JD"), space1),
        |s| double(s),
    )
        .parse(input)?;
    Ok((input, (start_jd, end_jd)))
}

impl JPLEphemHeader {
    /// Parse the header out of a larger comment text.
    ///
    /// Return
    /// ----------
    /// * The remaining text after the Julian date line, and the header.
    pub fn parse(input: &str) -> IResult<&str, Self> {
        let (input, version) = version(input)?;
        let (input, creation_date) = creation_date(input)?;
        let (input, (start_ephem, end_ephem)) = date_range(input)?;
        let (input, (start_jd, end_jd)) = jd_range(input)?;
        Ok((
            input,
            JPLEphemHeader {
                version: version.to_string(),
                creation_date: creation_date.map(str::to_string),
                start_ephem: start_ephem.to_string(),
                end_ephem: end_ephem.to_string(),
                start_jd,
                end_jd,
            },
        ))
    }

    /// Header found in a comment area, if any.
    pub fn from_comments(comments: &str) -> Option<Self> {
        Self::parse(comments).ok().map(|(_, header)| header)
    }
}

impl fmt::Display for JPLEphemHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const LABEL_WIDTH: usize = 20;
        const VALUE_WIDTH: usize = 30;

        let border = format!(
            "+{:-<label$}+{:-<value$}+",
            "",
            "",
            label = LABEL_WIDTH + 2,
            value = VALUE_WIDTH + 2
        );
        let rows = [
            ("Version", self.version.clone()),
            (
                "Creation Date",
                self.creation_date.clone().unwrap_or_else(|| "-".into()),
            ),
            ("Start Ephem", self.start_ephem.clone()),
            ("End Ephem", self.end_ephem.clone()),
            ("Start JD", format!("{:.6}", self.start_jd)),
            ("End JD", format!("{:.6}", self.end_jd)),
        ];

        writeln!(
            f,
            "+{:^label$}+{:^value$}+",
            "JPL Ephemeris Header",
            "",
            label = LABEL_WIDTH + 2,
            value = VALUE_WIDTH + 2
        )?;
        writeln!(f, "{border}")?;
        for (label, value) in rows {
            writeln!(f, "| {label:<LABEL_WIDTH$} | {value:<VALUE_WIDTH$} |")?;
        }
        writeln!(f, "{border}")
    }
}

#[cfg(test)]
mod test_jpl_header {
    use super::*;

    const DE440_COMMENTS: &str = "; de440.bsp LOG FILE\n\
        ;\n\
        JPL planetary and lunar ephemeris DE440\n\
        Integrated 25 June 2020\n\
        \n\
        Time span covered by ephemeris:\n\
        \n\
        31-DEC-1549 00:00 to   25-JAN-2650 00:00\n\
        JD   2287184.5   to   JD   2688976.5\n\
        \n\
        Bodies on the file:\n";

    fn de440() -> JPLEphemHeader {
        JPLEphemHeader {
            version: "DE440".to_string(),
            creation_date: Some("25 June 2020".to_string()),
            start_ephem: "31-DEC-1549 00:00".to_string(),
            end_ephem: "25-JAN-2650 00:00".to_string(),
            start_jd: 2287184.5,
            end_jd: 2688976.5,
        }
    }

    #[test]
    fn test_parse_from_comments() {
        let (rest, header) = JPLEphemHeader::parse(DE440_COMMENTS).unwrap();
        assert_eq!(header, de440());
        assert!(rest.contains("Bodies on the file:"));
    }

    #[test]
    fn test_missing_creation_line() {
        let text = "JPL planetary and lunar ephemeris DE421\n\
            Time span covered by ephemeris:\n\
            09-JUL-1899 00:00 to 09-JUL-2053 00:00\n\
            JD 2414864.5 to JD 2471184.5\n";
        let header = JPLEphemHeader::from_comments(text).unwrap();
        assert_eq!(header.version, "DE421");
        assert_eq!(header.creation_date, None);
        assert_eq!(header.start_ephem, "09-JUL-1899 00:00");
        assert_eq!(header.end_jd, 2471184.5);
    }

    #[test]
    fn test_no_header() {
        assert_eq!(JPLEphemHeader::from_comments("; excerpt of a file\n"), None);
        assert_eq!(JPLEphemHeader::from_comments(""), None);
    }

    #[test]
    fn test_jpl_header_display() {
        let expected = r#"+ JPL Ephemeris Header +                                +
+----------------------+--------------------------------+
| Version              | DE440                          |
| Creation Date        | 25 June 2020                   |
| Start Ephem          | 31-DEC-1549 00:00              |
| End Ephem            | 25-JAN-2650 00:00              |
| Start JD             | 2287184.500000                 |
| End JD               | 2688976.500000                 |
+----------------------+--------------------------------+
"#;
        assert_eq!(format!("{}", de440()), expected);
    }
}
