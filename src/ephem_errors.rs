use camino::Utf8PathBuf;
use thiserror::Error;

/// Every failure the kernel reader, the series evaluator and the public API can report.
///
/// Errors are deterministic functions of the kernel contents and of the query:
/// nothing in here is transient, so callers never need to retry.
#[derive(Error, Debug)]
pub enum EphemError {
    #[error("Malformed ephemeris kernel: {0}")]
    Format(String),

    #[error("Time {time} is outside the covered span {start} .. {end} (ET seconds)")]
    OutOfRange { time: f64, start: f64, end: f64 },

    #[error("Unknown target for this kernel: {0}")]
    UnknownTarget(String),

    #[error("Unable to read ephemeris kernel {path}: {source}")]
    Io {
        path: Utf8PathBuf,
        source: std::io::Error,
    },

    #[error("Unable to perform stream operation: {0}")]
    Stream(#[from] std::io::Error),

    #[error("Ephemeris kernel not found at: {0}")]
    KernelNotFound(String),

    #[error("Invalid ephemeris kernel source: {0}")]
    InvalidKernelSource(String),

    #[error("Invalid NAIF version: {0}")]
    InvalidNaifVersion(String),

    #[error("Error during the nom parsing: {0}")]
    NomParsing(String),

    #[error("Invalid calendar date: {0}")]
    InvalidDate(String),

    #[error("Invalid SPK data type: {0}")]
    InvalidSpkDataType(i32),

    #[error("CSV output error: {0}")]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, EphemError>;

impl EphemError {
    pub(crate) fn io(path: impl Into<Utf8PathBuf>, source: std::io::Error) -> Self {
        EphemError::Io {
            path: path.into(),
            source,
        }
    }
}

impl<E: std::fmt::Debug> From<nom::Err<E>> for EphemError {
    fn from(err: nom::Err<E>) -> Self {
        EphemError::NomParsing(format!("{err:?}"))
    }
}

impl PartialEq for EphemError {
    fn eq(&self, other: &Self) -> bool {
        use EphemError::*;
        match (self, other) {
            (Format(a), Format(b)) => a == b,
            (
                OutOfRange {
                    time: t1,
                    start: s1,
                    end: e1,
                },
                OutOfRange {
                    time: t2,
                    start: s2,
                    end: e2,
                },
            ) => t1 == t2 && s1 == s2 && e1 == e2,
            (UnknownTarget(a), UnknownTarget(b)) => a == b,
            (KernelNotFound(a), KernelNotFound(b)) => a == b,
            (InvalidKernelSource(a), InvalidKernelSource(b)) => a == b,
            (InvalidNaifVersion(a), InvalidNaifVersion(b)) => a == b,
            (NomParsing(a), NomParsing(b)) => a == b,
            (InvalidDate(a), InvalidDate(b)) => a == b,
            (InvalidSpkDataType(a), InvalidSpkDataType(b)) => a == b,

            // io and csv errors carry no comparable payload: same variant is enough
            (Io { path: a, .. }, Io { path: b, .. }) => a == b,
            (Stream(_), Stream(_)) => true,
            (Csv(_), Csv(_)) => true,

            _ => false,
        }
    }
}
