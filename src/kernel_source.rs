//! Where a kernel comes from.
//!
//! A kernel source is written as a short string:
//!
//! * `"naif:DE440"` – a JPL release stored in the kernel directory under its
//!   canonical file name (`de440.bsp`);
//! * `"path:/data/de421.bsp"` or a bare path – that exact file.
//!
//! The kernel directory is `$JPLEPHEM_KERNEL_DIR` when set, otherwise
//! `<platform cache dir>/jplephem`. Nothing is downloaded: a missing file is
//! reported as [`EphemError::KernelNotFound`].

use std::fmt;
use std::str::FromStr;

use camino::{Utf8Path, Utf8PathBuf};
use directories::BaseDirs;
use tracing::debug;

use crate::ephem_errors::{EphemError, Result};

/// Environment variable overriding the kernel directory.
pub const KERNEL_DIR_ENV: &str = "JPLEPHEM_KERNEL_DIR";

/// JPL planetary ephemeris releases distributed as SPK files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NaifVersion {
    DE405,
    DE421,
    DE422,
    DE430,
    DE430t,
    DE431p1,
    DE431p2,
    DE432s,
    DE435,
    DE438,
    DE440,
    DE440s,
    DE441p1,
    DE441p2,
    DE442,
}

impl NaifVersion {
    const NAMES: [(NaifVersion, &'static str); 15] = [
        (NaifVersion::DE405, "de405"),
        (NaifVersion::DE421, "de421"),
        (NaifVersion::DE422, "de422"),
        (NaifVersion::DE430, "de430"),
        (NaifVersion::DE430t, "de430t"),
        (NaifVersion::DE431p1, "de431_part-1"),
        (NaifVersion::DE431p2, "de431_part-2"),
        (NaifVersion::DE432s, "de432s"),
        (NaifVersion::DE435, "de435"),
        (NaifVersion::DE438, "de438"),
        (NaifVersion::DE440, "de440"),
        (NaifVersion::DE440s, "de440s"),
        (NaifVersion::DE441p1, "de441_part-1"),
        (NaifVersion::DE441p2, "de441_part-2"),
        (NaifVersion::DE442, "de442"),
    ];

    fn stem(self) -> &'static str {
        Self::NAMES
            .iter()
            .find(|(version, _)| *version == self)
            .map_or("", |(_, stem)| stem)
    }

    /// Canonical file name of the release, e.g. `"de440.bsp"`.
    pub fn filename(self) -> String {
        format!("{}.bsp", self.stem())
    }
}

impl FromStr for NaifVersion {
    type Err = EphemError;

    /// Parse a release name such as `"DE440"` or `"de441_part-1"`, ignoring
    /// case and a trailing `.bsp`.
    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_ascii_lowercase();
        let wanted = wanted.strip_suffix(".bsp").unwrap_or(&wanted);
        Self::NAMES
            .iter()
            .find(|(_, stem)| *stem == wanted)
            .map(|(version, _)| *version)
            .ok_or_else(|| EphemError::InvalidNaifVersion(s.to_string()))
    }
}

impl fmt::Display for NaifVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.stem().to_ascii_uppercase())
    }
}

/// A kernel location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KernelSource {
    Naif(NaifVersion),
    Path(Utf8PathBuf),
}

impl FromStr for KernelSource {
    type Err = EphemError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Err(EphemError::InvalidKernelSource("empty source".into()));
        }
        match s.split_once(':') {
            Some(("naif", version)) => Ok(KernelSource::Naif(version.parse()?)),
            Some(("path", path)) if !path.is_empty() => Ok(KernelSource::Path(path.into())),
            Some(("path", _)) => Err(EphemError::InvalidKernelSource(s.to_string())),
            // A one letter prefix is a Windows drive, not a scheme.
            Some((scheme, _)) if scheme.len() > 1 => {
                Err(EphemError::InvalidKernelSource(s.to_string()))
            }
            _ => Ok(KernelSource::Path(s.into())),
        }
    }
}

impl TryFrom<&str> for KernelSource {
    type Error = EphemError;

    fn try_from(s: &str) -> Result<Self> {
        s.parse()
    }
}

impl fmt::Display for KernelSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KernelSource::Naif(version) => write!(f, "naif:{version}"),
            KernelSource::Path(path) => write!(f, "path:{path}"),
        }
    }
}

/// Directory holding `naif:` kernels.
///
/// Return
/// ----------
/// * `$JPLEPHEM_KERNEL_DIR` if set and not empty, otherwise the `jplephem`
///   folder of the platform cache directory.
pub fn kernel_dir() -> Result<Utf8PathBuf> {
    if let Some(dir) = std::env::var_os(KERNEL_DIR_ENV).filter(|dir| !dir.is_empty()) {
        return Utf8PathBuf::from_path_buf(dir.into()).map_err(|dir| {
            EphemError::InvalidKernelSource(format!(
                "{KERNEL_DIR_ENV} is not valid UTF-8: {}",
                dir.display()
            ))
        });
    }
    let base_dir = BaseDirs::new()
        .ok_or_else(|| EphemError::KernelNotFound("no home directory to locate the cache".into()))?;
    let cache = Utf8Path::from_path(base_dir.cache_dir()).ok_or_else(|| {
        EphemError::InvalidKernelSource(format!(
            "cache directory is not valid UTF-8: {}",
            base_dir.cache_dir().display()
        ))
    })?;
    Ok(cache.join("jplephem"))
}

impl KernelSource {
    /// Path of the kernel file, checked to exist.
    ///
    /// See also
    /// ------------
    /// * [`KernelSource::resolve_in`] – Same with an explicit kernel directory.
    /// * [`kernel_dir`] – Directory used for `naif:` sources.
    pub fn resolve(&self) -> Result<Utf8PathBuf> {
        match self {
            KernelSource::Naif(_) => self.resolve_in(&kernel_dir()?),
            KernelSource::Path(_) => self.resolve_in(Utf8Path::new("")),
        }
    }

    /// Path of the kernel file, looking for `naif:` releases in `dir`.
    ///
    /// Return
    /// ----------
    /// * The file path, or [`EphemError::KernelNotFound`] if no such file
    ///   exists.
    pub fn resolve_in(&self, dir: &Utf8Path) -> Result<Utf8PathBuf> {
        let path = match self {
            KernelSource::Naif(version) => dir.join(version.filename()),
            KernelSource::Path(path) => path.clone(),
        };
        if !path.is_file() {
            return Err(EphemError::KernelNotFound(path.to_string()));
        }
        debug!(source = %self, %path, "resolved kernel source");
        Ok(path)
    }
}
