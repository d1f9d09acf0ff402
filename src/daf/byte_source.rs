use std::{fs::File, io::Read, ops::Deref};

use camino::Utf8Path;
use memmap2::Mmap;
use tracing::debug;

use crate::constants::RECORD_BYTES;
use crate::ephem_errors::{EphemError, Result};

/// Read-only bytes backing a [`crate::daf::Daf`].
///
/// Files are memory mapped so that only the pages a query touches are ever
/// read from disk. Streams cannot be mapped and are read fully into memory.
/// Either way the bytes are released when the source is dropped.
#[derive(Debug)]
pub enum ByteSource {
    Mapped(Mmap),
    Owned(Vec<u8>),
}

impl ByteSource {
    /// Map a kernel file read-only.
    ///
    /// Files shorter than one DAF record are rejected before mapping.
    pub fn map_file(path: &Utf8Path) -> Result<Self> {
        let file = File::open(path).map_err(|err| EphemError::io(path, err))?;
        let length = file
            .metadata()
            .map_err(|err| EphemError::io(path, err))?
            .len();
        if length < RECORD_BYTES as u64 {
            return Err(EphemError::Format(format!(
                "{path} is {length} bytes long, shorter than one DAF record"
            )));
        }

        // SAFETY: the map is read-only and every access is bounds checked
        // against its length. Truncating the file while it is mapped is outside
        // what this crate can guard against.
        let map = unsafe { Mmap::map(&file) }.map_err(|err| EphemError::io(path, err))?;
        debug!(%path, bytes = map.len(), "memory mapped kernel");
        Ok(ByteSource::Mapped(map))
    }

    /// Drain a stream into an owned buffer.
    pub fn read_from<R: Read>(mut reader: R) -> Result<Self> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        debug!(bytes = bytes.len(), "read kernel from stream");
        Ok(ByteSource::Owned(bytes))
    }
}

impl Deref for ByteSource {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        match self {
            ByteSource::Mapped(map) => &map[..],
            ByteSource::Owned(bytes) => bytes.as_slice(),
        }
    }
}
