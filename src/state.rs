//! The state-persistence envelope (C5, spec §4.5): magic + version header, per-parameter
//! normalized payload, and an author-defined extension, written through a small stream
//! abstraction that bridges to whatever stream type the host format provides.

use std::fmt;

use crate::params::ParamRuntime;

/// The envelope's magic header, written as four ASCII bytes.
pub const MAGIC: [u8; 4] = *b"ZPLG";

/// A sink the framework and the author's [`Plugin::save()`][crate::plugin::Plugin::save] write
/// the state envelope into. Implemented by each wrapper over its host's native stream type.
pub trait StateWriter {
    /// Write `buf`, returning the number of bytes actually written.
    fn write(&mut self, buf: &[u8]) -> usize;
}

/// A source the framework and the author's [`Plugin::load()`][crate::plugin::Plugin::load] read
/// the state envelope from. Implemented by each wrapper over its host's native stream type.
pub trait StateReader {
    /// Read into `buf`, returning the number of bytes actually read.
    fn read(&mut self, buf: &mut [u8]) -> usize;
}

/// Why loading a state envelope failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateError {
    /// The stream didn't start with the expected four-byte magic.
    InvalidMagic,
    /// The stream ended before the header, the parameter payload, or the author extension could
    /// be fully read.
    TruncatedStream,
    /// The stream's version is newer than this build knows how to read.
    VersionTooNew { found: u32, max_supported: u32 },
}

impl fmt::Display for StateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StateError::InvalidMagic => write!(f, "state stream does not start with the 'ZPLG' magic"),
            StateError::TruncatedStream => write!(f, "state stream ended before it was fully read"),
            StateError::VersionTooNew { found, max_supported } => write!(
                f,
                "state was written by a newer version ({found}) than this build supports (max {max_supported})"
            ),
        }
    }
}

impl std::error::Error for StateError {}

fn read_exact(reader: &mut dyn StateReader, buf: &mut [u8]) -> Result<(), StateError> {
    let mut filled = 0;
    while filled < buf.len() {
        let read = reader.read(&mut buf[filled..]);
        if read == 0 {
            return Err(StateError::TruncatedStream);
        }
        filled += read;
    }
    Ok(())
}

fn write_all(writer: &mut dyn StateWriter, mut buf: &[u8]) -> Result<(), StateError> {
    while !buf.is_empty() {
        let written = writer.write(buf);
        if written == 0 {
            return Err(StateError::TruncatedStream);
        }
        buf = &buf[written..];
    }
    Ok(())
}

/// Write the envelope: magic, version, one little-endian `f32` per parameter (in declaration
/// order, normalized), then whatever `extension` writes.
pub fn save(
    writer: &mut dyn StateWriter,
    version: u32,
    params: &ParamRuntime,
    extension: impl FnOnce(&mut dyn StateWriter) -> bool,
) -> Result<(), StateError> {
    write_all(writer, &MAGIC)?;
    write_all(writer, &version.to_le_bytes())?;

    for index in 0..params.len() {
        write_all(writer, &params.normalized(index).to_le_bytes())?;
    }

    if !extension(writer) {
        log::error!("plugin's save() extension callback reported failure");
        return Err(StateError::TruncatedStream);
    }

    Ok(())
}

/// Read the envelope written by [`save()`]: validate the magic, read the version, restore each
/// parameter's normalized value (snapping its smoother, since a freshly loaded preset should not
/// ramp in), then hand the stream and the stored version to `extension` for migration.
///
/// `max_supported_version` rejects envelopes written by a newer build than this one, but only
/// when `strict` is set (`Plugin::STRICT_STATE_VERSIONING`); otherwise the version is passed
/// through to `extension` unconditionally, since most hosts never bump it and a hard rejection
/// would needlessly break forward-compatible migrations.
pub fn load(
    reader: &mut dyn StateReader,
    max_supported_version: u32,
    strict: bool,
    params: &ParamRuntime,
    extension: impl FnOnce(&mut dyn StateReader, u32) -> bool,
) -> Result<u32, StateError> {
    let mut magic = [0u8; 4];
    read_exact(reader, &mut magic)?;
    if magic != MAGIC {
        log::error!("state stream failed magic validation");
        return Err(StateError::InvalidMagic);
    }

    let mut version_bytes = [0u8; 4];
    read_exact(reader, &mut version_bytes)?;
    let version = u32::from_le_bytes(version_bytes);
    if strict && version > max_supported_version {
        return Err(StateError::VersionTooNew {
            found: version,
            max_supported: max_supported_version,
        });
    }

    for index in 0..params.len() {
        let mut value_bytes = [0u8; 4];
        read_exact(reader, &mut value_bytes)?;
        params.load_normalized(index, f32::from_le_bytes(value_bytes));
    }

    if !extension(reader, version) {
        log::error!("plugin's load() extension callback reported failure");
        return Err(StateError::TruncatedStream);
    }

    Ok(version)
}
