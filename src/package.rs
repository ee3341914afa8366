use std::io::{Read, Write};

use serde::{Deserialize, Serialize};

use crate::cast::Cast;
use crate::config::SequencerConfig;
use crate::error::{DialogueError, DialogueResult};
use crate::graph::DialogueGraph;

/// Binary format magic bytes.
const PACKAGE_MAGIC: [u8; 4] = *b"DLGS";
/// Format version.
const PACKAGE_VERSION: u16 = 1;
const HEADER_LEN: usize = 16;

/// Package metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageMetadata {
    pub title: String,
    /// BCP 47 tag of the authored lines, e.g. "ar" or "en-GB".
    pub locale: String,
}

impl PackageMetadata {
    pub fn new(title: impl Into<String>, locale: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            locale: locale.into(),
        }
    }
}

/// Everything needed to play one dialogue: graph, cast and playback config.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DialoguePackage {
    pub metadata: PackageMetadata,
    pub graph: DialogueGraph,
    pub cast: Cast,
    pub config: SequencerConfig,
}

impl DialoguePackage {
    pub fn new(metadata: PackageMetadata, graph: DialogueGraph, cast: Cast) -> Self {
        Self {
            metadata,
            graph,
            cast,
            config: SequencerConfig::default(),
        }
    }

    pub fn with_config(mut self, config: SequencerConfig) -> Self {
        self.config = config;
        self
    }
}

/// Serialize a package to a writer.
///
/// Binary format:
/// `[Magic "DLGS" 4B][Version 2B][Flags 2B][Size 4B][CRC32 4B][Bincode Body]`
pub fn serialize_package<W: Write>(package: &DialoguePackage, writer: &mut W) -> DialogueResult<usize> {
    let body = bincode::serialize(package)?;

    let crc = crc32fast::hash(&body);
    let size = u32::try_from(body.len())
        .map_err(|_| DialogueError::InvalidPackage(format!("body too large: {} bytes", body.len())))?;
    let flags: u16 = 0;

    writer.write_all(&PACKAGE_MAGIC)?;
    writer.write_all(&PACKAGE_VERSION.to_le_bytes())?;
    writer.write_all(&flags.to_le_bytes())?;
    writer.write_all(&size.to_le_bytes())?;
    writer.write_all(&crc.to_le_bytes())?;
    writer.write_all(&body)?;

    Ok(HEADER_LEN + body.len())
}

/// Deserialize and validate a package from a reader.
pub fn deserialize_package<R: Read>(reader: &mut R) -> DialogueResult<DialoguePackage> {
    let mut header = [0u8; HEADER_LEN];
    reader.read_exact(&mut header)?;

    if header[0..4] != PACKAGE_MAGIC {
        return Err(DialogueError::InvalidPackage(
            "invalid magic bytes: expected DLGS".into(),
        ));
    }

    let version = u16::from_le_bytes([header[4], header[5]]);
    if version != PACKAGE_VERSION {
        return Err(DialogueError::InvalidPackage(format!(
            "unsupported version: {version}"
        )));
    }

    let _flags = u16::from_le_bytes([header[6], header[7]]);
    let size = u32::from_le_bytes([header[8], header[9], header[10], header[11]]) as usize;
    let expected_crc = u32::from_le_bytes([header[12], header[13], header[14], header[15]]);

    // Grow with the bytes actually present instead of trusting the header size.
    let mut body = Vec::new();
    reader.take(size as u64).read_to_end(&mut body)?;
    if body.len() != size {
        return Err(DialogueError::InvalidPackage(format!(
            "truncated body: header declares {size} bytes, got {}",
            body.len()
        )));
    }

    let actual_crc = crc32fast::hash(&body);
    if actual_crc != expected_crc {
        return Err(DialogueError::InvalidPackage(format!(
            "CRC mismatch: expected {expected_crc:#010x}, got {actual_crc:#010x}"
        )));
    }

    let package: DialoguePackage = bincode::deserialize(&body)?;
    package.graph.validate()?;
    package.config.validate()?;
    tracing::debug!(
        title = %package.metadata.title,
        nodes = package.graph.len(),
        "dialogue package loaded"
    );
    Ok(package)
}
