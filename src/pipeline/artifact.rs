//! Defines the self-describing byte format for a single encoded column.
//! This module is the single source of truth for serialization, deserialization,
//! and efficient metadata peeking of the artifact.
//!
//! Layout (all integers little-endian):
//!
//! ```text
//! magic "BCOL" (4) | format_version u16 | json_len u32 | descriptor JSON | data_len u64 | data
//! ```

use std::io::{Cursor, Read};

use crate::bridge::format::{
    descriptors_from_json, descriptors_to_json, COLUMN_FORMAT_VERSION, COLUMN_MAGIC,
};
use crate::error::CodecError;
use crate::pipeline::models::EncodedColumn;

//==================================================================================
// Format Constants
//==================================================================================
/// The minimum possible size of a valid column artifact in bytes.
const MIN_ARTIFACT_SIZE: usize = 18; // magic(4) + ver(2) + json_len(4) + data_len(8)
/// Limit on the descriptor JSON to prevent OOM from a malformed length. (16MB)
const MAX_DESCRIPTOR_JSON_LEN: usize = 16 * 1024 * 1024;

/// Metadata extracted from an artifact's header by [`EncodedColumn::peek_info`],
/// without copying the data payload.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct HeaderInfo {
    pub format_version: u16,
    /// The descriptor list as a UTF-8 JSON string.
    pub descriptor_json: String,
    /// Size of everything before the payload, in bytes.
    pub header_size: usize,
    pub data_size: usize,
}

impl EncodedColumn {
    /// Serializes the column into a single framed byte vector.
    pub fn to_bytes(&self) -> Result<Vec<u8>, CodecError> {
        let json = descriptors_to_json(&self.encoding)?;
        if json.len() > MAX_DESCRIPTOR_JSON_LEN {
            return Err(CodecError::ArtifactFormat(format!(
                "Descriptor JSON length ({}) exceeds maximum allowed size ({})",
                json.len(),
                MAX_DESCRIPTOR_JSON_LEN
            )));
        }

        let mut buf = Vec::with_capacity(MIN_ARTIFACT_SIZE + json.len() + self.data.len());
        buf.extend_from_slice(COLUMN_MAGIC);
        buf.extend_from_slice(&COLUMN_FORMAT_VERSION.to_le_bytes());
        buf.extend_from_slice(&(json.len() as u32).to_le_bytes());
        buf.extend_from_slice(json.as_bytes());
        buf.extend_from_slice(&(self.data.len() as u64).to_le_bytes());
        buf.extend_from_slice(&self.data);
        Ok(buf)
    }

    /// Deserializes a full artifact, copying the payload out of `bytes`.
    ///
    /// Unknown descriptor kinds are rejected with `CodecError::UnknownEncoding`.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CodecError> {
        let info = Self::peek_info(bytes)?;
        let encoding = descriptors_from_json(&info.descriptor_json)?;
        let data = bytes[info.header_size..info.header_size + info.data_size].to_vec();
        Ok(Self { data, encoding })
    }

    /// Parses the artifact header without touching the payload.
    pub fn peek_info(bytes: &[u8]) -> Result<HeaderInfo, CodecError> {
        if bytes.len() < MIN_ARTIFACT_SIZE {
            return Err(CodecError::ArtifactFormat(format!(
                "Artifact is too small to be valid. Minimum size: {}, got: {}",
                MIN_ARTIFACT_SIZE,
                bytes.len()
            )));
        }

        let mut cursor = Cursor::new(bytes);
        let map_err = |e: std::io::Error| CodecError::ArtifactFormat(e.to_string());

        let mut magic_buf = [0u8; 4];
        cursor.read_exact(&mut magic_buf).map_err(map_err)?;
        if magic_buf != *COLUMN_MAGIC {
            return Err(CodecError::ArtifactFormat(
                "Invalid column magic number".into(),
            ));
        }

        let mut u16_buf = [0u8; 2];
        cursor.read_exact(&mut u16_buf).map_err(map_err)?;
        let version = u16::from_le_bytes(u16_buf);
        if version != COLUMN_FORMAT_VERSION {
            return Err(CodecError::ArtifactFormat(format!(
                "Unsupported column format version: expected {}, got {}",
                COLUMN_FORMAT_VERSION, version
            )));
        }

        let mut u32_buf = [0u8; 4];
        cursor.read_exact(&mut u32_buf).map_err(map_err)?;
        let json_len = u32::from_le_bytes(u32_buf) as usize;
        if json_len > MAX_DESCRIPTOR_JSON_LEN {
            return Err(CodecError::ArtifactFormat(format!(
                "Descriptor JSON length ({}) exceeds maximum allowed size ({})",
                json_len, MAX_DESCRIPTOR_JSON_LEN
            )));
        }

        let json_start = cursor.position() as usize;
        // The data length field follows the JSON.
        if bytes.len() < json_start + json_len + 8 {
            return Err(CodecError::ArtifactFormat(
                "Descriptor length exceeds buffer size".into(),
            ));
        }
        let descriptor_json = std::str::from_utf8(&bytes[json_start..json_start + json_len])
            .map_err(|e| CodecError::ArtifactFormat(e.to_string()))?
            .to_string();
        cursor.set_position((json_start + json_len) as u64);

        let mut u64_buf = [0u8; 8];
        cursor.read_exact(&mut u64_buf).map_err(map_err)?;
        let data_size = usize::try_from(u64::from_le_bytes(u64_buf))
            .map_err(|e| CodecError::ArtifactFormat(e.to_string()))?;
        let header_size = cursor.position() as usize;

        if header_size.saturating_add(data_size) > bytes.len() {
            return Err(CodecError::ArtifactFormat(
                "Sum of declared header and data sizes exceeds buffer length.".into(),
            ));
        }

        Ok(HeaderInfo {
            format_version: version,
            descriptor_json,
            header_size,
            data_size,
        })
    }
}
