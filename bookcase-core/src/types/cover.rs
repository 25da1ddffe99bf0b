//! Cover images attached to books

use crate::error::CoverError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Image formats recognized from their leading bytes
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ImageFormat {
    Jpeg,
    Png,
    Gif,
    Webp,
    Bmp,
}

impl ImageFormat {
    /// Detect the format from magic bytes
    pub fn sniff(data: &[u8]) -> Option<Self> {
        match data {
            [0xFF, 0xD8, 0xFF, ..] => Some(Self::Jpeg),
            [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, ..] => Some(Self::Png),
            [b'G', b'I', b'F', b'8', b'7' | b'9', b'a', ..] => Some(Self::Gif),
            [b'R', b'I', b'F', b'F', _, _, _, _, b'W', b'E', b'B', b'P', ..] => Some(Self::Webp),
            [b'B', b'M', ..] => Some(Self::Bmp),
            _ => None,
        }
    }

    /// MIME type string (e.g., "image/jpeg")
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::Gif => "image/gif",
            Self::Webp => "image/webp",
            Self::Bmp => "image/bmp",
        }
    }
}

/// A cover image owned by a single book
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Cover {
    /// Detected image format
    pub format: ImageFormat,

    /// Raw image bytes
    #[serde(with = "base64_serde")]
    pub data: Vec<u8>,
}

impl Cover {
    /// Build a cover from raw bytes, rejecting anything that isn't a known image
    pub fn from_bytes(data: impl Into<Vec<u8>>) -> Result<Self, CoverError> {
        let data = data.into();
        if data.is_empty() {
            return Err(CoverError::Empty);
        }
        let format = ImageFormat::sniff(&data).ok_or(CoverError::UnrecognizedFormat)?;
        Ok(Self { format, data })
    }

    /// Read a cover from an image file on disk
    pub fn from_file(path: impl AsRef<Path>) -> crate::Result<Self> {
        let data = std::fs::read(path)?;
        Ok(Self::from_bytes(data)?)
    }

    pub fn mime_type(&self) -> &'static str {
        self.format.mime_type()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Base64 serialization for binary data
mod base64_serde {
    use base64::{engine::general_purpose::STANDARD, Engine};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(data: &[u8], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&STANDARD.encode(data))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        STANDARD.decode(&s).map_err(serde::de::Error::custom)
    }
}
