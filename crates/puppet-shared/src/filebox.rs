//! File handle exchanged with the backend as a JSON string.
//!
//! Only the forms this client produces or consumes are modelled: remote URLs,
//! inline base64 content, QR codes and backend-side uuids.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::error::{PuppetError, Result};

/// Discriminant of the serialized form, numbered as on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum FileBoxType {
    Unknown,
    Base64,
    Url,
    QrCode,
    Buffer,
    File,
    Stream,
    Uuid,
}

impl TryFrom<u8> for FileBoxType {
    type Error = String;

    fn try_from(code: u8) -> std::result::Result<Self, Self::Error> {
        Ok(match code {
            0 => Self::Unknown,
            1 => Self::Base64,
            2 => Self::Url,
            3 => Self::QrCode,
            4 => Self::Buffer,
            5 => Self::File,
            6 => Self::Stream,
            7 => Self::Uuid,
            other => return Err(format!("unknown file box type {other}")),
        })
    }
}

impl From<FileBoxType> for u8 {
    fn from(kind: FileBoxType) -> u8 {
        match kind {
            FileBoxType::Unknown => 0,
            FileBoxType::Base64 => 1,
            FileBoxType::Url => 2,
            FileBoxType::QrCode => 3,
            FileBoxType::Buffer => 4,
            FileBoxType::File => 5,
            FileBoxType::Stream => 6,
            FileBoxType::Uuid => 7,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileBox {
    pub box_type: FileBoxType,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base64: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qr_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
}

impl FileBox {
    fn empty(box_type: FileBoxType, name: impl Into<String>) -> Self {
        Self {
            box_type,
            name: name.into(),
            remote_url: None,
            base64: None,
            qr_code: None,
            uuid: None,
        }
    }

    pub fn from_url(url: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            remote_url: Some(url.into()),
            ..Self::empty(FileBoxType::Url, name)
        }
    }

    pub fn from_base64(data: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            base64: Some(data.into()),
            ..Self::empty(FileBoxType::Base64, name)
        }
    }

    /// Wrap raw content; it is carried base64-encoded.
    pub fn from_bytes(data: &[u8], name: impl Into<String>) -> Self {
        Self::from_base64(BASE64.encode(data), name)
    }

    pub fn from_qr_code(code: impl Into<String>) -> Self {
        Self {
            qr_code: Some(code.into()),
            ..Self::empty(FileBoxType::QrCode, "qrcode.png")
        }
    }

    pub fn remote_url(&self) -> Option<&str> {
        self.remote_url.as_deref()
    }

    /// Decoded inline content. Fails for forms that carry no inline bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let data = self.base64.as_deref().ok_or_else(|| {
            PuppetError::payload(format!("file box {} has no inline content", self.name))
        })?;
        BASE64
            .decode(data)
            .map_err(|e| PuppetError::payload(format!("file box {}: {e}", self.name)))
    }

    pub fn to_json_string(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| PuppetError::payload(e.to_string()))
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| PuppetError::payload(format!("malformed file box: {e}")))
    }
}
