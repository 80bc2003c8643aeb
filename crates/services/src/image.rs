//! Submitted image payloads: raw bytes from a multipart upload, or a
//! `data:<mime>;base64,<payload>` URI from a form that pre-encoded the file.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use bytes::Bytes;
use domains::ValidationError;
use mime::Mime;

const REQUIRED: &str = "An image is required.";
const MALFORMED: &str = "Image must be a base64 data URI with an image MIME type.";
const NOT_AN_IMAGE: &str = "Image must have an image MIME type.";

#[derive(Debug, Clone)]
pub enum ImageInput {
    Bytes { data: Bytes, content_type: Mime },
    DataUri(String),
}

/// An image that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedImage {
    pub data: Bytes,
    pub content_type: Mime,
}

impl DecodedImage {
    /// The representation handed to the tagging collaborator.
    pub fn to_data_uri(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.content_type.essence_str(),
            STANDARD.encode(&self.data)
        )
    }
}

impl ImageInput {
    pub fn decode(&self) -> Result<DecodedImage, ValidationError> {
        match self {
            ImageInput::Bytes { data, content_type } => {
                if data.is_empty() {
                    return Err(ValidationError::single("image", REQUIRED));
                }
                if content_type.type_() != mime::IMAGE {
                    return Err(ValidationError::single("image", NOT_AN_IMAGE));
                }
                Ok(DecodedImage {
                    data: data.clone(),
                    content_type: content_type.clone(),
                })
            }
            ImageInput::DataUri(uri) => parse_data_uri(uri),
        }
    }
}

fn parse_data_uri(uri: &str) -> Result<DecodedImage, ValidationError> {
    let uri = uri.trim();
    if uri.is_empty() {
        return Err(ValidationError::single("image", REQUIRED));
    }

    let malformed = || ValidationError::single("image", MALFORMED);

    let rest = uri.strip_prefix("data:").ok_or_else(malformed)?;
    let (header, payload) = rest.split_once(',').ok_or_else(malformed)?;
    let media_type = header.strip_suffix(";base64").ok_or_else(malformed)?;
    let content_type: Mime = media_type.parse().map_err(|_| malformed())?;
    if content_type.type_() != mime::IMAGE {
        return Err(malformed());
    }

    let data = STANDARD.decode(payload).map_err(|_| malformed())?;
    if data.is_empty() {
        return Err(ValidationError::single("image", REQUIRED));
    }

    Ok(DecodedImage {
        data: Bytes::from(data),
        content_type,
    })
}
