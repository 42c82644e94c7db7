use std::fmt;
use std::fmt::Formatter;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use bytes::Bytes;

use crate::stash_error::{Result, StashError};

pub(crate) static DEFAULT_MIME: &str = "image/jpeg";

/// A photo file from the storage directory, loaded for display.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct StoredPhoto {
    pub(crate) name: String,
    /// `<image dir>/<name>`, relative to the data root.
    pub(crate) path: String,
    /// `data:<mime>;base64,<payload>`
    pub(crate) data: String,
}

impl StoredPhoto {
    pub(crate) fn new(image_dir: &str, name: &str, base64_body: &str) -> Self {
        StoredPhoto {
            name: name.to_owned(),
            path: format!("{}/{}", image_dir, name),
            data: to_data_uri(mime_for_name(name), base64_body),
        }
    }

    pub(crate) fn mime(&self) -> Result<&str> {
        parse_data_uri(&self.data).map(|(mime, _)| mime)
    }

    /// Decodes the data uri back into the raw image bytes.
    pub(crate) fn to_bytes(&self) -> Result<Bytes> {
        let (_, payload) = parse_data_uri(&self.data)?;
        Ok(Bytes::from(STANDARD.decode(payload)?))
    }
}

impl fmt::Display for StoredPhoto {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "(name={}, path={}, len={})", self.name, self.path, self.data.len())
    }
}

pub(crate) fn to_data_uri(mime: &str, base64_body: &str) -> String {
    format!("data:{};base64,{}", mime, base64_body)
}

/// Splits `data:<mime>;base64,<payload>` into mime and payload.
pub(crate) fn parse_data_uri(uri: &str) -> Result<(&str, &str)> {
    let rest = uri
        .strip_prefix("data:")
        .ok_or_else(|| StashError::InvalidDataUri("missing data: scheme".to_owned()))?;
    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| StashError::InvalidDataUri("missing payload separator".to_owned()))?;
    let mime = header
        .strip_suffix(";base64")
        .ok_or_else(|| StashError::InvalidDataUri(format!("{} is not base64 encoded", header)))?;

    let mime = if mime.is_empty() { DEFAULT_MIME } else { mime };
    Ok((mime, payload))
}

pub(crate) fn mime_for_name(name: &str) -> &'static str {
    let extension = match name.rsplit_once('.') {
        Some((_, extension)) => extension.to_lowercase(),
        None => return DEFAULT_MIME,
    };

    match extension.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        _ => DEFAULT_MIME,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_photo_has_relative_path_and_jpeg_data_uri() {
        let photo = StoredPhoto::new("stored-images", "1700000000000.jpeg", "aGVsbG8=");

        assert_eq!(photo.path, "stored-images/1700000000000.jpeg");
        assert_eq!(photo.data, "data:image/jpeg;base64,aGVsbG8=");
    }

    #[test]
    fn mime_is_inferred_from_extension() {
        assert_eq!(mime_for_name("a.JPG"), "image/jpeg");
        assert_eq!(mime_for_name("a.png"), "image/png");
        assert_eq!(mime_for_name("a.webp"), "image/webp");
        assert_eq!(mime_for_name("a.heic"), DEFAULT_MIME);
        assert_eq!(mime_for_name("noextension"), DEFAULT_MIME);
    }

    #[test]
    fn to_bytes_decodes_payload() {
        let photo = StoredPhoto::new("stored-images", "x.png", "aGVsbG8=");

        assert_eq!(photo.mime().unwrap(), "image/png");
        assert_eq!(photo.to_bytes().unwrap(), Bytes::from_static(b"hello"));
    }

    #[test]
    fn parse_rejects_non_base64_uris() {
        assert!(parse_data_uri("http://host/x.jpeg").is_err());
        assert!(parse_data_uri("data:image/png,raw").is_err());
        assert!(parse_data_uri("data:image/png;base64").is_err());
    }

    #[test]
    fn parse_defaults_empty_mime_to_jpeg() {
        let (mime, payload) = parse_data_uri("data:;base64,AAAA").unwrap();
        assert_eq!(mime, DEFAULT_MIME);
        assert_eq!(payload, "AAAA");
    }
}
