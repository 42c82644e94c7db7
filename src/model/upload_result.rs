use serde::Deserialize;

/// Body returned by the upload endpoint.
#[derive(Debug, Deserialize, PartialEq)]
pub(crate) struct UploadResult {
    /// A missing flag counts as a failed upload.
    #[serde(default)]
    pub(crate) success: bool,
    #[serde(default)]
    pub(crate) message: String,
}
