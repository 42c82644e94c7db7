use std::env;
use std::path::PathBuf;

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use crate::stash_error::Result;

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum CameraSource {
    /// Let the user choose between camera and library.
    Prompt,
    /// Only take what was already picked, never ask.
    Photos,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct CaptureOptions {
    pub(crate) quality: u8,
    pub(crate) allow_editing: bool,
    pub(crate) source: CameraSource,
}

impl Default for CaptureOptions {
    fn default() -> Self {
        CaptureOptions {
            quality: 90,
            allow_editing: false,
            source: CameraSource::Prompt,
        }
    }
}

/// Where a captured photo can be read from.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum PhotoRef {
    /// A file on the device, readable directly.
    Native(PathBuf),
    /// A url the image has to be fetched from.
    Web(String),
}

impl PhotoRef {
    pub(crate) fn parse(source: &str) -> Option<PhotoRef> {
        let source = source.trim();
        if source.is_empty() {
            return None;
        }
        if source.starts_with("http://") || source.starts_with("https://") {
            Some(PhotoRef::Web(source.to_owned()))
        } else {
            Some(PhotoRef::Native(PathBuf::from(source)))
        }
    }

    /// Native paths given relative to the working directory are made absolute,
    /// relative storage paths belong to the data root.
    fn absolute(self) -> Result<PhotoRef> {
        match self {
            PhotoRef::Native(path) if path.is_relative() => {
                Ok(PhotoRef::Native(env::current_dir()?.join(path)))
            }
            other => Ok(other),
        }
    }
}

#[async_trait]
pub(crate) trait Camera: Send + Sync {
    /// `None` when the user cancelled.
    async fn get_photo(&self, options: CaptureOptions) -> Result<Option<PhotoRef>>;
}

/// Picks a photo from a path or url given on the command line, or asks for
/// one on the terminal when the source is `Prompt`.
pub(crate) struct TerminalPicker {
    source: Option<String>,
}

impl TerminalPicker {
    pub(crate) fn new(source: Option<String>) -> Self {
        TerminalPicker { source }
    }
}

#[async_trait]
impl Camera for TerminalPicker {
    async fn get_photo(&self, options: CaptureOptions) -> Result<Option<PhotoRef>> {
        tracing::debug!(quality = options.quality, allow_editing = options.allow_editing, "requesting photo");
        if let Some(source) = &self.source {
            return PhotoRef::parse(source).map(PhotoRef::absolute).transpose();
        }
        if options.source != CameraSource::Prompt {
            return Ok(None);
        }

        let mut stdout = tokio::io::stdout();
        stdout.write_all(b"Photo path or url (empty to cancel): ").await?;
        stdout.flush().await?;

        let mut line = String::new();
        BufReader::new(tokio::io::stdin()).read_line(&mut line).await?;
        PhotoRef::parse(&line).map(PhotoRef::absolute).transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_options_prompt_at_quality_90() {
        let options = CaptureOptions::default();
        assert_eq!(options.quality, 90);
        assert!(!options.allow_editing);
        assert_eq!(options.source, CameraSource::Prompt);
    }

    #[test]
    fn parse_distinguishes_urls_from_paths() {
        assert_eq!(
            PhotoRef::parse("https://host/cat.jpeg"),
            Some(PhotoRef::Web("https://host/cat.jpeg".to_owned()))
        );
        assert_eq!(
            PhotoRef::parse("/tmp/cat.jpeg\n"),
            Some(PhotoRef::Native(PathBuf::from("/tmp/cat.jpeg")))
        );
        assert_eq!(PhotoRef::parse("  \n"), None);
    }

    #[tokio::test]
    async fn picker_returns_given_source() {
        let picker = TerminalPicker::new(Some("/tmp/cat.jpeg".to_owned()));

        let photo = picker.get_photo(CaptureOptions::default()).await.unwrap();
        assert_eq!(photo, Some(PhotoRef::Native(PathBuf::from("/tmp/cat.jpeg"))));
    }

    #[tokio::test]
    async fn picker_without_source_or_prompt_is_cancelled() {
        let picker = TerminalPicker::new(None);
        let options = CaptureOptions { source: CameraSource::Photos, ..CaptureOptions::default() };

        assert_eq!(picker.get_photo(options).await.unwrap(), None);
    }

    #[tokio::test]
    async fn picker_makes_native_paths_absolute() {
        let picker = TerminalPicker::new(Some("cat.jpeg".to_owned()));

        let photo = picker.get_photo(CaptureOptions::default()).await.unwrap();
        assert_eq!(photo, Some(PhotoRef::Native(env::current_dir().unwrap().join("cat.jpeg"))));
    }
}
