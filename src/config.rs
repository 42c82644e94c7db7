use std::env;
use std::path::PathBuf;

use reqwest::Url;

use crate::stash_error::{Result, StashError};

static APP_DIR: &str = "photo-stash";
static DEFAULT_UPLOAD_URL: &str = "http://localhost:81/images/upload.php";
pub(crate) static DATA_DIR_ENV: &str = "PHOTO_STASH_DATA_DIR";
pub(crate) static UPLOAD_URL_ENV: &str = "PHOTO_STASH_UPLOAD_URL";

#[derive(Debug, PartialEq)]
pub(crate) struct Config {
    /// App-private root every storage path is relative to.
    pub(crate) data_dir: PathBuf,
    pub(crate) upload_url: String,
}

impl Config {
    /// Flags win over environment variables, which win over defaults.
    pub(crate) fn resolve(data_dir: Option<&str>, upload_url: Option<&str>) -> Result<Config> {
        Config::resolve_with(data_dir, upload_url, |key| env::var(key).ok())
    }

    fn resolve_with<F>(data_dir: Option<&str>, upload_url: Option<&str>, env: F) -> Result<Config>
    where
        F: Fn(&str) -> Option<String>,
    {
        let data_dir = match data_dir.map(String::from).or_else(|| env(DATA_DIR_ENV)) {
            Some(dir) => PathBuf::from(dir),
            None => dirs::data_dir()
                .map(|dir| dir.join(APP_DIR))
                .ok_or_else(|| StashError::Config(format!("no data directory, set {}", DATA_DIR_ENV)))?,
        };

        let upload_url = upload_url
            .map(String::from)
            .or_else(|| env(UPLOAD_URL_ENV))
            .unwrap_or_else(|| DEFAULT_UPLOAD_URL.to_owned());
        Url::parse(&upload_url)
            .map_err(|err| StashError::Config(format!("upload url {} is invalid: {}", upload_url, err)))?;

        Ok(Config { data_dir, upload_url })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn flags_override_environment() {
        let env = |key: &str| Some(format!("env-{}", key));
        let config = Config::resolve_with(Some("/data"), Some("http://host/up"), env).unwrap();

        assert_eq!(config.data_dir, PathBuf::from("/data"));
        assert_eq!(config.upload_url, "http://host/up");
    }

    #[test]
    fn environment_overrides_defaults() {
        let env = |key: &str| match key {
            "PHOTO_STASH_DATA_DIR" => Some("/from/env".to_owned()),
            "PHOTO_STASH_UPLOAD_URL" => Some("https://remote/images/upload.php".to_owned()),
            _ => None,
        };
        let config = Config::resolve_with(None, None, env).unwrap();

        assert_eq!(config.data_dir, PathBuf::from("/from/env"));
        assert_eq!(config.upload_url, "https://remote/images/upload.php");
    }

    #[test]
    fn defaults_to_local_endpoint() {
        let config = Config::resolve_with(Some("/data"), None, no_env).unwrap();
        assert_eq!(config.upload_url, DEFAULT_UPLOAD_URL);
    }

    #[test]
    fn rejects_invalid_url() {
        let err = Config::resolve_with(Some("/data"), Some("not a url"), no_env).unwrap_err();
        assert!(matches!(err, StashError::Config(_)));
    }
}
