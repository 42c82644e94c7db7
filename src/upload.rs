use bytes::Bytes;
use reqwest::multipart::{Form, Part};

use crate::model::upload_result::UploadResult;
use crate::stash_error::Result;

pub(crate) static FORM_FIELD: &str = "file";

#[derive(Clone)]
pub(crate) struct UploadClient {
    inner: reqwest::Client,
    endpoint: String,
}

impl UploadClient {
    pub(crate) fn new(endpoint: String) -> Result<UploadClient> {
        let inner = reqwest::Client::builder().build()?;
        Ok(UploadClient { inner, endpoint })
    }

    pub(crate) fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Posts one image as the `file` field of a multipart form.
    pub(crate) async fn post(&self, file_name: &str, mime: &str, content: Bytes) -> Result<UploadResult> {
        let part = Part::bytes(content.to_vec())
            .file_name(file_name.to_owned())
            .mime_str(mime)?;
        let form = Form::new().part(FORM_FIELD, part);

        let res = self.inner
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await?
            .error_for_status()?;

        let body = res.bytes().await?;
        Ok(json::from_slice(&body)?)
    }

    /// Downloads a web-hosted photo.
    pub(crate) async fn fetch(&self, url: &str) -> Result<Bytes> {
        let res = self.inner.get(url).send().await?.error_for_status()?;
        Ok(res.bytes().await?)
    }
}
