use std::sync::Arc;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::camera::{Camera, CameraSource, CaptureOptions, PhotoRef};
use crate::clock::Clock;
use crate::file::Filesystem;
use crate::model::photo::StoredPhoto;
use crate::model::upload_result::UploadResult;
use crate::notify::{Loading, Notifier, TOAST_DURATION};
use crate::stash_error::{Result, StashError};
use crate::upload::UploadClient;

pub(crate) static IMAGE_DIR: &str = "stored-images";
static IMAGE_EXTENSION: &str = "jpeg";

static LOADING_DATA: &str = "Loading data...";
static UPLOADING_IMAGE: &str = "Uploading image...";
pub(crate) static UPLOAD_COMPLETE: &str = "File upload complete.";
pub(crate) static UPLOAD_FAILED: &str = "File upload failed.";
pub(crate) static FILE_REMOVED: &str = "File removed.";

/// The photo screen: stored photos plus the capabilities acting on them.
///
/// `images` is a snapshot, replaced as a whole every time the storage
/// directory is listed again.
pub(crate) struct PhotoLibrary {
    fs: Arc<dyn Filesystem>,
    camera: Arc<dyn Camera>,
    notifier: Arc<dyn Notifier>,
    clock: Arc<dyn Clock>,
    uploader: UploadClient,
    images: Vec<StoredPhoto>,
}

impl PhotoLibrary {
    pub(crate) fn new(
        fs: Arc<dyn Filesystem>,
        camera: Arc<dyn Camera>,
        notifier: Arc<dyn Notifier>,
        clock: Arc<dyn Clock>,
        uploader: UploadClient,
    ) -> Self {
        PhotoLibrary { fs, camera, notifier, clock, uploader, images: vec!() }
    }

    pub(crate) fn images(&self) -> &[StoredPhoto] {
        &self.images
    }

    pub(crate) fn find(&self, name: &str) -> Result<StoredPhoto> {
        self.images
            .iter()
            .find(|photo| photo.name == name)
            .cloned()
            .ok_or_else(|| StashError::PhotoNotFound(name.to_owned()))
    }

    /// Lists the storage directory, creating it when it does not exist yet.
    pub(crate) async fn load_files(&mut self) -> Result<&[StoredPhoto]> {
        self.images.clear();

        let notifier = Arc::clone(&self.notifier);
        let _loading = Loading::show(notifier.as_ref(), LOADING_DATA);

        let photos = match self.fs.list(IMAGE_DIR).await {
            Ok(names) => self.load_file_data(&names).await?,
            Err(err) if err.is_not_found() => {
                tracing::info!("creating storage directory {}", IMAGE_DIR);
                self.fs.make_dir(IMAGE_DIR).await?;
                vec!()
            }
            Err(err) => return Err(err),
        };

        tracing::debug!("loaded {} photos", photos.len());
        self.images = photos;
        Ok(&self.images)
    }

    /// Reads files one after another so the listing keeps enumeration order.
    async fn load_file_data(&self, names: &[String]) -> Result<Vec<StoredPhoto>> {
        let mut photos = Vec::with_capacity(names.len());
        for name in names {
            let path = format!("{}/{}", IMAGE_DIR, name);
            let data = self.fs.read_file(&path).await?;
            let photo = StoredPhoto::new(IMAGE_DIR, name, &data);
            tracing::debug!("read {}", photo);
            photos.push(photo);
        }

        Ok(photos)
    }

    /// Asks the camera for a photo and stores it. `None` when cancelled.
    pub(crate) async fn select_image(&mut self, source: CameraSource) -> Result<Option<String>> {
        let options = CaptureOptions { source, ..CaptureOptions::default() };
        let photo = self.camera.get_photo(options).await?;
        match photo {
            Some(photo) => self.save_image(&photo).await.map(Some),
            None => {
                tracing::info!("no photo selected");
                Ok(None)
            }
        }
    }

    /// Writes the photo into the storage directory and refreshes the listing.
    /// Returns the new file name.
    pub(crate) async fn save_image(&mut self, photo: &PhotoRef) -> Result<String> {
        let base64_data = self.read_as_base64(photo).await?;
        let file_name = self.unique_file_name().await?;
        let path = format!("{}/{}", IMAGE_DIR, file_name);

        self.fs.write_file(&path, &base64_data).await?;
        tracing::info!("saved {}", path);

        self.load_files().await?;
        Ok(file_name)
    }

    async fn read_as_base64(&self, photo: &PhotoRef) -> Result<String> {
        match photo {
            PhotoRef::Native(path) => match path.to_str() {
                Some(path) => self.fs.read_file(path).await,
                None => Err(StashError::NotFound(format!("{} (not valid utf-8)", path.display()))),
            },
            PhotoRef::Web(url) => {
                let blob = self.uploader.fetch(url).await?;
                Ok(STANDARD.encode(&blob))
            }
        }
    }

    /// `<epoch millis>.jpeg`, with a `-<n>` suffix when that name is taken.
    async fn unique_file_name(&self) -> Result<String> {
        let millis = self.clock.now_millis();
        let mut file_name = format!("{}.{}", millis, IMAGE_EXTENSION);
        let mut n = 0;
        while self.fs.exists(&format!("{}/{}", IMAGE_DIR, file_name)).await? {
            n += 1;
            file_name = format!("{}-{}.{}", millis, n, IMAGE_EXTENSION);
        }

        Ok(file_name)
    }

    pub(crate) async fn start_upload(&self, photo: &StoredPhoto) -> Result<UploadResult> {
        let content = photo.to_bytes()?;
        let mime = photo.mime()?;
        tracing::debug!("uploading {} ({} bytes) to {}", photo.name, content.len(), self.uploader.endpoint());

        let _loading = Loading::show(self.notifier.as_ref(), UPLOADING_IMAGE);
        let res = self.uploader.post(&photo.name, mime, content).await?;
        tracing::info!(success = res.success, "upload response: {}", res.message);

        if res.success {
            self.notifier.toast(UPLOAD_COMPLETE, TOAST_DURATION);
        } else {
            self.notifier.toast(UPLOAD_FAILED, TOAST_DURATION);
        }
        Ok(res)
    }

    pub(crate) async fn delete_image(&mut self, photo: &StoredPhoto) -> Result<()> {
        self.fs.delete_file(&photo.path).await?;
        tracing::info!("deleted {}", photo.path);

        self.load_files().await?;
        self.notifier.toast(FILE_REMOVED, TOAST_DURATION);
        Ok(())
    }
}
