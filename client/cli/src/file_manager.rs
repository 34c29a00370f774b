//! File manager page controller
//!
//! Drives the listing, the create-folder and upload forms, and sharing. Every
//! successful mutation is followed by one listing refresh.

use crate::api::types::{ItemId, ItemKind, ListingItem};
use crate::api::{ApiClient, ApiResult};
use crate::error::ApiError;
use crate::page::{ids, paint, ListEntry, Surface};
use crate::share::ShareOptions;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

const LISTING_FAILED: &str = "Failed to fetch folder contents.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingOutcome {
    /// Listing drawn with this many entries.
    Rendered(usize),
    /// A newer listing request was issued while this one was in flight.
    Superseded,
}

pub struct FileManager<S> {
    api: ApiClient,
    surface: Arc<Mutex<S>>,
    /// Origin share links are built against, without trailing slash.
    origin: String,
    listing_generation: AtomicU64,
}

impl<S: Surface> FileManager<S> {
    pub fn new(api: ApiClient, surface: Arc<Mutex<S>>, origin: &str) -> Self {
        Self {
            api,
            surface,
            origin: origin.trim_end_matches('/').to_string(),
            listing_generation: AtomicU64::new(0),
        }
    }

    fn alert(&self, message: &str) {
        paint(&self.surface, |s| s.alert(message));
    }

    /// Fetch and draw the listing. Only the most recently issued request may
    /// touch the surface; older responses are dropped, errors included.
    pub async fn load_listing(&self) -> ApiResult<ListingOutcome> {
        let generation = self.listing_generation.fetch_add(1, Ordering::SeqCst) + 1;
        let result = self.api.list_items().await;

        paint(&self.surface, |s| {
            if self.listing_generation.load(Ordering::SeqCst) != generation {
                tracing::debug!(generation, "discarding superseded listing response");
                return Ok(ListingOutcome::Superseded);
            }
            match result {
                Ok(items) => {
                    render_listing(s, &items);
                    Ok(ListingOutcome::Rendered(items.len()))
                }
                Err(e) => {
                    tracing::error!(error = %e, status = ?e.status(), "listing fetch failed");
                    s.alert(LISTING_FAILED);
                    Err(e)
                }
            }
        })
    }

    async fn refresh(&self) {
        if let Err(e) = self.load_listing().await {
            tracing::debug!(error = %e, "refresh after mutation failed");
        }
    }

    /// Submit handler for `create-folder-form`.
    pub async fn submit_create_folder(&self) -> ApiResult<()> {
        let name = paint(&self.surface, |s| s.input_value(ids::FOLDER_NAME)).unwrap_or_default();
        self.create_folder(&name).await
    }

    pub async fn create_folder(&self, name: &str) -> ApiResult<()> {
        if name.is_empty() {
            let err = ApiError::Invalid("Please enter a folder name.".into());
            self.alert(&err.to_string());
            return Err(err);
        }

        match self.api.create_folder(name).await {
            Ok(()) => {
                tracing::info!(folder = %name, "folder created");
                paint(&self.surface, |s| {
                    s.alert("Folder created successfully!");
                    s.clear_input(ids::FOLDER_NAME);
                });
                self.refresh().await;
                Ok(())
            }
            Err(e) => {
                self.alert(&format!("Error creating folder: {}", e));
                Err(e)
            }
        }
    }

    /// Submit handler for `upload-file-form`. The `file-upload` input holds a
    /// local path.
    pub async fn submit_upload(&self) -> ApiResult<()> {
        let path = paint(&self.surface, |s| s.input_value(ids::FILE_UPLOAD)).unwrap_or_default();
        if path.trim().is_empty() {
            let err = ApiError::Invalid("Please choose a file to upload.".into());
            self.alert(&err.to_string());
            return Err(err);
        }
        self.upload_file(Path::new(&path)).await
    }

    pub async fn upload_file(&self, path: &Path) -> ApiResult<()> {
        let result = match tokio::fs::read(path).await {
            Ok(data) => {
                let file_name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_else(|| "upload".to_string());
                self.api.upload_file(&file_name, data).await
            }
            Err(e) => Err(e.into()),
        };

        match result {
            Ok(()) => {
                tracing::info!(path = %path.display(), "file uploaded");
                paint(&self.surface, |s| {
                    s.alert("File uploaded successfully!");
                    s.clear_input(ids::FILE_UPLOAD);
                });
                self.refresh().await;
                Ok(())
            }
            Err(e) => {
                self.alert(&format!("Error uploading file: {}", e));
                Err(e)
            }
        }
    }

    pub fn share_url(&self, share_link: &str) -> String {
        format!("{}/file/share/{}", self.origin, share_link)
    }

    /// Ask the backend for a share link and display the absolute URL.
    pub async fn request_share(&self, item_id: &ItemId, options: ShareOptions) -> ApiResult<String> {
        let request = options.into_request(item_id.clone());
        match self.api.share_file(&request).await {
            Ok(resp) => {
                let link = self.share_url(&resp.share_link);
                self.alert(&format!("Shareable link: {}", link));
                tracing::info!("Shareable link: {}", link);
                self.refresh().await;
                Ok(link)
            }
            Err(e) => {
                self.alert(&format!("Error sharing file: {}", e));
                Err(e)
            }
        }
    }

    pub async fn rename_folder(&self, folder_id: &ItemId, new_name: &str) -> ApiResult<()> {
        if new_name.is_empty() {
            let err = ApiError::Invalid("Please enter a new folder name.".into());
            self.alert(&err.to_string());
            return Err(err);
        }

        match self.api.rename_folder(folder_id, new_name).await {
            Ok(()) => {
                tracing::info!(%folder_id, new_name, "folder renamed");
                self.alert("Folder renamed successfully!");
                self.refresh().await;
                Ok(())
            }
            Err(e) => {
                self.alert(&format!("Error renaming folder: {}", e));
                Err(e)
            }
        }
    }

    pub async fn delete_folder(&self, folder_id: &ItemId) -> ApiResult<()> {
        match self.api.delete_folder(folder_id).await {
            Ok(()) => {
                tracing::info!(%folder_id, "folder deleted");
                self.alert("Folder deleted successfully!");
                self.refresh().await;
                Ok(())
            }
            Err(e) => {
                self.alert(&format!("Error deleting folder: {}", e));
                Err(e)
            }
        }
    }

    /// Download a file by its server-side path into `dest`.
    pub async fn download_file(&self, file_path: &str, dest: &Path) -> ApiResult<u64> {
        let result = match self.api.download_file(file_path).await {
            Ok(bytes) => write_file(dest, &bytes).await,
            Err(e) => Err(e),
        };
        match result {
            Ok(len) => {
                self.alert(&format!("Downloaded {} ({} bytes) to {}", file_path, len, dest.display()));
                Ok(len)
            }
            Err(e) => {
                self.alert(&format!("Error downloading file: {}", e));
                Err(e)
            }
        }
    }

    /// Fetch the file behind a share link (bare token or full URL) into `dest`.
    pub async fn open_share(&self, link: &str, password: Option<&str>, dest: &Path) -> ApiResult<u64> {
        let token = share_token(link);
        let result = match self.api.open_share(token, password).await {
            Ok(bytes) => write_file(dest, &bytes).await,
            Err(e) => Err(e),
        };
        match result {
            Ok(len) => {
                self.alert(&format!("Saved shared file ({} bytes) to {}", len, dest.display()));
                Ok(len)
            }
            Err(e) => {
                self.alert(&format!("Error opening shared file: {}", e));
                Err(e)
            }
        }
    }
}

/// Replace the listing with `items`. Files get a share control, folders none.
pub fn render_listing<S: Surface>(surface: &mut S, items: &[ListingItem]) {
    surface.replace_list(ids::FOLDER_LIST, listing_entries(items));
}

/// Rows for the listing, in the order the backend sent them.
pub fn listing_entries(items: &[ListingItem]) -> Vec<ListEntry> {
    items
        .iter()
        .map(|item| ListEntry {
            label: format!("{} ({})", item.name, item.kind),
            share_target: (item.kind == ItemKind::File).then(|| item.id.to_string()),
        })
        .collect()
}

fn share_token(link: &str) -> &str {
    let link = link.trim().trim_end_matches('/');
    match link.rfind("/file/share/") {
        Some(pos) => &link[pos + "/file/share/".len()..],
        None => link,
    }
}

async fn write_file(dest: &Path, bytes: &[u8]) -> ApiResult<u64> {
    tokio::fs::write(dest, bytes).await?;
    Ok(bytes.len() as u64)
}
