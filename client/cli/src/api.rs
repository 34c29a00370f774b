pub mod types;

use crate::error::ApiError;
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use types::{
    ChartSeries, CreateFolderRequest, DeleteFolderRequest, ItemId, ListingItem,
    RenameFolderRequest, ShareRequest, ShareResponse, Summary,
};
use url::Url;

pub type ApiResult<T> = Result<T, ApiError>;

/// Thin typed wrapper over the file manager's REST endpoints.
///
/// One call is one request: no retries, no timeouts beyond reqwest's defaults.
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    client: reqwest::Client,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Check response status; on error, read body for the backend's message.
    async fn ensure_ok(resp: reqwest::Response) -> ApiResult<reqwest::Response> {
        if resp.status().is_success() {
            Ok(resp)
        } else {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            Err(ApiError::from_response_body(status, &body))
        }
    }

    async fn decode<T: DeserializeOwned>(resp: reqwest::Response) -> ApiResult<T> {
        let body = Self::ensure_ok(resp).await?.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn get_summary(&self) -> ApiResult<Summary> {
        let resp = self
            .client
            .get(self.url("/api/dashboard/summary"))
            .send()
            .await?;
        Self::decode(resp).await
    }

    pub async fn get_chart_series(&self, url: &str) -> ApiResult<ChartSeries> {
        let resp = self.client.get(url).send().await?;
        Self::decode(resp).await
    }

    pub async fn list_items(&self) -> ApiResult<Vec<ListingItem>> {
        let resp = self.client.get(self.url("/api/folders")).send().await?;
        Self::decode(resp).await
    }

    pub async fn create_folder(&self, folder_name: &str) -> ApiResult<()> {
        let resp = self
            .client
            .post(self.url("/folder/create"))
            .json(&CreateFolderRequest { folder_name })
            .send()
            .await?;
        Self::ensure_ok(resp).await?;
        Ok(())
    }

    pub async fn rename_folder(&self, folder_id: &ItemId, new_name: &str) -> ApiResult<()> {
        let resp = self
            .client
            .put(self.url("/folder/rename"))
            .json(&RenameFolderRequest {
                folder_id,
                new_name,
            })
            .send()
            .await?;
        Self::ensure_ok(resp).await?;
        Ok(())
    }

    pub async fn delete_folder(&self, folder_id: &ItemId) -> ApiResult<()> {
        let resp = self
            .client
            .delete(self.url("/folder/delete"))
            .json(&DeleteFolderRequest { folder_id })
            .send()
            .await?;
        Self::ensure_ok(resp).await?;
        Ok(())
    }

    pub async fn upload_file(&self, file_name: &str, data: Vec<u8>) -> ApiResult<()> {
        let form = Form::new().part("file", Part::bytes(data).file_name(file_name.to_string()));
        let resp = self
            .client
            .post(self.url("/file/upload"))
            .multipart(form)
            .send()
            .await?;
        Self::ensure_ok(resp).await?;
        Ok(())
    }

    pub async fn download_file(&self, file_path: &str) -> ApiResult<Vec<u8>> {
        let resp = self
            .client
            .get(self.url("/file/download"))
            .query(&[("file_path", file_path)])
            .send()
            .await?;
        Ok(Self::ensure_ok(resp).await?.bytes().await?.to_vec())
    }

    pub async fn share_file(&self, request: &ShareRequest) -> ApiResult<ShareResponse> {
        let resp = self
            .client
            .post(self.url("/file/share"))
            .json(request)
            .send()
            .await?;
        Self::decode(resp).await
    }

    /// Fetch the file behind a share link.
    pub async fn open_share(&self, share_link: &str, password: Option<&str>) -> ApiResult<Vec<u8>> {
        let mut url = Url::parse(&self.url("/file/share"))
            .map_err(|e| ApiError::Invalid(format!("bad server url: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| ApiError::Invalid("server url cannot take a path".into()))?
            .push(share_link);

        let mut req = self.client.get(url);
        if let Some(password) = password {
            req = req.query(&[("password", password)]);
        }
        let resp = req.send().await?;
        Ok(Self::ensure_ok(resp).await?.bytes().await?.to_vec())
    }
}
