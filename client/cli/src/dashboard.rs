//! Dashboard page controller
//!
//! Summary counters come from the backend; the two charts use the metrics
//! endpoint when one is configured and the built-in sample series otherwise.

use crate::api::types::Summary;
use crate::api::{ApiClient, ApiResult};
use crate::chart::ChartSpec;
use crate::page::{ids, paint, Surface};
use std::sync::{Arc, Mutex};

pub struct Dashboard<S> {
    api: ApiClient,
    surface: Arc<Mutex<S>>,
    metrics_url: Option<String>,
}

impl<S: Surface> Dashboard<S> {
    pub fn new(api: ApiClient, surface: Arc<Mutex<S>>) -> Self {
        Self {
            api,
            surface,
            metrics_url: None,
        }
    }

    pub fn with_metrics_url(mut self, metrics_url: Option<String>) -> Self {
        self.metrics_url = metrics_url.map(|u| u.trim_end_matches('/').to_string());
        self
    }

    /// Page-load sequence: counters, then both charts.
    pub async fn load(&self) -> ApiResult<Summary> {
        let summary = self.load_summary().await;
        self.render_folder_chart().await;
        self.render_activity_chart().await;
        summary
    }

    /// Fetch the counters and write them out. Failures are logged only; the
    /// previously displayed values stay as they were.
    pub async fn load_summary(&self) -> ApiResult<Summary> {
        match self.api.get_summary().await {
            Ok(summary) => {
                paint(&self.surface, |s| {
                    s.set_text(ids::TOTAL_FOLDERS, &summary.total_folders.to_string());
                    s.set_text(ids::TOTAL_FILES, &summary.total_files.to_string());
                    s.set_text(ids::TOTAL_USERS, &summary.total_users.to_string());
                });
                tracing::debug!(?summary, "dashboard summary loaded");
                Ok(summary)
            }
            Err(e) => {
                tracing::error!(
                    server = %self.api.base_url(),
                    error = %e,
                    "Error fetching dashboard summary"
                );
                Err(e)
            }
        }
    }

    pub async fn render_folder_chart(&self) -> ChartSpec {
        self.render_chart(ids::FOLDER_CHART, "folders", ChartSpec::folder_demo())
            .await
    }

    pub async fn render_activity_chart(&self) -> ChartSpec {
        self.render_chart(ids::USER_ACTIVITY_CHART, "activity", ChartSpec::activity_demo())
            .await
    }

    async fn render_chart(&self, id: &str, metric: &str, demo: ChartSpec) -> ChartSpec {
        let spec = match &self.metrics_url {
            Some(base) => {
                let url = format!("{}/{}", base, metric);
                match self.api.get_chart_series(&url).await {
                    Ok(series) => demo.with_series(series).unwrap_or_else(|| {
                        tracing::warn!(%url, "metrics series unusable, showing sample data");
                        demo.clone()
                    }),
                    Err(e) => {
                        tracing::warn!(%url, error = %e, "metrics fetch failed, showing sample data");
                        demo
                    }
                }
            }
            None => demo,
        };
        paint(&self.surface, |s| s.draw_chart(id, spec.clone()));
        spec
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;
    use crate::page::Page;
    use crate::testing::serve;
    use axum::{http::StatusCode, routing::get, Json, Router};
    use serde_json::{json, Value};

    async fn dashboard_with(summary: (StatusCode, Value)) -> (Dashboard<Page>, Arc<Mutex<Page>>) {
        let router = Router::new().route(
            "/api/dashboard/summary",
            get(move || async move { (summary.0, Json(summary.1)) }),
        );
        let base = serve(router).await;
        let page = Arc::new(Mutex::new(Page::dashboard()));
        (Dashboard::new(ApiClient::new(&base), page.clone()), page)
    }

    #[tokio::test]
    async fn test_summary_counters_displayed() {
        let (dashboard, page) = dashboard_with((
            StatusCode::OK,
            json!({ "totalFolders": 3, "totalFiles": 9, "totalUsers": 2 }),
        ))
        .await;

        dashboard.load_summary().await.unwrap();

        let page = page.lock().unwrap();
        assert_eq!(page.text(ids::TOTAL_FOLDERS), Some("3"));
        assert_eq!(page.text(ids::TOTAL_FILES), Some("9"));
        assert_eq!(page.text(ids::TOTAL_USERS), Some("2"));
    }

    #[tokio::test]
    async fn test_missing_counter_displays_zero() {
        let (dashboard, page) =
            dashboard_with((StatusCode::OK, json!({ "totalFolders": 3, "totalFiles": 9 }))).await;

        dashboard.load_summary().await.unwrap();

        assert_eq!(page.lock().unwrap().text(ids::TOTAL_USERS), Some("0"));
    }

    #[tokio::test]
    async fn test_failed_summary_keeps_previous_values() {
        let (dashboard, page) = dashboard_with((
            StatusCode::INTERNAL_SERVER_ERROR,
            json!({ "error": "Failed to fetch folder count" }),
        ))
        .await;
        page.lock().unwrap().set_text(ids::TOTAL_FOLDERS, "5");

        let err = dashboard.load_summary().await.unwrap_err();
        assert!(matches!(err, ApiError::Backend { .. }));

        let page = page.lock().unwrap();
        assert_eq!(page.text(ids::TOTAL_FOLDERS), Some("5"));
        assert_eq!(page.text(ids::TOTAL_FILES), Some(""));
        assert!(page.alerts().is_empty());
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_swallowed() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        drop(listener);

        let page = Arc::new(Mutex::new(Page::dashboard()));
        let dashboard = Dashboard::new(ApiClient::new(&base), page.clone());

        let err = dashboard.load().await.unwrap_err();
        assert!(matches!(err, ApiError::Transport(_)));

        let page = page.lock().unwrap();
        assert!(page.alerts().is_empty());
        // charts still drawn from sample data
        assert_eq!(page.chart(ids::FOLDER_CHART), Some(&ChartSpec::folder_demo()));
        assert_eq!(page.chart(ids::USER_ACTIVITY_CHART), Some(&ChartSpec::activity_demo()));
    }

    #[tokio::test]
    async fn test_charts_from_metrics_endpoint() {
        let router = Router::new()
            .route(
                "/metrics/folders",
                get(|| async { Json(json!({ "labels": ["May", "Jun"], "data": [7, 11] })) }),
            )
            .route(
                "/metrics/activity",
                get(|| async { (StatusCode::NOT_FOUND, Json(json!({ "error": "no data" }))) }),
            );
        let base = serve(router).await;
        let page = Arc::new(Mutex::new(Page::dashboard()));
        let dashboard = Dashboard::new(ApiClient::new(&base), page.clone())
            .with_metrics_url(Some(format!("{}/metrics/", base)));

        let folders = dashboard.render_folder_chart().await;
        let activity = dashboard.render_activity_chart().await;

        assert_eq!(folders.labels, ["May", "Jun"]);
        assert_eq!(folders.data, [7, 11]);
        assert_eq!(activity, ChartSpec::activity_demo());

        let page = page.lock().unwrap();
        assert_eq!(page.chart(ids::FOLDER_CHART), Some(&folders));
        assert_eq!(page.chart(ids::USER_ACTIVITY_CHART), Some(&activity));
    }
}
