//! Document store access.

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::{info, warn};

use crate::{config::StoreConfig, errors::SnowReportError, models::RawReport};

const USER_AGENT: &str = "snow-report/0.2.0";

/// Query interface over the external snow report documents.
///
/// Constructed once at startup and passed by reference into the snapshot
/// builder; tests substitute an in-memory fake.
#[async_trait]
pub trait ReportStore: Send + Sync {
    /// The most recent snapshot date present across all documents.
    async fn latest_date(&self) -> Result<Option<NaiveDate>, SnowReportError>;

    /// All raw reports recorded under the given snapshot date.
    async fn reports_for(&self, date: NaiveDate) -> Result<Vec<RawReport>, SnowReportError>;
}

/// HTTP client for the document service.
pub struct HttpStore {
    client: Client,
    base_url: String,
    collection: String,
}

#[derive(Debug, Deserialize)]
struct LatestDateResponse {
    date: Option<String>,
}

impl HttpStore {
    pub fn new(config: &StoreConfig) -> Result<Self, SnowReportError> {
        if config.base_url.trim().is_empty() {
            return Err(SnowReportError::StoreUnavailable(
                "no store base URL configured".to_string(),
            ));
        }

        info!(
            "Initializing report store: url={}, collection={}",
            config.base_url, config.collection
        );

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            collection: config.collection.clone(),
        })
    }

    fn collection_url(&self) -> String {
        format!("{}/{}", self.base_url, self.collection)
    }
}

#[async_trait]
impl ReportStore for HttpStore {
    async fn latest_date(&self) -> Result<Option<NaiveDate>, SnowReportError> {
        let url = format!("{}/latest-date", self.collection_url());
        let response = self.client.get(&url).send().await?.error_for_status()?;
        let body: LatestDateResponse = response.json().await?;

        match body.date {
            Some(raw) => {
                let date = NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
                    .map_err(|_| SnowReportError::InvalidDate(raw))?;
                Ok(Some(date))
            }
            None => Ok(None),
        }
    }

    async fn reports_for(&self, date: NaiveDate) -> Result<Vec<RawReport>, SnowReportError> {
        let url = format!("{}?date={}", self.collection_url(), date.format("%Y-%m-%d"));
        let response = self.client.get(&url).send().await?.error_for_status()?;
        let documents: Vec<Value> = response.json().await?;

        // Decode one document at a time; a single malformed document must
        // not discard the rest of the batch.
        let mut reports = Vec::with_capacity(documents.len());
        for document in documents {
            match serde_json::from_value::<RawReport>(document) {
                Ok(report) => reports.push(report),
                Err(e) => warn!("Skipping malformed report document: {}", e),
            }
        }
        Ok(reports)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn store_for(server: &mockito::ServerGuard) -> HttpStore {
        HttpStore::new(&StoreConfig {
            base_url: server.url(),
            collection: "snow_reports".to_string(),
            request_timeout: Duration::from_secs(5),
        })
        .unwrap()
    }

    #[test]
    fn rejects_empty_base_url() {
        let config = StoreConfig {
            base_url: "  ".to_string(),
            ..StoreConfig::default()
        };
        assert!(matches!(
            HttpStore::new(&config),
            Err(SnowReportError::StoreUnavailable(_))
        ));
    }

    #[tokio::test]
    async fn latest_date_parses_response() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/snow_reports/latest-date")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{ "date": "2026-01-15" }"#)
            .create_async()
            .await;

        let store = store_for(&server);
        let date = store.latest_date().await.unwrap();

        mock.assert_async().await;
        assert_eq!(date, NaiveDate::from_ymd_opt(2026, 1, 15));
    }

    #[tokio::test]
    async fn latest_date_handles_empty_store() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/snow_reports/latest-date")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{ "date": null }"#)
            .create_async()
            .await;

        let store = store_for(&server);
        assert_eq!(store.latest_date().await.unwrap(), None);
    }

    #[tokio::test]
    async fn latest_date_rejects_malformed_date() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/snow_reports/latest-date")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{ "date": "January 15th" }"#)
            .create_async()
            .await;

        let store = store_for(&server);
        assert!(matches!(
            store.latest_date().await,
            Err(SnowReportError::InvalidDate(_))
        ));
    }

    #[tokio::test]
    async fn reports_for_skips_malformed_documents() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/snow_reports")
            .match_query(mockito::Matcher::UrlEncoded(
                "date".into(),
                "2026-01-15".into(),
            ))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"[
                  { "resort": "BridgerBowl", "date": "2026-01-15", "snow_24h_summit": "8" },
                  { "date": "2026-01-15" },
                  { "resort": "BigSky", "date": "2026-01-15", "snow_24h_summit": 3 }
                ]"#,
            )
            .create_async()
            .await;

        let store = store_for(&server);
        let reports = store
            .reports_for(NaiveDate::from_ymd_opt(2026, 1, 15).unwrap())
            .await
            .unwrap();

        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0].resort, "BridgerBowl");
        assert_eq!(reports[0].snow_24h_summit, 8.0);
        assert_eq!(reports[1].resort, "BigSky");
    }

    #[tokio::test]
    async fn server_error_propagates() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/snow_reports/latest-date")
            .with_status(500)
            .create_async()
            .await;

        let store = store_for(&server);
        assert!(matches!(
            store.latest_date().await,
            Err(SnowReportError::HttpError(_))
        ));
    }
}
