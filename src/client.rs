use http::StatusCode;
use reqwest::Client;

use crate::error::{Error, Result};
use crate::schema::WeeklyRecord;

pub const RESOURCE_PATH: &str = "api/salary";

/// Client for the remote weekly-entries resource.
#[derive(Debug, Clone)]
pub struct RemoteClient {
    client: Client,
    url: String,
}

impl RemoteClient {
    pub fn new(base_url: &str) -> Self {
        RemoteClient {
            client: Client::new(),
            url: format!("{}/{}", base_url.trim_end_matches('/'), RESOURCE_PATH),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Every stored record. A missing resource reads as an empty week.
    #[tracing::instrument(skip(self), fields(url = %self.url))]
    pub async fn list(&self) -> Result<Vec<WeeklyRecord>> {
        let res = self.client.get(&self.url).send().await?;

        match res.status() {
            StatusCode::NOT_FOUND => Ok(Vec::new()),
            status if status.is_success() => Ok(res.json::<Vec<WeeklyRecord>>().await?),
            status => Err(Error::RemoteStatus(status)),
        }
    }

    #[tracing::instrument(skip(self, record), fields(day = %record.day))]
    pub async fn upsert(&self, record: &WeeklyRecord) -> Result<()> {
        let res = self.client.post(&self.url).json(record).send().await?;

        if res.status().is_success() {
            Ok(())
        } else {
            Err(Error::RemoteStatus(res.status()))
        }
    }

    /// Saves day by day and stops at the first failure.
    pub async fn save_week(&self, records: &[WeeklyRecord]) -> Result<()> {
        for record in records {
            self.upsert(record).await?;
        }

        Ok(())
    }

    #[tracing::instrument(skip(self), fields(url = %self.url))]
    pub async fn delete_all(&self) -> Result<()> {
        let res = self.client.delete(&self.url).send().await?;

        if res.status().is_success() {
            Ok(())
        } else {
            Err(Error::RemoteStatus(res.status()))
        }
    }
}
