//! OMDb provider
//!
//! OMDb answers misses with HTTP 200 and `{"Response": "False"}`, so lookups
//! translate that shape into `None`/empty rather than an error. Non-2xx
//! statuses are upstream errors.

use reqwest::Client as HttpClient;
use serde_json::Value;

use crate::{
    error::{AppError, AppResult},
    models::{MovieRecord, SearchHit},
    services::providers::MovieDatabase,
};

#[derive(Clone)]
pub struct OmdbClient {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
}

impl OmdbClient {
    pub fn new(api_key: String, api_url: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_key,
            api_url,
        }
    }

    async fn get(&self, params: &[(&str, &str)]) -> AppResult<Value> {
        let response = self
            .http_client
            .get(&self.api_url)
            .query(&[("apikey", self.api_key.as_str())])
            .query(params)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(AppError::Upstream(format!(
                "OMDb API returned status {}",
                status
            )));
        }

        Ok(response.json().await?)
    }

    fn is_miss(value: &Value) -> bool {
        value["Response"] == "False"
    }
}

#[async_trait::async_trait]
impl MovieDatabase for OmdbClient {
    async fn find_by_title<'a>(
        &self,
        title: &str,
        year: Option<&'a str>,
    ) -> AppResult<Option<MovieRecord>> {
        let mut params = vec![("t", title), ("plot", "short")];
        if let Some(year) = year {
            params.push(("y", year));
        }

        let value = self.get(&params).await?;
        if Self::is_miss(&value) {
            return Ok(None);
        }

        let movie: MovieRecord = serde_json::from_value(value)
            .map_err(|e| AppError::Upstream(format!("unexpected OMDb title response: {}", e)))?;

        tracing::debug!(title = %title, imdb_id = %movie.imdb_id, "title lookup hit");
        Ok(Some(movie))
    }

    async fn find_by_id(&self, imdb_id: &str) -> AppResult<Option<MovieRecord>> {
        let value = self.get(&[("i", imdb_id), ("plot", "short")]).await?;
        if Self::is_miss(&value) {
            return Ok(None);
        }

        let movie: MovieRecord = serde_json::from_value(value)
            .map_err(|e| AppError::Upstream(format!("unexpected OMDb detail response: {}", e)))?;
        Ok(Some(movie))
    }

    async fn search<'a>(
        &self,
        query: &str,
        year: Option<&'a str>,
    ) -> AppResult<Vec<SearchHit>> {
        let mut params = vec![("s", query), ("type", "movie")];
        if let Some(year) = year {
            params.push(("y", year));
        }

        let value = self.get(&params).await?;
        if Self::is_miss(&value) {
            return Ok(Vec::new());
        }

        let hits: Vec<SearchHit> = value["Search"]
            .as_array()
            .map(|items| {
                items
                    .iter()
                    .filter_map(|item| serde_json::from_value(item.clone()).ok())
                    .collect()
            })
            .unwrap_or_default();

        tracing::debug!(query = %query, results = hits.len(), "search completed");
        Ok(hits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_miss() {
        let miss: Value =
            serde_json::from_str(r#"{"Response":"False","Error":"Movie not found!"}"#).unwrap();
        assert!(OmdbClient::is_miss(&miss));

        let hit: Value =
            serde_json::from_str(r#"{"Response":"True","Title":"Chef","imdbID":"tt2883512"}"#)
                .unwrap();
        assert!(!OmdbClient::is_miss(&hit));

        // No Response field at all
        let odd: Value = serde_json::from_str(r#"{"Title":"Chef"}"#).unwrap();
        assert!(!OmdbClient::is_miss(&odd));
    }
}
