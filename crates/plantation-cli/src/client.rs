//! Blocking HTTP client for the plantation server API.

use anyhow::{anyhow, Context, Result};
use plantation_core::{CreateEstateRequest, DronePlan, EstateStats, PlantTreeRequest};
use reqwest::blocking::{Client, Response};
use serde::{de::DeserializeOwned, Deserialize};

#[derive(Debug, Deserialize)]
struct IdResponse {
    id: String,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: String,
}

/// A tree as listed by `GET /estate/:id/trees`.
#[derive(Debug, Clone, Deserialize)]
pub struct TreeListing {
    pub id: String,
    pub x: i64,
    pub y: i64,
    pub height: i64,
}

pub struct PlantationClient {
    client: Client,
    base_url: String,
}

impl PlantationClient {
    /// Create a client for the server at `base_url` (e.g. "http://localhost:3000").
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Returns the new estate ID.
    pub fn create_estate(&self, width: i64, length: i64) -> Result<String> {
        let body = CreateEstateRequest {
            width: Some(width),
            length: Some(length),
        };
        let response = self
            .client
            .post(format!("{}/estate", self.base_url))
            .json(&body)
            .send()
            .context("Failed to reach plantation server")?;
        let created: IdResponse = read_json(response)?;
        Ok(created.id)
    }

    /// Returns the new tree ID.
    pub fn plant_tree(&self, estate_id: &str, x: i64, y: i64, height: i64) -> Result<String> {
        let body = PlantTreeRequest {
            x: Some(x),
            y: Some(y),
            height: Some(height),
        };
        let response = self
            .client
            .post(format!("{}/estate/{}/tree", self.base_url, estate_id))
            .json(&body)
            .send()
            .context("Failed to reach plantation server")?;
        let created: IdResponse = read_json(response)?;
        Ok(created.id)
    }

    pub fn stats(&self, estate_id: &str) -> Result<EstateStats> {
        self.get(&format!("/estate/{}/stats", estate_id))
    }

    pub fn drone_plan(&self, estate_id: &str) -> Result<DronePlan> {
        self.get(&format!("/estate/{}/drone-plan", estate_id))
    }

    pub fn trees(&self, estate_id: &str) -> Result<Vec<TreeListing>> {
        self.get(&format!("/estate/{}/trees", estate_id))
    }

    fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self
            .client
            .get(format!("{}{}", self.base_url, path))
            .send()
            .context("Failed to reach plantation server")?;
        read_json(response)
    }
}

/// Decode a success body, or turn the server's `{"error"}` body into an error.
fn read_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    let status = response.status();
    if status.is_success() {
        return response.json().context("Failed to decode server response");
    }
    let text = response.text().unwrap_or_default();
    let message = serde_json::from_str::<ErrorResponse>(&text)
        .map(|body| body.error)
        .unwrap_or(text);
    Err(anyhow!("server returned {}: {}", status, message))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_trimmed() {
        let client = PlantationClient::new("http://localhost:3000/");
        assert_eq!(client.base_url, "http://localhost:3000");
    }
}
