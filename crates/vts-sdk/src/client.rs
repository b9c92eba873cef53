//! HTTP client for the traffic service REST API.

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Client for connecting to the traffic server.
pub struct TrafficClient {
    base_url: String,
    client: reqwest::Client,
}

#[derive(Debug, Serialize)]
struct PositionRequest {
    time: i64,
    x: i64,
    y: i64,
}

#[derive(Debug, Deserialize)]
pub struct PositionResponse {
    pub time: i64,
    pub x: i64,
    pub y: i64,
    pub speed: i64,
    pub status: String,
}

#[derive(Debug, Deserialize)]
pub struct ShipSummary {
    pub id: String,
    pub last_time: String,
    pub last_status: String,
    pub last_speed: i64,
    pub last_position: Point,
}

#[derive(Debug, Deserialize)]
pub struct Point {
    pub x: i64,
    pub y: i64,
}

#[derive(Debug, Deserialize)]
pub struct ShipHistory {
    pub id: String,
    pub positions: Vec<PositionRecord>,
}

#[derive(Debug, Deserialize)]
pub struct PositionRecord {
    pub time: i64,
    pub speed: i64,
    pub position: Point,
}

impl TrafficClient {
    /// Create a new client for a server base URL such as
    /// `http://localhost:8080`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client: reqwest::Client::new(),
        }
    }

    /// Report a ship position and get its speed and risk status back.
    pub async fn send_position(
        &self,
        ship_id: &str,
        time: i64,
        x: i64,
        y: i64,
    ) -> Result<PositionResponse> {
        let url = format!("{}/api/v1/ships/{}/position", self.base_url, ship_id);

        let response = self
            .client
            .post(&url)
            .json(&PositionRequest { time, x, y })
            .send()
            .await?;

        if !response.status().is_success() {
            anyhow::bail!("failed to position ship: {}", response.status());
        }

        Ok(response.json().await?)
    }

    /// Last-known summary of every tracked ship.
    pub async fn ships(&self) -> Result<Vec<ShipSummary>> {
        let url = format!("{}/api/v1/ships", self.base_url);
        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            anyhow::bail!("failed to get ships: {}", response.status());
        }

        Ok(response.json().await?)
    }

    /// Full position history of one ship.
    pub async fn ship(&self, ship_id: &str) -> Result<ShipHistory> {
        let url = format!("{}/api/v1/ships/{}", self.base_url, ship_id);
        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            anyhow::bail!("failed to get ship: {}", response.status());
        }

        Ok(response.json().await?)
    }

    /// Drop all server-side state.
    pub async fn flush(&self) -> Result<()> {
        let url = format!("{}/api/v1/flush", self.base_url);
        let response = self.client.post(&url).send().await?;

        if !response.status().is_success() {
            anyhow::bail!("failed to flush: {}", response.status());
        }

        Ok(())
    }
}
