use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::model::Coordinate;

use super::{Geolocator, LocationError};

pub const DEFAULT_IP_GEOLOCATION_URL: &str = "http://ip-api.com/json/";

/// Locates the host by its public IP address.
#[derive(Debug, Clone)]
pub struct IpGeolocator {
    url: String,
    http: Client,
}

impl IpGeolocator {
    pub fn new(url: String, timeout: Duration) -> anyhow::Result<Self> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self { url, http })
    }
}

#[derive(Debug, Deserialize)]
struct IpApiResponse {
    status: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    lat: Option<f64>,
    #[serde(default)]
    lon: Option<f64>,
}

#[async_trait]
impl Geolocator for IpGeolocator {
    #[instrument(skip(self))]
    async fn locate(&self) -> Result<Coordinate, LocationError> {
        debug!(url = %self.url, "Requesting IP geolocation");

        let res = self.http.get(&self.url).send().await?;

        let status = res.status();
        if !status.is_success() {
            return Err(LocationError::Status(status));
        }

        let body: IpApiResponse = res.json().await?;

        if body.status != "success" {
            return Err(LocationError::Rejected(
                body.message.unwrap_or_else(|| body.status.clone()),
            ));
        }

        match (body.lat, body.lon) {
            (Some(lat), Some(lon)) => Ok(Coordinate::new(lat, lon)),
            _ => Err(LocationError::Rejected("no position in response".to_string())),
        }
    }
}
