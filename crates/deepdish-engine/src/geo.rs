//! Best-effort city lookup from coordinates.
//!
//! The city only enriches queries. Lookups never block submission and
//! failures simply leave the city unset.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Default reverse-geocoding endpoint.
pub const DEFAULT_GEOCODE_URL: &str = "https://api.bigdatacloud.net/data/reverse-geocode-client";

/// A point on the globe.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    /// Latitude in decimal degrees.
    pub latitude: f64,
    /// Longitude in decimal degrees.
    pub longitude: f64,
}

impl Coordinates {
    /// Create coordinates.
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Whether both values are finite and within range.
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}

/// Errors from a reverse-geocoding lookup.
#[derive(Debug, thiserror::Error)]
pub enum GeoError {
    /// Coordinates out of range.
    #[error("Invalid coordinates: {latitude}, {longitude}")]
    InvalidCoordinates { latitude: f64, longitude: f64 },

    /// Request failed or returned an error status.
    #[error("Geocoding request failed: {0}")]
    Request(#[from] reqwest::Error),
}

/// Something that can turn coordinates into a city name.
#[async_trait]
pub trait CityLocator: Send + Sync {
    /// Look up the city at `coords`. `Ok(None)` when the service knows no city.
    async fn locate(&self, coords: Coordinates) -> Result<Option<String>, GeoError>;
}

#[derive(Debug, Deserialize)]
struct ReverseGeocodeResponse {
    #[serde(default)]
    city: Option<String>,
    #[serde(default)]
    locality: Option<String>,
}

impl ReverseGeocodeResponse {
    fn into_city(self) -> Option<String> {
        [self.city, self.locality]
            .into_iter()
            .flatten()
            .map(|c| c.trim().to_string())
            .find(|c| !c.is_empty())
    }
}

/// Reverse geocoder reached over HTTP.
#[derive(Debug, Clone)]
pub struct HttpCityLocator {
    client: Client,
    url: String,
}

impl HttpCityLocator {
    /// Create a locator for the given endpoint.
    pub fn new(url: &str) -> Self {
        Self {
            client: Client::new(),
            url: url.to_string(),
        }
    }
}

#[async_trait]
impl CityLocator for HttpCityLocator {
    async fn locate(&self, coords: Coordinates) -> Result<Option<String>, GeoError> {
        if !coords.is_valid() {
            return Err(GeoError::InvalidCoordinates {
                latitude: coords.latitude,
                longitude: coords.longitude,
            });
        }

        let response = self
            .client
            .get(&self.url)
            .query(&[
                ("latitude", coords.latitude.to_string()),
                ("longitude", coords.longitude.to_string()),
                ("localityLanguage", "en".to_string()),
            ])
            .send()
            .await?
            .error_for_status()?;

        let body: ReverseGeocodeResponse = response.json().await?;
        Ok(body.into_city())
    }
}

/// Resolve a city, swallowing any failure.
pub async fn resolve_city(locator: &dyn CityLocator, coords: Coordinates) -> Option<String> {
    match locator.locate(coords).await {
        Ok(city) => {
            debug!(?city, "reverse geocoding finished");
            city
        }
        Err(e) => {
            warn!(error = %e, "reverse geocoding failed; continuing without a city");
            None
        }
    }
}
