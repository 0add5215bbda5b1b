//! HTTP clients of the enrichment services

use std::collections::BTreeMap;
use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::description::{segment_context, SegmentDescriber};
use super::elevation::{ElevationProvider, Location};
use crate::analyzer::segmenter::Segment;
use crate::error::EnrichmentError;

const GOOGLE_ELEVATION_URL: &str = "https://maps.googleapis.com/maps/api/elevation/json";
const ANTHROPIC_MESSAGES_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";

fn client() -> Result<Client, EnrichmentError> {
    Client::builder()
        .timeout(Duration::from_secs(30))
        .build()
        .map_err(|e| EnrichmentError::Http(e.to_string()))
}

fn send<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, EnrichmentError> {
    let response = request
        .send()
        .map_err(|e| EnrichmentError::Http(e.to_string()))?;

    if !response.status().is_success() {
        return Err(EnrichmentError::Status(response.status().as_u16()));
    }

    response
        .json()
        .map_err(|e| EnrichmentError::Payload(e.to_string()))
}

/// Pair each location of a batch with the answered elevation
fn zip_batch(
    batch: &[Location],
    elevations: Vec<f64>,
    found: &mut BTreeMap<usize, f64>,
) -> Result<(), EnrichmentError> {
    if elevations.len() != batch.len() {
        return Err(EnrichmentError::Payload(format!(
            "asked {} elevations, got {}",
            batch.len(),
            elevations.len()
        )));
    }

    found.extend(batch.iter().map(|l| l.position).zip(elevations));

    Ok(())
}

/// Google Maps elevation API, needs an API key
pub struct GoogleElevation {
    client: Client,
    api_key: String,
    batch_size: usize,
}

impl GoogleElevation {
    pub fn new(api_key: String) -> Result<Self, EnrichmentError> {
        Ok(Self {
            client: client()?,
            api_key,
            batch_size: 256,
        })
    }
}

#[derive(Debug, Deserialize)]
struct GoogleResponse {
    status: String,
    #[serde(default)]
    error_message: Option<String>,
    #[serde(default)]
    results: Vec<GoogleResult>,
}

#[derive(Debug, Deserialize)]
struct GoogleResult {
    elevation: f64,
}

impl ElevationProvider for GoogleElevation {
    fn name(&self) -> &str {
        "google"
    }

    fn try_fetch(&self, locations: &[Location]) -> Result<BTreeMap<usize, f64>, EnrichmentError> {
        let mut found = BTreeMap::new();

        for batch in locations.chunks(self.batch_size) {
            let path = batch
                .iter()
                .map(|l| format!("{:.6},{:.6}", l.latitude, l.longitude))
                .collect::<Vec<_>>()
                .join("|");

            let request = self
                .client
                .get(GOOGLE_ELEVATION_URL)
                .query(&[("locations", path.as_str()), ("key", self.api_key.as_str())]);
            let response: GoogleResponse = send(request)?;

            if response.status != "OK" {
                return Err(EnrichmentError::Payload(format!(
                    "{}: {}",
                    response.status,
                    response.error_message.unwrap_or_default()
                )));
            }

            let elevations = response.results.into_iter().map(|r| r.elevation).collect();
            zip_batch(batch, elevations, &mut found)?;
        }

        Ok(found)
    }
}

/// Open-Elevation lookup API, free and self-hostable
pub struct OpenElevation {
    client: Client,
    url: String,
    batch_size: usize,
}

impl OpenElevation {
    pub fn new(url: String) -> Result<Self, EnrichmentError> {
        Ok(Self {
            client: client()?,
            url,
            batch_size: 100,
        })
    }
}

#[derive(Debug, Serialize)]
struct OpenLocation {
    latitude: f64,
    longitude: f64,
}

#[derive(Debug, Serialize)]
struct OpenRequest {
    locations: Vec<OpenLocation>,
}

#[derive(Debug, Deserialize)]
struct OpenResponse {
    results: Vec<OpenResult>,
}

#[derive(Debug, Deserialize)]
struct OpenResult {
    elevation: f64,
}

impl ElevationProvider for OpenElevation {
    fn name(&self) -> &str {
        "open-elevation"
    }

    fn try_fetch(&self, locations: &[Location]) -> Result<BTreeMap<usize, f64>, EnrichmentError> {
        let mut found = BTreeMap::new();

        for batch in locations.chunks(self.batch_size) {
            let body = OpenRequest {
                locations: batch
                    .iter()
                    .map(|l| OpenLocation {
                        latitude: l.latitude,
                        longitude: l.longitude,
                    })
                    .collect(),
            };

            let response: OpenResponse = send(self.client.post(&self.url).json(&body))?;

            let elevations = response.results.into_iter().map(|r| r.elevation).collect();
            zip_batch(batch, elevations, &mut found)?;
        }

        Ok(found)
    }
}

/// Segment descriptions through the Anthropic messages API
pub struct AnthropicDescriber {
    client: Client,
    api_key: String,
    model: String,
}

impl AnthropicDescriber {
    pub fn new(api_key: String, model: String) -> Result<Self, EnrichmentError> {
        Ok(Self {
            client: client()?,
            api_key,
            model,
        })
    }
}

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f64,
    system: String,
    messages: Vec<Message<'a>>,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: Option<String>,
}

impl SegmentDescriber for AnthropicDescriber {
    fn describe(&self, segment: &Segment, prompt: &str) -> Result<String, EnrichmentError> {
        let body = MessagesRequest {
            model: &self.model,
            max_tokens: 1000,
            temperature: 1.0,
            system: segment_context(segment),
            messages: vec![Message {
                role: "user",
                content: prompt,
            }],
        };

        let request = self
            .client
            .post(ANTHROPIC_MESSAGES_URL)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&body);
        let response: MessagesResponse = send(request)?;

        response
            .content
            .into_iter()
            .find_map(|block| block.text)
            .ok_or_else(|| EnrichmentError::Payload("no text in the answer".to_string()))
    }
}
