//! Strava routes export source

use std::time::Duration;

use gpx::Gpx;
use reqwest::blocking::Client;
use tracing::info;

use super::{parse, GpxSource};
use crate::config::ProvidersConfig;
use crate::error::SourceError;

const EXPORT_URL: &str = "https://www.strava.com/api/v3/routes";

/// GPX export of a Strava route, authenticated with a bearer token
pub struct StravaRouteSource {
    client: Client,
    route_id: String,
    access_token: String,
}

impl StravaRouteSource {
    /// The route id is the last segment of the route URL
    pub fn new(url: &str, providers: &ProvidersConfig) -> Result<Self, SourceError> {
        let access_token = providers
            .strava_access_token
            .clone()
            .ok_or(SourceError::MissingCredential("strava_access_token"))?;

        let route_id = url
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .filter(|id| !id.is_empty())
            .ok_or_else(|| SourceError::Parse(format!("No route id in `{}`", url)))?
            .to_string();

        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| SourceError::Http(e.to_string()))?;

        Ok(Self {
            client,
            route_id,
            access_token,
        })
    }

    pub(super) fn boxed(
        url: &str,
        providers: &ProvidersConfig,
    ) -> Result<Box<dyn GpxSource>, SourceError> {
        Ok(Box::new(Self::new(url, providers)?))
    }

    pub fn export_url(&self) -> String {
        format!("{}/{}/export_gpx", EXPORT_URL, self.route_id)
    }
}

impl GpxSource for StravaRouteSource {
    fn fetch(&mut self) -> Result<Gpx, SourceError> {
        let url = self.export_url();
        info!("Fetching Strava route {}", self.route_id);

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.access_token)
            .send()
            .map_err(|e| SourceError::Http(e.to_string()))?;

        if !response.status().is_success() {
            return Err(SourceError::Status(response.status().as_u16()));
        }

        let body = response
            .bytes()
            .map_err(|e| SourceError::Http(e.to_string()))?;

        parse(body.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::StravaRouteSource;
    use crate::config::ProvidersConfig;

    fn providers() -> ProvidersConfig {
        ProvidersConfig {
            strava_access_token: Some("token".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn export_url_from_route_url() -> Result<(), String> {
        let source = StravaRouteSource::new("https://www.strava.com/routes/3120112234", &providers())
            .map_err(|e| e.to_string())?;
        assert_eq!(
            "https://www.strava.com/api/v3/routes/3120112234/export_gpx",
            source.export_url()
        );

        let source = StravaRouteSource::new("https://www.strava.com/routes/42/", &providers())
            .map_err(|e| e.to_string())?;
        assert_eq!(
            "https://www.strava.com/api/v3/routes/42/export_gpx",
            source.export_url()
        );

        Ok(())
    }
}
