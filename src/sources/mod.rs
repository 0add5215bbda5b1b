//! GPX sources API

use std::io::Read;

use gpx::Gpx;

use crate::config::ProvidersConfig;
use crate::error::SourceError;

/// Where the GPX comes from
pub trait GpxSource {
    /// Retrieve and parse the whole GPX
    fn fetch(&mut self) -> Result<Gpx, SourceError>;
}

mod file;

pub use file::FileSource;

#[cfg(feature = "http")]
mod strava;

#[cfg(feature = "http")]
pub use strava::StravaRouteSource;

/// Parse GPX content
pub fn parse<R: Read>(reader: R) -> Result<Gpx, SourceError> {
    gpx::read(reader).map_err(|e| SourceError::Parse(e.to_string()))
}

#[cfg(feature = "http")]
type ProviderCtor = fn(&str, &ProvidersConfig) -> Result<Box<dyn GpxSource>, SourceError>;

/// Remote providers by hostname
#[cfg(feature = "http")]
const PROVIDERS: &[(&str, ProviderCtor)] = &[("www.strava.com", StravaRouteSource::boxed)];

/// Pick the source of an URL or a local path
pub fn open(uri: &str, providers: &ProvidersConfig) -> Result<Box<dyn GpxSource>, SourceError> {
    match remote(uri, providers) {
        Some(source) => source,
        None => Ok(Box::new(FileSource::new(uri))),
    }
}

#[cfg(feature = "http")]
fn remote(
    uri: &str,
    providers: &ProvidersConfig,
) -> Option<Result<Box<dyn GpxSource>, SourceError>> {
    if !is_valid_url(uri) {
        return None;
    }

    let host = provider_hostname(uri);

    Some(match PROVIDERS.iter().find(|(h, _)| *h == host) {
        Some((_, ctor)) => ctor(uri, providers),
        None => Err(SourceError::UnknownProvider(host)),
    })
}

#[cfg(not(feature = "http"))]
fn remote(_: &str, _: &ProvidersConfig) -> Option<Result<Box<dyn GpxSource>, SourceError>> {
    None
}

/// Host part of an URL, empty when there is none
#[cfg(feature = "http")]
pub fn provider_hostname(uri: &str) -> String {
    reqwest::Url::parse(uri)
        .ok()
        .and_then(|u| u.host_str().map(|h| h.to_string()))
        .unwrap_or_default()
}

/// An URL with a scheme, a host and a path
#[cfg(feature = "http")]
pub fn is_valid_url(uri: &str) -> bool {
    match reqwest::Url::parse(uri) {
        Ok(url) => {
            !url.scheme().is_empty()
                && url.host_str().map_or(false, |h| !h.is_empty())
                && url.path() != "/"
        }
        Err(_) => false,
    }
}

#[cfg(all(test, feature = "http"))]
mod tests {
    use super::{is_valid_url, open, provider_hostname};
    use crate::config::ProvidersConfig;
    use crate::error::SourceError;

    #[test]
    fn hostnames() {
        let cases = [
            ("https://www.strava.com/activities/123456", "www.strava.com"),
            ("https://maps.google.com/something", "maps.google.com"),
            ("http://example.com/test", "example.com"),
            ("ftp://files.example.com/resource", "files.example.com"),
            ("invalid_url", ""),
        ];

        for (url, expected) in cases {
            assert_eq!(expected, provider_hostname(url), "{}", url);
        }
    }

    #[test]
    fn urls() {
        let cases = [
            ("https://www.strava.com/activities/123456", true),
            ("http://example.com/test", true),
            ("ftp://files.example.com/resource", true),
            ("www.example.com", false),
            ("example.com", false),
            ("not-a-valid-url", false),
            ("https://", false),
            ("https://www.strava.com", false),
            ("https://www.strava.com/", false),
            ("", false),
            ("tracks/morning.gpx", false),
        ];

        for (url, expected) in cases {
            assert_eq!(expected, is_valid_url(url), "{}", url);
        }
    }

    #[test]
    fn unknown_host() {
        let err = open("https://maps.google.com/route/1", &ProvidersConfig::default())
            .err()
            .unwrap();

        assert!(matches!(err, SourceError::UnknownProvider(h) if h == "maps.google.com"));
    }

    #[test]
    fn strava_needs_a_token() {
        let err = open(
            "https://www.strava.com/routes/3120112234",
            &ProvidersConfig::default(),
        )
        .err()
        .unwrap();

        assert!(matches!(err, SourceError::MissingCredential(_)));

        let providers = ProvidersConfig {
            strava_access_token: Some("token".to_string()),
            ..Default::default()
        };
        assert!(open("https://www.strava.com/routes/3120112234", &providers).is_ok());
    }

    #[test]
    fn paths_are_files() {
        assert!(open("tracks/morning.gpx", &ProvidersConfig::default()).is_ok());
    }
}
