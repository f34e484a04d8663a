//! Public-IP geolocation over HTTP
//!
//! The public address comes from ipify, the location from ip-api.com. Both are
//! free services with rate limits, so [`CachedGeolocation`] keeps a located
//! result around for a while instead of asking every poll.

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use duke_status_core::GeolocationProvider;
use duke_status_types::GeoLocation;
use serde::Deserialize;
use std::net::IpAddr;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

const PUBLIC_IP_URL: &str = "https://api.ipify.org?format=json";
const LOOKUP_URL: &str = "http://ip-api.com/json";

/// Default HTTP timeout for each request
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(5);

/// How long a located result is reused
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(10 * 60);

#[derive(Debug, Deserialize)]
struct PublicIpResponse {
    ip: IpAddr,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LookupResponse {
    status: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    country: String,
    #[serde(default)]
    country_code: String,
    #[serde(default)]
    region_name: String,
}

impl LookupResponse {
    fn into_location(self) -> Result<GeoLocation> {
        if self.status != "success" {
            bail!(
                "geolocation lookup failed: {}",
                self.message.as_deref().unwrap_or("no reason given")
            );
        }
        Ok(GeoLocation::new(self.country, self.country_code, self.region_name))
    }
}

/// Geolocation via public HTTP services
pub struct HttpGeolocation {
    client: reqwest::Client,
    public_ip_url: String,
    lookup_url: String,
}

impl HttpGeolocation {
    pub fn new(timeout: Duration) -> Result<Self> {
        Self::with_endpoints(timeout, PUBLIC_IP_URL, LOOKUP_URL)
    }

    /// Use alternative endpoints with the same response shapes
    pub fn with_endpoints(timeout: Duration, public_ip_url: &str, lookup_url: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("duke-status/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self {
            client,
            public_ip_url: public_ip_url.to_string(),
            lookup_url: lookup_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl GeolocationProvider for HttpGeolocation {
    async fn resolve_public_ip(&self) -> Result<IpAddr> {
        let response: PublicIpResponse = self
            .client
            .get(&self.public_ip_url)
            .send()
            .await
            .context("public IP request failed")?
            .error_for_status()?
            .json()
            .await
            .context("invalid public IP response")?;
        Ok(response.ip)
    }

    async fn lookup(&self, ip: IpAddr) -> Result<GeoLocation> {
        let url = format!("{}/{}", self.lookup_url, ip);
        let response: LookupResponse = self
            .client
            .get(&url)
            .send()
            .await
            .context("geolocation request failed")?
            .error_for_status()?
            .json()
            .await
            .context("invalid geolocation response")?;
        response.into_location()
    }
}

/// Reuses a located result for `ttl`; failures are never cached
pub struct CachedGeolocation<P> {
    inner: P,
    ttl: Duration,
    cached: Mutex<Option<(Instant, GeoLocation)>>,
}

impl<P: GeolocationProvider> CachedGeolocation<P> {
    pub fn new(inner: P, ttl: Duration) -> Self {
        Self {
            inner,
            ttl,
            cached: Mutex::new(None),
        }
    }
}

#[async_trait]
impl<P: GeolocationProvider> GeolocationProvider for CachedGeolocation<P> {
    async fn resolve_public_ip(&self) -> Result<IpAddr> {
        self.inner.resolve_public_ip().await
    }

    async fn lookup(&self, ip: IpAddr) -> Result<GeoLocation> {
        self.inner.lookup(ip).await
    }

    async fn locate(&self) -> Result<GeoLocation> {
        // Held across the lookup so concurrent callers share one request
        let mut cached = self.cached.lock().await;
        if let Some((at, location)) = cached.as_ref() {
            if at.elapsed() < self.ttl {
                return Ok(location.clone());
            }
        }

        let location = self.inner.locate().await?;
        log::debug!(
            "Located as {} / {} ({})",
            location.country,
            location.region,
            location.country_code
        );
        *cached = Some((Instant::now(), location.clone()));
        Ok(location)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use duke_status_core::fixed::FixedGeolocation;
    use std::sync::Arc;

    #[test]
    fn test_lookup_response_success() {
        let json = r#"{"status":"success","country":"United States","countryCode":"US",
            "region":"OR","regionName":"Oregon","query":"203.0.113.7"}"#;
        let response: LookupResponse = serde_json::from_str(json).unwrap();
        assert_eq!(
            response.into_location().unwrap(),
            GeoLocation::new("United States", "US", "Oregon")
        );
    }

    #[test]
    fn test_lookup_response_failure() {
        let json = r#"{"status":"fail","message":"reserved range","query":"10.0.0.1"}"#;
        let response: LookupResponse = serde_json::from_str(json).unwrap();
        let err = response.into_location().unwrap_err();
        assert!(err.to_string().contains("reserved range"));
    }

    #[test]
    fn test_public_ip_response() {
        let response: PublicIpResponse = serde_json::from_str(r#"{"ip":"203.0.113.7"}"#).unwrap();
        assert_eq!(response.ip.to_string(), "203.0.113.7");
    }

    #[test]
    fn test_lookup_url_trailing_slash() {
        let geo = HttpGeolocation::with_endpoints(DEFAULT_HTTP_TIMEOUT, PUBLIC_IP_URL, "http://x/json/").unwrap();
        assert_eq!(geo.lookup_url, "http://x/json");
    }

    /// Forwards to a shared fixed provider so the test can inspect call counts
    struct Shared(Arc<FixedGeolocation>);

    #[async_trait]
    impl GeolocationProvider for Shared {
        async fn resolve_public_ip(&self) -> Result<IpAddr> {
            self.0.resolve_public_ip().await
        }

        async fn lookup(&self, ip: IpAddr) -> Result<GeoLocation> {
            self.0.lookup(ip).await
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_cache_reuses_until_ttl() {
        let inner = Arc::new(FixedGeolocation::new(GeoLocation::new("United States", "US", "Ohio")));
        let cached = CachedGeolocation::new(Shared(Arc::clone(&inner)), Duration::from_secs(60));

        cached.locate().await.unwrap();
        cached.locate().await.unwrap();
        assert_eq!(inner.lookups(), 1);

        tokio::time::advance(Duration::from_secs(61)).await;
        cached.locate().await.unwrap();
        assert_eq!(inner.lookups(), 2);
    }

    #[tokio::test]
    async fn test_cache_does_not_keep_failures() {
        let inner = Arc::new(FixedGeolocation::none());
        let cached = CachedGeolocation::new(Shared(Arc::clone(&inner)), Duration::from_secs(60));

        assert!(cached.locate().await.is_err());
        inner.set_location(Some(GeoLocation::new("United States", "US", "Ohio")));
        assert_eq!(cached.locate().await.unwrap().region, "Ohio");
    }
}
