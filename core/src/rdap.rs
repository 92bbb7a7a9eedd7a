// core/src/rdap.rs

//! RDAP-backed registry client.
//!
//! `GET {base}/domain/{name}`: a 404 means the domain is unregistered, a
//! 429 means the registry throttled us, any 2xx body means the domain
//! exists.

use crate::availability::{DomainAvailabilityClient, RegistryAnswer};
use crate::error::CoreError;
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, instrument};

pub const DEFAULT_RDAP_BASE: &str = "https://rdap.org";

const LOOKUP_TIMEOUT: Duration = Duration::from_secs(10);

pub struct RdapClient {
  http: reqwest::Client,
  base_url: String,
}

impl RdapClient {
  pub fn new(base_url: impl Into<String>) -> Result<Self, CoreError> {
    let http = reqwest::Client::builder()
      .timeout(LOOKUP_TIMEOUT)
      .build()
      .map_err(|e| CoreError::Config(format!("Failed to build RDAP HTTP client: {}", e)))?;
    Ok(Self {
      http,
      base_url: base_url.into().trim_end_matches('/').to_string(),
    })
  }
}

#[async_trait]
impl DomainAvailabilityClient for RdapClient {
  #[instrument(name = "RdapClient::lookup", skip(self), err(Display))]
  async fn lookup(&self, domain: &str) -> Result<RegistryAnswer, CoreError> {
    let url = format!("{}/domain/{}", self.base_url, domain);
    let response = self.http.get(&url).send().await.map_err(|e| CoreError::Registry {
      domain: domain.to_string(),
      source: e.into(),
    })?;

    let status = response.status();
    debug!(domain = %domain, status = %status, "RDAP lookup answered.");

    if status == reqwest::StatusCode::NOT_FOUND {
      Ok(RegistryAnswer::Available)
    } else if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
      Ok(RegistryAnswer::RateLimited)
    } else if status.is_success() {
      Ok(RegistryAnswer::Taken)
    } else {
      Err(CoreError::Registry {
        domain: domain.to_string(),
        source: anyhow::anyhow!("registry returned unexpected status {}", status),
      })
    }
  }
}
