//! Stream liveness probing service
//!
//! Decides whether a stream address answers at all. A probe resolves the
//! host, optionally rejects hosts without an IPv4 address, then issues a
//! `HEAD` request with a single ranged `GET` as fallback for servers that do
//! not implement `HEAD`. Any status in `[200, 400)` counts as reachable.

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::RANGE;
use std::net::SocketAddr;
use std::time::{Duration, Instant};
use tracing::{debug, trace};
use url::{Host, Url};

use crate::config::ProbeConfig;
use crate::errors::{AddressParseError, AppError, AppResult, ProbeError, ProbeResult};
use crate::models::AddressFamily;
use crate::utils::url::UrlUtils;

/// Liveness check for one stream address
#[async_trait]
pub trait LivenessProbe: Send + Sync {
    /// Address family the stream was reached over, or why it was not
    async fn probe(&self, address: &str) -> ProbeResult<AddressFamily>;
}

/// HTTP implementation of [`LivenessProbe`]
pub struct StreamProber {
    client: Client,
    require_ipv4: bool,
    request_timeout: Duration,
    deadline: Duration,
    range_bytes: u64,
}

impl StreamProber {
    pub fn new(config: &ProbeConfig) -> AppResult<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(AppError::Http)?;

        Ok(Self {
            client,
            require_ipv4: config.require_ipv4,
            request_timeout: config.request_timeout,
            deadline: config.deadline,
            range_bytes: config.range_bytes,
        })
    }

    async fn probe_within_deadline(&self, address: &str) -> ProbeResult<AddressFamily> {
        let url = Url::parse(address.trim()).map_err(|e| AddressParseError::Malformed {
            address: address.to_string(),
            reason: e.to_string(),
        })?;

        let family = self.resolve_family(&url).await?;
        if self.require_ipv4 && family != AddressFamily::Ipv4 {
            return Err(ProbeError::NoIpv4 {
                host: url.host_str().unwrap_or_default().to_string(),
            });
        }

        match self.head(url.as_str()).await {
            Ok(()) => Ok(family),
            Err(head_error) => {
                trace!(
                    "HEAD failed for {} ({}), retrying with ranged GET",
                    UrlUtils::obfuscate_credentials(address),
                    head_error
                );
                self.ranged_get(url.as_str()).await.map(|()| family)
            }
        }
    }

    async fn resolve_family(&self, url: &Url) -> ProbeResult<AddressFamily> {
        let host = url.host().ok_or_else(|| AddressParseError::MissingHost {
            address: url.to_string(),
        })?;

        match host {
            Host::Ipv4(_) => Ok(AddressFamily::Ipv4),
            Host::Ipv6(_) => Ok(AddressFamily::Ipv6Only),
            Host::Domain(domain) => {
                let port = url.port_or_known_default().unwrap_or(80);
                let resolved: Vec<SocketAddr> = tokio::net::lookup_host((domain, port))
                    .await
                    .map_err(|e| ProbeError::Dns {
                        host: domain.to_string(),
                        message: e.to_string(),
                    })?
                    .collect();

                if resolved.iter().any(SocketAddr::is_ipv4) {
                    Ok(AddressFamily::Ipv4)
                } else if !resolved.is_empty() {
                    Ok(AddressFamily::Ipv6Only)
                } else {
                    Err(ProbeError::Dns {
                        host: domain.to_string(),
                        message: "no addresses".to_string(),
                    })
                }
            }
        }
    }

    async fn head(&self, address: &str) -> ProbeResult<()> {
        let response = self
            .client
            .head(address)
            .timeout(self.request_timeout)
            .send()
            .await
            .map_err(|e| self.request_error(e))?;
        check_status(response.status().as_u16())
    }

    async fn ranged_get(&self, address: &str) -> ProbeResult<()> {
        let response = self
            .client
            .get(address)
            .header(RANGE, format!("bytes=0-{}", self.range_bytes))
            .timeout(self.request_timeout)
            .send()
            .await
            .map_err(|e| self.request_error(e))?;
        // The body is never read; dropping the response closes the stream
        check_status(response.status().as_u16())
    }

    fn request_error(&self, error: reqwest::Error) -> ProbeError {
        if error.is_timeout() {
            ProbeError::Timeout {
                elapsed_ms: self.request_timeout.as_millis() as u64,
            }
        } else {
            ProbeError::request(UrlUtils::obfuscate_credentials(&error.to_string()))
        }
    }
}

#[async_trait]
impl LivenessProbe for StreamProber {
    async fn probe(&self, address: &str) -> ProbeResult<AddressFamily> {
        let started = Instant::now();
        let result = match tokio::time::timeout(self.deadline, self.probe_within_deadline(address)).await
        {
            Ok(result) => result,
            Err(_) => Err(ProbeError::Timeout {
                elapsed_ms: started.elapsed().as_millis() as u64,
            }),
        };

        debug!(
            "Probed {} in {:?}: {}",
            UrlUtils::obfuscate_credentials(address),
            started.elapsed(),
            match &result {
                Ok(family) => format!("reachable over {family}"),
                Err(e) => format!("unreachable ({})", e.kind()),
            }
        );
        result
    }
}

fn check_status(status: u16) -> ProbeResult<()> {
    if (200..400).contains(&status) {
        Ok(())
    } else {
        Err(ProbeError::Status { status })
    }
}
