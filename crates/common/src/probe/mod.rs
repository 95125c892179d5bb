//! TCP connectivity probe
//!
//! Connect-and-close against host:port with a per-address timeout, no payload.
//! The result is human-readable diagnostic text in the style of `nc -vz`;
//! an unreachable target is a successful probe whose text reports failure.
//! Only a failure of the probing facility itself is an error.

use crate::errors::{AppError, Result};
use crate::metrics;
use std::io;
use std::net::SocketAddr;
use std::time::{Duration, Instant};
use tokio::net::{lookup_host, TcpStream};
use tokio::time::timeout;
use tracing::debug;

/// Default connect timeout per resolved address
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(2);

/// Bounded-timeout TCP reachability checker
#[derive(Debug, Clone)]
pub struct ConnectivityProber {
    timeout: Duration,
}

impl Default for ConnectivityProber {
    fn default() -> Self {
        Self::new(DEFAULT_PROBE_TIMEOUT)
    }
}

impl ConnectivityProber {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    /// Probe host:port and return the diagnostic text
    pub async fn probe(&self, host: &str, port: u16) -> Result<String> {
        let start = Instant::now();
        let result = self.run(host, port).await;

        let label = match &result {
            Ok((_, true)) => "reachable",
            Ok((_, false)) => "unreachable",
            Err(_) => "error",
        };
        metrics::record_probe(start.elapsed().as_secs_f64(), label);
        debug!(host, port, result = label, "Connectivity probe finished");

        result.map(|(text, _)| text)
    }

    async fn run(&self, host: &str, port: u16) -> Result<(String, bool)> {
        let addrs: Vec<SocketAddr> = match timeout(self.timeout, lookup_host((host, port))).await {
            Ok(Ok(addrs)) => addrs.collect(),
            Ok(Err(e)) if is_invocation_failure(&e) => return Err(invocation_error(e)),
            Ok(Err(e)) => {
                return Ok((format!("getaddrinfo for host \"{}\" port {}: {}", host, port, e), false));
            }
            Err(_) => {
                return Ok((
                    format!("getaddrinfo for host \"{}\" port {}: timed out", host, port),
                    false,
                ));
            }
        };

        if addrs.is_empty() {
            return Ok((
                format!("getaddrinfo for host \"{}\" port {}: no addresses", host, port),
                false,
            ));
        }

        let mut lines = Vec::with_capacity(addrs.len());
        let mut reachable = false;

        for addr in addrs {
            match timeout(self.timeout, TcpStream::connect(addr)).await {
                Ok(Ok(_stream)) => {
                    lines.push(format!(
                        "Connection to {} ({}) {} port [tcp] succeeded!",
                        host,
                        addr.ip(),
                        port
                    ));
                    reachable = true;
                    break;
                }
                Ok(Err(e)) if is_invocation_failure(&e) => return Err(invocation_error(e)),
                Ok(Err(e)) => lines.push(format!(
                    "connect to {} ({}) port {} (tcp) failed: {}",
                    host,
                    addr.ip(),
                    port,
                    e
                )),
                Err(_) => lines.push(format!(
                    "connect to {} ({}) port {} (tcp) timed out after {}s",
                    host,
                    addr.ip(),
                    port,
                    self.timeout.as_secs_f64()
                )),
            }
        }

        let text = lines.join("\n").trim_end_matches('\n').to_string();
        Ok((text, reachable))
    }
}

/// Errors meaning the probe could not run at all, as opposed to the
/// target being unreachable
fn is_invocation_failure(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        io::ErrorKind::PermissionDenied | io::ErrorKind::Unsupported | io::ErrorKind::OutOfMemory
    ) || matches!(err.raw_os_error(), Some(23) | Some(24)) // ENFILE, EMFILE
}

fn invocation_error(err: io::Error) -> AppError {
    AppError::ProbeInvocation {
        message: err.to_string(),
    }
}
