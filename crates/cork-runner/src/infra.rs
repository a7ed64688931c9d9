//! This module contains utilities for fetching deployment addresses from an
//! artifacts server.

use std::time::Duration;

use cork_addresses::Addresses;
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::errors::{Result, RunnerError};

const RETRIES: usize = 5;
const RETRY_TIME: Duration = Duration::from_millis(500);

/// Polls the artifacts server for the deployment's addresses. The server may
/// still be coming up when the runner starts, so unsuccessful statuses are
/// retried a few times. Transport errors are not.
pub async fn query_addresses(artifacts_url: &str) -> Result<Addresses> {
    let config_error = |err: reqwest::Error| {
        RunnerError::Config(format!("artifacts server {}: {}", artifacts_url, err))
    };

    for attempt in 1..=RETRIES {
        let response = reqwest::get(artifacts_url).await.map_err(config_error)?;
        if response.status().is_success() {
            let addresses = response.json::<Addresses>().await.map_err(config_error)?;
            debug!(?addresses, "fetched addresses from the artifacts server");
            return Ok(addresses);
        }
        warn!(
            status = %response.status(),
            attempt,
            "artifacts server isn't ready"
        );
        sleep(RETRY_TIME).await;
    }

    Err(RunnerError::Config(format!(
        "couldn't get addresses from {} after {} retries",
        artifacts_url, RETRIES
    )))
}
