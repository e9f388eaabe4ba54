use std::time::Duration;

use tracing::{debug, info};
use wreq::Client;

use crate::error::{self, ViewerError};
use crate::model::FlightOffer;
use crate::parse;

pub const DEFAULT_SOURCE: &str = "flights.json";

#[derive(Debug, Clone)]
pub struct FetchOptions {
    pub proxy: Option<String>,
    pub timeout: u64,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            proxy: None,
            timeout: 30,
        }
    }
}

fn is_remote(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

pub async fn fetch_remote(url: &str, options: &FetchOptions) -> Result<String, ViewerError> {
    let mut builder = Client::builder().timeout(Duration::from_secs(options.timeout));

    if let Some(ref proxy) = options.proxy {
        builder = builder.proxy(wreq::Proxy::all(proxy).map_err(error::from_http_error)?);
    }

    let client = builder.build().map_err(error::from_http_error)?;

    let response = client
        .get(url)
        .send()
        .await
        .map_err(error::from_http_error)?;

    let status = response.status().as_u16();
    debug!(url, status, "fetched flight document");
    if status >= 400 {
        return Err(ViewerError::HttpStatus(status));
    }

    response.text().await.map_err(error::from_http_error)
}

pub async fn read_local(path: &str) -> Result<String, ViewerError> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|e| error::from_io_error(e, path))
}

/// Reads the flight document once, from a path or an http(s) URL.
pub async fn load(source: &str, options: &FetchOptions) -> Result<Vec<FlightOffer>, ViewerError> {
    let body = if is_remote(source) {
        fetch_remote(source, options).await?
    } else {
        read_local(source).await?
    };

    let offers = parse::parse_document(&body)?;
    info!(source, offers = offers.len(), "loaded flights");
    Ok(offers)
}
