extern crate reqwest;

use std::time::Duration;

use log::{debug, info};
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue};

use crate::cfg::Settings;
use crate::errors::ClosingsError;

/// Builds the blocking HTTP client used to fetch the closings feed.
pub fn make_http_client(settings: &Settings) -> Result<Client, ClosingsError> {
    let pool_idle_timeout: u64 = 90;
    let pool_max_idle_connections: usize = 1;

    let mut headers = HeaderMap::new();
    headers.insert(
        reqwest::header::ACCEPT,
        HeaderValue::from_static("application/xml, text/xml;q=0.9, */*;q=0.8"),
    );
    // add do not track:
    headers.insert(reqwest::header::DNT, HeaderValue::from(1));

    let client = Client::builder()
        .timeout(Duration::from_secs(settings.fetch_timeout))
        .connect_timeout(Duration::from_secs(settings.connect_timeout))
        .user_agent(settings.user_agent.clone())
        .default_headers(headers)
        .gzip(true)
        .pool_idle_timeout(Duration::from_secs(pool_idle_timeout))
        .pool_max_idle_per_host(pool_max_idle_connections)
        .build()?;
    Ok(client)
}

/// Issues a single GET and returns the body. Non-2xx responses are errors; there is no retry.
pub fn http_get_binary(feed_url: &str, client: &Client) -> Result<bytes::Bytes, ClosingsError> {
    info!("HTTP GET {}", feed_url);
    let resp = client.get(feed_url).send()?;

    let status = resp.status();
    if !status.is_success() {
        return Err(ClosingsError::HttpStatus(status.as_u16()));
    }
    let binary_data = resp.bytes()?;
    debug!("HTTP GET retrieved bytes array of length: {}", binary_data.len());
    Ok(binary_data)
}
