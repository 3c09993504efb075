//! Paper acquisition by DOI or direct URL.
//!
//! Both fetchers deliberately return `Option<Vec<u8>>`: any transport
//! error or non-success status means "no document", and the caller skips
//! processing instead of failing.

use reqwest::header::ACCEPT;
use reqwest::Client;

/// Resolve a DOI through `https://doi.org/{doi}`, asking for a PDF.
pub async fn fetch_from_doi(client: &Client, doi: &str) -> Option<Vec<u8>> {
    let url = format!("https://doi.org/{}", doi.trim());
    fetch(client, &url, Some("application/pdf")).await
}

/// Fetch raw document bytes from a direct URL.
pub async fn fetch_from_url(client: &Client, url: &str) -> Option<Vec<u8>> {
    fetch(client, url.trim(), None).await
}

async fn fetch(client: &Client, url: &str, accept: Option<&str>) -> Option<Vec<u8>> {
    let mut request = client.get(url);
    if let Some(accept) = accept {
        request = request.header(ACCEPT, accept);
    }

    match request.send().await {
        Ok(response) if response.status().is_success() => match response.bytes().await {
            Ok(bytes) => Some(bytes.to_vec()),
            Err(e) => {
                log::warn!("failed to read body from {}: {}", url, e);
                None
            }
        },
        Ok(response) => {
            log::warn!("fetch of {} answered {}", url, response.status());
            None
        }
        Err(e) => {
            log::warn!("fetch of {} failed: {}", url, e);
            None
        }
    }
}
