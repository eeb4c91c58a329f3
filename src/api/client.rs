// PokéAPI HTTP client.
// Issues single GET requests and converts non-success statuses into errors.

use reqwest::{
    Client, Response, StatusCode,
    header::{ACCEPT, HeaderMap, HeaderValue, USER_AGENT},
};
use serde_json::Value;

use crate::error::{Error, Result};

/// A single remote call, without caching or retries.
///
/// Implemented by [`PokeApiClient`] for real traffic and by in-memory fakes
/// in tests.
#[allow(async_fn_in_trait)]
pub trait Remote {
    /// GET `url` and decode the body as JSON.
    async fn get_json(&self, url: &str) -> Result<Value>;

    /// GET `url` and return the raw body.
    async fn get_bytes(&self, url: &str) -> Result<Vec<u8>>;
}

/// HTTP client for the PokéAPI.
pub struct PokeApiClient {
    client: Client,
}

impl PokeApiClient {
    pub fn new() -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("pokefetch/", env!("CARGO_PKG_VERSION"))),
        );

        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(Error::Http)?;

        Ok(Self { client })
    }

    async fn get(&self, url: &str) -> Result<Response> {
        let response = self.client.get(url).send().await.map_err(Error::Http)?;
        check_response(response)
    }
}

impl Remote for PokeApiClient {
    async fn get_json(&self, url: &str) -> Result<Value> {
        let response = self.get(url).await?;
        let value: Value = response.json().await?;
        Ok(value)
    }

    async fn get_bytes(&self, url: &str) -> Result<Vec<u8>> {
        let response = self.get(url).await?;
        let bytes = response.bytes().await?;
        Ok(bytes.to_vec())
    }
}

/// Check response status and convert errors.
fn check_response(response: Response) -> Result<Response> {
    match response.status() {
        StatusCode::OK => Ok(response),
        status => Err(Error::Status {
            status,
            url: response.url().to_string(),
        }),
    }
}
