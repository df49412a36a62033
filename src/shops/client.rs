// Remote shop listing client.
// Fetches the shop envelope over HTTP with the access credential and decodes it.

use async_trait::async_trait;
use reqwest::{
    Client, StatusCode,
    header::{ACCEPT, HeaderMap, HeaderName, HeaderValue, USER_AGENT},
};

use crate::config::Config;
use crate::error::{HoneyError, Result};

use super::decode;
use super::repository::ShopRepository;
use super::types::ShopRecord;

const MASTER_KEY_HEADER: &str = "x-master-key";

/// Live source of shop records. Never touches the local cache.
pub struct RemoteShopSource {
    client: Client,
    endpoint: String,
    master_key: Option<HeaderValue>,
}

impl RemoteShopSource {
    /// Create a source for the configured endpoint and credential.
    ///
    /// A missing credential is only reported when [`Self::fetch`] runs, so a
    /// cache-backed caller can still serve its snapshot without one.
    pub fn new(config: &Config) -> Result<Self> {
        let master_key = config
            .master_key
            .as_deref()
            .map(|raw| {
                let mut key = HeaderValue::from_str(raw).map_err(|e| HoneyError::InvalidConfig {
                    var: crate::config::ENV_MASTER_KEY.to_string(),
                    reason: e.to_string(),
                })?;
                key.set_sensitive(true);
                Ok::<_, HoneyError>(key)
            })
            .transpose()?;

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("honeyshops/", env!("CARGO_PKG_VERSION"))),
        );

        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            master_key,
        })
    }

    /// Create a source from environment configuration.
    pub fn from_env() -> Result<Self> {
        Self::new(&Config::from_env()?)
    }

    /// The URL this source fetches from.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Fetch and decode the current shop list.
    pub async fn fetch(&self) -> Result<Vec<ShopRecord>> {
        let key = self.master_key.clone().ok_or(HoneyError::MissingMasterKey)?;

        tracing::debug!(endpoint = %self.endpoint, "fetching shops");
        let response = self
            .client
            .get(&self.endpoint)
            .header(HeaderName::from_static(MASTER_KEY_HEADER), key)
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            tracing::warn!(endpoint = %self.endpoint, %status, "shop endpoint returned non-200");
            return Err(HoneyError::BadServerResponse(status));
        }

        let body = response.bytes().await?;
        let shops = Self::decode(&body)?;
        tracing::info!(count = shops.len(), "fetched shops from remote");
        Ok(shops)
    }

    /// Decode a raw envelope body.
    pub fn decode(body: &[u8]) -> Result<Vec<ShopRecord>> {
        decode::decode_envelope(body)
    }
}

#[async_trait]
impl ShopRepository for RemoteShopSource {
    async fn fetch_shops(&self) -> Result<Vec<ShopRecord>> {
        self.fetch().await
    }
}
