use arete_core::config::CloudConfig;
use arete_core::errors::{AreteResult, CloudError};
use arete_core::traits::IRemoteStore;
use arete_core::Store;
use arete_observability::events;
use chrono::Utc;

use super::http_client::{HttpClient, HttpClientConfig};
use super::protocol::{decode_identity, IdentityPayload, IDENTITY_PATH};

/// Remote identity store over HTTP: `GET`/`PUT {endpoint}/api/v1/identity`.
#[derive(Debug)]
pub struct HttpRemoteStore {
    client: HttpClient,
}

impl HttpRemoteStore {
    pub fn new(client: HttpClient) -> Self {
        Self { client }
    }

    /// Build from config; fails with `NotConfigured` when no endpoint is set.
    pub fn from_config(config: &CloudConfig) -> AreteResult<Self> {
        if !config.is_configured() {
            return Err(CloudError::NotConfigured.into());
        }
        let mut client = HttpClient::new(HttpClientConfig::from_cloud_config(config));
        if let Some(token) = config.api_token.as_deref().filter(|t| !t.trim().is_empty()) {
            client.set_bearer_token(token.trim().to_string());
        }
        Ok(Self::new(client))
    }
}

impl IRemoteStore for HttpRemoteStore {
    fn fetch_identity(&self) -> AreteResult<Option<Store>> {
        let Some(body) = self.client.get_optional::<serde_json::Value>(IDENTITY_PATH)? else {
            return Ok(None);
        };
        let (store, dropped) = decode_identity(body)?;
        if !dropped.is_empty() {
            events::invalid_facts_dropped("remote", &dropped);
        }
        Ok(Some(store))
    }

    fn save_identity(&self, store: &Store) -> AreteResult<()> {
        self.client
            .put(IDENTITY_PATH, &IdentityPayload::new(store.clone(), Utc::now()))
    }
}
