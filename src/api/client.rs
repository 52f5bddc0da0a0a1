use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use ureq::{Agent, AgentBuilder, Request, Response};
use uuid::Uuid;

use super::models::{
    Account, Backup, Collection, Database, Environment, ErrorBody, Notification, OperationResponse,
};
use super::{backup_download_path, CloudApi, DownloadStream, RequestOptions};
use crate::config::Credentials;
use crate::error::{AcquiaError, Result};

pub const BASE_URI: &str = "https://cloud.acquia.com/api";
pub const TOKEN_URI: &str = "https://accounts.acquia.com/api/auth/oauth/token";

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Blocking Cloud API client.
///
/// Holds an agent and a bearer token fetched once with the client-credentials
/// grant. Nothing on the client changes between requests.
pub struct AcquiaClient {
    agent: Agent,
    base_uri: String,
    token: String,
}

impl std::fmt::Debug for AcquiaClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AcquiaClient")
            .field("base_uri", &self.base_uri)
            .field("token", &"<redacted>")
            .finish_non_exhaustive()
    }
}

impl AcquiaClient {
    /// Authenticate against the production endpoints
    pub fn connect(credentials: &Credentials) -> Result<Self> {
        Self::connect_to(credentials, BASE_URI, TOKEN_URI)
    }

    pub fn connect_to(credentials: &Credentials, base_uri: &str, token_uri: &str) -> Result<Self> {
        if credentials.key.is_empty() || credentials.secret.is_empty() {
            return Err(AcquiaError::MissingCredentials);
        }

        let agent = AgentBuilder::new()
            .timeout_connect(Duration::from_secs(10))
            .user_agent(concat!("acquiacli/", env!("CARGO_PKG_VERSION")))
            .build();

        tracing::debug!(token_uri, "Requesting access token");

        let response = agent
            .post(token_uri)
            .send_form(&[
                ("grant_type", "client_credentials"),
                ("client_id", credentials.key.as_str()),
                ("client_secret", credentials.secret.as_str()),
            ])
            .map_err(api_error)?;

        let token: TokenResponse = response.into_json()?;

        Ok(Self {
            agent,
            base_uri: base_uri.trim_end_matches('/').to_string(),
            token: token.access_token,
        })
    }

    fn authorized(&self, request: Request, options: &RequestOptions) -> Request {
        let mut request = request
            .set("Authorization", &format!("Bearer {}", self.token))
            .set("Accept", "application/json");
        for (key, value) in options.query_pairs() {
            request = request.query(key, &value);
        }
        request
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_uri, path)
    }

    fn get_raw(&self, path: &str, options: &RequestOptions) -> Result<Response> {
        let url = self.url(path);
        tracing::debug!(%url, query = ?options.query_pairs(), "GET");

        self.authorized(self.agent.get(&url), options)
            .call()
            .map_err(api_error)
    }

    fn get<T: DeserializeOwned>(&self, path: &str, options: &RequestOptions) -> Result<T> {
        Ok(self.get_raw(path, options)?.into_json()?)
    }

    fn get_items<T: DeserializeOwned>(&self, path: &str, options: &RequestOptions) -> Result<Vec<T>> {
        let collection: Collection<T> = self.get(path, options)?;
        Ok(collection.into_items())
    }

    fn post<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.url(path);
        tracing::debug!(%url, "POST");

        let response = self
            .authorized(self.agent.post(&url), &RequestOptions::default())
            .send_json(serde_json::json!({}))
            .map_err(api_error)?;

        Ok(response.into_json()?)
    }
}

impl CloudApi for AcquiaClient {
    fn base_uri(&self) -> &str {
        &self.base_uri
    }

    fn account(&self) -> Result<Account> {
        self.get("/account", &RequestOptions::default())
    }

    fn environments(&self, application: &str, options: &RequestOptions) -> Result<Vec<Environment>> {
        self.get_items(&format!("/applications/{}/environments", application), options)
    }

    fn databases(&self, application: &str, options: &RequestOptions) -> Result<Vec<Database>> {
        self.get_items(&format!("/applications/{}/databases", application), options)
    }

    fn backups(
        &self,
        environment_id: &str,
        database: &str,
        options: &RequestOptions,
    ) -> Result<Vec<Backup>> {
        let path = format!("/environments/{}/databases/{}/backups", environment_id, database);
        self.get_items(&path, options)
    }

    fn create_backup(&self, environment_id: &str, database: &str) -> Result<OperationResponse> {
        self.post(&format!(
            "/environments/{}/databases/{}/backups",
            environment_id, database
        ))
    }

    fn restore_backup(
        &self,
        environment_id: &str,
        database: &str,
        backup_id: u64,
    ) -> Result<OperationResponse> {
        self.post(&format!(
            "/environments/{}/databases/{}/backups/{}/actions/restore",
            environment_id, database, backup_id
        ))
    }

    fn download_backup(
        &self,
        environment_id: &str,
        database: &str,
        backup_id: u64,
    ) -> Result<DownloadStream> {
        let path = backup_download_path(environment_id, database, backup_id);
        let response = self.get_raw(&path, &RequestOptions::default())?;

        let total = response
            .header("Content-Length")
            .and_then(|value| value.parse::<u64>().ok());

        Ok(DownloadStream {
            total,
            reader: Box::new(response.into_reader()),
        })
    }

    fn notification(&self, uuid: &Uuid) -> Result<Notification> {
        self.get(&format!("/notifications/{}", uuid), &RequestOptions::default())
    }
}

/// Map a ureq failure onto the crate error, decoding the API error body when present
fn api_error(err: ureq::Error) -> AcquiaError {
    match err {
        ureq::Error::Status(status, response) => {
            let message = response
                .into_json::<ErrorBody>()
                .ok()
                .and_then(ErrorBody::into_message)
                .unwrap_or_else(|| "request failed".to_string());
            AcquiaError::Api { status, message }
        }
        ureq::Error::Transport(transport) => AcquiaError::Network(transport.to_string()),
    }
}
