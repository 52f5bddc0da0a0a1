// Cloud API access: typed records, per-request options and the HTTP client
pub mod client;
pub mod models;


use std::io::Read;
use uuid::Uuid;

use crate::error::{AcquiaError, Result};

pub use client::{AcquiaClient, BASE_URI, TOKEN_URI};
pub use models::{
    Account, Backup, BackupType, Database, Environment, Notification, NotificationStatus,
    OperationResponse,
};

/// Query options for a single request.
///
/// Built fresh for every call and never stored on the client, so one call's
/// filter can't leak into the next.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestOptions {
    pub filter: Option<String>,
    pub sort: Option<String>,
    pub limit: Option<u32>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// `filter=field=value`
    pub fn filter(mut self, field: &str, value: &str) -> Self {
        self.filter = Some(format!("{}={}", field, value));
        self
    }

    /// Sort key, prefix with `-` for descending order
    pub fn sort(mut self, key: &str) -> Self {
        self.sort = Some(key.to_string());
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(filter) = &self.filter {
            pairs.push(("filter", filter.clone()));
        }
        if let Some(sort) = &self.sort {
            pairs.push(("sort", sort.clone()));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit", limit.to_string()));
        }
        pairs
    }
}

/// An open backup download: body reader plus the advertised size, if any
pub struct DownloadStream {
    pub total: Option<u64>,
    pub reader: Box<dyn Read>,
}

impl std::fmt::Debug for DownloadStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DownloadStream")
            .field("total", &self.total)
            .finish_non_exhaustive()
    }
}

/// Operations the commands need from the Cloud API
pub trait CloudApi {
    /// Base URI the API is served from
    fn base_uri(&self) -> &str;

    fn account(&self) -> Result<Account>;

    fn environments(&self, application: &str, options: &RequestOptions) -> Result<Vec<Environment>>;

    fn databases(&self, application: &str, options: &RequestOptions) -> Result<Vec<Database>>;

    fn backups(
        &self,
        environment_id: &str,
        database: &str,
        options: &RequestOptions,
    ) -> Result<Vec<Backup>>;

    fn create_backup(&self, environment_id: &str, database: &str) -> Result<OperationResponse>;

    fn restore_backup(
        &self,
        environment_id: &str,
        database: &str,
        backup_id: u64,
    ) -> Result<OperationResponse>;

    fn download_backup(
        &self,
        environment_id: &str,
        database: &str,
        backup_id: u64,
    ) -> Result<DownloadStream>;

    fn notification(&self, uuid: &Uuid) -> Result<Notification>;
}

/// Look up an environment of an application by its machine name
pub fn resolve_environment(
    api: &dyn CloudApi,
    application: &str,
    environment: &str,
) -> Result<Environment> {
    let options = RequestOptions::new().filter("name", environment);
    api.environments(application, &options)?
        .into_iter()
        .find(|env| env.name == environment)
        .ok_or_else(|| AcquiaError::EnvironmentNotFound {
            application: application.to_string(),
            environment: environment.to_string(),
        })
}

pub fn backup_download_path(environment_id: &str, database: &str, backup_id: u64) -> String {
    format!(
        "/environments/{}/databases/{}/backups/{}/actions/download",
        environment_id, database, backup_id
    )
}

/// Full download URL of a backup. Pure formatting, nothing is requested.
pub fn backup_download_link(
    base_uri: &str,
    environment_id: &str,
    database: &str,
    backup_id: u64,
) -> String {
    format!(
        "{}{}",
        base_uri.trim_end_matches('/'),
        backup_download_path(environment_id, database, backup_id)
    )
}
