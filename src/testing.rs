//! Scripted in-memory `CloudApi` for tests.
//!
//! Records every call so tests can assert on what was (or was not) sent.

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::io::Cursor;
use uuid::Uuid;

use crate::api::models::{BackupDatabase, Link, OperationLinks};
use crate::api::{
    Account, Backup, BackupType, CloudApi, Database, DownloadStream, Environment, Notification,
    NotificationStatus, OperationResponse, RequestOptions, BASE_URI,
};
use crate::error::{AcquiaError, Result};

pub const FAKE_NOTIFICATION: &str = "7f9a0f7e-5d2c-4c4b-9a3e-1b6f0c2d8e41";

#[derive(Default)]
pub struct FakeApi {
    pub account: Option<Account>,
    pub environments: Vec<Environment>,
    pub databases: Vec<Database>,
    pub backups: HashMap<String, Vec<Backup>>,
    pub download: Option<Vec<u8>>,
    pub advertise_length: bool,
    statuses: RefCell<VecDeque<NotificationStatus>>,
    calls: RefCell<Vec<String>>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_account(mut self, account: Account) -> Self {
        self.account = Some(account);
        self
    }

    pub fn with_environment(mut self, id: &str, name: &str, label: &str) -> Self {
        self.environments.push(environment(id, name, label));
        self
    }

    pub fn with_database(mut self, name: &str) -> Self {
        self.databases.push(Database {
            id: Some(self.databases.len() as u64 + 1),
            name: name.to_string(),
        });
        self
    }

    pub fn with_backups(mut self, database: &str, backups: Vec<Backup>) -> Self {
        self.backups.insert(database.to_string(), backups);
        self
    }

    /// Statuses returned by successive notification polls; the last one repeats
    pub fn with_statuses(self, statuses: &[NotificationStatus]) -> Self {
        self.statuses.borrow_mut().extend(statuses.iter().copied());
        self
    }

    pub fn with_download(mut self, body: Vec<u8>, advertise_length: bool) -> Self {
        self.download = Some(body);
        self.advertise_length = advertise_length;
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    /// Number of recorded calls starting with `prefix`
    pub fn count(&self, prefix: &str) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|call| call.starts_with(prefix))
            .count()
    }

    fn record(&self, call: String) {
        self.calls.borrow_mut().push(call);
    }

    fn next_status(&self) -> NotificationStatus {
        let mut statuses = self.statuses.borrow_mut();
        if statuses.len() > 1 {
            statuses.pop_front().unwrap_or(NotificationStatus::InProgress)
        } else {
            statuses.front().copied().unwrap_or(NotificationStatus::InProgress)
        }
    }
}

fn filter_value<'o>(options: &'o RequestOptions, field: &str) -> Option<&'o str> {
    options
        .filter
        .as_deref()
        .and_then(|filter| filter.strip_prefix(field))
        .and_then(|rest| rest.strip_prefix('='))
}

fn operation(message: &str) -> OperationResponse {
    OperationResponse {
        message: message.to_string(),
        links: OperationLinks {
            notification: Some(Link {
                href: format!("{}/notifications/{}", BASE_URI, FAKE_NOTIFICATION),
            }),
        },
    }
}

impl CloudApi for FakeApi {
    fn base_uri(&self) -> &str {
        BASE_URI
    }

    fn account(&self) -> Result<Account> {
        self.record("GET account".to_string());
        self.account.clone().ok_or(AcquiaError::Api {
            status: 404,
            message: "no account".to_string(),
        })
    }

    fn environments(&self, application: &str, options: &RequestOptions) -> Result<Vec<Environment>> {
        self.record(format!("GET environments {}", application));
        let name = filter_value(options, "name");
        Ok(self
            .environments
            .iter()
            .filter(|env| name.map_or(true, |name| env.name == name))
            .cloned()
            .collect())
    }

    fn databases(&self, application: &str, options: &RequestOptions) -> Result<Vec<Database>> {
        self.record(format!("GET databases {}", application));
        let name = filter_value(options, "name");
        Ok(self
            .databases
            .iter()
            .filter(|db| name.map_or(true, |name| db.name == name))
            .cloned()
            .collect())
    }

    fn backups(
        &self,
        environment_id: &str,
        database: &str,
        options: &RequestOptions,
    ) -> Result<Vec<Backup>> {
        self.record(format!("GET backups {}/{}", environment_id, database));
        let mut backups = self.backups.get(database).cloned().unwrap_or_default();

        if options.sort.as_deref() == Some("-created") {
            backups.sort_by(|a, b| b.completed_at.cmp(&a.completed_at));
        }
        if let Some(limit) = options.limit {
            backups.truncate(limit as usize);
        }

        Ok(backups)
    }

    fn create_backup(&self, environment_id: &str, database: &str) -> Result<OperationResponse> {
        self.record(format!("POST backup {}/{}", environment_id, database));
        Ok(operation("Creating the backup."))
    }

    fn restore_backup(
        &self,
        environment_id: &str,
        database: &str,
        backup_id: u64,
    ) -> Result<OperationResponse> {
        self.record(format!("POST restore {}/{}/{}", environment_id, database, backup_id));
        Ok(operation("Restoring the database backup."))
    }

    fn download_backup(
        &self,
        environment_id: &str,
        database: &str,
        backup_id: u64,
    ) -> Result<DownloadStream> {
        self.record(format!("GET download {}/{}/{}", environment_id, database, backup_id));
        let body = self.download.clone().unwrap_or_default();

        Ok(DownloadStream {
            total: self.advertise_length.then_some(body.len() as u64),
            reader: Box::new(Cursor::new(body)),
        })
    }

    fn notification(&self, uuid: &Uuid) -> Result<Notification> {
        self.record(format!("GET notification {}", uuid));
        Ok(Notification {
            uuid: *uuid,
            status: self.next_status(),
            event: None,
            description: None,
            progress: None,
            created_at: None,
            completed_at: None,
        })
    }
}

pub fn environment(id: &str, name: &str, label: &str) -> Environment {
    Environment {
        id: id.to_string(),
        name: name.to_string(),
        label: label.to_string(),
    }
}

/// On-demand backup completed at an RFC 3339 timestamp
pub fn backup(id: u64, database: &str, completed_at: &str) -> Backup {
    Backup {
        id,
        backup_type: BackupType::OnDemand,
        completed_at: crate::api::models::timestamp::parse(completed_at),
        database: Some(BackupDatabase {
            id: None,
            name: database.to_string(),
        }),
    }
}
