use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AcquiaError, Result};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AccountFlags {
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub tfa: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Account {
    pub name: String,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(default, with = "timestamp::option")]
    pub last_login_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub flags: AccountFlags,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Environment {
    #[serde(alias = "uuid")]
    pub id: String,
    pub label: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Database {
    #[serde(default)]
    pub id: Option<u64>,
    pub name: String,
}

/// Backup kind; types this client doesn't know keep their wire value
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(from = "String", into = "String")]
pub enum BackupType {
    Automatic,
    OnDemand,
    Scheduled,
    Other(String),
}

impl From<String> for BackupType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "daily" | "automatic" => BackupType::Automatic,
            "ondemand" | "on-demand" => BackupType::OnDemand,
            "scheduled" => BackupType::Scheduled,
            _ => BackupType::Other(value),
        }
    }
}

impl From<BackupType> for String {
    fn from(value: BackupType) -> Self {
        match value {
            BackupType::Automatic => "daily".to_string(),
            BackupType::OnDemand => "ondemand".to_string(),
            BackupType::Scheduled => "scheduled".to_string(),
            BackupType::Other(raw) => raw,
        }
    }
}

impl std::fmt::Display for BackupType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BackupType::Automatic => write!(f, "Daily"),
            BackupType::OnDemand => write!(f, "Ondemand"),
            BackupType::Scheduled => write!(f, "Scheduled"),
            BackupType::Other(raw) => {
                let mut chars = raw.chars();
                match chars.next() {
                    Some(first) => write!(f, "{}{}", first.to_uppercase(), chars.as_str()),
                    None => Ok(()),
                }
            }
        }
    }
}

/// Reference to the database a backup belongs to
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BackupDatabase {
    #[serde(default)]
    pub id: Option<u64>,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Backup {
    pub id: u64,
    #[serde(rename = "type")]
    pub backup_type: BackupType,
    #[serde(default, with = "timestamp::option")]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub database: Option<BackupDatabase>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum NotificationStatus {
    Pending,
    InProgress,
    Completed,
    Failed,
    #[serde(other)]
    Unknown,
}

impl NotificationStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, NotificationStatus::Completed | NotificationStatus::Failed)
    }
}

impl std::fmt::Display for NotificationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NotificationStatus::Pending => write!(f, "pending"),
            NotificationStatus::InProgress => write!(f, "in-progress"),
            NotificationStatus::Completed => write!(f, "completed"),
            NotificationStatus::Failed => write!(f, "failed"),
            NotificationStatus::Unknown => write!(f, "unknown"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Notification {
    pub uuid: Uuid,
    pub status: NotificationStatus,
    #[serde(default)]
    pub event: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub progress: Option<u8>,
    #[serde(default, with = "timestamp::option")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, with = "timestamp::option")]
    pub completed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Link {
    pub href: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct OperationLinks {
    #[serde(default)]
    pub notification: Option<Link>,
}

/// Body returned by every mutating call (backup, restore, ...)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OperationResponse {
    #[serde(default)]
    pub message: String,
    #[serde(rename = "_links", default)]
    pub links: OperationLinks,
}

impl OperationResponse {
    /// Extract the notification UUID from `_links.notification.href`
    pub fn notification_uuid(&self) -> Result<Uuid> {
        let href = self
            .links
            .notification
            .as_ref()
            .map(|link| link.href.as_str())
            .ok_or_else(|| AcquiaError::InvalidNotificationLink(self.message.clone()))?;

        let segment = href.trim_end_matches('/').rsplit('/').next().unwrap_or_default();
        Uuid::parse_str(segment).map_err(|_| AcquiaError::InvalidNotificationLink(href.to_string()))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Embedded<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
}

/// Paged list envelope used by every collection endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct Collection<T> {
    #[serde(default)]
    pub total: Option<u64>,
    #[serde(rename = "_embedded")]
    pub embedded: Embedded<T>,
}

impl<T> Collection<T> {
    pub fn into_items(self) -> Vec<T> {
        self.embedded.items
    }
}

/// Error body returned by the Cloud API and the token endpoint
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error_description: Option<String>,
}

impl ErrorBody {
    pub fn into_message(self) -> Option<String> {
        self.message.or(self.error_description).or(self.error)
    }
}

/// Timestamps arrive either as RFC 3339 or with a colon-less offset (`-0500`).
pub(crate) mod timestamp {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn parse(value: &str) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(value)
            .or_else(|_| DateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%z"))
            .or_else(|_| DateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f%z"))
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_rfc3339())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {raw}")))
    }

    pub mod option {
        use chrono::{DateTime, Utc};
        use serde::{Deserialize, Deserializer, Serializer};

        pub fn serialize<S: Serializer>(
            value: &Option<DateTime<Utc>>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match value {
                Some(dt) => serializer.serialize_some(&dt.to_rfc3339()),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<DateTime<Utc>>, D::Error> {
            match Option::<String>::deserialize(deserializer)? {
                None => Ok(None),
                Some(raw) if raw.is_empty() => Ok(None),
                Some(raw) => super::parse(&raw)
                    .map(Some)
                    .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {raw}"))),
            }
        }
    }
}
