//! The `Record` trait shared by every resource the managers handle.

use std::fmt;

use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::api::ApiResult;

/// Server-assigned record identifier.
///
/// json-server style backends hand out numeric ids while hosted JSON
/// services often use strings, so both shapes are accepted and written
/// back unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
#[serde(untagged)]
pub enum RecordId {
    Number(i64),
    Text(String),
}

impl RecordId {
    /// An empty string id counts as "not yet persisted".
    pub fn is_empty(&self) -> bool {
        matches!(self, RecordId::Text(s) if s.trim().is_empty())
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Number(n) => write!(f, "{}", n),
            RecordId::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for RecordId {
    fn from(value: i64) -> Self {
        RecordId::Number(value)
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        RecordId::Text(value.to_string())
    }
}

impl From<String> for RecordId {
    fn from(value: String) -> Self {
        RecordId::Text(value)
    }
}

/// Alert wording for the outcome of each mutation.
#[derive(Debug, Clone, Copy)]
pub struct ResourceMessages {
    pub created: &'static str,
    pub create_failed: &'static str,
    pub updated: &'static str,
    pub update_failed: &'static str,
    pub deleted: &'static str,
    pub delete_failed: &'static str,
}

/// A persisted business entity managed through a `ResourceManager`.
pub trait Record:
    Clone + fmt::Debug + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// Singular label, e.g. "Student"
    const LABEL: &'static str;

    /// Plural label used for list-level messages, e.g. "students"
    const PLURAL: &'static str;

    const MESSAGES: ResourceMessages;

    /// Whether `submit` must check the record against the whole collection
    /// (see `conflicts_with`) before saving.
    const CHECKS_COLLECTION: bool = false;

    /// Raw identifier as stored on the record.
    fn id(&self) -> Option<&RecordId>;

    /// Return a copy carrying the server-assigned identifier.
    /// Only adapters call this; edits never touch the id.
    fn with_id(self, id: RecordId) -> Self;

    /// Field used for search filtering.
    fn display_name(&self) -> &str;

    /// Working copy used when opening the editor in create mode.
    fn blank() -> Self;

    /// Replace one named field of the working copy.
    fn set_field(&mut self, field: &str, value: &str) -> ApiResult<()>;

    /// Checks that need nothing but the record itself.
    fn validate(&self) -> ApiResult<()> {
        Ok(())
    }

    /// Returns an error message if `self` clashes with an existing record.
    fn conflicts_with(&self, _existing: &Self) -> Option<String> {
        None
    }

    /// Identifier if the record has been persisted.
    fn persisted_id(&self) -> Option<&RecordId> {
        self.id().filter(|id| !id.is_empty())
    }
}
