use serde::Serialize;

use crate::api::{ApiError, ApiResult};
use crate::models::Record;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
#[serde(rename_all = "lowercase")]
pub enum SessionMode {
    Create,
    Edit,
    View,
}

/// The record currently open in the editor, if any.
///
/// Each variant owns its working copy; closing drops it without saving.
#[derive(Debug, Clone, PartialEq)]
pub enum EditSession<T> {
    Closed,
    Viewing(T),
    Editing(T),
    Creating(T),
}

impl<T> Default for EditSession<T> {
    fn default() -> Self {
        EditSession::Closed
    }
}

impl<T: Record> EditSession<T> {
    pub fn open(mode: SessionMode, record: T) -> Self {
        match mode {
            SessionMode::Create => EditSession::Creating(record),
            SessionMode::Edit => EditSession::Editing(record),
            SessionMode::View => EditSession::Viewing(record),
        }
    }

    pub fn mode(&self) -> Option<SessionMode> {
        match self {
            EditSession::Closed => None,
            EditSession::Viewing(_) => Some(SessionMode::View),
            EditSession::Editing(_) => Some(SessionMode::Edit),
            EditSession::Creating(_) => Some(SessionMode::Create),
        }
    }

    pub fn record(&self) -> Option<&T> {
        match self {
            EditSession::Closed => None,
            EditSession::Viewing(r) | EditSession::Editing(r) | EditSession::Creating(r) => Some(r),
        }
    }

    pub fn is_open(&self) -> bool {
        !matches!(self, EditSession::Closed)
    }

    pub fn is_editable(&self) -> bool {
        matches!(self, EditSession::Editing(_) | EditSession::Creating(_))
    }

    /// Replace one field of the working copy. Only allowed while editing or
    /// creating; on error the working copy is left untouched.
    pub fn change_field(&mut self, field: &str, value: &str) -> ApiResult<()> {
        match self {
            EditSession::Editing(record) | EditSession::Creating(record) => {
                let mut updated = record.clone();
                updated.set_field(field, value)?;
                *record = updated;
                Ok(())
            }
            EditSession::Viewing(_) => Err(ApiError::Validation(format!(
                "{} is open read-only",
                T::LABEL
            ))),
            EditSession::Closed => Err(ApiError::Validation(format!(
                "No {} is open",
                T::LABEL.to_lowercase()
            ))),
        }
    }

    /// End the session, returning the discarded working copy.
    pub fn close(&mut self) -> Option<T> {
        match std::mem::take(self) {
            EditSession::Closed => None,
            EditSession::Viewing(r) | EditSession::Editing(r) | EditSession::Creating(r) => Some(r),
        }
    }
}
