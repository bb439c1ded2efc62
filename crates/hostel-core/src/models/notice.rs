use serde::{Deserialize, Serialize};

use super::record::{Record, RecordId, ResourceMessages};
use crate::api::{ApiError, ApiResult};
use crate::utils::{format_date, today, truncate_string};

/// A notice posted on the admin dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct Notice {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub content: String,
}

impl Notice {
    pub fn new(title: &str, date: &str, content: &str) -> Self {
        Self {
            id: None,
            title: title.to_string(),
            date: date.to_string(),
            content: content.to_string(),
        }
    }

    pub fn date_display(&self) -> String {
        format_date(&self.date)
    }

    /// Short single-line preview of the content for list rows.
    pub fn preview(&self, max_len: usize) -> String {
        let first_line = self.content.lines().next().unwrap_or_default();
        truncate_string(first_line, max_len)
    }
}

impl Record for Notice {
    const LABEL: &'static str = "Notice";
    const PLURAL: &'static str = "notices";
    const MESSAGES: ResourceMessages = ResourceMessages {
        created: "Notice saved",
        create_failed: "Notice not saved",
        updated: "Notice updated",
        update_failed: "Notice not updated",
        deleted: "Notice deleted",
        delete_failed: "Notice not deleted",
    };

    fn id(&self) -> Option<&RecordId> {
        self.id.as_ref()
    }

    fn with_id(mut self, id: RecordId) -> Self {
        self.id = Some(id);
        self
    }

    fn display_name(&self) -> &str {
        &self.title
    }

    fn blank() -> Self {
        Self::new("", &today(), "")
    }

    fn set_field(&mut self, field: &str, value: &str) -> ApiResult<()> {
        match field {
            "title" => self.title = value.to_string(),
            "date" => self.date = value.to_string(),
            "content" => self.content = value.to_string(),
            "id" => return Err(ApiError::Validation("Identifier cannot be edited".to_string())),
            other => return Err(ApiError::UnknownField(other.to_string())),
        }
        Ok(())
    }
}
