use serde::{Deserialize, Deserializer, Serialize};

use super::record::{Record, RecordId, ResourceMessages};
use crate::api::{ApiError, ApiResult};
use crate::utils::eq_ignore_case;

/// Placeholder shown for students without an allotted room
const NO_ROOM: &str = "---";

/// A hostel resident's record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct StudentInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    #[serde(rename = "studentName", default)]
    pub student_name: String,
    #[serde(rename = "mobileNumber", default, deserialize_with = "string_or_number")]
    pub mobile_number: String,
    #[serde(
        rename = "roomNumber",
        default,
        deserialize_with = "optional_string_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub room_number: Option<String>,
    #[serde(rename = "guardianName", default)]
    pub guardian_name: String,
    #[serde(default)]
    pub email: String,
    /// Only sent when registering a new student.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    /// Form-only field, never sent to the server.
    #[serde(skip)]
    #[cfg_attr(feature = "ts", ts(skip))]
    pub confirm_password: Option<String>,
}

impl StudentInfo {
    pub fn room_display(&self) -> &str {
        match self.room_number.as_deref() {
            Some(room) if !room.trim().is_empty() => room,
            _ => NO_ROOM,
        }
    }

    fn is_new(&self) -> bool {
        self.persisted_id().is_none()
    }
}

impl Record for StudentInfo {
    const LABEL: &'static str = "Student";
    const PLURAL: &'static str = "students";
    const MESSAGES: ResourceMessages = ResourceMessages {
        created: "Data saved successfully",
        create_failed: "Data not saved",
        updated: "Data updated successfully",
        update_failed: "Data not updated",
        deleted: "Student data deleted",
        delete_failed: "Error, data not deleted",
    };
    const CHECKS_COLLECTION: bool = true;

    fn id(&self) -> Option<&RecordId> {
        self.id.as_ref()
    }

    fn with_id(mut self, id: RecordId) -> Self {
        self.id = Some(id);
        self
    }

    fn display_name(&self) -> &str {
        &self.student_name
    }

    fn blank() -> Self {
        Self::default()
    }

    fn set_field(&mut self, field: &str, value: &str) -> ApiResult<()> {
        match field {
            "studentName" => self.student_name = value.to_string(),
            "mobileNumber" => self.mobile_number = value.to_string(),
            "roomNumber" => {
                self.room_number = if value.trim().is_empty() {
                    None
                } else {
                    Some(value.to_string())
                }
            }
            "guardianName" => self.guardian_name = value.to_string(),
            "email" => self.email = value.to_string(),
            "password" if self.is_new() => self.password = Some(value.to_string()),
            "confirmPassword" if self.is_new() => self.confirm_password = Some(value.to_string()),
            "id" => return Err(ApiError::Validation("Identifier cannot be edited".to_string())),
            other => return Err(ApiError::UnknownField(other.to_string())),
        }
        Ok(())
    }

    fn validate(&self) -> ApiResult<()> {
        if self.is_new() && self.password != self.confirm_password {
            return Err(ApiError::Validation("Passwords do not match".to_string()));
        }
        Ok(())
    }

    fn conflicts_with(&self, existing: &Self) -> Option<String> {
        let email = self.email.trim();
        if email.is_empty() || existing.persisted_id() == self.persisted_id() {
            return None;
        }
        if eq_ignore_case(existing.email.trim(), email) {
            Some("Email already exists".to_string())
        } else {
            None
        }
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(optional_string_or_number(deserializer)?.unwrap_or_default())
}

fn optional_string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(serde_json::Value::Null) => None,
        Some(serde_json::Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}
