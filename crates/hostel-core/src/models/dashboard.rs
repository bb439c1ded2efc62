use serde::{Deserialize, Serialize};

/// Headline counters shown on the admin dashboard.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct DashboardDetails {
    #[serde(rename = "numberOfStudents", default)]
    pub number_of_students: u32,
    // The backend spells this key without the "n".
    #[serde(rename = "complaitsPending", default)]
    pub complaints_pending: u32,
    #[serde(rename = "numberOfRooms", default)]
    pub number_of_rooms: u32,
    #[serde(rename = "numberOfStaff", default)]
    pub number_of_staff: u32,
}

impl DashboardDetails {
    /// Label/value pairs in dashboard card order.
    pub fn tiles(&self) -> [(&'static str, u32); 4] {
        [
            ("Students", self.number_of_students),
            ("Complaints", self.complaints_pending),
            ("Rooms", self.number_of_rooms),
            ("Staff", self.number_of_staff),
        ]
    }
}
