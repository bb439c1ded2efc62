//! Data models for hostel administration resources.
//!
//! This module contains the records the resource managers operate on:
//!
//! - `Record`, `RecordId`: the shared record contract and identifier
//! - `Notice`: dashboard notices
//! - `StudentInfo`: resident records
//! - `DashboardDetails`: read-only admin dashboard counters

pub mod dashboard;
pub mod notice;
pub mod record;
pub mod student;

pub use dashboard::DashboardDetails;
pub use notice::Notice;
pub use record::{Record, RecordId, ResourceMessages};
pub use student::StudentInfo;
