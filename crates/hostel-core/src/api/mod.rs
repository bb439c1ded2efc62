//! REST API module for the hostel backend.
//!
//! This module provides the `ApiClient` for talking to the JSON endpoints
//! and the `ResourceAdapter` trait the resource managers are generic over.
//! `RestAdapter` implements that trait for json-server style collections.

pub mod adapter;
pub mod client;
pub mod error;

pub use adapter::{ResourceAdapter, SaveOutcome};
pub use client::{ApiClient, RestAdapter};
pub use error::{ApiError, ApiResult};
