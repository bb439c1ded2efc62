//! In-memory list caching for resource collections.
//!
//! This module provides the `ListCache` snapshot each resource manager
//! renders from. Collections are fetched wholesale and filtered, ordered and
//! paginated client-side by `ListQuery`, so a server-side query can replace
//! `ListQuery::apply` without touching the managers.

pub mod list;

pub use list::{CachedData, ListCache, ListOrder, ListQuery};
