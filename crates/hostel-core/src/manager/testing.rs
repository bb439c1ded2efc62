//! In-memory adapter that records every call, for manager tests.

use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use reqwest::StatusCode;

use crate::api::{ApiError, ApiResult, ResourceAdapter};
use crate::models::{Record, RecordId};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    FetchAll,
    Create(serde_json::Value),
    Update(RecordId),
    Delete(RecordId),
}

struct FakeState<T> {
    records: Vec<T>,
    calls: Vec<Call>,
    next_id: i64,
    fail_fetch: bool,
    fail_writes: Option<StatusCode>,
}

/// Behaves like a json-server collection: numeric ids handed out on create,
/// whole-record replacement on update.
#[derive(Clone)]
pub struct FakeAdapter<T> {
    state: Arc<Mutex<FakeState<T>>>,
}

impl<T: Record> FakeAdapter<T> {
    pub fn new(records: Vec<T>) -> Self {
        Self {
            state: Arc::new(Mutex::new(FakeState {
                next_id: records.len() as i64 + 100,
                records,
                calls: Vec::new(),
                fail_fetch: false,
                fail_writes: None,
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, FakeState<T>> {
        self.state.lock().expect("fake adapter lock poisoned")
    }

    pub fn calls(&self) -> Vec<Call> {
        self.lock().calls.clone()
    }

    pub fn fetch_count(&self) -> usize {
        self.lock().calls.iter().filter(|c| **c == Call::FetchAll).count()
    }

    pub fn records(&self) -> Vec<T> {
        self.lock().records.clone()
    }

    pub fn set_fail_fetch(&self, fail: bool) {
        self.lock().fail_fetch = fail;
    }

    /// Make every subsequent create/update/delete answer with `status`.
    pub fn fail_writes_with(&self, status: u16) {
        self.lock().fail_writes = StatusCode::from_u16(status).ok();
    }
}

fn rejected(status: StatusCode) -> ApiError {
    ApiError::from_status(status, "")
}

#[async_trait]
impl<T: Record> ResourceAdapter<T> for FakeAdapter<T> {
    async fn fetch_all(&self) -> ApiResult<Vec<T>> {
        let mut state = self.lock();
        state.calls.push(Call::FetchAll);
        if state.fail_fetch {
            return Err(rejected(StatusCode::INTERNAL_SERVER_ERROR));
        }
        Ok(state.records.clone())
    }

    async fn create(&self, record: &T) -> ApiResult<T> {
        let mut state = self.lock();
        let body = serde_json::to_value(record).expect("record serializes");
        state.calls.push(Call::Create(body));
        if let Some(status) = state.fail_writes {
            return Err(rejected(status));
        }
        let id = RecordId::from(state.next_id);
        state.next_id += 1;
        let created = record.clone().with_id(id);
        state.records.push(created.clone());
        Ok(created)
    }

    async fn update(&self, id: &RecordId, record: &T) -> ApiResult<bool> {
        let mut state = self.lock();
        state.calls.push(Call::Update(id.clone()));
        if let Some(status) = state.fail_writes {
            return Err(rejected(status));
        }
        match state.records.iter_mut().find(|r| r.persisted_id() == Some(id)) {
            Some(stored) => {
                *stored = record.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_by_id(&self, id: &RecordId) -> ApiResult<bool> {
        let mut state = self.lock();
        state.calls.push(Call::Delete(id.clone()));
        if let Some(status) = state.fail_writes {
            return Err(rejected(status));
        }
        let before = state.records.len();
        state.records.retain(|r| r.persisted_id() != Some(id));
        Ok(state.records.len() < before)
    }
}
