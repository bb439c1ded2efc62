//! Generic list/CRUD state for one resource collection.
//!
//! `ResourceManager` ties together the adapter, list cache, edit session,
//! confirmation gate and alert channel. The rendering layer calls the
//! handler methods and re-reads the exposed state afterwards; it never
//! mutates anything directly.

use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use super::alert::{Alert, AlertChannel};
use super::gate::ConfirmationGate;
use super::session::{EditSession, SessionMode};
use crate::api::{ApiResult, ResourceAdapter, SaveOutcome};
use crate::cache::{ListCache, ListOrder, ListQuery};
use crate::models::{Record, RecordId};

// ============================================================================
// Constants
// ============================================================================

/// Quiet period after the last search keystroke before the list is refetched.
pub const SEARCH_DEBOUNCE_MS: u64 = 300;

/// What a click on a list row opens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowClick {
    View,
    Edit,
}

impl From<RowClick> for SessionMode {
    fn from(value: RowClick) -> Self {
        match value {
            RowClick::View => SessionMode::View,
            RowClick::Edit => SessionMode::Edit,
        }
    }
}

/// Per-resource presentation of the list.
#[derive(Debug, Clone)]
pub struct ListOptions {
    /// `None` disables pagination.
    pub page_size: Option<usize>,
    pub order: ListOrder,
    pub row_click: RowClick,
    pub search_debounce: Duration,
}

impl Default for ListOptions {
    fn default() -> Self {
        Self {
            page_size: None,
            order: ListOrder::AsFetched,
            row_click: RowClick::View,
            search_debounce: Duration::from_millis(SEARCH_DEBOUNCE_MS),
        }
    }
}

/// Client-side list, editor and delete-confirmation state for records of
/// type `T` stored behind adapter `A`.
///
/// All handlers take `&mut self`, so one owner drives the manager from a
/// single task. The search debounce timer runs as a spawned tokio task on
/// the current runtime.
pub struct ResourceManager<T, A> {
    adapter: A,
    options: ListOptions,
    cache: ListCache<T>,
    session: EditSession<T>,
    gate: ConfirmationGate,
    alerts: AlertChannel,

    // Search / pagination
    search_text: String,
    page: usize,

    // Debounce timer. Each timer reports the generation that started it;
    // only the latest generation triggers a refresh.
    search_generation: u64,
    pending_search: Option<JoinHandle<()>>,
    search_tx: mpsc::UnboundedSender<u64>,
    search_rx: mpsc::UnboundedReceiver<u64>,
}

impl<T, A> ResourceManager<T, A>
where
    T: Record,
    A: ResourceAdapter<T>,
{
    pub fn new(adapter: A, options: ListOptions) -> Self {
        let (search_tx, search_rx) = mpsc::unbounded_channel();
        Self {
            adapter,
            options,
            cache: ListCache::new(),
            session: EditSession::Closed,
            gate: ConfirmationGate::new(),
            alerts: AlertChannel::new(),
            search_text: String::new(),
            page: 0,
            search_generation: 0,
            pending_search: None,
            search_tx,
            search_rx,
        }
    }

    // =========================================================================
    // Exposed state
    // =========================================================================

    /// Current page of records, `None` until the first successful load.
    pub fn records(&self) -> Option<&[T]> {
        self.cache.records()
    }

    pub fn total_count(&self) -> usize {
        self.cache.total_count()
    }

    pub fn is_loaded(&self) -> bool {
        self.cache.is_loaded()
    }

    pub fn cache(&self) -> &ListCache<T> {
        &self.cache
    }

    pub fn session(&self) -> &EditSession<T> {
        &self.session
    }

    pub fn alert(&self) -> Option<&Alert> {
        self.alerts.current()
    }

    pub fn gate(&self) -> &ConfirmationGate {
        &self.gate
    }

    pub fn search_text(&self) -> &str {
        &self.search_text
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn options(&self) -> &ListOptions {
        &self.options
    }

    pub fn adapter(&self) -> &A {
        &self.adapter
    }

    // =========================================================================
    // List
    // =========================================================================

    /// Initial load when the list is first shown.
    pub async fn mount(&mut self) {
        self.refresh().await;
    }

    /// Refetch the whole collection and rebuild the visible page.
    /// On failure the previous snapshot is kept.
    pub async fn refresh(&mut self) {
        if let Err(e) = self.reload().await {
            self.alerts.error(format!("Failed to load {}: {}", T::PLURAL, e));
        }
    }

    /// Refresh after a create/update/delete. A failure here is only logged
    /// so the mutation's alert stays visible.
    async fn refresh_after_mutation(&mut self) {
        if let Err(e) = self.reload().await {
            debug!(error = %e, "Keeping mutation alert over refresh failure");
        }
    }

    async fn reload(&mut self) -> ApiResult<()> {
        match self.adapter.fetch_all().await {
            Ok(all) => {
                let query = ListQuery {
                    search: &self.search_text,
                    page: self.page,
                    page_size: self.options.page_size,
                    order: self.options.order,
                };
                self.cache.replace(all, &query);
                debug!(
                    total = self.cache.total_count(),
                    page = self.page,
                    search = %self.search_text,
                    "{} refreshed",
                    T::PLURAL
                );
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, loaded = self.cache.is_loaded(), "Failed to refresh {}", T::PLURAL);
                Err(e)
            }
        }
    }

    pub async fn set_page(&mut self, page: usize) {
        self.page = page;
        self.refresh().await;
    }

    /// Record new search text and restart the debounce timer. The list is
    /// refetched once the text has been stable for the debounce period
    /// (see `check_pending_search` and `search_settled`).
    ///
    /// Outside a tokio runtime no timer can start; the text is still
    /// recorded and an error alert is raised.
    pub fn set_search_text(&mut self, text: impl Into<String>) {
        self.search_text = text.into();
        self.page = 0;
        self.search_generation += 1;

        if let Some(handle) = self.pending_search.take() {
            handle.abort();
        }

        let runtime = match Handle::try_current() {
            Ok(runtime) => runtime,
            Err(e) => {
                error!(error = %e, "No runtime for search debounce");
                self.alerts.error(format!("Search unavailable: {}", e));
                return;
            }
        };

        let tx = self.search_tx.clone();
        let generation = self.search_generation;
        let delay = self.options.search_debounce;
        self.pending_search = Some(runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            // Receiver is gone only when the manager was dropped
            let _ = tx.send(generation);
        }));
    }

    /// Run the search refresh if its debounce timer has elapsed.
    /// Meant to be called from the UI tick; returns whether a refresh ran.
    pub async fn check_pending_search(&mut self) -> bool {
        let mut due = false;
        while let Ok(generation) = self.search_rx.try_recv() {
            if generation == self.search_generation {
                due = true;
            }
        }
        if due {
            self.pending_search = None;
            self.refresh().await;
        }
        due
    }

    /// Wait for the pending search timer, if any, and run its refresh.
    pub async fn search_settled(&mut self) {
        if self.pending_search.is_none() {
            return;
        }
        while let Some(generation) = self.search_rx.recv().await {
            if generation == self.search_generation {
                self.pending_search = None;
                self.refresh().await;
                return;
            }
        }
    }

    // =========================================================================
    // Edit session
    // =========================================================================

    pub fn open_for_create(&mut self) {
        self.session = EditSession::open(SessionMode::Create, T::blank());
    }

    pub fn open_for_edit(&mut self, record: T) {
        self.session = EditSession::open(SessionMode::Edit, record);
    }

    pub fn open_for_view(&mut self, record: T) {
        self.session = EditSession::open(SessionMode::View, record);
    }

    pub fn on_row_click(&mut self, record: T) {
        self.session = EditSession::open(self.options.row_click.into(), record);
    }

    pub fn change_field(&mut self, field: &str, value: &str) {
        if let Err(e) = self.session.change_field(field, value) {
            debug!(field, error = %e, "Field change rejected");
            self.alerts.error(e.to_string());
        }
    }

    /// Discard the working copy without saving.
    pub fn close(&mut self) {
        self.session.close();
    }

    /// Validate and persist the working copy.
    ///
    /// On success the session closes and the list is refreshed once. Any
    /// failure leaves the session open with an error alert.
    pub async fn submit(&mut self) {
        let record = match &self.session {
            EditSession::Editing(r) | EditSession::Creating(r) => r.clone(),
            EditSession::Viewing(_) | EditSession::Closed => {
                debug!("Submit ignored, no editable {} open", T::LABEL);
                return;
            }
        };

        if let Err(e) = record.validate() {
            self.alerts.error(e.to_string());
            return;
        }

        if T::CHECKS_COLLECTION {
            match self.adapter.fetch_all().await {
                Ok(existing) => {
                    if let Some(message) = existing.iter().find_map(|e| record.conflicts_with(e)) {
                        debug!(%message, "{} rejected by collection check", T::LABEL);
                        self.alerts.error(message);
                        return;
                    }
                }
                Err(e) => {
                    error!(error = %e, "Failed to validate {}", T::LABEL);
                    self.alerts.error(e.to_string());
                    return;
                }
            }
        }

        let messages = T::MESSAGES;
        match self.adapter.save(&record).await {
            Ok(SaveOutcome::Created(created)) => {
                info!(id = ?created.id(), "{} saved", T::LABEL);
                self.alerts.success(messages.created);
            }
            Ok(SaveOutcome::Updated(true)) => {
                self.alerts.success(messages.updated);
            }
            Ok(SaveOutcome::Updated(false)) => {
                warn!(id = ?record.id(), "{} update reported no change", T::LABEL);
                self.alerts.error(messages.update_failed);
                return;
            }
            Err(e) => {
                error!(error = %e, "Failed to save {}", T::LABEL);
                self.alerts.error(e.to_string());
                return;
            }
        }

        self.session.close();
        self.refresh_after_mutation().await;
    }

    // =========================================================================
    // Delete confirmation
    // =========================================================================

    /// Open the confirmation gate for `id`, replacing any pending target.
    pub fn request_delete(&mut self, id: Option<RecordId>) {
        self.gate.request(id);
    }

    /// Delete the pending target and refresh, whatever the outcome.
    pub async fn confirm_delete(&mut self) {
        let target = self.gate.take();
        let messages = T::MESSAGES;
        match self.adapter.delete(target.as_ref()).await {
            Ok(true) => {
                info!(id = ?target, "{} deleted", T::LABEL);
                self.alerts.success(messages.deleted);
            }
            Ok(false) => {
                warn!(id = ?target, "{} delete reported no change", T::LABEL);
                self.alerts.error(messages.delete_failed);
            }
            Err(e) => {
                error!(error = %e, id = ?target, "Failed to delete {}", T::LABEL);
                self.alerts.error(e.to_string());
            }
        }
        self.refresh_after_mutation().await;
    }

    pub fn cancel_delete(&mut self) {
        self.gate.cancel();
    }

    pub fn dismiss_alert(&mut self) {
        self.alerts.dismiss();
    }
}

impl<T, A> Drop for ResourceManager<T, A> {
    fn drop(&mut self) {
        if let Some(handle) = self.pending_search.take() {
            handle.abort();
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
