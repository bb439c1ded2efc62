//! Resource managers driving the admin list screens.
//!
//! A `ResourceManager` owns the list cache, the edit session, the delete
//! confirmation gate and the alert slot for one record type. Notices and
//! student records use the same manager with different `ListOptions`.

pub mod alert;
pub mod gate;
pub mod resource;
pub mod session;

#[cfg(test)]
pub(crate) mod testing;

pub use alert::{Alert, AlertChannel, Severity};
pub use gate::ConfirmationGate;
pub use resource::{ListOptions, ResourceManager, RowClick, SEARCH_DEBOUNCE_MS};
pub use session::{EditSession, SessionMode};

use crate::api::{ApiClient, RestAdapter};
use crate::cache::ListOrder;
use crate::config::Config;
use crate::models::{Notice, StudentInfo};

pub type NoticeManager<A = RestAdapter<Notice>> = ResourceManager<Notice, A>;
pub type StudentInfoManager<A = RestAdapter<StudentInfo>> = ResourceManager<StudentInfo, A>;

impl ResourceManager<Notice, RestAdapter<Notice>> {
    /// Notice board: newest first, unpaginated.
    pub fn notices(api: &ApiClient, config: &Config) -> Self {
        let options = ListOptions {
            page_size: None,
            order: ListOrder::NewestFirst,
            row_click: RowClick::View,
            search_debounce: config.search_debounce(),
        };
        ResourceManager::new(api.adapter(config.notices_url.clone()), options)
    }
}

impl ResourceManager<StudentInfo, RestAdapter<StudentInfo>> {
    /// Student table: paginated in server order.
    pub fn students(api: &ApiClient, config: &Config) -> Self {
        let options = ListOptions {
            page_size: Some(config.page_size),
            order: ListOrder::AsFetched,
            row_click: RowClick::View,
            search_debounce: config.search_debounce(),
        };
        ResourceManager::new(api.adapter(config.student_info_url.clone()), options)
    }
}
