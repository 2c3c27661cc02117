use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::api::BookingApi;
use crate::errors::ApiError;
use crate::models::{Booking, BookingId, BookingStatus, ListQuery, PageMeta, QueryChange};
use crate::services::confirm::Confirm;
use crate::services::notify::Notifier;

pub const CANCEL_PROMPT: &str = "Are you sure you want to cancel this booking?";
pub const CANCELLED_DEFAULT: &str = "Booking cancelled";
pub const CANCEL_FAILED_DEFAULT: &str = "Failed to cancel booking";
pub const LOAD_FAILED: &str = "Failed to load bookings";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchPhase {
    #[default]
    Idle,
    Loading,
}

/// Everything the booking list view shows, in one record.
#[derive(Debug, Clone, Default)]
pub struct ListState {
    pub query: ListQuery,
    pub items: Vec<Booking>,
    pub meta: Option<PageMeta>,
    pub phase: FetchPhase,
    /// Ids with a cancel request in flight.
    pub cancelling: HashSet<BookingId>,
    latest_fetch: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingRow {
    pub id: BookingId,
    pub customer_name: String,
    pub email: String,
    pub status: BookingStatus,
    pub display_date: String,
    pub can_cancel: bool,
    pub busy: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageButton {
    pub page: u32,
    pub current: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub current_page: u32,
    pub last_page: u32,
}

impl Pagination {
    /// `None` when there is only one page (or none).
    pub fn from_meta(meta: &PageMeta) -> Option<Self> {
        if meta.last_page <= 1 {
            return None;
        }
        Some(Self {
            current_page: meta.current_page,
            last_page: meta.last_page,
        })
    }

    /// One button per page, `1..=last_page`, produced on demand.
    pub fn buttons(&self) -> impl Iterator<Item = PageButton> {
        let current = self.current_page;
        (1..=self.last_page).map(move |page| PageButton {
            page,
            current: page == current,
        })
    }
}

#[derive(Debug)]
pub enum CancelOutcome {
    Cancelled { message: String },
    Failed { message: String, error: ApiError },
    Declined,
    AlreadyCancelling,
}

pub struct BookingListController {
    api: Arc<dyn BookingApi>,
    notifier: Arc<dyn Notifier>,
    state: Mutex<ListState>,
}

impl BookingListController {
    pub fn new(api: Arc<dyn BookingApi>, notifier: Arc<dyn Notifier>) -> Self {
        Self::with_query(api, notifier, ListQuery::default())
    }

    pub fn with_query(api: Arc<dyn BookingApi>, notifier: Arc<dyn Notifier>, query: ListQuery) -> Self {
        Self {
            api,
            notifier,
            state: Mutex::new(ListState {
                query,
                ..ListState::default()
            }),
        }
    }

    fn state(&self) -> MutexGuard<'_, ListState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn snapshot(&self) -> ListState {
        self.state().clone()
    }

    pub fn query(&self) -> ListQuery {
        self.state().query.clone()
    }

    /// Initial fetch when the view opens.
    pub async fn load(&self) -> bool {
        self.fetch().await
    }

    /// Applies a query change and refetches if the query actually changed.
    pub async fn change(&self, change: QueryChange) -> bool {
        let changed = self.state().query.apply(change);
        if changed {
            self.fetch().await;
        }
        changed
    }

    pub async fn set_page(&self, page: u32) -> bool {
        self.change(QueryChange::Page(page)).await
    }

    /// Fetches the current query. Returns whether the response was applied.
    ///
    /// Only the most recently issued fetch may write to the state; an older
    /// response that completes late is discarded.
    pub async fn fetch(&self) -> bool {
        let (seq, query) = {
            let mut state = self.state();
            state.latest_fetch += 1;
            state.phase = FetchPhase::Loading;
            (state.latest_fetch, state.query.clone())
        };

        let result = self.api.list(&query).await;

        let mut state = self.state();
        if seq != state.latest_fetch {
            tracing::debug!(seq, latest = state.latest_fetch, "discarding stale booking list");
            return false;
        }
        state.phase = FetchPhase::Idle;

        match result {
            Ok(page) => {
                tracing::debug!(count = page.data.len(), page = query.page(), "bookings loaded");
                state.items = page.data;
                state.meta = page.meta;
                true
            }
            Err(e) => {
                drop(state);
                tracing::warn!(error = %e, "failed to load bookings");
                self.notifier.error(LOAD_FAILED);
                false
            }
        }
    }

    pub fn is_cancelling(&self, id: &BookingId) -> bool {
        self.state().cancelling.contains(id)
    }

    /// Cancels one booking after confirmation, then refreshes the list.
    pub async fn cancel(&self, id: &BookingId, confirm: &dyn Confirm) -> CancelOutcome {
        if self.is_cancelling(id) {
            return CancelOutcome::AlreadyCancelling;
        }
        if !confirm.confirm(CANCEL_PROMPT) {
            return CancelOutcome::Declined;
        }
        if !self.state().cancelling.insert(id.clone()) {
            return CancelOutcome::AlreadyCancelling;
        }

        let result = self.api.cancel(id).await;
        self.state().cancelling.remove(id);

        match result {
            Ok(receipt) => {
                let message = receipt
                    .message
                    .filter(|m| !m.is_empty())
                    .unwrap_or_else(|| CANCELLED_DEFAULT.to_string());
                self.notifier.success(&message);
                self.fetch().await;
                CancelOutcome::Cancelled { message }
            }
            Err(error) => {
                tracing::warn!(id = %id, error = %error, "cancel failed");
                let message = error
                    .server_message()
                    .unwrap_or(CANCEL_FAILED_DEFAULT)
                    .to_string();
                self.notifier.error(&message);
                CancelOutcome::Failed { message, error }
            }
        }
    }

    pub fn rows(&self) -> Vec<BookingRow> {
        let state = self.state();
        state
            .items
            .iter()
            .map(|b| BookingRow {
                id: b.id.clone(),
                customer_name: b.customer_name.clone(),
                email: b.email.clone(),
                status: b.status,
                display_date: b.display_date(),
                can_cancel: b.can_cancel(),
                busy: state.cancelling.contains(&b.id),
            })
            .collect()
    }

    pub fn pagination(&self) -> Option<Pagination> {
        self.state().meta.as_ref().and_then(Pagination::from_meta)
    }
}
