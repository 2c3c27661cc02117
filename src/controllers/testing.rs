//! In-memory `BookingApi` used by the controller unit tests.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use reqwest::StatusCode;
use tokio::sync::Notify;

use crate::api::BookingApi;
use crate::errors::ApiError;
use crate::models::{
    Booking, BookingId, BookingPayload, BookingStatus, CancelReceipt, Envelope, ListQuery,
    PageMeta, StatusSummary,
};

pub(crate) fn booking(id: u64, name: &str, status: BookingStatus) -> Booking {
    Booking {
        id: BookingId::from(id),
        customer_name: name.to_string(),
        email: format!("{}@example.com", name.to_lowercase().replace(' ', ".")),
        booking_date: "2025-03-15".to_string(),
        status,
    }
}

pub(crate) fn meta(current_page: u32, last_page: u32) -> PageMeta {
    PageMeta {
        current_page,
        last_page,
        per_page: Some(10),
        total: None,
        from: None,
        to: None,
    }
}

pub(crate) fn server_error(message: Option<&str>) -> ApiError {
    ApiError::Status {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        message: message.map(str::to_string),
    }
}

#[derive(Default)]
pub(crate) struct MockApi {
    pub calls: Mutex<Vec<String>>,
    pub bookings: Mutex<Vec<Booking>>,
    pub meta: Mutex<Option<PageMeta>>,
    pub summary: Mutex<StatusSummary>,
    pub fail_list: AtomicBool,
    /// Next `get`/`create`/`update`/`cancel`/`status_summary` call fails with this.
    pub next_error: Mutex<Option<ApiError>>,
    pub cancel_message: Mutex<Option<String>>,
    /// A list call whose search equals this waits for `release`.
    pub hold_search: Mutex<Option<String>>,
    pub hold_cancel: AtomicBool,
    pub started: Notify,
    pub release: Notify,
}

impl MockApi {
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn fail_next(&self, err: ApiError) {
        *self.next_error.lock().unwrap() = Some(err);
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    fn take_error(&self) -> Option<ApiError> {
        self.next_error.lock().unwrap().take()
    }
}

#[async_trait]
impl BookingApi for MockApi {
    async fn list(&self, query: &ListQuery) -> Result<Envelope<Vec<Booking>>, ApiError> {
        self.record(format!("list page={} search={}", query.page(), query.search()));

        let hold = self.hold_search.lock().unwrap().as_deref() == Some(query.search());
        if hold {
            self.started.notify_one();
            self.release.notified().await;
        }

        if self.fail_list.load(Ordering::SeqCst) {
            return Err(server_error(None));
        }

        let mut data = self.bookings.lock().unwrap().clone();
        if !query.search().is_empty() {
            data.retain(|b| b.customer_name.contains(query.search()));
        }
        Ok(Envelope {
            data,
            meta: self.meta.lock().unwrap().clone(),
        })
    }

    async fn get(&self, id: &BookingId) -> Result<Booking, ApiError> {
        self.record(format!("get {id}"));
        if let Some(err) = self.take_error() {
            return Err(err);
        }
        self.bookings
            .lock()
            .unwrap()
            .iter()
            .find(|b| &b.id == id)
            .cloned()
            .ok_or(ApiError::Status {
                status: StatusCode::NOT_FOUND,
                message: Some("Booking not found".to_string()),
            })
    }

    async fn create(&self, payload: &BookingPayload) -> Result<Booking, ApiError> {
        self.record(format!("create {}", payload.customer_name));
        if let Some(err) = self.take_error() {
            return Err(err);
        }
        Ok(Booking {
            id: BookingId::from(100u64),
            customer_name: payload.customer_name.clone(),
            email: payload.email.clone(),
            booking_date: payload.booking_date.clone(),
            status: payload.status,
        })
    }

    async fn update(&self, id: &BookingId, payload: &BookingPayload) -> Result<Booking, ApiError> {
        self.record(format!("update {id} {}", payload.status));
        if let Some(err) = self.take_error() {
            return Err(err);
        }
        Ok(Booking {
            id: id.clone(),
            customer_name: payload.customer_name.clone(),
            email: payload.email.clone(),
            booking_date: payload.booking_date.clone(),
            status: payload.status,
        })
    }

    async fn cancel(&self, id: &BookingId) -> Result<CancelReceipt, ApiError> {
        self.record(format!("cancel {id}"));
        if self.hold_cancel.load(Ordering::SeqCst) {
            self.started.notify_one();
            self.release.notified().await;
        }
        if let Some(err) = self.take_error() {
            return Err(err);
        }
        Ok(CancelReceipt {
            message: self.cancel_message.lock().unwrap().clone(),
        })
    }

    async fn status_summary(&self) -> Result<StatusSummary, ApiError> {
        self.record("status_summary".to_string());
        if let Some(err) = self.take_error() {
            return Err(err);
        }
        Ok(self.summary.lock().unwrap().clone())
    }
}
