pub mod http;

use async_trait::async_trait;

use crate::errors::ApiError;
use crate::models::{
    Booking, BookingId, BookingPayload, CancelReceipt, Envelope, ListQuery, StatusSummary,
};

pub use http::HttpBookingApi;

/// Remote booking API. Every call issues exactly one request; nothing is
/// cached or retried.
#[async_trait]
pub trait BookingApi: Send + Sync {
    async fn list(&self, query: &ListQuery) -> Result<Envelope<Vec<Booking>>, ApiError>;

    async fn get(&self, id: &BookingId) -> Result<Booking, ApiError>;

    async fn create(&self, payload: &BookingPayload) -> Result<Booking, ApiError>;

    async fn update(&self, id: &BookingId, payload: &BookingPayload) -> Result<Booking, ApiError>;

    /// Soft-cancels a booking (`DELETE /bookings/{id}`).
    async fn cancel(&self, id: &BookingId) -> Result<CancelReceipt, ApiError>;

    async fn status_summary(&self) -> Result<StatusSummary, ApiError>;
}
