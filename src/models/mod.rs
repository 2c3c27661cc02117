pub mod booking;
pub mod envelope;
pub mod query;

pub use booking::{Booking, BookingId, BookingPayload, BookingStatus};
pub use envelope::{CancelReceipt, Envelope, PageMeta, StatusCount, StatusSummary};
pub use query::{ListQuery, PerPage, QueryChange, SortBy, SortOrder};
