pub mod dashboard;
pub mod form;
pub mod list;

#[cfg(test)]
pub(crate) mod testing;

pub use dashboard::DashboardController;
pub use form::{BookingFormController, SubmitOutcome};
pub use list::{BookingListController, CancelOutcome};
