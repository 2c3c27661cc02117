use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::NaiveDate;

use crate::api::BookingApi;
use crate::errors::ApiError;
use crate::models::booking::format_wire_date;
use crate::models::{Booking, BookingId};
use crate::services::notify::Notifier;
use crate::shell::Route;
use crate::validation::{BookingField, BookingForm, FieldErrors};

pub const CREATED: &str = "Booking created successfully";
pub const UPDATED: &str = "Booking updated";
pub const FIX_HIGHLIGHTED: &str = "Please fix the highlighted errors";
pub const SUBMIT_FAILED: &str = "Something went wrong. Please try again.";
pub const LOAD_FAILED: &str = "Failed to load booking";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit(BookingId),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormPhase {
    /// Edit mode only: waiting for the record. Inputs are blocked.
    Loading,
    Ready,
    LoadFailed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormState {
    pub values: BookingForm,
    pub errors: FieldErrors,
    pub phase: FormPhase,
    pub submitting: bool,
}

#[derive(Debug)]
pub enum SubmitOutcome {
    Saved { booking: Booking, navigate: Route },
    /// Client-side validation failed; nothing was sent.
    Invalid,
    /// The server answered 422; field messages were applied.
    Rejected,
    Failed(ApiError),
    Busy,
    NotReady,
}

/// Create/edit form for one booking.
pub struct BookingFormController {
    api: Arc<dyn BookingApi>,
    notifier: Arc<dyn Notifier>,
    mode: FormMode,
    state: Mutex<FormState>,
}

impl BookingFormController {
    pub fn create(api: Arc<dyn BookingApi>, notifier: Arc<dyn Notifier>) -> Self {
        Self::build(api, notifier, FormMode::Create, BookingForm::default(), FormPhase::Ready)
    }

    /// Starts in `Loading`; call [`load`](Self::load) to fetch the record.
    pub fn edit(api: Arc<dyn BookingApi>, notifier: Arc<dyn Notifier>, id: BookingId) -> Self {
        Self::build(
            api,
            notifier,
            FormMode::Edit(id),
            BookingForm::edit_defaults(),
            FormPhase::Loading,
        )
    }

    fn build(
        api: Arc<dyn BookingApi>,
        notifier: Arc<dyn Notifier>,
        mode: FormMode,
        values: BookingForm,
        phase: FormPhase,
    ) -> Self {
        Self {
            api,
            notifier,
            mode,
            state: Mutex::new(FormState {
                values,
                errors: FieldErrors::new(),
                phase,
                submitting: false,
            }),
        }
    }

    fn state(&self) -> MutexGuard<'_, FormState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn mode(&self) -> &FormMode {
        &self.mode
    }

    pub fn snapshot(&self) -> FormState {
        self.state().clone()
    }

    pub fn error(&self, field: BookingField) -> Option<String> {
        self.state().errors.get(field.as_str()).cloned()
    }

    /// Fetches the record being edited and resets the form to it.
    /// No-op in create mode.
    pub async fn load(&self) -> bool {
        let FormMode::Edit(id) = &self.mode else {
            return true;
        };

        match self.api.get(id).await {
            Ok(booking) => {
                let mut state = self.state();
                state.values = BookingForm::from_booking(&booking);
                state.errors.clear();
                state.phase = FormPhase::Ready;
                true
            }
            Err(e) => {
                tracing::warn!(id = %id, error = %e, "failed to load booking for edit");
                self.state().phase = FormPhase::LoadFailed(e.to_string());
                self.notifier.error(LOAD_FAILED);
                false
            }
        }
    }

    /// Updates one input and clears its error. Ignored until the form is ready.
    pub fn set(&self, field: BookingField, value: impl Into<String>) {
        let mut state = self.state();
        if state.phase != FormPhase::Ready {
            return;
        }
        state.values.set(field, value);
        state.errors.remove(field.as_str());
    }

    /// Date-picker entry point: stores the date as `YYYY-MM-DD`.
    pub fn set_booking_date(&self, date: Option<NaiveDate>) {
        self.set(
            BookingField::BookingDate,
            date.map(format_wire_date).unwrap_or_default(),
        );
    }

    pub async fn submit(&self) -> SubmitOutcome {
        let parsed = {
            let mut state = self.state();
            if state.phase != FormPhase::Ready {
                return SubmitOutcome::NotReady;
            }
            if state.submitting {
                return SubmitOutcome::Busy;
            }
            match state.values.parse() {
                Ok(payload) => {
                    state.errors.clear();
                    state.submitting = true;
                    payload
                }
                Err(errors) => {
                    state.errors = errors;
                    return SubmitOutcome::Invalid;
                }
            }
        };

        let result = match &self.mode {
            FormMode::Create => self.api.create(&parsed).await,
            FormMode::Edit(id) => self.api.update(id, &parsed).await,
        };

        let mut state = self.state();
        state.submitting = false;

        match result {
            Ok(booking) => {
                drop(state);
                self.notifier.success(match self.mode {
                    FormMode::Create => CREATED,
                    FormMode::Edit(_) => UPDATED,
                });
                SubmitOutcome::Saved {
                    booking,
                    navigate: Route::Bookings,
                }
            }
            Err(ApiError::Validation { errors, .. }) => {
                for (field, messages) in errors {
                    if let Some(first) = messages.into_iter().next() {
                        state.errors.insert(field, first);
                    }
                }
                drop(state);
                self.notifier.error(FIX_HIGHLIGHTED);
                SubmitOutcome::Rejected
            }
            Err(e) => {
                drop(state);
                tracing::warn!(error = %e, "booking submit failed");
                self.notifier.error(SUBMIT_FAILED);
                SubmitOutcome::Failed(e)
            }
        }
    }
}
