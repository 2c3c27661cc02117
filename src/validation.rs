//! Client-side schema for the booking form.
//!
//! Runs synchronously before any request is made and never performs I/O.
//! Server-side validation still applies; its 422 messages are merged onto
//! the same field keys by the form controller.

use std::collections::BTreeMap;
use std::fmt;

use garde::Validate;

use crate::models::booking::{
    format_wire_date, parse_wire_date, Booking, BookingPayload, BookingStatus,
};

/// Field name -> message. One message per field, keyed by wire name.
pub type FieldErrors = BTreeMap<String, String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BookingField {
    CustomerName,
    Email,
    BookingDate,
    Status,
}

impl BookingField {
    pub const ALL: [BookingField; 4] = [
        BookingField::CustomerName,
        BookingField::Email,
        BookingField::BookingDate,
        BookingField::Status,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BookingField::CustomerName => "customer_name",
            BookingField::Email => "email",
            BookingField::BookingDate => "booking_date",
            BookingField::Status => "status",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            BookingField::CustomerName => "Customer Name",
            BookingField::Email => "Email",
            BookingField::BookingDate => "Booking Date",
            BookingField::Status => "Status",
        }
    }
}

impl fmt::Display for BookingField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw form values as typed by the user. `status` is empty until one is picked.
#[derive(Debug, Clone, Default, PartialEq, Eq, Validate)]
pub struct BookingForm {
    #[garde(length(chars, min = 3))]
    pub customer_name: String,
    #[garde(email)]
    pub email: String,
    #[garde(custom(check_booking_date))]
    pub booking_date: String,
    #[garde(custom(check_status))]
    pub status: String,
}

impl BookingForm {
    /// Values used by the edit view before the record arrives.
    pub fn edit_defaults() -> Self {
        Self {
            status: BookingStatus::Pending.as_str().to_string(),
            ..Self::default()
        }
    }

    /// Form values for an existing record. Missing or timestamp-shaped dates
    /// are reduced to `YYYY-MM-DD`.
    pub fn from_booking(booking: &Booking) -> Self {
        Self {
            customer_name: booking.customer_name.clone(),
            email: booking.email.clone(),
            booking_date: booking
                .date()
                .map(format_wire_date)
                .unwrap_or_else(|| booking.booking_date.clone()),
            status: booking.status.as_str().to_string(),
        }
    }

    pub fn get(&self, field: BookingField) -> &str {
        match field {
            BookingField::CustomerName => &self.customer_name,
            BookingField::Email => &self.email,
            BookingField::BookingDate => &self.booking_date,
            BookingField::Status => &self.status,
        }
    }

    pub fn set(&mut self, field: BookingField, value: impl Into<String>) {
        let value = value.into();
        match field {
            BookingField::CustomerName => self.customer_name = value,
            BookingField::Email => self.email = value,
            BookingField::BookingDate => self.booking_date = value,
            BookingField::Status => self.status = value,
        }
    }

    /// Validates the form and returns the request body, or one message per
    /// failing field.
    pub fn parse(&self) -> Result<BookingPayload, FieldErrors> {
        let form = self.trimmed();

        if let Err(report) = form.validate() {
            let mut errors = FieldErrors::new();
            for (path, error) in report.iter() {
                errors
                    .entry(path.to_string())
                    .or_insert_with(|| error.message().to_string());
            }
            return Err(errors);
        }

        let status = form.status.parse::<BookingStatus>().map_err(|e| {
            FieldErrors::from([(BookingField::Status.to_string(), e.to_string())])
        })?;

        Ok(BookingPayload {
            customer_name: form.customer_name,
            email: form.email,
            booking_date: form.booking_date,
            status,
        })
    }

    fn trimmed(&self) -> Self {
        Self {
            customer_name: self.customer_name.trim().to_string(),
            email: self.email.trim().to_string(),
            booking_date: self.booking_date.trim().to_string(),
            status: self.status.trim().to_string(),
        }
    }
}

fn check_booking_date(value: &str, _ctx: &()) -> garde::Result {
    if value.is_empty() {
        return Err(garde::Error::new("booking date is required"));
    }
    if value.len() != 10 || parse_wire_date(value).is_none() {
        return Err(garde::Error::new("booking date must be a valid YYYY-MM-DD date"));
    }
    Ok(())
}

fn check_status(value: &str, _ctx: &()) -> garde::Result {
    if value.is_empty() {
        return Err(garde::Error::new("select a status"));
    }
    value
        .parse::<BookingStatus>()
        .map(|_| ())
        .map_err(|_| garde::Error::new("status must be one of pending, confirmed, cancelled"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BookingId;

    fn valid() -> BookingForm {
        BookingForm {
            customer_name: "Alice".to_string(),
            email: "a@b.com".to_string(),
            booking_date: "2025-03-15".to_string(),
            status: "pending".to_string(),
        }
    }

    #[test]
    fn test_valid_form_parses() {
        let payload = valid().parse().unwrap();
        assert_eq!(payload.customer_name, "Alice");
        assert_eq!(payload.email, "a@b.com");
        assert_eq!(payload.booking_date, "2025-03-15");
        assert_eq!(payload.status, BookingStatus::Pending);
    }

    #[test]
    fn test_short_names_rejected() {
        for name in ["", "A", "Al", "  Al  "] {
            let form = BookingForm {
                customer_name: name.to_string(),
                ..valid()
            };
            let errors = form.parse().unwrap_err();
            assert!(errors.contains_key("customer_name"), "{name:?} should fail");
            assert_eq!(errors.len(), 1);
        }

        let form = BookingForm {
            customer_name: "Zoë".to_string(),
            ..valid()
        };
        assert!(form.parse().is_ok());
    }

    #[test]
    fn test_invalid_emails_rejected() {
        for email in ["", "alice", "alice@", "@b.com"] {
            let form = BookingForm {
                email: email.to_string(),
                ..valid()
            };
            let errors = form.parse().unwrap_err();
            assert!(errors.contains_key("email"), "{email:?} should fail");
        }
    }

    #[test]
    fn test_date_required_and_well_formed() {
        let form = BookingForm {
            booking_date: String::new(),
            ..valid()
        };
        assert_eq!(
            form.parse().unwrap_err()["booking_date"],
            "booking date is required"
        );

        let form = BookingForm {
            booking_date: "15/03/2025".to_string(),
            ..valid()
        };
        assert!(form.parse().unwrap_err().contains_key("booking_date"));
    }

    #[test]
    fn test_unselected_status_rejected() {
        let form = BookingForm {
            status: String::new(),
            ..valid()
        };
        assert_eq!(form.parse().unwrap_err()["status"], "select a status");

        let form = BookingForm {
            status: "archived".to_string(),
            ..valid()
        };
        assert!(form.parse().unwrap_err().contains_key("status"));
    }

    #[test]
    fn test_every_failing_field_reported() {
        let errors = BookingForm::default().parse().unwrap_err();
        let keys: Vec<&str> = errors.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["booking_date", "customer_name", "email", "status"]);
    }

    #[test]
    fn test_from_booking_normalizes_timestamp_date() {
        let booking = Booking {
            id: BookingId::from(3u64),
            customer_name: "Bob Smith".to_string(),
            email: "bob@example.com".to_string(),
            booking_date: "2025-06-01T00:00:00.000000Z".to_string(),
            status: BookingStatus::Confirmed,
        };
        let form = BookingForm::from_booking(&booking);
        assert_eq!(form.booking_date, "2025-06-01");
        assert_eq!(form.status, "confirmed");
        assert!(form.parse().is_ok());
    }
}
