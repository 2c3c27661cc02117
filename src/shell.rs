use std::fmt;

use crate::models::BookingId;

pub const APP_TITLE: &str = "Booking Admin";
pub const APP_SUBTITLE: &str = "Management Dashboard";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Dashboard,
    Bookings,
    CreateBooking,
    EditBooking(BookingId),
}

impl Route {
    pub fn path(&self) -> String {
        match self {
            Route::Dashboard => "/dashboard".to_string(),
            Route::Bookings => "/bookings".to_string(),
            Route::CreateBooking => "/bookings/create".to_string(),
            Route::EditBooking(id) => format!("/bookings/{id}/edit"),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItem {
    pub label: &'static str,
    pub icon: &'static str,
    pub route: Route,
    pub active: bool,
}

/// Sidebar entries. An entry is active only on an exact path match, so the
/// create and edit screens highlight nothing.
pub fn menu(current: &Route) -> Vec<MenuItem> {
    let current = current.path();
    [
        ("Dashboard", "📊", Route::Dashboard),
        ("Bookings", "📋", Route::Bookings),
    ]
    .into_iter()
    .map(|(label, icon, route)| MenuItem {
        label,
        icon,
        active: route.path() == current,
        route,
    })
    .collect()
}
