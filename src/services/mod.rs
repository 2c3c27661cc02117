pub mod confirm;
pub mod notify;
