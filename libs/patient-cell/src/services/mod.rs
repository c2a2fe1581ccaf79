pub mod account;
pub mod booking;
