pub mod checkout;
pub mod webhook;
