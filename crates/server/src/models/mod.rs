//! Domain models for the account API.

pub mod account;

pub use account::{Account, AccountIdentity, AccountView};
