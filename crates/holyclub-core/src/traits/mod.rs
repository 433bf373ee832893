//! Core traits for credential storage and session navigation.

mod navigator;
mod token_store;

pub use navigator::{Navigator, StayPut};
pub use token_store::TokenStore;
