//! holyclub-core - Core types and traits for the HolyClub journal client.

pub mod credential;
pub mod error;
pub mod journal;
pub mod memory;
pub mod traits;
pub mod types;

pub use credential::Credential;
pub use error::Error;
pub use memory::MemoryTokenStore;
pub use traits::{Navigator, StayPut, TokenStore};
pub use types::ApiUrl;

/// Result type alias using the crate's Error type.
pub type Result<T> = std::result::Result<T, Error>;
