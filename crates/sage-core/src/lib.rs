pub mod config;
pub mod error;
pub mod types;

pub use config::SageConfig;
pub use error::{Result, SageError};
pub use types::{DifficultyLevel, NewSubject, Subject};
