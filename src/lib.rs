//! Korean labels for unfamiliar SQL schemas, and Korean prompts to canned SQL.

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod presentation;
pub mod state;

pub use application::translate::TranslationService;
pub use domain::error::SchemaKoError;
