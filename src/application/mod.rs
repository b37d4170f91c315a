pub mod ai_response;
pub mod dictionary;
pub mod manage;
pub mod nl2sql;
pub mod retry;
pub mod stats;
pub mod translate;
