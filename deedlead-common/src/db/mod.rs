//! Database models and queries

pub mod call_logs;
pub mod fields;
pub mod init;
pub mod leads;
pub mod metrics;
pub mod models;
pub mod upload_sessions;

pub use fields::*;
pub use init::*;
pub use models::*;
