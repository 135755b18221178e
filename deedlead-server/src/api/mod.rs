//! HTTP API handlers for deedlead-server

pub mod buildinfo;
pub mod call_logs;
pub mod health;
pub mod leads;
pub mod metrics;
pub mod upload;
pub mod upload_sessions;

pub use buildinfo::get_build_info;
pub use call_logs::{create_call_log, list_call_logs};
pub use health::health_routes;
pub use leads::{get_lead, list_leads, update_lead};
pub use metrics::get_metrics;
pub use upload::upload_csv;
pub use upload_sessions::{get_upload_session, list_upload_sessions};
