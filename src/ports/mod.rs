//! Port traits the domain uses to reach its collaborators.

pub mod config_port;
pub mod data_port;
pub mod report_port;
