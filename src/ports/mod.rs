//! Port traits at the storage and configuration boundaries.

pub mod config_port;
pub mod table_port;
