//! Background monitor for a metered Copilot premium-request quota.
//!
//! The engine is a serialized reducer ([`monitor::reduce`]) driven by a
//! [`store::Store`]; all I/O goes through the traits in [`ports`].

pub mod api_client;
pub mod config;
pub mod credentials;
pub mod errors;
pub mod monitor;
pub mod pace;
pub mod paths;
pub mod ports;
pub mod process;
pub mod quota;
pub mod status_line;
pub mod store;
pub mod structured_logger;
pub mod update;
pub mod version;

#[cfg(test)]
pub(crate) mod test_support;
