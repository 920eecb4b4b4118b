//! tailgate gateway library entry.
//!
//! Wires the config loader, the shared policy store, the authorization
//! middleware, and the operational endpoints into an axum router. It is
//! consumed by the binary (`main.rs`) and by integration tests.

pub mod app_state;
pub mod authz;
pub mod config;
pub mod obs;
pub mod ops;
pub mod reload;
pub mod router;
