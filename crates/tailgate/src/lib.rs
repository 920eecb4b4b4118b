//! Top-level facade crate for tailgate.
//!
//! Re-exports the policy core and the gateway library so users can depend on a single crate.

pub mod core {
    pub use tailgate_core::*;
}

pub mod gateway {
    pub use tailgate_gateway::*;
}
