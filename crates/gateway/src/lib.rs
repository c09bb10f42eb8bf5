//! ToyStand Gateway
//!
//! Serving runtime and HTTP front end that routes requests to deployments.

pub mod runtime;
pub mod server;

pub use runtime::ServeRuntime;
pub use server::{build_router, serve, AppState};
