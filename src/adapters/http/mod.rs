//! HTTP adapters - Server assembly and the reference page.

pub mod page;
pub mod server;

pub use server::{RelayServer, ServerError};
