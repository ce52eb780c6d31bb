pub mod common;
pub mod config;
pub mod database;
pub mod errors;
pub mod services;

#[cfg(feature = "graphql")]
pub mod graphql;
#[cfg(feature = "server")]
pub mod server;
