pub mod codec;
pub mod config;
pub mod contracts;
pub mod error;
pub mod health;
pub mod listener;
pub mod routes;
pub mod store;
pub mod topology;
