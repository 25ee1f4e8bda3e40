//! serv - jailed static file server
//!
//! Core library for the request cycle and the privilege bootstrap.

pub mod config;
pub mod console;
pub mod error;
pub mod http;
pub mod jail;
pub mod resolver;
pub mod server;
