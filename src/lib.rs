//! # Postcode Cache
//!
//! A small Axum service that serves the postal codes of a country, loaded
//! once from a remote source and kept in memory for the life of the process.
//!
//! ## Architecture
//!
//! - **Domain Layer** ([`domain`]) - Postcode value type and the [`domain::CodeSource`] contract
//! - **Application Layer** ([`application`]) - Input normalisation and error mapping
//! - **Infrastructure Layer** ([`infrastructure`]) - Single-flight cache and source implementations
//! - **API Layer** ([`api`]) - REST handlers, DTOs and middleware
//!
//! ## Loading Model
//!
//! The first request starts the upstream fetch. Requests arriving while it
//! runs wait on that same fetch; once it succeeds the list is served from
//! memory forever. A failed fetch is reported to everyone waiting on it and
//! the next request tries again. The membership index used by
//! `POST /api/postcodes` is built from the list on first use.
//!
//! ## Quick Start
//!
//! ```bash
//! export POSTCODE_SOURCE="./data/AU.txt"
//! cargo run
//!
//! curl localhost:3000/api/postcodes
//! curl -X POST localhost:3000/api/postcodes -H 'content-type: application/json' -d '{"code": 3000}'
//! ```
//!
//! ## Configuration
//!
//! Service configuration is loaded from environment variables via [`config::Config`].
//! See [`config`] module for available options.

pub mod api;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod state;

pub mod config;
pub mod server;

pub mod routes;

pub use error::AppError;
pub use state::AppState;

