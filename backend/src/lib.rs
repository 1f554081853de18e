//! # Facts Backend
//!
//! A small CRUD service over a single collection of Chuck Norris facts.
//!
//! ## Architecture
//!
//! - [`api`]: DTOs shared by the store and the HTTP API ([`api::Fact`], [`api::FactId`])
//! - [`db`]: Repository pattern and persistence (in-memory and Postgres backends)
//! - [`config`]: Process configuration read at startup
//! - [`http`]: Axum-based HTTP server and request handlers

pub mod api;
pub mod config;
pub mod db;

#[cfg(feature = "http-server")]
pub mod http;
