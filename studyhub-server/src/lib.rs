//! # StudyHub Server
//!
//! HTTP surface of the StudyHub assistant: an axum router over the response
//! generation, context retrieval, and session history services. All endpoints
//! speak JSON and live under `/api/chat`.

pub mod config;
pub mod error;
pub mod logger;
pub mod routes;
pub mod session;
pub mod state;
