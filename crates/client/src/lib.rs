//! HTTP client and job flow for the Gophic image-resize backend.
//!
//! All requests flow through one [`http::ApiClient`], which runs a chain of
//! response inspectors (the 401 session reset is one). On top of it sit the
//! typed endpoint wrappers in [`api`], the submit / poll / fetch steps, and
//! the [`card::JobCard`] state machine that drives a single job from upload
//! to saved result.

pub mod api;
pub mod auth;
pub mod board;
pub mod card;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod http;
pub mod poller;
pub mod session;
pub mod submit;

pub use api::{JobApi, ResizeApi};
pub use card::{CardState, JobCard};
pub use error::ClientError;
