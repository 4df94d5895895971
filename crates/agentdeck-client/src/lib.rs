//! Client library for the remote task/agent store.
//!
//! The store is a JSON-over-HTTP service exposing agent lookup, metrics,
//! paged task listings, task submission, and a global activity feed. This
//! crate defines the consuming trait ([`TaskStore`]) and its HTTP
//! implementation ([`HttpClient`]).

pub mod error;
pub mod http;
pub mod store;

pub use error::ClientError;
pub use http::HttpClient;
pub use store::{TaskPage, TaskQuery, TaskStore};
