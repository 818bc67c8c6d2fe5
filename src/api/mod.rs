//! Request planning for the competition-data API.

mod client;
mod query;

pub use client::{ApiClient, ApiError};
pub use query::{Endpoint, Query};
