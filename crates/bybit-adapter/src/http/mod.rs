/*
[INPUT]:  HTTP client configuration and API endpoints
[OUTPUT]: HTTP responses and typed API results
[POS]:    HTTP layer - REST API communication
[UPDATE]: When adding new endpoints or changing client behavior
*/

pub mod account;
pub mod client;
pub mod error;
pub mod market;
pub mod sign;
pub mod trade;

pub use error::{BybitError, Result};
pub use sign::RequestSigner;

pub use client::{BybitClient, ClientConfig, Credentials};
