//! Volans Meraki API
//!
//! Hand-crafted async HTTP client for the Cisco Meraki Dashboard API v1.
//!
//! Base path: https://api.meraki.com/api/v1
//! Auth: bearer API key on every request
//!
//! The client is a thin, typed veneer: one method per endpoint, one
//! request/response struct pair per operation, no retries or backoff.
//! Callers classify errors (`Error::is_not_found`, `Error::RateLimited`)
//! and decide what to do about them.

pub mod client;
pub mod error;
pub mod types;

pub use client::MerakiClient;
pub use error::Error;
