//! Connector middleware for the crafting profit calculator.
//!
//! [`AdmissionWindow`] bounds how many requests reach the game-data service
//! per period and [`RetryingApi`] repeats requests that failed in transit.
//! [`ApiBuilder`] stacks both around a raw connector.
#![warn(missing_docs)]

mod builder;
mod rate_limit;
mod retry;

pub use crate::builder::ApiBuilder;
pub use crate::rate_limit::{Admission, AdmissionWindow, RateLimitMiddleware, RateLimitedApi};
pub use crate::retry::{RetryMiddleware, RetryingApi};
