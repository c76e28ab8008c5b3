//! # sauti_api_client
//!
//! Typed client for the Sauti backend API.
//!
//! The [`RemoteApi`] trait is the seam the store layer programs against;
//! [`HttpApi`] is the production implementation. Authentication follows the
//! backend's convention: every authenticated call reads the bearer token
//! from key-value storage at call time, and the handful of public
//! operations (sign-in, sign-up, video listing) skip the header entirely.

pub mod api;
pub mod error;
pub mod http;

pub use api::{AuthPayload, RemoteApi, SubscriptionStatusPayload};
pub use error::ApiError;
pub use http::{ApiConfig, HttpApi};
