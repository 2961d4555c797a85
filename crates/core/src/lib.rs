//! Domain types and the Buildkite API client for the bk-trigger action.
//!
//! This crate contains:
//! - Build and build-state types surfaced as action outputs
//! - The build request assembled from action inputs
//! - The [`BuildkiteApi`] trait and its reqwest implementation
//! - The sleep abstraction the poll loop runs on

pub mod api;
pub mod build;
pub mod request;
pub mod sleep;

pub use api::{ApiError, BuildkiteApi, HttpApi};
pub use build::{Build, BuildState};
pub use request::{Author, BuildRequest, PipelineRef, RequestError};
pub use sleep::{Sleeper, TokioSleeper};

// ApiError carries response codes from this type.
pub use reqwest::StatusCode;
