//! # Google Compute Engine (GCE) Client
//!
//! This module provides a client for interacting with the Google Compute Engine API.
//! It creates and deletes VM instances, waits for the operations those calls
//! return, and lists the instances of a zone.
//!
//! ## Submodules
//! - `client`: Contains the core client logic for making API requests to GCE.
//! - `defaults`: Builds the request body for a new instance.
//! - `operation`: Polls zonal operations until they finish.
//! - `provision`: The end-to-end create, wait and list flow.
//! - `types`: Defines the data structures that are serialized to and deserialized from
//!   the GCE API.

/// Core client for GCE API requests.
pub mod client;
/// Helper functions for creating GCE instance configurations.
pub mod defaults;
/// Waiting for asynchronous operations.
pub mod operation;
pub mod provision;
/// Data structures for the GCE API.
pub mod types;

// Re-export key components to provide a convenient public API for this module.
pub use crate::gcp::gce::client::{ComputeClient, GCE_API_BASE};
pub use crate::gcp::gce::defaults::{InstanceConfig, create_instance_request};
pub use crate::gcp::gce::operation::{
    MIN_INTERVAL, PollConfig, ProgressCallback, ProgressEvent, wait_for_operation,
};
pub use crate::gcp::gce::provision::{ProvisionOutcome, ProvisionPlan, provision};
pub use crate::gcp::gce::types::*;
