// # gce-provision: Compute Engine Instance Provisioning
//
// This crate creates virtual machine instances through the Compute Engine v1
// REST API, waits for the resulting zonal operation to finish, and lists the
// instances of a zone.
//
// The network-facing parts are gated behind the `reqwest` and `tokio` features
// (both enabled by default), mirroring how the crate is consumed by the `gce`
// binary.

/// Shared HTTP client. Enabled with the `reqwest` feature.
#[cfg(feature = "reqwest")]
pub mod client;

/// Google Cloud Platform utilities. Enabled with `reqwest` and `tokio` features.
#[cfg(all(feature = "reqwest", feature = "tokio"))]
pub mod gcp;

/// Process configuration read from flags and environment variables.
pub mod settings;
