//! # brokkr-plugin
//!
//! Packaging-pipeline stages for the brokkr deployment plugin:
//! - Provider/resource probing (archive location, region, extension
//!   identifier fetch, mark-binary availability)
//! - Extension attachment with an all-or-nothing validation pass
//! - Best-effort mark injection into the build archive
//! - Post-build audit of the generated packaging template
//!
//! The stages are sequenced by [`lifecycle::Pipeline`]; a host (the brokkr
//! CLI or a test harness) invokes them in order and awaits each to
//! completion before the next, so there is no concurrent execution between
//! stages.

pub mod checks;
pub mod extension;
pub mod lifecycle;
pub mod marker;
pub mod provider;
pub mod template;

pub use extension::MutationSummary;
pub use lifecycle::Pipeline;
pub use provider::{ProbeLocations, ProbeOptions};
