// src/probe/mod.rs
// =============================================================================
// This module contains the existence-checking machinery.
//
// Submodules:
// - http: the Probe trait and the HEAD-with-timeout checker
// - window: the bounded-concurrency mapper every probing pass runs through
//
// The rest of the crate only talks to `Probe` (never to reqwest directly), so
// discovery and repair can be tested with a scripted fake.
// =============================================================================

mod http;
mod window;

pub use http::{HttpProbe, Probe};
pub use window::map_bounded;
