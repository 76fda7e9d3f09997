//! GraphHopper integration: request construction, response decoding and
//! error classification.
//!
//! The crate talks to one engine instance, selected at startup as either
//! public-transport routing or a single profile such as "foot". Every
//! failure mode of the HTTP exchange maps to a [`RoutingError`] so the
//! composer can decide whether to substitute a fallback route.

mod client;
mod error;
mod types;

pub use client::{GraphHopperClient, RoutingConfig, RoutingMode};
pub use error::RoutingError;
pub use types::{Instruction, RouteLeg, RoutePath, RouteResponse};
