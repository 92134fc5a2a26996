//! Point-of-interest registry for the Concourse engine.
//!
//! The registry owns the set of POIs, answers spatial and attribute
//! queries, and runs the periodic proximity scan that emits
//! `poi-proximity` events for every active POI within the configured
//! radius of the player -- a level signal, re-emitted every scan tick
//! while the POI stays inside the radius.
//!
//! # Modules
//!
//! - [`error`] -- [`RegistryError`] for validation and configuration
//!   failures.
//! - [`filter`] -- [`PoiFilter`] predicate combination for queries.
//! - [`registry`] -- [`PoiRegistry`], the bus-connected component.

pub mod error;
pub mod filter;
pub mod registry;

pub use error::RegistryError;
pub use filter::PoiFilter;
pub use registry::{PoiRegistry, PoiRegistryConfig};
