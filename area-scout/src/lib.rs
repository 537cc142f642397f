//! Commuter-area scout for the London commuter belt.
//!
//! Answers: "which towns could I live in, given my commute and what the
//! area is actually like?" Discovery finds stations with a workable
//! train time to the hub; exploration enriches one area at a time with
//! amenity, nature, and crime data and scores it.

pub mod area;
pub mod commute;
pub mod config;
pub mod enrich;
pub mod geo;
pub mod pipeline;
pub mod postcode;
pub mod routes;
pub mod scoring;
pub mod stations;
pub mod zone;

/// Commute hub: King's Cross / St Pancras.
pub const HUB_LAT: f64 = 51.5308;
pub const HUB_LNG: f64 = -0.1238;

/// Central London, the reference point for candidate discovery and the
/// exclusion-zone distance check.
pub const LONDON_LAT: f64 = 51.5074;
pub const LONDON_LNG: f64 = -0.1278;
