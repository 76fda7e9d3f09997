//! Transit map server.
//!
//! A JSON API over OSM/GTFS public-transport data: viewport queries for
//! stops and subway lines, fuzzy station search, and point-to-point route
//! calculation delegated to a GraphHopper instance.

pub mod cache;
pub mod composer;
pub mod config;
pub mod domain;
pub mod geo;
pub mod routing;
pub mod store;
pub mod web;
