//! ontap-tracker - Warsaw multitap beer price tracker
//!
//! Discovers bars on the ontap.pl directory, fetches their tap lists
//! concurrently, and answers price queries over the collected snapshot.

pub mod commands;
pub mod config;
pub mod filters;
pub mod format;
pub mod ontap;
pub mod server;
pub mod tracker;

pub use config::Config;
pub use filters::{filter_by_threshold, find_global_minimum};
pub use ontap::models::{Offer, PricedItem, Target, Venue, VenueSet};
pub use tracker::{Tracker, TrackerError, VenueError};
