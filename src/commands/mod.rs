//! CLI command implementations.

pub mod bars;
pub mod beers;
pub mod lowest;

pub use bars::BarsCommand;
pub use beers::BeersCommand;
pub use lowest::LowestCommand;
