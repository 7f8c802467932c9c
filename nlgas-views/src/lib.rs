//! View models for the gas consumption front-end.
//!
//! This crate provides:
//! - `state`: [`ViewState`], the selected year / municipality / hover passed
//!   explicitly into every build call
//! - `map`: the choropleth page, boundaries joined with one year of data
//! - `detail`: a single municipality's trend, ranks and year-over-year deltas
//! - `home`: the national summary landing page
//!
//! Every view is rebuilt from the immutable dataset whenever the state
//! changes, and serializes to JSON for the renderer.

pub mod detail;
pub mod home;
pub mod map;
pub mod state;

pub use detail::{DetailView, DetailYear};
pub use home::HomeView;
pub use map::{ChoroplethFeature, HoverInfo, MapView};
pub use state::ViewState;
