//! Map rendering for the looked-up city.
//!
//! This module owns the street map tile source, the city marker, and the
//! lifecycle that rebuilds the map whenever the lookup result changes.

pub mod lifecycle;
pub mod marker;
pub mod street;
pub mod view;

pub use lifecycle::{MapInputs, Transition};
pub use marker::MarkerIcon;
pub use view::{MapRenderer, MapSettings};
