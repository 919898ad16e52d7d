//! Projection and rendering core for the rail terminal dwell map.
//!
//! Everything here is independent of the browser: the wasm crate supplies a
//! [`render::DrawingSurface`] backed by a canvas and drives a
//! [`view::MapView`] from DOM events.

pub mod config;
pub mod dataset;
pub mod error;
pub mod filter;
pub mod models;
pub mod projection;
pub mod render;
pub mod view;

pub use config::{
    CanvasDimensions, ColorStop, GeographicBounds, MapConfig, PointStyle, RegionStyle,
};
pub use dataset::{parse_records, parse_regions};
pub use error::{Error, Result};
pub use filter::{color_for_value, filter_records};
pub use models::{
    DwellRecord, FilterCriteria, GeoCoordinate, PixelCoordinate, Railroad, RegionFeature,
    RegionGeometry,
};
pub use projection::{Projection, project, unproject};
pub use render::{DrawingSurface, draw_points, draw_regions, render_frame};
pub use view::{LoadPhase, MapView};
