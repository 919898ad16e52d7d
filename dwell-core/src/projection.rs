//! Linear longitude/latitude to canvas mapping.
//!
//! Each axis is scaled independently so the bounding box fills the padded
//! canvas exactly. True geographic proportions are only approximated through
//! the canvas aspect ratio chosen in [`GeographicBounds`].

use crate::config::{CanvasDimensions, GeographicBounds};
use crate::models::{GeoCoordinate, PixelCoordinate};

/// Scale and offset for one canvas size, derived from the bounds.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projection {
    bounds: GeographicBounds,
    x_scale: f64,
    y_scale: f64,
    x_offset: f64,
    y_offset: f64,
}

impl Projection {
    pub fn new(dims: CanvasDimensions, bounds: GeographicBounds) -> Self {
        let padding = bounds.padding();
        let map_w = dims.width - 2.0 * padding;
        let map_h = dims.height - 2.0 * padding;
        let lon_range = bounds.lon_range();
        let lat_range = bounds.lat_range();
        let x_scale = map_w / lon_range;
        let y_scale = map_h / lat_range;
        // The centering term is zero while the scales are derived from the
        // same drawable size; it only matters if the scales are ever locked.
        let x_offset = (map_w - lon_range * x_scale) / 2.0 + padding;
        let y_offset = (map_h - lat_range * y_scale) / 2.0 + padding;
        Projection {
            bounds,
            x_scale,
            y_scale,
            x_offset,
            y_offset,
        }
    }

    pub fn project(&self, coord: GeoCoordinate) -> PixelCoordinate {
        PixelCoordinate {
            x: (coord.x - self.bounds.min_lon()) * self.x_scale + self.x_offset,
            y: (self.bounds.max_lat() - coord.y) * self.y_scale + self.y_offset,
        }
    }

    pub fn unproject(&self, px: PixelCoordinate) -> GeoCoordinate {
        GeoCoordinate {
            x: (px.x - self.x_offset) / self.x_scale + self.bounds.min_lon(),
            y: self.bounds.max_lat() - (px.y - self.y_offset) / self.y_scale,
        }
    }
}

/// Map a geographic coordinate onto the canvas. Out-of-bounds input lands
/// outside the padded area; nothing is clamped.
pub fn project(
    coord: GeoCoordinate,
    dims: CanvasDimensions,
    bounds: GeographicBounds,
) -> PixelCoordinate {
    Projection::new(dims, bounds).project(coord)
}

/// Inverse of [`project`] for the same canvas and bounds.
pub fn unproject(
    px: PixelCoordinate,
    dims: CanvasDimensions,
    bounds: GeographicBounds,
) -> GeoCoordinate {
    Projection::new(dims, bounds).unproject(px)
}
