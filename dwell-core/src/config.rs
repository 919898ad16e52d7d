//! Map configuration. Angles are in degrees, lengths in CSS pixels.

use crate::error::{Error, Result};

/// Fixed longitude/latitude window mapped onto the canvas.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GeographicBounds {
    min_lon: f64,
    max_lon: f64,
    min_lat: f64,
    max_lat: f64,
    padding: f64,
    aspect_ratio: f64,
}

impl GeographicBounds {
    pub fn new(
        min_lon: f64,
        max_lon: f64,
        min_lat: f64,
        max_lat: f64,
        padding: f64,
        aspect_ratio: f64,
    ) -> Result<Self> {
        let all_finite = [min_lon, max_lon, min_lat, max_lat, padding, aspect_ratio]
            .iter()
            .all(|v| v.is_finite());
        if !all_finite {
            return Err(Error::InvalidBounds("values must be finite".into()));
        }
        if max_lon <= min_lon {
            return Err(Error::InvalidBounds(format!(
                "max longitude {max_lon} must exceed min longitude {min_lon}"
            )));
        }
        if max_lat <= min_lat {
            return Err(Error::InvalidBounds(format!(
                "max latitude {max_lat} must exceed min latitude {min_lat}"
            )));
        }
        if padding < 0.0 {
            return Err(Error::InvalidBounds(format!("negative padding {padding}")));
        }
        if aspect_ratio <= 0.0 {
            return Err(Error::InvalidBounds(format!(
                "aspect ratio {aspect_ratio} must be positive"
            )));
        }
        Ok(GeographicBounds {
            min_lon,
            max_lon,
            min_lat,
            max_lat,
            padding,
            aspect_ratio,
        })
    }

    /// Lower 48 states with a little margin.
    pub fn continental_us() -> Self {
        GeographicBounds {
            min_lon: -125.0,
            max_lon: -66.0,
            min_lat: 24.0,
            max_lat: 50.0,
            padding: 20.0,
            aspect_ratio: 1.6,
        }
    }

    pub fn min_lon(&self) -> f64 {
        self.min_lon
    }
    pub fn max_lon(&self) -> f64 {
        self.max_lon
    }
    pub fn min_lat(&self) -> f64 {
        self.min_lat
    }
    pub fn max_lat(&self) -> f64 {
        self.max_lat
    }
    pub fn padding(&self) -> f64 {
        self.padding
    }
    pub fn aspect_ratio(&self) -> f64 {
        self.aspect_ratio
    }
    pub fn lon_range(&self) -> f64 {
        self.max_lon - self.min_lon
    }
    pub fn lat_range(&self) -> f64 {
        self.max_lat - self.min_lat
    }
}

/// Canvas size in CSS pixels for the current layout.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CanvasDimensions {
    pub width: f64,
    pub height: f64,
}

impl CanvasDimensions {
    /// Fit the canvas to its container: the width loses a fixed offset and the
    /// height follows from the aspect ratio.
    pub fn fit(container_width: f64, width_offset: f64, aspect_ratio: f64) -> Self {
        let avail = (container_width - width_offset).max(0.0);
        CanvasDimensions {
            width: avail.floor(),
            height: (avail / aspect_ratio).floor(),
        }
    }
}

/// Threshold and the color used for values at or above it.
#[derive(Clone, Debug, PartialEq)]
pub struct ColorStop {
    pub threshold: f64,
    pub color: String,
}

impl ColorStop {
    pub fn new(threshold: f64, color: &str) -> Self {
        ColorStop {
            threshold,
            color: color.to_string(),
        }
    }
}

/// Dwell gradient in hours, highest first.
pub fn default_color_stops() -> Vec<ColorStop> {
    vec![
        ColorStop::new(75.0, "#d7191c"),
        ColorStop::new(50.0, "#f46d43"),
        ColorStop::new(35.0, "#fdae61"),
        ColorStop::new(25.0, "#fee08b"),
        ColorStop::new(15.0, "#a6d96a"),
        ColorStop::new(0.0, "#1a9641"),
    ]
}

/// Legend rows for a descending gradient, e.g. `75+ h`, `50-75 h`.
pub fn legend_entries(stops: &[ColorStop]) -> Vec<(String, String)> {
    let mut out = Vec::with_capacity(stops.len());
    let mut upper: Option<f64> = None;
    for s in stops {
        let label = match upper {
            None => format!("{}+ h", s.threshold),
            Some(u) => format!("{}-{} h", s.threshold, u),
        };
        out.push((label, s.color.clone()));
        upper = Some(s.threshold);
    }
    out
}

#[derive(Clone, Debug, PartialEq)]
pub struct RegionStyle {
    pub fill: String,
    pub stroke: String,
    pub stroke_width: f64,
}

impl Default for RegionStyle {
    fn default() -> Self {
        RegionStyle {
            fill: "#eeeeee".into(),
            stroke: "#999999".into(),
            stroke_width: 1.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct PointStyle {
    pub radius: f64,
}

impl Default for PointStyle {
    fn default() -> Self {
        PointStyle { radius: 5.0 }
    }
}

/// Everything the render pass needs besides data and canvas size.
#[derive(Clone, Debug, PartialEq)]
pub struct MapConfig {
    pub bounds: GeographicBounds,
    pub color_stops: Vec<ColorStop>,
    pub region_style: RegionStyle,
    pub point_style: PointStyle,
    /// Horizontal space subtracted from the container width before fitting.
    pub container_offset: f64,
}

impl MapConfig {
    pub fn continental_us() -> Self {
        MapConfig {
            bounds: GeographicBounds::continental_us(),
            color_stops: default_color_stops(),
            region_style: RegionStyle::default(),
            point_style: PointStyle::default(),
            container_offset: 40.0,
        }
    }

    pub fn canvas_for(&self, container_width: f64) -> CanvasDimensions {
        CanvasDimensions::fit(
            container_width,
            self.container_offset,
            self.bounds.aspect_ratio(),
        )
    }
}

impl Default for MapConfig {
    fn default() -> Self {
        Self::continental_us()
    }
}
