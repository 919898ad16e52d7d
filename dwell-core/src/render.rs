//! Drawing of regions and dwell markers onto an abstract 2D surface.

use crate::config::{CanvasDimensions, ColorStop, MapConfig, PointStyle, RegionStyle};
use crate::filter::color_for_value;
use crate::models::{DwellRecord, RegionFeature, RegionGeometry, Ring};
use crate::projection::Projection;

/// Minimal path-based 2D drawing API, modelled on the HTML canvas context.
pub trait DrawingSurface {
    /// Erase the whole surface.
    fn clear(&mut self, dims: CanvasDimensions);
    fn begin_path(&mut self);
    fn move_to(&mut self, x: f64, y: f64);
    fn line_to(&mut self, x: f64, y: f64);
    /// Add a full circle as a new sub-path.
    fn circle(&mut self, x: f64, y: f64, radius: f64);
    fn fill(&mut self, color: &str);
    fn stroke(&mut self, color: &str, width: f64);
}

fn trace_ring<S: DrawingSurface + ?Sized>(surface: &mut S, proj: &Projection, ring: &Ring) {
    let mut coords = ring.coords();
    let Some(first) = coords.next() else {
        return;
    };
    let p = proj.project(*first);
    surface.move_to(p.x, p.y);
    for c in coords {
        let p = proj.project(*c);
        surface.line_to(p.x, p.y);
    }
}

/// Paint every region as one filled, outlined path per feature.
pub fn draw_regions<S: DrawingSurface + ?Sized>(
    features: &[RegionFeature],
    surface: &mut S,
    proj: &Projection,
    style: &RegionStyle,
) {
    for f in features {
        match &f.geometry {
            RegionGeometry::Polygon(rings) => {
                surface.begin_path();
                for ring in rings {
                    trace_ring(surface, proj, ring);
                }
            }
            RegionGeometry::MultiPolygon(polys) => {
                surface.begin_path();
                for ring in polys.iter().flatten() {
                    trace_ring(surface, proj, ring);
                }
            }
            RegionGeometry::Other(kind) => {
                log::debug!("skipping {} geometry for region {}", kind, f.name);
                continue;
            }
        }
        surface.fill(&style.fill);
        surface.stroke(&style.stroke, style.stroke_width);
    }
}

/// Paint one color-graded circle per record at its projected location.
pub fn draw_points<'a, S, I>(
    records: I,
    surface: &mut S,
    proj: &Projection,
    stops: &[ColorStop],
    style: &PointStyle,
) where
    S: DrawingSurface + ?Sized,
    I: IntoIterator<Item = &'a DwellRecord>,
{
    for rec in records {
        let Some(color) = color_for_value(rec.value, stops) else {
            continue;
        };
        let p = proj.project(rec.coord());
        surface.begin_path();
        surface.circle(p.x, p.y, style.radius);
        surface.fill(color);
    }
}

/// One full render pass: clear, regions, then the visible records.
pub fn render_frame<'a, S, I>(
    surface: &mut S,
    dims: CanvasDimensions,
    config: &MapConfig,
    regions: &[RegionFeature],
    records: I,
) where
    S: DrawingSurface + ?Sized,
    I: IntoIterator<Item = &'a DwellRecord>,
{
    surface.clear(dims);
    let proj = Projection::new(dims, config.bounds);
    draw_regions(regions, surface, &proj, &config.region_style);
    draw_points(
        records,
        surface,
        &proj,
        &config.color_stops,
        &config.point_style,
    );
}


#[cfg(test)]
mod tests {
    use super::testing::{Cmd, RecordingSurface};
    use super::*;
    use crate::config::GeographicBounds;
    use crate::models::Railroad;
    use chrono::NaiveDate;
    use geo_types::{Coord, LineString};

    fn bounds() -> GeographicBounds {
        GeographicBounds::new(0.0, 10.0, 0.0, 10.0, 0.0, 1.0).unwrap()
    }

    fn proj() -> Projection {
        Projection::new(
            CanvasDimensions {
                width: 100.0,
                height: 100.0,
            },
            bounds(),
        )
    }

    fn square(x0: f64, y0: f64, size: f64) -> Ring {
        LineString::new(vec![
            Coord { x: x0, y: y0 },
            Coord { x: x0 + size, y: y0 },
            Coord { x: x0 + size, y: y0 + size },
            Coord { x: x0, y: y0 + size },
            Coord { x: x0, y: y0 },
        ])
    }

    fn feature(name: &str, geometry: RegionGeometry) -> RegionFeature {
        RegionFeature {
            id: name.to_lowercase(),
            name: name.into(),
            density: 1.0,
            geometry,
        }
    }

    fn record(value: f64, lon: f64, lat: f64) -> DwellRecord {
        DwellRecord {
            date: NaiveDate::from_ymd_opt(2024, 10, 21).unwrap(),
            week: 43,
            month: 10,
            year: 2024,
            railroad: Railroad::Up,
            yard: "Yard".into(),
            location: "Loc".into(),
            latitude: lat,
            longitude: lon,
            value,
        }
    }

    #[test]
    fn polygon_rings_share_one_path() {
        let f = feature(
            "Donut",
            RegionGeometry::Polygon(vec![square(0.0, 0.0, 5.0), square(1.0, 1.0, 1.0)]),
        );
        let mut s = RecordingSurface::default();
        let style = RegionStyle::default();
        draw_regions(&[f], &mut s, &proj(), &style);

        assert_eq!(s.count(|c| *c == Cmd::BeginPath), 1);
        assert_eq!(s.count(|c| matches!(c, Cmd::MoveTo(..))), 2);
        assert_eq!(s.count(|c| matches!(c, Cmd::LineTo(..))), 8);
        assert_eq!(s.cmds[1], Cmd::MoveTo(0.0, 100.0));
        assert_eq!(s.cmds[2], Cmd::LineTo(50.0, 100.0));
        let n = s.cmds.len();
        assert_eq!(s.cmds[n - 2], Cmd::Fill(style.fill.clone()));
        assert_eq!(s.cmds[n - 1], Cmd::Stroke(style.stroke.clone(), style.stroke_width));
    }

    #[test]
    fn multipolygon_accumulates_all_polygons() {
        let f = feature(
            "Islands",
            RegionGeometry::MultiPolygon(vec![
                vec![square(0.0, 0.0, 1.0)],
                vec![square(5.0, 5.0, 1.0)],
                vec![square(8.0, 8.0, 1.0)],
            ]),
        );
        let mut s = RecordingSurface::default();
        draw_regions(&[f], &mut s, &proj(), &RegionStyle::default());
        assert_eq!(s.count(|c| *c == Cmd::BeginPath), 1);
        assert_eq!(s.count(|c| matches!(c, Cmd::MoveTo(..))), 3);
        assert_eq!(s.count(|c| matches!(c, Cmd::Fill(_))), 1);
        assert_eq!(s.count(|c| matches!(c, Cmd::Stroke(..))), 1);
    }

    #[test]
    fn unknown_geometry_is_skipped_without_blocking_others() {
        let features = vec![
            feature("Dot", RegionGeometry::Other("Point".into())),
            feature("Box", RegionGeometry::Polygon(vec![square(2.0, 2.0, 2.0)])),
        ];
        let mut s = RecordingSurface::default();
        draw_regions(&features, &mut s, &proj(), &RegionStyle::default());
        assert_eq!(s.cmds[0], Cmd::BeginPath);
        assert_eq!(s.cmds[1], Cmd::MoveTo(20.0, 80.0));
        assert_eq!(s.count(|c| *c == Cmd::BeginPath), 1);

        let mut only_unknown = RecordingSurface::default();
        draw_regions(&features[..1], &mut only_unknown, &proj(), &RegionStyle::default());
        assert!(only_unknown.cmds.is_empty());
    }

    #[test]
    fn empty_rings_draw_nothing_but_still_fill() {
        let f = feature("Empty", RegionGeometry::Polygon(vec![LineString::new(vec![])]));
        let mut s = RecordingSurface::default();
        draw_regions(&[f], &mut s, &proj(), &RegionStyle::default());
        assert_eq!(s.count(|c| matches!(c, Cmd::MoveTo(..) | Cmd::LineTo(..))), 0);
        assert_eq!(s.count(|c| matches!(c, Cmd::Fill(_))), 1);
    }

    #[test]
    fn points_are_colored_by_bucket() {
        let stops = vec![
            ColorStop::new(50.0, "red"),
            ColorStop::new(20.0, "yellow"),
            ColorStop::new(0.0, "green"),
        ];
        let recs = [record(60.0, 5.0, 5.0), record(20.0, 0.0, 10.0), record(-3.0, 10.0, 0.0)];
        let mut s = RecordingSurface::default();
        let style = PointStyle { radius: 4.0 };
        draw_points(&recs, &mut s, &proj(), &stops, &style);
        assert_eq!(
            s.cmds,
            vec![
                Cmd::BeginPath,
                Cmd::Circle(50.0, 50.0, 4.0),
                Cmd::Fill("red".into()),
                Cmd::BeginPath,
                Cmd::Circle(0.0, 0.0, 4.0),
                Cmd::Fill("yellow".into()),
                Cmd::BeginPath,
                Cmd::Circle(100.0, 100.0, 4.0),
                Cmd::Fill("green".into()),
            ]
        );
    }

    #[test]
    fn frame_clears_then_regions_then_points() {
        let mut config = MapConfig::continental_us();
        config.bounds = bounds();
        let regions = vec![feature("Box", RegionGeometry::Polygon(vec![square(1.0, 1.0, 1.0)]))];
        let recs = [record(10.0, 5.0, 5.0)];
        let dims = CanvasDimensions {
            width: 100.0,
            height: 100.0,
        };
        let mut s = RecordingSurface::default();
        render_frame(&mut s, dims, &config, &regions, recs.iter());
        assert_eq!(s.cmds[0], Cmd::Clear(100.0, 100.0));
        let stroke_at = s
            .cmds
            .iter()
            .position(|c| matches!(c, Cmd::Stroke(..)))
            .unwrap();
        let circle_at = s
            .cmds
            .iter()
            .position(|c| matches!(c, Cmd::Circle(..)))
            .unwrap();
        assert!(stroke_at < circle_at);
        assert_eq!(s.count(|c| matches!(c, Cmd::Clear(..))), 1);
    }
}
