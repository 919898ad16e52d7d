//! Parsing and validation of the two input datasets.
//!
//! Region boundaries arrive as a GeoJSON-like feature collection; dwell
//! observations arrive as a flat JSON array. Either loader rejects the whole
//! payload on the first malformed entry.

use geo_types::{Coord, LineString};
use serde::Deserialize;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::models::{DwellRecord, RegionFeature, RegionGeometry, Ring};

#[derive(Deserialize)]
struct RawCollection {
    #[serde(rename = "type")]
    type_: String,
    features: Vec<RawFeature>,
}

#[derive(Deserialize)]
struct RawFeature {
    #[serde(rename = "type")]
    type_: String,
    id: RawId,
    properties: RawProperties,
    geometry: RawGeometry,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(serde_json::Number),
}

impl RawId {
    fn into_string(self) -> String {
        match self {
            RawId::Text(s) => s,
            RawId::Number(n) => n.to_string(),
        }
    }
}

#[derive(Deserialize)]
struct RawProperties {
    name: String,
    density: f64,
}

#[derive(Deserialize)]
struct RawGeometry {
    #[serde(rename = "type")]
    type_: String,
    #[serde(default)]
    coordinates: Value,
}

/// Parse the region boundary collection.
pub fn parse_regions(text: &str) -> Result<Vec<RegionFeature>> {
    let raw: RawCollection = serde_json::from_str(text)?;
    if raw.type_ != "FeatureCollection" {
        return Err(Error::InvalidCollection(format!(
            "expected type FeatureCollection, got {}",
            raw.type_
        )));
    }
    let mut out = Vec::with_capacity(raw.features.len());
    for f in raw.features {
        let id = f.id.into_string();
        if f.type_ != "Feature" {
            return Err(Error::InvalidCollection(format!(
                "feature {id} has type {}, expected Feature",
                f.type_
            )));
        }
        let geometry = convert_geometry(f.geometry).map_err(|reason| Error::InvalidGeometry {
            feature: id.clone(),
            reason,
        })?;
        out.push(RegionFeature {
            id,
            name: f.properties.name,
            density: f.properties.density,
            geometry,
        });
    }
    log::debug!("parsed {} region features", out.len());
    Ok(out)
}

fn convert_geometry(raw: RawGeometry) -> std::result::Result<RegionGeometry, String> {
    match raw.type_.as_str() {
        "Polygon" => parse_rings(&raw.coordinates)
            .map(RegionGeometry::Polygon)
            .ok_or_else(|| "Polygon coordinates must be ring -> point -> [lon, lat]".to_string()),
        "MultiPolygon" => parse_polygons(&raw.coordinates)
            .map(RegionGeometry::MultiPolygon)
            .ok_or_else(|| {
                "MultiPolygon coordinates must be polygon -> ring -> point -> [lon, lat]"
                    .to_string()
            }),
        _ => Ok(RegionGeometry::Other(raw.type_)),
    }
}

fn parse_position(v: &Value) -> Option<Coord<f64>> {
    let arr = v.as_array()?;
    if arr.len() < 2 {
        return None;
    }
    Some(Coord {
        x: arr[0].as_f64()?,
        y: arr[1].as_f64()?,
    })
}

fn parse_ring(v: &Value) -> Option<Ring> {
    let pts = v
        .as_array()?
        .iter()
        .map(parse_position)
        .collect::<Option<Vec<_>>>()?;
    Some(LineString::new(pts))
}

fn parse_rings(v: &Value) -> Option<Vec<Ring>> {
    v.as_array()?.iter().map(parse_ring).collect()
}

fn parse_polygons(v: &Value) -> Option<Vec<Vec<Ring>>> {
    v.as_array()?.iter().map(parse_rings).collect()
}

/// Parse and range-check the dwell observations.
pub fn parse_records(text: &str) -> Result<Vec<DwellRecord>> {
    let records: Vec<DwellRecord> = serde_json::from_str(text)?;
    for (index, rec) in records.iter().enumerate() {
        validate_record(rec).map_err(|reason| Error::InvalidRecord { index, reason })?;
    }
    log::debug!("parsed {} dwell records", records.len());
    Ok(records)
}

fn validate_record(rec: &DwellRecord) -> std::result::Result<(), String> {
    if !(1..=53).contains(&rec.week) {
        return Err(format!("week {} out of range 1..=53", rec.week));
    }
    if !(1..=12).contains(&rec.month) {
        return Err(format!("month {} out of range 1..=12", rec.month));
    }
    if !(-90.0..=90.0).contains(&rec.latitude) {
        return Err(format!("latitude {} out of range", rec.latitude));
    }
    if !(-180.0..=180.0).contains(&rec.longitude) {
        return Err(format!("longitude {} out of range", rec.longitude));
    }
    if !rec.value.is_finite() {
        return Err("value is not a finite number".to_string());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Railroad;

    const REGIONS: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature", "id": "08",
                "properties": { "name": "Colorado", "density": 49.33 },
                "geometry": { "type": "Polygon", "coordinates": [
                    [[-107.9, 41.0], [-102.0, 41.0], [-102.0, 37.0], [-109.0, 37.0], [-107.9, 41.0]]
                ]}
            },
            {
                "type": "Feature", "id": 26,
                "properties": { "name": "Michigan", "density": 173.9 },
                "geometry": { "type": "MultiPolygon", "coordinates": [
                    [[[-83.4, 41.7], [-84.8, 41.7], [-84.4, 45.7], [-83.4, 41.7]]],
                    [[[-88.0, 48.0], [-89.0, 47.9], [-88.5, 46.5], [-88.0, 48.0]]]
                ]}
            },
            {
                "type": "Feature", "id": "xx",
                "properties": { "name": "Somewhere", "density": 0 },
                "geometry": { "type": "Point", "coordinates": [-100.0, 40.0] }
            }
        ]
    }"#;

    #[test]
    fn regions_parse_both_geometry_kinds() {
        let regions = parse_regions(REGIONS).unwrap();
        assert_eq!(regions.len(), 3);
        match &regions[0].geometry {
            RegionGeometry::Polygon(rings) => {
                assert_eq!(rings.len(), 1);
                assert_eq!(rings[0].0.len(), 5);
                assert_eq!(rings[0].0[0], Coord { x: -107.9, y: 41.0 });
            }
            other => panic!("expected polygon, got {other:?}"),
        }
        match &regions[1].geometry {
            RegionGeometry::MultiPolygon(polys) => assert_eq!(polys.len(), 2),
            other => panic!("expected multipolygon, got {other:?}"),
        }
        assert_eq!(regions[1].id, "26");
        assert_eq!(regions[2].geometry, RegionGeometry::Other("Point".into()));
    }

    #[test]
    fn regions_reject_wrong_nesting() {
        let text = r#"{"type": "FeatureCollection", "features": [{
            "type": "Feature", "id": "1",
            "properties": { "name": "Bad", "density": 1 },
            "geometry": { "type": "Polygon", "coordinates": [[-100.0, 40.0], [-99.0, 40.0]] }
        }]}"#;
        let err = parse_regions(text).unwrap_err();
        assert!(matches!(err, Error::InvalidGeometry { ref feature, .. } if feature == "1"));
    }

    #[test]
    fn regions_reject_missing_properties() {
        let text = r#"{"type": "FeatureCollection", "features": [{
            "type": "Feature", "id": "1",
            "properties": { "name": "No density" },
            "geometry": { "type": "Polygon", "coordinates": [] }
        }]}"#;
        assert!(matches!(parse_regions(text), Err(Error::Json(_))));
    }

    #[test]
    fn regions_reject_wrong_envelope() {
        let text = r#"{"type": "GeometryCollection", "features": []}"#;
        assert!(matches!(
            parse_regions(text),
            Err(Error::InvalidCollection(_))
        ));
    }

    #[test]
    fn records_parse_and_validate() {
        let text = r#"[
            {"Date": "2024-10-21", "Week": 43, "Month": 10, "Year": 2024, "Railroad": "CN",
             "Yard": "Kirk", "Location": "Gary, IN", "Latitude": 41.6, "Longitude": -87.4, "Value": 31.2}
        ]"#;
        let recs = parse_records(text).unwrap();
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].railroad, Railroad::Cn);
        assert_eq!(recs[0].week, 43);
    }

    #[test]
    fn records_reject_unknown_railroad() {
        let text = r#"[
            {"Date": "2024-10-21", "Week": 43, "Month": 10, "Year": 2024, "Railroad": "AMTK",
             "Yard": "X", "Location": "Y", "Latitude": 41.6, "Longitude": -87.4, "Value": 1}
        ]"#;
        assert!(matches!(parse_records(text), Err(Error::Json(_))));
    }

    #[test]
    fn records_reject_out_of_range_week() {
        let text = r#"[
            {"Date": "2024-10-21", "Week": 43, "Month": 10, "Year": 2024, "Railroad": "UP",
             "Yard": "A", "Location": "B", "Latitude": 41.6, "Longitude": -87.4, "Value": 1},
            {"Date": "2024-10-21", "Week": 60, "Month": 10, "Year": 2024, "Railroad": "UP",
             "Yard": "A", "Location": "B", "Latitude": 41.6, "Longitude": -87.4, "Value": 1}
        ]"#;
        let err = parse_records(text).unwrap_err();
        assert!(matches!(err, Error::InvalidRecord { index: 1, .. }));
    }
}
