use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use geo_types::{Coord, LineString};
use serde::{Deserialize, Deserializer, Serialize};

/// Longitude/latitude pair in degrees. `x` is longitude, `y` is latitude.
pub type GeoCoordinate = Coord<f64>;

/// Closed loop of coordinates forming one boundary of a polygon.
pub type Ring = LineString<f64>;

/// Canvas-space position in pixels, origin at the top-left corner.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PixelCoordinate {
    pub x: f64,
    pub y: f64,
}

impl From<(f64, f64)> for PixelCoordinate {
    fn from(v: (f64, f64)) -> Self {
        PixelCoordinate { x: v.0, y: v.1 }
    }
}

/// Class I carriers reported in the dwell dataset.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Railroad {
    Bnsf,
    Cn,
    Cp,
    Csx,
    Kcs,
    Ns,
    Up,
}

impl Railroad {
    pub const ALL: [Railroad; 7] = [
        Railroad::Bnsf,
        Railroad::Cn,
        Railroad::Cp,
        Railroad::Csx,
        Railroad::Kcs,
        Railroad::Ns,
        Railroad::Up,
    ];

    pub fn code(self) -> &'static str {
        match self {
            Railroad::Bnsf => "BNSF",
            Railroad::Cn => "CN",
            Railroad::Cp => "CP",
            Railroad::Csx => "CSX",
            Railroad::Kcs => "KCS",
            Railroad::Ns => "NS",
            Railroad::Up => "UP",
        }
    }
}

impl fmt::Display for Railroad {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnknownRailroad(pub String);

impl fmt::Display for UnknownRailroad {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown railroad '{}'", self.0)
    }
}

impl std::error::Error for UnknownRailroad {}

impl FromStr for Railroad {
    type Err = UnknownRailroad;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim();
        Railroad::ALL
            .into_iter()
            .find(|r| r.code().eq_ignore_ascii_case(code))
            .ok_or_else(|| UnknownRailroad(code.to_string()))
    }
}

/// Boundary geometry of a region. Polygons are rings (outer first, then
/// holes); multipolygons are a list of such polygons.
#[derive(Clone, Debug, PartialEq)]
pub enum RegionGeometry {
    Polygon(Vec<Ring>),
    MultiPolygon(Vec<Vec<Ring>>),
    /// Any geometry kind the renderer does not draw, keyed by its type name.
    Other(String),
}

impl RegionGeometry {
    pub fn kind(&self) -> &str {
        match self {
            RegionGeometry::Polygon(_) => "Polygon",
            RegionGeometry::MultiPolygon(_) => "MultiPolygon",
            RegionGeometry::Other(kind) => kind,
        }
    }
}

/// A named administrative region (a state) with its boundary.
#[derive(Clone, Debug, PartialEq)]
pub struct RegionFeature {
    pub id: String,
    pub name: String,
    pub density: f64,
    pub geometry: RegionGeometry,
}

/// One weekly dwell observation at a terminal yard.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DwellRecord {
    #[serde(deserialize_with = "deserialize_iso_date")]
    pub date: NaiveDate,
    pub week: u32,
    pub month: u32,
    pub year: i32,
    pub railroad: Railroad,
    pub yard: String,
    pub location: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Dwell time in hours.
    pub value: f64,
}

impl DwellRecord {
    pub fn coord(&self) -> GeoCoordinate {
        Coord {
            x: self.longitude,
            y: self.latitude,
        }
    }
}

/// Accepts both plain dates (`2024-10-21`) and full RFC 3339 timestamps, since
/// JSON serializers of date objects emit the latter.
fn deserialize_iso_date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_iso_date(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid date '{raw}'")))
}

pub fn parse_iso_date(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(d);
    }
    chrono::DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.date_naive())
}

/// The active selection. `railroad: None` matches every carrier.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FilterCriteria {
    pub week: u32,
    pub year: i32,
    pub railroad: Option<Railroad>,
}

impl Default for FilterCriteria {
    fn default() -> Self {
        FilterCriteria {
            week: 1,
            year: 2024,
            railroad: None,
        }
    }
}

/// Parse the railroad selector value; empty or `all` means any carrier.
pub fn parse_railroad_selection(value: &str) -> Result<Option<Railroad>, UnknownRailroad> {
    let v = value.trim();
    if v.is_empty() || v.eq_ignore_ascii_case("all") {
        return Ok(None);
    }
    v.parse().map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn railroad_parses_case_insensitively() {
        assert_eq!("up".parse::<Railroad>(), Ok(Railroad::Up));
        assert_eq!(" BNSF ".parse::<Railroad>(), Ok(Railroad::Bnsf));
        assert!("AMTK".parse::<Railroad>().is_err());
    }

    #[test]
    fn selection_all_means_any() {
        assert_eq!(parse_railroad_selection("all"), Ok(None));
        assert_eq!(parse_railroad_selection(""), Ok(None));
        assert_eq!(parse_railroad_selection("csx"), Ok(Some(Railroad::Csx)));
        assert!(parse_railroad_selection("xyz").is_err());
    }

    #[test]
    fn record_uses_capitalized_field_names() {
        let json = r#"{
            "Date": "2024-10-21T00:00:00.000Z",
            "Week": 43, "Month": 10, "Year": 2024,
            "Railroad": "UP", "Yard": "North Platte", "Location": "NE",
            "Latitude": 41.12, "Longitude": -100.77, "Value": 27.5
        }"#;
        let rec: DwellRecord = serde_json::from_str(json).unwrap();
        assert_eq!(rec.date, NaiveDate::from_ymd_opt(2024, 10, 21).unwrap());
        assert_eq!(rec.railroad, Railroad::Up);
        assert_eq!(rec.coord(), Coord { x: -100.77, y: 41.12 });
    }

    #[test]
    fn plain_dates_are_accepted() {
        assert_eq!(
            parse_iso_date("2023-01-02"),
            NaiveDate::from_ymd_opt(2023, 1, 2)
        );
        assert_eq!(parse_iso_date("01/02/2023"), None);
    }
}
