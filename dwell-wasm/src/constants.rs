/// Page element ids and dataset locations.
pub const CANVAS_ID: &str = "map";
pub const CONTAINER_ID: &str = "map-container";
pub const STATUS_ID: &str = "status";
pub const LEGEND_ID: &str = "legend";
pub const YEAR_INPUT_ID: &str = "year";
pub const WEEK_INPUT_ID: &str = "week";
pub const RAILROAD_SELECT_ID: &str = "railroad";

/// Relative to the page base URL.
pub const REGIONS_PATH: &str = "data/us-states.json";
pub const RECORDS_PATH: &str = "data/dwell.json";
