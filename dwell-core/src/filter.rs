use crate::config::ColorStop;
use crate::models::{DwellRecord, FilterCriteria};

impl FilterCriteria {
    pub fn matches(&self, rec: &DwellRecord) -> bool {
        rec.week == self.week
            && rec.year == self.year
            && self.railroad.is_none_or(|r| r == rec.railroad)
    }
}

/// Records matching the selection, in input order.
pub fn filter_records<'a>(records: &'a [DwellRecord], criteria: &FilterCriteria) -> Vec<&'a DwellRecord> {
    records.iter().filter(|r| criteria.matches(r)).collect()
}

/// Pick the color for `value` from stops sorted highest threshold first.
///
/// Values below every threshold (and NaN) fall back to the lowest stop.
/// Returns `None` only when `stops` is empty.
pub fn color_for_value(value: f64, stops: &[ColorStop]) -> Option<&str> {
    stops
        .iter()
        .find(|s| s.threshold <= value)
        .or_else(|| stops.last())
        .map(|s| s.color.as_str())
}
