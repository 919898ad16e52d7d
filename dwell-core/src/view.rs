//! Load state and redraw scheduling for one map view.
//!
//! The host feeds events in (dataset arrival, resize, filter change) and asks
//! [`MapView::request_frame`] whether a frame must be scheduled. Any number of
//! events between two frames collapse into a single redraw.

use crate::config::{CanvasDimensions, MapConfig};
use crate::error::Result;
use crate::models::{DwellRecord, FilterCriteria, RegionFeature};
use crate::render::{DrawingSurface, render_frame};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadPhase {
    Uninitialized,
    Loading,
    Ready,
    Failed,
}

pub struct MapView {
    config: MapConfig,
    phase: LoadPhase,
    regions: Option<Vec<RegionFeature>>,
    records: Option<Vec<DwellRecord>>,
    filter: FilterCriteria,
    // indices into `records` matching `filter`
    visible: Vec<usize>,
    dims: CanvasDimensions,
    dirty: bool,
    frame_pending: bool,
}

impl MapView {
    pub fn new(config: MapConfig, filter: FilterCriteria) -> Self {
        MapView {
            config,
            phase: LoadPhase::Uninitialized,
            regions: None,
            records: None,
            filter,
            visible: Vec::new(),
            dims: CanvasDimensions::default(),
            dirty: false,
            frame_pending: false,
        }
    }

    pub fn config(&self) -> &MapConfig {
        &self.config
    }

    pub fn phase(&self) -> LoadPhase {
        self.phase
    }

    pub fn filter(&self) -> FilterCriteria {
        self.filter
    }

    pub fn dims(&self) -> CanvasDimensions {
        self.dims
    }

    pub fn regions(&self) -> &[RegionFeature] {
        self.regions.as_deref().unwrap_or_default()
    }

    /// Records matching the current filter, in dataset order.
    pub fn visible_records(&self) -> impl Iterator<Item = &DwellRecord> + '_ {
        let all = self.records.as_deref().unwrap_or_default();
        self.visible.iter().filter_map(move |&i| all.get(i))
    }

    pub fn visible_count(&self) -> usize {
        self.visible.len()
    }

    /// Mark the start of both dataset loads. Returns false if loading was
    /// already started.
    pub fn begin_loading(&mut self) -> bool {
        if self.phase != LoadPhase::Uninitialized {
            return false;
        }
        self.phase = LoadPhase::Loading;
        log::debug!("map view loading");
        true
    }

    pub fn set_regions(&mut self, loaded: Result<Vec<RegionFeature>>) {
        match loaded {
            Ok(regions) => {
                log::info!("loaded {} regions", regions.len());
                self.regions = Some(regions);
                self.after_load();
            }
            Err(e) => self.fail("regions", &e),
        }
    }

    pub fn set_records(&mut self, loaded: Result<Vec<DwellRecord>>) {
        match loaded {
            Ok(records) => {
                log::info!("loaded {} dwell records", records.len());
                self.records = Some(records);
                self.refilter();
                self.after_load();
            }
            Err(e) => self.fail("records", &e),
        }
    }

    fn fail(&mut self, what: &str, err: &crate::error::Error) {
        if self.phase != LoadPhase::Failed {
            log::error!("failed to load {what}: {err}");
        }
        self.phase = LoadPhase::Failed;
    }

    fn after_load(&mut self) {
        match self.phase {
            LoadPhase::Failed => {}
            LoadPhase::Ready => self.dirty = true,
            LoadPhase::Uninitialized | LoadPhase::Loading => {
                if self.regions.is_some() && self.records.is_some() {
                    self.phase = LoadPhase::Ready;
                    self.dirty = true;
                    log::debug!("map view ready");
                }
            }
        }
    }

    pub fn set_filter(&mut self, filter: FilterCriteria) {
        if filter == self.filter {
            return;
        }
        self.filter = filter;
        self.refilter();
        self.dirty = true;
    }

    fn refilter(&mut self) {
        let filter = self.filter;
        self.visible = self
            .records
            .as_deref()
            .unwrap_or_default()
            .iter()
            .enumerate()
            .filter(|(_, r)| filter.matches(r))
            .map(|(i, _)| i)
            .collect();
    }

    /// Fit the canvas to a new container width.
    pub fn resize(&mut self, container_width: f64) -> CanvasDimensions {
        let dims = self.config.canvas_for(container_width);
        if dims != self.dims {
            self.dims = dims;
            self.dirty = true;
        }
        dims
    }

    /// Whether the host should schedule a frame now. Returns true at most once
    /// until the next [`MapView::redraw`].
    pub fn request_frame(&mut self) -> bool {
        if self.dirty && self.phase == LoadPhase::Ready && !self.frame_pending {
            self.frame_pending = true;
            return true;
        }
        false
    }

    /// Run the render pass if anything changed. A missing surface skips the
    /// pass and leaves the view dirty for the next trigger.
    pub fn redraw<S: DrawingSurface + ?Sized>(&mut self, surface: Option<&mut S>) -> bool {
        self.frame_pending = false;
        if !self.dirty || self.phase != LoadPhase::Ready {
            return false;
        }
        let Some(surface) = surface else {
            log::debug!("no drawing surface; skipping redraw");
            return false;
        };
        let regions = self.regions.as_deref().unwrap_or_default();
        render_frame(
            surface,
            self.dims,
            &self.config,
            regions,
            self.visible_records(),
        );
        self.dirty = false;
        true
    }

    /// One-line description of the current state for the page status area.
    pub fn status_text(&self) -> String {
        match self.phase {
            LoadPhase::Uninitialized => String::new(),
            LoadPhase::Loading => "Loading dwell data...".to_string(),
            LoadPhase::Failed => "Failed to load data".to_string(),
            LoadPhase::Ready => {
                let n = self.visible.len();
                let noun = if n == 1 { "yard" } else { "yards" };
                let carrier = self
                    .filter
                    .railroad
                    .map(|r| format!(" ({r})"))
                    .unwrap_or_default();
                format!(
                    "{n} {noun}{carrier}, week {} of {}",
                    self.filter.week, self.filter.year
                )
            }
        }
    }
}
