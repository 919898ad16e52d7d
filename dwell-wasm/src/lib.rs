use std::cell::RefCell;
use std::rc::Rc;

use dwell_core::config::legend_entries;
use dwell_core::{
    DwellRecord, Error, MapConfig, MapView, RegionFeature, parse_records, parse_regions,
};
use log::LevelFilter;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Event, HtmlElement, Window};

mod canvas;
mod constants;
mod controls;
mod logger;
mod state;
mod utils;

use crate::canvas::{CanvasSurface, init_canvas, sync_canvas_size};
use crate::constants::{
    CANVAS_ID, CONTAINER_ID, LEGEND_ID, RECORDS_PATH, REGIONS_PATH, STATUS_ID,
};
use crate::state::{STATE, SharedState, State};
use crate::utils::{asset_url, fetch_text_with_fallbacks, filter_from_query, get_query_param};

/// Width available to the map: the container if present, else the viewport.
fn container_width(window: &Window, document: &Document) -> f64 {
    match document.get_element_by_id(CONTAINER_ID) {
        Some(el) => el.client_width() as f64,
        None => window
            .inner_width()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(0.0),
    }
}

fn update_status_dom(state: &State) {
    let Some(el) = state.document.get_element_by_id(STATUS_ID) else {
        return;
    };
    el.set_text_content(Some(state.view.status_text().as_str()));
}

fn build_legend_dom(document: &Document, config: &MapConfig) -> Result<(), JsValue> {
    let Some(legend) = document.get_element_by_id(LEGEND_ID) else {
        return Ok(());
    };
    legend.set_inner_html("");
    for (label, color) in legend_entries(&config.color_stops) {
        let row = document.create_element("div")?;
        row.set_class_name("legend-row");
        let swatch: HtmlElement = document.create_element("span")?.dyn_into()?;
        swatch.set_class_name("legend-swatch");
        swatch.style().set_property("background-color", &color)?;
        let text = document.create_element("span")?;
        text.set_text_content(Some(label.as_str()));
        row.append_child(&swatch)?;
        row.append_child(&text)?;
        legend.append_child(&row)?;
    }
    Ok(())
}

/// Paint the pending frame. Runs from `requestAnimationFrame`.
fn run_frame(state: &SharedState) {
    let mut guard = state.borrow_mut();
    let s = &mut *guard;
    if s.canvas.is_none() {
        s.canvas = init_canvas(&s.document, CANVAS_ID);
    }
    let dpr = s.window.device_pixel_ratio();
    let drawn = match &s.canvas {
        Some((cv, ctx)) => {
            sync_canvas_size(cv, s.view.dims(), dpr);
            let mut surface = CanvasSurface::new(ctx, dpr);
            s.view.redraw(Some(&mut surface))
        }
        None => s.view.redraw::<CanvasSurface<'_>>(None),
    };
    if drawn {
        log::debug!("drew {} dwell markers", s.view.visible_count());
    }
    update_status_dom(s);
}

/// Schedule one animation frame if the view has unpainted changes. Extra
/// calls before the frame runs are absorbed.
pub(crate) fn schedule_frame(state: &SharedState) {
    let window = {
        let mut s = state.borrow_mut();
        update_status_dom(&s);
        if !s.view.request_frame() {
            return;
        }
        s.window.clone()
    };
    let st = state.clone();
    let cb = Closure::once_into_js(move |_ts: f64| run_frame(&st));
    if let Err(e) = window.request_animation_frame(cb.unchecked_ref()) {
        log::error!("requestAnimationFrame failed: {e:?}");
    }
}

fn attach_resize(state: SharedState) -> Result<(), JsValue> {
    let window = state.borrow().window.clone();
    let st = state.clone();
    let onresize = Closure::<dyn FnMut(Event)>::wrap(Box::new(move |_e: Event| {
        {
            let mut s = st.borrow_mut();
            let w = container_width(&s.window, &s.document);
            s.view.resize(w);
        }
        schedule_frame(&st);
    }));
    window.add_event_listener_with_callback("resize", onresize.as_ref().unchecked_ref())?;
    onresize.forget();
    Ok(())
}

async fn load_regions(window: &Window) -> dwell_core::Result<Vec<RegionFeature>> {
    let url = asset_url(REGIONS_PATH);
    let text = fetch_text_with_fallbacks(window, &[url.as_str(), REGIONS_PATH])
        .await
        .ok_or_else(|| Error::Unavailable(REGIONS_PATH.to_string()))?;
    parse_regions(&text)
}

async fn load_records(window: &Window) -> dwell_core::Result<Vec<DwellRecord>> {
    let url = asset_url(RECORDS_PATH);
    let text = fetch_text_with_fallbacks(window, &[url.as_str(), RECORDS_PATH])
        .await
        .ok_or_else(|| Error::Unavailable(RECORDS_PATH.to_string()))?;
    parse_records(&text)
}

/// Kick off both dataset loads; they complete independently.
fn start_loading(state: &SharedState) {
    let window = {
        let mut s = state.borrow_mut();
        if !s.view.begin_loading() {
            return;
        }
        s.window.clone()
    };

    let st = state.clone();
    let win = window.clone();
    wasm_bindgen_futures::spawn_local(async move {
        let loaded = load_regions(&win).await;
        st.borrow_mut().view.set_regions(loaded);
        schedule_frame(&st);
    });

    let st = state.clone();
    wasm_bindgen_futures::spawn_local(async move {
        let loaded = load_records(&window).await;
        st.borrow_mut().view.set_records(loaded);
        schedule_frame(&st);
    });
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    let window = web_sys::window().ok_or("no window")?;
    let document = window.document().ok_or("no document")?;
    let search = window.location().search().unwrap_or_default();

    let level = match get_query_param(&search, "debug").as_deref() {
        Some("1") | Some("true") => LevelFilter::Debug,
        _ => LevelFilter::Info,
    };
    logger::init(level);

    let config = MapConfig::continental_us();
    let filter = filter_from_query(&search);
    let mut view = MapView::new(config, filter);
    view.resize(container_width(&window, &document));
    if let Err(e) = build_legend_dom(&document, view.config()) {
        log::warn!("legend not built: {e:?}");
    }

    let canvas = init_canvas(&document, CANVAS_ID);
    if canvas.is_none() {
        log::warn!("canvas #{CANVAS_ID} not found; drawing deferred");
    }

    let state = Rc::new(RefCell::new(State {
        window,
        document,
        canvas,
        view,
    }));
    STATE.with(|st| st.replace(Some(state.clone())));

    controls::attach_controls(state.clone())?;
    attach_resize(state.clone())?;
    start_loading(&state);
    update_status_dom(&state.borrow());
    Ok(())
}

/// Host hook: re-measure the container and redraw, e.g. after a layout change
/// the window resize event does not cover.
#[wasm_bindgen]
pub fn refresh() {
    STATE.with(|st| {
        if let Some(state) = st.borrow().as_ref() {
            {
                let mut s = state.borrow_mut();
                let w = container_width(&s.window, &s.document);
                s.view.resize(w);
            }
            schedule_frame(state);
        }
    });
}
