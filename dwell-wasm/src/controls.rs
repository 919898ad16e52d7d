use dwell_core::{FilterCriteria, Railroad, models::parse_railroad_selection};
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Event, HtmlInputElement, HtmlSelectElement};

use crate::constants::{RAILROAD_SELECT_ID, WEEK_INPUT_ID, YEAR_INPUT_ID};
use crate::schedule_frame;
use crate::state::SharedState;

fn input(doc: &Document, id: &str) -> Option<HtmlInputElement> {
    doc.get_element_by_id(id)?.dyn_into().ok()
}

fn select(doc: &Document, id: &str) -> Option<HtmlSelectElement> {
    doc.get_element_by_id(id)?.dyn_into().ok()
}

/// Fill the railroad selector with "all" plus every carrier.
fn populate_railroads(doc: &Document, sel: &HtmlSelectElement) -> Result<(), JsValue> {
    sel.set_inner_html("");
    let codes = std::iter::once(("all", "All railroads"))
        .chain(Railroad::ALL.iter().map(|r| (r.code(), r.code())));
    for (value, label) in codes {
        let opt = doc.create_element("option")?;
        opt.set_attribute("value", value)?;
        opt.set_text_content(Some(label));
        sel.append_child(&opt)?;
    }
    Ok(())
}

/// Reflect `filter` into the form controls.
pub fn write_filter(doc: &Document, filter: &FilterCriteria) {
    if let Some(el) = input(doc, YEAR_INPUT_ID) {
        el.set_value(&filter.year.to_string());
    }
    if let Some(el) = input(doc, WEEK_INPUT_ID) {
        el.set_value(&filter.week.to_string());
    }
    if let Some(el) = select(doc, RAILROAD_SELECT_ID) {
        el.set_value(filter.railroad.map(|r| r.code()).unwrap_or("all"));
    }
}

/// Read the controls on top of `current`; fields that do not parse keep their
/// current value.
pub fn read_filter(doc: &Document, current: FilterCriteria) -> FilterCriteria {
    let mut f = current;
    if let Some(year) = input(doc, YEAR_INPUT_ID).and_then(|el| el.value().trim().parse().ok()) {
        f.year = year;
    }
    if let Some(week) = input(doc, WEEK_INPUT_ID).and_then(|el| el.value().trim().parse().ok()) {
        f.week = week;
    }
    if let Some(el) = select(doc, RAILROAD_SELECT_ID) {
        match parse_railroad_selection(&el.value()) {
            Ok(sel) => f.railroad = sel,
            Err(e) => log::warn!("{e}"),
        }
    }
    f
}

/// Wire the year, week and railroad controls to the filter.
pub fn attach_controls(state: SharedState) -> Result<(), JsValue> {
    let doc: Document = state.borrow().document.clone();
    if let Some(sel) = select(&doc, RAILROAD_SELECT_ID) {
        populate_railroads(&doc, &sel)?;
    }
    write_filter(&doc, &state.borrow().view.filter());

    for (id, event) in [
        (YEAR_INPUT_ID, "input"),
        (WEEK_INPUT_ID, "input"),
        (RAILROAD_SELECT_ID, "change"),
    ] {
        let Some(el) = doc.get_element_by_id(id) else {
            log::warn!("control #{id} not found");
            continue;
        };
        let st = state.clone();
        let on_change = Closure::<dyn FnMut(Event)>::wrap(Box::new(move |_e: Event| {
            {
                let mut s = st.borrow_mut();
                let next = read_filter(&s.document, s.view.filter());
                s.view.set_filter(next);
            }
            schedule_frame(&st);
        }));
        el.add_event_listener_with_callback(event, on_change.as_ref().unchecked_ref())?;
        on_change.forget();
    }
    Ok(())
}
