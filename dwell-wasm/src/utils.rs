use dwell_core::{FilterCriteria, models::parse_railroad_selection};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::Window;

/// Build an absolute URL for an asset, taking into account the optional
/// `window.__BASE_URL` which is set by the host page.
pub fn asset_url(path: &str) -> String {
    let p = path.trim();
    if p.starts_with("http://") || p.starts_with("https://") || p.starts_with("data:") {
        return p.to_string();
    }
    let base = web_sys::window()
        .and_then(|w| {
            let v = js_sys::Reflect::get(&w, &JsValue::from_str("__BASE_URL")).ok()?;
            v.as_string()
        })
        .unwrap_or_else(|| "/".to_string());
    join_base(&base, p)
}

fn join_base(base: &str, path: &str) -> String {
    let base = if base.ends_with('/') {
        base.to_string()
    } else {
        format!("{}/", base)
    };
    format!("{}{}", base, path.trim_start_matches('/'))
}

/// Fetch a text resource trying a list of fallback URLs in order.
pub async fn fetch_text_with_fallbacks(window: &Window, urls: &[&str]) -> Option<String> {
    for url in urls {
        let resp_value =
            match wasm_bindgen_futures::JsFuture::from(window.fetch_with_str(url)).await {
                Ok(v) => v,
                Err(e) => {
                    log::warn!("fetch {url} failed: {e:?}");
                    continue;
                }
            };
        let resp: web_sys::Response = match resp_value.dyn_into() {
            Ok(r) => r,
            Err(_) => continue,
        };
        if !resp.ok() {
            log::warn!("fetch {url} returned HTTP {}", resp.status());
            continue;
        }
        if let Ok(text_promise) = resp.text()
            && let Ok(text_js) = wasm_bindgen_futures::JsFuture::from(text_promise).await
            && let Some(s) = text_js.as_string()
        {
            return Some(s);
        }
    }
    None
}

/// Simple query string parser used at start-up.
pub fn get_query_param(search: &str, key: &str) -> Option<String> {
    let s = search.trim_start_matches('?');
    for pair in s.split('&') {
        let mut it = pair.splitn(2, '=');
        let k = it.next()?;
        let v = it.next().unwrap_or("");
        if k == key {
            return Some(url_decode(v));
        }
    }
    None
}

fn url_decode(s: &str) -> String {
    let s = s.replace('+', " ");
    percent_encoding::percent_decode_str(&s)
        .decode_utf8_lossy()
        .to_string()
}

/// Initial selection from `?week=&year=&railroad=`. Missing or malformed
/// parameters keep the default.
pub fn filter_from_query(search: &str) -> FilterCriteria {
    let mut f = FilterCriteria::default();
    if let Some(w) = get_query_param(search, "week").and_then(|v| v.trim().parse().ok()) {
        f.week = w;
    }
    if let Some(y) = get_query_param(search, "year").and_then(|v| v.trim().parse().ok()) {
        f.year = y;
    }
    if let Some(r) = get_query_param(search, "railroad") {
        match parse_railroad_selection(&r) {
            Ok(sel) => f.railroad = sel,
            Err(e) => log::warn!("ignoring railroad query parameter: {e}"),
        }
    }
    f
}
