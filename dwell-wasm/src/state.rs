use std::cell::RefCell;
use std::rc::Rc;

use dwell_core::MapView;
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement, Window};

/// Application state shared by every browser callback through an
/// `Rc<RefCell<_>>`.
pub struct State {
    pub window: Window,
    pub document: Document,
    /// Resolved lazily; stays `None` until the canvas element exists.
    pub canvas: Option<(HtmlCanvasElement, CanvasRenderingContext2d)>,
    pub view: MapView,
}

pub type SharedState = Rc<RefCell<State>>;

thread_local! {
    pub static STATE: RefCell<Option<SharedState>> = const { RefCell::new(None) };
}
