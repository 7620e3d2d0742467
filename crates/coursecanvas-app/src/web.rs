//! WebAssembly entry point and platform-specific code.

use crate::api::ApiClient;
use crate::config::AppConfig;
use crate::pages::MyCoursesPage;
use coursecanvas_core::canvas::{CourseCanvas, EditorEvent};
use coursecanvas_core::input::{Key, Modifiers};
use coursecanvas_core::overlay::{Browser, OverlayError, OverlayHost, OverlayResult, OverlayStyle};
use coursecanvas_core::scene::Stage;
use coursecanvas_core::{CourseDocument, ElementId, PartKind};
use kurbo::{Point, Size};
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Event, EventTarget, HtmlTextAreaElement, KeyboardEvent, MouseEvent, Window};

thread_local! {
    /// Canvas that overlay listeners report to.
    static ACTIVE_CANVAS: RefCell<Weak<RefCell<WebCanvas>>> = RefCell::new(Weak::new());
}

/// Hand an overlay event to the active canvas.
fn forward(event: EditorEvent) {
    let Some(canvas) = ACTIVE_CANVAS.with(|slot| slot.borrow().upgrade()) else {
        return;
    };
    let Ok(mut canvas) = canvas.try_borrow_mut() else {
        log::warn!("Canvas busy, dropped {event:?}");
        return;
    };
    if let Err(err) = canvas.edit_event(event) {
        log::warn!("Overlay event failed: {err}");
    }
}

fn js_error(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn host_error(err: JsValue) -> OverlayError {
    OverlayError::Host(format!("{err:?}"))
}

fn window() -> OverlayResult<Window> {
    web_sys::window().ok_or_else(|| OverlayError::Host("no window".to_string()))
}

fn document() -> OverlayResult<Document> {
    window()?
        .document()
        .ok_or_else(|| OverlayError::Host("no document".to_string()))
}

/// Browser family from `navigator.userAgent`.
pub fn detect_browser() -> Browser {
    web_sys::window()
        .and_then(|w| w.navigator().user_agent().ok())
        .map(|ua| Browser::from_user_agent(&ua))
        .unwrap_or_default()
}

/// Key and modifiers of a DOM keyboard event.
pub fn key_from_event(event: &KeyboardEvent) -> (Key, Modifiers) {
    let modifiers = Modifiers {
        shift: event.shift_key(),
        ctrl: event.ctrl_key(),
        alt: event.alt_key(),
        meta: event.meta_key(),
    };
    (Key::from_dom(&event.key()), modifiers)
}

/// DOM listeners feeding one mounted text area into the canvas.
#[derive(Debug)]
struct Listeners {
    keydown: Closure<dyn FnMut(KeyboardEvent)>,
    input: Closure<dyn FnMut(Event)>,
    click: Closure<dyn FnMut(MouseEvent)>,
    arm_click: Closure<dyn FnMut()>,
    timeout: Option<i32>,
}

impl Listeners {
    fn new(area: &HtmlTextAreaElement) -> Self {
        let keydown = Closure::<dyn FnMut(KeyboardEvent)>::new(|event: KeyboardEvent| {
            let (key, modifiers) = key_from_event(&event);
            if key == Key::Enter && !modifiers.shift {
                event.prevent_default();
            }
            forward(EditorEvent::OverlayKey { key, modifiers });
        });
        let input = Closure::<dyn FnMut(Event)>::new(|_: Event| forward(EditorEvent::OverlayInput));

        let area_target: EventTarget = area.clone().into();
        let click = Closure::<dyn FnMut(MouseEvent)>::new(move |event: MouseEvent| {
            let target_is_overlay = event.target().is_some_and(|target| target == area_target);
            forward(EditorEvent::OutsideClick { target_is_overlay });
        });

        let click_fn: JsValue = click.as_ref().clone();
        let arm_click = Closure::<dyn FnMut()>::new(move || {
            let armed = window().map_err(js_error).and_then(|window| {
                window.add_event_listener_with_callback("click", click_fn.unchecked_ref())
            });
            if let Err(err) = armed {
                log::warn!("Failed to watch outside clicks: {err:?}");
            }
        });

        Self { keydown, input, click, arm_click, timeout: None }
    }

    fn attach(&mut self, area: &HtmlTextAreaElement) -> OverlayResult<()> {
        area.add_event_listener_with_callback("keydown", self.keydown.as_ref().unchecked_ref())
            .map_err(host_error)?;
        area.add_event_listener_with_callback("input", self.input.as_ref().unchecked_ref())
            .map_err(host_error)?;
        // The click that opened the overlay is still propagating.
        let timeout = window()?
            .set_timeout_with_callback_and_timeout_and_arguments_0(self.arm_click.as_ref().unchecked_ref(), 0)
            .map_err(host_error)?;
        self.timeout = Some(timeout);
        Ok(())
    }

    fn detach(&mut self, area: &HtmlTextAreaElement) -> OverlayResult<()> {
        let window = window()?;
        if let Some(timeout) = self.timeout.take() {
            window.clear_timeout_with_handle(timeout);
        }
        window
            .remove_event_listener_with_callback("click", self.click.as_ref().unchecked_ref())
            .map_err(host_error)?;
        area.remove_event_listener_with_callback("keydown", self.keydown.as_ref().unchecked_ref())
            .map_err(host_error)?;
        area.remove_event_listener_with_callback("input", self.input.as_ref().unchecked_ref())
            .map_err(host_error)?;
        Ok(())
    }
}

/// `<textarea>` appended to the page body.
#[derive(Debug, Default)]
pub struct DomOverlay {
    area: Option<HtmlTextAreaElement>,
    /// Kept past unmount: unmount runs from inside these callbacks.
    listeners: Option<Listeners>,
}

impl DomOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    fn area(&self) -> OverlayResult<&HtmlTextAreaElement> {
        self.area.as_ref().ok_or(OverlayError::NotMounted)
    }

    fn apply_style(area: &HtmlTextAreaElement, style: &OverlayStyle) -> OverlayResult<()> {
        let css = area.style();
        for (name, value) in style.css_declarations() {
            css.set_property(name, &value).map_err(host_error)?;
        }
        Ok(())
    }
}

impl OverlayHost for DomOverlay {
    fn mount(&mut self, style: &OverlayStyle, text: &str) -> OverlayResult<()> {
        if self.area.is_some() {
            return Err(OverlayError::AlreadyMounted);
        }
        let document = document()?;
        let body = document
            .body()
            .ok_or_else(|| OverlayError::Host("no body".to_string()))?;
        let area: HtmlTextAreaElement = document
            .create_element("textarea")
            .map_err(host_error)?
            .dyn_into()
            .map_err(|_| OverlayError::Host("not a textarea".to_string()))?;
        area.set_value(text);
        Self::apply_style(&area, style)?;
        body.append_child(&area).map_err(host_error)?;

        let mut listeners = Listeners::new(&area);
        if let Err(err) = listeners.attach(&area) {
            let _ = listeners.detach(&area);
            area.remove();
            return Err(err);
        }
        self.listeners = Some(listeners);
        area.focus().map_err(host_error)?;
        self.area = Some(area);
        Ok(())
    }

    fn restyle(&mut self, style: &OverlayStyle) -> OverlayResult<()> {
        Self::apply_style(self.area()?, style)
    }

    fn scroll_height(&mut self) -> OverlayResult<f64> {
        let area = self.area()?;
        area.style().set_property("height", "auto").map_err(host_error)?;
        Ok(f64::from(area.scroll_height()))
    }

    fn value(&self) -> OverlayResult<String> {
        Ok(self.area()?.value())
    }

    fn unmount(&mut self) -> OverlayResult<()> {
        let area = self.area.take().ok_or(OverlayError::NotMounted)?;
        let detached = match self.listeners.as_mut() {
            Some(listeners) => listeners.detach(&area),
            None => Ok(()),
        };
        area.remove();
        detached
    }

    fn is_mounted(&self) -> bool {
        self.area.is_some()
    }
}

/// Course canvas editing through DOM text areas.
pub type WebCanvas = CourseCanvas<DomOverlay>;

/// Empty canvas configured for the current browser.
pub fn web_canvas() -> WebCanvas {
    let mut canvas = WebCanvas::new();
    canvas.set_browser(detect_browser());
    canvas
}

/// Course canvas exposed to JavaScript. The newest handle receives overlay
/// key, input and outside-click events.
#[wasm_bindgen]
pub struct CanvasHandle {
    canvas: Rc<RefCell<WebCanvas>>,
}

#[wasm_bindgen]
impl CanvasHandle {
    #[wasm_bindgen(constructor)]
    pub fn new() -> CanvasHandle {
        let canvas = Rc::new(RefCell::new(web_canvas()));
        ACTIVE_CANVAS.with(|slot| *slot.borrow_mut() = Rc::downgrade(&canvas));
        CanvasHandle { canvas }
    }

    /// Replace the document with a course JSON file. Any open edit is committed first.
    pub fn load(&self, json: &str) -> Result<(), JsValue> {
        let document = CourseDocument::from_json(json).map_err(js_error)?;
        let mut canvas = self.canvas.try_borrow_mut().map_err(js_error)?;
        canvas.click_outside(false).map_err(js_error)?;
        let scene = canvas.scene().stage().ok();
        *canvas = WebCanvas::with_document(document);
        canvas.set_browser(detect_browser());
        if let Some(stage) = scene {
            canvas.mount_stage(stage).map_err(js_error)?;
        }
        Ok(())
    }

    #[wasm_bindgen(js_name = toJson)]
    pub fn to_json(&self) -> Result<String, JsValue> {
        let canvas = self.canvas.try_borrow().map_err(js_error)?;
        canvas.document.to_json().map_err(js_error)
    }

    /// The stage container was laid out at (`left`, `top`) in page pixels.
    #[wasm_bindgen(js_name = mountStage)]
    pub fn mount_stage(&self, left: f64, top: f64, width: f64, height: f64) -> Result<(), JsValue> {
        let canvas = self.canvas.try_borrow().map_err(js_error)?;
        let stage = Stage::new(Point::new(left, top), Size::new(width, height));
        canvas.mount_stage(stage).map_err(js_error)
    }

    #[wasm_bindgen(js_name = unmountStage)]
    pub fn unmount_stage(&self) -> Result<(), JsValue> {
        let mut canvas = self.canvas.try_borrow_mut().map_err(js_error)?;
        canvas.unmount_stage().map(|_| ()).map_err(js_error)
    }

    pub fn select(&self, id: &str) -> Result<(), JsValue> {
        self.dispatch(id, EditorEvent::Select)
    }

    /// Open the inline editor over `part` (e.g. `"word"`).
    #[wasm_bindgen(js_name = doubleClick)]
    pub fn double_click(&self, id: &str, part: &str) -> Result<(), JsValue> {
        let part: PartKind = serde_json::from_value(serde_json::Value::String(part.to_string())).map_err(js_error)?;
        self.dispatch(id, EditorEvent::DoubleClick { part })
    }

    pub fn undo(&self) -> Result<bool, JsValue> {
        let mut canvas = self.canvas.try_borrow_mut().map_err(js_error)?;
        canvas.undo().map_err(js_error)
    }

    pub fn redo(&self) -> Result<bool, JsValue> {
        let mut canvas = self.canvas.try_borrow_mut().map_err(js_error)?;
        canvas.redo().map_err(js_error)
    }

    fn dispatch(&self, id: &str, event: EditorEvent) -> Result<(), JsValue> {
        let id = ElementId::parse_str(id).map_err(js_error)?;
        let mut canvas = self.canvas.try_borrow_mut().map_err(js_error)?;
        canvas.dispatch(id, event).map(|_| ()).map_err(js_error)
    }
}

impl Default for CanvasHandle {
    fn default() -> Self {
        Self::new()
    }
}

/// Fetch the user's courses and write the page into the element `container_id`.
#[wasm_bindgen]
pub async fn show_my_courses(container_id: String, base_url: String, token: String) -> Result<(), JsValue> {
    let config = AppConfig::default().with_base_url(base_url).with_token(token);
    let client = ApiClient::new(&config).map_err(js_error)?;
    let document = document().map_err(js_error)?;
    let container = document
        .get_element_by_id(&container_id)
        .ok_or_else(|| JsValue::from_str("container not found"))?;

    let mut page = MyCoursesPage::new();
    page.begin_load();
    render_page(&document, &container, &page)?;
    page.load(&client).await;
    render_page(&document, &container, &page)
}

fn render_page(document: &Document, container: &web_sys::Element, page: &MyCoursesPage) -> Result<(), JsValue> {
    container.set_text_content(None);
    for (i, line) in page.view().iter().enumerate() {
        let tag = if i == 0 && !page.is_loading() { "h1" } else { "p" };
        let node = document.create_element(tag)?;
        node.set_text_content(Some(line));
        container.append_child(&node)?;
    }
    Ok(())
}

/// Initialize logging for the WASM build.
#[wasm_bindgen(start)]
pub fn run_wasm() {
    console_error_panic_hook::set_once();

    if let Err(err) = console_log::init_with_level(log::Level::Info) {
        web_sys::console::error_1(&JsValue::from_str(&err.to_string()));
    }

    log::info!("Starting coursecanvas (WASM), browser: {:?}", detect_browser());
}
