//! Browser glue: localStorage, a DOM renderer and the requestAnimationFrame driver
//!
//! Every drawable becomes an absolutely positioned `div` inside the game root.
//! Elements are created the first frame an id is submitted, restyled while it
//! keeps being submitted and removed the first frame it is not.

use std::cell::RefCell;
use std::rc::Rc;

use glam::Vec2;
use wasm_bindgen::convert::FromWasmAbi;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, EventTarget, HtmlElement, KeyboardEvent, MouseEvent, VisibilityState};

use super::{FrameTime, InputState, Key, MouseButton, Storage};
use crate::audio::AudioManager;
use crate::consts::{DEFAULT_VIEW_HEIGHT, DEFAULT_VIEW_WIDTH};
use crate::math::Rect;
use crate::renderer::{RenderData, RenderObject, RenderRegistry, RenderSink};
use crate::scene::SceneManager;
use crate::tuning::Tuning;

/// `window.localStorage`, or nothing when the browser refuses it
pub struct LocalStorage {
    inner: Option<web_sys::Storage>,
}

impl Default for LocalStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl LocalStorage {
    pub fn new() -> Self {
        let inner = web_sys::window().and_then(|w| w.local_storage().ok().flatten());
        if inner.is_none() {
            log::warn!("localStorage unavailable - progress will not be saved");
        }
        Self { inner }
    }
}

impl Storage for LocalStorage {
    fn load(&self, key: &str) -> Option<String> {
        self.inner.as_ref()?.get_item(key).ok().flatten()
    }

    fn save(&mut self, key: &str, value: &str) {
        let Some(storage) = &self.inner else {
            return;
        };
        if let Err(err) = storage.set_item(key, value) {
            log::warn!("Failed to save {}: {:?}", key, err);
        }
    }
}

/// Presents `RenderObject`s as DOM elements under `root`
pub struct DomRenderer {
    document: Document,
    root: HtmlElement,
    registry: RenderRegistry<Option<HtmlElement>>,
    order: u32,
}

impl DomRenderer {
    pub fn new(document: Document, root: HtmlElement) -> Self {
        Self {
            document,
            root,
            registry: RenderRegistry::new(),
            order: 0,
        }
    }

    pub fn begin_frame(&mut self) {
        self.registry.begin_frame();
        self.order = 0;
    }

    /// Remove the elements of everything not submitted since `begin_frame`
    pub fn end_frame(&mut self) {
        for element in self.registry.end_frame().into_iter().flatten() {
            element.remove();
        }
    }
}

impl RenderSink for DomRenderer {
    fn submit(&mut self, object: RenderObject) {
        let (document, root) = (&self.document, &self.root);
        let element = self.registry.present(object.id, || create_element(document, root));
        if let Some(element) = element {
            apply_style(element, &object, self.order);
        }
        self.order += 1;
    }
}

fn create_element(document: &Document, root: &HtmlElement) -> Option<HtmlElement> {
    let element = document.create_element("div").ok()?.dyn_into::<HtmlElement>().ok()?;
    let style = element.style();
    for (name, value) in [
        ("position", "absolute"),
        ("left", "0"),
        ("top", "0"),
        ("transform-origin", "0 0"),
        ("pointer-events", "none"),
        ("white-space", "pre"),
        ("font-family", "monospace"),
        ("line-height", "1"),
        ("box-sizing", "border-box"),
    ] {
        style.set_property(name, value).ok()?;
    }
    root.append_child(&element).ok()?;
    Some(element)
}

fn apply_style(element: &HtmlElement, object: &RenderObject, order: u32) {
    let style = element.style();
    let t = &object.transform;
    let transform = format!(
        "translate({:.2}px, {:.2}px) rotate({:.3}deg) scale({:.3}, {:.3}) translate({:.1}%, {:.1}%)",
        t.translation.x,
        t.translation.y,
        t.rotation.degrees(),
        t.scale.x,
        t.scale.y,
        -object.pivot.x * 100.0,
        -object.pivot.y * 100.0,
    );
    let color = object.color.to_css();

    // Ids are reused across scenes, so reset whatever the other kind set
    let properties: Vec<(&str, String)> = match &object.data {
        RenderData::Text { text, font_size } => {
            if element.text_content().as_deref() != Some(text.as_str()) {
                element.set_text_content(Some(text));
            }
            vec![
                ("color", color),
                ("font-size", format!("{font_size}px")),
                ("width", "auto".into()),
                ("height", "auto".into()),
                ("background-color", "transparent".into()),
                ("border", "none".into()),
                ("border-radius", "0".into()),
            ]
        }
        RenderData::Rectangle {
            width,
            height,
            corner_radius,
            stroke_width,
        } => {
            if element.has_child_nodes() {
                element.set_text_content(None);
            }
            let (background, border) = match stroke_width {
                Some(stroke) => ("transparent".to_string(), format!("{stroke}px solid {color}")),
                None => (color, "none".to_string()),
            };
            vec![
                ("width", format!("{width}px")),
                ("height", format!("{height}px")),
                ("background-color", background),
                ("border", border),
                ("border-radius", format!("{}px", corner_radius.unwrap_or(0.0))),
            ]
        }
    };

    let _ = style.set_property("transform", &transform);
    let _ = style.set_property("z-index", &order.to_string());
    for (name, value) in properties {
        let _ = style.set_property(name, &value);
    }
}

/// Everything the browser callbacks share
struct WebGame {
    manager: SceneManager,
    input: InputState,
    renderer: DomRenderer,
    audio: AudioManager,
    frame: FrameTime,
    last_time: Option<f64>,
}

impl WebGame {
    fn run_frame(&mut self, time_ms: f64) {
        let delta = self
            .last_time
            .map_or(0.0, |last| ((time_ms - last) / 1000.0).max(0.0) as f32);
        self.last_time = Some(time_ms);
        self.frame = self.frame.advance(delta);

        self.manager.update(&self.frame, &self.input, &mut self.audio);
        self.audio.apply_settings(self.manager.settings());

        self.renderer.begin_frame();
        self.manager.render(&mut self.renderer);
        self.renderer.end_frame();

        // Events until the next callback belong to the next frame
        self.input.start_frame(&self.frame);
    }

    /// Window lost focus or the tab was hidden
    fn pause(&mut self) {
        self.input.release_all();
        if self.manager.settings().mute_on_blur {
            self.audio.suspend();
        }
    }
}

/// Build the game inside the element with id `root_id` and start the frame loop
pub fn start(root_id: &str) -> Result<(), JsValue> {
    let window = web_sys::window().ok_or("no window")?;
    let document = window.document().ok_or("no document")?;
    let root = document
        .get_element_by_id(root_id)
        .ok_or_else(|| JsValue::from_str(&format!("no element #{root_id}")))?
        .dyn_into::<HtmlElement>()
        .map_err(|_| JsValue::from_str("game root is not an HTML element"))?;

    let view = view_rect(&root);
    let seed = js_sys::Date::now() as u64;
    log::info!("Starting in {:?} with seed {}", view.size(), seed);

    let manager = SceneManager::new(Box::new(LocalStorage::new()), view, seed, Tuning::default());
    let mut audio = AudioManager::new();
    audio.apply_settings(manager.settings());

    let game = Rc::new(RefCell::new(WebGame {
        manager,
        input: InputState::new(),
        renderer: DomRenderer::new(document.clone(), root.clone()),
        audio,
        frame: FrameTime::default(),
        last_time: None,
    }));

    install_input_handlers(&window, &document, &root, &game)?;
    request_animation_frame(game);
    Ok(())
}

fn view_rect(root: &HtmlElement) -> Rect {
    let (width, height) = (root.client_width(), root.client_height());
    let size = if width > 0 && height > 0 {
        Vec2::new(width as f32, height as f32)
    } else {
        Vec2::new(DEFAULT_VIEW_WIDTH, DEFAULT_VIEW_HEIGHT)
    };
    Rect::new(Vec2::ZERO, size)
}

fn pointer_position(root: &HtmlElement, event: &MouseEvent) -> Vec2 {
    let rect = root.get_bounding_client_rect();
    Vec2::new(
        (event.client_x() as f64 - rect.left()) as f32,
        (event.client_y() as f64 - rect.top()) as f32,
    )
}

fn listen<E>(target: &EventTarget, kind: &str, handler: impl FnMut(E) + 'static) -> Result<(), JsValue>
where
    E: FromWasmAbi + 'static,
{
    let closure = Closure::<dyn FnMut(E)>::new(handler);
    target.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

fn install_input_handlers(
    window: &web_sys::Window,
    document: &Document,
    root: &HtmlElement,
    game: &Rc<RefCell<WebGame>>,
) -> Result<(), JsValue> {
    {
        let game = game.clone();
        listen(document, "keydown", move |event: KeyboardEvent| {
            let Ok(mut g) = game.try_borrow_mut() else {
                return;
            };
            // Browsers only allow audio after a gesture
            g.audio.resume();
            if let Some(key) = Key::from_code(&event.code()) {
                event.prevent_default();
                g.input.key_down(key);
            }
        })?;
    }
    {
        let game = game.clone();
        listen(document, "keyup", move |event: KeyboardEvent| {
            if let (Some(key), Ok(mut g)) = (Key::from_code(&event.code()), game.try_borrow_mut()) {
                event.prevent_default();
                g.input.key_up(key);
            }
        })?;
    }
    {
        let game = game.clone();
        let target = root.clone();
        listen(root, "mousedown", move |event: MouseEvent| {
            let Ok(mut g) = game.try_borrow_mut() else {
                return;
            };
            g.audio.resume();
            if let Some(button) = MouseButton::from_dom(event.button()) {
                g.input.mouse_down(button, pointer_position(&target, &event));
            }
        })?;
    }
    {
        // On the document so a release outside the root still counts
        let game = game.clone();
        let target = root.clone();
        listen(document, "mouseup", move |event: MouseEvent| {
            if let (Some(button), Ok(mut g)) = (MouseButton::from_dom(event.button()), game.try_borrow_mut()) {
                g.input.mouse_up(button, pointer_position(&target, &event));
            }
        })?;
    }
    {
        let game = game.clone();
        let target = root.clone();
        listen(root, "mousemove", move |event: MouseEvent| {
            if let Ok(mut g) = game.try_borrow_mut() {
                g.input.mouse_moved(pointer_position(&target, &event));
            }
        })?;
    }
    {
        let game = game.clone();
        listen(window, "blur", move |_: web_sys::FocusEvent| {
            if let Ok(mut g) = game.try_borrow_mut() {
                log::debug!("Window blurred");
                g.pause();
            }
        })?;
    }
    {
        let game = game.clone();
        listen(window, "focus", move |_: web_sys::FocusEvent| {
            if let Ok(g) = game.try_borrow() {
                g.audio.resume();
            }
        })?;
    }
    {
        let game = game.clone();
        let doc = document.clone();
        listen(document, "visibilitychange", move |_: web_sys::Event| {
            let Ok(mut g) = game.try_borrow_mut() else {
                return;
            };
            if doc.visibility_state() == VisibilityState::Hidden {
                log::debug!("Tab hidden");
                g.pause();
            } else {
                g.audio.resume();
            }
        })?;
    }
    Ok(())
}

fn request_animation_frame(game: Rc<RefCell<WebGame>>) {
    let Some(window) = web_sys::window() else {
        log::error!("No window - frame loop stopped");
        return;
    };
    let closure = Closure::once(move |time: f64| {
        game_loop(game, time);
    });
    let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
    closure.forget();
}

fn game_loop(game: Rc<RefCell<WebGame>>, time: f64) {
    if let Ok(mut g) = game.try_borrow_mut() {
        g.run_frame(time);
    }
    request_animation_frame(game);
}
