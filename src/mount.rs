//! Browser integration: wires a [`VaporizeAnimation`] to a canvas.
//!
//! [`mount`] observes the wrapper element for viewport visibility and size,
//! drives the animation from `requestAnimationFrame` while visible, and adds
//! the hidden text element. Dropping the returned [`VaporizeHandle`] undoes
//! all of it.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
    Element, HtmlCanvasElement, HtmlElement, IntersectionObserver, IntersectionObserverEntry,
    IntersectionObserverInit, ResizeObserver, ResizeObserverEntry,
};

use crate::animation::{AnimationPhase, FrameStatus, VaporizeAnimation};
use crate::config::{FontDescriptor, VaporizeConfig};
use crate::render::web::CanvasSurface;
use crate::seo::{hidden_text, HIDDEN_STYLE};
use crate::visibility::{VisibilityChange, VIEWPORT_MARGIN_PX};

type FrameCallback = Closure<dyn FnMut(f64)>;
type ObserverCallback = Closure<dyn FnMut(js_sys::Array, JsValue)>;

struct Shared {
    canvas: HtmlCanvasElement,
    animation: RefCell<VaporizeAnimation>,
    surface: RefCell<Option<CanvasSurface>>,
    frame: RefCell<Option<FrameCallback>>,
    frame_id: Cell<Option<i32>>,
}

impl Shared {
    fn window() -> Result<web_sys::Window, JsValue> {
        web_sys::window().ok_or_else(|| JsValue::from_str("no window"))
    }

    fn now() -> f64 {
        web_sys::window()
            .and_then(|w| w.performance())
            .map(|p| p.now())
            .unwrap_or(0.0)
    }

    fn is_running(&self) -> bool {
        self.frame_id.get().is_some()
    }

    fn request_frame(&self) -> Result<(), JsValue> {
        let frame = self.frame.borrow();
        let Some(callback) = frame.as_ref() else {
            return Ok(());
        };
        let id = Self::window()?.request_animation_frame(callback.as_ref().unchecked_ref())?;
        self.frame_id.set(Some(id));
        Ok(())
    }

    fn cancel_frame(&self) {
        if let Some(id) = self.frame_id.take() {
            if let Ok(window) = Self::window() {
                let _ = window.cancel_animation_frame(id);
            }
        }
    }

    fn start(&self) {
        if self.is_running() || !self.animation.borrow().is_visible() {
            return;
        }
        if let Err(e) = self.request_frame() {
            log::warn!("could not start frame loop: {e:?}");
        }
    }

    /// Run one frame. Returns `false` once the loop should stop.
    fn frame(&self, now: f64) -> bool {
        self.frame_id.set(None);

        let mut surface = self.surface.borrow_mut();
        if surface.is_none() {
            // The context may become available later; keep asking.
            *surface = CanvasSurface::from_canvas(&self.canvas).ok();
        }
        let status = self.animation.borrow_mut().tick(now, surface.as_mut());
        status != FrameStatus::Halted
    }
}

/// Yield control back to the browser event loop.
///
/// Resolves on a zero-delay timeout, so layout triggered by the same
/// observer callback settles before the first frame is drawn.
pub async fn yield_to_event_loop() {
    let promise = js_sys::Promise::new(&mut |resolve, _| {
        if let Some(window) = web_sys::window() {
            let _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, 0);
        } else {
            let _ = resolve.call0(&JsValue::NULL);
        }
    });
    let _ = wasm_bindgen_futures::JsFuture::from(promise).await;
}

/// A mounted animation. Dropping it stops the animation and detaches it.
pub struct VaporizeHandle {
    shared: Rc<Shared>,
    intersection: IntersectionObserver,
    resize: ResizeObserver,
    hidden: Element,
    _on_intersect: ObserverCallback,
    _on_resize: ObserverCallback,
}

impl VaporizeHandle {
    pub fn phase(&self) -> AnimationPhase {
        self.shared.animation.borrow().phase()
    }

    pub fn text_index(&self) -> usize {
        self.shared.animation.borrow().text_index()
    }

    pub fn is_running(&self) -> bool {
        self.shared.is_running()
    }

    /// Change the font. Family changes take effect after a one second pause.
    pub fn set_font(&self, font: FontDescriptor) {
        self.shared.animation.borrow_mut().set_font(font, Shared::now());
    }
}

impl Drop for VaporizeHandle {
    fn drop(&mut self) {
        self.intersection.disconnect();
        self.resize.disconnect();
        self.shared.cancel_frame();
        self.shared.frame.borrow_mut().take();
        self.hidden.remove();
        log::debug!("vaporize animation unmounted");
    }
}

/// Mount an animation of `config` on `canvas`, observing `wrapper`.
///
/// `wrapper` is the element whose visibility and size drive the animation;
/// the hidden text element is appended to it.
pub fn mount(wrapper: &HtmlElement, canvas: &HtmlCanvasElement, config: VaporizeConfig) -> Result<VaporizeHandle, JsValue> {
    let window = Shared::window()?;
    let document = window.document().ok_or_else(|| JsValue::from_str("no document"))?;

    let mut animation = VaporizeAnimation::new(config, window.device_pixel_ratio())
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    animation.resize(wrapper.client_width() as f64, wrapper.client_height() as f64);

    let surface = match CanvasSurface::from_canvas(canvas) {
        Ok(surface) => Some(surface),
        Err(e) => {
            log::warn!("{e}, will retry on the next frame");
            None
        }
    };

    let hidden = document.create_element(animation.config().tag.as_str())?;
    hidden.set_attribute("style", HIDDEN_STYLE)?;
    hidden.set_text_content(Some(&hidden_text(&animation.config().texts)));
    wrapper.append_child(&hidden)?;

    let shared = Rc::new(Shared {
        canvas: canvas.clone(),
        animation: RefCell::new(animation),
        surface: RefCell::new(surface),
        frame: RefCell::new(None),
        frame_id: Cell::new(None),
    });

    // The callback only holds a weak reference so dropping the handle frees
    // everything.
    let weak = Rc::downgrade(&shared);
    *shared.frame.borrow_mut() = Some(Closure::wrap(Box::new(move |now: f64| {
        let Some(shared) = weak.upgrade() else {
            return;
        };
        if shared.frame(now) {
            if let Err(e) = shared.request_frame() {
                log::warn!("frame loop stopped: {e:?}");
            }
        }
    }) as Box<dyn FnMut(f64)>));

    let on_intersect = intersection_callback(Rc::downgrade(&shared));
    let init = IntersectionObserverInit::new();
    init.set_root_margin(&format!("{VIEWPORT_MARGIN_PX}px"));
    init.set_threshold(&JsValue::from_f64(0.0));
    let intersection = IntersectionObserver::new_with_options(on_intersect.as_ref().unchecked_ref(), &init)?;
    intersection.observe(wrapper);

    let on_resize = resize_callback(Rc::downgrade(&shared));
    let resize = ResizeObserver::new(on_resize.as_ref().unchecked_ref())?;
    resize.observe(wrapper);

    log::debug!("vaporize animation mounted");
    Ok(VaporizeHandle {
        shared,
        intersection,
        resize,
        hidden,
        _on_intersect: on_intersect,
        _on_resize: on_resize,
    })
}

fn intersection_callback(shared: Weak<Shared>) -> ObserverCallback {
    Closure::wrap(Box::new(move |entries: js_sys::Array, _observer: JsValue| {
        let Some(inner) = shared.upgrade() else {
            return;
        };
        let Some(entry) = entries
            .iter()
            .filter_map(|e| e.dyn_into::<IntersectionObserverEntry>().ok())
            .last()
        else {
            return;
        };

        let change = inner.animation.borrow_mut().set_visible(entry.is_intersecting());
        match change {
            Some(VisibilityChange::Entered) => {
                let weak = Rc::downgrade(&inner);
                wasm_bindgen_futures::spawn_local(async move {
                    yield_to_event_loop().await;
                    if let Some(shared) = weak.upgrade() {
                        shared.start();
                    }
                });
            }
            Some(VisibilityChange::Left) => inner.cancel_frame(),
            None => {}
        }
    }) as Box<dyn FnMut(js_sys::Array, JsValue)>)
}

fn resize_callback(shared: Weak<Shared>) -> ObserverCallback {
    Closure::wrap(Box::new(move |entries: js_sys::Array, _observer: JsValue| {
        let Some(inner) = shared.upgrade() else {
            return;
        };
        if let Some(entry) = entries
            .iter()
            .filter_map(|e| e.dyn_into::<ResizeObserverEntry>().ok())
            .last()
        {
            let rect = entry.content_rect();
            inner.animation.borrow_mut().resize(rect.width(), rect.height());
        }
    }) as Box<dyn FnMut(js_sys::Array, JsValue)>)
}
