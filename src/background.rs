// Browser glue: binds a particle field to a canvas element, drives it from
// requestAnimationFrame, and feeds it window resize and pointer events.
//
// Everything the browser calls back into holds only a Weak reference to the
// shared state, so once the JS object is freed the callbacks turn into
// no-ops even if one was already queued.

use crate::config::FieldConfig;
use crate::field::ParticleField;
use crate::frame_loop::{FrameHandle, FrameLoop, FrameScheduler};
use crate::renderer;
use crate::surface::{CanvasSurface, Surface};
use crate::Timer;
use rand::rngs::ThreadRng;
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{console, Event, EventTarget, HtmlCanvasElement, MouseEvent, Window};

struct AnimationFrames {
    window: Window,
    callback: Closure<dyn FnMut(f64)>,
}

impl FrameScheduler for AnimationFrames {
    fn request_frame(&mut self) -> Result<FrameHandle, String> {
        self.window
            .request_animation_frame(self.callback.as_ref().unchecked_ref::<js_sys::Function>())
            .map(FrameHandle)
            .map_err(|e| format!("requestAnimationFrame failed: {:?}", e))
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        if let Err(e) = self.window.cancel_animation_frame(handle.0) {
            console::warn_1(&e);
        }
    }
}

// Registered on construction, unregistered on drop
struct EventListener {
    target: EventTarget,
    kind: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

impl EventListener {
    fn new<F>(target: &EventTarget, kind: &'static str, f: F) -> Result<EventListener, JsValue>
    where
        F: FnMut(Event) + 'static,
    {
        let callback = Closure::wrap(Box::new(f) as Box<dyn FnMut(Event)>);
        target.add_event_listener_with_callback(kind, callback.as_ref().unchecked_ref())?;
        Ok(EventListener {
            target: target.clone(),
            kind,
            callback,
        })
    }
}

impl Drop for EventListener {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.kind, self.callback.as_ref().unchecked_ref());
    }
}

struct Shared {
    field: ParticleField<ThreadRng>,
    surface: CanvasSurface,
    frame_loop: FrameLoop<AnimationFrames>,
}

impl Shared {
    fn frame(&mut self) {
        #[cfg(feature = "frame-timing")]
        let _timer = Timer::new("InteractiveBackground::frame");
        let Shared {
            field,
            surface,
            frame_loop,
        } = self;
        let result = frame_loop.on_frame(|| {
            field.step();
            renderer::render_frame(field, surface)
        });
        if let Err(e) = result {
            console::warn_1(&format!("interactive background: frame failed: {}", e).into());
        }
    }

    fn fit(&mut self, width: f64, height: f64) {
        self.surface.set_size(pixels(width), pixels(height));
        let (width, height) = self.surface.size();
        self.field.resize(width, height);
    }
}

// Saturating, with NaN and negatives mapped to 0
fn pixels(dimension: f64) -> u32 {
    if dimension.is_finite() && dimension > 0.0 {
        dimension as u32
    } else {
        0
    }
}

fn window_size(window: &Window) -> Option<(f64, f64)> {
    let width = window.inner_width().ok()?.as_f64()?;
    let height = window.inner_height().ok()?.as_f64()?;
    Some((width, height))
}

/// Animated particle background bound to one canvas element.
///
/// ```js
/// const background = new InteractiveBackground(canvas);
/// background.start();
/// // later, when the view goes away
/// background.free();
/// ```
#[wasm_bindgen]
pub struct InteractiveBackground {
    window: Window,
    shared: Rc<RefCell<Shared>>,
    listeners: Vec<EventListener>,
}

#[wasm_bindgen]
impl InteractiveBackground {
    #[wasm_bindgen(constructor)]
    pub fn new(canvas: HtmlCanvasElement) -> Result<InteractiveBackground, JsValue> {
        InteractiveBackground::build(canvas, FieldConfig::default())
    }

    /// Same as the constructor, with a JSON object overriding any of the
    /// field constants.
    pub fn with_config(
        canvas: HtmlCanvasElement,
        config: &str,
    ) -> Result<InteractiveBackground, JsValue> {
        let config = FieldConfig::from_json(config).map_err(|e| JsValue::from_str(&e))?;
        InteractiveBackground::build(canvas, config)
    }

    /// Sizes the canvas to the window, starts animating, and begins
    /// following window resizes and pointer moves.
    pub fn start(&mut self) -> Result<(), JsValue> {
        let _timer = Timer::new("InteractiveBackground::start");
        if let Some((width, height)) = window_size(&self.window) {
            self.shared.borrow_mut().fit(width, height);
        }
        if self.listeners.is_empty() {
            self.listen()?;
        }
        let mut shared = self.shared.borrow_mut();
        shared.frame_loop.start().map_err(|e| JsValue::from_str(&e))?;
        console::log_1(
            &format!(
                "interactive background: {} particles on {}x{}",
                shared.field.particles().len(),
                shared.field.width(),
                shared.field.height()
            )
            .into(),
        );
        Ok(())
    }

    /// Resizes the canvas and regenerates the particles.
    pub fn resize(&mut self, width: f64, height: f64) {
        self.shared.borrow_mut().fit(width, height);
    }

    /// Pointer position in canvas-local coordinates. Returns how many
    /// particles were pulled toward it.
    pub fn pointer_move(&mut self, x: f64, y: f64) -> usize {
        self.shared.borrow_mut().field.on_pointer_move(x, y)
    }

    pub fn particle_count(&self) -> usize {
        self.shared.borrow().field.particles().len()
    }

    pub fn frame_count(&self) -> f64 {
        self.shared.borrow().frame_loop.frames() as f64
    }

    pub fn is_running(&self) -> bool {
        self.shared.borrow().frame_loop.is_running()
    }

    /// Stops the animation and removes the event listeners. Also runs when
    /// the object is freed; calling it more than once is harmless.
    pub fn teardown(&mut self) {
        self.listeners.clear();
        if let Ok(mut shared) = self.shared.try_borrow_mut() {
            shared.frame_loop.stop();
        }
    }
}

impl InteractiveBackground {
    fn build(
        canvas: HtmlCanvasElement,
        config: FieldConfig,
    ) -> Result<InteractiveBackground, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no global window"))?;
        let surface = CanvasSurface::new(canvas)?;
        let (width, height) = surface.size();
        let field = ParticleField::new(width, height, config, rand::thread_rng());

        let shared = Rc::new_cyclic(|weak: &Weak<RefCell<Shared>>| {
            let weak = weak.clone();
            let callback = Closure::wrap(Box::new(move |_timestamp: f64| {
                if let Some(shared) = weak.upgrade() {
                    if let Ok(mut shared) = shared.try_borrow_mut() {
                        shared.frame();
                    }
                }
            }) as Box<dyn FnMut(f64)>);
            let frames = AnimationFrames {
                window: window.clone(),
                callback,
            };
            RefCell::new(Shared {
                field,
                surface,
                frame_loop: FrameLoop::new(frames),
            })
        });

        Ok(InteractiveBackground {
            window,
            shared,
            listeners: Vec::new(),
        })
    }

    fn listen(&mut self) -> Result<(), JsValue> {
        let weak = Rc::downgrade(&self.shared);
        let window = self.window.clone();
        let on_resize = EventListener::new(&self.window, "resize", move |_event| {
            if let (Some(shared), Some((width, height))) = (weak.upgrade(), window_size(&window)) {
                if let Ok(mut shared) = shared.try_borrow_mut() {
                    shared.fit(width, height);
                }
            }
        })?;

        // Listening on the window keeps working when the canvas itself has
        // pointer-events: none
        let weak = Rc::downgrade(&self.shared);
        let on_pointer = EventListener::new(&self.window, "mousemove", move |event| {
            let event = match event.dyn_into::<MouseEvent>() {
                Ok(event) => event,
                Err(_) => return,
            };
            if let Some(shared) = weak.upgrade() {
                if let Ok(mut shared) = shared.try_borrow_mut() {
                    let rect = shared.surface.canvas().get_bounding_client_rect();
                    let x = event.client_x() as f64 - rect.left();
                    let y = event.client_y() as f64 - rect.top();
                    shared.field.on_pointer_move(x, y);
                }
            }
        })?;

        self.listeners.push(on_resize);
        self.listeners.push(on_pointer);
        Ok(())
    }
}

impl Drop for InteractiveBackground {
    fn drop(&mut self) {
        self.teardown();
    }
}
