//! Browser binding.
//!
//! [`WebHost`] answers layout and style queries from the live DOM and hands
//! out [`CanvasSurface`]s over `<canvas>` elements. [`FlowchartConnectors`]
//! is the JavaScript-facing object: it owns a renderer, listens for window
//! resizes and exposes the redraw triggers a slide deck needs.

use std::{
    cell::RefCell,
    rc::{Rc, Weak},
    time::Duration,
};

use log::{debug, warn};
use wasm_bindgen::{JsCast, closure::Closure, prelude::*};
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement, Window};

use fletch_core::{
    color::VariableLookup,
    draw::StrokeDefinition,
    geometry::{Bounds, Point, Size},
};

use crate::{
    ConnectorRenderer, TimerSlot,
    config::{AppConfig, RenderConfig},
    host::{Host, Surface},
    topology::{DEFAULT_VARIANT, TopologySet},
};

/// The live document as a [`Host`].
#[derive(Debug, Clone)]
pub struct WebHost {
    window: Window,
    document: Document,
}

impl WebHost {
    /// Returns a host for the current window, if there is one with a document.
    pub fn current() -> Option<Self> {
        let window = web_sys::window()?;
        let document = window.document()?;
        Some(Self { window, document })
    }

    fn now(&self) -> Duration {
        let millis = self
            .window
            .performance()
            .map(|performance| performance.now())
            .unwrap_or_default();
        Duration::from_secs_f64(millis.max(0.0) / 1_000.0)
    }
}

impl VariableLookup for WebHost {
    fn lookup(&self, name: &str) -> Option<String> {
        let root = self.document.document_element()?;
        let style = self.window.get_computed_style(&root).ok().flatten()?;
        let value = style.get_property_value(name).ok()?;
        let value = value.trim();
        (!value.is_empty()).then(|| value.to_string())
    }
}

impl Host for WebHost {
    type Surface = CanvasSurface;

    fn surface(&self, id: &str) -> Option<CanvasSurface> {
        let canvas = self
            .document
            .get_element_by_id(id)?
            .dyn_into::<HtmlCanvasElement>()
            .ok()?;
        CanvasSurface::new(canvas)
    }

    fn bounds(&self, id: &str) -> Option<Bounds> {
        let rect = self.document.get_element_by_id(id)?.get_bounding_client_rect();
        Some(Bounds::from_layout_box(
            rect.x() as f32,
            rect.y() as f32,
            rect.width() as f32,
            rect.height() as f32,
        ))
    }

    fn device_pixel_ratio(&self) -> Option<f64> {
        Some(self.window.device_pixel_ratio())
    }
}

/// A `<canvas>` element and its 2D context.
#[derive(Debug, Clone)]
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    context: CanvasRenderingContext2d,
}

impl CanvasSurface {
    /// Wraps a canvas, returning `None` when it has no 2D context.
    pub fn new(canvas: HtmlCanvasElement) -> Option<Self> {
        let context = canvas
            .get_context("2d")
            .ok()
            .flatten()?
            .dyn_into::<CanvasRenderingContext2d>()
            .ok()?;
        Some(Self { canvas, context })
    }

    fn trace_polygon(&self, points: &[Point]) {
        let mut points = points.iter();
        let Some(first) = points.next() else {
            return;
        };
        self.context.begin_path();
        self.context.move_to(first.x().into(), first.y().into());
        for point in points {
            self.context.line_to(point.x().into(), point.y().into());
        }
        self.context.close_path();
    }
}

impl Surface for CanvasSurface {
    fn set_buffer_size(&mut self, width: u32, height: u32) {
        self.canvas.set_width(width);
        self.canvas.set_height(height);
    }

    fn set_display_size(&mut self, size: Size) {
        let style = self.canvas.style();
        let width = style.set_property("width", &format!("{}px", size.width()));
        let height = style.set_property("height", &format!("{}px", size.height()));
        if width.is_err() || height.is_err() {
            warn!("Failed to set canvas display size");
        }
    }

    fn set_scale(&mut self, ratio: f64) {
        if self
            .context
            .set_transform(ratio, 0.0, 0.0, ratio, 0.0, 0.0)
            .is_err()
        {
            warn!(ratio = ratio; "Failed to set canvas transform");
        }
    }

    fn clear(&mut self) {
        self.context.save();
        if self
            .context
            .set_transform(1.0, 0.0, 0.0, 1.0, 0.0, 0.0)
            .is_err()
        {
            warn!("Failed to reset canvas transform before clearing");
        }
        self.context.clear_rect(
            0.0,
            0.0,
            f64::from(self.canvas.width()),
            f64::from(self.canvas.height()),
        );
        self.context.restore();
    }

    fn stroke_line(&mut self, from: Point, to: Point, stroke: &StrokeDefinition) {
        self.context.set_stroke_style_str(stroke.color());
        self.context.set_line_width(stroke.width().into());
        self.context.set_line_cap(stroke.cap().to_svg_value());
        self.context.set_line_join(stroke.join().to_svg_value());

        self.context.begin_path();
        self.context.move_to(from.x().into(), from.y().into());
        self.context.line_to(to.x().into(), to.y().into());
        self.context.stroke();
    }

    fn fill_polygon(&mut self, points: &[Point], color: &str) {
        self.context.set_fill_style_str(color);
        self.trace_polygon(points);
        self.context.fill();
    }
}

struct Shared {
    window: Window,
    renderer: RefCell<ConnectorRenderer<WebHost>>,
    timer: RefCell<TimerSlot<i32>>,
    on_resize: RefCell<Option<Closure<dyn FnMut()>>>,
    on_timeout: RefCell<Option<Closure<dyn FnMut()>>>,
}

impl Shared {
    fn handle_resize(&self) {
        let deadline = {
            let mut renderer = self.renderer.borrow_mut();
            let now = renderer.host().now();
            renderer.handle_resize_event(now);
            renderer.next_deadline().map(|deadline| (now, deadline))
        };
        let Some((now, deadline)) = deadline else {
            return;
        };

        let delay = TimerSlot::<i32>::timeout_millis(now, deadline);
        let armed = {
            let on_timeout = self.on_timeout.borrow();
            let Some(callback) = on_timeout.as_ref() else {
                return;
            };
            self.window
                .set_timeout_with_callback_and_timeout_and_arguments_0(
                    callback.as_ref().unchecked_ref(),
                    delay,
                )
        };

        let superseded = match armed {
            Ok(handle) => self.timer.borrow_mut().arm(handle),
            Err(_) => {
                warn!(delay = delay; "Failed to schedule resize redraw");
                self.timer.borrow_mut().take()
            }
        };
        if let Some(handle) = superseded {
            self.window.clear_timeout_with_handle(handle);
        }
    }

    fn handle_timeout(&self) {
        self.timer.borrow_mut().take();
        let mut renderer = self.renderer.borrow_mut();
        let Some(deadline) = renderer.next_deadline() else {
            return;
        };
        // Timers may fire slightly early relative to `performance.now()`.
        let now = renderer.host().now().max(deadline);
        if let Some(summary) = renderer.tick(now) {
            debug!(
                drawn = summary.drawn,
                skipped = summary.skipped;
                "Debounced resize redraw"
            );
        }
    }

    fn clear_timeout(&self) {
        let pending = self.timer.borrow_mut().take();
        if let Some(handle) = pending {
            self.window.clear_timeout_with_handle(handle);
        }
    }

    fn teardown(&self) {
        self.clear_timeout();
        let listener = self.on_resize.borrow_mut().take();
        if let Some(listener) = listener {
            let removed = self
                .window
                .remove_event_listener_with_callback("resize", listener.as_ref().unchecked_ref());
            if removed.is_err() {
                warn!("Failed to remove resize listener");
            }
        }
        self.on_timeout.borrow_mut().take();
    }
}

/// Connector arrows over a flowchart container, driven from JavaScript.
///
/// ```js
/// const connectors = new FlowchartConnectors("flowchart-canvas", "flowchart-container", "default");
/// deck.on("slidechanged", () => connectors.slideChanged());
/// themeToggle.addEventListener("click", () => connectors.themeChanged());
/// ```
#[wasm_bindgen]
pub struct FlowchartConnectors {
    shared: Rc<Shared>,
}

#[wasm_bindgen]
impl FlowchartConnectors {
    /// Binds to the given canvas and container and draws the reference
    /// topology `variant` (`"default"` when omitted).
    #[wasm_bindgen(constructor)]
    pub fn new(
        canvas_id: &str,
        container_id: &str,
        variant: Option<String>,
    ) -> Result<FlowchartConnectors, JsValue> {
        let variant = variant.unwrap_or_else(|| DEFAULT_VARIANT.to_string());
        let config = RenderConfig::new(canvas_id, container_id, variant);
        Self::build(config, &TopologySet::reference())
    }

    /// Builds from a TOML configuration document.
    #[wasm_bindgen(js_name = fromConfig)]
    pub fn from_config(src: &str) -> Result<FlowchartConnectors, JsValue> {
        let config = AppConfig::from_toml(src, "fromConfig")
            .map_err(|err| JsValue::from_str(&err.to_string()))?;
        Self::build(config.render().clone(), &config.topologies_or_reference())
    }

    fn build(config: RenderConfig, topologies: &TopologySet) -> Result<Self, JsValue> {
        let host = WebHost::current().ok_or_else(|| JsValue::from_str("no window document"))?;
        let window = host.window.clone();
        let renderer = ConnectorRenderer::new(host, config, topologies);
        let bound = renderer.is_bound();

        let shared = Rc::new(Shared {
            window,
            renderer: RefCell::new(renderer),
            timer: RefCell::new(TimerSlot::new()),
            on_resize: RefCell::new(None),
            on_timeout: RefCell::new(None),
        });

        if bound {
            Self::listen(&shared)?;
        }

        Ok(Self { shared })
    }

    fn listen(shared: &Rc<Shared>) -> Result<(), JsValue> {
        let weak: Weak<Shared> = Rc::downgrade(shared);
        let on_timeout = Closure::<dyn FnMut()>::new(move || {
            if let Some(shared) = weak.upgrade() {
                shared.handle_timeout();
            }
        });

        let weak: Weak<Shared> = Rc::downgrade(shared);
        let on_resize = Closure::<dyn FnMut()>::new(move || {
            if let Some(shared) = weak.upgrade() {
                shared.handle_resize();
            }
        });

        shared
            .window
            .add_event_listener_with_callback("resize", on_resize.as_ref().unchecked_ref())?;

        *shared.on_timeout.borrow_mut() = Some(on_timeout);
        *shared.on_resize.borrow_mut() = Some(on_resize);
        Ok(())
    }

    /// Returns whether the canvas and container were found.
    #[wasm_bindgen(js_name = isBound)]
    pub fn is_bound(&self) -> bool {
        self.shared.renderer.borrow().is_bound()
    }

    /// Clears and redraws every connection. Returns the number drawn.
    pub fn redraw(&self) -> usize {
        self.shared.renderer.borrow_mut().redraw().drawn
    }

    /// Redraws with colors re-read from the current theme.
    #[wasm_bindgen(js_name = themeChanged)]
    pub fn theme_changed(&self) -> usize {
        self.shared.renderer.borrow_mut().theme_changed().drawn
    }

    /// Resizes and redraws; call once the slide holding the diagram is shown.
    #[wasm_bindgen(js_name = slideChanged)]
    pub fn slide_changed(&self) -> usize {
        self.shared.renderer.borrow_mut().layout_changed().drawn
    }

    /// Removes the resize listener and cancels any pending redraw.
    pub fn destroy(&self) {
        self.shared.teardown();
    }
}

impl Drop for FlowchartConnectors {
    fn drop(&mut self) {
        self.shared.teardown();
    }
}
