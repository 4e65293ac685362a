//! The connector renderer.
//!
//! [`ConnectorRenderer`] owns a drawing surface overlaying a container
//! element and paints the active topology onto it. Every draw is a full
//! recomputation from the host's current layout and style: anchors and
//! colors are resolved, used once and dropped.

use std::time::Duration;

use log::{debug, info, trace};

use fletch_core::{
    draw::{ArrowDefinition, StrokeDefinition},
    geometry::{Anchor, Point},
};

use crate::{
    config::RenderConfig,
    debounce::Debouncer,
    host::{Host, Surface},
    topology::{ConnectionSpec, Topology, TopologySet},
};

/// Outcome of a full redraw.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RedrawSummary {
    /// Connections painted.
    pub drawn: usize,
    /// Connections skipped because an endpoint did not resolve.
    pub skipped: usize,
}

/// Draws straight arrows between host elements onto a bound surface.
///
/// A renderer whose surface or container cannot be found at construction is
/// *inert*: it stays usable, but every operation is a no-op.
///
/// # Examples
///
/// ```
/// use fletch::{
///     ConnectorRenderer,
///     config::RenderConfig,
///     geometry::{Anchor, Bounds, Point},
///     snapshot::LayoutSnapshot,
///     topology::TopologySet,
/// };
///
/// let host = LayoutSnapshot::new()
///     .with_surface("canvas")
///     .with_element("container", Bounds::from_layout_box(80.0, 30.0, 400.0, 300.0))
///     .with_element("fc-start", Bounds::from_layout_box(100.0, 50.0, 40.0, 20.0));
///
/// let config = RenderConfig::new("canvas", "container", "default");
/// let renderer = ConnectorRenderer::new(host, config, &TopologySet::reference());
///
/// assert!(renderer.is_bound());
/// assert_eq!(
///     renderer.anchor("fc-start", Anchor::BottomCenter),
///     Some(Point::new(40.0, 40.0))
/// );
/// ```
#[derive(Debug)]
pub struct ConnectorRenderer<H: Host> {
    host: H,
    config: RenderConfig,
    arrow: ArrowDefinition,
    topology: Topology,
    surface: Option<H::Surface>,
    debouncer: Debouncer,
}

impl<H: Host> ConnectorRenderer<H> {
    /// Binds to the configured surface and container, then sizes the surface
    /// and draws the selected topology variant.
    ///
    /// The variant is looked up in `topologies` with fallback to the default
    /// variant; when neither exists nothing is drawn.
    pub fn new(host: H, config: RenderConfig, topologies: &TopologySet) -> Self {
        let topology = match topologies.select(config.variant()) {
            Some((name, topology)) => {
                debug!(
                    requested = config.variant(),
                    selected = name;
                    "Selected topology variant"
                );
                topology.clone()
            }
            None => {
                info!(requested = config.variant(); "No topology variant to draw");
                Topology::default()
            }
        };

        let surface = Self::bind(&host, &config);
        let mut renderer = Self {
            arrow: config.arrow_definition(),
            debouncer: Debouncer::new(config.debounce()),
            host,
            config,
            topology,
            surface,
        };

        if renderer.is_bound() {
            renderer.resize();
            renderer.redraw();
        }

        renderer
    }

    fn bind(host: &H, config: &RenderConfig) -> Option<H::Surface> {
        let surface_id = config.surface_id();
        let container_id = config.container_id();

        let Some(surface) = host.surface(surface_id) else {
            debug!(surface_id = surface_id; "Drawing surface not found, renderer stays inert");
            return None;
        };
        if host.bounds(container_id).is_none() {
            debug!(container_id = container_id; "Container not found, renderer stays inert");
            return None;
        }

        debug!(surface_id = surface_id, container_id = container_id; "Renderer bound");
        Some(surface)
    }

    /// Returns true when the surface and container were found at construction.
    pub fn is_bound(&self) -> bool {
        self.surface.is_some()
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    /// Returns the host mutably, e.g. to change a snapshot's layout or theme
    /// before triggering a redraw.
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Returns the bound surface, if any.
    pub fn surface(&self) -> Option<&H::Surface> {
        self.surface.as_ref()
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Returns the active topology.
    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    /// Matches the surface to the container's current size and the device
    /// pixel ratio.
    ///
    /// The backing buffer becomes `ceil(width * ratio) × ceil(height * ratio)`
    /// device pixels, the displayed size stays `width × height` CSS pixels,
    /// and drawing is scaled by `ratio` so coordinates remain CSS pixels. A
    /// missing, non-finite or non-positive ratio counts as 1.
    pub fn resize(&mut self) {
        let Some(surface) = self.surface.as_mut() else {
            return;
        };
        let Some(container) = self.host.bounds(self.config.container_id()) else {
            debug!(
                container_id = self.config.container_id();
                "Container vanished, skipping resize"
            );
            return;
        };

        let ratio = self
            .host
            .device_pixel_ratio()
            .filter(|ratio| ratio.is_finite() && *ratio > 0.0)
            .unwrap_or(1.0);
        let css = container.to_size();
        let (width, height) = css.to_device_pixels(ratio);

        surface.set_buffer_size(width, height);
        surface.set_display_size(css);
        surface.set_scale(ratio);

        trace!(width = width, height = height, ratio = ratio; "Surface resized");
    }

    /// Returns the anchor of element `id` relative to the container's
    /// top-left corner, or `None` when the element or the container is absent.
    pub fn anchor(&self, id: &str, anchor: Anchor) -> Option<Point> {
        if !self.is_bound() {
            return None;
        }
        resolve_anchor(&self.host, self.config.container_id(), id, anchor)
    }

    /// Draws one arrow from `from` to `to` in an already resolved color.
    pub fn draw_arrow(&mut self, from: Point, to: Point, color: &str) {
        if let Some(surface) = self.surface.as_mut() {
            paint_arrow(surface, &self.arrow, from, to, color);
        }
    }

    /// Draws one connection, from the bottom-center of its source to the
    /// top-center of its target.
    ///
    /// Returns false, drawing nothing, when either endpoint does not resolve.
    pub fn draw_connection(&mut self, connection: &ConnectionSpec) -> bool {
        let Some(surface) = self.surface.as_mut() else {
            return false;
        };
        paint_connection(
            &self.host,
            surface,
            &self.arrow,
            self.config.container_id(),
            connection,
        )
    }

    /// Clears the surface and draws every connection of the active topology
    /// in order.
    pub fn redraw(&mut self) -> RedrawSummary {
        let Some(surface) = self.surface.as_mut() else {
            return RedrawSummary::default();
        };

        surface.clear();

        let mut summary = RedrawSummary::default();
        for connection in self.topology.iter() {
            let drawn = paint_connection(
                &self.host,
                surface,
                &self.arrow,
                self.config.container_id(),
                connection,
            );
            if drawn {
                summary.drawn += 1;
            } else {
                summary.skipped += 1;
            }
        }

        trace!(drawn = summary.drawn, skipped = summary.skipped; "Redraw complete");
        summary
    }

    /// Redraws after the host's style variables changed.
    pub fn theme_changed(&mut self) -> RedrawSummary {
        self.redraw()
    }

    /// Resizes and redraws after the host's layout changed, for example
    /// when the slide holding the diagram becomes visible.
    pub fn layout_changed(&mut self) -> RedrawSummary {
        self.resize();
        self.redraw()
    }

    /// Replaces the active topology and redraws.
    pub fn set_topology(&mut self, topology: Topology) -> RedrawSummary {
        debug!(connections = topology.len(); "Topology replaced");
        self.topology = topology;
        self.redraw()
    }

    /// Records a resize event at `now`. The resize and redraw happen in
    /// [`tick`](Self::tick) once the debounce period has passed without
    /// further events.
    pub fn handle_resize_event(&mut self, now: Duration) {
        if self.is_bound() {
            self.debouncer.schedule(now);
        }
    }

    /// Returns when the pending debounced resize becomes due.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.debouncer.deadline()
    }

    /// Performs the pending resize and redraw if it is due at `now`.
    pub fn tick(&mut self, now: Duration) -> Option<RedrawSummary> {
        if !self.debouncer.fire_due(now) {
            return None;
        }
        Some(self.layout_changed())
    }
}

fn resolve_anchor<H: Host>(
    host: &H,
    container_id: &str,
    id: &str,
    anchor: Anchor,
) -> Option<Point> {
    let element = host.bounds(id)?;
    let container = host.bounds(container_id)?;
    Some(element.anchor_within(container, anchor))
}

fn paint_arrow<S: Surface>(
    surface: &mut S,
    arrow: &ArrowDefinition,
    from: Point,
    to: Point,
    color: &str,
) {
    let geometry = arrow.geometry(from, to);
    let stroke = StrokeDefinition::connector(color, arrow.line_width());

    surface.stroke_line(geometry.source(), geometry.destination(), &stroke);
    surface.fill_polygon(&geometry.head(), color);
}

fn paint_connection<H: Host>(
    host: &H,
    surface: &mut H::Surface,
    arrow: &ArrowDefinition,
    container_id: &str,
    connection: &ConnectionSpec,
) -> bool {
    let source = resolve_anchor(host, container_id, connection.from(), Anchor::BottomCenter);
    let target = resolve_anchor(host, container_id, connection.to(), Anchor::TopCenter);

    let (Some(source), Some(target)) = (source, target) else {
        debug!(
            from = connection.from(),
            to = connection.to();
            "Endpoint missing, connection skipped"
        );
        return false;
    };

    let color = connection.color().resolve(host);
    paint_arrow(surface, arrow, source, target, &color);
    true
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, collections::HashMap, rc::Rc};

    use fletch_core::{
        color::{ColorToken, VariableLookup},
        geometry::{Bounds, Size},
    };

    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    enum Op {
        BufferSize(u32, u32),
        DisplaySize(Size),
        Scale(f64),
        Clear,
        Line(Point, Point, StrokeDefinition),
        Fill(Vec<Point>, String),
    }

    /// Surface that logs every call into a log shared with the test.
    #[derive(Debug, Clone, Default)]
    struct RecordingSurface {
        ops: Rc<RefCell<Vec<Op>>>,
    }

    impl Surface for RecordingSurface {
        fn set_buffer_size(&mut self, width: u32, height: u32) {
            self.ops.borrow_mut().push(Op::BufferSize(width, height));
        }

        fn set_display_size(&mut self, size: Size) {
            self.ops.borrow_mut().push(Op::DisplaySize(size));
        }

        fn set_scale(&mut self, ratio: f64) {
            self.ops.borrow_mut().push(Op::Scale(ratio));
        }

        fn clear(&mut self) {
            self.ops.borrow_mut().push(Op::Clear);
        }

        fn stroke_line(&mut self, from: Point, to: Point, stroke: &StrokeDefinition) {
            self.ops
                .borrow_mut()
                .push(Op::Line(from, to, stroke.clone()));
        }

        fn fill_polygon(&mut self, points: &[Point], color: &str) {
            self.ops
                .borrow_mut()
                .push(Op::Fill(points.to_vec(), color.to_string()));
        }
    }

    #[derive(Debug, Default)]
    struct FakeHost {
        ops: Rc<RefCell<Vec<Op>>>,
        surfaces: Vec<String>,
        elements: HashMap<String, Bounds>,
        variables: HashMap<String, String>,
        ratio: Option<f64>,
    }

    impl FakeHost {
        fn quiz() -> Self {
            let mut host = Self {
                surfaces: vec!["canvas".to_string()],
                ratio: Some(2.0),
                ..Self::default()
            };
            host.place("container", 80.0, 30.0, 400.0, 300.0);
            host.place("a", 100.0, 50.0, 40.0, 20.0);
            host.place("b", 100.0, 150.0, 40.0, 20.0);
            host.place("c", 200.0, 150.0, 40.0, 20.0);
            host.variables
                .insert("--flow-yes".to_string(), "green".to_string());
            host
        }

        fn place(&mut self, id: &str, left: f32, top: f32, width: f32, height: f32) {
            self.elements.insert(
                id.to_string(),
                Bounds::from_layout_box(left, top, width, height),
            );
        }

        fn ops(&self) -> Vec<Op> {
            self.ops.borrow().clone()
        }

        fn reset_ops(&self) {
            self.ops.borrow_mut().clear();
        }
    }

    impl VariableLookup for FakeHost {
        fn lookup(&self, name: &str) -> Option<String> {
            self.variables.get(name).cloned()
        }
    }

    impl Host for FakeHost {
        type Surface = RecordingSurface;

        fn surface(&self, id: &str) -> Option<RecordingSurface> {
            self.surfaces
                .iter()
                .any(|surface| surface == id)
                .then(|| RecordingSurface {
                    ops: Rc::clone(&self.ops),
                })
        }

        fn bounds(&self, id: &str) -> Option<Bounds> {
            self.elements.get(id).copied()
        }

        fn device_pixel_ratio(&self) -> Option<f64> {
            self.ratio
        }
    }

    fn topologies() -> TopologySet {
        TopologySet::new().with_variant(
            "default",
            Topology::new(vec![
                ConnectionSpec::new("a", "b", ColorToken::variable("--flow-yes")),
                ConnectionSpec::new("a", "c", ColorToken::literal("#f59e0b")),
            ]),
        )
    }

    fn config() -> RenderConfig {
        RenderConfig::new("canvas", "container", "default")
    }

    fn lines(ops: &[Op]) -> Vec<(Point, Point, String)> {
        ops.iter()
            .filter_map(|op| match op {
                Op::Line(from, to, stroke) => Some((*from, *to, stroke.color().to_string())),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_construction_resizes_then_draws() {
        let host = FakeHost::quiz();
        let renderer = ConnectorRenderer::new(host, config(), &topologies());
        let ops = renderer.host().ops();

        assert_eq!(
            &ops[..4],
            &[
                Op::BufferSize(800, 600),
                Op::DisplaySize(Size::new(400.0, 300.0)),
                Op::Scale(2.0),
                Op::Clear,
            ]
        );
        assert_eq!(lines(&ops).len(), 2);
    }

    #[test]
    fn test_missing_surface_is_inert() {
        let mut host = FakeHost::quiz();
        host.surfaces.clear();
        let mut renderer = ConnectorRenderer::new(host, config(), &topologies());

        assert!(!renderer.is_bound());
        assert_eq!(renderer.redraw(), RedrawSummary::default());
        renderer.resize();
        renderer.draw_arrow(Point::new(0.0, 0.0), Point::new(1.0, 1.0), "red");
        assert!(renderer.anchor("a", Anchor::Center).is_none());
        renderer.handle_resize_event(Duration::ZERO);
        assert!(renderer.tick(Duration::from_secs(1)).is_none());
        assert!(renderer.host().ops().is_empty());
    }

    #[test]
    fn test_missing_container_is_inert() {
        let mut host = FakeHost::quiz();
        host.elements.remove("container");
        let renderer = ConnectorRenderer::new(host, config(), &topologies());

        assert!(!renderer.is_bound());
        assert!(renderer.surface().is_none());
        assert!(renderer.host().ops().is_empty());
    }

    #[test]
    fn test_connection_anchors() {
        let renderer = ConnectorRenderer::new(FakeHost::quiz(), config(), &topologies());
        let ops = renderer.host().ops();
        let lines = lines(&ops);

        // a: bottom-center (40, 40); b: top-center (40, 120); c: top-center (140, 120).
        assert_eq!(lines[0].0, Point::new(40.0, 40.0));
        assert_eq!(lines[0].1, Point::new(40.0, 120.0));
        assert_eq!(lines[0].2, "green");
        assert_eq!(lines[1].1, Point::new(140.0, 120.0));
        assert_eq!(lines[1].2, "#f59e0b");
    }

    #[test]
    fn test_arrow_head_follows_line() {
        let renderer = ConnectorRenderer::new(FakeHost::quiz(), config(), &topologies());
        let ops = renderer.host().ops();

        let fills: Vec<_> = ops
            .iter()
            .filter_map(|op| match op {
                Op::Fill(points, color) => Some((points.clone(), color.clone())),
                _ => None,
            })
            .collect();

        assert_eq!(fills.len(), 2);
        assert_eq!(fills[0].0[0], Point::new(40.0, 120.0));
        assert_eq!(fills[0].1, "green");
        assert_eq!(fills[0].0.len(), 3);
    }

    #[test]
    fn test_strokes_use_configured_width_and_round_joins() {
        let config = config().with_line_width(3.5);
        let renderer = ConnectorRenderer::new(FakeHost::quiz(), config, &topologies());

        for op in renderer.host().ops() {
            if let Op::Line(_, _, stroke) = op {
                assert_eq!(stroke.width(), 3.5);
                assert_eq!(stroke.cap(), fletch_core::draw::StrokeCap::Round);
                assert_eq!(stroke.join(), fletch_core::draw::StrokeJoin::Round);
            }
        }
    }

    #[test]
    fn test_redraw_is_idempotent() {
        let mut renderer = ConnectorRenderer::new(FakeHost::quiz(), config(), &topologies());

        renderer.host().reset_ops();
        let first_summary = renderer.redraw();
        let first = renderer.host().ops();

        renderer.host().reset_ops();
        let second_summary = renderer.redraw();
        let second = renderer.host().ops();

        assert_eq!(first_summary, second_summary);
        assert_eq!(first, second);
        assert_eq!(first[0], Op::Clear);
    }

    #[test]
    fn test_missing_endpoint_skips_only_that_connection() {
        let mut host = FakeHost::quiz();
        host.elements.remove("b");
        let mut renderer = ConnectorRenderer::new(host, config(), &topologies());

        let summary = renderer.redraw();
        assert_eq!(summary, RedrawSummary { drawn: 1, skipped: 1 });

        renderer.host().reset_ops();
        renderer.redraw();
        let ops = renderer.host().ops();
        let lines = lines(&ops);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].2, "#f59e0b");
        // No stray head for the skipped connection either.
        assert_eq!(ops.iter().filter(|op| matches!(op, Op::Fill(..))).count(), 1);
    }

    #[test]
    fn test_unregistered_variable_draws_with_empty_color() {
        let mut host = FakeHost::quiz();
        host.variables.clear();
        let renderer = ConnectorRenderer::new(host, config(), &topologies());

        let ops = renderer.host().ops();
        let lines = lines(&ops);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].2, "");
    }

    #[test]
    fn test_theme_change_re_resolves_colors() {
        let mut renderer = ConnectorRenderer::new(FakeHost::quiz(), config(), &topologies());

        renderer
            .host_mut()
            .variables
            .insert("--flow-yes".to_string(), "lime".to_string());
        renderer.host().reset_ops();
        renderer.theme_changed();

        let ops = renderer.host().ops();
        assert_eq!(lines(&ops)[0].2, "lime");
    }

    #[test]
    fn test_resize_defaults_ratio() {
        for ratio in [None, Some(0.0), Some(-2.0), Some(f64::NAN)] {
            let mut host = FakeHost::quiz();
            host.ratio = ratio;
            let renderer = ConnectorRenderer::new(host, config(), &topologies());
            let ops = renderer.host().ops();

            assert_eq!(ops[0], Op::BufferSize(400, 300), "ratio {ratio:?}");
            assert_eq!(ops[2], Op::Scale(1.0), "ratio {ratio:?}");
        }
    }

    #[test]
    fn test_resize_rounds_buffer_up() {
        let mut host = FakeHost::quiz();
        host.place("container", 0.0, 0.0, 333.3, 100.0);
        host.ratio = Some(1.5);
        let renderer = ConnectorRenderer::new(host, config(), &topologies());
        let ops = renderer.host().ops();

        assert_eq!(ops[0], Op::BufferSize(500, 150));
        assert_eq!(ops[1], Op::DisplaySize(Size::new(333.3, 100.0)));
    }

    #[test]
    fn test_resize_at_browser_zoom() {
        let mut host = FakeHost::quiz();
        host.place("container", 0.0, 0.0, 25.0, 100.0);
        host.ratio = Some(1.2);
        let renderer = ConnectorRenderer::new(host, config(), &topologies());
        let ops = renderer.host().ops();

        assert_eq!(ops[0], Op::BufferSize(30, 120));
        assert_eq!(ops[1], Op::DisplaySize(Size::new(25.0, 100.0)));
        assert_eq!(ops[2], Op::Scale(1.2));
    }

    #[test]
    fn test_debounced_resize_fires_once() {
        let ms = Duration::from_millis;
        let mut renderer = ConnectorRenderer::new(FakeHost::quiz(), config(), &topologies());
        renderer.host_mut().place("container", 80.0, 30.0, 200.0, 100.0);
        renderer.host().reset_ops();

        for t in [0, 20, 40, 60, 80] {
            renderer.handle_resize_event(ms(t));
            assert!(renderer.tick(ms(t)).is_none());
        }
        assert_eq!(renderer.next_deadline(), Some(ms(180)));
        assert!(renderer.tick(ms(179)).is_none());
        assert!(renderer.host().ops().is_empty());

        let summary = renderer.tick(ms(180)).unwrap();
        assert_eq!(summary.drawn, 2);
        assert!(renderer.tick(ms(500)).is_none());

        let ops = renderer.host().ops();
        let clears = ops.iter().filter(|op| **op == Op::Clear).count();
        assert_eq!(clears, 1);
        assert_eq!(ops[0], Op::BufferSize(400, 200));
    }

    #[test]
    fn test_set_topology_replaces_and_redraws() {
        let mut renderer = ConnectorRenderer::new(FakeHost::quiz(), config(), &topologies());
        renderer.host().reset_ops();

        let summary = renderer.set_topology(Topology::new(vec![ConnectionSpec::new(
            "b",
            "c",
            ColorToken::literal("red"),
        )]));

        assert_eq!(summary, RedrawSummary { drawn: 1, skipped: 0 });
        assert_eq!(renderer.topology().len(), 1);
        assert_eq!(lines(&renderer.host().ops()).len(), 1);
    }

    #[test]
    fn test_unknown_variant_without_default_draws_nothing() {
        let set = TopologySet::new().with_variant("other", Topology::default());
        let config = RenderConfig::new("canvas", "container", "missing");
        let mut renderer = ConnectorRenderer::new(FakeHost::quiz(), config, &set);

        assert!(renderer.is_bound());
        assert!(renderer.topology().is_empty());
        assert_eq!(renderer.redraw(), RedrawSummary::default());
    }

    #[test]
    fn test_anchor_kinds() {
        let renderer = ConnectorRenderer::new(FakeHost::quiz(), config(), &topologies());

        assert_eq!(renderer.anchor("a", Anchor::Center), Some(Point::new(40.0, 30.0)));
        assert_eq!(renderer.anchor("a", Anchor::BottomCenter), Some(Point::new(40.0, 40.0)));
        assert_eq!(renderer.anchor("a", Anchor::TopCenter), Some(Point::new(40.0, 20.0)));
        assert!(renderer.anchor("nope", Anchor::Center).is_none());
    }

    #[test]
    fn test_draw_connection_reports_skip() {
        let mut renderer = ConnectorRenderer::new(FakeHost::quiz(), config(), &topologies());
        let missing = ConnectionSpec::new("a", "ghost", ColorToken::literal("red"));
        let present = ConnectionSpec::new("b", "c", ColorToken::literal("red"));

        renderer.host().reset_ops();
        assert!(!renderer.draw_connection(&missing));
        assert!(renderer.host().ops().is_empty());
        assert!(renderer.draw_connection(&present));
        assert_eq!(renderer.host().ops().len(), 2);
    }
}
