//! Fletch - Connector arrows for flowchart overlays.
//!
//! Draws directed, colored arrows between elements of a laid-out document
//! onto a surface that overlays them. Positions come from the host's layout
//! and colors from its theme variables, re-read on every draw, so arrows
//! follow reflows and theme switches.
//!
//! The browser binding (`web` module) is compiled for `wasm32` only. On other
//! targets a [`LayoutSnapshot`](snapshot::LayoutSnapshot) stands in for the
//! document and drawings are exported as SVG.

pub mod config;
pub mod debounce;
pub mod export;
pub mod host;
pub mod renderer;
pub mod snapshot;
pub mod topology;
#[cfg(target_arch = "wasm32")]
pub mod web;

mod error;

pub use fletch_core::{color, draw, geometry};

pub use debounce::{Debouncer, TimerSlot};
pub use error::FletchError;
pub use renderer::{ConnectorRenderer, RedrawSummary};

use log::{debug, info};

use config::AppConfig;
use snapshot::LayoutSnapshot;

/// Renders flowchart connectors over layout snapshots.
///
/// This ties an [`AppConfig`] to the snapshot host and the SVG export
/// surface: the configured variant is drawn over the snapshot and the result
/// serialized with the configured background.
///
/// # Examples
///
/// ```
/// use fletch::{FlowchartBuilder, config::AppConfig, snapshot::LayoutSnapshot};
///
/// let snapshot = LayoutSnapshot::from_toml(
///     r##"
///     surfaces = ["flowchart-canvas"]
///
///     [elements]
///     flowchart-container = { left = 0, top = 0, width = 200, height = 200 }
///     fc-start = { left = 80, top = 10, width = 40, height = 20 }
///     fc-question = { left = 80, top = 90, width = 40, height = 20 }
///
///     [variables]
///     "--flow-link" = "#64748b"
///     "##,
///     "inline",
/// )
/// .unwrap();
///
/// let svg = FlowchartBuilder::new(AppConfig::default())
///     .render_svg(snapshot)
///     .unwrap();
/// assert!(svg.contains("<line"));
/// ```
#[derive(Debug, Default)]
pub struct FlowchartBuilder {
    config: AppConfig,
}

impl FlowchartBuilder {
    /// Create a new builder with the given configuration.
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Draws the configured topology variant over `snapshot` and returns the
    /// SVG document.
    ///
    /// # Errors
    ///
    /// Returns [`FletchError::Unbound`] when the snapshot has no surface or
    /// container with the configured ids, and [`FletchError::Config`] when the
    /// background color is invalid.
    pub fn render_svg(&self, snapshot: LayoutSnapshot) -> Result<String, FletchError> {
        let render = self.config.render();
        let background = self
            .config
            .style()
            .background_color()
            .map_err(FletchError::Config)?;

        info!(variant = render.variant(); "Rendering connectors");
        let topologies = self.config.topologies_or_reference();
        let renderer = ConnectorRenderer::new(snapshot, render.clone(), &topologies);

        let Some(surface) = renderer.surface() else {
            return Err(FletchError::Unbound {
                surface: render.surface_id().to_string(),
                container: render.container_id().to_string(),
            });
        };

        debug!(
            connections = renderer.topology().len(),
            primitives = surface.primitives().len();
            "Connectors drawn"
        );
        Ok(surface.render(background))
    }
}
