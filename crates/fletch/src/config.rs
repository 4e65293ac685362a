//! Configuration types for connector rendering.
//!
//! All types implement [`serde::Deserialize`] and every field has a default,
//! so an empty document is a valid configuration.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining render, style and topology settings.
//! - [`RenderConfig`] - Construction-time parameters of a [`ConnectorRenderer`](crate::ConnectorRenderer).
//! - [`StyleConfig`] - Styling options for exported documents.
//!
//! # Example
//!
//! ```
//! # use fletch::config::AppConfig;
//! let config = AppConfig::from_toml(
//!     r#"
//!     [render]
//!     variant = "decision-tree"
//!     line_width = 3.0
//!
//!     [[topologies.default]]
//!     from = "start"
//!     to = "end"
//!     color = "var(--flow-link)"
//!     "#,
//!     "inline",
//! )
//! .unwrap();
//!
//! assert_eq!(config.render().variant(), "decision-tree");
//! assert_eq!(config.render().line_width(), 3.0);
//! assert_eq!(config.topologies().unwrap().names().count(), 1);
//! ```

use std::time::Duration;

use serde::{Deserialize, de::DeserializeOwned};

use fletch_core::{color::Color, draw::ArrowDefinition};

use crate::{FletchError, topology::TopologySet};

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Renderer parameters.
    #[serde(default)]
    render: RenderConfig,

    /// Style configuration section.
    #[serde(default)]
    style: StyleConfig,

    /// Topology variants; the built-in reference deck is used when absent.
    #[serde(default)]
    topologies: Option<TopologySet>,
}

impl AppConfig {
    /// Creates a new [`AppConfig`].
    pub fn new(render: RenderConfig, style: StyleConfig, topologies: Option<TopologySet>) -> Self {
        Self {
            render,
            style,
            topologies,
        }
    }

    /// Parses and validates a configuration from TOML source.
    ///
    /// `origin` names the source (usually a file path) in error messages.
    ///
    /// # Errors
    ///
    /// Returns [`FletchError::Toml`] for syntax or schema errors and
    /// [`FletchError::Config`] when a value is out of range or a literal
    /// color does not parse.
    pub fn from_toml(src: &str, origin: &str) -> Result<Self, FletchError> {
        let config: Self = from_toml_str(src, origin)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks values serde cannot check on its own.
    pub fn validate(&self) -> Result<(), FletchError> {
        self.render.validate()?;
        self.style.background_color().map_err(FletchError::Config)?;
        if let Some(topologies) = &self.topologies {
            topologies.validate().map_err(FletchError::Config)?;
        }
        Ok(())
    }

    /// Returns the render configuration.
    pub fn render(&self) -> &RenderConfig {
        &self.render
    }

    /// Returns a mutable reference to the render configuration.
    pub fn render_mut(&mut self) -> &mut RenderConfig {
        &mut self.render
    }

    /// Returns the style configuration.
    pub fn style(&self) -> &StyleConfig {
        &self.style
    }

    /// Returns the configured topologies, if any.
    pub fn topologies(&self) -> Option<&TopologySet> {
        self.topologies.as_ref()
    }

    /// Returns the configured topologies, or the reference deck when none are configured.
    pub fn topologies_or_reference(&self) -> TopologySet {
        self.topologies
            .clone()
            .unwrap_or_else(TopologySet::reference)
    }
}

/// Construction-time parameters of a connector renderer.
///
/// Immutable for the renderer's lifetime.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Id of the drawing surface element.
    surface_id: String,
    /// Id of the element the surface overlays; anchors are relative to it.
    container_id: String,
    /// Name of the topology variant to draw.
    variant: String,
    /// Arrow shaft width in CSS pixels.
    line_width: f32,
    /// Arrow head side length in CSS pixels.
    arrow_size: f32,
    /// Quiet period after the last resize event before redrawing.
    debounce_ms: u64,
}

impl RenderConfig {
    /// Creates a configuration for the given element ids and variant, with
    /// default line width, arrow size and debounce period.
    pub fn new(
        surface_id: impl Into<String>,
        container_id: impl Into<String>,
        variant: impl Into<String>,
    ) -> Self {
        Self {
            surface_id: surface_id.into(),
            container_id: container_id.into(),
            variant: variant.into(),
            ..Self::default()
        }
    }

    /// Sets the arrow shaft width.
    pub fn with_line_width(mut self, line_width: f32) -> Self {
        self.line_width = line_width;
        self
    }

    /// Sets the arrow head size.
    pub fn with_arrow_size(mut self, arrow_size: f32) -> Self {
        self.arrow_size = arrow_size;
        self
    }

    /// Sets the resize debounce period.
    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce_ms = u64::try_from(debounce.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Replaces the topology variant.
    pub fn set_variant(&mut self, variant: impl Into<String>) {
        self.variant = variant.into();
    }

    pub fn surface_id(&self) -> &str {
        &self.surface_id
    }

    pub fn container_id(&self) -> &str {
        &self.container_id
    }

    pub fn variant(&self) -> &str {
        &self.variant
    }

    pub fn line_width(&self) -> f32 {
        self.line_width
    }

    pub fn arrow_size(&self) -> f32 {
        self.arrow_size
    }

    /// Returns the resize debounce period.
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Returns the arrow definition built from line width and arrow size.
    pub fn arrow_definition(&self) -> ArrowDefinition {
        ArrowDefinition::new(self.line_width, self.arrow_size)
    }

    fn validate(&self) -> Result<(), FletchError> {
        let positive = |value: f32| value.is_finite() && value > 0.0;
        if !positive(self.line_width) {
            return Err(FletchError::Config(format!(
                "line_width must be a positive number, got {}",
                self.line_width
            )));
        }
        if !positive(self.arrow_size) {
            return Err(FletchError::Config(format!(
                "arrow_size must be a positive number, got {}",
                self.arrow_size
            )));
        }
        Ok(())
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        let arrow = ArrowDefinition::default();
        Self {
            surface_id: "flowchart-canvas".to_string(),
            container_id: "flowchart-container".to_string(),
            variant: crate::topology::DEFAULT_VARIANT.to_string(),
            line_width: arrow.line_width(),
            arrow_size: arrow.head_size(),
            debounce_ms: 100,
        }
    }
}

/// Visual styling configuration for exported documents.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct StyleConfig {
    /// Background [`Color`] of exported documents, as a color string.
    #[serde(default)]
    background_color: Option<String>,
}

impl StyleConfig {
    /// Creates a style configuration with an optional background color string.
    pub fn new(background_color: Option<String>) -> Self {
        Self { background_color }
    }

    /// Returns the parsed background [`Color`], or `None` if no color is configured.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured color string cannot be parsed
    /// into a valid [`Color`].
    pub fn background_color(&self) -> Result<Option<Color>, String> {
        self.background_color
            .as_ref()
            .map(|color| Color::new(color))
            .transpose()
            .map_err(|err| format!("Invalid background color in config: {err}"))
    }
}

/// Deserializes a TOML document, mapping failures to [`FletchError::Toml`].
pub(crate) fn from_toml_str<T: DeserializeOwned>(
    src: &str,
    origin: &str,
) -> Result<T, FletchError> {
    toml::from_str(src).map_err(|err| FletchError::new_toml_error(&err, src, origin))
}
