//! Static layout snapshots.
//!
//! A [`LayoutSnapshot`] is a [`Host`] whose layout is a fixed description
//! rather than a live document: element boxes, style variables, optional
//! named themes and the device pixel ratio. It backs the CLI and lets the
//! renderer be exercised without a browser.
//!
//! # Format
//!
//! ```toml
//! device_pixel_ratio = 2.0
//! surfaces = ["flowchart-canvas"]
//!
//! [elements]
//! flowchart-container = { left = 80, top = 30, width = 640, height = 480 }
//! fc-start = { left = 360, top = 60, width = 120, height = 40 }
//!
//! [variables]
//! "--flow-link" = "#64748b"
//!
//! [themes.dark]
//! "--flow-link" = "#94a3b8"
//! ```

use indexmap::IndexMap;
use log::debug;
use serde::Deserialize;

use fletch_core::{color::VariableLookup, geometry::Bounds};

use crate::{FletchError, config::from_toml_str, export::svg::SvgSurface, host::Host};

/// A layout box as reported by a bounding-box query.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct ElementBox {
    left: f32,
    top: f32,
    width: f32,
    height: f32,
}

impl From<ElementBox> for Bounds {
    fn from(element: ElementBox) -> Self {
        Bounds::from_layout_box(element.left, element.top, element.width, element.height)
    }
}

impl From<Bounds> for ElementBox {
    fn from(bounds: Bounds) -> Self {
        Self {
            left: bounds.min_x(),
            top: bounds.min_y(),
            width: bounds.width(),
            height: bounds.height(),
        }
    }
}

/// A fixed document layout usable as a [`Host`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LayoutSnapshot {
    #[serde(default)]
    device_pixel_ratio: Option<f64>,

    /// Ids that resolve to drawing surfaces.
    #[serde(default)]
    surfaces: Vec<String>,

    #[serde(default)]
    elements: IndexMap<String, ElementBox>,

    /// Base style variables.
    #[serde(default)]
    variables: IndexMap<String, String>,

    /// Named variable sets layered over the base variables.
    #[serde(default)]
    themes: IndexMap<String, IndexMap<String, String>>,

    #[serde(skip)]
    active_theme: Option<String>,
}

impl LayoutSnapshot {
    /// Creates an empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a snapshot from TOML source.
    ///
    /// # Errors
    ///
    /// Returns [`FletchError::Toml`] when the source is not a valid snapshot.
    pub fn from_toml(src: &str, origin: &str) -> Result<Self, FletchError> {
        let snapshot: Self = from_toml_str(src, origin)?;
        debug!(
            origin = origin,
            elements = snapshot.elements.len(),
            themes = snapshot.themes.len();
            "Loaded layout snapshot"
        );
        Ok(snapshot)
    }

    pub fn with_device_pixel_ratio(mut self, ratio: f64) -> Self {
        self.device_pixel_ratio = Some(ratio);
        self
    }

    pub fn with_surface(mut self, id: impl Into<String>) -> Self {
        self.surfaces.push(id.into());
        self
    }

    pub fn with_element(mut self, id: impl Into<String>, bounds: Bounds) -> Self {
        self.set_element(id, bounds);
        self
    }

    pub fn with_variable(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_variable(name, value);
        self
    }

    /// Adds a named theme made of `(variable, value)` pairs.
    pub fn with_theme<N, V>(
        mut self,
        name: impl Into<String>,
        variables: impl IntoIterator<Item = (N, V)>,
    ) -> Self
    where
        N: Into<String>,
        V: Into<String>,
    {
        let variables = variables
            .into_iter()
            .map(|(name, value)| (name.into(), value.into()))
            .collect();
        self.themes.insert(name.into(), variables);
        self
    }

    /// Places (or moves) an element.
    pub fn set_element(&mut self, id: impl Into<String>, bounds: Bounds) {
        self.elements.insert(id.into(), bounds.into());
    }

    /// Removes an element, returning whether it existed.
    pub fn remove_element(&mut self, id: &str) -> bool {
        self.elements.shift_remove(id).is_some()
    }

    /// Sets a base style variable.
    pub fn set_variable(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.variables.insert(name.into(), value.into());
    }

    /// Sets the device pixel ratio; `None` means the host does not report one.
    pub fn set_device_pixel_ratio(&mut self, ratio: Option<f64>) {
        self.device_pixel_ratio = ratio;
    }

    /// Activates a named theme, or the base variables alone with `None`.
    ///
    /// # Errors
    ///
    /// Returns [`FletchError::Config`] when the theme does not exist.
    pub fn apply_theme(&mut self, name: Option<&str>) -> Result<(), FletchError> {
        match name {
            None => self.active_theme = None,
            Some(name) if self.themes.contains_key(name) => {
                self.active_theme = Some(name.to_string());
            }
            Some(name) => {
                let known: Vec<_> = self.themes.keys().map(String::as_str).collect();
                return Err(FletchError::Config(format!(
                    "unknown theme `{name}`, available: [{}]",
                    known.join(", ")
                )));
            }
        }
        Ok(())
    }

    /// Returns the active theme name.
    pub fn active_theme(&self) -> Option<&str> {
        self.active_theme.as_deref()
    }
}

impl VariableLookup for LayoutSnapshot {
    fn lookup(&self, name: &str) -> Option<String> {
        self.active_theme
            .as_ref()
            .and_then(|theme| self.themes.get(theme))
            .and_then(|variables| variables.get(name))
            .or_else(|| self.variables.get(name))
            .cloned()
    }
}

impl Host for LayoutSnapshot {
    type Surface = SvgSurface;

    fn surface(&self, id: &str) -> Option<SvgSurface> {
        self.surfaces
            .iter()
            .any(|surface| surface == id)
            .then(SvgSurface::new)
    }

    fn bounds(&self, id: &str) -> Option<Bounds> {
        self.elements.get(id).copied().map(Bounds::from)
    }

    fn device_pixel_ratio(&self) -> Option<f64> {
        self.device_pixel_ratio
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r##"
        device_pixel_ratio = 1.5
        surfaces = ["canvas"]

        [elements]
        container = { left = 80, top = 30, width = 400, height = 300 }
        node = { left = 100.5, top = 50, width = 40, height = 20 }

        [variables]
        "--flow-yes" = "#16a34a"
        "--flow-no" = "#dc2626"

        [themes.dark]
        "--flow-yes" = "#4ade80"
    "##;

    #[test]
    fn test_parse_sample() {
        let snapshot = LayoutSnapshot::from_toml(SAMPLE, "sample").unwrap();

        assert_eq!(snapshot.device_pixel_ratio(), Some(1.5));
        assert!(snapshot.surface("canvas").is_some());
        assert!(snapshot.surface("container").is_none());
        assert_eq!(
            snapshot.bounds("node"),
            Some(Bounds::from_layout_box(100.5, 50.0, 40.0, 20.0))
        );
        assert!(snapshot.bounds("missing").is_none());
    }

    #[test]
    fn test_theme_layers_over_base_variables() {
        let mut snapshot = LayoutSnapshot::from_toml(SAMPLE, "sample").unwrap();
        assert_eq!(snapshot.lookup("--flow-yes").as_deref(), Some("#16a34a"));

        snapshot.apply_theme(Some("dark")).unwrap();
        assert_eq!(snapshot.active_theme(), Some("dark"));
        assert_eq!(snapshot.lookup("--flow-yes").as_deref(), Some("#4ade80"));
        // Not overridden by the theme.
        assert_eq!(snapshot.lookup("--flow-no").as_deref(), Some("#dc2626"));

        snapshot.apply_theme(None).unwrap();
        assert_eq!(snapshot.lookup("--flow-yes").as_deref(), Some("#16a34a"));
    }

    #[test]
    fn test_unknown_theme_is_an_error() {
        let mut snapshot = LayoutSnapshot::from_toml(SAMPLE, "sample").unwrap();
        let err = snapshot.apply_theme(Some("sepia")).unwrap_err();
        assert!(err.to_string().contains("sepia"));
        assert!(snapshot.active_theme().is_none());
    }

    #[test]
    fn test_invalid_snapshot_reports_toml_error() {
        let err = LayoutSnapshot::from_toml("elements = 3", "bad.toml").unwrap_err();
        assert!(matches!(err, FletchError::Toml { ref origin, .. } if origin == "bad.toml"));
    }

    #[test]
    fn test_builder_and_mutation() {
        let mut snapshot = LayoutSnapshot::new()
            .with_surface("canvas")
            .with_element("a", Bounds::from_layout_box(0.0, 0.0, 10.0, 10.0))
            .with_variable("--x", "red")
            .with_theme("alt", [("--x", "blue")]);

        assert!(snapshot.remove_element("a"));
        assert!(!snapshot.remove_element("a"));
        assert!(snapshot.device_pixel_ratio().is_none());

        snapshot.apply_theme(Some("alt")).unwrap();
        assert_eq!(snapshot.lookup("--x").as_deref(), Some("blue"));
    }
}
