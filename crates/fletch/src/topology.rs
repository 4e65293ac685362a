//! Connection tables.
//!
//! A [`Topology`] is an ordered list of [`ConnectionSpec`]s; the order is
//! the paint order. A [`TopologySet`] maps variant names to topologies and
//! is what callers inject into a [`ConnectorRenderer`](crate::ConnectorRenderer).
//!
//! In TOML a set is a table of arrays:
//!
//! ```toml
//! [[default]]
//! from = "fc-start"
//! to = "fc-question"
//! color = "var(--flow-link)"
//! ```

use indexmap::IndexMap;
use log::debug;
use serde::Deserialize;

use fletch_core::color::{Color, ColorToken};

/// Name of the variant used when the requested one does not exist.
pub const DEFAULT_VARIANT: &str = "default";

/// Name of the alternate variant of the reference deck.
pub const DECISION_TREE_VARIANT: &str = "decision-tree";

/// A directed connection between two host elements.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ConnectionSpec {
    from: String,
    to: String,
    color: ColorToken,
}

impl ConnectionSpec {
    pub fn new(from: impl Into<String>, to: impl Into<String>, color: ColorToken) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            color,
        }
    }

    /// Id of the element the arrow leaves from.
    pub fn from(&self) -> &str {
        &self.from
    }

    /// Id of the element the arrow points at.
    pub fn to(&self) -> &str {
        &self.to
    }

    /// Color of the arrow, unresolved.
    pub fn color(&self) -> &ColorToken {
        &self.color
    }
}

/// An ordered sequence of connections.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct Topology {
    connections: Vec<ConnectionSpec>,
}

impl Topology {
    pub fn new(connections: Vec<ConnectionSpec>) -> Self {
        Self { connections }
    }

    /// Returns the connections in paint order.
    pub fn connections(&self) -> &[ConnectionSpec] {
        &self.connections
    }

    pub fn len(&self) -> usize {
        self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ConnectionSpec> {
        self.connections.iter()
    }
}

impl FromIterator<ConnectionSpec> for Topology {
    fn from_iter<I: IntoIterator<Item = ConnectionSpec>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Named topology variants.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct TopologySet {
    variants: IndexMap<String, Topology>,
}

impl TopologySet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or replaces) a variant, builder style.
    pub fn with_variant(mut self, name: impl Into<String>, topology: Topology) -> Self {
        self.insert(name, topology);
        self
    }

    /// Adds (or replaces) a variant.
    pub fn insert(&mut self, name: impl Into<String>, topology: Topology) {
        self.variants.insert(name.into(), topology);
    }

    /// Returns the variant with exactly this name.
    pub fn get(&self, name: &str) -> Option<&Topology> {
        self.variants.get(name)
    }

    /// Returns variant names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.variants.keys().map(String::as_str)
    }

    /// Selects the variant to draw for `name`.
    ///
    /// An unknown name falls back to [`DEFAULT_VARIANT`]. Returns the name
    /// actually selected alongside the topology, or `None` when neither the
    /// requested variant nor the default exist.
    ///
    /// # Examples
    ///
    /// ```
    /// # use fletch::topology::TopologySet;
    /// let set = TopologySet::reference();
    ///
    /// let (name, topology) = set.select("decision-tree").unwrap();
    /// assert_eq!((name, topology.len()), ("decision-tree", 12));
    ///
    /// let (name, topology) = set.select("no-such-variant").unwrap();
    /// assert_eq!((name, topology.len()), ("default", 3));
    /// ```
    pub fn select(&self, name: &str) -> Option<(&str, &Topology)> {
        if let Some((name, topology)) = self.variants.get_key_value(name) {
            return Some((name.as_str(), topology));
        }

        debug!(variant = name; "Unknown topology variant, falling back to default");
        self.variants
            .get_key_value(DEFAULT_VARIANT)
            .map(|(name, topology)| (name.as_str(), topology))
    }

    /// Checks that every connection names both endpoints and that literal
    /// colors, including the literal ending a `var()` fallback chain, are
    /// valid CSS colors.
    pub fn validate(&self) -> Result<(), String> {
        for (variant, topology) in &self.variants {
            for (index, connection) in topology.iter().enumerate() {
                if connection.from.trim().is_empty() || connection.to.trim().is_empty() {
                    return Err(format!(
                        "connection {index} of variant `{variant}` has an empty endpoint id"
                    ));
                }

                if let Some(literal) = connection.color.final_literal() {
                    Color::new(literal).map_err(|err| {
                        format!("connection {index} of variant `{variant}`: {err}")
                    })?;
                }
            }
        }
        Ok(())
    }

    /// The topologies of the quiz slide flowchart shipped with the deck.
    ///
    /// - `default`: start → question, then the two answers (3 connections).
    /// - `decision-tree`: the full three-question tree (12 connections).
    ///
    /// Colors use the `--flow-link`, `--flow-yes` and `--flow-no` theme
    /// variables, except the sixth decision-tree connection which carries
    /// the literal accent `#f59e0b`.
    pub fn reference() -> Self {
        let link = || ColorToken::variable("--flow-link");
        let yes = || ColorToken::variable("--flow-yes");
        let no = || ColorToken::variable("--flow-no");
        let connect = ConnectionSpec::new;

        let default = Topology::new(vec![
            connect("fc-start", "fc-question", link()),
            connect("fc-question", "fc-answer-yes", yes()),
            connect("fc-question", "fc-answer-no", no()),
        ]);

        let decision_tree = Topology::new(vec![
            connect("fc-start", "fc-q1", link()),
            connect("fc-q1", "fc-q1-yes", yes()),
            connect("fc-q1", "fc-q1-no", no()),
            connect("fc-q1-yes", "fc-q2", link()),
            connect("fc-q1-no", "fc-q3", link()),
            connect("fc-q2", "fc-q2-yes", ColorToken::literal("#f59e0b")),
            connect("fc-q2", "fc-q2-no", no()),
            connect("fc-q3", "fc-q3-yes", yes()),
            connect("fc-q3", "fc-q3-no", no()),
            connect("fc-q2-yes", "fc-result-a", link()),
            connect("fc-q3-yes", "fc-result-b", link()),
            connect("fc-q3-no", "fc-result-c", link()),
        ]);

        Self::new()
            .with_variant(DEFAULT_VARIANT, default)
            .with_variant(DECISION_TREE_VARIANT, decision_tree)
    }
}
