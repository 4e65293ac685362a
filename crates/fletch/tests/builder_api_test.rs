//! Integration tests for the FlowchartBuilder API

use fletch::{
    FletchError, FlowchartBuilder,
    config::{AppConfig, RenderConfig, StyleConfig},
    snapshot::LayoutSnapshot,
};

const SNAPSHOT: &str = r##"
    device_pixel_ratio = 2.0
    surfaces = ["flowchart-canvas"]

    [elements]
    flowchart-container = { left = 80, top = 30, width = 400, height = 300 }
    fc-start = { left = 230, top = 50, width = 100, height = 40 }
    fc-question = { left = 230, top = 140, width = 100, height = 40 }
    fc-answer-yes = { left = 110, top = 240, width = 100, height = 40 }
    fc-answer-no = { left = 350, top = 240, width = 100, height = 40 }

    [variables]
    "--flow-link" = "#64748b"
    "--flow-yes" = "#16a34a"
    "--flow-no" = "#dc2626"
"##;

fn snapshot() -> LayoutSnapshot {
    LayoutSnapshot::from_toml(SNAPSHOT, "snapshot").expect("Failed to parse snapshot")
}

#[test]
fn test_builder_api_exists() {
    let builder = FlowchartBuilder::default();
    assert_eq!(builder.config().render().variant(), "default");
}

#[test]
fn test_render_reference_deck() {
    let svg = FlowchartBuilder::default()
        .render_svg(snapshot())
        .expect("Failed to render");

    assert!(svg.contains("<svg"), "Output should contain SVG tag");
    assert!(svg.contains("</svg>"), "Output should be complete SVG");
    assert!(svg.contains("viewBox=\"0 0 400 300\""));
    assert_eq!(svg.matches("<line").count(), 3);
    assert_eq!(svg.matches("<polygon").count(), 3);
    assert!(svg.contains("#16a34a"));
}

#[test]
fn test_render_with_background() {
    let config = AppConfig::new(
        RenderConfig::default(),
        StyleConfig::new(Some("white".to_string())),
        None,
    );
    let svg = FlowchartBuilder::new(config)
        .render_svg(snapshot())
        .expect("Failed to render");

    assert!(svg.contains("<rect"));
}

#[test]
fn test_render_custom_topology() {
    let config = AppConfig::from_toml(
        r#"
        [[topologies.default]]
        from = "fc-answer-yes"
        to = "fc-answer-no"
        color = "var(--flow-no)"
        "#,
        "inline",
    )
    .expect("Failed to parse config");

    let svg = FlowchartBuilder::new(config)
        .render_svg(snapshot())
        .expect("Failed to render");

    assert_eq!(svg.matches("<line").count(), 1);
    assert!(svg.contains("#dc2626"));
    assert!(!svg.contains("#64748b"));
}

#[test]
fn test_render_unbound_is_an_error() {
    let config = AppConfig::new(
        RenderConfig::new("other-canvas", "flowchart-container", "default"),
        StyleConfig::default(),
        None,
    );
    let err = FlowchartBuilder::new(config)
        .render_svg(snapshot())
        .unwrap_err();

    assert!(matches!(
        err,
        FletchError::Unbound { ref surface, .. } if surface == "other-canvas"
    ));
}
