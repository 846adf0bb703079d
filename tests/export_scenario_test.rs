//! End-to-end export scenarios
//!
//! Each test writes a JSON snapshot into a temporary directory, runs the
//! export coordinator against it and inspects the produced files.

use reqport::adapters::source::create_source;
use reqport::config::ReqportConfig;
use reqport::core::export::{ExportCoordinator, ExportOutcome, ExportSummary};
use serde_json::json;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tempfile::TempDir;
use tokio::sync::watch;

fn feature_type(requirements: serde_json::Value) -> serde_json::Value {
    json!({
        "name": "Feature",
        "tag": "F",
        "description": "Product features",
        "attributes": [
            {
                "name": "Risk",
                "kind": {
                    "type": "enumeration",
                    "entries": ["Low", "High", null],
                    "multi_select": true
                }
            }
        ],
        "requirements": requirements
    })
}

/// Project "Demo": F1 (Open, High) with child F2
fn demo_requirements() -> serde_json::Value {
    json!([
        {
            "number": 1,
            "name": "Login",
            "status": "Open",
            "priority": "High",
            "description": "<p>Users <b>log in</b></p>",
            "owner": {"first_name": "Ada", "last_name": "Lovelace", "user_id": "ada"},
            "attribute_values": [
                {"attribute": "Risk", "value": {"kind": "enumeration", "value": ["Low", "High"]}}
            ],
            "traces_to": [
                {"endpoint": {"kind": "requirement", "project": "Demo", "type_name": "Feature", "tag": "F", "number": 2}, "suspect": true},
                {"endpoint": {"kind": "requirement", "project": "Other", "type_name": "Feature", "tag": "F", "number": 9}}
            ],
            "children": [
                {
                    "number": 2,
                    "name": "Logout",
                    "status": "Open",
                    "priority": "High",
                    "traces_from": [
                        {"endpoint": {"kind": "requirement", "project": "Demo", "type_name": "Feature", "tag": "F", "number": 1}},
                        {"endpoint": {"kind": "requirement", "project": "Other", "type_name": "Feature", "tag": "F", "number": 5}}
                    ]
                }
            ]
        }
    ])
}

fn write_snapshot(dir: &Path, types: Vec<serde_json::Value>) {
    let snapshot = json!({
        "repository_id": "rm.example.com",
        "user": "Ada Lovelace",
        "projects": [{
            "name": "Demo",
            "baselines": [{"name": "Current Baseline", "types": types}]
        }]
    });
    std::fs::write(
        dir.join("snapshot.json"),
        serde_json::to_string_pretty(&snapshot).unwrap(),
    )
    .unwrap();
    std::fs::create_dir_all(dir.join("images")).unwrap();
}

fn config(dir: &Path, format: &str, extra: &str) -> ReqportConfig {
    let toml_content = format!(
        r#"
[source]
path = '{snapshot}'
images_dir = '{images}'

[export]
format = "{format}"
project = "Demo"
output_dir = '{out}'
{extra}
"#,
        snapshot = dir.join("snapshot.json").display(),
        images = dir.join("images").display(),
        out = dir.join("out").display(),
    );
    toml::from_str(&toml_content).unwrap()
}

async fn run(config: ReqportConfig) -> ExportSummary {
    let source = create_source(&config.source).await.unwrap();
    let (_tx, rx) = watch::channel(false);
    ExportCoordinator::new(config, source, rx)
        .execute_export()
        .await
        .unwrap()
}

fn zip_entry(path: &Path, name: &str) -> String {
    let mut archive = zip::ZipArchive::new(File::open(path).unwrap()).unwrap();
    let mut content = String::new();
    archive
        .by_name(name)
        .unwrap()
        .read_to_string(&mut content)
        .unwrap();
    content
}

fn zip_names(path: &Path) -> Vec<String> {
    let archive = zip::ZipArchive::new(File::open(path).unwrap()).unwrap();
    let mut names: Vec<String> = archive.file_names().map(String::from).collect();
    names.sort();
    names
}

#[tokio::test]
async fn test_reqif_demo_scenario() {
    let dir = TempDir::new().unwrap();
    write_snapshot(dir.path(), vec![feature_type(demo_requirements())]);

    let summary = run(config(dir.path(), "reqif", "max_row_count = 10")).await;

    assert_eq!(summary.outcome, ExportOutcome::Completed);
    assert_eq!(summary.exported, 2);
    assert_eq!(summary.first_level, 1);
    assert_eq!(summary.types, 1);
    assert_eq!(summary.skipped_traces, 1);
    assert!(summary.is_successful());

    let path = summary.output_path.unwrap();
    assert_eq!(path, dir.path().join("out").join("Export - Demo.reqif"));
    let xml = std::fs::read_to_string(&path).unwrap();

    assert!(xml.starts_with("<?xml"));
    assert!(xml.trim_end().ends_with("</REQ-IF>"));
    assert!(xml.contains("<TITLE>Project: Demo: all requirement types</TITLE>"));
    assert!(xml.contains("<REPOSITORY-ID>rm.example.com</REPOSITORY-ID>"));
    assert_eq!(xml.matches("<SPEC-OBJECT ").count(), 2);
    assert_eq!(xml.matches("<SPEC-RELATION ").count(), 1);
    assert!(xml.contains("IDENTIFIER=\"F1-to-F2\""));
    assert!(xml.contains("<ENUM-VALUE-REF>Risk-value_Low</ENUM-VALUE-REF>"));
    assert!(xml.contains("<ENUM-VALUE-REF>Risk-value_High</ENUM-VALUE-REF>"));

    // F2 is nested inside F1's hierarchy node
    let f1 = xml.find("IDENTIFIER=\"F1-node\"").unwrap();
    let f2 = xml.find("IDENTIFIER=\"F2-node\"").unwrap();
    assert!(f1 < f2);
    let between = &xml[f1..f2];
    assert!(between.contains("<CHILDREN>"));
    assert!(!between.contains("</SPEC-HIERARCHY>"));
}

#[tokio::test]
async fn test_spreadsheet_demo_scenario() {
    let dir = TempDir::new().unwrap();
    write_snapshot(dir.path(), vec![feature_type(demo_requirements())]);

    let summary = run(config(dir.path(), "xlsx", "")).await;

    assert_eq!(summary.outcome, ExportOutcome::Completed);
    assert_eq!(summary.exported, 2);
    let path = summary.output_path.unwrap();
    assert_eq!(path, dir.path().join("out").join("Export - Demo.xlsx"));

    let workbook = zip_entry(&path, "xl/workbook.xml");
    assert!(workbook.contains("name=\"Feature\""));

    let sheet = zip_entry(&path, "xl/worksheets/sheet1.xml");
    assert!(sheet.contains("<row r=\"1\""));
    assert!(sheet.contains("<row r=\"3\""));
    assert!(!sheet.contains("<row r=\"4\""));

    let strings = zip_entry(&path, "xl/sharedStrings.xml");
    for text in [
        "Requirement",
        "Traces from",
        "Risk",
        "Login",
        "Logout",
        "F1",
        "F2",
        "Ada Lovelace",
        "Users log in",
        "F9 | Other",
        "F5 || Other",
    ] {
        assert!(strings.contains(text), "missing {text}");
    }
    // Only incoming cross-project traces double the separator
    assert!(!strings.contains("F9 || Other"));

    // F2 sits one level deeper than F1
    let styles = zip_entry(&path, "xl/styles.xml");
    assert!(styles.contains("indent=\"1\""));
}

#[tokio::test]
async fn test_limit_keeps_partial_output() {
    let dir = TempDir::new().unwrap();
    write_snapshot(dir.path(), vec![feature_type(demo_requirements())]);

    let summary = run(config(dir.path(), "reqif", "max_row_count = 1")).await;

    assert_eq!(summary.outcome, ExportOutcome::LimitReached);
    assert_eq!(summary.exported, 1);
    assert!(!summary.is_successful());

    let xml = std::fs::read_to_string(summary.output_path.unwrap()).unwrap();
    assert_eq!(xml.matches("<SPEC-OBJECT ").count(), 1);
    assert!(xml.trim_end().ends_with("</REQ-IF>"));
    assert!(!xml.contains("<SPEC-RELATIONS>"));
}

#[tokio::test]
async fn test_reverse_traces_swap_ends() {
    let dir = TempDir::new().unwrap();
    write_snapshot(dir.path(), vec![feature_type(demo_requirements())]);

    let summary = run(config(dir.path(), "reqif", "reverse_traces = true")).await;
    let xml = std::fs::read_to_string(summary.output_path.unwrap()).unwrap();

    let relation = xml.find("IDENTIFIER=\"F1-to-F2\"").unwrap();
    let rest = &xml[relation..];
    let source = rest.find("<SOURCE>").unwrap();
    let target = rest.find("<TARGET>").unwrap();
    let source_ref = &rest[source..target];
    assert!(source_ref.contains("<SPEC-OBJECT-REF>F2</SPEC-OBJECT-REF>"));
    assert!(rest[target..].starts_with("<TARGET>"));
    assert!(rest.contains("THE-VALUE=\"true\""));
}

#[tokio::test]
async fn test_shared_attribute_datatype_written_once() {
    let dir = TempDir::new().unwrap();
    let mut bug = feature_type(json!([{"number": 1, "name": "Crash"}]));
    bug["name"] = json!("Bug");
    bug["tag"] = json!("B");
    write_snapshot(
        dir.path(),
        vec![feature_type(demo_requirements()), bug],
    );

    let summary = run(config(dir.path(), "reqif", "")).await;
    assert_eq!(summary.types, 2);
    assert_eq!(summary.exported, 3);

    let xml = std::fs::read_to_string(summary.output_path.unwrap()).unwrap();
    assert_eq!(xml.matches("IDENTIFIER=\"Risk-datatype\"").count(), 1);
    assert!(xml.contains("IDENTIFIER=\"F-Risk-attribute\""));
    assert!(xml.contains("IDENTIFIER=\"B-Risk-attribute\""));
    assert!(xml.contains("IDENTIFIER=\"B-spec\""));
}

#[tokio::test]
async fn test_single_type_export_name() {
    let dir = TempDir::new().unwrap();
    write_snapshot(dir.path(), vec![feature_type(demo_requirements())]);

    let summary = run(config(dir.path(), "reqif", "requirement_type = \"Feature\"")).await;
    let path = summary.output_path.unwrap();
    assert_eq!(path.file_name().unwrap(), "Export - Demo - Feature.reqif");
    let xml = std::fs::read_to_string(path).unwrap();
    assert!(xml.contains("<TITLE>Project: Demo: Feature</TITLE>"));
}

fn image_requirements() -> serde_json::Value {
    json!([
        {
            "number": 1,
            "name": "Layout",
            "description": "<p>See <img id=\"img5\" src_original=\"diagram.gif\" src=\"tmp.gif\"></p>"
        }
    ])
}

fn write_gif(path: &Path) {
    image::RgbaImage::from_pixel(2, 2, image::Rgba([255, 0, 0, 255]))
        .save_with_format(path, image::ImageFormat::Gif)
        .unwrap();
}

#[tokio::test]
async fn test_reqifz_bundles_converted_image() {
    let dir = TempDir::new().unwrap();
    write_snapshot(dir.path(), vec![feature_type(image_requirements())]);
    write_gif(&dir.path().join("images").join("5-diagram.gif"));

    let summary = run(config(dir.path(), "reqifz", "")).await;

    assert_eq!(summary.outcome, ExportOutcome::Completed);
    assert_eq!(summary.dropped_images, 0);
    assert!(summary.is_successful());

    let reqif = summary.output_path.unwrap();
    let xml = std::fs::read_to_string(&reqif).unwrap();
    assert!(xml.contains("<reqif-xhtml:object data=\"diagram.png\" type=\"image/png\"/>"));
    assert!(dir.path().join("out").join("diagram.png").is_file());

    let archive = summary.archive_path.unwrap();
    assert_eq!(archive.file_name().unwrap(), "Export - Demo.reqifz");
    assert_eq!(
        zip_names(&archive),
        vec!["Export - Demo.reqif".to_string(), "diagram.png".to_string()]
    );
}

#[tokio::test]
async fn test_skip_images_keeps_original_reference() {
    let dir = TempDir::new().unwrap();
    write_snapshot(dir.path(), vec![feature_type(image_requirements())]);
    write_gif(&dir.path().join("images").join("5-diagram.gif"));

    let summary = run(config(dir.path(), "reqif", "skip_images = true")).await;

    let xml = std::fs::read_to_string(summary.output_path.unwrap()).unwrap();
    assert!(xml.contains("<reqif-xhtml:object data=\"diagram.gif\" type=\"image/gif\"/>"));
    assert!(!dir.path().join("out").join("diagram.png").exists());
}

#[tokio::test]
async fn test_missing_image_is_dropped() {
    let dir = TempDir::new().unwrap();
    write_snapshot(dir.path(), vec![feature_type(image_requirements())]);

    let summary = run(config(dir.path(), "reqif", "")).await;

    assert_eq!(summary.outcome, ExportOutcome::Completed);
    assert_eq!(summary.dropped_images, 1);
    let xml = std::fs::read_to_string(summary.output_path.unwrap()).unwrap();
    assert!(!xml.contains("reqif-xhtml:object"));
    assert!(xml.contains("See "));
}

#[tokio::test]
async fn test_cancelled_before_start() {
    let dir = TempDir::new().unwrap();
    write_snapshot(dir.path(), vec![feature_type(demo_requirements())]);
    let config = config(dir.path(), "reqif", "");

    let source = create_source(&config.source).await.unwrap();
    let (tx, rx) = watch::channel(false);
    tx.send(true).unwrap();
    let summary = ExportCoordinator::new(config, source, rx)
        .execute_export()
        .await
        .unwrap();

    assert_eq!(summary.outcome, ExportOutcome::Cancelled);
    assert_eq!(summary.exported, 0);
    assert!(summary.output_path.is_none());
}

#[tokio::test]
async fn test_unknown_project_is_source_error() {
    let dir = TempDir::new().unwrap();
    write_snapshot(dir.path(), vec![feature_type(demo_requirements())]);
    let mut config = config(dir.path(), "reqif", "");
    config.export.project = "Nope".to_string();

    let source = create_source(&config.source).await.unwrap();
    let (_tx, rx) = watch::channel(false);
    let err = ExportCoordinator::new(config, source, rx)
        .execute_export()
        .await
        .unwrap_err();

    assert!(matches!(err, reqport::domain::ReqportError::Source(_)));
}

fn spec_object<'a>(xml: &'a str, id: &str) -> &'a str {
    let start = xml
        .find(&format!("<SPEC-OBJECT IDENTIFIER=\"{id}\""))
        .unwrap();
    let end = start + xml[start..].find("</SPEC-OBJECT>").unwrap();
    &xml[start..end]
}

#[tokio::test]
async fn test_type_attribute_marks_folders() {
    let dir = TempDir::new().unwrap();
    write_snapshot(dir.path(), vec![feature_type(demo_requirements())]);

    let summary = run(config(dir.path(), "reqif", "include_type_attribute = true")).await;
    let xml = std::fs::read_to_string(summary.output_path.unwrap()).unwrap();

    assert_eq!(xml.matches("IDENTIFIER=\"Type-datatype\"").count(), 1);
    assert!(xml.contains("IDENTIFIER=\"Type-value_Folder\""));
    assert!(xml.contains("IDENTIFIER=\"Type-value_Functional\""));
    assert!(xml.contains("IDENTIFIER=\"F-Type-attribute\""));

    // F1 has a child, F2 is a leaf
    let f1 = spec_object(&xml, "F1");
    assert!(f1.contains("<ENUM-VALUE-REF>Type-value_Folder</ENUM-VALUE-REF>"));
    assert!(!f1.contains("Type-value_Functional"));
    let f2 = spec_object(&xml, "F2");
    assert!(f2.contains("<ENUM-VALUE-REF>Type-value_Functional</ENUM-VALUE-REF>"));
    assert!(!f2.contains("Type-value_Folder"));
}

#[tokio::test]
async fn test_type_attribute_off_by_default() {
    let dir = TempDir::new().unwrap();
    write_snapshot(dir.path(), vec![feature_type(demo_requirements())]);

    let summary = run(config(dir.path(), "reqif", "")).await;
    let xml = std::fs::read_to_string(summary.output_path.unwrap()).unwrap();

    assert!(!xml.contains("Type-datatype"));
    assert!(!xml.contains("F-Type-attribute"));
    assert!(!xml.contains("Type-value_Folder"));
}

#[tokio::test]
async fn test_plaintext_descriptions_are_escaped_text() {
    let dir = TempDir::new().unwrap();
    let requirements = json!([
        {"number": 1, "name": "Menu", "description": "<p>Fish &amp; <b>chips</b> &lt;3</p>"}
    ]);
    write_snapshot(dir.path(), vec![feature_type(requirements)]);

    let summary = run(config(dir.path(), "reqif", "plaintext = true")).await;
    let xml = std::fs::read_to_string(summary.output_path.unwrap()).unwrap();

    let f1 = spec_object(&xml, "F1");
    assert!(f1.contains("<reqif-xhtml:div>Fish &amp; chips &lt;3</reqif-xhtml:div>"));
    assert!(!f1.contains("<reqif-xhtml:p>"));
    assert!(!f1.contains("<reqif-xhtml:b>"));
}

#[tokio::test]
async fn test_rich_descriptions_are_sanitized_by_default() {
    let dir = TempDir::new().unwrap();
    let requirements = json!([
        {"number": 1, "name": "Menu", "description": "<p>Fish &amp; <b>chips</b></p>"}
    ]);
    write_snapshot(dir.path(), vec![feature_type(requirements)]);

    let summary = run(config(dir.path(), "reqif", "")).await;
    let xml = std::fs::read_to_string(summary.output_path.unwrap()).unwrap();

    let f1 = spec_object(&xml, "F1");
    assert!(f1.contains("<reqif-xhtml:p>"));
    assert!(f1.contains("<reqif-xhtml:b>chips</reqif-xhtml:b>"));
}

fn write_png(path: &Path, size: u32) {
    image::RgbaImage::from_pixel(size, size, image::Rgba([0, 255, 0, 255]))
        .save_with_format(path, image::ImageFormat::Png)
        .unwrap();
}

#[tokio::test]
async fn test_images_sharing_a_file_name_stay_separate() {
    let dir = TempDir::new().unwrap();
    let requirements = json!([
        {"number": 1, "name": "Front", "description": "<p><img id=\"img1\" src_original=\"image001.png\"></p>"},
        {"number": 2, "name": "Back", "description": "<p><img id=\"img2\" src_original=\"image001.png\"></p>"}
    ]);
    write_snapshot(dir.path(), vec![feature_type(requirements)]);
    write_png(&dir.path().join("images").join("1-image001.png"), 1);
    write_png(&dir.path().join("images").join("2-image001.png"), 2);

    let summary = run(config(dir.path(), "reqifz", "")).await;
    assert_eq!(summary.dropped_images, 0);

    let xml = std::fs::read_to_string(summary.output_path.unwrap()).unwrap();
    assert!(spec_object(&xml, "F1").contains("data=\"image001.png\""));
    assert!(spec_object(&xml, "F2").contains("data=\"image001-2.png\""));

    let out = dir.path().join("out");
    assert_eq!(image::open(out.join("image001.png")).unwrap().width(), 1);
    assert_eq!(image::open(out.join("image001-2.png")).unwrap().width(), 2);
    assert_eq!(
        zip_names(&summary.archive_path.unwrap()),
        vec![
            "Export - Demo.reqif".to_string(),
            "image001-2.png".to_string(),
            "image001.png".to_string(),
        ]
    );
}
