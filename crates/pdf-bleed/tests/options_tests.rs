use pdf_bleed::*;
use std::path::PathBuf;

#[test]
fn test_default_options() {
    let options = JobOptions::default();
    assert!(options.inputs.is_empty());
    assert_eq!(options.fit_mode, FitMode::FitTrimProportional);
    assert_eq!(options.anchor, Anchor::Center);
    assert_eq!(options.bleed_generator, BleedGenerator::None);
    assert!(!options.crop_marks);
    assert!(!options.emit_job);
    assert_eq!(options.output.basename, "output");
}

#[test]
fn test_validate_requires_inputs() {
    let options = JobOptions::default();
    assert!(matches!(options.validate(), Err(BleedError::Config(_))));

    let mut options = JobOptions::default();
    options.inputs.push(InputSpec::new("in.pdf"));
    assert!(options.validate().is_ok());
}

#[test]
fn test_validate_rejects_empty_path_and_basename() {
    let mut options = JobOptions::default();
    options.inputs.push(InputSpec::new(""));
    assert!(options.validate().is_err());

    let mut options = JobOptions::default();
    options.inputs.push(InputSpec::new("in.pdf"));
    options.output.basename = "  ".to_string();
    assert!(options.validate().is_err());
}

#[test]
fn test_validate_rejects_bad_trim() {
    let mut options = JobOptions::default();
    options.inputs.push(InputSpec::new("in.pdf"));
    options.trim = TrimSize::new(Length::inches(0.0), Length::inches(6.0));
    assert!(matches!(
        options.validate(),
        Err(BleedError::InvalidGeometry(_))
    ));
}

#[test]
fn test_parse_size() {
    let trim = parse_size("4x6in").unwrap();
    assert_eq!(trim.width_pt().unwrap(), 288.0);
    assert_eq!(trim.height_pt().unwrap(), 432.0);

    let trim = parse_size("3.5X2in").unwrap();
    assert_eq!(trim.width_pt().unwrap(), 252.0);

    let trim = parse_size("101.6x152.4mm").unwrap();
    assert!((trim.width_pt().unwrap() - 288.0).abs() < 1e-2);

    // A missing unit means inches
    let trim = parse_size("4x6").unwrap();
    assert_eq!(trim.width.unit, Unit::Inch);

    assert!(parse_size("4in").is_err());
    assert!(parse_size("axb in").is_err());
}

#[test]
fn test_parse_bleed() {
    let bleed = parse_bleed("0.125", Unit::Inch).unwrap();
    assert_eq!(bleed.top_pt().unwrap(), 9.0);
    assert_eq!(bleed.left_pt().unwrap(), 9.0);

    let bleed = parse_bleed("0.25, 0, 0.125, 0.5", Unit::Inch).unwrap();
    assert_eq!(bleed.top_pt().unwrap(), 18.0);
    assert_eq!(bleed.right_pt().unwrap(), 0.0);
    assert_eq!(bleed.bottom_pt().unwrap(), 9.0);
    assert_eq!(bleed.left_pt().unwrap(), 36.0);

    assert!(parse_bleed("1,2", Unit::Inch).is_err());
    assert!(parse_bleed("abc", Unit::Inch).is_err());
}

#[test]
fn test_serde_wire_values() {
    let mut options = JobOptions::default();
    options.inputs.push(InputSpec::new("in.pdf"));
    options.fit_mode = FitMode::FillBleedProportional;
    options.bleed_generator = BleedGenerator::Mirror;
    options.anchor = Anchor::TopLeft;

    let json = serde_json::to_string_pretty(&options).unwrap();
    assert!(json.contains("\"fill_bleed_proportional\""));
    assert!(json.contains("\"mirror\""));
    assert!(json.contains("\"top_left\""));
    assert!(json.contains("\"unit\": \"in\""));

    let back: JobOptions = serde_json::from_str(&json).unwrap();
    assert_eq!(back, options);
}

#[test]
fn test_deserialize_job_description() {
    let json = r#"{
        "trim": { "w": 4, "h": 6, "unit": "in" },
        "bleed": { "top": 0.125, "right": 0.125, "bottom": 0.125, "left": 0.125 },
        "inputs": [ { "path": "cards.pdf", "pages": "1-3,5" } ],
        "fit_mode": "fill_bleed_proportional",
        "bleed_generator": "smear",
        "crop_marks": true,
        "output": { "dir": "out", "basename": "cards" }
    }"#;

    let options: JobOptions = serde_json::from_str(json).unwrap();
    assert_eq!(options.trim.width_pt().unwrap(), 288.0);
    // Bleed without its own unit tag defaults to inches
    assert_eq!(options.bleed.top_pt().unwrap(), 9.0);
    assert_eq!(options.inputs.len(), 1);
    assert_eq!(options.inputs[0].pages, "1-3,5");
    assert_eq!(options.inputs[0].pdf_box, PdfBoxKind::Auto);
    assert_eq!(options.fit_mode, FitMode::FillBleedProportional);
    assert_eq!(options.bleed_generator, BleedGenerator::Smear);
    // Unlisted optional fields take their defaults
    assert_eq!(options.anchor, Anchor::Center);
    assert!(!options.emit_job);
    assert!(options.crop_marks);
    assert_eq!(options.output.dir, PathBuf::from("out"));
}

#[test]
fn test_deserialize_rejects_unknown_mode() {
    let json = r#"{ "fit_mode": "fit_everything" }"#;
    assert!(serde_json::from_str::<JobOptions>(json).is_err());
}

#[tokio::test]
async fn test_save_and_load_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("job.json");

    let mut options = JobOptions::default();
    options.inputs.push(InputSpec::new("in.pdf"));
    options.trim = TrimSize::new(Length::millimeters(101.6), Length::millimeters(152.4));
    options.bleed = BleedSpec::uniform(Length::millimeters(3.0));
    options.save(&path).await.unwrap();

    let loaded = JobOptions::load(&path).await.unwrap();
    assert_eq!(loaded, options);
    assert_eq!(loaded.trim.width.unit, Unit::Millimeter);
}

#[tokio::test]
async fn test_load_validates_eagerly() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("job.json");

    // Parses fine, but has no inputs
    tokio::fs::write(&path, "{}").await.unwrap();
    let result = JobOptions::load(&path).await;
    assert!(matches!(result, Err(BleedError::Config(_))));
}
