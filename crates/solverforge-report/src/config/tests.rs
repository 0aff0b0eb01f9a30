//! Tests for report configuration.

use super::*;

const TANGO_TOML: &str = r##"
    output_directory = "out"
    hex_style = "padded"
    max_chart_width = 100
    charts = false

    [palette]
    light = ["#8ae234", "#fce94f", "#729fcf", "#e9b96e", "#ad7fa8"]
    dark = ["73d216", "edd400", "3465a4", "c17d11", "75507b"]
"##;

#[test]
fn test_toml_parsing() {
    let config = ReportConfig::from_toml_str(TANGO_TOML).unwrap();
    assert_eq!(config.output_directory, PathBuf::from("out"));
    assert_eq!(config.hex_style, HexStyle::Padded);
    assert_eq!(config.max_chart_width, 100);
    assert!(!config.charts);
    assert!(config.csv);
    assert_eq!(config.log_scale_min_datasets, 5);
    config.validate().unwrap();
}

#[test]
fn test_yaml_matches_toml() {
    let yaml = r##"
        output_directory: out
        hex_style: padded
        max_chart_width: 100
        charts: false
        palette:
          light: ["#8ae234", "#fce94f", "#729fcf", "#e9b96e", "#ad7fa8"]
          dark: ["73d216", "edd400", "3465a4", "c17d11", "75507b"]
    "##;

    let from_yaml = ReportConfig::from_yaml_str(yaml).unwrap();
    let from_toml = ReportConfig::from_toml_str(TANGO_TOML).unwrap();
    assert_eq!(from_yaml, from_toml);
}

#[test]
fn test_empty_toml_is_default() {
    let config = ReportConfig::from_toml_str("").unwrap();
    assert_eq!(config, ReportConfig::default());
    assert_eq!(config.hex_style, HexStyle::Unpadded);
}

#[test]
fn test_unknown_hex_style_rejected() {
    let err = ReportConfig::from_toml_str(r#"hex_style = "upper""#).unwrap_err();
    assert!(matches!(err, ConfigError::Toml(_)));
}

#[test]
fn test_validate_rejects_bad_values() {
    let narrow = ReportConfig {
        max_chart_width: 2,
        ..ReportConfig::default()
    };
    assert!(matches!(narrow.validate(), Err(ConfigError::Invalid(_))));

    let no_levels = ReportConfig {
        charted_score_level_size: 0,
        ..ReportConfig::default()
    };
    assert!(matches!(no_levels.validate(), Err(ConfigError::Invalid(_))));

    let short_palette = ReportConfig::default().with_palette(PaletteConfig {
        light: vec!["#ffffff".to_string()],
        dark: vec!["#000000".to_string(); 5],
    });
    assert!(matches!(
        short_palette.validate(),
        Err(ConfigError::Invalid(msg)) if msg.contains("palette.light")
    ));

    let bad_hex = ReportConfig::default().with_palette(PaletteConfig {
        light: vec!["#ffffff".to_string(); 5],
        dark: vec!["#1000000".to_string(); 5],
    });
    assert!(matches!(
        bad_hex.validate(),
        Err(ConfigError::Invalid(msg)) if msg.contains("palette.dark")
    ));
}

#[test]
fn test_color_sequence_uses_custom_palette() {
    let config = ReportConfig::default()
        .with_hex_style(HexStyle::Padded)
        .with_palette(PaletteConfig {
            light: vec!["#010203".to_string(); 5],
            dark: vec!["#000000".to_string(); 5],
        });
    let mut colors = config.color_sequence().unwrap();
    assert_eq!(colors.color_for("a"), "#010203");
}

#[test]
fn test_from_file_picks_format_by_extension() {
    let dir = tempfile::tempdir().unwrap();

    let yaml_path = dir.path().join("report.yaml");
    std::fs::write(&yaml_path, "max_chart_width: 50\n").unwrap();
    assert_eq!(ReportConfig::from_file(&yaml_path).unwrap().max_chart_width, 50);

    let toml_path = dir.path().join("report.toml");
    std::fs::write(&toml_path, "max_chart_width = 60\n").unwrap();
    assert_eq!(ReportConfig::from_file(&toml_path).unwrap().max_chart_width, 60);
    assert_eq!(ReportConfig::load(&toml_path).unwrap().max_chart_width, 60);
}

#[test]
fn test_missing_file_is_io_error() {
    let err = ReportConfig::load("does/not/exist.toml").unwrap_err();
    assert!(matches!(err, ConfigError::Io(_)));
    assert_eq!(
        ReportConfig::load("does/not/exist.toml").unwrap_or_default(),
        ReportConfig::default()
    );
}
