use logsieve::config::{Config, ConfigError, WeightFunc};

#[test]
fn default_config_is_valid() {
    assert!(Config::default().validate().is_ok());
}

#[test]
fn some_support_threshold_is_required() {
    let config = Config {
        support: 0,
        relative_support: 0.0,
        ..Config::default()
    };
    assert!(matches!(
        config.validate(),
        Err(ConfigError::MissingSupport)
    ));
}

#[test]
fn relative_support_must_be_a_percentage() {
    let config = Config {
        support: 0,
        relative_support: 150.0,
        ..Config::default()
    };
    assert!(matches!(
        config.validate(),
        Err(ConfigError::InvalidRelativeSupport(_))
    ));
}

#[test]
fn cluster_sketch_conflicts_with_aggregation() {
    let config = Config {
        cluster_sketch_size: 1024,
        aggregate_supports: true,
        ..Config::default()
    };
    assert!(matches!(
        config.validate(),
        Err(ConfigError::SketchWithAggregation)
    ));
}

#[test]
fn template_requires_a_line_filter() {
    let config = Config {
        template: Some("$1".to_string()),
        ..Config::default()
    };
    assert!(matches!(
        config.validate(),
        Err(ConfigError::TemplateWithoutFilter)
    ));
}

#[test]
fn word_filter_requires_search_and_replace() {
    let config = Config {
        word_filter: Some("[.]".to_string()),
        ..Config::default()
    };
    assert!(matches!(
        config.validate(),
        Err(ConfigError::WordFilterIncomplete)
    ));
}

#[test]
fn word_weight_must_sit_in_the_unit_interval() {
    for bad in [0.0, -0.5, 1.5] {
        let config = Config {
            word_weight_threshold: Some(bad),
            ..Config::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidWordWeight(_))
        ));
    }
}

#[test]
fn weight_function_parses_from_the_cli_numbers() {
    assert_eq!(WeightFunc::try_from(1).unwrap(), WeightFunc::Mean);
    assert_eq!(WeightFunc::try_from(2).unwrap(), WeightFunc::DistinctMean);
    assert!(WeightFunc::try_from(3).is_err());
}

#[test]
fn errors_are_rejected_before_any_pass() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("input.log");
    std::fs::write(&path, "a b c\n").unwrap();
    let input = logsieve::input::InputSet::from_patterns(&[path.display().to_string()]).unwrap();
    let config = Config {
        cluster_sketch_size: 64,
        aggregate_supports: true,
        ..Config::default()
    };
    let err = logsieve::engine::run(&config, &input).unwrap_err();
    assert!(matches!(err, logsieve::Error::Config(_)));
}
