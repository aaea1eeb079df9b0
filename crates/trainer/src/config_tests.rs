use super::*;

#[test]
fn test_empty_config_is_default() {
    assert_eq!(TrainerConfig::from_toml("").unwrap(), TrainerConfig::default());
}

#[test]
fn test_full_config() {
    let config = TrainerConfig::from_toml(
        r#"
        repertoire = "data/rep.json"
        seed = 42
        orientation = "black"
        log_level = "debug"

        [weights]
        errorPower = 3.0
        "#,
    )
    .unwrap();

    assert_eq!(config.repertoire, PathBuf::from("data/rep.json"));
    assert_eq!(config.seed, Some(42));
    assert_eq!(config.orientation, Some(Orientation::Black));
    assert_eq!(config.log_level, "debug");
    let weights = config.weights.unwrap();
    assert_eq!(weights.error_power, 3.0);
    assert_eq!(weights.recency_power, WeightSettings::DEFAULT_RECENCY_POWER);
}

#[test]
fn test_bad_orientation_is_rejected() {
    assert!(TrainerConfig::from_toml(r#"orientation = "purple""#).is_err());
}

#[test]
fn test_missing_file_uses_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = TrainerConfig::load(&dir.path().join("trainer.toml")).unwrap();
    assert_eq!(config, TrainerConfig::default());
}

#[test]
fn test_invalid_file_names_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("trainer.toml");
    std::fs::write(&path, "seed = \"many\"").unwrap();

    let err = TrainerConfig::load(&path).unwrap_err();
    assert!(format!("{err:#}").contains("trainer.toml"));
}

#[test]
fn test_load_reads_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("trainer.toml");
    std::fs::write(
        &path,
        "repertoire = \"lines.json\"\norientation = \"white\"\n\n[weights]\nnewnessPower = 0.5\n",
    )
    .unwrap();

    let config = TrainerConfig::load(&path).unwrap();
    assert_eq!(config.repertoire, PathBuf::from("lines.json"));
    assert_eq!(config.orientation, Some(Orientation::White));
    assert_eq!(config.seed, None);
    assert_eq!(config.log_level, "info");
    assert_eq!(config.weights.unwrap().newness_power, 0.5);
}
