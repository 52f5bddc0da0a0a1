use super::*;
use std::collections::HashMap;
use tempfile::TempDir;

fn no_env(_: &str) -> Option<String> {
    None
}

fn env_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |name: &str| map.get(name).cloned()
}

fn create_test_paths() -> (ConfigPaths, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let paths = ConfigPaths::new(
        temp_dir.path().join("home").join(GLOBAL_CONFIG_DIR).join(CONFIG_FILE_NAME),
        temp_dir.path().join("project").join(CONFIG_FILE_NAME),
    );
    (paths, temp_dir)
}

#[test]
fn test_defaults() {
    let settings = Settings::default();

    assert_eq!(settings.extraconfig.timezone, "Australia/Sydney");
    assert_eq!(settings.extraconfig.format, "%Y-%m-%d %H:%M:%S");
    assert_eq!(settings.extraconfig.poll_interval(), Duration::from_secs(5));
    assert_eq!(settings.extraconfig.wait_timeout(), Duration::from_secs(300));
    assert!(settings.acquia.key.is_empty());
}

#[test]
fn test_load_without_files_uses_defaults() {
    let (paths, _temp) = create_test_paths();

    let layers = ConfigLayers::load(&paths, no_env).unwrap();

    assert!(layers.global.is_none());
    assert!(layers.project.is_none());
    assert!(layers.environment.is_empty());
    assert_eq!(layers.resolve(), Settings::default());
}

#[test]
fn test_layer_precedence() {
    let (paths, _temp) = create_test_paths();
    fs::create_dir_all(paths.global.parent().unwrap()).unwrap();
    fs::create_dir_all(paths.project.parent().unwrap()).unwrap();

    fs::write(
        &paths.global,
        "acquia:\n  key: global-key\n  secret: global-secret\nextraconfig:\n  timezone: UTC\n  taskwait: 10\n",
    )
    .unwrap();
    fs::write(&paths.project, "extraconfig:\n  timezone: Europe/London\n").unwrap();

    let env = env_from(&[("ACQUIACLI_SECRET", "env-secret"), ("ACQUIACLI_TIMEOUT", "60")]);
    let settings = ConfigLayers::load(&paths, env).unwrap().resolve();

    assert_eq!(settings.acquia.key, "global-key");
    assert_eq!(settings.acquia.secret, "env-secret");
    assert_eq!(settings.extraconfig.timezone, "Europe/London");
    assert_eq!(settings.extraconfig.taskwait, 10);
    assert_eq!(settings.extraconfig.timeout, 60);
    assert_eq!(settings.extraconfig.format, DEFAULT_FORMAT);
}

#[test]
fn test_empty_file_is_an_empty_layer() {
    let (paths, _temp) = create_test_paths();
    fs::create_dir_all(paths.project.parent().unwrap()).unwrap();
    fs::write(&paths.project, "\n").unwrap();

    let layers = ConfigLayers::load(&paths, no_env).unwrap();

    assert!(layers.project.as_ref().unwrap().settings.is_empty());
    assert_eq!(layers.resolve(), Settings::default());
}

#[test]
fn test_malformed_file_is_rejected() {
    let (paths, _temp) = create_test_paths();
    fs::create_dir_all(paths.project.parent().unwrap()).unwrap();
    fs::write(&paths.project, "extraconfig:\n  taskwait: soon\n").unwrap();

    let result = ConfigLayers::load(&paths, no_env);
    assert!(matches!(result, Err(AcquiaError::InvalidConfig(_))));
}

#[test]
fn test_env_seconds_must_be_numeric() {
    let result = RawSettings::from_env(env_from(&[("ACQUIACLI_TASKWAIT", "five")]));
    assert!(matches!(result, Err(AcquiaError::InvalidConfig(_))));
}

#[test]
fn test_zero_taskwait_is_rejected() {
    let result = RawSettings::from_env(env_from(&[("ACQUIACLI_TASKWAIT", "0")]));
    assert!(matches!(result, Err(AcquiaError::InvalidConfig(ref msg)) if msg.contains("ACQUIACLI_TASKWAIT")));

    let (paths, _temp) = create_test_paths();
    fs::create_dir_all(paths.global.parent().unwrap()).unwrap();
    fs::write(&paths.global, "extraconfig:\n  taskwait: 0\n").unwrap();

    let result = ConfigLayers::load(&paths, no_env);
    assert!(matches!(result, Err(AcquiaError::InvalidConfig(ref msg)) if msg.contains("taskwait")));

    // Zero timeout is fine: poll once and give up
    fs::write(&paths.global, "extraconfig:\n  taskwait: 1\n  timeout: 0\n").unwrap();
    let settings = ConfigLayers::load(&paths, no_env).unwrap().resolve();
    assert_eq!(settings.extraconfig.timeout, 0);
}

#[test]
fn test_write_config_file() {
    let (paths, _temp) = create_test_paths();
    let settings = Settings::with_credentials("my-key", "my-secret");

    write_config_file(&paths.global, &settings).unwrap();

    let written: serde_yaml::Value =
        serde_yaml::from_str(&fs::read_to_string(&paths.global).unwrap()).unwrap();
    assert_eq!(written["acquia"]["key"].as_str(), Some("my-key"));
    assert_eq!(written["acquia"]["secret"].as_str(), Some("my-secret"));
    assert_eq!(written["extraconfig"]["timezone"].as_str(), Some("Australia/Sydney"));
    assert_eq!(written["extraconfig"]["taskwait"].as_u64(), Some(5));
    assert_eq!(written["extraconfig"]["timeout"].as_u64(), Some(300));
}

#[cfg(unix)]
#[test]
fn test_write_config_file_permissions() {
    use std::os::unix::fs::PermissionsExt;

    let (paths, _temp) = create_test_paths();
    let dir = paths.global.parent().unwrap();

    write_config_file(&paths.global, &Settings::default()).unwrap();

    let file_mode = fs::metadata(&paths.global).unwrap().permissions().mode() & 0o777;
    let dir_mode = fs::metadata(dir).unwrap().permissions().mode() & 0o777;
    assert_eq!(file_mode, 0o600);
    assert_eq!(dir_mode, 0o700);
}

#[cfg(unix)]
#[test]
fn test_rewrite_tightens_existing_mode() {
    use std::os::unix::fs::PermissionsExt;

    let temp = TempDir::new().unwrap();
    let path = temp.path().join(CONFIG_FILE_NAME);
    fs::write(&path, "acquia: {}\n").unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).unwrap();

    write_config_file(&path, &Settings::default()).unwrap();

    let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
    assert_eq!(mode, 0o600);
}

#[test]
fn test_write_config_file_parent_is_a_file() {
    let temp = TempDir::new().unwrap();
    let blocker = temp.path().join("blocker");
    fs::write(&blocker, "not a directory").unwrap();

    let result = write_config_file(&blocker.join(CONFIG_FILE_NAME), &Settings::default());
    assert!(matches!(result, Err(AcquiaError::ConfigWriteFailure { .. })));
}

#[test]
fn test_written_file_loads_back() {
    let (paths, _temp) = create_test_paths();
    write_config_file(&paths.project, &Settings::with_credentials("k", "s")).unwrap();

    let settings = ConfigLayers::load(&paths, no_env).unwrap().resolve();
    assert_eq!(settings.acquia, Credentials { key: "k".into(), secret: "s".into() });
}
