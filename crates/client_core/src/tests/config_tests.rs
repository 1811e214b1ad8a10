use super::*;
use std::collections::HashMap;

fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = pairs
        .iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect();
    move |key| vars.get(key).cloned()
}

fn scratch_file(name: &str, contents: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("{}-{name}", std::process::id()));
    fs::write(&path, contents).expect("write settings file");
    path
}

#[test]
fn missing_file_yields_defaults() {
    let settings = load_settings_from(Path::new("/nonexistent/dashboard.toml"), env_from(&[]))
        .expect("defaults");

    assert_eq!(settings, DashboardSettings::default());
    assert_eq!(settings.api_base_url, "http://localhost:3000/api");
    assert_eq!(settings.request_timeout, Duration::from_secs(120));
}

#[test]
fn file_values_override_defaults() {
    let path = scratch_file(
        "file-values.toml",
        r#"
api_base_url = "https://solver.internal/api/"
request_timeout_secs = 30
default_dataset = "large"
default_algorithm = "simulated_annealing"
experiment_runs = 20
"#,
    );

    let settings = load_settings_from(&path, env_from(&[])).expect("settings");
    let _ = fs::remove_file(&path);

    assert_eq!(settings.api_base_url, "https://solver.internal/api");
    assert_eq!(settings.request_timeout, Duration::from_secs(30));
    assert_eq!(settings.default_dataset, "large");
    assert_eq!(settings.default_algorithm, Algorithm::SimulatedAnnealing);
    assert_eq!(settings.experiment_runs, 20);
}

#[test]
fn environment_wins_over_file() {
    let path = scratch_file(
        "env-wins.toml",
        "api_base_url = \"http://from-file:3000/api\"\nexperiment_runs = 5\n",
    );

    let settings = load_settings_from(
        &path,
        env_from(&[
            ("APP__API_BASE_URL", "http://from-app-env:3000/api"),
            ("DASHBOARD_API_URL", "http://from-dashboard-env:4000/api"),
            ("APP__EXPERIMENT_RUNS", "30"),
            ("APP__DEFAULT_ALGORITHM", "greedy"),
        ]),
    )
    .expect("settings");
    let _ = fs::remove_file(&path);

    assert_eq!(settings.api_base_url, "http://from-dashboard-env:4000/api");
    assert_eq!(settings.experiment_runs, 30);
    assert_eq!(settings.default_algorithm, Algorithm::Greedy);
}

#[test]
fn blank_environment_values_are_ignored() {
    let settings = load_settings_from(
        Path::new("/nonexistent/dashboard.toml"),
        env_from(&[("DASHBOARD_API_URL", "   "), ("APP__DEFAULT_DATASET", "")]),
    )
    .expect("settings");

    assert_eq!(settings.api_base_url, "http://localhost:3000/api");
    assert_eq!(settings.default_dataset, "small");
}

#[test]
fn unparsable_numbers_are_reported_with_their_key() {
    let err = load_settings_from(
        Path::new("/nonexistent/dashboard.toml"),
        env_from(&[("APP__REQUEST_TIMEOUT_SECS", "soon")]),
    )
    .expect_err("timeout is not a number");

    assert!(matches!(
        err,
        SettingsError::InvalidValue {
            key: "APP__REQUEST_TIMEOUT_SECS",
            ..
        }
    ));
}

#[test]
fn malformed_file_is_a_parse_error() {
    let path = scratch_file("malformed.toml", "experiment_runs = \"ten\"\n");

    let err = load_settings_from(&path, env_from(&[])).expect_err("bad toml type");
    let _ = fs::remove_file(&path);

    assert!(matches!(err, SettingsError::Parse { .. }), "{err}");
}

#[test]
fn base_url_must_be_http() {
    assert_eq!(
        normalize_base_url(" http://localhost:3000/api// ").expect("valid"),
        "http://localhost:3000/api"
    );
    assert!(matches!(
        normalize_base_url("ftp://localhost/api"),
        Err(SettingsError::InvalidUrl { .. })
    ));
    assert!(matches!(
        normalize_base_url("localhost:3000"),
        Err(SettingsError::InvalidUrl { .. })
    ));
}

#[test]
fn command_line_overrides_apply_last() {
    let mut settings = DashboardSettings::default();

    settings
        .apply_overrides(SettingsOverrides {
            api_base_url: Some("http://10.0.0.5:3000/api/".into()),
            request_timeout_secs: Some(15),
            experiment_runs: None,
        })
        .expect("overrides");

    assert_eq!(settings.api_base_url, "http://10.0.0.5:3000/api");
    assert_eq!(settings.request_timeout, Duration::from_secs(15));
    assert_eq!(settings.experiment_runs, 10);

    let err = settings
        .apply_overrides(SettingsOverrides {
            api_base_url: Some("not a url".into()),
            ..SettingsOverrides::default()
        })
        .expect_err("invalid url");
    assert!(matches!(err, SettingsError::InvalidUrl { .. }));
}
