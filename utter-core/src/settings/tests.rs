use tempfile::TempDir;

use crate::error::SpeechError;
use crate::settings::config::Settings;
use crate::settings::manager::SettingsManager;

#[test]
fn from_path_writes_a_default_settings_file() {
    let temp_dir = TempDir::new().unwrap();
    let settings_path = temp_dir.path().join("settings.toml");

    let manager = SettingsManager::from_path(settings_path.clone()).unwrap();

    assert!(settings_path.exists());
    assert_eq!(manager.settings(), Settings::default());
    assert_eq!(manager.settings().voice, "Kore");
}

#[test]
fn corrupted_settings_are_backed_up_and_replaced_with_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let settings_path = temp_dir.path().join("settings.toml");
    std::fs::write(&settings_path, "voice = [not toml").unwrap();

    let manager = SettingsManager::from_path(settings_path.clone()).unwrap();

    assert_eq!(manager.settings(), Settings::default());
    assert!(settings_path.with_extension("toml.backup").exists());
}

#[test]
fn update_and_save_round_trips() {
    let temp_dir = TempDir::new().unwrap();
    let settings_path = temp_dir.path().join("settings.toml");

    let manager = SettingsManager::from_path(settings_path.clone()).unwrap();
    manager.update_settings(|s| {
        s.api_key = Some("k".to_string());
        s.voice = "Puck".to_string();
    });
    manager.save().unwrap();

    let reloaded = SettingsManager::from_path(settings_path).unwrap();
    assert_eq!(reloaded.settings().api_key.as_deref(), Some("k"));
    assert_eq!(reloaded.settings().voice, "Puck");
}

#[test]
fn environment_key_wins_over_configured_key() {
    let key = Settings::pick_api_key(Some("from-env".to_string()), Some("from-file")).unwrap();
    assert_eq!(key, "from-env");
}

#[test]
fn configured_key_is_used_when_environment_is_empty() {
    let key = Settings::pick_api_key(Some("  ".to_string()), Some("from-file")).unwrap();
    assert_eq!(key, "from-file");
}

#[test]
fn missing_key_is_a_configuration_error() {
    let err = Settings::pick_api_key(None, None).unwrap_err();
    assert!(matches!(err, SpeechError::MissingApiKey));

    let err = Settings::pick_api_key(None, Some("   ")).unwrap_err();
    assert!(matches!(err, SpeechError::MissingApiKey));
}
