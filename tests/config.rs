use serde_json::json;
use slackhook::{HookConfig, HookSettings, Level, SlackHook};
use std::io::Write;
use std::path::Path;
use std::time::Duration;
use tempfile::NamedTempFile;

#[test]
fn test_load_full_valid_config() {
    let toml_content = r##"
        endpoint_url = "https://hooks.slack.com/services/T000/B000/XXXX"
        icon_url = "https://example.com/icon.png"
        channel = "#alerts"
        icon_emoji = ":rotating_light:"
        username = "logbot"
        asynchronous = true
        disabled = false
        sort_fields = true
        accepted_levels = ["warning", "error", "fatal"]
        timeout_seconds = 5
        [sort_priorities]
        service = 10
        request_id = 5
        [extra_fields]
        service = "billing"
        replica = 3
    "##;

    figment::Jail::expect_with(|_jail| {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", toml_content).unwrap();

        let settings = HookSettings::load(Some(file.path())).unwrap();

        assert_eq!(
            settings.endpoint_url,
            "https://hooks.slack.com/services/T000/B000/XXXX"
        );
        assert_eq!(settings.icon_url, "https://example.com/icon.png");
        assert_eq!(settings.channel, "#alerts");
        assert_eq!(settings.icon_emoji, ":rotating_light:");
        assert_eq!(settings.username, "logbot");
        assert!(settings.asynchronous);
        assert!(!settings.disabled);
        assert!(settings.sort_fields);
        assert_eq!(
            settings.accepted_levels,
            vec![Level::Warn, Level::Error, Level::Fatal]
        );
        assert_eq!(settings.timeout_seconds, 5);
        assert_eq!(settings.sort_priorities["service"], 10);
        assert_eq!(settings.sort_priorities["request_id"], 5);
        assert_eq!(settings.extra_fields["service"], json!("billing"));
        assert_eq!(settings.extra_fields["replica"], json!(3));

        let config = HookConfig::from(settings);
        assert_eq!(config.timeout, Duration::from_secs(5));
        let hook = SlackHook::new(config);
        assert_eq!(hook.levels(), vec![Level::Warn, Level::Error, Level::Fatal]);
        Ok(())
    });
}

#[test]
fn test_load_without_file_uses_defaults() {
    figment::Jail::expect_with(|_jail| {
        let settings = HookSettings::load(None).unwrap();
        assert_eq!(settings, HookSettings::default());
        Ok(())
    });
}

#[test]
fn test_partial_config_keeps_defaults() {
    figment::Jail::expect_with(|jail| {
        jail.create_file("hook.toml", r##"channel = "#ops""##)?;

        let settings = HookSettings::load(Some(Path::new("hook.toml"))).unwrap();

        assert_eq!(settings.channel, "#ops");
        assert!(settings.endpoint_url.is_empty());
        assert!(settings.accepted_levels.is_empty());
        assert_eq!(settings.timeout_seconds, 10);
        Ok(())
    });
}

#[test]
fn test_env_overrides_file() {
    figment::Jail::expect_with(|jail| {
        jail.create_file(
            "hook.toml",
            r#"
                endpoint_url = "https://from-file.example.com"
                disabled = false
            "#,
        )?;
        jail.set_env("SLACKHOOK_ENDPOINT_URL", "https://from-env.example.com");
        jail.set_env("SLACKHOOK_DISABLED", "true");

        let settings = HookSettings::load(Some(Path::new("hook.toml"))).unwrap();

        assert_eq!(settings.endpoint_url, "https://from-env.example.com");
        assert!(settings.disabled);
        Ok(())
    });
}

#[test]
fn test_invalid_level_is_rejected() {
    figment::Jail::expect_with(|jail| {
        jail.create_file("hook.toml", r#"accepted_levels = ["loud"]"#)?;

        assert!(HookSettings::load(Some(Path::new("hook.toml"))).is_err());
        Ok(())
    });
}

#[test]
fn test_zero_timeout_is_rejected() {
    figment::Jail::expect_with(|jail| {
        jail.create_file("hook.toml", "timeout_seconds = 0")?;

        let err = HookSettings::load(Some(Path::new("hook.toml"))).unwrap_err();

        assert!(err.to_string().contains("timeout_seconds"));
        Ok(())
    });
}
