use super::LinguistConfig;
use anyhow::{Context, Result};
use figment::{
    Figment,
    providers::{Env, Format, Json, Toml, Yaml},
};
use std::path::Path;

// Embed the default config at compile time
const DEFAULT_CONFIG: &str = include_str!("../../default-config.toml");

/// Environment variables understood for compatibility with older deployments
const LEGACY_ENV: &[(&str, &str)] = &[
    ("PP_LINGUIST_URL", "oracle.url"),
    ("PP_LINGUIST_AUTH", "oracle.auth_token"),
    ("PP_LINGUIST_MAX_BUFFER", "exclusion.max_buffer_size"),
];

impl LinguistConfig {
    pub fn load() -> Result<Self> {
        Self::load_with_custom_config(None)
    }

    pub fn load_with_custom_config(custom_config: Option<&str>) -> Result<Self> {
        Self::figment(custom_config)
            .extract()
            .context("Failed to load linguist-gate configuration")
    }

    /// The layered figment, exposed so callers can merge their own providers
    pub fn figment(custom_config: Option<&str>) -> Figment {
        let mut figment = Figment::new().merge(Toml::string(DEFAULT_CONFIG)); // Embedded defaults

        if let Some(custom_path) = custom_config {
            // Only the explicit file, picked by extension
            figment = match Path::new(custom_path).extension().and_then(|e| e.to_str()) {
                Some("json") => figment.merge(Json::file(custom_path)),
                Some("yaml" | "yml") => figment.merge(Yaml::file(custom_path)),
                _ => figment.merge(Toml::file(custom_path)),
            };
        } else {
            figment = figment
                .merge(Toml::file("linguist-gate.toml"))
                .merge(Json::file("linguist-gate.json"))
                .merge(Yaml::file("linguist-gate.yaml"))
                .merge(Yaml::file("linguist-gate.yml"));
        }

        // Environment variables always have highest priority
        figment
            .merge(Env::prefixed("LINGUIST_GATE_").split("__"))
            .merge(
                Env::raw()
                    .only(&LEGACY_ENV.iter().map(|(name, _)| *name).collect::<Vec<_>>())
                    .map(|key| legacy_key(key.as_str()).into()),
            )
    }
}

fn legacy_key(name: &str) -> &'static str {
    LEGACY_ENV
        .iter()
        .find(|(env, _)| env.eq_ignore_ascii_case(name))
        .map_or("", |(_, key)| *key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn test_config_loads_defaults() {
        Jail::expect_with(|_| {
            let config = LinguistConfig::load().map_err(|e| e.to_string())?;
            assert_eq!(config, LinguistConfig::default());
            Ok(())
        });
    }

    #[test]
    fn test_repo_config_file() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "linguist-gate.toml",
                r#"
                [oracle]
                url = "https://linguist:25032"

                [exclusion]
                extra_extensions = [".jeff"]
                "#,
            )?;
            let config = LinguistConfig::load().map_err(|e| e.to_string())?;
            assert_eq!(config.oracle.url, "https://linguist:25032");
            assert_eq!(config.oracle.timeout_secs, 30);
            assert_eq!(config.exclusion.extra_extensions, vec![".jeff"]);
            Ok(())
        });
    }

    #[test]
    fn test_prefixed_env() {
        Jail::expect_with(|jail| {
            jail.set_env("LINGUIST_GATE_RETRY__MAX_ATTEMPTS", "3");
            jail.set_env("LINGUIST_GATE_CACHE__RESORT_INTERVAL", "7");
            let config = LinguistConfig::load().map_err(|e| e.to_string())?;
            assert_eq!(config.retry.max_attempts, 3);
            assert_eq!(config.cache.resort_interval, 7);
            Ok(())
        });
    }

    #[test]
    fn test_legacy_env() {
        Jail::expect_with(|jail| {
            jail.set_env("PP_LINGUIST_URL", "https://linguist:25032");
            jail.set_env("PP_LINGUIST_AUTH", "9876");
            jail.set_env("PP_LINGUIST_MAX_BUFFER", "10000");
            let config = LinguistConfig::load().map_err(|e| e.to_string())?;
            assert_eq!(config.oracle.url, "https://linguist:25032");
            assert_eq!(config.oracle.auth_token, "9876");
            assert_eq!(config.exclusion.max_buffer_size, 10_000);
            Ok(())
        });
    }

    #[test]
    fn test_custom_config_by_extension() {
        Jail::expect_with(|jail| {
            jail.create_file("custom.json", r#"{"retry": {"base_delay_ms": 5}}"#)?;
            let config = LinguistConfig::load_with_custom_config(Some("custom.json")).map_err(|e| e.to_string())?;
            assert_eq!(config.retry.base_delay_ms, 5);
            assert_eq!(config.retry.max_attempts, 10);
            Ok(())
        });
    }

    #[test]
    fn test_missing_custom_config_falls_back() {
        Jail::expect_with(|_| {
            let config = LinguistConfig::load_with_custom_config(Some("non_existent.toml"));
            assert!(config.is_ok(), "Should handle missing custom config gracefully");
            Ok(())
        });
    }
}
