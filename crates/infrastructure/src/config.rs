use chrono::{TimeDelta, Weekday};
use config::{Config, ConfigError, Environment, File};
use domain::Calendar;
use domain::facts::NormalizerConfig;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct TallySettings {
    /// Hosts that have not synced for this many hours before start of today are ignored
    pub host_last_sync_threshold_hours: i64,
    /// First day of a WEEKLY bucket
    pub week_start: Weekday,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RegistrySettings {
    pub tag_profile_path: String,
    pub rhel_product_list_path: String,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct DatabaseSettings {
    /// Snapshots are kept in memory when unset
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_max_connections() -> u32 {
    5
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApiSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub tally: TallySettings,
    pub registry: RegistrySettings,
    #[serde(default)]
    pub database: DatabaseSettings,
    pub api: ApiSettings,
}

impl Settings {
    pub fn load(config_dir: &str) -> Result<Self, ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = Config::builder()
            .set_default("tally.host_last_sync_threshold_hours", 24)?
            .set_default("tally.week_start", "Sunday")?
            .set_default("registry.tag_profile_path", format!("{}/tag_profile.yaml", config_dir))?
            .set_default(
                "registry.rhel_product_list_path",
                format!("{}/rhel_product_list.txt", config_dir),
            )?
            .set_default("api.host", "0.0.0.0")?
            .set_default("api.port", 8000)?
            // Required so a service never starts on defaults alone, e.g. config/default.yaml
            .add_source(File::with_name(&format!("{}/default", config_dir)).required(true))
            .add_source(File::with_name(&format!("{}/{}", config_dir, run_mode)).required(false))
            // Environment variables (e.g. TALLY__DATABASE__URL=postgres://...)
            .add_source(Environment::with_prefix("TALLY").separator("__"))
            .build()?;

        s.try_deserialize()
    }

    pub fn normalizer_config(&self) -> NormalizerConfig {
        NormalizerConfig {
            host_last_sync_threshold: TimeDelta::hours(self.tally.host_last_sync_threshold_hours),
        }
    }

    pub fn calendar(&self) -> Calendar {
        Calendar::new(self.tally.week_start)
    }
}
