//! Layered configuration: built-in defaults, then `config.toml` in the working directory
//! (optional), then `TABLECAST_*` environment variables. Nested keys use `__`, e.g.
//! `TABLECAST_SYNC__OBSERVER_QUEUE_CAPACITY=16`.

mod basic;
mod sync;

pub use basic::BasicConfig;
pub use sync::SyncConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

const CONFIG_FILE: &str = "config.toml";
const ENV_PREFIX: &str = "TABLECAST_";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub basic: BasicConfig,

    #[serde(default)]
    pub sync: SyncConfig,
}

impl Config {
    pub fn figment() -> Figment {
        // A missing file contributes nothing.
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(CONFIG_FILE))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    pub fn load() -> Result<Self, figment::Error> {
        Self::figment().extract()
    }
}

/// Process-wide configuration for the binary. Malformed input aborts startup.
pub static CONFIG: LazyLock<Config> = LazyLock::new(|| {
    Config::load().unwrap_or_else(|err| panic!("failed to load configuration: {err}"))
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_values_override_defaults_field_by_field() {
        let cfg: Config = Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::string(
                r"
                [basic]
                listen_port = 9100

                [sync]
                observer_queue_capacity = 8
                ",
            ))
            .extract()
            .unwrap();

        assert_eq!(cfg.basic.listen_port, 9100);
        assert_eq!(cfg.basic.loglevel, "info");
        assert_eq!(cfg.sync.observer_queue_capacity, 8);
        assert_eq!(cfg.sync.keep_alive_secs, 15);
    }

    #[test]
    fn env_nests_with_double_underscore() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("TABLECAST_BASIC__LISTEN_PORT", "9200");
            jail.set_env("TABLECAST_SYNC__KEEP_ALIVE_SECS", "3");
            let cfg = Config::load()?;
            assert_eq!(cfg.basic.listen_port, 9200);
            assert_eq!(cfg.sync.keep_alive_secs, 3);
            Ok(())
        });
    }
}
