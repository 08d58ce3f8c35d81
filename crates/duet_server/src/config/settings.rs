//! Configuration settings structures.

use duet_protocol::SceneId;
use serde::{Deserialize, Serialize};

/// Root configuration object, serialized to/from TOML.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct Config {
    /// Network settings.
    pub server: ServerSettings,
    /// Story content and starting-scene policy.
    pub story: StorySettings,
    /// Optional logging configuration.
    pub logging: Option<LoggingSettings>,
}

/// Network configuration.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct ServerSettings {
    /// Address to bind, "IP:PORT". The `PORT` environment variable, when
    /// set, overrides the port portion.
    pub listen_addr: String,
}

/// Story content configuration.
///
/// The two starting scenes encode the paired-thread design: the players
/// begin on distinct entry points of the graph and their branches may
/// later converge.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct StorySettings {
    /// Path to the authored story document served at `/game-data.json`.
    pub data_file: String,

    /// Directory of static presentation assets served at `/`.
    pub static_dir: String,

    /// Scene id assigned to the player occupying slot 1 on join.
    pub player1_start: SceneId,

    /// Scene id assigned to the player occupying slot 2 on join.
    pub player2_start: SceneId,
}

/// Logging configuration.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct LoggingSettings {
    /// Level filter: "trace", "debug", "info", "warn", "error".
    pub level: String,

    /// Emit structured JSON log output.
    pub json_format: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerSettings {
                listen_addr: "0.0.0.0:3000".to_string(),
            },
            story: StorySettings {
                data_file: "game-data.json".to_string(),
                static_dir: "public".to_string(),
                player1_start: 1,
                player2_start: 50,
            },
            logging: Some(LoggingSettings {
                level: "info".to_string(),
                json_format: false,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.server.listen_addr, "0.0.0.0:3000");
        assert_eq!(config.story.player1_start, 1);
        assert_eq!(config.story.player2_start, 50);
        assert!(config.logging.is_some());
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let toml_str = toml::to_string(&config).unwrap();
        let deserialized: Config = toml::from_str(&toml_str).unwrap();

        assert_eq!(config.server.listen_addr, deserialized.server.listen_addr);
        assert_eq!(config.story.data_file, deserialized.story.data_file);
        assert_eq!(config.story.player2_start, deserialized.story.player2_start);
    }

    #[test]
    fn test_toml_parsing() {
        let toml_str = r#"
[server]
listen_addr = "127.0.0.1:8080"

[story]
data_file = "content/story.json"
static_dir = "www"
player1_start = 10
player2_start = 60

[logging]
level = "debug"
json_format = true
        "#;

        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.server.listen_addr, "127.0.0.1:8080");
        assert_eq!(config.story.data_file, "content/story.json");
        assert_eq!(config.story.player1_start, 10);
        assert!(config.logging.unwrap().json_format);
    }
}
