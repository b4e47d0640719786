use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

use log::warn;
use macroquad::prelude::*;
use serde::Deserialize;

use crate::input::key_from_name;

pub const OPTIONS_FILE: &str = "options.yaml";

const MAX_PLAYERS: usize = 4;
const DEFAULT_NAME: &str = "AAA";
const DEFAULT_SKIN: &str = "ember";
const DEFAULT_JUMP_KEYS: [KeyCode; 3] = [KeyCode::Space, KeyCode::RightShift, KeyCode::LeftShift];

#[derive(Clone, Debug)]
pub struct PlayerOptions {
    pub skin: String,
    pub jump_key: KeyCode,
}

#[derive(Clone, Debug)]
pub struct Options {
    pub name: String,
    pub seed: Option<u64>,
    pub players: Vec<PlayerOptions>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            name: DEFAULT_NAME.to_string(),
            seed: None,
            players: vec![PlayerOptions {
                skin: DEFAULT_SKIN.to_string(),
                jump_key: DEFAULT_JUMP_KEYS[0],
            }],
        }
    }
}

impl Options {
    // Reads the options file, falling back to defaults when it is absent.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        match fs::read_to_string(&path) {
            Ok(text) => Self::parse(&text),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                warn!("options file {:?} not found, using defaults", path.as_ref());
                Ok(Self::default())
            }
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        let file: OptionsFile = serde_yaml::from_str(text)?;

        let seats = file.players.unwrap_or_else(|| vec![PlayerFile::default()]);
        if seats.is_empty() || seats.len() > MAX_PLAYERS {
            return Err(ConfigError::PlayerCount(seats.len()));
        }

        let mut players = Vec::with_capacity(seats.len());
        for (i, seat) in seats.into_iter().enumerate() {
            let jump_key = match seat.jump_key {
                Some(name) => key_from_name(&name).ok_or(ConfigError::UnknownKey(name))?,
                None => *DEFAULT_JUMP_KEYS.get(i).unwrap_or(&DEFAULT_JUMP_KEYS[0]),
            };
            players.push(PlayerOptions {
                skin: seat.skin.unwrap_or_else(|| DEFAULT_SKIN.to_string()),
                jump_key,
            });
        }

        Ok(Self {
            name: file.name.unwrap_or_else(|| DEFAULT_NAME.to_string()),
            seed: file.seed,
            players,
        })
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io(io::Error),
    Yaml(serde_yaml::Error),
    UnknownKey(String),
    PlayerCount(usize),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(err) => write!(f, "options file io error: {}", err),
            ConfigError::Yaml(err) => write!(f, "options file parse error: {}", err),
            ConfigError::UnknownKey(name) => write!(f, "unknown key name {:?}", name),
            ConfigError::PlayerCount(n) => {
                write!(f, "player count {} outside 1..={}", n, MAX_PLAYERS)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<io::Error> for ConfigError {
    fn from(err: io::Error) -> Self {
        ConfigError::Io(err)
    }
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(err: serde_yaml::Error) -> Self {
        ConfigError::Yaml(err)
    }
}

#[derive(Debug, Deserialize)]
struct OptionsFile {
    name: Option<String>,
    seed: Option<u64>,
    players: Option<Vec<PlayerFile>>,
}

#[derive(Debug, Default, Deserialize)]
struct PlayerFile {
    skin: Option<String>,
    jump_key: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let opts = Options::load("does-not-exist.yaml").unwrap();
        assert_eq!(opts.name, "AAA");
        assert_eq!(opts.seed, None);
        assert_eq!(opts.players.len(), 1);
        assert_eq!(opts.players[0].skin, "ember");
        assert_eq!(opts.players[0].jump_key, KeyCode::Space);
    }

    #[test]
    fn parses_a_full_options_file() {
        let text = "\
name: ZED
seed: 1234
players:
  - skin: ember
    jump_key: Space
  - skin: slate
    jump_key: RShift
";
        let opts = Options::parse(text).unwrap();
        assert_eq!(opts.name, "ZED");
        assert_eq!(opts.seed, Some(1234));
        assert_eq!(opts.players.len(), 2);
        assert_eq!(opts.players[1].skin, "slate");
        assert_eq!(opts.players[1].jump_key, KeyCode::RightShift);
    }

    #[test]
    fn fills_default_jump_keys_by_seat() {
        let text = "\
players:
  - skin: ember
  - skin: slate
  - skin: moss
  - skin: dune
";
        let opts = Options::parse(text).unwrap();
        let keys: Vec<KeyCode> = opts.players.iter().map(|p| p.jump_key).collect();
        assert_eq!(
            keys,
            vec![
                KeyCode::Space,
                KeyCode::RightShift,
                KeyCode::LeftShift,
                KeyCode::Space,
            ]
        );
    }

    #[test]
    fn rejects_unknown_key_names() {
        let text = "\
players:
  - jump_key: Warp
";
        let err = Options::parse(text).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownKey(name) if name == "Warp"));
    }

    #[test]
    fn rejects_a_player_count_outside_the_range() {
        let text = "players: []\n";
        assert!(matches!(
            Options::parse(text).unwrap_err(),
            ConfigError::PlayerCount(0)
        ));

        let text = "\
players:
  - {}
  - {}
  - {}
  - {}
  - {}
";
        assert!(matches!(
            Options::parse(text).unwrap_err(),
            ConfigError::PlayerCount(5)
        ));
    }
}
