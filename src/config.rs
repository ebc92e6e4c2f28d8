//! Runtime configuration.
//!
//! The only setting the calculator needs is where the calibration table
//! lives. Resolution order:
//!
//! 1. `--data <PATH>` on the command line
//! 2. `FEDO_DATA` in the environment (a `.env` file is honored)
//! 3. `<platform data dir>/fedo/feeding_data.json`
//! 4. `./feeding_data.json` when no platform data dir exists

use std::path::PathBuf;

/// Environment variable overriding the table location.
pub const DATA_ENV: &str = "FEDO_DATA";

/// File name of the calibration table.
pub const DATA_FILE: &str = "feeding_data.json";

/// Query-side bounds on the weight a user may ask about (kg, exclusive).
pub const WEIGHT_MIN_KG: f64 = 0.0;
pub const WEIGHT_MAX_KG: f64 = 100.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub data_path: PathBuf,
}

impl Config {
    pub fn resolve(cli_data: Option<PathBuf>) -> Self {
        dotenvy::dotenv().ok();
        let env_data = std::env::var_os(DATA_ENV).map(PathBuf::from);
        Self {
            data_path: resolve_data_path(cli_data, env_data, dirs::data_dir()),
        }
    }
}

fn resolve_data_path(cli: Option<PathBuf>, env: Option<PathBuf>, data_dir: Option<PathBuf>) -> PathBuf {
    cli.or(env)
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| match data_dir {
            Some(dir) => dir.join("fedo").join(DATA_FILE),
            None => PathBuf::from(DATA_FILE),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_beats_env_beats_default() {
        let dir = Some(PathBuf::from("/data"));
        assert_eq!(
            resolve_data_path(Some("a.json".into()), Some("b.json".into()), dir.clone()),
            PathBuf::from("a.json")
        );
        assert_eq!(
            resolve_data_path(None, Some("b.json".into()), dir.clone()),
            PathBuf::from("b.json")
        );
        assert_eq!(
            resolve_data_path(None, None, dir),
            PathBuf::from("/data/fedo/feeding_data.json")
        );
        assert_eq!(resolve_data_path(None, None, None), PathBuf::from(DATA_FILE));
    }
}
