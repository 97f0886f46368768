//! CLI argument definitions for the Aegis chat assistant.
//!
//! Priority resolution: CLI args > env vars > config file > defaults.

use clap::Parser;
use std::path::PathBuf;

const CONFIG_ENV: &str = "AEGIS_CONFIG";

/// Aegis: a rule-based cybersecurity chat assistant.
#[derive(Parser, Debug)]
#[command(name = "aegis", version, about)]
pub struct CliArgs {
    /// Path to the configuration file.
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// Log level or filter directive (trace, debug, info, warn, error).
    #[arg(short = 'l', long = "log-level")]
    pub log_level: Option<String>,

    /// Seed for reply selection, for reproducible conversations.
    #[arg(short = 's', long = "seed")]
    pub seed: Option<u64>,

    /// Print each message analysis as JSON.
    #[arg(long = "json")]
    pub json: bool,
}

impl CliArgs {
    /// Resolve the configuration file path.
    ///
    /// Priority: --config flag > AEGIS_CONFIG env var > ~/.aegis/config.toml.
    pub fn resolve_config_path(&self) -> PathBuf {
        resolve_config_path_from(
            self.config.as_ref(),
            std::env::var(CONFIG_ENV).ok(),
            home_dir(),
        )
    }

    /// The tracing filter to install. `None` means "not overridden here";
    /// the caller falls back to RUST_LOG, then to the config file.
    pub fn resolve_log_level(&self) -> Option<String> {
        self.log_level.clone()
    }

    /// Reply seed: --seed flag > config file value.
    pub fn resolve_seed(&self, config_seed: Option<u64>) -> Option<u64> {
        self.seed.or(config_seed)
    }
}

fn resolve_config_path_from(
    flag: Option<&PathBuf>,
    env: Option<String>,
    home: Option<String>,
) -> PathBuf {
    if let Some(p) = flag {
        return p.clone();
    }
    if let Some(p) = env.filter(|p| !p.is_empty()) {
        return PathBuf::from(p);
    }
    match home {
        Some(home) => PathBuf::from(home).join(".aegis").join("config.toml"),
        None => PathBuf::from("config.toml"),
    }
}

fn home_dir() -> Option<String> {
    #[cfg(target_os = "windows")]
    let var = "USERPROFILE";
    #[cfg(not(target_os = "windows"))]
    let var = "HOME";
    std::env::var(var).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_all_flags() {
        let args = CliArgs::parse_from([
            "aegis",
            "--config",
            "/tmp/aegis.toml",
            "--log-level",
            "debug",
            "--seed",
            "7",
            "--json",
        ]);
        assert_eq!(args.config, Some(PathBuf::from("/tmp/aegis.toml")));
        assert_eq!(args.resolve_log_level().as_deref(), Some("debug"));
        assert_eq!(args.seed, Some(7));
        assert!(args.json);
    }

    #[test]
    fn test_parse_defaults() {
        let args = CliArgs::parse_from(["aegis"]);
        assert!(args.config.is_none());
        assert!(args.resolve_log_level().is_none());
        assert!(args.seed.is_none());
        assert!(!args.json);
    }

    #[test]
    fn test_short_flags() {
        let args = CliArgs::parse_from(["aegis", "-c", "a.toml", "-l", "warn", "-s", "3"]);
        assert_eq!(args.config, Some(PathBuf::from("a.toml")));
        assert_eq!(args.log_level.as_deref(), Some("warn"));
        assert_eq!(args.seed, Some(3));
    }

    #[test]
    fn test_invalid_seed_rejected() {
        assert!(CliArgs::try_parse_from(["aegis", "--seed", "abc"]).is_err());
    }

    #[test]
    fn test_config_path_flag_wins() {
        let flag = PathBuf::from("/etc/aegis.toml");
        let path = resolve_config_path_from(
            Some(&flag),
            Some("/env/aegis.toml".to_string()),
            Some("/home/u".to_string()),
        );
        assert_eq!(path, flag);
    }

    #[test]
    fn test_config_path_env_before_home() {
        let path = resolve_config_path_from(
            None,
            Some("/env/aegis.toml".to_string()),
            Some("/home/u".to_string()),
        );
        assert_eq!(path, PathBuf::from("/env/aegis.toml"));
    }

    #[test]
    fn test_config_path_home_default() {
        let path = resolve_config_path_from(None, Some(String::new()), Some("/home/u".to_string()));
        assert_eq!(path, PathBuf::from("/home/u").join(".aegis").join("config.toml"));

        let path = resolve_config_path_from(None, None, None);
        assert_eq!(path, PathBuf::from("config.toml"));
    }

    #[test]
    fn test_seed_flag_overrides_config() {
        let args = CliArgs::parse_from(["aegis", "--seed", "9"]);
        assert_eq!(args.resolve_seed(Some(1)), Some(9));

        let args = CliArgs::parse_from(["aegis"]);
        assert_eq!(args.resolve_seed(Some(1)), Some(1));
        assert_eq!(args.resolve_seed(None), None);
    }
}
