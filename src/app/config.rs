use std::env;

use log::warn;

pub const DEFAULT_PROMPT: &str = "msh> ";
pub const DEFAULT_MAX_JOBS: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub prompt: String,
    /// Upper bound on tracked background jobs.
    pub max_jobs: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            prompt: DEFAULT_PROMPT.to_string(),
            max_jobs: DEFAULT_MAX_JOBS,
        }
    }
}

impl Config {
    /// Reads `MSH_PROMPT` and `MSH_MAX_JOBS`, keeping defaults for anything unset.
    pub fn from_env() -> Self {
        Self::from_values(env::var("MSH_PROMPT").ok(), env::var("MSH_MAX_JOBS").ok())
    }

    fn from_values(prompt: Option<String>, max_jobs: Option<String>) -> Self {
        let mut config = Config::default();
        if let Some(prompt) = prompt {
            config.prompt = prompt;
        }
        if let Some(raw) = max_jobs {
            match raw.trim().parse() {
                Ok(max_jobs) => config.max_jobs = max_jobs,
                Err(e) => warn!(
                    "Ignoring MSH_MAX_JOBS={:?} ({}), using {}",
                    raw, e, DEFAULT_MAX_JOBS
                ),
            }
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_unset() {
        assert_eq!(Config::from_values(None, None), Config::default());
        assert_eq!(Config::default().max_jobs, 100);
    }

    #[test]
    fn overrides_are_applied() {
        let config = Config::from_values(Some("$ ".to_string()), Some(" 3 ".to_string()));
        assert_eq!(config.prompt, "$ ");
        assert_eq!(config.max_jobs, 3);
    }

    #[test]
    fn very_large_max_jobs_is_accepted() {
        let config = Config::from_values(None, Some("1000000000000000000".to_string()));
        assert_eq!(config.max_jobs, 1_000_000_000_000_000_000);
    }

    #[test]
    fn bad_max_jobs_falls_back_to_default() {
        let config = Config::from_values(None, Some("lots".to_string()));
        assert_eq!(config.max_jobs, DEFAULT_MAX_JOBS);
    }
}
