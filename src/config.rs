use std::fs::File;
use std::io::{self, BufRead};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;
use crate::heuristic::{DegreeScored, RandomSample, SelectionStrategy};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("line {line}: expected 'key:value'")]
    Format { line: usize },
    #[error("line {line}: unknown key '{key}'")]
    UnknownKey { line: usize, key: String },
    #[error("line {line}: invalid value '{value}' for '{key}'")]
    InvalidValue { line: usize, key: String, value: String },
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StrategyKind {
    /// degree-based scoring of reconnection edges (deterministic)
    #[default]
    Scored,
    /// uniform random sampling of reconnection edges
    Random,
}

impl FromStr for StrategyKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "scored" => Ok(StrategyKind::Scored),
            "random" => Ok(StrategyKind::Random),
            other => Err(format!("unknown strategy '{other}' (expected 'scored' or 'random')")),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SolverConfig {
    pub strategy: StrategyKind,
    pub seed: Option<u64>,          // seed for the random strategy (None -> entropy)
    pub max_iterations: Option<usize>,
    pub time_limit: Option<Duration>,
}

impl SolverConfig {
    pub fn selection_strategy(&self) -> Box<dyn SelectionStrategy> {
        match self.strategy {
            StrategyKind::Scored => Box::new(DegreeScored),
            StrategyKind::Random => Box::new(RandomSample::new(self.seed)),
        }
    }
}

/// reads a config file of 'key:value' lines ('#' starts a comment line)
///   strategy:scored|random
///   seed:<u64>
///   max_iterations:<usize>   (0 -> unlimited)
///   time_limit:<seconds>     (0 -> unlimited)
pub fn read_config<P: AsRef<Path>>(file: P) -> Result<SolverConfig, ConfigError> {
    let path = file.as_ref();
    let io_err = |source| ConfigError::Io { path: path.to_path_buf(), source };
    let f = File::open(path).map_err(io_err)?;
    let mut config = SolverConfig::default();
    for (idx, line) in io::BufReader::new(f).lines().enumerate() {
        let line = line.map_err(io_err)?;
        let line_no = idx + 1;
        if line.trim().is_empty() || line.starts_with('#') {
            continue;
        }
        let (key, value) = line.split_once(':').ok_or(ConfigError::Format { line: line_no })?;
        let (key, value) = (key.trim(), value.trim());
        let invalid = || ConfigError::InvalidValue {
            line: line_no,
            key: key.to_string(),
            value: value.to_string(),
        };
        match key {
            "strategy" => config.strategy = value.parse().map_err(|_| invalid())?,
            "seed" => config.seed = Some(value.parse().map_err(|_| invalid())?),
            "max_iterations" => {
                let it: usize = value.parse().map_err(|_| invalid())?;
                config.max_iterations = (it > 0).then_some(it);
            },
            "time_limit" => {
                let t: f64 = value.parse().map_err(|_| invalid())?;
                if !t.is_finite() || t < 0.0 {
                    return Err(invalid());
                }
                config.time_limit = (t > 0.0).then(|| Duration::from_secs_f64(t));
            },
            _ => return Err(ConfigError::UnknownKey { line: line_no, key: key.to_string() }),
        }
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::time::Duration;
    use crate::config::*;

    fn write_config(content: &str) -> tempfile::NamedTempFile {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(content.as_bytes()).unwrap();
        f
    }

    #[test]
    fn test_read_config() {
        let f = write_config("# mbvst config\nstrategy: random\nseed:42\n\nmax_iterations:50\ntime_limit:1.5\n");
        let config = read_config(f.path()).unwrap();
        assert_eq!(config.strategy, StrategyKind::Random);
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.max_iterations, Some(50));
        assert_eq!(config.time_limit, Some(Duration::from_millis(1500)));
        assert_eq!(config.selection_strategy().name(), "random");

        let f = write_config("max_iterations:0\ntime_limit:0\n");
        assert_eq!(read_config(f.path()).unwrap(), SolverConfig::default());
        assert_eq!(SolverConfig::default().selection_strategy().name(), "scored");
    }

    #[test]
    fn test_read_config_errors() {
        assert!(matches!(read_config(write_config("strategy=scored\n").path()),
                         Err(ConfigError::Format { line: 1 })));
        assert!(matches!(read_config(write_config("# c\nsolver:1\n").path()),
                         Err(ConfigError::UnknownKey { line: 2, .. })));
        assert!(matches!(read_config(write_config("strategy:greedy\n").path()),
                         Err(ConfigError::InvalidValue { .. })));
        assert!(matches!(read_config(write_config("time_limit:-3\n").path()),
                         Err(ConfigError::InvalidValue { .. })));
        assert!(matches!(read_config("no/such/config.txt"), Err(ConfigError::Io { .. })));
    }
}
