//! Monitor configuration: defaults, optional TOML file, and validation.

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{ConfigError, ConfigResult};

/// A site assumed to be reachable whenever local connectivity works.
pub const DEFAULT_BASELINE_URL: &str = "https://google.com";

pub const DEFAULT_INTERVAL_SECS: f64 = 5.0;

/// Fixed timeout for the baseline check, independent of the interval.
pub const BASELINE_TIMEOUT: Duration = Duration::from_secs(1);

/// Upper bound on the target probe timeout.
pub const MAX_TARGET_TIMEOUT: Duration = Duration::from_secs(1);

/// How records are spread across files in the log directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Rotation {
    /// One file per local calendar day: `YYYY-MM-DD.log`.
    #[default]
    Daily,
    /// One file per process run: `run-<epoch>.log`.
    PerRun,
}

impl FromStr for Rotation {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "daily" => Ok(Rotation::Daily),
            "per-run" | "run" => Ok(Rotation::PerRun),
            other => Err(ConfigError::UnknownRotation(other.to_string())),
        }
    }
}

/// On-disk config file. Every key is optional; command-line flags
/// are layered on top before resolving into a [`MonitorConfig`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub target: Option<String>,
    pub baseline: Option<String>,
    pub log_directory: Option<PathBuf>,
    pub interval: Option<f64>,
    pub rotation: Option<Rotation>,
    pub proxy: Option<bool>,
}

impl FileConfig {
    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Resolved, validated monitor settings. Immutable once the monitor starts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonitorConfig {
    pub target_url: String,
    pub baseline_url: String,
    pub log_directory: PathBuf,
    pub interval_secs: f64,
    pub rotation: Rotation,
    /// Route probes through the `HTTP(S)_PROXY` environment proxies.
    pub proxy: bool,
}

impl MonitorConfig {
    /// Config for `target_url` with every other setting at its default.
    pub fn new(target_url: impl Into<String>) -> Self {
        Self {
            target_url: target_url.into(),
            baseline_url: DEFAULT_BASELINE_URL.to_string(),
            log_directory: default_log_directory(),
            interval_secs: DEFAULT_INTERVAL_SECS,
            rotation: Rotation::Daily,
            proxy: true,
        }
    }

    pub fn with_baseline(mut self, url: impl Into<String>) -> Self {
        self.baseline_url = url.into();
        self
    }

    pub fn with_log_directory(mut self, dir: impl Into<PathBuf>) -> Self {
        self.log_directory = dir.into();
        self
    }

    pub fn with_interval(mut self, secs: f64) -> Self {
        self.interval_secs = secs;
        self
    }

    pub fn with_rotation(mut self, rotation: Rotation) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_proxy(mut self, proxy: bool) -> Self {
        self.proxy = proxy;
        self
    }

    /// Fill defaults for anything the file left out, then validate.
    pub fn resolve(file: FileConfig) -> ConfigResult<Self> {
        let target = file.target.ok_or(ConfigError::MissingTarget)?;
        let mut config = Self::new(target);
        if let Some(baseline) = file.baseline {
            config.baseline_url = baseline;
        }
        if let Some(dir) = file.log_directory {
            config.log_directory = dir;
        }
        if let Some(interval) = file.interval {
            config.interval_secs = interval;
        }
        if let Some(rotation) = file.rotation {
            config.rotation = rotation;
        }
        if let Some(proxy) = file.proxy {
            config.proxy = proxy;
        }
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        check_url(&self.target_url)?;
        check_url(&self.baseline_url)?;
        if !self.interval_secs.is_finite() || self.interval_secs < 0.0 {
            return Err(ConfigError::InvalidInterval(self.interval_secs));
        }
        Ok(())
    }

    /// Poll interval as a `Duration`. Invalid intervals collapse to zero.
    pub fn interval(&self) -> Duration {
        Duration::try_from_secs_f64(self.interval_secs).unwrap_or(Duration::ZERO)
    }

    /// Target probe timeout: `min(1s, interval)`.
    pub fn target_timeout(&self) -> Duration {
        self.interval().min(MAX_TARGET_TIMEOUT)
    }
}

/// `logs/` next to the running executable, or `./logs` if that can't be found.
pub fn default_log_directory() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join("logs")))
        .unwrap_or_else(|| PathBuf::from("logs"))
}

/// Accept only absolute `http`/`https` URLs that name a host.
fn check_url(raw: &str) -> ConfigResult<()> {
    let invalid = || ConfigError::InvalidUrl(raw.to_string());
    let parsed = Url::parse(raw).map_err(|_| invalid())?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(invalid());
    }
    match parsed.host_str() {
        Some(host) if !host.is_empty() => Ok(()),
        _ => Err(invalid()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = MonitorConfig::new("https://example.com");
        assert_eq!(config.baseline_url, DEFAULT_BASELINE_URL);
        assert_eq!(config.interval_secs, 5.0);
        assert_eq!(config.rotation, Rotation::Daily);
        assert!(config.log_directory.ends_with("logs"));
        assert!(config.proxy);
        config.validate().unwrap();
    }

    #[test]
    fn target_timeout_is_capped_at_one_second() {
        let config = MonitorConfig::new("http://a").with_interval(30.0);
        assert_eq!(config.target_timeout(), Duration::from_secs(1));

        let config = MonitorConfig::new("http://a").with_interval(0.25);
        assert_eq!(config.target_timeout(), Duration::from_millis(250));
    }

    #[test]
    fn rejects_negative_and_non_finite_intervals() {
        for bad in [-1.0, f64::NAN, f64::INFINITY] {
            let err = MonitorConfig::new("http://a")
                .with_interval(bad)
                .validate()
                .unwrap_err();
            assert!(matches!(err, ConfigError::InvalidInterval(_)));
        }
        MonitorConfig::new("http://a").with_interval(0.0).validate().unwrap();
    }

    #[test]
    fn rejects_non_http_urls() {
        for bad in ["ftp://example.com", "example.com", "http://", "mailto:ops@example.com"] {
            let err = MonitorConfig::new(bad).validate().unwrap_err();
            assert!(matches!(err, ConfigError::InvalidUrl(_)), "{bad}");
        }
        let err = MonitorConfig::new("http://a")
            .with_baseline("nope")
            .validate()
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidUrl(_)));
    }

    #[test]
    fn rejects_malformed_urls() {
        for bad in [
            "http://exa mple.com",
            "http://[::1",
            "https://:80",
            "http://a b/c",
            "http://exa<mple.com/",
        ] {
            let err = MonitorConfig::new(bad).validate().unwrap_err();
            assert!(matches!(err, ConfigError::InvalidUrl(_)), "{bad}");

            let err = MonitorConfig::new("http://a")
                .with_baseline(bad)
                .validate()
                .unwrap_err();
            assert!(matches!(err, ConfigError::InvalidUrl(_)), "baseline {bad}");
        }
    }

    #[test]
    fn accepts_ports_paths_and_ip_hosts() {
        for good in [
            "http://127.0.0.1:8080/health",
            "https://[::1]/",
            "https://gitlab.example.com/users/sign_in?x=1",
        ] {
            MonitorConfig::new(good).validate().unwrap();
        }
    }

    #[test]
    fn resolve_requires_target() {
        let err = MonitorConfig::resolve(FileConfig::default()).unwrap_err();
        assert!(matches!(err, ConfigError::MissingTarget));
    }

    #[test]
    fn parse_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pingwatch.toml");
        std::fs::write(
            &path,
            r#"
target = "https://gitlab.example.com"
baseline = "https://example.org"
log_directory = "/var/log/pingwatch"
interval = 2.5
rotation = "per-run"
proxy = false
"#,
        )
        .unwrap();

        let file = FileConfig::from_file(&path).unwrap();
        let config = MonitorConfig::resolve(file).unwrap();
        assert_eq!(config.target_url, "https://gitlab.example.com");
        assert_eq!(config.baseline_url, "https://example.org");
        assert_eq!(config.log_directory, PathBuf::from("/var/log/pingwatch"));
        assert_eq!(config.interval_secs, 2.5);
        assert_eq!(config.rotation, Rotation::PerRun);
        assert!(!config.proxy);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "target = \"http://a\"\nretries = 3\n").unwrap();
        let err = FileConfig::from_file(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = FileConfig::from_file(Path::new("/nonexistent/pingwatch.toml")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/pingwatch.toml"));
    }

    #[test]
    fn rotation_from_str() {
        assert_eq!("daily".parse::<Rotation>().unwrap(), Rotation::Daily);
        assert_eq!("per-run".parse::<Rotation>().unwrap(), Rotation::PerRun);
        assert!("hourly".parse::<Rotation>().is_err());
    }
}
