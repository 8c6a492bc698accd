use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::time::Duration;

pub const DEFAULT_MAX_ATTEMPTS: u32 = 60;
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(10);
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8001";
pub const DEFAULT_PROVIDER: &str = "aws";

/// Knobs of the readiness loop. Defaults: 60 rounds, 10 s apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollerSettings {
    pub max_attempts: u32,
    pub poll_interval: Duration,
}

impl Default for PollerSettings {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

impl PollerSettings {
    /// Worst-case time spent waiting between rounds. Saturates at `Duration::MAX`.
    pub fn max_wait(&self) -> Duration {
        self.poll_interval
            .saturating_mul(self.max_attempts.saturating_sub(1))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub provider: String,
    pub bind_addr: SocketAddr,
    pub poller: PollerSettings,
    pub aws_region_override: Option<String>,
    pub mock_ready_after_rounds: u32,
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as `from_env` but reads variables through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let provider = var("PROVIDER")
            .map(|p| p.to_lowercase())
            .unwrap_or_else(|| DEFAULT_PROVIDER.to_string());

        let bind_addr = var("READINESS_BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr: SocketAddr = bind_addr
            .parse()
            .with_context(|| format!("READINESS_BIND_ADDR is not a socket address: {}", bind_addr))?;

        let max_attempts = match var("READINESS_MAX_ATTEMPTS") {
            Some(raw) => raw
                .parse::<u32>()
                .with_context(|| format!("READINESS_MAX_ATTEMPTS must be a positive integer, got {}", raw))?,
            None => DEFAULT_MAX_ATTEMPTS,
        };
        if max_attempts == 0 {
            anyhow::bail!("READINESS_MAX_ATTEMPTS must be at least 1");
        }

        let poll_interval = match var("READINESS_POLL_INTERVAL_SECS") {
            Some(raw) => Duration::from_secs(raw.parse::<u64>().with_context(|| {
                format!("READINESS_POLL_INTERVAL_SECS must be a whole number of seconds, got {}", raw)
            })?),
            None => DEFAULT_POLL_INTERVAL,
        };

        let mock_ready_after_rounds = match var("MOCK_READY_AFTER_ROUNDS") {
            Some(raw) => raw
                .parse::<u32>()
                .with_context(|| format!("MOCK_READY_AFTER_ROUNDS must be an integer, got {}", raw))?,
            None => 1,
        };

        Ok(Self {
            provider,
            bind_addr,
            poller: PollerSettings {
                max_attempts,
                poll_interval,
            },
            aws_region_override: var("AWS_REGION_OVERRIDE"),
            mock_ready_after_rounds,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings(vars: &[(&str, &str)]) -> Result<Settings> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|k| map.get(k).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        let s = settings(&[]).unwrap();
        assert_eq!(s.provider, "aws");
        assert_eq!(s.bind_addr, "0.0.0.0:8001".parse().unwrap());
        assert_eq!(s.poller, PollerSettings::default());
        assert_eq!(s.poller.max_attempts, 60);
        assert_eq!(s.poller.poll_interval, Duration::from_secs(10));
        assert_eq!(s.aws_region_override, None);
        assert_eq!(s.mock_ready_after_rounds, 1);
    }

    #[test]
    fn overrides_are_parsed_and_trimmed() {
        let s = settings(&[
            ("PROVIDER", " Mock "),
            ("READINESS_MAX_ATTEMPTS", "5"),
            ("READINESS_POLL_INTERVAL_SECS", "2"),
            ("READINESS_BIND_ADDR", "127.0.0.1:9000"),
            ("AWS_REGION_OVERRIDE", "ca-central-1"),
            ("MOCK_READY_AFTER_ROUNDS", "3"),
        ])
        .unwrap();
        assert_eq!(s.provider, "mock");
        assert_eq!(s.poller.max_attempts, 5);
        assert_eq!(s.poller.poll_interval, Duration::from_secs(2));
        assert_eq!(s.bind_addr, "127.0.0.1:9000".parse().unwrap());
        assert_eq!(s.aws_region_override.as_deref(), Some("ca-central-1"));
        assert_eq!(s.mock_ready_after_rounds, 3);
    }

    #[test]
    fn blank_values_fall_back_to_defaults() {
        let s = settings(&[("READINESS_MAX_ATTEMPTS", "  "), ("AWS_REGION_OVERRIDE", "")]).unwrap();
        assert_eq!(s.poller.max_attempts, 60);
        assert_eq!(s.aws_region_override, None);
    }

    #[test]
    fn rejects_zero_attempts() {
        let err = settings(&[("READINESS_MAX_ATTEMPTS", "0")]).unwrap_err();
        assert!(err.to_string().contains("at least 1"));
    }

    #[test]
    fn rejects_garbage() {
        assert!(settings(&[("READINESS_POLL_INTERVAL_SECS", "ten")]).is_err());
        assert!(settings(&[("READINESS_BIND_ADDR", "nowhere")]).is_err());
        assert!(settings(&[("READINESS_MAX_ATTEMPTS", "-1")]).is_err());
    }

    #[test]
    fn max_wait_counts_gaps_between_rounds() {
        assert_eq!(PollerSettings::default().max_wait(), Duration::from_secs(590));
    }

    #[test]
    fn max_wait_saturates_on_huge_interval() {
        let s = settings(&[
            ("READINESS_POLL_INTERVAL_SECS", "18446744073709551615"),
            ("READINESS_MAX_ATTEMPTS", "3"),
        ])
        .unwrap();
        assert_eq!(s.poller.max_wait(), Duration::MAX);
    }
}
