//! Configuration sections.

use hermes_baggage::Baggage;
use hermes_telemetry::{LogConfig, LogFormat};
use serde::{Deserialize, Serialize};

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct LoggingSection {
    /// Enable logging.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Filter directives (e.g. `info`, `info,hermes_core=debug`).
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log output format.
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            enabled: true,
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

impl LoggingSection {
    /// Converts the section into a [`LogConfig`].
    ///
    /// The pretty format also switches on file/line info and span events.
    #[must_use]
    pub fn to_log_config(&self) -> LogConfig {
        let base = match self.format {
            LogFormat::Json => LogConfig::production(),
            LogFormat::Pretty => LogConfig::development(),
        };
        LogConfig {
            enabled: self.enabled,
            level: self.level.clone(),
            ..base
        }
    }
}

fn default_domains() -> Vec<String> {
    vec!["x".to_string(), "hermes".to_string()]
}

/// Baggage configuration.
///
/// ```toml
/// [baggage]
/// domains = ["x-tproxy", "user"]
/// header_prefix = "x-proxy-user-"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct BaggageSection {
    /// Domain segments joined into the attribute prefix.
    #[serde(default = "default_domains")]
    pub domains: Vec<String>,

    /// Header prefix overriding the one derived from `domains`.
    #[serde(default)]
    pub header_prefix: Option<String>,

    /// Parameter prefix overriding the one derived from `domains`.
    #[serde(default)]
    pub param_prefix: Option<String>,
}

impl Default for BaggageSection {
    fn default() -> Self {
        Self {
            domains: default_domains(),
            header_prefix: None,
            param_prefix: None,
        }
    }
}

impl BaggageSection {
    /// Creates an empty [`Baggage`] with this section's prefixes.
    #[must_use]
    pub fn to_baggage(&self) -> Baggage {
        let mut baggage = Baggage::new(&self.domains);
        if let Some(prefix) = &self.header_prefix {
            baggage = baggage.with_header_prefix(prefix);
        }
        if let Some(prefix) = &self.param_prefix {
            baggage = baggage.with_param_prefix(prefix);
        }
        baggage
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logging_defaults() {
        let section = LoggingSection::default();
        assert!(section.enabled);
        assert_eq!(section.level, "info");
        assert_eq!(section.format, LogFormat::Json);
        assert_eq!(section.to_log_config(), LogConfig::production());
    }

    #[test]
    fn test_logging_pretty_to_log_config() {
        let section = LoggingSection {
            enabled: true,
            level: "warn".to_string(),
            format: LogFormat::Pretty,
        };
        let config = section.to_log_config();
        assert_eq!(config.level, "warn");
        assert_eq!(config.format, LogFormat::Pretty);
        assert!(config.file_line_info);
    }

    #[test]
    fn test_baggage_defaults() {
        let baggage = BaggageSection::default().to_baggage();
        assert_eq!(baggage.header_prefix(), "X-Hermes-");
        assert_eq!(baggage.param_prefix(), "x-hermes-");
    }

    #[test]
    fn test_baggage_prefix_overrides() {
        let section = BaggageSection {
            domains: vec!["x-tproxy".to_string(), "user".to_string()],
            header_prefix: Some("x-proxy-user-".to_string()),
            param_prefix: None,
        };
        let baggage = section.to_baggage();
        assert_eq!(baggage.header_prefix(), "X-Proxy-User-");
        assert_eq!(baggage.param_prefix(), "x-tproxy-user-");
    }

    #[test]
    fn test_unknown_field_rejected() {
        let result: Result<BaggageSection, _> = toml::from_str("domain = [\"x\"]");
        assert!(result.is_err());
    }
}
