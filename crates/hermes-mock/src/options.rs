//! Behaviour shared by every response mocker.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Common options carried by every strategy under the `options` key.
///
/// ```json
/// {"options": {"latency": "3ms"}}
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MockOptions {
    /// Delay applied before a response is produced.
    #[serde(with = "humantime_serde")]
    pub latency: Duration,
}

impl MockOptions {
    /// Options with the given latency.
    #[must_use]
    pub const fn with_latency(latency: Duration) -> Self {
        Self { latency }
    }

    /// Sleeps for the configured latency, if any.
    pub async fn apply_latency(&self) {
        if self.latency.is_zero() {
            return;
        }
        debug!(latency_ms = self.latency.as_millis() as u64, "Applying mock latency");
        tokio::time::sleep(self.latency).await;
    }
}

mod humantime_serde {
    use std::time::Duration;

    use serde::{self, Deserialize, Deserializer, Serializer};

    const NANOS_PER_MICRO: u128 = 1_000;
    const NANOS_PER_MILLI: u128 = 1_000_000;
    const NANOS_PER_SEC: u128 = 1_000_000_000;

    /// A duration as written in configuration: a string such as `"1h30m"`,
    /// or a number of nanoseconds.
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawDuration {
        Text(String),
        Nanos(f64),
    }

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let nanos = duration.as_nanos();
        let s = if nanos == 0 {
            "0s".to_string()
        } else if nanos % NANOS_PER_SEC == 0 {
            format!("{}s", nanos / NANOS_PER_SEC)
        } else if nanos % NANOS_PER_MILLI == 0 {
            format!("{}ms", nanos / NANOS_PER_MILLI)
        } else if nanos % NANOS_PER_MICRO == 0 {
            format!("{}us", nanos / NANOS_PER_MICRO)
        } else {
            format!("{nanos}ns")
        };
        serializer.serialize_str(&s)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        match RawDuration::deserialize(deserializer)? {
            RawDuration::Text(s) => parse_duration(&s),
            RawDuration::Nanos(n) => from_nanos(n),
        }
        .map_err(serde::de::Error::custom)
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
    fn from_nanos(nanos: f64) -> Result<Duration, String> {
        if !nanos.is_finite() || nanos < 0.0 || nanos >= u64::MAX as f64 {
            return Err(format!("invalid duration: {nanos}"));
        }
        Ok(Duration::from_nanos(nanos as u64))
    }

    fn unit_nanos(unit: &str) -> Option<u128> {
        Some(match unit {
            "ns" => 1,
            "us" | "\u{b5}s" | "\u{3bc}s" => NANOS_PER_MICRO,
            "ms" => NANOS_PER_MILLI,
            "s" => NANOS_PER_SEC,
            "m" => 60 * NANOS_PER_SEC,
            "h" => 3_600 * NANOS_PER_SEC,
            _ => return None,
        })
    }

    /// Parses a sequence of decimal numbers, each with an optional fraction
    /// and a unit suffix, e.g. `"300ms"`, `"1.5h"` or `"2h45m"`.
    ///
    /// Valid units are `ns`, `us` (or `µs`), `ms`, `s`, `m` and `h`. An empty
    /// string and `"0"` are zero.
    pub(super) fn parse_duration(input: &str) -> Result<Duration, String> {
        let invalid = || format!("invalid duration: {input}");

        let s = input.trim();
        let mut rest = s.strip_prefix('+').unwrap_or(s);
        if rest.is_empty() || rest == "0" {
            return Ok(Duration::ZERO);
        }
        if rest.starts_with('-') {
            return Err(format!("negative duration: {input}"));
        }

        let digits = |s: &str| s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
        let mut total: u128 = 0;
        while !rest.is_empty() {
            let (whole, after) = rest.split_at(digits(rest));
            let (fraction, after) = match after.strip_prefix('.') {
                Some(after) => after.split_at(digits(after)),
                None => ("", after),
            };
            if whole.is_empty() && fraction.is_empty() {
                return Err(invalid());
            }

            let unit_len = after
                .find(|c: char| c.is_ascii_digit() || c == '.')
                .unwrap_or(after.len());
            let (unit, after) = after.split_at(unit_len);
            let scale = unit_nanos(unit).ok_or_else(|| {
                if unit.is_empty() {
                    format!("missing unit in duration: {input}")
                } else {
                    format!("unknown unit {unit:?} in duration: {input}")
                }
            })?;

            let whole: u128 = if whole.is_empty() {
                0
            } else {
                whole.parse().map_err(|_| invalid())?
            };
            // Fractions are truncated to 18 digits.
            let (numerator, divisor) = fraction.bytes().take(18).fold((0u128, 1u128), |(n, d), b| {
                (n * 10 + u128::from(b - b'0'), d * 10)
            });
            let fraction_nanos = numerator * scale / divisor;

            total = whole
                .checked_mul(scale)
                .and_then(|nanos| nanos.checked_add(fraction_nanos))
                .and_then(|nanos| total.checked_add(nanos))
                .ok_or_else(invalid)?;
            rest = after;
        }

        u64::try_from(total)
            .map(Duration::from_nanos)
            .map_err(|_| format!("duration out of range: {input}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_duration_suffixes() {
        let parse = humantime_serde::parse_duration;
        assert_eq!(parse("3ms").unwrap(), Duration::from_millis(3));
        assert_eq!(parse("2s").unwrap(), Duration::from_secs(2));
        assert_eq!(parse("1m").unwrap(), Duration::from_secs(60));
        assert_eq!(parse("1h").unwrap(), Duration::from_secs(3600));
        assert_eq!(parse("").unwrap(), Duration::ZERO);
        assert_eq!(parse("0").unwrap(), Duration::ZERO);
        assert!(parse("fast").is_err());
        assert!(parse("5").is_err());
        assert!(parse("3d").is_err());
        assert!(parse("-1s").is_err());
        assert!(parse(".s").is_err());
    }

    #[test]
    fn test_parse_duration_small_units() {
        let parse = humantime_serde::parse_duration;
        assert_eq!(parse("250ns").unwrap(), Duration::from_nanos(250));
        assert_eq!(parse("500us").unwrap(), Duration::from_micros(500));
        assert_eq!(parse("500\u{b5}s").unwrap(), Duration::from_micros(500));
        assert_eq!(parse("500\u{3bc}s").unwrap(), Duration::from_micros(500));
    }

    #[test]
    fn test_parse_duration_fractions_and_compounds() {
        let parse = humantime_serde::parse_duration;
        assert_eq!(parse("1.5s").unwrap(), Duration::from_millis(1500));
        assert_eq!(parse(".5m").unwrap(), Duration::from_secs(30));
        assert_eq!(parse("2.s").unwrap(), Duration::from_secs(2));
        assert_eq!(parse("1h30m").unwrap(), Duration::from_secs(5400));
        assert_eq!(parse("2h45m30.5s").unwrap(), Duration::from_millis(9_930_500));
        assert_eq!(parse("+1m1ms").unwrap(), Duration::from_millis(60_001));
        assert!(parse("1h30").is_err());
        assert!(parse("99999999999999999999h").is_err());
    }

    #[test]
    fn test_options_from_json() {
        let options: MockOptions = serde_json::from_str(r#"{"latency": "3ms"}"#).unwrap();
        assert_eq!(options.latency, Duration::from_millis(3));

        let options: MockOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(options, MockOptions::default());

        assert!(serde_json::from_str::<MockOptions>(r#"{"jitter": "1ms"}"#).is_err());
    }

    #[test]
    fn test_options_latency_forms() {
        let options: MockOptions = serde_json::from_str(r#"{"latency": "1.5s"}"#).unwrap();
        assert_eq!(options.latency, Duration::from_millis(1500));

        let options: MockOptions = serde_json::from_str(r#"{"latency": "1h30m"}"#).unwrap();
        assert_eq!(options.latency, Duration::from_secs(5400));

        let options: MockOptions = serde_json::from_str(r#"{"latency": "500us"}"#).unwrap();
        assert_eq!(options.latency, Duration::from_micros(500));

        let options: MockOptions = serde_json::from_str(r#"{"latency": 3000000}"#).unwrap();
        assert_eq!(options.latency, Duration::from_millis(3));

        assert!(serde_json::from_str::<MockOptions>(r#"{"latency": -1}"#).is_err());
        assert!(serde_json::from_str::<MockOptions>(r#"{"latency": true}"#).is_err());
    }

    #[test]
    fn test_options_serialize() {
        let latency = |duration| {
            serde_json::to_value(MockOptions::with_latency(duration)).unwrap()["latency"].clone()
        };
        assert_eq!(latency(Duration::from_secs(2)), "2s");
        assert_eq!(latency(Duration::from_millis(1500)), "1500ms");
        assert_eq!(latency(Duration::from_micros(500)), "500us");
        assert_eq!(latency(Duration::from_nanos(7)), "7ns");
        assert_eq!(latency(Duration::ZERO), "0s");
    }

    #[tokio::test]
    async fn test_apply_latency_waits() {
        let start = std::time::Instant::now();
        MockOptions::with_latency(Duration::from_millis(5)).apply_latency().await;
        assert!(start.elapsed() >= Duration::from_millis(5));
    }
}
