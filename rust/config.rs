use std::env;
use std::time::Duration;

use crate::error::ConfigError;

pub const DEFAULT_ENDPOINT: &str = "https://practicum.yandex.ru/api/user_api/homework_statuses/";
pub const DEFAULT_TELEGRAM_API_URL: &str = "https://api.telegram.org";
pub const DEFAULT_RETRY_PERIOD: Duration = Duration::from_secs(600);
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

const REQUIRED: [&str; 3] = ["PRACTICUM_TOKEN", "TELEGRAM_TOKEN", "TELEGRAM_CHAT_ID"];

#[derive(Clone)]
pub struct Config {
    pub practicum_token: String,
    pub telegram_token: String,
    /// Telegram chat that receives every notification.
    pub telegram_chat_id: String,
    pub endpoint: String,
    pub telegram_api_url: String,
    /// Delay between the end of one cycle and the start of the next.
    pub retry_period: Duration,
    pub http_timeout: Duration,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("telegram_chat_id", &self.telegram_chat_id)
            .field("endpoint", &self.endpoint)
            .field("telegram_api_url", &self.telegram_api_url)
            .field("retry_period", &self.retry_period)
            .field("http_timeout", &self.http_timeout)
            .finish_non_exhaustive()
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the config from an arbitrary variable source. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let missing: Vec<&'static str> = REQUIRED
            .iter()
            .copied()
            .filter(|name| get(*name).is_none())
            .collect();
        if !missing.is_empty() {
            return Err(ConfigError::MissingCredentials(missing));
        }

        let required = |name: &'static str| {
            get(name).ok_or_else(|| ConfigError::MissingCredentials(vec![name]))
        };

        let retry_period = parse_secs(get("RETRY_PERIOD_SECS"), "RETRY_PERIOD_SECS")?
            .unwrap_or(DEFAULT_RETRY_PERIOD);
        let http_timeout = parse_secs(get("HTTP_TIMEOUT_SECS"), "HTTP_TIMEOUT_SECS")?
            .unwrap_or(DEFAULT_HTTP_TIMEOUT);

        Ok(Config {
            practicum_token: required("PRACTICUM_TOKEN")?,
            telegram_token: required("TELEGRAM_TOKEN")?,
            telegram_chat_id: required("TELEGRAM_CHAT_ID")?,
            endpoint: get("PRACTICUM_ENDPOINT").unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
            telegram_api_url: get("TELEGRAM_API_URL")
                .unwrap_or_else(|| DEFAULT_TELEGRAM_API_URL.to_string()),
            retry_period,
            http_timeout,
        })
    }
}

fn parse_secs(value: Option<String>, name: &'static str) -> Result<Option<Duration>, ConfigError> {
    match value {
        None => Ok(None),
        Some(raw) => match raw.trim().parse::<u64>() {
            Ok(secs) if secs > 0 => Ok(Some(Duration::from_secs(secs))),
            _ => Err(ConfigError::Invalid { name, value: raw }),
        },
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| vars.get(name).cloned()
    }

    const CREDS: [(&str, &str); 3] = [
        ("PRACTICUM_TOKEN", "y0_practicum"),
        ("TELEGRAM_TOKEN", "123:abc"),
        ("TELEGRAM_CHAT_ID", "42"),
    ];

    #[test]
    fn loads_credentials_with_defaults() {
        let config = Config::from_lookup(lookup_from(&CREDS)).unwrap();
        assert_eq!(config.practicum_token, "y0_practicum");
        assert_eq!(config.telegram_token, "123:abc");
        assert_eq!(config.telegram_chat_id, "42");
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.retry_period, Duration::from_secs(600));
        assert_eq!(config.http_timeout, DEFAULT_HTTP_TIMEOUT);
    }

    #[test]
    fn reports_every_missing_credential() {
        let err = Config::from_lookup(lookup_from(&[("TELEGRAM_TOKEN", "123:abc")])).unwrap_err();
        match err {
            ConfigError::MissingCredentials(names) => {
                assert_eq!(names, vec!["PRACTICUM_TOKEN", "TELEGRAM_CHAT_ID"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn blank_credential_counts_as_missing() {
        for (blank, _) in CREDS {
            let pairs: Vec<(&str, &str)> = CREDS
                .iter()
                .map(|&(k, v)| if k == blank { (k, "  ") } else { (k, v) })
                .collect();
            let err = Config::from_lookup(lookup_from(&pairs)).unwrap_err();
            assert!(
                matches!(err, ConfigError::MissingCredentials(ref names) if names == &vec![blank]),
                "{blank}: {err}"
            );
        }
    }

    #[test]
    fn retry_period_override() {
        let mut pairs = CREDS.to_vec();
        pairs.push(("RETRY_PERIOD_SECS", "60"));
        let config = Config::from_lookup(lookup_from(&pairs)).unwrap();
        assert_eq!(config.retry_period, Duration::from_secs(60));
    }

    #[test]
    fn rejects_malformed_durations() {
        for bad in ["soon", "0", "-5"] {
            let mut pairs = CREDS.to_vec();
            pairs.push(("HTTP_TIMEOUT_SECS", bad));
            let err = Config::from_lookup(lookup_from(&pairs)).unwrap_err();
            assert!(matches!(err, ConfigError::Invalid { name: "HTTP_TIMEOUT_SECS", .. }));
        }
    }

    #[test]
    fn debug_output_hides_tokens() {
        let config = Config::from_lookup(lookup_from(&CREDS)).unwrap();
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("y0_practicum"));
        assert!(!rendered.contains("123:abc"));
    }
}
