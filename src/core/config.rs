use crate::core::TrackerError;
use dotenv::dotenv;
use std::env;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "http://localhost:8080/api";

/// Tempi e soglie del tracker
#[derive(Debug, Clone, PartialEq)]
pub struct TrackerOptions {
    /// Intervallo tra due cicli di polling
    pub poll_interval: Duration,
    /// Distanza minima tra due tentativi di fetch
    pub min_fetch_interval: Duration,
    /// Intervallo dello sweeper delle scadenze
    pub sweep_interval: Duration,
    /// Oltre questo numero di errori consecutivi il ciclo viene interrotto
    pub max_consecutive_errors: u32,
}

impl Default for TrackerOptions {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(30),
            min_fetch_interval: Duration::from_secs(5),
            sweep_interval: Duration::from_secs(60),
            max_consecutive_errors: 5,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: String,
    pub auth_token: String,
    pub request_timeout: Duration,
    pub tracker: TrackerOptions,
}

impl Config {
    /// Carica la configurazione dalle variabili d'ambiente
    /// Chiama dotenv() automaticamente
    pub fn from_env() -> Result<Self, TrackerError> {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Costruisce la configurazione a partire da una funzione di lookup delle chiavi
    pub fn from_lookup<F>(lookup: F) -> Result<Self, TrackerError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_url = lookup("INVITATIONS_API_URL")
            .unwrap_or_else(|| DEFAULT_API_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let auth_token = lookup("INVITATIONS_TOKEN")
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| TrackerError::config("INVITATIONS_TOKEN must be set in .env file"))?;

        let defaults = TrackerOptions::default();

        let poll_interval = secs(&lookup, "POLL_INTERVAL_SECS", defaults.poll_interval)?;
        let min_fetch_interval =
            secs(&lookup, "MIN_FETCH_INTERVAL_SECS", defaults.min_fetch_interval)?;
        let sweep_interval = secs(&lookup, "SWEEP_INTERVAL_SECS", defaults.sweep_interval)?;
        let request_timeout = secs(&lookup, "REQUEST_TIMEOUT_SECS", Duration::from_secs(10))?;

        let max_consecutive_errors = match lookup("MAX_CONSECUTIVE_ERRORS") {
            Some(raw) => raw.parse::<u32>().ok().filter(|n| *n > 0).ok_or_else(|| {
                TrackerError::config("Invalid MAX_CONSECUTIVE_ERRORS: must be a positive number")
            })?,
            None => defaults.max_consecutive_errors,
        };

        Ok(Config {
            api_url,
            auth_token,
            request_timeout,
            tracker: TrackerOptions {
                poll_interval,
                min_fetch_interval,
                sweep_interval,
                max_consecutive_errors,
            },
        })
    }

    /// Stampa la configurazione (nascondendo il token)
    pub fn print_info(&self) {
        println!("   Invitation Tracker Configuration:");
        println!("   API: {}", self.api_url);
        println!("   Token: {}", Self::mask_token(&self.auth_token));
        println!("   Poll Interval: {}s", self.tracker.poll_interval.as_secs());
        println!(
            "   Min Fetch Interval: {}s",
            self.tracker.min_fetch_interval.as_secs()
        );
        println!("   Sweep Interval: {}s", self.tracker.sweep_interval.as_secs());
        println!(
            "   Max Consecutive Errors: {}",
            self.tracker.max_consecutive_errors
        );
        println!("   Request Timeout: {}s", self.request_timeout.as_secs());
    }

    /// Maschera il token per il logging, lasciando visibili solo gli ultimi 4 caratteri
    fn mask_token(token: &str) -> String {
        let chars: Vec<char> = token.chars().collect();
        if chars.len() <= 8 {
            return "***".to_string();
        }
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("***{}", tail)
    }
}

fn secs<F>(lookup: &F, key: &str, default: Duration) -> Result<Duration, TrackerError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw
            .parse::<u64>()
            .ok()
            .filter(|s| *s > 0)
            .map(Duration::from_secs)
            .ok_or_else(|| {
                TrackerError::config(format!("Invalid {}: must be a positive number of seconds", key))
            }),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_only_token_is_set() {
        let config = Config::from_lookup(lookup_from(&[("INVITATIONS_TOKEN", "abc")])).unwrap();
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.tracker, TrackerOptions::default());
        assert_eq!(config.request_timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_missing_token_is_an_error() {
        let err = Config::from_lookup(lookup_from(&[])).unwrap_err();
        assert!(matches!(err, TrackerError::Config(_)));

        let err = Config::from_lookup(lookup_from(&[("INVITATIONS_TOKEN", "  ")])).unwrap_err();
        assert!(matches!(err, TrackerError::Config(_)));
    }

    #[test]
    fn test_overrides_and_trailing_slash() {
        let config = Config::from_lookup(lookup_from(&[
            ("INVITATIONS_TOKEN", "abc"),
            ("INVITATIONS_API_URL", "https://cockpit.example/api/"),
            ("POLL_INTERVAL_SECS", "10"),
            ("MIN_FETCH_INTERVAL_SECS", "2"),
            ("SWEEP_INTERVAL_SECS", "15"),
            ("MAX_CONSECUTIVE_ERRORS", "3"),
        ]))
        .unwrap();
        assert_eq!(config.api_url, "https://cockpit.example/api");
        assert_eq!(config.tracker.poll_interval, Duration::from_secs(10));
        assert_eq!(config.tracker.min_fetch_interval, Duration::from_secs(2));
        assert_eq!(config.tracker.sweep_interval, Duration::from_secs(15));
        assert_eq!(config.tracker.max_consecutive_errors, 3);
    }

    #[test]
    fn test_invalid_numbers_are_rejected() {
        for (key, value) in [
            ("POLL_INTERVAL_SECS", "soon"),
            ("SWEEP_INTERVAL_SECS", "0"),
            ("MAX_CONSECUTIVE_ERRORS", "-1"),
            ("MAX_CONSECUTIVE_ERRORS", "0"),
        ] {
            let result = Config::from_lookup(lookup_from(&[("INVITATIONS_TOKEN", "abc"), (key, value)]));
            assert!(result.is_err(), "{}={} dovrebbe essere rifiutato", key, value);
        }
    }

    #[test]
    fn test_mask_token() {
        assert_eq!(Config::mask_token("short"), "***");
        assert_eq!(Config::mask_token("eyJhbGciOiJIUzI1NiJ9.abcd"), "***abcd");
    }
}
