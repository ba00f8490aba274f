//! Application configuration loaded from environment variables.
//!
//! Credentials **must** be provided via environment variables:
//! - `VTEX_APP_KEY` / `VTEX_APP_TOKEN` — header credentials for the OMS API
//! - `SMTP_USER` / `SMTP_PASSWORD` — SMTP login for report delivery
//!
//! Everything else has a default and can be overridden: `OMS_BASE_URL`,
//! `SMTP_SERVER`, `SMTP_PORT`, `EMAIL_FROM`, `MAX_WORKERS`, `OUTPUT_DIR`,
//! `SELLERS_FILE`.

use std::path::PathBuf;

/// Default OMS endpoint.
const DEFAULT_BASE_URL: &str = "https://senffnet.vtexcommercestable.com.br";

/// Default SMTP relay and implicit-TLS submission port.
const DEFAULT_SMTP_SERVER: &str = "smtp.skymail.net.br";
const DEFAULT_SMTP_PORT: u16 = 465;

const DEFAULT_OUTPUT_DIR: &str = "output";
const DEFAULT_SELLERS_FILE: &str = "config/sellers.toml";

/// Upper bound on concurrent detail fetches regardless of CPU count.
const MAX_WORKERS_CAP: usize = 32;

/// Top-level application configuration.
#[derive(Debug)]
pub struct AppConfig {
    pub oms: OmsConfig,
    pub smtp: SmtpConfig,
    pub output_dir: PathBuf,
    pub sellers_file: PathBuf,
}

/// OMS API connection values.
#[derive(Debug)]
pub struct OmsConfig {
    pub base_url: String,
    pub app_key: String,
    pub app_token: String,
    /// Concurrency cap for the detail-fetch fan-out.
    pub max_workers: usize,
}

/// SMTP delivery values.
#[derive(Debug)]
pub struct SmtpConfig {
    pub server: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    /// Sender address; defaults to the SMTP user.
    pub from: String,
}

/// Loads the application configuration from environment variables.
///
/// Reads the environment exactly once; the returned struct is passed by
/// reference into the components that need it, so nothing else in the crate
/// touches ambient process state.
///
/// # Errors
///
/// Returns [`RemitError::Config`](crate::RemitError::Config) if any of the
/// four credential variables is missing or empty, or if a numeric override
/// does not parse.
pub fn fetch_config() -> crate::Result<AppConfig> {
    let app_key = required_var("VTEX_APP_KEY")?;
    let app_token = required_var("VTEX_APP_TOKEN")?;
    let user = required_var("SMTP_USER")?;
    let password = required_var("SMTP_PASSWORD")?;

    let base_url = non_empty_var("OMS_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
    let server = non_empty_var("SMTP_SERVER").unwrap_or_else(|| DEFAULT_SMTP_SERVER.to_string());
    let port = match non_empty_var("SMTP_PORT") {
        Some(raw) => raw
            .parse()
            .map_err(|_| crate::RemitError::Config(format!("SMTP_PORT must be a port number, got {raw:?}")))?,
        None => DEFAULT_SMTP_PORT,
    };
    let from = non_empty_var("EMAIL_FROM").unwrap_or_else(|| user.clone());

    let max_workers = match non_empty_var("MAX_WORKERS") {
        Some(raw) => match raw.parse() {
            Ok(n) if n > 0 => n,
            _ => {
                return Err(crate::RemitError::Config(format!(
                    "MAX_WORKERS must be a positive integer, got {raw:?}"
                )));
            }
        },
        None => default_max_workers(),
    };

    let output_dir =
        PathBuf::from(non_empty_var("OUTPUT_DIR").unwrap_or_else(|| DEFAULT_OUTPUT_DIR.to_string()));
    let sellers_file = PathBuf::from(
        non_empty_var("SELLERS_FILE").unwrap_or_else(|| DEFAULT_SELLERS_FILE.to_string()),
    );

    Ok(AppConfig {
        oms: OmsConfig {
            base_url,
            app_key,
            app_token,
            max_workers,
        },
        smtp: SmtpConfig {
            server,
            port,
            user,
            password,
            from,
        },
        output_dir,
        sellers_file,
    })
}

/// Fan-out width when `MAX_WORKERS` is not set: 4x the logical CPU count,
/// capped at [`MAX_WORKERS_CAP`]. The fetches are I/O-bound, so running
/// several per core is the point.
fn default_max_workers() -> usize {
    let cpus = std::thread::available_parallelism()
        .map(std::num::NonZeroUsize::get)
        .unwrap_or(4);
    (cpus * 4).min(MAX_WORKERS_CAP)
}

/// Returns the value of an environment variable, failing when it is unset or empty.
fn required_var(name: &str) -> crate::Result<String> {
    non_empty_var(name).ok_or_else(|| crate::RemitError::Config(format!("{name} must be set")))
}

/// Returns the value of an environment variable if it exists and is non-empty.
fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_VARS: [&str; 10] = [
        "VTEX_APP_KEY",
        "VTEX_APP_TOKEN",
        "SMTP_USER",
        "SMTP_PASSWORD",
        "OMS_BASE_URL",
        "SMTP_SERVER",
        "SMTP_PORT",
        "EMAIL_FROM",
        "MAX_WORKERS",
        "OUTPUT_DIR",
    ];

    /// Helper that temporarily sets env vars, runs `f`, then restores originals.
    ///
    /// # Safety
    ///
    /// Tests using this helper must run with `--test-threads=1` or otherwise
    /// ensure no other threads read these env vars concurrently.
    fn with_env<F: FnOnce()>(vars: &[(&str, Option<&str>)], f: F) {
        let touched: Vec<&str> = ALL_VARS.to_vec();
        let originals: Vec<(&str, Option<String>)> = touched
            .iter()
            .map(|k| (*k, std::env::var(k).ok()))
            .collect();

        for k in &touched {
            // SAFETY: config tests run single-threaded (see test runner config).
            unsafe {
                std::env::remove_var(k);
            }
        }
        for (k, v) in vars {
            if let Some(val) = v {
                // SAFETY: same single-threaded context.
                unsafe {
                    std::env::set_var(k, val);
                }
            }
        }

        f();

        for (k, original) in originals {
            // SAFETY: restoring original values, same single-threaded context.
            unsafe {
                match original {
                    Some(val) => std::env::set_var(k, val),
                    None => std::env::remove_var(k),
                }
            }
        }
    }

    fn credentials<'a>() -> Vec<(&'a str, Option<&'a str>)> {
        vec![
            ("VTEX_APP_KEY", Some("test-key")),
            ("VTEX_APP_TOKEN", Some("test-token")),
            ("SMTP_USER", Some("reports@example.com")),
            ("SMTP_PASSWORD", Some("hunter2")),
        ]
    }

    #[test]
    fn defaults_with_credentials_only() {
        with_env(&credentials(), || {
            let config = fetch_config().unwrap();
            assert_eq!(config.oms.base_url, DEFAULT_BASE_URL);
            assert_eq!(config.smtp.server, DEFAULT_SMTP_SERVER);
            assert_eq!(config.smtp.port, DEFAULT_SMTP_PORT);
            assert_eq!(config.smtp.from, "reports@example.com");
            assert_eq!(config.output_dir, PathBuf::from(DEFAULT_OUTPUT_DIR));
            assert!(config.oms.max_workers >= 1);
            assert!(config.oms.max_workers <= MAX_WORKERS_CAP);
        });
    }

    #[test]
    fn rejects_missing_api_credentials() {
        let mut vars = credentials();
        vars.retain(|(k, _)| *k != "VTEX_APP_TOKEN");
        with_env(&vars, || {
            let err = fetch_config().unwrap_err();
            assert!(err.to_string().contains("VTEX_APP_TOKEN"));
        });
    }

    #[test]
    fn rejects_missing_smtp_credentials() {
        let mut vars = credentials();
        vars.retain(|(k, _)| *k != "SMTP_PASSWORD");
        with_env(&vars, || {
            let err = fetch_config().unwrap_err();
            assert!(err.to_string().contains("SMTP_PASSWORD"));
        });
    }

    #[test]
    fn empty_values_treated_as_absent() {
        let mut vars = credentials();
        vars.push(("SMTP_USER", Some("")));
        // Later entries win, so SMTP_USER ends up empty.
        with_env(&vars, || {
            let err = fetch_config().unwrap_err();
            assert!(err.to_string().contains("SMTP_USER"));
        });
    }

    #[test]
    fn overrides_are_honored() {
        let mut vars = credentials();
        vars.push(("OMS_BASE_URL", Some("https://oms.example.com")));
        vars.push(("SMTP_PORT", Some("2465")));
        vars.push(("EMAIL_FROM", Some("noreply@example.com")));
        vars.push(("MAX_WORKERS", Some("8")));
        with_env(&vars, || {
            let config = fetch_config().unwrap();
            assert_eq!(config.oms.base_url, "https://oms.example.com");
            assert_eq!(config.smtp.port, 2465);
            assert_eq!(config.smtp.from, "noreply@example.com");
            assert_eq!(config.oms.max_workers, 8);
        });
    }

    #[test]
    fn rejects_malformed_max_workers() {
        let mut vars = credentials();
        vars.push(("MAX_WORKERS", Some("many")));
        with_env(&vars, || {
            let err = fetch_config().unwrap_err();
            assert!(err.to_string().contains("MAX_WORKERS"));
        });
    }

    #[test]
    fn rejects_zero_max_workers() {
        let mut vars = credentials();
        vars.push(("MAX_WORKERS", Some("0")));
        with_env(&vars, || {
            assert!(fetch_config().is_err());
        });
    }
}
