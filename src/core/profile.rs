//! Server runtime profiles
//!
//! A profile is picked once at process start from the first CLI argument and
//! fixes worker count, reload behaviour, and log verbosity.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    Dev,
    Prod,
}

#[derive(Debug, Clone)]
pub struct ServerSettings {
    pub host: &'static str,
    pub port: u16,
    pub workers: usize,
    pub reload: bool,
    pub log_level: &'static str,
    pub use_colors: bool,
    /// Honour `X-Forwarded-*` / `X-Real-IP` from any peer
    pub proxy_headers: bool,
}

impl Profile {
    /// `prod` selects production; anything else, or nothing, selects dev
    pub fn from_arg(arg: Option<&str>) -> Self {
        match arg {
            Some("prod") => Profile::Prod,
            _ => Profile::Dev,
        }
    }

    pub fn from_args<I>(mut args: I) -> Self
    where
        I: Iterator<Item = String>,
    {
        // Skip program name
        let _ = args.next();
        Self::from_arg(args.next().as_deref())
    }

    pub fn settings(self) -> ServerSettings {
        match self {
            Profile::Dev => ServerSettings {
                host: "0.0.0.0",
                port: 8000,
                workers: 1,
                reload: true,
                log_level: "debug",
                use_colors: true,
                proxy_headers: true,
            },
            Profile::Prod => ServerSettings {
                host: "0.0.0.0",
                port: 8000,
                workers: 4,
                reload: false,
                log_level: "info",
                use_colors: false,
                proxy_headers: true,
            },
        }
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Profile::Dev => write!(f, "dev"),
            Profile::Prod => write!(f, "prod"),
        }
    }
}

impl ServerSettings {
    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Tokio worker threads: a positive `TOKIO_WORKER_THREADS` value wins,
    /// anything else falls back to the profile.
    pub fn worker_threads(&self, override_value: Option<&str>) -> usize {
        override_value
            .and_then(|s| s.trim().parse::<usize>().ok())
            .filter(|n| *n > 0)
            .unwrap_or(self.workers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_from_arg() {
        assert_eq!(Profile::from_arg(Some("prod")), Profile::Prod);
        assert_eq!(Profile::from_arg(Some("dev")), Profile::Dev);
        assert_eq!(Profile::from_arg(Some("production")), Profile::Dev);
        assert_eq!(Profile::from_arg(Some("PROD")), Profile::Dev);
        assert_eq!(Profile::from_arg(None), Profile::Dev);
    }

    #[test]
    fn test_profile_from_args_skips_program_name() {
        let args = vec!["coordinates-api".to_string(), "prod".to_string()];
        assert_eq!(Profile::from_args(args.into_iter()), Profile::Prod);

        let args = vec!["prod".to_string()];
        assert_eq!(Profile::from_args(args.into_iter()), Profile::Dev);
    }

    #[test]
    fn test_dev_settings() {
        let settings = Profile::Dev.settings();
        assert_eq!(settings.workers, 1);
        assert!(settings.reload);
        assert!(settings.use_colors);
        assert_eq!(settings.log_level, "debug");
        assert_eq!(settings.server_address(), "0.0.0.0:8000");
    }

    #[test]
    fn test_prod_settings() {
        let settings = Profile::Prod.settings();
        assert_eq!(settings.workers, 4);
        assert!(!settings.reload);
        assert_eq!(settings.log_level, "info");
        assert_eq!(settings.server_address(), "0.0.0.0:8000");
    }

    #[test]
    fn test_both_profiles_trust_proxy_headers() {
        for profile in [Profile::Dev, Profile::Prod] {
            assert!(profile.settings().proxy_headers);
        }
    }

    #[test]
    fn test_worker_threads_override() {
        let settings = Profile::Prod.settings();
        assert_eq!(settings.worker_threads(None), 4);
        assert_eq!(settings.worker_threads(Some("8")), 8);
        assert_eq!(settings.worker_threads(Some(" 2 ")), 2);
    }

    #[test]
    fn test_worker_threads_ignores_zero_and_garbage() {
        let settings = Profile::Dev.settings();
        assert_eq!(settings.worker_threads(Some("0")), 1);
        assert_eq!(settings.worker_threads(Some("abc")), 1);
        assert_eq!(settings.worker_threads(Some("-3")), 1);
        assert_eq!(settings.worker_threads(Some("")), 1);
    }
}
