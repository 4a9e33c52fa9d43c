use clap::builder::TypedValueParser as _;
use clap::Parser;
use dotenvy::dotenv;
use log::LevelFilter;
use std::time::Duration;

/// Default Redis URL used when `REDIS_URL` is not set.
pub const DEFAULT_REDIS_URL: &str = "redis://127.0.0.1:6379/0";

/// Default pub/sub channel the upstream application publishes events to.
pub const DEFAULT_EVENTS_CHANNEL: &str = "events";

#[derive(Clone, Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// The host interface to listen for incoming connections
    #[arg(short, long, env, default_value = "0.0.0.0")]
    pub interface: Option<String>,

    /// The host TCP port to listen for incoming connections
    #[arg(short, long, env, default_value_t = 8082)]
    pub port: u16,

    /// Sets the Redis URL of the event bus to subscribe to
    #[arg(short, long, env, default_value = DEFAULT_REDIS_URL)]
    redis_url: String,

    /// The event bus channel carrying user-targeted events
    #[arg(long, env, default_value = DEFAULT_EVENTS_CHANNEL)]
    events_channel: String,

    /// The secret used to verify the HS256 signature of client access tokens.
    /// Must match the signing key of the application issuing the tokens.
    #[arg(long, env, hide_env_values = true)]
    secret_key: String,

    /// Maximum number of payloads queued per user before the oldest is dropped
    #[arg(long, env, default_value_t = 1024)]
    pub outbox_capacity: usize,

    /// Timeout in milliseconds for writing one payload to one connection
    #[arg(long, env, default_value_t = 5000)]
    pub write_timeout_ms: u64,

    /// Seconds a new connection has to present its access token
    #[arg(long, env, default_value_t = 10)]
    pub auth_timeout_secs: u64,

    /// Set the log level verbosity threshold (level) to control what gets displayed on console output
    #[arg(
        short,
        long,
        env,
        default_value_t = LevelFilter::Info,
        value_parser = clap::builder::PossibleValuesParser::new(["OFF", "ERROR", "WARN", "INFO", "DEBUG", "TRACE"])
            .map(|s| s.parse::<LevelFilter>().unwrap()),
        )]
    pub log_level_filter: LevelFilter,
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    pub fn new() -> Self {
        // Load .env file first
        dotenv().ok();
        // Then parse the command line parameters and flags
        Config::parse()
    }

    pub fn redis_url(&self) -> &str {
        &self.redis_url
    }

    pub fn events_channel(&self) -> &str {
        &self.events_channel
    }

    pub fn secret_key(&self) -> &str {
        &self.secret_key
    }

    pub fn write_timeout(&self) -> Duration {
        Duration::from_millis(self.write_timeout_ms)
    }

    pub fn auth_timeout(&self) -> Duration {
        Duration::from_secs(self.auth_timeout_secs)
    }

    /// The `host:port` address to bind the listener to.
    pub fn listen_addr(&self) -> String {
        let interface = self.interface.as_deref().unwrap_or("0.0.0.0");
        format!("{interface}:{}", self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Config {
        let mut argv = vec!["notifications_rs"];
        argv.extend_from_slice(args);
        Config::try_parse_from(argv).unwrap()
    }

    #[test]
    fn explicit_arguments_override_defaults() {
        let config = parse(&[
            "--secret-key",
            "s3cret",
            "--port",
            "9000",
            "--interface",
            "127.0.0.1",
            "--redis-url",
            "redis://bus:6379/1",
            "--events-channel",
            "notifications",
            "--outbox-capacity",
            "16",
            "--write-timeout-ms",
            "250",
            "--auth-timeout-secs",
            "3",
            "--log-level-filter",
            "DEBUG",
        ]);

        assert_eq!(config.secret_key(), "s3cret");
        assert_eq!(config.listen_addr(), "127.0.0.1:9000");
        assert_eq!(config.redis_url(), "redis://bus:6379/1");
        assert_eq!(config.events_channel(), "notifications");
        assert_eq!(config.outbox_capacity, 16);
        assert_eq!(config.write_timeout(), Duration::from_millis(250));
        assert_eq!(config.auth_timeout(), Duration::from_secs(3));
        assert_eq!(config.log_level_filter, LevelFilter::Debug);
    }

    #[test]
    fn rejects_unknown_log_level() {
        let result = Config::try_parse_from([
            "notifications_rs",
            "--secret-key",
            "s3cret",
            "--log-level-filter",
            "LOUD",
        ]);
        assert!(result.is_err());
    }
}
