use clap::Parser;
use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::Path;

use crate::message::Labels;
use crate::session::{DEFAULT_MAX_SESSIONS, DEFAULT_SESSION_TIMEOUT};

/// Config file picked up from the working directory when `--config` is absent.
const CWD_CONFIG: &str = "config.yaml";

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file path
    #[arg(short, long, env = "CONFIG_FILE")]
    pub config: Option<String>,

    /// Port to listen on
    #[arg(long, env = "PORT")]
    pub port: Option<u16>,

    /// Base URL of the chat endpoint
    #[arg(long, env = "ENDPOINT_URL")]
    pub endpoint: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub endpoint: EndpointConfig,
    pub widget: WidgetConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
    pub session_timeout_secs: u64,
    pub max_sessions: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct EndpointConfig {
    pub base_url: String,
    pub send_path: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct WidgetConfig {
    pub title: String,
    pub user_label: String,
    pub assistant_label: String,
}

impl WidgetConfig {
    #[must_use]
    pub fn labels(&self) -> Labels {
        Labels {
            user: self.user_label.clone(),
            assistant: self.assistant_label.clone(),
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from_args(std::env::args())
    }

    /// Load configuration.
    ///
    /// Priority: CLI flag > CLI env var > `WEATHERWIZARD_*` env vars > config
    /// file > defaults.
    pub fn load_from_args<I, T>(args: I) -> Result<Self, config::ConfigError>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let cli =
            Cli::try_parse_from(args).map_err(|e| config::ConfigError::Message(e.to_string()))?;

        let mut builder = Config::builder()
            .set_default("server.port", 3000)?
            .set_default("server.host", "127.0.0.1")?
            .set_default(
                "server.session_timeout_secs",
                DEFAULT_SESSION_TIMEOUT.as_secs(),
            )?
            .set_default("server.max_sessions", DEFAULT_MAX_SESSIONS as u64)?
            .set_default("endpoint.base_url", "http://127.0.0.1:5000")?
            .set_default("endpoint.send_path", crate::transport::DEFAULT_SEND_PATH)?
            .set_default("widget.title", "Weatherwizard")?
            .set_default("widget.user_label", "You")?
            .set_default("widget.assistant_label", "Weatherwizard")?;

        // An explicit file must exist; the working-directory fallback may not.
        if let Some(path) = &cli.config {
            builder = builder.add_source(File::with_name(path));
        } else if Path::new(CWD_CONFIG).exists() {
            builder = builder.add_source(File::with_name(CWD_CONFIG));
        }

        // E.g. WEATHERWIZARD_SERVER__PORT=8000
        builder = builder.add_source(
            Environment::with_prefix("WEATHERWIZARD")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        // clap already folded PORT / ENDPOINT_URL into these.
        if let Some(port) = cli.port {
            builder = builder.set_override("server.port", i64::from(port))?;
        }
        if let Some(endpoint) = cli.endpoint {
            builder = builder.set_override("endpoint.base_url", endpoint)?;
        }

        let cfg = builder.build()?;
        cfg.try_deserialize()
    }
}
