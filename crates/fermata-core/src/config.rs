use std::{
    env, fs,
    path::{Path, PathBuf},
    time::Duration,
};

use crate::{
    errors::Error,
    render::{Language, RenderStrings},
    Result,
};

/// Where the transit backend lives.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BackendConfig {
    /// Full base URL; when set, `host`/`port`/`api_version` are ignored.
    pub url: Option<String>,
    pub host: String,
    pub port: u16,
    pub api_version: String,
    pub timeout: Duration,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: None,
            host: "localhost".to_string(),
            port: 5555,
            api_version: "v1".to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

impl BackendConfig {
    /// Root every stop/line request is made under.
    pub fn base_url(&self) -> String {
        match &self.url {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => format!(
                "http://{}:{}/api/{}",
                self.host, self.port, self.api_version
            ),
        }
    }
}

/// Typed configuration, read once at startup and immutable afterwards.
#[derive(Clone, Debug)]
pub struct Config {
    // Telegram
    pub token_file: PathBuf,
    pub telegram_message_limit: usize,
    pub inbound_queue_size: usize,

    // Backend
    pub backend: BackendConfig,

    // Replies
    pub language: Language,
    pub unrecognized_reply: Option<String>,
    pub provider_error_reply: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        let language = Language::default();
        Self {
            token_file: PathBuf::from("key.txt"),
            telegram_message_limit: 4096,
            inbound_queue_size: 64,
            backend: BackendConfig::default(),
            language,
            unrecognized_reply: None,
            provider_error_reply: Some(default_provider_error_reply(language).to_string()),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(Path::new(".env"))
    }

    /// Load `dotenv` (if it exists) into the environment, then read the config
    /// from the environment. Variables already set are never overridden.
    pub fn load_from(dotenv: &Path) -> Result<Self> {
        match dotenvy::from_path(dotenv) {
            Ok(()) => {}
            Err(e) if e.not_found() => {}
            Err(e) => {
                return Err(Error::Config(format!(
                    "failed to read {}: {e}",
                    dotenv.display()
                )))
            }
        }
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup (the environment in
    /// production, a map in tests).
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();

        let language = match get("BOT_LANGUAGE") {
            Some(raw) => Language::parse(&raw).ok_or_else(|| {
                Error::Config(format!("BOT_LANGUAGE must be `it` or `en`, got `{raw}`"))
            })?,
            None => defaults.language,
        };

        let backend_defaults = BackendConfig::default();
        let backend = BackendConfig {
            url: get("BACKEND_URL").and_then(non_empty),
            host: get("BACKEND_HOST")
                .and_then(non_empty)
                .unwrap_or(backend_defaults.host),
            port: parse_num(&get, "BACKEND_PORT")?.unwrap_or(backend_defaults.port),
            api_version: get("BACKEND_API_VERSION")
                .and_then(non_empty)
                .unwrap_or(backend_defaults.api_version),
            timeout: parse_num(&get, "BACKEND_TIMEOUT_MS")?
                .map(Duration::from_millis)
                .unwrap_or(backend_defaults.timeout),
        };

        let telegram_message_limit =
            parse_num(&get, "TELEGRAM_MESSAGE_LIMIT")?.unwrap_or(defaults.telegram_message_limit);
        if telegram_message_limit == 0 {
            return Err(Error::Config(
                "TELEGRAM_MESSAGE_LIMIT must be greater than zero".to_string(),
            ));
        }
        let inbound_queue_size =
            parse_num(&get, "INBOUND_QUEUE_SIZE")?.unwrap_or(defaults.inbound_queue_size);
        if inbound_queue_size == 0 {
            return Err(Error::Config(
                "INBOUND_QUEUE_SIZE must be greater than zero".to_string(),
            ));
        }

        // Unset => language fallback; set but empty => stay silent.
        let provider_error_reply = match get("PROVIDER_ERROR_REPLY") {
            Some(s) => non_empty(s),
            None => Some(default_provider_error_reply(language).to_string()),
        };

        Ok(Self {
            token_file: get("TELEGRAM_TOKEN_FILE")
                .and_then(non_empty)
                .map(PathBuf::from)
                .unwrap_or(defaults.token_file),
            telegram_message_limit,
            inbound_queue_size,
            backend,
            language,
            unrecognized_reply: get("UNRECOGNIZED_REPLY").and_then(non_empty),
            provider_error_reply,
        })
    }

    pub fn render_strings(&self) -> RenderStrings {
        RenderStrings::for_language(self.language)
    }

    /// Read the bot token from `token_file`.
    pub fn read_token(&self) -> Result<String> {
        read_token_file(&self.token_file)
    }
}

/// Read a bot token, stripping surrounding newlines. Missing, unreadable and
/// empty files are all credential errors.
pub fn read_token_file(path: &Path) -> Result<String> {
    let raw = fs::read_to_string(path).map_err(|e| Error::Credential {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    let token = raw.trim_matches(|c| c == '\n' || c == '\r');
    if token.trim().is_empty() {
        return Err(Error::Credential {
            path: path.to_path_buf(),
            reason: "file is empty".to_string(),
        });
    }
    Ok(token.to_string())
}

pub fn default_provider_error_reply(language: Language) -> &'static str {
    match language {
        Language::Italian => "Servizio non disponibile, riprova più tardi.",
        Language::English => "Service unavailable, please try again later.",
    }
}

fn parse_num<T: std::str::FromStr>(
    get: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Result<Option<T>> {
    let Some(raw) = get(key).and_then(non_empty) else {
        return Ok(None);
    };
    raw.trim()
        .parse::<T>()
        .map(Some)
        .map_err(|_| Error::Config(format!("{key} is not a valid number: `{raw}`")))
}

fn non_empty(s: String) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s)
    }
}
