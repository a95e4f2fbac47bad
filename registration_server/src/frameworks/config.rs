use std::{env, fmt, io, net::IpAddr, path::PathBuf, str::FromStr};

use crate::use_cases::token_issuer::{DEFAULT_MAX_RETRIES, DEFAULT_TOKEN_LENGTH};

// Runtime/server constants.

pub const DEFAULT_HTTP_PORT: u16 = 3003;
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

pub fn http_port() -> u16 {
    env::var("REGISTRATION_SERVER_PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_HTTP_PORT)
}

pub fn bind_addr() -> IpAddr {
    env::var("REGISTRATION_BIND_ADDR")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(IpAddr::from([127, 0, 0, 1]))
}

pub fn database_url() -> Option<String> {
    env::var("DATABASE_URL")
        .ok()
        .filter(|value| !value.trim().is_empty())
}

pub fn admin_api_token() -> io::Result<String> {
    env::var("ADMIN_API_TOKEN")
        .ok()
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| io::Error::other("ADMIN_API_TOKEN must be set"))
}

pub fn upload_dir() -> PathBuf {
    env::var("UPLOAD_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("./uploads"))
}

pub fn public_base_url() -> String {
    env::var("PUBLIC_BASE_URL")
        .unwrap_or_else(|_| format!("http://127.0.0.1:{DEFAULT_HTTP_PORT}"))
}

pub fn token_length() -> io::Result<usize> {
    parse_setting("TOKEN_LENGTH", env::var("TOKEN_LENGTH").ok(), DEFAULT_TOKEN_LENGTH)
}

pub fn token_max_retries() -> io::Result<u32> {
    parse_setting(
        "TOKEN_MAX_RETRIES",
        env::var("TOKEN_MAX_RETRIES").ok(),
        DEFAULT_MAX_RETRIES,
    )
}

pub fn max_upload_bytes() -> io::Result<usize> {
    parse_setting(
        "MAX_UPLOAD_BYTES",
        env::var("MAX_UPLOAD_BYTES").ok(),
        DEFAULT_MAX_UPLOAD_BYTES,
    )
}

// Unset means the default; a value that is set but does not parse is an error.
fn parse_setting<T: FromStr>(name: &str, raw: Option<String>, default: T) -> io::Result<T> {
    match raw {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| io::Error::other(format!("{name} has an invalid value: {value:?}"))),
    }
}

// Everything the server needs at startup. Tests build this directly.
#[derive(Clone)]
pub struct Settings {
    pub database_url: Option<String>,
    pub admin_token: String,
    pub upload_dir: PathBuf,
    pub public_base_url: String,
    pub token_length: usize,
    pub token_max_retries: u32,
    pub max_upload_bytes: usize,
}

impl Settings {
    pub fn from_env() -> io::Result<Self> {
        Ok(Self {
            database_url: database_url(),
            admin_token: admin_api_token()?,
            upload_dir: upload_dir(),
            public_base_url: public_base_url(),
            token_length: token_length()?,
            token_max_retries: token_max_retries()?,
            max_upload_bytes: max_upload_bytes()?,
        })
    }
}

// The database URL may carry a password.
impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("database_url", &self.database_url.as_ref().map(|_| "<redacted>"))
            .field("admin_token", &"<redacted>")
            .field("upload_dir", &self.upload_dir)
            .field("public_base_url", &self.public_base_url)
            .field("token_length", &self.token_length)
            .field("token_max_retries", &self.token_max_retries)
            .field("max_upload_bytes", &self.max_upload_bytes)
            .finish()
    }
}
