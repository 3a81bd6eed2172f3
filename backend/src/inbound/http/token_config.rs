//! Environment-driven access token settings.
//!
//! | Variable                   | Meaning                                         |
//! |----------------------------|-------------------------------------------------|
//! | `ACCESS_TOKEN_SECRET_FILE` | Path to the HS256 signing secret                |
//! | `ACCESS_TOKEN_SECRET`      | Inline secret, honoured in debug builds only    |
//! | `ACCESS_TOKEN_TTL`         | Lifetime: `1h` (default), `7d`, `30m`, seconds  |
//!
//! Release builds require a secret file of at least 32 bytes. Debug builds
//! fall back to the inline secret and then to a random per-process secret.

pub mod fingerprint;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use mockable::{Clock, Env};
use rand::RngCore;
use tracing::{info, warn};
use zeroize::Zeroizing;

use crate::domain::TokenIssuer;

use self::fingerprint::secret_fingerprint;

pub(crate) const SECRET_FILE_ENV: &str = "ACCESS_TOKEN_SECRET_FILE";
pub(crate) const SECRET_ENV: &str = "ACCESS_TOKEN_SECRET";
pub(crate) const TTL_ENV: &str = "ACCESS_TOKEN_TTL";
pub(crate) const SECRET_MIN_LEN: usize = 32;
const DEFAULT_TTL: Duration = Duration::from_secs(60 * 60);
const TTL_EXPECTED: &str = "<n>s|<n>m|<n>h|<n>d|<seconds>";

/// Build mode for validation strictness.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    /// Tolerates missing secrets with warnings.
    Debug,
    /// Requires an explicit secret file.
    Release,
}

impl BuildMode {
    /// Determine the build mode from `cfg!(debug_assertions)`.
    #[must_use]
    pub fn from_debug_assertions() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }

    fn is_debug(self) -> bool {
        matches!(self, Self::Debug)
    }
}

/// Errors raised while validating token configuration.
#[derive(thiserror::Error, Debug)]
pub enum TokenConfigError {
    #[error("missing required environment variable: {name}")]
    MissingEnv { name: &'static str },
    #[error("invalid value for {name}='{value}'; expected {expected}")]
    InvalidEnv {
        name: &'static str,
        value: String,
        expected: &'static str,
    },
    #[error("failed to read token secret at {path}: {source}")]
    SecretRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("token secret too short: need >= {min_len} bytes, got {length}")]
    SecretTooShort { length: usize, min_len: usize },
    #[error("ACCESS_TOKEN_SECRET is not accepted in release builds; use ACCESS_TOKEN_SECRET_FILE")]
    InlineSecretNotAllowed,
}

/// Validated token settings. The secret is wiped on drop.
pub struct TokenSettings {
    secret: Zeroizing<Vec<u8>>,
    ttl: Duration,
}

impl TokenSettings {
    /// Token lifetime.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Short hex fingerprint of the secret for logs.
    pub fn fingerprint(&self) -> String {
        secret_fingerprint(&self.secret)
    }

    /// Derive the issuer; the secret bytes are zeroised when `self` drops.
    pub fn into_issuer(self, clock: Arc<dyn Clock>) -> TokenIssuer {
        TokenIssuer::new(&self.secret, self.ttl, clock)
    }
}

impl std::fmt::Debug for TokenSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenSettings")
            .field("fingerprint", &self.fingerprint())
            .field("ttl", &self.ttl)
            .finish()
    }
}

/// Read token settings from the environment.
///
/// # Examples
///
/// ```rust
/// use academy::inbound::http::token_config::{BuildMode, token_settings_from_env};
/// use mockable::MockEnv;
///
/// let mut env = MockEnv::new();
/// env.expect_string().returning(|name| match name {
///     "ACCESS_TOKEN_SECRET" => Some("an inline development secret".to_owned()),
///     "ACCESS_TOKEN_TTL" => Some("7d".to_owned()),
///     _ => None,
/// });
///
/// let settings = token_settings_from_env(&env, BuildMode::Debug).expect("valid settings");
/// assert_eq!(settings.ttl().as_secs(), 7 * 24 * 60 * 60);
/// ```
pub fn token_settings_from_env<E: Env>(
    env: &E,
    mode: BuildMode,
) -> Result<TokenSettings, TokenConfigError> {
    let ttl = ttl_from_env(env, mode)?;
    let secret = secret_from_env(env, mode)?;
    let settings = TokenSettings { secret, ttl };
    info!(
        fingerprint = %settings.fingerprint(),
        ttl_secs = ttl.as_secs(),
        "access token secret loaded"
    );
    Ok(settings)
}

fn ttl_from_env<E: Env>(env: &E, mode: BuildMode) -> Result<Duration, TokenConfigError> {
    let Some(value) = env.string(TTL_ENV) else {
        return Ok(DEFAULT_TTL);
    };
    match parse_ttl(&value) {
        Some(ttl) => Ok(ttl),
        None if mode.is_debug() => {
            warn!(value = %value, "invalid ACCESS_TOKEN_TTL; defaulting to 1h");
            Ok(DEFAULT_TTL)
        }
        None => Err(TokenConfigError::InvalidEnv {
            name: TTL_ENV,
            value,
            expected: TTL_EXPECTED,
        }),
    }
}

fn secret_from_env<E: Env>(
    env: &E,
    mode: BuildMode,
) -> Result<Zeroizing<Vec<u8>>, TokenConfigError> {
    if let Some(path) = env.string(SECRET_FILE_ENV) {
        let path = PathBuf::from(path);
        let bytes = std::fs::read(&path)
            .map(Zeroizing::new)
            .map_err(|source| TokenConfigError::SecretRead { path, source })?;
        return check_length(trim_trailing_newline(bytes), mode);
    }

    if let Some(inline) = env.string(SECRET_ENV) {
        let inline = Zeroizing::new(inline);
        if !mode.is_debug() {
            return Err(TokenConfigError::InlineSecretNotAllowed);
        }
        return check_length(Zeroizing::new(inline.as_bytes().to_vec()), mode);
    }

    if mode.is_debug() {
        warn!("no access token secret configured; using an ephemeral secret (dev only)");
        let mut secret = Zeroizing::new(vec![0_u8; SECRET_MIN_LEN]);
        rand::thread_rng().fill_bytes(&mut secret);
        return Ok(secret);
    }
    Err(TokenConfigError::MissingEnv {
        name: SECRET_FILE_ENV,
    })
}

fn check_length(
    secret: Zeroizing<Vec<u8>>,
    mode: BuildMode,
) -> Result<Zeroizing<Vec<u8>>, TokenConfigError> {
    let length = secret.len();
    if length == 0 || (!mode.is_debug() && length < SECRET_MIN_LEN) {
        return Err(TokenConfigError::SecretTooShort {
            length,
            min_len: SECRET_MIN_LEN,
        });
    }
    if length < SECRET_MIN_LEN {
        warn!(length, "access token secret is shorter than recommended");
    }
    Ok(secret)
}

/// Secret files written with `echo` carry a trailing newline.
fn trim_trailing_newline(mut bytes: Zeroizing<Vec<u8>>) -> Zeroizing<Vec<u8>> {
    while matches!(bytes.last(), Some(b'\n' | b'\r')) {
        bytes.pop();
    }
    bytes
}

/// Parse `90`, `45s`, `30m`, `1h`, or `7d`. Zero is rejected.
pub(crate) fn parse_ttl(raw: &str) -> Option<Duration> {
    let raw = raw.trim();
    let (digits, unit) = match raw.char_indices().last() {
        Some((idx, ch)) if ch.is_ascii_alphabetic() => (&raw[..idx], Some(ch)),
        _ => (raw, None),
    };
    let amount: u64 = digits.parse().ok()?;
    let multiplier = match unit.map(|ch| ch.to_ascii_lowercase()) {
        None | Some('s') => 1,
        Some('m') => 60,
        Some('h') => 60 * 60,
        Some('d') => 24 * 60 * 60,
        Some(_) => return None,
    };
    let secs = amount.checked_mul(multiplier)?;
    (secs > 0).then(|| Duration::from_secs(secs))
}
