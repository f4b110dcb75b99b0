use std::{net::SocketAddr, time::Duration};

use rand::{rngs::OsRng, RngCore};
use rust_decimal::Decimal;

use fleetdesk_core::closures::ReconcileTolerance;
use fleetdesk_core::statements::{ClassifierRule, SourceClassifier, StatementSource};

pub struct Config {
    pub listen_addr: SocketAddr,
    pub db_path: String,
    pub uploads_dir: String,
    pub static_dir: String,
    pub cors_allow: Vec<String>,
    pub request_timeout: Duration,
    pub secret_key: Vec<u8>,
    pub token_ttl: Duration,
    pub tolerance: ReconcileTolerance,
    pub classifier: SourceClassifier,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        let listen_addr: SocketAddr = std::env::var("FD_LISTEN_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:8080".to_string())
            .parse()
            .expect("Invalid FD_LISTEN_ADDR");
        let db_path =
            std::env::var("FD_DB_PATH").unwrap_or_else(|_| "./data/fleetdesk.db".into());
        let uploads_dir =
            std::env::var("FD_UPLOADS_DIR").unwrap_or_else(|_| "./data/uploads".into());
        let static_dir = std::env::var("FD_STATIC_DIR").unwrap_or_else(|_| "dist".into());
        let cors_allow = std::env::var("FD_CORS_ALLOW_ORIGINS")
            .unwrap_or_else(|_| "*".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        let timeout_ms: u64 = std::env::var("FD_REQUEST_TIMEOUT_MS")
            .unwrap_or_else(|_| "30000".into())
            .parse()
            .unwrap_or(30000);
        let secret_key = match std::env::var("FD_SECRET_KEY") {
            Ok(raw) => crate::auth::decode_secret_key(&raw).expect("Invalid FD_SECRET_KEY"),
            Err(_) => {
                tracing::warn!(
                    "FD_SECRET_KEY is not set; using a random secret, issued tokens will not survive a restart"
                );
                let mut bytes = [0u8; 32];
                OsRng.fill_bytes(&mut bytes);
                bytes.to_vec()
            }
        };
        let token_ttl_secs: u64 = std::env::var("FD_TOKEN_TTL_SECS")
            .unwrap_or_else(|_| "86400".into())
            .parse()
            .unwrap_or(86400);
        Self {
            listen_addr,
            db_path,
            uploads_dir,
            static_dir,
            cors_allow,
            request_timeout: Duration::from_millis(timeout_ms),
            secret_key,
            token_ttl: Duration::from_secs(token_ttl_secs),
            tolerance: tolerance_from_env(),
            classifier: classifier_from_env(),
        }
    }
}

fn tolerance_from_env() -> ReconcileTolerance {
    let defaults = ReconcileTolerance::default();
    let ratio = decimal_var("FD_RECONCILE_TOLERANCE_RATIO").unwrap_or(defaults.ratio);
    let min_delta = decimal_var("FD_RECONCILE_MIN_DELTA").unwrap_or(defaults.min_delta);
    ReconcileTolerance { ratio, min_delta }
}

fn decimal_var(key: &str) -> Option<Decimal> {
    let raw = std::env::var(key).ok()?;
    match raw.trim().parse::<Decimal>() {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!("Ignoring {key}={raw}: {e}");
            None
        }
    }
}

/// Parses `FD_CLASSIFIER_RULES` of the form `keyword=source,...`
/// (e.g. `banco=bank,freenow=freenow,uber=uber`). Unset or empty keeps the
/// built-in rules; malformed entries are skipped.
fn classifier_from_env() -> SourceClassifier {
    let Ok(raw) = std::env::var("FD_CLASSIFIER_RULES") else {
        return SourceClassifier::default();
    };
    let mut rules = Vec::new();
    for entry in raw.split(',').map(str::trim).filter(|e| !e.is_empty()) {
        let Some((keyword, label)) = entry.split_once('=') else {
            tracing::warn!("Ignoring malformed classifier rule '{entry}'");
            continue;
        };
        let Some(source) = StatementSource::ALL
            .iter()
            .copied()
            .find(|s| s.as_str().eq_ignore_ascii_case(label.trim()))
        else {
            tracing::warn!("Ignoring classifier rule '{entry}': unknown source");
            continue;
        };
        rules.push(ClassifierRule {
            keyword: keyword.trim().to_string(),
            source,
        });
    }
    if rules.is_empty() {
        SourceClassifier::default()
    } else {
        SourceClassifier::new(rules)
    }
}
