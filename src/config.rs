use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

/// Application-level constants
pub const APP_NAME: &str = "I95D";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Environment overrides
pub const ENV_DATA_DIR: &str = "I95D_DATA_DIR";
pub const ENV_BIND_ADDR: &str = "I95D_BIND_ADDR";
pub const ENV_LOG: &str = "I95D_LOG";

pub const DEFAULT_BIND_ADDR: SocketAddr =
    SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 8787);

/// Get the application data directory.
///
/// `$I95D_DATA_DIR` when set, otherwise ~/I95D/ (falling back to the
/// working directory when no home directory can be determined).
pub fn app_data_dir() -> PathBuf {
    if let Some(dir) = std::env::var_os(ENV_DATA_DIR).filter(|v| !v.is_empty()) {
        return PathBuf::from(dir);
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// SQLite file holding the funnel snapshots.
pub fn database_path() -> PathBuf {
    app_data_dir().join("funnel.db")
}

/// Address the HTTP API listens on.
///
/// An unparsable `$I95D_BIND_ADDR` is logged and the default is used.
pub fn bind_addr() -> SocketAddr {
    parse_bind_addr(std::env::var(ENV_BIND_ADDR).ok().as_deref())
}

fn parse_bind_addr(raw: Option<&str>) -> SocketAddr {
    match raw.map(str::trim) {
        Some(value) if !value.is_empty() => value.parse().unwrap_or_else(|e| {
            tracing::warn!(value, "Ignoring invalid {ENV_BIND_ADDR}: {e}");
            DEFAULT_BIND_ADDR
        }),
        _ => DEFAULT_BIND_ADDR,
    }
}

/// Tracing filter used when `RUST_LOG` is not set.
pub fn default_log_filter() -> String {
    std::env::var(ENV_LOG)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| "i95d_lib=info,i95d=info,tower_http=warn".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn database_under_app_data() {
        let db = database_path();
        assert!(db.starts_with(app_data_dir()));
        assert!(db.ends_with("funnel.db"));
    }

    #[test]
    fn bind_addr_falls_back_to_default() {
        assert_eq!(parse_bind_addr(None), DEFAULT_BIND_ADDR);
        assert_eq!(parse_bind_addr(Some("  ")), DEFAULT_BIND_ADDR);
        assert_eq!(parse_bind_addr(Some("not-an-addr")), DEFAULT_BIND_ADDR);
        assert_eq!(DEFAULT_BIND_ADDR.port(), 8787);
    }

    #[test]
    fn bind_addr_override_is_parsed() {
        let addr = parse_bind_addr(Some(" 0.0.0.0:9000 "));
        assert_eq!(addr, SocketAddr::from(([0, 0, 0, 0], 9000)));
    }

    #[test]
    fn app_version_matches_cargo() {
        assert_eq!(APP_VERSION, env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn default_filter_mentions_crate() {
        if std::env::var(ENV_LOG).is_err() {
            assert!(default_log_filter().contains("i95d_lib"));
        }
    }
}
