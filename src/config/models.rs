// src/config/models.rs
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use tracing::debug;

const ENV_DB_TYPE: &str = "GOSTDB_TYPE";
const ENV_DB_URL: &str = "GOSTDB_URL";
const ENV_SQLITE3_PATH: &str = "GOSTDB_SQLITE3_PATH";

const DEFAULT_DB_TYPE: &str = "sqlite3";
const DEFAULT_SQLITE3_FILE: &str = "gost.sqlite3";

/// Backend selected by a resolved configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DbKind {
    Sqlite3,
    Mysql,
    Postgres,
    Redis,
    Http,
    Unrecognized,
}

impl DbKind {
    fn parse(s: &str) -> Self {
        match s {
            "sqlite3" => DbKind::Sqlite3,
            "mysql" => DbKind::Mysql,
            "postgres" => DbKind::Postgres,
            "redis" => DbKind::Redis,
            "http" => DbKind::Http,
            _ => DbKind::Unrecognized,
        }
    }
}

/// Connection settings for the gost dictionary database.
///
/// `url` and `sqlite3_path` are connection secrets: they are skipped when
/// serializing and redacted from `Debug` output. Resolve once at startup,
/// then share by read-only reference; concurrent `resolve` calls on the
/// same object are the caller's problem.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DbConfig {
    /// Backend type: sqlite3, mysql, postgres, redis or http
    #[serde(rename = "type")]
    pub db_type: String,

    /// http://gost-server:1324 or a DB connection string
    #[serde(skip_serializing)]
    pub url: String,

    /// Path to the embedded sqlite3 database file
    #[serde(skip_serializing)]
    pub sqlite3_path: PathBuf,
}

impl DbConfig {
    /// Resolve the configuration in place with the following priority.
    /// 1. Environment variable
    /// 2. Values already present (file baseline)
    /// 3. Defaults
    ///
    /// Never fails; repeated calls under the same environment are stable.
    pub fn resolve(&mut self) {
        self.overlay_env(|key| std::env::var(key).ok());
        self.apply_defaults();
    }

    /// Overwrites fields whose environment binding is set to a non-empty
    /// value. An empty variable counts as unset.
    fn overlay_env<F>(&mut self, var: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(db_type) = non_empty(var(ENV_DB_TYPE)) {
            debug!("{} is set, overriding db type", ENV_DB_TYPE);
            self.db_type = db_type;
        }
        if let Some(url) = non_empty(var(ENV_DB_URL)) {
            debug!("{} is set, overriding server url", ENV_DB_URL);
            self.url = url;
        }
        if let Some(path) = non_empty(var(ENV_SQLITE3_PATH)) {
            debug!("{} is set, overriding sqlite3 path", ENV_SQLITE3_PATH);
            self.sqlite3_path = PathBuf::from(path);
        }
    }

    fn apply_defaults(&mut self) {
        if self.db_type.is_empty() {
            self.db_type = DEFAULT_DB_TYPE.to_string();
        }
        if self.url.is_empty() && self.sqlite3_path.as_os_str().is_empty() {
            // A failed cwd lookup degrades to a relative path.
            self.sqlite3_path = match std::env::current_dir() {
                Ok(wd) => wd.join(DEFAULT_SQLITE3_FILE),
                Err(_) => PathBuf::from(DEFAULT_SQLITE3_FILE),
            };
        }
    }

    /// Backend kind named by `db_type`. Unknown strings are accepted and
    /// only matter where components branch on the kind.
    pub fn kind(&self) -> DbKind {
        DbKind::parse(&self.db_type)
    }

    /// Whether the dictionary is fetched over HTTP.
    pub fn fetches_via_http(&self) -> bool {
        self.kind() == DbKind::Http
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

impl fmt::Debug for DbConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DbConfig")
            .field("db_type", &self.db_type)
            .field("url", &redacted(!self.url.is_empty()))
            .field(
                "sqlite3_path",
                &redacted(!self.sqlite3_path.as_os_str().is_empty()),
            )
            .finish()
    }
}

fn redacted(set: bool) -> &'static str {
    if set {
        "<redacted>"
    } else {
        "<unset>"
    }
}


#[cfg(test)]
mod precedence_props {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn env_value_always_wins(baseline in "[a-z0-9]{0,12}", value in "[a-z0-9]{1,12}") {
            let mut cfg = DbConfig {
                db_type: baseline,
                ..Default::default()
            };
            cfg.overlay_env(|key| (key == ENV_DB_TYPE).then(|| value.clone()));
            cfg.apply_defaults();

            prop_assert_eq!(cfg.db_type, value);
        }

        #[test]
        fn absent_env_keeps_baseline(baseline in "[a-z0-9]{1,12}") {
            let mut cfg = DbConfig {
                db_type: baseline.clone(),
                ..Default::default()
            };
            cfg.overlay_env(|_| None);
            cfg.apply_defaults();

            prop_assert_eq!(cfg.db_type, baseline);
        }

        #[test]
        fn resolving_twice_is_stable(
            db_type in "[a-z0-9]{0,8}",
            url in "(http://[a-z]{1,8}(:[0-9]{1,4})?)?",
            env_url in "(http://[a-z]{1,8})?",
        ) {
            let mut cfg = DbConfig {
                db_type,
                url,
                ..Default::default()
            };
            let vars = move |key: &str| {
                (key == ENV_DB_URL && !env_url.is_empty()).then(|| env_url.clone())
            };

            cfg.overlay_env(&vars);
            cfg.apply_defaults();
            let first = cfg.clone();

            cfg.overlay_env(&vars);
            cfg.apply_defaults();
            prop_assert_eq!(cfg, first);
        }
    }
}
