use deadpool_postgres::{Config as PgConfig, ManagerConfig, Pool, PoolConfig, RecyclingMethod, Runtime, Timeouts};
use native_tls::{Certificate, TlsConnector, TlsConnectorBuilder};
use postgres_native_tls::MakeTlsConnector;
use std::io;
use std::time::Duration;
use std::{env, fs};
use tokio_postgres::NoTls;

use crate::config::Config;

const POOL_TIMEOUT: Duration = Duration::from_secs(5);

/// Builds the connection pool from `DATABASE_URL`, with TLS chosen by its
/// `sslmode` parameter.
pub(crate) fn create_pool(cfg: &Config) -> io::Result<Pool> {
    let pg_config: tokio_postgres::Config = cfg
        .database_url
        .parse()
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, format!("invalid DATABASE_URL: {e}")))?;

    let mut pool_cfg = PgConfig::new();
    if let Some(host) = pg_config.get_hosts().first() {
        match host {
            tokio_postgres::config::Host::Tcp(h) => pool_cfg.host = Some(h.clone()),
            #[cfg(unix)]
            tokio_postgres::config::Host::Unix(p) => pool_cfg.host = Some(p.to_string_lossy().into()),
        }
    }
    if let Some(port) = pg_config.get_ports().first() {
        pool_cfg.port = Some(*port);
    }
    if let Some(user) = pg_config.get_user() {
        pool_cfg.user = Some(user.into());
    }
    if let Some(pw) = pg_config.get_password() {
        pool_cfg.password = Some(String::from_utf8_lossy(pw).into());
    }
    if let Some(db) = pg_config.get_dbname() {
        pool_cfg.dbname = Some(db.into());
    }

    pool_cfg.manager = Some(ManagerConfig {
        recycling_method: RecyclingMethod::Fast,
    });
    let mut pool_config = PoolConfig::new(cfg.pool_size);
    pool_config.timeouts = Timeouts {
        wait: Some(POOL_TIMEOUT),
        create: Some(POOL_TIMEOUT),
        recycle: Some(POOL_TIMEOUT),
    };
    pool_cfg.pool = Some(pool_config);

    let ssl_mode = DbSslMode::from_database_url(&cfg.database_url);
    let pool = if ssl_mode == DbSslMode::Disable {
        log::warn!("Database TLS mode: disabled (sslmode=disable)");
        pool_cfg.create_pool(Some(Runtime::Tokio1), NoTls)
    } else {
        let mut tls_builder = TlsConnector::builder();
        if matches!(ssl_mode, DbSslMode::Require | DbSslMode::Prefer) {
            // libpq `sslmode=require`: encrypted, but no cert/hostname checks.
            tls_builder.danger_accept_invalid_certs(true);
            tls_builder.danger_accept_invalid_hostnames(true);
        }
        add_ssl_root_cert_if_present(&cfg.database_url, &mut tls_builder);

        let connector = tls_builder.build().map_err(io::Error::other)?;
        log::info!("Database TLS mode: {ssl_mode:?}");
        pool_cfg.create_pool(Some(Runtime::Tokio1), MakeTlsConnector::new(connector))
    };

    pool.map_err(io::Error::other)
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum DbSslMode {
    Disable,
    Prefer,
    Require,
    VerifyCa,
    VerifyFull,
}

impl DbSslMode {
    fn from_database_url(database_url: &str) -> Self {
        match extract_query_param(database_url, "sslmode")
            .as_deref()
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("verify-ca") => Self::VerifyCa,
            Some("verify-full") => Self::VerifyFull,
            Some("require") => Self::Require,
            Some("prefer") => Self::Prefer,
            _ => Self::Disable,
        }
    }
}

fn extract_query_param(database_url: &str, key: &str) -> Option<String> {
    let (_, query) = database_url.split_once('?')?;
    query.split('&').find_map(|pair| {
        let (name, value) = pair.split_once('=')?;
        name.eq_ignore_ascii_case(key).then(|| value.to_string())
    })
}

fn add_ssl_root_cert_if_present(database_url: &str, tls_builder: &mut TlsConnectorBuilder) {
    let Some(cert_path) = extract_query_param(database_url, "sslrootcert")
        .or_else(|| env::var("PGSSLROOTCERT").ok())
        .or_else(|| env::var("DATABASE_SSL_ROOT_CERT").ok())
    else {
        return;
    };

    let cert = fs::read(&cert_path)
        .map_err(|err| format!("Failed to read database root certificate at {cert_path}: {err}"))
        .and_then(|bytes| {
            Certificate::from_pem(&bytes)
                .map_err(|err| format!("Failed to parse database root certificate at {cert_path}: {err}"))
        });
    match cert {
        Ok(cert) => {
            tls_builder.add_root_certificate(cert);
            log::info!("Loaded database root certificate from {cert_path}");
        }
        Err(msg) => log::warn!("{msg}"),
    }
}
