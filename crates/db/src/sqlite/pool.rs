//! SQLite-Pool fuer die Mitgliedertabelle
//!
//! Dateibasierte Datenbanken laufen wahlweise im WAL-Modus; die
//! Verbindungsfrist aus [`DatabaseConfig`] gilt sowohl fuer das Beziehen einer
//! Verbindung aus dem Pool als auch fuer gesperrte Tabellen.

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

use crate::error::DbError;
use crate::repository::DatabaseConfig;

/// Datenbank-Handle fuer Mitgliedskonten
#[derive(Debug, Clone)]
pub struct SqliteDb {
    pub(crate) pool: SqlitePool,
}

impl SqliteDb {
    /// Oeffnet (oder erstellt) die Datenbank und bringt das Schema auf Stand
    pub async fn oeffnen(config: &DatabaseConfig) -> Result<Self, DbError> {
        let frist = Duration::from_secs(config.zeitlimit_sekunden);
        let journal = if config.sqlite_wal {
            SqliteJournalMode::Wal
        } else {
            SqliteJournalMode::Delete
        };

        let opts = SqliteConnectOptions::from_str(&config.url)?
            .create_if_missing(true)
            .journal_mode(journal)
            .busy_timeout(frist);
        let pool_opts = SqlitePoolOptions::new()
            .max_connections(config.max_verbindungen)
            .acquire_timeout(frist);

        let db = Self::verbinden(opts, pool_opts).await?;
        info!(
            url = %config.url,
            wal = config.sqlite_wal,
            max_verbindungen = config.max_verbindungen,
            "Mitglieder-Datenbank geoeffnet"
        );
        Ok(db)
    }

    /// Fluechtige Datenbank im Arbeitsspeicher
    ///
    /// Der Pool haelt genau eine Verbindung offen, sonst verschwindet das
    /// Schema mit der letzten Verbindung.
    pub async fn in_memory() -> Result<Self, DbError> {
        let opts = SqliteConnectOptions::from_str("sqlite::memory:")?;
        let pool_opts = SqlitePoolOptions::new().max_connections(1).min_connections(1);
        Self::verbinden(opts, pool_opts).await
    }

    async fn verbinden(
        opts: SqliteConnectOptions,
        pool_opts: SqlitePoolOptions,
    ) -> Result<Self, DbError> {
        let db = Self {
            pool: pool_opts.connect_with(opts).await?,
        };
        db.schema_aktualisieren().await?;
        Ok(db)
    }

    /// Spielt ausstehende Migrationen ein
    pub async fn schema_aktualisieren(&self) -> Result<(), DbError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        debug!("Mitglieder-Schema aktuell");
        Ok(())
    }
}
