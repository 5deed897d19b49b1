//! Repository-Trait-Definitionen
//!
//! Das Repository-Pattern entkoppelt den Auth-Kern von der konkreten
//! Datenbank-Implementierung. Implementierungen muessen Verletzungen der
//! Eindeutigkeit von `member_id` als [`DbError::Eindeutigkeit`] melden,
//! damit der Kern sie von allgemeinen I/O-Fehlern unterscheiden kann.

use crate::error::DbError;
use crate::models::{MitgliedRecord, NeuesMitglied};

/// Result-Alias fuer Datenbankoperationen
pub type DbResult<T> = Result<T, DbError>;

/// Konfiguration fuer die Datenbankverbindung
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Verbindungs-URL (z.B. "sqlite://marktplatz.db")
    pub url: String,
    /// Maximale Anzahl gleichzeitiger Verbindungen im Pool
    pub max_verbindungen: u32,
    /// Ob WAL-Modus bei SQLite aktiviert werden soll
    pub sqlite_wal: bool,
    /// Frist in Sekunden fuer das Beziehen einer Verbindung aus dem Pool
    pub zeitlimit_sekunden: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://marktplatz.db".into(),
            max_verbindungen: 5,
            sqlite_wal: true,
            zeitlimit_sekunden: 5,
        }
    }
}

/// Repository fuer Mitglieds-Datenzugriffe
#[allow(async_fn_in_trait)]
pub trait MitgliedRepository: Send + Sync {
    /// Prueft ob ein Mitglied mit dieser Kennung existiert
    async fn exists(&self, member_id: &str) -> DbResult<bool>;

    /// Legt ein neues Mitglied an
    ///
    /// Schlaegt mit [`DbError::Eindeutigkeit`] fehl wenn die Kennung vergeben ist.
    async fn create(&self, data: NeuesMitglied<'_>) -> DbResult<MitgliedRecord>;

    /// Laedt ein Mitglied anhand seiner Kennung
    async fn get_by_member_id(&self, member_id: &str) -> DbResult<Option<MitgliedRecord>>;
}
