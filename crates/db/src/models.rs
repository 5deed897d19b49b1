//! Datenbankmodelle fuer Marktplatz
//!
//! Diese Typen repraesentieren Datensaetze aus der Datenbank.
//! Sie sind von den Auth-Typen getrennt und dienen als reine Datenuebertragungsobjekte.

use chrono::{DateTime, Utc};
use marktplatz_core::{LoginTyp, Rolle};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Mitglieder
// ---------------------------------------------------------------------------

/// Mitglieds-Datensatz aus der Datenbank
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MitgliedRecord {
    pub id: i64,
    /// Menschlich gewaehlte oder synthetisierte Kennung (`kakao_123`)
    pub member_id: String,
    pub member_name: String,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub phone_number: Option<String>,
    pub address: Option<String>,
    pub role: Rolle,
    pub login_type: LoginTyp,
    pub created_at: DateTime<Utc>,
}

/// Daten zum Erstellen eines neuen Mitglieds
#[derive(Debug, Clone)]
pub struct NeuesMitglied<'a> {
    pub member_id: &'a str,
    pub member_name: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub phone_number: Option<&'a str>,
    pub address: Option<&'a str>,
    pub role: Rolle,
    pub login_type: LoginTyp,
}
