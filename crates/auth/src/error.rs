//! Fehlertypen fuer den Auth-Kern

use thiserror::Error;

use marktplatz_db::DbError;

use crate::cache::CacheError;

/// Alle moeglichen Fehler im Auth-Kern
#[derive(Debug, Error)]
pub enum AuthError {
    // --- Mitglieder ---
    #[error("Mitglied existiert bereits: {0}")]
    MitgliedExistiertBereits(String),

    #[error("Mitglied nicht gefunden: {0}")]
    MitgliedNichtGefunden(String),

    // --- Anmeldedaten ---
    #[error("Passwort stimmt nicht ueberein")]
    PasswortFalsch,

    #[error("Token gehoert nicht zum Mitglied '{0}'")]
    AufruferUngleich(String),

    #[error("Token ungueltig: {0}")]
    TokenUngueltig(String),

    #[error("Passwort-Hashing fehlgeschlagen: {0}")]
    PasswortHashing(String),

    // --- E-Mail-Verifizierung ---
    #[error("Keine Verifizierungsdaten fuer '{0}' vorhanden")]
    VerifizierungsdatenNichtGefunden(String),

    #[error("Zertifizierungscode stimmt nicht ueberein")]
    CodeUngleich,

    #[error("E-Mail-Verifizierung fuer '{0}' nicht abgeschlossen")]
    VerifizierungErforderlich(String),

    #[error("Versand der Zertifizierungsmail fehlgeschlagen")]
    MailVersandFehlgeschlagen,

    // --- Foederierte Anmeldung ---
    #[error("Login-Anbieter nicht unterstuetzt: {0}")]
    AnbieterNichtUnterstuetzt(String),

    // --- Eingaben ---
    #[error("Ungueltige Eingabe: {0}")]
    UngueltigeEingabe(String),

    // --- Infrastruktur ---
    #[error("Speicher nicht erreichbar: {0}")]
    SpeicherNichtErreichbar(String),

    #[error("Interner Fehler: {0}")]
    Intern(String),
}

impl AuthError {
    pub fn intern(msg: impl Into<String>) -> Self {
        Self::Intern(msg.into())
    }

    pub fn ungueltige_eingabe(msg: impl Into<String>) -> Self {
        Self::UngueltigeEingabe(msg.into())
    }

    /// HTTP-Statuscode fuer REST-Fehler
    pub fn http_status(&self) -> u16 {
        match self {
            Self::MitgliedExistiertBereits(_) => 409,
            Self::MitgliedNichtGefunden(_) => 404,
            Self::PasswortFalsch | Self::TokenUngueltig(_) => 401,
            Self::AufruferUngleich(_) | Self::VerifizierungErforderlich(_) => 403,
            Self::VerifizierungsdatenNichtGefunden(_)
            | Self::CodeUngleich
            | Self::AnbieterNichtUnterstuetzt(_)
            | Self::UngueltigeEingabe(_) => 400,
            Self::MailVersandFehlgeschlagen => 502,
            Self::SpeicherNichtErreichbar(_) => 503,
            Self::PasswortHashing(_) | Self::Intern(_) => 500,
        }
    }

    /// Gibt true zurueck wenn der Aufrufer den Fehler verursacht hat
    pub fn ist_client_fehler(&self) -> bool {
        self.http_status() < 500
    }
}

impl From<DbError> for AuthError {
    fn from(e: DbError) -> Self {
        match e {
            e if e.ist_eindeutigkeit() => Self::MitgliedExistiertBereits(e.to_string()),
            e if e.ist_zeitlimit() => Self::SpeicherNichtErreichbar(
                "Zeitlimit fuer Datenbankverbindung ueberschritten".into(),
            ),
            other => Self::SpeicherNichtErreichbar(other.to_string()),
        }
    }
}

impl From<CacheError> for AuthError {
    fn from(e: CacheError) -> Self {
        match e {
            CacheError::NichtErreichbar(_) => Self::SpeicherNichtErreichbar(e.to_string()),
            CacheError::UngueltigeLebensdauer(_) => Self::Intern(e.to_string()),
        }
    }
}

/// Result-Alias fuer den Auth-Kern
pub type AuthResult<T> = Result<T, AuthError>;
