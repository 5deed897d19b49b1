//! Server-Konfiguration
//!
//! Wird beim Start aus einer TOML-Datei geladen. Alle Felder haben
//! sinnvolle Standardwerte; nur das JWT-Geheimnis muss gesetzt werden
//! (Datei oder Umgebungsvariable `MARKTPLATZ_JWT_GEHEIMNIS`).

use std::time::Duration;

use serde::{Deserialize, Serialize};

use marktplatz_auth::AuthKonfig;
use marktplatz_db::DatabaseConfig;

/// Umgebungsvariable, die das JWT-Geheimnis aus der Datei ersetzt
pub const GEHEIMNIS_UMGEBUNGSVARIABLE: &str = "MARKTPLATZ_JWT_GEHEIMNIS";

/// Vollstaendige Server-Konfiguration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Allgemeine Server-Einstellungen
    pub server: ServerEinstellungen,
    /// Netzwerk-Einstellungen
    pub netzwerk: NetzwerkEinstellungen,
    /// Datenbank-Einstellungen
    pub datenbank: DatenbankEinstellungen,
    /// Token- und Verifizierungs-Einstellungen
    pub auth: AuthEinstellungen,
    /// Logging-Einstellungen
    pub logging: LoggingEinstellungen,
}

/// Allgemeine Server-Einstellungen
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerEinstellungen {
    /// Anzeigename des Servers
    pub name: String,
}

impl Default for ServerEinstellungen {
    fn default() -> Self {
        Self {
            name: "Marktplatz".into(),
        }
    }
}

/// Netzwerk-Einstellungen
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NetzwerkEinstellungen {
    /// Bind-Adresse fuer die REST-API
    pub bind_adresse: String,
    /// Port fuer die REST-API
    pub api_port: u16,
    /// CORS-Origins fuer REST (leer = alle erlaubt)
    pub cors_origins: Vec<String>,
}

impl Default for NetzwerkEinstellungen {
    fn default() -> Self {
        Self {
            bind_adresse: "0.0.0.0".into(),
            api_port: 8080,
            cors_origins: vec![],
        }
    }
}

/// Datenbank-Einstellungen
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatenbankEinstellungen {
    /// Verbindungs-URL
    pub url: String,
    /// Maximale Verbindungspool-Groesse
    pub max_verbindungen: u32,
    /// WAL-Modus fuer SQLite
    pub sqlite_wal: bool,
    /// Frist fuer eine Pool-Verbindung in Sekunden
    pub zeitlimit_sekunden: u64,
}

impl Default for DatenbankEinstellungen {
    fn default() -> Self {
        let db = DatabaseConfig::default();
        Self {
            url: db.url,
            max_verbindungen: db.max_verbindungen,
            sqlite_wal: db.sqlite_wal,
            zeitlimit_sekunden: db.zeitlimit_sekunden,
        }
    }
}

/// Token- und Verifizierungs-Einstellungen
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthEinstellungen {
    /// HMAC-Geheimnis fuer Tokens (leer = Start verweigert)
    pub jwt_geheimnis: String,
    /// Lebensdauer von Token und Session in Sekunden
    pub sitzung_ttl_sekunden: u64,
    /// Gueltigkeit eines Zertifizierungscodes in Sekunden
    pub code_ttl_sekunden: u64,
    /// Gueltigkeit der Verifizierungsmarke in Sekunden
    pub verifiziert_ttl_sekunden: u64,
    /// Anzahl Ziffern eines Zertifizierungscodes
    pub code_laenge: usize,
}

impl Default for AuthEinstellungen {
    fn default() -> Self {
        let k = AuthKonfig::default();
        Self {
            jwt_geheimnis: String::new(),
            sitzung_ttl_sekunden: k.sitzung_ttl.as_secs(),
            code_ttl_sekunden: k.code_ttl.as_secs(),
            verifiziert_ttl_sekunden: k.verifiziert_ttl.as_secs(),
            code_laenge: k.code_laenge,
        }
    }
}

// Geheimnis nie im Log
impl std::fmt::Debug for AuthEinstellungen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthEinstellungen")
            .field("jwt_geheimnis", &"[REDACTED]")
            .field("sitzung_ttl_sekunden", &self.sitzung_ttl_sekunden)
            .field("code_ttl_sekunden", &self.code_ttl_sekunden)
            .field("verifiziert_ttl_sekunden", &self.verifiziert_ttl_sekunden)
            .field("code_laenge", &self.code_laenge)
            .finish()
    }
}

/// Logging-Einstellungen
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingEinstellungen {
    /// Log-Level: "trace", "debug", "info", "warn", "error"
    pub level: String,
    /// Format: "json" oder "text"
    pub format: String,
}

impl Default for LoggingEinstellungen {
    fn default() -> Self {
        Self {
            level: "info".into(),
            format: "text".into(),
        }
    }
}

impl ServerConfig {
    /// Laedt die Konfiguration aus einer TOML-Datei.
    /// Gibt die Standardkonfiguration zurueck wenn die Datei nicht existiert.
    /// Ein gesetztes `MARKTPLATZ_JWT_GEHEIMNIS` ersetzt das Geheimnis der Datei.
    pub fn laden(pfad: &str) -> anyhow::Result<Self> {
        let mut config = match std::fs::read_to_string(pfad) {
            Ok(inhalt) => toml::from_str::<Self>(&inhalt)
                .map_err(|e| anyhow::anyhow!("Konfigurationsfehler in '{pfad}': {e}"))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!(
                    pfad = pfad,
                    "Konfigurationsdatei nicht gefunden, verwende Standardwerte"
                );
                Self::default()
            }
            Err(e) => {
                return Err(anyhow::anyhow!(
                    "Konfigurationsdatei '{pfad}' nicht lesbar: {e}"
                ))
            }
        };

        config.geheimnis_ueberschreiben(std::env::var(GEHEIMNIS_UMGEBUNGSVARIABLE).ok());
        Ok(config)
    }

    /// Ersetzt das JWT-Geheimnis, sofern ein nicht-leerer Wert uebergeben wird
    pub fn geheimnis_ueberschreiben(&mut self, wert: Option<String>) {
        if let Some(geheimnis) = wert.filter(|g| !g.is_empty()) {
            self.auth.jwt_geheimnis = geheimnis;
        }
    }

    /// Gibt die Bind-Adresse fuer die REST-API zurueck
    pub fn api_bind_adresse(&self) -> String {
        format!("{}:{}", self.netzwerk.bind_adresse, self.netzwerk.api_port)
    }

    /// Parameter fuer den SQLite-Pool
    pub fn datenbank_konfig(&self) -> DatabaseConfig {
        DatabaseConfig {
            url: self.datenbank.url.clone(),
            max_verbindungen: self.datenbank.max_verbindungen,
            sqlite_wal: self.datenbank.sqlite_wal,
            zeitlimit_sekunden: self.datenbank.zeitlimit_sekunden,
        }
    }

    /// Parameter fuer den Auth-Kern
    pub fn auth_konfig(&self) -> AuthKonfig {
        AuthKonfig {
            code_ttl: Duration::from_secs(self.auth.code_ttl_sekunden),
            verifiziert_ttl: Duration::from_secs(self.auth.verifiziert_ttl_sekunden),
            sitzung_ttl: Duration::from_secs(self.auth.sitzung_ttl_sekunden),
            code_laenge: self.auth.code_laenge,
        }
    }
}
