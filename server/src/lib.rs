//! marktplatz-server – Bibliotheks-Root
//!
//! Deklariert alle Server-Module und stellt den oeffentlichen Einstiegspunkt
//! fuer Integrationstests bereit.

pub mod config;
pub mod rest;

use std::sync::Arc;

use anyhow::{Context, Result};
use secrecy::SecretString;

use config::ServerConfig;
use marktplatz_auth::{SpeicherCache, TokenAussteller};
use marktplatz_db::SqliteDb;
use rest::{AppState, RestServer, RestServerKonfig};

/// Haelt den laufenden Server-Zustand zusammen
pub struct Server {
    pub config: ServerConfig,
}

impl Server {
    /// Erstellt einen neuen Server aus der gegebenen Konfiguration
    pub fn neu(config: ServerConfig) -> Self {
        Self { config }
    }

    /// Startet alle Server-Subsysteme und laeuft bis zum Shutdown-Signal
    ///
    /// Reihenfolge:
    /// 1. Token-Aussteller aus dem Geheimnis erstellen
    /// 2. Datenbankverbindung herstellen, Migrationen ausfuehren
    /// 3. TTL-Cache mit Cleanup-Task starten
    /// 4. REST-API starten und auf Ctrl-C warten
    pub async fn starten(self) -> Result<()> {
        let auth_konfig = self.config.auth_konfig();

        let aussteller = TokenAussteller::neu(
            SecretString::from(self.config.auth.jwt_geheimnis.clone()),
            auth_konfig.sitzung_ttl,
        )
        .context("JWT-Geheimnis fehlt (auth.jwt_geheimnis oder MARKTPLATZ_JWT_GEHEIMNIS)")?;

        tracing::info!(
            server_name = %self.config.server.name,
            api = %self.config.api_bind_adresse(),
            "Server startet"
        );

        let db = SqliteDb::oeffnen(&self.config.datenbank_konfig())
            .await
            .with_context(|| {
                format!("Datenbank '{}' nicht erreichbar", self.config.datenbank.url)
            })?;

        let cache = SpeicherCache::neu_mit_cleanup(SpeicherCache::neu());

        let state = AppState::neu(Arc::new(db), cache, Arc::new(aussteller), auth_konfig);

        let bind_addr: std::net::SocketAddr = self
            .config
            .api_bind_adresse()
            .parse()
            .with_context(|| {
                format!("Ungueltige Bind-Adresse '{}'", self.config.api_bind_adresse())
            })?;

        RestServer::neu(RestServerKonfig {
            bind_addr,
            cors_origins: self.config.netzwerk.cors_origins.clone(),
        })
        .starten(state)
        .await?;

        tracing::info!("Server beendet");
        Ok(())
    }
}
