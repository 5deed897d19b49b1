//! REST-Interface fuer den Auth-Kern (/api/v1/auth/...)

pub mod handlers;
pub mod routes;
pub mod server;

use std::sync::Arc;

use axum::{
    extract::rejection::JsonRejection,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
};
use serde_json::json;

use marktplatz_auth::{
    AuthError, AuthKonfig, AuthService, FoederationsBruecke, LogMailer, MitgliederVerzeichnis,
    SpeicherCache, TokenAussteller, VerifizierungsService,
};
use marktplatz_db::SqliteDb;

pub use routes::router;
pub use server::{RestServer, RestServerKonfig};

/// Axum-State: alle Services ueber denselben Datenbank- und Cache-Instanzen
#[derive(Clone)]
pub struct AppState {
    pub verzeichnis: MitgliederVerzeichnis<SqliteDb>,
    pub verifizierung: Arc<VerifizierungsService<SqliteDb, SpeicherCache, LogMailer>>,
    pub auth: Arc<AuthService<SqliteDb, SpeicherCache>>,
    pub bruecke: Arc<FoederationsBruecke<SqliteDb, SpeicherCache>>,
}

impl AppState {
    pub fn neu(
        db: Arc<SqliteDb>,
        cache: Arc<SpeicherCache>,
        aussteller: Arc<TokenAussteller>,
        konfig: AuthKonfig,
    ) -> Self {
        let verzeichnis = MitgliederVerzeichnis::neu(db);
        let verifizierung = Arc::new(VerifizierungsService::neu(
            verzeichnis.clone(),
            Arc::clone(&cache),
            Arc::new(LogMailer),
            konfig,
        ));
        let auth = Arc::new(AuthService::neu(verzeichnis.clone(), cache, aussteller));
        let bruecke = Arc::new(FoederationsBruecke::neu(
            verzeichnis.clone(),
            Arc::clone(&auth),
        ));
        Self {
            verzeichnis,
            verifizierung,
            auth,
            bruecke,
        }
    }
}

/// Fehlerantwort fuer REST-API
pub fn fehler_antwort(status: StatusCode, nachricht: &str) -> Response {
    (
        status,
        Json(json!({
            "error": {
                "code": status.as_u16(),
                "message": nachricht
            }
        })),
    )
        .into_response()
}

/// Extrahiert Bearer-Token aus Authorization-Header
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer "))
}

/// Wrapper, damit Handler `?` auf AuthResult verwenden koennen
#[derive(Debug)]
pub struct ApiFehler(pub AuthError);

impl From<AuthError> for ApiFehler {
    fn from(e: AuthError) -> Self {
        Self(e)
    }
}

impl From<JsonRejection> for ApiFehler {
    fn from(e: JsonRejection) -> Self {
        Self(AuthError::ungueltige_eingabe(e.body_text()))
    }
}

impl IntoResponse for ApiFehler {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.0.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if self.0.ist_client_fehler() {
            tracing::debug!(fehler = %self.0, status = status.as_u16(), "Anfrage abgelehnt");
        } else {
            tracing::error!(fehler = %self.0, status = status.as_u16(), "Anfrage fehlgeschlagen");
        }
        fehler_antwort(status, &self.0.to_string())
    }
}
