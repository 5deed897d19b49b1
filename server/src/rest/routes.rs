//! Route-Definitionen fuer die REST-API (/api/v1/auth/...)

use axum::{
    routing::{get, post},
    Router,
};

use crate::rest::{handlers, AppState};

/// Erstellt den vollstaendigen Router samt State
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        // Registrierung
        .route("/api/v1/auth/id-check", post(handlers::id_pruefen))
        .route(
            "/api/v1/auth/email-certification",
            post(handlers::zertifizierung_anfordern),
        )
        .route(
            "/api/v1/auth/check-certification",
            post(handlers::zertifizierung_pruefen),
        )
        .route("/api/v1/auth/sign-up", post(handlers::registrieren))
        // Sessions
        .route("/api/v1/auth/sign-in", post(handlers::anmelden))
        .route("/api/v1/auth/sign-out", post(handlers::abmelden))
        .route("/api/v1/auth/me", get(handlers::aktuelles_mitglied))
        // Login-Anbieter
        .route(
            "/api/v1/auth/oauth/:anbieter",
            post(handlers::foederiert_anmelden),
        )
        .with_state(state)
}
