//! REST-Handler fuer Auth-Endpunkte

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json},
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use marktplatz_auth::{AuthError, Registrierung};
use marktplatz_core::{LoginTyp, Rolle};
use marktplatz_db::models::MitgliedRecord;

use crate::rest::{bearer_token, ApiFehler, AppState};

type ApiResult<T> = Result<T, ApiFehler>;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdPruefungBody {
    pub member_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZertifizierungBody {
    pub member_id: String,
    pub email: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodePruefungBody {
    pub member_id: String,
    pub certification_number: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnmeldungBody {
    pub member_id: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AbmeldungBody {
    pub member_id: String,
}

/// Oeffentliche Sicht auf ein Konto (ohne Passwort-Hash)
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MitgliedAntwort {
    pub member_id: String,
    pub member_name: String,
    pub email: String,
    pub phone_number: Option<String>,
    pub address: Option<String>,
    pub role: Rolle,
    pub login_type: LoginTyp,
}

impl From<MitgliedRecord> for MitgliedAntwort {
    fn from(m: MitgliedRecord) -> Self {
        Self {
            member_id: m.member_id,
            member_name: m.member_name,
            email: m.email,
            phone_number: m.phone_number,
            address: m.address,
            role: m.role,
            login_type: m.login_type,
        }
    }
}

fn erfolg(code: &str, nachricht: &str) -> Json<Value> {
    Json(json!({ "code": code, "message": nachricht }))
}

fn token_aus_headers(headers: &HeaderMap) -> ApiResult<&str> {
    bearer_token(headers)
        .ok_or_else(|| AuthError::TokenUngueltig("Authorization-Header fehlt".into()).into())
}

/// POST /api/v1/auth/id-check
pub async fn id_pruefen(
    State(state): State<AppState>,
    body: Result<Json<IdPruefungBody>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let Json(body) = body?;
    state.verzeichnis.id_pruefen(&body.member_id).await?;
    Ok(erfolg("AVAILABLE_MEMBER_ID", "Kennung ist verfuegbar"))
}

/// POST /api/v1/auth/email-certification
pub async fn zertifizierung_anfordern(
    State(state): State<AppState>,
    body: Result<Json<ZertifizierungBody>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let Json(body) = body?;
    state
        .verifizierung
        .zertifizierung_anfordern(&body.member_id, &body.email)
        .await?;
    Ok(erfolg("MAIL_SEND_SUCCESS", "Zertifizierungsmail versendet"))
}

/// POST /api/v1/auth/check-certification
pub async fn zertifizierung_pruefen(
    State(state): State<AppState>,
    body: Result<Json<CodePruefungBody>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let Json(body) = body?;
    state
        .verifizierung
        .bestaetigen(&body.member_id, &body.certification_number)
        .await?;
    Ok(erfolg("CERTIFICATION_NUMBER_SUCCESS", "E-Mail verifiziert"))
}

/// POST /api/v1/auth/sign-up
pub async fn registrieren(
    State(state): State<AppState>,
    body: Result<Json<Registrierung>, JsonRejection>,
) -> ApiResult<Json<MitgliedAntwort>> {
    let Json(body) = body?;
    let mitglied = state.auth.registrieren(body).await?;
    Ok(Json(mitglied.into()))
}

/// POST /api/v1/auth/sign-in
pub async fn anmelden(
    State(state): State<AppState>,
    body: Result<Json<AnmeldungBody>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let Json(body) = body?;
    let token = state.auth.anmelden(&body.member_id, &body.password).await?;
    Ok(Json(json!({ "token": token })))
}

/// POST /api/v1/auth/sign-out
pub async fn abmelden(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<AbmeldungBody>, JsonRejection>,
) -> ApiResult<StatusCode> {
    let Json(body) = body?;
    let token = token_aus_headers(&headers)?;
    state.auth.abmelden(&body.member_id, token).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/auth/me
pub async fn aktuelles_mitglied(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<MitgliedAntwort>> {
    let token = token_aus_headers(&headers)?;
    let mitglied = state.auth.aktuelles_mitglied(token).await?;
    Ok(Json(mitglied.into()))
}

/// POST /api/v1/auth/oauth/:anbieter
///
/// Der Body ist das Profil, das der Anbieter nach dem Handshake liefert.
pub async fn foederiert_anmelden(
    State(state): State<AppState>,
    Path(anbieter): Path<String>,
    profil: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let Json(profil) = profil?;
    let (mitglied, token) = state.bruecke.anmelden(&anbieter, &profil).await?;
    Ok(Json(json!({
        "token": token,
        "member": MitgliedAntwort::from(mitglied),
    })))
}

/// GET /health
pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({ "status": "ok" })))
}
