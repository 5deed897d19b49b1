//! Ausstellung und Pruefung signierter Bearer-Tokens
//!
//! Tokens sind HS256-JWTs: `base64url(header).base64url(claims).base64url(mac)`
//! ohne Padding. Die Claims enthalten Subjekt (`sub`), Rolle (`role`),
//! Ausstellungs- (`iat`) und Ablaufzeitpunkt (`exp`) in Unix-Sekunden.
//!
//! Signaturgueltigkeit und zeitliche Gueltigkeit sind getrennt: ein korrekt
//! signiertes, aber abgelaufenes Token liefert seine Claims weiterhin, nur
//! [`TokenAussteller::ist_zeitlich_gueltig`] lehnt es ab.

use std::time::Duration;

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use sha2::Sha256;

use marktplatz_core::Rolle;

use crate::error::{AuthError, AuthResult};

type HmacSha256 = Hmac<Sha256>;

/// Standard-Lebensdauer eines Tokens: 1 Stunde
pub const STANDARD_LEBENSDAUER: Duration = Duration::from_secs(60 * 60);

#[derive(Debug, Serialize, Deserialize)]
struct JwtHeader {
    alg: String,
    typ: String,
}

impl JwtHeader {
    fn hs256() -> Self {
        Self {
            alg: "HS256".into(),
            typ: "JWT".into(),
        }
    }
}

/// Claims eines ausgestellten Tokens
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Kennung des Mitglieds
    pub sub: String,
    pub role: Rolle,
    /// Ausstellungszeitpunkt (Unix-Sekunden)
    pub iat: i64,
    /// Ablaufzeitpunkt (Unix-Sekunden)
    pub exp: i64,
}

impl Claims {
    /// Gibt `true` zurueck wenn `exp` vor dem gegebenen Zeitpunkt liegt
    pub fn ist_abgelaufen(&self, jetzt: DateTime<Utc>) -> bool {
        self.exp < jetzt.timestamp()
    }
}

/// Stellt Tokens aus und prueft sie mit einem prozessweiten Geheimnis
///
/// Das Geheimnis wird einmal beim Start uebergeben und danach nie veraendert.
#[derive(Debug)]
pub struct TokenAussteller {
    geheimnis: SecretString,
    lebensdauer: Duration,
}

impl TokenAussteller {
    /// Erstellt einen neuen Aussteller
    ///
    /// Ein leeres Geheimnis ist ein Konfigurationsfehler.
    pub fn neu(geheimnis: SecretString, lebensdauer: Duration) -> AuthResult<Self> {
        if geheimnis.expose_secret().is_empty() {
            return Err(AuthError::intern("JWT-Geheimnis darf nicht leer sein"));
        }
        Ok(Self {
            geheimnis,
            lebensdauer,
        })
    }

    /// Lebensdauer der ausgestellten Tokens (gleich der Session-TTL im Cache)
    pub fn lebensdauer(&self) -> Duration {
        self.lebensdauer
    }

    /// Stellt ein Token fuer Mitglied und Rolle aus
    pub fn ausstellen(&self, member_id: &str, rolle: Rolle) -> AuthResult<String> {
        self.ausstellen_zu(member_id, rolle, Utc::now())
    }

    /// Stellt ein Token mit explizitem Ausstellungszeitpunkt aus
    pub(crate) fn ausstellen_zu(
        &self,
        member_id: &str,
        rolle: Rolle,
        jetzt: DateTime<Utc>,
    ) -> AuthResult<String> {
        let exp = i64::try_from(self.lebensdauer.as_secs())
            .ok()
            .and_then(|sekunden| jetzt.timestamp().checked_add(sekunden))
            .ok_or_else(|| AuthError::intern("Token-Lebensdauer zu gross"))?;
        let claims = Claims {
            sub: member_id.to_string(),
            role: rolle,
            iat: jetzt.timestamp(),
            exp,
        };

        let header_b64 = json_b64(&JwtHeader::hs256())?;
        let claims_b64 = json_b64(&claims)?;
        let signatur_eingabe = format!("{header_b64}.{claims_b64}");

        let mut mac = self.mac()?;
        mac.update(signatur_eingabe.as_bytes());
        let signatur = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());

        Ok(format!("{signatur_eingabe}.{signatur}"))
    }

    /// Prueft die Signatur und liefert die Claims
    ///
    /// Abgelaufene Tokens werden NICHT abgelehnt; ueber die zeitliche
    /// Gueltigkeit entscheidet der Aufrufer.
    pub fn claims_lesen(&self, token: &str) -> AuthResult<Claims> {
        let token = token.trim();
        let mut teile = token.split('.');
        let (Some(header_b64), Some(claims_b64), Some(signatur_b64), None) =
            (teile.next(), teile.next(), teile.next(), teile.next())
        else {
            return Err(AuthError::TokenUngueltig("Ungueltiges JWT-Format".into()));
        };

        let header: JwtHeader = b64_json(header_b64)?;
        if header.alg != "HS256" || !header.typ.eq_ignore_ascii_case("JWT") {
            return Err(AuthError::TokenUngueltig("Nicht unterstuetzter JWT-Header".into()));
        }

        let signatur = b64_decode(signatur_b64)?;
        let mut mac = self.mac()?;
        mac.update(header_b64.as_bytes());
        mac.update(b".");
        mac.update(claims_b64.as_bytes());
        mac.verify_slice(&signatur)
            .map_err(|_| AuthError::TokenUngueltig("Signatur ungueltig".into()))?;

        b64_json(claims_b64)
    }

    /// Liefert das Subjekt (Mitglieds-Kennung) ohne Ablaufpruefung
    pub fn subjekt(&self, token: &str) -> AuthResult<String> {
        self.claims_lesen(token).map(|c| c.sub)
    }

    /// Prueft ob ein Token lesbar, korrekt signiert und nicht abgelaufen ist
    ///
    /// Ob die Session im Cache noch existiert, wird hier nicht geprueft.
    pub fn ist_zeitlich_gueltig(&self, token: &str) -> bool {
        if token.trim().is_empty() {
            return false;
        }
        match self.claims_lesen(token) {
            Ok(claims) => !claims.ist_abgelaufen(Utc::now()),
            Err(_) => false,
        }
    }

    fn mac(&self) -> AuthResult<HmacSha256> {
        HmacSha256::new_from_slice(self.geheimnis.expose_secret().as_bytes())
            .map_err(|e| AuthError::intern(format!("Ungueltiger HMAC-Schluessel: {e}")))
    }
}

fn json_b64<T: Serialize>(wert: &T) -> AuthResult<String> {
    let json = serde_json::to_vec(wert)
        .map_err(|e| AuthError::intern(format!("JWT-Serialisierung fehlgeschlagen: {e}")))?;
    Ok(URL_SAFE_NO_PAD.encode(json))
}

fn b64_decode(teil: &str) -> AuthResult<Vec<u8>> {
    URL_SAFE_NO_PAD
        .decode(teil.as_bytes())
        .map_err(|e| AuthError::TokenUngueltig(format!("Ungueltiges base64url: {e}")))
}

fn b64_json<T: DeserializeOwned>(teil: &str) -> AuthResult<T> {
    let roh = b64_decode(teil)?;
    serde_json::from_slice(&roh)
        .map_err(|e| AuthError::TokenUngueltig(format!("Ungueltiges JWT-JSON: {e}")))
}
