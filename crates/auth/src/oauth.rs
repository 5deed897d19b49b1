//! Anmeldung ueber externe Login-Anbieter
//!
//! Das Profil eines Anbieters (Ergebnis des OAuth-Handshakes) wird auf ein
//! Mitgliedskonto abgebildet. Die Kennung ist `<anbieter>_<externe id>`. Beim
//! ersten Besuch wird ein Kaeuferkonto ohne nutzbares Passwort angelegt, danach
//! wird das vorhandene Konto unveraendert verwendet. Die Token-Ausstellung
//! laeuft ueber denselben Pfad wie die Passwort-Anmeldung.

use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;

use marktplatz_core::{LoginTyp, Rolle};
use marktplatz_db::{
    models::{MitgliedRecord, NeuesMitglied},
    MitgliedRepository,
};

use crate::{
    cache::TtlCache,
    error::{AuthError, AuthResult},
    password::FOEDERIERT_HASH,
    service::AuthService,
    verzeichnis::MitgliederVerzeichnis,
};

/// Unterstuetzte Login-Anbieter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anbieter {
    Kakao,
    Naver,
}

impl Anbieter {
    pub const ALLE: [Anbieter; 2] = [Anbieter::Kakao, Anbieter::Naver];

    /// Sucht einen Anbieter anhand seines Namens (`kakao`, `naver`)
    pub fn aus_name(name: &str) -> AuthResult<Self> {
        Self::ALLE
            .into_iter()
            .find(|a| a.name() == name)
            .ok_or_else(|| AuthError::AnbieterNichtUnterstuetzt(name.to_string()))
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Kakao => "kakao",
            Self::Naver => "naver",
        }
    }

    pub fn login_typ(self) -> LoginTyp {
        match self {
            Self::Kakao => LoginTyp::Kakao,
            Self::Naver => LoginTyp::Naver,
        }
    }

    /// Kennung des Mitgliedskontos fuer eine externe ID
    pub fn member_id(self, externe_id: &str) -> String {
        format!("{}_{externe_id}", self.name())
    }

    /// Dekodiert das anbieterspezifische Profil
    pub fn profil_lesen(self, profil: &Value) -> AuthResult<AnbieterProfil> {
        match self {
            Self::Kakao => {
                let antwort: KakaoAntwort = dekodieren(self, profil)?;
                let konto = antwort.kakao_account.unwrap_or_default();
                let name = konto
                    .profile
                    .map(|p| p.nickname)
                    .or(antwort.properties.map(|p| p.nickname))
                    .ok_or_else(|| AuthError::ungueltige_eingabe("Kakao-Profil ohne nickname"))?;
                Ok(AnbieterProfil {
                    externe_id: antwort.id.to_string(),
                    name,
                    email: konto.email,
                })
            }
            Self::Naver => {
                let antwort: NaverAntwort = dekodieren(self, profil)?;
                let daten = antwort.response;
                Ok(AnbieterProfil {
                    externe_id: daten.id,
                    name: daten.name,
                    email: daten.email,
                })
            }
        }
    }
}

impl std::fmt::Display for Anbieter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Vereinheitlichtes Profil eines Anbieters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnbieterProfil {
    pub externe_id: String,
    pub name: String,
    pub email: Option<String>,
}

// --- Kakao ---

#[derive(Debug, Deserialize)]
struct KakaoAntwort {
    id: i64,
    #[serde(default)]
    properties: Option<KakaoEigenschaften>,
    #[serde(default)]
    kakao_account: Option<KakaoKonto>,
}

#[derive(Debug, Deserialize)]
struct KakaoEigenschaften {
    nickname: String,
}

#[derive(Debug, Default, Deserialize)]
struct KakaoKonto {
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    profile: Option<KakaoProfil>,
}

#[derive(Debug, Deserialize)]
struct KakaoProfil {
    nickname: String,
}

// --- Naver ---

#[derive(Debug, Deserialize)]
struct NaverAntwort {
    response: NaverDaten,
}

#[derive(Debug, Deserialize)]
struct NaverDaten {
    id: String,
    name: String,
    #[serde(default)]
    email: Option<String>,
}

fn dekodieren<T: for<'de> Deserialize<'de>>(anbieter: Anbieter, profil: &Value) -> AuthResult<T> {
    T::deserialize(profil).map_err(|e| {
        AuthError::ungueltige_eingabe(format!("Ungueltiges {anbieter}-Profil: {e}"))
    })
}

/// Verbindet externe Identitaeten mit Mitgliedskonten
pub struct FoederationsBruecke<U: MitgliedRepository, C: TtlCache> {
    verzeichnis: MitgliederVerzeichnis<U>,
    auth: Arc<AuthService<U, C>>,
}

impl<U: MitgliedRepository, C: TtlCache> FoederationsBruecke<U, C> {
    pub fn neu(verzeichnis: MitgliederVerzeichnis<U>, auth: Arc<AuthService<U, C>>) -> Self {
        Self { verzeichnis, auth }
    }

    /// Liefert das Konto zur externen Identitaet und legt es bei Bedarf an
    ///
    /// Ein vorhandenes Konto wird unveraendert geliefert, auch wenn es lokal
    /// unter einer Kennung wie `kakao_<id>` registriert wurde. Der Aufrufer
    /// erhaelt dann eine Session auf dieses passwortgeschuetzte Konto; ein
    /// solcher Fund wird als Warnung protokolliert. Tickets, Marken und
    /// Sessions teilen sich den Cache-Schluesselraum der Kennung: ein noch
    /// offenes Ticket fuer eine solche Kennung wird durch die Session
    /// ueberschrieben.
    pub async fn aufloesen_oder_erstellen(
        &self,
        anbieter_name: &str,
        profil: &Value,
    ) -> AuthResult<MitgliedRecord> {
        let anbieter = Anbieter::aus_name(anbieter_name)?;
        let daten = anbieter.profil_lesen(profil)?;
        let member_id = anbieter.member_id(&daten.externe_id);

        match self.verzeichnis.laden(&member_id).await {
            Ok(vorhanden) => {
                if !vorhanden.login_type.ist_foederiert() {
                    tracing::warn!(
                        member_id = %member_id,
                        anbieter = %anbieter,
                        login_typ = %vorhanden.login_type,
                        "Kennung eines Anbieters gehoert einem lokalen Konto"
                    );
                }
                return Ok(vorhanden);
            }
            Err(AuthError::MitgliedNichtGefunden(_)) => {}
            Err(e) => return Err(e),
        }

        let ergebnis = self
            .verzeichnis
            .erstellen(NeuesMitglied {
                member_id: &member_id,
                member_name: &daten.name,
                email: daten.email.as_deref().unwrap_or_default(),
                password_hash: FOEDERIERT_HASH,
                phone_number: None,
                address: None,
                role: Rolle::Customer,
                login_type: anbieter.login_typ(),
            })
            .await;

        match ergebnis {
            Ok(mitglied) => {
                tracing::info!(
                    member_id = %mitglied.member_id,
                    anbieter = %anbieter,
                    "Foederiertes Mitglied angelegt"
                );
                Ok(mitglied)
            }
            // Paralleler Erstbesuch: das andere Konto gewinnt
            Err(AuthError::MitgliedExistiertBereits(_)) => self.verzeichnis.laden(&member_id).await,
            Err(e) => Err(e),
        }
    }

    /// Loest die Identitaet auf und meldet das Mitglied an
    pub async fn anmelden(
        &self,
        anbieter_name: &str,
        profil: &Value,
    ) -> AuthResult<(MitgliedRecord, String)> {
        let mitglied = self.aufloesen_oder_erstellen(anbieter_name, profil).await?;
        let token = self.auth.sitzung_ausstellen(&mitglied).await?;
        tracing::info!(
            member_id = %mitglied.member_id,
            anbieter = %anbieter_name,
            "Mitglied ueber Login-Anbieter angemeldet"
        );
        Ok((mitglied, token))
    }
}
