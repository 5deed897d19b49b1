//! Auth-Service fuer Marktplatz
//!
//! Registrierung, Anmeldung, Abmeldung und die Aufrufer-Pruefung fuer
//! geschuetzte Anfragen. Aktive Sessions liegen im TTL-Cache unter der
//! Mitglieds-Kennung (eine Session pro Mitglied, neuere ueberschreiben aeltere).
//!
//! Die Aufrufer-Pruefung liest den Cache NICHT: ein abgemeldetes, aber noch
//! nicht abgelaufenes Token besteht die Pruefung weiterhin.

use std::sync::Arc;

use serde::Deserialize;

use marktplatz_core::{LoginTyp, Rolle};
use marktplatz_db::{
    models::{MitgliedRecord, NeuesMitglied},
    MitgliedRepository,
};

use crate::{
    cache::TtlCache,
    error::{AuthError, AuthResult},
    password::{passwort_hashen, passwort_richtlinie_pruefen, passwort_verifizieren},
    token::TokenAussteller,
    verification::{marke_lesen, verifiziert_schluessel},
    verzeichnis::MitgliederVerzeichnis,
};

/// Daten einer lokalen Registrierung
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Registrierung {
    pub member_id: String,
    pub member_name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    pub role: Rolle,
}

impl Registrierung {
    /// Prueft Pflichtfelder und Passwort-Richtlinie
    pub fn validieren(&self) -> AuthResult<()> {
        for (feld, wert) in [
            ("memberId", &self.member_id),
            ("memberName", &self.member_name),
            ("email", &self.email),
        ] {
            if wert.trim().is_empty() {
                return Err(AuthError::ungueltige_eingabe(format!(
                    "{feld} darf nicht leer sein"
                )));
            }
        }
        if !self.email.contains('@') {
            return Err(AuthError::ungueltige_eingabe("email ist keine E-Mail-Adresse"));
        }
        passwort_richtlinie_pruefen(&self.password)
    }
}

/// Auth-Service: zentraler Einstiegspunkt fuer Konten und Sessions
pub struct AuthService<U: MitgliedRepository, C: TtlCache> {
    verzeichnis: MitgliederVerzeichnis<U>,
    cache: Arc<C>,
    aussteller: Arc<TokenAussteller>,
}

impl<U: MitgliedRepository, C: TtlCache> AuthService<U, C> {
    /// Erstellt einen neuen AuthService
    pub fn neu(
        verzeichnis: MitgliederVerzeichnis<U>,
        cache: Arc<C>,
        aussteller: Arc<TokenAussteller>,
    ) -> Self {
        Self {
            verzeichnis,
            cache,
            aussteller,
        }
    }

    /// Registriert ein lokales Konto
    ///
    /// Setzt eine noch gueltige Verifizierungsmarke voraus. Stellt kein Token
    /// aus; die erste Anmeldung ist ein eigener Schritt.
    pub async fn registrieren(&self, anfrage: Registrierung) -> AuthResult<MitgliedRecord> {
        anfrage.validieren()?;
        let member_id = anfrage.member_id.as_str();

        if self.verzeichnis.existiert(member_id).await? {
            return Err(AuthError::MitgliedExistiertBereits(member_id.to_string()));
        }
        if !marke_lesen(self.cache.as_ref(), member_id).await? {
            return Err(AuthError::VerifizierungErforderlich(member_id.to_string()));
        }

        let passwort_hash = passwort_hashen(&anfrage.password)?;

        let mitglied = self
            .verzeichnis
            .erstellen(NeuesMitglied {
                member_id,
                member_name: &anfrage.member_name,
                email: &anfrage.email,
                password_hash: &passwort_hash,
                phone_number: anfrage.phone_number.as_deref(),
                address: anfrage.address.as_deref(),
                role: anfrage.role,
                login_type: LoginTyp::App,
            })
            .await?;

        // Das Konto ist bereits angelegt; die Marke laeuft sonst von selbst ab
        if let Err(e) = self.cache.delete(&verifiziert_schluessel(member_id)).await {
            tracing::warn!(
                member_id = %member_id,
                fehler = %e,
                "Verifizierungsmarke nicht entfernt"
            );
        }

        tracing::info!(
            member_id = %mitglied.member_id,
            rolle = %mitglied.role,
            "Neues Mitglied registriert"
        );

        Ok(mitglied)
    }

    /// Meldet ein Mitglied mit Passwort an und gibt das Token zurueck
    pub async fn anmelden(&self, member_id: &str, passwort: &str) -> AuthResult<String> {
        let mitglied = self.verzeichnis.laden(member_id).await?;

        if !passwort_verifizieren(passwort, &mitglied.password_hash)? {
            tracing::warn!(member_id = %member_id, "Fehlgeschlagener Login-Versuch");
            return Err(AuthError::PasswortFalsch);
        }

        let token = self.sitzung_ausstellen(&mitglied).await?;

        tracing::info!(member_id = %member_id, "Mitglied angemeldet");
        Ok(token)
    }

    /// Stellt ein Token aus und legt es als aktive Session ab
    ///
    /// Gemeinsamer Pfad fuer lokale und foederierte Anmeldung.
    pub async fn sitzung_ausstellen(&self, mitglied: &MitgliedRecord) -> AuthResult<String> {
        let token = self.aussteller.ausstellen(&mitglied.member_id, mitglied.role)?;
        self.cache
            .set(&mitglied.member_id, &token, self.aussteller.lebensdauer())
            .await?;
        Ok(token)
    }

    /// Meldet ein Mitglied ab und entfernt die Session aus dem Cache
    pub async fn abmelden(&self, member_id: &str, token: &str) -> AuthResult<()> {
        self.aufrufer_pruefen(member_id, token)?;
        self.cache.delete(member_id).await?;
        tracing::info!(member_id = %member_id, "Mitglied abgemeldet");
        Ok(())
    }

    /// Stellt sicher, dass das Token zum angegebenen Mitglied gehoert
    ///
    /// Prueft nur die Signatur, nicht Ablauf oder Cache.
    pub fn aufrufer_pruefen(&self, member_id: &str, token: &str) -> AuthResult<()> {
        let subjekt = self.aussteller.subjekt(token)?;
        if subjekt != member_id {
            tracing::warn!(
                member_id = %member_id,
                subjekt = %subjekt,
                "Token gehoert einem anderen Mitglied"
            );
            return Err(AuthError::AufruferUngleich(member_id.to_string()));
        }
        Ok(())
    }

    /// Laedt das Konto zum Subjekt eines gueltigen Tokens
    pub async fn aktuelles_mitglied(&self, token: &str) -> AuthResult<MitgliedRecord> {
        if !self.aussteller.ist_zeitlich_gueltig(token) {
            return Err(AuthError::TokenUngueltig("Token abgelaufen oder ungueltig".into()));
        }
        let subjekt = self.aussteller.subjekt(token)?;
        self.verzeichnis.laden(&subjekt).await
    }

    /// Zugriff auf den Token-Aussteller
    pub fn aussteller(&self) -> &TokenAussteller {
        &self.aussteller
    }
}
