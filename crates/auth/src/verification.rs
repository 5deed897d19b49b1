//! Zweistufige E-Mail-Verifizierung vor der Registrierung
//!
//! Zustaende pro Kennung: kein Ticket -> Ticket ausstehend -> verifiziert.
//!
//! - Ticket: Cache-Schluessel = Kennung, Wert = numerischer Code, kurze TTL
//! - Verifizierungsmarke: Schluessel = `<kennung>:verified`, Wert = `true`,
//!   lange TTL; entsteht nur beim Einloesen eines passenden Tickets
//!
//! Ein falscher Code verbraucht das Ticket nicht. Das Einloesen schreibt zuerst
//! die Marke und loescht danach das Ticket.

use std::sync::Arc;

use rand::Rng;

use marktplatz_db::MitgliedRepository;

use crate::{
    cache::TtlCache,
    error::{AuthError, AuthResult},
    konfig::AuthKonfig,
    mailer::Mailer,
    verzeichnis::MitgliederVerzeichnis,
};

const VERIFIZIERT_SUFFIX: &str = ":verified";
const VERIFIZIERT_WERT: &str = "true";

/// Cache-Schluessel der Verifizierungsmarke
pub fn verifiziert_schluessel(member_id: &str) -> String {
    format!("{member_id}{VERIFIZIERT_SUFFIX}")
}

/// Erzeugt einen numerischen Code fester Laenge
fn code_erzeugen(laenge: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..laenge)
        .map(|_| char::from(b'0' + rng.gen_range(0..10u8)))
        .collect()
}

pub struct VerifizierungsService<U: MitgliedRepository, C: TtlCache, M: Mailer> {
    verzeichnis: MitgliederVerzeichnis<U>,
    cache: Arc<C>,
    mailer: Arc<M>,
    konfig: AuthKonfig,
}

impl<U: MitgliedRepository, C: TtlCache, M: Mailer> VerifizierungsService<U, C, M> {
    pub fn neu(
        verzeichnis: MitgliederVerzeichnis<U>,
        cache: Arc<C>,
        mailer: Arc<M>,
        konfig: AuthKonfig,
    ) -> Self {
        Self {
            verzeichnis,
            cache,
            mailer,
            konfig,
        }
    }

    /// Stellt ein Ticket aus und verschickt den Code per Mail
    ///
    /// Scheitert der Versand, wird nichts gespeichert. Ein erneuter Aufruf
    /// ersetzt ein noch ausstehendes Ticket.
    pub async fn zertifizierung_anfordern(&self, member_id: &str, email: &str) -> AuthResult<()> {
        if member_id.trim().is_empty() || email.trim().is_empty() {
            return Err(AuthError::ungueltige_eingabe(
                "memberId und email duerfen nicht leer sein",
            ));
        }
        if self.verzeichnis.existiert(member_id).await? {
            return Err(AuthError::MitgliedExistiertBereits(member_id.to_string()));
        }

        let code = code_erzeugen(self.konfig.code_laenge);

        if !self.mailer.zertifizierungsmail_senden(email, &code).await {
            tracing::warn!(
                member_id = %member_id,
                "Zertifizierungsmail konnte nicht versendet werden"
            );
            return Err(AuthError::MailVersandFehlgeschlagen);
        }

        self.cache
            .set(member_id, &code, self.konfig.code_ttl)
            .await?;

        tracing::info!(member_id = %member_id, "Zertifizierungsticket ausgestellt");
        Ok(())
    }

    /// Prueft einen Code gegen das ausstehende Ticket
    ///
    /// `Ok(false)` bei falschem Code; das Ticket bleibt dann bestehen.
    pub async fn zertifizierung_pruefen(&self, member_id: &str, code: &str) -> AuthResult<bool> {
        let gespeichert = self
            .cache
            .get(member_id)
            .await?
            .ok_or_else(|| AuthError::VerifizierungsdatenNichtGefunden(member_id.to_string()))?;

        if gespeichert != code {
            tracing::warn!(member_id = %member_id, "Zertifizierungscode stimmt nicht ueberein");
            return Ok(false);
        }

        self.cache
            .set(
                &verifiziert_schluessel(member_id),
                VERIFIZIERT_WERT,
                self.konfig.verifiziert_ttl,
            )
            .await?;
        self.cache.delete(member_id).await?;

        tracing::info!(member_id = %member_id, "E-Mail verifiziert");
        Ok(true)
    }

    /// Wie [`Self::zertifizierung_pruefen`], ein falscher Code ist aber ein Fehler
    pub async fn bestaetigen(&self, member_id: &str, code: &str) -> AuthResult<()> {
        if self.zertifizierung_pruefen(member_id, code).await? {
            Ok(())
        } else {
            Err(AuthError::CodeUngleich)
        }
    }

    /// Gibt `true` zurueck solange die Verifizierungsmarke lebt
    pub async fn ist_verifiziert(&self, member_id: &str) -> AuthResult<bool> {
        marke_lesen(self.cache.as_ref(), member_id).await
    }
}

/// Liest die Verifizierungsmarke; ein fehlender Eintrag ist `false`
pub(crate) async fn marke_lesen<C: TtlCache>(cache: &C, member_id: &str) -> AuthResult<bool> {
    Ok(cache
        .get(&verifiziert_schluessel(member_id))
        .await?
        .is_some_and(|wert| wert == VERIFIZIERT_WERT))
}
