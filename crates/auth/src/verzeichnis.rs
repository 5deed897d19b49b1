//! Mitgliederverzeichnis
//!
//! Duenne Schicht ueber [`MitgliedRepository`], die Persistenzfehler in
//! Auth-Fehler uebersetzt: Eindeutigkeitsverletzungen werden zu
//! [`AuthError::MitgliedExistiertBereits`], alle anderen Backend-Fehler zu
//! [`AuthError::SpeicherNichtErreichbar`]. Konten werden hier nur angelegt
//! und gelesen, nie veraendert.

use std::sync::Arc;

use marktplatz_db::{
    models::{MitgliedRecord, NeuesMitglied},
    MitgliedRepository,
};

use crate::error::{AuthError, AuthResult};

pub struct MitgliederVerzeichnis<U: MitgliedRepository> {
    repo: Arc<U>,
}

impl<U: MitgliedRepository> Clone for MitgliederVerzeichnis<U> {
    fn clone(&self) -> Self {
        Self {
            repo: Arc::clone(&self.repo),
        }
    }
}

impl<U: MitgliedRepository> MitgliederVerzeichnis<U> {
    pub fn neu(repo: Arc<U>) -> Self {
        Self { repo }
    }

    /// Prueft ob ein Konto mit dieser Kennung existiert
    pub async fn existiert(&self, member_id: &str) -> AuthResult<bool> {
        Ok(self.repo.exists(member_id).await?)
    }

    /// Erfolgreich wenn die Kennung noch frei ist
    pub async fn id_pruefen(&self, member_id: &str) -> AuthResult<()> {
        if member_id.trim().is_empty() {
            return Err(AuthError::ungueltige_eingabe("memberId darf nicht leer sein"));
        }
        if self.existiert(member_id).await? {
            return Err(AuthError::MitgliedExistiertBereits(member_id.to_string()));
        }
        Ok(())
    }

    /// Legt ein neues Konto an
    ///
    /// Eine parallel angelegte gleiche Kennung scheitert an der
    /// Eindeutigkeitspruefung des Backends.
    pub async fn erstellen(&self, data: NeuesMitglied<'_>) -> AuthResult<MitgliedRecord> {
        let member_id = data.member_id;
        self.repo.create(data).await.map_err(|e| {
            if e.ist_eindeutigkeit() {
                AuthError::MitgliedExistiertBereits(member_id.to_string())
            } else {
                e.into()
            }
        })
    }

    /// Laedt ein Konto; fehlt es, ist das ein Fehler
    pub async fn laden(&self, member_id: &str) -> AuthResult<MitgliedRecord> {
        self.repo
            .get_by_member_id(member_id)
            .await?
            .ok_or_else(|| AuthError::MitgliedNichtGefunden(member_id.to_string()))
    }
}
