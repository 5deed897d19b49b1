//! In-Memory-Doubles fuer Unit-Tests

use std::sync::{
    atomic::{AtomicBool, AtomicUsize, Ordering},
    Mutex,
};
use std::time::Duration;

use chrono::Utc;
use marktplatz_db::{
    models::{MitgliedRecord, NeuesMitglied},
    DbError, DbResult, MitgliedRepository,
};

use crate::cache::{CacheError, CacheResult, TtlCache};
use crate::mailer::Mailer;

// Minimaler In-Memory MitgliedRepository fuer Tests
#[derive(Default)]
pub(crate) struct TestMitgliedRepo {
    mitglieder: Mutex<Vec<MitgliedRecord>>,
    anlagen: AtomicUsize,
}

impl TestMitgliedRepo {
    /// Anzahl erfolgreicher `create`-Aufrufe
    pub(crate) fn anzahl_anlagen(&self) -> usize {
        self.anlagen.load(Ordering::SeqCst)
    }
}

impl MitgliedRepository for TestMitgliedRepo {
    async fn exists(&self, member_id: &str) -> DbResult<bool> {
        Ok(self.mitglieder.lock().unwrap().iter().any(|m| m.member_id == member_id))
    }

    async fn create(&self, data: NeuesMitglied<'_>) -> DbResult<MitgliedRecord> {
        let mut mitglieder = self.mitglieder.lock().unwrap();
        if mitglieder.iter().any(|m| m.member_id == data.member_id) {
            return Err(DbError::Eindeutigkeit(data.member_id.to_string()));
        }
        let record = MitgliedRecord {
            id: mitglieder.len() as i64 + 1,
            member_id: data.member_id.to_string(),
            member_name: data.member_name.to_string(),
            email: data.email.to_string(),
            password_hash: data.password_hash.to_string(),
            phone_number: data.phone_number.map(str::to_string),
            address: data.address.map(str::to_string),
            role: data.role,
            login_type: data.login_type,
            created_at: Utc::now(),
        };
        mitglieder.push(record.clone());
        self.anlagen.fetch_add(1, Ordering::SeqCst);
        Ok(record)
    }

    async fn get_by_member_id(&self, member_id: &str) -> DbResult<Option<MitgliedRecord>> {
        Ok(self
            .mitglieder
            .lock()
            .unwrap()
            .iter()
            .find(|m| m.member_id == member_id)
            .cloned())
    }
}

// Simuliert eine parallele Anlage: `exists` und der erste Lesezugriff sehen
// das Konto noch nicht, `create` scheitert bereits an der Eindeutigkeit
#[derive(Default)]
pub(crate) struct WettlaufRepo {
    pub(crate) inner: TestMitgliedRepo,
    erstes_lesen_erfolgt: AtomicBool,
}

impl MitgliedRepository for WettlaufRepo {
    async fn exists(&self, _member_id: &str) -> DbResult<bool> {
        Ok(false)
    }

    async fn create(&self, data: NeuesMitglied<'_>) -> DbResult<MitgliedRecord> {
        self.inner.create(data).await
    }

    async fn get_by_member_id(&self, member_id: &str) -> DbResult<Option<MitgliedRecord>> {
        if !self.erstes_lesen_erfolgt.swap(true, Ordering::SeqCst) {
            return Ok(None);
        }
        self.inner.get_by_member_id(member_id).await
    }
}

// Repository, dessen Backend nie erreichbar ist
pub(crate) struct AusfallRepo;

impl MitgliedRepository for AusfallRepo {
    async fn exists(&self, _member_id: &str) -> DbResult<bool> {
        Err(DbError::intern("pool timed out"))
    }

    async fn create(&self, _data: NeuesMitglied<'_>) -> DbResult<MitgliedRecord> {
        Err(DbError::intern("pool timed out"))
    }

    async fn get_by_member_id(&self, _member_id: &str) -> DbResult<Option<MitgliedRecord>> {
        Err(DbError::intern("pool timed out"))
    }
}

// Cache, dessen Backend nie erreichbar ist
pub(crate) struct AusfallCache;

impl TtlCache for AusfallCache {
    async fn set(&self, _key: &str, _wert: &str, _ttl: Duration) -> CacheResult<()> {
        Err(CacheError::NichtErreichbar("connection refused".into()))
    }

    async fn get(&self, _key: &str) -> CacheResult<Option<String>> {
        Err(CacheError::NichtErreichbar("connection refused".into()))
    }

    async fn delete(&self, _key: &str) -> CacheResult<()> {
        Err(CacheError::NichtErreichbar("connection refused".into()))
    }
}

// Mailer, der Empfaenger und Codes mitschreibt
#[derive(Default)]
pub(crate) struct TestMailer {
    pub(crate) gesendet: Mutex<Vec<(String, String)>>,
    pub(crate) fehlschlagen: bool,
}

impl TestMailer {
    pub(crate) fn fehlschlagend() -> Self {
        Self {
            fehlschlagen: true,
            ..Self::default()
        }
    }

    /// Zuletzt versendeter Code
    pub(crate) fn letzter_code(&self) -> Option<String> {
        self.gesendet.lock().unwrap().last().map(|(_, code)| code.clone())
    }
}

impl Mailer for TestMailer {
    async fn zertifizierungsmail_senden(&self, adresse: &str, code: &str) -> bool {
        if self.fehlschlagen {
            return false;
        }
        self.gesendet
            .lock()
            .unwrap()
            .push((adresse.to_string(), code.to_string()));
        true
    }
}
