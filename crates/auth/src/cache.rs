//! TTL-Cache fuer kurzlebigen Auth-Zustand
//!
//! Zertifizierungscodes, Verifizierungsmarken und aktive Session-Tokens leben
//! ausschliesslich hier. Jeder Eintrag traegt eine eigene Lebensdauer; ein
//! abgelaufener Eintrag ist fuer `get` unsichtbar, auch wenn der
//! Cleanup-Task ihn noch nicht entfernt hat.
//!
//! Jede Operation ist ein einzelner unabhaengiger Zugriff. Zusammengesetzte
//! Pruefen-dann-Handeln-Folgen gehoeren nicht in den Cache.

use std::{collections::HashMap, sync::Arc, time::Duration};

use thiserror::Error;
use tokio::{sync::RwLock, time::Instant};

/// Intervall fuer den automatischen Cleanup-Task: 1 Minute
const CLEANUP_INTERVALL: Duration = Duration::from_secs(60);

/// Fehler des Cache-Backends
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Cache nicht erreichbar: {0}")]
    NichtErreichbar(String),

    #[error("Lebensdauer nicht darstellbar: {0:?}")]
    UngueltigeLebensdauer(Duration),
}

/// Result-Alias fuer Cache-Operationen
pub type CacheResult<T> = Result<T, CacheError>;

/// Schluessel/Wert-Speicher mit Lebensdauer pro Eintrag
///
/// Das Fehlen eines Schluessels ist bei `get` ein normales Ergebnis.
/// Das Loeschen eines fehlenden Schluessels ist kein Fehler.
#[allow(async_fn_in_trait)]
pub trait TtlCache: Send + Sync {
    /// Speichert einen Wert; ein vorhandener Eintrag wird ueberschrieben
    async fn set(&self, key: &str, wert: &str, ttl: Duration) -> CacheResult<()>;

    /// Liest einen noch nicht abgelaufenen Wert
    async fn get(&self, key: &str) -> CacheResult<Option<String>>;

    /// Entfernt einen Eintrag
    async fn delete(&self, key: &str) -> CacheResult<()>;
}

#[derive(Debug, Clone)]
struct Eintrag {
    wert: String,
    laeuft_ab_am: Instant,
}

impl Eintrag {
    fn ist_gueltig(&self, jetzt: Instant) -> bool {
        jetzt < self.laeuft_ab_am
    }
}

/// In-Memory TTL-Cache
#[derive(Debug, Default)]
pub struct SpeicherCache {
    eintraege: RwLock<HashMap<String, Eintrag>>,
}

impl SpeicherCache {
    /// Erstellt einen neuen leeren Cache
    pub fn neu() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Startet den Cleanup-Task fuer den gegebenen Cache
    pub fn neu_mit_cleanup(cache: Arc<Self>) -> Arc<Self> {
        let cache_klon = Arc::clone(&cache);
        tokio::spawn(async move {
            let mut intervall = tokio::time::interval(CLEANUP_INTERVALL);
            loop {
                intervall.tick().await;
                let entfernt = cache_klon.cleanup_abgelaufene().await;
                if entfernt > 0 {
                    tracing::debug!(anzahl = entfernt, "Abgelaufene Cache-Eintraege bereinigt");
                }
            }
        });
        cache
    }

    /// Bereinigt abgelaufene Eintraege und gibt deren Anzahl zurueck
    pub async fn cleanup_abgelaufene(&self) -> usize {
        let jetzt = Instant::now();
        let mut eintraege = self.eintraege.write().await;
        let vorher = eintraege.len();
        eintraege.retain(|_, e| e.ist_gueltig(jetzt));
        vorher - eintraege.len()
    }

    /// Gibt die Anzahl der nicht abgelaufenen Eintraege zurueck
    pub async fn anzahl_aktive(&self) -> usize {
        let jetzt = Instant::now();
        let eintraege = self.eintraege.read().await;
        eintraege.values().filter(|e| e.ist_gueltig(jetzt)).count()
    }
}

impl TtlCache for SpeicherCache {
    async fn set(&self, key: &str, wert: &str, ttl: Duration) -> CacheResult<()> {
        let laeuft_ab_am = Instant::now()
            .checked_add(ttl)
            .ok_or(CacheError::UngueltigeLebensdauer(ttl))?;
        let eintrag = Eintrag {
            wert: wert.to_string(),
            laeuft_ab_am,
        };
        self.eintraege.write().await.insert(key.to_string(), eintrag);
        tracing::debug!(key = %key, ttl_sekunden = ttl.as_secs(), "Cache-Eintrag gesetzt");
        Ok(())
    }

    async fn get(&self, key: &str) -> CacheResult<Option<String>> {
        let eintraege = self.eintraege.read().await;
        Ok(eintraege
            .get(key)
            .filter(|e| e.ist_gueltig(Instant::now()))
            .map(|e| e.wert.clone()))
    }

    async fn delete(&self, key: &str) -> CacheResult<()> {
        self.eintraege.write().await.remove(key);
        tracing::debug!(key = %key, "Cache-Eintrag geloescht");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn setzen_und_lesen() {
        let cache = SpeicherCache::neu();
        cache.set("alice", "123456", Duration::from_secs(60)).await.unwrap();
        assert_eq!(cache.get("alice").await.unwrap().as_deref(), Some("123456"));
    }

    #[tokio::test]
    async fn fehlender_schluessel_ist_kein_fehler() {
        let cache = SpeicherCache::neu();
        assert_eq!(cache.get("niemand").await.unwrap(), None);
        cache.delete("niemand").await.unwrap();
    }

    #[tokio::test]
    async fn setzen_ueberschreibt() {
        let cache = SpeicherCache::neu();
        cache.set("bob", "alt", Duration::from_secs(60)).await.unwrap();
        cache.set("bob", "neu", Duration::from_secs(60)).await.unwrap();
        assert_eq!(cache.get("bob").await.unwrap().as_deref(), Some("neu"));
        assert_eq!(cache.anzahl_aktive().await, 1);
    }

    #[tokio::test]
    async fn nicht_darstellbare_ttl_wird_abgelehnt() {
        let cache = SpeicherCache::neu();
        let ergebnis = cache.set("alice", "x", Duration::MAX).await;
        assert!(matches!(ergebnis, Err(CacheError::UngueltigeLebensdauer(_))));
        assert_eq!(cache.get("alice").await.unwrap(), None);
    }

    #[tokio::test]
    async fn loeschen_entfernt_eintrag() {
        let cache = SpeicherCache::neu();
        cache.set("carol", "token", Duration::from_secs(60)).await.unwrap();
        cache.delete("carol").await.unwrap();
        assert_eq!(cache.get("carol").await.unwrap(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn eintrag_laeuft_ab() {
        let cache = SpeicherCache::neu();
        cache.set("kurz", "x", Duration::from_secs(180)).await.unwrap();
        cache.set("lang", "y", Duration::from_secs(3600)).await.unwrap();

        tokio::time::advance(Duration::from_secs(181)).await;

        assert_eq!(cache.get("kurz").await.unwrap(), None);
        assert_eq!(cache.get("lang").await.unwrap().as_deref(), Some("y"));
        assert_eq!(cache.anzahl_aktive().await, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn cleanup_entfernt_nur_abgelaufene() {
        let cache = SpeicherCache::neu();
        cache.set("a", "1", Duration::from_secs(10)).await.unwrap();
        cache.set("b", "2", Duration::from_secs(10)).await.unwrap();
        cache.set("c", "3", Duration::from_secs(100)).await.unwrap();

        tokio::time::advance(Duration::from_secs(11)).await;

        assert_eq!(cache.cleanup_abgelaufene().await, 2);
        assert_eq!(cache.get("c").await.unwrap().as_deref(), Some("3"));
    }
}
