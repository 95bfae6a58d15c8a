use std::{future::Future, sync::Arc};

use tokio::sync::Mutex;

use crate::{error::Result, model::Runtime};

/// Lazily populated runtime list.
///
/// A successful fetch is kept for the lifetime of the cache; a failed fetch leaves
/// it empty so that the next lookup tries again.
#[derive(Debug, Default)]
pub struct RuntimeCache {
    slot: Mutex<Option<Arc<[Runtime]>>>,
}

impl RuntimeCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get_or_fetch<F, Fut>(&self, fetch: F) -> Result<Arc<[Runtime]>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<Runtime>>>,
    {
        // Held across the fetch so that concurrent lookups share one request.
        let mut slot = self.slot.lock().await;
        if let Some(runtimes) = slot.as_ref() {
            return Ok(runtimes.clone());
        }
        let runtimes: Arc<[Runtime]> = fetch().await?.into();
        *slot = Some(runtimes.clone());
        Ok(runtimes)
    }

    pub async fn replace(&self, runtimes: Vec<Runtime>) -> Arc<[Runtime]> {
        let runtimes: Arc<[Runtime]> = runtimes.into();
        *self.slot.lock().await = Some(runtimes.clone());
        runtimes
    }

    pub async fn clear(&self) {
        *self.slot.lock().await = None;
    }

    pub async fn is_populated(&self) -> bool {
        self.slot.lock().await.is_some()
    }
}

#[cfg(test)]
mod test {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::error::Error;

    fn python() -> Runtime {
        Runtime {
            language: "python".into(),
            version: "3.10.0".into(),
            aliases: vec!["py".into()],
        }
    }

    #[tokio::test]
    async fn successful_fetch_is_never_repeated() {
        let cache = RuntimeCache::new();
        let calls = AtomicUsize::new(0);
        for _ in 0..3 {
            let got = cache
                .get_or_fetch(|| async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(vec![python()])
                })
                .await
                .unwrap();
            assert_eq!(&*got, &[python()]);
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn failed_fetch_is_retried() {
        let cache = RuntimeCache::new();
        let res = cache
            .get_or_fetch(|| async {
                let e = serde_json::from_str::<Vec<Runtime>>("{").unwrap_err();
                Err::<Vec<Runtime>, _>(Error::Json(e))
            })
            .await;
        assert!(res.is_err());
        assert!(!cache.is_populated().await);

        let got = cache.get_or_fetch(|| async { Ok(vec![python()]) }).await;
        assert_eq!(got.unwrap().len(), 1);
        assert!(cache.is_populated().await);
    }

    #[tokio::test]
    async fn empty_list_counts_as_populated() {
        let cache = RuntimeCache::new();
        cache.get_or_fetch(|| async { Ok(vec![]) }).await.unwrap();
        assert!(cache.is_populated().await);
    }

    #[tokio::test]
    async fn replace_and_clear() {
        let cache = RuntimeCache::new();
        cache.replace(vec![python()]).await;
        // A fetch here would surface as an error.
        let got = cache
            .get_or_fetch(|| async {
                let e = serde_json::from_str::<Vec<Runtime>>("{").unwrap_err();
                Err::<Vec<Runtime>, _>(Error::Json(e))
            })
            .await
            .unwrap();
        assert_eq!(got.len(), 1);

        cache.clear().await;
        assert!(!cache.is_populated().await);
    }
}
