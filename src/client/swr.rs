// src/client/swr.rs

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, Notify, watch};
use tokio::time::Instant;

#[derive(Debug, Clone)]
pub struct SwrConfig {
    // Intervalo do poller.
    pub refresh_interval: Duration,
    // Janela dentro da qual revalidações do mesmo key não refazem o fetch.
    pub dedup_interval: Duration,
}

impl Default for SwrConfig {
    fn default() -> Self {
        Self {
            refresh_interval: Duration::from_millis(3000),
            dedup_interval: Duration::from_millis(2000),
        }
    }
}

// O que o consumidor enxerga de um key: o último dado bom, o último erro
// e se há um fetch em andamento. Dado velho convive com erro novo.
#[derive(Debug, Clone, PartialEq)]
pub struct SwrSnapshot<V> {
    pub data: Option<V>,
    pub error: Option<String>,
    pub is_validating: bool,
}

impl<V> SwrSnapshot<V> {
    fn empty() -> Self {
        Self {
            data: None,
            error: None,
            is_validating: false,
        }
    }
}

struct Entry<V> {
    data: Option<V>,
    error: Option<String>,
    last_fetched: Option<Instant>,
    // Presente enquanto um fetch deste key está em voo; o canal fecha em
    // false quando ele termina.
    in_flight: Option<watch::Receiver<bool>>,
}

impl<V> Default for Entry<V> {
    fn default() -> Self {
        Self {
            data: None,
            error: None,
            last_fetched: None,
            in_flight: None,
        }
    }
}

impl<V: Clone> Entry<V> {
    fn snapshot(&self) -> SwrSnapshot<V> {
        SwrSnapshot {
            data: self.data.clone(),
            error: self.error.clone(),
            is_validating: self.in_flight.is_some(),
        }
    }
}

// Decisão tomada sob o lock; o fetch em si roda fora dele.
enum Plan<V> {
    Fresh(SwrSnapshot<V>),
    Join(watch::Receiver<bool>),
    Fetch(watch::Sender<bool>),
}

// Cache de dados sincronizados por polling, um registro por key de
// consulta. Revalidações concorrentes do mesmo key colapsam em um único
// fetch; falhas preservam o último dado bom em vez de apagar a tela.
pub struct SwrCache<V> {
    config: SwrConfig,
    entries: Mutex<HashMap<String, Entry<V>>>,
    poke: Notify,
}

impl<V: Clone> SwrCache<V> {
    pub fn new(config: SwrConfig) -> Self {
        Self {
            config,
            entries: Mutex::new(HashMap::new()),
            poke: Notify::new(),
        }
    }

    pub fn config(&self) -> &SwrConfig {
        &self.config
    }

    // Revalida um key. Dentro da janela de dedup devolve o snapshot atual
    // sem tocar o fetcher; com um fetch em voo, espera por ele em vez de
    // disparar outro; fora disso, executa o fetcher e grava o resultado.
    pub async fn revalidate<F, Fut>(&self, key: &str, fetcher: F) -> SwrSnapshot<V>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = anyhow::Result<V>>,
    {
        let plan = {
            let mut entries = self.entries.lock().await;
            let entry = entries.entry(key.to_string()).or_default();

            if let Some(rx) = entry.in_flight.clone() {
                Plan::Join(rx)
            } else if entry
                .last_fetched
                .is_some_and(|at| at.elapsed() < self.config.dedup_interval)
            {
                Plan::Fresh(entry.snapshot())
            } else {
                let (tx, rx) = watch::channel(true);
                entry.in_flight = Some(rx);
                Plan::Fetch(tx)
            }
        };

        match plan {
            Plan::Fresh(snapshot) => snapshot,
            Plan::Join(mut rx) => {
                let _ = rx.wait_for(|busy| !*busy).await;
                self.snapshot(key).await
            }
            Plan::Fetch(tx) => {
                let result = fetcher().await;

                let mut entries = self.entries.lock().await;
                let entry = entries.entry(key.to_string()).or_default();
                entry.last_fetched = Some(Instant::now());
                entry.in_flight = None;
                match result {
                    Ok(data) => {
                        entry.data = Some(data);
                        entry.error = None;
                    }
                    // Mantém o dado velho; só o sinal de erro muda.
                    Err(err) => entry.error = Some(err.to_string()),
                }
                let snapshot = entry.snapshot();
                drop(entries);

                let _ = tx.send(false);
                snapshot
            }
        }
    }

    pub async fn snapshot(&self, key: &str) -> SwrSnapshot<V> {
        let entries = self.entries.lock().await;
        entries
            .get(key)
            .map(Entry::snapshot)
            .unwrap_or_else(SwrSnapshot::empty)
    }

    // Uma mutação local acabou de confirmar: derruba a janela de dedup do
    // key e acorda o poller para buscar fora do ciclo.
    pub async fn invalidate(&self, key: &str) {
        {
            let mut entries = self.entries.lock().await;
            if let Some(entry) = entries.get_mut(key) {
                entry.last_fetched = None;
            }
        }
        self.poke.notify_one();
    }

    // Gancho de foco-recuperado / reconexão: antecipa o próximo ciclo.
    pub fn poke(&self) {
        self.poke.notify_one();
    }

    pub async fn notified(&self) {
        self.poke.notified().await;
    }
}

// Loop de sincronização de um key: revalida, dorme o intervalo (ou até um
// poke) e repete. Encerra via abort() do handle.
pub fn spawn_poller<V, F, Fut>(
    cache: Arc<SwrCache<V>>,
    key: String,
    fetcher: F,
) -> tokio::task::JoinHandle<()>
where
    V: Clone + Send + Sync + 'static,
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<V>> + Send,
{
    tokio::spawn(async move {
        loop {
            cache.revalidate(&key, || fetcher()).await;

            tokio::select! {
                _ = tokio::time::sleep(cache.config().refresh_interval) => {}
                _ = cache.notified() => {}
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counting_fetcher(
        calls: Arc<AtomicUsize>,
        value: u32,
    ) -> impl Fn() -> std::pin::Pin<Box<dyn Future<Output = anyhow::Result<u32>> + Send>> {
        move || {
            let calls = Arc::clone(&calls);
            Box::pin(async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(value)
            })
        }
    }

    #[tokio::test(start_paused = true)]
    async fn second_revalidate_inside_dedup_window_skips_the_fetcher() {
        let cache = SwrCache::new(SwrConfig::default());
        let calls = Arc::new(AtomicUsize::new(0));
        let fetcher = counting_fetcher(Arc::clone(&calls), 7);

        let first = cache.revalidate("tasks", &fetcher).await;
        let second = cache.revalidate("tasks", &fetcher).await;

        assert_eq!(first.data, Some(7));
        assert_eq!(second.data, Some(7));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn revalidate_after_the_window_fetches_again() {
        let cache = SwrCache::new(SwrConfig::default());
        let calls = Arc::new(AtomicUsize::new(0));
        let fetcher = counting_fetcher(Arc::clone(&calls), 7);

        cache.revalidate("tasks", &fetcher).await;
        tokio::time::sleep(Duration::from_millis(2100)).await;
        cache.revalidate("tasks", &fetcher).await;

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_revalidations_collapse_into_one_fetch() {
        let cache = SwrCache::new(SwrConfig::default());
        let calls = Arc::new(AtomicUsize::new(0));
        let slow = {
            let calls = Arc::clone(&calls);
            move || {
                let calls = Arc::clone(&calls);
                async move {
                    tokio::time::sleep(Duration::from_millis(100)).await;
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(42u32)
                }
            }
        };

        let (first, second) = tokio::join!(
            cache.revalidate("tasks", &slow),
            cache.revalidate("tasks", &slow),
        );

        assert_eq!(first.data, Some(42));
        assert_eq!(second.data, Some(42));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn failure_keeps_stale_data_and_exposes_the_error() {
        let cache = SwrCache::new(SwrConfig::default());
        let calls = Arc::new(AtomicUsize::new(0));
        let ok = counting_fetcher(Arc::clone(&calls), 7);

        cache.revalidate("tasks", &ok).await;
        tokio::time::sleep(Duration::from_millis(2100)).await;

        let snapshot = cache
            .revalidate("tasks", || async {
                Err::<u32, _>(anyhow::anyhow!("connection reset"))
            })
            .await;

        // O dado velho fica visível; o erro vai por um canal separado.
        assert_eq!(snapshot.data, Some(7));
        assert_eq!(snapshot.error.as_deref(), Some("connection reset"));

        // Um fetch que volta a funcionar limpa o erro.
        tokio::time::sleep(Duration::from_millis(2100)).await;
        let recovered = cache.revalidate("tasks", &ok).await;
        assert_eq!(recovered.data, Some(7));
        assert!(recovered.error.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn invalidate_bypasses_the_dedup_window() {
        let cache = SwrCache::new(SwrConfig::default());
        let calls = Arc::new(AtomicUsize::new(0));
        let fetcher = counting_fetcher(Arc::clone(&calls), 7);

        cache.revalidate("tasks", &fetcher).await;
        cache.invalidate("tasks").await;
        cache.revalidate("tasks", &fetcher).await;

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn poller_refreshes_on_every_interval() {
        let cache = Arc::new(SwrCache::new(SwrConfig::default()));
        let calls = Arc::new(AtomicUsize::new(0));
        let fetcher = counting_fetcher(Arc::clone(&calls), 7);

        let handle = spawn_poller(Arc::clone(&cache), "tasks".to_string(), fetcher);

        // Fetch inicial + um por tick de 3000 ms.
        tokio::time::sleep(Duration::from_millis(9500)).await;
        handle.abort();

        let total = calls.load(Ordering::SeqCst);
        assert!(total >= 4, "esperava >= 4 fetches, houve {total}");
        assert_eq!(cache.snapshot("tasks").await.data, Some(7));
    }
}
