//! Debounce de borda final (atraso + coalescência)
//!
//! Primitivo reutilizável: chamadas repetidas dentro da janela são
//! coalescidas e a ação dispara uma única vez depois que o canal fica
//! quieto pelo atraso configurado. Usado pela ponte de tempo real para
//! transformar rajadas de notificações em um único refetch.

use std::future::Future;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

pub struct Debouncer {
    tx: mpsc::UnboundedSender<()>,
    worker: JoinHandle<()>,
}

impl Debouncer {
    /// Cria o debouncer com a janela e a ação de disparo
    ///
    /// A ação roda em uma task dedicada; uma execução em andamento não é
    /// interrompida por novas chamadas (elas agendam o próximo disparo).
    pub fn new<F, Fut>(delay: Duration, action: F) -> Self
    where
        F: Fn() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let (tx, mut rx) = mpsc::unbounded_channel::<()>();

        let worker = tokio::spawn(async move {
            while rx.recv().await.is_some() {
                // Enquanto chegarem novas chamadas dentro da janela, a
                // espera recomeça; o disparo acontece na borda final.
                loop {
                    match tokio::time::timeout(delay, rx.recv()).await {
                        Ok(Some(())) => continue,
                        Ok(None) => break,
                        Err(_) => break,
                    }
                }
                action().await;
            }
        });

        Self { tx, worker }
    }

    /// Agenda um disparo; chamadas dentro da janela são coalescidas
    pub fn call(&self) {
        let _ = self.tx.send(());
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.worker.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[tokio::test(start_paused = true)]
    async fn test_burst_collapses_into_single_fire() {
        let fired = Arc::new(AtomicUsize::new(0));
        let counter = fired.clone();

        let debouncer = Debouncer::new(Duration::from_millis(500), move || {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
            }
        });

        for _ in 0..5 {
            debouncer.call();
        }

        tokio::time::sleep(Duration::from_millis(600)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_separate_bursts_fire_separately() {
        let fired = Arc::new(AtomicUsize::new(0));
        let counter = fired.clone();

        let debouncer = Debouncer::new(Duration::from_millis(100), move || {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
            }
        });

        debouncer.call();
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);

        debouncer.call();
        debouncer.call();
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_calls_within_window_restart_the_wait() {
        let fired = Arc::new(AtomicUsize::new(0));
        let counter = fired.clone();

        let debouncer = Debouncer::new(Duration::from_millis(100), move || {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
            }
        });

        // Chamadas a cada 50ms mantêm a janela aberta
        for _ in 0..4 {
            debouncer.call();
            tokio::time::sleep(Duration::from_millis(50)).await;
            assert_eq!(fired.load(Ordering::SeqCst), 0);
        }

        tokio::time::sleep(Duration::from_millis(150)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }
}
