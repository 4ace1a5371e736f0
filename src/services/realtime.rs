//! Ponte entre o canal de mudanças e o refetch do quadro
//!
//! Assina o hub de notificações e agenda um refetch através do debouncer,
//! de modo que uma rajada de mudanças (importação em lote, por exemplo)
//! colapse em uma única releitura. A task é derrubada quando o handle cai,
//! liberando a assinatura junto.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;

use crate::services::board::BoardService;
use crate::utils::logging::{log_error, log_info};
use crate::utils::Debouncer;
use supabase::ChangeFeed;

pub struct RefreshBridge {
    listener: JoinHandle<()>,
}

impl RefreshBridge {
    /// Liga o canal de mudanças ao refetch do quadro
    pub fn spawn(feed: &ChangeFeed, board: Arc<BoardService>, delay: Duration) -> Self {
        let mut rx = feed.subscribe();

        let debouncer = Debouncer::new(delay, move || {
            let board = board.clone();
            async move {
                if let Err(e) = board.refresh().await {
                    log_error(&format!("Refetch disparado pelo canal falhou: {}", e));
                }
            }
        });

        let listener = tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(_event) => debouncer.call(),
                    // Perder eventos não importa: o evento é opaco e o
                    // refetch relê tudo de qualquer forma
                    Err(RecvError::Lagged(_)) => debouncer.call(),
                    Err(RecvError::Closed) => break,
                }
            }
            log_info("Canal de mudanças fechado; ponte de refetch encerrada");
        });

        Self { listener }
    }
}

impl Drop for RefreshBridge {
    fn drop(&mut self) {
        self.listener.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::fetcher::TicketFetcher;
    use crate::services::notify::{LogNotifier, Notifier};
    use httpmock::prelude::*;
    use supabase::{ChangeEvent, SupabaseClient, TicketStore};
    use uuid::Uuid;

    fn board_for(server: &MockServer) -> Arc<BoardService> {
        let client = SupabaseClient::new(server.base_url(), "test-key").unwrap();
        let store = TicketStore::new(client);
        let notifier: Arc<dyn Notifier> = Arc::new(LogNotifier);
        Arc::new(BoardService::new(
            TicketFetcher::new(store.clone()),
            store,
            ChangeFeed::default(),
            notifier,
            10,
        ))
    }

    #[tokio::test]
    async fn test_burst_of_changes_collapses_into_one_refetch() {
        let server = MockServer::start();
        let fetch = server.mock(|when, then| {
            when.method(GET).path("/rest/v1/tickets");
            then.status(200).json_body(serde_json::json!([]));
        });

        let feed = ChangeFeed::default();
        let board = board_for(&server);
        let _bridge = RefreshBridge::spawn(&feed, board, Duration::from_millis(100));

        for _ in 0..5 {
            feed.publish(ChangeEvent::insert(Uuid::new_v4()));
        }

        tokio::time::sleep(Duration::from_millis(400)).await;
        fetch.assert_hits(1);
    }

    #[tokio::test]
    async fn test_dropping_bridge_stops_refetches() {
        let server = MockServer::start();
        let fetch = server.mock(|when, then| {
            when.method(GET).path("/rest/v1/tickets");
            then.status(200).json_body(serde_json::json!([]));
        });

        let feed = ChangeFeed::default();
        let board = board_for(&server);
        let bridge = RefreshBridge::spawn(&feed, board, Duration::from_millis(50));
        drop(bridge);

        feed.publish(ChangeEvent::insert(Uuid::new_v4()));
        tokio::time::sleep(Duration::from_millis(250)).await;
        fetch.assert_hits(0);
    }
}
