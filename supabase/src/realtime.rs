//! Notificações de mudança na coleção de tickets
//!
//! Fronteira de troca de mensagens: o canal entrega eventos opacos de
//! "algo mudou" (insert/update/delete), sem garantia de payload além do
//! tipo e, quando disponível, o id da linha. Quem consome reage refazendo a
//! própria leitura; nenhuma semântica de entrega (ordem, deduplicação) faz
//! parte do contrato.
//!
//! O hub é um canal broadcast em processo: o serviço publica um evento após
//! cada escrita própria bem-sucedida e o quadro assina para agendar o
//! refetch. Largar o receiver libera a assinatura, então não há listener
//! vazando por montagem.

use tokio::sync::broadcast;
use uuid::Uuid;

/// Tipo da mudança notificada
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Insert,
    Update,
    Delete,
}

/// Evento opaco de mudança em `tickets`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangeEvent {
    pub kind: ChangeKind,
    pub ticket_id: Option<Uuid>,
}

impl ChangeEvent {
    pub fn insert(ticket_id: Uuid) -> Self {
        Self { kind: ChangeKind::Insert, ticket_id: Some(ticket_id) }
    }

    pub fn update(ticket_id: Uuid) -> Self {
        Self { kind: ChangeKind::Update, ticket_id: Some(ticket_id) }
    }

    pub fn delete(ticket_id: Uuid) -> Self {
        Self { kind: ChangeKind::Delete, ticket_id: Some(ticket_id) }
    }
}

/// Hub de assinatura/publicação de mudanças
#[derive(Clone)]
pub struct ChangeFeed {
    tx: broadcast::Sender<ChangeEvent>,
}

impl ChangeFeed {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Assina o canal; largar o receiver cancela a assinatura
    pub fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        self.tx.subscribe()
    }

    /// Publica um evento; sem assinantes o evento é simplesmente descartado
    pub fn publish(&self, event: ChangeEvent) {
        if self.tx.send(event).is_err() {
            tracing::debug!("Evento de mudança sem assinantes: {:?}", event.kind);
        }
    }
}

impl Default for ChangeFeed {
    fn default() -> Self {
        Self::new(64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_subscriber_receives_published_event() {
        let feed = ChangeFeed::default();
        let mut rx = feed.subscribe();

        let id = Uuid::new_v4();
        feed.publish(ChangeEvent::update(id));

        let event = rx.recv().await.unwrap();
        assert_eq!(event.kind, ChangeKind::Update);
        assert_eq!(event.ticket_id, Some(id));
    }

    #[tokio::test]
    async fn test_publish_without_subscribers_is_noop() {
        let feed = ChangeFeed::default();
        feed.publish(ChangeEvent::insert(Uuid::new_v4()));
    }

    #[tokio::test]
    async fn test_dropping_receiver_releases_subscription() {
        let feed = ChangeFeed::default();
        let rx = feed.subscribe();
        drop(rx);

        // Sem pânico e sem entrega pendente
        feed.publish(ChangeEvent::delete(Uuid::new_v4()));
    }
}
