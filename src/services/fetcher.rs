//! Busca enriquecida dos tickets
//!
//! Uma leitura em lote com os rótulos embutidos, seguida de uma única
//! resolução em lote dos nomes dos criadores, e o merge por id. Qualquer
//! falha aborta a busca inteira; nenhum resultado parcial sai daqui.

use std::collections::HashMap;

use crate::models::EnrichedTicket;
use crate::utils::AppResult;
use supabase::tickets::TicketFilter;
use supabase::TicketStore;
use uuid::Uuid;

#[derive(Clone)]
pub struct TicketFetcher {
    store: TicketStore,
}

impl TicketFetcher {
    pub fn new(store: TicketStore) -> Self {
        Self { store }
    }

    pub async fn fetch(&self, filter: &TicketFilter) -> AppResult<Vec<EnrichedTicket>> {
        let rows = self.store.fetch_tickets(filter).await?;
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let ticket_ids: Vec<Uuid> = rows.iter().map(|row| row.id).collect();
        let names = self.store.creator_names(&ticket_ids).await?;

        let name_by_ticket: HashMap<Uuid, String> = names
            .into_iter()
            .map(|entry| (entry.ticket_id, entry.creator_name))
            .collect();

        let enriched = rows
            .into_iter()
            .map(|row| {
                let creator_name = name_by_ticket.get(&row.id).cloned();
                EnrichedTicket::from_row(row, creator_name)
            })
            .collect();

        Ok(enriched)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use supabase::SupabaseClient;

    fn store_for(server: &MockServer) -> TicketStore {
        let client = SupabaseClient::new(server.base_url(), "test-key").unwrap();
        TicketStore::new(client)
    }

    #[tokio::test]
    async fn test_fetch_merges_creator_names() {
        let server = MockServer::start();

        let ticket_id = "7c9a2c4e-46a4-4c6e-9f65-3a1a6f2c9d11";
        server.mock(|when, then| {
            when.method(GET).path("/rest/v1/tickets");
            then.status(200).json_body(serde_json::json!([{
                "id": ticket_id,
                "title": "Sem acesso",
                "status": "pendente",
                "created_by": "a3a27f3a-3c5a-49c2-97b6-6b3c3a0f5e21",
                "created_at": "2025-03-01T12:00:00Z",
                "updated_at": "2025-03-01T12:00:00Z"
            }]));
        });
        server.mock(|when, then| {
            when.method(POST)
                .path("/rest/v1/rpc/get_ticket_creator_names");
            then.status(200).json_body(serde_json::json!([
                { "ticket_id": ticket_id, "creator_name": "Carlos Souza" }
            ]));
        });

        let fetcher = TicketFetcher::new(store_for(&server));
        let tickets = fetcher.fetch(&TicketFilter::default()).await.unwrap();

        assert_eq!(tickets.len(), 1);
        assert_eq!(tickets[0].creator_name, "Carlos Souza");
    }

    #[tokio::test]
    async fn test_fetch_defaults_unresolved_creator() {
        let server = MockServer::start();

        server.mock(|when, then| {
            when.method(GET).path("/rest/v1/tickets");
            then.status(200).json_body(serde_json::json!([{
                "id": "7c9a2c4e-46a4-4c6e-9f65-3a1a6f2c9d11",
                "title": "Sem acesso",
                "created_by": "a3a27f3a-3c5a-49c2-97b6-6b3c3a0f5e21",
                "created_at": "2025-03-01T12:00:00Z",
                "updated_at": "2025-03-01T12:00:00Z"
            }]));
        });
        server.mock(|when, then| {
            when.method(POST)
                .path("/rest/v1/rpc/get_ticket_creator_names");
            then.status(200).json_body(serde_json::json!([]));
        });

        let fetcher = TicketFetcher::new(store_for(&server));
        let tickets = fetcher.fetch(&TicketFilter::default()).await.unwrap();

        assert_eq!(tickets[0].creator_name, "Usuário");
    }

    #[tokio::test]
    async fn test_fetch_aborts_whole_read_on_error() {
        let server = MockServer::start();

        server.mock(|when, then| {
            when.method(GET).path("/rest/v1/tickets");
            then.status(500)
                .json_body(serde_json::json!({ "message": "internal error" }));
        });

        let fetcher = TicketFetcher::new(store_for(&server));
        let result = fetcher.fetch(&TicketFilter::default()).await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_fetch_skips_rpc_when_no_rows() {
        let server = MockServer::start();

        server.mock(|when, then| {
            when.method(GET).path("/rest/v1/tickets");
            then.status(200).json_body(serde_json::json!([]));
        });
        let rpc = server.mock(|when, then| {
            when.method(POST)
                .path("/rest/v1/rpc/get_ticket_creator_names");
            then.status(200).json_body(serde_json::json!([]));
        });

        let fetcher = TicketFetcher::new(store_for(&server));
        let tickets = fetcher.fetch(&TicketFilter::default()).await.unwrap();

        assert!(tickets.is_empty());
        rpc.assert_hits(0);
    }
}
