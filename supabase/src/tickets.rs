// ============================================================================
// Ticket Store - Operações sobre a tabela `tickets`
// ============================================================================
//
// Este módulo encapsula as operações que o quadro precisa do backend:
//
// 1. **Leitura em lote:**
//    - Busca dos tickets com os rótulos embutidos (fetch_tickets)
//    - Resolução de nomes de criadores via procedure (creator_names)
//
// 2. **Escritas:**
//    - Inserção (insert_ticket)
//    - Atualização de status e de campos, devolvendo as linhas afetadas
//    - Exclusão (delete_ticket)
//
// # Linhas afetadas
//
// As atualizações retornam o conjunto de linhas que a escrita atingiu. Uma
// policy de RLS pode bloquear a escrita sem gerar erro HTTP; nesse caso o
// retorno é um vetor vazio e quem chama precisa tratar como falha. O quadro
// depende desse contrato para distinguir "atualizado" de "bloqueado em
// silêncio".

use crate::client::SupabaseClient;
use crate::error::{Result, SupabaseError};
use crate::types::{CreatorName, NewTicket, Ticket, TicketStatus};
use serde_json::{json, Value};
use uuid::Uuid;

/// Select com os recursos embutidos que o quadro exibe
const TICKET_SELECT: &str = "*,\
sectors!tickets_sector_id_fkey(id,name),\
employees!tickets_assigned_to_fkey(id,name,email),\
funcionarios_clientes!tickets_client_contact_id_fkey(id,name,clients:client_id(id,name))";

/// Filtros de igualdade aceitos pela leitura em lote
#[derive(Debug, Clone, Default)]
pub struct TicketFilter {
    /// Restringe a um setor específico
    pub sector_id: Option<Uuid>,
    /// Restringe à origem (e.g., `spoken_api`)
    pub source: Option<String>,
}

/// Gerenciador de tickets
///
/// # Thread-Safety
///
/// Implementa `Clone` e pode ser compartilhado entre tasks via `Arc<>`.
#[derive(Clone)]
pub struct TicketStore {
    client: SupabaseClient,
}

impl TicketStore {
    pub fn new(client: SupabaseClient) -> Self {
        Self { client }
    }

    /// Busca os tickets visíveis com os rótulos embutidos
    ///
    /// Uma única leitura, ordenada por criação descendente, com os objetos
    /// de setor, responsável e contato (com o cliente pai) já no corpo.
    /// Qualquer falha aborta a busca inteira; nenhum resultado parcial é
    /// devolvido.
    pub async fn fetch_tickets(&self, filter: &TicketFilter) -> Result<Vec<Ticket>> {
        let mut query = format!(
            "/tickets?select={}&order=created_at.desc",
            urlencoding::encode(TICKET_SELECT)
        );

        if let Some(sector_id) = filter.sector_id {
            query.push_str(&format!("&sector_id=eq.{}", sector_id));
        }
        if let Some(ref source) = filter.source {
            query.push_str(&format!("&source=eq.{}", urlencoding::encode(source)));
        }

        let tickets: Vec<Ticket> = self.client.get_json(&query).await?;
        tracing::debug!("Tickets carregados: {}", tickets.len());
        Ok(tickets)
    }

    /// Resolve os nomes de exibição dos criadores em lote
    ///
    /// Chama a procedure `get_ticket_creator_names`, escolhida porque o join
    /// direto com a tabela de identidades é bloqueado pela policy de acesso.
    pub async fn creator_names(&self, ticket_ids: &[Uuid]) -> Result<Vec<CreatorName>> {
        if ticket_ids.is_empty() {
            return Ok(Vec::new());
        }

        let names: Vec<CreatorName> = self
            .client
            .rpc("get_ticket_creator_names", &json!({ "ticket_ids": ticket_ids }))
            .await?;
        Ok(names)
    }

    /// Insere um ticket e devolve a linha criada
    pub async fn insert_ticket(&self, new_ticket: &NewTicket) -> Result<Ticket> {
        let body = serde_json::to_value(new_ticket)?;
        let created: Vec<Ticket> = self.client.post_json("/tickets", &body).await?;

        created
            .into_iter()
            .next()
            .ok_or_else(|| SupabaseError::NotFound("inserção não retornou a linha criada".to_string()))
    }

    /// Atualiza o status de um ticket, devolvendo as linhas afetadas
    ///
    /// Retornar `Ok(vec![])` significa que a escrita não atingiu linha
    /// nenhuma (id inexistente ou policy bloqueando em silêncio). Esse caso
    /// NÃO é um erro neste nível.
    pub async fn update_status(&self, ticket_id: Uuid, status: TicketStatus) -> Result<Vec<Ticket>> {
        let query = format!("/tickets?id=eq.{}", ticket_id);
        let affected: Vec<Ticket> = self
            .client
            .patch_json(&query, &json!({ "status": status }))
            .await?;

        tracing::debug!(
            "Status do ticket {} atualizado para {} ({} linha(s))",
            ticket_id,
            status,
            affected.len()
        );
        Ok(affected)
    }

    /// Atualiza campos arbitrários de um ticket (patch parcial)
    ///
    /// Campos omitidos mantêm o valor atual. Devolve as linhas afetadas com
    /// a mesma semântica de `update_status`.
    pub async fn update_fields(&self, ticket_id: Uuid, patch: &Value) -> Result<Vec<Ticket>> {
        let query = format!("/tickets?id=eq.{}", ticket_id);
        let affected: Vec<Ticket> = self.client.patch_json(&query, patch).await?;

        tracing::debug!("Ticket {} atualizado ({} linha(s))", ticket_id, affected.len());
        Ok(affected)
    }

    /// Remove um ticket do conjunto de trabalho
    pub async fn delete_ticket(&self, ticket_id: Uuid) -> Result<()> {
        let query = format!("/tickets?id=eq.{}", ticket_id);
        self.client.delete(&query).await?;

        tracing::debug!("Ticket {} removido", ticket_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ticket_select_embeds_labels() {
        assert!(TICKET_SELECT.contains("sectors!tickets_sector_id_fkey"));
        assert!(TICKET_SELECT.contains("employees!tickets_assigned_to_fkey"));
        assert!(TICKET_SELECT.contains("clients:client_id(id,name)"));
    }

    #[test]
    fn test_filter_default_is_unscoped() {
        let filter = TicketFilter::default();
        assert!(filter.sector_id.is_none());
        assert!(filter.source.is_none());
    }
}
