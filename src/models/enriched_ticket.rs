/// Registro achatado do ticket com os rótulos resolvidos
/// Usado pelo quadro: uma linha do banco + nomes de setor, responsável,
/// contato (com o cliente pai) e criador prontos para exibição
use chrono::{DateTime, Utc};
use serde::Serialize;
use supabase::types::{Priority, Ticket, TicketStatus};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichedTicket {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    /// Status ausente na linha vira `pendente` aqui, antes do quadro
    pub status: TicketStatus,
    pub priority: Option<Priority>,
    pub sector_id: Option<Uuid>,
    pub sector_name: Option<String>,
    pub assignee_id: Option<Uuid>,
    pub assignee_name: Option<String>,
    pub client_contact_id: Option<Uuid>,
    pub client_contact_name: Option<String>,
    pub client_name: Option<String>,
    pub request_number: Option<String>,
    pub tags: Vec<String>,
    pub source: Option<String>,
    pub created_by: Uuid,
    pub creator_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl EnrichedTicket {
    /// Monta o registro de exibição a partir da linha e do nome do criador
    ///
    /// O nome vem da procedure de resolução em lote; sem resultado o
    /// fallback de exibição é "Usuário".
    pub fn from_row(row: Ticket, creator_name: Option<String>) -> Self {
        let sector = row.sectors;
        let assignee = row.employees;
        let contact = row.funcionarios_clientes;

        Self {
            id: row.id,
            title: row.title,
            description: row.description,
            status: row.status.unwrap_or_default(),
            priority: row.priority,
            sector_id: row.sector_id.or_else(|| sector.as_ref().map(|s| s.id)),
            sector_name: sector.map(|s| s.name),
            assignee_id: row.assigned_to.or_else(|| assignee.as_ref().map(|e| e.id)),
            assignee_name: assignee.map(|e| e.name),
            client_contact_id: row
                .client_contact_id
                .or_else(|| contact.as_ref().map(|c| c.id)),
            client_contact_name: contact.as_ref().map(|c| c.name.clone()),
            client_name: contact.and_then(|c| c.clients).map(|c| c.name),
            request_number: row.request_number,
            tags: row.tags,
            source: row.source,
            created_by: row.created_by,
            creator_name: creator_name.unwrap_or_else(|| "Usuário".to_string()),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}
