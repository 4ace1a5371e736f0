//! Linha da tabela `tickets`
//!
//! A leitura do quadro pede os rótulos das referências junto com a linha
//! (embedded resources do PostgREST), então a struct carrega os objetos
//! `sectors`, `employees` e `funcionarios_clientes` opcionais além das
//! chaves estrangeiras cruas.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Priority, TicketStatus};

/// Setor embutido na leitura (`sectors!tickets_sector_id_fkey`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectorRef {
    pub id: Uuid,
    pub name: String,
}

/// Funcionário responsável embutido na leitura
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeRef {
    pub id: Uuid,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Cliente (prefeitura) embutido dentro do contato
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientRef {
    pub id: Uuid,
    pub name: String,
}

/// Contato do cliente embutido na leitura, com o cliente pai
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientContactRef {
    pub id: Uuid,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clients: Option<ClientRef>,
}

/// Representa uma linha completa de `tickets`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ticket {
    pub id: Uuid,

    pub title: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Status pode vir ausente em linhas antigas; a visualização trata
    /// ausência como `pendente`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<TicketStatus>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub sector_id: Option<Uuid>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<Uuid>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_contact_id: Option<Uuid>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_number: Option<String>,

    /// Lista ordenada, duplicatas permitidas
    #[serde(default)]
    pub tags: Vec<String>,

    /// Origem do ticket (`spoken_api` para chamados importados)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,

    pub created_by: Uuid,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,

    // ==================== RECURSOS EMBUTIDOS ====================
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sectors: Option<SectorRef>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employees: Option<EmployeeRef>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub funcionarios_clientes: Option<ClientContactRef>,
}

/// Payload de inserção de ticket
///
/// Os defaults seguem o fluxo de criação: status `pendente` e prioridade
/// `media` quando não informados.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewTicket {
    pub title: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    pub status: TicketStatus,

    pub priority: Priority,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub sector_id: Option<Uuid>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<Uuid>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_contact_id: Option<Uuid>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_number: Option<String>,

    pub tags: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,

    pub created_by: Uuid,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
}

impl NewTicket {
    /// Cria um payload mínimo com os defaults de criação
    pub fn new(title: impl Into<String>, created_by: Uuid) -> Self {
        Self {
            title: title.into(),
            description: None,
            status: TicketStatus::Pendente,
            priority: Priority::Media,
            sector_id: None,
            assigned_to: None,
            client_contact_id: None,
            request_number: None,
            tags: Vec::new(),
            source: None,
            created_by,
            due_date: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_status(mut self, status: TicketStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_sector(mut self, sector_id: Uuid) -> Self {
        self.sector_id = Some(sector_id);
        self
    }

    pub fn with_assignee(mut self, employee_id: Uuid) -> Self {
        self.assigned_to = Some(employee_id);
        self
    }

    pub fn with_client_contact(mut self, contact_id: Uuid) -> Self {
        self.client_contact_id = Some(contact_id);
        self
    }

    pub fn with_request_number(mut self, request_number: impl Into<String>) -> Self {
        self.request_number = Some(request_number.into());
        self
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn with_due_date(mut self, due_date: DateTime<Utc>) -> Self {
        self.due_date = Some(due_date);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_ticket_defaults() {
        let creator = Uuid::new_v4();
        let ticket = NewTicket::new("Impressora parada", creator);

        assert_eq!(ticket.title, "Impressora parada");
        assert_eq!(ticket.status, TicketStatus::Pendente);
        assert_eq!(ticket.priority, Priority::Media);
        assert_eq!(ticket.created_by, creator);
        assert!(ticket.tags.is_empty());
        assert!(ticket.sector_id.is_none());
    }

    #[test]
    fn test_new_ticket_builder() {
        let sector = Uuid::new_v4();
        let ticket = NewTicket::new("Erro no relatório", Uuid::new_v4())
            .with_description("Relatório mensal não abre")
            .with_priority(Priority::Alta)
            .with_sector(sector)
            .with_tags(vec!["relatorio".to_string(), "urgente".to_string()])
            .with_source("spoken_api");

        assert_eq!(ticket.priority, Priority::Alta);
        assert_eq!(ticket.sector_id, Some(sector));
        assert_eq!(ticket.tags.len(), 2);
        assert_eq!(ticket.source.as_deref(), Some("spoken_api"));
    }

    #[test]
    fn test_ticket_deserializes_embedded_labels() {
        let json = serde_json::json!({
            "id": "7c9a2c4e-46a4-4c6e-9f65-3a1a6f2c9d11",
            "title": "Sem acesso ao sistema",
            "status": "em_analise",
            "priority": "alta",
            "tags": ["acesso"],
            "created_by": "a3a27f3a-3c5a-49c2-97b6-6b3c3a0f5e21",
            "created_at": "2025-03-01T12:00:00Z",
            "updated_at": "2025-03-02T09:30:00Z",
            "sectors": { "id": "9a1f0e9c-0d8a-4a8e-b7ab-18a4c5fd3f77", "name": "TI" },
            "employees": null,
            "funcionarios_clientes": {
                "id": "5b4f3f6e-7a3e-4f14-8f0a-2c1d9e8b7a65",
                "name": "Maria Silva",
                "clients": { "id": "1d2c3b4a-5e6f-4a8b-9c0d-1e2f3a4b5c6d", "name": "Prefeitura de Ouro Preto" }
            }
        });

        let ticket: Ticket = serde_json::from_value(json).unwrap();
        assert_eq!(ticket.status, Some(TicketStatus::EmAnalise));
        assert_eq!(ticket.sectors.as_ref().unwrap().name, "TI");
        assert!(ticket.employees.is_none());
        let contact = ticket.funcionarios_clientes.as_ref().unwrap();
        assert_eq!(contact.name, "Maria Silva");
        assert_eq!(contact.clients.as_ref().unwrap().name, "Prefeitura de Ouro Preto");
    }

    #[test]
    fn test_ticket_tolerates_missing_status_and_tags() {
        let json = serde_json::json!({
            "id": "7c9a2c4e-46a4-4c6e-9f65-3a1a6f2c9d11",
            "title": "Ticket antigo",
            "created_by": "a3a27f3a-3c5a-49c2-97b6-6b3c3a0f5e21",
            "created_at": "2024-01-01T00:00:00Z",
            "updated_at": "2024-01-01T00:00:00Z"
        });

        let ticket: Ticket = serde_json::from_value(json).unwrap();
        assert!(ticket.status.is_none());
        assert!(ticket.priority.is_none());
        assert!(ticket.tags.is_empty());
    }
}
