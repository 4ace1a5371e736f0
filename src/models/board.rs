//! Parâmetros de visualização e DTOs do quadro
//!
//! O estado de visualização é efêmero e pertence a quem olha o quadro:
//! filtros, busca, ordenação, agrupamento e os contadores de revelação por
//! coluna. A identidade da sessão entra como valor explícito para que o
//! motor de visualização seja testável com qualquer identidade sintética.

use serde::{Deserialize, Serialize};
use supabase::types::{Priority, TicketStatus};
use uuid::Uuid;

use super::EnrichedTicket;

/// Identidade do chamador, injetada pelos handlers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SessionContext {
    pub user_id: Option<Uuid>,
}

impl SessionContext {
    pub fn new(user_id: Uuid) -> Self {
        Self { user_id: Some(user_id) }
    }
}

/// Ordenação do quadro
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Newest,
    Oldest,
    Priority,
    Updated,
}

impl SortOrder {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "newest" => Some(SortOrder::Newest),
            "oldest" => Some(SortOrder::Oldest),
            "priority" => Some(SortOrder::Priority),
            "updated" => Some(SortOrder::Updated),
            _ => None,
        }
    }
}

impl Default for SortOrder {
    fn default() -> Self {
        SortOrder::Newest
    }
}

/// Dimensão de agrupamento dentro das colunas
///
/// `Status` é o quadro plano (sem sub-grupos); as demais particionam cada
/// coluna pela dimensão escolhida.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupBy {
    Status,
    Priority,
    Assignee,
    Client,
}

impl GroupBy {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "status" | "none" => Some(GroupBy::Status),
            "priority" => Some(GroupBy::Priority),
            "assignee" => Some(GroupBy::Assignee),
            "client" => Some(GroupBy::Client),
            _ => None,
        }
    }
}

impl Default for GroupBy {
    fn default() -> Self {
        GroupBy::Status
    }
}

/// Filtro de setor (aba selecionada)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SectorFilter {
    #[default]
    All,
    Id(Uuid),
}

/// Filtro de prioridade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PriorityFilter {
    #[default]
    All,
    Only(Priority),
}

/// Filtro de responsável, com o sentinela `unassigned`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AssigneeFilter {
    #[default]
    All,
    Unassigned,
    Id(Uuid),
}

/// Filtro de contato do cliente
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContactFilter {
    #[default]
    All,
    Id(Uuid),
}

impl SectorFilter {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "all" => Some(SectorFilter::All),
            other => Uuid::parse_str(other).ok().map(SectorFilter::Id),
        }
    }
}

impl PriorityFilter {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "all" => Some(PriorityFilter::All),
            other => Priority::parse(other).map(PriorityFilter::Only),
        }
    }
}

impl AssigneeFilter {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "all" => Some(AssigneeFilter::All),
            "unassigned" => Some(AssigneeFilter::Unassigned),
            other => Uuid::parse_str(other).ok().map(AssigneeFilter::Id),
        }
    }
}

impl ContactFilter {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "all" => Some(ContactFilter::All),
            other => Uuid::parse_str(other).ok().map(ContactFilter::Id),
        }
    }
}

/// Parâmetros de visualização do quadro
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ViewParams {
    pub sector: SectorFilter,
    pub search: String,
    pub priority: PriorityFilter,
    pub assignee: AssigneeFilter,
    pub client_contact: ContactFilter,
    pub sort: SortOrder,
    pub group_by: GroupBy,
    pub show_my_tickets: bool,
    pub compact_mode: bool,
    pub hide_empty_columns: bool,
}

impl ViewParams {
    /// Uma mudança nestes campos reposiciona o usuário no topo das colunas
    /// (os contadores de revelação voltam ao tamanho inicial da página).
    /// Modo compacto e ocultar-vazias são só de apresentação e não contam.
    pub fn resets_reveal(&self, other: &ViewParams) -> bool {
        self.sector != other.sector
            || self.search != other.search
            || self.priority != other.priority
            || self.assignee != other.assignee
            || self.client_contact != other.client_contact
            || self.show_my_tickets != other.show_my_tickets
            || self.group_by != other.group_by
    }

    /// Quantos filtros estão ativos (badge de filtros do cabeçalho)
    pub fn active_filter_count(&self) -> usize {
        let mut count = 0;
        if !self.search.is_empty() {
            count += 1;
        }
        if self.priority != PriorityFilter::All {
            count += 1;
        }
        if self.assignee != AssigneeFilter::All {
            count += 1;
        }
        if self.client_contact != ContactFilter::All {
            count += 1;
        }
        if self.show_my_tickets {
            count += 1;
        }
        count
    }
}

/// Sub-grupo dentro de uma coluna
///
/// Um grupo recolhido mantém o cabeçalho e o total; só a lista some.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoardGroup {
    pub key: String,
    pub label: String,
    pub total: usize,
    pub collapsed: bool,
    pub tickets: Vec<EnrichedTicket>,
}

/// Coluna do quadro (um status), já com a fatia visível
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoardColumn {
    pub status: TicketStatus,
    pub title: &'static str,
    /// Total da coluna depois dos filtros (antes da revelação)
    pub total: usize,
    pub tickets: Vec<EnrichedTicket>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub groups: Option<Vec<BoardGroup>>,
    pub has_more: bool,
    pub remaining: usize,
}

/// Visão completa devolvida ao cliente
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoardView {
    pub columns: Vec<BoardColumn>,
    pub total: usize,
    pub active_filter_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_parsing_sentinels() {
        assert_eq!(AssigneeFilter::parse("all"), Some(AssigneeFilter::All));
        assert_eq!(AssigneeFilter::parse("unassigned"), Some(AssigneeFilter::Unassigned));
        assert!(AssigneeFilter::parse("não-é-uuid").is_none());

        let id = Uuid::new_v4();
        assert_eq!(AssigneeFilter::parse(&id.to_string()), Some(AssigneeFilter::Id(id)));
    }

    #[test]
    fn test_sort_and_group_parsing() {
        assert_eq!(SortOrder::parse("priority"), Some(SortOrder::Priority));
        assert_eq!(SortOrder::parse("updated"), Some(SortOrder::Updated));
        assert!(SortOrder::parse("random").is_none());

        assert_eq!(GroupBy::parse("none"), Some(GroupBy::Status));
        assert_eq!(GroupBy::parse("client"), Some(GroupBy::Client));
    }

    #[test]
    fn test_reveal_reset_triggers() {
        let base = ViewParams::default();

        let mut changed = base.clone();
        changed.search = "maria".to_string();
        assert!(base.resets_reveal(&changed));

        let mut changed = base.clone();
        changed.show_my_tickets = true;
        assert!(base.resets_reveal(&changed));

        // Apresentação pura não reseta
        let mut changed = base.clone();
        changed.compact_mode = true;
        changed.hide_empty_columns = true;
        assert!(!base.resets_reveal(&changed));
    }

    #[test]
    fn test_active_filter_count() {
        let mut params = ViewParams::default();
        assert_eq!(params.active_filter_count(), 0);

        params.search = "erro".to_string();
        params.priority = PriorityFilter::Only(Priority::Alta);
        params.show_my_tickets = true;
        assert_eq!(params.active_filter_count(), 3);
    }
}
