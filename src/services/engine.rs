//! Motor de visualização do quadro
//!
//! Transformação pura: (lista crua, parâmetros de visualização, sessão) →
//! colunas por status, com sub-grupos opcionais. Os filtros compõem por
//! conjunção; a ordenação é estável (empates preservam a ordem de chegada
//! da busca); o bucketing é total e disjunto, com `pendente` como coluna de
//! qualquer status ausente.

use crate::models::{
    AssigneeFilter, BoardGroup, ContactFilter, EnrichedTicket, GroupBy, PriorityFilter,
    SectorFilter, SessionContext, SortOrder, ViewParams,
};
use supabase::types::TicketStatus;

/// Colunas na ordem fixa de exibição, cada uma com sua lista ordenada
#[derive(Debug, Clone, PartialEq)]
pub struct StatusBuckets {
    pub buckets: Vec<(TicketStatus, Vec<EnrichedTicket>)>,
}

impl StatusBuckets {
    pub fn bucket(&self, status: TicketStatus) -> &[EnrichedTicket] {
        self.buckets
            .iter()
            .find(|(s, _)| *s == status)
            .map(|(_, list)| list.as_slice())
            .unwrap_or(&[])
    }

    pub fn total(&self) -> usize {
        self.buckets.iter().map(|(_, list)| list.len()).sum()
    }
}

/// Aplica filtros, ordenação e bucketing na ordem do pipeline
pub fn build_buckets(
    tickets: &[EnrichedTicket],
    params: &ViewParams,
    session: &SessionContext,
) -> StatusBuckets {
    let mut filtered: Vec<EnrichedTicket> = tickets
        .iter()
        .filter(|t| matches_filters(t, params, session))
        .cloned()
        .collect();

    sort_tickets(&mut filtered, params.sort);

    let mut buckets: Vec<(TicketStatus, Vec<EnrichedTicket>)> = TicketStatus::ALL
        .iter()
        .map(|status| (*status, Vec::new()))
        .collect();

    for ticket in filtered {
        let index = TicketStatus::ALL
            .iter()
            .position(|s| *s == ticket.status)
            .unwrap_or(0);
        buckets[index].1.push(ticket);
    }

    StatusBuckets { buckets }
}

/// Conjunção de todos os predicados ativos
fn matches_filters(ticket: &EnrichedTicket, params: &ViewParams, session: &SessionContext) -> bool {
    if let SectorFilter::Id(sector_id) = params.sector {
        if ticket.sector_id != Some(sector_id) {
            return false;
        }
    }

    if params.show_my_tickets {
        match session.user_id {
            Some(user_id) if ticket.created_by == user_id => {}
            _ => return false,
        }
    }

    if !params.search.is_empty() && !matches_search(ticket, &params.search) {
        return false;
    }

    if let PriorityFilter::Only(priority) = params.priority {
        if ticket.priority != Some(priority) {
            return false;
        }
    }

    match params.assignee {
        AssigneeFilter::All => {}
        AssigneeFilter::Unassigned => {
            if ticket.assignee_id.is_some() {
                return false;
            }
        }
        AssigneeFilter::Id(assignee_id) => {
            if ticket.assignee_id != Some(assignee_id) {
                return false;
            }
        }
    }

    if let ContactFilter::Id(contact_id) = params.client_contact {
        if ticket.client_contact_id != Some(contact_id) {
            return false;
        }
    }

    true
}

/// Busca por substring, sem diferenciar maiúsculas, em qualquer um dos
/// campos de texto exibidos no cartão
fn matches_search(ticket: &EnrichedTicket, query: &str) -> bool {
    let query = query.to_lowercase();

    let mut fields: Vec<&str> = vec![&ticket.title];
    if let Some(ref description) = ticket.description {
        fields.push(description);
    }
    if let Some(ref assignee) = ticket.assignee_name {
        fields.push(assignee);
    }
    if let Some(ref contact) = ticket.client_contact_name {
        fields.push(contact);
    }
    if let Some(ref client) = ticket.client_name {
        fields.push(client);
    }

    fields
        .iter()
        .any(|field| field.to_lowercase().contains(&query))
}

/// Ordenação estável da lista filtrada
pub fn sort_tickets(tickets: &mut [EnrichedTicket], order: SortOrder) {
    match order {
        SortOrder::Newest => tickets.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        SortOrder::Oldest => tickets.sort_by(|a, b| a.created_at.cmp(&b.created_at)),
        SortOrder::Updated => tickets.sort_by(|a, b| b.updated_at.cmp(&a.updated_at)),
        SortOrder::Priority => {
            tickets.sort_by(|a, b| priority_rank(b).cmp(&priority_rank(a)));
        }
    }
}

fn priority_rank(ticket: &EnrichedTicket) -> u8 {
    ticket.priority.map(|p| p.rank()).unwrap_or(0)
}

/// Particiona um bucket pela dimensão de agrupamento
///
/// Retorna `None` no quadro plano (`GroupBy::Status`). Os grupos aparecem na
/// ordem do primeiro ticket de cada chave, herdada da lista ordenada.
pub fn group_bucket(tickets: &[EnrichedTicket], group_by: GroupBy) -> Option<Vec<BoardGroup>> {
    if group_by == GroupBy::Status {
        return None;
    }

    let mut groups: Vec<BoardGroup> = Vec::new();

    for ticket in tickets {
        let (key, label) = group_key(ticket, group_by);

        match groups.iter_mut().find(|g| g.key == key) {
            Some(group) => group.tickets.push(ticket.clone()),
            None => groups.push(BoardGroup {
                key,
                label,
                total: 0,
                collapsed: false,
                tickets: vec![ticket.clone()],
            }),
        }
    }

    for group in &mut groups {
        group.total = group.tickets.len();
    }

    Some(groups)
}

fn group_key(ticket: &EnrichedTicket, group_by: GroupBy) -> (String, String) {
    match group_by {
        GroupBy::Status => unreachable!("quadro plano não tem sub-grupos"),
        GroupBy::Priority => {
            let priority = ticket.priority.unwrap_or_default();
            (priority.as_str().to_string(), priority.label().to_string())
        }
        GroupBy::Assignee => match (ticket.assignee_id, &ticket.assignee_name) {
            (Some(id), Some(name)) => (id.to_string(), name.clone()),
            (Some(id), None) => (id.to_string(), "Responsável".to_string()),
            _ => ("unassigned".to_string(), "Sem responsável".to_string()),
        },
        GroupBy::Client => match (ticket.client_contact_id, &ticket.client_contact_name) {
            (Some(id), Some(name)) => (id.to_string(), name.clone()),
            (Some(id), None) => (id.to_string(), "Cliente".to_string()),
            _ => ("no_client".to_string(), "Sem cliente".to_string()),
        },
    }
}
