//! Endpoints do quadro de tickets
//!
//! A visão é montada do conjunto de trabalho em memória; os parâmetros de
//! visualização chegam por query string e substituem os guardados para o
//! usuário. Valores fora das enumerações respondem 400 em vez de cair em
//! default silencioso.

use axum::{
    extract::{Query, State},
    http::HeaderMap,
    response::Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::models::{
    AssigneeFilter, BoardView, ContactFilter, GroupBy, PriorityFilter, SectorFilter, SortOrder,
    ViewParams,
};
use crate::services::DropOutcome;
use crate::utils::logging::*;
use crate::utils::{AppError, AppResult};
use crate::AppState;

use super::session_user;
use supabase::types::TicketStatus;

#[derive(Debug, Default, Deserialize)]
pub struct BoardQuery {
    pub sector: Option<String>,
    pub search: Option<String>,
    pub priority: Option<String>,
    pub assignee: Option<String>,
    pub client_contact: Option<String>,
    pub sort: Option<String>,
    pub group_by: Option<String>,
    pub my_tickets: Option<bool>,
    pub compact: Option<bool>,
    pub hide_empty: Option<bool>,
}

impl BoardQuery {
    fn into_params(self) -> AppResult<ViewParams> {
        fn parse<T>(
            raw: Option<String>,
            field: &str,
            parser: impl Fn(&str) -> Option<T>,
        ) -> AppResult<Option<T>> {
            match raw {
                None => Ok(None),
                Some(raw) => parser(&raw).map(Some).ok_or_else(|| {
                    AppError::ValidationError(format!("Valor inválido para \"{}\": {}", field, raw))
                }),
            }
        }

        Ok(ViewParams {
            sector: parse(self.sector, "sector", SectorFilter::parse)?.unwrap_or_default(),
            search: self.search.unwrap_or_default(),
            priority: parse(self.priority, "priority", PriorityFilter::parse)?.unwrap_or_default(),
            assignee: parse(self.assignee, "assignee", AssigneeFilter::parse)?.unwrap_or_default(),
            client_contact: parse(self.client_contact, "client_contact", ContactFilter::parse)?
                .unwrap_or_default(),
            sort: parse(self.sort, "sort", SortOrder::parse)?.unwrap_or_default(),
            group_by: parse(self.group_by, "group_by", GroupBy::parse)?.unwrap_or_default(),
            show_my_tickets: self.my_tickets.unwrap_or(false),
            compact_mode: self.compact.unwrap_or(false),
            hide_empty_columns: self.hide_empty.unwrap_or(false),
        })
    }
}

pub async fn get_board(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<BoardQuery>,
) -> AppResult<Json<BoardView>> {
    log_request_received("/board", "GET");

    let user_id = session_user(&headers)?;
    let params = query.into_params()?;

    let view = state.board.board_view(user_id, params).await;
    Ok(Json(view))
}

#[derive(Debug, Deserialize)]
pub struct LoadMoreRequest {
    pub status: String,
}

pub async fn load_more(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<LoadMoreRequest>,
) -> AppResult<Json<Value>> {
    log_request_received("/board/load-more", "POST");

    let user_id = session_user(&headers)?;
    let status = TicketStatus::parse(&body.status).ok_or_else(|| {
        AppError::ValidationError(format!("Status desconhecido: {}", body.status))
    })?;

    state.board.load_more(user_id, status).await;
    Ok(Json(json!({ "status": "success" })))
}

#[derive(Debug, Deserialize)]
pub struct MoveTicketRequest {
    pub ticket_id: uuid::Uuid,
    pub target_status: String,
}

pub async fn move_ticket(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<MoveTicketRequest>,
) -> AppResult<Json<Value>> {
    log_request_received("/board/move", "POST");

    // Identidade exigida mesmo sem entrar na mutação: movimento anônimo não existe
    let _user_id = session_user(&headers)?;

    let outcome = state.board.drop_on(body.ticket_id, &body.target_status).await?;

    let response = match outcome {
        DropOutcome::Moved(status) => json!({
            "status": "success",
            "message": format!("Ticket movido para {}", status.label()),
            "new_status": status
        }),
        DropOutcome::SameStatus => json!({
            "status": "noop",
            "message": "Ticket já está neste status"
        }),
        DropOutcome::InvalidTarget => json!({
            "status": "noop",
            "message": "Alvo de movimentação inválido"
        }),
    };

    Ok(Json(response))
}

pub async fn clear_filters(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> AppResult<Json<Value>> {
    log_request_received("/board/clear-filters", "POST");

    let user_id = session_user(&headers)?;
    state.board.clear_filters(user_id).await;

    Ok(Json(json!({ "status": "success" })))
}

#[derive(Debug, Deserialize)]
pub struct ToggleGroupRequest {
    pub group_key: String,
}

pub async fn toggle_group(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<ToggleGroupRequest>,
) -> AppResult<Json<Value>> {
    log_request_received("/board/toggle-group", "POST");

    let user_id = session_user(&headers)?;
    state.board.toggle_group(user_id, &body.group_key).await;

    Ok(Json(json!({ "status": "success" })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_board_query_defaults() {
        let params = BoardQuery::default().into_params().unwrap();
        assert_eq!(params, ViewParams::default());
    }

    #[test]
    fn test_board_query_rejects_unknown_sort() {
        let query = BoardQuery {
            sort: Some("alphabetical".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            query.into_params(),
            Err(AppError::ValidationError(_))
        ));
    }

    #[test]
    fn test_board_query_parses_sentinels() {
        let query = BoardQuery {
            assignee: Some("unassigned".to_string()),
            priority: Some("alta".to_string()),
            my_tickets: Some(true),
            ..Default::default()
        };
        let params = query.into_params().unwrap();
        assert_eq!(params.assignee, AssigneeFilter::Unassigned);
        assert!(params.show_my_tickets);
    }
}
