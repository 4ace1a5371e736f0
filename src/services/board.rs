//! Estado do quadro e transição de status por arrastar-e-soltar
//!
//! O `BoardService` é o dono do único recurso mutável compartilhado: o
//! conjunto de trabalho dos tickets. Toda atualização é por substituição
//! integral da lista (nunca patch por campo), o que mantém correto o
//! rollback por snapshot da movimentação otimista.
//!
//! Política para a corrida entre refetch e movimentação em voo: os dois
//! serializam no mesmo `commit_lock`, então um refetch agendado pelo canal
//! de tempo real nunca sobrescreve uma mutação otimista antes de ela
//! resolver. Um contador de geração descarta o refetch que chegou atrasado
//! depois de outro mais novo.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use crate::models::{BoardColumn, BoardView, EnrichedTicket, SessionContext, ViewParams};
use crate::services::engine;
use crate::services::fetcher::TicketFetcher;
use crate::services::notify::Notifier;
use crate::services::reveal::RevealState;
use crate::utils::logging::{log_board_refreshed, log_info, log_ticket_moved, log_warning};
use crate::utils::{AppError, AppResult};
use supabase::tickets::TicketFilter;
use supabase::types::TicketStatus;
use supabase::{ChangeEvent, ChangeFeed, TicketStore};

/// Fases da interação de arrastar-e-soltar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragPhase {
    Idle,
    Dragging { ticket_id: Uuid },
    Committing { ticket_id: Uuid, target: TicketStatus },
}

/// Resultado de um drop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropOutcome {
    /// Alvo não é um status válido; nada foi tentado
    InvalidTarget,
    /// Ticket já estava no status de destino; nada foi tentado
    SameStatus,
    /// Mutação confirmada pelo servidor
    Moved(TicketStatus),
}

/// Estado de visualização de um usuário (efêmero)
#[derive(Debug, Clone)]
struct ViewState {
    params: ViewParams,
    reveal: RevealState,
    collapsed: HashMap<String, bool>,
}

pub struct BoardService {
    fetcher: TicketFetcher,
    store: TicketStore,
    feed: ChangeFeed,
    notifier: Arc<dyn Notifier>,
    page_size: usize,
    working_set: RwLock<Vec<EnrichedTicket>>,
    views: RwLock<HashMap<Uuid, ViewState>>,
    drag: RwLock<DragPhase>,
    commit_lock: Mutex<()>,
    fetch_generation: AtomicU64,
}

impl BoardService {
    pub fn new(
        fetcher: TicketFetcher,
        store: TicketStore,
        feed: ChangeFeed,
        notifier: Arc<dyn Notifier>,
        page_size: usize,
    ) -> Self {
        Self {
            fetcher,
            store,
            feed,
            notifier,
            page_size,
            working_set: RwLock::new(Vec::new()),
            views: RwLock::new(HashMap::new()),
            drag: RwLock::new(DragPhase::Idle),
            commit_lock: Mutex::new(()),
            fetch_generation: AtomicU64::new(0),
        }
    }

    /// Refaz a leitura autoritativa e substitui o conjunto de trabalho
    ///
    /// A busca roda sem segurar lock; a aplicação serializa no commit_lock e
    /// só acontece se nenhum refetch mais novo tiver sido disparado.
    pub async fn refresh(&self) -> AppResult<usize> {
        let generation = self.fetch_generation.fetch_add(1, Ordering::SeqCst) + 1;

        let fresh = self.fetcher.fetch(&TicketFilter::default()).await?;

        let _commit = self.commit_lock.lock().await;
        if self.fetch_generation.load(Ordering::SeqCst) != generation {
            log_info("Refetch superado por outro mais novo; resultado descartado");
            return Ok(self.working_set.read().await.len());
        }

        let count = fresh.len();
        *self.working_set.write().await = fresh;
        log_board_refreshed(count);
        Ok(count)
    }

    /// Cópia do conjunto de trabalho atual
    pub async fn snapshot(&self) -> Vec<EnrichedTicket> {
        self.working_set.read().await.clone()
    }

    /// Fase atual da interação de arrastar
    pub async fn drag_phase(&self) -> DragPhase {
        *self.drag.read().await
    }

    /// Monta a visão do quadro para um usuário
    ///
    /// Os parâmetros recebidos substituem os guardados; mudança em qualquer
    /// campo de filtro devolve os contadores de revelação ao tamanho
    /// inicial da página.
    pub async fn board_view(&self, user_id: Uuid, params: ViewParams) -> BoardView {
        let session = SessionContext::new(user_id);

        let (params, reveal, collapsed) = {
            let mut views = self.views.write().await;
            let state = views.entry(user_id).or_insert_with(|| ViewState {
                params: ViewParams::default(),
                reveal: RevealState::new(self.page_size),
                collapsed: HashMap::new(),
            });

            if state.params.resets_reveal(&params) {
                state.reveal.reset();
            }
            state.params = params;

            (
                state.params.clone(),
                state.reveal.clone(),
                state.collapsed.clone(),
            )
        };

        let tickets = self.snapshot().await;
        let buckets = engine::build_buckets(&tickets, &params, &session);

        let mut columns = Vec::with_capacity(TicketStatus::ALL.len());
        let mut total = 0;

        for (status, bucket) in &buckets.buckets {
            total += bucket.len();

            if params.hide_empty_columns && bucket.is_empty() {
                continue;
            }

            let visible = reveal.visible_len(*status, bucket.len());
            let groups = engine::group_bucket(bucket, params.group_by).map(|groups| {
                groups
                    .into_iter()
                    .map(|mut group| {
                        group.collapsed = *collapsed.get(&group.key).unwrap_or(&false);
                        if group.collapsed {
                            group.tickets.clear();
                        } else {
                            group.tickets.truncate(reveal.visible(*status));
                        }
                        group
                    })
                    .collect()
            });

            columns.push(BoardColumn {
                status: *status,
                title: status.label(),
                total: bucket.len(),
                tickets: bucket[..visible].to_vec(),
                groups,
                has_more: reveal.has_more(*status, bucket.len()),
                remaining: bucket.len() - visible,
            });
        }

        BoardView {
            columns,
            total,
            active_filter_count: params.active_filter_count(),
        }
    }

    /// Revela mais uma página na coluna indicada
    pub async fn load_more(&self, user_id: Uuid, status: TicketStatus) {
        let mut views = self.views.write().await;
        let state = views.entry(user_id).or_insert_with(|| ViewState {
            params: ViewParams::default(),
            reveal: RevealState::new(self.page_size),
            collapsed: HashMap::new(),
        });
        state.reveal.load_more(status);
    }

    /// Limpa os filtros do usuário (volta aos defaults)
    pub async fn clear_filters(&self, user_id: Uuid) {
        let mut views = self.views.write().await;
        if let Some(state) = views.get_mut(&user_id) {
            state.params = ViewParams::default();
            state.reveal.reset();
        }
    }

    /// Alterna o recolhimento de um sub-grupo
    pub async fn toggle_group(&self, user_id: Uuid, group_key: &str) {
        let mut views = self.views.write().await;
        if let Some(state) = views.get_mut(&user_id) {
            let entry = state.collapsed.entry(group_key.to_string()).or_insert(false);
            *entry = !*entry;
        }
    }

    /// Início do arrasto: eco de interface, nenhuma mutação
    ///
    /// Resolve o cartão pelo id no conjunto atual para o overlay fantasma.
    pub async fn begin_drag(&self, ticket_id: Uuid) -> Option<EnrichedTicket> {
        let card = self
            .working_set
            .read()
            .await
            .iter()
            .find(|t| t.id == ticket_id)
            .cloned();

        if card.is_some() {
            *self.drag.write().await = DragPhase::Dragging { ticket_id };
        }
        card
    }

    /// Drop do cartão sobre uma coluna
    ///
    /// Alvo inválido e drop no próprio status são no-ops sem chamada de
    /// servidor e sem notificação. No caminho válido: snapshot, mutação
    /// otimista síncrona, escrita no servidor conferindo as linhas
    /// afetadas, e rollback integral em qualquer falha. Zero linhas
    /// afetadas é falha (policy bloqueando em silêncio), distinta de erro
    /// lançado mas com o mesmo destino.
    pub async fn drop_on(&self, ticket_id: Uuid, target_raw: &str) -> AppResult<DropOutcome> {
        let Some(target) = TicketStatus::parse(target_raw) else {
            *self.drag.write().await = DragPhase::Idle;
            return Ok(DropOutcome::InvalidTarget);
        };

        let commit = self.commit_lock.lock().await;

        let snapshot = self.working_set.read().await.clone();
        let Some(position) = snapshot.iter().position(|t| t.id == ticket_id) else {
            *self.drag.write().await = DragPhase::Idle;
            return Err(AppError::NotFound(format!(
                "Ticket {} não está no quadro",
                ticket_id
            )));
        };

        if snapshot[position].status == target {
            *self.drag.write().await = DragPhase::Idle;
            return Ok(DropOutcome::SameStatus);
        }

        *self.drag.write().await = DragPhase::Committing { ticket_id, target };

        // Mutação otimista antes da chamada de rede: a interface reflete o
        // movimento com latência zero
        {
            let mut next = snapshot.clone();
            next[position].status = target;
            *self.working_set.write().await = next;
        }

        let failure: Option<AppError> = match self.store.update_status(ticket_id, target).await {
            Ok(rows) if rows.is_empty() => Some(AppError::NoPermission(
                "Sem permissão para mover o ticket ou ticket não encontrado".to_string(),
            )),
            Ok(_) => None,
            Err(e) => Some(e.into()),
        };

        if let Some(error) = failure {
            // Restaura o snapshot exato, nunca um patch inverso
            *self.working_set.write().await = snapshot;
            *self.drag.write().await = DragPhase::Idle;
            self.notifier
                .error(&format!("Erro ao mover ticket: {}", error));
            return Err(error);
        }

        *self.drag.write().await = DragPhase::Idle;
        self.feed.publish(ChangeEvent::update(ticket_id));
        self.notifier
            .success(&format!("Ticket movido para {}", target.label()));
        log_ticket_moved(&ticket_id.to_string(), target.label());

        drop(commit);

        // Refetch autoritativo para refletir campos calculados no servidor
        if let Err(e) = self.refresh().await {
            log_warning(&format!("Refetch após movimentação falhou: {}", e));
        }

        Ok(DropOutcome::Moved(target))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::notify::Notifier;
    use httpmock::prelude::*;
    use std::sync::Mutex as StdMutex;
    use supabase::SupabaseClient;

    struct RecordingNotifier {
        successes: StdMutex<Vec<String>>,
        errors: StdMutex<Vec<String>>,
    }

    impl RecordingNotifier {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                successes: StdMutex::new(Vec::new()),
                errors: StdMutex::new(Vec::new()),
            })
        }
    }

    impl Notifier for RecordingNotifier {
        fn success(&self, message: &str) {
            self.successes.lock().unwrap().push(message.to_string());
        }

        fn error(&self, message: &str) {
            self.errors.lock().unwrap().push(message.to_string());
        }
    }

    fn service_for(server: &MockServer, notifier: Arc<RecordingNotifier>) -> BoardService {
        let client = SupabaseClient::new(server.base_url(), "test-key").unwrap();
        let store = TicketStore::new(client);
        BoardService::new(
            TicketFetcher::new(store.clone()),
            store,
            ChangeFeed::default(),
            notifier,
            10,
        )
    }

    fn ticket_json(id: Uuid, title: &str, status: &str) -> serde_json::Value {
        serde_json::json!({
            "id": id,
            "title": title,
            "status": status,
            "created_by": Uuid::new_v4(),
            "created_at": "2025-03-01T12:00:00Z",
            "updated_at": "2025-03-01T12:00:00Z"
        })
    }

    async fn seed(service: &BoardService, rows: Vec<serde_json::Value>) {
        let tickets: Vec<EnrichedTicket> = rows
            .into_iter()
            .map(|row| {
                let row: supabase::types::Ticket = serde_json::from_value(row).unwrap();
                EnrichedTicket::from_row(row, None)
            })
            .collect();
        *service.working_set.write().await = tickets;
    }

    #[tokio::test]
    async fn test_drop_on_invalid_target_is_noop() {
        let server = MockServer::start();
        let patch = server.mock(|when, then| {
            when.method(httpmock::Method::PATCH).path("/rest/v1/tickets");
            then.status(200).json_body(serde_json::json!([]));
        });

        let notifier = RecordingNotifier::new();
        let service = service_for(&server, notifier.clone());
        let id = Uuid::new_v4();
        seed(&service, vec![ticket_json(id, "t", "pendente")]).await;

        let outcome = service.drop_on(id, "arquivado").await.unwrap();

        assert_eq!(outcome, DropOutcome::InvalidTarget);
        patch.assert_hits(0);
        assert!(notifier.successes.lock().unwrap().is_empty());
        assert!(notifier.errors.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_drop_on_same_status_is_noop() {
        let server = MockServer::start();
        let patch = server.mock(|when, then| {
            when.method(httpmock::Method::PATCH).path("/rest/v1/tickets");
            then.status(200).json_body(serde_json::json!([]));
        });

        let notifier = RecordingNotifier::new();
        let service = service_for(&server, notifier.clone());
        let id = Uuid::new_v4();
        seed(&service, vec![ticket_json(id, "t", "pendente")]).await;

        let outcome = service.drop_on(id, "pendente").await.unwrap();

        assert_eq!(outcome, DropOutcome::SameStatus);
        patch.assert_hits(0);
        assert!(notifier.successes.lock().unwrap().is_empty());
        assert!(notifier.errors.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_zero_affected_rows_rolls_back_exact_snapshot() {
        let server = MockServer::start();
        // Policy bloqueando em silêncio: a escrita responde 200 com zero linhas
        server.mock(|when, then| {
            when.method(httpmock::Method::PATCH).path("/rest/v1/tickets");
            then.status(200).json_body(serde_json::json!([]));
        });

        let notifier = RecordingNotifier::new();
        let service = service_for(&server, notifier.clone());
        let id = Uuid::new_v4();
        seed(
            &service,
            vec![
                ticket_json(id, "x", "pendente"),
                ticket_json(Uuid::new_v4(), "y", "em_analise"),
            ],
        )
        .await;

        let before = service.snapshot().await;
        let result = service.drop_on(id, "corrigido").await;

        assert!(matches!(result, Err(AppError::NoPermission(_))));
        let after = service.snapshot().await;
        assert_eq!(before, after);
        assert_eq!(after[0].status, TicketStatus::Pendente);
        assert_eq!(notifier.errors.lock().unwrap().len(), 1);
        assert!(notifier.successes.lock().unwrap().is_empty());
        assert_eq!(service.drag_phase().await, DragPhase::Idle);
    }

    #[tokio::test]
    async fn test_explicit_write_error_rolls_back() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(httpmock::Method::PATCH).path("/rest/v1/tickets");
            then.status(409)
                .json_body(serde_json::json!({ "message": "constraint violation" }));
        });

        let notifier = RecordingNotifier::new();
        let service = service_for(&server, notifier.clone());
        let id = Uuid::new_v4();
        seed(&service, vec![ticket_json(id, "x", "pendente")]).await;

        let before = service.snapshot().await;
        let result = service.drop_on(id, "negado").await;

        assert!(matches!(result, Err(AppError::SupabaseApi(_))));
        assert_eq!(service.snapshot().await, before);
        assert_eq!(notifier.errors.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_successful_move_settles_and_notifies_label() {
        let server = MockServer::start();
        let id = Uuid::new_v4();

        server.mock(|when, then| {
            when.method(httpmock::Method::PATCH).path("/rest/v1/tickets");
            then.status(200)
                .json_body(serde_json::json!([ticket_json(id, "x", "corrigido")]));
        });
        // Refetch autoritativo depois do sucesso
        server.mock(|when, then| {
            when.method(GET).path("/rest/v1/tickets");
            then.status(200)
                .json_body(serde_json::json!([ticket_json(id, "x", "corrigido")]));
        });
        server.mock(|when, then| {
            when.method(POST)
                .path("/rest/v1/rpc/get_ticket_creator_names");
            then.status(200).json_body(serde_json::json!([]));
        });

        let notifier = RecordingNotifier::new();
        let service = service_for(&server, notifier.clone());
        seed(&service, vec![ticket_json(id, "x", "pendente")]).await;

        let outcome = service.drop_on(id, "corrigido").await.unwrap();

        assert_eq!(outcome, DropOutcome::Moved(TicketStatus::Corrigido));
        let after = service.snapshot().await;
        assert_eq!(after[0].status, TicketStatus::Corrigido);

        let successes = notifier.successes.lock().unwrap();
        assert_eq!(successes.len(), 1);
        assert!(successes[0].contains("Corrigido"));
        assert!(notifier.errors.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_drop_unknown_ticket_is_not_found() {
        let server = MockServer::start();
        let notifier = RecordingNotifier::new();
        let service = service_for(&server, notifier);
        seed(&service, vec![]).await;

        let result = service.drop_on(Uuid::new_v4(), "corrigido").await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_begin_drag_echoes_card_without_mutation() {
        let server = MockServer::start();
        let notifier = RecordingNotifier::new();
        let service = service_for(&server, notifier);
        let id = Uuid::new_v4();
        seed(&service, vec![ticket_json(id, "x", "pendente")]).await;

        let before = service.snapshot().await;
        let card = service.begin_drag(id).await.unwrap();

        assert_eq!(card.id, id);
        assert_eq!(service.snapshot().await, before);
        assert_eq!(service.drag_phase().await, DragPhase::Dragging { ticket_id: id });
    }

    #[tokio::test]
    async fn test_board_view_applies_reveal_and_reset() {
        let server = MockServer::start();
        let notifier = RecordingNotifier::new();
        let service = service_for(&server, notifier);

        let rows: Vec<serde_json::Value> = (0..25)
            .map(|i| ticket_json(Uuid::new_v4(), &format!("t{}", i), "pendente"))
            .collect();
        seed(&service, rows).await;

        let user = Uuid::new_v4();
        let view = service.board_view(user, ViewParams::default()).await;
        let pendente = &view.columns[0];
        assert_eq!(pendente.total, 25);
        assert_eq!(pendente.tickets.len(), 10);
        assert!(pendente.has_more);
        assert_eq!(pendente.remaining, 15);

        service.load_more(user, TicketStatus::Pendente).await;
        let view = service.board_view(user, ViewParams::default()).await;
        assert_eq!(view.columns[0].tickets.len(), 20);

        // Mudar a busca devolve o contador ao tamanho inicial
        let mut params = ViewParams::default();
        params.search = "t1".to_string();
        let view = service.board_view(user, params.clone()).await;
        assert!(view.columns[0].tickets.len() <= 10);

        // Voltar aos defaults muda o filtro de novo: contador continua no inicial
        let view = service.board_view(user, ViewParams::default()).await;
        assert_eq!(view.columns[0].tickets.len(), 10);
    }

    #[tokio::test]
    async fn test_board_view_hides_empty_columns_when_asked() {
        let server = MockServer::start();
        let notifier = RecordingNotifier::new();
        let service = service_for(&server, notifier);
        seed(&service, vec![ticket_json(Uuid::new_v4(), "x", "pendente")]).await;

        let mut params = ViewParams::default();
        params.hide_empty_columns = true;

        let view = service.board_view(Uuid::new_v4(), params).await;
        assert_eq!(view.columns.len(), 1);
        assert_eq!(view.columns[0].status, TicketStatus::Pendente);
    }
}
