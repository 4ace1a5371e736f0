/// Main Application: backend do OPPTickets
///
/// Arquitetura:
/// - Quadro de tickets mantido em memória a partir do Supabase (PostgREST)
/// - Canal de mudanças dispara refetch com debounce (rajadas colapsam)
/// - Movimentação de status é otimista com rollback por snapshot
/// - Webhook Spoken ingere tickets criados fora do sistema
/// - Auto-cadastro de contatos fica pendente de aprovação do administrador

use axum::{
    middleware,
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use opptickets_middleware::{
    config::Settings,
    handlers::{
        add_comment, approve_contact, clear_filters, create_ticket, deactivate_contact,
        delete_ticket, get_board, handle_registration, handle_spoken_webhook, health_check,
        list_client_contacts, list_comments, list_employees, list_pending_contacts, list_sectors,
        load_more, move_ticket, ready_check, reject_contact, status_check, ticket_stats,
        toggle_group,
    },
    middleware as app_middleware,
    services::{BoardService, LogNotifier, Notifier, RefreshBridge, TicketFetcher},
    utils::logging::*,
    AppState,
};
use supabase::{AdminAuth, ChangeFeed, DirectoryStore, SupabaseClient, TicketStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Carregar variáveis de ambiente do arquivo .env (se existir)
    if dotenvy::dotenv().is_err() {
        // Em produção não existe .env - variáveis vêm do ambiente
        tracing::debug!("Arquivo .env não encontrado - usando variáveis de ambiente do sistema");
    }

    // Inicializar tracing
    tracing_subscriber::fmt::init();

    // Carregar configurações
    let settings = Settings::new()
        .map_err(|e| anyhow::anyhow!("Failed to load settings: {}", e))?;

    log_config_loaded(&std::env::var("RUST_ENV").unwrap_or_else(|_| "development".to_string()));

    // Cliente Supabase com a service role key
    let client = SupabaseClient::new(&settings.supabase.url, &settings.supabase.service_role_key)
        .map_err(|e| anyhow::anyhow!("Failed to create Supabase client: {}", e))?;

    let store = TicketStore::new(client.clone());
    let directory = DirectoryStore::new(client.clone());
    let auth = AdminAuth::new(client);

    // Hub de mudanças e quadro
    let feed = ChangeFeed::default();
    let notifier: Arc<dyn Notifier> = Arc::new(LogNotifier);
    let board = Arc::new(BoardService::new(
        TicketFetcher::new(store.clone()),
        store.clone(),
        feed.clone(),
        notifier,
        settings.board.page_size,
    ));

    // Ponte tempo real → refetch com debounce; o handle vive até o shutdown
    let _bridge = RefreshBridge::spawn(
        &feed,
        board.clone(),
        Duration::from_millis(settings.board.refresh_debounce_ms),
    );
    log_info("Ponte de tempo real iniciada (refetch com debounce)");

    // Carga inicial do conjunto de trabalho em background
    {
        let board = board.clone();
        tokio::spawn(async move {
            match board.refresh().await {
                Ok(count) => log_info(&format!("Carga inicial do quadro: {} tickets", count)),
                Err(e) => log_error(&format!("Carga inicial do quadro falhou: {}", e)),
            }
        });
    }

    let app_state = Arc::new(AppState {
        settings: settings.clone(),
        store,
        directory,
        auth,
        feed,
        board,
    });

    // Configurar rotas base
    let mut app = Router::new()
        // Health checks (públicos)
        .route("/health", get(health_check))
        .route("/ready", get(ready_check))
        .route("/status", get(status_check))

        // Quadro de tickets
        .route("/board", get(get_board))
        .route("/board/load-more", post(load_more))
        .route("/board/move", post(move_ticket))
        .route("/board/clear-filters", post(clear_filters))
        .route("/board/toggle-group", post(toggle_group))

        // Tickets e comentários
        .route("/tickets", post(create_ticket))
        .route("/tickets/stats", get(ticket_stats))
        .route("/tickets/:id", delete(delete_ticket))
        .route("/tickets/:id/comments", get(list_comments))
        .route("/tickets/:id/comments", post(add_comment))

        // Dados dos filtros
        .route("/sectors", get(list_sectors))
        .route("/filters/employees", get(list_employees))
        .route("/filters/client-contacts", get(list_client_contacts))

        // Webhook Spoken (público - validação própria de assinatura)
        .route("/webhooks/spoken", post(handle_spoken_webhook))

        // Auto-cadastro de contatos (público)
        .route("/register", post(handle_registration))

        .with_state(app_state.clone());

    // Rotas administrativas protegidas com API key
    let admin_routes = Router::new()
        .route("/admin/contacts/pending", get(list_pending_contacts))
        .route("/admin/contacts/:id/approve", post(approve_contact))
        .route("/admin/contacts/:id/reject", post(reject_contact))
        .route("/admin/contacts/:id/deactivate", post(deactivate_contact))
        .layer(middleware::from_fn(app_middleware::require_admin_key))
        .with_state(app_state);

    app = app
        .merge(admin_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    // No ambiente gerenciado, usar a variável de ambiente PORT
    let port = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(settings.server.port);
    let listener = TcpListener::bind(format!("{}:{}", settings.server.host, port)).await?;

    log_server_startup(port);
    log_server_ready(port);

    // Graceful shutdown com signal handling
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    log_info("Server shut down gracefully");
    Ok(())
}

/// Signal handler para graceful shutdown
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            log_info("Received Ctrl+C, shutting down gracefully...");
        },
        _ = terminate => {
            log_info("Received SIGTERM, shutting down gracefully...");
        }
    }
}
