// Biblioteca do backend OPPTickets
// Expõe módulos para uso em testes e binários

pub mod config;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod utils;

use std::sync::Arc;

use services::BoardService;
use supabase::{AdminAuth, ChangeFeed, DirectoryStore, TicketStore};

// Estado compartilhado entre os handlers
pub struct AppState {
    pub settings: config::Settings,
    pub store: TicketStore,
    pub directory: DirectoryStore,
    pub auth: AdminAuth,
    pub feed: ChangeFeed,
    pub board: Arc<BoardService>,
}
