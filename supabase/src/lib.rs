//! Cliente tipado da API REST do Supabase
//!
//! Este crate fornece o acesso que o backend do OPPTickets precisa do
//! projeto Supabase hospedado:
//!
//! - Leitura e escrita de linhas via PostgREST, com recursos embutidos
//!   (rótulos de setor, responsável e contato) no mesmo corpo
//! - Procedures via RPC (resolução de nomes de criadores)
//! - Administração de usuários via GoTrue admin (auto-cadastro de contatos)
//! - Hub de notificações de mudança para o refetch do quadro
//!
//! # Linhas afetadas
//!
//! As escritas pedem `Prefer: return=representation`, então o corpo da
//! resposta é o conjunto de linhas que a operação de fato atingiu. Policies
//! de RLS bloqueiam escritas sem erro HTTP; o vetor vazio é o sinal, e o
//! quadro converte isso em falha explícita.
//!
//! # Exemplo Básico
//!
//! ```rust,ignore
//! use supabase::{SupabaseClient, TicketStore, tickets::TicketFilter};
//!
//! #[tokio::main]
//! async fn main() -> supabase::Result<()> {
//!     let url = std::env::var("SUPABASE_URL").expect("SUPABASE_URL não configurado");
//!     let key = std::env::var("SUPABASE_SERVICE_ROLE_KEY")
//!         .expect("SUPABASE_SERVICE_ROLE_KEY não configurado");
//!
//!     let client = SupabaseClient::new(url, key)?;
//!     let store = TicketStore::new(client);
//!     let tickets = store.fetch_tickets(&TicketFilter::default()).await?;
//!     println!("Total de tickets: {}", tickets.len());
//!
//!     Ok(())
//! }
//! ```

// Módulos públicos
pub mod auth;
pub mod client;
pub mod directory;
pub mod error;
pub mod realtime;
pub mod tickets;
pub mod types;

// Re-exports principais
pub use auth::AdminAuth;
pub use client::SupabaseClient;
pub use directory::DirectoryStore;
pub use error::{Result, SupabaseError};
pub use realtime::{ChangeEvent, ChangeFeed, ChangeKind};
pub use tickets::{TicketFilter, TicketStore};
