pub mod board;
pub mod engine;
pub mod fetcher;
pub mod notify;
pub mod realtime;
pub mod reveal;

pub use board::{BoardService, DragPhase, DropOutcome};
pub use fetcher::TicketFetcher;
pub use notify::{LogNotifier, Notifier};
pub use realtime::RefreshBridge;
pub use reveal::RevealState;
