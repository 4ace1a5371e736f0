pub mod board;
pub mod enriched_ticket;
pub mod webhook_payload;

pub use board::{
    AssigneeFilter, BoardColumn, BoardGroup, BoardView, ContactFilter, GroupBy, PriorityFilter,
    SectorFilter, SessionContext, SortOrder, ViewParams,
};
pub use enriched_ticket::EnrichedTicket;
pub use webhook_payload::{
    PayloadError, RegistrationRequest, SpokenTicketRequest, ValidatedRegistration,
    ValidatedSpokenTicket,
};
