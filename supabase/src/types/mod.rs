//! Tipos de linha e enumerações do banco

pub mod comment;
pub mod contact;
pub mod directory;
pub mod priority;
pub mod status;
pub mod ticket;

pub use comment::{NewTicketComment, TicketComment};
pub use contact::{Client, ClientContact, NewClientContact};
pub use directory::{CreatorName, Employee, EmployeeName, Profile, Sector};
pub use priority::Priority;
pub use status::TicketStatus;
pub use ticket::{ClientContactRef, ClientRef, EmployeeRef, NewTicket, SectorRef, Ticket};
