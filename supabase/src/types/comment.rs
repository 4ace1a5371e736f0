//! Linha da tabela `ticket_comments`

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Comentário de um ticket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TicketComment {
    pub id: Uuid,
    pub ticket_id: Uuid,
    pub author_user_id: Uuid,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

/// Payload de inserção de comentário
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewTicketComment {
    pub ticket_id: Uuid,
    pub author_user_id: Uuid,
    pub message: String,
}
