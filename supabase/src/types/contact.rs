//! Linhas de `funcionarios_clientes` e `clients`
//!
//! Contatos se auto-cadastram e ficam pendentes de aprovação do
//! administrador (`approval_status = "pending"`, `is_active = false`).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::ClientRef;

/// Cliente (prefeitura) atendido
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    pub id: Uuid,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub municipality: Option<String>,
}

/// Funcionário de um cliente (contato externo)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientContact {
    pub id: Uuid,
    pub client_id: Uuid,
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    pub is_active: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub approval_status: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth_user_id: Option<Uuid>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,

    /// Cliente pai embutido na leitura
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clients: Option<ClientRef>,
}

/// Payload de inserção de contato vindo do auto-cadastro
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewClientContact {
    pub auth_user_id: Uuid,
    pub name: String,
    pub email: String,
    pub city: String,
    pub position: String,
    pub client_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub approval_status: String,
    pub is_active: bool,
}

impl NewClientContact {
    /// Contato recém-cadastrado: inativo até a aprovação do administrador
    pub fn pending(
        auth_user_id: Uuid,
        name: impl Into<String>,
        email: impl Into<String>,
        city: impl Into<String>,
        position: impl Into<String>,
        client_id: Uuid,
        phone: Option<String>,
    ) -> Self {
        Self {
            auth_user_id,
            name: name.into(),
            email: email.into(),
            city: city.into(),
            position: position.into(),
            client_id,
            phone,
            approval_status: "pending".to_string(),
            is_active: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_contact_defaults() {
        let contact = NewClientContact::pending(
            Uuid::new_v4(),
            "João Pereira",
            "joao@prefeitura.gov.br",
            "Mariana",
            "Secretário",
            Uuid::new_v4(),
            None,
        );

        assert_eq!(contact.approval_status, "pending");
        assert!(!contact.is_active);
        assert!(contact.phone.is_none());
    }
}
