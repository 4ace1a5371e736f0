//! Linhas das tabelas de apoio (setores, funcionários, perfis)

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Setor/departamento
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sector {
    pub id: Uuid,
    pub name: String,
}

/// Funcionário interno
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    pub id: Uuid,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_user_id: Option<Uuid>,
}

/// Linha de `profiles` (identidade sem cadastro de funcionário)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub user_id: Uuid,
    pub name: String,
}

/// Par devolvido pela procedure `get_ticket_creator_names`
///
/// A resolução de nomes de criadores é feita no servidor porque o join
/// direto com a tabela de identidades é bloqueado pela policy de acesso.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatorName {
    pub ticket_id: Uuid,
    pub creator_name: String,
}

/// Par (auth_user_id, name) para resolução em lote de autores
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EmployeeName {
    pub auth_user_id: Uuid,
    pub name: String,
}
