//! Leituras e escritas das tabelas de apoio
//!
//! Setores, funcionários, contatos de clientes e comentários. São as fontes
//! dos filtros do quadro e do fluxo de aprovação de contatos.

use crate::client::SupabaseClient;
use crate::error::{Result, SupabaseError};
use crate::types::{
    Client, ClientContact, Employee, EmployeeName, NewClientContact, NewTicketComment, Profile,
    Sector, TicketComment,
};
use serde_json::Value;
use uuid::Uuid;

const CONTACT_SELECT: &str = "*,clients!funcionarios_clientes_client_id_fkey(id,name)";

#[derive(Clone)]
pub struct DirectoryStore {
    client: SupabaseClient,
}

impl DirectoryStore {
    pub fn new(client: SupabaseClient) -> Self {
        Self { client }
    }

    /// Setores ordenados por nome (abas do quadro)
    pub async fn sectors(&self) -> Result<Vec<Sector>> {
        self.client.get_json("/sectors?select=id,name&order=name").await
    }

    /// Funcionários ordenados por nome (filtro de responsável)
    pub async fn employees(&self) -> Result<Vec<Employee>> {
        self.client
            .get_json("/employees?select=id,name,email&order=name")
            .await
    }

    /// Contatos ativos, com o cliente pai embutido (filtro de cliente)
    pub async fn client_contacts(&self, client_id: Option<Uuid>) -> Result<Vec<ClientContact>> {
        let mut query = format!(
            "/funcionarios_clientes?select={}&is_active=eq.true&order=name",
            urlencoding::encode(CONTACT_SELECT)
        );
        if let Some(client_id) = client_id {
            query.push_str(&format!("&client_id=eq.{}", client_id));
        }
        self.client.get_json(&query).await
    }

    /// Contatos aguardando aprovação do administrador
    pub async fn pending_contacts(&self) -> Result<Vec<ClientContact>> {
        let query = format!(
            "/funcionarios_clientes?select={}&approval_status=eq.pending&order=created_at",
            urlencoding::encode(CONTACT_SELECT)
        );
        self.client.get_json(&query).await
    }

    /// Busca um cliente pelo id
    pub async fn client_by_id(&self, client_id: Uuid) -> Result<Option<Client>> {
        let query = format!("/clients?select=id,name,municipality&id=eq.{}", client_id);
        let rows: Vec<Client> = self.client.get_json(&query).await?;
        Ok(rows.into_iter().next())
    }

    /// Busca um contato pelo email (detecção de cadastro duplicado)
    pub async fn contact_by_email(&self, email: &str) -> Result<Option<ClientContact>> {
        let query = format!(
            "/funcionarios_clientes?select={}&email=eq.{}",
            urlencoding::encode(CONTACT_SELECT),
            urlencoding::encode(email)
        );
        let rows: Vec<ClientContact> = self.client.get_json(&query).await?;
        Ok(rows.into_iter().next())
    }

    /// Busca um funcionário pelo email
    pub async fn employee_by_email(&self, email: &str) -> Result<Option<Employee>> {
        let query = format!(
            "/employees?select=id,name,email,auth_user_id&email=eq.{}",
            urlencoding::encode(email)
        );
        let rows: Vec<Employee> = self.client.get_json(&query).await?;
        Ok(rows.into_iter().next())
    }

    /// Busca um perfil pelo campo `name`
    ///
    /// A tabela `profiles` não guarda email; o cadastro legado usa o campo
    /// `name` como chave de busca nesse fallback.
    pub async fn profile_by_name(&self, value: &str) -> Result<Option<Profile>> {
        let query = format!(
            "/profiles?select=user_id,name&name=eq.{}",
            urlencoding::encode(value)
        );
        let rows: Vec<Profile> = self.client.get_json(&query).await?;
        Ok(rows.into_iter().next())
    }

    /// Verifica se um funcionário existe pelo id
    pub async fn employee_exists(&self, employee_id: Uuid) -> Result<bool> {
        let query = format!("/employees?select=id&id=eq.{}", employee_id);
        let rows: Vec<Value> = self.client.get_json(&query).await?;
        Ok(!rows.is_empty())
    }

    /// Verifica se um setor existe pelo id
    pub async fn sector_exists(&self, sector_id: Uuid) -> Result<bool> {
        let query = format!("/sectors?select=id&id=eq.{}", sector_id);
        let rows: Vec<Value> = self.client.get_json(&query).await?;
        Ok(!rows.is_empty())
    }

    /// Verifica se um contato existe pelo id
    pub async fn contact_exists(&self, contact_id: Uuid) -> Result<bool> {
        let query = format!("/funcionarios_clientes?select=id&id=eq.{}", contact_id);
        let rows: Vec<Value> = self.client.get_json(&query).await?;
        Ok(!rows.is_empty())
    }

    /// Insere um contato (auto-cadastro pendente de aprovação)
    pub async fn insert_contact(&self, contact: &NewClientContact) -> Result<ClientContact> {
        let body = serde_json::to_value(contact)?;
        let created: Vec<ClientContact> = self.client.post_json("/funcionarios_clientes", &body).await?;

        created
            .into_iter()
            .next()
            .ok_or_else(|| SupabaseError::NotFound("inserção não retornou o contato criado".to_string()))
    }

    /// Atualiza campos de um contato, devolvendo as linhas afetadas
    ///
    /// Usado na aprovação/rejeição e na desativação. Vetor vazio significa
    /// escrita bloqueada ou contato inexistente.
    pub async fn update_contact(&self, contact_id: Uuid, patch: &Value) -> Result<Vec<ClientContact>> {
        let query = format!("/funcionarios_clientes?id=eq.{}", contact_id);
        self.client.patch_json(&query, patch).await
    }

    /// Comentários de um ticket, do mais antigo para o mais novo
    pub async fn comments(&self, ticket_id: Uuid) -> Result<Vec<TicketComment>> {
        let query = format!(
            "/ticket_comments?select=*&ticket_id=eq.{}&order=created_at.asc",
            ticket_id
        );
        self.client.get_json(&query).await
    }

    /// Insere um comentário e devolve a linha criada
    pub async fn insert_comment(&self, comment: &NewTicketComment) -> Result<TicketComment> {
        let body = serde_json::to_value(comment)?;
        let created: Vec<TicketComment> = self.client.post_json("/ticket_comments", &body).await?;

        created
            .into_iter()
            .next()
            .ok_or_else(|| SupabaseError::NotFound("inserção não retornou o comentário criado".to_string()))
    }

    /// Nomes de funcionários por auth_user_id, em lote
    pub async fn employee_names_by_auth_ids(&self, user_ids: &[Uuid]) -> Result<Vec<EmployeeName>> {
        if user_ids.is_empty() {
            return Ok(Vec::new());
        }
        let ids = user_ids
            .iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join(",");
        let query = format!(
            "/employees?select=auth_user_id,name&auth_user_id=in.({})",
            ids
        );
        self.client.get_json(&query).await
    }

    /// Nomes de perfis por user_id, em lote (fallback de autores)
    pub async fn profile_names_by_user_ids(&self, user_ids: &[Uuid]) -> Result<Vec<Profile>> {
        if user_ids.is_empty() {
            return Ok(Vec::new());
        }
        let ids = user_ids
            .iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join(",");
        let query = format!("/profiles?select=user_id,name&user_id=in.({})", ids);
        self.client.get_json(&query).await
    }
}
