//! Operações administrativas do GoTrue
//!
//! Usado apenas pelo fluxo de auto-cadastro de contatos: cria o usuário de
//! autenticação com a service role key e o remove quando a inserção do
//! contato falha (compensação).

use crate::client::SupabaseClient;
use crate::error::{Result, SupabaseError};
use serde_json::{json, Value};
use uuid::Uuid;

#[derive(Clone)]
pub struct AdminAuth {
    client: SupabaseClient,
}

impl AdminAuth {
    pub fn new(client: SupabaseClient) -> Self {
        Self { client }
    }

    /// Cria um usuário de autenticação já confirmado
    ///
    /// # Argumentos
    ///
    /// - `email` / `password`: credenciais do novo usuário
    /// - `metadata`: gravado em `user_metadata` (e.g., nome e flag de cliente)
    ///
    /// # Retorno
    ///
    /// O id do usuário criado, usado como `auth_user_id` do contato.
    pub async fn create_user(&self, email: &str, password: &str, metadata: Value) -> Result<Uuid> {
        let body = json!({
            "email": email,
            "password": password,
            "user_metadata": metadata,
            "email_confirm": true
        });

        let created: Value = self.client.post_auth_json("/admin/users", &body).await?;

        let id = created
            .get("id")
            .and_then(|v| v.as_str())
            .and_then(|s| Uuid::parse_str(s).ok())
            .ok_or_else(|| SupabaseError::AuthError("resposta de criação de usuário sem id".to_string()))?;

        tracing::info!("Usuário de autenticação criado: {}", id);
        Ok(id)
    }

    /// Remove um usuário de autenticação (compensação de cadastro)
    pub async fn delete_user(&self, user_id: Uuid) -> Result<()> {
        self.client
            .delete_auth(&format!("/admin/users/{}", user_id))
            .await?;

        tracing::info!("Usuário de autenticação removido: {}", user_id);
        Ok(())
    }
}
