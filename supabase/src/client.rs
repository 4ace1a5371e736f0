//! Cliente HTTP para a API REST do Supabase
//!
//! Cobre as três superfícies que o backend usa:
//! - PostgREST (`/rest/v1/{tabela}`) para leitura e escrita de linhas
//! - RPC (`/rest/v1/rpc/{função}`) para procedures no servidor
//! - GoTrue admin (`/auth/v1/admin/...`) para criação/remoção de usuários

use crate::error::{Result, SupabaseError};
use reqwest::{Client as HttpClient, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;

/// Cliente para interagir com a API REST do Supabase
///
/// # Autenticação
///
/// Todas as requisições carregam o par de headers que o Supabase exige:
/// `apikey` e `Authorization: Bearer`. O backend usa a service role key,
/// então as policies de RLS continuam valendo apenas quando a query as
/// declara (o PostgREST reporta escritas bloqueadas como zero linhas
/// afetadas, e é isso que o quadro de tickets inspeciona).
///
/// # Timeouts
///
/// - Total: 30s
/// - Connect: 5s
#[derive(Clone)]
pub struct SupabaseClient {
    http_client: HttpClient,
    base_url: String,
    api_key: String,
}

impl SupabaseClient {
    /// Cria um novo cliente Supabase
    ///
    /// # Argumentos
    ///
    /// * `base_url` - URL do projeto (e.g., `https://xyz.supabase.co`)
    /// * `api_key` - Service role key (ou anon key para leituras públicas)
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Result<Self> {
        Self::with_timeouts(base_url, api_key, 30, 5)
    }

    /// Cria um novo cliente com timeouts customizados
    pub fn with_timeouts(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        total_timeout_secs: u64,
        connect_timeout_secs: u64,
    ) -> Result<Self> {
        let http_client = HttpClient::builder()
            .timeout(Duration::from_secs(total_timeout_secs))
            .connect_timeout(Duration::from_secs(connect_timeout_secs))
            .build()
            .map_err(|e| SupabaseError::ConfigError(format!("Failed to create HTTP client: {}", e)))?;

        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }

        Ok(Self {
            http_client,
            base_url,
            api_key: api_key.into(),
        })
    }

    /// Executa uma requisição GET no PostgREST e parseia JSON
    ///
    /// `path_and_query` começa na tabela, e.g.
    /// `/tickets?select=*&order=created_at.desc`.
    pub async fn get_json<T: DeserializeOwned>(&self, path_and_query: &str) -> Result<T> {
        let url = format!("{}/rest/v1{}", self.base_url, path_and_query);

        tracing::debug!("GET {}", url);

        let response = self
            .http_client
            .get(&url)
            .header("apikey", &self.api_key)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .send()
            .await?;

        let response = self.handle_response(response).await?;
        let json = response.json().await?;
        Ok(json)
    }

    /// Executa uma requisição POST no PostgREST pedindo as linhas criadas
    ///
    /// O header `Prefer: return=representation` faz o PostgREST devolver as
    /// linhas efetivamente inseridas no corpo da resposta.
    pub async fn post_json<T: DeserializeOwned>(&self, path_and_query: &str, body: &Value) -> Result<T> {
        let url = format!("{}/rest/v1{}", self.base_url, path_and_query);

        tracing::debug!("POST {}", url);

        let response = self
            .http_client
            .post(&url)
            .header("apikey", &self.api_key)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Prefer", "return=representation")
            .json(body)
            .send()
            .await?;

        let response = self.handle_response(response).await?;
        let json = response.json().await?;
        Ok(json)
    }

    /// Executa uma requisição PATCH no PostgREST pedindo as linhas afetadas
    ///
    /// O retorno é o conjunto de linhas que a escrita de fato atingiu. Uma
    /// policy de RLS que bloqueia silenciosamente a escrita aparece aqui como
    /// um array vazio, não como erro HTTP. Quem chama decide o que fazer com
    /// zero linhas.
    pub async fn patch_json<T: DeserializeOwned>(&self, path_and_query: &str, body: &Value) -> Result<T> {
        let url = format!("{}/rest/v1{}", self.base_url, path_and_query);

        tracing::debug!("PATCH {}", url);

        let response = self
            .http_client
            .patch(&url)
            .header("apikey", &self.api_key)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Prefer", "return=representation")
            .json(body)
            .send()
            .await?;

        let response = self.handle_response(response).await?;
        let json = response.json().await?;
        Ok(json)
    }

    /// Executa uma requisição DELETE no PostgREST
    pub async fn delete(&self, path_and_query: &str) -> Result<()> {
        let url = format!("{}/rest/v1{}", self.base_url, path_and_query);

        tracing::debug!("DELETE {}", url);

        let response = self
            .http_client
            .delete(&url)
            .header("apikey", &self.api_key)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .send()
            .await?;

        self.handle_response(response).await?;
        Ok(())
    }

    /// Chama uma função RPC (`POST /rest/v1/rpc/{função}`)
    pub async fn rpc<T: DeserializeOwned>(&self, function: &str, args: &Value) -> Result<T> {
        let url = format!("{}/rest/v1/rpc/{}", self.base_url, function);

        tracing::debug!("RPC {}", function);

        let response = self
            .http_client
            .post(&url)
            .header("apikey", &self.api_key)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(args)
            .send()
            .await?;

        let response = self.handle_response(response).await?;
        let json = response.json().await?;
        Ok(json)
    }

    /// POST na superfície GoTrue admin (`/auth/v1/admin/...`)
    pub(crate) async fn post_auth_json<T: DeserializeOwned>(&self, path: &str, body: &Value) -> Result<T> {
        let url = format!("{}/auth/v1{}", self.base_url, path);

        tracing::debug!("POST {}", url);

        let response = self
            .http_client
            .post(&url)
            .header("apikey", &self.api_key)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(body)
            .send()
            .await?;

        let response = self.handle_response(response).await?;
        let json = response.json().await?;
        Ok(json)
    }

    /// DELETE na superfície GoTrue admin
    pub(crate) async fn delete_auth(&self, path: &str) -> Result<()> {
        let url = format!("{}/auth/v1{}", self.base_url, path);

        tracing::debug!("DELETE {}", url);

        let response = self
            .http_client
            .delete(&url)
            .header("apikey", &self.api_key)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .send()
            .await?;

        self.handle_response(response).await?;
        Ok(())
    }

    /// Processa a resposta HTTP e trata erros
    async fn handle_response(&self, response: Response) -> Result<Response> {
        let status = response.status();

        if status.is_success() {
            Ok(response)
        } else {
            let status_code = status.as_u16();
            let error_body = response.text().await.unwrap_or_else(|_| "Unknown error".to_string());

            tracing::error!("Supabase API error ({}): {}", status_code, error_body);

            // Tentar extrair mensagem de erro do JSON do PostgREST/GoTrue
            let message = if let Ok(json) = serde_json::from_str::<Value>(&error_body) {
                json.get("message")
                    .or_else(|| json.get("msg"))
                    .or_else(|| json.get("error"))
                    .and_then(|v| v.as_str())
                    .unwrap_or(&error_body)
                    .to_string()
            } else {
                error_body
            };

            Err(SupabaseError::ApiError {
                status: status_code,
                message,
            })
        }
    }

    /// Obtém a chave de autenticação
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Obtém a URL base do projeto
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = SupabaseClient::new("https://xyz.supabase.co", "service-key").unwrap();
        assert_eq!(client.api_key(), "service-key");
        assert_eq!(client.base_url(), "https://xyz.supabase.co");
    }

    #[test]
    fn test_client_strips_trailing_slash() {
        let client = SupabaseClient::new("https://xyz.supabase.co/", "k").unwrap();
        assert_eq!(client.base_url(), "https://xyz.supabase.co");
    }

    #[test]
    fn test_client_with_custom_timeouts() {
        let client = SupabaseClient::with_timeouts("http://localhost:54321", "k", 60, 10).unwrap();
        assert_eq!(client.base_url(), "http://localhost:54321");
    }
}
