use serde::Deserialize;
use thiserror::Error;

use supabase::types::{Priority, TicketStatus};
use uuid::Uuid;

/// Erros de validação dos payloads externos
///
/// Detectados antes de qualquer chamada de rede; o handler os converte em
/// resposta 400 com a mensagem inline.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PayloadError {
    #[error("Campo \"{0}\" é obrigatório e não pode estar vazio.")]
    MissingField(&'static str),

    #[error("Valor inválido para \"{field}\": {value}")]
    InvalidValue { field: &'static str, value: String },
}

/// Requisição de criação de ticket vinda da integração Spoken
///
/// Todos os campos são opcionais no parse; a validação explícita acontece em
/// `validate`, para que campo ausente vire 400 com mensagem própria em vez
/// de erro de desserialização.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SpokenTicketRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<String>,
    pub status: Option<String>,
    pub request_number: Option<String>,
    pub tags: Option<Vec<String>>,
    pub sector_id: Option<Uuid>,
    pub assigned_to: Option<Uuid>,
    pub client_contact_id: Option<Uuid>,
    pub due_date: Option<chrono::DateTime<chrono::Utc>>,
    pub created_by: Option<Uuid>,
    pub created_by_email: Option<String>,
}

impl SpokenTicketRequest {
    /// Valida os campos que não dependem do banco
    ///
    /// Título obrigatório; status e prioridade, quando presentes, precisam
    /// pertencer às enumerações fixas.
    pub fn validate(&self) -> Result<ValidatedSpokenTicket, PayloadError> {
        let title = self
            .title
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(PayloadError::MissingField("title"))?
            .to_string();

        let status = match self.status.as_deref() {
            None => TicketStatus::Pendente,
            Some(raw) => TicketStatus::parse(raw).ok_or_else(|| PayloadError::InvalidValue {
                field: "status",
                value: raw.to_string(),
            })?,
        };

        let priority = match self.priority.as_deref() {
            None => Priority::Media,
            Some(raw) => Priority::parse(raw).ok_or_else(|| PayloadError::InvalidValue {
                field: "priority",
                value: raw.to_string(),
            })?,
        };

        Ok(ValidatedSpokenTicket {
            title,
            description: self
                .description
                .as_deref()
                .map(str::trim)
                .filter(|d| !d.is_empty())
                .map(str::to_string),
            priority,
            status,
            request_number: self
                .request_number
                .as_deref()
                .map(str::trim)
                .filter(|r| !r.is_empty())
                .map(str::to_string),
            tags: self.tags.clone().unwrap_or_default(),
            sector_id: self.sector_id,
            assigned_to: self.assigned_to,
            client_contact_id: self.client_contact_id,
            due_date: self.due_date,
        })
    }

    /// Verifica a assinatura HMAC-SHA256 do corpo bruto
    ///
    /// A assinatura chega em hex no header `X-Spoken-Signature`.
    pub fn verify_signature(signature: &str, secret: &str, body: &[u8]) -> bool {
        use hmac::{Hmac, Mac};
        use sha2::Sha256;

        type HmacSha256 = Hmac<Sha256>;

        let mut mac = match HmacSha256::new_from_slice(secret.as_bytes()) {
            Ok(m) => m,
            Err(_) => return false,
        };

        mac.update(body);

        let result = mac.finalize();
        let expected = hex::encode(result.into_bytes());

        signature == expected
    }
}

/// Resultado da validação estática do payload Spoken
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedSpokenTicket {
    pub title: String,
    pub description: Option<String>,
    pub priority: Priority,
    pub status: TicketStatus,
    pub request_number: Option<String>,
    pub tags: Vec<String>,
    pub sector_id: Option<Uuid>,
    pub assigned_to: Option<Uuid>,
    pub client_contact_id: Option<Uuid>,
    pub due_date: Option<chrono::DateTime<chrono::Utc>>,
}

/// Requisição de auto-cadastro de funcionário de cliente
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegistrationRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub city: Option<String>,
    pub position: Option<String>,
    pub client_id: Option<Uuid>,
    pub phone: Option<String>,
}

/// Campos obrigatórios do auto-cadastro já validados
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedRegistration {
    pub name: String,
    pub email: String,
    pub password: String,
    pub city: String,
    pub position: String,
    pub client_id: Uuid,
    pub phone: Option<String>,
}

impl RegistrationRequest {
    pub fn validate(&self) -> Result<ValidatedRegistration, PayloadError> {
        fn required(value: &Option<String>, field: &'static str) -> Result<String, PayloadError> {
            value
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
                .ok_or(PayloadError::MissingField(field))
        }

        Ok(ValidatedRegistration {
            name: required(&self.name, "name")?,
            email: required(&self.email, "email")?,
            password: required(&self.password, "password")?,
            city: required(&self.city, "city")?,
            position: required(&self.position, "position")?,
            client_id: self.client_id.ok_or(PayloadError::MissingField("client_id"))?,
            phone: self
                .phone
                .as_deref()
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(str::to_string),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spoken_ticket_requires_title() {
        let request = SpokenTicketRequest::default();
        assert_eq!(request.validate(), Err(PayloadError::MissingField("title")));

        let request = SpokenTicketRequest {
            title: Some("   ".to_string()),
            ..Default::default()
        };
        assert_eq!(request.validate(), Err(PayloadError::MissingField("title")));
    }

    #[test]
    fn test_spoken_ticket_defaults() {
        let request = SpokenTicketRequest {
            title: Some("Telefone mudo".to_string()),
            ..Default::default()
        };

        let validated = request.validate().unwrap();
        assert_eq!(validated.status, TicketStatus::Pendente);
        assert_eq!(validated.priority, Priority::Media);
        assert!(validated.tags.is_empty());
    }

    #[test]
    fn test_spoken_ticket_rejects_unknown_status() {
        let request = SpokenTicketRequest {
            title: Some("Teste".to_string()),
            status: Some("aberto".to_string()),
            ..Default::default()
        };

        assert_eq!(
            request.validate(),
            Err(PayloadError::InvalidValue {
                field: "status",
                value: "aberto".to_string()
            })
        );
    }

    #[test]
    fn test_registration_requires_all_fields() {
        let request = RegistrationRequest {
            name: Some("João".to_string()),
            email: Some("joao@prefeitura.gov.br".to_string()),
            ..Default::default()
        };

        assert_eq!(request.validate(), Err(PayloadError::MissingField("password")));
    }

    #[test]
    fn test_verify_signature() {
        let secret = "test_secret";
        let body = b"test payload";

        use hmac::{Hmac, Mac};
        use sha2::Sha256;
        type HmacSha256 = Hmac<Sha256>;

        let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).unwrap();
        mac.update(body);
        let valid_signature = hex::encode(mac.finalize().into_bytes());

        assert!(SpokenTicketRequest::verify_signature(&valid_signature, secret, body));
        assert!(!SpokenTicketRequest::verify_signature("invalid", secret, body));
    }
}
