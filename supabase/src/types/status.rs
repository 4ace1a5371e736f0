//! Status de tickets do quadro
//!
//! Diferente de outros sistemas em que status são configuráveis por lista,
//! aqui a enumeração é fixa no banco: `pendente`, `em_analise`, `corrigido`
//! e `negado`. Qualquer outro valor vindo de fora é rejeitado no parse, e um
//! status ausente é tratado como `pendente` pela camada de visualização.

use serde::{Deserialize, Serialize};

/// Status de um ticket (colunas do quadro, na ordem de exibição)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    Pendente,
    EmAnalise,
    Corrigido,
    Negado,
}

impl TicketStatus {
    /// Todos os status na ordem fixa das colunas do quadro
    pub const ALL: [TicketStatus; 4] = [
        TicketStatus::Pendente,
        TicketStatus::EmAnalise,
        TicketStatus::Corrigido,
        TicketStatus::Negado,
    ];

    /// Valor usado no banco (e nas URLs de filtro)
    pub fn as_str(&self) -> &'static str {
        match self {
            TicketStatus::Pendente => "pendente",
            TicketStatus::EmAnalise => "em_analise",
            TicketStatus::Corrigido => "corrigido",
            TicketStatus::Negado => "negado",
        }
    }

    /// Nome de exibição da coluna
    pub fn label(&self) -> &'static str {
        match self {
            TicketStatus::Pendente => "Pendente",
            TicketStatus::EmAnalise => "Em Análise",
            TicketStatus::Corrigido => "Corrigido",
            TicketStatus::Negado => "Negado",
        }
    }

    /// Parse estrito do valor do banco
    ///
    /// Retorna `None` para qualquer string fora da enumeração. Um alvo de
    /// drop inválido vira no-op exatamente por causa desse retorno.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pendente" => Some(TicketStatus::Pendente),
            "em_analise" => Some(TicketStatus::EmAnalise),
            "corrigido" => Some(TicketStatus::Corrigido),
            "negado" => Some(TicketStatus::Negado),
            _ => None,
        }
    }
}

impl Default for TicketStatus {
    fn default() -> Self {
        TicketStatus::Pendente
    }
}

impl std::fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parse() {
        assert_eq!(TicketStatus::parse("pendente"), Some(TicketStatus::Pendente));
        assert_eq!(TicketStatus::parse("em_analise"), Some(TicketStatus::EmAnalise));
        assert_eq!(TicketStatus::parse("corrigido"), Some(TicketStatus::Corrigido));
        assert_eq!(TicketStatus::parse("negado"), Some(TicketStatus::Negado));
        assert_eq!(TicketStatus::parse("aberto"), None);
        assert_eq!(TicketStatus::parse(""), None);
    }

    #[test]
    fn test_status_labels() {
        assert_eq!(TicketStatus::Pendente.label(), "Pendente");
        assert_eq!(TicketStatus::EmAnalise.label(), "Em Análise");
        assert_eq!(TicketStatus::Corrigido.label(), "Corrigido");
        assert_eq!(TicketStatus::Negado.label(), "Negado");
    }

    #[test]
    fn test_status_serde_wire_format() {
        let json = serde_json::to_string(&TicketStatus::EmAnalise).unwrap();
        assert_eq!(json, r#""em_analise""#);

        let parsed: TicketStatus = serde_json::from_str(r#""negado""#).unwrap();
        assert_eq!(parsed, TicketStatus::Negado);
    }

    #[test]
    fn test_status_default() {
        assert_eq!(TicketStatus::default(), TicketStatus::Pendente);
    }

    #[test]
    fn test_status_column_order() {
        let order: Vec<&str> = TicketStatus::ALL.iter().map(|s| s.as_str()).collect();
        assert_eq!(order, vec!["pendente", "em_analise", "corrigido", "negado"]);
    }
}
