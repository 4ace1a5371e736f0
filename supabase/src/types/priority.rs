//! Níveis de prioridade de um ticket
//!
//! O banco aceita três valores: `baixa`, `media` e `alta`. O rank numérico é
//! usado apenas para ordenação no quadro (alta primeiro).

use serde::{Deserialize, Serialize};

/// Prioridade de um ticket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Baixa,
    Media,
    Alta,
}

impl Priority {
    /// Rank de ordenação (alta = 3, media = 2, baixa = 1)
    ///
    /// Prioridade ausente recebe rank 0 na camada de visualização.
    pub fn rank(&self) -> u8 {
        match self {
            Priority::Baixa => 1,
            Priority::Media => 2,
            Priority::Alta => 3,
        }
    }

    /// Valor usado no banco
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Baixa => "baixa",
            Priority::Media => "media",
            Priority::Alta => "alta",
        }
    }

    /// Nome de exibição
    pub fn label(&self) -> &'static str {
        match self {
            Priority::Baixa => "Baixa",
            Priority::Media => "Média",
            Priority::Alta => "Alta",
        }
    }

    /// Parse estrito do valor do banco
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "baixa" => Some(Priority::Baixa),
            "media" => Some(Priority::Media),
            "alta" => Some(Priority::Alta),
            _ => None,
        }
    }
}

impl Default for Priority {
    fn default() -> Self {
        Priority::Media
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_ranks() {
        assert_eq!(Priority::Alta.rank(), 3);
        assert_eq!(Priority::Media.rank(), 2);
        assert_eq!(Priority::Baixa.rank(), 1);
    }

    #[test]
    fn test_priority_parse() {
        assert_eq!(Priority::parse("alta"), Some(Priority::Alta));
        assert_eq!(Priority::parse("media"), Some(Priority::Media));
        assert_eq!(Priority::parse("baixa"), Some(Priority::Baixa));
        assert_eq!(Priority::parse("urgente"), None);
    }

    #[test]
    fn test_priority_default() {
        assert_eq!(Priority::default(), Priority::Media);
    }

    #[test]
    fn test_priority_serde() {
        let json = serde_json::to_string(&Priority::Alta).unwrap();
        assert_eq!(json, r#""alta""#);

        let parsed: Priority = serde_json::from_str(r#""baixa""#).unwrap();
        assert_eq!(parsed, Priority::Baixa);
    }
}
