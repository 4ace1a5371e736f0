use serde::{Deserialize, Serialize};
use config::{Config, ConfigError, Environment, File};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Settings {
    pub server: ServerSettings,
    pub supabase: SupabaseSettings,
    #[serde(default)]
    pub spoken: SpokenSettings,
    #[serde(default)]
    pub board: BoardSettings,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SupabaseSettings {
    pub url: String,
    pub service_role_key: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct SpokenSettings {
    pub webhook_secret: Option<String>,  // Segredo HMAC do webhook Spoken
    #[serde(default)]
    pub validate_signature: bool,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct BoardSettings {
    /// Tamanho da página de revelação por coluna
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    /// Janela do debounce entre notificação de mudança e refetch
    #[serde(default = "default_refresh_debounce_ms")]
    pub refresh_debounce_ms: u64,
}

fn default_page_size() -> usize {
    10
}

fn default_refresh_debounce_ms() -> u64 {
    500
}

impl Default for BoardSettings {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            refresh_debounce_ms: default_refresh_debounce_ms(),
        }
    }
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let mut builder = Config::builder()
            // Arquivo de configuração base
            .add_source(File::with_name("config/default").required(false))
            // Arquivo específico do ambiente
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false));

        // Adicionar variáveis de ambiente específicas
        if let Ok(url) = std::env::var("SUPABASE_URL") {
            builder = builder.set_override("supabase.url", url)?;
        }
        if let Ok(key) = std::env::var("SUPABASE_SERVICE_ROLE_KEY") {
            builder = builder.set_override("supabase.service_role_key", key)?;
        }

        // Também suportar variáveis prefixadas
        builder = builder.add_source(Environment::with_prefix("OPPTICKETS").separator("__"));

        let s = builder.build()?;

        s.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_board_settings_defaults() {
        let board = BoardSettings::default();
        assert_eq!(board.page_size, 10);
        assert_eq!(board.refresh_debounce_ms, 500);
    }

    #[test]
    fn test_spoken_settings_default_skips_signature() {
        let spoken = SpokenSettings::default();
        assert!(spoken.webhook_secret.is_none());
        assert!(!spoken.validate_signature);
    }
}
