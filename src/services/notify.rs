//! Notificações visíveis ao usuário
//!
//! Toda operação do quadro termina em uma notificação de sucesso ou de erro
//! nomeando a ação. O destino concreto fica atrás desta interface para que
//! os testes observem as mensagens sem depender de log.

use crate::utils::logging::{log_error, log_info};

pub trait Notifier: Send + Sync {
    fn success(&self, message: &str);
    fn error(&self, message: &str);
}

/// Notificador padrão: espelha as mensagens no log estruturado
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn success(&self, message: &str) {
        log_info(message);
    }

    fn error(&self, message: &str) {
        log_error(message);
    }
}
