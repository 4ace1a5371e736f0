//! Contadores de revelação por coluna
//!
//! Cada coluna revela uma fatia inicial e cresce em páginas via "carregar
//! mais". Invariantes: visível nunca passa do tamanho real da coluna e
//! `has_more` vale exatamente quando há fatia oculta. Qualquer mudança de
//! filtro devolve todas as colunas ao tamanho inicial.

use std::collections::HashMap;
use supabase::types::TicketStatus;

#[derive(Debug, Clone)]
pub struct RevealState {
    counts: HashMap<TicketStatus, usize>,
    page_size: usize,
}

impl RevealState {
    pub fn new(page_size: usize) -> Self {
        Self {
            counts: HashMap::new(),
            page_size,
        }
    }

    /// Contador visível da coluna (inicia no tamanho da página)
    pub fn visible(&self, status: TicketStatus) -> usize {
        *self.counts.get(&status).unwrap_or(&self.page_size)
    }

    /// Revela mais uma página na coluna
    pub fn load_more(&mut self, status: TicketStatus) {
        let current = self.visible(status);
        self.counts.insert(status, current + self.page_size);
    }

    /// Volta todas as colunas ao tamanho inicial
    pub fn reset(&mut self) {
        self.counts.clear();
    }

    /// Quantos itens da coluna aparecem de fato
    pub fn visible_len(&self, status: TicketStatus, bucket_len: usize) -> usize {
        self.visible(status).min(bucket_len)
    }

    /// Há fatia oculta nesta coluna?
    pub fn has_more(&self, status: TicketStatus, bucket_len: usize) -> bool {
        self.visible(status) < bucket_len
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_page_size() {
        let reveal = RevealState::new(10);
        for status in TicketStatus::ALL {
            assert_eq!(reveal.visible(status), 10);
        }
    }

    #[test]
    fn test_load_more_is_per_column() {
        let mut reveal = RevealState::new(10);
        reveal.load_more(TicketStatus::Pendente);

        assert_eq!(reveal.visible(TicketStatus::Pendente), 20);
        assert_eq!(reveal.visible(TicketStatus::Corrigido), 10);
    }

    #[test]
    fn test_visible_never_exceeds_bucket_len() {
        let mut reveal = RevealState::new(10);
        reveal.load_more(TicketStatus::Pendente);

        assert_eq!(reveal.visible_len(TicketStatus::Pendente, 7), 7);
        assert_eq!(reveal.visible_len(TicketStatus::Pendente, 25), 20);
    }

    #[test]
    fn test_has_more_iff_hidden_slice_exists() {
        let reveal = RevealState::new(10);

        assert!(reveal.has_more(TicketStatus::Pendente, 11));
        assert!(!reveal.has_more(TicketStatus::Pendente, 10));
        assert!(!reveal.has_more(TicketStatus::Pendente, 3));
    }

    #[test]
    fn test_reset_returns_to_initial_size() {
        let mut reveal = RevealState::new(10);
        reveal.load_more(TicketStatus::Pendente);
        reveal.load_more(TicketStatus::Negado);

        reveal.reset();

        for status in TicketStatus::ALL {
            assert_eq!(reveal.visible(status), 10);
        }
    }
}
