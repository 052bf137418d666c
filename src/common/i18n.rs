// src/common/i18n.rs

use std::collections::HashMap;

const DEFAULT_LANG: &str = "pt";

// Tabela (idioma, chave) -> mensagem. Novos idiomas entram aqui.
const MESSAGES: &[(&str, &str, &str)] = &[
    ("pt", "validation_failed", "Um ou mais campos são inválidos."),
    ("pt", "email_already_exists", "Este e-mail já está em uso."),
    ("pt", "invalid_credentials", "E-mail ou senha inválidos."),
    ("pt", "invalid_token", "Token de autenticação inválido ou ausente."),
    ("pt", "forbidden", "Você não tem permissão para realizar esta ação."),
    ("pt", "not_found", "Registro não encontrado."),
    ("pt", "deletion_failed", "Falha ao excluir a conta."),
    ("pt", "cannot_delete_own_account", "Você não pode excluir a sua própria conta."),
    ("pt", "record_in_use", "O registro ainda é usado por outros cadastros."),
    ("pt", "internal_error", "Ocorreu um erro inesperado."),
    ("en", "validation_failed", "One or more fields are invalid."),
    ("en", "email_already_exists", "This e-mail is already in use."),
    ("en", "invalid_credentials", "Invalid e-mail or password."),
    ("en", "invalid_token", "Invalid or missing authentication token."),
    ("en", "forbidden", "You are not allowed to perform this action."),
    ("en", "not_found", "Record not found."),
    ("en", "deletion_failed", "Deletion failed."),
    ("en", "cannot_delete_own_account", "You cannot delete your own account."),
    ("en", "record_in_use", "The record is still referenced by other records."),
    ("en", "internal_error", "An unexpected error occurred."),
];

#[derive(Debug, Clone)]
pub struct I18nStore {
    messages: HashMap<&'static str, HashMap<&'static str, &'static str>>,
}

impl Default for I18nStore {
    fn default() -> Self {
        let mut messages: HashMap<&'static str, HashMap<&'static str, &'static str>> = HashMap::new();
        for (lang, key, text) in MESSAGES {
            messages.entry(*lang).or_default().insert(*key, *text);
        }
        Self { messages }
    }
}

impl I18nStore {
    /// Idioma desconhecido cai no português; chave desconhecida volta como está.
    pub fn translate<'a>(&self, lang: &str, key: &'a str) -> &'a str {
        let lookup = |lang: &str| self.messages.get(lang).and_then(|m| m.get(key)).copied();
        lookup(lang).or_else(|| lookup(DEFAULT_LANG)).unwrap_or(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn falls_back_to_portuguese_then_to_key() {
        let store = I18nStore::default();
        assert_eq!(store.translate("en", "forbidden"), "You are not allowed to perform this action.");
        assert_eq!(store.translate("de", "forbidden"), "Você não tem permissão para realizar esta ação.");
        assert_eq!(store.translate("en", "no_such_key"), "no_such_key");
    }
}
