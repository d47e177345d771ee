// src/common/i18n.rs

use std::{collections::HashMap, sync::LazyLock};

const DEFAULT_LANG: &str = "en";

// Tabelas embutidas no binário
const EN: &str = include_str!("../../locales/en.json");
const PT: &str = include_str!("../../locales/pt.json");

static SHARED: LazyLock<I18nStore> = LazyLock::new(|| I18nStore {
    messages: HashMap::from([
        ("en".to_string(), serde_json::from_str(EN).unwrap_or_default()),
        ("pt".to_string(), serde_json::from_str(PT).unwrap_or_default()),
    ]),
});

/// Mensagens de erro por idioma, com placeholders no formato `{nome}`.
#[derive(Debug, Clone)]
pub struct I18nStore {
    messages: HashMap<String, HashMap<String, String>>,
}

impl I18nStore {
    /// Carrega e valida as tabelas embutidas (falha cedo na inicialização).
    pub fn load() -> anyhow::Result<Self> {
        let mut messages = HashMap::new();
        messages.insert("en".to_string(), serde_json::from_str(EN)?);
        messages.insert("pt".to_string(), serde_json::from_str(PT)?);
        Ok(Self { messages })
    }

    pub fn shared() -> &'static I18nStore {
        &SHARED
    }

    pub fn translate(&self, lang: &str, key: &str, params: &[(&str, String)]) -> String {
        let template = self
            .messages
            .get(lang)
            .and_then(|table| table.get(key))
            .or_else(|| self.messages.get(DEFAULT_LANG).and_then(|table| table.get(key)));

        let Some(template) = template else {
            return key.to_string();
        };

        params.iter().fold(template.clone(), |text, (name, value)| {
            text.replace(&format!("{{{}}}", name), value)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_tables_parse_and_share_the_same_keys() {
        let store = I18nStore::load().unwrap();
        let en = &store.messages["en"];
        let pt = &store.messages["pt"];
        let mut en_keys: Vec<_> = en.keys().collect();
        let mut pt_keys: Vec<_> = pt.keys().collect();
        en_keys.sort();
        pt_keys.sort();
        assert_eq!(en_keys, pt_keys);
    }

    #[test]
    fn placeholders_are_substituted() {
        let store = I18nStore::shared();
        let text = store.translate("en", "too_many_files", &[("max", "5".to_string())]);
        assert_eq!(text, "Maximum 5 files allowed per field");
    }

    #[test]
    fn unknown_language_falls_back_to_english() {
        let store = I18nStore::shared();
        assert_eq!(store.translate("de", "missing_token", &[]), "Missing auth token");
        assert_eq!(store.translate("en", "no_such_key", &[]), "no_such_key");
    }
}
