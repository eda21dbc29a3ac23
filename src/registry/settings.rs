use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SettingKind {
    Bool { default: bool },
    Select { options: Vec<String>, default: String },
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Setting {
    pub id: String,
    pub name: String,
    #[serde(flatten)]
    pub kind: SettingKind,
}

impl Setting {
    pub fn valid_value(&self, value: &str) -> bool {
        match &self.kind {
            SettingKind::Bool { .. } => value == "true" || value == "false",
            SettingKind::Select { options, .. } => options.iter().any(|o| o == value),
        }
    }

    pub fn default_value(&self) -> String {
        match &self.kind {
            SettingKind::Bool { default } => default.to_string(),
            SettingKind::Select { default, .. } => default.clone(),
        }
    }
}

/// Setting definitions keyed by page name.
pub struct SettingsPages {
    pages: HashMap<String, Vec<Setting>>,
}

impl SettingsPages {
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        Ok(Self { pages: serde_json::from_str(raw)? })
    }

    /// Definitions for `page`; empty for pages nobody defined.
    pub fn page(&self, page: &str) -> &[Setting] {
        self.pages.get(page).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Setting])> {
        self.pages.iter().map(|(page, settings)| (page.as_str(), settings.as_slice()))
    }

    /// Every page's values: stored values over defaults, unknown ids dropped.
    pub fn resolve(
        &self,
        stored: &BTreeMap<String, BTreeMap<String, String>>,
    ) -> BTreeMap<String, BTreeMap<String, String>> {
        self.pages
            .iter()
            .map(|(page, settings)| {
                let saved = stored.get(page);
                let values = settings
                    .iter()
                    .map(|s| {
                        let value = saved
                            .and_then(|m| m.get(&s.id))
                            .filter(|v| s.valid_value(v))
                            .cloned()
                            .unwrap_or_else(|| s.default_value());
                        (s.id.clone(), value)
                    })
                    .collect();
                (page.clone(), values)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pages() -> SettingsPages {
        SettingsPages::from_json(include_str!("../../data/settings.json")).unwrap()
    }

    #[test]
    fn select_accepts_only_its_options() {
        let pages = pages();
        let scoring = pages.page("hole").iter().find(|s| s.id == "scoring").unwrap();
        assert!(scoring.valid_value("chars"));
        assert!(!scoring.valid_value("lines"));
        assert!(!scoring.valid_value(""));
    }

    #[test]
    fn bool_accepts_true_and_false() {
        let pages = pages();
        let ligatures = pages.page("hole").iter().find(|s| s.id == "font-ligatures").unwrap();
        assert!(ligatures.valid_value("true"));
        assert!(ligatures.valid_value("false"));
        assert!(!ligatures.valid_value("on"));
    }

    #[test]
    fn unknown_page_has_no_settings() {
        assert!(pages().page("nope").is_empty());
    }

    #[test]
    fn resolve_prefers_valid_stored_values() {
        let mut stored = BTreeMap::new();
        let mut hole = BTreeMap::new();
        hole.insert("scoring".to_string(), "chars".to_string());
        hole.insert("tab-width".to_string(), "3".to_string());
        hole.insert("stale".to_string(), "x".to_string());
        stored.insert("hole".to_string(), hole);

        let resolved = pages().resolve(&stored);
        assert_eq!(resolved["hole"]["scoring"], "chars");
        assert_eq!(resolved["hole"]["tab-width"], "4");
        assert_eq!(resolved["hole"]["font-ligatures"], "false");
        assert!(!resolved["hole"].contains_key("stale"));
        assert_eq!(resolved["rankings"]["scope"], "all");
    }
}
