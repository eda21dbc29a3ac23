//! Reference data shared by every request. Built once in `main` and never mutated.

pub mod country;
pub mod oauth;
pub mod settings;
pub mod zone;

use crate::config::AppConfig;

use self::country::Countries;
use self::oauth::Providers;
use self::settings::SettingsPages;
use self::zone::Zones;

pub struct Registry {
    pub countries: Countries,
    pub zones: Zones,
    pub oauth: Providers,
    pub settings: SettingsPages,
}

impl Registry {
    pub fn load(config: &AppConfig) -> Result<Self, serde_json::Error> {
        Ok(Self {
            countries: Countries::from_json(include_str!("../../data/countries.json"))?,
            zones: Zones::new(),
            oauth: Providers::new(&config.oauth_redirect_base, &config.oauth_client_ids),
            settings: SettingsPages::from_json(include_str!("../../data/settings.json"))?,
        })
    }
}
