use std::collections::{BTreeMap, HashMap};

use url::Url;

pub const PROVIDER_IDS: [&str; 4] = ["discord", "github", "gitlab", "stack-overflow"];

#[derive(Clone, Debug)]
pub struct Provider {
    pub id: &'static str,
    pub name: &'static str,
    pub auth_url: &'static str,
    pub scopes: &'static [&'static str],
    pub client_id: Option<String>,
    pub redirect_uri: String,
}

impl Provider {
    /// Authorize URL carrying `state`. `None` when no client id is configured.
    pub fn authorize_url(&self, state: &str) -> Option<String> {
        let client_id = self.client_id.as_deref()?;
        let scope = self.scopes.join(" ");
        let mut params = vec![
            ("client_id", client_id),
            ("redirect_uri", self.redirect_uri.as_str()),
            ("response_type", "code"),
            ("state", state),
        ];
        if !scope.is_empty() {
            params.push(("scope", scope.as_str()));
        }
        Url::parse_with_params(self.auth_url, &params)
            .ok()
            .map(String::from)
    }
}

pub struct Providers {
    providers: BTreeMap<&'static str, Provider>,
}

impl Providers {
    pub fn new(redirect_base: &str, client_ids: &HashMap<String, String>) -> Self {
        let base = redirect_base.trim_end_matches('/');
        let providers = PROVIDER_IDS
            .iter()
            .map(|&id| {
                let (name, auth_url, scopes) = describe(id);
                let provider = Provider {
                    id,
                    name,
                    auth_url,
                    scopes,
                    client_id: client_ids.get(id).cloned(),
                    redirect_uri: format!("{}/golfer/connect/{}", base, id),
                };
                (id, provider)
            })
            .collect();
        Self { providers }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Provider> {
        self.providers.values()
    }
}

fn describe(id: &str) -> (&'static str, &'static str, &'static [&'static str]) {
    const DISCORD: &[&str] = &["identify"];
    const GITLAB: &[&str] = &["read_user"];
    const NONE: &[&str] = &[];

    match id {
        "discord" => ("Discord", "https://discord.com/oauth2/authorize", DISCORD),
        "github" => ("GitHub", "https://github.com/login/oauth/authorize", NONE),
        "gitlab" => ("GitLab", "https://gitlab.com/oauth/authorize", GITLAB),
        _ => ("Stack Overflow", "https://stackoverflow.com/oauth", NONE),
    }
}
