use std::collections::{BTreeMap, HashMap};

use actix_web::{
    cookie::{Cookie, SameSite},
    web, HttpResponse,
};
use chrono::{Duration, SecondsFormat, Utc};
use log::{debug, error};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set, TransactionTrait};
use serde::Serialize;

use crate::connections::{apply_visibility, get_connections};
use crate::entity::{connection, user};
use crate::error::AppError;
use crate::golfer::Golfer;
use crate::nonce::nonce;
use crate::registry::country::Country;
use crate::registry::settings::Setting;
use crate::registry::zone::Zone;
use crate::registry::Registry;
use crate::response::{found, render, see_other};

pub const LAYOUTS: [&str; 2] = ["default", "tabs"];
pub const KEYMAPS: [&str; 2] = ["default", "vim"];
pub const PRONOUNS: [&str; 3] = ["he/him", "she/her", "they/them"];
pub const THEMES: [&str; 3] = ["auto", "dark", "light"];

const SETTINGS_PATH: &str = "/golfer/settings";
const OAUTH_STATE_COOKIE: &str = "__Host-oauth-state";
const DELETE_GRACE_DAYS: i64 = 7;

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/cancel-delete").route(web::post().to(cancel_delete)))
        .service(web::resource("/delete").route(web::post().to(delete)))
        .service(
            web::resource("/settings")
                .route(web::get().to(settings_get))
                .route(web::post().to(settings_post)),
        )
        .service(web::resource("/settings/{page}").route(web::post().to(settings_page_post)))
        .service(web::resource("/settings/{page}/reset").route(web::post().to(settings_page_reset)));
}

type Form = web::Form<HashMap<String, String>>;

/// A POST without a body reads as an empty form.
fn form_fields(form: Option<Form>) -> HashMap<String, String> {
    form.map(Form::into_inner).unwrap_or_default()
}

/// Missing fields read as "".
fn field<'a>(form: &'a HashMap<String, String>, key: &str) -> &'a str {
    form.get(key).map(String::as_str).unwrap_or("")
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

async fn cancel_delete(
    db: web::Data<DatabaseConnection>,
    golfer: Golfer,
) -> Result<HttpResponse, AppError> {
    set_delete_at(db.get_ref(), golfer.id, None).await?;
    Ok(see_other(SETTINGS_PATH))
}

async fn delete(
    db: web::Data<DatabaseConnection>,
    golfer: Golfer,
) -> Result<HttpResponse, AppError> {
    let at = Utc::now() + Duration::days(DELETE_GRACE_DAYS);
    set_delete_at(db.get_ref(), golfer.id, Some(at)).await?;
    debug!("golfer {} scheduled for deletion at {}", golfer.id, at);
    Ok(see_other(SETTINGS_PATH))
}

async fn set_delete_at(
    db: &DatabaseConnection,
    user_id: i32,
    at: Option<chrono::DateTime<Utc>>,
) -> Result<(), AppError> {
    let active = user::ActiveModel {
        id: Set(user_id),
        delete_at: Set(at),
        ..Default::default()
    };
    user::Entity::update(active).exec(db).await.map_err(|e| {
        error!("set delete_at failed for golfer {}: {}", user_id, e);
        AppError::system_exception()
    })?;
    Ok(())
}

#[derive(Serialize)]
struct SettingsView<'a> {
    connections: Vec<ConnectionView>,
    countries: &'a BTreeMap<String, Vec<Country>>,
    layouts: &'static [&'static str],
    keymaps: &'static [&'static str],
    oauth_providers: BTreeMap<&'static str, ProviderView>,
    oauth_state: String,
    pronouns: &'static [&'static str],
    themes: &'static [&'static str],
    time_zones: Vec<Zone>,
    profile: ProfileView,
    settings: BTreeMap<String, BTreeMap<String, String>>,
    setting_pages: BTreeMap<&'a str, &'a [Setting]>,
}

#[derive(Serialize)]
struct ConnectionView {
    connection: String,
    username: String,
    public: bool,
}

impl From<connection::Model> for ConnectionView {
    fn from(model: connection::Model) -> Self {
        Self {
            connection: model.connection,
            username: model.username,
            public: model.public,
        }
    }
}

#[derive(Serialize)]
struct ProviderView {
    name: &'static str,
    auth_url: Option<String>,
}

#[derive(Serialize)]
struct ProfileView {
    login: String,
    country: Option<String>,
    show_country: bool,
    layout: String,
    keymap: String,
    pronouns: Option<String>,
    theme: String,
    time_zone: Option<String>,
    referrer: Option<String>,
    delete_at: Option<String>,
}

async fn settings_get(
    db: web::Data<DatabaseConnection>,
    registry: web::Data<Registry>,
    golfer: Golfer,
) -> Result<HttpResponse, AppError> {
    let connections = get_connections(db.get_ref(), golfer.id, false)
        .await
        .map_err(|e| {
            error!("get_connections failed for golfer {}: {}", golfer.id, e);
            AppError::system_exception()
        })?;

    let referrer = match golfer.user.referrer_id {
        Some(id) => user::Entity::find_by_id(id)
            .one(db.get_ref())
            .await
            .map_err(|e| {
                error!("referrer lookup failed for golfer {}: {}", golfer.id, e);
                AppError::system_exception()
            })?
            .map(|u| u.login),
        None => None,
    };

    let oauth_state = nonce();
    let oauth_providers = registry
        .oauth
        .iter()
        .map(|p| {
            let view = ProviderView {
                name: p.name,
                auth_url: p.authorize_url(&oauth_state),
            };
            (p.id, view)
        })
        .collect();

    let user = &golfer.user;
    let view = SettingsView {
        connections: connections.into_iter().map(ConnectionView::from).collect(),
        countries: registry.countries.tree(),
        layouts: &LAYOUTS,
        keymaps: &KEYMAPS,
        oauth_providers,
        oauth_state: oauth_state.clone(),
        pronouns: &PRONOUNS,
        themes: &THEMES,
        time_zones: registry.zones.list(Utc::now()),
        profile: ProfileView {
            login: golfer.login.clone(),
            country: user.country.clone(),
            show_country: user.show_country,
            layout: user.layout.clone(),
            keymap: user.keymap.clone(),
            pronouns: user.pronouns.clone(),
            theme: user.theme.clone(),
            time_zone: user.time_zone.clone(),
            referrer,
            delete_at: user
                .delete_at
                .map(|at| at.to_rfc3339_opts(SecondsFormat::Secs, true)),
        },
        settings: registry.settings.resolve(&golfer.settings),
        setting_pages: registry.settings.iter().collect(),
    };

    let cookie = Cookie::build(OAUTH_STATE_COOKIE, oauth_state)
        .http_only(true)
        .path("/")
        .same_site(SameSite::Lax)
        .secure(true)
        .finish();

    let mut resp = render("golfer/settings", "Settings", view);
    resp.add_cookie(&cookie).map_err(|e| {
        error!("oauth state cookie rejected: {}", e);
        AppError::system_exception()
    })?;
    Ok(resp)
}

async fn settings_page_post(
    db: web::Data<DatabaseConnection>,
    registry: web::Data<Registry>,
    mut golfer: Golfer,
    path: web::Path<String>,
    form: Option<Form>,
) -> Result<HttpResponse, AppError> {
    let page = path.into_inner();
    let form = form_fields(form);

    for setting in registry.settings.page(&page) {
        let value = field(&form, &setting.id);
        if setting.valid_value(value) {
            golfer
                .settings
                .entry(page.clone())
                .or_default()
                .insert(setting.id.clone(), value.to_string());
        }
    }

    golfer.save_settings(db.get_ref()).await?;

    // TODO redirect back to the page's own URL once page names are validated.
    Ok(found("/"))
}

async fn settings_page_reset(
    db: web::Data<DatabaseConnection>,
    mut golfer: Golfer,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    golfer.settings.remove(path.as_str());

    golfer.save_settings(db.get_ref()).await?;

    Ok(found("/"))
}

/// A profile submission that passed validation.
#[derive(Debug, PartialEq)]
struct ProfileUpdate {
    country: Option<String>,
    layout: String,
    keymap: String,
    pronouns: Option<String>,
    theme: String,
    time_zone: Option<String>,
    referrer: String,
    show_country: bool,
}

/// Checks fields in a fixed order and reports only the first failure.
fn validate_profile(
    form: &HashMap<String, String>,
    registry: &Registry,
) -> Result<ProfileUpdate, AppError> {
    let country = field(form, "country");
    if !country.is_empty() && registry.countries.by_id(country).is_none() {
        return Err(AppError::invalid("country"));
    }

    let layout = field(form, "layout");
    if !LAYOUTS.contains(&layout) {
        return Err(AppError::invalid("layout"));
    }

    let keymap = field(form, "keymap");
    if !KEYMAPS.contains(&keymap) {
        return Err(AppError::invalid("keymap"));
    }

    let pronouns = field(form, "pronouns");
    if !pronouns.is_empty() && !PRONOUNS.contains(&pronouns) {
        return Err(AppError::invalid("pronouns"));
    }

    let theme = field(form, "theme");
    if !THEMES.contains(&theme) {
        return Err(AppError::invalid("theme"));
    }

    let time_zone = field(form, "time_zone");
    if !time_zone.is_empty() && registry.zones.by_id(time_zone).is_none() {
        return Err(AppError::invalid("time_zone"));
    }

    Ok(ProfileUpdate {
        country: non_empty(country),
        layout: layout.to_string(),
        keymap: keymap.to_string(),
        pronouns: non_empty(pronouns),
        theme: theme.to_string(),
        time_zone: non_empty(time_zone),
        referrer: field(form, "referrer").to_string(),
        show_country: field(form, "show_country") == "on",
    })
}

async fn settings_post(
    db: web::Data<DatabaseConnection>,
    registry: web::Data<Registry>,
    golfer: Golfer,
    form: Option<Form>,
) -> Result<HttpResponse, AppError> {
    let form = form_fields(form);
    let update = validate_profile(&form, &registry)?;

    let txn = db.begin().await.map_err(|e| {
        error!("begin failed: {}", e);
        AppError::system_exception()
    })?;

    let referrer_id = if update.referrer.is_empty() {
        None
    } else {
        user::Entity::find()
            .filter(user::Column::Login.eq(update.referrer.as_str()))
            .filter(user::Column::Id.ne(golfer.id))
            .one(&txn)
            .await
            .map_err(|e| {
                error!("referrer lookup failed for golfer {}: {}", golfer.id, e);
                AppError::system_exception()
            })?
            .map(|u| u.id)
    };

    let active = user::ActiveModel {
        id: Set(golfer.id),
        country: Set(update.country),
        layout: Set(update.layout),
        keymap: Set(update.keymap),
        pronouns: Set(update.pronouns),
        referrer_id: Set(referrer_id),
        show_country: Set(update.show_country),
        theme: Set(update.theme),
        time_zone: Set(update.time_zone),
        ..Default::default()
    };
    user::Entity::update(active).exec(&txn).await.map_err(|e| {
        error!("profile update failed for golfer {}: {}", golfer.id, e);
        AppError::system_exception()
    })?;

    let changed = apply_visibility(&txn, golfer.id, |provider| {
        field(&form, &format!("show_{}", provider)) == "on"
    })
    .await
    .map_err(|e| {
        error!("connection visibility update failed for golfer {}: {}", golfer.id, e);
        AppError::system_exception()
    })?;
    debug!("golfer {} changed visibility of {} connections", golfer.id, changed);

    txn.commit().await.map_err(|e| {
        error!("settings commit failed for golfer {}: {}", golfer.id, e);
        AppError::fatal(e)
    })?;

    Ok(see_other(SETTINGS_PATH))
}
