use actix_web::{dev::Payload, web, FromRequest, HttpRequest};
use futures_util::future::LocalBoxFuture;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use log::error;
use sea_orm::{DatabaseConnection, EntityTrait};

use crate::config::AppConfig;
use crate::entity::user;
use crate::error::AppError;
use crate::golfer::Golfer;

impl FromRequest for Golfer {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let db = match req.app_data::<web::Data<DatabaseConnection>>() {
            Some(db) => db.clone(),
            None => {
                return Box::pin(async { Err(AppError::system_exception().into()) });
            }
        };
        let config = match req.app_data::<web::Data<AppConfig>>() {
            Some(cfg) => cfg.clone(),
            None => {
                return Box::pin(async { Err(AppError::system_exception().into()) });
            }
        };
        let token = extract_token(req, &config);

        Box::pin(async move {
            let token = token.ok_or_else(AppError::forbidden)?;
            let golfer = authenticate_token(&db, &config, &token).await?;
            Ok(golfer)
        })
    }
}

/// Header first, then the session cookie.
fn extract_token(req: &HttpRequest, config: &AppConfig) -> Option<String> {
    let header = config.token_header.as_str();
    req.headers()
        .get(header)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .or_else(|| {
            req.cookie(&config.session_cookie)
                .map(|c| c.value().trim().to_string())
                .filter(|v| !v.is_empty())
        })
}

async fn authenticate_token(
    db: &DatabaseConnection,
    config: &AppConfig,
    token: &str,
) -> Result<Golfer, AppError> {
    let claims = decode_jwt(config, token)?;
    let user_id = extract_user_id(&claims).ok_or_else(AppError::forbidden)?;
    let user = user::Entity::find_by_id(user_id)
        .one(db)
        .await
        .map_err(|e| {
            error!("golfer lookup failed: {}", e);
            AppError::system_exception()
        })?
        .ok_or_else(AppError::forbidden)?;

    Ok(Golfer::from_model(user))
}

fn decode_jwt(config: &AppConfig, token: &str) -> Result<serde_json::Value, AppError> {
    let key = DecodingKey::from_secret(config.jwt_secret.as_bytes());
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = false;
    validation.required_spec_claims.clear();
    decode::<serde_json::Value>(token, &key, &validation)
        .map(|data| data.claims)
        .map_err(|_| AppError::forbidden())
}

fn extract_user_id(claims: &serde_json::Value) -> Option<i32> {
    for key in ["loginId", "sub"] {
        if let Some(value) = claims.get(key) {
            if let Some(id) = value.as_i64() {
                return i32::try_from(id).ok();
            }
            if let Some(s) = value.as_str() {
                if let Ok(id) = s.parse::<i32>() {
                    return Some(id);
                }
            }
        }
    }
    None
}
