use jsonwebtoken::{encode, EncodingKey, Header};
use sea_orm::{ActiveModelTrait, ConnectOptions, Database, DatabaseConnection, Set};
use std::collections::HashMap;

use crate::config::AppConfig;
use crate::db::init_schema;
use crate::entity::{connection, user};

pub async fn memory_db() -> DatabaseConnection {
    let mut opt = ConnectOptions::new("sqlite::memory:".to_string());
    opt.max_connections(1).min_connections(1).sqlx_logging(false);
    let db = Database::connect(opt).await.expect("connect sqlite memory db");
    init_schema(&db).await;
    db
}

pub fn test_config() -> AppConfig {
    let mut oauth_client_ids = HashMap::new();
    oauth_client_ids.insert("github".to_string(), "gh-client".to_string());
    AppConfig {
        server_port: 0,
        sqlite_path: ":memory:".to_string(),
        database_url: Some("sqlite::memory:".to_string()),
        jwt_secret: "test-secret".to_string(),
        token_header: "token".to_string(),
        session_cookie: "__Host-session".to_string(),
        reaper_interval_secs: 0,
        oauth_redirect_base: "https://golf.test".to_string(),
        oauth_client_ids,
    }
}

pub fn token_for(config: &AppConfig, user_id: i32) -> String {
    encode(
        &Header::default(),
        &serde_json::json!({ "loginId": user_id }),
        &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
    )
    .expect("encode token")
}

pub async fn insert_golfer(db: &DatabaseConnection, login: &str) -> user::Model {
    user::ActiveModel {
        login: Set(login.to_string()),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("insert golfer")
}

pub async fn insert_connection(
    db: &DatabaseConnection,
    user_id: i32,
    provider: &str,
    public: bool,
) -> connection::Model {
    connection::ActiveModel {
        connection: Set(provider.to_string()),
        user_id: Set(user_id),
        id: Set(format!("{}-{}", provider, user_id)),
        username: Set(format!("user{}", user_id)),
        public: Set(public),
    }
    .insert(db)
    .await
    .expect("insert connection")
}

pub async fn reload(db: &DatabaseConnection, id: i32) -> user::Model {
    use sea_orm::EntityTrait;

    user::Entity::find_by_id(id)
        .one(db)
        .await
        .expect("load golfer")
        .expect("golfer exists")
}
