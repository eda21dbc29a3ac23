use std::collections::BTreeMap;

use log::{error, warn};
use sea_orm::{ConnectionTrait, EntityTrait, Set};

use crate::entity::user;
use crate::error::AppError;

/// page -> setting id -> value
pub type SettingsMap = BTreeMap<String, BTreeMap<String, String>>;

/// The signed-in user for the current request.
#[derive(Clone, Debug)]
pub struct Golfer {
    pub id: i32,
    pub login: String,
    pub user: user::Model,
    pub settings: SettingsMap,
}

impl Golfer {
    pub fn from_model(user: user::Model) -> Self {
        let settings = serde_json::from_str(&user.settings).unwrap_or_else(|e| {
            warn!("golfer {} has unreadable settings, starting fresh: {}", user.id, e);
            SettingsMap::new()
        });
        Self {
            id: user.id,
            login: user.login.clone(),
            user,
            settings,
        }
    }

    pub async fn save_settings<C: ConnectionTrait>(&self, db: &C) -> Result<(), AppError> {
        let json = serde_json::to_string(&self.settings).map_err(|_| AppError::system_exception())?;
        let active = user::ActiveModel {
            id: Set(self.id),
            settings: Set(json),
            ..Default::default()
        };
        user::Entity::update(active).exec(db).await.map_err(|e| {
            error!("save_settings failed for golfer {}: {}", self.id, e);
            AppError::system_exception()
        })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{insert_golfer, memory_db};

    #[actix_web::test]
    async fn bad_settings_json_reads_as_empty() {
        let db = memory_db().await;
        let mut model = insert_golfer(&db, "ada").await;
        model.settings = "{not json".to_string();
        assert!(Golfer::from_model(model).settings.is_empty());
    }

    #[actix_web::test]
    async fn save_settings_round_trips_through_the_row() {
        let db = memory_db().await;
        let mut golfer = Golfer::from_model(insert_golfer(&db, "ada").await);
        golfer
            .settings
            .entry("hole".to_string())
            .or_default()
            .insert("scoring".to_string(), "chars".to_string());
        golfer.save_settings(&db).await.unwrap();

        let row = user::Entity::find_by_id(golfer.id).one(&db).await.unwrap().unwrap();
        assert_eq!(row.settings, r#"{"hole":{"scoring":"chars"}}"#);
    }
}
