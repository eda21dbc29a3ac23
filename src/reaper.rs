//! Removes accounts whose scheduled deletion time has passed.

use std::time::Duration;

use chrono::{DateTime, Utc};
use log::{error, info};
use sea_orm::{
    sea_query::Expr, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    TransactionTrait,
};

use crate::entity::{connection, user};

pub fn start(db: DatabaseConnection, interval_secs: u64) {
    if interval_secs == 0 {
        info!("account reaper disabled");
        return;
    }

    actix_rt::spawn(async move {
        let mut ticker = actix_rt::time::interval(Duration::from_secs(interval_secs));
        loop {
            ticker.tick().await;
            match reap(&db, Utc::now()).await {
                Ok(0) => {}
                Ok(n) => info!("reaped {} golfers", n),
                Err(e) => error!("reaper failed: {}", e),
            }
        }
    });
}

/// Deletes every golfer with `delete_at <= now`, with their connections.
/// Referrals pointing at them are cleared. Returns the number of golfers removed.
pub async fn reap(db: &DatabaseConnection, now: DateTime<Utc>) -> Result<u64, DbErr> {
    let txn = db.begin().await?;

    let doomed: Vec<i32> = user::Entity::find()
        .filter(user::Column::DeleteAt.lte(now))
        .all(&txn)
        .await?
        .into_iter()
        .map(|u| u.id)
        .collect();
    if doomed.is_empty() {
        return Ok(0);
    }

    connection::Entity::delete_many()
        .filter(connection::Column::UserId.is_in(doomed.clone()))
        .exec(&txn)
        .await?;
    user::Entity::update_many()
        .col_expr(user::Column::ReferrerId, Expr::value(Option::<i32>::None))
        .filter(user::Column::ReferrerId.is_in(doomed.clone()))
        .exec(&txn)
        .await?;
    let removed = user::Entity::delete_many()
        .filter(user::Column::Id.is_in(doomed))
        .exec(&txn)
        .await?;

    txn.commit().await?;
    Ok(removed.rows_affected)
}
