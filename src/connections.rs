use sea_orm::{
    sea_query::Expr, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder,
};

use crate::entity::connection;

/// A golfer's linked accounts, ordered by provider.
pub async fn get_connections<C: ConnectionTrait>(
    db: &C,
    user_id: i32,
    only_public: bool,
) -> Result<Vec<connection::Model>, DbErr> {
    let mut query = connection::Entity::find().filter(connection::Column::UserId.eq(user_id));
    if only_public {
        query = query.filter(connection::Column::Public.eq(true));
    }
    query
        .order_by_asc(connection::Column::Connection)
        .all(db)
        .await
}

pub async fn set_public<C: ConnectionTrait>(
    db: &C,
    user_id: i32,
    provider: &str,
    public: bool,
) -> Result<(), DbErr> {
    connection::Entity::update_many()
        .col_expr(connection::Column::Public, Expr::value(public))
        .filter(connection::Column::Connection.eq(provider))
        .filter(connection::Column::UserId.eq(user_id))
        .exec(db)
        .await?;
    Ok(())
}

/// Brings each of a golfer's connections in line with `wanted`, writing only
/// the rows whose visibility changes. Returns how many rows were written.
pub async fn apply_visibility<C, F>(db: &C, user_id: i32, wanted: F) -> Result<usize, DbErr>
where
    C: ConnectionTrait,
    F: Fn(&str) -> bool,
{
    let mut changed = 0;
    for c in get_connections(db, user_id, false).await? {
        let public = wanted(&c.connection);
        if public != c.public {
            set_public(db, user_id, &c.connection, public).await?;
            changed += 1;
        }
    }
    Ok(changed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{insert_connection, insert_golfer, memory_db};

    #[actix_web::test]
    async fn only_public_filters_private_links() {
        let db = memory_db().await;
        let ada = insert_golfer(&db, "ada").await;
        let bob = insert_golfer(&db, "bob").await;
        insert_connection(&db, ada.id, "github", true).await;
        insert_connection(&db, ada.id, "discord", false).await;
        insert_connection(&db, bob.id, "gitlab", true).await;

        let all = get_connections(&db, ada.id, false).await.unwrap();
        let names: Vec<&str> = all.iter().map(|c| c.connection.as_str()).collect();
        assert_eq!(names, vec!["discord", "github"]);

        let public = get_connections(&db, ada.id, true).await.unwrap();
        assert_eq!(public.len(), 1);
        assert_eq!(public[0].connection, "github");
    }

    #[actix_web::test]
    async fn set_public_touches_one_row() {
        let db = memory_db().await;
        let ada = insert_golfer(&db, "ada").await;
        let bob = insert_golfer(&db, "bob").await;
        insert_connection(&db, ada.id, "github", false).await;
        insert_connection(&db, bob.id, "github", false).await;

        set_public(&db, ada.id, "github", true).await.unwrap();

        assert!(get_connections(&db, ada.id, false).await.unwrap()[0].public);
        assert!(!get_connections(&db, bob.id, false).await.unwrap()[0].public);
    }

    #[actix_web::test]
    async fn apply_visibility_writes_only_changed_rows() {
        let db = memory_db().await;
        let ada = insert_golfer(&db, "ada").await;
        let bob = insert_golfer(&db, "bob").await;
        insert_connection(&db, ada.id, "github", true).await;
        insert_connection(&db, ada.id, "discord", false).await;
        insert_connection(&db, ada.id, "gitlab", false).await;
        insert_connection(&db, bob.id, "discord", false).await;

        let wanted = |provider: &str| provider == "discord";

        // github goes private, discord goes public, gitlab stays private.
        assert_eq!(apply_visibility(&db, ada.id, wanted).await.unwrap(), 2);
        assert_eq!(apply_visibility(&db, ada.id, wanted).await.unwrap(), 0);

        let public = get_connections(&db, ada.id, true).await.unwrap();
        assert_eq!(public.len(), 1);
        assert_eq!(public[0].connection, "discord");
        assert!(!get_connections(&db, bob.id, false).await.unwrap()[0].public);
    }
}
