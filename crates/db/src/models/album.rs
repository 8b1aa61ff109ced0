use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    entities::{album, photo},
    models::ids,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Album {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub description: String,
    pub is_public: bool,
    pub share_token: Option<String>,
    pub photo_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct CreateAlbum {
    pub title: String,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateAlbum {
    pub title: Option<String>,
    pub description: Option<String>,
}

impl Album {
    async fn from_model<C: ConnectionTrait>(db: &C, model: album::Model) -> Result<Self, DbErr> {
        let user_uuid = ids::user_uuid_by_id(db, model.user_id)
            .await?
            .ok_or(DbErr::RecordNotFound("User not found".to_string()))?;

        Ok(Self {
            id: model.uuid,
            user_id: user_uuid,
            title: model.title,
            description: model.description,
            is_public: model.is_public,
            share_token: model.share_token,
            photo_count: model.photo_count,
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        })
    }

    pub async fn create<C: ConnectionTrait>(
        db: &C,
        data: &CreateAlbum,
        user_id: Uuid,
    ) -> Result<Self, DbErr> {
        let user_row_id = ids::user_id_by_uuid(db, user_id)
            .await?
            .ok_or(DbErr::RecordNotFound("User not found".to_string()))?;

        let now = Utc::now();
        let active = album::ActiveModel {
            uuid: Set(Uuid::new_v4()),
            user_id: Set(user_row_id),
            title: Set(data.title.clone()),
            description: Set(data.description.clone().unwrap_or_default()),
            is_public: Set(false),
            share_token: Set(None),
            photo_count: Set(0),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
            ..Default::default()
        };
        let model = active.insert(db).await?;
        Self::from_model(db, model).await
    }

    pub async fn find_by_id<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<Option<Self>, DbErr> {
        let record = album::Entity::find()
            .filter(album::Column::Uuid.eq(id))
            .one(db)
            .await?;
        match record {
            Some(model) => Ok(Some(Self::from_model(db, model).await?)),
            None => Ok(None),
        }
    }

    /// Lookup scoped to an owner; other users' albums come back as absent.
    pub async fn find_by_id_for_user<C: ConnectionTrait>(
        db: &C,
        id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Self>, DbErr> {
        let user_row_id = match ids::user_id_by_uuid(db, user_id).await? {
            Some(id) => id,
            None => return Ok(None),
        };

        let record = album::Entity::find()
            .filter(album::Column::Uuid.eq(id))
            .filter(album::Column::UserId.eq(user_row_id))
            .one(db)
            .await?;
        match record {
            Some(model) => Ok(Some(Self::from_model(db, model).await?)),
            None => Ok(None),
        }
    }

    pub async fn find_all_for_user<C: ConnectionTrait>(
        db: &C,
        user_id: Uuid,
    ) -> Result<Vec<Self>, DbErr> {
        let user_row_id = match ids::user_id_by_uuid(db, user_id).await? {
            Some(id) => id,
            None => return Ok(Vec::new()),
        };

        let models = album::Entity::find()
            .filter(album::Column::UserId.eq(user_row_id))
            .order_by_desc(album::Column::UpdatedAt)
            .all(db)
            .await?;

        let mut albums = Vec::with_capacity(models.len());
        for model in models {
            albums.push(Self::from_model(db, model).await?);
        }
        Ok(albums)
    }

    pub async fn find_by_share_token<C: ConnectionTrait>(
        db: &C,
        token: &str,
    ) -> Result<Option<Self>, DbErr> {
        let record = album::Entity::find()
            .filter(album::Column::ShareToken.eq(token))
            .filter(album::Column::IsPublic.eq(true))
            .one(db)
            .await?;
        match record {
            Some(model) => Ok(Some(Self::from_model(db, model).await?)),
            None => Ok(None),
        }
    }

    pub async fn update<C: ConnectionTrait>(
        db: &C,
        id: Uuid,
        user_id: Uuid,
        data: &UpdateAlbum,
    ) -> Result<Self, DbErr> {
        let model = Self::owned_model(db, id, user_id).await?;

        let mut active: album::ActiveModel = model.into();
        if let Some(title) = &data.title {
            active.title = Set(title.clone());
        }
        if let Some(description) = &data.description {
            active.description = Set(description.clone());
        }
        active.updated_at = Set(Utc::now().into());

        let model = active.update(db).await?;
        Self::from_model(db, model).await
    }

    pub async fn delete<C: ConnectionTrait>(
        db: &C,
        id: Uuid,
        user_id: Uuid,
    ) -> Result<u64, DbErr> {
        let user_row_id = match ids::user_id_by_uuid(db, user_id).await? {
            Some(id) => id,
            None => return Ok(0),
        };

        let result = album::Entity::delete_many()
            .filter(album::Column::Uuid.eq(id))
            .filter(album::Column::UserId.eq(user_row_id))
            .exec(db)
            .await?;
        Ok(result.rows_affected)
    }

    pub async fn set_share_token<C: ConnectionTrait>(
        db: &C,
        id: Uuid,
        user_id: Uuid,
        token: &str,
    ) -> Result<Self, DbErr> {
        let model = Self::owned_model(db, id, user_id).await?;

        let mut active: album::ActiveModel = model.into();
        active.share_token = Set(Some(token.to_string()));
        active.is_public = Set(true);
        active.updated_at = Set(Utc::now().into());

        let model = active.update(db).await?;
        Self::from_model(db, model).await
    }

    pub async fn clear_share_token<C: ConnectionTrait>(
        db: &C,
        id: Uuid,
        user_id: Uuid,
    ) -> Result<Self, DbErr> {
        let model = Self::owned_model(db, id, user_id).await?;

        let mut active: album::ActiveModel = model.into();
        active.share_token = Set(None);
        active.is_public = Set(false);
        active.updated_at = Set(Utc::now().into());

        let model = active.update(db).await?;
        Self::from_model(db, model).await
    }

    /// Recompute the denormalized photo count from the photos table and
    /// persist it. Idempotent; concurrent calls converge on the true count
    /// because the value is recomputed rather than incremented.
    pub async fn recount_photos<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<i64, DbErr> {
        let album_row_id = ids::album_id_by_uuid(db, id)
            .await?
            .ok_or(DbErr::RecordNotFound("Album not found".to_string()))?;

        let count = photo::Entity::find()
            .filter(photo::Column::AlbumId.eq(album_row_id))
            .count(db)
            .await? as i64;

        let model = album::Entity::find_by_id(album_row_id)
            .one(db)
            .await?
            .ok_or(DbErr::RecordNotFound("Album not found".to_string()))?;

        let mut active: album::ActiveModel = model.into();
        active.photo_count = Set(count);
        active.updated_at = Set(Utc::now().into());
        active.update(db).await?;

        Ok(count)
    }

    async fn owned_model<C: ConnectionTrait>(
        db: &C,
        id: Uuid,
        user_id: Uuid,
    ) -> Result<album::Model, DbErr> {
        let user_row_id = ids::user_id_by_uuid(db, user_id)
            .await?
            .ok_or(DbErr::RecordNotFound("User not found".to_string()))?;

        album::Entity::find()
            .filter(album::Column::Uuid.eq(id))
            .filter(album::Column::UserId.eq(user_row_id))
            .one(db)
            .await?
            .ok_or(DbErr::RecordNotFound("Album not found".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use sea_orm::Database;
    use sea_orm_migration::MigratorTrait;

    use super::*;
    use crate::models::{
        photo::{CreatePhoto, Photo},
        user::{CreateUser, User},
    };

    async fn setup_db() -> sea_orm::DatabaseConnection {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        db_migration::Migrator::up(&db, None).await.unwrap();
        db
    }

    async fn setup_user<C: ConnectionTrait>(db: &C, email: &str) -> User {
        User::create(
            db,
            &CreateUser {
                name: "Ana".to_string(),
                email: email.to_string(),
                password_hash: "hash".to_string(),
            },
        )
        .await
        .unwrap()
    }

    fn sample_photo(album_id: Uuid, title: &str) -> CreatePhoto {
        CreatePhoto {
            album_id,
            title: title.to_string(),
            description: String::new(),
            acquisition_date: Utc::now(),
            size_bytes: 1024,
            dominant_color: "#000000".to_string(),
            file_name: format!("{title}.jpg"),
            file_path: format!("/tmp/{title}.jpg"),
            file_url: format!("/uploads/{title}.jpg"),
            mime_type: "image/jpeg".to_string(),
            width: None,
            height: None,
        }
    }

    #[tokio::test]
    async fn new_album_starts_empty() {
        let db = setup_db().await;
        let user = setup_user(&db, "ana@example.com").await;

        let album = Album::create(
            &db,
            &CreateAlbum {
                title: "Trips".to_string(),
                description: None,
            },
            user.id,
        )
        .await
        .unwrap();

        assert_eq!(album.photo_count, 0);
        assert!(!album.is_public);
        assert!(album.share_token.is_none());
        assert_eq!(album.user_id, user.id);
    }

    #[tokio::test]
    async fn recount_tracks_creations_and_deletions() {
        let db = setup_db().await;
        let user = setup_user(&db, "ana@example.com").await;
        let album = Album::create(
            &db,
            &CreateAlbum {
                title: "Trips".to_string(),
                description: None,
            },
            user.id,
        )
        .await
        .unwrap();

        let mut photos = Vec::new();
        for n in 0..3 {
            let photo = Photo::create(&db, &sample_photo(album.id, &format!("p{n}")), user.id)
                .await
                .unwrap();
            photos.push(photo);
        }
        assert_eq!(Album::recount_photos(&db, album.id).await.unwrap(), 3);

        Photo::delete(&db, photos[0].id, user.id).await.unwrap();
        assert_eq!(Album::recount_photos(&db, album.id).await.unwrap(), 2);

        // Idempotent: repeating the recount does not drift.
        assert_eq!(Album::recount_photos(&db, album.id).await.unwrap(), 2);
        let reloaded = Album::find_by_id(&db, album.id).await.unwrap().unwrap();
        assert_eq!(reloaded.photo_count, 2);
    }

    #[tokio::test]
    async fn find_all_orders_by_most_recently_updated() {
        let db = setup_db().await;
        let user = setup_user(&db, "ana@example.com").await;

        let first = Album::create(
            &db,
            &CreateAlbum {
                title: "First".to_string(),
                description: None,
            },
            user.id,
        )
        .await
        .unwrap();
        let second = Album::create(
            &db,
            &CreateAlbum {
                title: "Second".to_string(),
                description: None,
            },
            user.id,
        )
        .await
        .unwrap();

        Album::update(
            &db,
            first.id,
            user.id,
            &UpdateAlbum {
                title: Some("First renamed".to_string()),
                description: None,
            },
        )
        .await
        .unwrap();

        let albums = Album::find_all_for_user(&db, user.id).await.unwrap();
        let titles: Vec<_> = albums.iter().map(|a| a.title.as_str()).collect();
        assert_eq!(titles, vec!["First renamed", "Second"]);
        assert_eq!(albums[1].id, second.id);
    }

    #[tokio::test]
    async fn ownership_scopes_lookups_and_deletes() {
        let db = setup_db().await;
        let owner = setup_user(&db, "ana@example.com").await;
        let other = setup_user(&db, "bob@example.com").await;

        let album = Album::create(
            &db,
            &CreateAlbum {
                title: "Private".to_string(),
                description: None,
            },
            owner.id,
        )
        .await
        .unwrap();

        assert!(Album::find_by_id_for_user(&db, album.id, other.id)
            .await
            .unwrap()
            .is_none());
        assert_eq!(Album::delete(&db, album.id, other.id).await.unwrap(), 0);
        assert_eq!(Album::delete(&db, album.id, owner.id).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn share_token_controls_public_lookup() {
        let db = setup_db().await;
        let user = setup_user(&db, "ana@example.com").await;
        let album = Album::create(
            &db,
            &CreateAlbum {
                title: "Shared".to_string(),
                description: None,
            },
            user.id,
        )
        .await
        .unwrap();

        let shared = Album::set_share_token(&db, album.id, user.id, "tok123")
            .await
            .unwrap();
        assert!(shared.is_public);
        assert_eq!(shared.share_token.as_deref(), Some("tok123"));

        let found = Album::find_by_share_token(&db, "tok123")
            .await
            .unwrap()
            .expect("public album by token");
        assert_eq!(found.id, album.id);

        let cleared = Album::clear_share_token(&db, album.id, user.id)
            .await
            .unwrap();
        assert!(!cleared.is_public);
        assert!(cleared.share_token.is_none());
        assert!(Album::find_by_share_token(&db, "tok123")
            .await
            .unwrap()
            .is_none());
    }
}
