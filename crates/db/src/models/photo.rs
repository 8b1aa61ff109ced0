use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{entities::photo, models::ids};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Photo {
    pub id: Uuid,
    pub album_id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub description: String,
    pub acquisition_date: DateTime<Utc>,
    pub size_bytes: i64,
    pub dominant_color: String,
    pub file_name: String,
    pub file_path: String,
    pub file_url: String,
    pub mime_type: String,
    pub width: Option<i32>,
    pub height: Option<i32>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CreatePhoto {
    pub album_id: Uuid,
    pub title: String,
    pub description: String,
    pub acquisition_date: DateTime<Utc>,
    pub size_bytes: i64,
    pub dominant_color: String,
    pub file_name: String,
    pub file_path: String,
    pub file_url: String,
    pub mime_type: String,
    pub width: Option<i32>,
    pub height: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct UpdatePhoto {
    pub title: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PhotoSortKey {
    Title,
    Size,
    #[default]
    AcquisitionDate,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl Photo {
    async fn from_model<C: ConnectionTrait>(db: &C, model: photo::Model) -> Result<Self, DbErr> {
        let album_uuid = ids::album_uuid_by_id(db, model.album_id)
            .await?
            .ok_or(DbErr::RecordNotFound("Album not found".to_string()))?;
        let user_uuid = ids::user_uuid_by_id(db, model.user_id)
            .await?
            .ok_or(DbErr::RecordNotFound("User not found".to_string()))?;

        Ok(Self {
            id: model.uuid,
            album_id: album_uuid,
            user_id: user_uuid,
            title: model.title,
            description: model.description,
            acquisition_date: model.acquisition_date.into(),
            size_bytes: model.size_bytes,
            dominant_color: model.dominant_color,
            file_name: model.file_name,
            file_path: model.file_path,
            file_url: model.file_url,
            mime_type: model.mime_type,
            width: model.width,
            height: model.height,
            created_at: model.created_at.into(),
        })
    }

    pub async fn create<C: ConnectionTrait>(
        db: &C,
        data: &CreatePhoto,
        user_id: Uuid,
    ) -> Result<Self, DbErr> {
        let album_row_id = ids::album_id_by_uuid(db, data.album_id)
            .await?
            .ok_or(DbErr::RecordNotFound("Album not found".to_string()))?;
        let user_row_id = ids::user_id_by_uuid(db, user_id)
            .await?
            .ok_or(DbErr::RecordNotFound("User not found".to_string()))?;

        let active = photo::ActiveModel {
            uuid: Set(Uuid::new_v4()),
            album_id: Set(album_row_id),
            user_id: Set(user_row_id),
            title: Set(data.title.clone()),
            description: Set(data.description.clone()),
            acquisition_date: Set(data.acquisition_date.into()),
            size_bytes: Set(data.size_bytes),
            dominant_color: Set(data.dominant_color.clone()),
            file_name: Set(data.file_name.clone()),
            file_path: Set(data.file_path.clone()),
            file_url: Set(data.file_url.clone()),
            mime_type: Set(data.mime_type.clone()),
            width: Set(data.width),
            height: Set(data.height),
            created_at: Set(Utc::now().into()),
            ..Default::default()
        };
        let model = active.insert(db).await?;
        Self::from_model(db, model).await
    }

    pub async fn find_by_id_for_user<C: ConnectionTrait>(
        db: &C,
        id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Self>, DbErr> {
        let user_row_id = match ids::user_id_by_uuid(db, user_id).await? {
            Some(id) => id,
            None => return Ok(None),
        };

        let record = photo::Entity::find()
            .filter(photo::Column::Uuid.eq(id))
            .filter(photo::Column::UserId.eq(user_row_id))
            .one(db)
            .await?;
        match record {
            Some(model) => Ok(Some(Self::from_model(db, model).await?)),
            None => Ok(None),
        }
    }

    pub async fn find_by_album<C: ConnectionTrait>(
        db: &C,
        album_id: Uuid,
        sort: PhotoSortKey,
        order: SortOrder,
    ) -> Result<Vec<Self>, DbErr> {
        let album_row_id = match ids::album_id_by_uuid(db, album_id).await? {
            Some(id) => id,
            None => return Ok(Vec::new()),
        };

        let column = match sort {
            PhotoSortKey::Title => photo::Column::Title,
            PhotoSortKey::Size => photo::Column::SizeBytes,
            PhotoSortKey::AcquisitionDate => photo::Column::AcquisitionDate,
        };
        let query = photo::Entity::find().filter(photo::Column::AlbumId.eq(album_row_id));
        let query = match order {
            SortOrder::Asc => query.order_by_asc(column),
            SortOrder::Desc => query.order_by_desc(column),
        };

        let models = query.all(db).await?;
        let mut photos = Vec::with_capacity(models.len());
        for model in models {
            photos.push(Self::from_model(db, model).await?);
        }
        Ok(photos)
    }

    pub async fn update<C: ConnectionTrait>(
        db: &C,
        id: Uuid,
        user_id: Uuid,
        data: &UpdatePhoto,
    ) -> Result<Self, DbErr> {
        let user_row_id = ids::user_id_by_uuid(db, user_id)
            .await?
            .ok_or(DbErr::RecordNotFound("User not found".to_string()))?;

        let model = photo::Entity::find()
            .filter(photo::Column::Uuid.eq(id))
            .filter(photo::Column::UserId.eq(user_row_id))
            .one(db)
            .await?
            .ok_or(DbErr::RecordNotFound("Photo not found".to_string()))?;

        let mut active: photo::ActiveModel = model.into();
        if let Some(title) = &data.title {
            active.title = Set(title.clone());
        }
        if let Some(description) = &data.description {
            active.description = Set(description.clone());
        }

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

        let result = photo::Entity::delete_many()
            .filter(photo::Column::Uuid.eq(id))
            .filter(photo::Column::UserId.eq(user_row_id))
            .exec(db)
            .await?;
        Ok(result.rows_affected)
    }

    /// Every stored file path, for the orphaned-upload sweep.
    pub async fn all_file_paths<C: ConnectionTrait>(db: &C) -> Result<Vec<String>, DbErr> {
        photo::Entity::find()
            .select_only()
            .column(photo::Column::FilePath)
            .into_tuple()
            .all(db)
            .await
    }
}
