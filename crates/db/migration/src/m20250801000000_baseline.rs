use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::DatabaseBackend;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create().if_not_exists()
                    .table(Users::Table)
                    .col(pk_id_col(manager, Users::Id))
                    .col(uuid_col(Users::Uuid))
                    .col(ColumnDef::new(Users::Name).string().not_null())
                    .col(ColumnDef::new(Users::Email).string().not_null())
                    .col(ColumnDef::new(Users::PasswordHash).string().not_null())
                    .col(timestamp_col(Users::CreatedAt))
                    .col(timestamp_col(Users::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create().if_not_exists()
                    .name("idx_users_uuid")
                    .table(Users::Table)
                    .col(Users::Uuid)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create().if_not_exists()
                    .name("idx_users_email")
                    .table(Users::Table)
                    .col(Users::Email)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create().if_not_exists()
                    .table(Albums::Table)
                    .col(pk_id_col(manager, Albums::Id))
                    .col(uuid_col(Albums::Uuid))
                    .col(fk_id_col(manager, Albums::UserId))
                    .col(ColumnDef::new(Albums::Title).string().not_null())
                    .col(
                        ColumnDef::new(Albums::Description)
                            .text()
                            .not_null()
                            .default(Expr::val("")),
                    )
                    .col(
                        ColumnDef::new(Albums::IsPublic)
                            .boolean()
                            .not_null()
                            .default(Expr::val(false)),
                    )
                    .col(ColumnDef::new(Albums::ShareToken).string())
                    .col(
                        ColumnDef::new(Albums::PhotoCount)
                            .big_integer()
                            .not_null()
                            .default(Expr::val(0)),
                    )
                    .col(timestamp_col(Albums::CreatedAt))
                    .col(timestamp_col(Albums::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_albums_user_id")
                            .from(Albums::Table, Albums::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create().if_not_exists()
                    .name("idx_albums_uuid")
                    .table(Albums::Table)
                    .col(Albums::Uuid)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create().if_not_exists()
                    .name("idx_albums_user_id")
                    .table(Albums::Table)
                    .col(Albums::UserId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create().if_not_exists()
                    .name("idx_albums_share_token")
                    .table(Albums::Table)
                    .col(Albums::ShareToken)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create().if_not_exists()
                    .table(Photos::Table)
                    .col(pk_id_col(manager, Photos::Id))
                    .col(uuid_col(Photos::Uuid))
                    .col(fk_id_col(manager, Photos::AlbumId))
                    .col(fk_id_col(manager, Photos::UserId))
                    .col(ColumnDef::new(Photos::Title).string().not_null())
                    .col(
                        ColumnDef::new(Photos::Description)
                            .text()
                            .not_null()
                            .default(Expr::val("")),
                    )
                    .col(
                        ColumnDef::new(Photos::AcquisitionDate)
                            .timestamp()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Photos::SizeBytes).big_integer().not_null())
                    .col(
                        ColumnDef::new(Photos::DominantColor)
                            .string_len(7)
                            .not_null()
                            .default(Expr::val("#000000")),
                    )
                    .col(ColumnDef::new(Photos::FileName).string().not_null())
                    .col(ColumnDef::new(Photos::FilePath).string().not_null())
                    .col(ColumnDef::new(Photos::FileUrl).string().not_null())
                    .col(ColumnDef::new(Photos::MimeType).string().not_null())
                    .col(ColumnDef::new(Photos::Width).integer())
                    .col(ColumnDef::new(Photos::Height).integer())
                    .col(timestamp_col(Photos::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_photos_album_id")
                            .from(Photos::Table, Photos::AlbumId)
                            .to(Albums::Table, Albums::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_photos_user_id")
                            .from(Photos::Table, Photos::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create().if_not_exists()
                    .name("idx_photos_uuid")
                    .table(Photos::Table)
                    .col(Photos::Uuid)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create().if_not_exists()
                    .name("idx_photos_album_id")
                    .table(Photos::Table)
                    .col(Photos::AlbumId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create().if_not_exists()
                    .name("idx_photos_user_id")
                    .table(Photos::Table)
                    .col(Photos::UserId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create().if_not_exists()
                    .name("idx_photos_acquisition_date")
                    .table(Photos::Table)
                    .col(Photos::AcquisitionDate)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Photos::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Albums::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        Ok(())
    }
}

fn pk_id_col<T: Iden>(manager: &SchemaManager, col: T) -> ColumnDef {
    let mut col = ColumnDef::new(col);
    match manager.get_database_backend() {
        DatabaseBackend::Sqlite => {
            col.integer();
        }
        _ => {
            col.big_integer();
        }
    }
    col.not_null().auto_increment().primary_key().to_owned()
}

fn fk_id_col<T: Iden>(manager: &SchemaManager, col: T) -> ColumnDef {
    let mut col = ColumnDef::new(col);
    match manager.get_database_backend() {
        DatabaseBackend::Sqlite => {
            col.integer();
        }
        _ => {
            col.big_integer();
        }
    }
    col.not_null().to_owned()
}

fn uuid_col<T: Iden>(col: T) -> ColumnDef {
    ColumnDef::new(col).uuid().not_null().to_owned()
}

fn timestamp_col<T: Iden>(col: T) -> ColumnDef {
    ColumnDef::new(col)
        .timestamp()
        .not_null()
        .default(Expr::current_timestamp())
        .to_owned()
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
    Uuid,
    Name,
    Email,
    PasswordHash,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Albums {
    Table,
    Id,
    Uuid,
    UserId,
    Title,
    Description,
    IsPublic,
    ShareToken,
    PhotoCount,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Photos {
    Table,
    Id,
    Uuid,
    AlbumId,
    UserId,
    Title,
    Description,
    AcquisitionDate,
    SizeBytes,
    DominantColor,
    FileName,
    FilePath,
    FileUrl,
    MimeType,
    Width,
    Height,
    CreatedAt,
}
