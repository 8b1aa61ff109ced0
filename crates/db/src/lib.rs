use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use utils::assets::db_path;

pub mod entities;
pub mod models;

pub use sea_orm::DbErr;

pub type DbPool = DatabaseConnection;

#[derive(Clone)]
pub struct DBService {
    pub pool: DbPool,
}

impl DBService {
    /// Open (creating if missing) the sqlite database under the asset dir
    /// and bring it up to the latest migration.
    pub async fn new() -> Result<DBService, DbErr> {
        let database_url = format!("sqlite://{}?mode=rwc", db_path().to_string_lossy());
        let mut options = ConnectOptions::new(database_url);
        options.sqlx_logging(false);
        let pool = Database::connect(options).await?;
        pool.execute_unprepared("PRAGMA journal_mode = WAL").await?;
        pool.execute_unprepared("PRAGMA synchronous = NORMAL").await?;
        pool.execute_unprepared("PRAGMA busy_timeout = 30000").await?;
        db_migration::Migrator::up(&pool, None).await?;
        Ok(DBService { pool })
    }

    /// Fresh in-memory database, migrated. Used by tests and nowhere else.
    pub async fn new_in_memory() -> Result<DBService, DbErr> {
        let pool = Database::connect("sqlite::memory:").await?;
        db_migration::Migrator::up(&pool, None).await?;
        Ok(DBService { pool })
    }
}
