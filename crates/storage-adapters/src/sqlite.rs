//! # SQLite store
//!
//! Durable implementation of `BuildRepository` using sqlx. The pool holds a
//! single connection, so every write is serialized; multi-statement updates
//! run in a transaction.

use std::collections::HashMap;
use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use domains::{
    Build, BuildId, BuildPatch, BuildRepository, BuildStatus, Comment, CommentId, DomainError,
    NewBuild, Result,
};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::{Row, Sqlite, Transaction};
use tracing::{debug, info};
use uuid::Uuid;

const BUILD_COLUMNS: &str =
    "id, name, builder_name, description, summary, image_url, tags, status, created_at, likes";

pub struct SqliteBuildRepository {
    pool: SqlitePool,
}

impl SqliteBuildRepository {
    /// Opens (creating if needed) the database and runs migrations.
    pub async fn new(database_url: &str) -> std::result::Result<Self, sqlx::Error> {
        let options = SqliteConnectOptions::from_str(database_url)?
            .foreign_keys(true)
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        sqlx::migrate!("./migrations").run(&pool).await?;
        info!(database_url, "sqlite build store ready");
        Ok(Self { pool })
    }

    async fn comments_for(&self, id: BuildId) -> Result<Vec<Comment>> {
        sqlx::query(
            "SELECT id, build_id, author, text, created_at FROM comments \
             WHERE build_id = ? ORDER BY created_at DESC, id DESC",
        )
        .bind(id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(storage_err)?
        .iter()
        .map(|row| CommentRow::from_row(row).map_err(storage_err)?.into_comment())
        .collect()
    }

    async fn build_row(&self, id: BuildId) -> Result<Option<BuildRow>> {
        let row = sqlx::query(&format!("SELECT {BUILD_COLUMNS} FROM builds WHERE id = ?"))
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(storage_err)?;
        row.as_ref().map(BuildRow::from_row).transpose().map_err(storage_err)
    }
}

/// Internal row type for mapping SQLite rows to a domain Build.
struct BuildRow {
    id: String,
    name: String,
    builder_name: String,
    description: String,
    summary: String,
    image_url: String,
    tags: String,
    status: String,
    created_at: String,
    likes: i64,
}

impl BuildRow {
    fn from_row(row: &SqliteRow) -> std::result::Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            builder_name: row.try_get("builder_name")?,
            description: row.try_get("description")?,
            summary: row.try_get("summary")?,
            image_url: row.try_get("image_url")?,
            tags: row.try_get("tags")?,
            status: row.try_get("status")?,
            created_at: row.try_get("created_at")?,
            likes: row.try_get("likes")?,
        })
    }

    fn into_build(self, comments: Vec<Comment>) -> Result<Build> {
        let id = parse_uuid(&self.id).map(BuildId)?;
        let status = BuildStatus::from_str(&self.status).map_err(DomainError::Storage)?;
        let tags: Vec<String> = serde_json::from_str(&self.tags)
            .map_err(|e| DomainError::Storage(format!("invalid tags JSON: {e}")))?;
        let likes = u64::try_from(self.likes)
            .map_err(|_| DomainError::Storage(format!("negative like count {}", self.likes)))?;

        Ok(Build {
            id,
            name: self.name,
            builder_name: self.builder_name,
            description: self.description,
            summary: self.summary,
            image_url: self.image_url,
            tags,
            status,
            created_at: parse_datetime(&self.created_at)?,
            likes,
            comments,
        })
    }
}

struct CommentRow {
    id: String,
    build_id: String,
    author: String,
    text: String,
    created_at: String,
}

impl CommentRow {
    fn from_row(row: &SqliteRow) -> std::result::Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            build_id: row.try_get("build_id")?,
            author: row.try_get("author")?,
            text: row.try_get("text")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn into_comment(self) -> Result<Comment> {
        Ok(Comment {
            id: parse_uuid(&self.id).map(CommentId)?,
            author: self.author,
            text: self.text,
            created_at: parse_datetime(&self.created_at)?,
        })
    }
}

fn storage_err(e: impl std::fmt::Display) -> DomainError {
    DomainError::Storage(e.to_string())
}

fn parse_uuid(s: &str) -> Result<Uuid> {
    Uuid::parse_str(s).map_err(|e| DomainError::Storage(format!("invalid id '{s}': {e}")))
}

fn parse_datetime(s: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| DomainError::Storage(format!("invalid datetime: {e}")))
}

/// Fixed-width so that text ordering matches time ordering.
fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

async fn insert_comment(
    tx: &mut Transaction<'_, Sqlite>,
    build_id: BuildId,
    comment: &Comment,
) -> Result<()> {
    sqlx::query(
        "INSERT INTO comments (id, build_id, author, text, created_at) VALUES (?, ?, ?, ?, ?)",
    )
        .bind(comment.id.to_string())
        .bind(build_id.to_string())
        .bind(&comment.author)
        .bind(&comment.text)
        .bind(format_datetime(&comment.created_at))
        .execute(&mut **tx)
        .await
        .map_err(storage_err)?;
    Ok(())
}

async fn exists(tx: &mut Transaction<'_, Sqlite>, id: BuildId) -> Result<bool> {
    let row = sqlx::query("SELECT 1 FROM builds WHERE id = ?")
        .bind(id.to_string())
        .fetch_optional(&mut **tx)
        .await
        .map_err(storage_err)?;
    Ok(row.is_some())
}

#[async_trait]
impl BuildRepository for SqliteBuildRepository {
    async fn list(&self) -> Result<Vec<Build>> {
        let rows = sqlx::query(&format!(
            "SELECT {BUILD_COLUMNS} FROM builds ORDER BY created_at DESC, id DESC"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(storage_err)?;

        let comment_rows = sqlx::query(
            "SELECT id, build_id, author, text, created_at FROM comments \
             ORDER BY created_at DESC, id DESC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(storage_err)?;

        let mut comments: HashMap<String, Vec<Comment>> = HashMap::new();
        for row in &comment_rows {
            let row = CommentRow::from_row(row).map_err(storage_err)?;
            let build_id = row.build_id.clone();
            comments.entry(build_id).or_default().push(row.into_comment()?);
        }

        rows.iter()
            .map(|row| {
                let row = BuildRow::from_row(row).map_err(storage_err)?;
                let build_comments = comments.remove(&row.id).unwrap_or_default();
                row.into_build(build_comments)
            })
            .collect()
    }

    async fn get(&self, id: BuildId) -> Result<Build> {
        let row = self.build_row(id).await?.ok_or(DomainError::NotFound(id))?;
        let comments = self.comments_for(id).await?;
        row.into_build(comments)
    }

    async fn insert_at(&self, build: NewBuild, created_at: DateTime<Utc>) -> Result<Build> {
        // Stored with microsecond precision; truncate so the returned value matches.
        let build = build.into_build(BuildId::new(), created_at.trunc_subsecs(6));
        let tags = serde_json::to_string(&build.tags).map_err(storage_err)?;

        sqlx::query(&format!(
            "INSERT INTO builds ({BUILD_COLUMNS}) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, 0)"
        ))
        .bind(build.id.to_string())
        .bind(&build.name)
        .bind(&build.builder_name)
        .bind(&build.description)
        .bind(&build.summary)
        .bind(&build.image_url)
        .bind(tags)
        .bind(build.status.as_str())
        .bind(format_datetime(&build.created_at))
        .execute(&self.pool)
        .await
        .map_err(storage_err)?;

        debug!(build_id = %build.id, "build stored in sqlite");
        Ok(build)
    }

    async fn update(&self, id: BuildId, patch: BuildPatch) -> Result<Build> {
        let mut tx = self.pool.begin().await.map_err(storage_err)?;
        if !exists(&mut tx, id).await? {
            return Err(DomainError::NotFound(id));
        }

        if let Some(status) = patch.status {
            sqlx::query("UPDATE builds SET status = ? WHERE id = ?")
                .bind(status.as_str())
                .bind(id.to_string())
                .execute(&mut *tx)
                .await
                .map_err(storage_err)?;
        }
        if let Some(likes) = patch.likes {
            let likes = i64::try_from(likes).map_err(storage_err)?;
            sqlx::query("UPDATE builds SET likes = ? WHERE id = ?")
                .bind(likes)
                .bind(id.to_string())
                .execute(&mut *tx)
                .await
                .map_err(storage_err)?;
        }
        if let Some(comments) = patch.comments {
            sqlx::query("DELETE FROM comments WHERE build_id = ?")
                .bind(id.to_string())
                .execute(&mut *tx)
                .await
                .map_err(storage_err)?;
            for comment in &comments {
                insert_comment(&mut tx, id, comment).await?;
            }
        }

        tx.commit().await.map_err(storage_err)?;
        self.get(id).await
    }

    async fn remove(&self, id: BuildId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM builds WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(storage_err)?;
        Ok(result.rows_affected() > 0)
    }

    async fn increment_likes(&self, id: BuildId) -> Result<Build> {
        let result = sqlx::query("UPDATE builds SET likes = likes + 1 WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(storage_err)?;
        if result.rows_affected() == 0 {
            return Err(DomainError::NotFound(id));
        }
        self.get(id).await
    }

    async fn prepend_comment(&self, id: BuildId, comment: Comment) -> Result<Build> {
        let mut tx = self.pool.begin().await.map_err(storage_err)?;
        if !exists(&mut tx, id).await? {
            return Err(DomainError::NotFound(id));
        }
        insert_comment(&mut tx, id, &comment).await?;
        tx.commit().await.map_err(storage_err)?;
        self.get(id).await
    }

    async fn count(&self) -> Result<usize> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM builds")
            .fetch_one(&self.pool)
            .await
            .map_err(storage_err)?;
        usize::try_from(count).map_err(storage_err)
    }
}
