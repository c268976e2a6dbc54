//! SQLite Story Repository
//!
//! 故事与章节同库存储；章节变更与故事状态变更在同一事务内提交

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use super::DbPool;
use crate::application::ports::{ChapterChange, RepositoryError, StoryRepositoryPort};
use crate::domain::chapter::{Chapter, ChapterId, ChapterKind, Visibility};
use crate::domain::story::{Story, StoryId, StoryStatus, StoryTitle};

/// SQLite Story Repository
pub struct SqliteStoryRepository {
    pool: DbPool,
}

impl SqliteStoryRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// 唯一索引冲突映射为 Duplicate，其余为 DatabaseError
fn map_db_error(e: sqlx::Error) -> RepositoryError {
    match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            RepositoryError::Duplicate(db.message().to_string())
        }
        _ => RepositoryError::DatabaseError(e.to_string()),
    }
}

fn parse_uuid(raw: &str) -> Result<Uuid, RepositoryError> {
    Uuid::parse_str(raw).map_err(|e| RepositoryError::SerializationError(e.to_string()))
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, RepositoryError> {
    Ok(DateTime::parse_from_rfc3339(raw)
        .map_err(|e| RepositoryError::SerializationError(e.to_string()))?
        .with_timezone(&Utc))
}

#[derive(FromRow)]
struct StoryRow {
    id: String,
    title: String,
    status: String,
    created_at: String,
    updated_at: String,
}

impl TryFrom<StoryRow> for Story {
    type Error = RepositoryError;

    fn try_from(row: StoryRow) -> Result<Self, Self::Error> {
        let status = StoryStatus::from_str(&row.status).ok_or_else(|| {
            RepositoryError::SerializationError(format!("unknown story status: {}", row.status))
        })?;
        let title = StoryTitle::new(row.title)
            .map_err(|e| RepositoryError::SerializationError(e.to_string()))?;

        Ok(Story::restore(
            StoryId::from_uuid(parse_uuid(&row.id)?),
            title,
            status,
            parse_timestamp(&row.created_at)?,
            parse_timestamp(&row.updated_at)?,
        ))
    }
}

#[derive(FromRow)]
struct ChapterRow {
    id: String,
    story_id: String,
    title: Option<String>,
    kind: String,
    number: Option<i64>,
    visibility: String,
    created_at: String,
    updated_at: String,
}

impl TryFrom<ChapterRow> for Chapter {
    type Error = RepositoryError;

    fn try_from(row: ChapterRow) -> Result<Self, Self::Error> {
        let kind = ChapterKind::from_parts(&row.kind, row.number)
            .map_err(|e| RepositoryError::SerializationError(e.to_string()))?;
        let visibility = Visibility::from_str(&row.visibility).ok_or_else(|| {
            RepositoryError::SerializationError(format!("unknown visibility: {}", row.visibility))
        })?;

        Ok(Chapter::restore(
            ChapterId::from_uuid(parse_uuid(&row.id)?),
            StoryId::from_uuid(parse_uuid(&row.story_id)?),
            row.title,
            kind,
            visibility,
            parse_timestamp(&row.created_at)?,
            parse_timestamp(&row.updated_at)?,
        ))
    }
}

const STORY_COLUMNS: &str = "id, title, status, created_at, updated_at";
const CHAPTER_COLUMNS: &str =
    "id, story_id, title, kind, number, visibility, created_at, updated_at";

#[async_trait]
impl StoryRepositoryPort for SqliteStoryRepository {
    async fn save_story(&self, story: &Story) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO stories (id, title, status, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                title = excluded.title,
                status = excluded.status,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(story.id().to_string())
        .bind(story.title().as_str())
        .bind(story.status().as_str())
        .bind(story.created_at().to_rfc3339())
        .bind(story.updated_at().to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    async fn find_story(&self, id: StoryId) -> Result<Option<Story>, RepositoryError> {
        let row: Option<StoryRow> =
            sqlx::query_as(&format!("SELECT {} FROM stories WHERE id = ?", STORY_COLUMNS))
                .bind(id.to_string())
                .fetch_optional(&self.pool)
                .await
                .map_err(map_db_error)?;

        row.map(Story::try_from).transpose()
    }

    async fn find_all_stories(&self) -> Result<Vec<Story>, RepositoryError> {
        let rows: Vec<StoryRow> = sqlx::query_as(&format!(
            "SELECT {} FROM stories ORDER BY created_at DESC",
            STORY_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        rows.into_iter().map(Story::try_from).collect()
    }

    async fn delete_story(&self, id: StoryId) -> Result<(), RepositoryError> {
        // 使用事务确保原子性
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        sqlx::query("DELETE FROM chapters WHERE story_id = ?")
            .bind(id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?;

        let deleted = sqlx::query("DELETE FROM stories WHERE id = ?")
            .bind(id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?;

        if deleted.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!("story {}", id)));
        }

        tx.commit().await.map_err(map_db_error)?;
        Ok(())
    }

    async fn find_chapter(&self, id: ChapterId) -> Result<Option<Chapter>, RepositoryError> {
        let row: Option<ChapterRow> =
            sqlx::query_as(&format!("SELECT {} FROM chapters WHERE id = ?", CHAPTER_COLUMNS))
                .bind(id.to_string())
                .fetch_optional(&self.pool)
                .await
                .map_err(map_db_error)?;

        row.map(Chapter::try_from).transpose()
    }

    async fn find_chapters_by_story(
        &self,
        story_id: StoryId,
    ) -> Result<Vec<Chapter>, RepositoryError> {
        let rows: Vec<ChapterRow> = sqlx::query_as(&format!(
            "SELECT {} FROM chapters WHERE story_id = ?",
            CHAPTER_COLUMNS
        ))
        .bind(story_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        rows.into_iter().map(Chapter::try_from).collect()
    }

    async fn commit_chapter_change(
        &self,
        change: &ChapterChange,
        story: Option<&Story>,
    ) -> Result<(), RepositoryError> {
        // 提前返回时 tx 被丢弃，自动回滚
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        match change {
            ChapterChange::Upsert(chapter) => {
                sqlx::query(
                    r#"
                    INSERT INTO chapters (id, story_id, title, kind, number, visibility, created_at, updated_at)
                    VALUES (?, ?, ?, ?, ?, ?, ?, ?)
                    ON CONFLICT(id) DO UPDATE SET
                        title = excluded.title,
                        kind = excluded.kind,
                        number = excluded.number,
                        visibility = excluded.visibility,
                        updated_at = excluded.updated_at
                    "#,
                )
                .bind(chapter.id().to_string())
                .bind(chapter.story_id().to_string())
                .bind(chapter.title())
                .bind(chapter.kind().slot().as_str())
                .bind(chapter.kind().number().map(|n| i64::from(n.get())))
                .bind(chapter.visibility().as_str())
                .bind(chapter.created_at().to_rfc3339())
                .bind(chapter.updated_at().to_rfc3339())
                .execute(&mut *tx)
                .await
                .map_err(map_db_error)?;
            }
            ChapterChange::Delete(id) => {
                let deleted = sqlx::query("DELETE FROM chapters WHERE id = ?")
                    .bind(id.to_string())
                    .execute(&mut *tx)
                    .await
                    .map_err(map_db_error)?;

                if deleted.rows_affected() == 0 {
                    return Err(RepositoryError::NotFound(format!("chapter {}", id)));
                }
            }
        }

        if let Some(story) = story {
            let updated = sqlx::query("UPDATE stories SET status = ?, updated_at = ? WHERE id = ?")
                .bind(story.status().as_str())
                .bind(story.updated_at().to_rfc3339())
                .bind(story.id().to_string())
                .execute(&mut *tx)
                .await
                .map_err(map_db_error)?;

            if updated.rows_affected() == 0 {
                return Err(RepositoryError::NotFound(format!("story {}", story.id())));
            }
        }

        tx.commit().await.map_err(map_db_error)?;

        tracing::debug!(
            change = change.as_str(),
            story_written = story.is_some(),
            "Chapter change committed"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::chapter::ChapterNumber;
    use crate::infrastructure::persistence::sqlite::{create_pool, run_migrations, DatabaseConfig};

    async fn repo() -> SqliteStoryRepository {
        let pool = create_pool(&DatabaseConfig::in_memory()).await.unwrap();
        run_migrations(&pool).await.unwrap();
        SqliteStoryRepository::new(pool)
    }

    async fn seeded_story(repo: &SqliteStoryRepository) -> Story {
        let story = Story::new(StoryTitle::new("灯塔守望者").unwrap());
        repo.save_story(&story).await.unwrap();
        story
    }

    fn numbered(story: &Story, n: i64, visibility: Visibility) -> Chapter {
        Chapter::new(
            *story.id(),
            ChapterKind::Numbered(ChapterNumber::new(n).unwrap()),
            visibility,
            Some(format!("第{}章", n)),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_story_roundtrip() {
        let repo = repo().await;
        let story = seeded_story(&repo).await;

        let found = repo.find_story(*story.id()).await.unwrap().unwrap();
        assert_eq!(found.id(), story.id());
        assert_eq!(found.title().as_str(), "灯塔守望者");
        assert_eq!(found.status(), StoryStatus::Draft);

        assert!(repo.find_story(StoryId::new()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_chapter_upsert_and_read_back() {
        let repo = repo().await;
        let story = seeded_story(&repo).await;

        let prologue =
            Chapter::new(*story.id(), ChapterKind::Prologue, Visibility::Hidden, None).unwrap();
        let mut first = numbered(&story, 1, Visibility::Hidden);
        for chapter in [&prologue, &first] {
            repo.commit_chapter_change(&ChapterChange::Upsert(chapter.clone()), None)
                .await
                .unwrap();
        }

        first.revise(ChapterKind::Numbered(ChapterNumber::new(3).unwrap()), Visibility::Published);
        repo.commit_chapter_change(&ChapterChange::Upsert(first.clone()), None)
            .await
            .unwrap();

        let found = repo.find_chapter(*first.id()).await.unwrap().unwrap();
        assert_eq!(found.kind(), first.kind());
        assert_eq!(found.visibility(), Visibility::Published);
        assert_eq!(found.title(), Some("第1章"));

        let loaded = repo.find_chapter(*prologue.id()).await.unwrap().unwrap();
        assert_eq!(loaded.kind(), &ChapterKind::Prologue);
        assert_eq!(loaded.title(), None);

        let all = repo.find_chapters_by_story(*story.id()).await.unwrap();
        assert_eq!(all.len(), 2);
    }

    #[tokio::test]
    async fn test_duplicate_slot_rejected_by_index() {
        let repo = repo().await;
        let story = seeded_story(&repo).await;

        repo.commit_chapter_change(
            &ChapterChange::Upsert(numbered(&story, 2, Visibility::Hidden)),
            None,
        )
        .await
        .unwrap();

        let result = repo
            .commit_chapter_change(
                &ChapterChange::Upsert(numbered(&story, 2, Visibility::Hidden)),
                None,
            )
            .await;
        assert!(matches!(result, Err(RepositoryError::Duplicate(_))));

        let epilogue = || {
            Chapter::new(*story.id(), ChapterKind::Epilogue, Visibility::Hidden, None).unwrap()
        };
        repo.commit_chapter_change(&ChapterChange::Upsert(epilogue()), None)
            .await
            .unwrap();
        let result = repo
            .commit_chapter_change(&ChapterChange::Upsert(epilogue()), None)
            .await;
        assert!(matches!(result, Err(RepositoryError::Duplicate(_))));
    }

    #[tokio::test]
    async fn test_commit_writes_story_status_with_chapter() {
        let repo = repo().await;
        let mut story = seeded_story(&repo).await;
        story.publish();
        repo.save_story(&story).await.unwrap();

        let chapter = numbered(&story, 1, Visibility::Published);
        repo.commit_chapter_change(&ChapterChange::Upsert(chapter.clone()), None)
            .await
            .unwrap();

        let mut drafted = story.clone();
        let event = crate::domain::story::ChapterEvent::deleted(*story.id());
        let outcome = drafted.apply_chapter_event(&event, 1, 0);
        assert!(outcome.auto_drafted);

        repo.commit_chapter_change(&ChapterChange::Delete(*chapter.id()), Some(&drafted))
            .await
            .unwrap();

        let found = repo.find_story(*story.id()).await.unwrap().unwrap();
        assert_eq!(found.status(), StoryStatus::Draft);
        assert!(repo.find_chapter(*chapter.id()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_failed_commit_rolls_back_chapter_write() {
        let repo = repo().await;
        let story = seeded_story(&repo).await;
        let chapter = numbered(&story, 1, Visibility::Published);

        // 故事不存在，状态写入失败，章节写入随之回滚
        let ghost = Story::new(StoryTitle::new("不存在").unwrap());
        let result = repo
            .commit_chapter_change(&ChapterChange::Upsert(chapter.clone()), Some(&ghost))
            .await;

        assert!(matches!(result, Err(RepositoryError::NotFound(_))));
        assert!(repo.find_chapter(*chapter.id()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_missing_chapter_is_not_found() {
        let repo = repo().await;
        let result = repo
            .commit_chapter_change(&ChapterChange::Delete(ChapterId::new()), None)
            .await;
        assert!(matches!(result, Err(RepositoryError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_story_cascades() {
        let repo = repo().await;
        let story = seeded_story(&repo).await;
        let chapter = numbered(&story, 1, Visibility::Hidden);
        repo.commit_chapter_change(&ChapterChange::Upsert(chapter.clone()), None)
            .await
            .unwrap();

        repo.delete_story(*story.id()).await.unwrap();

        assert!(repo.find_story(*story.id()).await.unwrap().is_none());
        assert!(repo.find_chapter(*chapter.id()).await.unwrap().is_none());
        assert!(matches!(
            repo.delete_story(*story.id()).await,
            Err(RepositoryError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_find_all_stories_newest_first() {
        let repo = repo().await;
        let older = seeded_story(&repo).await;
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        let newer = seeded_story(&repo).await;

        let all = repo.find_all_stories().await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].id(), newer.id());
        assert_eq!(all[1].id(), older.id());
    }
}
