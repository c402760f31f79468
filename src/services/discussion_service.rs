use sqlx::PgPool;
use tracing::info;

use crate::config;
use crate::database::models::Discussion;
use crate::database::{discussions, projects, DatabaseManager};
use crate::pagination::{page_offset, total_pages, PageLinks, PageQuery};
use crate::services::{Page, ServiceError, ValidationError};

const TITLE_MAX: usize = 100;

pub struct DiscussionService {
    pool: PgPool,
}

impl DiscussionService {
    pub async fn new() -> Result<Self, ServiceError> {
        let pool = DatabaseManager::pool().await?;
        Ok(Self { pool })
    }

    /// One page of a project's discussions, newest first
    pub async fn list(&self, project_id: i32, query: &PageQuery) -> Result<Page<Discussion>, ServiceError> {
        projects::get_project(&self.pool, project_id).await?;

        let per_page = config::config().api.discussions_per_page;
        let total_items = discussions::count_discussions(&self.pool, project_id).await?;
        let total = total_pages(total_items.max(0) as u64, per_page)?;
        let page = query.resolve(total)?;

        let items =
            discussions::list_discussions(&self.pool, project_id, i64::from(per_page), page_offset(page, per_page))
                .await?;
        Ok(Page {
            items,
            total_items,
            pagination: PageLinks::new(page, total)?,
        })
    }

    /// Start a discussion in a project on behalf of `author_id`
    pub async fn create(
        &self,
        project_id: i32,
        author_id: i32,
        title: &str,
        content: &str,
    ) -> Result<Discussion, ServiceError> {
        let (title, content) = validate_discussion(title, content)?;
        let discussion = discussions::create_discussion(&self.pool, project_id, author_id, title, content).await?;
        info!("Created discussion {} in project {}", discussion.id, project_id);
        Ok(discussion)
    }
}

fn validate_discussion<'a>(title: &'a str, content: &'a str) -> Result<(&'a str, &'a str), ValidationError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(ValidationError::field("title", "Title is required."));
    }
    if title.chars().count() > TITLE_MAX {
        return Err(ValidationError::field(
            "title",
            format!("Title must be at most {} characters", TITLE_MAX),
        ));
    }
    let content = content.trim();
    if content.is_empty() {
        return Err(ValidationError::field("content", "Content is required."));
    }
    Ok((title, content))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_and_content_are_trimmed() {
        assert_eq!(validate_discussion("  Roadmap  ", " next steps\n").unwrap(), ("Roadmap", "next steps"));
    }

    #[test]
    fn blank_fields_are_rejected_by_name() {
        let err = validate_discussion(" ", "body").unwrap_err();
        assert!(err.field_errors.contains_key("title"));

        let err = validate_discussion("Roadmap", "\t").unwrap_err();
        assert!(err.field_errors.contains_key("content"));

        assert!(validate_discussion(&"t".repeat(100), "body").is_ok());
        assert!(validate_discussion(&"t".repeat(101), "body").is_err());
    }
}
