use serde::Serialize;
use sqlx::PgPool;

use crate::config;
use crate::database::models::{Issue, IssueSummary, Label};
use crate::database::{issues, labels, projects, DatabaseManager};
use crate::pagination::{page_offset, total_pages, PageLinks, PageQuery};
use crate::services::{slugify, Page, ServiceError};
use crate::types::Status;

/// An issue with its labels and the path it should be linked under
#[derive(Debug, Clone, Serialize)]
pub struct IssueDetail {
    #[serde(flatten)]
    pub issue: Issue,
    pub labels: Vec<Label>,
    pub slug: String,
    /// `/{workspace}/issue/{project}-{issue}/{slug}`
    pub canonical_path: String,
}

pub struct IssueService {
    pool: PgPool,
}

impl IssueService {
    pub async fn new() -> Result<Self, ServiceError> {
        let pool = DatabaseManager::pool().await?;
        Ok(Self { pool })
    }

    pub async fn detail(&self, issue_id: i32) -> Result<IssueDetail, ServiceError> {
        let issue = issues::get_issue(&self.pool, issue_id).await?;
        let labels = labels::labels_for_issue(&self.pool, issue_id).await?;
        let workspace_url = projects::workspace_url(&self.pool, issue.project_id).await?;

        let slug = slugify(&issue.title);
        let canonical_path = canonical_path(&workspace_url, issue.project_id, issue.id, &slug);
        Ok(IssueDetail {
            issue,
            labels,
            slug,
            canonical_path,
        })
    }

    pub async fn set_status(&self, issue_id: i32, status: Status) -> Result<Issue, ServiceError> {
        Ok(issues::update_status(&self.pool, issue_id, status).await?)
    }

    /// One page of a project's issues, ordered by id
    pub async fn list(&self, project_id: i32, query: &PageQuery) -> Result<Page<IssueSummary>, ServiceError> {
        projects::get_project(&self.pool, project_id).await?;

        let per_page = config::config().api.issues_per_page;
        let total_items = issues::count_issues(&self.pool, project_id).await?;
        let total = total_pages(total_items.max(0) as u64, per_page)?;
        let page = query.resolve(total)?;

        let items = issues::list_issues(&self.pool, project_id, i64::from(per_page), page_offset(page, per_page)).await?;
        Ok(Page {
            items,
            total_items,
            pagination: PageLinks::new(page, total)?,
        })
    }
}

pub fn canonical_path(workspace_url: &str, project_id: i32, issue_id: i32, slug: &str) -> String {
    format!("/{}/issue/{}-{}/{}", workspace_url, project_id, issue_id, slug)
}
