mod common;

use anyhow::Result;

use tracker_api::database::{discussions, issues, labels, workspaces, DatabaseError, PgLabelStore};
use tracker_api::labels::{Label, LabelAssignmentSync, LabelChange, Resolution, StoreError};
use tracker_api::services::slugify;
use tracker_api::types::WorkspaceRole;

fn ids(labels: &[Label]) -> Vec<i32> {
    labels.iter().map(|l| l.id).collect()
}

#[tokio::test]
async fn labels_by_ids_keeps_requested_order() -> Result<()> {
    let Some((pool, _)) = common::test_pool().await? else {
        return Ok(());
    };
    let bug = common::label_id(&pool, "Bug").await?;
    let feature = common::label_id(&pool, "Feature").await?;
    let missing = common::unused_id(&pool, "labels").await?;

    let found = labels::labels_by_ids(&pool, &[feature, bug]).await?;
    assert_eq!(ids(&found), vec![feature, bug]);
    assert_eq!(found[1].name, "Bug");

    let err = labels::labels_by_ids(&pool, &[bug, missing]).await.unwrap_err();
    match err {
        DatabaseError::NotFound(what) => assert_eq!(what, format!("label {}", missing)),
        other => panic!("expected NotFound, got {:?}", other),
    }

    assert!(labels::labels_by_ids(&pool, &[]).await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn attaching_twice_and_detaching_missing_are_no_ops() -> Result<()> {
    let Some((pool, _)) = common::test_pool().await? else {
        return Ok(());
    };
    let fixture = common::seed(&pool, 1).await?;
    let issue = fixture.issue_ids[0];
    let bug = common::label_id(&pool, "Bug").await?;
    let docs = common::label_id(&pool, "Documentation").await?;

    labels::add_issue_label(&pool, issue, bug).await?;
    labels::add_issue_label(&pool, issue, bug).await?;
    assert_eq!(ids(&labels::labels_for_issue(&pool, issue).await?), vec![bug]);

    labels::remove_issue_label(&pool, issue, docs).await?;
    labels::remove_issue_label(&pool, issue, bug).await?;
    assert!(labels::labels_for_issue(&pool, issue).await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn attaching_unknown_label_is_not_found() -> Result<()> {
    let Some((pool, _)) = common::test_pool().await? else {
        return Ok(());
    };
    let fixture = common::seed(&pool, 1).await?;
    let missing = common::unused_id(&pool, "labels").await?;

    let err = labels::add_issue_label(&pool, fixture.issue_ids[0], missing).await.unwrap_err();
    assert!(matches!(err, DatabaseError::NotFound(_)), "{:?}", err);
    Ok(())
}

#[tokio::test]
async fn workspace_creation_enrols_owner_as_admin() -> Result<()> {
    let Some((pool, _)) = common::test_pool().await? else {
        return Ok(());
    };
    let suffix = common::unique_suffix();
    let owner = common::create_user(&pool, &suffix).await?;
    let name = format!("Globex {}", suffix);
    let url = slugify(&name);

    let (workspace, member) = workspaces::create_workspace(&pool, &name, &url, owner).await?;
    assert_eq!(workspace.url, url);
    assert_eq!(workspace.owner_id, owner);
    assert_eq!(member.workspace_id, workspace.id);
    assert_eq!(member.user_id, owner);
    assert_eq!(member.role, WorkspaceRole::Admin);

    let last: Option<String> = sqlx::query_scalar("SELECT last_workspace_url FROM users WHERE id = $1")
        .bind(owner)
        .fetch_one(&pool)
        .await?;
    assert_eq!(last.as_deref(), Some(url.as_str()));

    let found = workspaces::find_by_url(&pool, &url).await?;
    assert_eq!(found.map(|w| w.id), Some(workspace.id));
    Ok(())
}

#[tokio::test]
async fn workspace_creation_rolls_back_on_failure() -> Result<()> {
    let Some((pool, _)) = common::test_pool().await? else {
        return Ok(());
    };
    let fixture = common::seed(&pool, 0).await?;
    let missing_user = common::unused_id(&pool, "users").await?;

    let url = slugify(&format!("Initech {}", fixture.suffix));
    let err = workspaces::create_workspace(&pool, "Initech", &url, missing_user).await.unwrap_err();
    assert!(matches!(err, DatabaseError::NotFound(_)), "{:?}", err);
    assert!(workspaces::find_by_url(&pool, &url).await?.is_none());

    // Same url as the fixture's workspace, owned by someone else
    let other = common::create_user(&pool, &format!("{}-b", fixture.suffix)).await?;
    let err = workspaces::create_workspace(&pool, "Again", &fixture.workspace.url, other)
        .await
        .unwrap_err();
    assert!(matches!(err, DatabaseError::Conflict(_)), "{:?}", err);

    let memberships: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM workspace_members WHERE user_id = $1")
        .bind(other)
        .fetch_one(&pool)
        .await?;
    assert_eq!(memberships, 0);
    Ok(())
}

#[tokio::test]
async fn sync_over_postgres_writes_the_difference() -> Result<()> {
    let Some((pool, _)) = common::test_pool().await? else {
        return Ok(());
    };
    let fixture = common::seed(&pool, 1).await?;
    let issue = fixture.issue_ids[0];
    let catalog = labels::list_labels(&pool).await?;
    let pick = |name: &str| catalog.iter().find(|l| l.name == name).cloned();
    let (Some(bug), Some(feature), Some(docs)) = (pick("Bug"), pick("Feature"), pick("Documentation")) else {
        anyhow::bail!("seeded labels missing");
    };

    labels::add_issue_label(&pool, issue, bug.id).await?;
    let current = labels::labels_for_issue(&pool, issue).await?;
    let sync = LabelAssignmentSync::new(issue, current, PgLabelStore::new(pool.clone()));

    let outcome = sync.on_change(vec![feature.clone(), docs.clone()]).await;
    assert_eq!(outcome.resolution, Resolution::Synced);
    assert_eq!(
        outcome.applied,
        vec![LabelChange::Add(feature.id), LabelChange::Add(docs.id), LabelChange::Remove(bug.id)]
    );

    let mut stored = ids(&labels::labels_for_issue(&pool, issue).await?);
    stored.sort_unstable();
    let mut expected = vec![feature.id, docs.id];
    expected.sort_unstable();
    assert_eq!(stored, expected);
    Ok(())
}

#[tokio::test]
async fn sync_over_postgres_undoes_only_the_rejected_add() -> Result<()> {
    let Some((pool, _)) = common::test_pool().await? else {
        return Ok(());
    };
    let fixture = common::seed(&pool, 1).await?;
    let issue = fixture.issue_ids[0];
    let bug = labels::labels_by_ids(&pool, &[common::label_id(&pool, "Bug").await?]).await?;
    let feature = labels::labels_by_ids(&pool, &[common::label_id(&pool, "Feature").await?]).await?;
    let ghost = Label::new(common::unused_id(&pool, "labels").await?, "Ghost", "gray");

    labels::add_issue_label(&pool, issue, bug[0].id).await?;
    let sync = LabelAssignmentSync::new(issue, bug.clone(), PgLabelStore::new(pool.clone()));

    let outcome = sync.on_change(vec![feature[0].clone(), ghost.clone()]).await;
    assert_eq!(outcome.resolution, Resolution::Reverted);
    assert_eq!(outcome.failures.len(), 1);
    assert_eq!(outcome.failures[0].change, LabelChange::Add(ghost.id));
    assert!(matches!(outcome.failures[0].error, StoreError::NotFound(_)));

    // Local selection matches what the store holds
    assert_eq!(ids(&sync.selected()), vec![feature[0].id]);
    assert_eq!(ids(&labels::labels_for_issue(&pool, issue).await?), vec![feature[0].id]);
    Ok(())
}

#[tokio::test]
async fn issue_counts_and_pages_follow_id_order() -> Result<()> {
    let Some((pool, _)) = common::test_pool().await? else {
        return Ok(());
    };
    let fixture = common::seed(&pool, 3).await?;

    assert_eq!(issues::count_issues(&pool, fixture.project_id).await?, 3);
    let second_page = issues::list_issues(&pool, fixture.project_id, 2, 2).await?;
    assert_eq!(second_page.len(), 1);
    assert_eq!(second_page[0].id, fixture.issue_ids[2]);
    Ok(())
}

#[tokio::test]
async fn discussions_land_in_the_project_workspace() -> Result<()> {
    let Some((pool, _)) = common::test_pool().await? else {
        return Ok(());
    };
    let fixture = common::seed(&pool, 0).await?;

    let first = discussions::create_discussion(&pool, fixture.project_id, fixture.user_id, "First", "a").await?;
    let second = discussions::create_discussion(&pool, fixture.project_id, fixture.user_id, "Second", "b").await?;
    assert_eq!(first.workspace_id, fixture.workspace.id);
    assert!(!second.is_resolved);

    let listed = discussions::list_discussions(&pool, fixture.project_id, 10, 0).await?;
    assert_eq!(listed.iter().map(|d| d.id).collect::<Vec<_>>(), vec![second.id, first.id]);
    assert_eq!(discussions::count_discussions(&pool, fixture.project_id).await?, 2);

    let missing_user = common::unused_id(&pool, "users").await?;
    let err = discussions::create_discussion(&pool, fixture.project_id, missing_user, "Orphan", "c")
        .await
        .unwrap_err();
    assert!(matches!(err, DatabaseError::NotFound(_)), "{:?}", err);

    let missing_project = common::unused_id(&pool, "projects").await?;
    let err = discussions::create_discussion(&pool, missing_project, fixture.user_id, "Lost", "d")
        .await
        .unwrap_err();
    assert!(matches!(err, DatabaseError::NotFound(_)), "{:?}", err);
    Ok(())
}
