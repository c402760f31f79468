#![allow(dead_code)]

use std::process::{Child, Command, Stdio};
use std::sync::OnceLock;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use reqwest::StatusCode;
use sqlx::{postgres::PgPoolOptions, PgPool};

use tracker_api::database::models::Workspace;
use tracker_api::database::{projects, workspaces};
use tracker_api::services::slugify;

/// Issues per page on the database-backed server, kept small so a few rows span pages
pub const DB_ISSUES_PER_PAGE: u32 = 2;

static SERVER: OnceLock<TestServer> = OnceLock::new();
static DB_SERVER: OnceLock<TestServer> = OnceLock::new();

pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    child: Child,
}

impl TestServer {
    fn spawn(database_url: Option<&str>) -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        let mut cmd = Command::new(env!("CARGO_BIN_EXE_tracker-api"));
        match database_url {
            Some(url) => {
                cmd.env("DATABASE_URL", url)
                    .env("DATABASE_MIGRATE", "true")
                    .env("API_ISSUES_PER_PAGE", DB_ISSUES_PER_PAGE.to_string());
            }
            // No database: every DB-backed endpoint should answer 503
            None => {
                cmd.env_remove("DATABASE_URL");
            }
        }
        cmd.env("TRACKER_API_PORT", port.to_string())
            .env("RUST_LOG", "warn")
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        let child = cmd.spawn().context("failed to spawn server binary")?;

        Ok(Self { port, base_url, child })
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline {
                break;
            }
            let url = format!("{}/health", self.base_url);
            if let Ok(resp) = client.get(&url).send().await {
                if resp.status() == StatusCode::OK || resp.status() == StatusCode::SERVICE_UNAVAILABLE {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(150)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }
}

pub async fn ensure_server() -> Result<&'static TestServer> {
    let server = SERVER.get_or_init(|| TestServer::spawn(None).expect("failed to spawn server binary"));
    server.wait_ready(Duration::from_secs(10)).await?;
    Ok(server)
}

/// Server connected to the test database, shared by every database-backed test
pub async fn ensure_database_server(database_url: &str) -> Result<&'static TestServer> {
    let server = DB_SERVER
        .get_or_init(|| TestServer::spawn(Some(database_url)).expect("failed to spawn server binary"));
    server.wait_ready(Duration::from_secs(10)).await?;
    Ok(server)
}

/// Connection string for database-backed tests: `TRACKER_TEST_DATABASE_URL`, then `DATABASE_URL`
pub fn test_database_url() -> Option<String> {
    std::env::var("TRACKER_TEST_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .ok()
        .filter(|url| !url.trim().is_empty())
}

/// Connect to the test database and apply migrations. `None` means the test should skip.
pub async fn test_pool() -> Result<Option<(PgPool, String)>> {
    let Some(url) = test_database_url() else {
        eprintln!("skipping: set TRACKER_TEST_DATABASE_URL or DATABASE_URL to run database tests");
        return Ok(None);
    };

    let pool = PgPoolOptions::new()
        .max_connections(4)
        .acquire_timeout(Duration::from_secs(10))
        .connect(&url)
        .await
        .context("failed to connect to test database")?;
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("failed to apply migrations")?;
    Ok(Some((pool, url)))
}

/// Rows created for one test. Names carry a unique suffix so tests can share a database.
pub struct Fixture {
    pub suffix: String,
    pub user_id: i32,
    pub workspace: Workspace,
    pub project_id: i32,
    pub issue_ids: Vec<i32>,
}

pub fn unique_suffix() -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();
    format!("{}-{}", std::process::id(), nanos)
}

/// A user owning a workspace with one project holding `issue_count` issues
pub async fn seed(pool: &PgPool, issue_count: usize) -> Result<Fixture> {
    let suffix = unique_suffix();
    let user_id = create_user(pool, &suffix).await?;

    let name = format!("Acme {}", suffix);
    let (workspace, _) = workspaces::create_workspace(pool, &name, &slugify(&name), user_id).await?;
    let project = projects::create_project(pool, workspace.id, "Roadmap", "ROA").await?;

    let mut issue_ids = Vec::with_capacity(issue_count);
    for n in 1..=issue_count {
        let id: i32 = sqlx::query_scalar(
            "INSERT INTO issues (title, project_id, owner_id) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(format!("Issue {}", n))
        .bind(project.id)
        .bind(user_id)
        .fetch_one(pool)
        .await?;
        issue_ids.push(id);
    }

    Ok(Fixture {
        suffix,
        user_id,
        workspace,
        project_id: project.id,
        issue_ids,
    })
}

pub async fn create_user(pool: &PgPool, suffix: &str) -> Result<i32> {
    let id = sqlx::query_scalar("INSERT INTO users (name, email) VALUES ($1, $2) RETURNING id")
        .bind(format!("Tester {}", suffix))
        .bind(format!("tester-{}@example.com", suffix))
        .fetch_one(pool)
        .await?;
    Ok(id)
}

/// Id of a seeded catalog label
pub async fn label_id(pool: &PgPool, name: &str) -> Result<i32> {
    sqlx::query_scalar("SELECT id FROM labels WHERE name = $1")
        .bind(name)
        .fetch_optional(pool)
        .await?
        .with_context(|| format!("seeded label '{}' missing", name))
}

/// An id no row in `table` uses
pub async fn unused_id(pool: &PgPool, table: &str) -> Result<i32> {
    let max: Option<i32> = sqlx::query_scalar(&format!("SELECT MAX(id) FROM {}", table))
        .fetch_one(pool)
        .await?;
    Ok(max.unwrap_or(0) + 1000)
}

/// Run the `tracker` CLI with an isolated config directory
pub fn tracker_cli(args: &[&str], config_dir: &std::path::Path) -> Result<std::process::Output> {
    Command::new(env!("CARGO_BIN_EXE_tracker"))
        .args(args)
        .env("TRACKER_CLI_CONFIG_DIR", config_dir)
        .env_remove("TRACKER_SERVER_URL")
        .env("RUST_LOG", "off")
        .output()
        .context("failed to run tracker CLI")
}

pub fn temp_config_dir(name: &str) -> std::path::PathBuf {
    let dir = std::env::temp_dir().join(format!("tracker-it-{}-{}", name, std::process::id()));
    std::fs::create_dir_all(&dir).expect("create temp config dir");
    dir
}
