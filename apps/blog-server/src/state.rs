//! Application state - shared across all handlers.

use std::sync::Arc;

use quill_core::ports::{CommentRepository, Mailer, PostRepository, Renderer, TagRepository};
use quill_core::query::PostQueries;
use quill_infra::{InMemoryMailer, InMemoryStore, JsonRenderer};

#[cfg(feature = "postgres")]
use quill_infra::DatabaseConnections;
#[cfg(feature = "postgres")]
use quill_infra::database::{
    PostgresCommentRepository, PostgresPostRepository, PostgresTagRepository,
};
#[cfg(feature = "smtp")]
use quill_infra::SmtpMailer;

use crate::config::{AppConfig, SiteConfig};

/// Which content store backs the repositories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    Postgres,
    Memory,
}

impl StoreKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Postgres => "postgres",
            Self::Memory => "memory",
        }
    }
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub posts: Arc<dyn PostRepository>,
    pub comments: Arc<dyn CommentRepository>,
    pub tags: Arc<dyn TagRepository>,
    pub queries: PostQueries,
    pub mailer: Arc<dyn Mailer>,
    pub renderer: Arc<dyn Renderer>,
    pub site: SiteConfig,
    pub store: StoreKind,
    #[cfg(feature = "postgres")]
    pub db: Option<DatabaseConnections>,
}

struct Repositories {
    posts: Arc<dyn PostRepository>,
    comments: Arc<dyn CommentRepository>,
    tags: Arc<dyn TagRepository>,
}

impl Repositories {
    fn in_memory(store: &InMemoryStore) -> Self {
        Self {
            posts: Arc::new(store.posts()),
            comments: Arc::new(store.comments()),
            tags: Arc::new(store.tags()),
        }
    }

    #[cfg(feature = "postgres")]
    fn postgres(db: &DatabaseConnections) -> Self {
        Self {
            posts: Arc::new(PostgresPostRepository::new(db.main.clone())),
            comments: Arc::new(PostgresCommentRepository::new(db.main.clone())),
            tags: Arc::new(PostgresTagRepository::new(db.main.clone())),
        }
    }
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(config: &AppConfig) -> Self {
        let mailer = smtp_mailer(config).unwrap_or_else(|| {
            tracing::warn!("No SMTP relay configured. Outgoing mail is kept in memory.");
            Arc::new(InMemoryMailer::new()) as Arc<dyn Mailer>
        });

        let state = match postgres_state(config, mailer.clone()).await {
            Some(state) => state,
            None => Self::in_memory(&InMemoryStore::new(), mailer, config.site.clone()),
        };

        tracing::info!(store = state.store.as_str(), "Application state initialized");
        state
    }

    /// State backed by the in-memory store and the JSON renderer.
    pub fn in_memory(store: &InMemoryStore, mailer: Arc<dyn Mailer>, site: SiteConfig) -> Self {
        Self::assemble(Repositories::in_memory(store), mailer, site, StoreKind::Memory)
    }

    fn assemble(
        repos: Repositories,
        mailer: Arc<dyn Mailer>,
        site: SiteConfig,
        store: StoreKind,
    ) -> Self {
        Self {
            queries: PostQueries::new(repos.posts.clone(), repos.tags.clone()),
            posts: repos.posts,
            comments: repos.comments,
            tags: repos.tags,
            mailer,
            renderer: Arc::new(JsonRenderer::new()),
            site,
            store,
            #[cfg(feature = "postgres")]
            db: None,
        }
    }
}

#[cfg(feature = "postgres")]
async fn postgres_state(config: &AppConfig, mailer: Arc<dyn Mailer>) -> Option<AppState> {
    let Some(db_config) = &config.database else {
        tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
        return None;
    };

    match DatabaseConnections::init(db_config).await {
        Ok(db) => {
            let repos = Repositories::postgres(&db);
            let mut state =
                AppState::assemble(repos, mailer, config.site.clone(), StoreKind::Postgres);
            state.db = Some(db);
            Some(state)
        }
        Err(e) => {
            tracing::error!(
                "Failed to connect to database: {}. Using in-memory fallback.",
                e
            );
            None
        }
    }
}

#[cfg(not(feature = "postgres"))]
async fn postgres_state(config: &AppConfig, _mailer: Arc<dyn Mailer>) -> Option<AppState> {
    if config.database.is_some() {
        tracing::warn!("DATABASE_URL set but the postgres feature is disabled.");
    }
    None
}

#[cfg(feature = "smtp")]
fn smtp_mailer(config: &AppConfig) -> Option<Arc<dyn Mailer>> {
    let smtp = config.smtp.as_ref()?;
    match SmtpMailer::new(smtp) {
        Ok(mailer) => Some(Arc::new(mailer)),
        Err(e) => {
            tracing::error!("Failed to configure SMTP: {}", e);
            None
        }
    }
}

#[cfg(not(feature = "smtp"))]
fn smtp_mailer(config: &AppConfig) -> Option<Arc<dyn Mailer>> {
    if config.smtp.is_some() {
        tracing::warn!("SMTP_HOST set but the smtp feature is disabled.");
    }
    None
}
