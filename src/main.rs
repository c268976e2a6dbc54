//! Storyline - 故事章节与发布状态服务
//!
//! - Domain: story/, chapter/ (Bounded Contexts)
//! - Application: commands, queries, ports
//! - Infrastructure: http, memory, persistence, events

use std::sync::Arc;

use storyline::application::StoryRepositoryPort;
use storyline::config::{load_config, print_config, AppConfig, DatabaseBackend};
use storyline::infrastructure::events::EventPublisher;
use storyline::infrastructure::http::{AppState, HttpServer, ServerConfig};
use storyline::infrastructure::memory::{InMemoryStoryLocks, InMemoryStoryRepository};
use storyline::infrastructure::persistence::sqlite::{
    create_pool, run_migrations, DatabaseConfig, SqliteStoryRepository,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 加载配置（优先级：环境变量 > 配置文件 > 默认值）
    let config = load_config().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    init_tracing(&config);

    tracing::info!("Storyline - 故事章节与发布状态服务");
    print_config(&config);

    let story_repo = build_story_repository(&config).await?;
    let story_locks = Arc::new(InMemoryStoryLocks::new());
    let event_publisher = Arc::new(EventPublisher::new());

    let server_config = ServerConfig::new(&config.server.host, config.server.port);
    let state = AppState::new(story_repo, story_locks, event_publisher);
    let server = HttpServer::new(server_config, state);

    // 启动服务器（带优雅关闭）
    server
        .run_with_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for ctrl-c");
            }
            tracing::info!("Received shutdown signal");
        })
        .await?;

    tracing::info!("Server shutdown complete");

    Ok(())
}

/// 初始化日志（`RUST_LOG` 优先于 `log.level`）
fn init_tracing(config: &AppConfig) {
    let log_filter = format!(
        "{},storyline={},tower_http=debug",
        config.log.level, config.log.level
    );
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_filter));

    if config.log.json {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

/// 按配置选择仓储后端
async fn build_story_repository(
    config: &AppConfig,
) -> anyhow::Result<Arc<dyn StoryRepositoryPort>> {
    match config.database.backend {
        DatabaseBackend::Memory => {
            tracing::warn!("Using in-memory story repository, data is lost on restart");
            Ok(Arc::new(InMemoryStoryRepository::new()))
        }
        DatabaseBackend::Sqlite => {
            // 确保数据目录存在
            if let Some(parent) = std::path::Path::new(&config.database.path).parent() {
                tokio::fs::create_dir_all(parent).await?;
            }

            let db_config = DatabaseConfig {
                database_url: config.database.database_url(),
                max_connections: config.database.max_connections,
            };
            let pool = create_pool(&db_config).await?;
            run_migrations(&pool).await?;

            Ok(Arc::new(SqliteStoryRepository::new(pool)))
        }
    }
}
