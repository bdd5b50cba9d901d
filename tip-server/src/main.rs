use anyhow::Context;
use tip_server::{Config, Server, ServerState, init_logger_with_file, print_banner};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. 加载 .env (可选) 和配置
    let _ = dotenv::dotenv();
    let config = Config::from_env();

    // 2. 日志
    init_logger_with_file(Some(&config.log_level), config.log_dir.as_deref());

    print_banner();
    tracing::info!(
        environment = %config.environment,
        work_dir = %config.work_dir,
        "🦀 Tip server starting..."
    );

    // 3. 初始化服务器状态
    let state = match ServerState::initialize(&config) {
        Ok(state) => state,
        Err(e) => {
            tracing::error!(code = %e.code(), "Startup failed: {}", e);
            return Err(e).context("failed to initialize server state");
        }
    };

    // 4. 启动 HTTP 服务器
    let server = Server::with_state(config, state);
    if let Err(e) = server.run().await {
        tracing::error!(code = %e.code(), "Server error: {}", e);
        return Err(e.into());
    }

    Ok(())
}
