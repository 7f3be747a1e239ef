use attendance_server::{Server, ServerState, print_banner, setup_environment};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. 设置环境 (dotenv, 日志) 并加载配置
    let config = setup_environment()?;

    // 打印横幅
    print_banner();

    tracing::info!("Attendance server starting...");

    // 2. 初始化服务器状态 (数据库、密钥、管理员)
    let state = match ServerState::initialize(&config).await {
        Ok(state) => state,
        Err(e) => {
            tracing::error!("Startup failed: {:#}", e);
            return Err(e);
        }
    };

    // 3. 启动 HTTP 服务器
    let server = Server::with_state(config, state);

    if let Err(e) = server.run().await {
        tracing::error!("Server error: {:#}", e);
        return Err(e);
    }

    Ok(())
}
