use std::sync::Arc;

use anyhow::Context;

use crate::api::{self, Endpoint};
use crate::auth::{AccountService, PasswordHasher, TokenService};
use crate::core::Config;
use crate::db::{SqliteStore, Store, schema};
use crate::leave::EmployeeLocks;
use crate::router::Router;

/// 服务器状态 - 持有所有服务的单例引用
///
/// 使用 Arc 实现浅拷贝，每个请求克隆一份。
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Config | 配置项 (不可变) |
/// | store | Arc<dyn Store> | 存储协作者 |
/// | tokens | Arc<TokenService> | 令牌服务，密钥启动时加载一次 |
/// | accounts | AccountService | 登录与账户 |
/// | locks | Arc<EmployeeLocks> | 同员工请假串行化 |
/// | router | Arc<Router<Endpoint>> | 路由表 |
#[derive(Clone)]
pub struct ServerState {
    /// 服务器配置
    pub config: Config,
    pub store: Arc<dyn Store>,
    pub tokens: Arc<TokenService>,
    pub accounts: AccountService,
    pub locks: Arc<EmployeeLocks>,
    pub router: Arc<Router<Endpoint>>,
}

impl std::fmt::Debug for ServerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerState")
            .field("config", &self.config)
            .field("routes", &self.router.routes().len())
            .finish_non_exhaustive()
    }
}

impl ServerState {
    /// 创建服务器状态 (手动构造)
    ///
    /// 通常使用 [`ServerState::initialize`] 代替；测试可传入内存数据库
    pub fn new(config: Config, store: Arc<dyn Store>, tokens: Arc<TokenService>) -> Self {
        let accounts = AccountService::new(
            store.clone(),
            tokens.clone(),
            PasswordHasher::new(),
            config.token_validity(),
        );
        Self {
            config,
            store,
            tokens,
            accounts,
            locks: Arc::new(EmployeeLocks::new()),
            router: Arc::new(api::routes()),
        }
    }

    /// 初始化服务器状态
    ///
    /// 1. 创建数据目录
    /// 2. 打开 SQLite 并建表
    /// 3. 加载 (或生成) 令牌密钥
    /// 4. 确保内置管理员存在
    pub async fn initialize(config: &Config) -> anyhow::Result<Self> {
        std::fs::create_dir_all(config.data_dir())
            .with_context(|| format!("Failed to create data dir {}", config.data_dir().display()))?;

        let db_path = config.database_path();
        let store = SqliteStore::open(&db_path.to_string_lossy())
            .await
            .context("Failed to open database")?;

        Self::with_store(config, Arc::new(store)).await
    }

    /// 使用给定存储完成初始化 (建表、密钥、管理员)
    pub async fn with_store(config: &Config, store: Arc<dyn Store>) -> anyhow::Result<Self> {
        schema::initialize(store.as_ref())
            .await
            .context("Failed to initialize schema")?;

        let tokens = TokenService::load(&config.secret_key_path()).context("Failed to load token secret")?;

        let state = Self::new(config.clone(), store, Arc::new(tokens));
        if state.accounts.ensure_admin().await.context("Failed to seed admin account")? {
            tracing::info!("Admin account seeded");
        }
        Ok(state)
    }

    /// 存储协作者
    pub fn store(&self) -> &dyn Store {
        self.store.as_ref()
    }
}
