use std::sync::Arc;

use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::auth::{JwtService, Role};
use crate::core::Config;
use crate::db::DbService;
use crate::db::models::{ProfileCreate, UserCreate};
use crate::db::repository::{ProfileRepository, UserRepository};

/// 服务器状态 - 持有所有服务的共享引用
///
/// ServerState 是后端的核心数据结构，使用 Arc 实现浅拷贝，
/// 每个请求克隆的成本极低。
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Config | 配置项 (不可变) |
/// | db | Surreal<Db> | 嵌入式数据库 |
/// | jwt_service | Arc<JwtService> | JWT 认证服务 |
#[derive(Clone, Debug)]
pub struct ServerState {
    /// 服务器配置
    pub config: Config,
    /// 嵌入式数据库 (SurrealDB)
    pub db: Surreal<Db>,
    /// JWT 认证服务 (Arc 共享所有权)
    pub jwt_service: Arc<JwtService>,
}

impl ServerState {
    /// 创建服务器状态 (手动构造)
    ///
    /// 通常使用 [`ServerState::initialize`] 代替；测试场景可以
    /// 注入内存数据库和固定密钥的 JWT 服务。
    pub fn new(config: Config, db: Surreal<Db>, jwt_service: Arc<JwtService>) -> Self {
        Self {
            config,
            db,
            jwt_service,
        }
    }

    /// 初始化服务器状态
    ///
    /// 按顺序初始化：
    /// 1. 工作目录结构
    /// 2. 数据库 (work_dir/database/campus.db)
    /// 3. JWT 服务
    /// 4. 初始管理员 (仅当用户表为空且配置了 ADMIN_PASSWORD)
    ///
    /// # Panics
    ///
    /// 数据库初始化失败时 panic
    pub async fn initialize(config: &Config) -> Self {
        let db_dir = config.database_dir();
        std::fs::create_dir_all(&db_dir).expect("Failed to create database directory");

        let db_path = db_dir.join("campus.db");
        let db_service = DbService::new(&db_path.to_string_lossy())
            .await
            .expect("Failed to initialize database");

        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));

        let state = Self::new(config.clone(), db_service.db, jwt_service);
        state.seed_super_admin().await;
        state
    }

    /// 获取数据库实例
    pub fn get_db(&self) -> Surreal<Db> {
        self.db.clone()
    }

    /// 获取 JWT 服务
    pub fn get_jwt_service(&self) -> Arc<JwtService> {
        self.jwt_service.clone()
    }

    /// 创建初始超级管理员
    ///
    /// 仅当用户表为空且 ADMIN_PASSWORD 已设置时执行；
    /// 否则记录日志后跳过。
    async fn seed_super_admin(&self) {
        let users = UserRepository::new(self.db.clone());

        match users.count().await {
            Ok(0) => {}
            Ok(_) => return,
            Err(e) => {
                tracing::error!(error = %e, "Failed to check user table, skipping admin seed");
                return;
            }
        }

        let Some(password) = self.config.admin_password.clone() else {
            tracing::warn!(
                "User table is empty and ADMIN_PASSWORD is not set; no initial admin created"
            );
            return;
        };

        let email = self.config.admin_email.clone();
        let created = users
            .create(UserCreate {
                email: email.clone(),
                password,
            })
            .await;

        let user = match created {
            Ok(u) => u,
            Err(e) => {
                tracing::error!(error = %e, "Failed to create initial admin user");
                return;
            }
        };

        let user_id = user.id.clone().expect("created user always has an id");
        let profiles = ProfileRepository::new(self.db.clone());
        if let Err(e) = profiles
            .create(ProfileCreate {
                user: user_id,
                name: "Administrator".to_string(),
                role: Role::SuperAdmin,
                department: None,
            })
            .await
        {
            tracing::error!(error = %e, "Failed to create initial admin profile");
            return;
        }

        tracing::info!(email = %email, "Initial super_admin account created");
    }
}
