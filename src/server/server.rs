use crate::application_impl::*;
use crate::application_port::*;
use crate::domain_model::{Capabilities, NewUser};
use crate::domain_port::*;
use crate::infra_memory::MemoryStore;
use crate::infra_mysql::*;
use crate::logger::*;
use crate::settings::{Admin, Settings};
use sqlx::mysql::MySqlPoolOptions;
use sqlx::{MySql, Pool};
use std::sync::Arc;

pub struct Server {
    pub auth_service: Arc<dyn AuthService>,
    pub credential_hasher: Arc<dyn CredentialHasher>,
    pub user_service: Arc<dyn UserService>,
    pub post_service: Arc<dyn PostService>,
    pub comment_service: Arc<dyn CommentService>,
    pool: Option<Pool<MySql>>,
}

impl Server {
    pub async fn try_new(settings: &Settings) -> anyhow::Result<Self> {
        let credential_hasher: Arc<dyn CredentialHasher> = match settings.auth.backend.as_str() {
            "fake" => Arc::new(FakeCredentialHasher::new()),
            "real" => Arc::new(Argon2PasswordHasher),
            other => return Err(anyhow::anyhow!("Unknown auth backend: {}", other)),
        };

        let (user_repo, post_repo, comment_repo, pool) = match settings.store.backend.as_str() {
            "memory" => {
                let store = Arc::new(MemoryStore::new());
                let user_repo: Arc<dyn UserRepo> = store.clone();
                let post_repo: Arc<dyn PostRepo> = store.clone();
                let comment_repo: Arc<dyn CommentRepo> = store;
                (user_repo, post_repo, comment_repo, None)
            }
            "mysql" => {
                let dsn = settings
                    .store
                    .mysql_dsn
                    .as_deref()
                    .ok_or_else(|| anyhow::anyhow!("store.mysql_dsn is required for mysql"))?;
                let pool = MySqlPoolOptions::new()
                    .max_connections(settings.store.max_connections)
                    .connect(dsn)
                    .await?;
                let user_repo: Arc<dyn UserRepo> = Arc::new(MySqlUserRepo::new(pool.clone()));
                let post_repo: Arc<dyn PostRepo> = Arc::new(MySqlPostRepo::new(pool.clone()));
                let comment_repo: Arc<dyn CommentRepo> =
                    Arc::new(MySqlCommentRepo::new(pool.clone()));
                (user_repo, post_repo, comment_repo, Some(pool))
            }
            other => return Err(anyhow::anyhow!("Unknown store backend: {}", other)),
        };

        let auth_service: Arc<dyn AuthService> = Arc::new(RealAuthService::new(
            user_repo.clone(),
            credential_hasher.clone(),
        ));
        let user_service: Arc<dyn UserService> = Arc::new(RealUserService::new(user_repo));
        let post_service: Arc<dyn PostService> = Arc::new(RealPostService::new(post_repo.clone()));
        let comment_service: Arc<dyn CommentService> =
            Arc::new(RealCommentService::new(comment_repo, post_repo));

        let server = Self {
            auth_service,
            credential_hasher,
            user_service,
            post_service,
            comment_service,
            pool,
        };

        if let Some(admin) = &settings.admin {
            server.ensure_admin(admin).await?;
        }

        info!(
            store = %settings.store.backend,
            auth = %settings.auth.backend,
            "server started"
        );

        Ok(server)
    }

    async fn ensure_admin(&self, admin: &Admin) -> anyhow::Result<()> {
        match self.user_service.get_by_username(&admin.username).await {
            Ok(_) => return Ok(()),
            Err(ForumError::NotFound { .. }) => {}
            Err(e) => return Err(e.into()),
        }

        let password_hash = self.credential_hasher.hash_password(&admin.password).await?;
        let created = self
            .user_service
            .create(NewUser {
                username: admin.username.clone(),
                first_name: "Forum".to_string(),
                last_name: "Admin".to_string(),
                email: format!("{}@localhost", admin.username),
                password_hash,
                capabilities: Capabilities::ADMIN,
            })
            .await?;

        info!(user_id = %created.user_id, username = %created.username, "admin account created");
        Ok(())
    }

    pub async fn shutdown(&self) {
        info!("server shutting down...");

        if let Some(pool) = &self.pool {
            pool.close().await;
        }
    }
}
