use chrono::{DateTime, Utc};
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use uuid::Uuid;

use devlink_storage::{
    CreateSessionParams, CreateUserParams, ProfileUpdate, ProjectId, Session, SessionId, Store,
    StoreError, TaskId, User, UserId,
};

static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// `~/.devlink/store.db` (creates dir with 0700 perms on unix)
    pub async fn open_default() -> Result<Self, StoreError> {
        let dir = dirs::home_dir()
            .ok_or_else(|| StoreError::Backend("no home dir".into()))?
            .join(".devlink");
        std::fs::create_dir_all(&dir).map_err(|e| StoreError::Backend(e.to_string()))?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&dir, std::fs::Permissions::from_mode(0o700))
                .map_err(|e| StoreError::Backend(e.to_string()))?;
        }
        let path = dir.join("store.db");
        let url = format!("sqlite://{}?mode=rwc", path.to_string_lossy());
        Self::open(&url).await
    }

    pub async fn open_in_memory() -> Result<Self, StoreError> {
        Self::open("sqlite::memory:").await
    }

    pub async fn open(url: &str) -> Result<Self, StoreError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect(url)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        MIGRATOR
            .run(&pool)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        Ok(Self { pool })
    }

    async fn load_user(&self, row: UserRow) -> Result<User, StoreError> {
        let id = parse_uuid(&row.id)?;

        let skills: Vec<String> = serde_json::from_str(&row.skills)
            .map_err(|e| StoreError::Backend(format!("corrupt skills column: {}", e)))?;

        let projects = sqlx::query_as::<_, (String,)>(
            "SELECT id FROM projects WHERE user_id=? ORDER BY created_at",
        )
        .bind(&row.id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StoreError::Backend(e.to_string()))?;

        let tasks = sqlx::query_as::<_, (String,)>(
            "SELECT id FROM tasks WHERE user_id=? ORDER BY created_at",
        )
        .bind(&row.id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StoreError::Backend(e.to_string()))?;

        let mut project_ids = Vec::with_capacity(projects.len());
        for (id_str,) in projects {
            project_ids.push(ProjectId(parse_uuid(&id_str)?));
        }
        let mut task_ids = Vec::with_capacity(tasks.len());
        for (id_str,) in tasks {
            task_ids.push(TaskId(parse_uuid(&id_str)?));
        }

        Ok(User {
            id: UserId(id),
            username: row.username,
            email: row.email,
            password_hash: row.password_hash,
            password_salt: row.password_salt,
            first_name: row.first_name,
            last_name: row.last_name,
            about: row.about,
            skills,
            experience: row.experience,
            education: row.education,
            linkedin: row.linkedin,
            github: row.github,
            profile_picture: row.profile_picture,
            verified: row.verified != 0,
            verification_token: row.verification_token,
            verification_expires_at: row.verification_expires_at.map(dt),
            projects: project_ids,
            tasks: task_ids,
            created_at: dt(row.created_at),
            updated_at: dt(row.updated_at),
        })
    }

    async fn fetch_user(&self, where_sql: &str, bind: &str) -> Result<User, StoreError> {
        let sql = format!("SELECT {} FROM users WHERE {}", USER_COLUMNS, where_sql);
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(bind)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        match row {
            None => Err(StoreError::NotFound),
            Some(row) => self.load_user(row).await,
        }
    }
}

const USER_COLUMNS: &str = "id, username, email, password_hash, password_salt, first_name, \
     last_name, about, skills, experience, education, linkedin, github, profile_picture, \
     verified, verification_token, verification_expires_at, created_at, updated_at";

#[derive(sqlx::FromRow)]
struct UserRow {
    id: String,
    username: String,
    email: String,
    password_hash: String,
    password_salt: Vec<u8>,
    first_name: String,
    last_name: String,
    about: String,
    skills: String,
    experience: String,
    education: String,
    linkedin: String,
    github: String,
    profile_picture: String,
    verified: i64,
    verification_token: Option<String>,
    verification_expires_at: Option<i64>,
    created_at: i64,
    updated_at: i64,
}

fn parse_uuid(s: &str) -> Result<Uuid, StoreError> {
    Uuid::try_parse(s).map_err(|e| StoreError::Backend(e.to_string()))
}

fn dt(secs: i64) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(secs, 0).unwrap_or_default()
}

#[async_trait::async_trait]
impl Store for SqliteStore {
    // ───────────────────────────── Users ─────────────────────────────

    async fn create_user(&self, p: &CreateUserParams) -> Result<UserId, StoreError> {
        let user_id = Uuid::now_v7();
        let now = Utc::now().timestamp();
        sqlx::query(
            "INSERT INTO users(id,username,email,password_hash,password_salt,created_at,updated_at)
             VALUES(?,?,?,?,?,?,?)",
        )
        .bind(user_id.to_string())
        .bind(&p.username)
        .bind(&p.email)
        .bind(&p.password_hash)
        .bind(&p.password_salt)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            let s = e.to_string();
            if s.contains("UNIQUE") {
                StoreError::AlreadyExists
            } else {
                StoreError::Backend(s)
            }
        })?;
        Ok(UserId(user_id))
    }

    async fn get_user_by_id(&self, user_id: &UserId) -> Result<User, StoreError> {
        self.fetch_user("id=?", &user_id.0.to_string()).await
    }

    async fn get_user_by_username(&self, username: &str) -> Result<User, StoreError> {
        self.fetch_user("username=?", username).await
    }

    async fn update_profile(
        &self,
        user_id: &UserId,
        update: &ProfileUpdate,
    ) -> Result<User, StoreError> {
        let skills_json = match &update.skills {
            Some(skills) => Some(
                serde_json::to_string(skills).map_err(|e| StoreError::Backend(e.to_string()))?,
            ),
            None => None,
        };

        // Single-statement field-level merge: absent fields bind NULL and
        // COALESCE keeps the stored value, so concurrent updates to disjoint
        // fields never clobber each other.
        let result = sqlx::query(
            "UPDATE users SET
                first_name      = COALESCE(?, first_name),
                last_name       = COALESCE(?, last_name),
                about           = COALESCE(?, about),
                skills          = COALESCE(?, skills),
                experience      = COALESCE(?, experience),
                education       = COALESCE(?, education),
                linkedin        = COALESCE(?, linkedin),
                github          = COALESCE(?, github),
                profile_picture = COALESCE(?, profile_picture),
                updated_at      = ?
             WHERE id = ?",
        )
        .bind(update.first_name.as_deref())
        .bind(update.last_name.as_deref())
        .bind(update.about.as_deref())
        .bind(skills_json)
        .bind(update.experience.as_deref())
        .bind(update.education.as_deref())
        .bind(update.linkedin.as_deref())
        .bind(update.github.as_deref())
        .bind(update.profile_picture.as_deref())
        .bind(Utc::now().timestamp())
        .bind(user_id.0.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::Backend(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }

        self.get_user_by_id(user_id).await
    }

    // ─────────────────────────── Sessions ────────────────────────────

    async fn create_session(&self, p: &CreateSessionParams) -> Result<Session, StoreError> {
        let session_id = Uuid::now_v7();
        let created_at = Utc::now().timestamp();
        sqlx::query(
            "INSERT INTO sessions(id,user_id,token,created_at,expires_at) VALUES(?,?,?,?,?)",
        )
        .bind(session_id.to_string())
        .bind(p.user_id.0.to_string())
        .bind(&p.token)
        .bind(created_at)
        .bind(p.expires_at.timestamp())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            let s = e.to_string();
            if s.contains("UNIQUE") {
                StoreError::Conflict
            } else {
                StoreError::Backend(s)
            }
        })?;

        Ok(Session {
            id: SessionId(session_id),
            user_id: p.user_id.clone(),
            token: p.token.clone(),
            created_at: dt(created_at),
            expires_at: dt(p.expires_at.timestamp()),
        })
    }

    async fn get_session_by_token(&self, token: &str) -> Result<Session, StoreError> {
        let row = sqlx::query_as::<_, (String, String, String, i64, i64)>(
            "SELECT id, user_id, token, created_at, expires_at FROM sessions WHERE token=?",
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StoreError::Backend(e.to_string()))?;

        match row {
            None => Err(StoreError::NotFound),
            Some((id, user_id, token, created_at, expires_at)) => Ok(Session {
                id: SessionId(parse_uuid(&id)?),
                user_id: UserId(parse_uuid(&user_id)?),
                token,
                created_at: dt(created_at),
                expires_at: dt(expires_at),
            }),
        }
    }

    async fn delete_session(&self, token: &str) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM sessions WHERE token=?")
            .bind(token)
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        Ok(())
    }

    async fn cleanup_expired_sessions(&self) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM sessions WHERE expires_at < ?")
            .bind(Utc::now().timestamp())
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        Ok(result.rows_affected())
    }
}
