use crate::domain::error::DomainError;
use crate::domain::user::{NewUser, User, UserProfile};
use async_trait::async_trait;
use sqlx::SqlitePool;
use tracing::{error, info};

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<UserProfile>, DomainError>;
    async fn find_by_id(&self, id: i64) -> Result<Option<UserProfile>, DomainError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError>;
    async fn create(&self, user: NewUser) -> Result<UserProfile, DomainError>;
    async fn update(&self, id: i64, name: &str, email: &str) -> Result<bool, DomainError>;
    async fn delete(&self, id: i64) -> Result<bool, DomainError>;
    async fn search_by_name(&self, pattern: &str) -> Result<Vec<UserProfile>, DomainError>;
}

#[derive(Clone)]
pub struct SqliteUserRepository {
    pool: SqlitePool,
}

impl SqliteUserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .map(|db| db.is_unique_violation())
        .unwrap_or(false)
}

fn map_write_error(context: &str, err: sqlx::Error) -> DomainError {
    if is_unique_violation(&err) {
        info!("{}: email already registered", context);
        DomainError::EmailAlreadyExists
    } else {
        error!("{}: {}", context, err);
        DomainError::Internal(format!("database error: {}", err))
    }
}

// `%`, `_` and `\` are escaped so the pattern matches as a literal substring.
fn like_pattern(pattern: &str) -> String {
    let mut escaped = String::with_capacity(pattern.len() + 2);
    escaped.push('%');
    for ch in pattern.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped.push('%');
    escaped
}

#[async_trait]
impl UserRepository for SqliteUserRepository {
    async fn list(&self) -> Result<Vec<UserProfile>, DomainError> {
        let mut conn = self.pool.acquire().await?;
        sqlx::query_as::<_, UserProfile>("SELECT id, name, email FROM users")
            .fetch_all(&mut *conn)
            .await
            .map_err(|e| {
                error!("failed to list users: {}", e);
                DomainError::from(e)
            })
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<UserProfile>, DomainError> {
        let mut conn = self.pool.acquire().await?;
        sqlx::query_as::<_, UserProfile>("SELECT id, name, email FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(&mut *conn)
            .await
            .map_err(|e| {
                error!("failed to find user by id {}: {}", id, e);
                DomainError::from(e)
            })
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let mut conn = self.pool.acquire().await?;
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password
            FROM users
            WHERE email = ?
            "#,
        )
        .bind(email)
        .fetch_optional(&mut *conn)
        .await
        .map_err(|e| {
            error!("failed to find user by email: {}", e);
            DomainError::from(e)
        })
    }

    async fn create(&self, user: NewUser) -> Result<UserProfile, DomainError> {
        let mut conn = self.pool.acquire().await?;
        let result = sqlx::query(
            r#"
            INSERT INTO users (name, email, password)
            VALUES (?, ?, ?)
            "#,
        )
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .execute(&mut *conn)
        .await
        .map_err(|e| map_write_error("failed to create user", e))?;

        let id = result.last_insert_rowid();
        info!(user_id = id, "user created");
        Ok(UserProfile {
            id,
            name: user.name,
            email: user.email,
        })
    }

    async fn update(&self, id: i64, name: &str, email: &str) -> Result<bool, DomainError> {
        let mut conn = self.pool.acquire().await?;
        let result = sqlx::query("UPDATE users SET name = ?, email = ? WHERE id = ?")
            .bind(name)
            .bind(email)
            .bind(id)
            .execute(&mut *conn)
            .await
            .map_err(|e| map_write_error("failed to update user", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: i64) -> Result<bool, DomainError> {
        let mut conn = self.pool.acquire().await?;
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(&mut *conn)
            .await
            .map_err(|e| {
                error!("failed to delete user {}: {}", id, e);
                DomainError::from(e)
            })?;

        Ok(result.rows_affected() > 0)
    }

    async fn search_by_name(&self, pattern: &str) -> Result<Vec<UserProfile>, DomainError> {
        let mut conn = self.pool.acquire().await?;
        sqlx::query_as::<_, UserProfile>(
            r#"
            SELECT id, name, email
            FROM users
            WHERE name LIKE ? ESCAPE '\'
            "#,
        )
        .bind(like_pattern(pattern))
        .fetch_all(&mut *conn)
        .await
        .map_err(|e| {
            error!("failed to search users by name: {}", e);
            DomainError::from(e)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::like_pattern;

    #[test]
    fn like_pattern_wraps_and_escapes() {
        assert_eq!(like_pattern("oh"), "%oh%");
        assert_eq!(like_pattern("50%"), "%50\\%%");
        assert_eq!(like_pattern("a_b"), "%a\\_b%");
    }
}
