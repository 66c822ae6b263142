//! Async user account repository using sqlx
//!
//! Implements the `UserRepositoryPort` using SQLite. Settings and referral
//! bookkeeping are stored as JSON documents next to the balance column.

use application::{error::ApplicationError, ports::UserRepositoryPort};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use domain::{ReferralStats, SubjectId, UserAccount, UserSettings};
use sqlx::{Row, SqlitePool, sqlite::SqliteRow};
use tracing::{debug, instrument, warn};

use super::error::map_sqlx_error;

/// SQLite-backed account repository
#[derive(Debug, Clone)]
pub struct SqliteUserRepository {
    pool: SqlitePool,
}

impl SqliteUserRepository {
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn db_id(id: SubjectId) -> Result<i64, ApplicationError> {
        i64::try_from(id.value())
            .map_err(|_| ApplicationError::Repository(format!("Subject id out of range: {id}")))
    }

    fn parse_timestamp(raw: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(raw).map_or_else(
            |_| {
                warn!(timestamp = raw, "Invalid timestamp in database, using now");
                Utc::now()
            },
            |dt| dt.with_timezone(&Utc),
        )
    }

    fn row_to_account(row: &SqliteRow) -> Result<UserAccount, ApplicationError> {
        let user_id: i64 = row.try_get("user_id").map_err(map_sqlx_error)?;
        let balance: i64 = row.try_get("balance").map_err(map_sqlx_error)?;
        let settings_json: String = row.try_get("settings").map_err(map_sqlx_error)?;
        let referrals_json: String = row.try_get("referrals").map_err(map_sqlx_error)?;
        let created_at: String = row.try_get("created_at").map_err(map_sqlx_error)?;
        let updated_at: String = row.try_get("updated_at").map_err(map_sqlx_error)?;

        let id = u64::try_from(user_id)
            .map_err(|_| ApplicationError::Repository(format!("Negative user id {user_id}")))
            .and_then(|raw| SubjectId::new(raw).map_err(ApplicationError::from))?;
        let balance = u32::try_from(balance).unwrap_or(0);

        // Malformed documents fall back to defaults rather than locking the user out
        let settings: UserSettings = serde_json::from_str(&settings_json).unwrap_or_else(|e| {
            warn!(subject = %id, error = %e, "Invalid settings document, using defaults");
            UserSettings::default()
        });
        let referrals: ReferralStats =
            serde_json::from_str(&referrals_json).unwrap_or_else(|e| {
                warn!(subject = %id, error = %e, "Invalid referrals document, using defaults");
                ReferralStats::default()
            });

        Ok(UserAccount::restore(
            id,
            balance,
            settings,
            referrals,
            Self::parse_timestamp(&created_at),
            Self::parse_timestamp(&updated_at),
        ))
    }

    fn to_json<T: serde::Serialize>(value: &T) -> Result<String, ApplicationError> {
        serde_json::to_string(value)
            .map_err(|e| ApplicationError::Repository(format!("Serialization failed: {e}")))
    }
}

#[async_trait]
impl UserRepositoryPort for SqliteUserRepository {
    #[instrument(skip(self), fields(subject = %id))]
    async fn get(&self, id: SubjectId) -> Result<Option<UserAccount>, ApplicationError> {
        let row = sqlx::query(
            r"
            SELECT user_id, balance, settings, referrals, created_at, updated_at
            FROM user_accounts WHERE user_id = $1
            ",
        )
        .bind(Self::db_id(id)?)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        debug!(found = row.is_some(), "Retrieved account");
        row.as_ref().map(Self::row_to_account).transpose()
    }

    #[instrument(skip(self), fields(subject = %id))]
    async fn create(
        &self,
        id: SubjectId,
        default_balance: u32,
    ) -> Result<UserAccount, ApplicationError> {
        let account = UserAccount::new(id, default_balance);

        sqlx::query(
            r"
            INSERT INTO user_accounts (user_id, balance, settings, referrals, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT(user_id) DO NOTHING
            ",
        )
        .bind(Self::db_id(id)?)
        .bind(i64::from(account.balance()))
        .bind(Self::to_json(account.settings())?)
        .bind(Self::to_json(account.referrals())?)
        .bind(account.created_at().to_rfc3339())
        .bind(account.updated_at().to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        self.get(id).await?.ok_or_else(|| {
            ApplicationError::Repository(format!("Account {id} missing after insert"))
        })
    }

    #[instrument(skip(self, account), fields(subject = %account.id()))]
    async fn update(&self, account: &UserAccount) -> Result<(), ApplicationError> {
        let result = sqlx::query(
            r"
            UPDATE user_accounts
            SET settings = $2, referrals = $3, updated_at = $4
            WHERE user_id = $1
            ",
        )
        .bind(Self::db_id(account.id())?)
        .bind(Self::to_json(account.settings())?)
        .bind(Self::to_json(account.referrals())?)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(ApplicationError::Repository(format!(
                "Account {} not found",
                account.id()
            )));
        }
        debug!("Account updated");
        Ok(())
    }

    #[instrument(skip(self), fields(subject = %id))]
    async fn decrement_balance_if_positive(
        &self,
        id: SubjectId,
    ) -> Result<bool, ApplicationError> {
        let result = sqlx::query(
            r"
            UPDATE user_accounts
            SET balance = balance - 1, updated_at = $2
            WHERE user_id = $1 AND balance > 0
            ",
        )
        .bind(Self::db_id(id)?)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(result.rows_affected() == 1)
    }

    #[instrument(skip(self), fields(subject = %id))]
    async fn add_credits(&self, id: SubjectId, amount: u32) -> Result<bool, ApplicationError> {
        let result = sqlx::query(
            r"
            UPDATE user_accounts
            SET balance = MIN(balance + $2, 4294967295), updated_at = $3
            WHERE user_id = $1
            ",
        )
        .bind(Self::db_id(id)?)
        .bind(i64::from(amount))
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(result.rows_affected() == 1)
    }

    async fn is_available(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }
}
