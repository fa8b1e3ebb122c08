//! PostgreSQL audit trail: writer and reader over `audit_logs`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::PgPool;

use super::parse_column;
use crate::domain::audit::{AuditEntry, AuditRecord};
use crate::domain::foundation::{CompanyId, DomainError, UserId};
use crate::ports::{AuditLogger, AuditReader};

#[derive(Clone)]
pub struct PostgresAuditLog {
    pool: PgPool,
}

impl PostgresAuditLog {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct AuditRow {
    id: i64,
    occurred_at: DateTime<Utc>,
    action: String,
    user_id: Option<i64>,
    user_role: Option<String>,
    company_id: Option<i64>,
    entity_type: Option<String>,
    entity_id: Option<i64>,
    notes: Option<String>,
    extra: Option<Value>,
}

impl TryFrom<AuditRow> for AuditRecord {
    type Error = DomainError;

    fn try_from(row: AuditRow) -> Result<Self, Self::Error> {
        let user_role = row
            .user_role
            .as_deref()
            .map(|role| parse_column("audit_logs.user_role", role))
            .transpose()?;
        Ok(AuditRecord {
            id: row.id,
            entry: AuditEntry {
                occurred_at: row.occurred_at,
                action: parse_column("audit_logs.action", &row.action)?,
                user_id: row.user_id.map(UserId::new),
                user_role,
                company_id: row.company_id.map(CompanyId::new),
                entity_type: row.entity_type,
                entity_id: row.entity_id,
                notes: row.notes,
                extra: row.extra.unwrap_or(Value::Null),
            },
        })
    }
}

#[async_trait]
impl AuditLogger for PostgresAuditLog {
    async fn record(&self, entry: AuditEntry) -> Result<(), DomainError> {
        let extra = (!entry.extra.is_null()).then_some(&entry.extra);
        sqlx::query(
            r#"
            INSERT INTO audit_logs (
                occurred_at, action, user_id, user_role, company_id,
                entity_type, entity_id, notes, extra
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(entry.occurred_at)
        .bind(entry.action.as_str())
        .bind(entry.user_id.map(|id| id.get()))
        .bind(entry.user_role.map(|role| role.as_str()))
        .bind(entry.company_id.map(|id| id.get()))
        .bind(entry.entity_type.as_deref())
        .bind(entry.entity_id)
        .bind(entry.notes.as_deref())
        .bind(extra)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

#[async_trait]
impl AuditReader for PostgresAuditLog {
    async fn list_recent(
        &self,
        company_id: Option<CompanyId>,
        limit: u32,
    ) -> Result<Vec<AuditRecord>, DomainError> {
        let rows: Vec<AuditRow> = sqlx::query_as(
            r#"
            SELECT id, occurred_at, action, user_id, user_role, company_id,
                   entity_type, entity_id, notes, extra
            FROM audit_logs
            WHERE $1::bigint IS NULL OR company_id = $1
            ORDER BY id DESC
            LIMIT $2
            "#,
        )
        .bind(company_id.map(|id| id.get()))
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(AuditRecord::try_from).collect()
    }
}
