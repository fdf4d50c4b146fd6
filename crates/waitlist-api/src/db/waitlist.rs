//! Waitlist persistence operations on the `waitlist` table.
//!
//! Rows are never updated or deleted by the service.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;
use waitlist_core::{
    Choice, NewWaitlistEntry, UniqueId, ValidationError, WaitlistEntry, WaitlistFields,
};
use waitlist_store::{StoreError, WaitlistStore};

/// Postgres error code for `unique_violation`.
const UNIQUE_VIOLATION: &str = "23505";

const COLUMNS: &str = "id, created_at, unique_id, full_name, job_title, email, phone_number,
     language, company_name, business_sector, has_capacity, interested_in_automation,
     target_markets, other_markets, budget, alert_method, beta_tester, company_size,
     annual_revenue, gov_experience, contracts_annually, success_rate, business_goals";

/// [`WaitlistStore`] over a direct Postgres connection pool.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn db_error(err: sqlx::Error, unique_id: &UniqueId) -> StoreError {
    if let sqlx::Error::Database(db) = &err {
        if db.code().as_deref() == Some(UNIQUE_VIOLATION) {
            return StoreError::Conflict {
                unique_id: unique_id.to_string(),
            };
        }
    }
    StoreError::Database(err.to_string())
}

#[async_trait]
impl WaitlistStore for PgStore {
    async fn insert(&self, entry: NewWaitlistEntry) -> Result<WaitlistEntry, StoreError> {
        let f = &entry.fields;
        let sql = format!(
            "INSERT INTO waitlist (unique_id, full_name, job_title, email, phone_number,
             language, company_name, business_sector, has_capacity, interested_in_automation,
             target_markets, other_markets, budget, alert_method, beta_tester, company_size,
             annual_revenue, gov_experience, contracts_annually, success_rate, business_goals)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16,
             $17, $18, $19, $20, $21)
             RETURNING {COLUMNS}"
        );

        let row = sqlx::query_as::<_, WaitlistRow>(&sql)
            .bind(entry.unique_id.as_str())
            .bind(&f.full_name)
            .bind(&f.job_title)
            .bind(&f.email)
            .bind(&f.phone_number)
            .bind(f.language.as_str())
            .bind(&f.company_name)
            .bind(&f.business_sector)
            .bind(f.has_capacity)
            .bind(f.interested_in_automation)
            .bind(f.target_markets.iter().map(|m| m.as_str()).collect::<Vec<_>>())
            .bind(f.other_markets.as_deref())
            .bind(f.budget.as_str())
            .bind(f.alert_method.as_str())
            .bind(f.beta_tester)
            .bind(f.company_size.map(|v| v.as_str()))
            .bind(f.annual_revenue.map(|v| v.as_str()))
            .bind(f.gov_experience.map(|v| v.as_str()))
            .bind(f.contracts_annually)
            .bind(f.success_rate)
            .bind(f.business_goals.iter().map(|g| g.as_str()).collect::<Vec<_>>())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| db_error(e, &entry.unique_id))?;

        row.into_entry()
    }

    async fn find_by_unique_id(&self, id: &UniqueId) -> Result<Vec<WaitlistEntry>, StoreError> {
        let sql = format!("SELECT {COLUMNS} FROM waitlist WHERE unique_id = $1");
        let rows = sqlx::query_as::<_, WaitlistRow>(&sql)
            .bind(id.as_str())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_error(e, id))?;

        rows.into_iter().map(WaitlistRow::into_entry).collect()
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map(|_| ())
            .map_err(|e| StoreError::Database(e.to_string()))
    }

    fn backend(&self) -> &'static str {
        "postgres"
    }
}

/// Internal row type for SQLx deserialization.
#[derive(sqlx::FromRow)]
struct WaitlistRow {
    id: Uuid,
    created_at: DateTime<Utc>,
    unique_id: String,
    full_name: String,
    job_title: String,
    email: String,
    phone_number: String,
    language: String,
    company_name: String,
    business_sector: String,
    has_capacity: bool,
    interested_in_automation: bool,
    target_markets: Vec<String>,
    other_markets: Option<String>,
    budget: String,
    alert_method: String,
    beta_tester: bool,
    company_size: Option<String>,
    annual_revenue: Option<String>,
    gov_experience: Option<String>,
    contracts_annually: Option<i32>,
    success_rate: Option<i32>,
    business_goals: Vec<String>,
}

impl WaitlistRow {
    fn into_entry(self) -> Result<WaitlistEntry, StoreError> {
        let unique_id = UniqueId::new(self.unique_id).map_err(integrity)?;
        let fields = WaitlistFields {
            full_name: self.full_name,
            job_title: self.job_title,
            email: self.email,
            phone_number: self.phone_number,
            language: column(&self.language)?,
            company_name: self.company_name,
            business_sector: self.business_sector,
            has_capacity: self.has_capacity,
            interested_in_automation: self.interested_in_automation,
            target_markets: columns(&self.target_markets)?,
            other_markets: self.other_markets,
            budget: column(&self.budget)?,
            alert_method: column(&self.alert_method)?,
            beta_tester: self.beta_tester,
            company_size: self.company_size.as_deref().map(column).transpose()?,
            annual_revenue: self.annual_revenue.as_deref().map(column).transpose()?,
            gov_experience: self.gov_experience.as_deref().map(column).transpose()?,
            contracts_annually: self.contracts_annually,
            success_rate: self.success_rate,
            business_goals: columns(&self.business_goals)?,
        };
        Ok(WaitlistEntry {
            id: self.id,
            created_at: self.created_at,
            unique_id,
            fields,
        })
    }
}

fn integrity(err: ValidationError) -> StoreError {
    StoreError::Integrity(format!("stored row is invalid: {err}"))
}

fn column<T: Choice>(raw: &str) -> Result<T, StoreError> {
    raw.parse().map_err(integrity)
}

fn columns<T: Choice>(raw: &[String]) -> Result<Vec<T>, StoreError> {
    raw.iter().map(|s| column(s)).collect()
}
