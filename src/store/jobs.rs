/// Job store adapter.
///
/// Every mutating query here is ownership-scoped: the WHERE clause binds the
/// job id and the owner id together, so the ownership check and the mutation
/// are one atomic statement. There is no fetch-then-compare step anywhere,
/// and a miss does not reveal whether the record exists at all.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{Job, JobStatus};

type JobRow = (Uuid, Uuid, String, String, String, DateTime<Utc>);

fn job_from_row(row: JobRow) -> Result<Job, AppError> {
    let status = row.4.parse::<JobStatus>().map_err(AppError::Internal)?;

    Ok(Job {
        id: row.0,
        user_id: row.1,
        company: row.2,
        position: row.3,
        status,
        created_at: row.5,
    })
}

pub async fn find_many_by_owner(pool: &PgPool, owner_id: Uuid) -> Result<Vec<Job>, AppError> {
    let rows = sqlx::query_as::<_, JobRow>(
        r#"
        SELECT id, user_id, company, position, status, created_at
        FROM jobs
        WHERE user_id = $1
        ORDER BY created_at
        "#,
    )
    .bind(owner_id)
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(job_from_row).collect()
}

/// Insert a job record owned by `owner_id`. The owner is fixed here for the
/// record's whole lifetime.
pub async fn insert(
    pool: &PgPool,
    owner_id: Uuid,
    company: &str,
    position: &str,
    status: JobStatus,
) -> Result<Job, AppError> {
    let job = Job {
        id: Uuid::new_v4(),
        user_id: owner_id,
        company: company.to_string(),
        position: position.to_string(),
        status,
        created_at: Utc::now(),
    };

    sqlx::query(
        r#"
        INSERT INTO jobs (id, user_id, company, position, status, created_at)
        VALUES ($1, $2, $3, $4, $5, $6)
        "#,
    )
    .bind(job.id)
    .bind(job.user_id)
    .bind(&job.company)
    .bind(&job.position)
    .bind(job.status.as_str())
    .bind(job.created_at)
    .execute(pool)
    .await?;

    Ok(job)
}

pub async fn find_one_scoped(
    pool: &PgPool,
    job_id: Uuid,
    owner_id: Uuid,
) -> Result<Option<Job>, AppError> {
    let row = sqlx::query_as::<_, JobRow>(
        r#"
        SELECT id, user_id, company, position, status, created_at
        FROM jobs
        WHERE id = $1 AND user_id = $2
        "#,
    )
    .bind(job_id)
    .bind(owner_id)
    .fetch_optional(pool)
    .await?;

    row.map(job_from_row).transpose()
}

/// Apply any subset of mutable fields, only if the record belongs to
/// `owner_id`. Returns the post-update record; `None` means "not yours or
/// does not exist" without distinguishing the two.
pub async fn update_one_scoped(
    pool: &PgPool,
    job_id: Uuid,
    owner_id: Uuid,
    company: Option<&str>,
    position: Option<&str>,
    status: Option<JobStatus>,
) -> Result<Option<Job>, AppError> {
    let row = sqlx::query_as::<_, JobRow>(
        r#"
        UPDATE jobs
        SET company = COALESCE($3, company),
            position = COALESCE($4, position),
            status = COALESCE($5, status)
        WHERE id = $1 AND user_id = $2
        RETURNING id, user_id, company, position, status, created_at
        "#,
    )
    .bind(job_id)
    .bind(owner_id)
    .bind(company)
    .bind(position)
    .bind(status.map(|s| s.as_str()))
    .fetch_optional(pool)
    .await?;

    row.map(job_from_row).transpose()
}

pub async fn delete_one_scoped(
    pool: &PgPool,
    job_id: Uuid,
    owner_id: Uuid,
) -> Result<Option<Job>, AppError> {
    let row = sqlx::query_as::<_, JobRow>(
        r#"
        DELETE FROM jobs
        WHERE id = $1 AND user_id = $2
        RETURNING id, user_id, company, position, status, created_at
        "#,
    )
    .bind(job_id)
    .bind(owner_id)
    .fetch_optional(pool)
    .await?;

    row.map(job_from_row).transpose()
}
