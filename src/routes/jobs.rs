/// Job Routes
///
/// All handlers here sit behind the authentication gate and operate strictly
/// on the authenticated identity's own records. Mutations go through the
/// ownership-scoped store queries; a scoped miss on the write path is a 403,
/// while the read path reports it as a descriptive 400.

use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::Claims;
use crate::error::AppError;
use crate::models::{Job, JobStatus};
use crate::store;

#[derive(Deserialize)]
pub struct CreateJobRequest {
    pub company: Option<String>,
    pub position: Option<String>,
    pub status: Option<JobStatus>,
}

#[derive(Deserialize)]
pub struct UpdateJobRequest {
    pub company: Option<String>,
    pub position: Option<String>,
    pub status: Option<JobStatus>,
}

#[derive(Serialize)]
pub struct JobsResponse {
    pub message: String,
    pub jobs: Vec<Job>,
}

#[derive(Serialize)]
pub struct JobResponse {
    pub message: String,
    pub job: Job,
}

fn provided(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|value| !value.is_empty())
}

/// GET /api/jobs
pub async fn get_jobs(
    claims: web::ReqData<Claims>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, AppError> {
    let owner_id = claims.user_id()?;
    let jobs = store::jobs::find_many_by_owner(pool.get_ref(), owner_id).await?;

    Ok(HttpResponse::Ok().json(JobsResponse {
        message: "Jobs successfully retrieved!".to_string(),
        jobs,
    }))
}

/// POST /api/jobs
///
/// Create a job record owned by the authenticated identity. Status defaults
/// to `pending` when omitted.
pub async fn create_job(
    claims: web::ReqData<Claims>,
    form: web::Json<CreateJobRequest>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, AppError> {
    let (company, position) = match (provided(&form.company), provided(&form.position)) {
        (Some(company), Some(position)) => (company, position),
        _ => {
            return Err(AppError::bad_request(
                "Please enter a company and position.",
            ));
        }
    };

    let owner_id = claims.user_id()?;
    let status = form.status.unwrap_or_default();
    let job = store::jobs::insert(pool.get_ref(), owner_id, company, position, status).await?;

    tracing::info!(user_id = %owner_id, job_id = %job.id, "job created");

    Ok(HttpResponse::Created().json(JobResponse {
        message: "Job successfully created!".to_string(),
        job,
    }))
}

/// GET /api/jobs/{job_id}
///
/// Scoped to the owner; a miss is reported as a not-found style 400, unlike
/// the write path's 403.
pub async fn get_job(
    claims: web::ReqData<Claims>,
    path: web::Path<Uuid>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, AppError> {
    let job_id = path.into_inner();
    let owner_id = claims.user_id()?;

    let job = store::jobs::find_one_scoped(pool.get_ref(), job_id, owner_id)
        .await?
        .ok_or_else(|| {
            AppError::bad_request(format!("No job with id {} was found.", job_id))
        })?;

    Ok(HttpResponse::Ok().json(JobResponse {
        message: "Job successfully retrieved!".to_string(),
        job,
    }))
}

/// PATCH /api/jobs/{job_id}
///
/// Apply any subset of mutable fields through the scoped update. A scoped
/// miss means "not yours or not there" and is reported as 403 either way.
pub async fn update_job(
    claims: web::ReqData<Claims>,
    path: web::Path<Uuid>,
    form: web::Json<UpdateJobRequest>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, AppError> {
    let job_id = path.into_inner();
    let owner_id = claims.user_id()?;

    let job = store::jobs::update_one_scoped(
        pool.get_ref(),
        job_id,
        owner_id,
        provided(&form.company),
        provided(&form.position),
        form.status,
    )
    .await?
    .ok_or_else(|| AppError::forbidden("You are not authorized to edit this job."))?;

    tracing::info!(user_id = %owner_id, job_id = %job.id, "job updated");

    Ok(HttpResponse::Ok().json(JobResponse {
        message: "Job successfully updated!".to_string(),
        job,
    }))
}

/// DELETE /api/jobs/{job_id}
pub async fn delete_job(
    claims: web::ReqData<Claims>,
    path: web::Path<Uuid>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, AppError> {
    let job_id = path.into_inner();
    let owner_id = claims.user_id()?;

    let job = store::jobs::delete_one_scoped(pool.get_ref(), job_id, owner_id)
        .await?
        .ok_or_else(|| AppError::forbidden("You are not authorized to delete this job."))?;

    tracing::info!(user_id = %owner_id, job_id = %job.id, "job deleted");

    Ok(HttpResponse::Ok().json(JobResponse {
        message: "Job successfully deleted!".to_string(),
        job,
    }))
}
