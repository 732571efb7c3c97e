use actix_web::{web, HttpResponse};
use sqlx::PgPool;

/// 200 when the database answers, 503 otherwise
pub async fn health_check(pool: web::Data<PgPool>) -> HttpResponse {
    match sqlx::query("SELECT 1").execute(pool.get_ref()).await {
        Ok(_) => HttpResponse::Ok().finish(),
        Err(e) => {
            tracing::warn!(error = %e, "Health check failed: database unreachable");
            HttpResponse::ServiceUnavailable().finish()
        }
    }
}
