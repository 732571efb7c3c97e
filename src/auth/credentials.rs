/// Credential Store
///
/// Registers identities and verifies email/password pairs. bcrypt runs on the
/// blocking thread pool so it never stalls an HTTP worker.

use lazy_static::lazy_static;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::auth::password::{hash_password, verify_password};
use crate::error::{AppError, AuthError, DatabaseError};
use crate::store::Identity;

const IDENTITY_COLUMNS: &str = "id, email, password_hash, created_at, updated_at";

lazy_static! {
    // Unknown emails are checked against this so login costs one bcrypt verify either way
    static ref PLACEHOLDER_HASH: Option<String> =
        hash_password("placeholder-password-never-matches").ok();
}

/// Runs a full bcrypt verify that can never succeed
fn verify_against_placeholder(password: &str) -> bool {
    PLACEHOLDER_HASH
        .as_deref()
        .map(|hash| verify_password(password, hash).unwrap_or(false))
        .unwrap_or(false)
}

async fn run_blocking<T, F>(f: F) -> Result<T, AppError>
where
    F: FnOnce() -> Result<T, AppError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| AppError::Internal(format!("Blocking task failed: {}", e)))?
}

fn email_taken() -> AppError {
    AppError::Database(DatabaseError::UniqueConstraintViolation(
        "Email already registered".to_string(),
    ))
}

/// Checks the password policy and hashes it off the async runtime.
/// Call before opening a transaction; hashing is slow.
///
/// # Errors
/// 400 when the password length is out of bounds
pub async fn hash_new_password(password: &str) -> Result<String, AppError> {
    let password = password.to_string();
    run_blocking(move || hash_password(&password)).await
}

/// Stores a new identity with an already computed `password_hash` inside
/// `transaction`.
///
/// `email` must already be normalized (see `validators::is_valid_email`).
///
/// # Errors
/// 409 when the email is already registered
pub async fn register(
    transaction: &mut Transaction<'_, Postgres>,
    email: &str,
    password_hash: &str,
) -> Result<Identity, AppError> {
    let existing = sqlx::query_scalar::<_, Uuid>("SELECT id FROM users WHERE email = $1")
        .bind(email)
        .fetch_optional(&mut *transaction)
        .await?;
    if existing.is_some() {
        return Err(email_taken());
    }

    // A concurrent signup can still win the race; the unique index settles it.
    sqlx::query_as::<_, Identity>(&format!(
        r#"
        INSERT INTO users (id, email, password_hash)
        VALUES ($1, $2, $3)
        RETURNING {}
        "#,
        IDENTITY_COLUMNS
    ))
    .bind(Uuid::new_v4())
    .bind(email)
    .bind(password_hash)
    .fetch_one(&mut *transaction)
    .await
    .map_err(|e| {
        let error = AppError::from(e);
        if error.is_unique_violation() {
            email_taken()
        } else {
            error
        }
    })
}

/// Looks up `email` and checks `password` against the stored hash.
///
/// # Errors
/// `InvalidCredentials` for an unknown email and for a wrong password alike.
pub async fn verify(pool: &PgPool, email: &str, password: &str) -> Result<Identity, AppError> {
    let identity = sqlx::query_as::<_, Identity>(&format!(
        "SELECT {} FROM users WHERE email = $1",
        IDENTITY_COLUMNS
    ))
    .bind(email)
    .fetch_optional(pool)
    .await?;

    let identity = match identity {
        Some(identity) => identity,
        None => {
            let password = password.to_string();
            run_blocking(move || Ok(verify_against_placeholder(&password))).await?;
            return Err(AppError::Auth(AuthError::InvalidCredentials));
        }
    };

    let password = password.to_string();
    let password_hash = identity.password_hash.clone();
    let matches = run_blocking(move || verify_password(&password, &password_hash)).await?;

    if !matches {
        return Err(AppError::Auth(AuthError::InvalidCredentials));
    }

    Ok(identity)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_hash_is_a_real_bcrypt_hash() {
        let hash = PLACEHOLDER_HASH.as_deref().expect("placeholder hash");
        assert!(hash.starts_with("$2"));
        assert!(!verify_against_placeholder("pw123456"));
        assert!(!verify_against_placeholder(""));
    }

    #[tokio::test]
    async fn test_hash_new_password_enforces_length_before_hashing() {
        assert!(matches!(
            hash_new_password("x").await,
            Err(AppError::Validation(_))
        ));

        let hash = hash_new_password("pw123456").await.unwrap();
        assert!(verify_password("pw123456", &hash).unwrap());
    }
}
