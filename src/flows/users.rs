//! Tenant user signup and login.

use axum::http::StatusCode;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{error, info, warn};

use crate::auth::{hash_password, verify_password, TokenManager};
use crate::bridge::OperationBridge;
use crate::orchestrator::step;
use crate::query::catalog::{PASSWORD_FIELD, USERS_COLLECTION};
use crate::response::{context, ApiError, ApiResponse, ApiResult};
use crate::store::{DocLocation, StoreOp, StoreStatus, SubdocSpec};

/// Signup and login request body
#[derive(Debug, Clone, Deserialize)]
pub struct Credentials {
    pub user: String,
    pub password: String,
}

pub async fn signup(
    bridge: &mut OperationBridge,
    tokens: &TokenManager,
    tenant: &str,
    credentials: Credentials,
) -> ApiResult<ApiResponse> {
    let tenant = tenant.to_lowercase();
    let user = credentials.user.to_lowercase();

    let password = hash_password(&credentials.password).map_err(|e| {
        error!(error = %e, "could not hash password");
        ApiError::UserInsertFailed
    })?;

    let insert = StoreOp::Insert {
        location: DocLocation::new(&tenant, USERS_COLLECTION, &user),
        value: json!({ "user": user, "password": password }),
    };
    match step::run_step(bridge, "signup", insert).await {
        Ok(_) => {}
        Err(e) if e.status() == Some(&StoreStatus::AlreadyExists) => {
            info!(tenant = %tenant, user = %user, "signup for existing user");
            return Err(ApiError::UserExists);
        }
        Err(e) => {
            error!(error = %e, "user insert failed");
            return Err(ApiError::UserInsertFailed);
        }
    }

    let token = issue(tokens, &user)?;
    Ok(ApiResponse::new(
        json!({ "token": token }),
        vec![context::kv(
            "insert",
            &tenant,
            USERS_COLLECTION,
            format!("document {}", user),
        )],
    )
    .with_status(StatusCode::CREATED))
}

pub async fn login(
    bridge: &mut OperationBridge,
    tokens: &TokenManager,
    tenant: &str,
    credentials: Credentials,
) -> ApiResult<ApiResponse> {
    let tenant = tenant.to_lowercase();
    let user = credentials.user.to_lowercase();

    let lookup = StoreOp::Subdoc {
        location: DocLocation::new(&tenant, USERS_COLLECTION, &user),
        specs: vec![SubdocSpec::get(PASSWORD_FIELD)],
    };
    let fields = match step::run_step(bridge, "login", lookup)
        .await
        .and_then(|payload| step::expect_fields("login", payload))
    {
        Ok(fields) => fields,
        Err(e) if e.status() == Some(&StoreStatus::NotFound) => {
            info!(tenant = %tenant, user = %user, "login for unknown user");
            return Err(ApiError::UserNotFound);
        }
        Err(e) => {
            error!(error = %e, "user lookup failed");
            return Err(ApiError::UserLookupFailed);
        }
    };

    let Some(Value::String(stored)) = fields.into_iter().next().flatten() else {
        error!(tenant = %tenant, user = %user, "user document has no password hash");
        return Err(ApiError::UserLookupFailed);
    };

    match verify_password(&credentials.password, &stored) {
        Ok(true) => {}
        Ok(false) => {
            warn!(tenant = %tenant, user = %user, "password mismatch");
            return Err(ApiError::PasswordMismatch);
        }
        Err(e) => {
            error!(error = %e, "stored password hash is unusable");
            return Err(ApiError::UserLookupFailed);
        }
    }

    let token = issue(tokens, &user)?;
    Ok(ApiResponse::new(
        json!({ "token": token }),
        vec![context::kv(
            "get",
            &tenant,
            USERS_COLLECTION,
            format!("for {} field in document {}", PASSWORD_FIELD, user),
        )],
    ))
}

fn issue(tokens: &TokenManager, user: &str) -> ApiResult<String> {
    tokens.issue(user).map_err(|e| {
        error!(error = %e, "token issue failed");
        ApiError::TokenIssueFailed
    })
}
