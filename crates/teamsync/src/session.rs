//! Resolves the session user to an employee record.
//!
//! Every workflow write needs the acting employee's identity. The
//! session provider only knows the auth-level user; this module looks
//! up the matching Employee record, by id first and email second, and
//! requires the account to be active.

use thiserror::Error;

use teamsync_core::collaboration::Employee;
use teamsync_core::session::SessionProvider;
use teamsync_core::storage::{decode, Collection, EntityStore, FilterQuery, StoreError};

/// Errors from resolving the current employee.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SessionError {
    #[error("No active session")]
    NotAuthenticated,
    #[error("User account is inactive: {0}")]
    Inactive(String),
    #[error("No employee record for user: {0}")]
    EmployeeNotFound(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Resolves the current session to an Employee record.
pub async fn resolve_current_employee(
    store: &dyn EntityStore,
    session: &dyn SessionProvider,
) -> Result<Employee, SessionError> {
    let user = session
        .current_user()
        .await
        .ok_or(SessionError::NotAuthenticated)?;
    if !user.active {
        return Err(SessionError::Inactive(user.id));
    }

    if let Some(employee) = find_employee(store, "id", &user.id).await? {
        return Ok(employee);
    }
    if let Some(employee) = find_employee(store, "email", &user.email).await? {
        tracing::debug!(user_id = %user.id, "Employee resolved by email fallback");
        return Ok(employee);
    }

    Err(SessionError::EmployeeNotFound(user.email))
}

async fn find_employee(
    store: &dyn EntityStore,
    field: &str,
    value: &str,
) -> Result<Option<Employee>, SessionError> {
    let records = store
        .filter(
            Collection::Employee,
            &FilterQuery::matching(field, value).with_limit(1),
        )
        .await?;
    match records.into_iter().next() {
        Some(record) => Ok(Some(decode(record)?)),
        None => Ok(None),
    }
}
