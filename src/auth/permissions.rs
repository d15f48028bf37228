use crate::auth::identity::CurrentUser;
use crate::errors::AppError;

const DENIED: &str = "You do not have permission to perform this action.";

pub fn is_owner_or_staff(user: &CurrentUser, owner_id: i64) -> bool {
    user.is_staff || user.id == owner_id
}

/// Polls and choices: mutation is allowed to the owner of the poll or staff.
pub fn require_owner_or_staff(user: &CurrentUser, owner_id: i64) -> Result<(), AppError> {
    if is_owner_or_staff(user, owner_id) {
        Ok(())
    } else {
        Err(AppError::PermissionDenied(DENIED.to_string()))
    }
}

/// Snippets: mutation is allowed to the owner only, staff or not.
pub fn require_owner(user: &CurrentUser, owner_id: i64) -> Result<(), AppError> {
    if user.id == owner_id {
        Ok(())
    } else {
        Err(AppError::PermissionDenied(DENIED.to_string()))
    }
}
