//! Gender field rules and the delete guard.

use crate::error::CoreError;

/// User-facing message for a duplicate gender name.
pub const GENDER_NAME_CONFLICT: &str = "Já existe um gênero com esse nome";

/// Trim a gender name and check it is non-empty.
pub fn normalize_gender_name(name: &str) -> Result<String, CoreError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation("Gender name must not be empty".into()));
    }
    Ok(trimmed.to_string())
}

/// A gender can only be deleted when no user references it.
///
/// `user_count` is the number of users whose `gender_id` points at it.
pub fn ensure_deletable(user_count: i64) -> Result<(), CoreError> {
    if user_count > 0 {
        return Err(CoreError::PreconditionFailed(format!(
            "Não é possível excluir o gênero: {user_count} usuário(s) vinculado(s)"
        )));
    }
    Ok(())
}
