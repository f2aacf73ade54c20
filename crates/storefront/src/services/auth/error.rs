//! Authentication error types.

use thiserror::Error;

use crate::db::RepositoryError;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// A registration field is missing or malformed.
    #[error("invalid {field}: {reason}")]
    InvalidField {
        /// Form field name.
        field: &'static str,
        /// What is wrong with it.
        reason: String,
    },

    /// Invalid credentials (wrong password or user not found).
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Username, CPF or email already registered.
    #[error("user already exists")]
    UserAlreadyExists,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,
}

impl AuthError {
    pub(crate) fn invalid(field: &'static str, reason: impl ToString) -> Self {
        Self::InvalidField {
            field,
            reason: reason.to_string(),
        }
    }

    /// Message shown to the visitor as a flash notice.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidField { field, .. } => {
                format!("Campo inválido: {}.", field_label(field))
            }
            Self::InvalidCredentials => "Login inválido.".to_string(),
            Self::UserAlreadyExists => "Erro: Usuário, CPF ou Email já cadastrados.".to_string(),
            Self::Repository(_) | Self::PasswordHash => {
                "Não foi possível concluir a operação. Tente novamente.".to_string()
            }
        }
    }
}

fn field_label(field: &str) -> &str {
    match field {
        "username" => "Usuário",
        "password" => "Senha",
        "full_name" => "Nome completo",
        "national_id" => "CPF",
        "email" => "Email",
        "phone" => "Telefone",
        "address" => "Endereço",
        "gender" => "Gênero",
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_messages() {
        assert_eq!(
            AuthError::invalid("national_id", "too short").user_message(),
            "Campo inválido: CPF."
        );
        assert_eq!(AuthError::InvalidCredentials.user_message(), "Login inválido.");
        assert_eq!(
            AuthError::UserAlreadyExists.user_message(),
            "Erro: Usuário, CPF ou Email já cadastrados."
        );
    }

    #[test]
    fn test_repository_details_stay_internal() {
        let err = AuthError::Repository(RepositoryError::DataCorruption("bad row".to_string()));
        assert!(!err.user_message().contains("bad row"));
    }
}
