//! Resolved request actor

use serde::Serialize;

use super::policy::PrincipalKind;
use crate::domain::user::{User, UserId};

/// How the principal authenticated
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AuthMethod {
    /// Interactive login
    Session,
    /// `PORTUS-AUTH` header carrying an application token
    ApplicationToken { application: String },
}

/// The authenticated actor of a single request
///
/// The administrator flag is copied from the user when the principal is
/// resolved and does not change for the lifetime of the request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Principal {
    user_id: UserId,
    username: String,
    admin: bool,
    method: AuthMethod,
}

impl Principal {
    pub fn from_session(user: &User) -> Self {
        Self::resolve(user, AuthMethod::Session)
    }

    pub fn from_application_token(user: &User, application: impl Into<String>) -> Self {
        Self::resolve(
            user,
            AuthMethod::ApplicationToken {
                application: application.into(),
            },
        )
    }

    fn resolve(user: &User, method: AuthMethod) -> Self {
        Self {
            user_id: user.id(),
            username: user.username().to_string(),
            admin: user.is_admin(),
            method,
        }
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn is_admin(&self) -> bool {
        self.admin
    }

    pub fn method(&self) -> &AuthMethod {
        &self.method
    }

    pub fn kind(&self) -> PrincipalKind {
        if self.admin {
            PrincipalKind::Administrator
        } else {
            PrincipalKind::Member
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_flag_is_captured() {
        let admin = User::new(UserId::new(1), "root", true);
        let principal = Principal::from_session(&admin);

        assert!(principal.is_admin());
        assert_eq!(principal.kind(), PrincipalKind::Administrator);
        assert_eq!(principal.method(), &AuthMethod::Session);
    }

    #[test]
    fn test_token_principal() {
        let user = User::new(UserId::new(2), "alice", false);
        let principal = Principal::from_application_token(&user, "ci-runner");

        assert_eq!(principal.user_id(), UserId::new(2));
        assert_eq!(principal.kind(), PrincipalKind::Member);
        assert_eq!(
            principal.method(),
            &AuthMethod::ApplicationToken {
                application: "ci-runner".to_string()
            }
        );
    }
}
