// ── Route guards ──
//
// Pure predicates over the observable session state. Re-evaluated on
// every render/dispatch; nothing is cached.

use crate::error::CoreError;
use crate::model::Role;
use crate::session::SessionState;

/// What the caller should do with a guarded route or command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    /// Session still loading -- show a spinner, decide later.
    Wait,
    /// Not signed in -- go to the login flow.
    RedirectToLogin,
    /// Signed in but missing the required role -- go somewhere neutral.
    RedirectToNeutral,
    /// Let them through.
    Allow,
}

/// Evaluate a role requirement against the current session state.
pub fn require_role(state: &SessionState, required: Role) -> GuardDecision {
    match state {
        SessionState::Loading => GuardDecision::Wait,
        SessionState::Unauthenticated => GuardDecision::RedirectToLogin,
        SessionState::Authenticated(session) => {
            if session.user.role == required {
                GuardDecision::Allow
            } else {
                GuardDecision::RedirectToNeutral
            }
        }
    }
}

/// CLI-flavored guard: turn a non-`Allow` decision into an error.
pub fn require_role_strict(state: &SessionState, required: Role) -> Result<(), CoreError> {
    match require_role(state, required) {
        GuardDecision::Allow => Ok(()),
        GuardDecision::Wait | GuardDecision::RedirectToLogin => Err(CoreError::NotAuthenticated),
        GuardDecision::RedirectToNeutral => Err(CoreError::Forbidden {
            required: required.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use secrecy::SecretString;

    use super::*;
    use crate::model::{AccountType, User, UserStatus};
    use crate::session::Session;

    fn authed(role: Role) -> SessionState {
        SessionState::Authenticated(Arc::new(Session {
            user: User {
                id: "u".into(),
                email: "a@b.c".into(),
                first_name: String::new(),
                last_name: String::new(),
                account_type: AccountType::Business,
                role,
                status: UserStatus::Active,
                business_name: None,
                phone_number: None,
                created_at: None,
            },
            token: SecretString::from("t".to_owned()),
        }))
    }

    #[test]
    fn loading_waits() {
        assert_eq!(
            require_role(&SessionState::Loading, Role::Admin),
            GuardDecision::Wait
        );
    }

    #[test]
    fn unauthenticated_redirects_to_login() {
        assert_eq!(
            require_role(&SessionState::Unauthenticated, Role::Business),
            GuardDecision::RedirectToLogin
        );
    }

    #[test]
    fn wrong_role_redirects_to_neutral() {
        assert_eq!(
            require_role(&authed(Role::User), Role::Admin),
            GuardDecision::RedirectToNeutral
        );
    }

    #[test]
    fn matching_role_allows() {
        assert_eq!(
            require_role(&authed(Role::Admin), Role::Admin),
            GuardDecision::Allow
        );
    }

    #[test]
    fn strict_variant_maps_to_errors() {
        assert!(require_role_strict(&authed(Role::Admin), Role::Admin).is_ok());
        assert!(matches!(
            require_role_strict(&SessionState::Unauthenticated, Role::Admin),
            Err(CoreError::NotAuthenticated)
        ));
        assert!(matches!(
            require_role_strict(&authed(Role::User), Role::Admin),
            Err(CoreError::Forbidden { .. })
        ));
    }
}
