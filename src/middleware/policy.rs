use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::user::{ADMIN_ROLE_ADMIN, USER_TYPE_ADMIN, USER_TYPE_CANDIDATE};

/// Identity claims carried in the session token. Re-derived from the
/// token on every request; no database round trip for the base claims.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub sub: Uuid,
    pub email: String,
    pub name: String,
    pub user_type: String,
    pub admin_role: Option<String>,
    pub exp: usize,
}

impl Session {
    pub fn is_admin(&self) -> bool {
        self.user_type == USER_TYPE_ADMIN
    }

    pub fn is_candidate(&self) -> bool {
        self.user_type == USER_TYPE_CANDIDATE
    }

    pub fn is_super_admin(&self) -> bool {
        self.is_admin() && self.admin_role.as_deref() == Some(ADMIN_ROLE_ADMIN)
    }
}

/// What a route requires of the caller. One table drives every guard,
/// so adding a protected endpoint cannot forget a check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    Authenticated,
    AdminUser,
    CandidateUser,
    SuperAdmin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Denial {
    /// No session, or the token failed to decode.
    Unauthorized,
    /// Valid session, insufficient role.
    Forbidden,
}

pub fn decide(session: Option<&Session>, required: Capability) -> Result<(), Denial> {
    let Some(session) = session else {
        return Err(Denial::Unauthorized);
    };
    let allowed = match required {
        Capability::Authenticated => true,
        Capability::AdminUser => session.is_admin(),
        Capability::CandidateUser => session.is_candidate(),
        Capability::SuperAdmin => session.is_super_admin(),
    };
    if allowed {
        Ok(())
    } else {
        Err(Denial::Forbidden)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::user::{ADMIN_ROLE_USER, USER_TYPE_ADMIN, USER_TYPE_CANDIDATE};

    fn session(user_type: &str, admin_role: Option<&str>) -> Session {
        Session {
            sub: Uuid::new_v4(),
            email: "a@example.com".into(),
            name: "A".into(),
            user_type: user_type.into(),
            admin_role: admin_role.map(Into::into),
            exp: 0,
        }
    }

    #[test]
    fn missing_session_is_unauthorized_for_every_capability() {
        for cap in [
            Capability::Authenticated,
            Capability::AdminUser,
            Capability::CandidateUser,
            Capability::SuperAdmin,
        ] {
            assert_eq!(decide(None, cap), Err(Denial::Unauthorized));
        }
    }

    #[test]
    fn plain_admin_is_forbidden_from_super_admin_capability() {
        let s = session(USER_TYPE_ADMIN, Some(ADMIN_ROLE_USER));
        assert_eq!(decide(Some(&s), Capability::AdminUser), Ok(()));
        assert_eq!(
            decide(Some(&s), Capability::SuperAdmin),
            Err(Denial::Forbidden)
        );
    }

    #[test]
    fn super_admin_satisfies_admin_and_super_admin() {
        let s = session(USER_TYPE_ADMIN, Some(ADMIN_ROLE_ADMIN));
        assert_eq!(decide(Some(&s), Capability::AdminUser), Ok(()));
        assert_eq!(decide(Some(&s), Capability::SuperAdmin), Ok(()));
        assert_eq!(
            decide(Some(&s), Capability::CandidateUser),
            Err(Denial::Forbidden)
        );
    }

    #[test]
    fn candidate_cannot_reach_admin_capabilities() {
        let s = session(USER_TYPE_CANDIDATE, None);
        assert_eq!(decide(Some(&s), Capability::Authenticated), Ok(()));
        assert_eq!(decide(Some(&s), Capability::CandidateUser), Ok(()));
        assert_eq!(
            decide(Some(&s), Capability::AdminUser),
            Err(Denial::Forbidden)
        );
        assert_eq!(
            decide(Some(&s), Capability::SuperAdmin),
            Err(Denial::Forbidden)
        );
    }

    #[test]
    fn candidate_with_stray_admin_role_is_not_super_admin() {
        let s = session(USER_TYPE_CANDIDATE, Some(ADMIN_ROLE_ADMIN));
        assert_eq!(
            decide(Some(&s), Capability::SuperAdmin),
            Err(Denial::Forbidden)
        );
    }
}
