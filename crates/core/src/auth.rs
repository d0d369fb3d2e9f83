//! Caller identity supplied by the identity collaborator.
//!
//! The engine does not manage sessions; it receives an authenticated
//! `user_id` and a role, and uses the role only to authorize cross-user
//! reads (e.g. an administrator viewing another user's ledger).

use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Member,
    Admin,
}

/// Authenticated caller of a read API.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Requester {
    pub user_id: String,
    pub role: Role,
}

impl Requester {
    pub fn new(user_id: impl Into<String>, role: Role) -> Self {
        Requester {
            user_id: user_id.into(),
            role,
        }
    }

    /// Fails with `Forbidden` unless the requester is the target user or an
    /// administrator.
    pub fn ensure_can_view(&self, target_user_id: &str) -> Result<()> {
        if self.user_id == target_user_id || self.role == Role::Admin {
            Ok(())
        } else {
            Err(Error::Forbidden(format!(
                "user '{}' may not read records of user '{}'",
                self.user_id, target_user_id
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn member_can_view_own_records() {
        let requester = Requester::new("u1", Role::Member);
        assert!(requester.ensure_can_view("u1").is_ok());
    }

    #[test]
    fn member_cannot_view_other_records() {
        let requester = Requester::new("u1", Role::Member);
        assert!(matches!(
            requester.ensure_can_view("u2"),
            Err(Error::Forbidden(_))
        ));
    }

    #[test]
    fn admin_can_view_any_records() {
        let requester = Requester::new("admin", Role::Admin);
        assert!(requester.ensure_can_view("u2").is_ok());
    }
}
