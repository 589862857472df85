//! Authorization gate: who may talk to the assistant.

use std::collections::HashSet;

use claudegram_core::bus::UserId;

/// Allow-list policy. An empty list admits everyone.
#[derive(Clone, Debug, Default)]
pub struct AuthorizationPolicy {
    allow_list: HashSet<UserId>,
}

impl AuthorizationPolicy {
    /// Build a policy from configured user ids.
    pub fn new(allowed: impl IntoIterator<Item = UserId>) -> Self {
        Self {
            allow_list: allowed.into_iter().collect(),
        }
    }

    /// Policy that admits every user.
    pub fn allow_all() -> Self {
        Self::default()
    }

    /// Whether the policy restricts access at all.
    pub fn is_restricted(&self) -> bool {
        !self.allow_list.is_empty()
    }

    /// Number of explicitly allowed users.
    pub fn len(&self) -> usize {
        self.allow_list.len()
    }

    /// Whether the allow-list is empty.
    pub fn is_empty(&self) -> bool {
        self.allow_list.is_empty()
    }

    /// Check a user against this policy.
    pub fn is_allowed(&self, user_id: UserId) -> bool {
        is_allowed(user_id, self)
    }
}

/// `true` iff the allow-list is empty or contains `user_id`.
pub fn is_allowed(user_id: UserId, policy: &AuthorizationPolicy) -> bool {
    policy.allow_list.is_empty() || policy.allow_list.contains(&user_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_list_allows_anyone() {
        let policy = AuthorizationPolicy::allow_all();
        assert!(!policy.is_restricted());
        for user in [0, 1, -5, 123456789, i64::MAX] {
            assert!(policy.is_allowed(user));
        }
    }

    #[test]
    fn test_restricted_allows_members() {
        let policy = AuthorizationPolicy::new([111, 222]);
        assert!(policy.is_restricted());
        assert!(policy.is_allowed(111));
        assert!(policy.is_allowed(222));
    }

    #[test]
    fn test_restricted_rejects_others() {
        let policy = AuthorizationPolicy::new([111, 222]);
        for user in [0, 1, 333, -111] {
            assert!(!is_allowed(user, &policy));
        }
    }

    #[test]
    fn test_duplicates_collapse() {
        let policy = AuthorizationPolicy::new([7, 7, 7]);
        assert_eq!(policy.len(), 1);
    }
}
