use crate::domain::user::models::Role;

/// Authorization predicate for one route.
///
/// Holds the roles a route requires as plain data; the router hands one guard
/// per route to the authorization middleware. An empty set means the route is
/// unrestricted. Authentication must already have happened.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoleGuard {
    required: Vec<Role>,
}

impl RoleGuard {
    pub fn new(required: impl IntoIterator<Item = Role>) -> Self {
        Self {
            required: required.into_iter().collect(),
        }
    }

    pub fn unrestricted() -> Self {
        Self::default()
    }

    pub fn required_roles(&self) -> &[Role] {
        &self.required
    }

    /// True when nothing is required or `role` is one of the required roles.
    pub fn allows(&self, role: Role) -> bool {
        is_authorized(&self.required, role)
    }
}

/// Set membership by equality; no role hierarchy.
pub fn is_authorized(required: &[Role], role: Role) -> bool {
    required.is_empty() || required.contains(&role)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_route_denies_user() {
        let guard = RoleGuard::new([Role::Admin]);
        assert!(!guard.allows(Role::User));
        assert!(guard.allows(Role::Admin));
    }

    #[test]
    fn test_unrestricted_allows_everyone() {
        let guard = RoleGuard::unrestricted();
        assert!(guard.allows(Role::User));
        assert!(guard.allows(Role::Admin));
        assert!(is_authorized(&[], Role::User));
    }

    #[test]
    fn test_any_listed_role_is_enough() {
        let guard = RoleGuard::new([Role::User, Role::Admin]);
        assert!(guard.allows(Role::User));
        assert!(guard.allows(Role::Admin));
        assert_eq!(guard.required_roles(), &[Role::User, Role::Admin]);
    }

    #[test]
    fn test_no_hierarchy_between_roles() {
        let guard = RoleGuard::new([Role::User]);
        assert!(!guard.allows(Role::Admin));
    }
}
