use crate::models::user::Role;

/// Single ownership predicate for bookings and passengers: administrators may
/// act on any resource, everyone else only on resources they own.
pub fn can_access(caller_user_id: i64, caller_role: Role, resource_owner_id: i64) -> bool {
    caller_role == Role::Admin || caller_user_id == resource_owner_id
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn owner_can_access_own_resource() {
        assert!(can_access(7, Role::Passenger, 7));
    }

    #[test]
    fn non_owner_is_denied() {
        assert!(!can_access(7, Role::Passenger, 8));
    }

    #[test]
    fn admin_can_access_any_resource() {
        assert!(can_access(1, Role::Admin, 999));
        assert!(can_access(1, Role::Admin, 1));
    }
}
