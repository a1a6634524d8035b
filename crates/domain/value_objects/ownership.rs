use uuid::Uuid;

use crate::domain::value_objects::enums::user_roles::UserRole;

/// Admins may act on any resource; clients only on resources they own. For products the owner is
/// the client that owns the product's brand.
pub fn is_owner_or_admin(requester_role: UserRole, requester_id: Uuid, resource_owner_id: Uuid) -> bool {
    requester_role == UserRole::Admin || requester_id == resource_owner_id
}
