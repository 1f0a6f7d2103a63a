//! Permission names for generated admin resources.
//!
//! The names follow the `{action}_{resource}` convention used by Filament
//! Shield, so resources generated here line up with existing role setups.

use modforge_core::to_snake_case;

/// Guard the permissions are registered under.
pub const GUARD: &str = "web";

/// Every action a resource is gated on, in registration order.
pub const PERMISSION_ACTIONS: [&str; 11] = [
    "view_any",
    "view",
    "create",
    "update",
    "delete",
    "delete_any",
    "force_delete",
    "force_delete_any",
    "restore",
    "restore_any",
    "replicate",
];

/// `view_any_order_item`
pub fn permission_name(action: &str, model: &str) -> String {
    format!("{}_{}", action, to_snake_case(model))
}

/// All permission names for a resource derived from `model`.
pub fn permissions_for(model: &str) -> Vec<String> {
    PERMISSION_ACTIONS
        .iter()
        .map(|action| permission_name(action, model))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_permissions() {
        assert_eq!(
            permissions_for("Order"),
            vec![
                "view_any_order",
                "view_order",
                "create_order",
                "update_order",
                "delete_order",
                "delete_any_order",
                "force_delete_order",
                "force_delete_any_order",
                "restore_order",
                "restore_any_order",
                "replicate_order",
            ]
        );
    }

    #[test]
    fn test_multi_word_model() {
        assert_eq!(permission_name("view_any", "OrderItem"), "view_any_order_item");
    }
}
