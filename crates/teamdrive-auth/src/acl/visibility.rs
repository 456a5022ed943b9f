//! Per-node visibility rule shared by the resolver and the tree walker.

use uuid::Uuid;

use teamdrive_entity::{MemberRole, Node};

/// Whether `actor_id`, holding `role` in the node's team, may see `node`.
///
/// Owners and team owners/admins always can. Everyone else is subject to
/// the node's visibility: `Private` hides, `Specific` requires being on the
/// allow-list, `Team` shows.
pub fn can_see(node: &Node, actor_id: Uuid, role: Option<MemberRole>) -> bool {
    role.is_some_and(|r| r.bypasses_visibility()) || node.visible_to(actor_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use teamdrive_entity::{CreateNode, NodeType, Visibility};

    fn node_with(visibility: Visibility, owner: Uuid, allowed: Vec<Uuid>) -> Node {
        Node::from_create(
            Uuid::new_v4(),
            CreateNode {
                node_type: NodeType::File,
                parent_id: None,
                original_name: "x.txt".to_string(),
                owner_id: owner,
                project_id: Some(Uuid::new_v4()),
                team_id: Some(Uuid::new_v4()),
                visibility,
                allowed_user_ids: allowed,
            },
        )
    }

    /// Every combination of visibility, ownership, allow-list membership and
    /// role, checked against the rule written out longhand.
    #[test]
    fn test_exhaustive_visibility_matrix() {
        let actor = Uuid::from_u128(10);
        let other = Uuid::from_u128(20);
        let roles = [
            None,
            Some(MemberRole::Member),
            Some(MemberRole::Admin),
            Some(MemberRole::Owner),
        ];
        for visibility in [Visibility::Private, Visibility::Team, Visibility::Specific] {
            for owned in [false, true] {
                for listed in [false, true] {
                    for role in roles {
                        let owner = if owned { actor } else { other };
                        let allowed = if listed { vec![actor] } else { vec![other] };
                        let node = node_with(visibility, owner, allowed);

                        let expected = owned
                            || matches!(role, Some(MemberRole::Admin | MemberRole::Owner))
                            || visibility == Visibility::Team
                            || (visibility == Visibility::Specific && listed);
                        assert_eq!(
                            can_see(&node, actor, role),
                            expected,
                            "visibility={visibility} owned={owned} listed={listed} role={role:?}"
                        );
                    }
                }
            }
        }
    }
}
