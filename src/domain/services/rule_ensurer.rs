//! Idempotent security rule creation
//!
//! The lookup and the create are two separate provider calls, so two runs
//! can both miss the lookup. The provider enforces name uniqueness per VPC;
//! a duplicate rejection means another run won and its group is returned.
//!
//! An existing group may be missing its permissions if an earlier run failed
//! between create and authorize, so the permissions are applied on every
//! path and an already-present permission counts as applied.

use tracing::{debug, info, warn};

use crate::domain::entities::SecurityRule;
use crate::domain::ports::{
    ProviderContext, SecurityRules, DUPLICATE_GROUP_CODE, DUPLICATE_PERMISSION_CODE,
};
use crate::error::{VawsError, VawsResult};

/// Return the id of the group named `rule.name` in `vpc_id`, creating it if
/// it does not exist and making sure it carries every permission of `rule`.
pub fn ensure_security_rule(
    rules: &dyn SecurityRules,
    ctx: &ProviderContext,
    vpc_id: &str,
    rule: &SecurityRule,
) -> VawsResult<String> {
    let id = match rules.find_group(ctx, vpc_id, &rule.name)? {
        Some(id) => {
            debug!(group = %rule.name, group_id = %id, "security group already exists");
            id
        }
        None => match rules.create_group(ctx, vpc_id, rule) {
            Ok(id) => {
                info!(group = %rule.name, group_id = %id, vpc_id, region = %ctx.region, "created security group");
                id
            }
            Err(err) if has_code(&err, DUPLICATE_GROUP_CODE) => {
                warn!(group = %rule.name, vpc_id, "security group was created concurrently; reusing it");
                rules.find_group(ctx, vpc_id, &rule.name)?.ok_or_else(|| {
                    VawsError::not_found(
                        "security group",
                        format!("'{}' reported as duplicate but not found in {}", rule.name, vpc_id),
                    )
                })?
            }
            Err(err) => return Err(err),
        },
    };

    for permission in &rule.ingress {
        match rules.authorize_ingress(ctx, &id, permission) {
            Ok(()) => {
                debug!(group_id = %id, protocol = %permission.protocol, port = permission.from_port, "authorized ingress");
            }
            Err(err) if has_code(&err, DUPLICATE_PERMISSION_CODE) => {}
            Err(err) => return Err(err),
        }
    }

    Ok(id)
}

fn has_code(err: &VawsError, expected: &str) -> bool {
    matches!(err, VawsError::Provider { code: Some(code), .. } if code == expected)
}
