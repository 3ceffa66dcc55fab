// ABOUTME: Best-effort rollback of a failed deployment.
// ABOUTME: Deletes the resource group; failures are logged, never returned.

use crate::azure::ResourceGroupOps;
use crate::types::ResourceGroupName;

/// Delete `group` after a failed attempt.
///
/// The caller is already propagating the original failure, so a rollback
/// error is only logged. A group that does not exist is treated as deleted.
pub async fn rollback_group<P>(provider: &P, group: &ResourceGroupName)
where
    P: ResourceGroupOps + ?Sized,
{
    tracing::info!(group = %group, "rolling back resource group");
    match provider.delete_group(group).await {
        Ok(()) => tracing::info!(group = %group, "rollback complete"),
        Err(e) => tracing::warn!(
            group = %group,
            error = %e,
            "rollback failed, resource group may still exist"
        ),
    }
}
