use crate::{errors::Result, provider::Provider};

/// Terminates all "ids" with a single batched request.
/// Does not wait for the instances to reach the "terminated" state.
pub async fn decommission(provider: &dyn Provider, ids: &[String]) -> Result<()> {
    if ids.is_empty() {
        log::warn!("no instance to terminate, skipping...");
        return Ok(());
    }

    log::info!("terminating {} instance(s) {:?}", ids.len(), ids);
    provider.terminate_instances(ids).await?;
    log::info!("requested termination of {} instance(s)", ids.len());

    Ok(())
}
