//! Periodic refresh of every configured Free Company.
//!
//! On each tick, every guild with a Free Company configured gets the same
//! reconcile-then-resync run as the admin refresh command. Failures are
//! logged and the loop carries on.

use std::time::Duration;

use tarubot_sync::refresh::refresh_free_company_members;
use tarubot_sync::SyncContext;
use tokio_util::sync::CancellationToken;

/// Run the refresh loop until `cancel` is triggered.
///
/// The first tick fires immediately.
pub async fn run(ctx: SyncContext, interval: Duration, cancel: CancellationToken) {
    tracing::info!(interval_secs = interval.as_secs(), "FC refresh job started");

    // `tokio::time::interval` panics on a zero period.
    let mut ticker = tokio::time::interval(interval.max(Duration::from_secs(1)));
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("FC refresh job stopping");
                break;
            }
            _ = ticker.tick() => {
                refresh_all(&ctx).await;
            }
        }
    }
}

/// One pass over all guild configurations. Returns the number of
/// Free Companies refreshed successfully.
pub async fn refresh_all(ctx: &SyncContext) -> usize {
    let configs = match ctx.store.list_guild_configs().await {
        Ok(configs) => configs,
        Err(e) => {
            tracing::error!(error = %e, "FC refresh: failed to list guild configs");
            return 0;
        }
    };

    let mut refreshed = 0;
    for config in configs {
        let Some(fc_id) = config.free_company_id.as_deref() else {
            continue;
        };

        match refresh_free_company_members(ctx, config.guild_id, fc_id).await {
            Ok(summary) => {
                refreshed += 1;
                tracing::info!(
                    guild_id = config.guild_id,
                    fc_id,
                    confirmed = summary.report.confirmed,
                    created = summary.report.created,
                    removed = summary.report.removed,
                    roles_evaluated = summary.roles_evaluated,
                    role_failures = summary.role_failures,
                    "FC refresh: guild done"
                );
            }
            Err(failure) => {
                tracing::error!(
                    guild_id = config.guild_id,
                    fc_id,
                    error = %failure,
                    "FC refresh: guild failed"
                );
            }
        }
    }

    if refreshed == 0 {
        tracing::debug!("FC refresh: nothing refreshed");
    }
    refreshed
}
