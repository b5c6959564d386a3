//! `/admin refresh_fc_members` (guild only)

use async_trait::async_trait;
use tarubot_core::types::is_lodestone_id;
use tarubot_sync::refresh::{refresh_free_company_members, RefreshSummary};
use tarubot_sync::SyncContext;

use super::{Command, Invocation, Reply};

pub struct AdminCommand;

#[async_trait]
impl Command for AdminCommand {
    fn name(&self) -> &'static str {
        "admin"
    }

    fn description(&self) -> &'static str {
        "Administrative commands for bot management."
    }

    async fn execute(&self, ctx: &SyncContext, invocation: &Invocation) -> Reply {
        let Some(guild_id) = invocation.guild_id else {
            return Reply::guild_only();
        };

        match invocation.subcommand.as_deref() {
            Some("refresh_fc_members") => {}
            _ => return Reply::unknown_subcommand(),
        }

        let Some(fc_id) = invocation.get("fc_id") else {
            return Reply::missing_option("fc_id");
        };
        if !is_lodestone_id(fc_id) {
            return Reply::private(format!("`{fc_id}` is not a valid Free Company ID."));
        }

        match refresh_free_company_members(ctx, guild_id, fc_id).await {
            Ok(summary) => Reply::private(summary_message(&summary)),
            Err(failure) if failure.error.is_not_found() => Reply::private(format!(
                "Free Company with ID {fc_id} not found on Lodestone."
            )),
            Err(failure) => {
                let partial = &failure.partial;
                Reply::private(format!(
                    "FC member refresh for {fc_id} stopped early after {} confirmed, {} added and {} removed. \
                     Running it again will finish the job.",
                    partial.confirmed, partial.created, partial.removed
                ))
            }
        }
    }
}

fn summary_message(summary: &RefreshSummary) -> String {
    let report = &summary.report;
    let name = report
        .free_company_name
        .as_deref()
        .unwrap_or(report.free_company_id.as_str());

    let mut message = format!(
        "FC member refresh for {name} (ID: {}) complete.\n\
         - Members updated/confirmed in FC: {}\n\
         - New members found in FC and added: {}\n\
         - Members no longer in FC: {}\n\
         - Roles of affected users re-evaluated: {}",
        report.free_company_id,
        report.confirmed,
        report.created,
        report.removed,
        summary.roles_evaluated,
    );
    if summary.role_failures > 0 {
        message.push_str(&format!(
            "\n- Role updates that failed: {}",
            summary.role_failures
        ));
    }
    message
}
