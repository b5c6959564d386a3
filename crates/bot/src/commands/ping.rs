use async_trait::async_trait;
use tarubot_sync::SyncContext;

use super::{Command, Invocation, Reply};

pub struct PingCommand;

#[async_trait]
impl Command for PingCommand {
    fn name(&self) -> &'static str {
        "ping"
    }

    fn description(&self) -> &'static str {
        "Ping the bot to check if it is alive."
    }

    async fn execute(&self, _ctx: &SyncContext, _invocation: &Invocation) -> Reply {
        Reply::private("Pong!")
    }
}
