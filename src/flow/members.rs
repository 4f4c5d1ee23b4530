use clap::Args;

use crate::config::Config;
use crate::gitlab::GitLabClient;
use crate::output::{Renderer, StatusKind};

use super::{FlowError, Result};

#[derive(Args, Clone, PartialEq, Eq)]
pub struct MembersArgs {}

/// List the configured group's members (assignee IDs for `mr submit`).
#[tokio::main]
pub async fn run(_args: &MembersArgs, config: &Config) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let client = GitLabClient::new(&config.gitlab, config.proxy.as_deref())?;
    let renderer = Renderer::auto();
    list_members(&client, config, &renderer).await?;
    Ok(())
}

async fn list_members(client: &GitLabClient, config: &Config, renderer: &Renderer) -> Result<()> {
    let group = config.gitlab.group.as_deref().ok_or_else(|| {
        FlowError::Validation("No group configured (set gitlab.group in the config file)".to_string())
    })?;

    for member in client.group_members(group).await? {
        renderer.line(StatusKind::Info, &format!("Name: {}", member.name));
        renderer.line(StatusKind::Good, &format!("ID: {}", member.id));
    }
    Ok(())
}
