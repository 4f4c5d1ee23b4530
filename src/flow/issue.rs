use clap::{Args, Subcommand};

use crate::config::Config;
use crate::git::Repo;
use crate::gitlab::{GitLabClient, Issue, Project};
use crate::output::{Renderer, StatusKind};
use crate::repo::branch::ensure_branch;

use super::{FlowError, Result, parse_id, resolve_project};

#[derive(Subcommand, Clone, PartialEq, Eq)]
pub enum IssueCommands {
    /// List issues of the current repository's project
    List(ListIssuesArgs),

    /// Close an issue
    Close {
        /// Issue ID
        id: String,
    },

    /// Reopen an issue
    Reopen {
        /// Issue ID
        id: String,
    },

    /// Create and switch to the working branch for an issue
    Patch {
        /// Issue ID
        id: String,
    },
}

#[derive(Args, Clone, PartialEq, Eq)]
pub struct ListIssuesArgs {
    /// Include closed issues
    #[arg(long)]
    pub all: bool,

    /// List issues assigned to you, across projects
    #[arg(long)]
    pub mine: bool,
}

#[tokio::main]
pub async fn run(cmd: &IssueCommands, config: &Config) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let client = GitLabClient::new(&config.gitlab, config.proxy.as_deref())?;
    let renderer = Renderer::auto();

    match cmd {
        IssueCommands::List(args) => list_issues(&client, config, args, &renderer).await?,
        IssueCommands::Close { id } => edit_state(&client, config, id, "close", &renderer).await?,
        IssueCommands::Reopen { id } => edit_state(&client, config, id, "reopen", &renderer).await?,
        IssueCommands::Patch { id } => patch(&client, config, id, &renderer).await?,
    }

    Ok(())
}

/// Print one issue; `project` adds the cross-project context shown for
/// assigned-issue listings.
fn print_issue(renderer: &Renderer, issue: &Issue, project: Option<&Project>) {
    renderer.line(StatusKind::Info, &format!("TITLE: {}", issue.title));
    renderer.line(StatusKind::Good, &format!("ID: {}", issue.iid));
    if let Some(project) = project {
        renderer.line(StatusKind::Good, &format!("URL: {}", project.web_url));
        renderer.line(
            StatusKind::Info,
            &format!("REPO: {}", project.description.as_deref().unwrap_or("")),
        );
    }
    renderer.line(
        StatusKind::Good,
        &format!("WHAT: {}", issue.description.as_deref().unwrap_or("")),
    );
    renderer.line(StatusKind::Good, &format!("STATE: {}", issue.state));
    renderer.line(StatusKind::Info, &format!("AUTHOR: {}", issue.author_name()));
    if let Some(assignee) = &issue.assignee {
        renderer.line(StatusKind::Good, &format!("ASSIGNEE: {}", assignee.name));
    }
    println!("{}", "-".repeat(80));
}

async fn list_issues(
    client: &GitLabClient,
    config: &Config,
    args: &ListIssuesArgs,
    renderer: &Renderer,
) -> Result<()> {
    let issues = if args.mine {
        client.assigned_issues().await?
    } else {
        let repo = Repo::open_current(config.proxy.clone())?;
        let project = resolve_project(&repo, client).await?;
        client.project_issues(project.id).await?
    };

    let mut shown = 0;
    for issue in &issues {
        if !args.all && issue.is_closed() {
            continue;
        }
        shown += 1;
        if args.mine {
            // Assigned issues span projects; show where each one lives.
            let project = client.project_by_id(issue.project_id).await?;
            print_issue(renderer, issue, Some(&project));
        } else {
            print_issue(renderer, issue, None);
        }
    }

    if shown == 0 {
        renderer.line(StatusKind::Info, "No issues found");
    }
    Ok(())
}

async fn edit_state(
    client: &GitLabClient,
    config: &Config,
    id: &str,
    state_event: &str,
    renderer: &Renderer,
) -> Result<()> {
    let iid = parse_id(id, "Issue ID")?;
    let repo = Repo::open_current(config.proxy.clone())?;
    let project = resolve_project(&repo, client).await?;

    let issue = client
        .edit_issue_state(project.id, iid, state_event)
        .await
        .map_err(|e| {
            if e.is_not_found() {
                FlowError::NotFound(format!("Issue {iid} not found"))
            } else {
                e.into()
            }
        })?;

    if issue.is_closed() {
        renderer.line(StatusKind::Good, &format!("Issue {iid} closed"));
    } else {
        renderer.line(StatusKind::Good, &format!("Issue {iid} reopened"));
    }
    Ok(())
}

/// Workflow for resolving an issue, step 1: open its working branch.
async fn patch(
    client: &GitLabClient,
    config: &Config,
    id: &str,
    renderer: &Renderer,
) -> Result<()> {
    let iid = parse_id(id, "Issue ID")?;
    let repo = Repo::open_current(config.proxy.clone())?;
    let project = resolve_project(&repo, client).await?;

    let issue = client.project_issue(project.id, iid).await.map_err(|e| {
        if e.is_not_found() {
            FlowError::NotFound(format!("Issue {iid} not found"))
        } else {
            e.into()
        }
    })?;

    if issue.project_id != project.id {
        return Err(FlowError::Validation(format!(
            "Issue {iid} does not belong to project {}",
            project.path_with_namespace
        )));
    }

    ensure_branch(&repo, Some(&format!("issue_{iid}")), renderer)?;
    Ok(())
}
