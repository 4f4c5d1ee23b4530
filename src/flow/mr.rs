use clap::{Args, Subcommand};

use crate::config::Config;
use crate::git::{self, Repo, SyncState};
use crate::gitlab::{GitLabClient, GitLabError};
use crate::output::{Renderer, StatusKind};
use crate::prompt::{Confirm, TerminalPrompt};

use super::{FlowError, Result, parse_id, resolve_project};

#[derive(Subcommand, Clone, PartialEq, Eq)]
pub enum MrCommands {
    /// List merge requests of the current repository's project
    List(ListMrArgs),

    /// Show a merge request's diff and comments
    Show {
        /// Merge request ID
        id: String,
    },

    /// Accept (merge) a merge request
    Accept {
        /// Merge request ID
        id: String,
    },

    /// Push the current branch and open a merge request for it
    Submit(SubmitArgs),
}

#[derive(Args, Clone, PartialEq, Eq)]
pub struct ListMrArgs {
    /// Include closed and merged merge requests
    #[arg(long)]
    pub all: bool,
}

#[derive(Args, Clone, PartialEq, Eq)]
pub struct SubmitArgs {
    /// Assignee user ID for the new merge request
    #[arg(long)]
    pub assignee: Option<String>,

    /// Merge request title (defaults to the last commit subject)
    #[arg(long)]
    pub title: Option<String>,
}

#[tokio::main]
pub async fn run(cmd: &MrCommands, config: &Config) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let client = GitLabClient::new(&config.gitlab, config.proxy.as_deref())?;
    let renderer = Renderer::auto();

    match cmd {
        MrCommands::List(args) => list_merge_requests(&client, config, args, &renderer).await?,
        MrCommands::Show { id } => show(&client, config, id, &renderer).await?,
        MrCommands::Accept { id } => accept(&client, config, id, &TerminalPrompt, &renderer).await?,
        MrCommands::Submit(args) => submit(&client, config, args, &renderer).await?,
    }

    Ok(())
}

async fn list_merge_requests(
    client: &GitLabClient,
    config: &Config,
    args: &ListMrArgs,
    renderer: &Renderer,
) -> Result<()> {
    let repo = Repo::open_current(config.proxy.clone())?;
    let project = resolve_project(&repo, client).await?;

    for mr in client.merge_requests(project.id).await? {
        if !args.all && mr.is_settled() {
            continue;
        }
        renderer.line(StatusKind::Info, &format!("TITLE: {}", mr.title));
        renderer.line(StatusKind::Good, &format!("BRANCH: {}", mr.source_branch));
        if let Some(assignee) = &mr.assignee {
            renderer.line(StatusKind::Good, &format!("ASSIGNEE: {}", assignee.name));
        }
        renderer.line(StatusKind::Good, &format!("ID: {}", mr.iid));
        renderer.line(StatusKind::Good, &format!("DATE: {}", mr.created_at));
        println!("{}", "-".repeat(80));
    }
    Ok(())
}

async fn show(
    client: &GitLabClient,
    config: &Config,
    id: &str,
    renderer: &Renderer,
) -> Result<()> {
    let iid = parse_id(id, "Merge request ID")?;
    let repo = Repo::open_current(config.proxy.clone())?;
    let project = resolve_project(&repo, client).await?;

    let details = client
        .merge_request_changes(project.id, iid)
        .await
        .map_err(|e| {
            if e.is_not_found() {
                FlowError::NotFound(format!("Merge request {iid} not found"))
            } else {
                e.into()
            }
        })?;

    renderer.line(StatusKind::Info, &format!("TITLE: {}", details.title));
    if let Some(author) = &details.author {
        renderer.line(StatusKind::Info, &format!("AUTHOR: {}", author.name));
    }
    renderer.line(StatusKind::Info, &format!("STATE: {}", details.state));
    renderer.line(StatusKind::Info, &format!("DATE: {}", details.created_at));
    renderer.line(StatusKind::Info, "DIFF:\n");
    for change in &details.changes {
        renderer.line(
            StatusKind::Muted,
            &format!("--- {}\n+++ {}", change.old_path, change.new_path),
        );
        println!("{}", change.diff);
    }

    renderer.line(StatusKind::Info, "COMMENTS:");
    for note in client.merge_request_notes(project.id, iid).await? {
        if note.system {
            continue;
        }
        println!("{}:", note.author.name);
        println!("{}\n{}", note.body, "-".repeat(40));
    }
    Ok(())
}

/// What came out of an accept request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AcceptOutcome {
    /// The user answered no; nothing was sent.
    Declined,
    /// Merged; the remote source branch can now be deleted.
    Merged { source_branch: String },
    /// The API refused (already merged/closed, missing, not allowed).
    Rejected { reason: String },
}

/// Confirm and accept a merge request. Pure orchestration over the client
/// and a [`Confirm`] provider, so tests drive it with a canned answer.
pub async fn accept_merge_request(
    client: &GitLabClient,
    project_id: u64,
    iid: u64,
    confirm: &dyn Confirm,
) -> Result<AcceptOutcome> {
    let approved = confirm.confirm(&format!("Should merge request {iid} be merged?"), false)?;
    if !approved {
        return Ok(AcceptOutcome::Declined);
    }

    match client.accept_merge_request(project_id, iid).await {
        Ok(mr) if mr.state == "merged" => Ok(AcceptOutcome::Merged {
            source_branch: mr.source_branch,
        }),
        Ok(mr) => Ok(AcceptOutcome::Rejected {
            reason: format!("merge request has state: {}", mr.state),
        }),
        Err(GitLabError::Status { status, message }) => Ok(AcceptOutcome::Rejected {
            reason: format!("{message} ({status})"),
        }),
        Err(e) => Err(e.into()),
    }
}

async fn accept(
    client: &GitLabClient,
    config: &Config,
    id: &str,
    confirm: &dyn Confirm,
    renderer: &Renderer,
) -> Result<()> {
    let iid = parse_id(id, "Merge request ID")?;
    let repo = Repo::open_current(config.proxy.clone())?;
    let project = resolve_project(&repo, client).await?;

    renderer.line(StatusKind::Good, "Start merge");
    match accept_merge_request(client, project.id, iid, confirm).await? {
        AcceptOutcome::Declined => {
            renderer.line(StatusKind::Info, "Merge aborted!");
        }
        AcceptOutcome::Merged { source_branch } => {
            renderer.line(
                StatusKind::Good,
                &format!("Merge complete. Remove {source_branch}"),
            );
            repo.run(&["push", "origin", "--delete", &source_branch])?;
        }
        AcceptOutcome::Rejected { reason } => {
            renderer.error_line(&format!("Merge request not merged: {reason}"));
        }
    }
    Ok(())
}

async fn submit(
    client: &GitLabClient,
    config: &Config,
    args: &SubmitArgs,
    renderer: &Renderer,
) -> Result<()> {
    let repo = Repo::open_current(config.proxy.clone())?;
    let branch = git::current_branch(&repo)?;
    let default = git::default_branch(&repo);

    if branch == default {
        return Err(FlowError::Validation(format!(
            "You can not open a merge request from the {default} branch. Switch to your issue branch first"
        )));
    }
    if !git::is_clean(&repo)? {
        println!("{}", git::short_status(&repo)?);
        return Err(FlowError::Validation(
            "You have uncommitted changes. Please commit them first".to_string(),
        ));
    }

    let assignee_id = args
        .assignee
        .as_deref()
        .map(|raw| parse_id(raw, "Assignee ID"))
        .transpose()?;

    // Already landed on the remote default branch? Then there is nothing
    // to submit.
    git::update_remote(&repo)?;
    let head = git::rev_parse(&repo, "HEAD")?;
    if git::is_commit_on_remote(&repo, &head, &default) {
        renderer.line(
            StatusKind::Warn,
            "Your local commit is already on the remote default branch. Aborting",
        );
        return Ok(());
    }

    let project = resolve_project(&repo, client).await?;
    renderer.line(StatusKind::Good, &format!("Branch: {branch}"));

    // Push when the source branch is missing on the remote, or when it
    // exists but carries unpushed local commits.
    let on_remote = client.remote_branch_exists(project.id, &branch).await?;
    let need_push = !on_remote || git::sync_state(&repo, &branch, &branch)? == SyncState::NeedsPush;

    if need_push {
        renderer.line(StatusKind::Info, &format!("Pushing to origin {branch}"));
        repo.run(&["push", "origin", &branch])?;
    } else {
        renderer.line(StatusKind::Info, "Local and remote are up-to-date.");
    }

    let title = match &args.title {
        Some(title) => title.clone(),
        None => repo.run(&["log", "--format=%s", "-n", "1"])?.trim().to_string(),
    };

    if client
        .open_merge_request_exists(project.id, &branch, &default)
        .await?
    {
        renderer.line(StatusKind::Info, "Merge request exists. Skipping");
    } else {
        renderer.line(StatusKind::Good, "Create a new merge request");
        client
            .create_merge_request(project.id, &branch, &default, &title, assignee_id)
            .await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::prompt::StaticAnswer;

    use super::*;

    fn mr_json(state: &str) -> serde_json::Value {
        json!({
            "id": 99,
            "iid": 4,
            "title": "t",
            "state": state,
            "source_branch": "issue_12",
            "target_branch": "master",
            "created_at": "2026-01-02T03:04:05Z",
            "author": null,
            "assignee": null,
        })
    }

    #[tokio::test]
    async fn declined_confirmation_sends_nothing() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/api/v4/projects/7/merge_requests/4/merge"))
            .respond_with(ResponseTemplate::new(200).set_body_json(mr_json("merged")))
            .expect(0)
            .mount(&server)
            .await;
        let client = GitLabClient::with_endpoint(&server.uri(), "t").unwrap();

        let outcome = accept_merge_request(&client, 7, 4, &StaticAnswer(false))
            .await
            .unwrap();
        assert_eq!(outcome, AcceptOutcome::Declined);
    }

    #[tokio::test]
    async fn approved_confirmation_merges_and_reports_source_branch() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/api/v4/projects/7/merge_requests/4/merge"))
            .respond_with(ResponseTemplate::new(200).set_body_json(mr_json("merged")))
            .expect(1)
            .mount(&server)
            .await;
        let client = GitLabClient::with_endpoint(&server.uri(), "t").unwrap();

        let outcome = accept_merge_request(&client, 7, 4, &StaticAnswer(true))
            .await
            .unwrap();
        assert_eq!(
            outcome,
            AcceptOutcome::Merged {
                source_branch: "issue_12".to_string()
            }
        );
    }

    #[tokio::test]
    async fn unmergeable_request_is_rejected_not_fatal() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/api/v4/projects/7/merge_requests/4/merge"))
            .respond_with(
                ResponseTemplate::new(405)
                    .set_body_json(json!({"message": "405 Method Not Allowed"})),
            )
            .mount(&server)
            .await;
        let client = GitLabClient::with_endpoint(&server.uri(), "t").unwrap();

        let outcome = accept_merge_request(&client, 7, 4, &StaticAnswer(true))
            .await
            .unwrap();
        match outcome {
            AcceptOutcome::Rejected { reason } => assert!(reason.contains("405")),
            other => panic!("expected Rejected, got: {other:?}"),
        }
    }
}
