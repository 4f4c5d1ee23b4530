use std::collections::HashSet;

use clap::Args;

use crate::config::{Config, resolve_repos_root};
use crate::fleet::scan::discover_repos;
use crate::git::Repo;
use crate::gitlab::{GitLabClient, Project};
use crate::output::{Renderer, StatusKind};

#[derive(Args, Clone, PartialEq, Eq)]
pub struct MissingArgs {}

/// Compare the fleet's `origin` URLs against the projects visible through
/// the API and show projects that have no local clone.
#[tokio::main]
pub async fn run(_args: &MissingArgs, config: &Config) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let client = GitLabClient::new(&config.gitlab, config.proxy.as_deref())?;
    let renderer = Renderer::auto();

    let root = resolve_repos_root(config.repos_root.as_deref())?;
    let local_urls = collect_local_urls(config, &root);
    let projects = client.projects().await?;

    renderer.line(
        StatusKind::Fail,
        "WARNING: This list might be inaccurate!\n\
         It lists remote projects that are not cloned under the fleet root.\n\
         That might be ok!\n",
    );

    for project in missing_projects(&projects, &local_urls) {
        let url = project
            .ssh_url_to_repo
            .as_deref()
            .unwrap_or(&project.web_url);
        renderer.line(StatusKind::Good, url);
        renderer.line(
            StatusKind::Warn,
            &format!("{}\n", project.description.as_deref().unwrap_or("")),
        );
    }
    Ok(())
}

/// `origin` URLs of every clone under the fleet root. Repositories without
/// an `origin` are simply skipped.
fn collect_local_urls(config: &Config, root: &std::path::Path) -> HashSet<String> {
    discover_repos(root)
        .into_iter()
        .filter_map(|path| {
            let repo = Repo::new(path).with_proxy(config.proxy.clone());
            repo.run(&["config", "--get", "remote.origin.url"])
                .ok()
                .map(|url| url.trim().to_string())
        })
        .collect()
}

fn missing_projects<'a>(
    projects: &'a [Project],
    local_urls: &HashSet<String>,
) -> Vec<&'a Project> {
    projects
        .iter()
        .filter(|p| !p.remote_urls().any(|url| local_urls.contains(url)))
        .collect()
}
