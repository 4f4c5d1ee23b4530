//! GitLab v4 REST client.

use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};
use serde::de::DeserializeOwned;

use crate::config::GitLabConfig;

use super::error::{GitLabError, Result};
use super::models::{Issue, Member, MergeRequest, MergeRequestChanges, Note, Project};

/// Thin typed wrapper over the endpoints the workflow layer uses.
pub struct GitLabClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
}

/// Percent-encode one path segment (GitLab addresses projects by the
/// URL-encoded `namespace/project` string).
fn encode(segment: &str) -> String {
    utf8_percent_encode(segment, NON_ALPHANUMERIC).to_string()
}

impl GitLabClient {
    /// Build a client from configuration. URL and token are required.
    pub fn new(config: &GitLabConfig, proxy: Option<&str>) -> Result<Self> {
        let url = config.url.as_deref().ok_or(GitLabError::MissingUrl)?;
        let token = config.resolved_token().ok_or(GitLabError::MissingToken)?;

        let mut builder = reqwest::Client::builder();
        if let Some(proxy) = proxy {
            builder = builder.proxy(reqwest::Proxy::https(proxy)?);
        }

        Ok(Self {
            http: builder.build()?,
            base_url: format!("{}/api/v4", url.trim_end_matches('/')),
            token,
        })
    }

    /// Client against an explicit endpoint. Used by tests.
    #[cfg(test)]
    pub fn with_endpoint(url: &str, token: &str) -> Result<Self> {
        Ok(Self {
            http: reqwest::Client::builder().build()?,
            base_url: format!("{}/api/v4", url.trim_end_matches('/')),
            token: token.to_string(),
        })
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        self.http
            .request(method, format!("{}{path}", self.base_url))
            .header("PRIVATE-TOKEN", &self.token)
    }

    async fn parse<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        let status = response.status();
        if !status.is_success() {
            let message = error_message(response).await;
            return Err(GitLabError::Status {
                status: status.as_u16(),
                message,
            });
        }
        Ok(response.json().await?)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, &str)]) -> Result<T> {
        let response = self
            .request(reqwest::Method::GET, path)
            .query(query)
            .send()
            .await?;
        Self::parse(response).await
    }

    /// Look up a project by its `namespace/project` path.
    pub async fn project(&self, path_with_namespace: &str) -> Result<Project> {
        self.get(&format!("/projects/{}", encode(path_with_namespace)), &[])
            .await
    }

    pub async fn project_by_id(&self, id: u64) -> Result<Project> {
        self.get(&format!("/projects/{id}"), &[]).await
    }

    /// All projects visible to the caller (first page, large page size).
    pub async fn projects(&self) -> Result<Vec<Project>> {
        self.get("/projects", &[("membership", "true"), ("per_page", "100")])
            .await
    }

    pub async fn project_issues(&self, project_id: u64) -> Result<Vec<Issue>> {
        self.get(
            &format!("/projects/{project_id}/issues"),
            &[("per_page", "100")],
        )
        .await
    }

    /// Issues assigned to the authenticated user, across projects.
    pub async fn assigned_issues(&self) -> Result<Vec<Issue>> {
        self.get("/issues", &[("scope", "assigned_to_me"), ("per_page", "100")])
            .await
    }

    pub async fn project_issue(&self, project_id: u64, iid: u64) -> Result<Issue> {
        self.get(&format!("/projects/{project_id}/issues/{iid}"), &[])
            .await
    }

    /// Close or reopen an issue.
    pub async fn edit_issue_state(
        &self,
        project_id: u64,
        iid: u64,
        state_event: &str,
    ) -> Result<Issue> {
        let response = self
            .request(
                reqwest::Method::PUT,
                &format!("/projects/{project_id}/issues/{iid}"),
            )
            .json(&serde_json::json!({ "state_event": state_event }))
            .send()
            .await?;
        Self::parse(response).await
    }

    pub async fn merge_requests(&self, project_id: u64) -> Result<Vec<MergeRequest>> {
        self.get(
            &format!("/projects/{project_id}/merge_requests"),
            &[("per_page", "100")],
        )
        .await
    }

    /// Whether an open merge request already exists for this branch pair.
    pub async fn open_merge_request_exists(
        &self,
        project_id: u64,
        source_branch: &str,
        target_branch: &str,
    ) -> Result<bool> {
        let open: Vec<MergeRequest> = self
            .get(
                &format!("/projects/{project_id}/merge_requests"),
                &[
                    ("state", "opened"),
                    ("source_branch", source_branch),
                    ("target_branch", target_branch),
                ],
            )
            .await?;
        Ok(!open.is_empty())
    }

    pub async fn merge_request_changes(
        &self,
        project_id: u64,
        iid: u64,
    ) -> Result<MergeRequestChanges> {
        self.get(
            &format!("/projects/{project_id}/merge_requests/{iid}/changes"),
            &[],
        )
        .await
    }

    pub async fn merge_request_notes(&self, project_id: u64, iid: u64) -> Result<Vec<Note>> {
        self.get(
            &format!("/projects/{project_id}/merge_requests/{iid}/notes"),
            &[("per_page", "100")],
        )
        .await
    }

    pub async fn create_merge_request(
        &self,
        project_id: u64,
        source_branch: &str,
        target_branch: &str,
        title: &str,
        assignee_id: Option<u64>,
    ) -> Result<MergeRequest> {
        let mut body = serde_json::json!({
            "source_branch": source_branch,
            "target_branch": target_branch,
            "title": title,
        });
        if let Some(id) = assignee_id {
            body["assignee_id"] = serde_json::json!(id);
        }

        let response = self
            .request(
                reqwest::Method::POST,
                &format!("/projects/{project_id}/merge_requests"),
            )
            .json(&body)
            .send()
            .await?;
        Self::parse(response).await
    }

    /// Accept (merge) a merge request.
    pub async fn accept_merge_request(&self, project_id: u64, iid: u64) -> Result<MergeRequest> {
        let response = self
            .request(
                reqwest::Method::PUT,
                &format!("/projects/{project_id}/merge_requests/{iid}/merge"),
            )
            .send()
            .await?;
        Self::parse(response).await
    }

    /// Whether `branch` exists on the remote repository.
    pub async fn remote_branch_exists(&self, project_id: u64, branch: &str) -> Result<bool> {
        let result: Result<serde_json::Value> = self
            .get(
                &format!("/projects/{project_id}/repository/branches/{}", encode(branch)),
                &[],
            )
            .await;
        match result {
            Ok(_) => Ok(true),
            Err(e) if e.is_not_found() => Ok(false),
            Err(e) => Err(e),
        }
    }

    pub async fn group_members(&self, group: &str) -> Result<Vec<Member>> {
        self.get(
            &format!("/groups/{}/members", encode(group)),
            &[("per_page", "100")],
        )
        .await
    }
}

/// Pull a human-readable message out of an error response body.
async fn error_message(response: reqwest::Response) -> String {
    let text = response.text().await.unwrap_or_default();
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(&text) {
        for key in ["message", "error"] {
            if let Some(message) = value.get(key) {
                if let Some(s) = message.as_str() {
                    return s.to_string();
                }
                return message.to_string();
            }
        }
    }
    text
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{body_string_contains, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    async fn client(server: &MockServer) -> GitLabClient {
        GitLabClient::with_endpoint(&server.uri(), "test-token").unwrap()
    }

    fn project_json(id: u64) -> serde_json::Value {
        json!({
            "id": id,
            "path_with_namespace": "ops/infra",
            "web_url": "https://gitlab.example.com/ops/infra",
            "description": "fleet member",
            "default_branch": "master",
            "ssh_url_to_repo": "git@gitlab.example.com:ops/infra.git",
            "http_url_to_repo": "https://gitlab.example.com/ops/infra.git",
        })
    }

    #[tokio::test]
    async fn project_lookup_percent_encodes_the_path() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v4/projects/ops%2Finfra"))
            .respond_with(ResponseTemplate::new(200).set_body_json(project_json(7)))
            .expect(1)
            .mount(&server)
            .await;

        let project = client(&server).await.project("ops/infra").await.unwrap();
        assert_eq!(project.id, 7);
        assert_eq!(project.path_with_namespace, "ops/infra");
    }

    #[tokio::test]
    async fn requests_carry_the_private_token_header() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v4/projects/7/issues"))
            .and(wiremock::matchers::header("PRIVATE-TOKEN", "test-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(1)
            .mount(&server)
            .await;

        let issues = client(&server).await.project_issues(7).await.unwrap();
        assert!(issues.is_empty());
    }

    #[tokio::test]
    async fn edit_issue_state_sends_the_state_event() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/api/v4/projects/7/issues/12"))
            .and(body_string_contains("state_event"))
            .and(body_string_contains("close"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "iid": 12,
                "project_id": 7,
                "title": "t",
                "description": null,
                "state": "closed",
                "author": null,
                "assignee": null,
            })))
            .expect(1)
            .mount(&server)
            .await;

        let issue = client(&server)
            .await
            .edit_issue_state(7, 12, "close")
            .await
            .unwrap();
        assert_eq!(issue.state, "closed");
    }

    #[tokio::test]
    async fn create_merge_request_posts_branches_and_title() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v4/projects/7/merge_requests"))
            .and(body_string_contains("issue_12"))
            .and(body_string_contains("Fix the flux capacitor"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "id": 99,
                "iid": 4,
                "title": "Fix the flux capacitor",
                "state": "opened",
                "source_branch": "issue_12",
                "target_branch": "master",
                "created_at": "2026-01-02T03:04:05Z",
                "author": null,
                "assignee": null,
            })))
            .expect(1)
            .mount(&server)
            .await;

        let mr = client(&server)
            .await
            .create_merge_request(7, "issue_12", "master", "Fix the flux capacitor", Some(3))
            .await
            .unwrap();
        assert_eq!(mr.iid, 4);
        assert_eq!(mr.source_branch, "issue_12");
    }

    #[tokio::test]
    async fn accept_merge_request_reports_the_merged_state() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/api/v4/projects/7/merge_requests/4/merge"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": 99,
                "iid": 4,
                "title": "t",
                "state": "merged",
                "source_branch": "issue_12",
                "target_branch": "master",
                "created_at": "2026-01-02T03:04:05Z",
                "author": null,
                "assignee": null,
            })))
            .expect(1)
            .mount(&server)
            .await;

        let mr = client(&server).await.accept_merge_request(7, 4).await.unwrap();
        assert_eq!(mr.state, "merged");
    }

    #[tokio::test]
    async fn remote_branch_exists_maps_404_to_false() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v4/projects/7/repository/branches/issue%5F12"))
            .respond_with(
                ResponseTemplate::new(404).set_body_json(json!({"message": "404 Branch Not Found"})),
            )
            .mount(&server)
            .await;

        let exists = client(&server)
            .await
            .remote_branch_exists(7, "issue_12")
            .await
            .unwrap();
        assert!(!exists);
    }

    #[tokio::test]
    async fn open_merge_request_exists_checks_the_branch_pair() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v4/projects/7/merge_requests"))
            .and(query_param("state", "opened"))
            .and(query_param("source_branch", "issue_12"))
            .and(query_param("target_branch", "master"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
                "id": 99,
                "iid": 4,
                "title": "t",
                "state": "opened",
                "source_branch": "issue_12",
                "target_branch": "master",
                "created_at": "2026-01-02T03:04:05Z",
                "author": null,
                "assignee": null,
            }])))
            .expect(1)
            .mount(&server)
            .await;

        let exists = client(&server)
            .await
            .open_merge_request_exists(7, "issue_12", "master")
            .await
            .unwrap();
        assert!(exists);
    }

    #[tokio::test]
    async fn api_errors_carry_status_and_message() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v4/projects/7/issues/99"))
            .respond_with(
                ResponseTemplate::new(404).set_body_json(json!({"message": "404 Issue Not Found"})),
            )
            .mount(&server)
            .await;

        let err = client(&server).await.project_issue(7, 99).await.unwrap_err();
        match err {
            GitLabError::Status { status, message } => {
                assert_eq!(status, 404);
                assert_eq!(message, "404 Issue Not Found");
            }
            other => panic!("expected Status error, got: {other:?}"),
        }
    }

    #[tokio::test]
    async fn group_members_are_listed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v4/groups/ops/members"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": 1, "name": "Alice Ops", "username": "alice"},
                {"id": 2, "name": "Bob Ops", "username": "bob"},
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let members = client(&server).await.group_members("ops").await.unwrap();
        assert_eq!(members.len(), 2);
        assert_eq!(members[0].name, "Alice Ops");
    }
}
