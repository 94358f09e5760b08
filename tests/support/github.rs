//! Wiremock stand-ins for the GitHub endpoints the badge workflow calls.
//!
//! Every helper mounts on the `octo/badges` repository. Pull request numbers
//! are handed out sequentially starting at 1, so iteration `n` of a clean run
//! opens pull request `#n`.

use std::sync::atomic::{AtomicU64, Ordering};

use serde_json::json;
use wiremock::matchers::{method, path, path_regex};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

pub const BASE_SHA: &str = "b45e0000000000000000000000000000000000aa";
pub const FILE_COMMIT_SHA: &str = "c0ffee0000000000000000000000000000000001";
pub const MERGE_SHA: &str = "3e43e000000000000000000000000000000000ff";

pub fn repo_path(suffix: &str) -> String {
    format!("/repos/octo/badges{suffix}")
}

fn github_error(status: u16, message: &str) -> ResponseTemplate {
    ResponseTemplate::new(status).set_body_json(json!({
        "message": message,
        "documentation_url": "https://docs.github.com/rest"
    }))
}

/// Hands out increasing pull request numbers.
struct SequentialPullRequests {
    next: AtomicU64,
}

impl Respond for SequentialPullRequests {
    fn respond(&self, _request: &Request) -> ResponseTemplate {
        let number = self.next.fetch_add(1, Ordering::SeqCst);
        ResponseTemplate::new(201).set_body_json(json!({
            "number": number,
            "html_url": format!("https://github.com/octo/badges/pull/{number}"),
            "state": "open"
        }))
    }
}

pub async fn mount_repository(server: &MockServer, default_branch: &str) {
    Mock::given(method("GET"))
        .and(path(repo_path("")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 1,
            "full_name": "octo/badges",
            "default_branch": default_branch
        })))
        .mount(server)
        .await;
}

pub async fn mount_branch_head(server: &MockServer, branch: &str) {
    Mock::given(method("GET"))
        .and(path(repo_path(&format!("/git/ref/heads/{branch}"))))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ref": format!("refs/heads/{branch}"),
            "object": { "sha": BASE_SHA, "type": "commit" }
        })))
        .mount(server)
        .await;
}

pub async fn mount_create_ref(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path(repo_path("/git/refs")))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "ref": "refs/heads/new",
            "object": { "sha": BASE_SHA, "type": "commit" }
        })))
        .mount(server)
        .await;
}

pub async fn mount_contents(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path_regex(r"^/repos/octo/badges/contents/.+$"))
        .respond_with(github_error(404, "Not Found"))
        .mount(server)
        .await;

    Mock::given(method("PUT"))
        .and(path_regex(r"^/repos/octo/badges/contents/.+$"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "content": { "sha": "f11e000000000000000000000000000000000000" },
            "commit": { "sha": FILE_COMMIT_SHA }
        })))
        .mount(server)
        .await;
}

pub async fn mount_pull_requests(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path(repo_path("/pulls")))
        .respond_with(SequentialPullRequests {
            next: AtomicU64::new(1),
        })
        .mount(server)
        .await;
}

pub async fn mount_merges(server: &MockServer) {
    Mock::given(method("PUT"))
        .and(path_regex(r"^/repos/octo/badges/pulls/\d+/merge$"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "sha": MERGE_SHA,
            "merged": true,
            "message": "Pull Request successfully merged"
        })))
        .mount(server)
        .await;
}

/// Makes the merge of pull request `number` fail with 405.
pub async fn mount_merge_conflict(server: &MockServer, number: u64) {
    Mock::given(method("PUT"))
        .and(path(repo_path(&format!("/pulls/{number}/merge"))))
        .respond_with(github_error(405, "Pull Request is not mergeable"))
        .with_priority(1)
        .mount(server)
        .await;
}

/// Makes every call fail authentication.
pub async fn mount_bad_credentials(server: &MockServer) {
    Mock::given(path_regex(r"^/repos/octo/badges.*$"))
        .respond_with(github_error(401, "Bad credentials"))
        .mount(server)
        .await;
}

/// Mounts a repository whose every step succeeds using the contents API.
pub async fn mount_happy_repository(server: &MockServer) {
    mount_repository(server, "main").await;
    mount_branch_head(server, "main").await;
    mount_create_ref(server).await;
    mount_contents(server).await;
    mount_pull_requests(server).await;
    mount_merges(server).await;
}

/// Requests the server received for `http_method` on paths matching `suffix`.
pub async fn received(server: &MockServer, http_method: &str, suffix: &str) -> Vec<Request> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .into_iter()
        .filter(|request| request.method.as_str() == http_method)
        .filter(|request| request.url.path().ends_with(suffix))
        .collect()
}
