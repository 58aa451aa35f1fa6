use std::collections::HashMap;
use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header;
use serde::Deserialize;
use serde_json::json;

use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::types::{
    Commit, Diff, MergeResult, ObjectStats, Page, RefSummary, RepositorySummary,
};

/// A byte range for partial object reads, rendered as an HTTP `Range`
/// header. `Span` bounds are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteRange {
    /// `bytes=start-end`
    Span(u64, u64),
    /// `bytes=start-`
    From(u64),
    /// `bytes=-count` (the last `count` bytes)
    Suffix(u64),
}

impl ByteRange {
    pub fn header_value(&self) -> String {
        match self {
            ByteRange::Span(start, end) => format!("bytes={}-{}", start, end),
            ByteRange::From(start) => format!("bytes={}-", start),
            ByteRange::Suffix(count) => format!("bytes=-{}", count),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// A typed client for the versioning API.
///
/// One method per endpoint, direct status-to-error mapping, and nothing
/// cached: every call is one HTTP round trip. Cheap to clone (the
/// underlying connection pool is shared).
#[derive(Debug, Clone)]
pub struct LakeClient {
    http: Client,
    config: ClientConfig,
}

impl LakeClient {
    /// Build a client from the given connection settings.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );
        let http = Client::builder()
            .user_agent(concat!("lakefs-fs/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .timeout(Duration::from_secs(60))
            .build()?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn base(&self) -> &str {
        &self.config.endpoint
    }

    /// Attach credentials, send, and map non-success statuses onto crate
    /// errors. `context` labels the resource for error messages.
    fn send(&self, request: RequestBuilder, context: &str) -> Result<Response> {
        let response = request
            .basic_auth(
                &self.config.access_key_id,
                Some(&self.config.secret_access_key),
            )
            .send()?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = error_message(response);
        Err(match status.as_u16() {
            401 | 403 => Error::unauthorized(message),
            404 => Error::not_found(context.to_string()),
            409 => Error::conflict(format!("{}: {}", context, message)),
            code => Error::api(code, message),
        })
    }

    // -----------------------------------------------------------------------
    // Repositories
    // -----------------------------------------------------------------------

    pub fn get_repository(&self, repository: &str) -> Result<RepositorySummary> {
        let url = format!("{}/repositories/{}", self.base(), repository);
        let response = self.send(self.http.get(url), repository)?;
        Ok(response.json()?)
    }

    pub fn list_repositories(
        &self,
        after: Option<&str>,
        amount: Option<u64>,
    ) -> Result<Page<RepositorySummary>> {
        let url = format!("{}/repositories", self.base());
        let query = paging_query(&[], after, amount);
        let response = self.send(self.http.get(url).query(&query), "repositories")?;
        Ok(response.json()?)
    }

    // -----------------------------------------------------------------------
    // Objects
    // -----------------------------------------------------------------------

    pub fn stat_object(
        &self,
        repository: &str,
        reference: &str,
        path: &str,
    ) -> Result<ObjectStats> {
        let url = format!(
            "{}/repositories/{}/refs/{}/objects/stat",
            self.base(),
            repository,
            reference,
        );
        let context = object_context(repository, reference, path);
        let response = self.send(self.http.get(url).query(&[("path", path)]), &context)?;
        Ok(response.json()?)
    }

    pub fn get_object(
        &self,
        repository: &str,
        reference: &str,
        path: &str,
        range: Option<&ByteRange>,
    ) -> Result<Vec<u8>> {
        let url = format!(
            "{}/repositories/{}/refs/{}/objects",
            self.base(),
            repository,
            reference,
        );
        let mut request = self.http.get(url).query(&[("path", path)]);
        if let Some(range) = range {
            request = request.header(header::RANGE, range.header_value());
        }
        let context = object_context(repository, reference, path);
        let response = self.send(request, &context)?;
        Ok(response.bytes()?.to_vec())
    }

    pub fn upload_object(
        &self,
        repository: &str,
        branch: &str,
        path: &str,
        data: Vec<u8>,
        content_type: Option<&str>,
    ) -> Result<ObjectStats> {
        let url = format!(
            "{}/repositories/{}/branches/{}/objects",
            self.base(),
            repository,
            branch,
        );
        let context = object_context(repository, branch, path);
        let request = self
            .http
            .post(url)
            .query(&[("path", path)])
            .header(
                header::CONTENT_TYPE,
                content_type.unwrap_or("application/octet-stream"),
            )
            .body(data);
        let response = self.send(request, &context)?;
        Ok(response.json()?)
    }

    pub fn delete_object(&self, repository: &str, branch: &str, path: &str) -> Result<()> {
        let url = format!(
            "{}/repositories/{}/branches/{}/objects",
            self.base(),
            repository,
            branch,
        );
        let context = object_context(repository, branch, path);
        self.send(self.http.delete(url).query(&[("path", path)]), &context)?;
        Ok(())
    }

    /// Delete up to [`Self::DELETE_BATCH_MAX`] objects in one request.
    pub fn delete_objects(&self, repository: &str, branch: &str, paths: &[String]) -> Result<()> {
        let url = format!(
            "{}/repositories/{}/branches/{}/objects/delete",
            self.base(),
            repository,
            branch,
        );
        let context = format!("{}/{}", repository, branch);
        let request = self.http.post(url).json(&json!({ "paths": paths }));
        self.send(request, &context)?;
        Ok(())
    }

    pub fn copy_object(
        &self,
        repository: &str,
        branch: &str,
        dest_path: &str,
        src_ref: &str,
        src_path: &str,
    ) -> Result<ObjectStats> {
        let url = format!(
            "{}/repositories/{}/branches/{}/objects/copy",
            self.base(),
            repository,
            branch,
        );
        let context = object_context(repository, branch, dest_path);
        let request = self
            .http
            .post(url)
            .query(&[("dest_path", dest_path)])
            .json(&json!({ "src_path": src_path, "src_ref": src_ref }));
        let response = self.send(request, &context)?;
        Ok(response.json()?)
    }

    pub fn list_objects(
        &self,
        repository: &str,
        reference: &str,
        prefix: &str,
        delimiter: Option<&str>,
        after: Option<&str>,
        amount: Option<u64>,
    ) -> Result<Page<ObjectStats>> {
        let url = format!(
            "{}/repositories/{}/refs/{}/objects/ls",
            self.base(),
            repository,
            reference,
        );
        let mut query = vec![("prefix", prefix.to_string())];
        if let Some(delimiter) = delimiter {
            query.push(("delimiter", delimiter.to_string()));
        }
        let query = paging_query(&query, after, amount);
        let context = format!("{}/{}", repository, reference);
        let response = self.send(self.http.get(url).query(&query), &context)?;
        Ok(response.json()?)
    }

    /// Page through a listing until exhausted.
    pub fn list_all_objects(
        &self,
        repository: &str,
        reference: &str,
        prefix: &str,
        delimiter: Option<&str>,
    ) -> Result<Vec<ObjectStats>> {
        let mut out = Vec::new();
        let mut after: Option<String> = None;
        loop {
            let page = self.list_objects(
                repository,
                reference,
                prefix,
                delimiter,
                after.as_deref(),
                None,
            )?;
            out.extend(page.results);
            if !page.pagination.has_more {
                return Ok(out);
            }
            after = Some(page.pagination.next_offset);
        }
    }

    // -----------------------------------------------------------------------
    // Branches
    // -----------------------------------------------------------------------

    pub fn get_branch(&self, repository: &str, branch: &str) -> Result<RefSummary> {
        let url = format!(
            "{}/repositories/{}/branches/{}",
            self.base(),
            repository,
            branch,
        );
        let context = format!("{}/{}", repository, branch);
        let response = self.send(self.http.get(url), &context)?;
        Ok(response.json()?)
    }

    pub fn create_branch(&self, repository: &str, name: &str, source: &str) -> Result<RefSummary> {
        let url = format!("{}/repositories/{}/branches", self.base(), repository);
        let context = format!("{}/{}", repository, name);
        let request = self
            .http
            .post(url)
            .json(&json!({ "name": name, "source": source }));
        let response = self.send(request, &context)?;
        Ok(response.json()?)
    }

    pub fn delete_branch(&self, repository: &str, branch: &str) -> Result<()> {
        let url = format!(
            "{}/repositories/{}/branches/{}",
            self.base(),
            repository,
            branch,
        );
        let context = format!("{}/{}", repository, branch);
        self.send(self.http.delete(url), &context)?;
        Ok(())
    }

    pub fn list_branches(
        &self,
        repository: &str,
        after: Option<&str>,
        amount: Option<u64>,
    ) -> Result<Page<RefSummary>> {
        let url = format!("{}/repositories/{}/branches", self.base(), repository);
        let query = paging_query(&[], after, amount);
        let response = self.send(self.http.get(url).query(&query), repository)?;
        Ok(response.json()?)
    }

    /// Uncommitted changes on a branch.
    pub fn diff_branch(
        &self,
        repository: &str,
        branch: &str,
        after: Option<&str>,
        amount: Option<u64>,
    ) -> Result<Page<Diff>> {
        let url = format!(
            "{}/repositories/{}/branches/{}/diff",
            self.base(),
            repository,
            branch,
        );
        let query = paging_query(&[], after, amount);
        let context = format!("{}/{}", repository, branch);
        let response = self.send(self.http.get(url).query(&query), &context)?;
        Ok(response.json()?)
    }

    /// Discard the changes of the head commit (or a merge parent of it)
    /// by committing its inverse onto the branch.
    pub fn revert_branch(
        &self,
        repository: &str,
        branch: &str,
        reference: &str,
        parent_number: u32,
    ) -> Result<()> {
        let url = format!(
            "{}/repositories/{}/branches/{}/revert",
            self.base(),
            repository,
            branch,
        );
        let context = format!("{}/{}", repository, branch);
        let request = self
            .http
            .post(url)
            .json(&json!({ "ref": reference, "parent_number": parent_number }));
        self.send(request, &context)?;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Commits and diffs
    // -----------------------------------------------------------------------

    pub fn commit(
        &self,
        repository: &str,
        branch: &str,
        message: &str,
        metadata: &HashMap<String, String>,
        allow_empty: bool,
    ) -> Result<Commit> {
        let url = format!(
            "{}/repositories/{}/branches/{}/commits",
            self.base(),
            repository,
            branch,
        );
        let context = format!("{}/{}", repository, branch);
        let request = self.http.post(url).json(&json!({
            "message": message,
            "metadata": metadata,
            "allow_empty": allow_empty,
        }));
        let response = self.send(request, &context)?;
        Ok(response.json()?)
    }

    pub fn get_commit(&self, repository: &str, commit_id: &str) -> Result<Commit> {
        let url = format!(
            "{}/repositories/{}/commits/{}",
            self.base(),
            repository,
            commit_id,
        );
        let context = format!("{}@{}", repository, commit_id);
        let response = self.send(self.http.get(url), &context)?;
        Ok(response.json()?)
    }

    /// Commit log of a ref, newest first.
    pub fn log_commits(
        &self,
        repository: &str,
        reference: &str,
        after: Option<&str>,
        amount: Option<u64>,
    ) -> Result<Page<Commit>> {
        let url = format!(
            "{}/repositories/{}/refs/{}/commits",
            self.base(),
            repository,
            reference,
        );
        let query = paging_query(&[], after, amount);
        let context = format!("{}/{}", repository, reference);
        let response = self.send(self.http.get(url).query(&query), &context)?;
        Ok(response.json()?)
    }

    /// Committed differences between two refs.
    pub fn diff_refs(
        &self,
        repository: &str,
        left_ref: &str,
        right_ref: &str,
        after: Option<&str>,
        amount: Option<u64>,
    ) -> Result<Page<Diff>> {
        let url = format!(
            "{}/repositories/{}/refs/{}/diff/{}",
            self.base(),
            repository,
            left_ref,
            right_ref,
        );
        let query = paging_query(&[], after, amount);
        let context = format!("{}/{}..{}", repository, left_ref, right_ref);
        let response = self.send(self.http.get(url).query(&query), &context)?;
        Ok(response.json()?)
    }

    pub fn merge(
        &self,
        repository: &str,
        source_ref: &str,
        destination_branch: &str,
        message: Option<&str>,
    ) -> Result<MergeResult> {
        let url = format!(
            "{}/repositories/{}/refs/{}/merge/{}",
            self.base(),
            repository,
            source_ref,
            destination_branch,
        );
        let mut body = serde_json::Map::new();
        if let Some(message) = message {
            body.insert("message".to_string(), message.into());
        }
        let context = format!("{}/{}..{}", repository, source_ref, destination_branch);
        let request = self.http.post(url).json(&serde_json::Value::Object(body));
        let response = self.send(request, &context)?;
        Ok(response.json()?)
    }

    // -----------------------------------------------------------------------
    // Tags
    // -----------------------------------------------------------------------

    pub fn create_tag(&self, repository: &str, tag: &str, reference: &str) -> Result<RefSummary> {
        let url = format!("{}/repositories/{}/tags", self.base(), repository);
        let context = format!("{}/{}", repository, tag);
        let request = self
            .http
            .post(url)
            .json(&json!({ "id": tag, "ref": reference }));
        let response = self.send(request, &context)?;
        Ok(response.json()?)
    }

    pub fn get_tag(&self, repository: &str, tag: &str) -> Result<RefSummary> {
        let url = format!("{}/repositories/{}/tags/{}", self.base(), repository, tag);
        let context = format!("{}/{}", repository, tag);
        let response = self.send(self.http.get(url), &context)?;
        Ok(response.json()?)
    }

    pub fn delete_tag(&self, repository: &str, tag: &str) -> Result<()> {
        let url = format!("{}/repositories/{}/tags/{}", self.base(), repository, tag);
        let context = format!("{}/{}", repository, tag);
        self.send(self.http.delete(url), &context)?;
        Ok(())
    }

    pub fn list_tags(
        &self,
        repository: &str,
        after: Option<&str>,
        amount: Option<u64>,
    ) -> Result<Page<RefSummary>> {
        let url = format!("{}/repositories/{}/tags", self.base(), repository);
        let query = paging_query(&[], after, amount);
        let response = self.send(self.http.get(url).query(&query), repository)?;
        Ok(response.json()?)
    }
}

impl LakeClient {
    /// Server-side cap on one batch-delete request.
    pub const DELETE_BATCH_MAX: usize = 1000;
}

fn object_context(repository: &str, reference: &str, path: &str) -> String {
    format!("{}/{}/{}", repository, reference, path)
}

fn paging_query(
    base: &[(&'static str, String)],
    after: Option<&str>,
    amount: Option<u64>,
) -> Vec<(&'static str, String)> {
    let mut query = base.to_vec();
    if let Some(after) = after {
        query.push(("after", after.to_string()));
    }
    if let Some(amount) = amount {
        query.push(("amount", amount.to_string()));
    }
    query
}

fn error_message(response: Response) -> String {
    let text = response.text().unwrap_or_default();
    match serde_json::from_str::<ApiErrorBody>(&text) {
        Ok(body) => body.message,
        Err(_) => text,
    }
}
