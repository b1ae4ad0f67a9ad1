// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of gcp-mcp and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! `reqwest` client for the Google Cloud JSON APIs.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::auth::{CachedToken, TokenChain, TokenSource};
use super::types::{
    RawBucket, RawBucketList, RawInstance, RawInstanceList, RawObject, RawObjectList,
    RawOperation, RawProjectList, RawSpannerInstanceList, RawZoneList,
};
use super::{
    BucketDescriptor, BucketSpec, CloudError, ComputeApi, InstanceDescriptor, InstanceQuery,
    InstanceSpec, ObjectDescriptor, ObjectUpload, OperationSummary, ProjectPage, ProjectQuery,
    ProjectsApi, PublicAccess, SpannerApi, StorageApi, StoragePage, ZoneDescriptor,
};
use crate::model::{ProjectId, Zone};

const COMPUTE: &str = "compute";
const STORAGE: &str = "storage";
const RESOURCE_MANAGER: &str = "resource manager";
const SPANNER: &str = "spanner";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);
const ERROR_BODY_LIMIT: usize = 512;

pub const PUBLIC_READ_ROLE: &str = "roles/storage.objectViewer";
pub const ALL_USERS: &str = "allUsers";
const OBJECT_READER: &str = "READER";
const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// API base URLs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub compute: String,
    pub storage: String,
    pub storage_upload: String,
    pub resource_manager: String,
    pub spanner: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            compute: "https://compute.googleapis.com/compute/v1".to_owned(),
            storage: "https://storage.googleapis.com/storage/v1".to_owned(),
            storage_upload: "https://storage.googleapis.com/upload/storage/v1".to_owned(),
            resource_manager: "https://cloudresourcemanager.googleapis.com/v1".to_owned(),
            spanner: "https://spanner.googleapis.com/v1".to_owned(),
        }
    }
}

pub struct GcpRestClient {
    http: reqwest::Client,
    tokens: Arc<dyn TokenSource>,
    endpoints: Endpoints,
}

impl GcpRestClient {
    pub fn new(http: reqwest::Client, tokens: Arc<dyn TokenSource>) -> Self {
        Self {
            http,
            tokens,
            endpoints: Endpoints::default(),
        }
    }

    /// Client using [`TokenChain::from_environment`] credentials, each token reused
    /// until it is about to expire.
    pub fn from_environment() -> Result<Self, CloudError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|err| CloudError::other(format!("cannot build HTTP client: {err}")))?;
        let tokens = Arc::new(CachedToken::new(TokenChain::from_environment(http.clone())));
        Ok(Self::new(http, tokens))
    }

    async fn request(
        &self,
        method: Method,
        url: Url,
    ) -> Result<RequestBuilder, CloudError> {
        let token = self.tokens.access_token().await?;
        Ok(self.http.request(method, url).bearer_auth(token.secret))
    }

    async fn send(
        &self,
        service: &'static str,
        request: RequestBuilder,
        not_found: Option<(&'static str, &str)>,
    ) -> Result<Response, CloudError> {
        let response =
            request.send().await.map_err(|source| CloudError::Transport { service, source })?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        if status == reqwest::StatusCode::NOT_FOUND {
            if let Some((kind, name)) = not_found {
                return Err(CloudError::not_found(kind, name));
            }
        }
        Err(CloudError::Api {
            service,
            status: status.as_u16(),
            message: api_error_message(status, &body),
        })
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        service: &'static str,
        request: RequestBuilder,
        not_found: Option<(&'static str, &str)>,
    ) -> Result<T, CloudError> {
        let response = self.send(service, request, not_found).await?;
        let bytes =
            response.bytes().await.map_err(|source| CloudError::Transport { service, source })?;
        if bytes.is_empty() {
            return serde_json::from_str("{}")
                .map_err(|err| CloudError::Decode { service, message: err.to_string() });
        }
        serde_json::from_slice(&bytes)
            .map_err(|err| CloudError::Decode { service, message: err.to_string() })
    }

    fn compute_url(&self, segments: &[&str]) -> Result<Url, CloudError> {
        endpoint_url(&self.endpoints.compute, segments)
    }

    fn storage_url(&self, segments: &[&str]) -> Result<Url, CloudError> {
        endpoint_url(&self.endpoints.storage, segments)
    }

    /// Add `allUsers` to the bucket's object viewer role.
    async fn grant_bucket_public_read(&self, bucket: &str) -> Result<(), CloudError> {
        let url = self.storage_url(&["b", bucket, "iam"])?;
        let request = self.request(Method::GET, url.clone()).await?;
        let mut policy: IamPolicy =
            self.send_json(STORAGE, request, Some(("bucket", bucket))).await?;
        if !grant_public_read(&mut policy) {
            tracing::debug!(bucket, "bucket already publicly readable");
            return Ok(());
        }
        let request = self.request(Method::PUT, url).await?.json(&policy);
        self.send(STORAGE, request, Some(("bucket", bucket))).await?;
        Ok(())
    }

    /// Add an `allUsers` reader entry to one object's ACL.
    async fn grant_object_public_read(&self, bucket: &str, object: &str) -> Result<(), CloudError> {
        let url = self.storage_url(&["b", bucket, "o", object, "acl"])?;
        let request = self.request(Method::POST, url).await?.json(&public_read_acl());
        self.send(STORAGE, request, Some(("object", object))).await?;
        Ok(())
    }

    async fn instance_action(
        &self,
        project: &ProjectId,
        zone: &Zone,
        name: &str,
        action: Option<&str>,
        method: Method,
    ) -> Result<OperationSummary, CloudError> {
        let mut segments =
            vec!["projects", project.as_str(), "zones", zone.as_str(), "instances", name];
        if let Some(action) = action {
            segments.push(action);
        }
        let url = self.compute_url(&segments)?;
        let request = self.request(method, url).await?;
        let raw: RawOperation =
            self.send_json(COMPUTE, request, Some(("instance", name))).await?;
        Ok(raw.into())
    }
}

/// Append percent-encoded path segments to an API base URL.
pub fn endpoint_url(base: &str, segments: &[&str]) -> Result<Url, CloudError> {
    let mut url = Url::parse(base)
        .map_err(|err| CloudError::other(format!("invalid endpoint `{base}`: {err}")))?;
    url.path_segments_mut()
        .map_err(|()| CloudError::other(format!("endpoint `{base}` cannot carry a path")))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

#[derive(Debug, Deserialize)]
struct GoogleErrorBody {
    error: GoogleErrorDetail,
}

#[derive(Debug, Deserialize)]
struct GoogleErrorDetail {
    #[serde(default)]
    message: String,
}

/// Best human-readable message from an error response body.
pub fn api_error_message(status: reqwest::StatusCode, body: &str) -> String {
    if let Ok(parsed) = serde_json::from_str::<GoogleErrorBody>(body) {
        let message = parsed.error.message.trim();
        if !message.is_empty() {
            return message.to_owned();
        }
    }
    let body = body.trim();
    if !body.is_empty() && !body.starts_with('{') {
        let mut end = body.len().min(ERROR_BODY_LIMIT);
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        return body[..end].to_owned();
    }
    status.canonical_reason().unwrap_or_default().to_owned()
}

/// JSON body of `instances.insert`.
pub fn instance_insert_body(spec: &InstanceSpec) -> serde_json::Value {
    let mut network_interface = serde_json::json!({ "network": spec.network });
    if spec.external_access {
        network_interface["accessConfigs"] =
            serde_json::json!([{ "name": "External NAT", "type": "ONE_TO_ONE_NAT" }]);
    }

    let mut body = serde_json::json!({
        "name": spec.name,
        "machineType": spec.machine_type,
        "disks": [{
            "boot": true,
            "autoDelete": true,
            "initializeParams": { "sourceImage": spec.source_image }
        }],
        "networkInterfaces": [network_interface],
    });

    if !spec.metadata.is_empty() {
        let items = spec
            .metadata
            .iter()
            .map(|(key, value)| serde_json::json!({ "key": key, "value": value }))
            .collect::<Vec<_>>();
        body["metadata"] = serde_json::json!({ "items": items });
    }
    if !spec.tags.is_empty() {
        body["tags"] = serde_json::json!({ "items": spec.tags });
    }
    if !spec.service_account_scopes.is_empty() {
        body["serviceAccounts"] =
            serde_json::json!([{ "email": "default", "scopes": spec.service_account_scopes }]);
    }
    body
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct IamPolicy {
    #[serde(default)]
    bindings: Vec<IamBinding>,
    #[serde(flatten)]
    other: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Serialize, Deserialize)]
struct IamBinding {
    role: String,
    #[serde(default)]
    members: Vec<String>,
    #[serde(flatten)]
    other: serde_json::Map<String, serde_json::Value>,
}

/// Object ACL entry granting anonymous read.
fn public_read_acl() -> serde_json::Value {
    serde_json::json!({ "entity": ALL_USERS, "role": OBJECT_READER })
}

/// Object ACLs are rejected once uniform access is on; only the bucket policy applies.
fn public_access_for(bucket: &BucketDescriptor) -> PublicAccess {
    if bucket.uniform_access {
        PublicAccess::Bucket
    } else {
        PublicAccess::Object
    }
}

/// Add `allUsers` to the object-viewer binding; `false` when already present.
fn grant_public_read(policy: &mut IamPolicy) -> bool {
    if let Some(binding) = policy.bindings.iter_mut().find(|binding| {
        binding.role == PUBLIC_READ_ROLE && !binding.other.contains_key("condition")
    }) {
        if binding.members.iter().any(|member| member == ALL_USERS) {
            return false;
        }
        binding.members.push(ALL_USERS.to_owned());
        return true;
    }
    policy.bindings.push(IamBinding {
        role: PUBLIC_READ_ROLE.to_owned(),
        members: vec![ALL_USERS.to_owned()],
        other: serde_json::Map::new(),
    });
    true
}

#[async_trait]
impl ComputeApi for GcpRestClient {
    async fn list_zones(&self, project: &ProjectId) -> Result<Vec<ZoneDescriptor>, CloudError> {
        let url = self.compute_url(&["projects", project.as_str(), "zones"])?;
        let request = self.request(Method::GET, url).await?;
        let raw: RawZoneList =
            self.send_json(COMPUTE, request, Some(("project", project.as_str()))).await?;
        Ok(raw.items.into_iter().map(ZoneDescriptor::from).collect())
    }

    async fn list_instances(
        &self,
        project: &ProjectId,
        zone: &Zone,
        query: &InstanceQuery,
    ) -> Result<Vec<InstanceDescriptor>, CloudError> {
        let url =
            self.compute_url(&["projects", project.as_str(), "zones", zone.as_str(), "instances"])?;
        let mut params = vec![("maxResults", query.max_results.to_string())];
        if let Some(filter) = query.filter.as_deref().filter(|filter| !filter.is_empty()) {
            params.push(("filter", filter.to_owned()));
        }
        let request = self.request(Method::GET, url).await?.query(&params);
        let raw: RawInstanceList =
            self.send_json(COMPUTE, request, Some(("zone", zone.as_str()))).await?;
        Ok(raw.items.into_iter().map(InstanceDescriptor::from).collect())
    }

    async fn get_instance(
        &self,
        project: &ProjectId,
        zone: &Zone,
        name: &str,
    ) -> Result<InstanceDescriptor, CloudError> {
        let url = self.compute_url(&[
            "projects",
            project.as_str(),
            "zones",
            zone.as_str(),
            "instances",
            name,
        ])?;
        let request = self.request(Method::GET, url).await?;
        let raw: RawInstance = self.send_json(COMPUTE, request, Some(("instance", name))).await?;
        Ok(raw.into())
    }

    async fn insert_instance(
        &self,
        project: &ProjectId,
        zone: &Zone,
        spec: &InstanceSpec,
    ) -> Result<OperationSummary, CloudError> {
        let url =
            self.compute_url(&["projects", project.as_str(), "zones", zone.as_str(), "instances"])?;
        let request = self.request(Method::POST, url).await?.json(&instance_insert_body(spec));
        let raw: RawOperation =
            self.send_json(COMPUTE, request, Some(("zone", zone.as_str()))).await?;
        Ok(raw.into())
    }

    async fn delete_instance(
        &self,
        project: &ProjectId,
        zone: &Zone,
        name: &str,
    ) -> Result<OperationSummary, CloudError> {
        self.instance_action(project, zone, name, None, Method::DELETE).await
    }

    async fn start_instance(
        &self,
        project: &ProjectId,
        zone: &Zone,
        name: &str,
    ) -> Result<OperationSummary, CloudError> {
        self.instance_action(project, zone, name, Some("start"), Method::POST).await
    }

    async fn stop_instance(
        &self,
        project: &ProjectId,
        zone: &Zone,
        name: &str,
    ) -> Result<OperationSummary, CloudError> {
        self.instance_action(project, zone, name, Some("stop"), Method::POST).await
    }
}

#[async_trait]
impl StorageApi for GcpRestClient {
    async fn create_bucket(
        &self,
        project: &ProjectId,
        spec: &BucketSpec,
    ) -> Result<BucketDescriptor, CloudError> {
        let url = self.storage_url(&["b"])?;
        let mut body = serde_json::json!({ "name": spec.name, "location": spec.location });
        if let Some(website) = &spec.website {
            body["website"] = serde_json::json!({
                "mainPageSuffix": website.main_page_suffix,
                "notFoundPage": website.not_found_page,
            });
        }
        let request = self
            .request(Method::POST, url)
            .await?
            .query(&[("project", project.as_str())])
            .json(&body);
        let raw: RawBucket = self.send_json(STORAGE, request, None).await?;
        Ok(raw.into())
    }

    async fn set_uniform_access(&self, bucket: &str, enabled: bool) -> Result<(), CloudError> {
        let url = self.storage_url(&["b", bucket])?;
        let body = serde_json::json!({
            "iamConfiguration": { "uniformBucketLevelAccess": { "enabled": enabled } }
        });
        let request = self.request(Method::PATCH, url).await?.json(&body);
        self.send(STORAGE, request, Some(("bucket", bucket))).await?;
        Ok(())
    }

    async fn upload_object(
        &self,
        bucket: &str,
        upload: &ObjectUpload,
    ) -> Result<ObjectDescriptor, CloudError> {
        let url = endpoint_url(&self.endpoints.storage_upload, &["b", bucket, "o"])?;
        let request = self
            .request(Method::POST, url)
            .await?
            .query(&[("uploadType", "media"), ("name", upload.name.as_str())])
            .header(reqwest::header::CONTENT_TYPE, upload.content_type.as_str())
            .body(upload.body.clone());
        let raw: RawObject = self.send_json(STORAGE, request, Some(("bucket", bucket))).await?;
        Ok(raw.into())
    }

    async fn download_object(
        &self,
        bucket: &str,
        object: &str,
    ) -> Result<Option<ObjectUpload>, CloudError> {
        let url = self.storage_url(&["b", bucket, "o", object])?;
        let request = self.request(Method::GET, url).await?.query(&[("alt", "media")]);
        let response = match self.send(STORAGE, request, Some(("object", object))).await {
            Ok(response) => response,
            Err(err) if err.is_not_found() => return Ok(None),
            Err(err) => return Err(err),
        };
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or(DEFAULT_CONTENT_TYPE)
            .to_owned();
        let body = response
            .bytes()
            .await
            .map_err(|source| CloudError::Transport { service: STORAGE, source })?;
        Ok(Some(ObjectUpload {
            name: object.to_owned(),
            content_type,
            body: body.to_vec(),
        }))
    }

    async fn make_public(&self, bucket: &str, object: &str) -> Result<PublicAccess, CloudError> {
        let url = self.storage_url(&["b", bucket])?;
        let request = self.request(Method::GET, url).await?;
        let raw: RawBucket = self.send_json(STORAGE, request, Some(("bucket", bucket))).await?;
        let access = public_access_for(&BucketDescriptor::from(raw));
        match access {
            PublicAccess::Object => self.grant_object_public_read(bucket, object).await?,
            PublicAccess::Bucket => self.grant_bucket_public_read(bucket).await?,
        }
        tracing::debug!(bucket, object, ?access, "granted public read");
        Ok(access)
    }

    async fn list_buckets_page(
        &self,
        project: &ProjectId,
        page_token: Option<&str>,
    ) -> Result<StoragePage<BucketDescriptor>, CloudError> {
        let url = self.storage_url(&["b"])?;
        let mut params = vec![("project", project.as_str())];
        if let Some(token) = page_token {
            params.push(("pageToken", token));
        }
        let request = self.request(Method::GET, url).await?.query(&params);
        let raw: RawBucketList = self.send_json(STORAGE, request, None).await?;
        Ok(raw.into())
    }

    async fn list_objects_page(
        &self,
        bucket: &str,
        page_token: Option<&str>,
    ) -> Result<StoragePage<ObjectDescriptor>, CloudError> {
        let url = self.storage_url(&["b", bucket, "o"])?;
        let mut request = self.request(Method::GET, url).await?;
        if let Some(token) = page_token {
            request = request.query(&[("pageToken", token)]);
        }
        let raw: RawObjectList = self.send_json(STORAGE, request, Some(("bucket", bucket))).await?;
        Ok(raw.into())
    }

    async fn delete_object(&self, bucket: &str, object: &str) -> Result<(), CloudError> {
        let url = self.storage_url(&["b", bucket, "o", object])?;
        let request = self.request(Method::DELETE, url).await?;
        self.send(STORAGE, request, Some(("object", object))).await?;
        Ok(())
    }

    async fn delete_bucket(&self, bucket: &str) -> Result<(), CloudError> {
        let url = self.storage_url(&["b", bucket])?;
        let request = self.request(Method::DELETE, url).await?;
        self.send(STORAGE, request, Some(("bucket", bucket))).await?;
        Ok(())
    }
}

#[async_trait]
impl ProjectsApi for GcpRestClient {
    async fn list_projects(&self, query: &ProjectQuery) -> Result<ProjectPage, CloudError> {
        let url = endpoint_url(&self.endpoints.resource_manager, &["projects"])?;
        let mut params = vec![("pageSize", query.page_size.to_string())];
        if let Some(filter) = query.filter.as_deref().filter(|filter| !filter.is_empty()) {
            params.push(("filter", filter.to_owned()));
        }
        let request = self.request(Method::GET, url).await?.query(&params);
        let raw: RawProjectList = self.send_json(RESOURCE_MANAGER, request, None).await?;
        Ok(raw.into())
    }
}

#[async_trait]
impl SpannerApi for GcpRestClient {
    async fn list_instances(&self, project: &ProjectId) -> Result<Vec<String>, CloudError> {
        let url = endpoint_url(
            &self.endpoints.spanner,
            &["projects", project.as_str(), "instances"],
        )?;
        let request = self.request(Method::GET, url).await?;
        let raw: RawSpannerInstanceList =
            self.send_json(SPANNER, request, Some(("project", project.as_str()))).await?;
        Ok(raw
            .instances
            .into_iter()
            .map(|instance| {
                instance.display_name.or(instance.name).unwrap_or_else(|| "unnamed".to_owned())
            })
            .collect())
    }
}
