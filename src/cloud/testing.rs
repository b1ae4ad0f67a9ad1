// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of gcp-mcp and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! In-memory recording double for every cloud service trait.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;

use super::types::{NetworkInterfaceDescriptor, UNKNOWN};
use super::{
    BucketDescriptor, BucketSpec, CloudClients, CloudError, ComputeApi, InstanceDescriptor,
    InstanceQuery, InstanceSpec, ObjectDescriptor, ObjectUpload, OperationSummary,
    ProjectDescriptor, ProjectPage, ProjectQuery, ProjectsApi, PublicAccess, SpannerApi,
    StorageApi, StoragePage, ZoneDescriptor,
};
use crate::model::{ProjectId, Zone};

/// One recorded cloud call, in issue order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum CloudCall {
    ListZones { project: String },
    ListInstances {
        project: String,
        zone: String,
        filter: Option<String>,
        max_results: u32,
    },
    GetInstance { project: String, zone: String, name: String },
    InsertInstance { project: String, zone: String, spec: InstanceSpec },
    DeleteInstance { project: String, zone: String, name: String },
    StartInstance { project: String, zone: String, name: String },
    StopInstance { project: String, zone: String, name: String },
    CreateBucket { project: String, spec: BucketSpec },
    SetUniformAccess { bucket: String, enabled: bool },
    UploadObject { bucket: String, upload: ObjectUpload },
    DownloadObject { bucket: String, object: String },
    MakePublic { bucket: String, object: String },
    ListBuckets { project: String, page_token: Option<String> },
    ListObjects { bucket: String, page_token: Option<String> },
    DeleteObject { bucket: String, object: String },
    DeleteBucket { bucket: String },
    ListProjects { filter: Option<String>, page_size: u32 },
    ListSpannerInstances { project: String },
}

impl CloudCall {
    pub(crate) fn operation(&self) -> &'static str {
        match self {
            Self::ListZones { .. } => "list_zones",
            Self::ListInstances { .. } => "list_instances",
            Self::GetInstance { .. } => "get_instance",
            Self::InsertInstance { .. } => "insert_instance",
            Self::DeleteInstance { .. } => "delete_instance",
            Self::StartInstance { .. } => "start_instance",
            Self::StopInstance { .. } => "stop_instance",
            Self::CreateBucket { .. } => "create_bucket",
            Self::SetUniformAccess { .. } => "set_uniform_access",
            Self::UploadObject { .. } => "upload_object",
            Self::DownloadObject { .. } => "download_object",
            Self::MakePublic { .. } => "make_public",
            Self::ListBuckets { .. } => "list_buckets",
            Self::ListObjects { .. } => "list_objects",
            Self::DeleteObject { .. } => "delete_object",
            Self::DeleteBucket { .. } => "delete_bucket",
            Self::ListProjects { .. } => "list_projects",
            Self::ListSpannerInstances { .. } => "list_spanner_instances",
        }
    }

    pub(crate) fn is_mutation(&self) -> bool {
        !matches!(
            self,
            Self::ListZones { .. }
                | Self::ListInstances { .. }
                | Self::GetInstance { .. }
                | Self::DownloadObject { .. }
                | Self::ListBuckets { .. }
                | Self::ListObjects { .. }
                | Self::ListProjects { .. }
                | Self::ListSpannerInstances { .. }
        )
    }
}

/// Largest page the real Storage API returns.
const STORAGE_PAGE_SIZE: usize = 1000;

#[derive(Debug)]
struct FakeState {
    zones: Vec<ZoneDescriptor>,
    instances: Vec<InstanceDescriptor>,
    buckets: Vec<BucketDescriptor>,
    objects: BTreeMap<String, Vec<ObjectUpload>>,
    storage_page_size: usize,
    projects: Vec<ProjectDescriptor>,
    next_page_token: Option<String>,
    spanner_instances: Vec<String>,
    failures: BTreeMap<&'static str, String>,
    calls: Vec<CloudCall>,
    operation_seq: u64,
}

impl Default for FakeState {
    fn default() -> Self {
        Self {
            zones: Vec::new(),
            instances: Vec::new(),
            buckets: Vec::new(),
            objects: BTreeMap::new(),
            storage_page_size: STORAGE_PAGE_SIZE,
            projects: Vec::new(),
            next_page_token: None,
            spanner_instances: Vec::new(),
            failures: BTreeMap::new(),
            calls: Vec::new(),
            operation_seq: 0,
        }
    }
}

/// Recording fake; clones share state.
#[derive(Debug, Clone, Default)]
pub(crate) struct FakeCloud {
    state: Arc<Mutex<FakeState>>,
}

impl FakeCloud {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub(crate) fn clients(&self) -> CloudClients {
        CloudClients::from_shared(Arc::new(self.clone()))
    }

    pub(crate) fn with_zone(self, name: &str) -> Self {
        self.lock().zones.push(ZoneDescriptor {
            name: name.to_owned(),
            status: "UP".to_owned(),
            region: name.rsplit_once('-').map_or(UNKNOWN, |(region, _)| region).to_owned(),
        });
        self
    }

    pub(crate) fn with_instance(self, instance: InstanceDescriptor) -> Self {
        self.lock().instances.push(instance);
        self
    }

    pub(crate) fn with_bucket(self, name: &str) -> Self {
        self.lock().buckets.push(bucket(name, "US"));
        self
    }

    /// A bucket with uniform bucket-level access enabled.
    pub(crate) fn with_uniform_bucket(self, name: &str) -> Self {
        let mut uniform = bucket(name, "US");
        uniform.uniform_access = true;
        self.lock().buckets.push(uniform);
        self
    }

    pub(crate) fn with_object(self, bucket: &str, name: &str, content_type: &str) -> Self {
        self.with_object_body(bucket, name, content_type, "")
    }

    pub(crate) fn with_object_body(
        self,
        bucket: &str,
        name: &str,
        content_type: &str,
        body: &str,
    ) -> Self {
        self.lock().objects.entry(bucket.to_owned()).or_default().push(ObjectUpload {
            name: name.to_owned(),
            content_type: content_type.to_owned(),
            body: body.as_bytes().to_vec(),
        });
        self
    }

    /// Cap bucket and object listings at `size` items per page.
    pub(crate) fn with_storage_page_size(self, size: usize) -> Self {
        self.lock().storage_page_size = size.max(1);
        self
    }

    pub(crate) fn with_spanner_instance(self, name: &str) -> Self {
        self.lock().spanner_instances.push(name.to_owned());
        self
    }

    pub(crate) fn with_projects(
        self,
        projects: Vec<ProjectDescriptor>,
        next_page_token: Option<&str>,
    ) -> Self {
        {
            let mut state = self.lock();
            state.projects = projects;
            state.next_page_token = next_page_token.map(str::to_owned);
        }
        self
    }

    /// Make every call of `operation` fail with `message`.
    pub(crate) fn failing(self, operation: &'static str, message: &str) -> Self {
        self.lock().failures.insert(operation, message.to_owned());
        self
    }

    pub(crate) fn calls(&self) -> Vec<CloudCall> {
        self.lock().calls.clone()
    }

    pub(crate) fn operations(&self) -> Vec<&'static str> {
        self.lock().calls.iter().map(CloudCall::operation).collect()
    }

    pub(crate) fn mutations(&self) -> Vec<CloudCall> {
        self.lock().calls.iter().filter(|call| call.is_mutation()).cloned().collect()
    }

    pub(crate) fn bucket_names(&self) -> Vec<String> {
        self.lock().buckets.iter().map(|bucket| bucket.name.clone()).collect()
    }

    pub(crate) fn instance_names(&self) -> Vec<String> {
        self.lock().instances.iter().map(|instance| instance.name.clone()).collect()
    }

    pub(crate) fn object_names(&self, bucket: &str) -> Vec<String> {
        self.lock()
            .objects
            .get(bucket)
            .map(|objects| objects.iter().map(|object| object.name.clone()).collect())
            .unwrap_or_default()
    }

    pub(crate) fn object_body(&self, bucket: &str, name: &str) -> Option<String> {
        self.lock()
            .objects
            .get(bucket)?
            .iter()
            .find(|object| object.name == name)
            .map(|object| String::from_utf8_lossy(&object.body).into_owned())
    }

    fn record(&self, call: CloudCall) -> Result<MutexGuard<'_, FakeState>, CloudError> {
        let mut state = self.lock();
        let operation = call.operation();
        state.calls.push(call);
        if let Some(message) = state.failures.get(operation) {
            return Err(CloudError::Api {
                service: "fake",
                status: 500,
                message: message.clone(),
            });
        }
        Ok(state)
    }

    fn find_instance<'a>(
        state: &'a mut FakeState,
        zone: &Zone,
        name: &str,
    ) -> Result<&'a mut InstanceDescriptor, CloudError> {
        state
            .instances
            .iter_mut()
            .find(|instance| instance.zone == zone.as_str() && instance.name == name)
            .ok_or_else(|| CloudError::not_found("instance", name))
    }
}

fn operation(state: &mut FakeState, operation_type: &str, target: &str) -> OperationSummary {
    state.operation_seq += 1;
    OperationSummary {
        name: format!("operation-{}", state.operation_seq),
        status: "RUNNING".to_owned(),
        operation_type: operation_type.to_owned(),
        target: target.to_owned(),
    }
}

fn bucket(name: &str, location: &str) -> BucketDescriptor {
    BucketDescriptor {
        name: name.to_owned(),
        location: location.to_owned(),
        storage_class: "STANDARD".to_owned(),
        created: "2026-01-01T00:00:00.000Z".to_owned(),
        uniform_access: false,
        main_page: None,
    }
}

fn describe_object(bucket: &str, object: &ObjectUpload) -> ObjectDescriptor {
    ObjectDescriptor {
        name: object.name.clone(),
        bucket: bucket.to_owned(),
        size: object.body.len() as u64,
        content_type: object.content_type.clone(),
    }
}

/// Slice `items` the way a paged listing does; tokens are item offsets.
fn page_of<T: Clone>(
    items: &[T],
    page_token: Option<&str>,
    page_size: usize,
) -> Result<StoragePage<T>, CloudError> {
    let start = match page_token {
        None => 0,
        Some(token) => token
            .strip_prefix("offset-")
            .and_then(|offset| offset.parse::<usize>().ok())
            .ok_or_else(|| CloudError::other(format!("bad page token `{token}`")))?,
    };
    let end = items.len().min(start.saturating_add(page_size));
    Ok(StoragePage {
        items: items.get(start..end).map(<[T]>::to_vec).unwrap_or_default(),
        next_page_token: (end < items.len()).then(|| format!("offset-{end}")),
    })
}

/// An instance with one `default` interface; `external_ip` adds an access config.
pub(crate) fn instance(
    name: &str,
    zone: &str,
    status: &str,
    external_ip: Option<&str>,
) -> InstanceDescriptor {
    InstanceDescriptor {
        name: name.to_owned(),
        zone: zone.to_owned(),
        status: status.to_owned(),
        machine_type: "e2-medium".to_owned(),
        network_interfaces: vec![NetworkInterfaceDescriptor {
            name: "nic0".to_owned(),
            network: "default".to_owned(),
            internal_ip: Some("10.128.0.2".to_owned()),
            access_configs: usize::from(external_ip.is_some()),
        }],
        external_ips: external_ip.map(str::to_owned).into_iter().collect(),
    }
}

pub(crate) fn project(project_id: &str, name: &str) -> ProjectDescriptor {
    ProjectDescriptor {
        project_id: project_id.to_owned(),
        name: name.to_owned(),
        state: "ACTIVE".to_owned(),
    }
}

#[async_trait]
impl ComputeApi for FakeCloud {
    async fn list_zones(&self, project: &ProjectId) -> Result<Vec<ZoneDescriptor>, CloudError> {
        let state = self.record(CloudCall::ListZones { project: project.to_string() })?;
        Ok(state.zones.clone())
    }

    async fn list_instances(
        &self,
        project: &ProjectId,
        zone: &Zone,
        query: &InstanceQuery,
    ) -> Result<Vec<InstanceDescriptor>, CloudError> {
        let state = self.record(CloudCall::ListInstances {
            project: project.to_string(),
            zone: zone.to_string(),
            filter: query.filter.clone(),
            max_results: query.max_results,
        })?;
        Ok(state
            .instances
            .iter()
            .filter(|instance| instance.zone == zone.as_str())
            .take(query.max_results as usize)
            .cloned()
            .collect())
    }

    async fn get_instance(
        &self,
        project: &ProjectId,
        zone: &Zone,
        name: &str,
    ) -> Result<InstanceDescriptor, CloudError> {
        let mut state = self.record(CloudCall::GetInstance {
            project: project.to_string(),
            zone: zone.to_string(),
            name: name.to_owned(),
        })?;
        Self::find_instance(&mut state, zone, name).map(|instance| instance.clone())
    }

    async fn insert_instance(
        &self,
        project: &ProjectId,
        zone: &Zone,
        spec: &InstanceSpec,
    ) -> Result<OperationSummary, CloudError> {
        let mut state = self.record(CloudCall::InsertInstance {
            project: project.to_string(),
            zone: zone.to_string(),
            spec: spec.clone(),
        })?;
        let external_ip = spec.external_access.then_some("203.0.113.10");
        state.instances.push(instance(&spec.name, zone.as_str(), "PROVISIONING", external_ip));
        Ok(operation(&mut state, "insert", &spec.name))
    }

    async fn delete_instance(
        &self,
        project: &ProjectId,
        zone: &Zone,
        name: &str,
    ) -> Result<OperationSummary, CloudError> {
        let mut state = self.record(CloudCall::DeleteInstance {
            project: project.to_string(),
            zone: zone.to_string(),
            name: name.to_owned(),
        })?;
        Self::find_instance(&mut state, zone, name)?;
        state
            .instances
            .retain(|instance| !(instance.zone == zone.as_str() && instance.name == name));
        Ok(operation(&mut state, "delete", name))
    }

    async fn start_instance(
        &self,
        project: &ProjectId,
        zone: &Zone,
        name: &str,
    ) -> Result<OperationSummary, CloudError> {
        let mut state = self.record(CloudCall::StartInstance {
            project: project.to_string(),
            zone: zone.to_string(),
            name: name.to_owned(),
        })?;
        Self::find_instance(&mut state, zone, name)?.status = "RUNNING".to_owned();
        Ok(operation(&mut state, "start", name))
    }

    async fn stop_instance(
        &self,
        project: &ProjectId,
        zone: &Zone,
        name: &str,
    ) -> Result<OperationSummary, CloudError> {
        let mut state = self.record(CloudCall::StopInstance {
            project: project.to_string(),
            zone: zone.to_string(),
            name: name.to_owned(),
        })?;
        Self::find_instance(&mut state, zone, name)?.status = "TERMINATED".to_owned();
        Ok(operation(&mut state, "stop", name))
    }
}

#[async_trait]
impl StorageApi for FakeCloud {
    async fn create_bucket(
        &self,
        project: &ProjectId,
        spec: &BucketSpec,
    ) -> Result<BucketDescriptor, CloudError> {
        let mut state = self.record(CloudCall::CreateBucket {
            project: project.to_string(),
            spec: spec.clone(),
        })?;
        if state.buckets.iter().any(|bucket| bucket.name == spec.name) {
            return Err(CloudError::Api {
                service: "storage",
                status: 409,
                message: format!("bucket `{}` already exists", spec.name),
            });
        }
        let mut created = bucket(&spec.name, &spec.location);
        created.main_page = spec.website.as_ref().map(|website| website.main_page_suffix.clone());
        state.buckets.push(created.clone());
        Ok(created)
    }

    async fn set_uniform_access(&self, bucket: &str, enabled: bool) -> Result<(), CloudError> {
        let mut state =
            self.record(CloudCall::SetUniformAccess { bucket: bucket.to_owned(), enabled })?;
        let found = state
            .buckets
            .iter_mut()
            .find(|candidate| candidate.name == bucket)
            .ok_or_else(|| CloudError::not_found("bucket", bucket))?;
        found.uniform_access = enabled;
        Ok(())
    }

    async fn upload_object(
        &self,
        bucket: &str,
        upload: &ObjectUpload,
    ) -> Result<ObjectDescriptor, CloudError> {
        let mut state = self.record(CloudCall::UploadObject {
            bucket: bucket.to_owned(),
            upload: upload.clone(),
        })?;
        if !state.buckets.iter().any(|candidate| candidate.name == bucket) {
            return Err(CloudError::not_found("bucket", bucket));
        }
        let objects = state.objects.entry(bucket.to_owned()).or_default();
        objects.retain(|existing| existing.name != upload.name);
        objects.push(upload.clone());
        Ok(describe_object(bucket, upload))
    }

    async fn download_object(
        &self,
        bucket: &str,
        object: &str,
    ) -> Result<Option<ObjectUpload>, CloudError> {
        let state = self.record(CloudCall::DownloadObject {
            bucket: bucket.to_owned(),
            object: object.to_owned(),
        })?;
        if !state.buckets.iter().any(|candidate| candidate.name == bucket) {
            return Err(CloudError::not_found("bucket", bucket));
        }
        Ok(state
            .objects
            .get(bucket)
            .and_then(|objects| objects.iter().find(|existing| existing.name == object))
            .cloned())
    }

    async fn make_public(&self, bucket: &str, object: &str) -> Result<PublicAccess, CloudError> {
        let state = self.record(CloudCall::MakePublic {
            bucket: bucket.to_owned(),
            object: object.to_owned(),
        })?;
        let found = state
            .buckets
            .iter()
            .find(|candidate| candidate.name == bucket)
            .ok_or_else(|| CloudError::not_found("bucket", bucket))?;
        Ok(if found.uniform_access { PublicAccess::Bucket } else { PublicAccess::Object })
    }

    async fn list_buckets_page(
        &self,
        project: &ProjectId,
        page_token: Option<&str>,
    ) -> Result<StoragePage<BucketDescriptor>, CloudError> {
        let state = self.record(CloudCall::ListBuckets {
            project: project.to_string(),
            page_token: page_token.map(str::to_owned),
        })?;
        page_of(&state.buckets, page_token, state.storage_page_size)
    }

    async fn list_objects_page(
        &self,
        bucket: &str,
        page_token: Option<&str>,
    ) -> Result<StoragePage<ObjectDescriptor>, CloudError> {
        let state = self.record(CloudCall::ListObjects {
            bucket: bucket.to_owned(),
            page_token: page_token.map(str::to_owned),
        })?;
        if !state.buckets.iter().any(|candidate| candidate.name == bucket) {
            return Err(CloudError::not_found("bucket", bucket));
        }
        let objects: Vec<ObjectDescriptor> = state
            .objects
            .get(bucket)
            .map(|objects| objects.iter().map(|object| describe_object(bucket, object)).collect())
            .unwrap_or_default();
        page_of(&objects, page_token, state.storage_page_size)
    }

    async fn delete_object(&self, bucket: &str, object: &str) -> Result<(), CloudError> {
        let mut state = self.record(CloudCall::DeleteObject {
            bucket: bucket.to_owned(),
            object: object.to_owned(),
        })?;
        let objects = state.objects.entry(bucket.to_owned()).or_default();
        let before = objects.len();
        objects.retain(|existing| existing.name != object);
        if objects.len() == before {
            return Err(CloudError::not_found("object", object));
        }
        Ok(())
    }

    async fn delete_bucket(&self, bucket: &str) -> Result<(), CloudError> {
        let mut state = self.record(CloudCall::DeleteBucket { bucket: bucket.to_owned() })?;
        if !state.buckets.iter().any(|candidate| candidate.name == bucket) {
            return Err(CloudError::not_found("bucket", bucket));
        }
        if state.objects.get(bucket).is_some_and(|objects| !objects.is_empty()) {
            return Err(CloudError::Api {
                service: "storage",
                status: 409,
                message: "The bucket you tried to delete is not empty.".to_owned(),
            });
        }
        state.buckets.retain(|candidate| candidate.name != bucket);
        state.objects.remove(bucket);
        Ok(())
    }
}

#[async_trait]
impl ProjectsApi for FakeCloud {
    async fn list_projects(&self, query: &ProjectQuery) -> Result<ProjectPage, CloudError> {
        let state = self.record(CloudCall::ListProjects {
            filter: query.filter.clone(),
            page_size: query.page_size,
        })?;
        Ok(ProjectPage {
            projects: state.projects.iter().take(query.page_size as usize).cloned().collect(),
            next_page_token: state.next_page_token.clone(),
        })
    }
}

#[async_trait]
impl SpannerApi for FakeCloud {
    async fn list_instances(&self, project: &ProjectId) -> Result<Vec<String>, CloudError> {
        let state = self.record(CloudCall::ListSpannerInstances { project: project.to_string() })?;
        Ok(state.spanner_instances.clone())
    }
}
