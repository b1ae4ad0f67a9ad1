// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of gcp-mcp and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Google Cloud access layer.
//!
//! One trait per cloud service. Tool handlers hold the services as trait
//! objects so the REST client and the in-memory test double are interchangeable.

pub mod auth;
mod error;
pub mod rest;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

use std::sync::Arc;

use async_trait::async_trait;

pub use error::{CloudError, GENERIC_ERROR_MESSAGE};
pub use rest::GcpRestClient;
pub use types::{
    BucketDescriptor, BucketSpec, InstanceDescriptor, InstanceQuery, InstanceSpec,
    ObjectDescriptor, ObjectUpload, OperationSummary, ProjectDescriptor, ProjectPage,
    ProjectQuery, PublicAccess, StoragePage, WebsiteConfig, ZoneDescriptor,
};

use crate::model::{ProjectId, Zone};

#[async_trait]
pub trait ComputeApi: Send + Sync {
    async fn list_zones(&self, project: &ProjectId) -> Result<Vec<ZoneDescriptor>, CloudError>;

    async fn list_instances(
        &self,
        project: &ProjectId,
        zone: &Zone,
        query: &InstanceQuery,
    ) -> Result<Vec<InstanceDescriptor>, CloudError>;

    async fn get_instance(
        &self,
        project: &ProjectId,
        zone: &Zone,
        name: &str,
    ) -> Result<InstanceDescriptor, CloudError>;

    async fn insert_instance(
        &self,
        project: &ProjectId,
        zone: &Zone,
        spec: &InstanceSpec,
    ) -> Result<OperationSummary, CloudError>;

    async fn delete_instance(
        &self,
        project: &ProjectId,
        zone: &Zone,
        name: &str,
    ) -> Result<OperationSummary, CloudError>;

    async fn start_instance(
        &self,
        project: &ProjectId,
        zone: &Zone,
        name: &str,
    ) -> Result<OperationSummary, CloudError>;

    async fn stop_instance(
        &self,
        project: &ProjectId,
        zone: &Zone,
        name: &str,
    ) -> Result<OperationSummary, CloudError>;
}

#[async_trait]
pub trait StorageApi: Send + Sync {
    async fn create_bucket(
        &self,
        project: &ProjectId,
        spec: &BucketSpec,
    ) -> Result<BucketDescriptor, CloudError>;

    async fn set_uniform_access(&self, bucket: &str, enabled: bool) -> Result<(), CloudError>;

    async fn upload_object(
        &self,
        bucket: &str,
        upload: &ObjectUpload,
    ) -> Result<ObjectDescriptor, CloudError>;

    /// Current content of `object`, `None` when it does not exist.
    async fn download_object(
        &self,
        bucket: &str,
        object: &str,
    ) -> Result<Option<ObjectUpload>, CloudError>;

    /// Grant anonymous read access to `object`. Buckets with uniform access can only
    /// be opened as a whole; the returned scope says which grant was made.
    async fn make_public(&self, bucket: &str, object: &str) -> Result<PublicAccess, CloudError>;

    async fn list_buckets_page(
        &self,
        project: &ProjectId,
        page_token: Option<&str>,
    ) -> Result<StoragePage<BucketDescriptor>, CloudError>;

    async fn list_objects_page(
        &self,
        bucket: &str,
        page_token: Option<&str>,
    ) -> Result<StoragePage<ObjectDescriptor>, CloudError>;

    async fn delete_object(&self, bucket: &str, object: &str) -> Result<(), CloudError>;

    async fn delete_bucket(&self, bucket: &str) -> Result<(), CloudError>;

    /// Every bucket of `project`, across pages.
    async fn list_buckets(&self, project: &ProjectId) -> Result<Vec<BucketDescriptor>, CloudError> {
        let mut buckets = Vec::new();
        let mut token: Option<String> = None;
        loop {
            let page = self.list_buckets_page(project, token.as_deref()).await?;
            buckets.extend(page.items);
            match next_page(token.as_deref(), page.next_page_token)? {
                Some(next) => token = Some(next),
                None => return Ok(buckets),
            }
        }
    }

    /// Every object of `bucket`, across pages.
    async fn list_objects(&self, bucket: &str) -> Result<Vec<ObjectDescriptor>, CloudError> {
        let mut objects = Vec::new();
        let mut token: Option<String> = None;
        loop {
            let page = self.list_objects_page(bucket, token.as_deref()).await?;
            objects.extend(page.items);
            match next_page(token.as_deref(), page.next_page_token)? {
                Some(next) => token = Some(next),
                None => return Ok(objects),
            }
        }
    }
}

/// Continuation token for the next listing request. A token that repeats the one
/// just sent would loop forever.
fn next_page(sent: Option<&str>, next: Option<String>) -> Result<Option<String>, CloudError> {
    match next {
        Some(next) if sent == Some(next.as_str()) => {
            Err(CloudError::other(format!("storage listing repeated page token `{next}`")))
        }
        next => Ok(next),
    }
}

#[async_trait]
pub trait ProjectsApi: Send + Sync {
    async fn list_projects(&self, query: &ProjectQuery) -> Result<ProjectPage, CloudError>;
}

#[async_trait]
pub trait SpannerApi: Send + Sync {
    /// Names of the Spanner instances in `project`.
    async fn list_instances(&self, project: &ProjectId) -> Result<Vec<String>, CloudError>;
}

/// The set of cloud services a server instance talks to.
#[derive(Clone)]
pub struct CloudClients {
    pub compute: Arc<dyn ComputeApi>,
    pub storage: Arc<dyn StorageApi>,
    pub projects: Arc<dyn ProjectsApi>,
    pub spanner: Arc<dyn SpannerApi>,
}

impl CloudClients {
    /// Route every service through one client implementing all of them.
    pub fn from_shared<C>(client: Arc<C>) -> Self
    where
        C: ComputeApi + StorageApi + ProjectsApi + SpannerApi + 'static,
    {
        Self {
            compute: client.clone(),
            storage: client.clone(),
            projects: client.clone(),
            spanner: client,
        }
    }
}

impl std::fmt::Debug for CloudClients {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudClients").finish_non_exhaustive()
    }
}
