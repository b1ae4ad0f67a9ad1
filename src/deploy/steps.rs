// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of gcp-mcp and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Cloud actions usable as saga steps, each paired with its undo.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use super::saga::SagaStep;
use crate::cloud::{
    BucketSpec, CloudError, ComputeApi, InstanceSpec, ObjectUpload, PublicAccess, StorageApi,
};
use crate::model::{ProjectId, Zone};

/// Bucket creation; undone by deleting the bucket.
pub struct CreateBucket {
    pub storage: Arc<dyn StorageApi>,
    pub project: ProjectId,
    pub spec: BucketSpec,
}

#[async_trait]
impl SagaStep for CreateBucket {
    fn describe(&self) -> String {
        format!("create bucket `{}`", self.spec.name)
    }

    async fn execute(&self) -> Result<String, CloudError> {
        let bucket = self.storage.create_bucket(&self.project, &self.spec).await?;
        Ok(format!(
            "Bucket `{}` created in {} ({})",
            bucket.name, bucket.location, bucket.storage_class
        ))
    }

    async fn compensate(&self) -> Option<Result<(), CloudError>> {
        Some(self.storage.delete_bucket(&self.spec.name).await)
    }
}

/// Enables uniform bucket-level access. The bucket's own undo removes it.
pub struct EnableUniformAccess {
    pub storage: Arc<dyn StorageApi>,
    pub bucket: String,
}

#[async_trait]
impl SagaStep for EnableUniformAccess {
    fn describe(&self) -> String {
        format!("enable uniform access on `{}`", self.bucket)
    }

    async fn execute(&self) -> Result<String, CloudError> {
        self.storage.set_uniform_access(&self.bucket, true).await?;
        Ok("Uniform bucket-level access enabled".to_owned())
    }
}

/// Object upload. Undone by deleting the object, or by putting back the version it
/// replaced.
pub struct UploadObject {
    storage: Arc<dyn StorageApi>,
    bucket: String,
    upload: ObjectUpload,
    may_replace: bool,
    replaced: Mutex<Option<ObjectUpload>>,
}

impl UploadObject {
    /// Upload into a bucket created earlier in the same run; nothing can be replaced.
    pub fn into_new_bucket(
        storage: Arc<dyn StorageApi>,
        bucket: &str,
        upload: ObjectUpload,
    ) -> Self {
        Self {
            storage,
            bucket: bucket.to_owned(),
            upload,
            may_replace: false,
            replaced: Mutex::new(None),
        }
    }

    /// Upload into a bucket that already exists. An object of the same name is read
    /// first so rollback can restore it.
    pub fn into_existing_bucket(
        storage: Arc<dyn StorageApi>,
        bucket: &str,
        upload: ObjectUpload,
    ) -> Self {
        Self {
            may_replace: true,
            ..Self::into_new_bucket(storage, bucket, upload)
        }
    }

    fn replaced(&self) -> MutexGuard<'_, Option<ObjectUpload>> {
        self.replaced.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl SagaStep for UploadObject {
    fn describe(&self) -> String {
        format!("upload `{}` to `{}`", self.upload.name, self.bucket)
    }

    async fn execute(&self) -> Result<String, CloudError> {
        let previous = if self.may_replace {
            self.storage.download_object(&self.bucket, &self.upload.name).await?
        } else {
            None
        };
        let replacing = previous.is_some();
        *self.replaced() = previous;

        let object = self.storage.upload_object(&self.bucket, &self.upload).await?;
        let mut detail =
            format!("Uploaded `{}` ({} bytes, {})", object.name, object.size, object.content_type);
        if replacing {
            detail.push_str(", replacing the previous version");
        }
        Ok(detail)
    }

    async fn compensate(&self) -> Option<Result<(), CloudError>> {
        let previous = self.replaced().take();
        Some(match previous {
            Some(previous) => {
                self.storage.upload_object(&self.bucket, &previous).await.map(|_| ())
            }
            None => self.storage.delete_object(&self.bucket, &self.upload.name).await,
        })
    }
}

/// Public-read grant; removing the object or bucket revokes it.
pub struct MakePublic {
    pub storage: Arc<dyn StorageApi>,
    pub bucket: String,
    pub object: String,
}

#[async_trait]
impl SagaStep for MakePublic {
    fn describe(&self) -> String {
        format!("make `{}` public", self.object)
    }

    async fn execute(&self) -> Result<String, CloudError> {
        match self.storage.make_public(&self.bucket, &self.object).await? {
            PublicAccess::Object => Ok(format!("`{}` is publicly readable", self.object)),
            PublicAccess::Bucket => Ok(format!(
                "`{}` is publicly readable through a bucket-wide grant: uniform access makes \
                 every object in `{}` public",
                self.object, self.bucket
            )),
        }
    }
}

/// Instance insert; undone by deleting the instance.
pub struct InsertInstance {
    pub compute: Arc<dyn ComputeApi>,
    pub project: ProjectId,
    pub zone: Zone,
    pub spec: InstanceSpec,
}

#[async_trait]
impl SagaStep for InsertInstance {
    fn describe(&self) -> String {
        format!("create instance `{}` in {}", self.spec.name, self.zone)
    }

    async fn execute(&self) -> Result<String, CloudError> {
        let operation =
            self.compute.insert_instance(&self.project, &self.zone, &self.spec).await?;
        Ok(format!(
            "Instance `{}` requested (operation {}, status {})",
            self.spec.name, operation.name, operation.status
        ))
    }

    async fn compensate(&self) -> Option<Result<(), CloudError>> {
        Some(
            self.compute
                .delete_instance(&self.project, &self.zone, &self.spec.name)
                .await
                .map(|_| ()),
        )
    }
}
