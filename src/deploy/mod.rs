// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of gcp-mcp and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Provisioning plans for instances and static sites.
//!
//! Multi-resource plans are expressed as a [`Saga`]: steps run in order and a
//! failure unwinds what was already created.

mod saga;
pub mod startup;
pub mod steps;

pub use saga::{CompletedStep, RollbackOutcome, RollbackStatus, Saga, SagaFailure, SagaStep};

use crate::cloud::{BucketSpec, CloudClients, InstanceSpec, ObjectUpload, WebsiteConfig};
use crate::model::{ProjectId, Zone};

use startup::{STARTUP_SCRIPT_KEY, STORAGE_READ_ONLY_SCOPE, WEB_SERVER_TAGS};
use steps::{CreateBucket, EnableUniformAccess, InsertInstance, MakePublic, UploadObject};

pub const DEFAULT_MACHINE_TYPE: &str = "e2-medium";
pub const DEFAULT_IMAGE: &str = "projects/debian-cloud/global/images/family/debian-11";
pub const DEFAULT_NETWORK: &str = "default";
pub const DEFAULT_BUCKET_LOCATION: &str = "US";
pub const DEFAULT_INDEX_PAGE: &str = "index.html";
pub const NOT_FOUND_PAGE: &str = "404.html";
pub const HTML_CONTENT_TYPE: &str = "text/html";

/// `zones/<zone>/machineTypes/<type>`.
pub fn machine_type_path(zone: &Zone, machine_type: &str) -> String {
    format!("zones/{zone}/machineTypes/{machine_type}")
}

/// Bare network names resolve to `global/networks/<name>`; paths pass through.
pub fn network_path(network: &str) -> String {
    if network.contains('/') {
        network.to_owned()
    } else {
        format!("global/networks/{network}")
    }
}

/// Caller-chosen instance settings; `None` fields take the defaults above.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstanceOptions {
    pub machine_type: Option<String>,
    pub image: Option<String>,
    pub network: Option<String>,
    pub startup_script: Option<String>,
}

pub fn instance_spec(name: &str, zone: &Zone, options: InstanceOptions) -> InstanceSpec {
    let machine_type = options.machine_type.as_deref().unwrap_or(DEFAULT_MACHINE_TYPE);
    InstanceSpec {
        name: name.to_owned(),
        machine_type: machine_type_path(zone, machine_type),
        source_image: options.image.unwrap_or_else(|| DEFAULT_IMAGE.to_owned()),
        network: network_path(options.network.as_deref().unwrap_or(DEFAULT_NETWORK)),
        external_access: true,
        metadata: options
            .startup_script
            .map(|script| vec![(STARTUP_SCRIPT_KEY.to_owned(), script)])
            .unwrap_or_default(),
        tags: Vec::new(),
        service_account_scopes: Vec::new(),
    }
}

/// A default-sized web server running `startup_script`, reachable on 80/443.
fn web_server_spec(name: &str, zone: &Zone, startup_script: String) -> InstanceSpec {
    let mut spec = instance_spec(
        name,
        zone,
        InstanceOptions {
            startup_script: Some(startup_script),
            ..InstanceOptions::default()
        },
    );
    spec.tags = WEB_SERVER_TAGS.iter().map(|tag| (*tag).to_owned()).collect();
    spec
}

/// nginx serving `html` directly from the startup script.
pub fn html_server_spec(name: &str, zone: &Zone, html: &str) -> InstanceSpec {
    web_server_spec(name, zone, startup::nginx_site_script(html))
}

/// nginx serving a copy of `bucket`, with read-only storage access.
pub fn bucket_mirror_spec(name: &str, zone: &Zone, bucket: &str) -> InstanceSpec {
    let mut spec = web_server_spec(name, zone, startup::bucket_sync_script(bucket));
    spec.service_account_scopes = vec![STORAGE_READ_ONLY_SCOPE.to_owned()];
    spec
}

pub fn site_bucket_spec(name: &str, location: &str) -> BucketSpec {
    BucketSpec {
        name: name.to_owned(),
        location: location.to_owned(),
        website: Some(WebsiteConfig {
            main_page_suffix: DEFAULT_INDEX_PAGE.to_owned(),
            not_found_page: NOT_FOUND_PAGE.to_owned(),
        }),
    }
}

pub fn html_upload(file_name: &str, html: &str) -> ObjectUpload {
    ObjectUpload {
        name: file_name.to_owned(),
        content_type: HTML_CONTENT_TYPE.to_owned(),
        body: html.as_bytes().to_vec(),
    }
}

fn bucket_steps(saga: Saga, clients: &CloudClients, project: &ProjectId, spec: BucketSpec) -> Saga {
    let bucket = spec.name.clone();
    saga.step(CreateBucket {
        storage: clients.storage.clone(),
        project: project.clone(),
        spec,
    })
    .step(EnableUniformAccess {
        storage: clients.storage.clone(),
        bucket,
    })
}

fn make_public(clients: &CloudClients, bucket: &str, object: String) -> MakePublic {
    MakePublic {
        storage: clients.storage.clone(),
        bucket: bucket.to_owned(),
        object,
    }
}

/// Create a website bucket with uniform access.
pub fn site_bucket_saga(clients: &CloudClients, project: &ProjectId, spec: BucketSpec) -> Saga {
    bucket_steps(Saga::new(), clients, project, spec)
}

/// Upload an object to an existing bucket and make it publicly readable. A replaced
/// object is restored if the grant fails.
pub fn publish_saga(clients: &CloudClients, bucket: &str, upload: ObjectUpload) -> Saga {
    let object = upload.name.clone();
    Saga::new()
        .step(UploadObject::into_existing_bucket(clients.storage.clone(), bucket, upload))
        .step(make_public(clients, bucket, object))
}

/// Bucket, public page, then a VM mirroring the bucket.
pub fn bucket_backed_site_saga(
    clients: &CloudClients,
    project: &ProjectId,
    zone: &Zone,
    bucket: BucketSpec,
    upload: ObjectUpload,
    instance: InstanceSpec,
) -> Saga {
    let bucket_name = bucket.name.clone();
    let object = upload.name.clone();
    bucket_steps(Saga::new(), clients, project, bucket)
        .step(UploadObject::into_new_bucket(clients.storage.clone(), &bucket_name, upload))
        .step(make_public(clients, &bucket_name, object))
        .step(InsertInstance {
            compute: clients.compute.clone(),
            project: project.clone(),
            zone: zone.clone(),
            spec: instance,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cloud::testing::{CloudCall, FakeCloud};

    fn zone() -> Zone {
        Zone::new("us-central1-a").expect("zone")
    }

    fn project() -> ProjectId {
        ProjectId::new("p").expect("project")
    }

    #[test]
    fn instance_spec_applies_defaults() {
        let spec = instance_spec("vm", &zone(), InstanceOptions::default());
        assert_eq!(spec.machine_type, "zones/us-central1-a/machineTypes/e2-medium");
        assert_eq!(spec.source_image, DEFAULT_IMAGE);
        assert_eq!(spec.network, "global/networks/default");
        assert!(spec.metadata.is_empty());
    }

    #[test]
    fn instance_spec_passes_image_and_network_paths_through() {
        let image = "projects/ubuntu-os-cloud/global/images/family/ubuntu-2204-lts";
        let spec = instance_spec(
            "vm",
            &zone(),
            InstanceOptions {
                machine_type: Some("n2-standard-4".to_owned()),
                image: Some(image.to_owned()),
                network: Some("projects/shared/global/networks/vpc".to_owned()),
                startup_script: Some("echo hi".to_owned()),
            },
        );
        assert_eq!(spec.machine_type, "zones/us-central1-a/machineTypes/n2-standard-4");
        assert_eq!(spec.source_image, image);
        assert_eq!(spec.network, "projects/shared/global/networks/vpc");
        assert_eq!(spec.metadata_value("startup-script"), Some("echo hi"));
    }

    #[test]
    fn mirror_spec_carries_tags_and_read_only_scope() {
        let spec = bucket_mirror_spec("web", &zone(), "b");
        assert_eq!(spec.tags, vec!["http-server", "https-server"]);
        assert_eq!(spec.service_account_scopes, vec![STORAGE_READ_ONLY_SCOPE]);
        assert!(spec.external_access);
        assert!(spec.metadata_value(STARTUP_SCRIPT_KEY).is_some_and(|s| s.contains("gs://b")));
    }

    #[tokio::test]
    async fn failed_instance_insert_removes_bucket_and_object() {
        let fake = FakeCloud::new().failing("insert_instance", "quota exceeded");
        let clients = fake.clients();
        let failure = bucket_backed_site_saga(
            &clients,
            &project(),
            &zone(),
            site_bucket_spec("b", DEFAULT_BUCKET_LOCATION),
            html_upload(DEFAULT_INDEX_PAGE, "<h1>x</h1>"),
            bucket_mirror_spec("web", &zone(), "b"),
        )
        .run()
        .await
        .unwrap_err();

        assert_eq!(failure.failed_step, "create instance `web` in us-central1-a");
        assert!(failure.rolled_back_cleanly());
        assert!(fake.bucket_names().is_empty());
        assert_eq!(
            fake.mutations().last(),
            Some(&CloudCall::DeleteBucket { bucket: "b".to_owned() })
        );
        assert_eq!(
            fake.operations(),
            vec![
                "create_bucket",
                "set_uniform_access",
                "upload_object",
                "make_public",
                "insert_instance",
                "delete_object",
                "delete_bucket",
            ]
        );
    }
}
