// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of gcp-mcp and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Cloud entity shapes.
//!
//! `Raw*` structs mirror the REST payloads with every field optional. Each has
//! exactly one normalization step into a descriptor; defaults for missing
//! fields live here and nowhere else.

use serde::Deserialize;

/// Placeholder for an absent name/zone/location.
pub const UNKNOWN: &str = "unknown";
/// Placeholder for an absent lifecycle status.
pub const UNKNOWN_STATUS: &str = "UNKNOWN";

/// Last `/`-separated segment of a resource path or self link.
///
/// `https://…/zones/us-central1-a` → `us-central1-a`.
pub fn last_path_segment(path: &str) -> &str {
    path.trim_end_matches('/').rsplit('/').next().unwrap_or(path)
}

fn segment_or_unknown(path: Option<&str>) -> String {
    path.map(last_path_segment)
        .filter(|segment| !segment.is_empty())
        .unwrap_or(UNKNOWN)
        .to_owned()
}

fn text_or(value: Option<String>, default: &str) -> String {
    value.filter(|value| !value.is_empty()).unwrap_or_else(|| default.to_owned())
}

// ---------------------------------------------------------------------------
// Compute: zones
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawZoneList {
    pub items: Vec<RawZone>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawZone {
    pub name: Option<String>,
    pub status: Option<String>,
    pub region: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoneDescriptor {
    pub name: String,
    pub status: String,
    pub region: String,
}

impl From<RawZone> for ZoneDescriptor {
    fn from(raw: RawZone) -> Self {
        Self {
            name: text_or(raw.name, UNKNOWN),
            status: text_or(raw.status, UNKNOWN_STATUS),
            region: segment_or_unknown(raw.region.as_deref()),
        }
    }
}

// ---------------------------------------------------------------------------
// Compute: instances
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawInstanceList {
    pub items: Vec<RawInstance>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawInstance {
    pub name: Option<String>,
    pub zone: Option<String>,
    pub status: Option<String>,
    pub machine_type: Option<String>,
    pub network_interfaces: Vec<RawNetworkInterface>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawNetworkInterface {
    pub name: Option<String>,
    pub network: Option<String>,
    #[serde(rename = "networkIP")]
    pub network_ip: Option<String>,
    pub access_configs: Vec<RawAccessConfig>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawAccessConfig {
    pub name: Option<String>,
    #[serde(rename = "natIP")]
    pub nat_ip: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkInterfaceDescriptor {
    pub name: String,
    pub network: String,
    pub internal_ip: Option<String>,
    /// Number of access configs attached; zero means no external path.
    pub access_configs: usize,
}

/// Read-only projection of a compute instance, recomputed from every response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceDescriptor {
    pub name: String,
    pub zone: String,
    pub status: String,
    pub machine_type: String,
    pub network_interfaces: Vec<NetworkInterfaceDescriptor>,
    pub external_ips: Vec<String>,
}

impl InstanceDescriptor {
    pub fn internal_ips(&self) -> Vec<&str> {
        self.network_interfaces
            .iter()
            .filter_map(|interface| interface.internal_ip.as_deref())
            .collect()
    }

    pub fn has_access_config(&self) -> bool {
        self.network_interfaces.iter().any(|interface| interface.access_configs > 0)
    }
}

impl From<RawInstance> for InstanceDescriptor {
    fn from(raw: RawInstance) -> Self {
        let external_ips = raw
            .network_interfaces
            .iter()
            .flat_map(|interface| interface.access_configs.iter())
            .filter_map(|config| config.nat_ip.clone())
            .filter(|ip| !ip.is_empty())
            .collect();
        let network_interfaces = raw
            .network_interfaces
            .into_iter()
            .map(|interface| NetworkInterfaceDescriptor {
                name: text_or(interface.name, UNKNOWN),
                network: segment_or_unknown(interface.network.as_deref()),
                internal_ip: interface.network_ip.filter(|ip| !ip.is_empty()),
                access_configs: interface.access_configs.len(),
            })
            .collect();

        Self {
            name: text_or(raw.name, UNKNOWN),
            zone: segment_or_unknown(raw.zone.as_deref()),
            status: text_or(raw.status, UNKNOWN_STATUS),
            machine_type: segment_or_unknown(raw.machine_type.as_deref()),
            network_interfaces,
            external_ips,
        }
    }
}

/// Parameters of an instance-insert call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceSpec {
    pub name: String,
    /// Zonal path, `zones/<zone>/machineTypes/<type>`.
    pub machine_type: String,
    /// Boot disk image, passed through verbatim.
    pub source_image: String,
    /// Network path, `global/networks/<name>` unless given as a full path.
    pub network: String,
    pub external_access: bool,
    pub metadata: Vec<(String, String)>,
    pub tags: Vec<String>,
    pub service_account_scopes: Vec<String>,
}

impl InstanceSpec {
    pub fn metadata_value(&self, key: &str) -> Option<&str> {
        self.metadata.iter().find(|(k, _)| k == key).map(|(_, value)| value.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct InstanceQuery {
    pub filter: Option<String>,
    pub max_results: u32,
}

// ---------------------------------------------------------------------------
// Compute: operations
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawOperation {
    pub name: Option<String>,
    pub status: Option<String>,
    pub operation_type: Option<String>,
    pub target_link: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationSummary {
    pub name: String,
    pub status: String,
    pub operation_type: String,
    pub target: String,
}

impl From<RawOperation> for OperationSummary {
    fn from(raw: RawOperation) -> Self {
        Self {
            name: text_or(raw.name, UNKNOWN),
            status: text_or(raw.status, UNKNOWN_STATUS),
            operation_type: text_or(raw.operation_type, UNKNOWN),
            target: segment_or_unknown(raw.target_link.as_deref()),
        }
    }
}

// ---------------------------------------------------------------------------
// Storage
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawBucketList {
    pub items: Vec<RawBucket>,
    pub next_page_token: Option<String>,
}

impl From<RawBucketList> for StoragePage<BucketDescriptor> {
    fn from(raw: RawBucketList) -> Self {
        Self {
            items: raw.items.into_iter().map(BucketDescriptor::from).collect(),
            next_page_token: raw.next_page_token.filter(|token| !token.is_empty()),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawBucket {
    pub name: Option<String>,
    pub location: Option<String>,
    pub storage_class: Option<String>,
    pub time_created: Option<String>,
    pub iam_configuration: Option<RawIamConfiguration>,
    pub website: Option<RawWebsite>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawIamConfiguration {
    pub uniform_bucket_level_access: Option<RawToggle>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawToggle {
    pub enabled: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawWebsite {
    pub main_page_suffix: Option<String>,
    pub not_found_page: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketDescriptor {
    pub name: String,
    pub location: String,
    pub storage_class: String,
    pub created: String,
    pub uniform_access: bool,
    pub main_page: Option<String>,
}

impl BucketDescriptor {
    pub fn public_url(&self, object: &str) -> String {
        public_object_url(&self.name, object)
    }
}

impl From<RawBucket> for BucketDescriptor {
    fn from(raw: RawBucket) -> Self {
        Self {
            name: text_or(raw.name, UNKNOWN),
            location: text_or(raw.location, UNKNOWN),
            storage_class: text_or(raw.storage_class, UNKNOWN),
            created: text_or(raw.time_created, UNKNOWN),
            uniform_access: raw
                .iam_configuration
                .and_then(|config| config.uniform_bucket_level_access)
                .is_some_and(|toggle| toggle.enabled),
            main_page: raw.website.and_then(|website| website.main_page_suffix),
        }
    }
}

pub fn public_object_url(bucket: &str, object: &str) -> String {
    format!("https://storage.googleapis.com/{bucket}/{object}")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebsiteConfig {
    pub main_page_suffix: String,
    pub not_found_page: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketSpec {
    pub name: String,
    pub location: String,
    pub website: Option<WebsiteConfig>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawObjectList {
    pub items: Vec<RawObject>,
    pub next_page_token: Option<String>,
}

impl From<RawObjectList> for StoragePage<ObjectDescriptor> {
    fn from(raw: RawObjectList) -> Self {
        Self {
            items: raw.items.into_iter().map(ObjectDescriptor::from).collect(),
            next_page_token: raw.next_page_token.filter(|token| !token.is_empty()),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawObject {
    pub name: Option<String>,
    pub bucket: Option<String>,
    /// Storage reports sizes as decimal strings.
    pub size: Option<String>,
    pub content_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectDescriptor {
    pub name: String,
    pub bucket: String,
    pub size: u64,
    pub content_type: String,
}

impl From<RawObject> for ObjectDescriptor {
    fn from(raw: RawObject) -> Self {
        Self {
            name: text_or(raw.name, UNKNOWN),
            bucket: text_or(raw.bucket, UNKNOWN),
            size: raw.size.and_then(|size| size.parse().ok()).unwrap_or(0),
            content_type: text_or(raw.content_type, "application/octet-stream"),
        }
    }
}

/// One page of a Storage listing; `next_page_token` is `None` on the last page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoragePage<T> {
    pub items: Vec<T>,
    pub next_page_token: Option<String>,
}

/// How far an anonymous read grant reaches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublicAccess {
    /// `allUsers` reader ACL on the one object.
    Object,
    /// `allUsers` object viewer on the bucket IAM policy. Buckets with uniform
    /// bucket-level access reject object ACLs.
    Bucket,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectUpload {
    pub name: String,
    pub content_type: String,
    pub body: Vec<u8>,
}

// ---------------------------------------------------------------------------
// Resource Manager
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawProjectList {
    pub projects: Vec<RawProject>,
    pub next_page_token: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawProject {
    pub project_id: Option<String>,
    pub name: Option<String>,
    pub lifecycle_state: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectDescriptor {
    pub project_id: String,
    pub name: String,
    pub state: String,
}

impl From<RawProject> for ProjectDescriptor {
    fn from(raw: RawProject) -> Self {
        let project_id = text_or(raw.project_id, UNKNOWN);
        Self {
            name: raw.name.filter(|name| !name.is_empty()).unwrap_or_else(|| project_id.clone()),
            project_id,
            state: text_or(raw.lifecycle_state, UNKNOWN_STATUS),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProjectPage {
    pub projects: Vec<ProjectDescriptor>,
    pub next_page_token: Option<String>,
}

impl From<RawProjectList> for ProjectPage {
    fn from(raw: RawProjectList) -> Self {
        Self {
            projects: raw.projects.into_iter().map(ProjectDescriptor::from).collect(),
            next_page_token: raw.next_page_token.filter(|token| !token.is_empty()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProjectQuery {
    pub filter: Option<String>,
    pub page_size: u32,
}

// ---------------------------------------------------------------------------
// Spanner
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawSpannerInstanceList {
    pub instances: Vec<RawSpannerInstance>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawSpannerInstance {
    pub name: Option<String>,
    pub display_name: Option<String>,
}
