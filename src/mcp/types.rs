// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of gcp-mcp and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use schemars::JsonSchema;
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListInstancesParams {
    /// Zone to list, e.g. `us-central1-a`. All zones of the project when omitted.
    pub zone: Option<String>,
    /// Compute Engine filter expression, e.g. `status = RUNNING`.
    pub filter: Option<String>,
    /// Maximum instances returned per zone (1-500, default 50).
    pub page_size: Option<u32>,
    /// Project ID. Defaults to the server's configured project.
    pub project_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct InstanceParams {
    /// Instance name.
    pub name: String,
    /// Zone of the instance.
    pub zone: String,
    /// Project ID. Defaults to the server's configured project.
    pub project_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateInstanceParams {
    /// Instance name: lowercase letters, digits and hyphens, starting with a letter.
    pub name: String,
    /// Zone to create the instance in.
    pub zone: String,
    /// Machine type (default `e2-medium`).
    pub machine_type: Option<String>,
    /// Boot disk image (default `projects/debian-cloud/global/images/family/debian-11`).
    pub image: Option<String>,
    /// VPC network name or path (default `default`).
    pub network: Option<String>,
    /// Shell script run on every boot.
    pub startup_script: Option<String>,
    /// Project ID. Defaults to the server's configured project.
    pub project_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeployStaticHtmlSiteParams {
    /// Zone to create the VM in.
    pub zone: String,
    /// Name of the VM to create.
    pub vm_name: String,
    /// HTML document served as the index page.
    pub html_content: String,
    /// Project ID. Defaults to the server's configured project.
    pub project_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct VmParams {
    /// Zone of the VM.
    pub zone: String,
    /// Name of the VM.
    pub vm_name: String,
    /// Project ID. Defaults to the server's configured project.
    pub project_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateStaticSiteBucketParams {
    /// Globally unique bucket name.
    pub bucket_name: String,
    /// Project ID. Defaults to the server's configured project.
    pub project_id: Option<String>,
    /// Bucket location (default `US`).
    pub location: Option<String>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadStaticSiteHtmlParams {
    /// Target bucket.
    pub bucket_name: String,
    /// HTML document to upload.
    pub html_content: String,
    /// Object name (default `index.html`).
    pub file_name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProjectParams {
    /// Project ID. Defaults to the server's configured project.
    pub project_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct BucketParams {
    /// Bucket name.
    pub bucket_name: String,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeployStaticSiteFromHtmlParams {
    /// Zone to create the VM in.
    pub zone: String,
    /// Name of the VM to create.
    pub vm_name: String,
    /// Bucket to create and publish the page to.
    pub bucket_name: String,
    /// HTML document served as the index page.
    pub html_content: String,
    /// Project ID. Defaults to the server's configured project.
    pub project_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListProjectIdsParams {
    /// Resource Manager filter, e.g. `lifecycleState:ACTIVE`.
    pub filter: Option<String>,
    /// Maximum projects returned (1-1000, default 200).
    pub page_size: Option<u32>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerateDiagramParams {
    /// Project to inspect.
    pub project_id: String,
}
