// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of gcp-mcp and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::sync::Arc;

use rmcp::handler::server::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    AnnotateAble, CallToolResult, Content, ListResourceTemplatesResult, ListResourcesResult,
    PaginatedRequestParams, RawResource, RawResourceTemplate, ReadResourceRequestParams,
    ReadResourceResult, ResourceContents, ServerCapabilities, ServerInfo,
};
use rmcp::service::RequestContext;
use rmcp::{tool, tool_handler, tool_router, ErrorData, RoleServer, ServerHandler, ServiceExt};

use crate::cloud::{
    BucketDescriptor, CloudClients, CloudError, InstanceDescriptor, InstanceQuery,
    ObjectDescriptor, OperationSummary, ProjectPage, ProjectQuery, ZoneDescriptor,
};
use crate::config::ServerConfig;
use crate::deploy::{
    bucket_backed_site_saga, bucket_mirror_spec, html_server_spec, html_upload, instance_spec,
    publish_saga, site_bucket_saga, site_bucket_spec, CompletedStep, InstanceOptions,
    RollbackStatus, SagaFailure, DEFAULT_BUCKET_LOCATION, DEFAULT_INDEX_PAGE, NOT_FOUND_PAGE,
};
use crate::discovery::assemble;
use crate::format::mermaid::render_architecture_flowchart;
use crate::model::{
    validate_bucket_name, validate_instance_name, validate_object_name, ProjectId, Zone,
};

use super::types::*;

#[derive(Clone)]
pub struct GcpMcp {
    clients: CloudClients,
    config: Arc<ServerConfig>,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl GcpMcp {
    pub fn new(clients: CloudClients, config: ServerConfig) -> Self {
        Self {
            clients,
            config: Arc::new(config),
            tool_router: Self::tool_router(),
        }
    }

    pub async fn serve_stdio(self) -> Result<(), rmcp::RmcpError> {
        let service = self.serve((tokio::io::stdin(), tokio::io::stdout())).await?;
        service.waiting().await?;
        Ok(())
    }

    /// Explicit project, else the configured default; failure is an error result.
    fn resolve_project(&self, explicit: Option<&str>) -> Result<ProjectId, CallToolResult> {
        self.config.resolve_project(explicit).map_err(|err| {
            tracing::error!(error = %err, "cannot resolve project");
            error_text_result("Resolving Project", &err.to_string())
        })
    }

    async fn zones(&self, project: &ProjectId) -> Result<Vec<Zone>, CloudError> {
        self.clients
            .compute
            .list_zones(project)
            .await?
            .into_iter()
            .map(|zone| {
                Zone::new(zone.name)
                    .map_err(|err| CloudError::other(format!("invalid zone name: {err}")))
            })
            .collect()
    }

    /// One zone, or every zone of the project queried one after another.
    async fn instances_report(
        &self,
        project: &ProjectId,
        zone: Option<&Zone>,
        query: &InstanceQuery,
    ) -> Result<String, CloudError> {
        let zones = match zone {
            Some(zone) => vec![zone.clone()],
            None => self.zones(project).await?,
        };
        let mut instances = Vec::new();
        for zone in &zones {
            instances.extend(self.clients.compute.list_instances(project, zone, query).await?);
        }
        Ok(format_instance_list(project, zone, &instances))
    }

    async fn external_ip_report(
        &self,
        project: &ProjectId,
        zone: &Zone,
        name: &str,
    ) -> Result<String, CloudError> {
        let instance = self.clients.compute.get_instance(project, zone, name).await?;
        if !instance.has_access_config() {
            return Err(CloudError::other(format!(
                "Instance `{name}` has no external IP address assigned \
                 (its network interfaces have no access configuration)."
            )));
        }
        let Some(ip) = instance.external_ips.first() else {
            return Err(CloudError::other(format!(
                "Instance `{name}` has no external IP address assigned yet (status {}).",
                instance.status
            )));
        };
        Ok(format_external_ip(&instance, ip))
    }

    async fn empty_and_delete_bucket(&self, bucket: &str) -> Result<String, CloudError> {
        let objects = self.clients.storage.list_objects(bucket).await?;
        for object in &objects {
            self.clients.storage.delete_object(bucket, &object.name).await?;
        }
        self.clients.storage.delete_bucket(bucket).await?;
        Ok(format!(
            "# Bucket Deleted\n\nDeleted bucket `{bucket}` and {} object(s).\n",
            objects.len()
        ))
    }

    pub(crate) async fn read_instances_resource(
        &self,
        uri: &str,
    ) -> Result<ReadResourceResult, ErrorData> {
        let project = parse_instances_resource_uri(uri).ok_or_else(|| {
            ErrorData::resource_not_found(
                format!("unknown resource `{uri}`; expected {INSTANCES_RESOURCE_TEMPLATE}"),
                None,
            )
        })?;
        let project = ProjectId::new(project).map_err(|err| {
            ErrorData::invalid_params(format!("invalid project ID in `{uri}`: {err}"), None)
        })?;
        tracing::info!(resource = uri, project = %project, "reading instances resource");

        let query = InstanceQuery {
            filter: None,
            max_results: DEFAULT_INSTANCE_PAGE_SIZE,
        };
        let text = match self.instances_report(&project, None, &query).await {
            Ok(report) => report,
            Err(err) => error_text("Listing Instances", &err),
        };
        Ok(ReadResourceResult {
            contents: vec![ResourceContents::text(text, uri)],
        })
    }

    /// List Compute Engine instances with status, machine type and IP addresses. Without a
    /// zone, every zone of the project is queried.
    #[tool(name = "list-instances")]
    async fn list_instances(
        &self,
        params: Parameters<ListInstancesParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let ListInstancesParams { zone, filter, page_size, project_id } = params.0;
        let zone = zone.as_deref().map(str::trim).filter(|zone| !zone.is_empty());
        let zone = zone.map(parse_zone).transpose()?;
        let max_results = page_size_param(
            "pageSize",
            page_size,
            DEFAULT_INSTANCE_PAGE_SIZE,
            MAX_INSTANCE_PAGE_SIZE,
        )?;
        let project = match self.resolve_project(project_id.as_deref()) {
            Ok(project) => project,
            Err(result) => return Ok(result),
        };
        tracing::info!(
            tool = "list-instances",
            project = %project,
            zone = zone.as_ref().map_or("*", Zone::as_str),
            "listing instances"
        );

        let query = InstanceQuery {
            filter: filter.filter(|filter| !filter.trim().is_empty()),
            max_results,
        };
        let outcome = self.instances_report(&project, zone.as_ref(), &query).await;
        Ok(report("Listing Instances", outcome))
    }

    /// Delete a Compute Engine instance.
    #[tool(name = "delete-instance")]
    async fn delete_instance(
        &self,
        params: Parameters<InstanceParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let InstanceParams { name, zone, project_id } = params.0;
        require_instance_name("name", &name)?;
        let zone = parse_zone(&zone)?;
        let project = match self.resolve_project(project_id.as_deref()) {
            Ok(project) => project,
            Err(result) => return Ok(result),
        };
        tracing::info!(
            tool = "delete-instance",
            project = %project,
            zone = %zone,
            instance = %name
        );

        let outcome = self.clients.compute.delete_instance(&project, &zone, &name).await.map(
            |operation| {
                format_operation(
                    "Instance Deletion Started",
                    &format!("Instance `{name}` in zone `{zone}` is being deleted."),
                    &operation,
                )
            },
        );
        Ok(report("Deleting Instance", outcome))
    }

    /// Create a Compute Engine instance with an external IP. Defaults: machine type e2-medium,
    /// Debian 11 image, `default` network.
    #[tool(name = "create-instance")]
    async fn create_instance(
        &self,
        params: Parameters<CreateInstanceParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let CreateInstanceParams {
            name,
            zone,
            machine_type,
            image,
            network,
            startup_script,
            project_id,
        } = params.0;
        require_instance_name("name", &name)?;
        let zone = parse_zone(&zone)?;
        let options = InstanceOptions {
            machine_type: non_blank(machine_type),
            image: non_blank(image),
            network: non_blank(network),
            startup_script: startup_script.filter(|script| !script.is_empty()),
        };
        let project = match self.resolve_project(project_id.as_deref()) {
            Ok(project) => project,
            Err(result) => return Ok(result),
        };
        tracing::info!(
            tool = "create-instance",
            project = %project,
            zone = %zone,
            instance = %name
        );

        let spec = instance_spec(&name, &zone, options);
        let outcome =
            self.clients.compute.insert_instance(&project, &zone, &spec).await.map(|operation| {
                let summary = format!(
                    "Instance `{name}` is being created in zone `{zone}` of project \
                     `{project}`.\n\n- Machine type: {}\n- Image: {}\n- Network: {}\n\
                     - Startup script: {}",
                    spec.machine_type,
                    spec.source_image,
                    spec.network,
                    if spec.metadata.is_empty() { "none" } else { "set" },
                );
                format_operation("Instance Creation Started", &summary, &operation)
            });
        Ok(report("Creating Instance", outcome))
    }

    /// Get the external and internal IP addresses of an instance.
    #[tool(name = "get-instance-ip")]
    async fn get_instance_ip(
        &self,
        params: Parameters<InstanceParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let InstanceParams { name, zone, project_id } = params.0;
        require_instance_name("name", &name)?;
        let zone = parse_zone(&zone)?;
        let project = match self.resolve_project(project_id.as_deref()) {
            Ok(project) => project,
            Err(result) => return Ok(result),
        };
        tracing::info!(
            tool = "get-instance-ip",
            project = %project,
            zone = %zone,
            instance = %name
        );

        let outcome = self.external_ip_report(&project, &zone, &name).await;
        Ok(report("Getting Instance IP", outcome))
    }

    /// Start a stopped instance.
    #[tool(name = "start-instance")]
    async fn start_instance(
        &self,
        params: Parameters<InstanceParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let InstanceParams { name, zone, project_id } = params.0;
        require_instance_name("name", &name)?;
        let zone = parse_zone(&zone)?;
        let project = match self.resolve_project(project_id.as_deref()) {
            Ok(project) => project,
            Err(result) => return Ok(result),
        };
        tracing::info!(tool = "start-instance", project = %project, zone = %zone, instance = %name);

        let outcome = self.clients.compute.start_instance(&project, &zone, &name).await.map(
            |operation| {
                format_operation(
                    "Instance Start Requested",
                    &format!("Instance `{name}` in zone `{zone}` is starting."),
                    &operation,
                )
            },
        );
        Ok(report("Starting Instance", outcome))
    }

    /// Stop a running instance.
    #[tool(name = "stop-instance")]
    async fn stop_instance(
        &self,
        params: Parameters<InstanceParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let InstanceParams { name, zone, project_id } = params.0;
        require_instance_name("name", &name)?;
        let zone = parse_zone(&zone)?;
        let project = match self.resolve_project(project_id.as_deref()) {
            Ok(project) => project,
            Err(result) => return Ok(result),
        };
        tracing::info!(tool = "stop-instance", project = %project, zone = %zone, instance = %name);

        let outcome = self.clients.compute.stop_instance(&project, &zone, &name).await.map(
            |operation| {
                format_operation(
                    "Instance Stop Requested",
                    &format!("Instance `{name}` in zone `{zone}` is stopping."),
                    &operation,
                )
            },
        );
        Ok(report("Stopping Instance", outcome))
    }

    /// Create a VM that installs nginx and serves the given HTML as its index page.
    #[tool(name = "deploy-static-html-site")]
    async fn deploy_static_html_site(
        &self,
        params: Parameters<DeployStaticHtmlSiteParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let DeployStaticHtmlSiteParams { zone, vm_name, html_content, project_id } = params.0;
        let zone = parse_zone(&zone)?;
        require_instance_name("vmName", &vm_name)?;
        require_non_empty("htmlContent", &html_content)?;
        let project = match self.resolve_project(project_id.as_deref()) {
            Ok(project) => project,
            Err(result) => return Ok(result),
        };
        tracing::info!(
            tool = "deploy-static-html-site",
            project = %project,
            zone = %zone,
            instance = %vm_name,
            html_bytes = html_content.len()
        );

        let spec = html_server_spec(&vm_name, &zone, &html_content);
        let outcome =
            self.clients.compute.insert_instance(&project, &zone, &spec).await.map(|operation| {
                let summary = format!(
                    "VM `{vm_name}` is being created in zone `{zone}` of project `{project}`. \
                     Its startup script installs nginx and publishes the provided HTML \
                     ({} bytes).\n\n- Tags: {}\n\nOnce the VM is running, use `get-vm-ip` to \
                     find its address. Port 80 must be open for the `http-server` tag.",
                    html_content.len(),
                    spec.tags.join(", "),
                );
                format_operation("Static Site Deployment Started", &summary, &operation)
            });
        Ok(report("Deploying Static Site", outcome))
    }

    /// Get the lifecycle status of a VM.
    #[tool(name = "get-vm-status")]
    async fn get_vm_status(
        &self,
        params: Parameters<VmParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let VmParams { zone, vm_name, project_id } = params.0;
        let zone = parse_zone(&zone)?;
        require_instance_name("vmName", &vm_name)?;
        let project = match self.resolve_project(project_id.as_deref()) {
            Ok(project) => project,
            Err(result) => return Ok(result),
        };
        tracing::info!(
            tool = "get-vm-status",
            project = %project,
            zone = %zone,
            instance = %vm_name
        );

        let outcome = self
            .clients
            .compute
            .get_instance(&project, &zone, &vm_name)
            .await
            .map(|instance| format_vm_status(&instance));
        Ok(report("Getting VM Status", outcome))
    }

    /// Get the external IP address of a VM and the URL it serves on.
    #[tool(name = "get-vm-ip")]
    async fn get_vm_ip(&self, params: Parameters<VmParams>) -> Result<CallToolResult, ErrorData> {
        let VmParams { zone, vm_name, project_id } = params.0;
        let zone = parse_zone(&zone)?;
        require_instance_name("vmName", &vm_name)?;
        let project = match self.resolve_project(project_id.as_deref()) {
            Ok(project) => project,
            Err(result) => return Ok(result),
        };
        tracing::info!(tool = "get-vm-ip", project = %project, zone = %zone, instance = %vm_name);

        let outcome = self.external_ip_report(&project, &zone, &vm_name).await;
        Ok(report("Getting VM IP", outcome))
    }

    /// Create a Cloud Storage bucket configured for static website hosting, with uniform
    /// bucket-level access: public reads granted later apply to the whole bucket. Rolled
    /// back if configuration fails.
    #[tool(name = "create-static-site-bucket")]
    async fn create_static_site_bucket(
        &self,
        params: Parameters<CreateStaticSiteBucketParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let CreateStaticSiteBucketParams { bucket_name, project_id, location } = params.0;
        require_bucket_name("bucketName", &bucket_name)?;
        let location = non_blank(location).unwrap_or_else(|| DEFAULT_BUCKET_LOCATION.to_owned());
        let project = match self.resolve_project(project_id.as_deref()) {
            Ok(project) => project,
            Err(result) => return Ok(result),
        };
        tracing::info!(
            tool = "create-static-site-bucket",
            project = %project,
            bucket = %bucket_name,
            location = %location
        );

        let spec = site_bucket_spec(&bucket_name, &location);
        Ok(match site_bucket_saga(&self.clients, &project, spec).run().await {
            Ok(steps) => text_result(format!(
                "# Static Site Bucket Created\n\n- Bucket: {bucket_name}\n- Project: {project}\n\
                 - Location: {location}\n- Main page: {DEFAULT_INDEX_PAGE}\n\
                 - Not-found page: {NOT_FOUND_PAGE}\n\n{}\n\
                 Upload content with `upload-static-site-html`.\n",
                format_steps(&steps)
            )),
            Err(failure) => saga_error_result("Creating Static Site Bucket", &failure),
        })
    }

    /// Upload an HTML document to an existing bucket and make it publicly readable. On
    /// buckets with uniform bucket-level access (those made by create-static-site-bucket)
    /// the grant is bucket-wide, so every object in the bucket becomes public; otherwise
    /// only this object is. If the grant fails, the upload is undone and a replaced file is
    /// restored.
    #[tool(name = "upload-static-site-html")]
    async fn upload_static_site_html(
        &self,
        params: Parameters<UploadStaticSiteHtmlParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let UploadStaticSiteHtmlParams { bucket_name, html_content, file_name } = params.0;
        require_bucket_name("bucketName", &bucket_name)?;
        require_non_empty("htmlContent", &html_content)?;
        let file_name = non_blank(file_name).unwrap_or_else(|| DEFAULT_INDEX_PAGE.to_owned());
        validate_object_name(&file_name).map_err(|err| invalid_param("fileName", err))?;
        tracing::info!(
            tool = "upload-static-site-html",
            bucket = %bucket_name,
            object = %file_name
        );

        let upload = html_upload(&file_name, &html_content);
        Ok(match publish_saga(&self.clients, &bucket_name, upload).run().await {
            Ok(steps) => text_result(format!(
                "# HTML Uploaded\n\n- Bucket: {bucket_name}\n- Object: {file_name}\n\
                 - Public URL: {}\n\n{}",
                crate::cloud::types::public_object_url(&bucket_name, &file_name),
                format_steps(&steps)
            )),
            Err(failure) => saga_error_result("Uploading HTML", &failure),
        })
    }

    /// List the Cloud Storage buckets of a project.
    #[tool(name = "list-static-site-buckets")]
    async fn list_static_site_buckets(
        &self,
        params: Parameters<ProjectParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let project = match self.resolve_project(params.0.project_id.as_deref()) {
            Ok(project) => project,
            Err(result) => return Ok(result),
        };
        tracing::info!(tool = "list-static-site-buckets", project = %project);

        let outcome = self
            .clients
            .storage
            .list_buckets(&project)
            .await
            .map(|buckets| format_bucket_list(&project, &buckets));
        Ok(report("Listing Buckets", outcome))
    }

    /// Delete every object in a bucket, then the bucket itself.
    #[tool(name = "delete-static-site-bucket")]
    async fn delete_static_site_bucket(
        &self,
        params: Parameters<BucketParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let bucket = params.0.bucket_name;
        require_bucket_name("bucketName", &bucket)?;
        tracing::info!(tool = "delete-static-site-bucket", bucket = %bucket);

        let outcome = self.empty_and_delete_bucket(&bucket).await;
        Ok(report("Deleting Bucket", outcome))
    }

    /// Publish HTML to a new bucket that is publicly readable as a whole, then create a VM
    /// whose nginx mirrors that bucket. Everything created is removed again if a later
    /// step fails.
    #[tool(name = "deploy-static-site-from-html")]
    async fn deploy_static_site_from_html(
        &self,
        params: Parameters<DeployStaticSiteFromHtmlParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let DeployStaticSiteFromHtmlParams {
            zone,
            vm_name,
            bucket_name,
            html_content,
            project_id,
        } = params.0;
        let zone = parse_zone(&zone)?;
        require_instance_name("vmName", &vm_name)?;
        require_bucket_name("bucketName", &bucket_name)?;
        require_non_empty("htmlContent", &html_content)?;
        let project = match self.resolve_project(project_id.as_deref()) {
            Ok(project) => project,
            Err(result) => return Ok(result),
        };
        tracing::info!(
            tool = "deploy-static-site-from-html",
            project = %project,
            zone = %zone,
            bucket = %bucket_name,
            instance = %vm_name
        );

        let saga = bucket_backed_site_saga(
            &self.clients,
            &project,
            &zone,
            site_bucket_spec(&bucket_name, DEFAULT_BUCKET_LOCATION),
            html_upload(DEFAULT_INDEX_PAGE, &html_content),
            bucket_mirror_spec(&vm_name, &zone, &bucket_name),
        );
        Ok(match saga.run().await {
            Ok(steps) => text_result(format!(
                "# Static Site Deployed\n\n- Bucket: {bucket_name}\n- Public URL: {}\n\
                 - VM: {vm_name} ({zone})\n\n{}\n\
                 The VM copies the bucket into nginx's web root on boot. Use `get-vm-ip` \
                 once it is running.\n",
                crate::cloud::types::public_object_url(&bucket_name, DEFAULT_INDEX_PAGE),
                format_steps(&steps)
            )),
            Err(failure) => saga_error_result("Deploying Static Site", &failure),
        })
    }

    /// List the projects visible to the server's credentials.
    #[tool(name = "list-project-ids")]
    async fn list_project_ids(
        &self,
        params: Parameters<ListProjectIdsParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let ListProjectIdsParams { filter, page_size } = params.0;
        let page_size = page_size_param(
            "pageSize",
            page_size,
            DEFAULT_PROJECT_PAGE_SIZE,
            MAX_PROJECT_PAGE_SIZE,
        )?;
        tracing::info!(tool = "list-project-ids", page_size);

        let query = ProjectQuery { filter: non_blank(filter), page_size };
        let outcome = self
            .clients
            .projects
            .list_projects(&query)
            .await
            .map(|page| format_project_page(&page));
        Ok(report("Listing Projects", outcome))
    }

    /// List the Compute Engine zones of a project.
    #[tool(name = "list-zones")]
    async fn list_zones(
        &self,
        params: Parameters<ProjectParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let project = match self.resolve_project(params.0.project_id.as_deref()) {
            Ok(project) => project,
            Err(result) => return Ok(result),
        };
        tracing::info!(tool = "list-zones", project = %project);

        let outcome = self
            .clients
            .compute
            .list_zones(&project)
            .await
            .map(|zones| format_zone_list(&project, &zones));
        Ok(report("Listing Zones", outcome))
    }

    /// List the objects stored in a bucket.
    #[tool(name = "list-bucket-objects")]
    async fn list_bucket_objects(
        &self,
        params: Parameters<BucketParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let bucket = params.0.bucket_name;
        require_bucket_name("bucketName", &bucket)?;
        tracing::info!(tool = "list-bucket-objects", bucket = %bucket);

        let outcome = self
            .clients
            .storage
            .list_objects(&bucket)
            .await
            .map(|objects| format_object_list(&bucket, &objects));
        Ok(report("Listing Objects", outcome))
    }

    /// Discover which services a project uses and return a Mermaid flowchart of them.
    #[tool(name = "generate-gcp-mermaid-diagram")]
    async fn generate_gcp_mermaid_diagram(
        &self,
        params: Parameters<GenerateDiagramParams>,
    ) -> Result<CallToolResult, ErrorData> {
        require_non_empty("projectId", &params.0.project_id)?;
        let project = match self.resolve_project(Some(params.0.project_id.as_str())) {
            Ok(project) => project,
            Err(result) => return Ok(result),
        };
        tracing::info!(tool = "generate-gcp-mermaid-diagram", project = %project);

        let diagram = assemble(&self.clients, &project).await;
        Ok(match render_architecture_flowchart(&diagram) {
            Ok(mermaid) => text_result(format!(
                "# GCP Architecture Diagram ({project})\n\n```mermaid\n{mermaid}```\n"
            )),
            Err(err) => {
                tracing::error!(project = %project, error = %err, "diagram rendering failed");
                error_text_result("Generating Diagram", &err.to_string())
            }
        })
    }
}

#[tool_handler]
impl ServerHandler for GcpMcp {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Google Cloud tools for Compute Engine instances, Cloud Storage static sites, \
                 project listing and architecture diagrams. Instances of a project are also \
                 readable as the gcp://{projectId}/instances resource. projectId defaults to \
                 the server's configured project."
                    .into(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().enable_resources().build(),
            ..Default::default()
        }
    }

    async fn list_resources(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListResourcesResult, ErrorData> {
        Ok(ListResourcesResult::with_all_items(
            self.config.default_project().map(instances_resource).into_iter().collect(),
        ))
    }

    async fn list_resource_templates(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListResourceTemplatesResult, ErrorData> {
        Ok(ListResourceTemplatesResult::with_all_items(vec![instances_resource_template()]))
    }

    async fn read_resource(
        &self,
        request: ReadResourceRequestParams,
        _context: RequestContext<RoleServer>,
    ) -> Result<ReadResourceResult, ErrorData> {
        self.read_instances_resource(&request.uri).await
    }
}

// Validation, report formatting and resource URI helpers for the tool handlers.
include!("server/helpers.rs");

#[cfg(test)]
mod e2e;
