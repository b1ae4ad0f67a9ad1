// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of gcp-mcp and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

/// MCP server helper functions:
/// parameter validation, Markdown reports, error results, and the instances resource URI.
const DEFAULT_INSTANCE_PAGE_SIZE: u32 = 50;
const MAX_INSTANCE_PAGE_SIZE: u32 = 500;
const DEFAULT_PROJECT_PAGE_SIZE: u32 = 200;
const MAX_PROJECT_PAGE_SIZE: u32 = 1000;

const RESOURCE_SCHEME: &str = "gcp://";
const INSTANCES_RESOURCE_SUFFIX: &str = "/instances";
const INSTANCES_RESOURCE_TEMPLATE: &str = "gcp://{projectId}/instances";
const MARKDOWN_MIME_TYPE: &str = "text/markdown";

fn invalid_param(field: &str, err: impl std::fmt::Display) -> ErrorData {
    ErrorData::invalid_params(
        format!("invalid {field}: {err}"),
        Some(serde_json::json!({ "field": field })),
    )
}

fn parse_zone(value: &str) -> Result<Zone, ErrorData> {
    Zone::new(value.trim()).map_err(|err| {
        ErrorData::invalid_params(
            format!("invalid zone: {err}"),
            Some(serde_json::json!({ "zone": value })),
        )
    })
}

fn require_instance_name(field: &str, name: &str) -> Result<(), ErrorData> {
    validate_instance_name(name).map_err(|err| invalid_param(field, err))
}

fn require_bucket_name(field: &str, name: &str) -> Result<(), ErrorData> {
    validate_bucket_name(name).map_err(|err| invalid_param(field, err))
}

fn require_non_empty(field: &str, value: &str) -> Result<(), ErrorData> {
    if value.trim().is_empty() {
        return Err(ErrorData::invalid_params(
            format!("{field} must not be empty"),
            Some(serde_json::json!({ "field": field })),
        ));
    }
    Ok(())
}

fn page_size_param(
    field: &str,
    value: Option<u32>,
    default: u32,
    max: u32,
) -> Result<u32, ErrorData> {
    match value {
        None => Ok(default),
        Some(size) if (1..=max).contains(&size) => Ok(size),
        Some(size) => Err(ErrorData::invalid_params(
            format!("{field} must be between 1 and {max}, got {size}"),
            Some(serde_json::json!({ "field": field, "max": max })),
        )),
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.map(|value| value.trim().to_owned()).filter(|value| !value.is_empty())
}

fn text_result(text: String) -> CallToolResult {
    CallToolResult::success(vec![Content::text(text)])
}

fn error_text_result(context: &str, message: &str) -> CallToolResult {
    CallToolResult::error(vec![Content::text(format!("# Error {context}\n\n{message}\n"))])
}

/// Logs the failure and renders it for the client.
fn error_text(context: &str, err: &CloudError) -> String {
    tracing::error!(context, error = %err, "cloud call failed");
    format!("# Error {context}\n\n{}\n", err.user_message())
}

fn report(context: &str, outcome: Result<String, CloudError>) -> CallToolResult {
    match outcome {
        Ok(text) => text_result(text),
        Err(err) => CallToolResult::error(vec![Content::text(error_text(context, &err))]),
    }
}

fn saga_error_result(context: &str, failure: &SagaFailure) -> CallToolResult {
    tracing::error!(
        context,
        step = %failure.failed_step,
        error = %failure.error,
        clean = failure.rolled_back_cleanly(),
        "provisioning failed"
    );
    let mut out = format!(
        "# Error {context}\n\nStep `{}` failed: {}\n",
        failure.failed_step,
        failure.error.user_message()
    );
    if !failure.completed.is_empty() {
        out.push_str("\nCompleted before the failure:\n");
        for step in &failure.completed {
            out.push_str(&format!("- {}\n", step.step));
        }
    }
    if !failure.rollback.is_empty() {
        out.push_str("\nRollback:\n");
        for outcome in &failure.rollback {
            let status = match &outcome.status {
                RollbackStatus::Undone => "undone".to_owned(),
                RollbackStatus::NothingToUndo => "nothing to undo".to_owned(),
                RollbackStatus::Failed { reason } => format!("FAILED ({reason})"),
            };
            out.push_str(&format!("- {}: {status}\n", outcome.step));
        }
        if !failure.rolled_back_cleanly() {
            out.push_str(
                "\nSome resources could not be removed and must be cleaned up manually.\n",
            );
        }
    }
    CallToolResult::error(vec![Content::text(out)])
}

fn format_steps(steps: &[CompletedStep]) -> String {
    let mut out = String::from("Steps:\n");
    for step in steps {
        out.push_str(&format!("- {}: {}\n", step.step, step.detail));
    }
    out
}

fn format_operation(title: &str, summary: &str, operation: &OperationSummary) -> String {
    let json = serde_json::to_string_pretty(operation)
        .unwrap_or_else(|_| format!("{{\"name\": \"{}\"}}", operation.name));
    format!("# {title}\n\n{summary}\n\nOperation:\n```json\n{json}\n```\n")
}

fn format_instance(out: &mut String, instance: &InstanceDescriptor) {
    let internal = instance.internal_ips();
    out.push_str(&format!("## {}\n", instance.name));
    out.push_str(&format!("- Zone: {}\n", instance.zone));
    out.push_str(&format!("- Status: {}\n", instance.status));
    out.push_str(&format!("- Machine type: {}\n", instance.machine_type));
    out.push_str(&format!("- Internal IP: {}\n", list_or_none(&internal)));
    out.push_str(&format!("- External IP: {}\n\n", list_or_none(&instance.external_ips)));
}

fn list_or_none<S: AsRef<str>>(values: &[S]) -> String {
    if values.is_empty() {
        "none".to_owned()
    } else {
        values.iter().map(AsRef::as_ref).collect::<Vec<_>>().join(", ")
    }
}

fn format_instance_list(
    project: &ProjectId,
    zone: Option<&Zone>,
    instances: &[InstanceDescriptor],
) -> String {
    if instances.is_empty() {
        return match zone {
            Some(zone) => format!("No instances found in zone `{zone}` of project `{project}`."),
            None => format!("No instances found in project `{project}`."),
        };
    }
    let scope = zone.map_or_else(|| "all zones".to_owned(), |zone| format!("zone `{zone}`"));
    let mut out = format!(
        "# Compute Engine Instances\n\nProject `{project}`, {scope}: {} instance(s).\n\n",
        instances.len()
    );
    for instance in instances {
        format_instance(&mut out, instance);
    }
    out
}

fn format_external_ip(instance: &InstanceDescriptor, ip: &str) -> String {
    format!(
        "# Instance IP Address\n\n- Instance: {}\n- Zone: {}\n- Status: {}\n- External IP: {ip}\n\
         - Internal IP: {}\n- URL: http://{ip}/\n",
        instance.name,
        instance.zone,
        instance.status,
        list_or_none(&instance.internal_ips()),
    )
}

fn format_vm_status(instance: &InstanceDescriptor) -> String {
    let hint = match instance.status.as_str() {
        "RUNNING" => "The VM is running.",
        "PROVISIONING" | "STAGING" => "The VM is still starting; check again shortly.",
        "STOPPING" | "SUSPENDING" => "The VM is shutting down.",
        "TERMINATED" | "SUSPENDED" => "The VM is stopped; use `start-instance` to start it.",
        _ => "The VM is in an unexpected state.",
    };
    format!(
        "# VM Status\n\n- VM: {}\n- Zone: {}\n- Status: {}\n- Machine type: {}\n\n{hint}\n",
        instance.name, instance.zone, instance.status, instance.machine_type
    )
}

fn format_zone_list(project: &ProjectId, zones: &[ZoneDescriptor]) -> String {
    if zones.is_empty() {
        return format!("No zones found in project `{project}`.");
    }
    let mut out = format!("# Zones\n\nProject `{project}`: {} zone(s).\n\n", zones.len());
    for zone in zones {
        out.push_str(&format!("- {} ({}, region {})\n", zone.name, zone.status, zone.region));
    }
    out
}

fn format_bucket_list(project: &ProjectId, buckets: &[BucketDescriptor]) -> String {
    if buckets.is_empty() {
        return format!("No buckets found in project `{project}`.");
    }
    let mut out = format!(
        "# Cloud Storage Buckets\n\nProject `{project}`: {} bucket(s).\n\n",
        buckets.len()
    );
    for bucket in buckets {
        out.push_str(&format!("## {}\n", bucket.name));
        out.push_str(&format!("- Location: {}\n", bucket.location));
        out.push_str(&format!("- Storage class: {}\n", bucket.storage_class));
        out.push_str(&format!("- Created: {}\n", bucket.created));
        out.push_str(&format!(
            "- Uniform access: {}\n",
            if bucket.uniform_access { "enabled" } else { "disabled" }
        ));
        match &bucket.main_page {
            Some(page) => {
                out.push_str(&format!("- Website: {}\n\n", bucket.public_url(page)));
            }
            None => out.push_str("- Website: not configured\n\n"),
        }
    }
    out
}

fn format_object_list(bucket: &str, objects: &[ObjectDescriptor]) -> String {
    if objects.is_empty() {
        return format!("Bucket `{bucket}` is empty.");
    }
    let mut out = format!("# Objects in {bucket}\n\n{} object(s).\n\n", objects.len());
    for object in objects {
        out.push_str(&format!(
            "- {} ({} bytes, {})\n",
            object.name, object.size, object.content_type
        ));
    }
    out
}

fn format_project_page(page: &ProjectPage) -> String {
    if page.projects.is_empty() {
        return "No projects are visible to the configured credentials.".to_owned();
    }
    let mut out = format!("# Projects\n\n{} project(s).\n\n", page.projects.len());
    for project in &page.projects {
        if project.name == project.project_id {
            out.push_str(&format!("- {} ({})\n", project.project_id, project.state));
        } else {
            out.push_str(&format!(
                "- {} \"{}\" ({})\n",
                project.project_id, project.name, project.state
            ));
        }
    }
    if let Some(token) = &page.next_page_token {
        out.push_str(&format!(
            "\nMore projects exist (nextPageToken `{token}`); narrow the filter or raise \
             pageSize.\n"
        ));
    }
    out
}

fn instances_resource_uri(project: &ProjectId) -> String {
    format!("{RESOURCE_SCHEME}{project}{INSTANCES_RESOURCE_SUFFIX}")
}

/// `gcp://<project>/instances` → `<project>`.
fn parse_instances_resource_uri(uri: &str) -> Option<&str> {
    let project = uri.strip_prefix(RESOURCE_SCHEME)?.strip_suffix(INSTANCES_RESOURCE_SUFFIX)?;
    (!project.is_empty() && !project.contains('/')).then_some(project)
}

fn instances_resource(project: &ProjectId) -> rmcp::model::Resource {
    let mut resource =
        RawResource::new(instances_resource_uri(project), format!("{project} instances"));
    resource.description =
        Some(format!("Compute Engine instances across all zones of project {project}"));
    resource.mime_type = Some(MARKDOWN_MIME_TYPE.to_owned());
    resource.no_annotation()
}

fn instances_resource_template() -> rmcp::model::ResourceTemplate {
    RawResourceTemplate {
        uri_template: INSTANCES_RESOURCE_TEMPLATE.to_owned(),
        name: "project-instances".to_owned(),
        title: Some("Project instances".to_owned()),
        description: Some("Compute Engine instances across all zones of a project".to_owned()),
        mime_type: Some(MARKDOWN_MIME_TYPE.to_owned()),
        icons: None,
    }
    .no_annotation()
}
