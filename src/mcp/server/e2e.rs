// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of gcp-mcp and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use super::*;

use crate::cloud::testing::{instance, FakeCloud};
use rmcp::model::{CallToolRequestParams, JsonObject};
use rmcp::service::RunningService;
use rmcp::RoleClient;

fn new_runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread().enable_all().build().expect("tokio runtime")
}

/// Serve `mcp` over an in-memory pipe and connect a plain client to it.
async fn connect(mcp: GcpMcp) -> RunningService<RoleClient, ()> {
    let (server_io, client_io) = tokio::io::duplex(64 * 1024);
    tokio::spawn(async move {
        let service = mcp.serve(server_io).await.expect("server init");
        let _ = service.waiting().await;
    });
    ().serve(client_io).await.expect("client init")
}

fn arguments(value: serde_json::Value) -> JsonObject {
    match value {
        serde_json::Value::Object(map) => map,
        other => panic!("expected object arguments, got {other}"),
    }
}

async fn call(
    client: &RunningService<RoleClient, ()>,
    name: &'static str,
    args: serde_json::Value,
) -> CallToolResult {
    client
        .call_tool(CallToolRequestParams {
            meta: None,
            name: name.into(),
            arguments: Some(arguments(args)),
            task: None,
        })
        .await
        .unwrap_or_else(|err| panic!("{name}: {err}"))
}

fn first_text(result: &CallToolResult) -> String {
    result
        .content
        .first()
        .and_then(|content| content.as_text())
        .map(|text| text.text.clone())
        .unwrap_or_default()
}

#[test]
fn e2e_agent_deploys_inspects_and_tears_down_a_static_site() {
    let runtime = new_runtime();
    let fake = FakeCloud::new().with_zone("us-central1-a");
    let mcp = GcpMcp::new(fake.clients(), ServerConfig::new(Some(pid("demo-project"))));

    runtime.block_on(async {
        let client = connect(mcp).await;

        let info = client.peer_info().expect("server info");
        assert!(info.capabilities.tools.is_some());
        assert!(info.capabilities.resources.is_some());

        let tools = client.list_all_tools().await.expect("tools/list");
        assert_eq!(tools.len(), 18);

        // Step 1: publish the page to a bucket and put a mirroring VM in front of it.
        let deployed = call(
            &client,
            "deploy-static-site-from-html",
            serde_json::json!({
                "zone": "us-central1-a",
                "vmName": "site-vm",
                "bucketName": "demo-site",
                "htmlContent": "<h1>hello</h1>",
            }),
        )
        .await;
        assert_eq!(deployed.is_error, Some(false), "{}", first_text(&deployed));
        assert!(first_text(&deployed).starts_with("# Static Site Deployed"));

        // Step 2: the VM shows up in the resource view of the default project.
        let templates = client.list_all_resource_templates().await.expect("templates/list");
        assert_eq!(templates[0].uri_template, "gcp://{projectId}/instances");
        let resources = client.list_all_resources().await.expect("resources/list");
        assert_eq!(resources.len(), 1);
        assert_eq!(resources[0].uri, "gcp://demo-project/instances");

        let read = client
            .read_resource(ReadResourceRequestParams {
                meta: None,
                uri: "gcp://demo-project/instances".to_owned(),
            })
            .await
            .expect("resources/read");
        let ResourceContents::TextResourceContents { text, .. } = &read.contents[0] else {
            panic!("expected text contents");
        };
        assert!(text.contains("## site-vm"));
        assert!(text.contains("- Status: PROVISIONING"));

        // Step 3: its address is the one the fake assigns to external NAT configs.
        let ip = call(
            &client,
            "get-vm-ip",
            serde_json::json!({ "zone": "us-central1-a", "vmName": "site-vm" }),
        )
        .await;
        assert!(first_text(&ip).contains("- External IP: 203.0.113.10"));

        // Step 4: tear down.
        let deleted = call(
            &client,
            "delete-instance",
            serde_json::json!({ "name": "site-vm", "zone": "us-central1-a" }),
        )
        .await;
        assert_eq!(deleted.is_error, Some(false));
        let bucket_gone = call(
            &client,
            "delete-static-site-bucket",
            serde_json::json!({ "bucketName": "demo-site" }),
        )
        .await;
        assert_eq!(bucket_gone.is_error, Some(false));

        client.cancel().await.expect("client shutdown");
    });

    assert!(fake.bucket_names().is_empty());
    assert!(fake.instance_names().is_empty());
}

#[test]
fn e2e_protocol_errors_and_tool_errors_stay_distinct() {
    let runtime = new_runtime();
    let fake = FakeCloud::new()
        .with_zone("us-central1-a")
        .with_instance(instance("private-vm", "us-central1-a", "RUNNING", None));
    let mcp = GcpMcp::new(fake.clients(), ServerConfig::new(Some(pid("demo-project"))));

    runtime.block_on(async {
        let client = connect(mcp).await;

        // Missing required field: rejected by the protocol layer.
        let invalid = client
            .call_tool(CallToolRequestParams {
                meta: None,
                name: "get-vm-ip".into(),
                arguments: Some(arguments(serde_json::json!({ "zone": "us-central1-a" }))),
                task: None,
            })
            .await;
        assert!(invalid.is_err());

        // Valid call, failing lookup: a normal result flagged as an error.
        let no_ip = call(
            &client,
            "get-vm-ip",
            serde_json::json!({ "zone": "us-central1-a", "vmName": "private-vm" }),
        )
        .await;
        assert_eq!(no_ip.is_error, Some(true));
        assert!(first_text(&no_ip).contains("no external IP address assigned"));

        // The server keeps serving after both.
        let zones = call(&client, "list-zones", serde_json::json!({})).await;
        assert!(first_text(&zones).contains("- us-central1-a (UP, region us-central1)"));

        client.cancel().await.expect("client shutdown");
    });

    assert!(fake.mutations().is_empty());
}

fn pid(value: &str) -> ProjectId {
    ProjectId::new(value).expect("project id")
}
