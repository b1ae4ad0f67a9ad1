// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of gcp-mcp and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Service discovery for architecture diagrams.
//!
//! Probes run one after another in [`ServiceKind::ALL`] order. Every present
//! service contributes one node plus one edge from the project root; failed
//! probes count as absent and are recorded as diagram diagnostics.

mod probe;

pub use probe::{probe, ProbeOutcome, ProbePolicy, ServiceKind};

use crate::cloud::CloudClients;
use crate::model::{ArchitectureDiagram, DiagramEdge, DiagramNode, NodeId, ProjectId, StyleClass};

pub const PROJECT_NODE_ID: &str = "PROJECT";

pub async fn assemble(clients: &CloudClients, project: &ProjectId) -> ArchitectureDiagram {
    let mut diagram = ArchitectureDiagram::new(format!("GCP architecture for project {project}"));
    let root = NodeId::from_static(PROJECT_NODE_ID);
    diagram.push_node(DiagramNode::new(
        root.clone(),
        format!("GCP Project\n{project}"),
        StyleClass::Project,
    ));

    for kind in ServiceKind::ALL {
        match probe(clients, kind, project).await {
            ProbeOutcome::Present => {
                let node_id = NodeId::from_static(kind.node_id());
                let node = DiagramNode::new(node_id.clone(), kind.label(), kind.style_class());
                diagram.push_node(node);
                diagram.push_edge(DiagramEdge::new(root.clone(), node_id));
            }
            ProbeOutcome::Absent => {
                tracing::debug!(project = %project, service = %kind, "service not in use");
            }
            ProbeOutcome::Failed { reason } => {
                tracing::warn!(project = %project, service = %kind, %reason, "probe failed");
                diagram.push_diagnostic(format!("probe {kind} failed: {reason}"));
            }
        }
    }

    diagram
}

#[cfg(test)]
mod tests {
    use super::{assemble, PROJECT_NODE_ID};
    use crate::cloud::testing::{instance, FakeCloud};
    use crate::format::mermaid::render_architecture_flowchart;
    use crate::model::ProjectId;

    fn project() -> ProjectId {
        ProjectId::new("shop-prod").expect("project id")
    }

    fn node_ids(diagram: &crate::model::ArchitectureDiagram) -> Vec<&str> {
        diagram.nodes().iter().map(|node| node.id().as_str()).collect()
    }

    #[tokio::test]
    async fn every_present_service_hangs_off_the_project_root() {
        let fake = FakeCloud::new()
            .with_zone("us-central1-a")
            .with_instance(instance("web", "us-central1-a", "RUNNING", None))
            .with_spanner_instance("orders");

        let diagram = assemble(&fake.clients(), &project()).await;

        assert_eq!(
            node_ids(&diagram),
            vec!["PROJECT", "COMPUTE", "SPANNER", "IAM", "LOGGING", "MONITORING"]
        );
        assert_eq!(diagram.edges().len(), diagram.nodes().len() - 1);
        assert!(diagram
            .edges()
            .iter()
            .all(|edge| edge.from_node_id().as_str() == PROJECT_NODE_ID));
        assert!(diagram.diagnostics().is_empty());
        assert_eq!(diagram.nodes()[0].label(), "GCP Project\nshop-prod");
    }

    #[tokio::test]
    async fn absent_services_are_skipped() {
        let fake = FakeCloud::new().with_zone("us-central1-a");
        let diagram = assemble(&fake.clients(), &project()).await;
        assert_eq!(node_ids(&diagram), vec!["PROJECT", "IAM", "LOGGING", "MONITORING"]);
        assert_eq!(diagram.edges().len(), 3);
    }

    #[tokio::test]
    async fn failed_probe_is_reported_without_aborting() {
        let fake = FakeCloud::new()
            .failing("list_zones", "Compute Engine API has not been used in project shop-prod")
            .with_spanner_instance("orders");

        let diagram = assemble(&fake.clients(), &project()).await;

        assert_eq!(node_ids(&diagram), vec!["PROJECT", "SPANNER", "IAM", "LOGGING", "MONITORING"]);
        assert_eq!(diagram.diagnostics().len(), 1);
        assert!(diagram.diagnostics()[0].starts_with("probe compute failed: "));

        let rendered = render_architecture_flowchart(&diagram).expect("render");
        assert!(rendered.contains(
            "%% probe compute failed: fake API returned HTTP 500: \
             Compute Engine API has not been used in project shop-prod"
        ));
    }

    #[tokio::test]
    async fn probes_run_in_fixed_order() {
        let fake = FakeCloud::new().with_zone("us-central1-a");
        assemble(&fake.clients(), &project()).await;
        assert_eq!(
            fake.operations(),
            vec!["list_zones", "list_instances", "list_spanner_instances"]
        );
    }
}
