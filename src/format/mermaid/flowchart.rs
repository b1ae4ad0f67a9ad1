// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of gcp-mcp and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeSet;
use std::fmt;

use super::ident::{comment_text, escape_label, validate_mermaid_ident};
pub use super::ident::MermaidIdentError;

use crate::model::{ArchitectureDiagram, NodeId, StyleClass};

const INDENT: &str = "    ";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MermaidFlowchartExportError {
    InvalidNodeId { node_id: NodeId, reason: MermaidIdentError },
    DuplicateNode { node_id: NodeId },
    MissingNode { node_id: NodeId },
}

impl fmt::Display for MermaidFlowchartExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidNodeId { node_id, reason } => {
                write!(f, "cannot export node id as Mermaid identifier: {node_id} ({reason})")
            }
            Self::DuplicateNode { node_id } => write!(f, "node declared twice: {node_id}"),
            Self::MissingNode { node_id } => {
                write!(f, "edge references missing node id: {node_id}")
            }
        }
    }
}

impl std::error::Error for MermaidFlowchartExportError {}

/// Render an architecture diagram as a Mermaid `flowchart` document.
///
/// Output is deterministic for identical input:
/// - a `%%` header comment block, then the `flowchart TD` directive;
/// - nodes in insertion order, each tagged `:::<class>`;
/// - edges in insertion order (`A --> B` or `A -->|label| B`);
/// - one `classDef` line per [`StyleClass`], always in [`StyleClass::ALL`] order;
/// - a trailing `%%` diagnostics footer when the diagram carries notes.
pub fn render_architecture_flowchart(
    diagram: &ArchitectureDiagram,
) -> Result<String, MermaidFlowchartExportError> {
    let mut out = String::new();
    if !diagram.title().is_empty() {
        out.push_str("%% ");
        out.push_str(&comment_text(diagram.title()));
        out.push('\n');
    }
    out.push_str("%% nodes: ");
    out.push_str(&diagram.nodes().len().to_string());
    out.push_str(", edges: ");
    out.push_str(&diagram.edges().len().to_string());
    out.push('\n');
    out.push_str("flowchart TD\n");

    let mut declared = BTreeSet::<&str>::new();
    for node in diagram.nodes() {
        let node_id = node.id();
        validate_mermaid_ident(node_id.as_str()).map_err(|reason| {
            MermaidFlowchartExportError::InvalidNodeId { node_id: node_id.clone(), reason }
        })?;
        if !declared.insert(node_id.as_str()) {
            return Err(MermaidFlowchartExportError::DuplicateNode { node_id: node_id.clone() });
        }

        out.push_str(INDENT);
        out.push_str(node_id.as_str());
        out.push_str("[\"");
        out.push_str(&escape_label(node.label()));
        out.push_str("\"]:::");
        out.push_str(node.style_class().as_str());
        out.push('\n');
    }

    for edge in diagram.edges() {
        for endpoint in [edge.from_node_id(), edge.to_node_id()] {
            if !declared.contains(endpoint.as_str()) {
                return Err(MermaidFlowchartExportError::MissingNode { node_id: endpoint.clone() });
            }
        }

        out.push_str(INDENT);
        out.push_str(edge.from_node_id().as_str());
        out.push_str(" -->");
        if let Some(label) = edge.label().filter(|label| !label.is_empty()) {
            out.push('|');
            out.push_str(&escape_label(label));
            out.push('|');
        }
        out.push(' ');
        out.push_str(edge.to_node_id().as_str());
        out.push('\n');
    }

    for class in StyleClass::ALL {
        out.push_str(INDENT);
        out.push_str("classDef ");
        out.push_str(class.as_str());
        out.push(' ');
        out.push_str(class.presentation());
        out.push('\n');
    }

    if !diagram.diagnostics().is_empty() {
        out.push_str("%% diagnostics\n");
        for note in diagram.diagnostics() {
            out.push_str("%% ");
            out.push_str(&comment_text(note));
            out.push('\n');
        }
    }

    Ok(out)
}
