// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of gcp-mcp and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use super::ids::NodeId;
use std::fmt;

/// Presentation class attached to every node of an architecture diagram.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StyleClass {
    Project,
    Compute,
    Database,
    Storage,
    Network,
    Iam,
    Observability,
}

impl StyleClass {
    /// Declaration order of the trailing `classDef` block.
    pub const ALL: [StyleClass; 7] = [
        StyleClass::Project,
        StyleClass::Compute,
        StyleClass::Database,
        StyleClass::Storage,
        StyleClass::Network,
        StyleClass::Iam,
        StyleClass::Observability,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Project => "project",
            Self::Compute => "compute",
            Self::Database => "database",
            Self::Storage => "storage",
            Self::Network => "network",
            Self::Iam => "iam",
            Self::Observability => "observability",
        }
    }

    /// Fixed presentation attributes (Google brand palette).
    pub fn presentation(self) -> &'static str {
        match self {
            Self::Project => "fill:#4285F4,stroke:#1A73E8,stroke-width:2px,color:#FFFFFF",
            Self::Compute => "fill:#34A853,stroke:#188038,stroke-width:1px,color:#FFFFFF",
            Self::Database => "fill:#FBBC04,stroke:#F29900,stroke-width:1px,color:#202124",
            Self::Storage => "fill:#EA4335,stroke:#C5221F,stroke-width:1px,color:#FFFFFF",
            Self::Network => "fill:#A142F4,stroke:#8430CE,stroke-width:1px,color:#FFFFFF",
            Self::Iam => "fill:#5F6368,stroke:#3C4043,stroke-width:1px,color:#FFFFFF",
            Self::Observability => "fill:#24C1E0,stroke:#129EAF,stroke-width:1px,color:#202124",
        }
    }
}

impl fmt::Display for StyleClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagramNode {
    id: NodeId,
    label: String,
    style_class: StyleClass,
}

impl DiagramNode {
    /// `label` is display text and may contain line breaks.
    pub fn new(id: NodeId, label: impl Into<String>, style_class: StyleClass) -> Self {
        Self { id, label: label.into(), style_class }
    }

    pub fn id(&self) -> &NodeId {
        &self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn style_class(&self) -> StyleClass {
        self.style_class
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagramEdge {
    from: NodeId,
    to: NodeId,
    label: Option<String>,
}

impl DiagramEdge {
    pub fn new(from: NodeId, to: NodeId) -> Self {
        Self { from, to, label: None }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn from_node_id(&self) -> &NodeId {
        &self.from
    }

    pub fn to_node_id(&self) -> &NodeId {
        &self.to
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }
}

/// Ordered node/edge lists of one generated architecture diagram.
///
/// Emission order is insertion order. Edge endpoints are not validated here;
/// the renderer rejects edges that reference undeclared nodes.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ArchitectureDiagram {
    title: String,
    nodes: Vec<DiagramNode>,
    edges: Vec<DiagramEdge>,
    diagnostics: Vec<String>,
}

impl ArchitectureDiagram {
    pub fn new(title: impl Into<String>) -> Self {
        Self { title: title.into(), ..Self::default() }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn nodes(&self) -> &[DiagramNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[DiagramEdge] {
        &self.edges
    }

    pub fn diagnostics(&self) -> &[String] {
        &self.diagnostics
    }

    pub fn contains_node(&self, node_id: &NodeId) -> bool {
        self.nodes.iter().any(|node| node.id() == node_id)
    }

    pub fn push_node(&mut self, node: DiagramNode) {
        self.nodes.push(node);
    }

    pub fn push_edge(&mut self, edge: DiagramEdge) {
        self.edges.push(edge);
    }

    pub fn push_diagnostic(&mut self, note: impl Into<String>) {
        self.diagnostics.push(note.into());
    }
}
