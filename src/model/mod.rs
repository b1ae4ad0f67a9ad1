// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of gcp-mcp and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Request-scoped data model: identifiers, naming rules and architecture diagrams.
//!
//! Nothing here outlives a single tool invocation.

pub mod diagram;
pub mod ids;
pub mod names;

pub use diagram::{ArchitectureDiagram, DiagramEdge, DiagramNode, StyleClass};
pub use ids::{Id, IdError, NodeId, ProjectId, Zone};
pub use names::{validate_bucket_name, validate_instance_name, validate_object_name, NameError};
