// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of gcp-mcp and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Mermaid export for generated architecture diagrams.

pub mod flowchart;
mod ident;

pub use flowchart::{
    render_architecture_flowchart, MermaidFlowchartExportError, MermaidIdentError,
};
