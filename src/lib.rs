// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of gcp-mcp and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! gcp-mcp: Google Cloud over the Model Context Protocol.
//!
//! Compute Engine instance management, Cloud Storage static sites, project
//! listing and Mermaid architecture diagrams, exposed as MCP tools.

pub mod cloud;
pub mod config;
pub mod deploy;
pub mod discovery;
pub mod format;
pub mod mcp;
pub mod model;
