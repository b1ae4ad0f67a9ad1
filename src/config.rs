// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of gcp-mcp and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Server configuration resolved once at startup.

use std::fmt;

use crate::model::{IdError, ProjectId};

/// Environment variable read by the `--project` flag.
pub const PROJECT_ENV: &str = "GOOGLE_CLOUD_PROJECT";

/// Consulted in order when neither `--project` nor [`PROJECT_ENV`] is set.
const FALLBACK_PROJECT_ENVS: [&str; 2] = ["GCLOUD_PROJECT", "CLOUDSDK_CORE_PROJECT"];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServerConfig {
    default_project: Option<ProjectId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectResolutionError {
    Missing,
    Invalid { value: String, reason: IdError },
}

impl fmt::Display for ProjectResolutionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing => write!(
                f,
                "no project ID given and no default project configured \
                 (pass projectId, start with --project, or set {PROJECT_ENV})"
            ),
            Self::Invalid { value, reason } => write!(f, "invalid project ID '{value}': {reason}"),
        }
    }
}

impl std::error::Error for ProjectResolutionError {}

impl ServerConfig {
    pub fn new(default_project: Option<ProjectId>) -> Self {
        Self { default_project }
    }

    pub fn default_project(&self) -> Option<&ProjectId> {
        self.default_project.as_ref()
    }

    /// A non-blank explicit project wins over the configured default.
    pub fn resolve_project(
        &self,
        explicit: Option<&str>,
    ) -> Result<ProjectId, ProjectResolutionError> {
        match explicit.map(str::trim).filter(|value| !value.is_empty()) {
            Some(value) => ProjectId::new(value).map_err(|reason| {
                ProjectResolutionError::Invalid { value: value.to_owned(), reason }
            }),
            None => self.default_project.clone().ok_or(ProjectResolutionError::Missing),
        }
    }
}

/// First usable project among the flag and the fallback environment variables.
pub fn project_from_sources(
    flag: Option<&str>,
    env: impl Fn(&str) -> Option<String>,
) -> Option<ProjectId> {
    let fallbacks = FALLBACK_PROJECT_ENVS.iter().filter_map(|&key| env(key));
    let candidates = flag.map(str::to_owned).into_iter().chain(fallbacks);
    for candidate in candidates {
        match ProjectId::new(candidate.trim()) {
            Ok(project) => return Some(project),
            Err(IdError::Empty) => {}
            Err(err) => tracing::warn!(value = %candidate, error = %err, "ignoring project ID"),
        }
    }
    None
}

/// Resolve the default project: flag/env first, then `gcloud config`.
pub async fn discover_default_project(flag: Option<&str>) -> Option<ProjectId> {
    if let Some(project) = project_from_sources(flag, |key| std::env::var(key).ok()) {
        return Some(project);
    }
    let project = gcloud_configured_project().await;
    if project.is_none() {
        tracing::info!("no default project configured; tools will require projectId");
    }
    project
}

async fn gcloud_configured_project() -> Option<ProjectId> {
    let output = tokio::process::Command::new("gcloud")
        .args(["config", "get-value", "project"])
        .output()
        .await
        .map_err(|err| tracing::debug!(error = %err, "gcloud not available"))
        .ok()?;
    if !output.status.success() {
        return None;
    }
    parse_gcloud_project(&String::from_utf8_lossy(&output.stdout))
}

fn parse_gcloud_project(stdout: &str) -> Option<ProjectId> {
    let value = stdout.lines().map(str::trim).find(|line| !line.is_empty())?;
    if value == "(unset)" {
        return None;
    }
    ProjectId::new(value).ok()
}
