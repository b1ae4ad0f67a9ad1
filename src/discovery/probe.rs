// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of gcp-mcp and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;

use crate::cloud::{CloudClients, CloudError, ComputeApi, InstanceQuery, SpannerApi};
use crate::model::{ProjectId, StyleClass, Zone};

/// A cloud service that can appear as a node of the architecture diagram.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ServiceKind {
    Compute,
    Database,
    Iam,
    Logging,
    Monitoring,
}

/// How presence of a service is decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbePolicy {
    /// Ask the cloud.
    Check,
    /// Assumed enabled in every project; no call is made.
    AlwaysPresent,
}

impl ServiceKind {
    /// Probe order, which is also node and edge emission order.
    pub const ALL: [ServiceKind; 5] = [
        ServiceKind::Compute,
        ServiceKind::Database,
        ServiceKind::Iam,
        ServiceKind::Logging,
        ServiceKind::Monitoring,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Compute => "compute",
            Self::Database => "database",
            Self::Iam => "iam",
            Self::Logging => "logging",
            Self::Monitoring => "monitoring",
        }
    }

    pub fn policy(self) -> ProbePolicy {
        match self {
            Self::Compute | Self::Database => ProbePolicy::Check,
            Self::Iam | Self::Logging | Self::Monitoring => ProbePolicy::AlwaysPresent,
        }
    }

    /// Fixed diagram node id; at most one node per service.
    pub fn node_id(self) -> &'static str {
        match self {
            Self::Compute => "COMPUTE",
            Self::Database => "SPANNER",
            Self::Iam => "IAM",
            Self::Logging => "LOGGING",
            Self::Monitoring => "MONITORING",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Compute => "Compute Engine",
            Self::Database => "Cloud Spanner",
            Self::Iam => "IAM",
            Self::Logging => "Cloud Logging",
            Self::Monitoring => "Cloud Monitoring",
        }
    }

    pub fn style_class(self) -> StyleClass {
        match self {
            Self::Compute => StyleClass::Compute,
            Self::Database => StyleClass::Database,
            Self::Iam => StyleClass::Iam,
            Self::Logging | Self::Monitoring => StyleClass::Observability,
        }
    }
}

impl fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    Present,
    Absent,
    Failed { reason: String },
}

impl ProbeOutcome {
    pub fn is_present(&self) -> bool {
        matches!(self, Self::Present)
    }
}

/// Decide whether `kind` is in use in `project`.
///
/// Cloud failures never escape: they become [`ProbeOutcome::Failed`].
pub async fn probe(clients: &CloudClients, kind: ServiceKind, project: &ProjectId) -> ProbeOutcome {
    if kind.policy() == ProbePolicy::AlwaysPresent {
        return ProbeOutcome::Present;
    }

    let checked = match kind {
        ServiceKind::Compute => compute_has_instances(clients.compute.as_ref(), project).await,
        ServiceKind::Database => database_has_instances(clients.spanner.as_ref(), project).await,
        ServiceKind::Iam | ServiceKind::Logging | ServiceKind::Monitoring => Ok(true),
    };

    match checked {
        Ok(true) => ProbeOutcome::Present,
        Ok(false) => ProbeOutcome::Absent,
        Err(err) => ProbeOutcome::Failed { reason: err.user_message() },
    }
}

/// True as soon as one zone lists an instance; later zones are not queried.
async fn compute_has_instances(
    compute: &dyn ComputeApi,
    project: &ProjectId,
) -> Result<bool, CloudError> {
    let query = InstanceQuery { filter: None, max_results: 1 };
    for zone in compute.list_zones(project).await? {
        let zone = Zone::new(zone.name)
            .map_err(|err| CloudError::other(format!("invalid zone name: {err}")))?;
        if !compute.list_instances(project, &zone, &query).await?.is_empty() {
            return Ok(true);
        }
    }
    Ok(false)
}

async fn database_has_instances(
    spanner: &dyn SpannerApi,
    project: &ProjectId,
) -> Result<bool, CloudError> {
    Ok(!spanner.list_instances(project).await?.is_empty())
}
