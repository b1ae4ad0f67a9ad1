// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of gcp-mcp and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Resource naming rules checked before any cloud call.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;

const INSTANCE_NAME_PATTERN: &str = r"^[a-z]([-a-z0-9]{0,61}[a-z0-9])?$";
const BUCKET_NAME_PATTERN: &str = r"^[a-z0-9][a-z0-9._-]{1,61}[a-z0-9]$";
const OBJECT_NAME_MAX_BYTES: usize = 1024;

static INSTANCE_NAME: OnceLock<Result<Regex, regex::Error>> = OnceLock::new();
static BUCKET_NAME: OnceLock<Result<Regex, regex::Error>> = OnceLock::new();

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameError {
    InvalidInstanceName { name: String },
    InvalidBucketName { name: String },
    InvalidObjectName { name: String, reason: &'static str },
    Pattern(String),
}

impl fmt::Display for NameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidInstanceName { name } => write!(
                f,
                "invalid instance name '{name}': use 1-63 lowercase letters, digits or hyphens, \
                 starting with a letter and not ending with a hyphen"
            ),
            Self::InvalidBucketName { name } => write!(
                f,
                "invalid bucket name '{name}': use 3-63 lowercase letters, digits, dots, \
                 underscores or hyphens, starting and ending with a letter or digit"
            ),
            Self::InvalidObjectName { name, reason } => {
                write!(f, "invalid object name '{name}': {reason}")
            }
            Self::Pattern(message) => write!(f, "name pattern failed to compile: {message}"),
        }
    }
}

impl std::error::Error for NameError {}

fn matches(
    cell: &'static OnceLock<Result<Regex, regex::Error>>,
    pattern: &str,
    value: &str,
) -> Result<bool, NameError> {
    match cell.get_or_init(|| Regex::new(pattern)) {
        Ok(regex) => Ok(regex.is_match(value)),
        Err(err) => Err(NameError::Pattern(err.to_string())),
    }
}

pub fn validate_instance_name(name: &str) -> Result<(), NameError> {
    if matches(&INSTANCE_NAME, INSTANCE_NAME_PATTERN, name)? {
        Ok(())
    } else {
        Err(NameError::InvalidInstanceName { name: name.to_owned() })
    }
}

pub fn validate_bucket_name(name: &str) -> Result<(), NameError> {
    if matches(&BUCKET_NAME, BUCKET_NAME_PATTERN, name)? {
        Ok(())
    } else {
        Err(NameError::InvalidBucketName { name: name.to_owned() })
    }
}

pub fn validate_object_name(name: &str) -> Result<(), NameError> {
    let reason = if name.is_empty() {
        "must not be empty"
    } else if name.len() > OBJECT_NAME_MAX_BYTES {
        "must be at most 1024 bytes"
    } else if name.contains(['\r', '\n']) {
        "must not contain line breaks"
    } else if name == "." || name == ".." {
        "must not be `.` or `..`"
    } else {
        return Ok(());
    };
    Err(NameError::InvalidObjectName { name: name.to_owned(), reason })
}
