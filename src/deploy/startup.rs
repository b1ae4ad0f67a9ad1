// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of gcp-mcp and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Startup scripts embedded as instance metadata.
//!
//! HTML is carried base64-encoded between two marker lines so no shell quoting
//! applies to user content.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

pub const STARTUP_SCRIPT_KEY: &str = "startup-script";
pub const STORAGE_READ_ONLY_SCOPE: &str = "https://www.googleapis.com/auth/devstorage.read_only";
pub const WEB_SERVER_TAGS: [&str; 2] = ["http-server", "https-server"];

const PAYLOAD_MARKER: &str = "GCP_MCP_HTML";
const WEB_ROOT: &str = "/var/www/html";

/// Install nginx and serve `html` as the index page.
pub fn nginx_site_script(html: &str) -> String {
    let payload = STANDARD.encode(html.as_bytes());
    format!(
        "#!/bin/bash\n\
         set -euo pipefail\n\
         export DEBIAN_FRONTEND=noninteractive\n\
         apt-get update\n\
         apt-get install -y nginx\n\
         base64 -d > {WEB_ROOT}/index.html <<'{PAYLOAD_MARKER}'\n\
         {payload}\n\
         {PAYLOAD_MARKER}\n\
         chmod 644 {WEB_ROOT}/index.html\n\
         systemctl enable nginx\n\
         systemctl restart nginx\n"
    )
}

/// Install nginx and mirror `gs://<bucket>` into the web root.
///
/// The instance needs [`STORAGE_READ_ONLY_SCOPE`] on its service account.
pub fn bucket_sync_script(bucket: &str) -> String {
    format!(
        "#!/bin/bash\n\
         set -euo pipefail\n\
         export DEBIAN_FRONTEND=noninteractive\n\
         apt-get update\n\
         apt-get install -y nginx\n\
         if ! command -v gsutil >/dev/null 2>&1; then\n\
         \x20 apt-get install -y google-cloud-cli\n\
         fi\n\
         gsutil -m rsync -r gs://{bucket} {WEB_ROOT}\n\
         systemctl enable nginx\n\
         systemctl restart nginx\n"
    )
}

/// The decoded HTML payload of a script built by [`nginx_site_script`].
pub fn embedded_html(script: &str) -> Option<Vec<u8>> {
    let mut lines = script.lines();
    lines.by_ref().find(|line| line.ends_with(&format!("<<'{PAYLOAD_MARKER}'")))?;
    let encoded: String = lines.take_while(|line| *line != PAYLOAD_MARKER).collect();
    STANDARD.decode(encoded).ok()
}
