// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of gcp-mcp and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! gcp-mcp CLI entrypoint.
//!
//! By default this serves MCP over stdio. With `--http-port` it serves streamable HTTP at
//! `http://<bind>:<port>/mcp` instead, until Ctrl-C.

use std::error::Error;
use std::net::IpAddr;
use std::sync::Arc;

use axum::Router;
use clap::Parser;
use rmcp::transport::{
    streamable_http_server::session::local::LocalSessionManager, StreamableHttpServerConfig,
    StreamableHttpService,
};
use tracing_subscriber::EnvFilter;

use gcp_mcp::cloud::{CloudClients, GcpRestClient};
use gcp_mcp::config::{discover_default_project, ServerConfig, PROJECT_ENV};
use gcp_mcp::mcp::GcpMcp;

/// Environment variable holding the log filter, e.g. `gcp_mcp=debug`.
const LOG_ENV: &str = "GCP_MCP_LOG";

#[derive(Debug, Parser)]
#[command(name = "gcp-mcp", version, about = "MCP server for Google Cloud")]
struct Cli {
    /// Default project for tools called without projectId.
    #[arg(long, env = PROJECT_ENV)]
    project: Option<String>,

    /// Serve streamable HTTP on this port instead of stdio (0 = ephemeral).
    #[arg(long)]
    http_port: Option<u16>,

    /// Address the HTTP transport binds to.
    #[arg(long, default_value = "127.0.0.1", requires = "http_port")]
    bind: IpAddr,
}

fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));
    // stdout carries the stdio transport.
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

async fn serve_http(mcp: GcpMcp, bind: IpAddr, port: u16) -> Result<(), Box<dyn Error>> {
    let listener = tokio::net::TcpListener::bind((bind, port)).await?;
    tracing::info!(address = %listener.local_addr()?, "serving MCP over streamable HTTP at /mcp");

    let config = StreamableHttpServerConfig {
        stateful_mode: true,
        ..StreamableHttpServerConfig::default()
    };
    let shutdown_token = config.cancellation_token.clone();

    let session_manager = Arc::new(LocalSessionManager::default());
    let mcp_service = StreamableHttpService::new(move || Ok(mcp.clone()), session_manager, config);
    let router = Router::new().nest_service("/mcp", mcp_service);

    let ctrl_c_token = shutdown_token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("shutting down");
        }
        ctrl_c_token.cancel();
    });

    axum::serve(listener, router)
        .with_graceful_shutdown(async move { shutdown_token.cancelled().await })
        .await?;
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    init_logging();

    let result = (|| -> Result<(), Box<dyn Error>> {
        let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build()?;
        runtime.block_on(async move {
            let default_project = discover_default_project(cli.project.as_deref()).await;
            if let Some(project) = &default_project {
                tracing::info!(project = %project, "default project");
            }

            let clients = CloudClients::from_shared(Arc::new(GcpRestClient::from_environment()?));
            let mcp = GcpMcp::new(clients, ServerConfig::new(default_project));

            match cli.http_port {
                Some(port) => serve_http(mcp, cli.bind, port).await,
                None => {
                    tracing::info!("serving MCP over stdio");
                    mcp.serve_stdio().await?;
                    Ok(())
                }
            }
        })
    })();

    if let Err(err) = result {
        tracing::error!(error = %err, "gcp-mcp failed");
        eprintln!("gcp-mcp: {err}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::Cli;
    use clap::Parser;

    #[test]
    fn defaults_to_stdio() {
        let cli = Cli::try_parse_from(["gcp-mcp"]).expect("parse");
        assert_eq!(cli.http_port, None);
        assert_eq!(cli.bind.to_string(), "127.0.0.1");
    }

    #[test]
    fn parses_http_transport_options() {
        let cli = Cli::try_parse_from([
            "gcp-mcp",
            "--project",
            "demo",
            "--http-port",
            "8080",
            "--bind",
            "0.0.0.0",
        ])
        .expect("parse");
        assert_eq!(cli.project.as_deref(), Some("demo"));
        assert_eq!(cli.http_port, Some(8080));
        assert_eq!(cli.bind.to_string(), "0.0.0.0");
    }

    #[test]
    fn rejects_bad_values() {
        Cli::try_parse_from(["gcp-mcp", "--http-port", "70000"]).unwrap_err();
        Cli::try_parse_from(["gcp-mcp", "--http-port", "80", "--bind", "localhost"]).unwrap_err();
        Cli::try_parse_from(["gcp-mcp", "--bind", "10.0.0.1"]).unwrap_err();
        Cli::try_parse_from(["gcp-mcp", "--nope"]).unwrap_err();
    }
}
