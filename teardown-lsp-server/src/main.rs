use anyhow::Result;
use clap::Parser;
use teardown_lsp_server::cli::Args;
use teardown_lsp_server::{logging, TeardownLanguageServer};
use tower_lsp::{LspService, Server};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Keep the guard alive for the whole session
    let _log_guard = logging::init(args.log_dir.as_deref())?;

    info!(
        "Starting Teardown Language Server {}",
        env!("CARGO_PKG_VERSION")
    );

    let options = args.server_options();

    // Create the transport for stdio
    let stdin = tokio::io::stdin();
    let stdout = tokio::io::stdout();

    let (service, socket) =
        LspService::new(move |client| TeardownLanguageServer::with_options(client, options));

    Server::new(stdin, stdout, socket).serve(service).await;

    info!("Server stopped");
    Ok(())
}
