use std::sync::Arc;

use cors_static_server::config::{ServerConfig, BANNER_TITLE};
use cors_static_server::logger;
use cors_static_server::server::{self, Server, SignalHandler};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = ServerConfig::default();
    logger::init(&cfg.log_level);

    // Tokio runtime, sized by the workers setting when present
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.workers {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let port = cfg.port;
    let server = Server::bind(cfg)?;

    let signals = Arc::new(SignalHandler::new(server.shutdown_handle()));
    server::start_signal_handler(Arc::clone(&signals))?;

    print_banner(port);
    server.run().await?;

    if signals.is_shutdown_requested() {
        println!("\nServer stopped.");
    }
    Ok(())
}

fn print_banner(port: u16) {
    println!("{BANNER_TITLE}");
    println!("{}", "=".repeat(BANNER_TITLE.len()));
    println!("Server running at: http://localhost:{port}");
    println!("Open this URL in your browser to use the application");
    println!("Press Ctrl+C to stop the server");
    println!();
}
