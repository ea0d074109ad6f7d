//! Stripping HTTP server.
//!
//! Serves an already rendered site. Every HTML response is buffered in full,
//! run through the same pipeline as `deschema strip`, then sent. The config
//! file is re-checked on each request, so toggling a mode in
//! `deschema.toml` takes effect on the next page load.

mod lifecycle;
mod path;
mod response;

use crate::{
    cli::common::pipeline_for,
    config::{ConfigError, cfg, reload_config},
    log,
};
use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tiny_http::{Request, Server};

/// Worker threads for request handling.
const REQUEST_THREADS: usize = 4;

/// Bound server ready to accept requests
pub struct BoundServer {
    server: Arc<Server>,
    addr: SocketAddr,
}

/// Bind the server and serve until Ctrl+C.
pub fn serve() -> Result<()> {
    bind_server()?.run()
}

/// Bind the HTTP server without starting the request loop
pub fn bind_server() -> Result<BoundServer> {
    let config = cfg();
    let root = config.serve_root();
    if !root.is_dir() {
        let msg = format!("serve root `{}` is not a directory", root.display());
        return Err(ConfigError::Validation(msg).into());
    }

    let (server, addr) = lifecycle::bind_with_retry(config.serve.interface, config.serve.port)?;
    let server = Arc::new(server);
    lifecycle::register_server_for_shutdown(Arc::clone(&server));

    log!("serve"; "http://{} ({})", addr, config.root_relative(root).display());

    Ok(BoundServer { server, addr })
}

impl BoundServer {
    /// Get the bound address.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Start the request loop (blocking).
    pub fn run(self) -> Result<()> {
        run_request_loop(&self.server)
    }
}

fn run_request_loop(server: &Server) -> Result<()> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(REQUEST_THREADS)
        .build()
        .context("failed to create thread pool")?;

    for request in server.incoming_requests() {
        pool.spawn(move || {
            if let Err(e) = handle_request(request) {
                log!("serve"; "request error: {e}");
            }
        });
    }
    Ok(())
}

/// Handle a single HTTP request
fn handle_request(request: Request) -> Result<()> {
    // Early exit if shutdown requested
    if crate::core::is_shutdown() {
        return response::respond_unavailable(request);
    }

    match reload_config() {
        Ok(true) => log!("config"; "reloaded"),
        Ok(false) => {}
        Err(e) => log!("error"; "config reload failed, keeping previous: {e:#}"),
    }
    let config = cfg();
    let root = config.serve_root();

    let Some(path) = path::resolve_path(request.url(), root) else {
        let pipeline = pipeline_for("/404.html", &config);
        return response::respond_not_found(request, &root.join("404.html"), &pipeline);
    };

    if config.build.is_html(&path) {
        let pipeline = pipeline_for(request.url(), &config);
        return response::respond_page(request, &path, &pipeline);
    }

    response::respond_file(request, &path)
}
