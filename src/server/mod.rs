//! Blocking HTTP front-end.
//!
//! Requests are handled one at a time on the calling thread. Every request runs a
//! fresh fit cycle, so there is nothing to share between them.

use std::net::SocketAddr;
use std::time::Instant;

use tiny_http::{Header, Request, Response, StatusCode};
use tracing::{info, warn};

use crate::config::ServerConfig;
use crate::error::AppError;

pub mod routes;

pub use routes::{Reply, Route, dispatch, route_table};

pub struct Server {
    http: tiny_http::Server,
    config: ServerConfig,
    routes: Vec<Route>,
}

impl Server {
    /// Bind `config.addr` with the default route table.
    pub fn bind(config: ServerConfig) -> Result<Self, AppError> {
        let http = tiny_http::Server::http(config.addr.as_str())
            .map_err(|e| AppError::new(4, format!("Failed to bind {}: {e}", config.addr)))?;
        Ok(Self {
            http,
            config,
            routes: route_table(),
        })
    }

    /// The bound address (useful with port `0`).
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.http.server_addr().to_ip()
    }

    /// Serve requests until the listener shuts down.
    pub fn serve(&self) -> Result<(), AppError> {
        for request in self.http.incoming_requests() {
            self.respond(request);
        }
        Ok(())
    }

    fn respond(&self, request: Request) {
        let started = Instant::now();
        let method = request.method().clone();
        let url = request.url().to_string();

        let reply = dispatch(&self.routes, &self.config, &method, &url);
        info!(
            %method,
            url,
            status = reply.status,
            bytes = reply.body.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "request"
        );

        let mut response = Response::from_data(reply.body).with_status_code(StatusCode(reply.status));
        match Header::from_bytes(&b"Content-Type"[..], reply.content_type.as_bytes()) {
            Ok(header) => response.add_header(header),
            Err(()) => warn!(content_type = reply.content_type, "invalid content type header"),
        }

        if let Err(e) = request.respond(response) {
            warn!(error = %e, "failed to write response");
        }
    }
}
