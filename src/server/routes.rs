//! Route table and handlers.
//!
//! Dispatch is a pure function of `(method, url)` so it can be tested without a
//! socket. Handlers run one full fit cycle per request and keep no state.

use tiny_http::Method;
use tracing::error;

use crate::app::pipeline::run_default_fit;
use crate::config::ServerConfig;
use crate::error::FitError;
use crate::io::FitReport;
use crate::plot::render_png;

const INDEX_HTML: &str = include_str!("../../templates/index.html");

/// A fully materialized response.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub status: u16,
    pub content_type: &'static str,
    pub body: Vec<u8>,
}

impl Reply {
    pub fn ok(content_type: &'static str, body: Vec<u8>) -> Self {
        Self {
            status: 200,
            content_type,
            body,
        }
    }

    pub fn text(status: u16, message: &str) -> Self {
        Self {
            status,
            content_type: "text/plain; charset=utf-8",
            body: message.as_bytes().to_vec(),
        }
    }
}

pub type Handler = fn(&ServerConfig) -> Result<Reply, FitError>;

pub struct Route {
    pub method: Method,
    pub path: &'static str,
    pub handler: Handler,
}

impl Route {
    pub fn get(path: &'static str, handler: Handler) -> Self {
        Self {
            method: Method::Get,
            path,
            handler,
        }
    }
}

/// The routes served by the binary.
pub fn route_table() -> Vec<Route> {
    vec![
        Route::get("/", index),
        Route::get("/plot.png", plot_png),
        Route::get("/fit.json", fit_json),
    ]
}

/// Resolve a request against `routes` and run the matching handler.
///
/// Query strings are ignored. Handler failures become a 500 with a plain-text
/// body; no partial image is ever returned.
pub fn dispatch(routes: &[Route], config: &ServerConfig, method: &Method, url: &str) -> Reply {
    let path = url.split('?').next().unwrap_or(url);

    let mut known_path = false;
    for route in routes.iter().filter(|r| r.path == path) {
        known_path = true;
        if &route.method != method {
            continue;
        }
        return match (route.handler)(config) {
            Ok(reply) => reply,
            Err(err) => {
                error!(path, error = %err, "fit cycle failed");
                Reply::text(500, "internal server error: fit cycle failed")
            }
        };
    }

    if known_path {
        Reply::text(405, "method not allowed")
    } else {
        Reply::text(404, "not found")
    }
}

fn index(_: &ServerConfig) -> Result<Reply, FitError> {
    Ok(Reply::ok("text/html; charset=utf-8", INDEX_HTML.as_bytes().to_vec()))
}

fn plot_png(config: &ServerConfig) -> Result<Reply, FitError> {
    let run = run_default_fit(&config.fit, config.seed)?;
    let png = render_png(&run.chart, config.plot_width, config.plot_height)?;
    Ok(Reply::ok("image/png", png))
}

fn fit_json(config: &ServerConfig) -> Result<Reply, FitError> {
    let run = run_default_fit(&config.fit, config.seed)?;
    let json = FitReport::new(&run.sample, &run.fit).to_json()?;
    Ok(Reply::ok("application/json", json.into_bytes()))
}
