//! Shared helper utilities for backend integration tests.
//!
//! Integration tests compile as separate crates under `backend/tests/`, so
//! the stub-server plumbing lives here rather than being copied per file.

use std::net::TcpListener;

use actix_web::dev::ServerHandle;
use actix_web::{App, HttpServer, web};
use url::Url;

/// Serve `configure`'s routes on an ephemeral loopback port.
///
/// Must be called from inside an Actix system, e.g. `#[actix_web::test]`.
/// Returns the base URL and a handle for stopping the server.
pub fn spawn_stub<F>(configure: F) -> (Url, ServerHandle)
where
    F: Fn(&mut web::ServiceConfig) + Clone + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind stub listener");
    let addr = listener.local_addr().expect("stub listener address");

    let server = HttpServer::new(move || App::new().configure(configure.clone()))
        .disable_signals()
        .workers(1)
        .listen(listener)
        .expect("stub server listens")
        .run();
    let handle = server.handle();
    actix_web::rt::spawn(server);

    let base = Url::parse(&format!("http://{addr}")).expect("stub base URL");
    (base, handle)
}

/// Base URL of a loopback port with nothing listening on it.
pub fn closed_port_url() -> Url {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind probe listener");
    let addr = listener.local_addr().expect("probe listener address");
    drop(listener);
    Url::parse(&format!("http://{addr}")).expect("closed port URL")
}
