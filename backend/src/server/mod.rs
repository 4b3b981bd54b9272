//! Server construction and middleware wiring.

mod config;

pub use config::ServerConfig;

use std::sync::Arc;

use actix_web::cookie::Key;
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};

use clinica::Trace;
use clinica::domain::{StaffLoginService, VisitRecorderService};
use clinica::inbound::http::configure;
use clinica::inbound::http::health::{HealthState, live, ready};
use clinica::inbound::http::session::session_middleware;
use clinica::inbound::http::state::HttpState;
use clinica::outbound::persistence::{DbPool, DieselStaffDirectory, DieselVisitStore};

/// Wire the Diesel adapters into the domain services.
fn build_http_state(pool: &DbPool) -> HttpState {
    let login = StaffLoginService::new(Arc::new(DieselStaffDirectory::new(pool.clone())));
    let visits = VisitRecorderService::new(Arc::new(DieselVisitStore::new(pool.clone())));
    HttpState::new(Arc::new(login), Arc::new(visits))
}

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
    key: Key,
    cookie_secure: bool,
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
        key,
        cookie_secure,
    } = deps;

    let pages = web::scope("")
        .wrap(session_middleware(key, cookie_secure))
        .configure(configure);

    App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(Trace)
        .service(ready)
        .service(live)
        .service(pages)
}

/// Construct the HTTP server and mark the process ready once bound.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let ServerConfig {
        key,
        cookie_secure,
        bind_addr,
        db_pool,
    } = config;
    let http_state = web::Data::new(build_http_state(&db_pool));
    let server_health_state = health_state.clone();

    let server = HttpServer::new(move || {
        build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
            key: key.clone(),
            cookie_secure,
        })
    })
    .bind(bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}
