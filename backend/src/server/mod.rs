//! Server construction and middleware wiring.

mod config;
mod state_builders;

pub use config::ServerConfig;

pub(crate) use state_builders::build_http_state;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};

use focus_backend::Trace;
#[cfg(debug_assertions)]
use focus_backend::doc::ApiDoc;
use focus_backend::inbound::http::daily_statistics::{list_statistics, update_statistics};
use focus_backend::inbound::http::friends::{
    accept_request, list_friends, reject_request, send_request,
};
use focus_backend::inbound::http::health::{HealthState, live, ready};
use focus_backend::inbound::http::state::HttpState;
use focus_backend::inbound::http::users::{login, profile};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

pub(crate) fn build_app(
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let api = web::scope("/api/v1")
        .service(login)
        .service(profile)
        .service(list_statistics)
        .service(update_statistics)
        .service(list_friends)
        .service(send_request)
        .service(accept_request)
        .service(reject_request);

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(Trace)
        .service(api)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

/// Construct an Actix HTTP server using the provided health state and configuration.
///
/// Readiness is marked once the listener is bound.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let http_state = build_http_state(&config);
    let server_health_state = health_state.clone();

    let server = HttpServer::new(move || {
        build_app(server_health_state.clone(), http_state.clone())
    })
    .bind(config.bind_addr())?
    .run();

    health_state.mark_ready();
    Ok(server)
}
