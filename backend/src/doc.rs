//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every REST endpoint, the wire schemas they use, and
//! the bearer-token security scheme. Swagger UI serves it in debug builds.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{Error, ErrorCode, FriendshipStatus};
use crate::inbound::http::daily_statistics::{DailyStatisticResponse, UpdateStatisticsRequest};
use crate::inbound::http::friends::{FriendRequestBody, FriendshipResponse};
use crate::inbound::http::users::{LoginRequest, LoginResponse, ProfileResponse};

/// Name of the bearer security scheme in the generated document.
pub const BEARER_SCHEME: &str = "BearerToken";

/// Enrich the generated document with the bearer JWT security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            BEARER_SCHEME,
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .description(Some("Token issued by POST /api/v1/login."))
                    .build(),
            ),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Focus backend API",
        description = "Daily focus statistics shared between friends, behind bearer-token authentication."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("BearerToken" = [])),
    paths(
        crate::inbound::http::users::login,
        crate::inbound::http::users::profile,
        crate::inbound::http::daily_statistics::list_statistics,
        crate::inbound::http::daily_statistics::update_statistics,
        crate::inbound::http::friends::list_friends,
        crate::inbound::http::friends::send_request,
        crate::inbound::http::friends::accept_request,
        crate::inbound::http::friends::reject_request,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        FriendshipStatus,
        LoginRequest,
        LoginResponse,
        ProfileResponse,
        DailyStatisticResponse,
        UpdateStatisticsRequest,
        FriendRequestBody,
        FriendshipResponse
    )),
    tags(
        (name = "users", description = "Login and profile"),
        (name = "statistics", description = "Daily focus totals"),
        (name = "friends", description = "Friend requests and friend lists"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
