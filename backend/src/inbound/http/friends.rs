//! Friendship handlers.
//!
//! ```text
//! GET /api/v1/friends
//! POST /api/v1/friends/requests {"userId":"bob"}
//! POST /api/v1/friends/requests/{requesterId}/accept
//! POST /api/v1/friends/requests/{requesterId}/reject
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::FriendRequestDecision;
use crate::domain::{Error, Friendship, FriendshipStatus};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::BearerUser;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, missing_field_error, parse_user_id};

const USER_ID_FIELD: FieldName = FieldName::new("userId");
const REQUESTER_ID_FIELD: FieldName = FieldName::new("requesterId");

/// Friend request body.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FriendRequestBody {
    /// User to send the request to.
    pub user_id: Option<String>,
}

/// A friendship edge as seen by clients.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FriendshipResponse {
    pub requester_id: String,
    pub target_id: String,
    pub status: FriendshipStatus,
}

impl From<Friendship> for FriendshipResponse {
    fn from(value: Friendship) -> Self {
        Self {
            requester_id: value.requester_id().to_string(),
            target_id: value.target_id().to_string(),
            status: value.status(),
        }
    }
}

/// Ids of the caller's accepted friends.
#[utoipa::path(
    get,
    path = "/api/v1/friends",
    responses(
        (status = 200, description = "Friend ids", body = [String]),
        (status = 401, description = "Missing or invalid token", body = Error)
    ),
    tags = ["friends"],
    operation_id = "listFriends"
)]
#[get("/friends")]
pub async fn list_friends(
    state: web::Data<HttpState>,
    user: BearerUser,
) -> ApiResult<web::Json<Vec<String>>> {
    let friends = state.friendships_query.list_friends(user.id()).await?;
    Ok(web::Json(friends.iter().map(ToString::to_string).collect()))
}

/// Ask another user to become friends.
#[utoipa::path(
    post,
    path = "/api/v1/friends/requests",
    request_body = FriendRequestBody,
    responses(
        (status = 201, description = "Request created", body = FriendshipResponse),
        (status = 400, description = "Invalid target", body = Error),
        (status = 401, description = "Missing or invalid token", body = Error),
        (status = 404, description = "Target does not exist", body = Error),
        (status = 409, description = "Pair already has a friendship", body = Error)
    ),
    tags = ["friends"],
    operation_id = "sendFriendRequest"
)]
#[post("/friends/requests")]
pub async fn send_request(
    state: web::Data<HttpState>,
    user: BearerUser,
    payload: web::Json<FriendRequestBody>,
) -> ApiResult<HttpResponse> {
    let raw = payload
        .into_inner()
        .user_id
        .ok_or_else(|| missing_field_error(USER_ID_FIELD))?;
    let target = parse_user_id(&raw, USER_ID_FIELD)?;
    let edge = state.friendships.send_request(user.id(), &target).await?;
    Ok(HttpResponse::Created().json(FriendshipResponse::from(edge)))
}

async fn respond(
    state: &HttpState,
    user: &BearerUser,
    requester: &str,
    decision: FriendRequestDecision,
) -> Result<FriendshipResponse, Error> {
    let requester = parse_user_id(requester, REQUESTER_ID_FIELD)?;
    let edge = state
        .friendships
        .respond(user.id(), &requester, decision)
        .await?;
    Ok(FriendshipResponse::from(edge))
}

/// Accept a pending request addressed to the caller.
#[utoipa::path(
    post,
    path = "/api/v1/friends/requests/{requesterId}/accept",
    params(("requesterId" = String, Path, description = "User who sent the request")),
    responses(
        (status = 200, description = "Request accepted", body = FriendshipResponse),
        (status = 401, description = "Missing or invalid token", body = Error),
        (status = 404, description = "No request from this user", body = Error),
        (status = 409, description = "Request already resolved", body = Error)
    ),
    tags = ["friends"],
    operation_id = "acceptFriendRequest"
)]
#[post("/friends/requests/{requester_id}/accept")]
pub async fn accept_request(
    state: web::Data<HttpState>,
    user: BearerUser,
    path: web::Path<String>,
) -> ApiResult<web::Json<FriendshipResponse>> {
    respond(&state, &user, &path, FriendRequestDecision::Accept)
        .await
        .map(web::Json)
}

/// Reject a pending request addressed to the caller.
#[utoipa::path(
    post,
    path = "/api/v1/friends/requests/{requesterId}/reject",
    params(("requesterId" = String, Path, description = "User who sent the request")),
    responses(
        (status = 200, description = "Request rejected", body = FriendshipResponse),
        (status = 401, description = "Missing or invalid token", body = Error),
        (status = 404, description = "No request from this user", body = Error),
        (status = 409, description = "Request already resolved", body = Error)
    ),
    tags = ["friends"],
    operation_id = "rejectFriendRequest"
)]
#[post("/friends/requests/{requester_id}/reject")]
pub async fn reject_request(
    state: web::Data<HttpState>,
    user: BearerUser,
    path: web::Path<String>,
) -> ApiResult<web::Json<FriendshipResponse>> {
    respond(&state, &user, &path, FriendRequestDecision::Reject)
        .await
        .map(web::Json)
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::UserId;
    use crate::inbound::http::test_utils::{TestHarness, bearer_for};
    use actix_web::http::StatusCode;
    use actix_web::http::header::AUTHORIZATION;
    use actix_web::{App, test as actix_test};
    use rstest::rstest;
    use serde_json::{Value, json};

    fn test_app(
        state: web::Data<HttpState>,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new().app_data(state).service(
            web::scope("/api/v1")
                .service(list_friends)
                .service(send_request)
                .service(accept_request)
                .service(reject_request),
        )
    }

    fn post(harness: &TestHarness, user: &UserId, uri: &str, body: Value) -> actix_http::Request {
        actix_test::TestRequest::post()
            .uri(uri)
            .insert_header((AUTHORIZATION, bearer_for(harness, user)))
            .set_json(body)
            .to_request()
    }

    fn friends_of(harness: &TestHarness, user: &UserId) -> actix_http::Request {
        actix_test::TestRequest::get()
            .uri("/api/v1/friends")
            .insert_header((AUTHORIZATION, bearer_for(harness, user)))
            .to_request()
    }

    #[actix_web::test]
    async fn accepted_request_makes_both_users_friends() {
        let harness = TestHarness::new();
        let alice = harness.register_user("alice");
        let bob = harness.register_user("bob");
        let app = actix_test::init_service(test_app(harness.state())).await;

        let response = actix_test::call_service(
            &app,
            post(&harness, &alice, "/api/v1/friends/requests", json!({ "userId": "bob" })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let created: FriendshipResponse = actix_test::read_body_json(response).await;
        assert_eq!(created.status, FriendshipStatus::Pending);

        let response = actix_test::call_service(
            &app,
            post(
                &harness,
                &bob,
                "/api/v1/friends/requests/alice/accept",
                json!({}),
            ),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let accepted: FriendshipResponse = actix_test::read_body_json(response).await;
        assert_eq!(accepted.status, FriendshipStatus::Accepted);

        for (user, friend) in [(&alice, "bob"), (&bob, "alice")] {
            let response = actix_test::call_service(&app, friends_of(&harness, user)).await;
            let friends: Vec<String> = actix_test::read_body_json(response).await;
            assert_eq!(friends, vec![friend.to_owned()]);
        }
    }

    #[actix_web::test]
    async fn only_the_target_can_accept() {
        let harness = TestHarness::new();
        let alice = harness.register_user("alice");
        harness.register_user("bob");
        let app = actix_test::init_service(test_app(harness.state())).await;
        actix_test::call_service(
            &app,
            post(&harness, &alice, "/api/v1/friends/requests", json!({ "userId": "bob" })),
        )
        .await;

        let response = actix_test::call_service(
            &app,
            post(
                &harness,
                &alice,
                "/api/v1/friends/requests/bob/accept",
                json!({}),
            ),
        )
        .await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn rejected_request_cannot_be_resolved_again() {
        let harness = TestHarness::new();
        let alice = harness.register_user("alice");
        let bob = harness.register_user("bob");
        let app = actix_test::init_service(test_app(harness.state())).await;
        actix_test::call_service(
            &app,
            post(&harness, &alice, "/api/v1/friends/requests", json!({ "userId": "bob" })),
        )
        .await;

        let response = actix_test::call_service(
            &app,
            post(&harness, &bob, "/api/v1/friends/requests/alice/reject", json!({})),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);

        let response = actix_test::call_service(
            &app,
            post(&harness, &bob, "/api/v1/friends/requests/alice/accept", json!({})),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let response = actix_test::call_service(&app, friends_of(&harness, &bob)).await;
        let friends: Vec<String> = actix_test::read_body_json(response).await;
        assert!(friends.is_empty());
    }

    #[rstest]
    #[case(json!({}), StatusCode::BAD_REQUEST)]
    #[case(json!({ "userId": "alice" }), StatusCode::BAD_REQUEST)]
    #[case(json!({ "userId": "nobody" }), StatusCode::NOT_FOUND)]
    #[actix_web::test]
    async fn invalid_requests_are_rejected(#[case] body: Value, #[case] expected: StatusCode) {
        let harness = TestHarness::new();
        let alice = harness.register_user("alice");
        let app = actix_test::init_service(test_app(harness.state())).await;

        let response = actix_test::call_service(
            &app,
            post(&harness, &alice, "/api/v1/friends/requests", body),
        )
        .await;

        assert_eq!(response.status(), expected);
    }

    #[actix_web::test]
    async fn duplicate_requests_conflict_in_either_direction() {
        let harness = TestHarness::new();
        let alice = harness.register_user("alice");
        let bob = harness.register_user("bob");
        let app = actix_test::init_service(test_app(harness.state())).await;
        actix_test::call_service(
            &app,
            post(&harness, &alice, "/api/v1/friends/requests", json!({ "userId": "bob" })),
        )
        .await;

        let response = actix_test::call_service(
            &app,
            post(&harness, &bob, "/api/v1/friends/requests", json!({ "userId": "alice" })),
        )
        .await;

        assert_eq!(response.status(), StatusCode::CONFLICT);
    }
}
