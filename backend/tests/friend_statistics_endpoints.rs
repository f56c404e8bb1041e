//! End-to-end coverage of friend-scoped statistics over the public API.
//!
//! The app is wired from the library's services and in-memory adapters, the
//! same way the binary wires them when `DATABASE_URL` is unset. Accounts get
//! Argon2 hashes and obtain their tokens through `POST /login`.

use std::sync::Arc;

use actix_web::body::MessageBody;
use actix_web::dev::{Service, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::http::header::AUTHORIZATION;
use actix_web::{App, test, web};
use argon2::Argon2;
use argon2::password_hash::{PasswordHasher, SaltString};
use mockable::DefaultClock;
use rstest::{fixture, rstest};
use serde_json::{Value, json};

use focus_backend::Trace;
use focus_backend::domain::ports::LoginService;
use focus_backend::domain::{
    FriendshipService, IdentityLoginService, ProfileService, SessionService, SessionTokenIssuer,
    SigningSecret, StatisticsAggregator, StatisticsReader, TRACE_ID_HEADER, User,
};
use focus_backend::inbound::http::daily_statistics::{list_statistics, update_statistics};
use focus_backend::inbound::http::friends::{
    accept_request, list_friends, reject_request, send_request,
};
use focus_backend::inbound::http::state::{HttpState, HttpStatePorts};
use focus_backend::inbound::http::users::{login, profile};
use focus_backend::outbound::memory::{
    InMemoryFriendshipLedger, InMemoryIdentityStore, InMemoryStatisticsStore,
};

struct World {
    identities: Arc<InMemoryIdentityStore>,
    state: web::Data<HttpState>,
}

fn password_of(name: &str) -> String {
    format!("{name}-passphrase")
}

impl World {
    /// Store an account whose password is [`password_of`] its name.
    fn register(&self, name: &str) {
        let user = User::try_from_strings(name, name, None).expect("valid user");
        let id = user.id().clone();
        self.identities.insert(user);
        let salt = SaltString::encode_b64(b"integration-salt").expect("valid salt");
        let phc = Argon2::default()
            .hash_password(password_of(name).as_bytes(), &salt)
            .expect("hashing succeeds")
            .to_string();
        self.identities.set_password_hash(&id, phc);
    }
}

#[fixture]
fn world() -> World {
    let secret = SigningSecret::new(b"integration-secret-with-enough-bytes".to_vec())
        .expect("non-empty secret");
    let issuer = SessionTokenIssuer::new(&secret, Arc::new(DefaultClock));
    let identities = Arc::new(InMemoryIdentityStore::default());
    let ledger = Arc::new(InMemoryFriendshipLedger::default());
    let statistics = Arc::new(InMemoryStatisticsStore::default());
    let login_service: Arc<dyn LoginService> =
        Arc::new(IdentityLoginService::new(identities.clone()));
    let friendships = Arc::new(FriendshipService::new(ledger.clone(), identities.clone()));
    let ports = HttpStatePorts {
        sessions: Arc::new(SessionService::new(
            login_service,
            identities.clone(),
            issuer.clone(),
        )),
        profile: Arc::new(ProfileService::new(identities.clone())),
        statistics: Arc::new(StatisticsAggregator::new(statistics.clone())),
        statistics_query: Arc::new(StatisticsReader::new(statistics, ledger)),
        friendships: friendships.clone(),
        friendships_query: friendships,
    };
    World {
        identities,
        state: web::Data::new(HttpState::new(ports, issuer)),
    }
}

fn app(
    state: web::Data<HttpState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new().app_data(state).wrap(Trace).service(
        web::scope("/api/v1")
            .service(login)
            .service(profile)
            .service(list_statistics)
            .service(update_statistics)
            .service(list_friends)
            .service(send_request)
            .service(accept_request)
            .service(reject_request),
    )
}

fn login_request(username: &str, password: &str) -> actix_http::Request {
    test::TestRequest::post()
        .uri("/api/v1/login")
        .set_json(json!({ "username": username, "password": password }))
        .to_request()
}

/// Log `name` in and return its `Authorization` header value.
async fn sign_in<S, B>(app: &S, name: &str) -> String
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let res = test::call_service(app, login_request(name, &password_of(name))).await;
    assert_eq!(res.status(), StatusCode::OK, "{name} should log in");
    let body: Value = test::read_body_json(res).await;
    let token = body["token"].as_str().expect("token in login response");
    format!("Bearer {token}")
}

fn post(bearer: &str, uri: &str, body: Value) -> actix_http::Request {
    test::TestRequest::post()
        .uri(uri)
        .insert_header((AUTHORIZATION, bearer))
        .set_json(body)
        .to_request()
}

fn get(bearer: &str, uri: &str) -> actix_http::Request {
    test::TestRequest::get()
        .uri(uri)
        .insert_header((AUTHORIZATION, bearer))
        .to_request()
}

#[rstest]
#[actix_web::test]
async fn friendship_opens_and_scopes_statistics(world: World) {
    world.register("alice");
    world.register("bob");
    world.register("carol");
    let app = test::init_service(app(world.state.clone())).await;
    let alice = sign_in(&app, "alice").await;
    let bob = sign_in(&app, "bob").await;
    let carol = sign_in(&app, "carol").await;

    let res = test::call_service(
        &app,
        post(
            &bob,
            "/api/v1/daily-statistics/update",
            json!({ "date": "2024-03-01T08:00:00+00:00", "totalFocusTime": 45 }),
        ),
    )
    .await;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let res = test::call_service(&app, get(&alice, "/api/v1/daily-statistics?friendId=bob")).await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    assert!(res.headers().contains_key(TRACE_ID_HEADER));

    let res = test::call_service(
        &app,
        post(&alice, "/api/v1/friends/requests", json!({ "userId": "bob" })),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CREATED);

    let res = test::call_service(&app, get(&alice, "/api/v1/daily-statistics?friendId=bob")).await;
    assert_eq!(
        res.status(),
        StatusCode::FORBIDDEN,
        "a pending request grants nothing"
    );

    let res = test::call_service(
        &app,
        post(&bob, "/api/v1/friends/requests/alice/accept", json!({})),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);

    let res = test::call_service(
        &app,
        get(
            &alice,
            "/api/v1/daily-statistics?friendId=bob&date=2024-03-01",
        ),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body[0]["userId"], "bob");
    assert_eq!(body[0]["totalFocusTime"], 45);

    let res = test::call_service(&app, get(&carol, "/api/v1/daily-statistics?friendId=bob")).await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
}

#[rstest]
#[actix_web::test]
async fn own_statistics_ignore_self_friend_id(world: World) {
    world.register("alice");
    let app = test::init_service(app(world.state.clone())).await;
    let alice = sign_in(&app, "alice").await;
    test::call_service(
        &app,
        post(
            &alice,
            "/api/v1/daily-statistics/update",
            json!({ "date": "2024-03-01", "totalFocusTime": 5 }),
        ),
    )
    .await;

    let res = test::call_service(
        &app,
        get(&alice, "/api/v1/daily-statistics?friendId=alice"),
    )
    .await;

    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body.as_array().map(Vec::len), Some(1));
}

#[rstest]
#[actix_web::test]
async fn wrong_passwords_do_not_log_in(world: World) {
    world.register("bob");
    let app = test::init_service(app(world.state.clone())).await;

    for password in ["password", "bob"] {
        let res = test::call_service(&app, login_request("bob", password)).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED, "password {password}");
    }
}

#[rstest]
#[actix_web::test]
async fn unauthorised_errors_carry_a_trace_id(world: World) {
    let app = test::init_service(app(world.state.clone())).await;

    let res = test::call_service(
        &app,
        get("Bearer forged.token.value", "/api/v1/daily-statistics"),
    )
    .await;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let header = res
        .headers()
        .get(TRACE_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned)
        .expect("trace id header");
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["traceId"], header);
}

#[rstest]
#[actix_web::test]
async fn fixture_login_round_trip(world: World) {
    let app = test::init_service(app(world.state.clone())).await;

    let res = test::call_service(&app, login_request("admin", "password")).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = test::read_body_json(res).await;
    let token = body["token"].as_str().expect("token").to_owned();

    let res = test::call_service(&app, get(&format!("Bearer {token}"), "/api/v1/users/profile"))
        .await;
    assert_eq!(res.status(), StatusCode::OK);
    let account: Value = test::read_body_json(res).await;
    assert_eq!(account["id"], body["id"]);
    assert_eq!(account["username"], "admin");
}
