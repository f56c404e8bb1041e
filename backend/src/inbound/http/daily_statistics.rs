//! Daily focus statistics handlers.
//!
//! ```text
//! GET /api/v1/daily-statistics?date=2024-03-01&friendId=bob
//! POST /api/v1/daily-statistics/update {"date":"2024-03-01","totalFocusTime":25}
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::ports::{ApplyReportRequest, ListStatisticsRequest};
use crate::domain::{DailyStatistic, Error};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::BearerUser;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, missing_field_error, parse_day, parse_optional_day, parse_user_id,
};

const DATE_FIELD: FieldName = FieldName::new("date");
const FRIEND_ID_FIELD: FieldName = FieldName::new("friendId");

/// Optional filters for the statistics listing.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct StatisticsQuery {
    /// `YYYY-MM-DD` date or RFC 3339 timestamp selecting a single UTC day.
    pub date: Option<String>,
    /// Accepted friend whose statistics to read instead of the caller's.
    pub friend_id: Option<String>,
}

/// Focus report body. Fields are optional so missing values surface as
/// validation errors rather than deserialisation failures.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStatisticsRequest {
    #[schema(example = "2024-03-01")]
    pub date: Option<String>,
    #[schema(example = 25)]
    pub total_focus_time: Option<i64>,
}

/// One day's focus total.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DailyStatisticResponse {
    pub id: String,
    pub user_id: String,
    #[schema(value_type = String, format = Date)]
    pub date: chrono::NaiveDate,
    pub total_focus_time: i32,
}

impl From<DailyStatistic> for DailyStatisticResponse {
    fn from(value: DailyStatistic) -> Self {
        Self {
            id: value.id().to_string(),
            user_id: value.user_id().to_string(),
            date: value.day(),
            total_focus_time: value.total_focus_time().get(),
        }
    }
}

fn list_request(user: &BearerUser, query: StatisticsQuery) -> Result<ListStatisticsRequest, Error> {
    let friend_id = query
        .friend_id
        .as_deref()
        .map(|raw| parse_user_id(raw, FRIEND_ID_FIELD))
        .transpose()?;
    let day = parse_optional_day(query.date.as_deref(), DATE_FIELD)?;
    Ok(ListStatisticsRequest {
        requester: user.id().clone(),
        friend_id,
        day,
    })
}

/// List the caller's statistics, or an accepted friend's.
#[utoipa::path(
    get,
    path = "/api/v1/daily-statistics",
    params(StatisticsQuery),
    responses(
        (status = 200, description = "Statistics in day order", body = [DailyStatisticResponse]),
        (status = 400, description = "Malformed date or friend id", body = Error),
        (status = 401, description = "Missing or invalid token", body = Error),
        (status = 403, description = "Not friends with the requested user", body = Error)
    ),
    tags = ["statistics"],
    operation_id = "listDailyStatistics"
)]
#[get("/daily-statistics")]
pub async fn list_statistics(
    state: web::Data<HttpState>,
    user: BearerUser,
    query: web::Query<StatisticsQuery>,
) -> ApiResult<web::Json<Vec<DailyStatisticResponse>>> {
    let request = list_request(&user, query.into_inner())?;
    let records = state.statistics_query.list(request).await?;
    Ok(web::Json(
        records.into_iter().map(DailyStatisticResponse::from).collect(),
    ))
}

/// Add focus minutes to the caller's total for a day.
#[utoipa::path(
    post,
    path = "/api/v1/daily-statistics/update",
    request_body = UpdateStatisticsRequest,
    responses(
        (status = 204, description = "Report applied"),
        (status = 400, description = "Invalid report", body = Error),
        (status = 401, description = "Missing or invalid token", body = Error),
        (status = 409, description = "Concurrent updates kept conflicting", body = Error)
    ),
    tags = ["statistics"],
    operation_id = "updateDailyStatistics"
)]
#[post("/daily-statistics/update")]
pub async fn update_statistics(
    state: web::Data<HttpState>,
    user: BearerUser,
    payload: web::Json<UpdateStatisticsRequest>,
) -> ApiResult<HttpResponse> {
    let UpdateStatisticsRequest {
        date,
        total_focus_time,
    } = payload.into_inner();
    let raw_date = date.ok_or_else(|| missing_field_error(DATE_FIELD))?;
    let day = parse_day(&raw_date, DATE_FIELD)?;

    state
        .statistics
        .apply_report(ApplyReportRequest {
            user_id: user.id().clone(),
            day,
            focus_minutes: total_focus_time,
        })
        .await?;
    Ok(HttpResponse::NoContent().finish())
}
