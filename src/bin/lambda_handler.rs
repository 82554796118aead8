//! AWS Lambda handler serving pension projections over HTTP
//!
//! Routes (Lambda Function URL):
//! - `POST /api/predict`   projection request -> projection response
//! - `POST /api/inflation` `{"years": n}` -> forecast inflation path
//! - `POST /api/classify`  pension-tier record -> tier
//!
//! Artifacts are loaded once before the runtime starts; a load failure
//! aborts the process instead of serving without a model.

use std::sync::Arc;

use aws_lambda_events::event::lambda_function_urls::{LambdaFunctionUrlRequest, LambdaFunctionUrlResponse};
use http::header::{
    HeaderValue, ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
    CONTENT_TYPE,
};
use http::HeaderMap;
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use serde::{Deserialize, Serialize};
use serde_json::json;

use pension_forecast::{
    artifacts::{artifacts_dir_from_env, ModelArtifacts},
    projection::{round2, MAX_YEARS_UNTIL_RETIREMENT},
    InflationForecaster, PensionRecord, PensionRequest, PensionTier, PensionTierClassifier, ProjectionConfig,
    ProjectionOrchestrator,
};

/// Longest inflation forecast served in one request
const MAX_FORECAST_YEARS: usize = MAX_YEARS_UNTIL_RETIREMENT as usize;

/// Input for the inflation route
#[derive(Debug, Deserialize)]
struct InflationRequest {
    years: usize,
}

#[derive(Debug, Serialize)]
struct InflationResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    first_year: Option<i32>,
    inflation_percent: Vec<f64>,
}

#[derive(Debug, Serialize)]
struct ClassifyResponse {
    tier: PensionTier,
}

/// Everything loaded at cold start
struct AppState {
    orchestrator: ProjectionOrchestrator,
    forecaster: InflationForecaster,
    classifier: PensionTierClassifier,
}

impl AppState {
    fn load() -> Result<Self, Error> {
        let artifacts = ModelArtifacts::load_from(&artifacts_dir_from_env())?;
        let forecaster = artifacts.inflation_forecaster()?;
        let classifier = artifacts.tier_classifier()?;
        let orchestrator = ProjectionOrchestrator::new(ProjectionConfig::from_env()).with_forecaster(forecaster.clone());

        Ok(Self {
            orchestrator,
            forecaster,
            classifier,
        })
    }
}

fn cors_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    headers.insert(ACCESS_CONTROL_ALLOW_METHODS, HeaderValue::from_static("POST, OPTIONS"));
    headers.insert(ACCESS_CONTROL_ALLOW_HEADERS, HeaderValue::from_static("Content-Type"));
    headers
}

fn json_response(status: u16, body: String) -> LambdaFunctionUrlResponse {
    let mut headers = cors_headers();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    LambdaFunctionUrlResponse {
        status_code: status as i64,
        headers,
        body: Some(body),
        is_base64_encoded: false,
        cookies: Vec::new(),
    }
}

fn error_response(status: u16, message: &str) -> LambdaFunctionUrlResponse {
    json_response(status, json!({ "error": message }).to_string())
}

/// Status code and message for a failed request
type RouteError = (u16, String);

fn parse<T: for<'de> Deserialize<'de>>(body: &str) -> Result<T, RouteError> {
    serde_json::from_str(body).map_err(|e| (400, format!("Invalid JSON: {}", e)))
}

fn to_json<T: Serialize>(value: &T) -> Result<String, RouteError> {
    serde_json::to_string(value).map_err(|e| (500, format!("Failed to encode response: {}", e)))
}

/// Dispatch a request body to the route matching `path`
fn route(state: &AppState, path: &str, body: &str) -> Result<String, RouteError> {
    let path = path.trim_end_matches('/');

    if path.ends_with("/predict") {
        let request: PensionRequest = parse(body)?;
        let response = state
            .orchestrator
            .orchestrate(&request)
            .map_err(|e| (400, e.to_string()))?;
        to_json(&response)
    } else if path.ends_with("/inflation") {
        let request: InflationRequest = parse(body)?;
        if request.years > MAX_FORECAST_YEARS {
            return Err((400, format!("years must be at most {}", MAX_FORECAST_YEARS)));
        }
        to_json(&InflationResponse {
            first_year: state.forecaster.last_year().map(|y| y + 1),
            inflation_percent: state.forecaster.forecast(request.years).map(round2).collect(),
        })
    } else if path.ends_with("/classify") {
        let record: PensionRecord = parse(body)?;
        let tier = state
            .classifier
            .classify(&record)
            .map_err(|e| (422, e.to_string()))?;
        to_json(&ClassifyResponse { tier })
    } else {
        Err((404, format!("No route for {}", path)))
    }
}

/// Lambda handler function
async fn handler(state: &AppState, event: LambdaEvent<LambdaFunctionUrlRequest>) -> Result<LambdaFunctionUrlResponse, Error> {
    let request = event.payload;

    // Handle CORS preflight
    if request.request_context.http.method.as_deref() == Some("OPTIONS") {
        return Ok(LambdaFunctionUrlResponse {
            status_code: 200,
            headers: cors_headers(),
            body: None,
            is_base64_encoded: false,
            cookies: Vec::new(),
        });
    }

    if request.is_base64_encoded {
        return Ok(error_response(415, "Expected a JSON text body"));
    }

    let path = request.raw_path.as_deref().unwrap_or("/");
    let body = request.body.as_deref().unwrap_or("{}");

    Ok(match route(state, path, body) {
        Ok(json) => json_response(200, json),
        Err((status, message)) => {
            log::warn!("{} {}: {}", status, path, message);
            error_response(status, &message)
        }
    })
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::init();

    let state = Arc::new(AppState::load()?);

    run(service_fn(move |event| {
        let state = state.clone();
        async move { handler(&state, event).await }
    }))
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> AppState {
        let artifacts = ModelArtifacts::load_default().unwrap();
        let forecaster = artifacts.inflation_forecaster().unwrap();
        AppState {
            orchestrator: ProjectionOrchestrator::new(ProjectionConfig {
                reference_year: Some(2026),
                ..Default::default()
            })
            .with_forecaster(forecaster.clone()),
            forecaster,
            classifier: artifacts.tier_classifier().unwrap(),
        }
    }

    #[test]
    fn test_predict_route() {
        let body = r#"{"user_id": "u1", "current_income": 5000, "gender": "Kobieta",
            "birth_year": 1963, "birth_month": 5, "total_contributions": 100000,
            "capital": 50000, "subaccount": 10000, "yearly_contributions": 12000}"#;
        let json: serde_json::Value = serde_json::from_str(&route(&state(), "/api/predict", body).unwrap()).unwrap();
        assert_eq!(json["projected_capital"], 200_576.3);
        assert_eq!(json["years_in_retirement"], 17);
        assert_eq!(json["projected_inflation_percent"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_predict_rejects_implausible_timelines() {
        let body = |birth_year: i64, retirement_age: u64| {
            format!(
                r#"{{"user_id": "u1", "current_income": 5000, "gender": "male",
                "birth_year": {}, "retirement_age_years": {}}}"#,
                birth_year, retirement_age
            )
        };
        let state = state();
        for (birth_year, retirement_age) in [
            (50_000_000, 65),
            (i32::MAX as i64, 65),
            (1990, u32::MAX as u64),
        ] {
            let (status, message) = route(&state, "/api/predict", &body(birth_year, retirement_age)).unwrap_err();
            assert_eq!(status, 400, "{}", message);
        }
        assert!(route(&state, "/api/predict", &body(1990, 65)).is_ok());
    }

    #[test]
    fn test_inflation_route() {
        let json: serde_json::Value =
            serde_json::from_str(&route(&state(), "/api/inflation/", r#"{"years": 3}"#).unwrap()).unwrap();
        assert_eq!(json["first_year"], 2025);
        assert_eq!(json["inflation_percent"].as_array().unwrap().len(), 3);

        let err = route(&state(), "/api/inflation", r#"{"years": 1000}"#).unwrap_err();
        assert_eq!(err.0, 400);
    }

    #[test]
    fn test_classify_route_errors() {
        let body = r#"{"age": 40, "workclass": "Private", "fnlwgt": 1, "education": "HS-grad",
            "education_num": 9, "marital_status": "Divorced", "occupation": "Sales",
            "relationship": "Unmarried", "race": "White", "sex": "Robot",
            "capital_gain": 0, "capital_loss": 0, "hours_per_week": 38, "income": ">50K"}"#;
        let (status, message) = route(&state(), "/api/classify", body).unwrap_err();
        assert_eq!(status, 422);
        assert!(message.contains("Robot"));
        assert!(message.contains("Female"));
    }

    #[test]
    fn test_bad_json_and_unknown_route() {
        assert_eq!(route(&state(), "/api/predict", "{not json").unwrap_err().0, 400);
        assert_eq!(route(&state(), "/api/unknown", "{}").unwrap_err().0, 404);
    }
}
