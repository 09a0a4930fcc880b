use reqwest::{header, Client};
use serde_json::Value;

use crate::error::{FetchError, ShapeError};

pub const ENDPOINT: &str = "https://practicum.yandex.ru/api/user_api/homework_statuses/";

/// Client for the Practicum homework status API.
pub struct StatusClient {
    http: Client,
    endpoint: String,
    token: String,
}

impl StatusClient {
    pub fn new(http: Client, token: &str) -> Self {
        Self {
            http,
            endpoint: ENDPOINT.to_string(),
            token: token.to_string(),
        }
    }

    /// One timestamped query against the status endpoint.
    ///
    /// Never retries; a failed cycle is the caller's concern.
    pub async fn get_api_answer(&self, from_date: i64) -> Result<Value, FetchError> {
        let response = self
            .http
            .get(&self.endpoint)
            .header(header::AUTHORIZATION, format!("OAuth {}", self.token))
            .query(&[("from_date", from_date)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::BadStatus(status));
        }

        Ok(response.json::<Value>().await?)
    }
}

/// Validate the top-level shape of an API response and extract the homework
/// list. The list may be empty.
pub fn check_response(response: &Value) -> Result<&Vec<Value>, ShapeError> {
    let object = response.as_object().ok_or(ShapeError::NotAnObject)?;
    let homeworks = object
        .get("homeworks")
        .ok_or(ShapeError::MissingHomeworks)?;
    homeworks.as_array().ok_or(ShapeError::NotAList)
}

/// Server-reported upper bound of the answered window, if present.
pub fn current_date(response: &Value) -> Option<i64> {
    response.get("current_date").and_then(Value::as_i64)
}
