use anyhow::anyhow;
use axum::{
    Json,
    extract::{FromRequest, Request, rejection::JsonRejection},
    http::StatusCode,
};
use hostelhub_core::AppError;
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationError, ValidationErrors};

fn describe(field: &str, error: &ValidationError) -> String {
    if let Some(message) = &error.message {
        return message.to_string();
    }

    match &*error.code {
        "length" => {
            let min = error.params.get("min").and_then(|v| v.as_u64());
            let max = error.params.get("max").and_then(|v| v.as_u64());
            match (min, max) {
                (Some(min), Some(max)) => {
                    format!("{} must be between {} and {} characters", field, min, max)
                }
                (Some(min), None) => format!("{} must be at least {} characters", field, min),
                (None, Some(max)) => format!("{} must be at most {} characters", field, max),
                (None, None) => format!("{} has an invalid length", field),
            }
        }
        "blank" => format!("{} must not be blank", field),
        "handle_length" => format!("{} must be between 3 and 32 characters", field),
        "handle_charset" => format!(
            "{} may only contain letters, digits, '/', '_' and '-'",
            field
        ),
        _ => format!("{} is invalid", field),
    }
}

/// Joins every field error into one sorted, de-duplicated message.
fn format_errors(errors: &ValidationErrors) -> String {
    let mut messages: Vec<String> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errors)| errors.iter().map(move |error| describe(field, error)))
        .collect();
    messages.sort();
    messages.dedup();
    messages.join(", ")
}

/// Maps a JSON body rejection to a 400 with a readable message.
pub(crate) fn json_rejection_to_error(rejection: JsonRejection) -> AppError {
    if matches!(rejection, JsonRejection::MissingJsonContentType(_)) {
        return AppError::bad_request(anyhow!(
            "Missing 'Content-Type: application/json' header"
        ));
    }

    let body_text = rejection.body_text();

    if let Some(rest) = body_text.split("missing field `").nth(1) {
        let field = rest.split('`').next().unwrap_or("unknown");
        return AppError::bad_request(anyhow!("{} is required", field));
    }

    if body_text.contains("unknown variant") {
        return AppError::bad_request(anyhow!("Unknown role in request"));
    }

    if body_text.contains("invalid type") {
        return AppError::bad_request(anyhow!("Invalid field type in request"));
    }

    AppError::bad_request(anyhow!("Invalid request body"))
}

/// JSON body extractor that also runs `validator` rules.
///
/// Malformed bodies are 400; bodies that parse but break a rule are 422.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(json_rejection_to_error)?;

        value.validate().map_err(|errors| {
            AppError::new(
                StatusCode::UNPROCESSABLE_ENTITY,
                anyhow!("{}", format_errors(&errors)),
            )
        })?;

        Ok(ValidatedJson(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use hostelhub_core::Role;
    use hostelhub_models::{RegisterIdentityDto, ResetPasswordDto};

    fn json_request(body: &str) -> Request {
        axum::http::Request::builder()
            .method("POST")
            .uri("/")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[test]
    fn test_length_message_names_bounds() {
        let dto = ResetPasswordDto {
            new_password: "short".to_string(),
        };
        let errors = dto.validate().unwrap_err();
        assert_eq!(
            format_errors(&errors),
            "new_password must be between 8 and 128 characters"
        );
    }

    #[test]
    fn test_handle_messages() {
        let dto = RegisterIdentityDto {
            name: "Amaka Obi".to_string(),
            handle: "STAFF 001".to_string(),
            password: "Passw0rd!".to_string(),
            role: Role::Staff,
            contact: None,
        };
        let errors = dto.validate().unwrap_err();
        assert!(format_errors(&errors).starts_with("handle may only contain"));
    }

    #[test]
    fn test_blank_message() {
        let dto = RegisterIdentityDto {
            name: "   ".to_string(),
            handle: "STU777".to_string(),
            password: "Passw0rd!".to_string(),
            role: Role::Student,
            contact: None,
        };
        let errors = dto.validate().unwrap_err();
        assert_eq!(format_errors(&errors), "name must not be blank");
    }

    #[tokio::test]
    async fn test_rule_failure_is_unprocessable() {
        let result = ValidatedJson::<ResetPasswordDto>::from_request(
            json_request(r#"{"new_password":"short"}"#),
            &(),
        )
        .await;
        assert_eq!(result.unwrap_err().status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_missing_field_is_bad_request() {
        let err = ValidatedJson::<ResetPasswordDto>::from_request(json_request("{}"), &())
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.error.to_string(), "new_password is required");
    }

    #[tokio::test]
    async fn test_valid_body_passes() {
        let ValidatedJson(dto) = ValidatedJson::<ResetPasswordDto>::from_request(
            json_request(r#"{"new_password":"N3wPassw0rd!"}"#),
            &(),
        )
        .await
        .unwrap();
        assert_eq!(dto.new_password, "N3wPassw0rd!");
    }
}
