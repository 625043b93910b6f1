use actix_web::{http::header::USER_AGENT, web, HttpRequest, HttpResponse};
use validator::Validate;

use orchid_core::{AccountRepository, TokenRepository};
use orchid_shared::ApiResponse;

use crate::dto::auth::{LoginData, LoginRequest};
use crate::handlers::error::{handle_domain_error, handle_validation_errors};

use super::AppState;

/// Handler for POST /api/v1/auth/login
///
/// Checks the credentials and issues a new session token. The token is
/// marked mobile when the `User-Agent` mentions `mobile`, unless the body
/// sets `is_mobile` explicitly.
///
/// ## Errors
/// - 400 Bad Request: Malformed email or empty password
/// - 401 Unauthorized: Unknown email or wrong password
pub async fn login<T, A>(
    req: HttpRequest,
    state: web::Data<AppState<T, A>>,
    request: web::Json<LoginRequest>,
) -> HttpResponse
where
    T: TokenRepository + 'static,
    A: AccountRepository + 'static,
{
    if let Err(errors) = request.validate() {
        return handle_validation_errors(&errors);
    }

    let request = request.into_inner();
    let is_mobile = request
        .is_mobile
        .unwrap_or_else(|| is_mobile_user_agent(&req));

    match state
        .auth_service
        .login(&request.email, &request.password, is_mobile)
        .await
    {
        Ok(response) => HttpResponse::Ok().json(ApiResponse::success(
            "Login successful",
            LoginData::from(response),
        )),
        Err(error) => handle_domain_error(&error),
    }
}

/// Whether the `User-Agent` header identifies a mobile client
fn is_mobile_user_agent(req: &HttpRequest) -> bool {
    req.headers()
        .get(USER_AGENT)
        .and_then(|value| value.to_str().ok())
        .map(|agent| agent.to_ascii_lowercase().contains("mobile"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn test_mobile_user_agent_detection() {
        let iphone = TestRequest::default()
            .insert_header((
                USER_AGENT,
                "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0) Mobile/15E148 Safari/604.1",
            ))
            .to_http_request();
        assert!(is_mobile_user_agent(&iphone));

        let shouting = TestRequest::default()
            .insert_header((USER_AGENT, "OrchidApp MOBILE"))
            .to_http_request();
        assert!(is_mobile_user_agent(&shouting));

        let desktop = TestRequest::default()
            .insert_header((USER_AGENT, "Mozilla/5.0 (X11; Linux x86_64) Firefox/128.0"))
            .to_http_request();
        assert!(!is_mobile_user_agent(&desktop));

        assert!(!is_mobile_user_agent(&TestRequest::default().to_http_request()));
    }
}
