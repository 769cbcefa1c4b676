//! Registration, login and current-user handlers.

use actix_web::{HttpResponse, web};

use bloghub_core::domain::User;
use bloghub_core::error::RepoError;
use bloghub_core::ports::{PasswordService, TokenService, UserRepository};
use bloghub_shared::dto::{AuthResponse, LoginRequest, RegisterRequest, UserResponse};

use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

fn validate_registration(req: &RegisterRequest) -> Result<(), AppError> {
    if req.username.trim().is_empty()
        || req.email.trim().is_empty()
        || req.full_name.trim().is_empty()
    {
        return Err(AppError::BadRequest("All fields are required".to_string()));
    }
    if !req.email.contains('@') {
        return Err(AppError::BadRequest("Invalid email address".to_string()));
    }
    if req.password.len() < 6 {
        return Err(AppError::BadRequest(
            "Password must be at least 6 characters".to_string(),
        ));
    }
    Ok(())
}

/// POST /api/auth/register - create an account and issue a token.
pub async fn register(
    state: web::Data<AppState>,
    body: web::Json<RegisterRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    validate_registration(&req)?;

    let password_hash = state
        .passwords
        .hash(&req.password)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    let user = User::new(req.username, req.email, password_hash, req.full_name);
    let saved = state.users.insert(user).await.map_err(|e| match e {
        RepoError::Constraint(_) => {
            AppError::Conflict("User with this email or username already exists".to_string())
        }
        other => other.into(),
    })?;

    let token = state
        .tokens
        .generate_token(saved.id, &saved.username, saved.is_admin)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    tracing::info!(user_id = %saved.id, "account registered");
    Ok(HttpResponse::Created().json(AuthResponse {
        message: "User registered successfully".to_string(),
        token,
        expires_in: state.tokens.expiration_seconds(),
        user: UserResponse::from_domain(saved),
    }))
}

/// POST /api/auth/login - verify credentials and issue a token.
///
/// Unknown email and wrong password are indistinguishable to the caller.
pub async fn login(
    state: web::Data<AppState>,
    body: web::Json<LoginRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let user = state
        .users
        .find_by_email(&req.email)
        .await?
        .ok_or(AppError::Unauthorized)?;

    let valid = state
        .passwords
        .verify(&req.password, &user.password_hash)
        .map_err(|e| AppError::Internal(e.to_string()))?;
    if !valid {
        return Err(AppError::Unauthorized);
    }

    let token = state
        .tokens
        .generate_token(user.id, &user.username, user.is_admin)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(HttpResponse::Ok().json(AuthResponse {
        message: "Login successful".to_string(),
        token,
        expires_in: state.tokens.expiration_seconds(),
        user: UserResponse::from_domain(user),
    }))
}

/// GET /api/auth/me - the account behind the presented token.
pub async fn me(state: web::Data<AppState>, identity: Identity) -> AppResult<HttpResponse> {
    let user = state
        .users
        .find_by_id(identity.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok(HttpResponse::Ok().json(UserResponse::from_domain(user)))
}

#[cfg(test)]
mod tests {
    use actix_web::{App, test, web};

    use bloghub_shared::dto::{AuthResponse, UserResponse};
    use bloghub_shared::response::ErrorBody;

    use crate::handlers::configure_routes;
    use crate::handlers::testutil::bearer;
    use crate::state::AppState;

    fn registration() -> serde_json::Value {
        serde_json::json!({
            "username": "ann",
            "email": "ann@example.com",
            "password": "hunter22",
            "fullName": "Ann Example"
        })
    }

    #[actix_web::test]
    async fn register_then_me_round_trips_the_account() {
        let state = AppState::for_tests();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state.clone()))
                .configure(configure_routes),
        )
        .await;

        let registered: AuthResponse = test::call_and_read_body_json(
            &app,
            test::TestRequest::post()
                .uri("/api/auth/register")
                .set_json(registration())
                .to_request(),
        )
        .await;
        assert!(!registered.user.is_admin);
        assert!(registered.expires_in > 0);

        let me: UserResponse = test::call_and_read_body_json(
            &app,
            test::TestRequest::get()
                .uri("/api/auth/me")
                .insert_header(bearer(&registered.token))
                .to_request(),
        )
        .await;
        assert_eq!(me.id, registered.user.id);
        assert_eq!(me.email, "ann@example.com");
    }

    #[actix_web::test]
    async fn duplicate_registration_conflicts() {
        let state = AppState::for_tests();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state.clone()))
                .configure(configure_routes),
        )
        .await;

        let first = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/auth/register")
                .set_json(registration())
                .to_request(),
        )
        .await;
        assert_eq!(first.status(), 201);

        let second = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/auth/register")
                .set_json(registration())
                .to_request(),
        )
        .await;
        assert_eq!(second.status(), 400);
    }

    #[actix_web::test]
    async fn wrong_password_and_unknown_email_look_identical() {
        let state = AppState::for_tests();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state.clone()))
                .configure(configure_routes),
        )
        .await;
        test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/auth/register")
                .set_json(registration())
                .to_request(),
        )
        .await;

        let wrong_password = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/auth/login")
                .set_json(serde_json::json!({ "email": "ann@example.com", "password": "nope22" }))
                .to_request(),
        )
        .await;
        let unknown_email = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/auth/login")
                .set_json(serde_json::json!({ "email": "ghost@example.com", "password": "nope22" }))
                .to_request(),
        )
        .await;

        assert_eq!(wrong_password.status(), 401);
        assert_eq!(unknown_email.status(), 401);
        let first: ErrorBody = test::read_body_json(wrong_password).await;
        let second: ErrorBody = test::read_body_json(unknown_email).await;
        assert_eq!(first.message, second.message);
    }

    #[actix_web::test]
    async fn short_passwords_are_rejected() {
        let state = AppState::for_tests();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state.clone()))
                .configure(configure_routes),
        )
        .await;

        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/auth/register")
                .set_json(serde_json::json!({
                    "username": "ann",
                    "email": "ann@example.com",
                    "password": "abc",
                    "fullName": "Ann Example"
                }))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), 400);
    }

    #[actix_web::test]
    async fn garbage_tokens_are_unauthorized() {
        let state = AppState::for_tests();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state.clone()))
                .configure(configure_routes),
        )
        .await;

        let resp = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/api/auth/me")
                .insert_header(("Authorization", "Bearer not.a.token"))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), 401);

        let missing = test::call_service(
            &app,
            test::TestRequest::get().uri("/api/auth/me").to_request(),
        )
        .await;
        assert_eq!(missing.status(), 401);
    }
}
