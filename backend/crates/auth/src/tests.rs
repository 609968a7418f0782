//! Scenario tests for the auth crate

#[cfg(test)]
mod sign_up_tests {
    use crate::application::{SignUpInput, SignUpUseCase};
    use crate::domain::value_object::UserNameError;
    use crate::error::AuthError;
    use crate::test_support::{PASSWORD, harness};
    use ledger::{Amount, LogKind, UserRole};
    use platform::crypto::security_key_digest;

    fn input(username: &str) -> SignUpInput {
        SignUpInput {
            username: username.to_string(),
            password: PASSWORD.to_string(),
            email: format!("{}@example.com", username.trim()),
        }
    }

    #[tokio::test]
    async fn test_sign_up_creates_clean_account() {
        let h = harness(vec![]).await;
        let s = &h.state;
        let use_case = SignUpUseCase::new(s.gate.clone(), s.config.clone(), s.clock.clone(), s.ids.clone());

        let out = use_case.execute(input(" Alice ")).await.unwrap();
        assert_eq!(out.username, "alice");
        assert!(out.security_key.starts_with("RE-"));

        let saved = h.store.snapshot().unwrap();
        let user = saved.user_by_username("alice").unwrap();
        assert_eq!(user.id, out.user_id);
        assert_eq!(user.role, UserRole::User);
        assert_eq!(user.balances().wallet(), Amount::ZERO);
        assert_eq!(user.balances().pending(), Amount::ZERO);
        assert_eq!(user.failed_attempts, 0);
        assert_eq!(user.security_key_digest, security_key_digest(&out.security_key));
        assert_ne!(user.security_key_digest, out.security_key);

        assert_eq!(saved.logs[0].kind, LogKind::Auth);
        assert_eq!(saved.logs[0].user_id, Some(out.user_id));
    }

    #[tokio::test]
    async fn test_duplicate_username_rejected_case_insensitively() {
        let h = harness(vec![]).await;
        let s = &h.state;
        let use_case = SignUpUseCase::new(s.gate.clone(), s.config.clone(), s.clock.clone(), s.ids.clone());

        use_case.execute(input("alice")).await.unwrap();
        let err = use_case.execute(input("ALICE")).await.unwrap_err();
        assert!(matches!(err, AuthError::UsernameTaken));
        assert_eq!(s.gate.read(|st| st.users.len()).await, 1);
    }

    #[tokio::test]
    async fn test_invalid_input_rejected_before_any_write() {
        let h = harness(vec![]).await;
        let s = &h.state;
        let use_case = SignUpUseCase::new(s.gate.clone(), s.config.clone(), s.clock.clone(), s.ids.clone());

        let err = use_case.execute(input("admin")).await.unwrap_err();
        assert!(matches!(
            err,
            AuthError::InvalidUserName(UserNameError::Reserved(_))
        ));

        let mut weak = input("bob");
        weak.password = "short".into();
        assert!(matches!(
            use_case.execute(weak).await,
            Err(AuthError::PasswordPolicy(_))
        ));

        let mut bad_mail = input("carol");
        bad_mail.email = "not-an-email".into();
        assert!(matches!(
            use_case.execute(bad_mail).await,
            Err(AuthError::InvalidEmail(_))
        ));

        // only the seed save happened
        assert_eq!(h.store.save_count(), 1);
    }
}

#[cfg(test)]
mod sign_in_tests {
    use chrono::Duration;
    use kernel::clock::Clock;
    use ledger::UserStatus;

    use crate::application::{SignInInput, SignInOutput, SignInUseCase};
    use crate::error::{AuthError, AuthResult};
    use crate::test_support::{Harness, PASSWORD, harness, user};

    async fn sign_in(h: &Harness, username: &str, password: &str) -> AuthResult<SignInOutput> {
        let s = &h.state;
        SignInUseCase::new(s.gate.clone(), s.config.clone(), s.clock.clone(), s.ids.clone())
            .execute(SignInInput {
                username: username.to_string(),
                password: password.to_string(),
            })
            .await
    }

    #[tokio::test]
    async fn test_unknown_user() {
        let h = harness(vec![]).await;
        assert!(matches!(
            sign_in(&h, "ghost", PASSWORD).await,
            Err(AuthError::UserNotFound)
        ));
    }

    #[tokio::test]
    async fn test_success_issues_verifiable_token() {
        let h = harness(vec![user("alice")]).await;
        let out = sign_in(&h, "Alice", PASSWORD).await.unwrap();
        assert_eq!(out.username, "alice");
        assert_eq!(out.expires_at, h.clock.now() + h.state.config.session_ttl());

        let current = h.state.check_session().execute(&out.session_token).await.unwrap();
        assert_eq!(current.user_id, out.user_id);
        assert!(!current.is_admin());
    }

    #[tokio::test]
    async fn test_failed_attempt_is_persisted() {
        let h = harness(vec![user("alice")]).await;

        let err = sign_in(&h, "alice", "WrongHorse#42").await.unwrap_err();
        assert!(matches!(
            err,
            AuthError::InvalidCredential {
                attempts_used: 1,
                attempts_remaining: 2
            }
        ));
        let saved = h.store.snapshot().unwrap();
        assert_eq!(saved.user_by_username("alice").unwrap().failed_attempts, 1);
    }

    #[tokio::test]
    async fn test_lockout_survives_correct_password_until_window_elapses() {
        let h = harness(vec![user("alice")]).await;

        for _ in 0..2 {
            sign_in(&h, "alice", "WrongHorse#42").await.unwrap_err();
        }
        let err = sign_in(&h, "alice", "WrongHorse#42").await.unwrap_err();
        assert!(matches!(err, AuthError::LockedOut { remaining } if remaining == Duration::hours(24)));

        h.clock.advance(Duration::hours(23));
        let err = sign_in(&h, "alice", PASSWORD).await.unwrap_err();
        assert!(matches!(err, AuthError::LockedOut { remaining } if remaining == Duration::hours(1)));

        h.clock.advance(Duration::hours(1));
        sign_in(&h, "alice", PASSWORD).await.unwrap();

        let saved = h.store.snapshot().unwrap();
        let alice = saved.user_by_username("alice").unwrap();
        assert_eq!(alice.failed_attempts, 0);
        assert_eq!(alice.lockout_until, None);
    }

    #[tokio::test]
    async fn test_counter_starts_over_after_expired_lockout() {
        let h = harness(vec![user("alice")]).await;
        for _ in 0..3 {
            sign_in(&h, "alice", "WrongHorse#42").await.unwrap_err();
        }
        h.clock.advance(Duration::hours(25));

        let err = sign_in(&h, "alice", "WrongHorse#42").await.unwrap_err();
        assert!(matches!(
            err,
            AuthError::InvalidCredential {
                attempts_used: 1,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_status_checked_after_credentials() {
        let mut suspended = user("bob");
        suspended.status = UserStatus::Suspended;
        let mut banned = user("carol");
        banned.status = UserStatus::Banned;
        let h = harness(vec![suspended, banned]).await;

        assert!(matches!(
            sign_in(&h, "bob", PASSWORD).await,
            Err(AuthError::AccountSuspended)
        ));
        assert!(matches!(
            sign_in(&h, "carol", PASSWORD).await,
            Err(AuthError::AccountBanned)
        ));
        // a wrong password is reported as such, not as the status
        assert!(matches!(
            sign_in(&h, "carol", "WrongHorse#42").await,
            Err(AuthError::InvalidCredential { .. })
        ));
    }

    #[tokio::test]
    async fn test_session_rejected_once_account_is_suspended() {
        let h = harness(vec![user("alice")]).await;
        let out = sign_in(&h, "alice", PASSWORD).await.unwrap();

        h.state
            .gate
            .mutate(|s| -> AuthResult<()> {
                if let Some(u) = s.user_mut(&out.user_id) {
                    u.status = UserStatus::Suspended;
                }
                Ok(())
            })
            .await
            .unwrap();

        assert!(matches!(
            h.state.check_session().execute(&out.session_token).await,
            Err(AuthError::AccountSuspended)
        ));
    }

    #[tokio::test]
    async fn test_expired_session_rejected() {
        let h = harness(vec![user("alice")]).await;
        let out = sign_in(&h, "alice", PASSWORD).await.unwrap();

        h.clock.advance(h.state.config.session_ttl() + Duration::seconds(1));
        assert!(matches!(
            h.state.check_session().execute(&out.session_token).await,
            Err(AuthError::SessionInvalid)
        ));
    }
}

#[cfg(test)]
mod recover_tests {
    use crate::application::{
        CheckSessionUseCase, RecoverInput, RecoverUseCase, SignInInput, SignInUseCase, SignUpInput, SignUpUseCase,
    };
    use crate::error::AuthError;
    use crate::test_support::{Harness, PASSWORD, harness, user};

    const NEW_PASSWORD: &str = "BatteryStaple#77";

    async fn sign_up(h: &Harness, username: &str) -> String {
        let s = &h.state;
        SignUpUseCase::new(s.gate.clone(), s.config.clone(), s.clock.clone(), s.ids.clone())
            .execute(SignUpInput {
                username: username.to_string(),
                password: PASSWORD.to_string(),
                email: format!("{username}@example.com"),
            })
            .await
            .unwrap()
            .security_key
    }

    fn recover_use_case(h: &Harness) -> RecoverUseCase<ledger::MemoryStateStore> {
        let s = &h.state;
        RecoverUseCase::new(s.gate.clone(), s.config.clone(), s.clock.clone(), s.ids.clone())
    }

    fn input(key: &str, username: &str) -> RecoverInput {
        RecoverInput {
            security_key: key.to_string(),
            new_username: username.to_string(),
            new_password: NEW_PASSWORD.to_string(),
        }
    }

    #[tokio::test]
    async fn test_recover_replaces_credentials_and_clears_lockout() {
        let h = harness(vec![]).await;
        let key = sign_up(&h, "alice").await;

        let sign_in = |username: &str, password: &str| {
            let s = &h.state;
            let use_case =
                SignInUseCase::new(s.gate.clone(), s.config.clone(), s.clock.clone(), s.ids.clone());
            let input = SignInInput {
                username: username.to_string(),
                password: password.to_string(),
            };
            async move { use_case.execute(input).await }
        };

        for _ in 0..3 {
            sign_in("alice", "WrongHorse#42").await.unwrap_err();
        }
        assert!(matches!(
            sign_in("alice", PASSWORD).await,
            Err(AuthError::LockedOut { .. })
        ));

        // keys are accepted regardless of case and surrounding whitespace
        let messy_key = format!("  {}  ", key.to_lowercase());
        let out = recover_use_case(&h)
            .execute(input(&messy_key, "alice2"))
            .await
            .unwrap();
        assert_eq!(out.username, "alice2");

        assert!(matches!(
            sign_in("alice", NEW_PASSWORD).await,
            Err(AuthError::UserNotFound)
        ));
        let signed_in = sign_in("alice2", NEW_PASSWORD).await.unwrap();
        assert_eq!(signed_in.user_id, out.user_id);
    }

    #[tokio::test]
    async fn test_recovery_rotates_key_and_ends_old_sessions() {
        let h = harness(vec![]).await;
        let key = sign_up(&h, "alice").await;
        let s = &h.state;

        let sign_in =
            SignInUseCase::new(s.gate.clone(), s.config.clone(), s.clock.clone(), s.ids.clone());
        let old_session = sign_in
            .execute(SignInInput {
                username: "alice".to_string(),
                password: PASSWORD.to_string(),
            })
            .await
            .unwrap()
            .session_token;
        let check = CheckSessionUseCase::new(s.gate.clone(), s.config.clone(), s.clock.clone());
        assert!(check.execute(&old_session).await.is_ok());

        let out = recover_use_case(&h).execute(input(&key, "alice")).await.unwrap();
        assert_ne!(out.security_key, key);

        assert!(matches!(
            check.execute(&old_session).await,
            Err(AuthError::SessionInvalid)
        ));
        assert!(matches!(
            recover_use_case(&h).execute(input(&key, "alice")).await,
            Err(AuthError::InvalidKey)
        ));
        assert!(
            recover_use_case(&h)
                .execute(input(&out.security_key, "alice"))
                .await
                .is_ok()
        );
    }

    #[tokio::test]
    async fn test_unknown_key() {
        let h = harness(vec![user("alice")]).await;
        assert!(matches!(
            recover_use_case(&h)
                .execute(input("RE-AAAA-BBBB-CCCC-DDDD", "alice9"))
                .await,
            Err(AuthError::InvalidKey)
        ));
    }

    #[tokio::test]
    async fn test_new_username_taken_by_someone_else() {
        let h = harness(vec![user("bob")]).await;
        let key = sign_up(&h, "alice").await;

        assert!(matches!(
            recover_use_case(&h).execute(input(&key, "Bob")).await,
            Err(AuthError::UsernameTaken)
        ));
        // keeping one's own name is fine
        assert!(recover_use_case(&h).execute(input(&key, "alice")).await.is_ok());
    }
}

#[cfg(test)]
mod router_tests {
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use axum::routing::get;
    use axum::{Extension, Router, middleware};
    use tower::ServiceExt;

    use crate::application::CurrentUser;
    use crate::presentation::{auth_router, require_session};
    use crate::test_support::{Harness, PASSWORD, harness, user};

    async fn whoami(Extension(current): Extension<CurrentUser>) -> String {
        current.username
    }

    fn app(h: &Harness) -> Router {
        let protected = Router::new()
            .route("/api/whoami", get(whoami))
            .route_layer(middleware::from_fn_with_state(
                h.state.clone(),
                require_session::<ledger::MemoryStateStore>,
            ));
        Router::new()
            .nest("/api/auth", auth_router(h.state.clone()))
            .merge(protected)
    }

    fn json_request(uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_sign_up_then_sign_in_then_protected_route() {
        let h = harness(vec![]).await;

        let response = app(&h)
            .oneshot(json_request(
                "/api/auth/signup",
                serde_json::json!({"username": "alice", "password": PASSWORD, "email": "a@example.com"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        assert!(body_json(response).await["securityKey"].is_string());

        let response = app(&h)
            .oneshot(json_request(
                "/api/auth/signin",
                serde_json::json!({"username": "alice", "password": PASSWORD}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["role"], "user");
        let token = body["token"].as_str().unwrap().to_string();

        let response = app(&h)
            .oneshot(
                Request::builder()
                    .uri("/api/whoami")
                    .header(header::AUTHORIZATION, format!("Bearer {token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"alice");
    }

    #[tokio::test]
    async fn test_protected_route_without_token() {
        let h = harness(vec![user("alice")]).await;
        let response = app(&h)
            .oneshot(Request::builder().uri("/api/whoami").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_locked_account_gets_423_problem_details() {
        let h = harness(vec![user("alice")]).await;
        for _ in 0..3 {
            app(&h)
                .oneshot(json_request(
                    "/api/auth/signin",
                    serde_json::json!({"username": "alice", "password": "WrongHorse#42"}),
                ))
                .await
                .unwrap();
        }

        let response = app(&h)
            .oneshot(json_request(
                "/api/auth/signin",
                serde_json::json!({"username": "alice", "password": PASSWORD}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::LOCKED);
        let body = body_json(response).await;
        assert_eq!(body["category"], "POLICY");
        assert_eq!(body["status"], 423);
    }

    #[tokio::test]
    async fn test_status_endpoint_without_token() {
        let h = harness(vec![]).await;
        let response = app(&h)
            .oneshot(
                Request::builder()
                    .uri("/api/auth/status")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["authenticated"], false);
    }
}
