//! Tests for domain_account: credentials, lockout and the auth service

use chrono::{Duration, Utc};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use domain_account::{
    base_username, next_available_username, AccountError, AccountPort, AuthMetrics, AuthService,
    CredentialsPolicy, InMemoryAccounts, IssuedToken, LoginAttemptTracker, NewToken, NewUser,
    PasswordHasher, Role, TokenIssuer, TokenPort, TokenType, User,
};

const TEST_COST: u32 = 4;

struct SequenceIssuer {
    issued: AtomicU64,
}

impl TokenIssuer for SequenceIssuer {
    fn issue(&self, user: &User) -> Result<IssuedToken, AccountError> {
        let n = self.issued.fetch_add(1, Ordering::Relaxed);
        Ok(IssuedToken {
            token: format!("token-{}-{}", user.username, n),
            expires_at: Utc::now() + Duration::hours(1),
        })
    }
}

struct Harness {
    accounts: Arc<InMemoryAccounts>,
    auth: AuthService,
    metrics: Arc<AuthMetrics>,
}

async fn harness_with_user(username: &str, password: &str) -> Harness {
    let accounts = Arc::new(InMemoryAccounts::new());
    let hasher = PasswordHasher::new(TEST_COST);
    accounts
        .insert_user(NewUser {
            first_name: "John".to_string(),
            last_name: "Smith".to_string(),
            username: username.to_string(),
            password_hash: hasher.hash(password).await.unwrap(),
            role: Role::Trainee,
        })
        .await
        .unwrap();

    let metrics = Arc::new(AuthMetrics::new());
    let auth = AuthService::new(
        accounts.clone(),
        accounts.clone(),
        Arc::new(SequenceIssuer { issued: AtomicU64::new(0) }),
        hasher,
        Arc::new(LoginAttemptTracker::new(3, Duration::minutes(5))),
        metrics.clone(),
    );

    Harness { accounts, auth, metrics }
}

// ============================================================================
// Credential generation
// ============================================================================

mod credential_tests {
    use super::*;

    #[test]
    fn test_base_username_is_first_dot_last() {
        assert_eq!(base_username("Anna", "Lee"), "Anna.Lee");
    }

    #[test]
    fn test_free_base_is_used_as_is() {
        let taken = vec!["Anna.Leeds".to_string()];
        assert_eq!(next_available_username("Anna.Lee", &taken), "Anna.Lee");
    }

    #[test]
    fn test_first_gap_in_serials_is_reused() {
        let taken = vec![
            "Anna.Lee".to_string(),
            "Anna.Lee1".to_string(),
            "Anna.Lee3".to_string(),
        ];
        assert_eq!(next_available_username("Anna.Lee", &taken), "Anna.Lee2");
    }

    #[test]
    fn test_default_policy_length() {
        let policy = CredentialsPolicy::default();
        assert_eq!(policy.random_password().chars().count(), 10);
    }

    #[test]
    fn test_policy_rejects_empty_alphabet() {
        assert!(CredentialsPolicy::new(10, "").is_err());
        assert!(CredentialsPolicy::new(0, "abc").is_err());
    }

    proptest::proptest! {
        #[test]
        fn prop_next_username_is_never_taken(
            serials in proptest::collection::btree_set(0u32..20, 0..10),
            base_taken in proptest::bool::ANY,
        ) {
            let mut taken: Vec<String> = serials
                .iter()
                .filter(|n| **n > 0)
                .map(|n| format!("Anna.Lee{}", n))
                .collect();
            if base_taken {
                taken.push("Anna.Lee".to_string());
            }
            let chosen = next_available_username("Anna.Lee", &taken);
            proptest::prop_assert!(chosen.starts_with("Anna.Lee"));
            proptest::prop_assert!(!taken.contains(&chosen));
        }
    }

    #[tokio::test]
    async fn test_hash_and_verify() {
        let hasher = PasswordHasher::new(TEST_COST);
        let hash = hasher.hash("s3cret").await.unwrap();
        assert_ne!(hash, "s3cret");
        assert!(hasher.verify("s3cret", &hash).await.unwrap());
        assert!(!hasher.verify("other", &hash).await.unwrap());
    }
}

// ============================================================================
// Lockout
// ============================================================================

mod lockout_tests {
    use super::*;

    #[tokio::test]
    async fn test_blocks_after_max_attempts() {
        let tracker = LoginAttemptTracker::new(3, Duration::minutes(5));
        let now = Utc::now();

        tracker.register_failure_at("10.0.0.1", now).await;
        tracker.register_failure_at("10.0.0.1", now).await;
        assert!(!tracker.is_blocked_at("10.0.0.1", now).await);

        tracker.register_failure_at("10.0.0.1", now).await;
        assert!(tracker.is_blocked_at("10.0.0.1", now).await);
        assert!(!tracker.is_blocked_at("10.0.0.2", now).await);
    }

    #[tokio::test]
    async fn test_block_expires_and_count_restarts() {
        let tracker = LoginAttemptTracker::new(3, Duration::minutes(5));
        let now = Utc::now();
        for _ in 0..3 {
            tracker.register_failure_at("10.0.0.1", now).await;
        }

        let later = now + Duration::minutes(5) + Duration::seconds(1);
        assert!(!tracker.is_blocked_at("10.0.0.1", later).await);
        assert_eq!(tracker.failures("10.0.0.1").await, 0);
    }

    #[tokio::test]
    async fn test_reset_clears_failures() {
        let tracker = LoginAttemptTracker::default();
        tracker.register_failure("client").await;
        tracker.reset("client").await;
        assert_eq!(tracker.failures("client").await, 0);
    }
}

// ============================================================================
// Auth service
// ============================================================================

mod auth_service_tests {
    use super::*;

    #[tokio::test]
    async fn test_login_success_stores_token() {
        let h = harness_with_user("John.Smith", "pass1234").await;

        let issued = h.auth.login("John.Smith", "pass1234", "ip").await.unwrap();

        let stored = h.accounts.find_token(&issued.token).await.unwrap().unwrap();
        assert!(!stored.revoked);
        assert_eq!(h.metrics.snapshot().login_success_total, 1);
    }

    #[tokio::test]
    async fn test_wrong_password_counts_failure() {
        let h = harness_with_user("John.Smith", "pass1234").await;

        let err = h.auth.login("John.Smith", "nope", "ip").await.unwrap_err();

        assert!(matches!(err, AccountError::InvalidCredentials));
        assert_eq!(h.metrics.snapshot().login_failure_total, 1);
    }

    #[tokio::test]
    async fn test_unknown_user_is_invalid_credentials() {
        let h = harness_with_user("John.Smith", "pass1234").await;
        let err = h.auth.login("Ghost.User", "pass1234", "ip").await.unwrap_err();
        assert!(matches!(err, AccountError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_blank_credentials_rejected() {
        let h = harness_with_user("John.Smith", "pass1234").await;
        let err = h.auth.login("", "", "ip").await.unwrap_err();
        assert!(matches!(err, AccountError::MissingCredentials));
    }

    #[tokio::test]
    async fn test_whitespace_password_is_missing_not_a_failure() {
        let h = harness_with_user("John.Smith", "pass1234").await;
        let err = h.auth.login("John.Smith", "   ", "ip").await.unwrap_err();
        assert!(matches!(err, AccountError::MissingCredentials));
        assert_eq!(h.metrics.snapshot().login_failure_total, 0);
    }

    #[tokio::test]
    async fn test_third_failure_blocks_even_correct_password() {
        let h = harness_with_user("John.Smith", "pass1234").await;
        for _ in 0..3 {
            let _ = h.auth.login("John.Smith", "bad", "203.0.113.9").await;
        }

        let err = h.auth.login("John.Smith", "pass1234", "203.0.113.9").await.unwrap_err();
        assert!(matches!(err, AccountError::Blocked));

        // another client is unaffected
        assert!(h.auth.login("John.Smith", "pass1234", "198.51.100.1").await.is_ok());
    }

    #[tokio::test]
    async fn test_second_login_conflicts_until_logout() {
        let h = harness_with_user("John.Smith", "pass1234").await;
        let first = h.auth.login("John.Smith", "pass1234", "ip").await.unwrap();

        let err = h.auth.login("John.Smith", "pass1234", "ip").await.unwrap_err();
        assert!(matches!(err, AccountError::AlreadyLoggedIn));

        assert_eq!(h.auth.logout(&first.token).await.unwrap(), 1);
        assert!(matches!(
            h.auth.verify_session(&first.token).await,
            Err(AccountError::TokenRevoked)
        ));
        assert!(h.auth.login("John.Smith", "pass1234", "ip").await.is_ok());
    }

    #[tokio::test]
    async fn test_login_drops_revoked_sessions() {
        let h = harness_with_user("John.Smith", "pass1234").await;
        let first = h.auth.login("John.Smith", "pass1234", "ip").await.unwrap();
        h.auth.logout(&first.token).await.unwrap();

        let second = h.auth.login("John.Smith", "pass1234", "ip").await.unwrap();

        assert!(h.accounts.find_token(&first.token).await.unwrap().is_none());
        assert!(h.accounts.find_token(&second.token).await.unwrap().is_some());
        assert!(matches!(
            h.auth.verify_session(&first.token).await,
            Err(AccountError::TokenRevoked)
        ));
    }

    #[tokio::test]
    async fn test_unknown_token_fails_verification() {
        let h = harness_with_user("John.Smith", "pass1234").await;
        let err = h.auth.verify_session("forged").await.unwrap_err();
        assert!(err.is_authentication_failure());
    }

    #[tokio::test]
    async fn test_change_password() {
        let h = harness_with_user("John.Smith", "pass1234").await;

        h.auth.change_password("John.Smith", "pass1234", "newpass99").await.unwrap();

        assert!(h.auth.login("John.Smith", "newpass99", "ip").await.is_ok());
        assert_eq!(h.metrics.snapshot().password_change_total, 1);
    }

    #[tokio::test]
    async fn test_change_password_requires_old_password() {
        let h = harness_with_user("John.Smith", "pass1234").await;
        let err = h
            .auth
            .change_password("John.Smith", "wrong", "newpass99")
            .await
            .unwrap_err();
        assert!(matches!(err, AccountError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_change_password_unknown_user() {
        let h = harness_with_user("John.Smith", "pass1234").await;
        let err = h
            .auth
            .change_password("Nobody.Here", "pass1234", "newpass99")
            .await
            .unwrap_err();
        assert!(matches!(err, AccountError::UserNotFound(_)));
    }

    #[tokio::test]
    async fn test_change_password_rejects_blank() {
        let h = harness_with_user("John.Smith", "pass1234").await;
        let err = h
            .auth
            .change_password("John.Smith", "pass1234", "  ")
            .await
            .unwrap_err();
        assert!(matches!(err, AccountError::Validation(_)));
    }
}

mod memory_tests {
    use super::*;

    #[tokio::test]
    async fn test_usernames_starting_with() {
        let h = harness_with_user("John.Smith", "pw").await;
        h.accounts
            .insert_user(NewUser {
                first_name: "John".to_string(),
                last_name: "Smith".to_string(),
                username: "John.Smith1".to_string(),
                password_hash: "x".to_string(),
                role: Role::Trainer,
            })
            .await
            .unwrap();

        let mut names = h.accounts.usernames_starting_with("John.Smith").await.unwrap();
        names.sort();
        assert_eq!(names, vec!["John.Smith".to_string(), "John.Smith1".to_string()]);
    }

    #[tokio::test]
    async fn test_purge_keeps_live_and_foreign_tokens() {
        let h = harness_with_user("John.Smith", "pw").await;
        let other = h
            .accounts
            .insert_user(NewUser {
                first_name: "Mia".to_string(),
                last_name: "Stone".to_string(),
                username: "Mia.Stone".to_string(),
                password_hash: "x".to_string(),
                role: Role::Trainer,
            })
            .await
            .unwrap();
        let john = h.accounts.find_user_by_username("John.Smith").await.unwrap().unwrap();
        let now = Utc::now();
        let save = |user_id, token: &str, expires_at| NewToken {
            user_id,
            token: token.to_string(),
            token_type: TokenType::Bearer,
            expires_at,
        };

        h.accounts.save_token(save(john.id, "expired", now - Duration::minutes(1))).await.unwrap();
        h.accounts.save_token(save(john.id, "live", now + Duration::minutes(10))).await.unwrap();
        h.accounts.save_token(save(other.id, "foreign", now - Duration::minutes(1))).await.unwrap();

        assert_eq!(h.accounts.purge_inactive_for_user(john.id, now).await.unwrap(), 1);
        assert!(h.accounts.find_token("expired").await.unwrap().is_none());
        assert!(h.accounts.find_token("live").await.unwrap().is_some());
        assert!(h.accounts.find_token("foreign").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_duplicate_username_conflicts() {
        let h = harness_with_user("John.Smith", "pw").await;
        let err = h
            .accounts
            .insert_user(NewUser {
                first_name: "J".to_string(),
                last_name: "S".to_string(),
                username: "John.Smith".to_string(),
                password_hash: "x".to_string(),
                role: Role::Trainee,
            })
            .await
            .unwrap_err();
        assert!(err.is_conflict());
    }
}
