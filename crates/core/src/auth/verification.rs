//! Email verification codes.

use std::sync::Arc;

use chrono::Duration;
use ledgerly_shared::config::VerificationConfig;
use ledgerly_shared::{AppError, AppResult, EmailSender, OutboundEmail};
use rand::Rng;
use tracing::info;

use crate::context::ServiceContext;
use crate::user::VerificationUpdate;

/// Issues and checks 6-digit verification codes.
#[derive(Clone)]
pub struct VerificationService {
    ctx: ServiceContext,
    email: Arc<dyn EmailSender>,
    config: VerificationConfig,
    app_name: String,
}

impl std::fmt::Debug for VerificationService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VerificationService")
            .field("config", &self.config)
            .field("app_name", &self.app_name)
            .finish_non_exhaustive()
    }
}

/// A random code in `100000..=999999`.
#[must_use]
pub fn generate_code() -> String {
    rand::rng().random_range(100_000..=999_999).to_string()
}

impl VerificationService {
    /// Creates the service.
    #[must_use]
    pub fn new(
        ctx: ServiceContext,
        email: Arc<dyn EmailSender>,
        config: VerificationConfig,
        app_name: impl Into<String>,
    ) -> Self {
        Self {
            ctx,
            email,
            config,
            app_name: app_name.into(),
        }
    }

    /// Issues a fresh code for `email` and mails it.
    ///
    /// Delivery is fire-and-forget; this returns once the code is stored.
    ///
    /// # Errors
    ///
    /// * `NotFound` when no user has that email
    /// * `InvalidState` when the email is already verified, or a code went out
    ///   less than the cooldown ago
    pub async fn resend(&self, email: &str) -> AppResult<()> {
        let user = self
            .ctx
            .store
            .find_user_by_email(email.trim())
            .await?
            .ok_or_else(|| AppError::not_found("User"))?;

        if user.email_verified {
            return Err(AppError::InvalidState("Email is already verified".into()));
        }

        let now = self.ctx.now();
        let cooldown = secs(self.config.resend_cooldown_secs);
        if let Some(last) = user.last_email_sent_at {
            let elapsed = now - last;
            if elapsed < cooldown {
                let wait = (cooldown - elapsed).num_seconds().max(1);
                return Err(AppError::InvalidState(format!(
                    "You can resend in {wait} seconds"
                )));
            }
        }

        let code = generate_code();
        let update = VerificationUpdate::CodeIssued {
            code: code.clone(),
            expires_at: now + secs(self.config.code_ttl_secs),
        };
        self.ctx
            .store
            .update_user_verification(user.id, &update, now)
            .await?;

        self.email.dispatch(OutboundEmail::verification_code(
            &self.app_name,
            &user.email,
            &code,
            self.config.code_ttl_secs / 60,
        ));
        info!(user_id = %user.id, "Verification code issued");
        Ok(())
    }

    /// Accepts `code` for `email`, marking the email verified.
    ///
    /// # Errors
    ///
    /// * `NotFound` when no user has that email
    /// * `Validation` when the code does not match or has expired
    pub async fn verify(&self, email: &str, code: &str) -> AppResult<()> {
        let user = self
            .ctx
            .store
            .find_user_by_email(email.trim())
            .await?
            .ok_or_else(|| AppError::not_found("User"))?;

        let now = self.ctx.now();
        let matches = user.verify_code.as_deref() == Some(code.trim());
        let live = user.verify_expires_at.is_some_and(|exp| exp > now);
        if !(matches && live) {
            return Err(AppError::Validation(
                "Invalid or expired verification code".into(),
            ));
        }

        self.ctx
            .store
            .update_user_verification(user.id, &VerificationUpdate::Verified, now)
            .await?;
        info!(user_id = %user.id, "Email verified");
        Ok(())
    }
}

fn secs(value: u64) -> Duration {
    Duration::seconds(i64::try_from(value).unwrap_or(i64::MAX))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use chrono::{TimeZone, Utc};
    use ledgerly_shared::types::{CompanyId, UserId};

    use crate::auth::Role;
    use crate::clock::{FixedClock, UuidV7Generator};
    use crate::store::{EntityStore, MemoryStore};
    use crate::user::User;

    #[derive(Default)]
    struct CapturingSender {
        sent: Mutex<Vec<OutboundEmail>>,
    }

    impl EmailSender for CapturingSender {
        fn dispatch(&self, email: OutboundEmail) {
            self.sent.lock().unwrap().push(email);
        }
    }

    struct Fixture {
        store: MemoryStore,
        clock: Arc<FixedClock>,
        sender: Arc<CapturingSender>,
        service: VerificationService,
        user: User,
    }

    async fn fixture() -> Fixture {
        let store = MemoryStore::new();
        let now = Utc.with_ymd_and_hms(2025, 4, 1, 8, 0, 0).unwrap();
        let clock = Arc::new(FixedClock::new(now));
        let sender = Arc::new(CapturingSender::default());
        let user = User {
            id: UserId::new(),
            company_id: CompanyId::new(),
            email: "new.hire@example.com".into(),
            name: "New Hire".into(),
            role: Role::Employee,
            email_verified: false,
            verify_code: None,
            verify_expires_at: None,
            last_email_sent_at: None,
            created_at: now,
            updated_at: now,
        };
        store.insert_user(&user).await.unwrap();

        let ctx = ServiceContext::new(
            Arc::new(store.clone()),
            clock.clone(),
            Arc::new(UuidV7Generator),
        );
        let service = VerificationService::new(
            ctx,
            sender.clone(),
            VerificationConfig::default(),
            "Ledgerly",
        );
        Fixture {
            store,
            clock,
            sender,
            service,
            user,
        }
    }

    async fn stored_code(f: &Fixture) -> String {
        f.store
            .find_user(f.user.id)
            .await
            .unwrap()
            .unwrap()
            .verify_code
            .unwrap()
    }

    #[test]
    fn test_generated_codes_are_six_digits() {
        for _ in 0..200 {
            let code = generate_code();
            assert_eq!(code.len(), 6);
            let n: u32 = code.parse().unwrap();
            assert!((100_000..=999_999).contains(&n));
        }
    }

    #[tokio::test]
    async fn test_resend_stores_code_and_sends_email() {
        let f = fixture().await;
        f.service.resend("New.Hire@example.com").await.unwrap();

        let code = stored_code(&f).await;
        let sent = f.sender.sent.lock().unwrap().clone();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "new.hire@example.com");
        assert_eq!(sent[0].subject, "Verify your email for Ledgerly");
        assert!(sent[0].body.contains(&code));
        assert!(sent[0].body.contains("15 minutes"));
    }

    #[tokio::test]
    async fn test_resend_cooldown() {
        let f = fixture().await;
        f.service.resend(&f.user.email).await.unwrap();

        f.clock.advance(Duration::seconds(20));
        let err = f.service.resend(&f.user.email).await.unwrap_err();
        assert_eq!(
            err,
            AppError::InvalidState("You can resend in 40 seconds".into())
        );

        f.clock.advance(Duration::seconds(40));
        f.service.resend(&f.user.email).await.unwrap();
        assert_eq!(f.sender.sent.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_verify_accepts_matching_code_once() {
        let f = fixture().await;
        f.service.resend(&f.user.email).await.unwrap();
        let code = stored_code(&f).await;

        f.service.verify(&f.user.email, &code).await.unwrap();

        let user = f.store.find_user(f.user.id).await.unwrap().unwrap();
        assert!(user.email_verified);
        assert!(user.verify_code.is_none());

        let err = f.service.verify(&f.user.email, &code).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        let err = f.service.resend(&f.user.email).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidState(_)));
    }

    #[tokio::test]
    async fn test_verify_rejects_wrong_or_expired_code() {
        let f = fixture().await;
        f.service.resend(&f.user.email).await.unwrap();
        let code = stored_code(&f).await;
        let wrong = if code == "123456" { "654321" } else { "123456" };

        let err = f.service.verify(&f.user.email, wrong).await.unwrap_err();
        assert_eq!(
            err,
            AppError::Validation("Invalid or expired verification code".into())
        );

        f.clock.advance(Duration::minutes(15));
        let err = f.service.verify(&f.user.email, &code).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_unknown_email_is_not_found() {
        let f = fixture().await;
        let err = f.service.resend("nobody@example.com").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        let err = f
            .service
            .verify("nobody@example.com", "123456")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
