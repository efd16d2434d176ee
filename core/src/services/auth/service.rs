//! Main authentication service implementation

use std::sync::Arc;
use uuid::Uuid;

use sv_shared::utils::phone::{is_valid_phone, mask_phone};

use crate::domain::entities::token::TokenPair;
use crate::domain::entities::user::User;
use crate::domain::value_objects::{AuthResponse, ClientMetadata};
use crate::errors::{AuthError, DomainResult};
use crate::repositories::{TokenRepository, UserRepository};
use crate::services::credentials::CredentialVerifier;
use crate::services::otp::OtpLedger;
use crate::services::sms::SmsSender;
use crate::services::token::{TokenCodec, TokenService};

/// What the caller gets back from a code request: TTLs for user-facing
/// messaging. The code itself only travels to the SMS provider.
#[derive(Debug, Clone, Copy)]
pub struct SendCodeReceipt {
    /// Code lifetime in seconds
    pub ttl_secs: i64,

    /// Seconds until the next code may be requested
    pub resend_in_secs: i64,
}

/// Authentication service for the complete login/session flow
pub struct AuthService<U, T, C>
where
    U: UserRepository,
    T: TokenRepository,
    C: TokenCodec,
{
    /// User store
    users: Arc<U>,
    /// Pending one-time codes
    otp_ledger: Arc<OtpLedger>,
    /// Token minting and rotation
    token_service: Arc<TokenService<T, U, C>>,
    /// Admin password checks
    credential_verifier: CredentialVerifier<U>,
    /// Outbound SMS capability
    sms: Arc<dyn SmsSender>,
}

impl<U, T, C> AuthService<U, T, C>
where
    U: UserRepository,
    T: TokenRepository,
    C: TokenCodec,
{
    /// Creates a new authentication service
    pub fn new(
        users: Arc<U>,
        otp_ledger: Arc<OtpLedger>,
        token_service: Arc<TokenService<T, U, C>>,
        credential_verifier: CredentialVerifier<U>,
        sms: Arc<dyn SmsSender>,
    ) -> Self {
        Self {
            users,
            otp_ledger,
            token_service,
            credential_verifier,
            sms,
        }
    }

    /// Request a one-time code for a phone number.
    ///
    /// Issues a code through the ledger (which enforces the resend cooldown)
    /// and hands it to the SMS provider. If delivery fails the fresh entry is
    /// dropped again so the caller is not locked behind a cooldown for a code
    /// that never arrived.
    pub async fn request_code(&self, phone: &str) -> DomainResult<SendCodeReceipt> {
        if !is_valid_phone(phone) {
            return Err(AuthError::InvalidPhoneFormat.into());
        }

        let issued = self.otp_ledger.request_code(phone).await?;

        if let Err(e) = self
            .sms
            .send_code(phone, &issued.code, issued.ttl_secs)
            .await
        {
            tracing::error!(
                phone = %mask_phone(phone),
                error = %e,
                event = "sms_delivery_failed",
                "Failed to deliver verification code"
            );
            self.otp_ledger.invalidate(phone).await;
            return Err(AuthError::SmsDeliveryFailed.into());
        }

        Ok(SendCodeReceipt {
            ttl_secs: issued.ttl_secs,
            resend_in_secs: issued.resend_in_secs,
        })
    }

    /// Verify a submitted code and open a session.
    ///
    /// A successful verify consumes the code, finds or creates the customer
    /// for this phone, and mints a token pair.
    pub async fn verify_code(
        &self,
        phone: &str,
        code: &str,
        name: Option<String>,
        metadata: &ClientMetadata,
    ) -> DomainResult<AuthResponse> {
        if !is_valid_phone(phone) {
            return Err(AuthError::InvalidPhoneFormat.into());
        }

        self.otp_ledger.verify_code(phone, code).await?;

        let user = self.find_or_create_customer(phone, name).await?;
        let tokens = self
            .token_service
            .issue(user.id, user.role, metadata)
            .await?;

        tracing::info!(
            user_id = %user.id,
            event = "customer_logged_in",
            "Customer authenticated via OTP"
        );

        Ok(AuthResponse::new(&user, tokens))
    }

    /// Authenticate an administrator by username/password.
    ///
    /// Carries the advisory default-password flag through to the response.
    pub async fn admin_login(
        &self,
        username: &str,
        password: &str,
        metadata: &ClientMetadata,
    ) -> DomainResult<AuthResponse> {
        let verified = self.credential_verifier.verify(username, password).await?;

        let mut user = verified.user;
        user.touch_login();
        let user = self.users.update(user).await?;

        let tokens = self
            .token_service
            .issue(user.id, user.role, metadata)
            .await?;

        tracing::info!(
            user_id = %user.id,
            event = "admin_logged_in",
            "Administrator authenticated"
        );

        Ok(AuthResponse::new(&user, tokens)
            .with_password_advisory(verified.must_change_password))
    }

    /// Exchange a refresh token for a new pair. See
    /// [`TokenService::rotate`] for the single-use and retry semantics.
    pub async fn refresh_session(
        &self,
        refresh_token: &str,
        metadata: &ClientMetadata,
    ) -> DomainResult<TokenPair> {
        self.token_service.rotate(refresh_token, metadata).await
    }

    /// Log out of one session by revoking its refresh token. Idempotent.
    pub async fn logout(&self, refresh_token: &str) -> DomainResult<()> {
        self.token_service.revoke_by_token(refresh_token).await
    }

    /// Log out everywhere: revoke every outstanding refresh token for a user
    pub async fn logout_all(&self, user_id: Uuid) -> DomainResult<usize> {
        self.token_service.revoke_all(user_id).await
    }

    async fn find_or_create_customer(
        &self,
        phone: &str,
        name: Option<String>,
    ) -> DomainResult<User> {
        match self.users.find_by_phone(phone).await? {
            Some(mut user) => {
                if let Some(name) = name {
                    user.set_name(name);
                }
                user.touch_login();
                self.users.update(user).await
            }
            None => {
                let mut user = User::new_customer(phone.to_string(), name);
                user.touch_login();
                let user = self.users.create(user).await?;
                tracing::info!(
                    user_id = %user.id,
                    event = "customer_registered",
                    "Created customer on first OTP login"
                );
                Ok(user)
            }
        }
    }
}
