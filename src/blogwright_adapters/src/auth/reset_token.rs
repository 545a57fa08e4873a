use blogwright_core::{
    Clock, IssuedResetToken, ResetTokenError, ResetTokenService, UserId, VerifiedResetToken,
};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
struct ResetClaims {
    sub: UserId,
    jti: String,
    iat: i64,
    exp: i64,
}

/// HS256 reset tokens. Expiry is checked against the injected clock rather
/// than the wall clock jsonwebtoken would use.
pub struct JwtResetTokenService<C> {
    secret: Secret<String>,
    clock: C,
    default_ttl: Duration,
}

impl<C: Clock> JwtResetTokenService<C> {
    pub fn new(secret: Secret<String>, clock: C, default_ttl: Duration) -> Self {
        Self {
            secret,
            clock,
            default_ttl,
        }
    }

    fn validation() -> Validation {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation
    }
}

impl<C: Clock> ResetTokenService for JwtResetTokenService<C> {
    fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    #[tracing::instrument(name = "Issuing reset token", skip(self))]
    fn issue(&self, user_id: UserId, ttl: Duration) -> Result<IssuedResetToken, ResetTokenError> {
        let iat = self.clock.now().timestamp();
        let exp = iat
            .checked_add(ttl.num_seconds())
            .ok_or_else(|| ResetTokenError::UnexpectedError("Duration out of range".to_string()))?;
        let expires_at = DateTime::<Utc>::from_timestamp(exp, 0).ok_or_else(|| {
            ResetTokenError::UnexpectedError("Expiry out of range".to_string())
        })?;

        let claims = ResetClaims {
            sub: user_id,
            jti: uuid::Uuid::new_v4().to_string(),
            iat,
            exp,
        };

        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.secret.expose_secret().as_bytes()),
        )
        .map_err(|e| ResetTokenError::UnexpectedError(e.to_string()))?;

        Ok(IssuedResetToken {
            token,
            token_id: claims.jti,
            expires_at,
        })
    }

    #[tracing::instrument(name = "Verifying reset token", skip_all)]
    fn verify(&self, token: &str) -> Result<VerifiedResetToken, ResetTokenError> {
        let claims = decode::<ResetClaims>(
            token,
            &DecodingKey::from_secret(self.secret.expose_secret().as_bytes()),
            &Self::validation(),
        )
        .map(|data| data.claims)
        .map_err(|_| ResetTokenError::Invalid)?;

        if self.clock.now().timestamp() >= claims.exp {
            return Err(ResetTokenError::Expired);
        }

        let expires_at =
            DateTime::<Utc>::from_timestamp(claims.exp, 0).ok_or(ResetTokenError::Invalid)?;

        Ok(VerifiedResetToken {
            user_id: claims.sub,
            token_id: claims.jti,
            expires_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use blogwright_core::{DEFAULT_RESET_TOKEN_TTL_SECONDS, ManualClock};
    use quickcheck::TestResult;
    use quickcheck_macros::quickcheck;

    use super::*;

    fn service(clock: ManualClock) -> JwtResetTokenService<ManualClock> {
        JwtResetTokenService::new(
            Secret::from("reset-secret".to_owned()),
            clock,
            Duration::seconds(DEFAULT_RESET_TOKEN_TTL_SECONDS),
        )
    }

    #[test]
    fn test_issued_token_resolves_to_user() {
        let clock = ManualClock::default();
        let service = service(clock);

        let issued = service.issue(UserId(42), service.default_ttl()).unwrap();
        let verified = service.verify(&issued.token).unwrap();

        assert_eq!(verified.user_id, UserId(42));
        assert_eq!(verified.token_id, issued.token_id);
        assert_eq!(verified.expires_at, issued.expires_at);
    }

    #[test]
    fn test_token_expires_once_ttl_has_passed() {
        let clock = ManualClock::default();
        let service = service(clock.clone());
        let issued = service.issue(UserId(1), Duration::seconds(1800)).unwrap();

        clock.advance(Duration::seconds(1799));
        assert!(service.verify(&issued.token).is_ok());

        clock.advance(Duration::seconds(1));
        assert_eq!(
            service.verify(&issued.token).unwrap_err(),
            ResetTokenError::Expired
        );
    }

    #[test]
    fn test_token_signed_with_other_secret_is_invalid() {
        let clock = ManualClock::default();
        let issuer = JwtResetTokenService::new(
            Secret::from("old-secret".to_owned()),
            clock.clone(),
            Duration::seconds(1800),
        );
        let issued = issuer.issue(UserId(1), Duration::seconds(1800)).unwrap();

        assert_eq!(
            service(clock).verify(&issued.token).unwrap_err(),
            ResetTokenError::Invalid
        );
    }

    #[test]
    fn test_garbage_is_invalid() {
        let service = service(ManualClock::default());
        assert_eq!(service.verify("").unwrap_err(), ResetTokenError::Invalid);
        assert_eq!(
            service.verify("not.a.token").unwrap_err(),
            ResetTokenError::Invalid
        );
    }

    #[test]
    fn test_each_token_has_its_own_id() {
        let service = service(ManualClock::default());
        let first = service.issue(UserId(1), Duration::seconds(60)).unwrap();
        let second = service.issue(UserId(1), Duration::seconds(60)).unwrap();
        assert_ne!(first.token_id, second.token_id);
    }

    #[quickcheck]
    fn prop_verify_returns_issued_user(id: i64, ttl: u16) -> TestResult {
        if ttl == 0 {
            return TestResult::discard();
        }
        let service = service(ManualClock::default());
        let issued = service
            .issue(UserId(id), Duration::seconds(i64::from(ttl)))
            .unwrap();
        TestResult::from_bool(service.verify(&issued.token).map(|v| v.user_id) == Ok(UserId(id)))
    }

    #[quickcheck]
    fn prop_clock_past_ttl_expires_token(ttl: u16, skew: u16) -> bool {
        let ttl = i64::from(ttl) + 1;
        let clock = ManualClock::default();
        let service = service(clock.clone());
        let issued = service.issue(UserId(3), Duration::seconds(ttl)).unwrap();

        clock.advance(Duration::seconds(ttl + i64::from(skew)));
        service.verify(&issued.token) == Err(ResetTokenError::Expired)
    }

    // Bit 7 is left alone so the token stays valid UTF-8.
    #[quickcheck]
    fn prop_single_bit_mutation_is_invalid(position: usize, bit: u8) -> bool {
        let service = service(ManualClock::default());
        let issued = service.issue(UserId(9), Duration::seconds(1800)).unwrap();

        let mut bytes = issued.token.into_bytes();
        let index = position % bytes.len();
        bytes[index] ^= 1 << (bit % 7);
        let tampered = String::from_utf8(bytes).unwrap();

        service.verify(&tampered) == Err(ResetTokenError::Invalid)
    }
}
