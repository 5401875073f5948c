use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque session identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(String);

impl SessionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Per-principal password security settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordSecurity {
    /// Whether the principal has opted into OTP.
    pub otp_enabled: bool,
}

/// Per-principal profile holding the OTP secret.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub otp_secret: Option<String>,
}

/// An actor that can authenticate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub id: Uuid,
    pub password_security: Option<PasswordSecurity>,
    pub profile: Option<Profile>,
}

impl Principal {
    /// A principal with no security settings and no profile.
    pub fn new(id: Uuid) -> Self {
        Self {
            id,
            password_security: None,
            profile: None,
        }
    }

    pub fn with_password_security(mut self, otp_enabled: bool) -> Self {
        self.password_security = Some(PasswordSecurity { otp_enabled });
        self
    }

    pub fn with_otp_secret(mut self, secret: impl Into<String>) -> Self {
        self.profile = Some(Profile {
            otp_secret: Some(secret.into()),
        });
        self
    }

    pub fn with_profile(mut self, profile: Profile) -> Self {
        self.profile = Some(profile);
        self
    }
}

/// Request-scoped authentication state, passed explicitly to every
/// operation that depends on who is asking.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthContext {
    principal: Option<Principal>,
    session_id: Option<SessionId>,
}

impl AuthContext {
    /// A context with nobody logged in (system jobs, public requests).
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn authenticated(principal: Principal) -> Self {
        Self {
            principal: Some(principal),
            session_id: None,
        }
    }

    pub fn with_session(mut self, session_id: SessionId) -> Self {
        self.session_id = Some(session_id);
        self
    }

    pub fn current_principal(&self) -> Option<&Principal> {
        self.principal.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.principal.is_some()
    }

    pub fn principal_id(&self) -> Option<Uuid> {
        self.principal.as_ref().map(|p| p.id)
    }

    pub fn session_id(&self) -> Option<&SessionId> {
        self.session_id.as_ref()
    }
}
