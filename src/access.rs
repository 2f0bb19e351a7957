use serde::Serialize;

/// Identity handed over by the sign-in provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Session {
    pub name: Option<String>,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessDecision {
    SignInRequired,
    Restricted(Session),
    Granted(Session),
}

impl AccessDecision {
    pub fn is_granted(&self) -> bool {
        matches!(self, AccessDecision::Granted(_))
    }
}

/// Domains compare case-insensitively; a blank email is never allowed.
pub fn evaluate(session: Option<Session>, allowed_suffix: &str) -> AccessDecision {
    let Some(session) = session else {
        return AccessDecision::SignInRequired;
    };
    let email = session.email.trim().to_lowercase();
    let suffix = allowed_suffix.trim().to_lowercase();
    if !email.is_empty() && !suffix.is_empty() && email.ends_with(&suffix) {
        AccessDecision::Granted(session)
    } else {
        AccessDecision::Restricted(session)
    }
}
