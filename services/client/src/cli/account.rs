//! services/client/src/cli/account.rs
//!
//! Signup, signin, signout and the navbar's "who am I" line.

use super::Context;
use crate::error::AppError;
use coursebook_core::navigation::{route_after_auth, ROUTE_AFTER_SIGNOUT};
use coursebook_core::{Outcome, Session, SigninRequest, SignupRequest, User};
use dialoguer::theme::ColorfulTheme;
use dialoguer::Password;
use std::io::Write;

/// Uses the flag if given, otherwise asks on the terminal without echoing.
pub async fn resolve_password(flag: Option<String>) -> Result<String, AppError> {
    if let Some(password) = flag {
        return Ok(password);
    }
    let password = tokio::task::spawn_blocking(|| {
        Password::with_theme(&ColorfulTheme::default())
            .with_prompt("Password")
            .interact()
    })
    .await??;
    Ok(password)
}

pub async fn signup(
    ctx: &Context,
    email: String,
    full_name: String,
    password: String,
    out: &mut impl Write,
) -> Result<(), AppError> {
    let request = SignupRequest {
        email,
        password,
        full_name,
    };
    request.validate()?;
    let outcome = ctx.session.signup(&request).await;
    report_authentication(outcome, "Account created", out)
}

pub async fn signin(
    ctx: &Context,
    email: String,
    password: String,
    out: &mut impl Write,
) -> Result<(), AppError> {
    let request = SigninRequest { email, password };
    request.validate()?;
    let outcome = ctx.session.signin(&request).await;
    report_authentication(outcome, "Signed in", out)
}

fn report_authentication(
    outcome: Outcome<User>,
    headline: &str,
    out: &mut impl Write,
) -> Result<(), AppError> {
    match outcome {
        Outcome::Success(user) => {
            writeln!(out, "{}. Welcome, {}!", headline, user.display_name())?;
            writeln!(out, "Next: {}", route_after_auth(&user))?;
            Ok(())
        }
        Outcome::Failure(message) => Err(AppError::Rejected(message)),
    }
}

pub fn signout(ctx: &Context, out: &mut impl Write) -> Result<(), AppError> {
    ctx.session.signout();
    writeln!(out, "Signed out.")?;
    writeln!(out, "Next: {}", ROUTE_AFTER_SIGNOUT)?;
    Ok(())
}

pub fn whoami(ctx: &Context, out: &mut impl Write) -> Result<(), AppError> {
    render_identity(&ctx.session.snapshot(), out)
}

pub(crate) fn render_identity(session: &Session, out: &mut impl Write) -> Result<(), AppError> {
    match (&session.user, session.is_authenticated()) {
        (Some(user), true) => {
            writeln!(out, "Signed in as {} <{}>", user.display_name(), user.email)?;
            let questionnaire = if user.has_completed_questionnaire {
                "completed"
            } else {
                "pending"
            };
            writeln!(out, "Background questionnaire: {}", questionnaire)?;
        }
        _ => {
            writeln!(out, "Not signed in.")?;
            if let Some(error) = &session.last_error {
                writeln!(out, "The stored session was cleared: {}", error)?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use coursebook_core::{SessionStatus, Token};

    fn ada(completed: bool) -> User {
        User {
            id: 1,
            email: "ada@example.com".to_string(),
            full_name: Some("Ada Lovelace".to_string()),
            username: None,
            has_completed_questionnaire: completed,
            profile: serde_json::Map::new(),
        }
    }

    fn rendered(session: &Session) -> String {
        let mut out = Vec::new();
        render_identity(session, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[tokio::test]
    async fn a_password_flag_skips_the_prompt() {
        let password = resolve_password(Some("longenough".to_string())).await.unwrap();
        assert_eq!(password, "longenough");
    }

    #[test]
    fn signed_in_identity_shows_name_and_questionnaire_state() {
        let session = Session {
            user: Some(ada(false)),
            token: Some(Token::new("tok")),
            status: SessionStatus::Authenticated,
            last_error: None,
        };
        let text = rendered(&session);
        assert!(text.contains("Signed in as Ada Lovelace <ada@example.com>"));
        assert!(text.contains("questionnaire: pending"));
    }

    #[test]
    fn signed_out_identity_mentions_a_cleared_session() {
        let session = Session {
            user: None,
            token: None,
            status: SessionStatus::Unauthenticated,
            last_error: Some("Could not validate credentials".to_string()),
        };
        let text = rendered(&session);
        assert!(text.starts_with("Not signed in."));
        assert!(text.contains("Could not validate credentials"));
    }

    #[test]
    fn failed_authentication_becomes_a_rejection() {
        let mut out = Vec::new();
        let err = report_authentication(
            Outcome::Failure("Email already registered".to_string()),
            "Account created",
            &mut out,
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "Email already registered");
        assert!(out.is_empty());
    }

    #[test]
    fn successful_authentication_names_the_next_route() {
        let mut out = Vec::new();
        report_authentication(Outcome::Success(ada(true)), "Signed in", &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Signed in. Welcome, Ada Lovelace!"));
        assert!(text.contains("Next: /dashboard"));
    }
}
