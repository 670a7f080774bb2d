//! services/client/src/cli/learning.rs
//!
//! The questionnaire, dashboard and chapter tools.

use super::{print_json, Context};
use crate::error::AppError;
use clap::Args;
use coursebook_core::domain::find_language;
use coursebook_core::forms::{
    EducationLevel, HardwareExperience, RoboticsExperience, SkillLevel, SoftwareExperience,
};
use coursebook_core::navigation::{dashboard_redirect, questionnaire_redirect, Route};
use coursebook_core::{
    Outcome, PersonalizedDashboard, PortResult, QuestionnaireSubmission, SUPPORTED_LANGUAGES,
};
use serde_json::Value;
use std::io::Write;

//=========================================================================================
// Questionnaire
//=========================================================================================

#[derive(Args, Debug)]
pub struct QuestionnaireArgs {
    #[arg(long, default_value = "beginner")]
    pub software_experience: SoftwareExperience,

    /// Leading digits are used; anything else counts as not given
    #[arg(long)]
    pub years_coding: Option<String>,

    #[arg(long, default_value = "none")]
    pub hardware_experience: HardwareExperience,

    #[arg(long, default_value = "none")]
    pub robotics_experience: RoboticsExperience,

    /// A programming language you know; repeat for several
    #[arg(long = "language", value_name = "LANGUAGE")]
    pub programming_languages: Vec<String>,

    #[arg(long)]
    pub preferred_language: Option<String>,

    /// A learning goal; repeat for several
    #[arg(long = "goal", value_name = "GOAL")]
    pub learning_goals: Vec<String>,

    #[arg(long)]
    pub primary_interest: Option<String>,

    #[arg(long, default_value = "student")]
    pub skill_level: SkillLevel,

    #[arg(long)]
    pub education_level: Option<EducationLevel>,

    #[arg(long)]
    pub industry: Option<String>,

    #[arg(long)]
    pub project_goals: Option<String>,

    #[arg(long)]
    pub time_commitment: Option<String>,
}

impl QuestionnaireArgs {
    /// Fills the form buffer the way a user ticking boxes would.
    pub fn into_submission(self) -> PortResult<QuestionnaireSubmission> {
        let mut submission = QuestionnaireSubmission {
            software_experience: self.software_experience,
            hardware_experience: self.hardware_experience,
            robotics_experience: self.robotics_experience,
            preferred_language: self.preferred_language.unwrap_or_default(),
            primary_interest: self.primary_interest.unwrap_or_default(),
            skill_level: self.skill_level,
            education_level: self.education_level,
            industry: self.industry,
            project_goals: self.project_goals,
            time_commitment: self.time_commitment,
            ..QuestionnaireSubmission::default()
        };
        if let Some(raw) = &self.years_coding {
            submission.set_years_coding(raw);
        }
        for language in unique(&self.programming_languages) {
            submission.toggle_programming_language(language)?;
        }
        for goal in unique(&self.learning_goals) {
            submission.toggle_learning_goal(goal)?;
        }
        Ok(submission)
    }
}

/// Drops repeats so each box is ticked once.
fn unique(values: &[String]) -> Vec<&str> {
    let mut seen: Vec<&str> = Vec::new();
    for value in values {
        if !seen.iter().any(|s| s.trim().eq_ignore_ascii_case(value.trim())) {
            seen.push(value);
        }
    }
    seen
}

pub async fn questionnaire(
    ctx: &Context,
    args: QuestionnaireArgs,
    out: &mut impl Write,
) -> Result<(), AppError> {
    if let Some(route) = questionnaire_redirect(ctx.session.user().as_ref()) {
        writeln!(out, "You have already completed the background questionnaire.")?;
        writeln!(out, "Next: {}", route)?;
        return Ok(());
    }

    let submission = args.into_submission()?;
    submission.validate()?;
    match ctx.session.submit_questionnaire(&submission).await {
        Outcome::Success(()) => {
            writeln!(out, "Thanks! Your learning experience is now personalized.")?;
            writeln!(out, "Next: {}", Route::Dashboard)?;
            Ok(())
        }
        Outcome::Failure(message) => Err(AppError::Rejected(message)),
    }
}

//=========================================================================================
// Dashboard
//=========================================================================================

pub async fn dashboard(ctx: &Context, out: &mut impl Write) -> Result<(), AppError> {
    if let Some(route) = dashboard_redirect(ctx.session.user().as_ref()) {
        let reason = match route {
            Route::Signin => "Please sign in to see your dashboard.",
            _ => "Please complete the background questionnaire first.",
        };
        writeln!(out, "{}", reason)?;
        writeln!(out, "Next: {}", route)?;
        return Ok(());
    }

    let dashboard = ctx.session.get_dashboard().await?;
    if print_json(ctx, &dashboard, out)? {
        return Ok(());
    }
    render_dashboard(&dashboard, out)
}

pub(crate) fn render_dashboard(
    dashboard: &PersonalizedDashboard,
    out: &mut impl Write,
) -> Result<(), AppError> {
    writeln!(out, "{}", dashboard.welcome_message)?;
    if !dashboard.skill_level_badge.is_empty() {
        writeln!(out, "Level: {}", dashboard.skill_level_badge)?;
    }

    if !dashboard.learning_path.is_empty() {
        writeln!(out, "\nYour learning path:")?;
        for (i, step) in dashboard.learning_path.iter().enumerate() {
            writeln!(out, "  {}. {}", i + 1, step)?;
        }
    }
    if !dashboard.recommended_chapters.is_empty() {
        writeln!(out, "\nRecommended chapters:")?;
        for chapter in &dashboard.recommended_chapters {
            writeln!(out, "  - {}", item_label(chapter))?;
        }
    }
    if !dashboard.quick_tips.is_empty() {
        writeln!(out, "\nQuick tips:")?;
        for tip in &dashboard.quick_tips {
            writeln!(out, "  - {}", tip)?;
        }
    }
    if !dashboard.suggested_exercises.is_empty() {
        writeln!(out, "\nSuggested exercises:")?;
        for exercise in &dashboard.suggested_exercises {
            writeln!(out, "  - {}", item_label(exercise))?;
        }
    }
    Ok(())
}

fn item_label(item: &Value) -> String {
    match item {
        Value::String(text) => text.clone(),
        _ => item
            .get("title")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| item.to_string()),
    }
}

//=========================================================================================
// Chapter Tools
//=========================================================================================

pub async fn personalize(
    ctx: &Context,
    chapter_id: &str,
    out: &mut impl Write,
) -> Result<(), AppError> {
    let chapter = ctx.session.personalize_chapter(chapter_id).await?;
    if print_json(ctx, &chapter, out)? {
        return Ok(());
    }
    writeln!(out, "{}", chapter.personalized_content)?;
    writeln!(
        out,
        "\n(personalized {} chars -> {} chars)",
        chapter.original_length, chapter.personalized_length
    )?;
    Ok(())
}

pub async fn translate(
    ctx: &Context,
    chapter_id: &str,
    language: &str,
    out: &mut impl Write,
) -> Result<(), AppError> {
    let chapter = ctx.session.translate_chapter(chapter_id, language).await?;
    if print_json(ctx, &chapter, out)? {
        return Ok(());
    }
    let target = find_language(&chapter.target_language)
        .map(|lang| format!("{} ({})", lang.name, lang.native))
        .unwrap_or_else(|| chapter.target_language.clone());
    writeln!(out, "Translated to {}:\n", target)?;
    writeln!(out, "{}", chapter.translated_content)?;
    Ok(())
}

pub fn languages(out: &mut impl Write) -> Result<(), AppError> {
    for lang in SUPPORTED_LANGUAGES.iter() {
        writeln!(out, "  {:<8} {} ({})", lang.code, lang.name, lang.native)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Command};
    use clap::Parser;
    use serde_json::json;

    fn questionnaire_args(extra: &[&str]) -> Result<QuestionnaireArgs, clap::Error> {
        let argv = ["coursebook", "questionnaire"].iter().chain(extra.iter()).copied();
        match Cli::try_parse_from(argv)?.command {
            Command::Questionnaire(args) => Ok(args),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn flags_fill_the_form_buffer() {
        let args = questionnaire_args(&[
            "--language", "python",
            "--language", "Rust",
            "--language", "PYTHON",
            "--goal", "hobby projects",
            "--preferred-language", "English",
            "--primary-interest", "humanoids",
            "--education-level", "bachelors",
            "--years-coding", "5 years",
        ])
        .unwrap();
        let submission = args.into_submission().unwrap();

        assert_eq!(submission.programming_languages, vec!["Python", "Rust"]);
        assert_eq!(submission.learning_goals, vec!["Hobby projects"]);
        assert_eq!(submission.years_coding, Some(5));
        assert_eq!(submission.hardware_experience, HardwareExperience::NoExperience);
        assert_eq!(submission.skill_level, SkillLevel::Student);
        assert_eq!(submission.education_level, Some(EducationLevel::Bachelors));
        assert!(submission.validate().is_ok());
    }

    #[test]
    fn unknown_choices_are_refused() {
        assert!(questionnaire_args(&["--skill-level", "wizard"]).is_err());

        let args = questionnaire_args(&["--language", "Cobol"]).unwrap();
        assert!(args.into_submission().is_err());
    }

    #[test]
    fn missing_fields_fail_validation() {
        let submission = questionnaire_args(&[]).unwrap().into_submission().unwrap();
        assert_eq!(
            submission.validate().unwrap_err().to_string(),
            "Please enter your preferred language"
        );
    }

    #[test]
    fn dashboard_renders_titles_and_plain_items() {
        let dashboard = PersonalizedDashboard {
            welcome_message: "Welcome back, Ada!".to_string(),
            skill_level_badge: "Intermediate".to_string(),
            learning_path: vec!["ROS basics".to_string(), "Kinematics".to_string()],
            recommended_chapters: vec![json!({"id": "ch-02", "title": "Sensors"}), json!("Actuators")],
            ..PersonalizedDashboard::default()
        };
        let mut out = Vec::new();
        render_dashboard(&dashboard, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.starts_with("Welcome back, Ada!\nLevel: Intermediate"));
        assert!(text.contains("  2. Kinematics"));
        assert!(text.contains("  - Sensors"));
        assert!(text.contains("  - Actuators"));
        assert!(!text.contains("Quick tips"));
    }

    #[test]
    fn languages_lists_every_supported_language() {
        let mut out = Vec::new();
        languages(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().count(), SUPPORTED_LANGUAGES.len());
        assert!(text.contains("urdu"));
        assert!(text.contains("Chinese"));
    }
}
