//! crates/coursebook_core/src/forms.rs
//!
//! Request payloads for the auth and questionnaire flows, together with the
//! client-side checks a form runs before anything is sent to the backend.

use crate::ports::{PortError, PortResult};
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

const EMAIL_PATTERN: &str = r"^[^\s@]+@[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?)*$";
const MIN_PASSWORD_CHARS: usize = 8;

pub const PROGRAMMING_LANGUAGE_OPTIONS: [&str; 14] = [
    "Python", "C++", "C", "JavaScript", "TypeScript", "Java", "Rust", "Go", "MATLAB", "R",
    "Swift", "Kotlin", "Assembly", "Other",
];

pub const LEARNING_GOAL_OPTIONS: [&str; 10] = [
    "Build robots from scratch",
    "AI and machine learning for robotics",
    "Computer vision and perception",
    "Motion planning and control",
    "ROS (Robot Operating System)",
    "Embedded systems programming",
    "Hardware design and electronics",
    "Research and academia",
    "Career transition to robotics",
    "Hobby projects",
];

//=========================================================================================
// Auth Forms
//=========================================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    pub full_name: String,
}

impl SignupRequest {
    pub fn validate(&self) -> PortResult<()> {
        require(&self.full_name, "Please enter your full name")?;
        require(&self.email, "Please enter your email")?;
        check_email(&self.email)?;
        require(&self.password, "Please enter a password")?;
        if self.password.chars().count() < MIN_PASSWORD_CHARS {
            return Err(PortError::Validation(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_CHARS
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SigninRequest {
    pub email: String,
    pub password: String,
}

impl SigninRequest {
    pub fn validate(&self) -> PortResult<()> {
        require(&self.email, "Please enter your email")?;
        check_email(&self.email)?;
        require(&self.password, "Please enter your password")
    }
}

fn require(value: &str, message: &str) -> PortResult<()> {
    if value.trim().is_empty() {
        return Err(PortError::Validation(message.to_string()));
    }
    Ok(())
}

fn check_email(email: &str) -> PortResult<()> {
    let pattern = Regex::new(EMAIL_PATTERN).map_err(|e| PortError::Validation(e.to_string()))?;
    if !pattern.is_match(email.trim()) {
        return Err(PortError::Validation(format!(
            "'{}' is not a valid email address",
            email.trim()
        )));
    }
    Ok(())
}

//=========================================================================================
// Questionnaire Choices
//=========================================================================================

/// Declares a closed set of form choices that travel over the wire as fixed strings.
macro_rules! choice_enum {
    ($(#[$meta:meta])* $name:ident, $label:literal { $($variant:ident => $wire:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $wire),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = PortError;

            fn from_str(raw: &str) -> Result<Self, Self::Err> {
                let raw = raw.trim();
                $name::ALL
                    .iter()
                    .copied()
                    .find(|choice| choice.as_str().eq_ignore_ascii_case(raw))
                    .ok_or_else(|| {
                        let allowed: Vec<&str> = $name::ALL.iter().map(|c| c.as_str()).collect();
                        PortError::Validation(format!(
                            "'{}' is not a valid {} (expected one of: {})",
                            raw,
                            $label,
                            allowed.join(", ")
                        ))
                    })
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = String::deserialize(deserializer)?;
                raw.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

choice_enum!(SoftwareExperience, "software experience" {
    Beginner => "beginner",
    Intermediate => "intermediate",
    Advanced => "advanced",
    Expert => "expert",
});

choice_enum!(HardwareExperience, "hardware experience" {
    NoExperience => "none",
    Hobby => "hobby",
    Professional => "professional",
    Expert => "expert",
});

choice_enum!(RoboticsExperience, "robotics experience" {
    NoExperience => "none",
    Beginner => "beginner",
    Intermediate => "intermediate",
    Advanced => "advanced",
});

choice_enum!(SkillLevel, "skill level" {
    Student => "student",
    Professional => "professional",
    Researcher => "researcher",
    Hobbyist => "hobbyist",
});

choice_enum!(EducationLevel, "education level" {
    HighSchool => "high_school",
    Bachelors => "bachelors",
    Masters => "masters",
    Phd => "phd",
    Other => "other",
});

//=========================================================================================
// Questionnaire Form
//=========================================================================================

/// The background questionnaire, doubling as the form buffer the surface edits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionnaireSubmission {
    pub software_experience: SoftwareExperience,
    pub years_coding: Option<u32>,
    pub hardware_experience: HardwareExperience,
    pub robotics_experience: RoboticsExperience,
    pub programming_languages: Vec<String>,
    pub preferred_language: String,
    pub learning_goals: Vec<String>,
    pub primary_interest: String,
    pub skill_level: SkillLevel,
    pub education_level: Option<EducationLevel>,
    pub industry: Option<String>,
    pub project_goals: Option<String>,
    pub time_commitment: Option<String>,
}

impl Default for QuestionnaireSubmission {
    fn default() -> Self {
        Self {
            software_experience: SoftwareExperience::Beginner,
            years_coding: None,
            hardware_experience: HardwareExperience::NoExperience,
            robotics_experience: RoboticsExperience::NoExperience,
            programming_languages: Vec::new(),
            preferred_language: String::new(),
            learning_goals: Vec::new(),
            primary_interest: String::new(),
            skill_level: SkillLevel::Student,
            education_level: None,
            industry: None,
            project_goals: None,
            time_commitment: None,
        }
    }
}

impl QuestionnaireSubmission {
    /// Checks or unchecks a programming language box.
    pub fn toggle_programming_language(&mut self, language: &str) -> PortResult<()> {
        let option = canonical_option(&PROGRAMMING_LANGUAGE_OPTIONS, language, "programming language")?;
        toggle(&mut self.programming_languages, option);
        Ok(())
    }

    /// Checks or unchecks a learning goal box.
    pub fn toggle_learning_goal(&mut self, goal: &str) -> PortResult<()> {
        let option = canonical_option(&LEARNING_GOAL_OPTIONS, goal, "learning goal")?;
        toggle(&mut self.learning_goals, option);
        Ok(())
    }

    /// Takes the raw text of the years-of-coding field.
    pub fn set_years_coding(&mut self, raw: &str) {
        self.years_coding = parse_years_coding(raw);
    }

    pub fn validate(&self) -> PortResult<()> {
        require(&self.preferred_language, "Please enter your preferred language")?;
        require(&self.primary_interest, "Please enter your primary interest")?;
        if self.education_level.is_none() {
            return Err(PortError::Validation(
                "Please select your education level".to_string(),
            ));
        }
        if self.programming_languages.is_empty() {
            return Err(PortError::Validation(
                "Please select at least one programming language".to_string(),
            ));
        }
        if self.learning_goals.is_empty() {
            return Err(PortError::Validation(
                "Please select at least one learning goal".to_string(),
            ));
        }
        Ok(())
    }
}

/// Reads leading digits the way a number field does; anything else is "not given".
pub fn parse_years_coding(raw: &str) -> Option<u32> {
    let digits: String = raw.trim().chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}

fn canonical_option(
    options: &[&'static str],
    value: &str,
    label: &str,
) -> PortResult<&'static str> {
    options
        .iter()
        .copied()
        .find(|option| option.eq_ignore_ascii_case(value.trim()))
        .ok_or_else(|| PortError::Validation(format!("Unknown {}: '{}'", label, value.trim())))
}

fn toggle(values: &mut Vec<String>, option: &str) {
    if let Some(pos) = values.iter().position(|v| v == option) {
        values.remove(pos);
    } else {
        values.push(option.to_string());
    }
}
