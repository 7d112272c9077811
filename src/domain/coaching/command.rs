//! Command grammar carried in action names and button data.
//!
//! | data                       | meaning                              |
//! |----------------------------|--------------------------------------|
//! | `action:<name>`            | menu action, see [`ActionCommand`]   |
//! | `diag:<question>:<option>` | diagnostic answer                    |
//! | `case:next`                | serve the next training case         |
//! | `case:retry`               | serve the current case again         |
//! | `remind:later`             | schedule a reminder                  |
//! | `resume:yes`               | continue after a reminder            |
//! | `training:restart`         | start the case list over             |

use std::fmt;

const ACTION_PREFIX: &str = "action:";

/// A menu action, named by an action event or an `action:` button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionCommand {
    Start,
    SphereMenu,
    SphereCustom,
    Sphere(String),
    DiagnosticStart,
    TrainingStart,
    Progress,
    Reminders,
    Skill(String),
    TableOfContents,
    Unknown(String),
}

impl ActionCommand {
    /// Parses an action name. A leading `action:` is tolerated.
    pub fn parse(raw: &str) -> Self {
        let name = raw.trim();
        let name = name.strip_prefix(ACTION_PREFIX).unwrap_or(name);

        match name {
            "start" | "menu:start" => Self::Start,
            "sphere:custom" => Self::SphereCustom,
            "diagnostic:start" => Self::DiagnosticStart,
            "training:start" => Self::TrainingStart,
            "menu:progress" => Self::Progress,
            "menu:reminders" => Self::Reminders,
            "menu:toc" => Self::TableOfContents,
            _ if name.starts_with("sphere:menu") => Self::SphereMenu,
            _ => {
                if let Some(code) = name.strip_prefix("sphere:").filter(|c| !c.is_empty()) {
                    Self::Sphere(code.to_string())
                } else if let Some(code) = name.strip_prefix("skill:").filter(|c| !c.is_empty()) {
                    Self::Skill(code.to_string())
                } else {
                    Self::Unknown(name.to_string())
                }
            }
        }
    }

    /// The bare action name, without the `action:` prefix.
    pub fn name(&self) -> String {
        match self {
            Self::Start => "start".to_string(),
            Self::SphereMenu => "sphere:menu".to_string(),
            Self::SphereCustom => "sphere:custom".to_string(),
            Self::Sphere(code) => format!("sphere:{code}"),
            Self::DiagnosticStart => "diagnostic:start".to_string(),
            Self::TrainingStart => "training:start".to_string(),
            Self::Progress => "menu:progress".to_string(),
            Self::Reminders => "menu:reminders".to_string(),
            Self::Skill(code) => format!("skill:{code}"),
            Self::TableOfContents => "menu:toc".to_string(),
            Self::Unknown(name) => name.clone(),
        }
    }
}

impl fmt::Display for ActionCommand {
    /// Renders as button data: `action:<name>`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{ACTION_PREFIX}{}", self.name())
    }
}

/// A signal carried in callback (button) data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackCommand {
    Diagnostic { question: usize, option: usize },
    CaseNext,
    CaseRetry,
    ResumeYes,
    RemindLater,
    TrainingRestart,
    Action(ActionCommand),
    Unknown(String),
}

impl CallbackCommand {
    pub fn parse(raw: &str) -> Self {
        let data = raw.trim();

        if let Some(rest) = data.strip_prefix("diag:") {
            return Self::parse_diagnostic(rest).unwrap_or_else(|| Self::Unknown(data.to_string()));
        }
        if data.starts_with(ACTION_PREFIX) {
            return Self::Action(ActionCommand::parse(data));
        }
        if data == "resume:yes" {
            return Self::ResumeYes;
        }
        if data.starts_with("case:next") {
            Self::CaseNext
        } else if data.starts_with("case:retry") {
            Self::CaseRetry
        } else if data.starts_with("remind:later") {
            Self::RemindLater
        } else if data.starts_with("training:restart") {
            Self::TrainingRestart
        } else {
            Self::Unknown(data.to_string())
        }
    }

    fn parse_diagnostic(rest: &str) -> Option<Self> {
        let (question, option) = rest.split_once(':')?;
        Some(Self::Diagnostic {
            question: question.parse().ok()?,
            option: option.parse().ok()?,
        })
    }
}

impl fmt::Display for CallbackCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Diagnostic { question, option } => write!(f, "diag:{question}:{option}"),
            Self::CaseNext => f.write_str("case:next"),
            Self::CaseRetry => f.write_str("case:retry"),
            Self::ResumeYes => f.write_str("resume:yes"),
            Self::RemindLater => f.write_str("remind:later"),
            Self::TrainingRestart => f.write_str("training:restart"),
            Self::Action(action) => fmt::Display::fmt(action, f),
            Self::Unknown(data) => f.write_str(data),
        }
    }
}
