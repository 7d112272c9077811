//! Static coaching content: spheres, skills, diagnostic questions and cases.
//!
//! The catalog is read-only and injected into the content provider at
//! construction. It is the fallback whenever generated content is unavailable.
//! A YAML file with the same shape can replace the built-in content.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use super::progress::DiagnosticQuestion;

/// Errors loading a catalog file.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Failed to read catalog file: {0}")]
    Io(String),

    #[error("Failed to parse catalog: {0}")]
    Parse(String),
}

/// Code plus human-readable label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub code: String,
    pub label: String,
}

impl CatalogEntry {
    fn new(code: &str, label: &str) -> Self {
        Self {
            code: code.to_string(),
            label: label.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Catalog {
    pub spheres: Vec<CatalogEntry>,
    pub skills: Vec<CatalogEntry>,
    pub diagnostic: Vec<DiagnosticQuestion>,
    /// Cases keyed by skill code.
    pub cases: BTreeMap<String, Vec<String>>,
    /// Skill whose cases serve skills typed as free text.
    pub fallback_skill: String,
    /// Lowercase fragments marking a confident diagnostic answer.
    pub diagnostic_positive_markers: Vec<String>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl Catalog {
    /// Loads a catalog from a YAML file. Missing sections take built-in values.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let raw = std::fs::read_to_string(path.as_ref())
            .map_err(|e| CatalogError::Io(format!("{}: {e}", path.as_ref().display())))?;
        Self::from_yaml_str(&raw)
    }

    pub fn from_yaml_str(raw: &str) -> Result<Self, CatalogError> {
        serde_yaml::from_str(raw).map_err(|e| CatalogError::Parse(e.to_string()))
    }

    /// Cases for a skill. Unknown skills get the fallback skill's cases.
    pub fn cases_for(&self, skill: &str) -> &[String] {
        self.cases
            .get(skill)
            .or_else(|| self.cases.get(&self.fallback_skill))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn case_at(&self, skill: &str, index: usize) -> Option<&str> {
        self.cases_for(skill).get(index).map(String::as_str)
    }

    pub fn diagnostic_questions(&self) -> &[DiagnosticQuestion] {
        &self.diagnostic
    }

    pub fn sphere_label(&self, code: &str) -> Option<&str> {
        self.spheres
            .iter()
            .find(|s| s.code == code)
            .map(|s| s.label.as_str())
    }

    /// Label of a catalog skill, or the skill itself when typed as free text.
    pub fn skill_label<'a>(&'a self, skill: &'a str) -> &'a str {
        self.skills
            .iter()
            .find(|s| s.code == skill)
            .map(|s| s.label.as_str())
            .unwrap_or(skill)
    }

    /// Sphere label, or the stored value when it was typed as free text.
    pub fn sphere_display<'a>(&'a self, sphere: &'a str) -> &'a str {
        self.sphere_label(sphere).unwrap_or(sphere)
    }

    /// Built-in Russian content.
    pub fn builtin() -> Self {
        let spheres = vec![
            CatalogEntry::new("it", "IT и разработка"),
            CatalogEntry::new("sales", "Продажи"),
            CatalogEntry::new("marketing", "Маркетинг"),
            CatalogEntry::new("hr", "HR и управление персоналом"),
            CatalogEntry::new("management", "Менеджмент"),
        ];

        let skills = vec![
            CatalogEntry::new("feedback", "Обратная связь"),
            CatalogEntry::new("idp", "ИПР"),
        ];

        let diagnostic = vec![
            DiagnosticQuestion::new(
                "Как часто ты даёшь обратную связь коллегам?",
                [
                    "Регулярно, по договорённому ритму",
                    "Иногда, когда есть повод",
                    "Почти никогда",
                ],
            ),
            DiagnosticQuestion::new(
                "Насколько уверенно ты разбираешь ошибки с сотрудником?",
                [
                    "Уверенно, на конкретных примерах",
                    "Стараюсь, но ухожу в общие слова",
                    "Избегаю таких разговоров",
                ],
            ),
            DiagnosticQuestion::new(
                "Есть ли у твоих сотрудников индивидуальные планы развития?",
                [
                    "Да, и мы регулярно их пересматриваем",
                    "Есть, но формально",
                    "Нет",
                ],
            ),
        ];

        let mut cases = BTreeMap::new();
        cases.insert(
            "feedback".to_string(),
            vec![
                "Сотрудник третий раз подряд сдаёт отчёт с опозданием на день. Качество при этом хорошее. Как ты начнёшь разговор?".to_string(),
                "Коллега из соседней команды резко раскритиковал твоего сотрудника на общей встрече. Сотрудник расстроен. Что ты ему скажешь?".to_string(),
                "Новичок закрыл первую задачу, но код пришлось почти полностью переписать. Как дать ему обратную связь, не демотивируя?".to_string(),
                "Опытный специалист перестал делиться знаниями с командой и отвечает коротко. Как ты обсудишь это с ним?".to_string(),
                "Сотрудник попросил обратную связь по итогам квартала, но конкретных фактов у тебя мало. Как ты поступишь?".to_string(),
            ],
        );
        cases.insert(
            "idp".to_string(),
            vec![
                "Сотрудник хочет вырасти до тимлида, но пока не брал на себя управленческих задач. Какие первые шаги ты включишь в его ИПР?".to_string(),
                "В прошлом ИПР сотрудника выполнено меньше половины пунктов. Как ты разберёшь причины и обновишь план?".to_string(),
                "Сильный специалист говорит, что ему некуда расти. Как ты построишь с ним разговор о развитии?".to_string(),
                "У сотрудника есть цель в ИПР «улучшить коммуникацию». Как переформулировать её так, чтобы прогресс можно было измерить?".to_string(),
                "Бюджета на обучение в этом году нет. Какие способы развития ты предложишь сотруднику вместо курсов?".to_string(),
            ],
        );

        Self {
            spheres,
            skills,
            diagnostic,
            cases,
            fallback_skill: "idp".to_string(),
            diagnostic_positive_markers: vec![
                "регулярно".to_string(),
                "уверенно".to_string(),
                "сильн".to_string(),
                "пересматрива".to_string(),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn builtin_has_cases_for_every_skill() {
        let catalog = Catalog::builtin();
        for skill in &catalog.skills {
            assert!(!catalog.cases_for(&skill.code).is_empty(), "{}", skill.code);
        }
    }

    #[test]
    fn builtin_diagnostic_questions_have_options() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.diagnostic_questions().len(), 3);
        assert!(catalog.diagnostic_questions().iter().all(|q| q.options.len() == 3));
    }

    #[test]
    fn free_text_skill_falls_back() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.cases_for("переговоры"), catalog.cases_for("idp"));
        assert_eq!(catalog.case_at("переговоры", 0), catalog.case_at("idp", 0));
    }

    #[test]
    fn case_at_past_end_is_none() {
        let catalog = Catalog::builtin();
        let len = catalog.cases_for("feedback").len();
        assert!(catalog.case_at("feedback", len).is_none());
    }

    #[test]
    fn labels_fall_back_to_raw_value() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.skill_label("feedback"), "Обратная связь");
        assert_eq!(catalog.skill_label("переговоры"), "переговоры");
        assert_eq!(catalog.sphere_label("sales"), Some("Продажи"));
        assert_eq!(catalog.sphere_display("Бухгалтерия"), "Бухгалтерия");
    }

    #[test]
    fn empty_catalog_has_no_cases() {
        let catalog = Catalog::from_yaml_str("cases: {}\nfallback_skill: none\n").unwrap();
        assert!(catalog.cases_for("feedback").is_empty());
    }

    #[test]
    fn yaml_sections_override_builtin() {
        let yaml = "cases:\n  feedback:\n    - only case\nfallback_skill: feedback\n";
        let catalog = Catalog::from_yaml_str(yaml).unwrap();
        assert_eq!(catalog.cases_for("anything"), ["only case".to_string()]);
        assert_eq!(catalog.diagnostic_questions().len(), 3);
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "spheres:\n  - code: law\n    label: Юриспруденция").unwrap();
        let catalog = Catalog::from_yaml_file(file.path()).unwrap();
        assert_eq!(catalog.sphere_label("law"), Some("Юриспруденция"));
    }

    #[test]
    fn missing_file_is_io_error() {
        let result = Catalog::from_yaml_file("/definitely/not/here.yaml");
        assert!(matches!(result, Err(CatalogError::Io(_))));
    }

    #[test]
    fn malformed_yaml_is_parse_error() {
        let result = Catalog::from_yaml_str("spheres: [unclosed");
        assert!(matches!(result, Err(CatalogError::Parse(_))));
    }
}
