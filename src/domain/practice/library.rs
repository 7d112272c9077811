//! Skill library: blocks of practicable skills with their theory and
//! prepared situations.
//!
//! Like the coaching catalog, the library is read-only and injected. A YAML
//! file with the same shape can replace the built-in content.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::domain::coaching::CatalogError;

/// One practicable skill.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PracticeSkill {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Short theory the situations and feedback are grounded on.
    #[serde(default)]
    pub theory_doc: String,
    /// Prepared situations. Skills without any get generated ones.
    #[serde(default)]
    pub situations: Vec<String>,
}

impl PracticeSkill {
    /// Prompt used when neither a prepared nor a generated situation exists.
    pub fn fallback_situation(&self) -> String {
        format!(
            "Опишите ситуацию, в которой вам нужно применить навык '{}'. Как бы вы действовали?",
            self.name
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillBlock {
    pub id: String,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub skills: Vec<PracticeSkill>,
}

/// Block without its skills, for listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlockOverview {
    pub id: String,
    pub name: String,
    pub description: String,
    pub skill_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillLibrary {
    pub blocks: Vec<SkillBlock>,
}

impl Default for SkillLibrary {
    fn default() -> Self {
        Self::builtin()
    }
}

impl SkillLibrary {
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let raw = std::fs::read_to_string(path.as_ref())
            .map_err(|e| CatalogError::Io(format!("{}: {e}", path.as_ref().display())))?;
        Self::from_yaml_str(&raw)
    }

    pub fn from_yaml_str(raw: &str) -> Result<Self, CatalogError> {
        serde_yaml::from_str(raw).map_err(|e| CatalogError::Parse(e.to_string()))
    }

    pub fn overviews(&self) -> Vec<BlockOverview> {
        self.blocks
            .iter()
            .map(|b| BlockOverview {
                id: b.id.clone(),
                name: b.name.clone(),
                description: b.description.clone(),
                skill_count: b.skills.len(),
            })
            .collect()
    }

    pub fn block(&self, block_id: &str) -> Option<&SkillBlock> {
        self.blocks.iter().find(|b| b.id == block_id)
    }

    pub fn skill(&self, block_id: &str, skill_id: &str) -> Option<&PracticeSkill> {
        self.block(block_id)?.skills.iter().find(|s| s.id == skill_id)
    }

    /// Built-in Russian content.
    pub fn builtin() -> Self {
        let management = SkillBlock {
            id: "management".to_string(),
            name: "Управление командой".to_string(),
            description: "Разговоры с сотрудниками и распределение работы".to_string(),
            skills: vec![
                PracticeSkill {
                    id: "feedback".to_string(),
                    name: "Обратная связь".to_string(),
                    description: "Давать обратную связь так, чтобы поведение менялось".to_string(),
                    theory_doc: "Модель SBI: ситуация, поведение, влияние. Говорить о фактах, \
                                 а не о личности, и договариваться о следующем шаге."
                        .to_string(),
                    situations: vec![
                        "Сотрудник дважды пропустил дедлайн по отчёту, но в остальном работает хорошо. Как вы проведёте разговор?".to_string(),
                        "Сильный разработчик грубо отвечает коллегам в рабочем чате. Команда начала жаловаться. Как вы поступите?".to_string(),
                    ],
                },
                PracticeSkill {
                    id: "delegation".to_string(),
                    name: "Делегирование".to_string(),
                    description: "Передавать задачи с понятным результатом и уровнем самостоятельности".to_string(),
                    theory_doc: "Результат, сроки, ресурсы, точки контроля. Уровень полномочий \
                                 зависит от зрелости сотрудника в задаче."
                        .to_string(),
                    situations: vec![
                        "Вам нужно передать подготовку квартального отчёта новому сотруднику, который раньше такого не делал. Как вы поставите задачу?".to_string(),
                    ],
                },
            ],
        };

        let development = SkillBlock {
            id: "development".to_string(),
            name: "Развитие сотрудников".to_string(),
            description: "Планы развития и рост внутри команды".to_string(),
            skills: vec![
                PracticeSkill {
                    id: "idp".to_string(),
                    name: "ИПР".to_string(),
                    description: "Составлять индивидуальный план развития вместе с сотрудником".to_string(),
                    theory_doc: "Цель развития связана с задачами бизнеса. 70/20/10: опыт, \
                                 окружение, обучение. У каждого шага есть срок и критерий."
                        .to_string(),
                    situations: vec![
                        "Сотрудник хочет вырасти до тимлида через год, но пока не вёл ни одного проекта. С чего вы начнёте ИПР?".to_string(),
                    ],
                },
                PracticeSkill {
                    id: "mentoring".to_string(),
                    name: "Наставничество".to_string(),
                    description: "Помогать новичку освоиться и расти самостоятельно".to_string(),
                    theory_doc: "Наставник задаёт вопросы чаще, чем даёт готовые ответы.".to_string(),
                    situations: Vec::new(),
                },
            ],
        };

        Self {
            blocks: vec![management, development],
        }
    }
}
