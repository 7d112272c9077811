//! Deterministic scoring used when no generator is available or it fails.

use super::progress::ConversationProgress;

/// Keywords that mark a concrete, action-oriented answer.
pub const DEFAULT_POSITIVE_KEYWORDS: [&str; 5] =
    ["конструктив", "конкретно", "действия", "пример", "ожидания"];

const GOOD_FEEDBACK: [&str; 2] = [
    "Отлично: есть конкретика и фокус на действия. Давай двигаться дальше.",
    "Хорошо сформулировано, видно рабочие шаги. Готов к следующему кейсу.",
];

const WEAK_FEEDBACK: &str =
    "Ответ пока поверхностный. Добавь конкретики: примеры, действия, ожидания. Попробуем ещё раз?";

/// Heuristic verdict on a case answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    pub is_good: bool,
    pub score: u32,
    pub feedback: String,
}

/// Keyword-count scorer for free-text answers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerHeuristics {
    keywords: Vec<String>,
    good_score: u32,
    long_answer_words: usize,
}

impl Default for AnswerHeuristics {
    fn default() -> Self {
        Self::new(
            DEFAULT_POSITIVE_KEYWORDS.iter().map(|k| k.to_string()).collect(),
            2,
            12,
        )
    }
}

impl AnswerHeuristics {
    pub fn new(keywords: Vec<String>, good_score: u32, long_answer_words: usize) -> Self {
        Self {
            keywords: keywords.into_iter().map(|k| k.to_lowercase()).collect(),
            good_score,
            long_answer_words,
        }
    }

    /// One point per keyword found in the lowercased answer, plus one if the
    /// answer has more than `long_answer_words` words.
    pub fn score(&self, answer: &str) -> u32 {
        let lower = answer.to_lowercase();
        let hits = self.keywords.iter().filter(|k| lower.contains(k.as_str())).count() as u32;
        let long = answer.split_whitespace().count() > self.long_answer_words;
        hits + u32::from(long)
    }

    pub fn evaluate(&self, answer: &str) -> Verdict {
        let score = self.score(answer);
        let is_good = score >= self.good_score;
        let feedback = if !is_good {
            WEAK_FEEDBACK
        } else if score > self.good_score {
            GOOD_FEEDBACK[0]
        } else {
            GOOD_FEEDBACK[1]
        };
        Verdict {
            is_good,
            score,
            feedback: feedback.to_string(),
        }
    }
}

/// Summary of a finished diagnostic from the chosen options alone.
pub fn interpret_diagnostic(progress: &ConversationProgress, markers: &[String]) -> String {
    let chosen = progress.chosen_option_texts();
    if chosen.is_empty() {
        return "Диагностика не заполнена.".to_string();
    }

    let positives = chosen
        .iter()
        .filter(|text| {
            let lower = text.to_lowercase();
            markers.iter().any(|m| lower.contains(m.as_str()))
        })
        .count();

    if positives * 2 >= chosen.len() {
        "Уровень базовый/средний: есть сильные стороны, но стоит потренировать структурность."
            .to_string()
    } else {
        "Диагностика показывает зоны роста: обратная связь пока размыта. Предлагаю начать с тренажёра и закрепить формат."
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::coaching::catalog::Catalog;

    #[test]
    fn concrete_answer_is_good() {
        let verdict = AnswerHeuristics::default().evaluate(
            "Давай обсудим конкретные действия и ожидания с примерами уже на следующей неделе",
        );
        assert!(verdict.is_good);
        assert_eq!(verdict.score, 3);
    }

    #[test]
    fn short_vague_answer_is_weak() {
        let verdict = AnswerHeuristics::default().evaluate("Поговорю с ним");
        assert!(!verdict.is_good);
        assert_eq!(verdict.score, 0);
        assert_eq!(verdict.feedback, WEAK_FEEDBACK);
    }

    #[test]
    fn long_answer_earns_a_point() {
        let heuristics = AnswerHeuristics::default();
        let long = "я бы сначала выслушал его и потом спокойно объяснил как это влияет на команду";
        assert_eq!(heuristics.score(long), 1);
        assert_eq!(heuristics.score(&format!("{long} на примере")), 2);
    }

    #[test]
    fn keywords_match_case_insensitively() {
        let heuristics = AnswerHeuristics::default();
        assert_eq!(heuristics.score("ДЕЙСТВИЯ и ОЖИДАНИЯ"), 2);
    }

    #[test]
    fn feedback_is_deterministic() {
        let heuristics = AnswerHeuristics::default();
        let exact = heuristics.evaluate("действия и ожидания");
        assert!(exact.is_good);
        assert_eq!(exact.feedback, GOOD_FEEDBACK[1]);
        let strong = heuristics.evaluate("действия, ожидания и пример");
        assert_eq!(strong.feedback, GOOD_FEEDBACK[0]);
    }

    #[test]
    fn custom_keywords_and_threshold() {
        let heuristics = AnswerHeuristics::new(vec!["Alpha".into()], 1, 100);
        assert!(heuristics.evaluate("alpha").is_good);
        assert!(!heuristics.evaluate("beta").is_good);
    }

    fn answered(options: &[usize]) -> ConversationProgress {
        let catalog = Catalog::builtin();
        let mut progress = ConversationProgress::default();
        progress.set_diagnostic_questions(catalog.diagnostic_questions().to_vec());
        for (q, o) in options.iter().enumerate() {
            progress.record_diagnostic_answer(q, *o);
        }
        progress
    }

    #[test]
    fn confident_answers_read_as_baseline() {
        let markers = Catalog::builtin().diagnostic_positive_markers;
        let summary = interpret_diagnostic(&answered(&[0, 0, 2]), &markers);
        assert!(summary.starts_with("Уровень базовый/средний"));
    }

    #[test]
    fn weak_answers_read_as_growth_zones() {
        let markers = Catalog::builtin().diagnostic_positive_markers;
        let summary = interpret_diagnostic(&answered(&[2, 2, 1]), &markers);
        assert!(summary.starts_with("Диагностика показывает зоны роста"));
    }

    #[test]
    fn empty_diagnostic_is_reported() {
        let summary = interpret_diagnostic(&ConversationProgress::default(), &[]);
        assert_eq!(summary, "Диагностика не заполнена.");
    }
}
