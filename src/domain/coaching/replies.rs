//! Message builders for every reply the coach sends.
//!
//! Button data is rendered from the command types so the grammar is defined
//! in one place.

use super::action::{Button, Keyboard, OutputAction, SendMessage};
use super::catalog::Catalog;
use super::command::{ActionCommand, CallbackCommand};
use super::heuristics::Verdict;
use super::progress::{ConversationProgress, DiagnosticQuestion};
use crate::domain::foundation::ChatId;

fn action_button(text: &str, action: ActionCommand) -> Button {
    Button::new(text, action.to_string())
}

fn callback_button(text: &str, callback: CallbackCommand) -> Button {
    Button::new(text, callback.to_string())
}

fn menu_button() -> Button {
    action_button("В меню", ActionCommand::Start)
}

fn cancel_button() -> Button {
    action_button("Отмена", ActionCommand::Start)
}

fn change_skill_button() -> Button {
    action_button("Выбрать навык", ActionCommand::Skill("feedback".to_string()))
}

fn message(chat_id: ChatId, text: impl Into<String>) -> SendMessage {
    SendMessage::new(chat_id, text)
}

fn with_column(
    chat_id: ChatId,
    text: impl Into<String>,
    buttons: impl IntoIterator<Item = Button>,
) -> OutputAction {
    message(chat_id, text)
        .with_keyboard(Keyboard::column(buttons))
        .into()
}

fn next_steps(chat_id: ChatId, text: impl Into<String>) -> OutputAction {
    with_column(
        chat_id,
        text,
        [
            action_button("Начать диагностику", ActionCommand::DiagnosticStart),
            action_button("Перейти к тренажёру", ActionCommand::TrainingStart),
            menu_button(),
        ],
    )
}

/// Rows appended to generated feedback so the user can always leave the case.
pub fn navigation_rows() -> Vec<Vec<Button>> {
    vec![vec![menu_button()], vec![change_skill_button()]]
}

// ════════════════════════════════════════════════════════════════════════════
// Menu
// ════════════════════════════════════════════════════════════════════════════

pub fn welcome(chat_id: ChatId) -> OutputAction {
    with_column(
        chat_id,
        "Привет! Я помогу натренировать нужные навыки под твой запрос. Выбери, с чего начать.",
        [
            action_button("Начать диагностику", ActionCommand::DiagnosticStart),
            action_button("Перейти к тренажёру", ActionCommand::TrainingStart),
            action_button("Прогресс", ActionCommand::Progress),
            action_button("Напоминания", ActionCommand::Reminders),
            action_button("Сфера деятельности", ActionCommand::SphereMenu),
        ],
    )
}

pub fn reminders_menu(chat_id: ChatId) -> OutputAction {
    with_column(
        chat_id,
        "Напоминания включены по запросу. Хочешь получить напоминание позже?",
        [
            callback_button("Да, напомни", CallbackCommand::RemindLater),
            callback_button("Нет, продолжим", CallbackCommand::ResumeYes),
        ],
    )
}

pub fn section_unavailable(chat_id: ChatId) -> OutputAction {
    with_column(chat_id, "Этот раздел временно недоступен.", [menu_button()])
}

pub fn progress_summary(
    chat_id: ChatId,
    progress: &ConversationProgress,
    catalog: &Catalog,
) -> OutputAction {
    let diagnostic = if progress.diagnostic_done {
        "пройдена"
    } else {
        "не завершена"
    };
    let text = format!(
        "Диагностика: {diagnostic}\nСфера: {}\nНавык: {}\nКейсов пройдено: {}",
        catalog.sphere_display(&progress.sphere),
        catalog.skill_label(&progress.skill),
        progress.training_index,
    );
    with_column(
        chat_id,
        text,
        [
            action_button("Перейти к тренажёру", ActionCommand::TrainingStart),
            menu_button(),
        ],
    )
}

// ════════════════════════════════════════════════════════════════════════════
// Sphere and skill
// ════════════════════════════════════════════════════════════════════════════

pub fn sphere_prompt(chat_id: ChatId) -> OutputAction {
    with_column(
        chat_id,
        "Напиши в чат свою специальность или сферу — введи её вручную.",
        [cancel_button()],
    )
}

pub fn sphere_chosen(chat_id: ChatId, label: &str) -> OutputAction {
    next_steps(
        chat_id,
        format!("Сфера выбрана: {label}. Можно начинать диагностику или тренажёр."),
    )
}

pub fn sphere_set_from_text(chat_id: ChatId, sphere: &str) -> OutputAction {
    next_steps(chat_id, format!("Сфера установлена: {sphere}. Что дальше?"))
}

pub fn unknown_sphere(chat_id: ChatId, catalog: &Catalog) -> OutputAction {
    let buttons = catalog
        .spheres
        .iter()
        .map(|s| action_button(&s.label, ActionCommand::Sphere(s.code.clone())))
        .chain([action_button("Ввести вручную", ActionCommand::SphereCustom)]);
    with_column(chat_id, "Неизвестная сфера. Выбери из списка.", buttons)
}

pub fn skill_prompt(chat_id: ChatId) -> OutputAction {
    with_column(
        chat_id,
        "Напиши, что хочешь потренировать (навык/тематику) — введи вручную.",
        [cancel_button()],
    )
}

pub fn neutral_prompt(chat_id: ChatId) -> OutputAction {
    with_column(
        chat_id,
        "Принял сообщение. Чтобы продолжить тренировку, выбери действие в меню.",
        [
            action_button("Перейти к тренажёру", ActionCommand::TrainingStart),
            action_button("Прогресс", ActionCommand::Progress),
            menu_button(),
        ],
    )
}

// ════════════════════════════════════════════════════════════════════════════
// Diagnostic
// ════════════════════════════════════════════════════════════════════════════

pub fn diagnostic_question(
    chat_id: ChatId,
    index: usize,
    total: usize,
    question: &DiagnosticQuestion,
) -> OutputAction {
    let options = question
        .options
        .iter()
        .enumerate()
        .filter(|(_, text)| !text.trim().is_empty())
        .map(|(option, text)| {
            callback_button(
                text.trim(),
                CallbackCommand::Diagnostic {
                    question: index,
                    option,
                },
            )
        });
    with_column(
        chat_id,
        format!(
            "Диагностика, вопрос {}/{}:\n\n{}",
            index + 1,
            total,
            question.text
        ),
        options,
    )
}

pub fn diagnostic_unavailable(chat_id: ChatId) -> OutputAction {
    with_column(
        chat_id,
        "Не удалось подготовить вопросы диагностики. Попробуй позже.",
        [menu_button()],
    )
}

pub fn diagnostic_complete(chat_id: ChatId, summary: &str) -> OutputAction {
    with_column(
        chat_id,
        format!("Диагностика завершена.\n\n{summary}"),
        [
            action_button("Перейти к тренажёру", ActionCommand::TrainingStart),
            action_button("Ещё раз диагностику", ActionCommand::DiagnosticStart),
            menu_button(),
        ],
    )
}

// ════════════════════════════════════════════════════════════════════════════
// Training
// ════════════════════════════════════════════════════════════════════════════

/// The case at `index`, or the exhausted prompt when past the end.
pub fn training_case(chat_id: ChatId, index: usize, cases: &[String]) -> OutputAction {
    match cases.get(index) {
        Some(case) => with_column(
            chat_id,
            format!("Кейс {}:\n\n{case}", index + 1),
            [
                callback_button("Напомнить позже", CallbackCommand::RemindLater),
                menu_button(),
                change_skill_button(),
            ],
        ),
        None => cases_exhausted(chat_id),
    }
}

pub fn cases_exhausted(chat_id: ChatId) -> OutputAction {
    with_column(
        chat_id,
        "Кейсы закончились. Можем пройти заново или выбрать другой навык.",
        [
            callback_button("С начала", CallbackCommand::TrainingRestart),
            change_skill_button(),
            action_button("Назад в меню", ActionCommand::Start),
        ],
    )
}

pub fn no_cases(chat_id: ChatId) -> OutputAction {
    with_column(
        chat_id,
        "Не удалось подготовить кейсы для этой темы. Попробуй снова или выбери другую.",
        [change_skill_button(), menu_button()],
    )
}

pub fn preparing_training(chat_id: ChatId) -> OutputAction {
    message(chat_id, "Готовлю тренинг, собираю первый кейс...").into()
}

pub fn heuristic_feedback(chat_id: ChatId, verdict: &Verdict) -> OutputAction {
    if verdict.is_good {
        with_column(
            chat_id,
            verdict.feedback.clone(),
            [callback_button("Дальше", CallbackCommand::CaseNext)],
        )
    } else {
        with_column(
            chat_id,
            verdict.feedback.clone(),
            [
                callback_button("Попробовать снова", CallbackCommand::CaseRetry),
                menu_button(),
            ],
        )
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Reminders and acknowledgments
// ════════════════════════════════════════════════════════════════════════════

pub fn reminder_acknowledged(chat_id: ChatId) -> OutputAction {
    message(chat_id, "Хорошо, напомню позже.").into()
}

pub fn reminder(chat_id: ChatId) -> OutputAction {
    with_column(
        chat_id,
        "Напоминаю: у тебя незавершённый кейс. Продолжаем?",
        [
            callback_button("Продолжить", CallbackCommand::ResumeYes),
            callback_button("Напомнить позже", CallbackCommand::RemindLater),
        ],
    )
}

pub fn command_acknowledged(chat_id: ChatId) -> OutputAction {
    message(chat_id, "Команда принята.").into()
}

pub fn signal_acknowledged(chat_id: ChatId) -> OutputAction {
    message(chat_id, "Сигнал получен.").into()
}

pub fn event_acknowledged(chat_id: ChatId) -> OutputAction {
    message(chat_id, "Событие принято.").into()
}
