//! Collapsing of redundant output actions.
//!
//! Message actions are merged by `(chat_id, text)`. Within a key the variant
//! carrying interactive controls wins; between two variants with controls the
//! later one wins; between two without, the first is kept. Each key keeps the
//! slot of its first appearance. Non-message actions are never merged.

use std::collections::HashMap;

use super::action::OutputAction;
use crate::domain::foundation::ChatId;

pub fn dedup_actions(actions: Vec<OutputAction>) -> Vec<OutputAction> {
    let mut slots: Vec<OutputAction> = Vec::with_capacity(actions.len());
    let mut by_key: HashMap<(ChatId, String), usize> = HashMap::new();

    for action in actions {
        let key = match action.as_message() {
            Some(message) => (message.chat_id, message.text.clone()),
            None => {
                slots.push(action);
                continue;
            }
        };

        match by_key.get(&key) {
            Some(&slot) => {
                let replaces = action.as_message().is_some_and(|m| m.has_controls());
                if replaces {
                    slots[slot] = action;
                }
            }
            None => {
                by_key.insert(key, slots.len());
                slots.push(action);
            }
        }
    }

    slots
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::coaching::action::{Button, Keyboard, SendMessage};
    use proptest::prelude::*;
    use serde_json::json;
    use std::collections::HashSet;

    fn plain(chat: i64, text: &str) -> OutputAction {
        SendMessage::new(ChatId::new(chat), text).into()
    }

    fn with_button(chat: i64, text: &str, data: &str) -> OutputAction {
        SendMessage::new(ChatId::new(chat), text)
            .with_keyboard(Keyboard::column([Button::new("b", data)]))
            .into()
    }

    fn data_of(action: &OutputAction) -> Option<&str> {
        action
            .as_message()
            .and_then(|m| m.keyboard.as_ref())
            .and_then(|k| k.buttons().next())
            .map(|b| b.data.as_str())
    }

    #[test]
    fn keyboard_variant_wins_when_it_comes_first() {
        let out = dedup_actions(vec![with_button(1, "hi", "case:next"), plain(1, "hi")]);
        assert_eq!(out.len(), 1);
        assert_eq!(data_of(&out[0]), Some("case:next"));
    }

    #[test]
    fn keyboard_variant_wins_when_it_comes_last() {
        let out = dedup_actions(vec![plain(1, "hi"), with_button(1, "hi", "case:next")]);
        assert_eq!(out.len(), 1);
        assert_eq!(data_of(&out[0]), Some("case:next"));
    }

    #[test]
    fn later_keyboard_wins_ties() {
        let out = dedup_actions(vec![
            with_button(1, "hi", "case:retry"),
            with_button(1, "hi", "case:next"),
        ]);
        assert_eq!(out.len(), 1);
        assert_eq!(data_of(&out[0]), Some("case:next"));
    }

    #[test]
    fn same_text_for_different_chats_is_kept() {
        let out = dedup_actions(vec![plain(1, "hi"), plain(2, "hi")]);
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn other_actions_pass_through_in_place() {
        let typing = OutputAction::Other(json!({"type": "typing"}));
        let out = dedup_actions(vec![
            plain(1, "a"),
            typing.clone(),
            typing.clone(),
            plain(1, "a"),
            plain(1, "b"),
        ]);
        assert_eq!(out, vec![plain(1, "a"), typing.clone(), typing, plain(1, "b")]);
    }

    #[test]
    fn merged_entry_keeps_first_slot() {
        let out = dedup_actions(vec![
            plain(1, "a"),
            plain(1, "b"),
            with_button(1, "a", "action:start"),
        ]);
        assert_eq!(out.len(), 2);
        assert_eq!(data_of(&out[0]), Some("action:start"));
        assert_eq!(out[1], plain(1, "b"));
    }

    #[test]
    fn empty_input_gives_empty_output() {
        assert!(dedup_actions(Vec::new()).is_empty());
    }

    fn arb_action() -> impl Strategy<Value = OutputAction> {
        (0i64..3, 0usize..4, any::<bool>()).prop_map(|(chat, text, keyed)| {
            let text = format!("t{text}");
            if keyed {
                with_button(chat, &text, "case:next")
            } else {
                plain(chat, &text)
            }
        })
    }

    proptest! {
        #[test]
        fn every_key_appears_exactly_once(actions in prop::collection::vec(arb_action(), 0..20)) {
            let keys: HashSet<(ChatId, String)> = actions
                .iter()
                .filter_map(|a| a.as_message())
                .map(|m| (m.chat_id, m.text.clone()))
                .collect();

            let out = dedup_actions(actions.clone());
            prop_assert_eq!(out.len(), keys.len());

            for action in &out {
                let message = action.as_message().unwrap();
                let key = (message.chat_id, message.text.clone());
                let any_with_controls = actions
                    .iter()
                    .filter_map(|a| a.as_message())
                    .any(|m| (m.chat_id, m.text.clone()) == key && m.has_controls());
                prop_assert_eq!(message.has_controls(), any_with_controls);
            }
        }

        #[test]
        fn distinct_keys_are_all_kept(n in 0usize..30) {
            let actions: Vec<OutputAction> =
                (0..n).map(|i| plain(i as i64 % 3, &format!("m{i}"))).collect();
            prop_assert_eq!(dedup_actions(actions).len(), n);
        }
    }
}
