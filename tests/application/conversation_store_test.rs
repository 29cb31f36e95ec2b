use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use assistant_gateway::application::services::{
    ConversationError, ConversationStore, MAX_STORED_MESSAGES, PROMPT_WINDOW,
};
use assistant_gateway::domain::{ConversationId, MessageRole};

fn new_conversation(store: &ConversationStore) -> ConversationId {
    store.get_or_create(None).unwrap().0
}

fn contents(store: &ConversationStore, id: &ConversationId) -> Vec<String> {
    store
        .get(id)
        .unwrap()
        .messages
        .into_iter()
        .map(|m| m.content)
        .collect()
}

#[test]
fn given_appends_when_counting_then_stored_is_min_of_cap_and_total() {
    let store = ConversationStore::new();
    let id = new_conversation(&store);

    for total in 1..=45 {
        store
            .append_message(&id, MessageRole::User, format!("m{}", total))
            .unwrap();

        let stored = contents(&store, &id);
        let expected_len = total.min(MAX_STORED_MESSAGES);
        assert_eq!(stored.len(), expected_len);

        let expected: Vec<String> = (total - expected_len + 1..=total)
            .map(|n| format!("m{}", n))
            .collect();
        assert_eq!(stored, expected);
    }
}

#[test]
fn given_any_history_size_when_building_prompt_then_returns_system_plus_window() {
    let store = ConversationStore::new();
    let id = new_conversation(&store);

    for stored in 0..=MAX_STORED_MESSAGES {
        let prompt = store.build_prompt(&id, "sys").unwrap();
        assert_eq!(prompt.len(), 1 + stored.min(PROMPT_WINDOW));
        assert_eq!(prompt[0].role, MessageRole::System);

        store
            .append_message(&id, MessageRole::User, format!("m{}", stored))
            .unwrap();
    }
}

#[test]
fn given_long_history_when_building_prompt_then_keeps_most_recent_oldest_first() {
    let store = ConversationStore::new();
    let id = new_conversation(&store);
    for n in 0..15 {
        store
            .append_message(&id, MessageRole::User, format!("m{}", n))
            .unwrap();
    }

    let prompt = store.build_prompt(&id, "sys").unwrap();

    let history: Vec<&str> = prompt[1..].iter().map(|p| p.content.as_str()).collect();
    let expected: Vec<String> = (5..15).map(|n| format!("m{}", n)).collect();
    assert_eq!(history, expected);
}

#[test]
fn given_ten_thousand_creations_when_collecting_ids_then_none_collide() {
    let store = ConversationStore::new();

    let ids: HashSet<ConversationId> = (0..10_000).map(|_| new_conversation(&store)).collect();

    assert_eq!(ids.len(), 10_000);
    assert_eq!(store.list_all().len(), 10_000);
}

#[test]
fn given_unknown_id_when_deleting_then_returns_false() {
    let store = ConversationStore::new();
    assert!(!store.delete(&ConversationId::from_raw("missing")));
}

#[test]
fn given_known_id_when_deleting_then_subsequent_get_is_not_found() {
    let store = ConversationStore::new();
    let id = new_conversation(&store);

    assert!(store.delete(&id));

    assert_eq!(store.get(&id).unwrap_err(), ConversationError::NotFound(id.clone()));
    assert!(!store.delete(&id));
}

#[test]
fn given_twenty_five_messages_when_listing_then_summary_shows_cap_and_preview() {
    let store = ConversationStore::new();
    let id = new_conversation(&store);
    let mut last = String::new();
    for n in 0..25 {
        last = format!("{:02}-{}", n, "x".repeat(150));
        store
            .append_message(&id, MessageRole::User, last.clone())
            .unwrap();
    }

    let summaries = store.list_all();

    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0].message_count, 20);
    let expected_preview: String = last.chars().take(100).collect();
    assert_eq!(summaries[0].last_message_preview, expected_preview);
}

#[test]
fn given_empty_conversation_when_listing_then_preview_is_empty() {
    let store = ConversationStore::new();
    new_conversation(&store);

    let summaries = store.list_all();

    assert_eq!(summaries[0].message_count, 0);
    assert_eq!(summaries[0].last_message_preview, "");
}

#[test]
fn given_twenty_one_pairs_when_appending_then_oldest_twenty_two_are_gone() {
    let store = ConversationStore::new();
    let id = new_conversation(&store);

    for pair in 0..21 {
        store
            .append_message(&id, MessageRole::User, format!("u{}", pair))
            .unwrap();
        store
            .append_message(&id, MessageRole::Assistant, format!("a{}", pair))
            .unwrap();
    }

    let stored = store.get(&id).unwrap().messages;
    assert_eq!(stored.len(), 20);
    // 42 appended, first 22 (pairs 0..=10) evicted
    assert_eq!(stored[0].content, "u11");
    assert_eq!(stored[0].role, MessageRole::User);
    assert_eq!(stored[19].content, "a20");
    assert!(stored.iter().all(|m| m.content != "a10"));
}

#[test]
fn given_three_messages_when_building_prompt_then_returns_four_entries_in_order() {
    let store = ConversationStore::new();
    let id = new_conversation(&store);
    store.append_message(&id, MessageRole::User, "hello").unwrap();
    store
        .append_message(&id, MessageRole::Assistant, "hi there")
        .unwrap();
    store.append_message(&id, MessageRole::User, "how are you?").unwrap();

    let prompt = store.build_prompt(&id, "sys").unwrap();

    let pairs: Vec<(MessageRole, &str)> = prompt
        .iter()
        .map(|p| (p.role, p.content.as_str()))
        .collect();
    assert_eq!(
        pairs,
        vec![
            (MessageRole::System, "sys"),
            (MessageRole::User, "hello"),
            (MessageRole::Assistant, "hi there"),
            (MessageRole::User, "how are you?"),
        ]
    );
}

#[test]
fn given_prompt_built_when_reading_conversation_then_history_is_unchanged() {
    let store = ConversationStore::new();
    let id = new_conversation(&store);
    store.append_message(&id, MessageRole::User, "hello").unwrap();
    let before = store.get(&id).unwrap();

    store.build_prompt(&id, "sys").unwrap();

    let after = store.get(&id).unwrap();
    assert_eq!(before.messages, after.messages);
    assert_eq!(before.updated_at, after.updated_at);
}

#[test]
fn given_unknown_id_when_getting_or_creating_then_not_found_and_nothing_created() {
    let store = ConversationStore::new();
    let id = ConversationId::from_raw("typo-id");

    let result = store.get_or_create(Some(id.clone()));

    assert_eq!(result.unwrap_err(), ConversationError::NotFound(id));
    assert!(store.list_all().is_empty());
}

#[test]
fn given_known_id_when_getting_or_creating_then_returns_existing_record() {
    let store = ConversationStore::new();
    let id = new_conversation(&store);
    store.append_message(&id, MessageRole::User, "hello").unwrap();

    let (returned_id, conversation) = store.get_or_create(Some(id.clone())).unwrap();

    assert_eq!(returned_id, id);
    assert_eq!(conversation.messages.len(), 1);
    assert_eq!(store.list_all().len(), 1);
}

#[test]
fn given_unknown_id_when_appending_or_building_prompt_then_not_found() {
    let store = ConversationStore::new();
    let id = ConversationId::from_raw("missing");

    assert!(store.append_message(&id, MessageRole::User, "x").is_err());
    assert!(store.build_prompt(&id, "sys").is_err());
    assert!(store.list_all().is_empty());
}

#[test]
fn given_several_conversations_when_reading_stats_then_totals_messages() {
    let store = ConversationStore::new();
    let first = new_conversation(&store);
    let second = new_conversation(&store);
    store.append_message(&first, MessageRole::User, "a").unwrap();
    store.append_message(&second, MessageRole::User, "b").unwrap();
    store
        .append_message(&second, MessageRole::Assistant, "c")
        .unwrap();

    let stats = store.stats();

    assert_eq!(stats.conversations, 2);
    assert_eq!(stats.total_messages, 3);
}

#[tokio::test]
async fn given_deleted_conversation_when_locking_turn_then_not_found() {
    let store = ConversationStore::new();
    let id = new_conversation(&store);
    store.delete(&id);

    assert!(store.lock_turn(&id).await.is_err());
}

#[tokio::test]
async fn given_turn_held_when_another_caller_locks_then_it_waits() {
    let store = Arc::new(ConversationStore::new());
    let id = new_conversation(&store);

    let guard = store.lock_turn(&id).await.unwrap();

    let waiter = {
        let store = Arc::clone(&store);
        let id = id.clone();
        tokio::spawn(async move { store.lock_turn(&id).await.is_ok() })
    };

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(!waiter.is_finished());

    drop(guard);
    assert!(waiter.await.unwrap());
}

#[tokio::test]
async fn given_turn_held_when_touching_other_conversation_then_not_blocked() {
    let store = ConversationStore::new();
    let busy = new_conversation(&store);
    let other = new_conversation(&store);

    let _guard = store.lock_turn(&busy).await.unwrap();

    let result = tokio::time::timeout(Duration::from_millis(200), store.lock_turn(&other)).await;
    assert!(result.is_ok());
    store.append_message(&busy, MessageRole::User, "still writable").unwrap();
}

#[tokio::test]
async fn given_waiter_when_conversation_deleted_then_waiter_gets_not_found() {
    let store = Arc::new(ConversationStore::new());
    let id = new_conversation(&store);
    let guard = store.lock_turn(&id).await.unwrap();

    let waiter = {
        let store = Arc::clone(&store);
        let id = id.clone();
        tokio::spawn(async move { store.lock_turn(&id).await.map(|_| ()) })
    };
    tokio::time::sleep(Duration::from_millis(20)).await;

    store.delete(&id);
    drop(guard);

    assert_eq!(
        waiter.await.unwrap().unwrap_err(),
        ConversationError::NotFound(id)
    );
}
