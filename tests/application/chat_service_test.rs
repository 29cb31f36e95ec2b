use std::sync::Arc;
use std::time::Duration;

use assistant_gateway::application::services::{
    ChatError, ChatService, ConversationError, ConversationStore, MAX_MESSAGE_CHARS,
};
use assistant_gateway::domain::{ConversationId, MessageRole};

use crate::helpers::{EchoLlmClient, FailingLlmClient, TEST_SYSTEM_PROMPT};

fn service_with(llm: Arc<EchoLlmClient>) -> ChatService {
    ChatService::new(
        Arc::new(ConversationStore::new()),
        llm,
        TEST_SYSTEM_PROMPT.to_string(),
    )
}

#[tokio::test]
async fn given_new_message_when_sending_then_creates_conversation_with_both_turns() {
    let llm = Arc::new(EchoLlmClient::default());
    let service = service_with(Arc::clone(&llm));

    let reply = service.send_message("hello", None).await.unwrap();

    assert_eq!(reply.response, "echo: hello");
    let conversation = service.store().get(&reply.conversation_id).unwrap();
    let turns: Vec<(MessageRole, &str)> = conversation
        .messages
        .iter()
        .map(|m| (m.role, m.content.as_str()))
        .collect();
    assert_eq!(
        turns,
        vec![
            (MessageRole::User, "hello"),
            (MessageRole::Assistant, "echo: hello"),
        ]
    );
}

#[tokio::test]
async fn given_existing_conversation_when_sending_then_prompt_carries_history() {
    let llm = Arc::new(EchoLlmClient::default());
    let service = service_with(Arc::clone(&llm));

    let first = service.send_message("first", None).await.unwrap();
    service
        .send_message("second", Some(first.conversation_id.clone()))
        .await
        .unwrap();

    let prompts = llm.recorded();
    assert_eq!(prompts.len(), 2);
    let second_prompt: Vec<(MessageRole, &str)> = prompts[1]
        .iter()
        .map(|p| (p.role, p.content.as_str()))
        .collect();
    assert_eq!(
        second_prompt,
        vec![
            (MessageRole::System, TEST_SYSTEM_PROMPT),
            (MessageRole::User, "first"),
            (MessageRole::Assistant, "echo: first"),
            (MessageRole::User, "second"),
        ]
    );
}

#[tokio::test]
async fn given_long_conversation_when_sending_then_prompt_is_capped() {
    let llm = Arc::new(EchoLlmClient::default());
    let service = service_with(Arc::clone(&llm));
    let id = service.send_message("m0", None).await.unwrap().conversation_id;

    for n in 1..15 {
        service
            .send_message(&format!("m{}", n), Some(id.clone()))
            .await
            .unwrap();
    }

    let last_prompt = llm.recorded().pop().unwrap();
    assert_eq!(last_prompt.len(), 11);
    assert_eq!(last_prompt[10].content, "m14");
    assert_eq!(service.store().get(&id).unwrap().messages.len(), 20);
}

#[tokio::test]
async fn given_blank_message_when_sending_then_rejected_without_storing() {
    let service = service_with(Arc::new(EchoLlmClient::default()));

    for message in ["", "   ", "\n\t"] {
        let result = service.send_message(message, None).await;
        assert!(matches!(result, Err(ChatError::InvalidInput(_))));
    }
    assert!(service.store().list_all().is_empty());
}

#[tokio::test]
async fn given_message_over_limit_when_sending_then_rejected() {
    let service = service_with(Arc::new(EchoLlmClient::default()));
    let message = "a".repeat(MAX_MESSAGE_CHARS + 1);

    let result = service.send_message(&message, None).await;

    assert!(matches!(result, Err(ChatError::InvalidInput(_))));
    assert!(service.store().list_all().is_empty());
}

#[tokio::test]
async fn given_message_at_limit_when_sending_then_accepted() {
    let service = service_with(Arc::new(EchoLlmClient::default()));
    let message = "é".repeat(MAX_MESSAGE_CHARS);

    let reply = service.send_message(&message, None).await;

    assert!(reply.is_ok());
}

#[tokio::test]
async fn given_unknown_conversation_when_sending_then_not_found() {
    let llm = Arc::new(EchoLlmClient::default());
    let service = service_with(Arc::clone(&llm));
    let id = ConversationId::from_raw("does-not-exist");

    let result = service.send_message("hello", Some(id.clone())).await;

    assert!(matches!(
        result,
        Err(ChatError::Conversation(ConversationError::NotFound(missing))) if missing == id
    ));
    assert!(llm.recorded().is_empty());
    assert!(service.store().list_all().is_empty());
}

#[tokio::test]
async fn given_failing_llm_when_sending_then_user_message_is_kept() {
    let store = Arc::new(ConversationStore::new());
    let service = ChatService::new(
        Arc::clone(&store),
        Arc::new(FailingLlmClient),
        TEST_SYSTEM_PROMPT.to_string(),
    );
    let (id, _) = store.get_or_create(None).unwrap();

    let result = service.send_message("are you there?", Some(id.clone())).await;

    assert!(matches!(result, Err(ChatError::Completion(_))));
    let messages = store.get(&id).unwrap().messages;
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].role, MessageRole::User);
    assert_eq!(messages[0].content, "are you there?");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn given_concurrent_turns_on_one_conversation_when_sending_then_roles_alternate() {
    let llm = Arc::new(EchoLlmClient::with_delay(Duration::from_millis(20)));
    let service = Arc::new(service_with(Arc::clone(&llm)));
    let id = service.send_message("start", None).await.unwrap().conversation_id;

    let handles: Vec<_> = (0..4)
        .map(|n| {
            let service = Arc::clone(&service);
            let id = id.clone();
            tokio::spawn(async move {
                service
                    .send_message(&format!("parallel {}", n), Some(id))
                    .await
            })
        })
        .collect();
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let messages = service.store().get(&id).unwrap().messages;
    assert_eq!(messages.len(), 10);
    for pair in messages.chunks(2) {
        assert_eq!(pair[0].role, MessageRole::User);
        assert_eq!(pair[1].role, MessageRole::Assistant);
        assert_eq!(pair[1].content, format!("echo: {}", pair[0].content));
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn given_two_conversations_when_sending_concurrently_then_both_complete() {
    let llm = Arc::new(EchoLlmClient::with_delay(Duration::from_millis(100)));
    let service = Arc::new(service_with(Arc::clone(&llm)));

    let started = std::time::Instant::now();
    let (a, b) = tokio::join!(
        service.send_message("alpha", None),
        service.send_message("beta", None)
    );

    assert!(a.is_ok() && b.is_ok());
    assert_ne!(a.unwrap().conversation_id, b.unwrap().conversation_id);
    assert!(started.elapsed() < Duration::from_millis(190));
}
