#![cfg(test)]

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use greeter_bot::{
    base::{
        config::{Config, ConfigInner},
        replies,
        types::{EventKind, InboundEvent, MessageEvent, Res, Void},
    },
    interaction::{inbound::handle_inbound_event, listeners::Listeners},
    runtime::Runtime,
    service::{
        answer::{AnswerClient, GenericAnswerClient},
        chat::{ChatClient, GenericChatClient},
    },
};
use mockall::mock;

// Mocks.

// Mock chat client for testing.

mock! {
    pub Chat {}

    #[async_trait]
    impl GenericChatClient for Chat {
        fn bot_user_id(&self) -> &str;
        fn bot_id(&self) -> Option<String>;
        async fn start(&self, listeners: Listeners) -> Void;
        async fn send_message(&self, channel_id: &str, text: &str) -> Void;
        async fn send_thread_reply(&self, channel_id: &str, thread_ts: &str, text: &str) -> Void;
    }
}

// Mock answer client for testing.

mock! {
    pub Answer {}

    #[async_trait]
    impl GenericAnswerClient for Answer {
        async fn answer(&self, query: &str, user_id: &str) -> Res<String>;
    }
}

const BOT_USER_ID: &str = "UBOT";
const BOT_ID: &str = "BBOT";

fn get_mock_chat() -> MockChat {
    let mut mock = MockChat::new();

    mock.expect_bot_user_id().return_const(BOT_USER_ID.to_string());
    mock.expect_bot_id().return_const(Some(BOT_ID.to_string()));

    mock
}

fn test_config() -> Config {
    Config::from(ConfigInner {
        slack_app_token: "xapp-test".to_string(),
        slack_bot_token: "xoxb-test".to_string(),
        greeting_keyword: replies::GREETING_KEYWORD.to_string(),
        hello_reply_template: replies::HELLO_REPLY_TEMPLATE.to_string(),
        mention_reply_template: replies::MENTION_REPLY_TEMPLATE.to_string(),
        ..Default::default()
    })
}

/// Helper function to build a runtime around a mocked chat client.
fn setup_runtime(chat: MockChat) -> Runtime {
    Runtime::with_clients(test_config(), ChatClient::new(Arc::new(chat)), None)
}

/// Helper function to build a runtime that relays mentions to a mocked answer client.
fn setup_relay_runtime(chat: MockChat, answer: MockAnswer) -> Runtime {
    Runtime::with_clients(test_config(), ChatClient::new(Arc::new(chat)), Some(AnswerClient::new(Arc::new(answer))))
}

fn event(value: serde_json::Value) -> InboundEvent {
    serde_json::from_value(value).expect("Failed to parse event")
}

#[tokio::test]
async fn test_hello_message_gets_greeting() {
    let mut chat = get_mock_chat();
    chat.expect_send_message()
        .withf(|channel_id, text| channel_id == "C1" && text == "こんにちは、<@U1>さん！")
        .times(1)
        .returning(|_, _| Ok(()));

    let runtime = setup_runtime(chat);

    let handled = runtime
        .dispatch(event(serde_json::json!({ "type": "message", "text": "hello world", "user": "U1", "channel": "C1" })))
        .await
        .unwrap();

    assert!(handled);
}

#[tokio::test]
async fn test_other_message_gets_no_reply() {
    let mut chat = get_mock_chat();
    chat.expect_send_message().never();

    let runtime = setup_runtime(chat);

    let handled = runtime
        .dispatch(event(serde_json::json!({ "type": "message", "text": "goodbye", "user": "U1", "channel": "C1" })))
        .await
        .unwrap();

    assert!(!handled);
}

#[tokio::test]
async fn test_mention_gets_offer_to_help() {
    let mut chat = get_mock_chat();
    chat.expect_send_message()
        .withf(|channel_id, text| channel_id == "C2" && text == "はい、<@U2>さん。何かお手伝いできますか？")
        .times(1)
        .returning(|_, _| Ok(()));
    chat.expect_send_thread_reply().never();

    let runtime = setup_runtime(chat);

    let handled = runtime.dispatch(event(serde_json::json!({ "type": "app_mention", "user": "U2", "channel": "C2" }))).await.unwrap();

    assert!(handled);
}

#[tokio::test]
async fn test_mention_containing_hello_gets_only_mention_reply() {
    let mut chat = get_mock_chat();
    chat.expect_send_message()
        .withf(|channel_id, text| channel_id == "C2" && text == "はい、<@U2>さん。何かお手伝いできますか？")
        .times(1)
        .returning(|_, _| Ok(()));

    let runtime = setup_runtime(chat);

    let handled = runtime
        .dispatch(event(serde_json::json!({ "type": "app_mention", "user": "U2", "channel": "C2", "text": "<@UBOT> hello" })))
        .await
        .unwrap();

    assert!(handled);
}

#[tokio::test]
async fn test_keyword_inside_another_word_still_matches() {
    let mut chat = get_mock_chat();
    chat.expect_send_message().times(1).returning(|_, _| Ok(()));

    let runtime = setup_runtime(chat);

    let handled = runtime
        .dispatch(event(serde_json::json!({ "type": "message", "text": "hellooo!", "user": "U1", "channel": "C1" })))
        .await
        .unwrap();

    assert!(handled);
}

#[tokio::test]
async fn test_keyword_is_case_sensitive() {
    let mut chat = get_mock_chat();
    chat.expect_send_message().never();

    let runtime = setup_runtime(chat);

    let handled = runtime
        .dispatch(event(serde_json::json!({ "type": "message", "text": "Hello there", "user": "U1", "channel": "C1" })))
        .await
        .unwrap();

    assert!(!handled);
}

#[tokio::test]
async fn test_edited_message_is_ignored() {
    let mut chat = get_mock_chat();
    chat.expect_send_message().never();

    let runtime = setup_runtime(chat);

    let handled = runtime
        .dispatch(event(serde_json::json!({ "type": "message", "subtype": "message_changed", "text": "hello", "user": "U1", "channel": "C1" })))
        .await
        .unwrap();

    assert!(!handled);
}

#[tokio::test]
async fn test_own_messages_are_ignored() {
    let mut chat = get_mock_chat();
    chat.expect_send_message().never();

    let runtime = setup_runtime(chat);

    let handled = runtime
        .dispatch(event(serde_json::json!({ "type": "message", "text": "hello", "user": BOT_USER_ID, "channel": "C1" })))
        .await
        .unwrap();

    assert!(!handled);
}

#[tokio::test]
async fn test_own_bot_messages_are_ignored() {
    let mut chat = get_mock_chat();
    chat.expect_send_message().never();

    let runtime = setup_runtime(chat);

    let handled = runtime
        .dispatch(event(serde_json::json!({ "type": "message", "subtype": "bot_message", "bot_id": BOT_ID, "text": "hello", "channel": "C1" })))
        .await
        .unwrap();

    assert!(!handled);
}

#[tokio::test]
async fn test_hello_without_user_fails_for_that_event_only() {
    let mut chat = get_mock_chat();
    chat.expect_send_message()
        .withf(|channel_id, text| channel_id == "C1" && text == "こんにちは、<@U1>さん！")
        .times(1)
        .returning(|_, _| Ok(()));

    let runtime = setup_runtime(chat);

    let anonymous = InboundEvent::Message(MessageEvent {
        user_id: None,
        text: "hello".to_string(),
        channel: "C1".to_string(),
        subtype: Some("bot_message".to_string()),
        bot_id: Some("B1".to_string()),
        ..Default::default()
    });

    assert!(runtime.dispatch(anonymous).await.is_err());

    // The next event is unaffected.
    let handled = runtime
        .dispatch(event(serde_json::json!({ "type": "message", "text": "hello", "user": "U1", "channel": "C1" })))
        .await
        .unwrap();

    assert!(handled);
}

#[tokio::test]
async fn test_send_failure_is_reported() {
    let mut chat = get_mock_chat();
    chat.expect_send_message().times(1).returning(|_, _| Err(anyhow::anyhow!("channel_not_found")));

    let runtime = setup_runtime(chat);

    let result = runtime.dispatch(event(serde_json::json!({ "type": "app_mention", "user": "U2", "channel": "C404" }))).await;

    assert!(result.unwrap_err().to_string().contains("channel_not_found"));
}

#[tokio::test]
async fn test_first_matching_listener_wins() {
    let order = Arc::new(std::sync::Mutex::new(Vec::new()));

    let mut listeners = Listeners::new();

    let first = order.clone();
    listeners.event(EventKind::Message, move |_, say| {
        let first = first.clone();
        async move {
            first.lock().unwrap().push("any message");
            say.say("hi").await
        }
    });

    let second = order.clone();
    listeners.message("hello", move |_, _| {
        let second = second.clone();
        async move {
            second.lock().unwrap().push("hello");
            Ok(())
        }
    });

    let mut chat = get_mock_chat();
    chat.expect_send_message().withf(|channel_id, text| channel_id == "C1" && text == "hi").times(1).returning(|_, _| Ok(()));
    let chat = ChatClient::new(Arc::new(chat));

    let handled = listeners
        .dispatch(event(serde_json::json!({ "type": "message", "text": "hello", "user": "U1", "channel": "C1" })), &chat)
        .await
        .unwrap();

    assert!(handled);
    assert_eq!(*order.lock().unwrap(), vec!["any message"]);
}

#[tokio::test]
async fn test_inbound_event_is_dispatched_in_the_background() {
    let (tx, rx) = tokio::sync::oneshot::channel::<String>();
    let tx = std::sync::Mutex::new(Some(tx));

    let mut chat = get_mock_chat();
    chat.expect_send_message().times(1).returning(move |_, text| {
        if let Some(tx) = tx.lock().unwrap().take() {
            let _ = tx.send(text.to_string());
        }
        Ok(())
    });

    let runtime = setup_runtime(chat);

    handle_inbound_event(
        event(serde_json::json!({ "type": "message", "text": "hello", "user": "U1", "channel": "C1" })),
        runtime.listeners.clone(),
        runtime.chat.clone(),
    );

    let sent = tokio::time::timeout(Duration::from_secs(5), rx).await.expect("Timed out waiting for the reply").unwrap();

    assert_eq!(sent, "こんにちは、<@U1>さん！");
}

#[tokio::test]
async fn test_relayed_mention_gets_answer_in_thread() {
    let mut answer = MockAnswer::new();
    answer
        .expect_answer()
        .withf(|query, user_id| query == "what is Rust?" && user_id == "U2")
        .times(1)
        .returning(|_, _| Ok("A programming language.".to_string()));

    let mut chat = get_mock_chat();
    chat.expect_send_thread_reply()
        .withf(|channel_id, thread_ts, text| channel_id == "C2" && thread_ts == "1700000000.000100" && text == "A programming language.")
        .times(1)
        .returning(|_, _, _| Ok(()));
    chat.expect_send_message().never();

    let runtime = setup_relay_runtime(chat, answer);

    let handled = runtime
        .dispatch(event(serde_json::json!({
            "type": "app_mention",
            "user": "U2",
            "channel": "C2",
            "ts": "1700000000.000100",
            "text": "<@UBOT> what is Rust?",
        })))
        .await
        .unwrap();

    assert!(handled);
}

#[tokio::test]
async fn test_relayed_mention_strips_every_bot_mention() {
    let mut answer = MockAnswer::new();
    answer.expect_answer().withf(|query, _| query == "ping , pong").times(1).returning(|_, _| Ok("ok".to_string()));

    let mut chat = get_mock_chat();
    chat.expect_send_thread_reply().times(1).returning(|_, _, _| Ok(()));

    let runtime = setup_relay_runtime(chat, answer);

    runtime
        .dispatch(event(serde_json::json!({
            "type": "app_mention",
            "user": "U2",
            "channel": "C2",
            "ts": "1700000000.000200",
            "text": "  ping <@UBOT>, pong <@UBOT>  ",
        })))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_relayed_mention_falls_back_when_answer_fails() {
    let mut answer = MockAnswer::new();
    answer.expect_answer().times(1).returning(|_, _| Err(anyhow::anyhow!("503 Service Unavailable")));

    let mut chat = get_mock_chat();
    chat.expect_send_thread_reply()
        .withf(|channel_id, thread_ts, text| channel_id == "C2" && thread_ts == "1700000000.000300" && text == replies::ANSWER_FALLBACK_REPLY)
        .times(1)
        .returning(|_, _, _| Ok(()));

    let runtime = setup_relay_runtime(chat, answer);

    let handled = runtime
        .dispatch(event(serde_json::json!({
            "type": "app_mention",
            "user": "U2",
            "channel": "C2",
            "ts": "1700000000.000300",
            "text": "<@UBOT> are you there?",
        })))
        .await
        .unwrap();

    assert!(handled);
}

#[tokio::test]
async fn test_relay_leaves_hello_listener_unchanged() {
    let mut answer = MockAnswer::new();
    answer.expect_answer().never();

    let mut chat = get_mock_chat();
    chat.expect_send_message()
        .withf(|channel_id, text| channel_id == "C1" && text == "こんにちは、<@U1>さん！")
        .times(1)
        .returning(|_, _| Ok(()));

    let runtime = setup_relay_runtime(chat, answer);

    let handled = runtime
        .dispatch(event(serde_json::json!({ "type": "message", "text": "hello", "user": "U1", "channel": "C1" })))
        .await
        .unwrap();

    assert!(handled);
}

#[tokio::test]
async fn test_start_hands_listeners_to_chat_client() {
    let mut chat = get_mock_chat();
    chat.expect_start().withf(|listeners| listeners.len() == 2).times(1).returning(|_| Ok(()));

    let runtime = setup_runtime(chat);

    runtime.start().await.unwrap();
}
