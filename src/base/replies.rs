//! Reply templates used by the greeting listeners.
//!
//! Templates use `{user_id}` as the only placeholder; it is replaced with the
//! triggering user's Slack ID.

use anyhow::anyhow;

use super::types::Res;

/// Placeholder substituted with the triggering user's ID.
pub const USER_ID_PLACEHOLDER: &str = "{user_id}";

/// Keyword that triggers the hello listener.
pub const GREETING_KEYWORD: &str = "hello";

/// Reply sent when a message contains the greeting keyword.
pub const HELLO_REPLY_TEMPLATE: &str = "こんにちは、<@{user_id}>さん！";

/// Reply sent when the bot is mentioned.
pub const MENTION_REPLY_TEMPLATE: &str = "はい、<@{user_id}>さん。何かお手伝いできますか？";

/// Reply sent in place of an answer when the answer service fails.
pub const ANSWER_FALLBACK_REPLY: &str = "アプリに問題が発生しました";

/// Removes every mention of `bot_user_id` from `text` and trims what is left.
pub fn strip_mention(text: &str, bot_user_id: &str) -> String {
    text.replace(&format!("<@{bot_user_id}>"), "").trim().to_string()
}

/// Renders a reply template for the given user.
///
/// Fails when the user ID is missing or empty, since the reply would address nobody.
pub fn render(template: &str, user_id: Option<&str>) -> Res<String> {
    let user_id = user_id.filter(|u| !u.is_empty()).ok_or(anyhow!("Event carries no user ID to address."))?;

    Ok(template.replace(USER_ID_PLACEHOLDER, user_id))
}

// Tests.
