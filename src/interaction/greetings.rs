//! The greeting listeners.
//!
//! - A posted message containing the greeting keyword gets a hello reply.
//! - A mention of the bot gets an offer to help, or, when an answer service is
//!   configured, the service's answer to the mention in the mention's thread.

use std::sync::Arc;

use crate::{base::replies, prelude::*, service::answer::AnswerClient};

/// Builds the listener set from the configuration.
pub fn listeners(config: &Config, answer: Option<AnswerClient>) -> Listeners {
    let mut listeners = Listeners::new();
    register(&mut listeners, config, answer);
    listeners
}

/// Registers the hello and mention listeners, in that order.
pub fn register(listeners: &mut Listeners, config: &Config, answer: Option<AnswerClient>) {
    let hello_template: Arc<str> = config.hello_reply_template.as_str().into();

    listeners.message(config.greeting_keyword.clone(), move |event, say| message_hello(event, say, hello_template.clone()));

    match answer {
        Some(answer) => {
            listeners.event(EventKind::AppMention, move |event, say| relay_mention(event, say, answer.clone()));
        }
        None => {
            let mention_template: Arc<str> = config.mention_reply_template.as_str().into();
            listeners.event(EventKind::AppMention, move |event, say| handle_mention(event, say, mention_template.clone()));
        }
    }
}

/// Greets the author of a message that said hello.
#[instrument(skip_all)]
async fn message_hello(event: InboundEvent, say: Say, template: Arc<str>) -> Void {
    let reply = replies::render(&template, event.user_id())?;

    info!("Greeting user in {} ...", say.channel_id());

    say.say(&reply).await
}

/// Answers a mention of the bot.
#[instrument(skip_all)]
async fn handle_mention(event: InboundEvent, say: Say, template: Arc<str>) -> Void {
    let reply = replies::render(&template, event.user_id())?;

    info!("Answering mention in {} ...", say.channel_id());

    say.say(&reply).await
}

/// Relays a mention of the bot to the answer service and replies in the mention's thread.
///
/// Any failure of the service is answered with a fixed apology instead.
#[instrument(skip_all)]
async fn relay_mention(event: InboundEvent, say: Say, answer: AnswerClient) -> Void {
    let user_id = event.user_id().filter(|u| !u.is_empty()).ok_or(anyhow!("Event carries no user ID to address."))?;
    let query = replies::strip_mention(event.text(), say.bot_user_id());

    info!("Relaying mention in {} ...", say.channel_id());

    let reply = answer.answer(&query, user_id).await.unwrap_or_else(|err| {
        warn!("Answer service failed: {}", err);
        replies::ANSWER_FALLBACK_REPLY.to_string()
    });

    say.reply_in_thread(&reply).await
}
