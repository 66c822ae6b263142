//! Bot update webhook handler
//!
//! Every update is answered with a `sendMessage` call in the response body.
//! Use-case failures are logged and answered with a generic apology so the
//! platform does not redeliver the update.

use application::{ApplicationError, parse_referral_param};
use axum::{
    Extension, Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use domain::{RateLimitAction, SubjectId};
use tracing::{debug, error, info, instrument};

use crate::{
    error::ApiError,
    messages,
    middleware::RemainingRequests,
    reply::BotReply,
    state::AppState,
    update::Update,
};

/// Handle one inbound update
#[instrument(skip_all)]
pub async fn handle_update(
    State(state): State<AppState>,
    remaining: Option<Extension<RemainingRequests>>,
    Json(update): Json<Update>,
) -> Result<Response, ApiError> {
    let Some(raw_id) = update.sender_id() else {
        debug!(update_id = update.update_id, "Ignoring update without sender");
        return Ok(StatusCode::OK.into_response());
    };
    let subject = SubjectId::from_signed(raw_id)?;
    let chat_id = update.chat_id().unwrap_or(raw_id);

    if let Some(Extension(RemainingRequests(left))) = remaining {
        debug!(%subject, ?left, "Rate-limit allowance");
    }

    let reply = if let Some(callback) = &update.callback_query {
        handle_callback(&state, subject, chat_id, callback.data.as_deref()).await
    } else {
        let text = update.message.as_ref().and_then(|m| m.text.as_deref());
        match (text, RateLimitAction::classify_text(text)) {
            (Some(text), RateLimitAction::Start) => {
                let param = text.split_whitespace().nth(1);
                handle_start(&state, subject, chat_id, param).await
            },
            (Some(text), _) => handle_question(&state, subject, chat_id, text).await,
            (None, _) => BotReply::text(chat_id, messages::TEXT_ONLY),
        }
    };

    Ok(Json(reply).into_response())
}

fn failure(chat_id: i64, err: &ApplicationError) -> BotReply {
    error!(error = %err, "Update handling failed");
    BotReply::text(chat_id, messages::ERROR_OCCURRED)
}

async fn handle_start(
    state: &AppState,
    subject: SubjectId,
    chat_id: i64,
    param: Option<&str>,
) -> BotReply {
    let ensured = match state.users.get_or_create(subject).await {
        Ok(ensured) => ensured,
        Err(e) => return failure(chat_id, &e),
    };
    let mut balance = ensured.account.balance();
    let mut text = String::new();

    let referrer = param.and_then(parse_referral_param);
    if let (true, Some(referrer)) = (ensured.created, referrer) {
        if state.users.process_referral(subject, referrer).await {
            text.push_str(&messages::referral_bonus(state.referral_bonus));
            text.push_str("\n\n");
        }
        // the referral invalidated the cached account
        if let Ok(refreshed) = state.users.get_or_create(subject).await {
            balance = refreshed.account.balance();
        }
    }

    if ensured.created {
        info!(%subject, balance, "New user started the bot");
    }
    text.push_str(&messages::welcome(balance));
    BotReply::text(chat_id, text).with_keyboard(messages::main_menu_keyboard())
}

async fn handle_question(
    state: &AppState,
    subject: SubjectId,
    chat_id: i64,
    question: &str,
) -> BotReply {
    let account = match state.users.get_or_create(subject).await {
        Ok(ensured) => ensured.account,
        Err(e) => return failure(chat_id, &e),
    };

    if !state.users.can_send_message(subject).await {
        return BotReply::text(chat_id, messages::NO_MESSAGES)
            .with_keyboard(messages::buy_messages_keyboard());
    }

    let reading = match state
        .readings
        .create_reading(account.settings().deck, question)
        .await
    {
        Ok(reading) => reading,
        Err(ApplicationError::Domain(e)) => {
            debug!(%subject, error = %e, "Question rejected");
            return BotReply::text(chat_id, messages::invalid_question(&e.to_string()));
        },
        Err(e) => return failure(chat_id, &e),
    };

    let spent = state.users.consume_message(subject).await;
    let left = if spent {
        account.balance().saturating_sub(1)
    } else {
        account.balance()
    };
    let reading = reading.with_remaining(left);
    info!(%subject, card = %reading.card, remaining = left, "Reading delivered");

    BotReply::text(chat_id, messages::reading(&reading))
}

async fn handle_callback(
    state: &AppState,
    subject: SubjectId,
    chat_id: i64,
    data: Option<&str>,
) -> BotReply {
    match data {
        Some(messages::CALLBACK_BUY_MESSAGES) => {
            BotReply::text(chat_id, messages::BUY_MESSAGES_TEXT)
                .with_keyboard(messages::buy_messages_keyboard())
        },
        Some(messages::CALLBACK_INVITE_FRIEND) => {
            let link = state.users.referral_link(subject);
            BotReply::text(chat_id, messages::invite(&link, state.referral_bonus))
                .with_keyboard(messages::invite_keyboard(&link))
        },
        Some(messages::CALLBACK_BACK_TO_MENU) => match state.users.get_or_create(subject).await {
            Ok(ensured) => BotReply::text(chat_id, messages::main_menu(ensured.account.balance()))
                .with_keyboard(messages::main_menu_keyboard()),
            Err(e) => failure(chat_id, &e),
        },
        other => {
            debug!(%subject, data = ?other, "Unknown callback");
            BotReply::text(chat_id, messages::UNKNOWN_ACTION)
        },
    }
}
