//! Discord event handlers - component interaction routing and payment
//! proof capture.

/// Button and select-menu routing for the ticket-channel UI
pub mod buttons;

use crate::bot::{BotData, Error};
use crate::core::{cart, order};
use crate::entities::cart::status as cart_status;
use crate::errors::Result;
use poise::serenity_prelude as serenity;
use tracing::{debug, warn};

/// Framework event hook: routes component interactions to the button
/// handler and captures payment proofs posted in ticket channels.
pub async fn handle_event(
    ctx: &serenity::Context,
    event: &serenity::FullEvent,
    _framework: poise::FrameworkContext<'_, BotData, Error>,
    data: &BotData,
) -> Result<()> {
    match event {
        serenity::FullEvent::InteractionCreate { interaction } => {
            if let Some(component) = interaction.as_message_component() {
                if let Err(error) = buttons::handle_component(ctx, data, component).await {
                    warn!(
                        custom_id = %component.data.custom_id,
                        %error,
                        "Component interaction failed"
                    );
                }
            }
        }
        serenity::FullEvent::Message { new_message } => {
            if let Err(error) = capture_payment_proof(ctx, data, new_message).await {
                warn!(channel_id = %new_message.channel_id, %error, "Payment proof capture failed");
            }
        }
        _ => {}
    }
    Ok(())
}

/// Records an attachment posted in a pending-payment ticket channel as the
/// order's payment proof and acknowledges it with a reaction.
async fn capture_payment_proof(
    ctx: &serenity::Context,
    data: &BotData,
    message: &serenity::Message,
) -> Result<()> {
    if message.author.bot || message.attachments.is_empty() {
        return Ok(());
    }

    let Some(cart_model) =
        cart::get_cart_by_channel(&data.database, &message.channel_id.to_string()).await?
    else {
        return Ok(());
    };
    if cart_model.status != cart_status::PENDING_PAYMENT {
        return Ok(());
    }

    let Some(pending) = order::get_pending_order_for_cart(&data.database, cart_model.id).await?
    else {
        return Ok(());
    };

    let proof_url = message.attachments[0].url.clone();
    order::attach_payment_proof(
        &data.database,
        pending.id,
        "attachment".to_string(),
        proof_url,
    )
    .await?;
    debug!(order_id = pending.id, "Attached payment proof");

    message
        .react(&ctx.http, serenity::ReactionType::Unicode("🧾".to_string()))
        .await?;
    Ok(())
}
