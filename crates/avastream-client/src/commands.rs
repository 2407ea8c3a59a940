//! Avatar command helpers over the channel's data messages.

use std::time::{SystemTime, UNIX_EPOCH};

use avastream_core::error::Result;
use avastream_core::protocol::control::{encode_chat_frames, encode_command, AvatarParams, Command};

use crate::channel::RtcChannel;

/// Message id for commands, in the same `msg-{unix_ms}` namespace as local echoes.
pub fn next_command_id() -> String {
    let ms = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis();
    format!("msg-{ms}")
}

/// Send chat text to the avatar as one or more fragments. Returns the frame count.
pub async fn send_message_to_avatar(
    channel: &dyn RtcChannel,
    mid: &str,
    text: &str,
    max_frame_bytes: usize,
) -> Result<usize> {
    let frames = encode_chat_frames(mid, text, max_frame_bytes)?;
    let n = frames.len();
    for frame in frames {
        channel.send_stream_message(frame).await?;
    }
    tracing::debug!(mid, frames = n, "chat sent");
    Ok(n)
}

pub async fn set_avatar_params(channel: &dyn RtcChannel, params: &AvatarParams) -> Result<()> {
    let frame = encode_command(&next_command_id(), &Command::SetParams(params.clone()))?;
    channel.send_stream_message(frame).await?;
    tracing::debug!(?params, "avatar params sent");
    Ok(())
}

/// Ask the avatar to stop its current response.
pub async fn interrupt_response(channel: &dyn RtcChannel) -> Result<()> {
    let frame = encode_command(&next_command_id(), &Command::Interrupt)?;
    channel.send_stream_message(frame).await
}
