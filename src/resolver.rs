use crate::error::{AppError, Result};
use crate::youtube::VideoPlatform;
use tracing::{error, info, instrument};

/// Looks up the uploads playlist of `channel_id`.
///
/// # Errors
/// Returns `ChannelResolution` when the lookup fails, the channel is
/// unknown, or it exposes no uploads playlist. Nothing can be collected
/// without it, so callers treat this as fatal.
#[instrument(skip(api))]
pub async fn resolve_uploads_playlist<P>(api: &P, channel_id: &str) -> Result<String>
where
    P: VideoPlatform + ?Sized,
{
    let response = api.channel_details(channel_id).await.map_err(|e| {
        error!("Failed to fetch channel details: {}", e);
        AppError::ChannelResolution(e.to_string())
    })?;

    let channel = response.items.into_iter().next().ok_or_else(|| {
        error!("No channel found for id {}", channel_id);
        AppError::ChannelResolution(format!("no channel found for id {channel_id}"))
    })?;

    let uploads = channel
        .content_details
        .and_then(|details| details.related_playlists.uploads)
        .filter(|id| !id.is_empty())
        .ok_or_else(|| {
            error!("Channel {} has no uploads playlist", channel_id);
            AppError::ChannelResolution(format!("channel {channel_id} has no uploads playlist"))
        })?;

    info!("Resolved uploads playlist {}", uploads);
    Ok(uploads)
}
