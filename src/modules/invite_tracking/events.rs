use crate::modules::invite_tracking::{store, tracking};
use crate::{Data, Error};
use poise::serenity_prelude as serenity;

pub fn handler<'a>(
    ctx: &'a serenity::Context,
    event: &'a serenity::FullEvent,
    data: &'a Data,
) -> poise::BoxFuture<'a, Result<(), Error>> {
    Box::pin(async move { handle_event(ctx, event, data).await })
}

async fn handle_event(
    ctx: &serenity::Context,
    event: &serenity::FullEvent,
    data: &Data,
) -> Result<(), Error> {
    match event {
        serenity::FullEvent::CacheReady { guilds } => {
            for guild_id in guilds {
                tracking::refresh_snapshot(ctx, *guild_id, data).await?;
            }
            tracing::info!("Primed invite snapshots for {} guilds", guilds.len());
        }
        serenity::FullEvent::GuildCreate { guild, .. } => {
            // Covers guilds joined after startup and guilds that became
            // available late.
            tracking::refresh_snapshot(ctx, guild.id, data).await?;
            tracing::debug!("Refreshed invite snapshot for guild {}", guild.id);
        }
        serenity::FullEvent::InviteCreate { data: invite } => {
            handle_invite_change(ctx, invite.guild_id, &invite.code, data).await?;
        }
        serenity::FullEvent::InviteDelete { data: invite } => {
            handle_invite_change(ctx, invite.guild_id, &invite.code, data).await?;
        }
        serenity::FullEvent::GuildMemberAddition { new_member } => {
            handle_member_join(ctx, new_member, data).await?;
        }
        serenity::FullEvent::GuildMemberRemoval { user, .. } => {
            handle_member_leave(user, data).await?;
        }
        _ => {}
    }

    Ok(())
}

async fn handle_invite_change(
    ctx: &serenity::Context,
    guild_id: Option<serenity::GuildId>,
    code: &str,
    data: &Data,
) -> Result<(), Error> {
    let Some(guild_id) = guild_id else {
        tracing::warn!("Invite life-cycle event without guild_id");
        return Ok(());
    };

    tracing::debug!("Invite {} changed in guild {}", code, guild_id);
    tracking::refresh_snapshot(ctx, guild_id, data).await
}

async fn handle_member_join(
    ctx: &serenity::Context,
    member: &serenity::Member,
    data: &Data,
) -> Result<(), Error> {
    let guild_id = member.guild_id;

    let before = data.invites.get(guild_id);
    let after = tracking::fetch_guild_invites(ctx, guild_id).await?;

    let used = tracking::find_used_invite(&before, &after).cloned();

    // The snapshot moves forward whether or not the diff found anything.
    data.invites.replace(guild_id, after);

    // Vanity URLs, untracked invites, and stale snapshots all end up here.
    let Some(used) = used else {
        return Ok(());
    };
    let Some(inviter_id) = used.inviter_id else {
        return Ok(());
    };

    // Only invites created by current guild members holding the staff role
    // accrue credit.
    let Ok(inviter) = guild_id.member(&ctx.http, inviter_id).await else {
        return Ok(());
    };
    if !inviter.roles.contains(&data.config.staff_role_id) {
        return Ok(());
    }

    store::attribute_join(
        &data.db,
        inviter_id.get() as i64,
        member.user.id.get() as i64,
    )
    .await?;

    tracing::info!(
        guild = guild_id.get(),
        member = member.user.id.get(),
        inviter = inviter_id.get(),
        code = %used.code,
        "attributed join"
    );

    Ok(())
}

async fn handle_member_leave(user: &serenity::User, data: &Data) -> Result<(), Error> {
    store::reverse_attribution(&data.db, user.id.get() as i64).await?;
    tracing::debug!("Processed leave of member {}", user.id);
    Ok(())
}
