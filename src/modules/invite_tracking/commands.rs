use crate::modules::invite_tracking::store;
use crate::{Context, Error};
use poise::serenity_prelude as serenity;

/// Show a staff member's invite counters.
#[poise::command(prefix_command, guild_only)]
pub async fn invites(
    ctx: Context<'_>,
    #[description = "Member to check (defaults to you)"] member: Option<serenity::Member>,
) -> Result<(), Error> {
    let target = match member {
        Some(member) => member,
        None => ctx
            .author_member()
            .await
            .ok_or_else(|| anyhow::anyhow!("could not resolve the invoking member"))?
            .into_owned(),
    };

    // The permission gate is on the target, not the invoker: non-staff
    // members simply have no tracked invites to show.
    if !target.roles.contains(&ctx.data().config.staff_role_id) {
        ctx.say("Only staff members have tracked invites.").await?;
        return Ok(());
    }

    let counter = store::get_counter(&ctx.data().db, target.user.id.get() as i64).await?;
    let (total, weekly) = counter
        .map(|counter| (counter.total, counter.weekly))
        .unwrap_or((0, 0));

    let embed = serenity::CreateEmbed::new()
        .title(format!("{}'s Invites", target.user.name))
        .description(format!("Total: {total} | Weekly: {weekly}"))
        .colour(serenity::Colour::BLUE);

    ctx.send(poise::CreateReply::default().embed(embed)).await?;

    Ok(())
}

/// Weekly invite leaderboard of current staff members.
#[poise::command(prefix_command, guild_only, rename = "weeklyleaderboard")]
pub async fn weekly_leaderboard(ctx: Context<'_>) -> Result<(), Error> {
    let guild_id = ctx.guild_id().unwrap();
    let data = ctx.data();

    let counters = store::all_counters(&data.db).await?;

    let mut entries = Vec::new();
    for counter in counters {
        let user_id = serenity::UserId::new(counter.user_id as u64);

        // Rows for members who left, or who lost the staff role, are
        // silently skipped.
        let Ok(member) = guild_id.member(ctx.serenity_context(), user_id).await else {
            continue;
        };
        if !member.roles.contains(&data.config.staff_role_id) {
            continue;
        }

        entries.push((member.display_name().to_string(), counter.weekly));
    }

    let ranked = rank_weekly(entries, 10);

    let mut embed = serenity::CreateEmbed::new()
        .title("Weekly Invite Leaderboard (Staff Only)")
        .colour(serenity::Colour::GOLD);

    for (rank, (name, weekly)) in ranked.iter().enumerate() {
        embed = embed.field(
            format!("#{} - {}", rank + 1, name),
            format!("{weekly} invites"),
            false,
        );
    }

    ctx.send(poise::CreateReply::default().embed(embed)).await?;

    Ok(())
}

/// Zero every weekly counter. Restricted to the configured reset authority.
#[poise::command(prefix_command, guild_only, rename = "resetweekly")]
pub async fn reset_weekly(ctx: Context<'_>) -> Result<(), Error> {
    let data = ctx.data();

    if ctx.author().id != data.config.reset_authority_id {
        ctx.say("You do not have permission to use this command.")
            .await?;
        return Ok(());
    }

    store::reset_weekly(&data.db).await?;

    ctx.say("Weekly invite counts have been reset.").await?;

    Ok(())
}

/// Order (display name, weekly count) pairs for presentation: descending by
/// count, ties keeping their incoming order, at most `limit` entries.
fn rank_weekly(mut entries: Vec<(String, i32)>, limit: usize) -> Vec<(String, i32)> {
    entries.sort_by(|a, b| b.1.cmp(&a.1));
    entries.truncate(limit);
    entries
}

pub fn commands() -> Vec<poise::Command<crate::Data, Error>> {
    vec![invites(), weekly_leaderboard(), reset_weekly()]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries(raw: &[(&str, i32)]) -> Vec<(String, i32)> {
        raw.iter()
            .map(|(name, weekly)| (name.to_string(), *weekly))
            .collect()
    }

    #[test]
    fn ranking_sorts_descending_and_keeps_tie_order() {
        let ranked = rank_weekly(
            entries(&[("a", 1), ("b", 3), ("c", 3), ("d", 2)]),
            10,
        );

        let names: Vec<&str> = ranked.iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(names, ["b", "c", "d", "a"]);
    }

    #[test]
    fn ranking_is_capped_at_limit() {
        let raw: Vec<(String, i32)> = (0..15).map(|i| (format!("user{i}"), i)).collect();

        let ranked = rank_weekly(raw, 10);
        assert_eq!(ranked.len(), 10);
        assert_eq!(ranked[0].1, 14);
    }
}
