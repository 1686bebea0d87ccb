use crate::services::snapshots::InviteUse;
use crate::{Data, Error};
use poise::serenity_prelude as serenity;

/// Fetch the live invite list for a guild from the Discord API.
pub async fn fetch_guild_invites(
    ctx: &serenity::Context,
    guild_id: serenity::GuildId,
) -> Result<Vec<InviteUse>, Error> {
    let invites = guild_id.invites(&ctx.http).await?;
    Ok(invites.iter().map(InviteUse::from).collect())
}

/// Re-fetch a guild's invite list and replace its cached snapshot.
///
/// Invite creation or deletion invalidates use-count comparability for
/// arbitrary codes, so the snapshot is resynchronized wholesale rather than
/// patched.
pub async fn refresh_snapshot(
    ctx: &serenity::Context,
    guild_id: serenity::GuildId,
    data: &Data,
) -> Result<(), Error> {
    let invites = fetch_guild_invites(ctx, guild_id).await?;
    data.invites.replace(guild_id, invites);
    Ok(())
}

/// Find the invite whose use count incremented between two observations.
///
/// Scans `before` in snapshot order and takes the first code whose count
/// strictly grew. Under concurrent joins through different invites this can
/// pick the wrong one; Discord gives no per-join invite information to
/// disambiguate with.
pub fn find_used_invite<'a>(
    before: &[InviteUse],
    after: &'a [InviteUse],
) -> Option<&'a InviteUse> {
    for old in before {
        for new in after {
            if old.code == new.code && new.uses > old.uses {
                return Some(new);
            }
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn invite(code: &str, inviter: u64, uses: u64) -> InviteUse {
        InviteUse {
            code: code.to_string(),
            inviter_id: Some(serenity::UserId::new(inviter)),
            uses,
        }
    }

    #[test]
    fn detects_incremented_invite() {
        let before = vec![invite("alpha", 1, 3), invite("beta", 2, 5)];
        let after = vec![invite("alpha", 1, 4), invite("beta", 2, 5)];

        let used = find_used_invite(&before, &after).unwrap();
        assert_eq!(used.code, "alpha");
        assert_eq!(used.uses, 4);
        assert_eq!(used.inviter_id, Some(serenity::UserId::new(1)));
    }

    #[test]
    fn unchanged_counts_match_nothing() {
        let before = vec![invite("alpha", 1, 3), invite("beta", 2, 5)];
        let after = before.clone();

        assert!(find_used_invite(&before, &after).is_none());
    }

    #[test]
    fn codes_missing_from_snapshot_are_ignored() {
        // A brand-new invite with uses already at 1 is not attributable:
        // there is no before-count to compare against.
        let before = vec![invite("alpha", 1, 3)];
        let after = vec![invite("alpha", 1, 3), invite("fresh", 2, 1)];

        assert!(find_used_invite(&before, &after).is_none());
    }

    #[test]
    fn deleted_codes_are_ignored() {
        let before = vec![invite("gone", 1, 7)];
        let after = vec![];

        assert!(find_used_invite(&before, &after).is_none());
    }

    #[test]
    fn first_match_in_snapshot_order_wins() {
        let before = vec![invite("alpha", 1, 1), invite("beta", 2, 1)];
        // Both incremented; `after` deliberately lists beta first. The scan
        // order of `before` decides.
        let after = vec![invite("beta", 2, 2), invite("alpha", 1, 2)];

        let used = find_used_invite(&before, &after).unwrap();
        assert_eq!(used.code, "alpha");
    }

    #[test]
    fn decreased_count_is_not_a_use() {
        let before = vec![invite("alpha", 1, 4)];
        let after = vec![invite("alpha", 1, 3)];

        assert!(find_used_invite(&before, &after).is_none());
    }

    #[test]
    fn empty_snapshot_matches_nothing() {
        let after = vec![invite("alpha", 1, 4)];

        assert!(find_used_invite(&[], &after).is_none());
    }
}
