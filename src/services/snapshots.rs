use dashmap::DashMap;
use poise::serenity_prelude as serenity;

/// One observed invite: its code, its creator, and the use count at the time
/// of observation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InviteUse {
    pub code: String,
    pub inviter_id: Option<serenity::UserId>,
    pub uses: u64,
}

impl From<&serenity::RichInvite> for InviteUse {
    fn from(invite: &serenity::RichInvite) -> Self {
        Self {
            code: invite.code.clone(),
            inviter_id: invite.inviter.as_ref().map(|user| user.id),
            uses: invite.uses,
        }
    }
}

/// Per-guild cache of the invite list as of the last observation.
///
/// This is the only process-wide mutable state. It is never persisted; it is
/// rebuilt from the live guild state after every restart.
#[derive(Debug, Default)]
pub struct InviteSnapshotService {
    snapshots: DashMap<serenity::GuildId, Vec<InviteUse>>,
}

impl InviteSnapshotService {
    pub fn new() -> Self {
        Self {
            snapshots: DashMap::new(),
        }
    }

    /// The snapshot recorded for a guild, empty if none has been taken yet.
    pub fn get(&self, guild_id: serenity::GuildId) -> Vec<InviteUse> {
        self.snapshots
            .get(&guild_id)
            .map(|entry| entry.clone())
            .unwrap_or_default()
    }

    /// Replace a guild's snapshot wholesale.
    pub fn replace(&self, guild_id: serenity::GuildId, invites: Vec<InviteUse>) {
        self.snapshots.insert(guild_id, invites);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_guild_yields_empty_snapshot() {
        let service = InviteSnapshotService::new();
        assert!(service.get(serenity::GuildId::new(1)).is_empty());
    }

    #[test]
    fn replace_overwrites_previous_snapshot() {
        let service = InviteSnapshotService::new();
        let guild = serenity::GuildId::new(1);

        let first = vec![InviteUse {
            code: "alpha".to_string(),
            inviter_id: Some(serenity::UserId::new(10)),
            uses: 3,
        }];
        service.replace(guild, first.clone());
        assert_eq!(service.get(guild), first);

        let second = vec![InviteUse {
            code: "beta".to_string(),
            inviter_id: None,
            uses: 1,
        }];
        service.replace(guild, second.clone());
        assert_eq!(service.get(guild), second);
    }
}
