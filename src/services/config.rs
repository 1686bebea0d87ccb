use anyhow::Context as _;
use poise::serenity_prelude as serenity;
use serde::Deserialize;
use std::path::Path;

fn default_prefix() -> String {
    "-".to_string()
}

#[derive(Debug, Deserialize)]
struct RawConfig {
    staff_role_id: u64,
    reset_authority_id: u64,
    #[serde(default = "default_prefix")]
    prefix: String,
    #[serde(default)]
    log_level: Option<String>,
}

/// Bot configuration, loaded once at startup from a TOML file.
///
/// Secrets (`DISCORD_TOKEN`, `DATABASE_URL`) stay in the environment.
#[derive(Debug)]
pub struct BotConfig {
    /// Role whose holders accrue and may view invite credit.
    pub staff_role_id: serenity::RoleId,
    /// Sole account permitted to zero the weekly counters.
    pub reset_authority_id: serenity::UserId,
    /// Text command prefix.
    pub prefix: String,
    /// Tracing filter directive, e.g. "invite_ledger=debug".
    pub log_level: Option<String>,
}

impl BotConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::from_toml(&raw).with_context(|| format!("failed to parse {}", path.display()))
    }

    fn from_toml(raw: &str) -> anyhow::Result<Self> {
        let raw: RawConfig = toml::from_str(raw)?;
        anyhow::ensure!(raw.staff_role_id != 0, "staff_role_id must be set");
        anyhow::ensure!(raw.reset_authority_id != 0, "reset_authority_id must be set");

        Ok(Self {
            staff_role_id: serenity::RoleId::new(raw.staff_role_id),
            reset_authority_id: serenity::UserId::new(raw.reset_authority_id),
            prefix: raw.prefix,
            log_level: raw.log_level,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_config() {
        let config = BotConfig::from_toml(
            r#"
            staff_role_id = 123456789012345678
            reset_authority_id = 987654321098765432
            prefix = "!"
            log_level = "debug"
            "#,
        )
        .unwrap();

        assert_eq!(config.staff_role_id.get(), 123456789012345678);
        assert_eq!(config.reset_authority_id.get(), 987654321098765432);
        assert_eq!(config.prefix, "!");
        assert_eq!(config.log_level.as_deref(), Some("debug"));
    }

    #[test]
    fn prefix_defaults_to_dash() {
        let config = BotConfig::from_toml(
            r#"
            staff_role_id = 1
            reset_authority_id = 2
            "#,
        )
        .unwrap();

        assert_eq!(config.prefix, "-");
        assert!(config.log_level.is_none());
    }

    #[test]
    fn zero_ids_are_rejected() {
        assert!(BotConfig::from_toml(
            r#"
            staff_role_id = 0
            reset_authority_id = 2
            "#,
        )
        .is_err());
    }
}
