//! Permission and cooldown checks for the command surface.

use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Mutex;
use std::time::Duration;
use std::time::Instant;

use serenity::all::Permissions;
use serenity::all::RoleId;

use crate::bot::commands::Context;
use crate::bot::commands::Error;
use crate::bot::error::BotError;

pub async fn check_guild_permissions(
    ctx: Context<'_>,
    required_role_id: &Option<String>,
) -> Result<(), Error> {
    let member = ctx
        .author_member()
        .await
        .ok_or(BotError::GuildOnlyCommand)?;
    let permissions = {
        let guild = ctx.guild().ok_or(BotError::GuildOnlyCommand)?;
        guild.member_permissions(member.as_ref())
    };

    Ok(check_permissions_inner(
        permissions.contains(Permissions::ADMINISTRATOR)
            || permissions.contains(Permissions::MANAGE_GUILD),
        &member.roles,
        required_role_id,
    )?)
}

fn check_permissions_inner(
    is_admin: bool,
    user_roles: &[RoleId],
    required_role_id: &Option<String>,
) -> Result<(), BotError> {
    if is_admin {
        return Ok(());
    }

    if let Some(role_id_str) = required_role_id {
        if let Ok(role_id) = RoleId::from_str(role_id_str) {
            if user_roles.contains(&role_id) {
                return Ok(());
            }
        }

        return Err(BotError::PermissionDenied(format!(
            "You need the <@&{}> role to perform this action.",
            role_id_str
        )));
    }

    Err(BotError::PermissionDenied(
        "You need the `Manage Server` or `Administrator` permission or a configured role to perform this action."
            .to_string(),
    ))
}

/// Map-based per-user command cooldowns, owned by the bot state.
pub struct Cooldowns {
    duration: Duration,
    entries: Mutex<HashMap<(u64, &'static str), Instant>>,
}

impl Cooldowns {
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the remaining wait while the user is still cooling down,
    /// otherwise stamps the invocation and allows it.
    pub fn check(&self, user_id: u64, command: &'static str) -> Result<(), Duration> {
        let mut entries = self.entries.lock().unwrap();
        let now = Instant::now();

        if let Some(last) = entries.get(&(user_id, command)) {
            let elapsed = now.duration_since(*last);
            if elapsed < self.duration {
                return Err(self.duration - elapsed);
            }
        }

        entries.insert((user_id, command), now);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_permissions_admin_always_passes() {
        let result = check_permissions_inner(true, &[], &None);
        assert!(result.is_ok());
    }

    #[test]
    fn test_check_permissions_with_required_role() {
        let role_id = RoleId::new(123);
        let user_roles = vec![role_id];
        let result = check_permissions_inner(false, &user_roles, &Some("123".to_string()));
        assert!(result.is_ok());
    }

    #[test]
    fn test_check_permissions_without_required_role_fails() {
        let user_roles = vec![RoleId::new(456)];
        let result = check_permissions_inner(false, &user_roles, &Some("123".to_string()));
        assert!(result.is_err());
    }

    #[test]
    fn test_check_permissions_fails_without_any_permissions() {
        let result = check_permissions_inner(false, &[], &None);
        assert!(result.is_err());
    }

    #[test]
    fn test_cooldown_blocks_rapid_reuse() {
        let cooldowns = Cooldowns::new(Duration::from_secs(60));
        assert!(cooldowns.check(1, "managesource").is_ok());
        assert!(cooldowns.check(1, "managesource").is_err());
        // Other users and other commands are unaffected.
        assert!(cooldowns.check(2, "managesource").is_ok());
        assert!(cooldowns.check(1, "progress").is_ok());
    }

    #[test]
    fn test_cooldown_expires() {
        let cooldowns = Cooldowns::new(Duration::ZERO);
        assert!(cooldowns.check(1, "progress").is_ok());
        assert!(cooldowns.check(1, "progress").is_ok());
    }
}
