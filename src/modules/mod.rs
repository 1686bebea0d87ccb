pub mod invite_tracking;

use crate::{Data, Error};
use poise::serenity_prelude as serenity;

pub type EventHandlerFn = for<'a> fn(
    &'a serenity::Context,
    &'a serenity::FullEvent,
    &'a Data,
) -> poise::BoxFuture<'a, Result<(), Error>>;

#[derive(Debug, Clone)]
pub struct ModuleDefinition {
    pub id: &'static str,
    pub name: &'static str,
}

pub struct Module {
    pub definition: ModuleDefinition,
    pub commands: Vec<poise::Command<Data, Error>>,
    pub event_handlers: Vec<EventHandlerFn>,
}

pub fn get_modules() -> Vec<Module> {
    vec![invite_tracking::module()]
}

pub fn commands() -> Vec<poise::Command<Data, Error>> {
    let mut all_commands = vec![];

    for mut module in get_modules() {
        let category = module.definition.id;
        for command in &mut module.commands {
            command.category = Some(category.into());
        }
        all_commands.extend(module.commands);
    }

    all_commands.push(crate::services::help::help());
    all_commands
}

/// Fan a gateway event out to every module's registered handlers.
pub async fn dispatch_event(
    ctx: &serenity::Context,
    event: &serenity::FullEvent,
    data: &Data,
) -> Result<(), Error> {
    if let serenity::FullEvent::Ready { data_about_bot } = event {
        tracing::info!("Logged in as {}", data_about_bot.user.name);
    }

    for module in get_modules() {
        for handler in module.event_handlers {
            handler(ctx, event, data).await?;
        }
    }

    Ok(())
}
