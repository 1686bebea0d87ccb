use crate::{Context, Error};

/// Show the available commands, or detailed help for one command.
#[poise::command(prefix_command)]
pub async fn help(
    ctx: Context<'_>,
    #[rest] command: Option<String>,
) -> Result<(), Error> {
    poise::builtins::help(
        ctx,
        command.as_deref(),
        poise::builtins::HelpConfiguration::default(),
    )
    .await?;

    Ok(())
}
