//! Command dispatch table.
//!
//! Maps a command name, or a two-word `"<command> <subcommand>"` name, to a
//! handler. Resolution tries the two-word form first whenever arguments are
//! present, so a registered subcommand always wins over the bare command.
//!
//! # Naming constraint
//!
//! A bare command must not take, as its first argument, a word that is also
//! registered as a subcommand qualifier of the same command: `theme save`
//! being registered means `theme` can never receive `save` as a plain
//! argument. Register names with that in mind; the table does not detect it.

use std::collections::BTreeMap;

use shello_core::CommandError;

use super::CommandContext;

/// Command handler. Runs to completion; never waits for a server reply.
pub type Handler = fn(&mut CommandContext<'_>, &[String]) -> Result<(), CommandError>;

/// Registered command.
#[derive(Debug, Clone)]
pub struct CommandSpec {
    /// Full name, one or two words.
    pub name: &'static str,
    /// Argument synopsis.
    pub usage: &'static str,
    /// One-line description.
    pub help: &'static str,
    handler: Handler,
}

/// Resolved dispatch target.
#[derive(Debug)]
pub struct Resolved<'r, 'a> {
    /// The matched command.
    pub spec: &'r CommandSpec,
    /// Arguments left for the handler.
    pub args: &'a [String],
}

/// Command registry.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    commands: BTreeMap<&'static str, CommandSpec>,
}

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` under `name`. A later registration of the same name
    /// replaces the earlier one.
    pub fn register(
        &mut self,
        name: &'static str,
        usage: &'static str,
        help: &'static str,
        handler: Handler,
    ) {
        if self.commands.insert(name, CommandSpec { name, usage, help, handler }).is_some() {
            tracing::warn!(command = name, "command registered twice");
        }
    }

    /// Find the handler for `command` and the arguments it receives.
    ///
    /// # Errors
    ///
    /// - `CommandError::UnknownCommand` if neither the two-word nor the bare
    ///   form is registered
    pub fn resolve<'r, 'a>(
        &'r self,
        command: &str,
        args: &'a [String],
    ) -> Result<Resolved<'r, 'a>, CommandError> {
        if let Some((first, rest)) = args.split_first() {
            let qualified = format!("{command} {first}");
            if let Some(spec) = self.commands.get(qualified.as_str()) {
                return Ok(Resolved { spec, args: rest });
            }
        }

        self.commands
            .get(command)
            .map(|spec| Resolved { spec, args })
            .ok_or_else(|| CommandError::UnknownCommand(command.to_string()))
    }

    /// Resolve and run a command.
    ///
    /// # Errors
    ///
    /// - `CommandError::UnknownCommand` if nothing matches
    /// - whatever the handler returns
    pub fn dispatch(
        &self,
        command: &str,
        args: &[String],
        ctx: &mut CommandContext<'_>,
    ) -> Result<(), CommandError> {
        let resolved = self.resolve(command, args)?;
        tracing::debug!(command = resolved.spec.name, args = resolved.args.len(), "dispatching");
        (resolved.spec.handler)(ctx, resolved.args)
    }

    /// Registered commands in name order.
    pub fn commands(&self) -> impl Iterator<Item = &CommandSpec> {
        self.commands.values()
    }
}
