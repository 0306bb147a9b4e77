//! Built-in commands.

use shello_core::{
    CommandError, Draft, Kind,
    store::{self, THEMES_KEY},
};
use shello_proto::Request;

use super::{CommandContext, Registry};
use crate::theme::SavedThemes;

/// Registry holding every built-in command.
pub fn builtin() -> Registry {
    let mut registry = Registry::new();

    registry.register("send", "<text>...", "send a message to the current room", send);
    registry.register("forge", "<name>", "create a user and become it", forge);
    registry.register("impersonate", "<name>", "switch to an existing user", impersonate);
    registry.register("create room", "<name>...", "create a room", create_room);
    registry.register("accede", "<id|name>", "enter a room", accede);
    registry.register("roomtour", "", "list rooms", roomtour);
    registry.register("history", "", "reload the current room's messages", history);
    registry.register("whoami", "", "show who and where you are", whoami);
    registry.register("clear", "", "clear everything but incoming messages", clear);
    registry.register("clearall", "", "clear the whole screen", clear_all);
    registry.register("annihilate", "<n>", "delete your n-th most recent message", annihilate);
    registry.register("theme", "[-tc|-bg|-bc|-ob|-hv|-sc <color>]...", "show or set colors", theme);
    registry.register("theme save", "<name>", "save the current colors", theme_save);
    registry.register("theme load", "[name]", "load saved colors, or list them", theme_load);
    registry.register("help", "", "list commands", help);
    registry.register("h", "", "list commands", help);
    registry.register("exit", "", "quit", exit);

    registry
}

fn send(ctx: &mut CommandContext<'_>, args: &[String]) -> Result<(), CommandError> {
    let text = joined(args, "usage: send <text>...")?;
    let room = ctx.require_room()?;
    ctx.request(Request::Msg { text, room_id: room.id })
}

fn forge(ctx: &mut CommandContext<'_>, args: &[String]) -> Result<(), CommandError> {
    let username = single(args, "usage: forge <name>")?;
    ctx.request(Request::CreateUser { username })
}

fn impersonate(ctx: &mut CommandContext<'_>, args: &[String]) -> Result<(), CommandError> {
    let username = single(args, "usage: impersonate <name>")?;
    ctx.request(Request::LoginAs { username })
}

fn create_room(ctx: &mut CommandContext<'_>, args: &[String]) -> Result<(), CommandError> {
    let room_name = joined(args, "usage: create room <name>...")?;
    ctx.request(Request::CreateRoom { room_name })
}

fn accede(ctx: &mut CommandContext<'_>, args: &[String]) -> Result<(), CommandError> {
    let target = joined(args, "usage: accede <id|name>")?;

    let room_id = match target.parse::<u64>() {
        Ok(id) => id,
        Err(_) => {
            let matches = ctx.session.rooms().find_by_name(&target);
            match matches.as_slice() {
                [] => {
                    return Err(CommandError::bad_args(format!(
                        "no room named {target}; try `roomtour`"
                    )));
                },
                [room] => room.id,
                many => {
                    let ids: Vec<String> = many.iter().map(|room| room.id.to_string()).collect();
                    return Err(CommandError::bad_args(format!(
                        "room name {target} is ambiguous; use one of ids {}",
                        ids.join(", ")
                    )));
                },
            }
        },
    };

    ctx.request(Request::JoinRoom { room_id })
}

fn roomtour(ctx: &mut CommandContext<'_>, args: &[String]) -> Result<(), CommandError> {
    none(args, "usage: roomtour")?;
    ctx.request(Request::GetRooms)
}

fn history(ctx: &mut CommandContext<'_>, args: &[String]) -> Result<(), CommandError> {
    none(args, "usage: history")?;
    let room = ctx.require_room()?;
    ctx.request(Request::GetMessages { room_id: room.id })
}

fn whoami(ctx: &mut CommandContext<'_>, args: &[String]) -> Result<(), CommandError> {
    none(args, "usage: whoami")?;

    let username = ctx.session.identity().username.clone();
    let text = match ctx.session.current_room() {
        Some(room) => format!("You are {username} in #{} (id {}).", room.name, room.id),
        None => format!("You are {username}, not in any room."),
    };
    ctx.note(Draft::info(text));

    // Confirm server side when possible; offline the local view is enough.
    if ctx.request(Request::GetUsername).is_err() {
        tracing::debug!("whoami while offline, skipping server lookup");
    }
    Ok(())
}

fn clear(ctx: &mut CommandContext<'_>, args: &[String]) -> Result<(), CommandError> {
    none(args, "usage: clear")?;
    ctx.note(Draft::new(Kind::Clear, ""));
    Ok(())
}

fn clear_all(ctx: &mut CommandContext<'_>, args: &[String]) -> Result<(), CommandError> {
    none(args, "usage: clearall")?;
    ctx.note(Draft::new(Kind::ClearAll, ""));
    Ok(())
}

fn annihilate(ctx: &mut CommandContext<'_>, args: &[String]) -> Result<(), CommandError> {
    let offset = single(args, "usage: annihilate <n>")?;
    let n = offset
        .parse::<usize>()
        .ok()
        .filter(|n| *n > 0)
        .ok_or_else(|| CommandError::bad_args("message offset must be a positive integer"))?;

    let room = ctx.require_room()?;
    let message_id = ctx.log.nth_own_message(n, &ctx.session.identity().username)?;
    ctx.request(Request::DeleteMsg { message_id, room_id: room.id })
}

fn theme(ctx: &mut CommandContext<'_>, args: &[String]) -> Result<(), CommandError> {
    if args.is_empty() {
        let text = format!("Theme: {}", ctx.theme);
        ctx.note(Draft::info(text));
        return Ok(());
    }

    ctx.theme.apply_flags(args)?;
    ctx.note(Draft::info("Theme updated."));
    Ok(())
}

fn theme_save(ctx: &mut CommandContext<'_>, args: &[String]) -> Result<(), CommandError> {
    let name = single(args, "usage: theme save <name>")?;

    let mut saved: SavedThemes = store::load_json(ctx.store, THEMES_KEY)?.unwrap_or_default();
    saved.insert(name.clone(), ctx.theme.clone());
    store::save_json(ctx.store, THEMES_KEY, &saved)?;

    ctx.note(Draft::info(format!("Saved theme {name}.")));
    Ok(())
}

fn theme_load(ctx: &mut CommandContext<'_>, args: &[String]) -> Result<(), CommandError> {
    let saved: SavedThemes = store::load_json(ctx.store, THEMES_KEY)?.unwrap_or_default();

    match args {
        [] if saved.is_empty() => ctx.note(Draft::info("No saved themes.")),
        [] => {
            let names: Vec<&str> = saved.keys().map(String::as_str).collect();
            ctx.note(Draft::info(format!("Saved themes: {}", names.join(", "))));
        },
        [name] => {
            let theme = saved
                .get(name)
                .ok_or_else(|| CommandError::bad_args(format!("no saved theme named {name}")))?;
            ctx.theme.clone_from(theme);
            ctx.note(Draft::info(format!("Loaded theme {name}.")));
        },
        _ => return Err(CommandError::bad_args("usage: theme load [name]")),
    }
    Ok(())
}

fn help(ctx: &mut CommandContext<'_>, _args: &[String]) -> Result<(), CommandError> {
    let lines: Vec<String> = ctx
        .registry
        .commands()
        .map(|spec| {
            let synopsis = if spec.usage.is_empty() {
                spec.name.to_string()
            } else {
                format!("{} {}", spec.name, spec.usage)
            };
            format!("{synopsis:<48} {}", spec.help)
        })
        .collect();

    ctx.note(Draft::info("Commands:"));
    for line in lines {
        ctx.note(Draft::info(line));
    }
    Ok(())
}

fn exit(ctx: &mut CommandContext<'_>, _args: &[String]) -> Result<(), CommandError> {
    ctx.request_quit();
    Ok(())
}

fn joined(args: &[String], usage: &str) -> Result<String, CommandError> {
    if args.is_empty() {
        return Err(CommandError::bad_args(usage));
    }
    Ok(args.join(" "))
}

fn single(args: &[String], usage: &str) -> Result<String, CommandError> {
    match args {
        [only] => Ok(only.clone()),
        _ => Err(CommandError::bad_args(usage)),
    }
}

fn none(args: &[String], usage: &str) -> Result<(), CommandError> {
    if args.is_empty() { Ok(()) } else { Err(CommandError::bad_args(usage)) }
}
