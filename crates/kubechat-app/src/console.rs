//! Interactive chat console.
//!
//! Plain lines are sent as chat turns; lines starting with `/` are console
//! commands. A `SessionExpired` event sends the user back to sign-in and
//! reloads their sessions afterwards.

use std::sync::Arc;

use kubechat_api::{ChatInference, SessionStore};
use kubechat_chat::{ConversationManager, SendOutcome, ViewModel};
use kubechat_common::Event;
use tokio::sync::broadcast;
use tracing::{debug, warn};

use crate::context::AppContext;
use crate::error::CliError;
use crate::input::{show_prompt, Input};
use crate::render;

const HELP: &str = "\
Commands:
  /new                 start a new chat
  /list                list your chats
  /switch <n|id>       open chat number n (from /list) or by id
  /rename <title>      rename the current chat
  /delete [n|id]       delete a chat (default: the current one)
  /show                reprint the current chat
  /dismiss             clear the error message
  /logout              sign out
  /quit                leave
Anything else is sent to the assistant.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    Send(String),
    New,
    List,
    Switch(String),
    Rename(String),
    Delete(Option<String>),
    Show,
    Dismiss,
    Help,
    Logout,
    Quit,
    Unknown(String),
}

pub fn parse_command(line: &str) -> Option<ConsoleCommand> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    let Some(rest) = line.strip_prefix('/') else {
        return Some(ConsoleCommand::Send(line.to_string()));
    };
    let (name, arg) = match rest.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (rest, ""),
    };
    let arg = (!arg.is_empty()).then(|| arg.to_string());

    let command = match (name, arg) {
        ("new", _) => ConsoleCommand::New,
        ("list" | "ls", _) => ConsoleCommand::List,
        ("switch" | "open", Some(target)) => ConsoleCommand::Switch(target),
        ("rename", Some(title)) => ConsoleCommand::Rename(title),
        // Let the manager reject the blank title.
        ("rename", None) => ConsoleCommand::Rename(String::new()),
        ("delete" | "rm", target) => ConsoleCommand::Delete(target),
        ("show", _) => ConsoleCommand::Show,
        ("dismiss", _) => ConsoleCommand::Dismiss,
        ("help" | "?", _) => ConsoleCommand::Help,
        ("logout", _) => ConsoleCommand::Logout,
        ("quit" | "exit" | "q", _) => ConsoleCommand::Quit,
        _ => ConsoleCommand::Unknown(line.to_string()),
    };
    Some(command)
}

/// Resolve a `/switch` or `/delete` target: a 1-based list position or an id.
pub fn resolve_target(view: &ViewModel, target: &str) -> Option<String> {
    if let Ok(position) = target.parse::<usize>() {
        if let Some(session) = position.checked_sub(1).and_then(|i| view.sessions.get(i)) {
            return Some(session.id.clone());
        }
    }
    view.sessions
        .iter()
        .find(|s| s.id == target)
        .map(|s| s.id.clone())
}

enum Flow {
    Continue,
    SignIn,
    Logout,
    Quit,
}

enum Next {
    Line(Option<String>),
    Event(Result<Event, broadcast::error::RecvError>),
}

pub async fn run(ctx: &AppContext, input: &mut Input) -> Result<(), CliError> {
    let manager = ConversationManager::new(
        Arc::clone(&ctx.client) as Arc<dyn SessionStore>,
        Arc::clone(&ctx.client) as Arc<dyn ChatInference>,
        ctx.config.chat.clone(),
    )
    .with_events(Arc::clone(&ctx.events));
    let mut events = ctx.events.subscribe();

    loop {
        let profile = ctx.sign_in(input).await?;
        if let Err(e) = manager.initialize(profile.id).await {
            warn!(user_id = profile.id, "initialization incomplete: {e}");
        }
        // Events raised before this point belong to the previous sign-in.
        events = events.resubscribe();

        let view = manager.snapshot().await;
        print!("{}", render::session_list(&view));
        print!("{}", render::conversation(&view));
        print_banner(&view);
        println!("Type /help for commands.");

        match session_loop(&manager, input, &mut events).await? {
            Flow::SignIn => continue,
            Flow::Logout => {
                if let Err(e) = ctx.client.logout().await {
                    warn!("backend logout failed: {e}");
                }
                println!("Signed out.");
            }
            Flow::Quit | Flow::Continue => return Ok(()),
        }
    }
}

async fn session_loop(
    manager: &ConversationManager,
    input: &mut Input,
    events: &mut broadcast::Receiver<Event>,
) -> Result<Flow, CliError> {
    loop {
        show_prompt("> ")?;
        let next = tokio::select! {
            line = input.next_line() => Next::Line(line?),
            event = events.recv() => Next::Event(event),
        };
        let line = match next {
            Next::Line(Some(line)) => line,
            Next::Line(None) => return Ok(Flow::Quit),
            Next::Event(event) => match on_event(event) {
                Some(flow) => return Ok(flow),
                None => continue,
            },
        };
        let Some(command) = parse_command(&line) else {
            continue;
        };

        match handle(manager, command).await? {
            Flow::Continue => {}
            other => return Ok(other),
        }

        // A call made by the command may have hit an expired session.
        while let Ok(event) = events.try_recv() {
            if let Some(flow) = on_event(Ok(event)) {
                return Ok(flow);
            }
        }
    }
}

fn on_event(event: Result<Event, broadcast::error::RecvError>) -> Option<Flow> {
    match event {
        Ok(Event::SessionExpired { status }) => {
            println!("\nYour session has expired ({status}). Please sign in again.");
            Some(Flow::SignIn)
        }
        Ok(Event::Shutdown) => Some(Flow::Quit),
        Ok(other) => {
            debug!(?other, "console event");
            None
        }
        Err(broadcast::error::RecvError::Lagged(n)) => {
            warn!(skipped = n, "console fell behind on events");
            None
        }
        Err(broadcast::error::RecvError::Closed) => Some(Flow::Quit),
    }
}

async fn handle(manager: &ConversationManager, command: ConsoleCommand) -> Result<Flow, CliError> {
    match command {
        ConsoleCommand::Send(text) => {
            manager.set_draft(text.clone()).await;
            println!("...");
            match manager.send_message(&text).await {
                Ok(SendOutcome::Delivered { .. }) => {
                    let view = manager.snapshot().await;
                    if let Some(reply) = view.messages.last() {
                        println!("{}", render::message(reply));
                    }
                }
                Ok(SendOutcome::Ignored) => println!("(still waiting for the previous reply)"),
                Err(e) => println!("! {}", e.user_message()),
            }
        }
        ConsoleCommand::New => {
            manager.create_session().await?;
            print!("{}", render::conversation(&manager.snapshot().await));
        }
        ConsoleCommand::List => print!("{}", render::session_list(&manager.snapshot().await)),
        ConsoleCommand::Switch(target) => {
            let view = manager.snapshot().await;
            match resolve_target(&view, &target) {
                Some(id) => {
                    report(manager.switch_session(&id).await);
                    print!("{}", render::conversation(&manager.snapshot().await));
                }
                None => println!("! no chat {target:?}; see /list"),
            }
        }
        ConsoleCommand::Rename(title) => {
            let view = manager.snapshot().await;
            if let Some(id) = view.active_session_id {
                if manager.rename_session(&id, &title).await.is_ok() {
                    println!("Renamed.");
                }
                print_banner(&manager.snapshot().await);
            }
        }
        ConsoleCommand::Delete(target) => {
            let view = manager.snapshot().await;
            let id = match target {
                Some(target) => resolve_target(&view, &target),
                None => view.active_session_id.clone(),
            };
            match id {
                Some(id) => {
                    if manager.delete_session(&id).await.is_ok() {
                        println!("Deleted.");
                    }
                    let view = manager.snapshot().await;
                    print_banner(&view);
                    print!("{}", render::session_list(&view));
                }
                None => println!("! no such chat; see /list"),
            }
        }
        ConsoleCommand::Show => print!("{}", render::conversation(&manager.snapshot().await)),
        ConsoleCommand::Dismiss => manager.dismiss_error().await,
        ConsoleCommand::Help => println!("{HELP}"),
        ConsoleCommand::Logout => return Ok(Flow::Logout),
        ConsoleCommand::Quit => return Ok(Flow::Quit),
        ConsoleCommand::Unknown(line) => println!("Unknown command {line:?}. Type /help."),
    }
    Ok(Flow::Continue)
}

fn report(result: Result<(), kubechat_chat::SessionError>) {
    if let Err(e) = result {
        println!("! {}", e.user_message());
    }
}

fn print_banner(view: &ViewModel) {
    if let Some(error) = &view.error {
        println!("! {error}");
    }
}
