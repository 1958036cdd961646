//! Plain-text rendering of view models and admin records.

use std::fmt::Write;

use kubechat_api::{ActivityLog, ApiKey, Kubeconfig, User};
use kubechat_chat::{Message, Role, ViewModel};

pub fn session_list(view: &ViewModel) -> String {
    let mut out = String::new();
    for (index, session) in view.sessions.iter().enumerate() {
        let marker = if view.active_session_id.as_deref() == Some(session.id.as_str()) {
            '*'
        } else {
            ' '
        };
        let _ = writeln!(
            out,
            "{marker} {:>2}. {}  [{} messages, {}]",
            index + 1,
            session.display_title(),
            session.message_count,
            session.last_activity.format("%Y-%m-%d %H:%M"),
        );
    }
    out
}

pub fn message(message: &Message) -> String {
    let speaker = match (message.role, message.is_error) {
        (Role::User, _) => "you",
        (Role::Assistant, false) => "assistant",
        (Role::Assistant, true) => "assistant (error)",
    };
    let mut out = format!("{speaker}> {}", message.content);
    for command in &message.commands_executed {
        let _ = write!(out, "\n    $ {command}");
    }
    out
}

pub fn conversation(view: &ViewModel) -> String {
    let title = view
        .active_session()
        .map(|s| s.display_title())
        .unwrap_or_default();
    let mut out = format!("== {title} ==\n");
    if view.messages.is_empty() {
        out.push_str("(no messages yet)\n");
    }
    for m in &view.messages {
        out.push_str(&message(m));
        out.push('\n');
    }
    out
}

pub fn users(users: &[User]) -> String {
    let mut out = format!("{:<6}{:<20}{:<30}{:<8}{}\n", "ID", "USERNAME", "EMAIL", "ROLE", "STATUS");
    for u in users {
        let status = if u.is_banned { "banned" } else { "active" };
        let _ = writeln!(
            out,
            "{:<6}{:<20}{:<30}{:<8}{}",
            u.id, u.username, u.email, u.role, status
        );
    }
    out
}

pub fn activity(logs: &[ActivityLog]) -> String {
    let mut out = String::new();
    for log in logs {
        let who = log.username.as_deref().unwrap_or("?");
        let outcome = match log.success {
            Some(true) => "ok",
            Some(false) => "failed",
            None => "-",
        };
        let _ = write!(
            out,
            "{}  {who:<16} {:<14} {outcome}",
            log.timestamp, log.action_type
        );
        if let Some(command) = &log.command {
            let _ = write!(out, "  {command}");
        }
        if let Some(error) = &log.error_message {
            let _ = write!(out, "  ({error})");
        }
        out.push('\n');
    }
    out
}

pub fn kubeconfigs(configs: &[Kubeconfig]) -> String {
    let mut out = String::new();
    for c in configs {
        let active = if c.is_active { '*' } else { ' ' };
        let _ = write!(out, "{active} {:<6}{}", c.id, c.name);
        if let Some(description) = &c.description {
            let _ = write!(out, "  - {description}");
        }
        out.push('\n');
    }
    out
}

pub fn api_keys(keys: &[ApiKey]) -> String {
    let mut out = String::new();
    for k in keys {
        let active = if k.is_active { '*' } else { ' ' };
        let _ = writeln!(
            out,
            "{active} {:<6}{:<24}{:<14}{}",
            k.id,
            k.name,
            k.provider.as_deref().unwrap_or("-"),
            k.masked_key.as_deref().unwrap_or("")
        );
    }
    out
}
