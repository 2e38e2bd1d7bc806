//! Shared helpers for robotext and notification rendering.

use chatsync_protocol::{RelativeUserInfo, ThreadInfo};

/// Renders a user reference for robotext.
///
/// The viewer renders as the bare word "you"; everyone else becomes an
/// entity-encoded link to their user ID.
pub fn robotext_for_user(user: &RelativeUserInfo) -> String {
    if user.is_viewer {
        "you".to_string()
    } else {
        format!("<{}|u{}>", user.display_name(), user.id)
    }
}

/// Wraps display text in an entity-encoded thread link.
pub fn encoded_thread_entity(thread_id: &str, text: &str) -> String {
    format!("<{text}|t{thread_id}>")
}

/// Flattens entity-encoded robotext to plain text.
///
/// Each `<text|ref>` segment collapses to its text half. Unpaired
/// angle brackets pass through untouched.
pub fn stripped_robotext(robotext: &str) -> String {
    let mut result = String::with_capacity(robotext.len());
    let mut rest = robotext;
    while let Some(open) = rest.find('<') {
        let Some(close) = rest[open..].find('>') else {
            break;
        };
        let entity = &rest[open + 1..open + close];
        result.push_str(&rest[..open]);
        match entity.rsplit_once('|') {
            Some((text, _)) => result.push_str(text),
            None => {
                result.push('<');
                result.push_str(entity);
                result.push('>');
            }
        }
        rest = &rest[open + close + 1..];
    }
    result.push_str(rest);
    result
}

/// Joins names the way prose lists them: "a", "a and b",
/// "a, b, and c".
pub fn join_result(items: &[String]) -> String {
    match items {
        [] => String::new(),
        [only] => only.clone(),
        [first, second] => format!("{first} and {second}"),
        [init @ .., last] => format!("{}, and {last}", init.join(", ")),
    }
}

/// The thread name to show in a notification title.
pub fn notif_thread_name(thread_info: &ThreadInfo) -> String {
    match &thread_info.name {
        Some(name) if !name.is_empty() => name.clone(),
        _ => thread_info.ui_name.clone(),
    }
}
