//! CLI output formatting utilities.
//!
//! This module provides utilities for formatting CLI output including:
//! - Replay step lines
//! - JSON syntax highlighting

use colored::Colorize;

use crate::overlay::InsetNode;
use crate::scenario::StepRecord;

/// Prints one replayed step and the resulting node.
pub fn print_step(record: &StepRecord) {
    let pending = record.snapshot.pending.map_or_else(String::new, |pending| {
        format!("  pending {} #{}", pending.target, pending.token)
    });

    println!(
        "{} {}  visible {}  awake {}  preset {}{}",
        format!("[{:>6}ms]", record.at_ms).dimmed(),
        record.event.to_string().bold(),
        format_bool(record.snapshot.visible),
        format_bool(record.snapshot.awake),
        record.snapshot.active,
        pending.yellow(),
    );
    print_node(&record.node);
}

/// Prints a render node as markup.
pub fn print_node(node: &InsetNode) {
    let markup = node.to_markup();
    if node.is_visible() {
        println!("           {}", markup.cyan());
    } else {
        println!("           {}", markup.dimmed());
    }
}

/// Prints JSON with syntax highlighting.
///
/// Colors:
/// - Keys: Cyan
/// - Strings: Green
/// - Numbers: Yellow
/// - Booleans/Null: Magenta
/// - Brackets/Braces: White (default)
pub fn print_highlighted_json(value: &serde_json::Value) {
    let json_str = serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string());
    println!("{}", highlight_json(&json_str));
}

/// Colors a pretty-printed JSON string.
fn highlight_json(json: &str) -> String {
    let mut out = String::with_capacity(json.len() * 2);
    let mut in_string = false;
    let mut is_key = false;
    let mut escape_next = false;
    let mut after_colon = false;
    let mut current_token = String::new();

    for ch in json.chars() {
        if escape_next {
            current_token.push(ch);
            escape_next = false;
            continue;
        }

        if ch == '\\' && in_string {
            current_token.push(ch);
            escape_next = true;
            continue;
        }

        match ch {
            '"' if in_string => {
                current_token.push(ch);
                let colored =
                    if is_key { current_token.cyan() } else { current_token.green() };
                out.push_str(&colored.to_string());
                current_token.clear();
                in_string = false;
                is_key = false;
            }
            '"' => {
                flush_token(&mut out, &mut current_token, after_colon);
                current_token.push(ch);
                in_string = true;
                is_key = !after_colon;
                after_colon = false;
            }
            ':' if !in_string => {
                flush_token(&mut out, &mut current_token, false);
                out.push_str(&":".white().to_string());
                after_colon = true;
            }
            ',' if !in_string => {
                flush_token(&mut out, &mut current_token, after_colon);
                out.push_str(&",".white().to_string());
                after_colon = false;
            }
            '{' | '}' | '[' | ']' if !in_string => {
                flush_token(&mut out, &mut current_token, after_colon);
                out.push_str(&ch.to_string().white().bold().to_string());
                after_colon = false;
            }
            _ => current_token.push(ch),
        }
    }

    flush_token(&mut out, &mut current_token, after_colon);
    out
}

/// Appends the current token with appropriate coloring.
fn flush_token(out: &mut String, token: &mut String, is_value: bool) {
    if token.is_empty() {
        return;
    }

    if is_value && !token.trim().is_empty() {
        let start = token.find(|c: char| !c.is_whitespace()).unwrap_or(0);
        let end = token.rfind(|c: char| !c.is_whitespace()).map_or(token.len(), |i| i + 1);
        let value = &token[start..end];

        let colored = if value == "true" || value == "false" || value == "null" {
            value.magenta().to_string()
        } else if value.parse::<f64>().is_ok() {
            value.yellow().to_string()
        } else {
            value.to_string()
        };

        out.push_str(&token[..start]);
        out.push_str(&colored);
        out.push_str(&token[end..]);
    } else {
        out.push_str(token);
    }

    token.clear();
}

/// Formats a boolean as a colored string.
#[must_use]
pub fn format_bool(value: bool) -> String {
    if value {
        "✓".green().to_string()
    } else {
        "✗".red().to_string()
    }
}
