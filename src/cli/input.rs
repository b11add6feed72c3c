use crate::sync::events::UserAction;

/// A line typed at the `sync` prompt.
#[derive(Debug, Clone, PartialEq)]
pub enum InputCommand {
    Action(UserAction),
    Show,
    Quit,
}

/// Parse one stdin line. Blank lines and `#` comments yield `Ok(None)`.
pub fn parse_line(line: &str) -> Result<Option<InputCommand>, String> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((v, r)) => (v, r.trim()),
        None => (line, ""),
    };

    let id_only = |name: &str| -> Result<String, String> {
        if rest.is_empty() || rest.contains(char::is_whitespace) {
            Err(format!("usage: {} ID", name))
        } else {
            Ok(rest.to_string())
        }
    };

    let id_and_value = |name: &str| -> Result<(String, String), String> {
        match rest.split_once(char::is_whitespace) {
            Some((id, value)) => Ok((id.to_string(), value.trim().to_string())),
            None if !rest.is_empty() => Ok((rest.to_string(), String::new())),
            None => Err(format!("usage: {} ID VALUE", name)),
        }
    };

    let command = match verb.to_lowercase().as_str() {
        "focus" => InputCommand::Action(UserAction::Focus(id_only("focus")?)),
        "blur" => InputCommand::Action(UserAction::Blur(id_only("blur")?)),
        "set" => {
            let (id, value) = id_and_value("set")?;
            InputCommand::Action(UserAction::Set { id, value })
        }
        "check" => InputCommand::Action(UserAction::Check {
            id: id_only("check")?,
            checked: true,
        }),
        "uncheck" => InputCommand::Action(UserAction::Check {
            id: id_only("uncheck")?,
            checked: false,
        }),
        "toggle" => InputCommand::Action(UserAction::Toggle(id_only("toggle")?)),
        "drag" => {
            let (id, value) = id_and_value("drag")?;
            InputCommand::Action(UserAction::Drag { id, value })
        }
        "release" => InputCommand::Action(UserAction::Release(id_only("release")?)),
        "show" => InputCommand::Show,
        "quit" | "exit" => InputCommand::Quit,
        other => return Err(format!("unknown command '{}'", other)),
    };

    Ok(Some(command))
}
