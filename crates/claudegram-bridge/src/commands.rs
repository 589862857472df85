//! Slash-command parsing.

/// Commands the bridge handles itself instead of forwarding to Claude.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BridgeCommand {
    Start,
    Help,
    Reset,
    Cd(Option<String>),
    Pwd,
    GetFile(Option<String>),
}

/// Names and descriptions advertised to the chat client's command menu.
pub const BOT_COMMANDS: &[(&str, &str)] = &[
    ("start", "Show your Telegram ID"),
    ("reset", "Start a new conversation"),
    ("cd", "Change working directory"),
    ("pwd", "Show working directory"),
    ("getfile", "Download a file"),
    ("help", "List commands"),
];

/// Reply for `/help`.
pub fn help_text() -> String {
    let mut text = String::from("Available commands:\n");
    for (name, description) in BOT_COMMANDS {
        text.push_str(&format!("\n/{name} - {description}"));
    }
    text.push_str("\n\nAny other message is sent to Claude.");
    text
}

/// Parse `text` as a bridge command.
///
/// Returns `None` for plain text and for unknown commands, which are then
/// treated as prompts.
pub fn parse_command(text: &str) -> Option<BridgeCommand> {
    let text = text.trim();
    let rest = text.strip_prefix('/')?;

    let mut parts = rest.split_whitespace();
    let head = parts.next()?;
    // The transport drops commands addressed to other bots, so any
    // `@botname` suffix left here names this one.
    let name = head.split('@').next().unwrap_or(head).to_ascii_lowercase();

    let args: Vec<&str> = parts.collect();
    let arg = (!args.is_empty()).then(|| args.join(" "));

    let command = match name.as_str() {
        "start" => BridgeCommand::Start,
        "help" => BridgeCommand::Help,
        "reset" => BridgeCommand::Reset,
        "cd" => BridgeCommand::Cd(arg),
        "pwd" => BridgeCommand::Pwd,
        "getfile" => BridgeCommand::GetFile(arg),
        _ => return None,
    };
    Some(command)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_is_not_a_command() {
        assert_eq!(parse_command("hello there"), None);
        assert_eq!(parse_command(""), None);
        assert_eq!(parse_command("/"), None);
    }

    #[test]
    fn test_simple_commands() {
        assert_eq!(parse_command("/start"), Some(BridgeCommand::Start));
        assert_eq!(parse_command("/help"), Some(BridgeCommand::Help));
        assert_eq!(parse_command("/reset"), Some(BridgeCommand::Reset));
        assert_eq!(parse_command("/pwd"), Some(BridgeCommand::Pwd));
    }

    #[test]
    fn test_cd_arguments_joined_with_single_spaces() {
        assert_eq!(
            parse_command("/cd   /home/me/My   Project "),
            Some(BridgeCommand::Cd(Some("/home/me/My Project".into())))
        );
        assert_eq!(parse_command("/cd"), Some(BridgeCommand::Cd(None)));
    }

    #[test]
    fn test_getfile_arguments() {
        assert_eq!(
            parse_command("/getfile src/main.rs"),
            Some(BridgeCommand::GetFile(Some("src/main.rs".into())))
        );
        assert_eq!(parse_command("/getfile"), Some(BridgeCommand::GetFile(None)));
    }

    #[test]
    fn test_bot_suffix_is_stripped() {
        assert_eq!(
            parse_command("/cd@my_claude_bot /tmp"),
            Some(BridgeCommand::Cd(Some("/tmp".into())))
        );
        assert_eq!(parse_command("/start@my_claude_bot"), Some(BridgeCommand::Start));
    }

    #[test]
    fn test_case_insensitive_name() {
        assert_eq!(parse_command("/PWD"), Some(BridgeCommand::Pwd));
    }

    #[test]
    fn test_unknown_command_is_a_prompt() {
        assert_eq!(parse_command("/explain this function"), None);
    }

    #[test]
    fn test_help_lists_every_command() {
        let help = help_text();
        for (name, _) in BOT_COMMANDS {
            assert!(help.contains(&format!("/{name}")), "missing /{name}");
        }
    }
}
