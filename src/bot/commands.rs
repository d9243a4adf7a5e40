use teloxide::utils::command::BotCommands;

pub const WELCOME_TEXT: &str =
    "Hi! 👋 Send me an Instagram or YouTube link, and I'll download the video for you.";

pub const HELP_TEXT: &str = "Send me a link to an Instagram post/reel or a YouTube video \
and I'll reply with the video file.\n\n\
Supported links: instagram.com, instagr.am, youtube.com, youtu.be\n\
Videos larger than the Telegram upload limit can't be sent.";

#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "lowercase", description = "These commands are supported:")]
pub enum Command {
    #[command(description = "show the welcome message.")]
    Start,
    #[command(description = "explain how to use the bot.")]
    Help,
}

/// Full `/help` reply: usage plus the command list
pub fn help_text() -> String {
    format!("{}\n\n{}", HELP_TEXT, Command::descriptions())
}
