mod config;
mod error;
mod quiz;

use std::sync::Arc;

use dotenv::dotenv;
use log::debug;
use quiz::ai_helper::{LazyGenerator, QuestionGenerator, QuizHelper};
use quiz::pages::{dispatch, Action, Screen};
use quiz::Session;
use teloxide::{
    dispatching::dialogue::{ErasedStorage, InMemStorage, Storage},
    prelude::*,
    types::{ChatAction, KeyboardButton, KeyboardMarkup, KeyboardRemove, ParseMode},
    utils::command::BotCommands,
};

use crate::config::Config;

type QuizDialogue = Dialogue<Session, ErasedStorage<Session>>;
type HandlerResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

type SessionStorage = Arc<ErasedStorage<Session>>;
type SharedGenerator = Arc<dyn QuestionGenerator>;

#[derive(BotCommands, Clone)]
#[command(rename_rule = "lowercase", description = "These commands are supported:")]
enum Command {
    #[command(description = "show the current page again.")]
    Start,
    #[command(description = "display this text.")]
    Help,
}

#[tokio::main]
async fn main() {
    // A missing .env is fine, the variables may come from the environment.
    let dotenv_loaded = dotenv().is_ok();

    pretty_env_logger::init();
    log::info!("Starting quiz bot...");
    if !dotenv_loaded {
        debug!("No .env file found, using the process environment");
    }

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(err) => {
            log::error!("Invalid configuration: {}", err);
            std::process::exit(1);
        }
    };

    let bot = Bot::from_env();

    // Sessions live only as long as the process.
    let storage: SessionStorage = InMemStorage::<Session>::new().erase();

    // The model client is built on the first quiz request, not here.
    let model_config = config.model.clone();
    let generator: SharedGenerator = Arc::new(LazyGenerator::new(
        move || QuizHelper::connect(&model_config),
        config.max_concurrent_generations,
    ));

    Dispatcher::builder(
        bot,
        Update::filter_message()
            .enter_dialogue::<Message, ErasedStorage<Session>, Session>()
            .branch(
                dptree::entry()
                    .filter_command::<Command>()
                    .endpoint(handle_command),
            )
            .branch(dptree::endpoint(handle_message)),
    )
    .dependencies(dptree::deps![storage, generator])
    .enable_ctrlc_handler()
    .build()
    .dispatch()
    .await;
}

async fn handle_command(
    bot: Bot,
    dialogue: QuizDialogue,
    generator: SharedGenerator,
    session: Session,
    msg: Message,
    cmd: Command,
) -> HandlerResult {
    match cmd {
        Command::Help => {
            bot.send_message(msg.chat.id, Command::descriptions().to_string())
                .await?;
        }
        Command::Start => {
            advance(bot, dialogue, generator, session, msg.chat.id, Action::Show).await?;
        }
    }
    Ok(())
}

async fn handle_message(
    bot: Bot,
    dialogue: QuizDialogue,
    generator: SharedGenerator,
    session: Session,
    msg: Message,
) -> HandlerResult {
    let Some(text) = msg.text() else {
        bot.send_message(msg.chat.id, "Please reply with text or use the buttons.")
            .await?;
        return Ok(());
    };

    let action = Action::parse(session.page, text);
    if action == Action::Generate {
        // Generation can take a while; the typing hint is best effort.
        let _ = bot.send_chat_action(msg.chat.id, ChatAction::Typing).await;
    }
    debug!("chat {} on {:?}: {:?}", msg.chat.id.0, session.page, action);

    advance(bot, dialogue, generator, session, msg.chat.id, action).await
}

/// Runs one render pass for the chat and stores the updated session.
async fn advance(
    bot: Bot,
    dialogue: QuizDialogue,
    generator: SharedGenerator,
    mut session: Session,
    chat_id: ChatId,
    action: Action,
) -> HandlerResult {
    let screen = dispatch(&mut session, action, generator.as_ref()).await;
    dialogue.update(session).await?;
    send_screen(&bot, chat_id, screen).await
}

async fn send_screen(bot: &Bot, chat_id: ChatId, screen: Screen) -> HandlerResult {
    let request = bot
        .send_message(chat_id, screen.text)
        .parse_mode(ParseMode::Html);

    if screen.keyboard.is_empty() {
        request.reply_markup(KeyboardRemove::new()).await?;
        return Ok(());
    }

    let keyboard = KeyboardMarkup::new(
        screen
            .keyboard
            .into_iter()
            .map(|row| row.into_iter().map(KeyboardButton::new).collect::<Vec<_>>()),
    );
    request.reply_markup(keyboard).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commands_parse() {
        assert!(matches!(
            Command::parse("/start", "quiz_bot"),
            Ok(Command::Start)
        ));
        assert!(matches!(Command::parse("/help", "quiz_bot"), Ok(Command::Help)));
        assert!(Command::parse("/home", "quiz_bot").is_err());
    }
}
