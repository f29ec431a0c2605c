use async_trait::async_trait;
use chatgpt::prelude::ChatGPT;
use chatgpt::types::CompletionResponse;
use log::{debug, info};
use tokio::sync::{OnceCell, Semaphore};

use crate::config::ModelConfig;
use crate::error::GenerationError;
use crate::quiz::NumQuestions;

/// Produces quiz questions from a prompt. Output is sampled, so identical
/// calls may return different text.
#[async_trait]
pub trait QuestionGenerator: Send + Sync {
    async fn generate(&self, prompt: &str, count: usize) -> Result<Vec<String>, GenerationError>;
}

pub fn question_prompt(topic: &str) -> String {
    format!("Explain the basics of {}", topic)
}

/// Generates exactly `count` questions about `topic`, or fails.
pub async fn generate_questions(
    generator: &dyn QuestionGenerator,
    topic: &str,
    count: usize,
) -> Result<Vec<String>, GenerationError> {
    let topic = topic.trim();
    if topic.is_empty() {
        return Err(GenerationError::BlankTopic);
    }
    let in_range = u8::try_from(count)
        .ok()
        .and_then(NumQuestions::new)
        .is_some();
    if !in_range {
        return Err(GenerationError::CountOutOfRange(count));
    }

    let prompt = question_prompt(topic);
    debug!("Generating {} questions for prompt {:?}", count, prompt);
    let mut questions: Vec<String> = generator
        .generate(&prompt, count)
        .await?
        .into_iter()
        .map(|q| q.trim().to_string())
        .filter(|q| !q.is_empty())
        .collect();

    if questions.is_empty() {
        return Err(GenerationError::Empty);
    }
    if questions.len() < count {
        return Err(GenerationError::Incomplete {
            expected: count,
            got: questions.len(),
        });
    }
    questions.truncate(count);
    Ok(questions)
}

pub struct QuizHelper {
    chat_gpt: ChatGPT,
}

impl QuizHelper {
    pub fn connect(config: &ModelConfig) -> Result<Self, GenerationError> {
        let mut gpt = ChatGPT::new(&config.api_key)?;

        gpt.config.engine = config.engine.clone();
        gpt.config.timeout = config.timeout;
        gpt.config.temperature = config.temperature;

        info!("Question model client ready ({:?})", config.engine);
        Ok(Self { chat_gpt: gpt })
    }
}

#[async_trait]
impl QuestionGenerator for QuizHelper {
    async fn generate(&self, prompt: &str, count: usize) -> Result<Vec<String>, GenerationError> {
        let request = format!(
            "You write short quiz questions for students.
        Study material: \"{}\".
        Write exactly {} different open questions a student could answer in a few sentences.
        Reply with one question per line and nothing else.",
            prompt, count
        );

        let response: CompletionResponse = self.chat_gpt.send_message(request).await?;
        let content = response.message().clone().content;

        debug!("Completion: {:?}", content);

        Ok(parse_questions(&content))
    }
}

fn parse_questions(content: &str) -> Vec<String> {
    content
        .lines()
        .map(strip_list_marker)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

fn strip_list_marker(line: &str) -> &str {
    let line = line.trim();
    let line = line
        .strip_prefix(['-', '*', '•'])
        .unwrap_or(line)
        .trim_start();

    // "1.", "2)", "Q3:" and the like, but not "3.5 m/s"
    let without_q = line.strip_prefix(['Q', 'q']).unwrap_or(line);
    let digits = without_q.chars().take_while(char::is_ascii_digit).count();
    if digits > 0 {
        let rest = &without_q[digits..];
        if let Some(rest) = rest.strip_prefix(['.', ')', ':']) {
            if rest.is_empty() || rest.starts_with(char::is_whitespace) {
                return rest.trim();
            }
        }
    }
    line
}

/// Holds a generator that is only built on first use and then shared.
///
/// Construction failures are not cached, so the next request tries again.
/// At most `max_concurrent` requests reach the inner generator at once.
pub struct LazyGenerator<G> {
    cell: OnceCell<G>,
    init: Box<dyn Fn() -> Result<G, GenerationError> + Send + Sync>,
    permits: Semaphore,
}

impl<G: QuestionGenerator + 'static> LazyGenerator<G> {
    pub fn new(
        init: impl Fn() -> Result<G, GenerationError> + Send + Sync + 'static,
        max_concurrent: usize,
    ) -> Self {
        Self {
            cell: OnceCell::new(),
            init: Box::new(init),
            permits: Semaphore::new(max_concurrent.max(1)),
        }
    }
}

#[async_trait]
impl<G: QuestionGenerator + 'static> QuestionGenerator for LazyGenerator<G> {
    async fn generate(&self, prompt: &str, count: usize) -> Result<Vec<String>, GenerationError> {
        let generator = self
            .cell
            .get_or_try_init(|| async {
                info!("Constructing question model");
                (self.init)()
            })
            .await?;

        let _permit = self
            .permits
            .acquire()
            .await
            .map_err(|_| GenerationError::Unavailable("generator is shutting down".to_string()))?;

        generator.generate(prompt, count).await
    }
}

#[cfg(test)]
pub(crate) mod fake {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    /// Returns canned questions, counting how often it was asked.
    pub struct FakeGenerator {
        pub reply: Reply,
        pub calls: AtomicUsize,
    }

    pub enum Reply {
        /// `count` numbered questions about the prompt.
        Exact,
        Fixed(Vec<String>),
        Fail,
    }

    impl FakeGenerator {
        pub fn new(reply: Reply) -> Self {
            Self {
                reply,
                calls: AtomicUsize::new(0),
            }
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl QuestionGenerator for FakeGenerator {
        async fn generate(
            &self,
            prompt: &str,
            count: usize,
        ) -> Result<Vec<String>, GenerationError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.reply {
                Reply::Exact => Ok((1..=count)
                    .map(|i| format!("Question {} about {}?", i, prompt))
                    .collect()),
                Reply::Fixed(questions) => Ok(questions.clone()),
                Reply::Fail => Err(GenerationError::Unavailable("model offline".to_string())),
            }
        }
    }
}
