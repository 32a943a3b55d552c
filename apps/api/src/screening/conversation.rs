//! Conversation Handler: routes chat messages and owns the latest question set.

use std::sync::Arc;

use tracing::info;

use crate::llm_client::fallback::OFFLINE_GUIDANCE;
use crate::llm_client::ProviderClient;
use crate::models::candidate::CandidateProfile;
use crate::screening::parser::parse_questions;
use crate::screening::prompts::{question_prompt, DEFAULT_QUESTIONS_PER_TECH};
use crate::screening::{normalize_techs, numbered_list};

/// Output budget for one question-generation completion.
pub const GENERATION_MAX_TOKENS: u32 = 400;

const TRIGGER_WORDS: [&str; 4] = ["generate", "questions", "ask me", "screening"];
const EXIT_KEYWORDS: [&str; 4] = ["exit", "quit", "bye", "done"];

const MAX_INLINE_TECHS: usize = 10;
const MAX_INLINE_WORDS: usize = 50;
const MIN_MESSAGE_CHARS: usize = 3;

pub const GREETING: &str = "Hi, I'm TalentScout, your hiring assistant. \
    I will collect a few details and generate 3-5 technical questions per technology you list. \
    Type 'done' or 'exit' to finish the conversation.";

pub const FAREWELL: &str = "Thanks! Your session is complete. \
    We'll anonymize and store non-sensitive details. Good luck!";

pub const ASK_FOR_STACK: &str =
    "Please provide your tech stack (comma-separated) so I can generate questions.";

pub const ASK_TO_ELABORATE: &str = "Could you please elaborate? \
    If you'd like, provide your tech stack or ask me to 'generate questions'.";

pub const NOT_UNDERSTOOD: &str = "I didn't quite understand. You can either update the candidate form, \
    provide your tech stack (e.g., 'Python, React'), or ask me to 'generate questions'.";

const QUESTIONS_INTRO: &str = "Here are the generated technical questions:";

/// Whole-message exit check, case-insensitive.
pub fn is_exit_keyword(message: &str) -> bool {
    let message = message.trim().to_lowercase();
    EXIT_KEYWORDS.contains(&message.as_str())
}

/// Assistant reply to one user message.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub text: String,
    /// True when this message ran question generation.
    pub generated: bool,
}

impl Reply {
    fn canned(text: &str) -> Self {
        Self {
            text: text.to_string(),
            generated: false,
        }
    }
}

pub struct ConversationHandler {
    provider: Arc<ProviderClient>,
    last_generated_questions: Vec<String>,
}

impl ConversationHandler {
    pub fn new(provider: Arc<ProviderClient>) -> Self {
        Self {
            provider,
            last_generated_questions: Vec::new(),
        }
    }

    pub fn greeting(&self) -> &'static str {
        GREETING
    }

    pub fn farewell(&self) -> &'static str {
        FAREWELL
    }

    /// The question set from the most recent generation; empty until one runs.
    pub fn last_generated_questions(&self) -> &[String] {
        &self.last_generated_questions
    }

    pub async fn handle(&mut self, message: &str, candidate: &CandidateProfile) -> Reply {
        let lowered = message.trim().to_lowercase();

        if TRIGGER_WORDS.iter().any(|word| lowered.contains(*word)) {
            if normalize_techs(&candidate.tech_stack).is_empty() {
                return Reply::canned(ASK_FOR_STACK);
            }
            let text = self.generate_questions_for_stack(&candidate.tech_stack).await;
            return Reply {
                text,
                generated: true,
            };
        }

        if looks_like_inline_stack(message) {
            let techs: Vec<&str> = message
                .split(',')
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .collect();
            let text = self.generate_questions_for_stack(&techs).await;
            return Reply {
                text,
                generated: true,
            };
        }

        if message.trim().chars().count() < MIN_MESSAGE_CHARS {
            return Reply::canned(ASK_TO_ELABORATE);
        }

        Reply::canned(NOT_UNDERSTOOD)
    }

    /// Prompt → completion → parse. Always replaces the stored question set, even with
    /// an empty one. Falls back to the raw completion text when nothing parsed.
    pub async fn generate_questions_for_stack<S: AsRef<str>>(&mut self, techs: &[S]) -> String {
        let techs = normalize_techs(techs);
        let prompt = question_prompt(&techs, DEFAULT_QUESTIONS_PER_TECH);

        let text = self
            .provider
            .generate(&prompt, GENERATION_MAX_TOKENS)
            .await;

        // Guidance text is not a question list; keep it out of the stored set.
        let questions = if text == OFFLINE_GUIDANCE {
            Vec::new()
        } else {
            parse_questions(&text)
        };

        info!(
            provider = %self.provider.selection(),
            "Generated {} questions for stack [{}]",
            questions.len(),
            techs.join(", ")
        );

        self.last_generated_questions = questions;

        if self.last_generated_questions.is_empty() {
            return text;
        }

        format!(
            "{QUESTIONS_INTRO}\n{}",
            numbered_list(&self.last_generated_questions)
        )
    }
}

/// A short comma-separated message such as "Python, React, SQL".
fn looks_like_inline_stack(message: &str) -> bool {
    message.contains(',')
        && message.split(',').count() <= MAX_INLINE_TECHS
        && message.split_whitespace().count() < MAX_INLINE_WORDS
}
