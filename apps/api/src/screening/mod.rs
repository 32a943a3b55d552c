// Screening: turns a declared tech stack into a short list of technical questions.
// Pipeline: question_prompt → ProviderClient → parse_questions → ConversationHandler reply.
// All completions go through llm_client; nothing here talks to a provider directly.

pub mod conversation;
pub mod handlers;
pub mod parser;
pub mod prompts;
pub mod question_bank;

/// Renders items as `1. first\n2. second`.
pub fn numbered_list<S: AsRef<str>>(items: &[S]) -> String {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| format!("{}. {}", i + 1, item.as_ref()))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Trims, lower-cases and drops empty technology names.
pub fn normalize_techs<S: AsRef<str>>(techs: &[S]) -> Vec<String> {
    techs
        .iter()
        .map(|t| t.as_ref().trim().to_lowercase())
        .filter(|t| !t.is_empty())
        .collect()
}
