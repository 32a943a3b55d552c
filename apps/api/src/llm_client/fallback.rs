//! Offline fallback: canned questions picked by keyword from the question bank.

use super::GenerationOutcome;
use crate::screening::numbered_list;
use crate::screening::prompts::TECH_STACK_LABEL;
use crate::screening::question_bank::{self, OFFLINE_QUESTIONS_PER_TECH};

pub const OFFLINE_GUIDANCE: &str = "I couldn't use an LLM backend. Here's a helpful fallback: \
    Please list your tech stack (e.g., Python, Django, React). \
    I can generate technical questions once you provide technologies.";

pub(crate) fn offline_outcome(prompt: &str, reason: Option<String>) -> GenerationOutcome {
    match offline_questions(prompt) {
        Some(text) => GenerationOutcome::Offline { text, reason },
        None => GenerationOutcome::Guidance { reason },
    }
}

/// Numbered canned questions for every bank technology named in the prompt,
/// or `None` when nothing matches.
pub fn offline_questions(prompt: &str) -> Option<String> {
    let matched = question_bank::match_technologies(stack_text(prompt));
    if matched.is_empty() {
        return None;
    }

    let questions: Vec<&str> = matched
        .iter()
        .flat_map(|entry| entry.questions.iter().take(OFFLINE_QUESTIONS_PER_TECH).copied())
        .collect();
    Some(numbered_list(&questions))
}

/// The tech-stack line of a screening prompt, or the whole text for free-form prompts.
/// Only the stack line is scanned so the prompt's example output never matches.
fn stack_text(prompt: &str) -> &str {
    prompt
        .lines()
        .find_map(|line| line.trim_start().strip_prefix(TECH_STACK_LABEL))
        .unwrap_or(prompt)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::screening::prompts::question_prompt;
    use crate::screening::question_bank::QUESTION_BANK;

    fn techs(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn lines(text: &str) -> Vec<&str> {
        text.lines().collect()
    }

    #[test]
    fn test_known_stack_yields_bank_questions_in_input_order() {
        let prompt = question_prompt(&techs(&["react", "python"]), 3);
        let text = offline_questions(&prompt).unwrap();
        let lines = lines(&text);

        assert_eq!(lines.len(), 6);
        assert_eq!(lines[0], format!("1. {}", QUESTION_BANK[2].questions[0]));
        assert_eq!(lines[2], format!("3. {}", QUESTION_BANK[2].questions[2]));
        assert_eq!(lines[3], format!("4. {}", QUESTION_BANK[0].questions[0]));
        assert_eq!(lines[5], format!("6. {}", QUESTION_BANK[0].questions[2]));
    }

    #[test]
    fn test_unknown_stack_yields_none() {
        let prompt = question_prompt(&techs(&["cobol", "fortran"]), 3);
        assert_eq!(offline_questions(&prompt), None);
        assert_eq!(
            offline_outcome(&prompt, None),
            GenerationOutcome::Guidance { reason: None }
        );
    }

    #[test]
    fn test_example_format_line_does_not_match() {
        // The prompt's example mentions Python and Django; only the stack line counts.
        let prompt = question_prompt(&techs(&["aws"]), 3);
        let text = offline_questions(&prompt).unwrap();
        assert_eq!(lines(&text).len(), 3);
        assert!(text.contains("IAM"));
    }

    #[test]
    fn test_substring_match_inside_token() {
        let text = offline_questions("Candidate tech-stack: postgresql").unwrap();
        assert!(text.contains("INNER JOIN"));
    }

    #[test]
    fn test_duplicate_tokens_match_once() {
        let prompt = question_prompt(&techs(&["sql", "mysql"]), 3);
        let text = offline_questions(&prompt).unwrap();
        assert_eq!(lines(&text).len(), 3);
    }

    #[test]
    fn test_free_form_prompt_scans_whole_text() {
        let text = offline_questions("Ask me about Django, please").unwrap();
        assert!(text.contains("MTV"));
    }

    #[test]
    fn test_empty_prompt_is_guidance() {
        assert!(matches!(
            offline_outcome("", Some("boom".to_string())),
            GenerationOutcome::Guidance { reason: Some(_) }
        ));
    }
}
