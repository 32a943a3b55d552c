// All LLM prompt text for the screening module.

/// Questions requested per technology unless the caller says otherwise.
pub const DEFAULT_QUESTIONS_PER_TECH: usize = 3;

/// Label of the prompt line that carries the candidate's stack.
/// The offline fallback reads the stack back from this line.
pub const TECH_STACK_LABEL: &str = "Candidate tech-stack:";

/// Screening prompt template. Replace `{tech_stack}` and `{per_tech}` before sending.
pub const QUESTION_PROMPT_TEMPLATE: &str = "\
You are a hiring-assistant that generates short technical screening questions.
Candidate tech-stack: {tech_stack}
Task: For each technology listed, produce {per_tech} concise, clear, and varied screening questions \
(conceptual, short coding/design, and troubleshooting/ops where applicable). \
Number each question and label which technology it is for. \
Do not ask for personal data. Keep each question under 40 words.

Output format example:
1. [Python] Explain ...
2. [Django] How would you ...

Begin generating now.";

/// Builds the screening prompt for an already-normalized stack.
pub fn question_prompt(techs: &[String], per_tech: usize) -> String {
    QUESTION_PROMPT_TEMPLATE
        .replace("{tech_stack}", &techs.join(", "))
        .replace("{per_tech}", &per_tech.to_string())
}
