//! Static question bank used when no completion provider is available.

/// Canned questions served per matched technology.
pub const OFFLINE_QUESTIONS_PER_TECH: usize = 3;

#[derive(Debug)]
pub struct BankEntry {
    /// Lower-case keyword matched against the declared stack.
    pub technology: &'static str,
    pub questions: &'static [&'static str],
}

pub const QUESTION_BANK: &[BankEntry] = &[
    BankEntry {
        technology: "python",
        questions: &[
            "Explain the difference between a list and a tuple in Python.",
            "How does Python's GIL affect multi-threaded programs?",
            "Write a function to reverse a string and explain its complexity.",
        ],
    },
    BankEntry {
        technology: "django",
        questions: &[
            "What is Django's MTV architecture? How is it different from MVC?",
            "How do you manage database migrations in Django?",
            "Explain middlewares in Django and a use-case for creating a custom middleware.",
        ],
    },
    BankEntry {
        technology: "react",
        questions: &[
            "What are React hooks and why were they introduced?",
            "Explain the difference between props and state in React.",
            "How does the virtual DOM work?",
        ],
    },
    BankEntry {
        technology: "sql",
        questions: &[
            "Write a SQL query to find duplicate rows in a table.",
            "Explain the difference between INNER JOIN and LEFT JOIN.",
            "What is indexing and how does it improve query performance?",
        ],
    },
    BankEntry {
        technology: "aws",
        questions: &[
            "What is IAM and why is it important?",
            "Describe how S3 versioning works and a use-case.",
            "Compare EC2 and Lambda for running compute workloads.",
        ],
    },
];

/// Bank entries named in a comma-separated stack, in the order the stack lists them.
/// A token matches every keyword it contains (`postgresql` matches `sql`); each entry
/// is returned at most once.
pub fn match_technologies(stack: &str) -> Vec<&'static BankEntry> {
    let mut matched: Vec<&'static BankEntry> = Vec::new();

    for token in stack.split(',').map(|t| t.trim().to_lowercase()) {
        for entry in QUESTION_BANK {
            if token.contains(entry.technology)
                && !matched.iter().any(|m| m.technology == entry.technology)
            {
                matched.push(entry);
            }
        }
    }

    matched
}
