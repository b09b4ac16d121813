use async_trait::async_trait;

/// Something that can put a yes/no question to a human.
#[async_trait]
pub trait ConfirmationGate: Send + Sync {
    /// Show `prompt` and return the raw answer.
    async fn ask(&self, prompt: &str) -> std::io::Result<String>;
}

/// Prompt shown before archiving `count` repositories.
pub fn confirmation_prompt(count: usize) -> String {
    format!("Archive {count} repositories? (yes/no) ")
}

/// An answer is affirmative when its first character is `y` or `Y`.
pub fn is_affirmative(answer: &str) -> bool {
    answer
        .chars()
        .next()
        .is_some_and(|c| c.eq_ignore_ascii_case(&'y'))
}
