use async_trait::async_trait;
use std::io::Write;

/// Asks the user before a destructive call is issued
#[async_trait]
pub trait Confirm: Send + Sync {
    async fn confirm(&self, prompt: &str) -> bool;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct AlwaysConfirm;

#[async_trait]
impl Confirm for AlwaysConfirm {
    async fn confirm(&self, _prompt: &str) -> bool {
        true
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NeverConfirm;

#[async_trait]
impl Confirm for NeverConfirm {
    async fn confirm(&self, _prompt: &str) -> bool {
        false
    }
}

/// `[y/N]` prompt on the terminal; anything but y/yes declines
#[derive(Debug, Default, Clone, Copy)]
pub struct PromptConfirm;

#[async_trait]
impl Confirm for PromptConfirm {
    async fn confirm(&self, prompt: &str) -> bool {
        let prompt = prompt.to_string();
        tokio::task::spawn_blocking(move || {
            print!("{prompt} [y/N]: ");
            if std::io::stdout().flush().is_err() {
                return false;
            }
            let mut input = String::new();
            if std::io::stdin().read_line(&mut input).is_err() {
                return false;
            }
            is_yes(&input)
        })
        .await
        .unwrap_or(false)
    }
}

fn is_yes(input: &str) -> bool {
    matches!(input.trim().to_lowercase().as_str(), "y" | "yes")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_y_or_yes_confirms() {
        assert!(is_yes("y\n"));
        assert!(is_yes(" YES "));
        assert!(!is_yes(""));
        assert!(!is_yes("n"));
        assert!(!is_yes("yep"));
    }

    #[tokio::test]
    async fn test_fixed_answers() {
        assert!(AlwaysConfirm.confirm("Delete?").await);
        assert!(!NeverConfirm.confirm("Delete?").await);
    }
}
