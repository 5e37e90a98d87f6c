//! Prompt rendering for backend invocations.

use anyhow::{Context, Result};
use minijinja::{Environment, context};

const FACT_TEMPLATE: &str = include_str!("prompts/fact.md");

/// Most recent accepted facts included in the prompt as exclusions.
///
/// The full accepted set can reach thousands of entries; sending all of them
/// would blow up the prompt long before the run finishes. The duplicate
/// filter remains the authority on uniqueness either way.
pub const MAX_PROMPT_EXCLUSIONS: usize = 40;

/// Template engine wrapper around minijinja.
pub struct PromptBuilder {
    env: Environment<'static>,
}

impl Default for PromptBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl PromptBuilder {
    pub fn new() -> Self {
        let mut env = Environment::new();
        env.add_template("fact", FACT_TEMPLATE)
            .expect("fact template should be valid");
        Self { env }
    }

    /// Render the instruction for one generation attempt.
    pub fn render(
        &self,
        keyword: &str,
        exclusions: &[String],
        min_length: usize,
        max_length: usize,
    ) -> Result<String> {
        let start = exclusions.len().saturating_sub(MAX_PROMPT_EXCLUSIONS);
        let template = self.env.get_template("fact").context("load fact template")?;
        let rendered = template
            .render(context! {
                keyword => keyword,
                min_length => min_length,
                max_length => max_length,
                exclusions => &exclusions[start..],
            })
            .context("render fact prompt")?;
        Ok(rendered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_includes_keyword_and_bounds() {
        let builder = PromptBuilder::new();
        let prompt = builder.render("volcanoes", &[], 20, 500).expect("render");

        assert!(prompt.contains("\"volcanoes\""));
        assert!(prompt.contains("between 20 and 500 characters"));
        assert!(!prompt.contains("previously accepted fact"));
    }

    #[test]
    fn render_lists_exclusions() {
        let builder = PromptBuilder::new();
        let exclusions = vec![
            "Lava can exceed 1000 degrees Celsius".to_string(),
            "Most volcanoes ring the Pacific".to_string(),
        ];
        let prompt = builder
            .render("volcanoes", &exclusions, 20, 500)
            .expect("render");

        assert!(prompt.contains("previously accepted fact"));
        assert!(prompt.contains("- Lava can exceed 1000 degrees Celsius"));
        assert!(prompt.contains("- Most volcanoes ring the Pacific"));
    }

    #[test]
    fn render_caps_exclusions_to_most_recent() {
        let builder = PromptBuilder::new();
        let exclusions: Vec<String> = (0..100).map(|i| format!("fact number {i}")).collect();
        let prompt = builder
            .render("volcanoes", &exclusions, 20, 500)
            .expect("render");

        assert!(!prompt.contains("fact number 59"));
        assert!(prompt.contains("fact number 60"));
        assert!(prompt.contains("fact number 99"));
    }
}
