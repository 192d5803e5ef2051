//! System prompt assembly.

use std::collections::BTreeMap;

use crate::domain::AppError;

/// Header placed between the rendered instructions and the document context.
pub const CONTEXT_HEADER: &str = "## YOUR COMPLETE PROFESSIONAL CONTEXT:";

/// Variables available to the instructions template.
#[derive(Debug, Clone, Default)]
pub struct PromptContext {
    pub variables: BTreeMap<String, String>,
}

impl PromptContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_var(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.variables.insert(key.into(), value.into());
        self
    }
}

/// Trait for rendering templates.
///
/// Keeps the template engine out of the domain layer.
pub trait TemplateRenderer {
    /// Render `template` with `context`; `template_name` is used in error messages.
    fn render(
        &self,
        template: &str,
        context: &PromptContext,
        template_name: &str,
    ) -> Result<String, AppError>;
}

/// Render the instructions and append the full document context.
pub fn build_system_prompt(
    renderer: &dyn TemplateRenderer,
    template: &str,
    template_name: &str,
    context: &PromptContext,
    documents_context: &str,
) -> Result<String, AppError> {
    let instructions = renderer.render(template, context, template_name)?;
    Ok(format!("{}\n\n{}\n{}", instructions, CONTEXT_HEADER, documents_context))
}

#[cfg(test)]
mod tests {
    use super::*;

    struct EchoRenderer;

    impl TemplateRenderer for EchoRenderer {
        fn render(
            &self,
            template: &str,
            context: &PromptContext,
            _template_name: &str,
        ) -> Result<String, AppError> {
            let mut out = template.to_string();
            for (key, value) in &context.variables {
                out = out.replace(&format!("{{{{ {} }}}}", key), value);
            }
            Ok(out)
        }
    }

    #[test]
    fn appends_context_after_header() {
        let ctx = PromptContext::new().with_var("name", "Amir");
        let prompt = build_system_prompt(
            &EchoRenderer,
            "You coach {{ name }}.",
            "coach_system.md",
            &ctx,
            "\n\n=== RESUME.PDF ===\nbody\n",
        )
        .unwrap();
        assert_eq!(
            prompt,
            "You coach Amir.\n\n## YOUR COMPLETE PROFESSIONAL CONTEXT:\n\n\n=== RESUME.PDF ===\nbody\n"
        );
    }
}
