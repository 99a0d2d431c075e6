//! Prompt templates for QA queries

use std::collections::HashMap;
use std::path::Path;

use crate::errors::QaError;
use crate::errors::Result;

/// Placeholder for the assembled retrieval context
pub const CONTEXT_VAR: &str = "context_str";
/// Placeholder for the user's question
pub const QUERY_VAR: &str = "query_str";

/// Template with `{{variable}}` placeholders
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    template: String,
    variables: Vec<String>,
}

impl PromptTemplate {
    /// Create a new prompt template
    pub fn new(template: impl Into<String>) -> Self {
        let template = template.into();
        let variables = extract_variables(&template);
        Self {
            template,
            variables,
        }
    }

    /// Read a template from disk
    ///
    /// The template must reference both `{{context_str}}` and `{{query_str}}`.
    pub fn from_file(path: &Path) -> Result<Self> {
        let template = Self::new(std::fs::read_to_string(path)?);
        for required in [CONTEXT_VAR, QUERY_VAR] {
            if !template.variables.iter().any(|v| v == required) {
                return Err(QaError::ConfigError(format!(
                    "Prompt template {} is missing {{{{{required}}}}}",
                    path.display()
                )));
            }
        }
        Ok(template)
    }

    /// Fill in the template with variables
    ///
    /// Placeholders are resolved in one pass over the template, so values
    /// are never rescanned. Unknown placeholders are left as written.
    #[must_use]
    pub fn render(&self, values: &HashMap<&str, &str>) -> String {
        let mut result = String::with_capacity(self.template.len());
        let mut rest = self.template.as_str();

        while let Some(start) = rest.find("{{") {
            result.push_str(&rest[..start]);
            let after_open = &rest[start + 2..];
            let Some(end) = after_open.find("}}") else {
                result.push_str(&rest[start..]);
                return result;
            };

            let placeholder = &rest[start..start + 2 + end + 2];
            match values.get(after_open[..end].trim()) {
                Some(value) => result.push_str(value),
                None => result.push_str(placeholder),
            }
            rest = &after_open[end + 2..];
        }

        result.push_str(rest);
        result
    }

    /// Get required variables
    #[must_use]
    pub fn variables(&self) -> &[String] {
        &self.variables
    }
}

/// Extract variable names from template
fn extract_variables(template: &str) -> Vec<String> {
    let mut variables = Vec::new();
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '{' && chars.peek() == Some(&'{') {
            chars.next(); // skip second '{'
            let mut var_name = String::new();
            while let Some(&ch) = chars.peek() {
                if ch == '}' {
                    chars.next();
                    if chars.peek() == Some(&'}') {
                        chars.next();
                        break;
                    }
                } else {
                    var_name.push(ch);
                    chars.next();
                }
            }
            let var_name = var_name.trim().to_string();
            if !var_name.is_empty() && !variables.contains(&var_name) {
                variables.push(var_name);
            }
        }
    }

    variables
}

/// Standard QA prompt templates
pub struct QaPrompts;

impl QaPrompts {
    /// Context-grounded answer prompt
    #[must_use]
    pub fn text_qa() -> PromptTemplate {
        PromptTemplate::new(
            r"You answer questions about trading strategies from a trading playbook.
Answer in the language of the question. Do not use markdown.

Context information is below.
---------------------
{{context_str}}
---------------------
Given the context information and not prior knowledge, answer the query.
If the context does not contain the answer, say so.
Query: {{query_str}}
Answer: ",
        )
    }

    /// Render a QA prompt for the given context and question
    #[must_use]
    pub fn render_qa(template: &PromptTemplate, context: &str, question: &str) -> String {
        let values = HashMap::from([(CONTEXT_VAR, context), (QUERY_VAR, question)]);
        template.render(&values)
    }
}
