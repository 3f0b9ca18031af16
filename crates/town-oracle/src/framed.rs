//! Prompt template decorator.

use crate::config::PROMPT_PLACEHOLDER;
use crate::{OracleError, TextOracle};

/// Wraps every prompt in a template before handing it to the inner oracle.
///
/// The template's `{prompt}` placeholder is replaced by the prompt. A template
/// without the placeholder gets the prompt appended.
#[derive(Debug, Clone)]
pub struct Framed<O> {
    inner: O,
    template: String,
}

impl<O: TextOracle> Framed<O> {
    pub fn new(inner: O, template: impl Into<String>) -> Self {
        Self {
            inner,
            template: template.into(),
        }
    }

    pub fn frame(&self, prompt: &str) -> String {
        if self.template.contains(PROMPT_PLACEHOLDER) {
            self.template.replace(PROMPT_PLACEHOLDER, prompt)
        } else {
            format!("{}{}", self.template, prompt)
        }
    }

    pub fn into_inner(self) -> O {
        self.inner
    }
}

impl<O: TextOracle> TextOracle for Framed<O> {
    fn generate(&mut self, prompt: &str) -> Result<String, OracleError> {
        let framed = self.frame(prompt);
        self.inner.generate(&framed)
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}
