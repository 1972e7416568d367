use crate::classify::StatementType;
use crate::configuration::StatementConfiguration;
use cqlbridge_core::CqlValue;
use serde::Serialize;
use std::sync::Arc;

/// A statement ready for execution: native-dialect text plus its resolved
/// configuration. Never mutated after construction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParsedStatement {
    text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    parameters: Option<Vec<CqlValue>>,
    configuration: Arc<StatementConfiguration>,
    rewritten: bool,
}

impl ParsedStatement {
    pub(crate) fn new(text: String, configuration: StatementConfiguration, rewritten: bool) -> Self {
        Self {
            text,
            parameters: None,
            configuration: Arc::new(configuration),
            rewritten,
        }
    }

    /// Text to send to the store.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn parameters(&self) -> Option<&[CqlValue]> {
        self.parameters.as_deref()
    }

    pub fn configuration(&self) -> &StatementConfiguration {
        &self.configuration
    }

    pub fn statement_type(&self) -> StatementType {
        self.configuration.statement_type()
    }

    /// Whether the text came out of the rewriter rather than being passed
    /// through as written.
    pub fn was_rewritten(&self) -> bool {
        self.rewritten
    }

    /// Same text and configuration, with `values` bound.
    pub fn with_parameters(&self, values: Vec<CqlValue>) -> Self {
        Self {
            text: self.text.clone(),
            parameters: Some(values),
            configuration: Arc::clone(&self.configuration),
            rewritten: self.rewritten,
        }
    }
}
