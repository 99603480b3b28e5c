use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use subswap_core::SubscriptionId;

/// What the automation engine hands an action when a workflow fires: the
/// data items the trigger produced and the option values the workflow author
/// entered for the action's fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowContext {
    #[serde(default)]
    pub subscription: Option<SubscriptionId>,
    #[serde(default)]
    pub options: BTreeMap<String, String>,
}

impl WorkflowContext {
    pub fn for_subscription(subscription: SubscriptionId) -> Self {
        Self {
            subscription: Some(subscription),
            options: BTreeMap::new(),
        }
    }

    pub fn with_option(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.insert(name.into(), value.into());
        self
    }

    pub fn option(&self, name: &str) -> Option<&str> {
        self.options.get(name).map(String::as_str)
    }
}
