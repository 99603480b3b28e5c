//! The "Swap Product" subscription action.

use tracing::warn;

use subswap_core::ProductId;
use subswap_products::ProductLookup;
use subswap_subscriptions::SubscriptionRepository;
use subswap_swap::{ProductSwap, SwapOutcome, SwapRequest};

use crate::action::{Action, ActionDetails, ActionOutcome};
use crate::context::WorkflowContext;
use crate::error::ActionError;
use crate::field::FieldDefinition;
use crate::registry::ActionRegistry;

/// Registry name of the action.
pub const SWAP_PRODUCT_ACTION: &str = "subscription_swap_product";
pub const SWAP_OUT_FIELD: &str = "product_to_swap_out";
pub const SWAP_IN_FIELD: &str = "product_to_swap_in";

/// Workflow action wrapping [`ProductSwap`].
pub struct SwapProductAction<S, P> {
    swap: ProductSwap<S, P>,
    allow_variable_products: bool,
}

impl<S, P> SwapProductAction<S, P>
where
    S: SubscriptionRepository,
    P: ProductLookup,
{
    pub fn new(swap: ProductSwap<S, P>) -> Self {
        Self {
            swap,
            allow_variable_products: true,
        }
    }

    /// Whether the product pickers offer variable (parent) products.
    pub fn with_variable_products(mut self, allow: bool) -> Self {
        self.allow_variable_products = allow;
        self
    }

    fn product_field(&self, name: &str, title: &str) -> FieldDefinition {
        FieldDefinition::product(name, title)
            .required()
            .allow_variations(true)
            .allow_variable(self.allow_variable_products)
    }

    /// Turn the workflow data into a swap request. Missing or malformed
    /// values become absent fields, which the swap treats as a no-op.
    fn request(context: &WorkflowContext) -> SwapRequest {
        SwapRequest {
            subscription: context.subscription,
            swap_out: product_option(context, SWAP_OUT_FIELD),
            swap_in: product_option(context, SWAP_IN_FIELD),
        }
    }
}

fn product_option(context: &WorkflowContext, field: &str) -> Option<ProductId> {
    let raw = context.option(field)?;
    match ProductId::parse_optional(raw) {
        Ok(id) => id,
        Err(e) => {
            warn!(field, value = raw, error = %e, "ignoring malformed product option");
            None
        }
    }
}

impl<S, P> Action for SwapProductAction<S, P>
where
    S: SubscriptionRepository,
    P: ProductLookup,
{
    fn details(&self) -> ActionDetails {
        ActionDetails {
            title: "Swap Product".to_string(),
            group: "Subscription".to_string(),
            description: "Swap one product for another on existing subscription line items. \
                This will not change price or quantity of line item, or any other \
                characteristics of the subscription."
                .to_string(),
        }
    }

    fn fields(&self) -> Vec<FieldDefinition> {
        vec![
            self.product_field(SWAP_OUT_FIELD, "Product to Swap Out"),
            self.product_field(SWAP_IN_FIELD, "Product to Swap In"),
        ]
    }

    fn required_data_items(&self) -> &'static [&'static str] {
        &["subscription"]
    }

    fn run(&self, context: &WorkflowContext) -> Result<ActionOutcome, ActionError> {
        let outcome = match self.swap.run(&Self::request(context))? {
            SwapOutcome::Skipped(reason) => ActionOutcome::NotApplicable {
                reason: reason.to_string(),
            },
            SwapOutcome::NoMatchingLines { subscription_id } => ActionOutcome::NotApplicable {
                reason: format!(
                    "subscription {subscription_id} has no line item for the swap-out product"
                ),
            },
            SwapOutcome::Swapped(report) => ActionOutcome::Applied {
                summary: format!(
                    "swapped {} line item(s) on subscription {} ({})",
                    report.replaced.len(),
                    report.subscription_id,
                    report.strategy
                ),
            },
        };
        Ok(outcome)
    }
}

/// Register every action this crate provides. Call once at start-up.
pub fn register_actions<S, P>(
    registry: &mut ActionRegistry,
    swap: ProductSwap<S, P>,
) -> Result<(), ActionError>
where
    S: SubscriptionRepository + 'static,
    P: ProductLookup + 'static,
{
    registry.register(SWAP_PRODUCT_ACTION, Box::new(SwapProductAction::new(swap)))
}
