//! The checkout phase machine.
//!
//! One pipeline instance drives one viewer session's checkout attempt:
//! bulk revalidation, reconciliation, address and payment gating, and
//! the single order-creation call. Reconciliation always completes in
//! full before submission is reachable, and the `Submitting` phase is
//! the in-flight guard: no second submission can start until the
//! current attempt resolves by success, failure or explicit
//! cancellation.

use crate::checkout::address::Address;
use crate::checkout::payment::intersect_methods;
use crate::checkout::reconcile::{reconcile, DroppedLine, ReconcileReport};
use crate::config::CheckoutConfig;
use crate::gateway::{
    CreateOrderRequest, CreateOrderResponse, GatewayError, Order, OrderRequestLine, OrderService,
    PaymentMethod, PaymentMethodDirectory, ValidationGateway,
};
use souk_commerce::cart::{CartLine, CartStore};
use souk_commerce::ids::{OrderGroupId, SellerId};
use std::fmt;
use std::time::Duration;
use thiserror::Error;
use tokio::time::timeout;
use tracing::{debug, info, warn};

/// Where a checkout attempt currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CheckoutPhase {
    /// No attempt in progress.
    Idle,
    /// Bulk revalidation running.
    Validating,
    /// Lines reconciled; shipping address needed.
    AwaitingAddress,
    /// Address set; payment method needed.
    AwaitingPaymentMethod,
    /// Order-creation call in flight.
    Submitting,
    /// Orders created; confirmation held.
    Confirmed,
    /// Terminal failure (every line invalid).
    Failed,
}

impl CheckoutPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckoutPhase::Idle => "idle",
            CheckoutPhase::Validating => "validating",
            CheckoutPhase::AwaitingAddress => "awaiting_address",
            CheckoutPhase::AwaitingPaymentMethod => "awaiting_payment_method",
            CheckoutPhase::Submitting => "submitting",
            CheckoutPhase::Confirmed => "confirmed",
            CheckoutPhase::Failed => "failed",
        }
    }
}

impl fmt::Display for CheckoutPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A business-rule rejection from the order service.
///
/// Not a transport error: the service answered and said no. Rendered
/// with its own message; the attempted lines stay in the cart since
/// nothing was confirmed.
#[derive(Debug, Clone, PartialEq)]
pub struct BusinessRejection {
    /// Service-side message, if any.
    pub message: Option<String>,
    /// The purchase needs a deposit flow first.
    pub requires_deposit: bool,
    /// Structured rejection details, surfaced verbatim.
    pub details: Vec<serde_json::Value>,
}

impl fmt::Display for BusinessRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.message, self.requires_deposit) {
            (Some(msg), _) => write!(f, "{msg}"),
            (None, true) => write!(f, "a deposit is required before this purchase"),
            (None, false) => write!(f, "the order was declined by the marketplace"),
        }
    }
}

impl From<CreateOrderResponse> for BusinessRejection {
    fn from(resp: CreateOrderResponse) -> Self {
        Self {
            message: resp.error,
            requires_deposit: resp.requires_deposit,
            details: resp.details,
        }
    }
}

/// Errors from the checkout pipeline.
#[derive(Error, Debug)]
pub enum CheckoutError {
    /// The action is not valid in the current phase.
    #[error("Cannot {action} while checkout is {phase}")]
    InvalidPhase {
        phase: CheckoutPhase,
        action: &'static str,
    },

    /// No cart lines are selected.
    #[error("No items selected for checkout")]
    EmptySelection,

    /// Every selected line failed revalidation; the attempt is aborted
    /// and the viewer goes back to the cart.
    #[error("All {} selected item(s) are no longer purchasable", .dropped.len())]
    AllLinesInvalid { dropped: Vec<DroppedLine> },

    /// No shipping address selected; blocked locally, no network call.
    #[error("A shipping address is required before ordering")]
    MissingShippingAddress,

    /// The shipping address is missing required fields.
    #[error("The shipping address is incomplete")]
    IncompleteShippingAddress,

    /// No payment method selected; blocked locally, no network call.
    #[error("A payment method is required before ordering")]
    MissingPaymentMethod,

    /// The chosen method is not accepted by every seller.
    #[error("Payment method {} is not accepted by every seller in this order", .0.as_str())]
    PaymentMethodUnavailable(PaymentMethod),

    /// The sellers in this submission share no payment method.
    #[error("The sellers in this order have no payment method in common")]
    NoCommonPaymentMethod,

    /// A submission is already in flight.
    #[error("An order submission is already in progress")]
    SubmissionInFlight,

    /// The order-creation call timed out; retrying is safe.
    #[error("Order submission timed out after {0:?}; it is safe to retry")]
    SubmitTimeout(Duration),

    /// The order service rejected the submission on business rules.
    #[error("Order rejected: {0}")]
    Rejected(BusinessRejection),

    /// A gateway call failed at the transport level; retryable.
    #[error("Service unreachable: {0}")]
    Transport(#[from] GatewayError),
}

/// The held result of a confirmed submission.
#[derive(Debug, Clone, PartialEq)]
pub struct Confirmation {
    /// One order per distinct seller.
    pub orders: Vec<Order>,
    /// Correlates the orders of this submission.
    pub order_group_id: Option<OrderGroupId>,
    /// Non-fatal notes from the order service.
    pub warnings: Vec<String>,
}

impl Confirmation {
    /// Number of sellers the submission was split across.
    pub fn seller_count(&self) -> usize {
        let mut sellers: Vec<&SellerId> = Vec::new();
        for order in &self.orders {
            if !sellers.contains(&&order.seller_id) {
                sellers.push(&order.seller_id);
            }
        }
        sellers.len()
    }
}

/// Drives one checkout attempt against the backing services.
pub struct CheckoutPipeline<V, O, P> {
    validation: V,
    orders: O,
    payments: P,
    config: CheckoutConfig,
    phase: CheckoutPhase,
    /// Snapshot of the reconciled lines entering submission.
    selected: Vec<CartLine>,
    available_methods: Vec<PaymentMethod>,
    shipping_address: Option<Address>,
    payment_method: Option<PaymentMethod>,
    /// Dedup key, stable across retries of one attempt.
    submission_key: String,
    confirmation: Option<Confirmation>,
}

impl<V, O, P> CheckoutPipeline<V, O, P>
where
    V: ValidationGateway,
    O: OrderService,
    P: PaymentMethodDirectory,
{
    /// Create a pipeline over the given services.
    pub fn new(validation: V, orders: O, payments: P, config: CheckoutConfig) -> Self {
        Self {
            validation,
            orders,
            payments,
            config,
            phase: CheckoutPhase::Idle,
            selected: Vec::new(),
            available_methods: Vec::new(),
            shipping_address: None,
            payment_method: None,
            submission_key: String::new(),
            confirmation: None,
        }
    }

    /// Current phase.
    pub fn phase(&self) -> CheckoutPhase {
        self.phase
    }

    /// Payment methods accepted by every seller in the current attempt.
    pub fn available_methods(&self) -> &[PaymentMethod] {
        &self.available_methods
    }

    /// The selected payment method, if still valid.
    pub fn payment_method(&self) -> Option<PaymentMethod> {
        self.payment_method
    }

    /// The shipping address, if set.
    pub fn shipping_address(&self) -> Option<&Address> {
        self.shipping_address.as_ref()
    }

    /// The confirmation of the last successful submission.
    pub fn confirmation(&self) -> Option<&Confirmation> {
        self.confirmation.as_ref()
    }

    /// Start an attempt: revalidate the selected lines in bulk,
    /// reconcile, and drop invalid lines from the cart immediately so a
    /// repeated attempt does not re-surface stale data.
    ///
    /// Returns the reconciliation report; a partial drop is visible in
    /// `report.dropped` and the attempt continues with the remainder.
    /// When every line is invalid the attempt aborts to `Failed` and
    /// the viewer is sent back to the cart.
    pub async fn begin(&mut self, store: &mut CartStore) -> Result<ReconcileReport, CheckoutError> {
        if self.phase == CheckoutPhase::Submitting {
            return Err(CheckoutError::SubmissionInFlight);
        }
        let lines = store.selected_lines();
        if lines.is_empty() {
            return Err(CheckoutError::EmptySelection);
        }

        self.phase = CheckoutPhase::Validating;
        self.confirmation = None;

        let item_ids: Vec<_> = lines.iter().map(|l| l.item_id.clone()).collect();
        let outcomes = match timeout(
            self.config.validate_timeout(),
            self.validation.validate_bulk(&item_ids),
        )
        .await
        {
            Err(_) => {
                self.phase = CheckoutPhase::Idle;
                return Err(GatewayError::Timeout(self.config.validate_timeout()).into());
            }
            Ok(Err(err)) => {
                self.phase = CheckoutPhase::Idle;
                return Err(err.into());
            }
            Ok(Ok(outcomes)) => outcomes,
        };

        let report = reconcile(lines, &outcomes, self.config.price_drift_epsilon_minor);
        for dropped in &report.dropped {
            if dropped.rejection.removes_line() {
                store.remove(&dropped.line.item_id);
                warn!(
                    item = %dropped.line.item_id,
                    reason = dropped.rejection.as_str(),
                    "cart line dropped at revalidation"
                );
            }
        }

        if report.all_invalid() {
            self.phase = CheckoutPhase::Failed;
            return Err(CheckoutError::AllLinesInvalid {
                dropped: report.dropped,
            });
        }

        let sellers = distinct_sellers(&report.valid);
        let methods_map = match timeout(
            self.config.validate_timeout(),
            self.payments.methods_for(&sellers),
        )
        .await
        {
            Err(_) => {
                self.phase = CheckoutPhase::Idle;
                return Err(GatewayError::Timeout(self.config.validate_timeout()).into());
            }
            Ok(Err(err)) => {
                self.phase = CheckoutPhase::Idle;
                return Err(err.into());
            }
            Ok(Ok(map)) => map,
        };
        self.available_methods = intersect_methods(&sellers, &methods_map);

        // A previously chosen method that fell out of the intersection
        // requires an explicit re-selection, never a silent default.
        if let Some(method) = self.payment_method {
            if !self.available_methods.contains(&method) {
                self.payment_method = None;
                debug!(method = method.as_str(), "payment selection cleared");
            }
        }

        self.selected = report.valid.clone();
        self.submission_key = new_submission_key();
        self.phase = CheckoutPhase::AwaitingAddress;
        Ok(report)
    }

    /// Set the shipping address.
    pub fn set_shipping_address(&mut self, address: Address) -> Result<(), CheckoutError> {
        match self.phase {
            CheckoutPhase::AwaitingAddress | CheckoutPhase::AwaitingPaymentMethod => {}
            phase => {
                return Err(CheckoutError::InvalidPhase {
                    phase,
                    action: "set address",
                })
            }
        }
        if !address.is_complete() {
            return Err(CheckoutError::IncompleteShippingAddress);
        }
        self.shipping_address = Some(address);
        self.phase = CheckoutPhase::AwaitingPaymentMethod;
        Ok(())
    }

    /// Choose a payment method from the current intersection.
    pub fn select_payment_method(&mut self, method: PaymentMethod) -> Result<(), CheckoutError> {
        match self.phase {
            CheckoutPhase::AwaitingAddress | CheckoutPhase::AwaitingPaymentMethod => {}
            phase => {
                return Err(CheckoutError::InvalidPhase {
                    phase,
                    action: "select payment method",
                })
            }
        }
        if self.available_methods.is_empty() {
            return Err(CheckoutError::NoCommonPaymentMethod);
        }
        if !self.available_methods.contains(&method) {
            return Err(CheckoutError::PaymentMethodUnavailable(method));
        }
        self.payment_method = Some(method);
        Ok(())
    }

    /// Submit the attempt: one bounded order-creation call.
    ///
    /// Preconditions (address, payment method) are checked locally
    /// before any network traffic. On confirmation exactly the
    /// submitted lines leave the cart; lines added after the attempt
    /// began survive. A timeout or transport failure leaves the cart
    /// untouched and re-arms the pipeline for one retry at a time,
    /// reusing the same idempotency key so the service can deduplicate
    /// a prior attempt that did land.
    pub async fn submit(&mut self, store: &mut CartStore) -> Result<Confirmation, CheckoutError> {
        match self.phase {
            CheckoutPhase::Submitting => return Err(CheckoutError::SubmissionInFlight),
            CheckoutPhase::AwaitingAddress | CheckoutPhase::AwaitingPaymentMethod => {}
            phase => {
                return Err(CheckoutError::InvalidPhase {
                    phase,
                    action: "submit",
                })
            }
        }

        let address = self
            .shipping_address
            .clone()
            .ok_or(CheckoutError::MissingShippingAddress)?;
        let method = self
            .payment_method
            .ok_or(CheckoutError::MissingPaymentMethod)?;
        if self.selected.is_empty() {
            return Err(CheckoutError::EmptySelection);
        }
        let currency = self.selected[0].unit_price.currency;

        let request = CreateOrderRequest {
            lines: self
                .selected
                .iter()
                .map(|line| OrderRequestLine {
                    item_id: line.item_id.clone(),
                    quantity: line.quantity,
                    unit_price: line.unit_price,
                })
                .collect(),
            payment_method: method,
            shipping_address: address,
            currency,
            idempotency_key: self.submission_key.clone(),
        };

        self.phase = CheckoutPhase::Submitting;
        let response = match timeout(
            self.config.submit_timeout(),
            self.orders.create_orders(&request),
        )
        .await
        {
            Err(_) => {
                self.phase = CheckoutPhase::AwaitingPaymentMethod;
                warn!(key = %self.submission_key, "order submission timed out");
                return Err(CheckoutError::SubmitTimeout(self.config.submit_timeout()));
            }
            Ok(Err(err)) => {
                self.phase = CheckoutPhase::AwaitingPaymentMethod;
                return Err(err.into());
            }
            Ok(Ok(response)) => response,
        };

        if response.is_rejection() {
            self.phase = CheckoutPhase::AwaitingPaymentMethod;
            return Err(CheckoutError::Rejected(response.into()));
        }

        // Remove only what was submitted; lines added meanwhile survive.
        for line in &self.selected {
            store.remove(&line.item_id);
        }

        let confirmation = Confirmation {
            orders: response.orders,
            order_group_id: response.order_group_id,
            warnings: response.warnings,
        };
        info!(
            orders = confirmation.orders.len(),
            sellers = confirmation.seller_count(),
            "order group confirmed"
        );
        self.confirmation = Some(confirmation.clone());
        self.phase = CheckoutPhase::Confirmed;
        Ok(confirmation)
    }

    /// Abort the attempt. A viewer-initiated cancel, not an error: the
    /// cart and every committed selection stay as of the last completed
    /// step. Also the recovery path when a `begin` or `submit` future
    /// was dropped mid-flight and left the phase dangling.
    pub fn cancel(&mut self) {
        debug!(phase = self.phase.as_str(), "checkout cancelled");
        self.phase = CheckoutPhase::Idle;
        self.selected.clear();
    }
}

/// Distinct sellers across the valid lines, in first-seen order.
fn distinct_sellers(lines: &[CartLine]) -> Vec<SellerId> {
    let mut sellers: Vec<SellerId> = Vec::new();
    for line in lines {
        if !sellers.contains(&line.seller_id) {
            sellers.push(line.seller_id.clone());
        }
    }
    sellers
}

/// Dedup key for one submission attempt.
fn new_submission_key() -> String {
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::time::{SystemTime, UNIX_EPOCH};

    static COUNTER: AtomicU64 = AtomicU64::new(0);

    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_micros() as u64)
        .unwrap_or(0);
    format!(
        "sub-{:x}-{:x}",
        timestamp,
        COUNTER.fetch_add(1, Ordering::Relaxed)
    )
}
