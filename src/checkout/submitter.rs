//! Checkout Submitter
//!
//! Validates a session, sends its submission through the delivery client and
//! turns the outcome into exactly one notification. Only a confirmed
//! delivery resets the session; every failure leaves it as it was so the
//! shopper can retry by submitting again.

use super::delivery::DeliveryClient;
use super::error::{field_list, CheckoutError};
use super::models::{DeliveryEnvelope, SubmitReceipt};
use super::session::{lock_session, CheckoutSession, SendingGuard};
use crate::cart::helpers::format_item_summary;
use crate::notify::{Notification, NotificationSink};
use chrono::Utc;
use std::sync::{Arc, Mutex};
use tracing::{info, warn};

#[derive(Clone)]
pub struct CheckoutSubmitter {
    client: Arc<dyn DeliveryClient>,
    to: Arc<str>,
    subject: Arc<str>,
}

impl CheckoutSubmitter {
    /// `to` and `subject` are fixed for every envelope this submitter sends
    pub fn new(
        client: Arc<dyn DeliveryClient>,
        to: impl Into<Arc<str>>,
        subject: impl Into<Arc<str>>,
    ) -> Self {
        Self {
            client,
            to: to.into(),
            subject: subject.into(),
        }
    }

    /// Runs one checkout attempt for `session`.
    ///
    /// A session that is already sending is refused with
    /// [`CheckoutError::SubmissionInProgress`] and no notification; every
    /// other outcome emits exactly one notification on `sink`.
    pub async fn submit(
        &self,
        session: &Mutex<CheckoutSession>,
        sink: &dyn NotificationSink,
    ) -> Result<SubmitReceipt, CheckoutError> {
        let begun = lock_session(session).begin_submission(Utc::now());
        let submission = match begun {
            Ok(submission) => submission,
            Err(err) => {
                if let Some(notice) = rejection_notice(&err) {
                    sink.notify(notice);
                }
                warn!(error = %err, "checkout refused");
                return Err(err);
            }
        };

        let guard = SendingGuard::new(session);
        info!(
            items = %format_item_summary(&submission.items),
            total = %submission.total,
            "sending checkout submission"
        );

        let envelope = DeliveryEnvelope {
            to: &self.to,
            subject: &self.subject,
            cart_data: &submission,
        };
        let outcome = self.client.deliver(&envelope).await;

        let mut session = lock_session(session);
        guard.disarm();
        match outcome {
            Ok(()) => {
                sink.notify(Notification::success(
                    "Order sent",
                    "Thanks! We received your order and will be in touch shortly.",
                ));
                session.complete_submission();
                info!(total = %submission.total, "checkout delivered");
                Ok(SubmitReceipt {
                    submission,
                    close_checkout: true,
                })
            }
            Err(err) => {
                session.abort_submission();
                // Rejections and transport failures share one message.
                sink.notify(delivery_failure_notice());
                warn!(error = %err, "checkout delivery failed");
                Err(err.into())
            }
        }
    }
}

/// The notice shown whenever an attempt ends without a confirmed delivery
pub(crate) fn delivery_failure_notice() -> Notification {
    Notification::error(
        "Order failed",
        "We couldn't send your order. Please try again.",
    )
}

fn rejection_notice(err: &CheckoutError) -> Option<Notification> {
    match err {
        CheckoutError::EmptyCart => Some(Notification::warning(
            "Cart is empty",
            "Add at least one item before checking out.",
        )),
        CheckoutError::MissingContactInfo(fields) => Some(Notification::warning(
            "Missing information",
            format!("Please provide: {}.", field_list(fields)),
        )),
        _ => None,
    }
}
