//! Billing context the dispatcher acts upon

use crate::billing::Bill;
use crate::error::BillingError;
use crate::session::{RecognitionEngine, VoiceSession};
use crate::types::BillItem;

/// Order state and the operations a voice command may trigger.
///
/// The dispatcher borrows a context for one call and never stores it.
pub trait BillingContext {
    fn bill_items(&self) -> &[BillItem];

    fn total_amount(&self) -> f64;

    fn add_item(&mut self, name: &str, quantity: &str, rate: f64) -> Result<(), BillingError>;

    /// Remove by `id`, or by `name` when `id` is empty.
    fn remove_item(&mut self, id: &str, name: &str) -> Result<(), BillingError>;

    fn clear_bill(&mut self) -> Result<(), BillingError>;

    fn generate_invoice(&mut self) -> Result<(), BillingError>;

    fn stop_listening(&mut self) -> Result<(), BillingError>;
}

/// A bill and the voice session feeding it, viewed as one context
pub struct Checkout<'a, E> {
    bill: &'a mut Bill,
    session: &'a mut VoiceSession<E>,
}

impl<'a, E: RecognitionEngine> Checkout<'a, E> {
    pub fn new(bill: &'a mut Bill, session: &'a mut VoiceSession<E>) -> Self {
        Self { bill, session }
    }
}

impl<E: RecognitionEngine> BillingContext for Checkout<'_, E> {
    fn bill_items(&self) -> &[BillItem] {
        self.bill.items()
    }

    fn total_amount(&self) -> f64 {
        self.bill.total_amount()
    }

    fn add_item(&mut self, name: &str, quantity: &str, rate: f64) -> Result<(), BillingError> {
        self.bill.add_item(name, quantity, rate).map(|_| ())
    }

    fn remove_item(&mut self, id: &str, name: &str) -> Result<(), BillingError> {
        self.bill.remove_item(id, name).map(|_| ())
    }

    fn clear_bill(&mut self) -> Result<(), BillingError> {
        self.bill.clear();
        Ok(())
    }

    fn generate_invoice(&mut self) -> Result<(), BillingError> {
        self.bill.generate_invoice().map(|_| ())
    }

    fn stop_listening(&mut self) -> Result<(), BillingError> {
        self.session.stop();
        Ok(())
    }
}
