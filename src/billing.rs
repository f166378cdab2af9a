//! In-memory running bill

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::BillingError;
use crate::types::BillItem;

/// Snapshot of a bill handed to invoice rendering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub number: Uuid,
    pub items: Vec<BillItem>,
    pub total_amount: f64,
    pub customer_phone: Option<String>,
}

/// Ordered bill items plus the invoices generated from them
#[derive(Debug, Clone, Default)]
pub struct Bill {
    items: Vec<BillItem>,
    customer_phone: Option<String>,
    invoices: Vec<Invoice>,
}

impl Bill {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[BillItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn total_amount(&self) -> f64 {
        self.items.iter().map(|item| item.amount).sum()
    }

    pub fn customer_phone(&self) -> Option<&str> {
        self.customer_phone.as_deref()
    }

    pub fn set_customer_phone(&mut self, phone: Option<String>) {
        self.customer_phone = phone.filter(|p| !p.trim().is_empty());
    }

    /// Append a line. The amount is the quantity label's leading number times the rate.
    pub fn add_item(&mut self, name: &str, quantity: &str, rate: f64) -> Result<&BillItem, BillingError> {
        if !rate.is_finite() || rate < 0.0 {
            return Err(BillingError::InvalidRate(rate));
        }
        let count = quantity_value(quantity).ok_or_else(|| BillingError::InvalidQuantity(quantity.to_string()))?;

        let index = self.items.len();
        self.items.push(BillItem {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            quantity: quantity.to_string(),
            rate,
            amount: count * rate,
        });
        tracing::debug!(item = name, quantity, rate, "bill item added");
        Ok(&self.items[index])
    }

    /// Remove a line by id, or by name when `id` is empty.
    ///
    /// Name lookup is a case-insensitive substring match; the first hit wins.
    pub fn remove_item(&mut self, id: &str, name: &str) -> Result<BillItem, BillingError> {
        let position = if id.is_empty() && !name.is_empty() {
            let needle = name.to_lowercase();
            self.items
                .iter()
                .position(|item| item.name.to_lowercase().contains(&needle))
                .ok_or_else(|| BillingError::ItemNotFound(name.to_string()))?
        } else {
            self.items
                .iter()
                .position(|item| item.id == id)
                .ok_or_else(|| BillingError::ItemNotFound(id.to_string()))?
        };
        let removed = self.items.remove(position);
        tracing::debug!(id = %removed.id, item = %removed.name, "bill item removed");
        Ok(removed)
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Freeze the current items into an invoice. The bill itself is left as is.
    pub fn generate_invoice(&mut self) -> Result<&Invoice, BillingError> {
        if self.items.is_empty() {
            return Err(BillingError::EmptyBill);
        }
        let invoice = Invoice {
            number: Uuid::new_v4(),
            items: self.items.clone(),
            total_amount: self.total_amount(),
            customer_phone: self.customer_phone.clone(),
        };
        tracing::info!(number = %invoice.number, total = invoice.total_amount, "invoice generated");
        let index = self.invoices.len();
        self.invoices.push(invoice);
        Ok(&self.invoices[index])
    }

    pub fn invoices(&self) -> &[Invoice] {
        &self.invoices
    }
}

/// Leading number of a quantity label: "2 kg" -> 2, "1.5kg" -> 1.5
fn quantity_value(label: &str) -> Option<f64> {
    let first = label.split_whitespace().next()?;
    let end = first
        .char_indices()
        .find(|(_, c)| !(c.is_ascii_digit() || *c == '.'))
        .map(|(i, _)| i)
        .unwrap_or(first.len());
    first[..end].parse::<f64>().ok().filter(|n| n.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_item_computes_amount() {
        let mut bill = Bill::new();
        let item = bill.add_item("Tomato", "2 kg", 50.0).unwrap();
        assert_eq!(item.amount, 100.0);
        let item = bill.add_item("Rice", "1.5kg", 80.0).unwrap().clone();
        assert_eq!(bill.items().len(), 2);
        assert_eq!(bill.items().last(), Some(&item));
        assert_eq!(bill.total_amount(), 220.0);
    }

    #[test]
    fn test_add_item_rejects_bad_input() {
        let mut bill = Bill::new();
        assert_eq!(
            bill.add_item("Salt", "some", 10.0).unwrap_err(),
            BillingError::InvalidQuantity("some".to_string())
        );
        assert!(matches!(
            bill.add_item("Salt", "1 piece", f64::NAN).unwrap_err(),
            BillingError::InvalidRate(_)
        ));
        assert!(bill.is_empty());
    }

    #[test]
    fn test_remove_by_name_is_case_insensitive_substring() {
        let mut bill = Bill::new();
        bill.add_item("Red Tomato", "1 kg", 40.0).unwrap();
        bill.add_item("Onion", "2 kg", 30.0).unwrap();

        let removed = bill.remove_item("", "tomato").unwrap();
        assert_eq!(removed.name, "Red Tomato");
        assert_eq!(bill.items().len(), 1);

        let err = bill.remove_item("", "Garlic").unwrap_err();
        assert_eq!(err, BillingError::ItemNotFound("Garlic".to_string()));
        assert_eq!(err.to_string(), "Garlic not found in bill");
    }

    #[test]
    fn test_remove_by_id() {
        let mut bill = Bill::new();
        let id = bill.add_item("Milk", "1 liter", 60.0).unwrap().id.clone();
        bill.add_item("Bread", "1 packet", 45.0).unwrap();

        assert_eq!(bill.remove_item(&id, "Bread").unwrap().name, "Milk");
        assert!(bill.remove_item(&id, "").is_err());
    }

    #[test]
    fn test_generate_invoice() {
        let mut bill = Bill::new();
        assert_eq!(bill.generate_invoice().unwrap_err(), BillingError::EmptyBill);

        bill.add_item("Sugar", "2 kg", 42.5).unwrap();
        bill.set_customer_phone(Some("9876543210".to_string()));
        let invoice = bill.generate_invoice().unwrap().clone();
        assert_eq!(invoice.total_amount, 85.0);
        assert_eq!(invoice.items.len(), 1);
        assert_eq!(invoice.customer_phone.as_deref(), Some("9876543210"));
        assert_eq!(bill.invoices().len(), 1);
        assert!(!bill.is_empty());

        bill.add_item("Salt", "1 piece", 20.0).unwrap();
        let second = bill.generate_invoice().unwrap().clone();
        assert_eq!(second.total_amount, 105.0);
        assert_ne!(second.number, invoice.number);
        assert_eq!(bill.invoices().last().map(|i| i.number), Some(second.number));
    }

    #[test]
    fn test_clear() {
        let mut bill = Bill::new();
        bill.add_item("Sugar", "2 kg", 42.5).unwrap();
        bill.clear();
        assert!(bill.is_empty());
        assert_eq!(bill.total_amount(), 0.0);
    }

    #[test]
    fn test_quantity_value() {
        assert_eq!(quantity_value("3 packet"), Some(3.0));
        assert_eq!(quantity_value("0.5kg"), Some(0.5));
        assert_eq!(quantity_value("kg"), None);
        assert_eq!(quantity_value(""), None);
    }
}
