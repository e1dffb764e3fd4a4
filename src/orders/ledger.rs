//! Order Ledger

use rustc_hash::FxHashMap;
use slotmap::{SlotMap, new_key_type};

use crate::{
    cart::Cart,
    orders::{CheckoutDetails, Order, OrderError, OrderNumber, OrderStatus},
    stitching::StitchingStatus,
};

new_key_type! {
    /// Order Key
    pub struct OrderKey;
}

/// Owns placed orders for one billing period and hands out sequential
/// order numbers.
///
/// The admin panel works against this: listing orders, filtering by
/// fulfilment status, and advancing order or stitching-job statuses by
/// order number.
#[derive(Debug)]
pub struct OrderLedger<'a> {
    orders: SlotMap<OrderKey, Order<'a>>,
    numbers: FxHashMap<String, OrderKey>,
    year: u16,
    month: u8,
    sequence: u32,
}

impl<'a> OrderLedger<'a> {
    /// Create an empty ledger for the given period.
    ///
    /// # Errors
    ///
    /// Returns [`OrderError::InvalidPeriod`] when the month is not 1-12.
    pub fn new(year: u16, month: u8) -> Result<Self, OrderError> {
        // Validate the period once up front rather than on every placement.
        OrderNumber::new(year, month, 0)?;

        Ok(OrderLedger {
            orders: SlotMap::with_key(),
            numbers: FxHashMap::default(),
            year,
            month,
            sequence: 0,
        })
    }

    /// Place an order from the cart.
    ///
    /// On success the full line item sequence and totals are snapshotted
    /// into a stored [`Order`] and the cart is cleared. On any error the
    /// cart is left untouched.
    ///
    /// # Errors
    ///
    /// Returns an [`OrderError`] for an empty cart, an invalid shipping
    /// address, or a pricing failure.
    pub fn place_order(
        &mut self,
        cart: &mut Cart<'a>,
        details: &CheckoutDetails<'a>,
    ) -> Result<&Order<'a>, OrderError> {
        let sequence = self.sequence.saturating_add(1);
        let number = OrderNumber::new(self.year, self.month, sequence)?;

        let order = Order::from_cart(number, cart, details)?;

        self.sequence = sequence;
        let key = self.orders.insert(order);
        self.numbers.insert(number.to_string(), key);

        cart.clear();

        let Some(placed) = self.orders.get(key) else {
            return Err(OrderError::UnknownOrder(number.to_string()));
        };

        Ok(placed)
    }

    /// Look up an order by its number.
    #[must_use]
    pub fn get(&self, number: &str) -> Option<&Order<'a>> {
        self.numbers
            .get(number)
            .and_then(|key| self.orders.get(*key))
    }

    /// Iterate over all orders.
    pub fn orders(&self) -> impl Iterator<Item = &Order<'a>> {
        self.orders.values()
    }

    /// Iterate over orders with the given fulfilment status.
    pub fn by_status(&self, status: OrderStatus) -> impl Iterator<Item = &Order<'a>> {
        self.orders
            .values()
            .filter(move |order| order.status() == status)
    }

    /// Number of placed orders.
    #[must_use]
    pub fn len(&self) -> usize {
        self.orders.len()
    }

    /// Whether no orders have been placed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// Set the fulfilment status of the order with the given number.
    ///
    /// # Errors
    ///
    /// Returns [`OrderError::UnknownOrder`] when no such order exists.
    pub fn set_status(&mut self, number: &str, status: OrderStatus) -> Result<(), OrderError> {
        self.order_mut(number)?.set_status(status);

        Ok(())
    }

    /// Advance the stitching status of one item of the order with the
    /// given number.
    ///
    /// # Errors
    ///
    /// Returns [`OrderError::UnknownOrder`] when no such order exists,
    /// plus the item-level errors of [`Order::set_stitching_status`].
    pub fn set_stitching_status(
        &mut self,
        number: &str,
        item: usize,
        status: StitchingStatus,
    ) -> Result<(), OrderError> {
        self.order_mut(number)?.set_stitching_status(item, status)
    }

    fn order_mut(&mut self, number: &str) -> Result<&mut Order<'a>, OrderError> {
        let key = self
            .numbers
            .get(number)
            .copied()
            .ok_or_else(|| OrderError::UnknownOrder(number.to_string()))?;

        self.orders
            .get_mut(key)
            .ok_or_else(|| OrderError::UnknownOrder(number.to_string()))
    }
}
