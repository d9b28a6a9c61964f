//! Orders emitted by a tick.

use crate::{Price, Quantity, Symbol};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Order side: buy or sell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderSide {
    Buy,
    Sell,
}

impl OrderSide {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Buy => "buy",
            Self::Sell => "sell",
        }
    }
}

impl fmt::Display for OrderSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An order submitted to the venue.
///
/// `quantity` is signed: positive = buy, negative = sell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub symbol: Symbol,
    pub price: Price,
    pub quantity: Quantity,
}

impl Order {
    /// Buy `size` lots (magnitude) at `price`.
    pub fn buy(symbol: Symbol, price: Price, size: Quantity) -> Self {
        Self {
            symbol,
            price,
            quantity: size.abs(),
        }
    }

    /// Sell `size` lots (magnitude) at `price`.
    pub fn sell(symbol: Symbol, price: Price, size: Quantity) -> Self {
        Self {
            symbol,
            price,
            quantity: -size.abs(),
        }
    }

    pub fn side(&self) -> OrderSide {
        if self.quantity.is_negative() {
            OrderSide::Sell
        } else {
            OrderSide::Buy
        }
    }

    /// Unsigned order size.
    pub fn size(&self) -> Quantity {
        self.quantity.abs()
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}x {} @ {}",
            self.side(),
            self.size(),
            self.symbol,
            self.price
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sell_stores_negative_quantity() {
        let order = Order::sell(Symbol::from("KELP"), Price(11), Quantity(4));
        assert_eq!(order.quantity, Quantity(-4));
        assert_eq!(order.side(), OrderSide::Sell);
        assert_eq!(order.size(), Quantity(4));
    }

    #[test]
    fn test_buy_ignores_input_sign() {
        let order = Order::buy(Symbol::from("KELP"), Price(9), Quantity(-5));
        assert_eq!(order.quantity, Quantity(5));
        assert_eq!(order.side(), OrderSide::Buy);
    }
}
