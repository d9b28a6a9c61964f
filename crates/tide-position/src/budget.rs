//! Per-tick position budget.
//!
//! The venue checks the aggregate of each side's orders against the absolute
//! limit, starting from the position held at the beginning of the tick. The
//! budget mirrors that: buys and sells accumulate separately and are each
//! checked from the starting position. Venue-supplied sizes can be
//! arbitrary `i64`s, so every projection saturates instead of overflowing.

use tide_core::Quantity;
use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionBudget {
    position: Quantity,
    limit: Quantity,
    bought: Quantity,
    sold: Quantity,
}

impl PositionBudget {
    /// Budget for one instrument. A negative limit is treated as 0.
    pub fn new(position: Quantity, limit: Quantity) -> Self {
        Self {
            position,
            limit: if limit.is_negative() {
                Quantity::ZERO
            } else {
                limit
            },
            bought: Quantity::ZERO,
            sold: Quantity::ZERO,
        }
    }

    pub fn position(&self) -> Quantity {
        self.position
    }

    pub fn limit(&self) -> Quantity {
        self.limit
    }

    /// Long exposure if every buy recorded so far fills.
    pub fn projected_long(&self) -> Quantity {
        self.position.saturating_add(self.bought)
    }

    /// Short exposure if every sell recorded so far fills.
    pub fn projected_short(&self) -> Quantity {
        self.position.saturating_sub(self.sold)
    }

    /// Whether buying `size` more keeps the projected long side within `+L`.
    pub fn can_buy(&self, size: Quantity) -> bool {
        self.projected_long().saturating_add(size.abs()) <= self.limit
    }

    /// Whether selling `size` more keeps the projected short side within `-L`.
    pub fn can_sell(&self, size: Quantity) -> bool {
        self.projected_short().saturating_sub(size.abs()) >= -self.limit
    }

    /// Room left on the buy side (0 when at or over the limit).
    pub fn buy_capacity(&self) -> Quantity {
        let room = self.limit.saturating_sub(self.projected_long());
        if room.is_negative() {
            Quantity::ZERO
        } else {
            room
        }
    }

    /// Room left on the sell side (0 when at or over the limit).
    pub fn sell_capacity(&self) -> Quantity {
        let room = self.limit.saturating_add(self.projected_short());
        if room.is_negative() {
            Quantity::ZERO
        } else {
            room
        }
    }

    pub fn record_buy(&mut self, size: Quantity) {
        self.bought = self.bought.saturating_add(size.abs());
        trace!(bought = %self.bought, limit = %self.limit, "budget buy recorded");
    }

    pub fn record_sell(&mut self, size: Quantity) {
        self.sold = self.sold.saturating_add(size.abs());
        trace!(sold = %self.sold, limit = %self.limit, "budget sell recorded");
    }
}
