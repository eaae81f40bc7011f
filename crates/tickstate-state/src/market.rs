//! Market buy-limit counters.

use std::fmt;

use chrono::{DateTime, Duration, Utc};

/// Limit assumed for items without a published one.
pub const DEFAULT_BUY_LIMIT: i32 = 100;

/// Length of the rolling purchase window.
#[must_use]
pub fn buy_limit_window() -> Duration {
    Duration::hours(4)
}

/// Purchase allowance for one item inside the current window.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BuyLimitStatus {
    /// Item id.
    pub item_id: i32,
    /// Maximum purchasable per window.
    pub limit: i32,
    /// Quantity already bought in the window.
    pub bought_in_window: i32,
    /// Time until the window resets. Zero when no window is active.
    pub reset_in: Duration,
}

impl BuyLimitStatus {
    /// Status with an optional published limit. Non-positive or missing
    /// limits fall back to [`DEFAULT_BUY_LIMIT`].
    #[must_use]
    pub fn new(item_id: i32, limit: Option<i32>, bought_in_window: i32, reset_in: Duration) -> Self {
        Self {
            item_id,
            limit: limit.filter(|l| *l > 0).unwrap_or(DEFAULT_BUY_LIMIT),
            bought_in_window: bought_in_window.max(0),
            reset_in: reset_in.max(Duration::zero()),
        }
    }

    /// Status for a window opened by the first purchase at `window_start`.
    /// An expired window counts as fresh.
    #[must_use]
    pub fn from_window(
        item_id: i32,
        limit: Option<i32>,
        bought_in_window: i32,
        window_start: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Self {
        let reset_at = window_start + buy_limit_window();
        if now >= reset_at {
            return Self::new(item_id, limit, 0, Duration::zero());
        }
        Self::new(item_id, limit, bought_in_window, reset_at - now)
    }

    /// Quantity still purchasable: `max(0, limit - bought)`.
    #[must_use]
    pub fn remaining(&self) -> i32 {
        (self.limit - self.bought_in_window).max(0)
    }

    /// No allowance left.
    #[must_use]
    pub fn is_limit_reached(&self) -> bool {
        self.remaining() == 0
    }

    /// Whether `quantity` fits in the allowance.
    #[must_use]
    pub fn can_buy(&self, quantity: i32) -> bool {
        self.remaining() >= quantity
    }

    /// Largest purchasable part of `desired`.
    #[must_use]
    pub fn max_purchasable(&self, desired: i32) -> i32 {
        self.remaining().min(desired)
    }

    /// Part of `quantity` over the allowance.
    #[must_use]
    pub fn excess(&self, quantity: i32) -> i32 {
        (quantity - self.remaining()).max(0)
    }

    /// Share of the limit used, 0..=100.
    #[must_use]
    pub fn percent_used(&self) -> i32 {
        if self.limit <= 0 {
            return 0;
        }
        (i64::from(self.bought_in_window) * 100 / i64::from(self.limit)).min(100) as i32
    }

    /// Whether purchases are being counted against a running window.
    #[must_use]
    pub fn has_active_window(&self) -> bool {
        self.bought_in_window > 0 && self.reset_in > Duration::zero()
    }

    /// Time until reset as `"Ready"`, `"3h 45m"` or `"12m"`.
    #[must_use]
    pub fn formatted_reset(&self) -> String {
        if self.reset_in <= Duration::zero() {
            return "Ready".to_string();
        }
        let hours = self.reset_in.num_hours();
        let minutes = self.reset_in.num_minutes() % 60;
        if hours > 0 {
            format!("{hours}h {minutes}m")
        } else {
            format!("{minutes}m")
        }
    }
}

impl fmt::Display for BuyLimitStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "BuyLimit[item={}, {}/{} used, remaining={}, reset={}]",
            self.item_id,
            self.bought_in_window,
            self.limit,
            self.remaining(),
            self.formatted_reset()
        )
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
