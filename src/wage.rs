use rust_decimal::{Decimal, RoundingStrategy};

use crate::consts::FULL_DAY_HOURS;

/// Earned amount for `hours_worked` at `daily_wage`, rounded half-up to a whole unit
///
/// A full day is [`FULL_DAY_HOURS`] hours. Callers must not pass negative hours.
pub fn calculate_earnings(daily_wage: Decimal, hours_worked: Decimal) -> Decimal {
    debug_assert!(hours_worked >= Decimal::ZERO, "hours_worked must not be negative");

    (daily_wage / Decimal::from(FULL_DAY_HOURS) * hours_worked)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}
