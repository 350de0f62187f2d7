use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;
use thiserror::Error;

use crate::models::reservation::RentalOptions;

const MILLIS_PER_DAY: i64 = 1000 * 60 * 60 * 24;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PricingError {
    #[error("end date must be after start date ({days} billable days)")]
    InvalidRange { days: i64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RentalOption {
    Gps,
    FullInsurance,
    ChildSeat,
    ExtraDriver,
}

impl RentalOption {
    pub const ALL: [RentalOption; 4] = [
        RentalOption::Gps,
        RentalOption::FullInsurance,
        RentalOption::ChildSeat,
        RentalOption::ExtraDriver,
    ];

    /// Per-day surcharge in currency units.
    pub fn daily_surcharge(self) -> f64 {
        match self {
            RentalOption::Gps => 5.0,
            RentalOption::FullInsurance => 15.0,
            RentalOption::ChildSeat => 8.0,
            RentalOption::ExtraDriver => 10.0,
        }
    }

    pub fn is_selected(self, options: &RentalOptions) -> bool {
        match self {
            RentalOption::Gps => options.gps,
            RentalOption::FullInsurance => options.full_insurance,
            RentalOption::ChildSeat => options.child_seat,
            RentalOption::ExtraDriver => options.extra_driver,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptionCharge {
    pub option: RentalOption,
    pub daily_surcharge: f64,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceQuote {
    pub days: i64,
    pub daily_rate: f64,
    pub base_amount: f64,
    pub options: Vec<OptionCharge>,
    pub total: f64,
}

pub struct PricingService;

impl PricingService {
    /// Billable days between two instants: partial days round up.
    pub fn billable_days(start: NaiveDateTime, end: NaiveDateTime) -> i64 {
        let millis = (end - start).num_milliseconds();
        // ceiling division that also holds for negative spans
        -((-millis).div_euclid(MILLIS_PER_DAY))
    }

    /// Billable days between two calendar dates taken at midnight.
    pub fn day_count(start: NaiveDate, end: NaiveDate) -> i64 {
        Self::billable_days(start.and_time(Default::default()), end.and_time(Default::default()))
    }

    /// Itemised price for a rental, or `InvalidRange` when the range bills no day.
    pub fn quote(
        daily_rate: f64,
        start: NaiveDate,
        end: NaiveDate,
        options: &RentalOptions,
    ) -> Result<PriceQuote, PricingError> {
        let days = Self::day_count(start, end);
        if days <= 0 {
            return Err(PricingError::InvalidRange { days });
        }

        let billed = days as f64;
        let base_amount = daily_rate * billed;
        let charges: Vec<OptionCharge> = RentalOption::ALL
            .into_iter()
            .filter(|option| option.is_selected(options))
            .map(|option| OptionCharge {
                option,
                daily_surcharge: option.daily_surcharge(),
                amount: option.daily_surcharge() * billed,
            })
            .collect();
        let total = base_amount + charges.iter().map(|charge| charge.amount).sum::<f64>();

        Ok(PriceQuote {
            days,
            daily_rate,
            base_amount,
            options: charges,
            total,
        })
    }

    /// Total price; an invalid range yields 0.
    pub fn calculate_total(
        daily_rate: f64,
        start: NaiveDate,
        end: NaiveDate,
        options: &RentalOptions,
    ) -> f64 {
        Self::quote(daily_rate, start, end, options)
            .map(|quote| quote.total)
            .unwrap_or(0.0)
    }
}
