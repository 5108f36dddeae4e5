//! Date-seeded selection of discounted products.
//!
//! All randomness derives from the calendar date, so two calls with the
//! same catalog and the same date produce identical output, including
//! order and discount percentages. The generator is deliberately not
//! cryptographic; reproducibility within a day is the whole point.

use chrono::NaiveDate;
use vitrine_catalog::Product;

/// Upper bound on the number of specials per day.
pub const MAX_DAILY_SPECIALS: usize = 5;

/// Products cheaper than this never go on special.
pub const MIN_ELIGIBLE_PRICE: f64 = 10.0;

/// Linear congruential generator over the classic 233280 modulus.
/// The first step reduces any 32-bit seed into the modulus range.
struct Lcg {
    state: u64,
}

impl Lcg {
    fn new(seed: u32) -> Self {
        Self {
            state: u64::from(seed),
        }
    }

    /// Advance one step and return a draw uniform in `[0, 1)`.
    fn next_f64(&mut self) -> f64 {
        self.state = (self.state * 9301 + 49297) % 233280;
        self.state as f64 / 233280.0
    }
}

/// Polynomial rolling hash of the ISO `YYYY-MM-DD` form of `date`,
/// truncated to 32 bits.
fn date_seed(date: NaiveDate) -> u32 {
    let iso = date.format("%Y-%m-%d").to_string();
    let mut hash: i32 = 0;
    for ch in iso.chars() {
        hash = hash.wrapping_mul(31).wrapping_add(ch as i32);
    }
    hash.unsigned_abs()
}

fn is_eligible(product: &Product) -> bool {
    product.price > 0.0
        && !product.name.is_empty()
        && !product.brand.is_empty()
        && product.price >= MIN_ELIGIBLE_PRICE
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Stamp a discount onto a copy of `product`. The source is untouched.
fn apply_discount(product: &Product, percent: u32) -> Product {
    let mut discounted = product.clone();
    discounted.original_price = Some(product.price);
    discounted.discount_percentage = Some(percent);
    discounted.is_on_discount = true;
    discounted.price = round2(product.price * (1.0 - f64::from(percent) / 100.0));
    discounted
}

/// Pick up to [`MAX_DAILY_SPECIALS`] eligible products for `date` and
/// assign each an integer discount between 5 and 20 percent.
///
/// Selection draws indices into the eligible list without replacement;
/// a repeated draw is skipped and the generator advances. Discounts are
/// drawn afterwards, one per pick, from the same generator stream.
pub fn select_daily_specials(catalog: &[Product], date: NaiveDate) -> Vec<Product> {
    let eligible: Vec<&Product> = catalog.iter().filter(|p| is_eligible(p)).collect();
    if eligible.is_empty() {
        return Vec::new();
    }

    let mut lcg = Lcg::new(date_seed(date));
    let target = eligible.len().min(MAX_DAILY_SPECIALS);
    let mut picked: Vec<usize> = Vec::with_capacity(target);
    while picked.len() < target {
        let index = (lcg.next_f64() * eligible.len() as f64) as usize;
        if !picked.contains(&index) {
            picked.push(index);
        }
    }

    picked
        .into_iter()
        .map(|index| {
            let percent = (lcg.next_f64() * 16.0) as u32 + 5;
            apply_discount(eligible[index], percent)
        })
        .collect()
}
