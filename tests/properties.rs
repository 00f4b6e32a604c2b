use chrono::NaiveDate;
use quickcheck::TestResult;
use quickcheck_macros::quickcheck;
use real_gold::domain::{CpiRecord, PricePoint};
use real_gold::engine::{analyze, cumulative_index};

fn month(i: usize) -> NaiveDate {
    NaiveDate::from_ymd_opt(2000 + (i / 12) as i32, (i % 12) as u32 + 1, 1).unwrap()
}

fn series(values: &[u16], rates: &[i8], scale: f64) -> (Vec<PricePoint>, Vec<CpiRecord>) {
    let n = values.len().min(rates.len());
    let prices = (0..n)
        .map(|i| PricePoint { period: month(i), value: (values[i] as f64 + 1.0) * scale })
        .collect();
    let cpi = (0..n)
        .map(|i| CpiRecord { period: month(i), rate: rates[i] as f64 / 10.0 })
        .collect();
    (prices, cpi)
}

fn start() -> NaiveDate {
    month(0)
}

#[quickcheck]
fn whole_period_cagr_is_scale_invariant(values: Vec<u16>, rates: Vec<i8>, k: u16) -> TestResult {
    if values.len().min(rates.len()) < 2 {
        return TestResult::discard();
    }
    let k = k as f64 / 100.0 + 0.01;

    let (p1, c1) = series(&values, &rates, 1.0);
    let (p2, c2) = series(&values, &rates, k);
    let a = analyze(&p1, &c1, start()).unwrap().cagr;
    let b = analyze(&p2, &c2, start()).unwrap().cagr;

    TestResult::from_bool((a - b).abs() <= 1e-9 * (1.0 + a.abs()))
}

#[quickcheck]
fn index_stays_positive_above_total_loss(rates: Vec<i8>) -> bool {
    // Keep every rate within (-50%, +50%).
    let rates: Vec<f64> = rates.iter().map(|&r| r as f64 * 0.39).collect();
    cumulative_index(&rates).unwrap().iter().all(|&v| v > 0.0)
}

#[quickcheck]
fn first_real_value_equals_nominal(values: Vec<u16>, rates: Vec<i8>) -> TestResult {
    if values.len().min(rates.len()) < 2 {
        return TestResult::discard();
    }
    let (prices, cpi) = series(&values, &rates, 1.0);
    let analysis = analyze(&prices, &cpi, start()).unwrap();
    let first = analysis.records[0];

    TestResult::from_bool(
        first.value_real == first.value
            && first.cumulative_change_real == 0.0
            && first.monthly_change_real.is_none()
            && first.annualized_change_real.is_none(),
    )
}

#[quickcheck]
fn reinflating_recovers_nominal(values: Vec<u16>, rates: Vec<i8>) -> TestResult {
    if values.len().min(rates.len()) < 2 {
        return TestResult::discard();
    }
    let (prices, cpi) = series(&values, &rates, 1.0);
    let analysis = analyze(&prices, &cpi, start()).unwrap();
    let base = analysis.records[0].index;

    TestResult::from_bool(analysis.records.iter().all(|r| {
        let nominal = r.value_real * r.index / base;
        (nominal - r.value).abs() <= 1e-9 * r.value
    }))
}
