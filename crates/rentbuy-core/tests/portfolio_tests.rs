use pretty_assertions::assert_eq;
use rentbuy_core::buy_rent::property::PropertyRecord;
use rentbuy_core::portfolio::batch::{analyze_portfolio, PortfolioInput, PortfolioSummary};
use rentbuy_core::portfolio::city::{city_summary, CitySummaryInput};
use rentbuy_core::portfolio::rates::{average_rate, BankRate};
use rentbuy_core::{Decision, FinancialPolicy, RentBuyError};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn listing(title: &str, price: Option<Decimal>, rent: Option<Decimal>) -> PropertyRecord {
    PropertyRecord {
        title: Some(title.into()),
        city: Some("Surat".into()),
        location: Some("Vesu".into()),
        bedrooms: Some("2".into()),
        price,
        rent_estimate: rent,
        area_sqft: Some(dec!(1000)),
    }
}

// ===========================================================================
// Batch isolation
// ===========================================================================

#[test]
fn test_overflowing_listing_does_not_abort_batch() {
    // Price so large that appreciation overflows the decimal range
    let huge = dec!(30_000_000_000_000_000_000_000_000_000);
    let input = PortfolioInput {
        properties: vec![
            listing("ok-1", Some(dec!(10_000_000)), Some(dec!(25_000))),
            listing("huge", Some(huge), Some(dec!(25_000))),
            listing("ok-2", Some(dec!(5_000_000)), Some(dec!(30_000))),
        ],
        market_rate: dec!(8.5),
        policy: FinancialPolicy::default(),
    };

    let out = analyze_portfolio(&input).unwrap();
    let reports = &out.result.reports;

    assert_eq!(reports.len(), 3);
    assert_eq!(reports[0].decision, Some(Decision::Rent));
    assert_eq!(reports[1].title.as_deref(), Some("huge"));
    assert!(reports[1].decision.is_none());
    assert_eq!(reports[2].decision, Some(Decision::Buy));
    assert_eq!(
        out.result.summary,
        PortfolioSummary {
            total: 3,
            buy: 1,
            rent: 1,
            skipped: 0,
            failed: 1,
        }
    );
    assert!(out.warnings.iter().any(|w| w.starts_with("Row 1:")));
}

#[test]
fn test_huge_rent_is_scanned_without_aborting_batch() {
    // Upper rent multipliers push this rent past the decimal range
    let huge_rent = dec!(50_000_000_000_000_000_000_000_000_000);
    let input = PortfolioInput {
        properties: vec![
            listing("ok", Some(dec!(10_000_000)), Some(dec!(25_000))),
            listing("huge-rent", Some(dec!(10_000_000)), Some(huge_rent)),
        ],
        market_rate: dec!(8.5),
        policy: FinancialPolicy::default(),
    };

    let out = analyze_portfolio(&input).unwrap();
    let reports = &out.result.reports;

    assert_eq!(reports.len(), 2);
    assert_eq!(reports[0].rent_flip, Some(dec!(47_500)));
    assert_eq!(reports[1].decision, Some(Decision::Buy));
    assert_eq!(reports[1].rent_flip, None);
    assert_eq!(out.result.summary.failed, 0);
}

#[test]
fn test_overflowing_rate_trials_are_skipped_not_fatal() {
    // Full financing with no growth: high-rate trials overflow the schedule roll-up
    let mut policy = FinancialPolicy {
        down_payment_rate: dec!(0),
        appreciation_rate: dec!(0),
        investment_return_rate: dec!(0),
        ..FinancialPolicy::default()
    };
    policy.sensitivity.interest_rates.max = dec!(40);

    let input = PortfolioInput {
        properties: vec![
            listing("huge", Some(dec!(20_000_000_000_000_000_000_000_000_000)), Some(dec!(25_000))),
            listing("ok", Some(dec!(10_000_000)), Some(dec!(25_000))),
        ],
        market_rate: dec!(8.5),
        policy,
    };

    let out = analyze_portfolio(&input).unwrap();
    let reports = &out.result.reports;

    assert_eq!(reports.len(), 2);
    assert!(reports[0].decision.is_some());
    assert!(reports[1].decision.is_some());
    assert_eq!(out.result.summary.failed, 0);
}

#[test]
fn test_invalid_policy_fails_whole_run_up_front() {
    let mut policy = FinancialPolicy::default();
    policy.sensitivity.holding_periods.clear();
    let input = PortfolioInput {
        properties: vec![listing("a", Some(dec!(10_000_000)), Some(dec!(25_000)))],
        market_rate: dec!(8.5),
        policy,
    };
    assert!(matches!(
        analyze_portfolio(&input),
        Err(RentBuyError::InvalidPolicy { .. })
    ));
}

#[test]
fn test_large_batch_preserves_input_order() {
    let properties: Vec<PropertyRecord> = (1..=200)
        .map(|i| {
            listing(
                &format!("listing-{i}"),
                Some(Decimal::from(i) * dec!(100_000)),
                Some(Decimal::from(i) * dec!(400)),
            )
        })
        .collect();
    let input = PortfolioInput {
        properties,
        market_rate: dec!(9.0),
        policy: FinancialPolicy::default(),
    };
    let out = analyze_portfolio(&input).unwrap();
    for (i, report) in out.result.reports.iter().enumerate() {
        assert_eq!(report.title, Some(format!("listing-{}", i + 1)));
        assert_eq!(report.price_inr, Some(Decimal::from(i + 1) * dec!(100_000)));
    }
    assert_eq!(out.result.summary.total, 200);
    assert_eq!(out.result.summary.buy + out.result.summary.rent, 200);
}

#[test]
fn test_portfolio_json_round_trip_input() {
    let json = r#"{
        "properties": [
            { "title": "A", "price": "10000000", "rent_estimate": "25000", "area_sqft": "1250" },
            { "title": "B", "price": null, "rent_estimate": "18000" }
        ],
        "market_rate": "8.5"
    }"#;
    let input: PortfolioInput = serde_json::from_str(json).unwrap();
    assert_eq!(input.policy, FinancialPolicy::default());

    let out = analyze_portfolio(&input).unwrap();
    assert_eq!(out.result.reports[0].monthly_installment, Some(dec!(65_087)));
    assert_eq!(out.result.summary.skipped, 1);
}

// ===========================================================================
// Market rate and city summary
// ===========================================================================

#[test]
fn test_market_rate_from_bank_table() {
    let rates = vec![
        BankRate {
            bank: Some("SBI".into()),
            rate: dec!(8.40),
        },
        BankRate {
            bank: Some("HDFC".into()),
            rate: dec!(8.75),
        },
        BankRate {
            bank: None,
            rate: dec!(8.35),
        },
    ];
    assert_eq!(average_rate(&rates).unwrap(), dec!(8.5));
}

#[test]
fn test_city_summary_uses_escalating_rent() {
    let out = city_summary(&CitySummaryInput {
        properties: vec![
            listing("a", Some(dec!(10_000_000)), Some(dec!(25_000))),
            listing("b", Some(dec!(10_000_000)), Some(dec!(25_000))),
        ],
        city: "surat".into(),
        market_rate: dec!(8.5),
        policy: FinancialPolicy::default(),
    })
    .unwrap();

    let summary = &out.result;
    assert_eq!(summary.listings_used, 2);
    assert_eq!(summary.evaluation.monthly_installment.round(), dec!(65_087));
    // Flat rent would total 6,000,000 over 20 years
    assert!(summary.total_rent_paid > dec!(6_000_000));
    assert_eq!(summary.trajectory.len(), 20);
    assert!(summary.trajectory.windows(2).all(|w| w[0].buy_wealth < w[1].buy_wealth));
}
