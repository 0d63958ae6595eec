use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tuition_journal::domain::status::{PaymentStatus, status_of};
use tuition_journal::domain::student::StudentRecord;

mod common;

use common::{in_month, record};

const CASES: usize = 500;

fn random_history(rng: &mut StdRng) -> Vec<i64> {
    let len = rng.gen_range(0..6);
    (0..len).map(|_| rng.gen_range(0..12)).collect()
}

/// Stamps random billing years on the record and each of its events.
fn with_random_years(mut student: StudentRecord, rng: &mut StdRng) -> StudentRecord {
    student.billing_year = Some(rng.gen_range(2023..=2027));
    for event in &mut student.history {
        event.billing_year = Some(rng.gen_range(2023..=2027));
    }
    student
}

#[test]
fn test_behind_calendar_is_always_overdue() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..CASES {
        let now_month: u32 = rng.gen_range(2..=12);
        let billed = rng.gen_range(0..i64::from(now_month - 1));
        let mut paid = random_history(&mut rng);
        paid.push(billed);

        let student = record(billed, &paid);
        assert_eq!(
            status_of(&student, in_month(now_month)),
            PaymentStatus::Overdue,
            "billed {billed}, now month {now_month}, paid {paid:?}"
        );
    }
}

#[test]
fn test_current_or_ahead_without_payment_is_due() {
    let mut rng = StdRng::seed_from_u64(11);
    for _ in 0..CASES {
        let now_month: u32 = rng.gen_range(1..=12);
        let billed = rng.gen_range(i64::from(now_month - 1)..12);
        let paid: Vec<i64> = random_history(&mut rng)
            .into_iter()
            .filter(|&month| month != billed)
            .collect();

        let student = record(billed, &paid);
        assert_eq!(
            status_of(&student, in_month(now_month)),
            PaymentStatus::Due,
            "billed {billed}, now month {now_month}, paid {paid:?}"
        );
    }
}

#[test]
fn test_current_or_ahead_with_payment_is_paid() {
    let mut rng = StdRng::seed_from_u64(13);
    for _ in 0..CASES {
        let now_month: u32 = rng.gen_range(1..=12);
        let billed = rng.gen_range(i64::from(now_month - 1)..12);
        let mut paid = random_history(&mut rng);
        paid.insert(rng.gen_range(0..=paid.len()), billed);

        let student = record(billed, &paid);
        assert_eq!(
            status_of(&student, in_month(now_month)),
            PaymentStatus::Paid,
            "billed {billed}, now month {now_month}, paid {paid:?}"
        );
    }
}

#[test]
fn test_confirm_payment_grows_history_by_one() {
    let mut rng = StdRng::seed_from_u64(17);
    for _ in 0..CASES {
        let billed = rng.gen_range(0..12);
        let mut student = record(billed, &random_history(&mut rng));
        let before = student.history.clone();

        let event = student.confirm_payment(in_month(rng.gen_range(1..=12))).clone();

        assert_eq!(student.history.len(), before.len() + 1);
        assert_eq!(&student.history[..before.len()], &before[..]);
        assert_eq!(i64::from(event.month_index.value()), billed);
        assert_eq!(
            i64::from(student.current_month_index.value()),
            (billed + 1) % 12
        );
    }
}

#[test]
fn test_default_status_ignores_billing_years() {
    let mut rng = StdRng::seed_from_u64(19);
    for _ in 0..CASES {
        let now_month: u32 = rng.gen_range(1..=12);
        let billed = rng.gen_range(0..12);
        let mut paid = random_history(&mut rng);
        if rng.gen_bool(0.5) {
            paid.push(billed);
        }

        let plain = record(billed, &paid);
        let dated = with_random_years(plain.clone(), &mut rng);
        assert_eq!(
            status_of(&dated, in_month(now_month)),
            status_of(&plain, in_month(now_month)),
            "billed {billed}, now month {now_month}, paid {paid:?}, years {:?}",
            dated.history.iter().map(|e| e.billing_year).collect::<Vec<_>>()
        );
    }
}

#[test]
fn test_paid_with_any_billing_year() {
    let mut rng = StdRng::seed_from_u64(23);
    for _ in 0..CASES {
        let now_month: u32 = rng.gen_range(1..=12);
        let billed = rng.gen_range(i64::from(now_month - 1)..12);
        let mut paid = random_history(&mut rng);
        paid.push(billed);

        let student = with_random_years(record(billed, &paid), &mut rng);
        assert_eq!(
            status_of(&student, in_month(now_month)),
            PaymentStatus::Paid,
            "billed {billed}, now month {now_month}, paid {paid:?}"
        );
    }
}
