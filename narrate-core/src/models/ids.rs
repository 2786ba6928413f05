//! Reference numbers stamped on receipts and roster entries.

use chrono::{DateTime, Utc};
use rand::Rng;
use rand::distributions::Alphanumeric;

fn suffix<R: Rng + ?Sized>(rng: &mut R) -> String {
    (0..4)
        .map(|_| char::from(rng.sample(Alphanumeric)).to_ascii_uppercase())
        .collect()
}

fn to_base36(mut n: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";
    if n == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while n > 0 {
        out.push(DIGITS[(n % 36) as usize]);
        n /= 36;
    }
    out.reverse();
    String::from_utf8_lossy(&out).into_owned()
}

fn millis(now: DateTime<Utc>) -> u64 {
    u64::try_from(now.timestamp_millis()).unwrap_or_default()
}

/// `TXN<millis><4 chars>`.
pub fn transaction_ref<R: Rng + ?Sized>(
    now: DateTime<Utc>,
    rng: &mut R,
) -> String {
    format!("TXN{}{}", millis(now), suffix(rng))
}

/// `NRS-2026-<millis><4 chars>`.
pub fn nrs_receipt_no<R: Rng + ?Sized>(
    now: DateTime<Utc>,
    rng: &mut R,
) -> String {
    format!("NRS-2026-{}{}", millis(now), suffix(rng))
}

/// `TIN-<9 digits>`.
pub fn simulated_tin<R: Rng + ?Sized>(rng: &mut R) -> String {
    let digits: String = (0..9)
        .map(|_| char::from(b'0' + rng.gen_range(0..10u8)))
        .collect();
    format!("TIN-{digits}")
}

/// `EMP-<millis in base 36>`.
pub fn employee_id(now: DateTime<Utc>) -> String {
    format!("EMP-{}", to_base36(millis(now)))
}
