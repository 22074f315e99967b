//! Simulated confirmation receipt for the Review -> Finish step.
//!
//! No transaction is submitted. The receipt id only has to be stable for a
//! given (address, amounts) pair:
//!
//! `receipt_id = xxhash64(address + collateral_micro + borrow_micro)`
//!
//! Amounts are quantized to micro-units (6 decimals) before hashing so the id
//! never depends on raw f64 bit patterns. Price is excluded: it is an input
//! to the risk figures, not part of what the user signs.

use xxhash_rust::xxh64::xxh64;

use crate::risk::Position;
use crate::session::WalletAddress;

/// Micro-units per whole token.
pub const MICRO_UNITS: f64 = 1_000_000.0;

#[derive(Debug, Clone, PartialEq)]
pub struct SimulatedReceipt {
    pub receipt_id: u64,
    pub address: Option<WalletAddress>,
    pub position: Position,
}

impl SimulatedReceipt {
    pub fn new(address: Option<WalletAddress>, position: Position) -> Self {
        let receipt_id = compute_receipt_id(address.as_ref(), &position);
        Self {
            receipt_id,
            address,
            position,
        }
    }

    pub fn receipt_id_hex(&self) -> String {
        format_receipt_id(self.receipt_id)
    }
}

/// Round an amount to integer micro-units.
pub fn quantize_micro(amount: f64) -> u64 {
    if !amount.is_finite() || amount <= 0.0 {
        return 0;
    }
    (amount * MICRO_UNITS).round() as u64
}

pub fn compute_receipt_id(address: Option<&WalletAddress>, position: &Position) -> u64 {
    // 0xFF never appears in UTF-8, so field boundaries stay unambiguous.
    let mut buf = Vec::with_capacity(64);
    if let Some(address) = address {
        buf.extend_from_slice(address.as_str().as_bytes());
    }
    buf.push(0xFF);
    buf.extend_from_slice(&quantize_micro(position.collateral_amount()).to_le_bytes());
    buf.push(0xFF);
    buf.extend_from_slice(&quantize_micro(position.borrow_amount()).to_le_bytes());

    xxh64(&buf, 0)
}

/// 16 lowercase hex characters.
pub fn format_receipt_id(id: u64) -> String {
    format!("{id:016x}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(s: &str) -> WalletAddress {
        WalletAddress::new(s).unwrap()
    }

    #[test]
    fn same_inputs_same_id() {
        let p = Position::new(1000.0, 200.0, 0.85);
        let a = compute_receipt_id(Some(&addr("SP1")), &p);
        let b = compute_receipt_id(Some(&addr("SP1")), &p);
        assert_eq!(a, b);
    }

    #[test]
    fn price_does_not_affect_id() {
        let p = Position::new(1000.0, 200.0, 0.85);
        assert_eq!(
            compute_receipt_id(Some(&addr("SP1")), &p),
            compute_receipt_id(Some(&addr("SP1")), &p.with_price(0.5)),
        );
    }

    #[test]
    fn address_and_amounts_change_id() {
        let p = Position::new(1000.0, 200.0, 0.85);
        let base = compute_receipt_id(Some(&addr("SP1")), &p);
        assert_ne!(base, compute_receipt_id(Some(&addr("SP2")), &p));
        assert_ne!(base, compute_receipt_id(None, &p));
        assert_ne!(
            base,
            compute_receipt_id(Some(&addr("SP1")), &Position::new(1000.0, 201.0, 0.85))
        );
    }

    #[test]
    fn quantize_rounds_to_micro_units() {
        assert_eq!(quantize_micro(1.0), 1_000_000);
        assert_eq!(quantize_micro(0.0000004), 0);
        assert_eq!(quantize_micro(0.0000006), 1);
        assert_eq!(quantize_micro(-3.0), 0);
    }

    #[test]
    fn hex_is_zero_padded() {
        assert_eq!(format_receipt_id(0xab), "00000000000000ab");
        let r = SimulatedReceipt::new(None, Position::default());
        assert_eq!(r.receipt_id_hex().len(), 16);
    }
}
