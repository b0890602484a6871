//! Share rules and the basis-point calculator used by the succession ledger.
//!
//! A share is either a fixed quantity of an asset or a fraction of the owner's
//! balance expressed in basis points (10_000 = 100%). Resolution is a pure
//! function of the rule and the balance it is measured against.

use codec::{Decode, DecodeWithMemTracking, Encode, MaxEncodedLen};
use scale_info::TypeInfo;
#[cfg(feature = "std")]
use serde::{Deserialize, Serialize};
use sp_arithmetic::{
  Rounding,
  helpers_128bit::multiply_by_rational_with_rounding,
  traits::{AtLeast32BitUnsigned, SaturatedConversion},
};

/// Basis points representing the whole balance.
pub const MAX_BASIS_POINTS: u16 = 10_000;

/// How much of one asset a beneficiary is entitled to.
#[derive(
  Clone,
  Copy,
  Debug,
  Decode,
  DecodeWithMemTracking,
  Encode,
  Eq,
  MaxEncodedLen,
  PartialEq,
  TypeInfo,
)]
#[cfg_attr(feature = "std", derive(Serialize, Deserialize))]
pub enum Share<Balance> {
  /// A fixed quantity, paid as-is (subject to what the owner still holds).
  Absolute(Balance),
  /// A fraction of the snapshotted balance, in basis points.
  BasisPoints(u16),
}

impl<Balance: AtLeast32BitUnsigned + Copy> Share<Balance> {
  /// A zero share is the deletion marker for an allocation.
  pub fn is_zero(&self) -> bool {
    match self {
      Share::Absolute(amount) => amount.is_zero(),
      Share::BasisPoints(bps) => *bps == 0,
    }
  }

  /// Basis points contributed to the per-asset allocation total.
  pub fn basis_points(&self) -> Option<u16> {
    match self {
      Share::BasisPoints(bps) => Some(*bps),
      Share::Absolute(_) => None,
    }
  }

  /// Absolute shares are unbounded; fractional shares cannot exceed 100%.
  pub fn is_within_bounds(&self) -> bool {
    self
      .basis_points()
      .map_or(true, |bps| bps <= MAX_BASIS_POINTS)
  }

  /// Concrete amount owed for this share measured against `snapshot`.
  pub fn resolve(&self, snapshot: Balance) -> Balance {
    match self {
      Share::Absolute(amount) => *amount,
      Share::BasisPoints(bps) => apply_basis_points(snapshot, *bps),
    }
  }
}

/// `balance * bps / 10_000`, truncated toward zero without intermediate overflow.
pub fn apply_basis_points<Balance: AtLeast32BitUnsigned + Copy>(
  balance: Balance,
  bps: u16,
) -> Balance {
  let scaled = multiply_by_rational_with_rounding(
    balance.saturated_into::<u128>(),
    bps as u128,
    MAX_BASIS_POINTS as u128,
    Rounding::Down,
  )
  .unwrap_or_default();
  scaled.saturated_into()
}

/// A share together with its settlement state.
#[derive(
  Clone,
  Copy,
  Debug,
  Decode,
  DecodeWithMemTracking,
  Encode,
  Eq,
  MaxEncodedLen,
  PartialEq,
  TypeInfo,
)]
#[cfg_attr(feature = "std", derive(Serialize, Deserialize))]
pub struct ShareRule<Balance> {
  pub share: Share<Balance>,
  /// Flips to `true` once the leg is paid out or resolves to nothing. Never resets.
  pub claimed: bool,
}

impl<Balance> ShareRule<Balance> {
  pub fn pending(share: Share<Balance>) -> Self {
    Self {
      share,
      claimed: false,
    }
  }
}
