//! Ecosystem constants for the succession ledger.
//!
//! Pallet identifiers and default limits shared by runtime configurations and
//! test mocks via the primitives crate.

/// Balance type alias for consistency across ecosystem
pub type Balance = u128;

/// Moment type produced by `pallet-timestamp` (milliseconds).
pub type Moment = u64;

/// Pallet identifiers for deriving pallet-owned accounts.
///
/// These IDs are used by Polkadot SDK's `PalletId::into_account_truncating()`
/// to deterministically generate accounts for pallet-specific operations.
pub mod pallet_ids {
  /// Succession ledger pallet ID. Owners approve this account as the spender of
  /// every asset they allocate.
  pub const SUCCESSION_PALLET_ID: &[u8; 8] = b"py/sucsn";
}

/// Default limits for runtime configurations.
pub mod params {
  /// Distinct assets a single beneficiary record may hold rules for.
  pub const MAX_ASSETS_PER_BENEFICIARY: u32 = 32;

  /// Upper bound for one canonical identity field, in bytes.
  pub const MAX_IDENTITY_FIELD_LENGTH: u32 = 64;

  /// Upper bound for an opaque identity proof payload, in bytes.
  pub const MAX_PROOF_LENGTH: u32 = 4_096;
}

/// Liveness windows are expressed in `pallet-timestamp` milliseconds.
pub mod time {
  use super::Moment;

  pub const MILLISECS_PER_SECOND: Moment = 1_000;
  pub const MINUTES: Moment = 60 * MILLISECS_PER_SECOND;
  pub const HOURS: Moment = 60 * MINUTES;
  pub const DAYS: Moment = 24 * HOURS;
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn pallet_ids_are_correct_length() {
    assert_eq!(pallet_ids::SUCCESSION_PALLET_ID.len(), 8);
  }

  #[test]
  fn day_is_in_milliseconds() {
    assert_eq!(time::DAYS, 86_400_000);
  }
}
