//! Adapter traits for the succession pallet.
//!
//! Two capabilities are supplied by the runtime: moving the owner's assets
//! under a spending approval, and checking identity proofs. The pallet never
//! talks to an asset pallet or a proof system directly.

use core::marker::PhantomData;
use frame::prelude::*;
use polkadot_sdk::{
  frame_support::traits::tokens::fungibles::{self, approvals},
  sp_runtime::TokenError,
};
use primitives::VerifiedIdentity;

/// Normalised result of a transfer attempt.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TransferOutcome {
  /// Funds moved.
  Success,
  /// The asset refused the transfer; the leg may be retried later.
  Declined,
  /// The call itself was structurally invalid.
  Malformed,
}

impl TransferOutcome {
  /// Classifies the result of a `DispatchResult`-style asset call.
  pub fn from_dispatch(result: DispatchResult) -> Self {
    match result {
      Ok(()) => TransferOutcome::Success,
      Err(DispatchError::Token(TokenError::UnknownAsset | TokenError::Unsupported)) => {
        TransferOutcome::Malformed
      }
      Err(_) => TransferOutcome::Declined,
    }
  }
}

/// Spending precondition, balance reads and delegated transfers.
pub trait TransferExecutor<AccountId, AssetId, Balance> {
  /// Amount `spender` may still move out of `owner`'s holding of `asset`.
  fn allowance(asset: AssetId, owner: &AccountId, spender: &AccountId) -> Balance;

  fn balance(asset: AssetId, who: &AccountId) -> Balance;

  /// Moves `amount` from `owner` to `to`, spending `spender`'s approval.
  fn transfer_from(
    asset: AssetId,
    owner: &AccountId,
    spender: &AccountId,
    to: &AccountId,
    amount: Balance,
  ) -> TransferOutcome;
}

/// Executor backed by any `fungibles` implementation with approvals, e.g. `pallet-assets`.
pub struct FungiblesApprovals<F>(PhantomData<F>);

impl<AccountId, F> TransferExecutor<AccountId, F::AssetId, F::Balance> for FungiblesApprovals<F>
where
  F: approvals::Mutate<AccountId>,
{
  fn allowance(asset: F::AssetId, owner: &AccountId, spender: &AccountId) -> F::Balance {
    <F as approvals::Inspect<AccountId>>::allowance(asset, owner, spender)
  }

  fn balance(asset: F::AssetId, who: &AccountId) -> F::Balance {
    <F as fungibles::Inspect<AccountId>>::balance(asset, who)
  }

  fn transfer_from(
    asset: F::AssetId,
    owner: &AccountId,
    spender: &AccountId,
    to: &AccountId,
    amount: F::Balance,
  ) -> TransferOutcome {
    TransferOutcome::from_dispatch(<F as approvals::Mutate<AccountId>>::transfer_from(
      asset, owner, spender, to, amount,
    ))
  }
}

/// No-op executor: nothing is approved, nothing moves.
impl<AccountId, AssetId, Balance: Default> TransferExecutor<AccountId, AssetId, Balance> for () {
  fn allowance(_: AssetId, _: &AccountId, _: &AccountId) -> Balance {
    Balance::default()
  }

  fn balance(_: AssetId, _: &AccountId) -> Balance {
    Balance::default()
  }

  fn transfer_from(
    _: AssetId,
    _: &AccountId,
    _: &AccountId,
    _: &AccountId,
    _: Balance,
  ) -> TransferOutcome {
    TransferOutcome::Declined
  }
}

/// External identity proof check.
///
/// The payload format belongs to the verifier; the pallet only consumes the
/// structured result.
pub trait IdentityVerifier<AccountId> {
  fn verify(payload: &[u8]) -> Result<VerifiedIdentity<AccountId>, DispatchError>;
}

impl<AccountId> IdentityVerifier<AccountId> for () {
  fn verify(_: &[u8]) -> Result<VerifiedIdentity<AccountId>, DispatchError> {
    Err(DispatchError::Other("IdentityVerifier not configured"))
  }
}
