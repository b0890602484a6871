//! Ledger records and call arguments.

use crate::{BalanceOf, Config};
use codec::{Decode, DecodeWithMemTracking, Encode, MaxEncodedLen};
use polkadot_sdk::frame_support::pallet_prelude::*;
use primitives::{IdentityDocument, Nullifier, ShareRule, canonical_date, canonical_name};
use scale_info::{TypeInfo, prelude::vec::Vec};

/// Liveness window of one owner. A zero window means succession is not configured.
#[derive(
  Clone,
  Copy,
  Debug,
  Default,
  Decode,
  DecodeWithMemTracking,
  Encode,
  Eq,
  PartialEq,
  TypeInfo,
  MaxEncodedLen,
)]
pub struct LivenessConfig<Moment> {
  pub window: Moment,
  pub last_check_in: Moment,
}

/// How a beneficiary is addressed: by account, or by identity commitment.
#[derive(
  Clone, Debug, Decode, DecodeWithMemTracking, Encode, Eq, PartialEq, TypeInfo, MaxEncodedLen,
)]
pub enum BeneficiaryKey<AccountId, Hash> {
  Account(AccountId),
  Identity(Hash),
}

/// Canonical identity tuple committed to by identity-addressed beneficiaries.
#[derive(
  CloneNoBound,
  Decode,
  DecodeWithMemTracking,
  Encode,
  EqNoBound,
  PartialEqNoBound,
  RuntimeDebugNoBound,
  TypeInfo,
  MaxEncodedLen,
)]
#[scale_info(skip_type_params(T))]
pub struct IdentityFields<T: Config> {
  pub first_name: BoundedVec<u8, T::MaxIdentityFieldLength>,
  pub last_name: BoundedVec<u8, T::MaxIdentityFieldLength>,
  pub date_of_birth: BoundedVec<u8, T::MaxIdentityFieldLength>,
}

impl<T: Config> IdentityFields<T> {
  /// `None` when a field exceeds `MaxIdentityFieldLength`.
  pub fn new(first_name: Vec<u8>, last_name: Vec<u8>, date_of_birth: Vec<u8>) -> Option<Self> {
    Some(Self {
      first_name: first_name.try_into().ok()?,
      last_name: last_name.try_into().ok()?,
      date_of_birth: date_of_birth.try_into().ok()?,
    })
  }

  /// Canonical form of the disclosed part of a proof.
  pub fn from_document(document: &IdentityDocument) -> Option<Self> {
    let (first_name, last_name, date_of_birth) = document.committed_tuple();
    Self::new(first_name, last_name, date_of_birth)
  }

  pub fn canonical(&self) -> Self {
    // Canonicalisation never grows a field, so truncation is lossless.
    Self {
      first_name: BoundedVec::truncate_from(canonical_name(&self.first_name)),
      last_name: BoundedVec::truncate_from(canonical_name(&self.last_name)),
      date_of_birth: BoundedVec::truncate_from(canonical_date(&self.date_of_birth)),
    }
  }

  pub fn is_complete(&self) -> bool {
    !self.first_name.is_empty() && !self.last_name.is_empty() && !self.date_of_birth.is_empty()
  }
}

/// Addressing mode of a beneficiary record with its mode-specific state.
#[derive(
  CloneNoBound,
  Decode,
  DecodeWithMemTracking,
  Encode,
  EqNoBound,
  PartialEqNoBound,
  RuntimeDebugNoBound,
  TypeInfo,
  MaxEncodedLen,
)]
#[scale_info(skip_type_params(T))]
pub enum Addressing<T: Config> {
  /// Completion is tracked per asset only.
  Direct,
  Identity {
    /// Canonical fields stored when the record was created.
    fields: IdentityFields<T>,
    /// Whole-record, one-shot unlock flag.
    claimed: bool,
    /// Proof token consumed by the unlock.
    nullifier: Option<Nullifier>,
    /// Account the proof resolved to.
    claimant: Option<T::AccountId>,
  },
}

/// Allocation rules of one beneficiary under one owner.
#[derive(
  CloneNoBound,
  Decode,
  DecodeWithMemTracking,
  Encode,
  EqNoBound,
  PartialEqNoBound,
  RuntimeDebugNoBound,
  TypeInfo,
  MaxEncodedLen,
)]
#[scale_info(skip_type_params(T))]
pub struct BeneficiaryRecord<T: Config> {
  pub addressing: Addressing<T>,
  /// Ordered and duplicate free.
  pub allocations: BoundedVec<(T::AssetId, ShareRule<BalanceOf<T>>), T::MaxAssetsPerBeneficiary>,
}

impl<T: Config> BeneficiaryRecord<T> {
  pub fn new(addressing: Addressing<T>) -> Self {
    Self {
      addressing,
      allocations: BoundedVec::default(),
    }
  }

  pub fn rule(&self, asset: &T::AssetId) -> Option<&ShareRule<BalanceOf<T>>> {
    self
      .allocations
      .iter()
      .find(|(candidate, _)| candidate == asset)
      .map(|(_, rule)| rule)
  }

  /// `true` for identity records whose proof has already been consumed.
  pub fn is_identity_unlocked(&self) -> bool {
    matches!(self.addressing, Addressing::Identity { claimed: true, .. })
  }
}

/// Beneficiary named by `set_allocation`.
#[derive(
  CloneNoBound,
  Decode,
  DecodeWithMemTracking,
  Encode,
  EqNoBound,
  PartialEqNoBound,
  RuntimeDebugNoBound,
  TypeInfo,
)]
#[scale_info(skip_type_params(T))]
pub enum BeneficiaryTarget<T: Config> {
  Direct(T::AccountId),
  Identity(IdentityFields<T>),
}

/// Outcome of one pass over a beneficiary's allocations.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct ClaimReport {
  /// Legs paid out in this pass.
  pub claimed: u32,
  /// Legs whose transfer was declined; they stay pending.
  pub failed: u32,
  /// Legs closed without a transfer because nothing was owed or held.
  pub closed_empty: u32,
}
