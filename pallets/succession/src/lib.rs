//! Succession Ledger Pallet
//!
//! Owner-authorized, liveness-gated release of assets to beneficiaries.
//!
//! An owner configures a liveness window and keeps checking in. While the
//! window holds, the owner is alive and nothing can be claimed. Once it lapses,
//! each beneficiary may pull the assets allocated to them out of the owner's
//! holdings, using the spending approval the owner granted to the ledger
//! account when allocating.
//!
//! Beneficiaries are addressed either by account or by a commitment over their
//! canonical identity fields. The latter unlock through an external identity
//! proof whose uniqueness token (nullifier) can be consumed only once.
//!
//! Fractional (basis-point) shares are measured against a per-asset balance
//! snapshot frozen at the first claim after the owner lapsed, so every
//! beneficiary's percentage refers to the same estate.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub use pallet::*;

pub mod adapters;
pub use adapters::{FungiblesApprovals, IdentityVerifier, TransferExecutor, TransferOutcome};

pub mod types;
pub use types::*;

pub mod weights;
pub use weights::WeightInfo;

#[cfg(test)]
mod mock;

#[cfg(feature = "runtime-benchmarks")]
mod benchmarking;

pub(crate) const LOG_TARGET: &str = "runtime::succession";

#[cfg(feature = "runtime-benchmarks")]
pub trait BenchmarkHelper<AccountId, AssetId, Balance, Moment> {
  /// Creates asset number `index`, credits `owner` with `amount` of it and
  /// approves `spender` for the whole amount.
  fn setup_asset(owner: &AccountId, spender: &AccountId, index: u32, amount: Balance) -> AssetId;

  /// Payload the configured `IdentityVerifier` resolves to `identity`.
  fn identity_proof(identity: &primitives::VerifiedIdentity<AccountId>) -> alloc::vec::Vec<u8>;

  fn set_time(now: Moment);
}

#[frame::pallet]
pub mod pallet {
  use super::{
    Addressing, BeneficiaryKey, BeneficiaryRecord, BeneficiaryTarget, ClaimReport,
    IdentityFields, IdentityVerifier as _, LOG_TARGET, LivenessConfig, TransferExecutor as _,
    TransferOutcome, WeightInfo,
  };
  use alloc::vec::Vec;
  use frame::prelude::*;
  use polkadot_sdk::{
    frame_support::{
      PalletId,
      storage::{TransactionOutcome, with_transaction},
      traits::Time,
    },
    sp_runtime::traits::{AccountIdConversion, Hash as _, Saturating, Zero},
  };
  use primitives::{MAX_BASIS_POINTS, Nullifier, Share, ShareRule};

  pub type BalanceOf<T> = <T as Config>::Balance;
  pub type MomentOf<T> = <<T as Config>::Time as Time>::Moment;
  pub type BeneficiaryKeyOf<T> = BeneficiaryKey<
    <T as frame_system::Config>::AccountId,
    <T as frame_system::Config>::Hash,
  >;

  #[pallet::config]
  pub trait Config: frame_system::Config {
    type AssetId: Parameter + Member + Copy + MaybeSerializeDeserialize + MaxEncodedLen;

    type Balance: Parameter
      + Member
      + AtLeast32BitUnsigned
      + Default
      + Copy
      + MaybeSerializeDeserialize
      + MaxEncodedLen;

    /// Approval-based transfers out of owners' holdings.
    type Assets: crate::TransferExecutor<Self::AccountId, Self::AssetId, Self::Balance>;

    /// External identity proof check for identity-addressed beneficiaries.
    type IdentityVerifier: crate::IdentityVerifier<Self::AccountId>;

    /// Clock that liveness windows are measured against.
    type Time: Time;

    /// Derives the ledger account owners approve as spender.
    #[pallet::constant]
    type PalletId: Get<PalletId>;

    #[pallet::constant]
    type MaxAssetsPerBeneficiary: Get<u32>;
    #[pallet::constant]
    type MaxIdentityFieldLength: Get<u32>;
    #[pallet::constant]
    type MaxProofLength: Get<u32>;

    #[cfg(feature = "runtime-benchmarks")]
    type BenchmarkHelper: crate::BenchmarkHelper<
        Self::AccountId,
        Self::AssetId,
        Self::Balance,
        MomentOf<Self>,
      >;

    type WeightInfo: WeightInfo;
  }

  #[pallet::pallet]
  pub struct Pallet<T>(_);

  /// Liveness window and last check-in per owner.
  #[pallet::storage]
  #[pallet::getter(fn liveness_config)]
  pub type SuccessionConfigs<T: Config> =
    StorageMap<_, Blake2_128Concat, T::AccountId, LivenessConfig<MomentOf<T>>, ValueQuery>;

  #[pallet::storage]
  #[pallet::getter(fn beneficiary)]
  pub type Beneficiaries<T: Config> = StorageDoubleMap<
    _,
    Blake2_128Concat,
    T::AccountId,
    Blake2_128Concat,
    BeneficiaryKeyOf<T>,
    BeneficiaryRecord<T>,
    OptionQuery,
  >;

  /// Sum of basis-point shares per (owner, asset). Never above `MAX_BASIS_POINTS`.
  #[pallet::storage]
  #[pallet::getter(fn allocated_basis_points)]
  pub type AllocatedBasisPoints<T: Config> = StorageDoubleMap<
    _,
    Blake2_128Concat,
    T::AccountId,
    Blake2_128Concat,
    T::AssetId,
    u16,
    ValueQuery,
  >;

  /// Owner balance frozen at the first claim on an asset. Written once.
  #[pallet::storage]
  #[pallet::getter(fn snapshot_of)]
  pub type BalanceSnapshots<T: Config> = StorageDoubleMap<
    _,
    Blake2_128Concat,
    T::AccountId,
    Blake2_128Concat,
    T::AssetId,
    BalanceOf<T>,
    OptionQuery,
  >;

  /// Identity proof tokens already spent, across all owners. Insert only.
  #[pallet::storage]
  pub type ConsumedNullifiers<T: Config> = StorageMap<_, Blake2_128Concat, Nullifier, ()>;

  #[pallet::hooks]
  impl<T: Config> Hooks<BlockNumberFor<T>> for Pallet<T> {
    fn integrity_test() {
      assert!(
        T::MaxAssetsPerBeneficiary::get() > 0,
        "MaxAssetsPerBeneficiary must allow at least one asset"
      );
      assert!(
        T::MaxIdentityFieldLength::get() > 0,
        "MaxIdentityFieldLength must allow non-empty identity fields"
      );
    }
  }

  #[pallet::event]
  #[pallet::generate_deposit(pub(super) fn deposit_event)]
  pub enum Event<T: Config> {
    LivenessConfigured {
      owner: T::AccountId,
      window: MomentOf<T>,
    },
    CheckedIn {
      owner: T::AccountId,
      at: MomentOf<T>,
    },
    /// First allocation call for this beneficiary.
    BeneficiaryCreated {
      owner: T::AccountId,
      beneficiary: BeneficiaryKeyOf<T>,
    },
    BeneficiaryUpdated {
      owner: T::AccountId,
      beneficiary: BeneficiaryKeyOf<T>,
    },
    AllocationSet {
      owner: T::AccountId,
      beneficiary: BeneficiaryKeyOf<T>,
      asset: T::AssetId,
      share: Share<BalanceOf<T>>,
    },
    AllocationRemoved {
      owner: T::AccountId,
      beneficiary: BeneficiaryKeyOf<T>,
      asset: T::AssetId,
    },
    SnapshotTaken {
      owner: T::AccountId,
      asset: T::AssetId,
      balance: BalanceOf<T>,
    },
    AssetClaimed {
      owner: T::AccountId,
      beneficiary: BeneficiaryKeyOf<T>,
      asset: T::AssetId,
      to: T::AccountId,
      amount: BalanceOf<T>,
    },
    /// The transfer was declined; the leg stays pending for a later claim.
    AssetClaimFailed {
      owner: T::AccountId,
      beneficiary: BeneficiaryKeyOf<T>,
      asset: T::AssetId,
      to: T::AccountId,
      amount: BalanceOf<T>,
    },
    ClaimProcessed {
      owner: T::AccountId,
      beneficiary: BeneficiaryKeyOf<T>,
      claimed: u32,
      failed: u32,
    },
    IdentityClaimUnlocked {
      owner: T::AccountId,
      identity: T::Hash,
      claimant: T::AccountId,
      nullifier: Nullifier,
    },
  }

  #[pallet::error]
  pub enum Error<T> {
    /// A liveness window must be non-zero.
    InvalidDuration,
    /// The owner has not configured a liveness window.
    NotConfigured,
    /// `assets` and `shares` differ in length.
    ArrayLengthMismatch,
    /// Basis-point share above 10_000.
    InvalidShareAmount,
    /// Identity fields are empty or too long.
    InvalidIdentityData,
    /// More distinct assets than `MaxAssetsPerBeneficiary`.
    TooManyAssets,
    /// Basis-point shares for an asset would exceed 100%.
    /// The asset and the would-be total are logged under `runtime::succession`.
    BpsExceeded,
    /// The owner has not approved the ledger account for an asset.
    /// The offending asset is logged under `runtime::succession`.
    NoApproval,
    /// The owner's liveness window has not lapsed.
    OwnerStillAlive,
    /// No allocation record for this beneficiary.
    NotBeneficiary,
    /// The identity record has already been unlocked.
    IdentityAlreadyClaimed,
    /// The proof's uniqueness token was already consumed.
    NullifierAlreadyUsed,
    /// Disclosed identity does not match the committed one.
    IdentityMismatch,
    /// The verifier rejected the proof or a required check failed.
    ProofRejected,
    /// Only the account an identity proof resolved to may resume its claim.
    NotIdentityClaimant,
    /// The asset rejected the transfer call as structurally invalid.
    MalformedTransfer,
  }

  #[pallet::call]
  impl<T: Config> Pallet<T> {
    /// Set (or change) the liveness window and restart it from now.
    #[pallet::call_index(0)]
    #[pallet::weight(T::WeightInfo::configure_liveness())]
    pub fn configure_liveness(origin: OriginFor<T>, window: MomentOf<T>) -> DispatchResult {
      let owner = ensure_signed(origin)?;
      Self::do_configure_liveness(&owner, window)
    }

    /// Prove liveness.
    #[pallet::call_index(1)]
    #[pallet::weight(T::WeightInfo::check_in())]
    pub fn check_in(origin: OriginFor<T>) -> DispatchResult {
      let owner = ensure_signed(origin)?;
      Self::do_check_in(&owner)
    }

    /// Create or update the allocation rules of one beneficiary.
    ///
    /// - `beneficiary`: an account, or identity fields committed to by hash.
    /// - `assets`/`shares`: pairwise rules; a zero share removes the asset.
    ///
    /// Every asset must be approved to [`Pallet::ledger_account`]. The call is
    /// atomic: any failing pair reverts the whole call.
    #[pallet::call_index(2)]
    #[pallet::weight(T::WeightInfo::set_allocation(assets.len() as u32))]
    pub fn set_allocation(
      origin: OriginFor<T>,
      beneficiary: BeneficiaryTarget<T>,
      assets: BoundedVec<T::AssetId, T::MaxAssetsPerBeneficiary>,
      shares: BoundedVec<Share<BalanceOf<T>>, T::MaxAssetsPerBeneficiary>,
    ) -> DispatchResult {
      let owner = ensure_signed(origin)?;
      Self::do_set_allocation(&owner, beneficiary, assets.into_inner(), shares.into_inner())
    }

    /// Claim everything allocated to the signer by `owner`.
    #[pallet::call_index(3)]
    #[pallet::weight(T::WeightInfo::claim(T::MaxAssetsPerBeneficiary::get()))]
    pub fn claim(origin: OriginFor<T>, owner: T::AccountId) -> DispatchResult {
      let who = ensure_signed(origin)?;
      Self::do_claim(&owner, &BeneficiaryKey::Account(who.clone()), &who)?;
      Ok(())
    }

    /// Unlock an identity-addressed allocation with an external proof.
    ///
    /// Assets go to the account the proof names as its submitter, whoever
    /// relays the extrinsic.
    #[pallet::call_index(4)]
    #[pallet::weight(T::WeightInfo::claim_with_identity(T::MaxAssetsPerBeneficiary::get()))]
    pub fn claim_with_identity(
      origin: OriginFor<T>,
      owner: T::AccountId,
      identity: T::Hash,
      proof: BoundedVec<u8, T::MaxProofLength>,
    ) -> DispatchResult {
      ensure_signed(origin)?;
      Self::do_claim_with_identity(&owner, identity, &proof)?;
      Ok(())
    }

    /// Retry the pending legs of an unlocked identity allocation.
    #[pallet::call_index(5)]
    #[pallet::weight(T::WeightInfo::resume_identity_claim(T::MaxAssetsPerBeneficiary::get()))]
    pub fn resume_identity_claim(
      origin: OriginFor<T>,
      owner: T::AccountId,
      identity: T::Hash,
    ) -> DispatchResult {
      let who = ensure_signed(origin)?;
      Self::do_resume_identity_claim(&owner, identity, &who)?;
      Ok(())
    }
  }

  impl<T: Config> Pallet<T> {
    /// Account owners approve as the spender of allocated assets.
    pub fn ledger_account() -> T::AccountId {
      T::PalletId::get().into_account_truncating()
    }

    pub fn is_configured(owner: &T::AccountId) -> bool {
      !SuccessionConfigs::<T>::get(owner).window.is_zero()
    }

    /// Unconfigured owners are always alive. Expiry is inclusive: at exactly
    /// `last_check_in + window` the owner is still alive.
    pub fn is_alive(owner: &T::AccountId) -> bool {
      let config = SuccessionConfigs::<T>::get(owner);
      if config.window.is_zero() {
        return true;
      }
      config.last_check_in.saturating_add(config.window) >= T::Time::now()
    }

    /// Commitment an identity-addressed beneficiary is keyed by.
    pub fn identity_commitment(fields: &IdentityFields<T>) -> T::Hash {
      T::Hashing::hash_of(&(
        &fields.first_name,
        &fields.last_name,
        &fields.date_of_birth,
      ))
    }

    /// Ordered allocation rules of one beneficiary.
    pub fn allocations(
      owner: &T::AccountId,
      beneficiary: &BeneficiaryKeyOf<T>,
    ) -> Vec<(T::AssetId, ShareRule<BalanceOf<T>>)> {
      Beneficiaries::<T>::get(owner, beneficiary)
        .map(|record| record.allocations.into_inner())
        .unwrap_or_default()
    }

    /// What a claim would pay for one pending leg right now.
    ///
    /// Uses the frozen snapshot when one exists and the live balance
    /// otherwise, clamped to what the owner still holds. `None` for unknown
    /// or already settled legs.
    pub fn claimable_share(
      owner: &T::AccountId,
      beneficiary: &BeneficiaryKeyOf<T>,
      asset: T::AssetId,
    ) -> Option<BalanceOf<T>> {
      let record = Beneficiaries::<T>::get(owner, beneficiary)?;
      let rule = record.rule(&asset).filter(|rule| !rule.claimed)?;
      let live = T::Assets::balance(asset, owner);
      let measured = BalanceSnapshots::<T>::get(owner, asset).unwrap_or(live);
      Some(rule.share.resolve(measured).min(live))
    }

    pub fn is_nullifier_used(nullifier: &Nullifier) -> bool {
      ConsumedNullifiers::<T>::contains_key(nullifier)
    }

    pub fn do_configure_liveness(owner: &T::AccountId, window: MomentOf<T>) -> DispatchResult {
      ensure!(!window.is_zero(), Error::<T>::InvalidDuration);
      SuccessionConfigs::<T>::insert(
        owner,
        LivenessConfig {
          window,
          last_check_in: T::Time::now(),
        },
      );
      Self::deposit_event(Event::LivenessConfigured {
        owner: owner.clone(),
        window,
      });
      Ok(())
    }

    pub fn do_check_in(owner: &T::AccountId) -> DispatchResult {
      let now = T::Time::now();
      SuccessionConfigs::<T>::try_mutate(owner, |config| -> DispatchResult {
        ensure!(!config.window.is_zero(), Error::<T>::NotConfigured);
        config.last_check_in = now;
        Ok(())
      })?;
      Self::deposit_event(Event::CheckedIn {
        owner: owner.clone(),
        at: now,
      });
      Ok(())
    }

    pub fn do_set_allocation(
      owner: &T::AccountId,
      target: BeneficiaryTarget<T>,
      assets: Vec<T::AssetId>,
      shares: Vec<Share<BalanceOf<T>>>,
    ) -> DispatchResult {
      ensure!(assets.len() == shares.len(), Error::<T>::ArrayLengthMismatch);
      ensure!(Self::is_configured(owner), Error::<T>::NotConfigured);
      // All approvals are checked before anything is written.
      let ledger = Self::ledger_account();
      for asset in assets.iter() {
        if T::Assets::allowance(*asset, owner, &ledger).is_zero() {
          log::warn!(
            target: LOG_TARGET,
            "allocation by {:?} rejected: asset {:?} not approved",
            owner,
            asset,
          );
          return Err(Error::<T>::NoApproval.into());
        }
      }
      let (key, addressing) = match target {
        BeneficiaryTarget::Direct(who) => (BeneficiaryKey::Account(who), Addressing::Direct),
        BeneficiaryTarget::Identity(fields) => {
          let fields = fields.canonical();
          ensure!(fields.is_complete(), Error::<T>::InvalidIdentityData);
          let commitment = Self::identity_commitment(&fields);
          (
            BeneficiaryKey::Identity(commitment),
            Addressing::Identity {
              fields,
              claimed: false,
              nullifier: None,
              claimant: None,
            },
          )
        }
      };
      let existing = Beneficiaries::<T>::get(owner, &key);
      let is_new = existing.is_none();
      let mut record = existing.unwrap_or_else(|| BeneficiaryRecord::new(addressing));
      let mut allocations = record.allocations.into_inner();

      for (asset, share) in assets.into_iter().zip(shares) {
        ensure!(share.is_within_bounds(), Error::<T>::InvalidShareAmount);
        let position = allocations.iter().position(|(candidate, _)| *candidate == asset);
        if let Some(previous) = position.and_then(|idx| allocations[idx].1.share.basis_points()) {
          AllocatedBasisPoints::<T>::mutate(owner, asset, |total| {
            *total = total.saturating_sub(previous)
          });
        }
        if share.is_zero() {
          if let Some(idx) = position {
            allocations.remove(idx);
            Self::deposit_event(Event::AllocationRemoved {
              owner: owner.clone(),
              beneficiary: key.clone(),
              asset,
            });
          }
          continue;
        }
        if let Some(bps) = share.basis_points() {
          let new_total = AllocatedBasisPoints::<T>::get(owner, asset).saturating_add(bps);
          if new_total > MAX_BASIS_POINTS {
            log::warn!(
              target: LOG_TARGET,
              "allocation by {:?} rejected: asset {:?} would reach {} bps",
              owner,
              asset,
              new_total,
            );
            return Err(Error::<T>::BpsExceeded.into());
          }
          AllocatedBasisPoints::<T>::insert(owner, asset, new_total);
        }
        let rule = ShareRule::pending(share);
        match position {
          Some(idx) => allocations[idx].1 = rule,
          None => allocations.push((asset, rule)),
        }
        Self::deposit_event(Event::AllocationSet {
          owner: owner.clone(),
          beneficiary: key.clone(),
          asset,
          share,
        });
      }

      record.allocations = allocations
        .try_into()
        .map_err(|_| Error::<T>::TooManyAssets)?;
      Beneficiaries::<T>::insert(owner, &key, record);
      let event = if is_new {
        Event::BeneficiaryCreated {
          owner: owner.clone(),
          beneficiary: key,
        }
      } else {
        Event::BeneficiaryUpdated {
          owner: owner.clone(),
          beneficiary: key,
        }
      };
      Self::deposit_event(event);
      Ok(())
    }

    /// Pays out every pending leg of `beneficiary` to `claimant`.
    pub fn do_claim(
      owner: &T::AccountId,
      beneficiary: &BeneficiaryKeyOf<T>,
      claimant: &T::AccountId,
    ) -> Result<ClaimReport, DispatchError> {
      ensure!(!Self::is_alive(owner), Error::<T>::OwnerStillAlive);
      let mut record = Beneficiaries::<T>::get(owner, beneficiary).ok_or(Error::<T>::NotBeneficiary)?;
      ensure!(
        !record.is_identity_unlocked(),
        Error::<T>::IdentityAlreadyClaimed
      );
      let report = Self::settle_allocations(owner, beneficiary, &mut record, claimant)?;
      Beneficiaries::<T>::insert(owner, beneficiary, record);
      Ok(report)
    }

    pub fn do_claim_with_identity(
      owner: &T::AccountId,
      identity: T::Hash,
      payload: &[u8],
    ) -> Result<ClaimReport, DispatchError> {
      ensure!(!Self::is_alive(owner), Error::<T>::OwnerStillAlive);
      let key = BeneficiaryKey::Identity(identity);
      let mut record = Beneficiaries::<T>::get(owner, &key).ok_or(Error::<T>::NotBeneficiary)?;
      let stored = match &record.addressing {
        Addressing::Identity { claimed: true, .. } => {
          return Err(Error::<T>::IdentityAlreadyClaimed.into());
        }
        Addressing::Identity { fields, .. } => fields.clone(),
        Addressing::Direct => return Err(Error::<T>::NotBeneficiary.into()),
      };

      let proof = T::IdentityVerifier::verify(payload).map_err(|err| {
        log::debug!(target: LOG_TARGET, "identity proof rejected by verifier: {:?}", err);
        Error::<T>::ProofRejected
      })?;
      ensure!(proof.flags.all_satisfied(), Error::<T>::ProofRejected);
      ensure!(
        !ConsumedNullifiers::<T>::contains_key(proof.nullifier),
        Error::<T>::NullifierAlreadyUsed
      );
      let disclosed =
        IdentityFields::<T>::from_document(&proof.document).ok_or(Error::<T>::IdentityMismatch)?;
      ensure!(
        Self::identity_commitment(&disclosed) == identity,
        Error::<T>::IdentityMismatch
      );
      // The hash alone is not trusted: the stored fields must match as well.
      ensure!(disclosed == stored, Error::<T>::IdentityMismatch);

      ConsumedNullifiers::<T>::insert(proof.nullifier, ());
      record.addressing = Addressing::Identity {
        fields: stored,
        claimed: true,
        nullifier: Some(proof.nullifier),
        claimant: Some(proof.submitter.clone()),
      };
      Self::deposit_event(Event::IdentityClaimUnlocked {
        owner: owner.clone(),
        identity,
        claimant: proof.submitter.clone(),
        nullifier: proof.nullifier,
      });
      let report = Self::settle_allocations(owner, &key, &mut record, &proof.submitter)?;
      Beneficiaries::<T>::insert(owner, &key, record);
      Ok(report)
    }

    pub fn do_resume_identity_claim(
      owner: &T::AccountId,
      identity: T::Hash,
      who: &T::AccountId,
    ) -> Result<ClaimReport, DispatchError> {
      ensure!(!Self::is_alive(owner), Error::<T>::OwnerStillAlive);
      let key = BeneficiaryKey::Identity(identity);
      let mut record = Beneficiaries::<T>::get(owner, &key).ok_or(Error::<T>::NotBeneficiary)?;
      match &record.addressing {
        Addressing::Identity {
          claimed: true,
          claimant: Some(claimant),
          ..
        } if claimant == who => {}
        Addressing::Identity { .. } => return Err(Error::<T>::NotIdentityClaimant.into()),
        Addressing::Direct => return Err(Error::<T>::NotBeneficiary.into()),
      }
      let report = Self::settle_allocations(owner, &key, &mut record, who)?;
      Beneficiaries::<T>::insert(owner, &key, record);
      Ok(report)
    }

    /// Per-asset claim loop. Legs are independent: a declined transfer leaves
    /// its leg pending and the loop moves on.
    fn settle_allocations(
      owner: &T::AccountId,
      beneficiary: &BeneficiaryKeyOf<T>,
      record: &mut BeneficiaryRecord<T>,
      claimant: &T::AccountId,
    ) -> Result<ClaimReport, DispatchError> {
      let mut report = ClaimReport::default();
      let mut allocations = record.allocations.clone().into_inner();
      for (asset, rule) in allocations.iter_mut() {
        if rule.claimed {
          continue;
        }
        let asset = *asset;
        let snapshot = Self::snapshot_or_capture(owner, asset);
        let owed = rule.share.resolve(snapshot);
        // Never move more than the owner holds now, whatever the snapshot says.
        let amount = owed.min(T::Assets::balance(asset, owner));
        if amount.is_zero() {
          rule.claimed = true;
          report.closed_empty.saturating_inc();
          continue;
        }
        match Self::execute_transfer(asset, owner, claimant, amount)? {
          TransferOutcome::Success => {
            rule.claimed = true;
            report.claimed.saturating_inc();
            log::debug!(
              target: LOG_TARGET,
              "settled {:?} of asset {:?} from {:?} to {:?}",
              amount,
              asset,
              owner,
              claimant,
            );
            Self::deposit_event(Event::AssetClaimed {
              owner: owner.clone(),
              beneficiary: beneficiary.clone(),
              asset,
              to: claimant.clone(),
              amount,
            });
          }
          TransferOutcome::Declined => {
            report.failed.saturating_inc();
            log::warn!(
              target: LOG_TARGET,
              "transfer of {:?} of asset {:?} from {:?} declined; leg stays pending",
              amount,
              asset,
              owner,
            );
            Self::deposit_event(Event::AssetClaimFailed {
              owner: owner.clone(),
              beneficiary: beneficiary.clone(),
              asset,
              to: claimant.clone(),
              amount,
            });
          }
          TransferOutcome::Malformed => return Err(Error::<T>::MalformedTransfer.into()),
        }
      }
      record.allocations = BoundedVec::truncate_from(allocations);
      Self::deposit_event(Event::ClaimProcessed {
        owner: owner.clone(),
        beneficiary: beneficiary.clone(),
        claimed: report.claimed,
        failed: report.failed,
      });
      Ok(report)
    }

    fn snapshot_or_capture(owner: &T::AccountId, asset: T::AssetId) -> BalanceOf<T> {
      if let Some(balance) = BalanceSnapshots::<T>::get(owner, asset) {
        return balance;
      }
      let balance = T::Assets::balance(asset, owner);
      BalanceSnapshots::<T>::insert(owner, asset, balance);
      log::debug!(
        target: LOG_TARGET,
        "snapshot of {:?} for asset {:?}: {:?}",
        owner,
        asset,
        balance,
      );
      Self::deposit_event(Event::SnapshotTaken {
        owner: owner.clone(),
        asset,
        balance,
      });
      balance
    }

    /// Runs the transfer in its own storage layer so a declined attempt
    /// leaves no partial writes behind.
    fn execute_transfer(
      asset: T::AssetId,
      owner: &T::AccountId,
      to: &T::AccountId,
      amount: BalanceOf<T>,
    ) -> Result<TransferOutcome, DispatchError> {
      let ledger = Self::ledger_account();
      with_transaction(|| {
        let outcome = T::Assets::transfer_from(asset, owner, &ledger, to, amount);
        match outcome {
          TransferOutcome::Success => TransactionOutcome::Commit(Ok(outcome)),
          _ => TransactionOutcome::Rollback(Ok(outcome)),
        }
      })
    }
  }
}
