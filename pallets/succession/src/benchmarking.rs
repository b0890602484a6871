#![cfg(feature = "runtime-benchmarks")]

extern crate alloc;

use crate::*;
use alloc::{vec, vec::Vec};
use frame::prelude::*;
use polkadot_sdk::frame_benchmarking::{account, v2::*};
use polkadot_sdk::frame_system::RawOrigin;
use primitives::{IdentityDocument, ProofFlags, Share, VerifiedIdentity};

const SEED: u32 = 0;

#[benchmarks]
mod benches {
  use super::*;

  fn window<T: Config>() -> MomentOf<T> {
    MomentOf::<T>::from(1_000u32)
  }

  fn configured_owner<T: Config>() -> T::AccountId {
    let owner: T::AccountId = whitelisted_caller();
    T::BenchmarkHelper::set_time(MomentOf::<T>::from(1u32));
    Pallet::<T>::do_configure_liveness(&owner, window::<T>()).unwrap();
    owner
  }

  fn lapse<T: Config>() {
    let past = window::<T>().saturating_add(MomentOf::<T>::from(2u32));
    T::BenchmarkHelper::set_time(past);
  }

  /// `n` approved assets, each split as 50% basis points.
  fn setup_assets<T: Config>(owner: &T::AccountId, n: u32) -> (Vec<T::AssetId>, Vec<Share<BalanceOf<T>>>) {
    let ledger = Pallet::<T>::ledger_account();
    let amount = BalanceOf::<T>::from(1_000_000u32);
    let assets: Vec<T::AssetId> = (0..n)
      .map(|index| T::BenchmarkHelper::setup_asset(owner, &ledger, index, amount))
      .collect();
    let shares = vec![Share::BasisPoints(5_000); n as usize];
    (assets, shares)
  }

  fn ada<T: Config>() -> IdentityFields<T> {
    IdentityFields::<T>::new(b"ada".to_vec(), b"lovelace".to_vec(), b"1815-12-10".to_vec()).unwrap()
  }

  fn ada_proof<T: Config>(submitter: T::AccountId) -> BoundedVec<u8, T::MaxProofLength> {
    let identity = VerifiedIdentity {
      document: IdentityDocument {
        first_name: b"Ada".to_vec(),
        last_name: b"Lovelace".to_vec(),
        date_of_birth: b"1815-12-10".to_vec(),
        nationality: b"GB".to_vec(),
      },
      flags: ProofFlags {
        valid: true,
        minimum_age: true,
        sanctions_clear: true,
      },
      nullifier: [1u8; 32],
      submitter,
    };
    BoundedVec::try_from(T::BenchmarkHelper::identity_proof(&identity)).unwrap()
  }

  #[benchmark]
  fn configure_liveness() {
    let owner: T::AccountId = whitelisted_caller();
    #[extrinsic_call]
    configure_liveness(RawOrigin::Signed(owner.clone()), window::<T>());
    assert!(Pallet::<T>::is_configured(&owner));
  }

  #[benchmark]
  fn check_in() {
    let owner = configured_owner::<T>();
    T::BenchmarkHelper::set_time(MomentOf::<T>::from(500u32));
    #[extrinsic_call]
    check_in(RawOrigin::Signed(owner.clone()));
    assert_eq!(
      SuccessionConfigs::<T>::get(&owner).last_check_in,
      MomentOf::<T>::from(500u32)
    );
  }

  #[benchmark]
  fn set_allocation(n: Linear<1, { T::MaxAssetsPerBeneficiary::get() }>) {
    let owner = configured_owner::<T>();
    let heir: T::AccountId = account("heir", 0, SEED);
    let (assets, shares) = setup_assets::<T>(&owner, n);
    let assets = BoundedVec::try_from(assets).unwrap();
    let shares = BoundedVec::try_from(shares).unwrap();
    #[extrinsic_call]
    set_allocation(
      RawOrigin::Signed(owner.clone()),
      BeneficiaryTarget::Direct(heir.clone()),
      assets,
      shares,
    );
    assert_eq!(
      Pallet::<T>::allocations(&owner, &BeneficiaryKey::Account(heir)).len() as u32,
      n
    );
  }

  #[benchmark]
  fn claim(n: Linear<1, { T::MaxAssetsPerBeneficiary::get() }>) {
    let owner = configured_owner::<T>();
    let heir: T::AccountId = account("heir", 0, SEED);
    let (assets, shares) = setup_assets::<T>(&owner, n);
    Pallet::<T>::do_set_allocation(&owner, BeneficiaryTarget::Direct(heir.clone()), assets, shares)
      .unwrap();
    lapse::<T>();
    #[extrinsic_call]
    claim(RawOrigin::Signed(heir.clone()), owner.clone());
    assert!(
      Pallet::<T>::allocations(&owner, &BeneficiaryKey::Account(heir))
        .iter()
        .all(|(_, rule)| rule.claimed)
    );
  }

  #[benchmark]
  fn claim_with_identity(n: Linear<1, { T::MaxAssetsPerBeneficiary::get() }>) {
    let owner = configured_owner::<T>();
    let relayer: T::AccountId = account("relayer", 0, SEED);
    let heir: T::AccountId = account("heir", 0, SEED);
    let fields = ada::<T>();
    let identity = Pallet::<T>::identity_commitment(&fields);
    let (assets, shares) = setup_assets::<T>(&owner, n);
    Pallet::<T>::do_set_allocation(&owner, BeneficiaryTarget::Identity(fields), assets, shares)
      .unwrap();
    lapse::<T>();
    let proof = ada_proof::<T>(heir);
    #[extrinsic_call]
    claim_with_identity(RawOrigin::Signed(relayer), owner.clone(), identity, proof);
    assert!(Pallet::<T>::is_nullifier_used(&[1u8; 32]));
  }

  #[benchmark]
  fn resume_identity_claim(n: Linear<1, { T::MaxAssetsPerBeneficiary::get() }>) {
    let owner = configured_owner::<T>();
    let heir: T::AccountId = account("heir", 0, SEED);
    let fields = ada::<T>();
    let identity = Pallet::<T>::identity_commitment(&fields);
    let (assets, shares) = setup_assets::<T>(&owner, n);
    Pallet::<T>::do_set_allocation(&owner, BeneficiaryTarget::Identity(fields), assets, shares)
      .unwrap();
    lapse::<T>();
    // Unlock, then reopen every leg so the resumed pass does full work.
    Pallet::<T>::do_claim_with_identity(&owner, identity, &ada_proof::<T>(heir.clone())).unwrap();
    let key = BeneficiaryKey::Identity(identity);
    Beneficiaries::<T>::mutate(&owner, &key, |record| {
      if let Some(record) = record {
        for (_, rule) in record.allocations.iter_mut() {
          rule.claimed = false;
        }
      }
    });
    #[extrinsic_call]
    resume_identity_claim(RawOrigin::Signed(heir), owner.clone(), identity);
    assert!(Beneficiaries::<T>::get(&owner, &key).is_some());
  }

  #[cfg(test)]
  use crate::mock::{Test, new_test_ext};
  #[cfg(test)]
  impl_benchmark_test_suite!(Pallet, new_test_ext(), Test);
}
