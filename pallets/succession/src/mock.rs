use crate as pallet_succession;
use codec::{Decode, Encode};
use frame::prelude::*;
use polkadot_sdk::{
  frame_support::{
    PalletId, assert_ok, construct_runtime, parameter_types,
    traits::{ConstU32, ConstU64, ConstU128},
  },
  frame_system::{EnsureRoot, EnsureSigned},
  sp_runtime::{
    BuildStorage,
    traits::{BlakeTwo256, IdentityLookup},
  },
};
use primitives::{IdentityDocument, ProofFlags, VerifiedIdentity, pallet_ids, params};

use alloc::vec;

use crate::{FungiblesApprovals, IdentityFields, TransferExecutor, TransferOutcome};

type Block = polkadot_sdk::frame_system::mocking::MockBlock<Test>;
pub type AccountId = u64;
pub type Balance = u128;
pub type AssetId = u32;

pub const ALICE: AccountId = 1;
pub const BOB: AccountId = 2;
pub const CHARLIE: AccountId = 3;
pub const DAVE: AccountId = 4;

pub const GOLD: AssetId = 10;
pub const SILVER: AssetId = 11;
/// Asset whose transfers the mock executor reports as structurally invalid.
pub const BROKEN: AssetId = 13;

pub const DAY: u64 = primitives::time::DAYS;
pub const GENESIS_TIME: u64 = 1_000;
pub const TEST_INITIAL_BALANCE: Balance = 1_000_000;

construct_runtime!(
  pub enum Test {
    System: polkadot_sdk::frame_system,
    Timestamp: polkadot_sdk::pallet_timestamp,
    Balances: polkadot_sdk::pallet_balances,
    Assets: polkadot_sdk::pallet_assets,
    Succession: pallet_succession,
  }
);

impl polkadot_sdk::frame_system::Config for Test {
  type BaseCallFilter = polkadot_sdk::frame_support::traits::Everything;
  type BlockWeights = ();
  type BlockLength = ();
  type DbWeight = ();
  type RuntimeOrigin = RuntimeOrigin;
  type RuntimeCall = RuntimeCall;
  type Nonce = u64;
  type Hash = polkadot_sdk::sp_core::H256;
  type Hashing = BlakeTwo256;
  type AccountId = AccountId;
  type Lookup = IdentityLookup<Self::AccountId>;
  type Block = Block;
  type RuntimeEvent = RuntimeEvent;
  type BlockHashCount = ConstU64<250>;
  type Version = ();
  type PalletInfo = PalletInfo;
  type AccountData = polkadot_sdk::pallet_balances::AccountData<Balance>;
  type OnNewAccount = ();
  type OnKilledAccount = ();
  type SystemWeightInfo = ();
  type SS58Prefix = ();
  type OnSetCode = ();
  type MaxConsumers = ConstU32<16>;
  type RuntimeTask = ();
  type ExtensionsWeightInfo = ();
  type SingleBlockMigrations = ();
  type MultiBlockMigrator = ();
  type PreInherents = ();
  type PostInherents = ();
  type PostTransactions = ();
}

impl polkadot_sdk::pallet_timestamp::Config for Test {
  type Moment = u64;
  type OnTimestampSet = ();
  type MinimumPeriod = ConstU64<1>;
  type WeightInfo = ();
}

impl polkadot_sdk::pallet_balances::Config for Test {
  type MaxLocks = ConstU32<50>;
  type MaxReserves = ();
  type ReserveIdentifier = [u8; 8];
  type Balance = Balance;
  type RuntimeEvent = RuntimeEvent;
  type DustRemoval = ();
  type ExistentialDeposit = ConstU128<1>;
  type AccountStore = System;
  type WeightInfo = ();
  type FreezeIdentifier = ();
  type MaxFreezes = ();
  type RuntimeHoldReason = RuntimeHoldReason;
  type RuntimeFreezeReason = RuntimeFreezeReason;
  type DoneSlashHandler = ();
}

impl polkadot_sdk::pallet_assets::Config for Test {
  type RuntimeEvent = RuntimeEvent;
  type Balance = Balance;
  type AssetId = AssetId;
  type AssetIdParameter = AssetId;
  type Currency = Balances;
  type CreateOrigin = EnsureSigned<AccountId>;
  type ForceOrigin = EnsureRoot<AccountId>;
  type AssetDeposit = ConstU128<1>;
  type AssetAccountDeposit = ConstU128<1>;
  type MetadataDepositBase = ConstU128<1>;
  type MetadataDepositPerByte = ConstU128<1>;
  type ApprovalDeposit = ConstU128<1>;
  type StringLimit = ConstU32<50>;
  type Freezer = ();
  type Extra = ();
  type ReserveData = ();
  type WeightInfo = ();
  type RemoveItemsLimit = ConstU32<1000>;
  type CallbackHandle = ();
  #[cfg(feature = "runtime-benchmarks")]
  type BenchmarkHelper = ();
  type Holder = ();
}

/// Real `pallet-assets` approvals, except that `BROKEN` transfers come back malformed.
pub struct MockAssets;
type RealAssets = FungiblesApprovals<Assets>;
impl TransferExecutor<AccountId, AssetId, Balance> for MockAssets {
  fn allowance(asset: AssetId, owner: &AccountId, spender: &AccountId) -> Balance {
    <RealAssets as TransferExecutor<AccountId, AssetId, Balance>>::allowance(asset, owner, spender)
  }

  fn balance(asset: AssetId, who: &AccountId) -> Balance {
    <RealAssets as TransferExecutor<AccountId, AssetId, Balance>>::balance(asset, who)
  }

  fn transfer_from(
    asset: AssetId,
    owner: &AccountId,
    spender: &AccountId,
    to: &AccountId,
    amount: Balance,
  ) -> TransferOutcome {
    if asset == BROKEN {
      return TransferOutcome::Malformed;
    }
    <RealAssets as TransferExecutor<AccountId, AssetId, Balance>>::transfer_from(
      asset, owner, spender, to, amount,
    )
  }
}

/// Decodes a SCALE-encoded `VerifiedIdentity` out of the proof payload.
pub struct MockIdentityVerifier;
impl crate::IdentityVerifier<AccountId> for MockIdentityVerifier {
  fn verify(payload: &[u8]) -> Result<VerifiedIdentity<AccountId>, DispatchError> {
    VerifiedIdentity::<AccountId>::decode(&mut &payload[..])
      .map_err(|_| DispatchError::Other("undecodable identity proof"))
  }
}

#[cfg(feature = "runtime-benchmarks")]
pub struct MockBenchmarkHelper;
#[cfg(feature = "runtime-benchmarks")]
impl crate::BenchmarkHelper<AccountId, AssetId, Balance, u64> for MockBenchmarkHelper {
  fn setup_asset(owner: &AccountId, spender: &AccountId, index: u32, amount: Balance) -> AssetId {
    use polkadot_sdk::frame_support::traits::fungible::Mutate as _;
    let asset = 1_000 + index;
    let _ = Balances::set_balance(owner, TEST_INITIAL_BALANCE);
    create_asset(asset);
    mint(asset, *owner, amount);
    approve(*owner, asset, *spender, amount);
    asset
  }

  fn identity_proof(identity: &VerifiedIdentity<AccountId>) -> alloc::vec::Vec<u8> {
    identity.encode()
  }

  fn set_time(now: u64) {
    Timestamp::set_timestamp(now);
  }
}

parameter_types! {
  pub const SuccessionPalletId: PalletId = PalletId(*pallet_ids::SUCCESSION_PALLET_ID);
}

impl pallet_succession::Config for Test {
  type AssetId = AssetId;
  type Balance = Balance;
  type Assets = MockAssets;
  type IdentityVerifier = MockIdentityVerifier;
  type Time = Timestamp;
  type PalletId = SuccessionPalletId;
  type MaxAssetsPerBeneficiary = ConstU32<{ params::MAX_ASSETS_PER_BENEFICIARY }>;
  type MaxIdentityFieldLength = ConstU32<{ params::MAX_IDENTITY_FIELD_LENGTH }>;
  type MaxProofLength = ConstU32<{ params::MAX_PROOF_LENGTH }>;
  #[cfg(feature = "runtime-benchmarks")]
  type BenchmarkHelper = MockBenchmarkHelper;
  type WeightInfo = ();
}

pub fn ledger() -> AccountId {
  Succession::ledger_account()
}

pub fn set_time(now: u64) {
  Timestamp::set_timestamp(now);
}

pub fn now() -> u64 {
  polkadot_sdk::pallet_timestamp::Now::<Test>::get()
}

pub fn advance_time(by: u64) {
  set_time(now().saturating_add(by));
}

pub fn create_asset(asset: AssetId) {
  assert_ok!(Assets::force_create(RuntimeOrigin::root(), asset, ALICE, true, 1));
}

pub fn mint(asset: AssetId, who: AccountId, amount: Balance) {
  assert_ok!(Assets::mint(RuntimeOrigin::signed(ALICE), asset, who, amount));
}

pub fn approve(owner: AccountId, asset: AssetId, spender: AccountId, amount: Balance) {
  assert_ok!(Assets::approve_transfer(
    RuntimeOrigin::signed(owner),
    asset,
    spender,
    amount
  ));
}

pub fn asset_balance(asset: AssetId, who: AccountId) -> Balance {
  Assets::balance(asset, who)
}

/// Creates `asset`, gives `owner` `amount` of it and approves the ledger for all of it.
pub fn fund_and_approve(owner: AccountId, asset: AssetId, amount: Balance) {
  create_asset(asset);
  mint(asset, owner, amount);
  approve(owner, asset, ledger(), amount);
}

pub fn identity_fields(first: &[u8], last: &[u8], dob: &[u8]) -> IdentityFields<Test> {
  IdentityFields::new(first.to_vec(), last.to_vec(), dob.to_vec())
    .expect("test identity fits the field bound")
}

pub fn verified_identity(
  first: &[u8],
  last: &[u8],
  dob: &[u8],
  nullifier: [u8; 32],
  submitter: AccountId,
) -> VerifiedIdentity<AccountId> {
  VerifiedIdentity {
    document: IdentityDocument {
      first_name: first.to_vec(),
      last_name: last.to_vec(),
      date_of_birth: dob.to_vec(),
      nationality: b"NL".to_vec(),
    },
    flags: ProofFlags {
      valid: true,
      minimum_age: true,
      sanctions_clear: true,
    },
    nullifier,
    submitter,
  }
}

pub type ProofOf = BoundedVec<u8, <Test as pallet_succession::Config>::MaxProofLength>;

pub fn proof_of(identity: &VerifiedIdentity<AccountId>) -> ProofOf {
  BoundedVec::try_from(identity.encode()).expect("test proof fits the payload bound")
}

// Build genesis storage according to the mock runtime.
pub fn new_test_ext() -> polkadot_sdk::sp_io::TestExternalities {
  let mut t = polkadot_sdk::frame_system::GenesisConfig::<Test>::default()
    .build_storage()
    .unwrap();

  polkadot_sdk::pallet_balances::GenesisConfig::<Test> {
    balances: vec![
      (ALICE, TEST_INITIAL_BALANCE),
      (BOB, TEST_INITIAL_BALANCE),
      (CHARLIE, TEST_INITIAL_BALANCE),
      (DAVE, TEST_INITIAL_BALANCE),
    ],
    dev_accounts: None,
  }
  .assimilate_storage(&mut t)
  .unwrap();

  let mut ext = polkadot_sdk::sp_io::TestExternalities::new(t);
  ext.execute_with(|| {
    System::set_block_number(1);
    set_time(GENESIS_TIME);
  });
  ext
}
