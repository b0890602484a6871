#![cfg_attr(rustfmt, rustfmt_skip)]
#![allow(unused_parens)]
#![allow(unused_imports)]
#![allow(missing_docs)]

use polkadot_sdk::frame_support::{traits::Get, weights::{Weight, constants::RocksDbWeight}};
use core::marker::PhantomData;

pub trait WeightInfo {
	fn configure_liveness() -> Weight;
	fn check_in() -> Weight;
	fn set_allocation(n: u32) -> Weight;
	fn claim(n: u32) -> Weight;
	fn claim_with_identity(n: u32) -> Weight;
	fn resume_identity_claim(n: u32) -> Weight;
}

pub struct SubstrateWeight<T>(PhantomData<T>);
impl<T: polkadot_sdk::frame_system::Config> WeightInfo for SubstrateWeight<T> {
	fn configure_liveness() -> Weight {
		Weight::from_parts(12_000_000, 1500)
			.saturating_add(T::DbWeight::get().writes(1))
	}
	fn check_in() -> Weight {
		Weight::from_parts(10_000_000, 1500)
			.saturating_add(T::DbWeight::get().reads(1))
			.saturating_add(T::DbWeight::get().writes(1))
	}
	fn set_allocation(n: u32) -> Weight {
		Weight::from_parts(25_000_000, 4000)
			.saturating_add(Weight::from_parts(9_000_000, 2600).saturating_mul(n.into()))
			.saturating_add(T::DbWeight::get().reads(2))
			.saturating_add(T::DbWeight::get().reads((2_u64).saturating_mul(n.into())))
			.saturating_add(T::DbWeight::get().writes(1))
			.saturating_add(T::DbWeight::get().writes((1_u64).saturating_mul(n.into())))
	}
	fn claim(n: u32) -> Weight {
		Weight::from_parts(20_000_000, 4000)
			.saturating_add(Weight::from_parts(45_000_000, 6000).saturating_mul(n.into()))
			.saturating_add(T::DbWeight::get().reads(2))
			.saturating_add(T::DbWeight::get().reads((6_u64).saturating_mul(n.into())))
			.saturating_add(T::DbWeight::get().writes(1))
			.saturating_add(T::DbWeight::get().writes((5_u64).saturating_mul(n.into())))
	}
	fn claim_with_identity(n: u32) -> Weight {
		Weight::from_parts(60_000_000, 8000)
			.saturating_add(Weight::from_parts(45_000_000, 6000).saturating_mul(n.into()))
			.saturating_add(T::DbWeight::get().reads(3))
			.saturating_add(T::DbWeight::get().reads((6_u64).saturating_mul(n.into())))
			.saturating_add(T::DbWeight::get().writes(2))
			.saturating_add(T::DbWeight::get().writes((5_u64).saturating_mul(n.into())))
	}
	fn resume_identity_claim(n: u32) -> Weight {
		Weight::from_parts(20_000_000, 4000)
			.saturating_add(Weight::from_parts(45_000_000, 6000).saturating_mul(n.into()))
			.saturating_add(T::DbWeight::get().reads(2))
			.saturating_add(T::DbWeight::get().reads((6_u64).saturating_mul(n.into())))
			.saturating_add(T::DbWeight::get().writes(1))
			.saturating_add(T::DbWeight::get().writes((5_u64).saturating_mul(n.into())))
	}
}

impl WeightInfo for () {
	fn configure_liveness() -> Weight {
		Weight::from_parts(12_000_000, 1500)
			.saturating_add(RocksDbWeight::get().writes(1))
	}
	fn check_in() -> Weight {
		Weight::from_parts(10_000_000, 1500)
			.saturating_add(RocksDbWeight::get().reads(1))
			.saturating_add(RocksDbWeight::get().writes(1))
	}
	fn set_allocation(n: u32) -> Weight {
		Weight::from_parts(25_000_000, 4000)
			.saturating_add(Weight::from_parts(9_000_000, 2600).saturating_mul(n.into()))
	}
	fn claim(n: u32) -> Weight {
		Weight::from_parts(20_000_000, 4000)
			.saturating_add(Weight::from_parts(45_000_000, 6000).saturating_mul(n.into()))
	}
	fn claim_with_identity(n: u32) -> Weight {
		Weight::from_parts(60_000_000, 8000)
			.saturating_add(Weight::from_parts(45_000_000, 6000).saturating_mul(n.into()))
	}
	fn resume_identity_claim(n: u32) -> Weight {
		Weight::from_parts(20_000_000, 4000)
			.saturating_add(Weight::from_parts(45_000_000, 6000).saturating_mul(n.into()))
	}
}
