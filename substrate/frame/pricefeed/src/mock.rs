// This file is part of Substrate.

// Copyright (C) Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: Apache-2.0

// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
// 	http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Test mock for the price feed pallet.

use crate::{self as pallet_pricefeed, Config, CurrentPrices};
use frame_support::{
	construct_runtime, derive_impl, parameter_types,
	traits::{ConstU32, Hooks},
	weights::Weight,
};
use frame_system::EnsureRoot;
use sp_lending::{AssetId, Denom, OnPriceUpdate, Price};
use sp_runtime::{traits::IdentityLookup, BuildStorage, DispatchError};

pub type AccountId = u128;

pub const ALICE: AccountId = 1;
pub const BOB: AccountId = 2;
pub const CHARLIE: AccountId = 3;
pub const DAVE: AccountId = 4;

/// Weight reported by every successful revaluation.
pub const REVALUATION_WEIGHT: Weight = Weight::from_parts(1_000, 10);
pub const MAX_REVALUATION_WEIGHT: Weight = Weight::from_parts(50_000, 500);

type Block = frame_system::mocking::MockBlock<Test>;

construct_runtime!(
	pub enum Test {
		System: frame_system,
		PriceFeed: pallet_pricefeed,
	}
);

#[derive_impl(frame_system::config_preludes::TestDefaultConfig as frame_system::DefaultConfig)]
impl frame_system::Config for Test {
	type AccountId = AccountId;
	type Lookup = IdentityLookup<Self::AccountId>;
	type Block = Block;
}

parameter_types! {
	pub static Revalued: Vec<AssetId> = vec![];
	/// Canonical prices visible to each revaluation, in call order.
	pub static PricesSeen: Vec<Vec<(AssetId, Price)>> = vec![];
	pub static FailRevaluation: bool = false;
}

/// Records every revaluation, failing on demand.
pub struct RecordRevaluation;
impl OnPriceUpdate for RecordRevaluation {
	fn max_weight() -> Weight {
		MAX_REVALUATION_WEIGHT
	}

	fn on_price_update(asset: &AssetId) -> Result<Weight, DispatchError> {
		if FailRevaluation::get() {
			return Err(DispatchError::Other("revaluation failed"))
		}
		Revalued::mutate(|r| r.push(asset.clone()));
		let mut seen: Vec<(AssetId, Price)> =
			CurrentPrices::<Test>::iter().map(|(asset, p)| (asset, p.price)).collect();
		seen.sort();
		PricesSeen::mutate(|s| s.push(seen));
		Ok(REVALUATION_WEIGHT)
	}
}

impl Config for Test {
	type AdminOrigin = EnsureRoot<AccountId>;
	type OnPriceUpdate = RecordRevaluation;
	type MaxOracles = ConstU32<5>;
	type MaxDescriptionLen = ConstU32<64>;
	type WeightInfo = ();
}

pub fn denom(name: &str) -> Denom {
	Denom::truncate_from(name.as_bytes().to_vec())
}

pub fn ft(name: &str) -> AssetId {
	AssetId::fungible(denom(name))
}

pub fn nft(name: &str, instance: &str) -> AssetId {
	AssetId::non_fungible(denom(name), denom(instance))
}

pub fn price(n: u32) -> Price {
	Price::from_u32(n)
}

/// Close the current block the way the executive does.
pub fn finalize_block() {
	PriceFeed::on_finalize(System::block_number());
}

pub fn new_test_ext() -> sp_io::TestExternalities {
	sp_tracing::try_init_simple();

	let storage = RuntimeGenesisConfig {
		system: Default::default(),
		price_feed: pallet_pricefeed::GenesisConfig {
			assets: vec![
				(ft("xrp"), b"the standard".to_vec()),
				(ft("btc"), b"a description".to_vec()),
				(nft("art", "1"), b"a painting".to_vec()),
			],
			oracles: vec![ALICE, BOB, CHARLIE],
		},
	}
	.build_storage()
	.unwrap();

	let mut ext: sp_io::TestExternalities = storage.into();
	ext.execute_with(|| System::set_block_number(1));
	ext
}
