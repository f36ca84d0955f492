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

//! Test mock for the CDP pallet, priced by the price feed pallet.

use crate::{self as pallet_cdp, CollateralParams, Config};
use frame_support::{construct_runtime, derive_impl, parameter_types, traits::ConstU32};
use frame_system::EnsureRoot;
use sp_lending::{
	AssetId, Balance, BalanceLedger, CollateralToken, CurrentPrice, Denom, Price, Ratio,
};
use sp_runtime::{
	traits::{IdentityLookup, One},
	ArithmeticError, BuildStorage, DispatchError, DispatchResult, FixedPointNumber,
};
use std::collections::BTreeMap;

pub type AccountId = u128;

pub const ALICE: AccountId = 1;
pub const BOB: AccountId = 2;
pub const CHARLIE: AccountId = 3;

type Block = frame_system::mocking::MockBlock<Test>;

construct_runtime!(
	pub enum Test {
		System: frame_system,
		PriceFeed: pallet_pricefeed,
		Cdp: pallet_cdp,
	}
);

#[derive_impl(frame_system::config_preludes::TestDefaultConfig as frame_system::DefaultConfig)]
impl frame_system::Config for Test {
	type AccountId = AccountId;
	type Lookup = IdentityLookup<Self::AccountId>;
	type Block = Block;
}

impl pallet_pricefeed::Config for Test {
	type AdminOrigin = EnsureRoot<AccountId>;
	type OnPriceUpdate = Cdp;
	type MaxOracles = ConstU32<5>;
	type MaxDescriptionLen = ConstU32<64>;
	type WeightInfo = ();
}

parameter_types! {
	pub DebtDenom: Denom = denom("usd");
	pub GovDenom: Denom = denom("tmnt");
	pub static MaxCdps: u32 = 16;
	/// External balances, by owner and denomination.
	pub static Balances: BTreeMap<(AccountId, Denom), Balance> = BTreeMap::new();
}

/// An in-memory balance ledger.
pub struct MockLedger;
impl BalanceLedger<AccountId> for MockLedger {
	fn balance(who: &AccountId, denom: &Denom) -> Balance {
		Balances::get().get(&(*who, denom.clone())).copied().unwrap_or_default()
	}

	fn credit(who: &AccountId, denom: &Denom, amount: Balance) -> DispatchResult {
		Balances::mutate(|balances| {
			let balance = balances.entry((*who, denom.clone())).or_default();
			*balance = balance.checked_add(amount).ok_or(ArithmeticError::Overflow)?;
			Ok(())
		})
	}

	fn debit(who: &AccountId, denom: &Denom, amount: Balance) -> DispatchResult {
		Balances::mutate(|balances| {
			let balance = balances.entry((*who, denom.clone())).or_default();
			*balance = balance
				.checked_sub(amount)
				.ok_or(DispatchError::Other("insufficient balance"))?;
			Ok(())
		})
	}
}

#[cfg(feature = "runtime-benchmarks")]
pub struct MockBenchmarkHelper;
#[cfg(feature = "runtime-benchmarks")]
impl crate::BenchmarkHelper<AccountId> for MockBenchmarkHelper {
	fn fund(who: &AccountId, denom: &Denom, amount: Balance) {
		let _ = MockLedger::credit(who, denom, amount);
	}

	fn set_price(asset: &AssetId, price: Price) {
		set_price(asset.clone(), price)
	}
}

impl Config for Test {
	type PriceSource = PriceFeed;
	type Ledger = MockLedger;
	type UpdateOrigin = EnsureRoot<AccountId>;
	type DebtDenom = DebtDenom;
	type GovDenom = GovDenom;
	type MaxCdps = MaxCdps;
	type WeightInfo = ();
	#[cfg(feature = "runtime-benchmarks")]
	type BenchmarkHelper = MockBenchmarkHelper;
}

pub fn denom(name: &str) -> Denom {
	Denom::truncate_from(name.as_bytes().to_vec())
}

pub fn ft(name: &str) -> CollateralToken {
	CollateralToken::Fungible { name: denom(name) }
}

pub fn nft(name: &str, instance_id: &str) -> CollateralToken {
	CollateralToken::NonFungible { name: denom(name), instance_id: denom(instance_id) }
}

pub fn usd() -> AssetId {
	AssetId::fungible(denom("usd"))
}

pub fn ratio(n: u128, d: u128) -> Ratio {
	Ratio::saturating_from_rational(n, d)
}

pub fn params(name: &str, liquidation_ratio: Ratio, debt_limit: Balance) -> CollateralParams {
	CollateralParams { denom: denom(name), liquidation_ratio, debt_limit }
}

/// Make `price` the canonical price of `asset` without going through aggregation.
pub fn set_price(asset: AssetId, price: Price) {
	pallet_pricefeed::CurrentPrices::<Test>::insert(
		&asset,
		CurrentPrice { asset: asset.clone(), price, expiry: 1_000 },
	);
}

pub fn balance(who: AccountId, name: &str) -> Balance {
	MockLedger::balance(&who, &denom(name))
}

pub fn new_test_ext() -> sp_io::TestExternalities {
	sp_tracing::try_init_simple();

	let storage = RuntimeGenesisConfig {
		system: Default::default(),
		price_feed: pallet_pricefeed::GenesisConfig {
			assets: vec![
				(AssetId::fungible(denom("xrp")), b"xrp".to_vec()),
				(AssetId::fungible(denom("btc")), b"btc".to_vec()),
				(usd(), b"the debt denomination".to_vec()),
				(nft("art", "1").asset_id(), b"a painting".to_vec()),
			],
			oracles: vec![ALICE, BOB],
		},
		cdp: pallet_cdp::GenesisConfig {
			global_debt_limit: 1_000_000,
			collateral_params: vec![
				params("xrp", ratio(2, 1), 500_000),
				params("btc", ratio(3, 2), 500_000),
				params("art", ratio(3, 2), 1_000),
			],
			global_debt: 0,
			_config: Default::default(),
		},
	}
	.build_storage()
	.unwrap();

	Balances::set(BTreeMap::from([
		((ALICE, denom("xrp")), 1_000),
		((ALICE, denom("btc")), 100),
		((ALICE, denom("art")), 1),
		((ALICE, denom("usd")), 10_000),
		((BOB, denom("xrp")), 1_000),
	]));

	let mut ext: sp_io::TestExternalities = storage.into();
	ext.execute_with(|| {
		System::set_block_number(1);
		set_price(usd(), Price::one());
		set_price(AssetId::fungible(denom("xrp")), Price::saturating_from_rational(10_345, 1_000));
		set_price(AssetId::fungible(denom("btc")), Price::saturating_from_integer(20_000));
		set_price(nft("art", "1").asset_id(), Price::saturating_from_integer(500));
	});
	ext
}
