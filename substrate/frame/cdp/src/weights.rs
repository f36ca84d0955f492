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

#![allow(unused_parens)]
#![allow(unused_imports)]

use core::marker::PhantomData;
use frame_support::{
	traits::Get,
	weights::{constants::RocksDbWeight, Weight},
};

/// Weight functions needed for `pallet_cdp`.
pub trait WeightInfo {
	fn modify_cdp() -> Weight;
	fn set_global_debt_limit() -> Weight;
	fn set_collateral_params() -> Weight;
	fn revalue_cdps(c: u32) -> Weight;
}

/// Weights for `pallet_cdp` using the Substrate node and recommended hardware.
pub struct SubstrateWeight<T>(PhantomData<T>);
impl<T: frame_system::Config> WeightInfo for SubstrateWeight<T> {
	// Storage: `Cdp::CollateralParameters` (r:1 w:0)
	// Storage: `Cdp::Cdps` (r:1 w:1)
	// Storage: `PriceFeed::CurrentPrices` (r:2 w:0)
	// Storage: `Cdp::GlobalDebt` (r:1 w:1)
	// Storage: `Cdp::GlobalDebtLimit` (r:1 w:0)
	// Storage: `Cdp::CollateralStates` (r:1 w:1)
	// Storage: `Cdp::CdpCount` (r:1 w:1)
	// The balance ledger is accounted as two reads and two writes.
	fn modify_cdp() -> Weight {
		Weight::from_parts(61_508_000_u64, 6_196)
			.saturating_add(T::DbWeight::get().reads(10_u64))
			.saturating_add(T::DbWeight::get().writes(6_u64))
	}
	// Storage: `Cdp::GlobalDebtLimit` (r:0 w:1)
	fn set_global_debt_limit() -> Weight {
		Weight::from_parts(6_204_000_u64, 0)
			.saturating_add(T::DbWeight::get().writes(1_u64))
	}
	// Storage: `Cdp::CollateralParameters` (r:0 w:1)
	fn set_collateral_params() -> Weight {
		Weight::from_parts(7_911_000_u64, 0)
			.saturating_add(T::DbWeight::get().writes(1_u64))
	}
	// Storage: `Cdp::Cdps` (r:c w:c)
	// Storage: `Cdp::CollateralParameters` (r:c w:0)
	// Storage: `PriceFeed::CurrentPrices` (r:2 w:0)
	// Storage: `Cdp::GlobalDebt` (r:c w:0)
	// Storage: `Cdp::CollateralStates` (r:c w:0)
	fn revalue_cdps(c: u32) -> Weight {
		Weight::from_parts(4_870_000_u64, 3_593)
			// Standard Error: 9_214
			.saturating_add(Weight::from_parts(28_306_000_u64, 0).saturating_mul(c as u64))
			.saturating_add(T::DbWeight::get().reads(2_u64))
			.saturating_add(T::DbWeight::get().reads((4_u64).saturating_mul(c as u64)))
			.saturating_add(T::DbWeight::get().writes((1_u64).saturating_mul(c as u64)))
			.saturating_add(Weight::from_parts(0, 2_675).saturating_mul(c as u64))
	}
}

// For backwards compatibility and tests.
impl WeightInfo for () {
	fn modify_cdp() -> Weight {
		Weight::from_parts(61_508_000_u64, 6_196)
			.saturating_add(RocksDbWeight::get().reads(10_u64))
			.saturating_add(RocksDbWeight::get().writes(6_u64))
	}
	fn set_global_debt_limit() -> Weight {
		Weight::from_parts(6_204_000_u64, 0)
			.saturating_add(RocksDbWeight::get().writes(1_u64))
	}
	fn set_collateral_params() -> Weight {
		Weight::from_parts(7_911_000_u64, 0)
			.saturating_add(RocksDbWeight::get().writes(1_u64))
	}
	fn revalue_cdps(c: u32) -> Weight {
		Weight::from_parts(4_870_000_u64, 3_593)
			.saturating_add(Weight::from_parts(28_306_000_u64, 0).saturating_mul(c as u64))
			.saturating_add(RocksDbWeight::get().reads(2_u64))
			.saturating_add(RocksDbWeight::get().reads((4_u64).saturating_mul(c as u64)))
			.saturating_add(RocksDbWeight::get().writes((1_u64).saturating_mul(c as u64)))
			.saturating_add(Weight::from_parts(0, 2_675).saturating_mul(c as u64))
	}
}
