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

/// Weight functions needed for `pallet_pricefeed`.
pub trait WeightInfo {
	fn post_price() -> Weight;
	fn add_asset() -> Weight;
	fn add_oracle() -> Weight;
	fn remove_oracle(a: u32) -> Weight;
	fn on_finalize(a: u32) -> Weight;
}

/// Weights for `pallet_pricefeed` using the Substrate node and recommended hardware.
pub struct SubstrateWeight<T>(PhantomData<T>);
impl<T: frame_system::Config> WeightInfo for SubstrateWeight<T> {
	// Storage: `PriceFeed::Oracles` (r:1 w:0)
	// Storage: `PriceFeed::Assets` (r:1 w:0)
	// Storage: `PriceFeed::RawPrices` (r:1 w:1)
	fn post_price() -> Weight {
		Weight::from_parts(24_310_000_u64, 4_687)
			.saturating_add(T::DbWeight::get().reads(3_u64))
			.saturating_add(T::DbWeight::get().writes(1_u64))
	}
	// Storage: `PriceFeed::Assets` (r:1 w:1)
	// Storage: `PriceFeed::CounterForAssets` (r:1 w:1)
	fn add_asset() -> Weight {
		Weight::from_parts(13_842_000_u64, 3_593)
			.saturating_add(T::DbWeight::get().reads(2_u64))
			.saturating_add(T::DbWeight::get().writes(2_u64))
	}
	// Storage: `PriceFeed::Oracles` (r:1 w:1)
	// Storage: `PriceFeed::CounterForOracles` (r:1 w:1)
	fn add_oracle() -> Weight {
		Weight::from_parts(12_967_000_u64, 3_517)
			.saturating_add(T::DbWeight::get().reads(2_u64))
			.saturating_add(T::DbWeight::get().writes(2_u64))
	}
	// Storage: `PriceFeed::Oracles` (r:1 w:1)
	// Storage: `PriceFeed::CounterForOracles` (r:1 w:1)
	// Storage: `PriceFeed::RawPrices` (r:a w:a)
	fn remove_oracle(a: u32) -> Weight {
		Weight::from_parts(15_201_000_u64, 3_517)
			// Standard Error: 4_211
			.saturating_add(Weight::from_parts(3_874_000_u64, 0).saturating_mul(a as u64))
			.saturating_add(T::DbWeight::get().reads(2_u64))
			.saturating_add(T::DbWeight::get().reads((1_u64).saturating_mul(a as u64)))
			.saturating_add(T::DbWeight::get().writes(2_u64))
			.saturating_add(T::DbWeight::get().writes((1_u64).saturating_mul(a as u64)))
	}
	// Storage: `PriceFeed::Assets` (r:a w:0)
	// Storage: `PriceFeed::RawPrices` (r:a w:0)
	// Storage: `PriceFeed::CurrentPrices` (r:a w:a)
	// Storage: `PriceFeed::PendingPriceRequests` (r:0 w:a)
	fn on_finalize(a: u32) -> Weight {
		Weight::from_parts(5_112_000_u64, 0)
			// Standard Error: 6_530
			.saturating_add(Weight::from_parts(9_640_000_u64, 0).saturating_mul(a as u64))
			.saturating_add(T::DbWeight::get().reads((3_u64).saturating_mul(a as u64)))
			.saturating_add(T::DbWeight::get().writes((2_u64).saturating_mul(a as u64)))
	}
}

// For backwards compatibility and tests.
impl WeightInfo for () {
	fn post_price() -> Weight {
		Weight::from_parts(24_310_000_u64, 4_687)
			.saturating_add(RocksDbWeight::get().reads(3_u64))
			.saturating_add(RocksDbWeight::get().writes(1_u64))
	}
	fn add_asset() -> Weight {
		Weight::from_parts(13_842_000_u64, 3_593)
			.saturating_add(RocksDbWeight::get().reads(2_u64))
			.saturating_add(RocksDbWeight::get().writes(2_u64))
	}
	fn add_oracle() -> Weight {
		Weight::from_parts(12_967_000_u64, 3_517)
			.saturating_add(RocksDbWeight::get().reads(2_u64))
			.saturating_add(RocksDbWeight::get().writes(2_u64))
	}
	fn remove_oracle(a: u32) -> Weight {
		Weight::from_parts(15_201_000_u64, 3_517)
			.saturating_add(Weight::from_parts(3_874_000_u64, 0).saturating_mul(a as u64))
			.saturating_add(RocksDbWeight::get().reads(2_u64))
			.saturating_add(RocksDbWeight::get().reads((1_u64).saturating_mul(a as u64)))
			.saturating_add(RocksDbWeight::get().writes(2_u64))
			.saturating_add(RocksDbWeight::get().writes((1_u64).saturating_mul(a as u64)))
	}
	fn on_finalize(a: u32) -> Weight {
		Weight::from_parts(5_112_000_u64, 0)
			.saturating_add(Weight::from_parts(9_640_000_u64, 0).saturating_mul(a as u64))
			.saturating_add(RocksDbWeight::get().reads((3_u64).saturating_mul(a as u64)))
			.saturating_add(RocksDbWeight::get().writes((2_u64).saturating_mul(a as u64)))
	}
}
