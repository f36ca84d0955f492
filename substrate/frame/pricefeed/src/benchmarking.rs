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

//! Price feed pallet benchmarking.

use super::*;

use frame_benchmarking::v2::*;
use frame_support::traits::{EnsureOrigin, Hooks};
use frame_system::RawOrigin;
use sp_runtime::FixedPointNumber;

const SEED: u32 = 0;

fn asset(i: u32) -> AssetId {
	let name = BoundedVec::truncate_from(alloc::format!("asset{i}").into_bytes());
	AssetId::fungible(name)
}

fn register_asset<T: Config>(i: u32) -> AssetId {
	let asset = asset(i);
	Assets::<T>::insert(
		&asset,
		AssetInfo { kind: asset.kind(), description: BoundedVec::default() },
	);
	asset
}

/// Fill the oracle set and give every oracle a live submission for `asset`.
fn saturate_raw_prices<T: Config>(asset: &AssetId, expiry: BlockNumberFor<T>) {
	let mut prices = BoundedVec::<PostedPriceOf<T>, T::MaxOracles>::default();
	for i in 0..T::MaxOracles::get() {
		let oracle: T::AccountId = account("oracle", i, SEED);
		Oracles::<T>::insert(&oracle, ());
		let posted = PostedPrice {
			asset: asset.clone(),
			oracle,
			price: Price::saturating_from_integer(i + 1),
			expiry,
		};
		if prices.try_push(posted).is_err() {
			break
		}
	}
	RawPrices::<T>::insert(asset, prices);
}

#[benchmarks]
mod benchmarks {
	use super::*;

	#[benchmark]
	fn post_price() {
		let asset = register_asset::<T>(0);
		let expiry = frame_system::Pallet::<T>::block_number() + 10u32.into();
		saturate_raw_prices::<T>(&asset, expiry);
		// replace the submission found last
		let oracle: T::AccountId = account("oracle", T::MaxOracles::get() - 1, SEED);

		let price = Price::saturating_from_integer(7);

		#[extrinsic_call]
		_(RawOrigin::Signed(oracle.clone()), asset.clone(), price, expiry);

		assert!(RawPrices::<T>::get(&asset)
			.iter()
			.any(|p| p.oracle == oracle && p.price == price));
	}

	#[benchmark]
	fn add_asset() -> Result<(), BenchmarkError> {
		let origin =
			T::AdminOrigin::try_successful_origin().map_err(|_| BenchmarkError::Weightless)?;
		let asset = asset(0);
		let description =
			BoundedVec::truncate_from(alloc::vec![b'd'; T::MaxDescriptionLen::get() as usize]);

		#[extrinsic_call]
		_(origin as T::RuntimeOrigin, asset.clone(), description);

		assert!(Assets::<T>::contains_key(&asset));
		Ok(())
	}

	#[benchmark]
	fn add_oracle() -> Result<(), BenchmarkError> {
		let origin =
			T::AdminOrigin::try_successful_origin().map_err(|_| BenchmarkError::Weightless)?;
		let oracle: T::AccountId = account("oracle", 0, SEED);

		#[extrinsic_call]
		_(origin as T::RuntimeOrigin, oracle.clone());

		assert!(Oracles::<T>::contains_key(&oracle));
		Ok(())
	}

	#[benchmark]
	fn remove_oracle(a: Linear<1, 100>) -> Result<(), BenchmarkError> {
		let origin =
			T::AdminOrigin::try_successful_origin().map_err(|_| BenchmarkError::Weightless)?;
		let expiry = frame_system::Pallet::<T>::block_number() + 10u32.into();
		for i in 0..a {
			let asset = register_asset::<T>(i);
			saturate_raw_prices::<T>(&asset, expiry);
		}
		let oracle: T::AccountId = account("oracle", 0, SEED);

		#[extrinsic_call]
		_(origin as T::RuntimeOrigin, oracle.clone());

		assert!(!Oracles::<T>::contains_key(&oracle));
		Ok(())
	}

	#[benchmark]
	fn on_finalize(a: Linear<1, 100>) {
		let now = frame_system::Pallet::<T>::block_number();
		for i in 0..a {
			let asset = register_asset::<T>(i);
			saturate_raw_prices::<T>(&asset, now);
		}

		#[block]
		{
			Pallet::<T>::on_finalize(now);
		}

		assert!(CurrentPrices::<T>::get(asset(a - 1)).is_some_and(|p| !p.price.is_zero()));
	}

	impl_benchmark_test_suite!(Pallet, crate::mock::new_test_ext(), crate::mock::Test);
}
