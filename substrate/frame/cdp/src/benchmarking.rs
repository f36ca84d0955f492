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

//! CDP pallet benchmarking.

use super::*;

use frame_benchmarking::v2::*;
use frame_support::traits::EnsureOrigin;
use frame_system::RawOrigin;
use sp_lending::Ratio;
use sp_runtime::{traits::One, FixedPointNumber};

const SEED: u32 = 0;

fn collateral_params() -> CollateralParams {
	CollateralParams {
		denom: BoundedVec::truncate_from(b"bench".to_vec()),
		liquidation_ratio: Ratio::saturating_from_rational(3, 2),
		debt_limit: Balance::MAX,
	}
}

/// Authorize a collateral kind without ceilings and price it together with the debt.
fn setup_collateral<T: Config>() -> CollateralToken {
	let params = collateral_params();
	let name = params.denom.clone();
	CollateralParameters::<T>::insert(&name, params);
	GlobalDebtLimit::<T>::put(Balance::MAX);

	let price = Price::saturating_from_integer(10);
	T::BenchmarkHelper::set_price(&AssetId::fungible(name.clone()), price);
	T::BenchmarkHelper::set_price(&AssetId::fungible(T::DebtDenom::get()), Price::one());
	CollateralToken::Fungible { name }
}

#[benchmarks]
mod benchmarks {
	use super::*;

	#[benchmark]
	fn modify_cdp() -> Result<(), BenchmarkError> {
		let token = setup_collateral::<T>();
		let owner: T::AccountId = whitelisted_caller();
		T::BenchmarkHelper::fund(&owner, token.name(), 2_000);
		// every aggregate already exists
		Pallet::<T>::do_modify_cdp(&owner, &token, 1_000, 1_000)?;

		let debt = Coin::new(T::DebtDenom::get(), 1_000);

		#[extrinsic_call]
		_(RawOrigin::Signed(owner.clone()), token.clone(), 1_000, debt);

		let cdp = Cdps::<T>::get(token.name(), (owner, None))
			.ok_or(BenchmarkError::Stop("cdp not stored"))?;
		assert_eq!(cdp.collateral.amount, 2_000);
		assert_eq!(cdp.liquidity.coin.amount, 2_000);
		Ok(())
	}

	#[benchmark]
	fn set_global_debt_limit() -> Result<(), BenchmarkError> {
		let origin =
			T::UpdateOrigin::try_successful_origin().map_err(|_| BenchmarkError::Weightless)?;

		#[extrinsic_call]
		_(origin as T::RuntimeOrigin, 1_000);

		assert_eq!(GlobalDebtLimit::<T>::get(), 1_000);
		Ok(())
	}

	#[benchmark]
	fn set_collateral_params() -> Result<(), BenchmarkError> {
		let origin =
			T::UpdateOrigin::try_successful_origin().map_err(|_| BenchmarkError::Weightless)?;
		let params = collateral_params();

		#[extrinsic_call]
		_(origin as T::RuntimeOrigin, params.clone());

		assert_eq!(CollateralParameters::<T>::get(&params.denom), Some(params));
		Ok(())
	}

	#[benchmark]
	fn revalue_cdps(c: Linear<0, { T::MaxCdps::get() }>) -> Result<(), BenchmarkError> {
		let token = setup_collateral::<T>();
		for i in 0..c {
			let owner: T::AccountId = account("owner", i, SEED);
			T::BenchmarkHelper::fund(&owner, token.name(), 100);
			Pallet::<T>::do_modify_cdp(&owner, &token, 100, 100)?;
		}
		// a new debt price revalues every CDP
		let debt = AssetId::fungible(T::DebtDenom::get());

		#[block]
		{
			Pallet::<T>::modify_cdps_of_asset_type(&debt)?;
		}

		assert_eq!(CdpCount::<T>::get(), c);
		Ok(())
	}

	impl_benchmark_test_suite!(Pallet, crate::mock::new_test_ext(), crate::mock::Test);
}
