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

//! # CDP Pallet
//!
//! ## Overview
//!
//! A ledger of collateralized debt positions. An account locks collateral, fungible or a single
//! non-fungible instance, and draws debt in the configured debt denomination against it.
//!
//! ### Key Concepts
//!
//! * **CDP**: at most one per owner and collateral token. Created by the first modification,
//!   removed once both its collateral and its debt are zero.
//! * **Liquidation ratio**: a CDP must keep its collateral, valued at the canonical price, at or
//!   above the ratio times its debt. Modifications that would break this are rejected.
//! * **Debt ceilings**: a global limit and one limit per collateral kind. Only increases of debt
//!   are held against them.
//! * **Revaluation**: when the price of an asset changes, every CDP collateralized by it has its
//!   [`Cdp::collateral_value`] recomputed; a new price of the debt denomination revalues every
//!   CDP. A CDP that cannot be revalued, because it became unsafe or cannot be valued, fails the
//!   whole revaluation.
//! * **Bounded book**: at most [`Config::MaxCdps`] CDPs exist, which bounds the weight of a
//!   revaluation.
//! * **Staging ledger**: an internal balance holding seized collateral on behalf of the
//!   liquidation subsystem, see [`sp_lending::StagingLedger`].
//!
//! ## Interface
//!
//! ### Dispatchable Functions
//!
//! * [`Pallet::modify_cdp`]: change the collateral and the debt of the caller's CDP.
//! * [`Pallet::set_global_debt_limit`]: set the global debt ceiling.
//! * [`Pallet::set_collateral_params`]: authorize a collateral kind or update its parameters.
//!
//! ### Other
//!
//! The pallet implements [`sp_lending::OnPriceUpdate`] for the price source to call, and
//! [`sp_lending::CdpLiquidation`] for the liquidation subsystem.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

use alloc::vec::Vec;
use frame_support::{defensive, pallet_prelude::*};
use frame_system::pallet_prelude::*;
use sp_lending::{
	Amount, AssetId, AssetKind, Balance, BalanceLedger, CdpLiquidation, Coin, CollateralToken,
	Denom, InstanceId, OnPriceUpdate, Price, PriceProvider,
};
use sp_runtime::{
	traits::{Saturating, Zero},
	ArithmeticError,
};

#[cfg(feature = "runtime-benchmarks")]
mod benchmarking;
#[cfg(test)]
mod mock;
mod staging;
pub mod types;
pub mod weights;

pub use pallet::*;
pub use types::*;
pub use weights::WeightInfo;

const LOG_TARGET: &str = "runtime::cdp";

pub type CdpOf<T> = Cdp<<T as frame_system::Config>::AccountId>;

/// Funding and pricing hooks needed to benchmark the pallet.
#[cfg(feature = "runtime-benchmarks")]
pub trait BenchmarkHelper<AccountId> {
	/// Make `amount` of `denom` available to `who` on the balance ledger.
	fn fund(who: &AccountId, denom: &Denom, amount: Balance);
	/// Make `price` the canonical price of `asset`.
	fn set_price(asset: &AssetId, price: Price);
}

#[frame_support::pallet]
pub mod pallet {
	use super::*;

	#[pallet::pallet]
	pub struct Pallet<T>(_);

	#[pallet::config]
	pub trait Config: frame_system::Config {
		/// Canonical prices of collateral and of the debt denomination.
		type PriceSource: PriceProvider<BlockNumberFor<Self>>;

		/// External balances of CDP owners.
		type Ledger: BalanceLedger<Self::AccountId>;

		/// Origin allowed to change the debt ceilings and the collateral parameters.
		type UpdateOrigin: EnsureOrigin<Self::RuntimeOrigin>;

		/// The only denomination debt can be drawn in.
		#[pallet::constant]
		type DebtDenom: Get<Denom>;

		/// Governance denomination, never held by the staging ledger.
		#[pallet::constant]
		type GovDenom: Get<Denom>;

		/// Maximum number of CDPs across all collateral kinds.
		#[pallet::constant]
		type MaxCdps: Get<u32>;

		/// Weight information for extrinsics in this pallet.
		type WeightInfo: WeightInfo;

		#[cfg(feature = "runtime-benchmarks")]
		type BenchmarkHelper: BenchmarkHelper<Self::AccountId>;
	}

	/// Maximum debt across all CDPs.
	#[pallet::storage]
	pub type GlobalDebtLimit<T: Config> = StorageValue<_, Balance, ValueQuery>;

	/// Parameters of every authorized collateral kind.
	#[pallet::storage]
	pub type CollateralParameters<T: Config> =
		StorageMap<_, Blake2_128Concat, Denom, CollateralParams>;

	/// Debt drawn across all CDPs that has not been annihilated yet.
	#[pallet::storage]
	pub type GlobalDebt<T: Config> = StorageValue<_, Balance, ValueQuery>;

	/// Debt drawn against each collateral kind, created on the first draw.
	#[pallet::storage]
	pub type CollateralStates<T: Config> = StorageMap<_, Blake2_128Concat, Denom, CollateralState>;

	/// The CDPs, by collateral name and then by owner and collateral instance.
	#[pallet::storage]
	pub type Cdps<T: Config> = StorageDoubleMap<
		_,
		Blake2_128Concat,
		Denom,
		Blake2_128Concat,
		(T::AccountId, Option<InstanceId>),
		CdpOf<T>,
	>;

	/// Number of entries in [`Cdps`].
	#[pallet::storage]
	pub type CdpCount<T: Config> = StorageValue<_, u32, ValueQuery>;

	/// Balances of the staging ledger.
	#[pallet::storage]
	pub type StagingBalances<T: Config> =
		StorageMap<_, Blake2_128Concat, Denom, Balance, ValueQuery>;

	#[pallet::genesis_config]
	#[derive(frame_support::DefaultNoBound)]
	pub struct GenesisConfig<T: Config> {
		pub global_debt_limit: Balance,
		/// Collateral kinds authorized from genesis.
		pub collateral_params: Vec<CollateralParams>,
		pub global_debt: Balance,
		#[serde(skip)]
		pub _config: core::marker::PhantomData<T>,
	}

	#[pallet::genesis_build]
	impl<T: Config> BuildGenesisConfig for GenesisConfig<T> {
		fn build(&self) {
			assert!(
				self.global_debt <= self.global_debt_limit,
				"genesis global debt exceeds the global debt limit"
			);
			GlobalDebtLimit::<T>::put(self.global_debt_limit);
			GlobalDebt::<T>::put(self.global_debt);
			for params in &self.collateral_params {
				assert!(
					!CollateralParameters::<T>::contains_key(&params.denom),
					"duplicate genesis collateral"
				);
				CollateralParameters::<T>::insert(&params.denom, params);
			}
		}
	}

	#[pallet::event]
	#[pallet::generate_deposit(pub(super) fn deposit_event)]
	pub enum Event<T: Config> {
		/// The collateral or the debt of a CDP changed.
		CdpModified {
			owner: T::AccountId,
			token: CollateralToken,
			collateral_delta: Amount,
			debt_delta: Amount,
		},
		/// A CDP was emptied and removed.
		CdpClosed { owner: T::AccountId, token: CollateralToken },
		/// Collateral and debt were taken away from an unsafe CDP.
		CdpSeized {
			owner: T::AccountId,
			token: CollateralToken,
			collateral: Balance,
			debt: Balance,
		},
		/// Debt was annihilated outside of the pallet.
		GlobalDebtReduced { amount: Balance, global_debt: Balance },
		GlobalDebtLimitSet { limit: Balance },
		CollateralParamsSet { params: CollateralParams },
	}

	#[pallet::error]
	pub enum Error<T> {
		/// The collateral kind is not authorized.
		UnsupportedCollateral,
		/// Debt can only be drawn in the debt denomination.
		UnsupportedDebtDenom,
		/// The owner cannot cover the deposit or the repayment.
		InsufficientFunds,
		/// More collateral withdrawn than the CDP holds.
		NegativeCollateral,
		/// More debt repaid than the CDP owes.
		NegativeDebt,
		/// The CDP would end up below the liquidation ratio.
		BelowLiquidationRatio,
		/// The global debt would exceed its limit.
		GlobalDebtCeilingExceeded,
		/// The debt drawn against the collateral kind would exceed its limit.
		CollateralDebtCeilingExceeded,
		/// The debt denomination has no price.
		InvalidDebtPrice,
		/// No CDP for this owner and collateral token.
		NotFound,
		/// Only CDPs below the liquidation ratio can be seized.
		NotUnderLiquidationRatio,
		/// Seized amounts must not be negative.
		NegativeSeizure,
		/// More seized than the CDP holds.
		SeizureExceedsCdp,
		/// Debt reductions must not be negative.
		NegativeDebtReduction,
		/// The reduction is larger than the global debt.
		InsufficientGlobalDebt,
		/// Filtering by price needs a collateral kind.
		PriceWithoutCollateral,
		/// Coin amounts must be non-zero with each denomination listed once.
		InvalidCoins,
		/// The staging ledger does not hold enough.
		InsufficientStagingFunds,
		/// No more CDPs can be opened.
		TooManyCdps,
	}

	#[pallet::hooks]
	impl<T: Config> Hooks<BlockNumberFor<T>> for Pallet<T> {
		#[cfg(feature = "try-runtime")]
		fn try_state(_: BlockNumberFor<T>) -> Result<(), sp_runtime::TryRuntimeError> {
			Self::do_try_state()
		}
	}

	#[pallet::call]
	impl<T: Config> Pallet<T> {
		/// Add `collateral_delta` of `token` to the caller's CDP and draw `debt` against it.
		///
		/// Negative amounts withdraw collateral and repay debt. The CDP is created on first use
		/// and removed once it holds nothing.
		#[pallet::call_index(0)]
		#[pallet::weight(T::WeightInfo::modify_cdp())]
		pub fn modify_cdp(
			origin: OriginFor<T>,
			token: CollateralToken,
			collateral_delta: Amount,
			debt: Coin<Amount>,
		) -> DispatchResult {
			let owner = ensure_signed(origin)?;
			ensure!(
				CollateralParameters::<T>::contains_key(token.name()),
				Error::<T>::UnsupportedCollateral
			);
			ensure!(debt.denom == T::DebtDenom::get(), Error::<T>::UnsupportedDebtDenom);
			Self::do_modify_cdp(&owner, &token, collateral_delta, debt.amount)
		}

		#[pallet::call_index(1)]
		#[pallet::weight(T::WeightInfo::set_global_debt_limit())]
		pub fn set_global_debt_limit(origin: OriginFor<T>, limit: Balance) -> DispatchResult {
			T::UpdateOrigin::ensure_origin(origin)?;
			GlobalDebtLimit::<T>::put(limit);
			Self::deposit_event(Event::GlobalDebtLimitSet { limit });
			Ok(())
		}

		/// Authorize the collateral kind `params.denom`, or replace its parameters.
		#[pallet::call_index(2)]
		#[pallet::weight(T::WeightInfo::set_collateral_params())]
		pub fn set_collateral_params(
			origin: OriginFor<T>,
			params: CollateralParams,
		) -> DispatchResult {
			T::UpdateOrigin::ensure_origin(origin)?;
			CollateralParameters::<T>::insert(&params.denom, &params);
			Self::deposit_event(Event::CollateralParamsSet { params });
			Ok(())
		}
	}

	#[pallet::view_functions]
	impl<T: Config> Pallet<T> {
		/// The CDP of `owner` collateralized by `token`.
		pub fn cdp(owner: T::AccountId, token: CollateralToken) -> Option<CdpOf<T>> {
			Cdps::<T>::get(token.name(), (owner, token.instance_id().cloned()))
		}

		/// CDPs ordered by collateral-to-debt ratio, lowest first.
		///
		/// With a `collateral` only CDPs of that kind are returned, and with a `price` as well only
		/// those that would be below the liquidation ratio at that price.
		pub fn cdps(
			collateral: Option<Denom>,
			price: Option<Price>,
		) -> Result<Vec<CdpOf<T>>, DispatchError> {
			Self::do_cdps(collateral, price)
		}

		pub fn module_params() -> ModuleParams {
			ModuleParams {
				global_debt_limit: GlobalDebtLimit::<T>::get(),
				collateral_params: CollateralParameters::<T>::iter_values().collect(),
			}
		}

		pub fn global_debt() -> Balance {
			GlobalDebt::<T>::get()
		}

		pub fn collateral_state(denom: Denom) -> Option<CollateralState> {
			CollateralStates::<T>::get(denom)
		}
	}
}

impl<T: Config> Pallet<T> {
	/// Apply `collateral_delta` and `debt_delta` to the CDP of `owner` for `token`.
	///
	/// All checks run before anything is written. With zero deltas this only refreshes the
	/// collateral value of an existing CDP.
	pub fn do_modify_cdp(
		owner: &T::AccountId,
		token: &CollateralToken,
		collateral_delta: Amount,
		debt_delta: Amount,
	) -> DispatchResult {
		let name = token.name();
		let params =
			CollateralParameters::<T>::get(name).ok_or(Error::<T>::UnsupportedCollateral)?;
		let debt_denom = T::DebtDenom::get();

		if collateral_delta.is_positive() {
			ensure!(
				T::Ledger::has_sufficient_balance(owner, name, collateral_delta.unsigned_abs()),
				Error::<T>::InsufficientFunds
			);
		}
		if debt_delta.is_negative() {
			ensure!(
				T::Ledger::has_sufficient_balance(owner, &debt_denom, debt_delta.unsigned_abs()),
				Error::<T>::InsufficientFunds
			);
		}

		let key = (owner.clone(), token.instance_id().cloned());
		let existing = Cdps::<T>::get(name, &key);
		let created = existing.is_none();
		let mut cdp = existing
			.unwrap_or_else(|| Cdp::empty(owner.clone(), token.clone(), debt_denom.clone()));

		cdp.collateral.amount =
			apply_delta(cdp.collateral.amount, collateral_delta, Error::<T>::NegativeCollateral)?;
		cdp.liquidity.coin.amount =
			apply_delta(cdp.liquidity.coin.amount, debt_delta, Error::<T>::NegativeDebt)?;
		let opened = created && !cdp.is_empty();
		if opened {
			ensure!(CdpCount::<T>::get() < T::MaxCdps::get(), Error::<T>::TooManyCdps);
		}

		let asset = token.asset_id();
		let price = T::PriceSource::current_price(&asset).price;
		ensure!(
			!cdp.is_under_collateralized(price, params.liquidation_ratio),
			Error::<T>::BelowLiquidationRatio
		);

		let global_debt = change_total_debt(GlobalDebt::<T>::get(), debt_delta)?;
		if debt_delta.is_positive() {
			ensure!(
				global_debt <= GlobalDebtLimit::<T>::get(),
				Error::<T>::GlobalDebtCeilingExceeded
			);
		}

		let mut state = CollateralStates::<T>::get(name)
			.unwrap_or_else(|| CollateralState { denom: name.clone(), total_debt: 0 });
		state.total_debt = change_total_debt(state.total_debt, debt_delta)?;
		if debt_delta.is_positive() {
			ensure!(
				state.total_debt <= params.debt_limit,
				Error::<T>::CollateralDebtCeilingExceeded
			);
		}

		let debt_price =
			T::PriceSource::current_price(&AssetId::fungible(debt_denom.clone())).price;
		ensure!(!debt_price.is_zero(), Error::<T>::InvalidDebtPrice);
		cdp.collateral_value = redenominate(cdp.collateral.amount, price, debt_price)?;
		if created {
			cdp.collateral.initial_price = price;
			cdp.liquidity.initial_price = debt_price;
		}

		if price.is_zero() {
			T::PriceSource::request_price(&asset);
		}
		if collateral_delta.is_positive() {
			T::Ledger::debit(owner, name, collateral_delta.unsigned_abs())?;
		} else if collateral_delta.is_negative() {
			T::Ledger::credit(owner, name, collateral_delta.unsigned_abs())?;
		}
		if debt_delta.is_positive() {
			T::Ledger::credit(owner, &debt_denom, debt_delta.unsigned_abs())?;
		} else if debt_delta.is_negative() {
			T::Ledger::debit(owner, &debt_denom, debt_delta.unsigned_abs())?;
		}

		if debt_delta != 0 {
			GlobalDebt::<T>::put(global_debt);
			CollateralStates::<T>::insert(name, state);
		}

		if cdp.is_empty() {
			Cdps::<T>::remove(name, &key);
			if !created {
				CdpCount::<T>::mutate(|count| count.saturating_dec());
			}
		} else {
			Cdps::<T>::insert(name, &key, &cdp);
			if opened {
				CdpCount::<T>::mutate(|count| count.saturating_inc());
			}
		}

		if collateral_delta != 0 || debt_delta != 0 {
			log::debug!(
				target: LOG_TARGET,
				"cdp of {:?} on {:?} now holds {} against {} debt",
				owner,
				token,
				cdp.collateral.amount,
				cdp.liquidity.coin.amount,
			);
			Self::deposit_event(Event::CdpModified {
				owner: owner.clone(),
				token: token.clone(),
				collateral_delta,
				debt_delta,
			});
			if cdp.is_empty() {
				Self::deposit_event(Event::CdpClosed {
					owner: owner.clone(),
					token: token.clone(),
				});
			}
		}

		Ok(())
	}

	/// Revalue every CDP whose value depends on the price of `asset`.
	///
	/// These are the CDPs collateralized by `asset`, or every CDP when `asset` is the debt
	/// denomination. The first CDP that fails to revalue aborts the revaluation and its writes
	/// are discarded. Returns the number of CDPs read.
	pub fn modify_cdps_of_asset_type(asset: &AssetId) -> Result<u32, DispatchError> {
		let (read, cdps): (u32, Vec<CdpOf<T>>) =
			if *asset == AssetId::fungible(T::DebtDenom::get()) {
				let cdps: Vec<CdpOf<T>> = Cdps::<T>::iter_values().collect();
				(cdps.len() as u32, cdps)
			} else {
				let mut read = 0u32;
				let cdps: Vec<CdpOf<T>> = Cdps::<T>::iter_prefix_values(&asset.name)
					.inspect(|_| read.saturating_inc())
					.filter(|cdp| match asset.kind() {
						AssetKind::Fungible => cdp.collateral.token.instance_id().is_none(),
						AssetKind::NonFungible =>
							cdp.collateral.token.instance_id() == Some(&asset.code),
					})
					.collect();
				(read, cdps)
			};

		frame_support::storage::with_storage_layer(|| {
			for cdp in &cdps {
				Self::do_modify_cdp(&cdp.owner, &cdp.collateral.token, 0, 0).inspect_err(|e| {
					log::warn!(
						target: LOG_TARGET,
						"revaluation for {:?} stopped at the cdp of {:?} on {:?}: {:?}",
						asset,
						cdp.owner,
						cdp.collateral.token,
						e,
					);
				})?;
			}
			Ok(read)
		})
	}

	/// Move `collateral_to_seize` and `debt_to_seize` out of an unsafe CDP.
	///
	/// The collateral is credited to the staging ledger and the debt leaves the collateral kind's
	/// total. The global debt is left for [`Self::do_reduce_global_debt`].
	pub fn do_partial_seize_cdp(
		owner: &T::AccountId,
		token: &CollateralToken,
		collateral_to_seize: Amount,
		debt_to_seize: Amount,
	) -> DispatchResult {
		let name = token.name();
		let key = (owner.clone(), token.instance_id().cloned());
		let mut cdp = Cdps::<T>::get(name, &key).ok_or(Error::<T>::NotFound)?;
		let params =
			CollateralParameters::<T>::get(name).ok_or(Error::<T>::UnsupportedCollateral)?;

		let price = T::PriceSource::current_price(&token.asset_id()).price;
		ensure!(
			cdp.is_under_collateralized(price, params.liquidation_ratio),
			Error::<T>::NotUnderLiquidationRatio
		);
		ensure!(
			!collateral_to_seize.is_negative() && !debt_to_seize.is_negative(),
			Error::<T>::NegativeSeizure
		);
		let (collateral, debt) = (collateral_to_seize.unsigned_abs(), debt_to_seize.unsigned_abs());

		cdp.collateral.amount =
			cdp.collateral.amount.checked_sub(collateral).ok_or(Error::<T>::SeizureExceedsCdp)?;
		cdp.liquidity.coin.amount =
			cdp.liquidity.coin.amount.checked_sub(debt).ok_or(Error::<T>::SeizureExceedsCdp)?;

		let Some(mut state) = CollateralStates::<T>::get(name) else {
			defensive!("an unsafe CDP owes debt, so its collateral kind has a state");
			return Err(DispatchError::Corruption)
		};
		state.total_debt = state.total_debt.checked_sub(debt).ok_or_else(|| {
			defensive!("collateral kind owes less than one of its CDPs");
			DispatchError::Corruption
		})?;

		let debt_price =
			T::PriceSource::current_price(&AssetId::fungible(T::DebtDenom::get())).price;
		if !debt_price.is_zero() {
			cdp.collateral_value = redenominate(cdp.collateral.amount, price, debt_price)?;
		}

		frame_support::storage::with_storage_layer(|| {
			if collateral > 0 {
				Self::stage(name, collateral)?;
			}
			CollateralStates::<T>::insert(name, state);
			if cdp.is_empty() {
				Cdps::<T>::remove(name, &key);
				CdpCount::<T>::mutate(|count| count.saturating_dec());
			} else {
				Cdps::<T>::insert(name, &key, &cdp);
			}

			log::info!(
				target: LOG_TARGET,
				"seized {} collateral and {} debt from the cdp of {:?} on {:?}",
				collateral,
				debt,
				owner,
				token,
			);
			Self::deposit_event(Event::CdpSeized {
				owner: owner.clone(),
				token: token.clone(),
				collateral,
				debt,
			});
			if cdp.is_empty() {
				Self::deposit_event(Event::CdpClosed {
					owner: owner.clone(),
					token: token.clone(),
				});
			}
			Ok(())
		})
	}

	pub fn do_reduce_global_debt(amount: Amount) -> DispatchResult {
		ensure!(!amount.is_negative(), Error::<T>::NegativeDebtReduction);
		let amount = amount.unsigned_abs();
		let global_debt = GlobalDebt::<T>::get()
			.checked_sub(amount)
			.ok_or(Error::<T>::InsufficientGlobalDebt)?;

		GlobalDebt::<T>::put(global_debt);
		Self::deposit_event(Event::GlobalDebtReduced { amount, global_debt });
		Ok(())
	}

	pub(crate) fn do_cdps(
		collateral: Option<Denom>,
		price: Option<Price>,
	) -> Result<Vec<CdpOf<T>>, DispatchError> {
		let liquidation_ratio = match (&collateral, price) {
			(Some(denom), _) => Some(
				CollateralParameters::<T>::get(denom)
					.ok_or(Error::<T>::UnsupportedCollateral)?
					.liquidation_ratio,
			),
			(None, Some(_)) => return Err(Error::<T>::PriceWithoutCollateral.into()),
			(None, None) => None,
		};

		let mut cdps: Vec<CdpOf<T>> = match &collateral {
			Some(denom) => Cdps::<T>::iter_prefix_values(denom).collect(),
			None => Cdps::<T>::iter_values().collect(),
		};
		cdps.sort_by(|a, b| a.cmp_collateral_ratio(b));

		if let (Some(price), Some(ratio)) = (price, liquidation_ratio) {
			// Sorted by ratio, so the unsafe CDPs form a prefix.
			let end = cdps
				.iter()
				.position(|cdp| !cdp.is_under_collateralized(price, ratio))
				.unwrap_or(cdps.len());
			cdps.truncate(end);
		}

		Ok(cdps)
	}

	#[cfg(any(test, feature = "try-runtime"))]
	pub(crate) fn do_try_state() -> Result<(), sp_runtime::TryRuntimeError> {
		use alloc::collections::BTreeMap;

		let mut debt_per_kind = BTreeMap::<Denom, Balance>::new();
		let mut count = 0u32;
		for (name, (owner, instance_id), cdp) in Cdps::<T>::iter() {
			count.saturating_inc();
			ensure!(!cdp.is_empty(), "empty CDP kept in storage");
			ensure!(cdp.owner == owner, "CDP stored under another owner");
			ensure!(
				cdp.collateral.token.name() == &name &&
					cdp.collateral.token.instance_id() == instance_id.as_ref(),
				"CDP stored under another collateral token"
			);
			ensure!(
				cdp.liquidity.coin.denom == T::DebtDenom::get(),
				"CDP owes in a foreign denomination"
			);
			ensure!(
				CollateralParameters::<T>::contains_key(&name),
				"CDP collateralized by an unauthorized kind"
			);
			let total = debt_per_kind.entry(name).or_default();
			*total = total.saturating_add(cdp.liquidity.coin.amount);
		}

		let mut total_debt: Balance = 0;
		for (name, state) in CollateralStates::<T>::iter() {
			ensure!(state.denom == name, "collateral state stored under another kind");
			ensure!(
				state.total_debt == debt_per_kind.remove(&name).unwrap_or_default(),
				"collateral state differs from the debt of its CDPs"
			);
			total_debt = total_debt.saturating_add(state.total_debt);
		}
		ensure!(CdpCount::<T>::get() == count, "CDP count differs from the stored CDPs");
		ensure!(count <= T::MaxCdps::get(), "more CDPs than MaxCdps");
		ensure!(
			debt_per_kind.values().all(|debt| *debt == 0),
			"debt drawn against a kind without a collateral state"
		);
		ensure!(
			GlobalDebt::<T>::get() >= total_debt,
			"global debt below the debt of the collateral kinds"
		);

		ensure!(
			!StagingBalances::<T>::contains_key(T::GovDenom::get()),
			"staging ledger holds the governance denomination"
		);

		Ok(())
	}
}

/// `value` moved by `delta`, failing with `negative` below zero.
fn apply_delta<T: Config>(
	value: Balance,
	delta: Amount,
	negative: Error<T>,
) -> Result<Balance, DispatchError> {
	if delta.is_negative() {
		value.checked_sub(delta.unsigned_abs()).ok_or_else(|| negative.into())
	} else {
		value.checked_add(delta.unsigned_abs()).ok_or_else(|| ArithmeticError::Overflow.into())
	}
}

/// An aggregate debt moved by `delta`. Aggregates cover the debt of every CDP they count, so
/// they never go negative.
fn change_total_debt(total: Balance, delta: Amount) -> Result<Balance, DispatchError> {
	if delta.is_negative() {
		total.checked_sub(delta.unsigned_abs()).ok_or_else(|| {
			defensive!("aggregate debt lower than the debt of one CDP");
			DispatchError::Corruption
		})
	} else {
		total.checked_add(delta.unsigned_abs()).ok_or_else(|| ArithmeticError::Overflow.into())
	}
}

impl<T: Config> OnPriceUpdate for Pallet<T> {
	fn max_weight() -> Weight {
		T::WeightInfo::revalue_cdps(T::MaxCdps::get())
	}

	fn on_price_update(asset: &AssetId) -> Result<Weight, DispatchError> {
		Self::modify_cdps_of_asset_type(asset).map(T::WeightInfo::revalue_cdps)
	}
}

impl<T: Config> CdpLiquidation<T::AccountId> for Pallet<T> {
	fn partial_seize_cdp(
		owner: &T::AccountId,
		token: &CollateralToken,
		collateral_to_seize: Amount,
		debt_to_seize: Amount,
	) -> DispatchResult {
		Self::do_partial_seize_cdp(owner, token, collateral_to_seize, debt_to_seize)
	}

	fn reduce_global_debt(amount: Amount) -> DispatchResult {
		Self::do_reduce_global_debt(amount)
	}
}
