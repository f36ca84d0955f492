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

//! # Price Feed Pallet
//!
//! ## Overview
//!
//! The price feed collects price submissions from a set of authorized oracles and combines them
//! into a single canonical price per asset, once per block.
//!
//! ### Key Concepts
//!
//! * **Assets**: things that can be priced. An asset is either fungible or a single non-fungible
//!   instance, see [`sp_lending::AssetId`].
//! * **Raw prices**: each oracle holds at most one live submission per asset. Posting again
//!   replaces the previous submission of that oracle.
//! * **Aggregation**: at the end of every block the submissions that have not expired are combined
//!   into the [`CurrentPrices`] entry of the asset. With an odd number of submissions the middle
//!   one wins; with an even number the two middle ones are averaged, truncated to a whole price
//!   when both are whole.
//! * **Revaluation**: after a submission and after every aggregation that changed a price, the
//!   configured [`Config::OnPriceUpdate`] hook is called for the asset. A failing hook at the end
//!   of a block is fatal.
//! * **Price requests**: consumers that find a zero price record a request, which stays pending
//!   until the asset receives a non-zero canonical price.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

use alloc::vec::Vec;
use codec::{Decode, DecodeWithMemTracking, Encode, MaxEncodedLen};
use frame_support::pallet_prelude::*;
use frame_system::pallet_prelude::*;
use scale_info::TypeInfo;
use serde::{Deserialize, Serialize};
use sp_lending::{AssetId, AssetKind, CurrentPrice, OnPriceUpdate, Price, PriceProvider};
use sp_runtime::{
	traits::{AtLeast32BitUnsigned, Zero},
	FixedPointNumber, RuntimeDebug,
};

#[cfg(feature = "runtime-benchmarks")]
mod benchmarking;
#[cfg(test)]
mod mock;
pub mod weights;

pub use pallet::*;
pub use weights::WeightInfo;

const LOG_TARGET: &str = "runtime::pricefeed";

/// One oracle's latest submission for an asset.
#[derive(
	Encode,
	Decode,
	DecodeWithMemTracking,
	Clone,
	PartialEq,
	Eq,
	RuntimeDebug,
	TypeInfo,
	MaxEncodedLen,
	Serialize,
	Deserialize,
)]
pub struct PostedPrice<AccountId, BlockNumber> {
	pub asset: AssetId,
	pub oracle: AccountId,
	pub price: Price,
	/// Last block at which the submission is taken into account.
	pub expiry: BlockNumber,
}

/// Registration details of a priceable asset.
#[derive(
	Encode,
	Decode,
	DecodeWithMemTracking,
	Clone,
	PartialEq,
	Eq,
	RuntimeDebug,
	TypeInfo,
	MaxEncodedLen,
	Serialize,
	Deserialize,
)]
pub struct AssetInfo<Description> {
	pub kind: AssetKind,
	pub description: Description,
}

pub type PostedPriceOf<T> =
	PostedPrice<<T as frame_system::Config>::AccountId, BlockNumberFor<T>>;
pub type CurrentPriceOf<T> = CurrentPrice<BlockNumberFor<T>>;
pub type DescriptionOf<T> = BoundedVec<u8, <T as Config>::MaxDescriptionLen>;
pub type AssetInfoOf<T> = AssetInfo<DescriptionOf<T>>;

#[frame_support::pallet]
pub mod pallet {
	use super::*;

	#[pallet::pallet]
	pub struct Pallet<T>(_);

	#[pallet::config]
	pub trait Config: frame_system::Config {
		/// Origin allowed to register assets and to maintain the oracle set.
		type AdminOrigin: EnsureOrigin<Self::RuntimeOrigin>;

		/// Called for an asset whose price may have changed.
		type OnPriceUpdate: OnPriceUpdate;

		/// Maximum number of oracles, and so of raw submissions per asset.
		#[pallet::constant]
		type MaxOracles: Get<u32>;

		/// Maximum length of an asset description.
		#[pallet::constant]
		type MaxDescriptionLen: Get<u32>;

		/// Weight information for extrinsics in this pallet.
		type WeightInfo: WeightInfo;
	}

	/// The assets that can be priced.
	#[pallet::storage]
	pub type Assets<T: Config> = CountedStorageMap<_, Blake2_128Concat, AssetId, AssetInfoOf<T>>;

	/// The accounts allowed to post prices.
	#[pallet::storage]
	pub type Oracles<T: Config> = CountedStorageMap<_, Blake2_128Concat, T::AccountId, ()>;

	/// Latest submission of every oracle, per asset, in the order oracles first posted.
	#[pallet::storage]
	pub type RawPrices<T: Config> = StorageMap<
		_,
		Blake2_128Concat,
		AssetId,
		BoundedVec<PostedPriceOf<T>, T::MaxOracles>,
		ValueQuery,
	>;

	/// Canonical price per asset, rewritten at the end of every block.
	#[pallet::storage]
	pub type CurrentPrices<T: Config> =
		StorageMap<_, Blake2_128Concat, AssetId, CurrentPriceOf<T>>;

	/// Assets a consumer needed a price for while none was available, with the block of the first
	/// request.
	#[pallet::storage]
	pub type PendingPriceRequests<T: Config> =
		StorageMap<_, Blake2_128Concat, AssetId, BlockNumberFor<T>>;

	#[pallet::genesis_config]
	#[derive(frame_support::DefaultNoBound)]
	pub struct GenesisConfig<T: Config> {
		/// Assets priceable from genesis, with their description.
		pub assets: Vec<(AssetId, Vec<u8>)>,
		/// Initial oracle set.
		pub oracles: Vec<T::AccountId>,
	}

	#[pallet::genesis_build]
	impl<T: Config> BuildGenesisConfig for GenesisConfig<T> {
		fn build(&self) {
			for (asset, description) in &self.assets {
				let description: DescriptionOf<T> = description
					.clone()
					.try_into()
					.expect("genesis asset description exceeds MaxDescriptionLen");
				assert!(!Assets::<T>::contains_key(asset), "duplicate genesis asset");
				Assets::<T>::insert(asset, AssetInfo { kind: asset.kind(), description });
			}

			assert!(
				self.oracles.len() <= T::MaxOracles::get() as usize,
				"genesis oracles exceed MaxOracles"
			);
			for oracle in &self.oracles {
				Oracles::<T>::insert(oracle, ());
			}
		}
	}

	#[pallet::event]
	#[pallet::generate_deposit(pub(super) fn deposit_event)]
	pub enum Event<T: Config> {
		/// An oracle posted a price.
		PricePosted {
			oracle: T::AccountId,
			asset: AssetId,
			price: Price,
			expiry: BlockNumberFor<T>,
		},
		/// The canonical price of an asset changed.
		CurrentPriceUpdated { asset: AssetId, price: Price, expiry: BlockNumberFor<T> },
		/// A price was needed for an asset that has none.
		PriceRequested { asset: AssetId },
		/// A new asset can be priced.
		AssetAdded { asset: AssetId, kind: AssetKind },
		/// An account may now post prices.
		OracleAdded { oracle: T::AccountId },
		/// An oracle was removed along with its submissions.
		OracleRemoved { oracle: T::AccountId },
	}

	#[pallet::error]
	pub enum Error<T> {
		/// The sender is not an oracle.
		UnauthorizedOracle,
		/// The asset is not registered.
		UnknownAsset,
		/// The submission expires before the current block.
		PriceExpired,
		/// The asset is already registered.
		AssetAlreadyRegistered,
		/// The account is already an oracle.
		OracleAlreadyRegistered,
		/// The account is not an oracle.
		OracleNotFound,
		/// The oracle set is full.
		TooManyOracles,
	}

	#[pallet::hooks]
	impl<T: Config> Hooks<BlockNumberFor<T>> for Pallet<T> {
		/// `on_initialize` to return the weight used in `on_finalize`.
		fn on_initialize(_n: BlockNumberFor<T>) -> Weight {
			let assets = Assets::<T>::count();
			// every asset may change and be revalued
			T::WeightInfo::on_finalize(assets)
				.saturating_add(T::OnPriceUpdate::max_weight().saturating_mul(assets.into()))
		}

		fn on_finalize(now: BlockNumberFor<T>) {
			// All canonical prices are settled before any revaluation sees them.
			let changed = Self::update_current_prices(now);

			for asset in changed {
				if let Err(e) = T::OnPriceUpdate::on_price_update(&asset) {
					log::error!(
						target: LOG_TARGET,
						"revaluation of {:?} failed at block {:?}: {:?}",
						asset,
						now,
						e,
					);
					panic!("revaluation after price aggregation failed");
				}
			}
		}

		#[cfg(feature = "try-runtime")]
		fn try_state(_: BlockNumberFor<T>) -> Result<(), sp_runtime::TryRuntimeError> {
			Self::do_try_state()
		}
	}

	#[pallet::call]
	impl<T: Config> Pallet<T> {
		/// Post a price for `asset`, valid up to and including block `expiry`.
		///
		/// The origin must be an oracle and `asset` must be registered. A previous submission of
		/// the same oracle for the same asset is replaced. The consumers of the asset are
		/// revalued right away, with the canonical price still being the one of the last block.
		///
		/// Emits `PricePosted`.
		#[pallet::call_index(0)]
		#[pallet::weight(
			T::WeightInfo::post_price().saturating_add(T::OnPriceUpdate::max_weight())
		)]
		pub fn post_price(
			origin: OriginFor<T>,
			asset: AssetId,
			price: Price,
			expiry: BlockNumberFor<T>,
		) -> DispatchResultWithPostInfo {
			let oracle = ensure_signed(origin)?;
			let (_, revaluation) = Self::store_and_revalue(oracle, asset, price, expiry)?;
			Ok(Some(T::WeightInfo::post_price().saturating_add(revaluation)).into())
		}

		/// Register a priceable asset.
		#[pallet::call_index(1)]
		#[pallet::weight(T::WeightInfo::add_asset())]
		pub fn add_asset(
			origin: OriginFor<T>,
			asset: AssetId,
			description: DescriptionOf<T>,
		) -> DispatchResult {
			T::AdminOrigin::ensure_origin(origin)?;
			ensure!(!Assets::<T>::contains_key(&asset), Error::<T>::AssetAlreadyRegistered);

			let kind = asset.kind();
			Assets::<T>::insert(&asset, AssetInfo { kind, description });
			Self::deposit_event(Event::AssetAdded { asset, kind });
			Ok(())
		}

		/// Allow `oracle` to post prices.
		#[pallet::call_index(2)]
		#[pallet::weight(T::WeightInfo::add_oracle())]
		pub fn add_oracle(origin: OriginFor<T>, oracle: T::AccountId) -> DispatchResult {
			T::AdminOrigin::ensure_origin(origin)?;
			ensure!(!Oracles::<T>::contains_key(&oracle), Error::<T>::OracleAlreadyRegistered);
			ensure!(Oracles::<T>::count() < T::MaxOracles::get(), Error::<T>::TooManyOracles);

			Oracles::<T>::insert(&oracle, ());
			Self::deposit_event(Event::OracleAdded { oracle });
			Ok(())
		}

		/// Remove `oracle` and every submission it made.
		#[pallet::call_index(3)]
		#[pallet::weight(T::WeightInfo::remove_oracle(Assets::<T>::count()))]
		pub fn remove_oracle(origin: OriginFor<T>, oracle: T::AccountId) -> DispatchResult {
			T::AdminOrigin::ensure_origin(origin)?;
			ensure!(Oracles::<T>::contains_key(&oracle), Error::<T>::OracleNotFound);

			Oracles::<T>::remove(&oracle);
			let assets: Vec<AssetId> = RawPrices::<T>::iter_keys().collect();
			for asset in assets {
				RawPrices::<T>::mutate_exists(&asset, |maybe_prices| {
					if let Some(prices) = maybe_prices {
						prices.retain(|p| p.oracle != oracle);
						if prices.is_empty() {
							*maybe_prices = None;
						}
					}
				});
			}

			Self::deposit_event(Event::OracleRemoved { oracle });
			Ok(())
		}
	}

	#[pallet::view_functions]
	impl<T: Config> Pallet<T> {
		/// The canonical price of `asset`, zero if it was never aggregated.
		pub fn current_price(asset: AssetId) -> CurrentPriceOf<T> {
			CurrentPrices::<T>::get(&asset).unwrap_or_else(|| CurrentPrice::zero(asset))
		}

		/// The live and expired submissions stored for `asset`.
		pub fn raw_prices(asset: AssetId) -> Vec<PostedPriceOf<T>> {
			RawPrices::<T>::get(asset).into_inner()
		}

		pub fn assets() -> Vec<(AssetId, AssetInfoOf<T>)> {
			Assets::<T>::iter().collect()
		}

		pub fn oracles() -> Vec<T::AccountId> {
			Oracles::<T>::iter_keys().collect()
		}

		/// Assets waiting for a first non-zero price.
		pub fn pending_price_requests() -> Vec<(AssetId, BlockNumberFor<T>)> {
			PendingPriceRequests::<T>::iter().collect()
		}
	}
}

impl<T: Config> Pallet<T> {
	/// Store `price` as the submission of `oracle` for `asset` and revalue the asset.
	///
	/// Returns the stored submission. Nothing is written unless the revaluation succeeds.
	pub fn do_post_price(
		oracle: T::AccountId,
		asset: AssetId,
		price: Price,
		expiry: BlockNumberFor<T>,
	) -> Result<PostedPriceOf<T>, DispatchError> {
		Self::store_and_revalue(oracle, asset, price, expiry).map(|(posted, _)| posted)
	}

	/// [`Self::do_post_price`], also returning the weight of the revaluation.
	fn store_and_revalue(
		oracle: T::AccountId,
		asset: AssetId,
		price: Price,
		expiry: BlockNumberFor<T>,
	) -> Result<(PostedPriceOf<T>, Weight), DispatchError> {
		ensure!(Oracles::<T>::contains_key(&oracle), Error::<T>::UnauthorizedOracle);
		ensure!(Assets::<T>::contains_key(&asset), Error::<T>::UnknownAsset);
		let now = frame_system::Pallet::<T>::block_number();
		ensure!(expiry >= now, Error::<T>::PriceExpired);

		frame_support::storage::with_storage_layer(|| {
			let posted =
				PostedPrice { asset: asset.clone(), oracle: oracle.clone(), price, expiry };
			RawPrices::<T>::try_mutate(&asset, |prices| -> DispatchResult {
				match prices.iter_mut().find(|p| p.oracle == oracle) {
					Some(existing) => *existing = posted.clone(),
					None => prices
						.try_push(posted.clone())
						.map_err(|_| Error::<T>::TooManyOracles)?,
				}
				Ok(())
			})?;

			let revaluation = T::OnPriceUpdate::on_price_update(&asset)?;

			log::debug!(
				target: LOG_TARGET,
				"oracle {:?} posted {:?} for {:?} until {:?}",
				oracle,
				price,
				asset,
				expiry,
			);
			Self::deposit_event(Event::PricePosted { oracle, asset, price, expiry });
			Ok((posted, revaluation))
		})
	}

	/// Record that a price for `asset` is needed. Repeated requests are kept once.
	pub fn do_request_price(asset: &AssetId) {
		if PendingPriceRequests::<T>::contains_key(asset) {
			return
		}
		PendingPriceRequests::<T>::insert(asset, frame_system::Pallet::<T>::block_number());
		Self::deposit_event(Event::PriceRequested { asset: asset.clone() });
	}

	/// Recompute the canonical price of every asset at block `now`.
	///
	/// Returns the assets whose canonical price changed.
	pub(crate) fn update_current_prices(now: BlockNumberFor<T>) -> Vec<AssetId> {
		let mut changed = Vec::new();

		for asset in Assets::<T>::iter_keys() {
			let current = Self::aggregate(&asset, now);
			let previous = CurrentPrices::<T>::get(&asset).map_or_else(Zero::zero, |p| p.price);

			if !current.price.is_zero() {
				PendingPriceRequests::<T>::remove(&asset);
			}
			if current.price != previous {
				Self::deposit_event(Event::CurrentPriceUpdated {
					asset: asset.clone(),
					price: current.price,
					expiry: current.expiry,
				});
				changed.push(asset.clone());
			}
			CurrentPrices::<T>::insert(&asset, current);
		}

		changed
	}

	/// Combine the submissions for `asset` that are still valid at `now`.
	pub(crate) fn aggregate(asset: &AssetId, now: BlockNumberFor<T>) -> CurrentPriceOf<T> {
		let mut live: Vec<(Price, BlockNumberFor<T>)> = RawPrices::<T>::get(asset)
			.into_iter()
			.filter(|p| p.expiry >= now)
			.map(|p| (p.price, p.expiry))
			.collect();
		live.sort_by(|a, b| a.0.cmp(&b.0));

		let n = live.len();
		let (price, expiry) = if n == 0 {
			(Zero::zero(), Zero::zero())
		} else if n % 2 == 0 {
			let (low, high) = (live[n / 2 - 1], live[n / 2]);
			let mean = Price::from_inner(midpoint(low.0.into_inner(), high.0.into_inner()));
			// whole prices average to a whole price
			let mean = if low.0.frac().is_zero() && high.0.frac().is_zero() {
				mean.trunc()
			} else {
				mean
			};
			(mean, midpoint(low.1, high.1))
		} else {
			live[n / 2]
		};

		CurrentPrice { asset: asset.clone(), price, expiry }
	}

	#[cfg(any(test, feature = "try-runtime"))]
	pub(crate) fn do_try_state() -> Result<(), sp_runtime::TryRuntimeError> {
		for (asset, prices) in RawPrices::<T>::iter() {
			ensure!(Assets::<T>::contains_key(&asset), "raw prices stored for an unknown asset");
			for (i, posted) in prices.iter().enumerate() {
				ensure!(posted.asset == asset, "raw price stored under the wrong asset");
				ensure!(
					Oracles::<T>::contains_key(&posted.oracle),
					"raw price of a removed oracle"
				);
				ensure!(
					prices.iter().skip(i + 1).all(|other| other.oracle != posted.oracle),
					"more than one raw price for the same oracle"
				);
			}
		}

		for asset in CurrentPrices::<T>::iter_keys() {
			ensure!(Assets::<T>::contains_key(&asset), "canonical price of an unknown asset");
		}

		ensure!(
			Oracles::<T>::count() <= T::MaxOracles::get(),
			"oracle set exceeds MaxOracles"
		);

		Ok(())
	}
}

/// Floor of the mean of `a` and `b`, without overflowing.
fn midpoint<N: AtLeast32BitUnsigned + Copy>(a: N, b: N) -> N {
	let two = N::from(2u32);
	a / two + b / two + (a % two + b % two) / two
}

impl<T: Config> PriceProvider<BlockNumberFor<T>> for Pallet<T> {
	fn current_price(asset: &AssetId) -> CurrentPriceOf<T> {
		Pallet::<T>::current_price(asset.clone())
	}

	fn request_price(asset: &AssetId) {
		Self::do_request_price(asset)
	}
}
