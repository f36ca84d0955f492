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

//! Primitives shared by the CDP ledger and the price feed.
//!
//! The two pallets never depend on each other. The price feed implements [`PriceProvider`] and
//! calls an [`OnPriceUpdate`] hook; the CDP ledger implements that hook and consumes a
//! [`PriceProvider`]. Both sides agree on the identifiers defined here.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

use alloc::vec::Vec;
use codec::{Decode, DecodeWithMemTracking, Encode, MaxEncodedLen};
use scale_info::TypeInfo;
use serde::{Deserialize, Serialize};
use sp_core::ConstU32;
use sp_runtime::{traits::Zero, BoundedVec, DispatchError, DispatchResult, FixedU128, RuntimeDebug};
use sp_weights::Weight;

/// An unsigned quantity of some denomination.
pub type Balance = u128;

/// A signed change applied to a [`Balance`].
pub type Amount = i128;

/// The price of one unit of an asset, expressed in the reference unit of the oracles.
pub type Price = FixedU128;

/// A collateral-to-debt ratio.
pub type Ratio = FixedU128;

/// Upper bound on the length of denominations and instance ids.
pub type MaxIdLen = ConstU32<32>;

/// The name of a coin or of a collateral kind, e.g. `b"xrp"`.
pub type Denom = BoundedVec<u8, MaxIdLen>;

/// Identifier of a single non-fungible token inside its collection.
pub type InstanceId = BoundedVec<u8, MaxIdLen>;

/// Whether an asset is fungible across holders or identified by an instance id.
#[derive(
	Encode,
	Decode,
	DecodeWithMemTracking,
	Clone,
	Copy,
	PartialEq,
	Eq,
	RuntimeDebug,
	TypeInfo,
	MaxEncodedLen,
	Serialize,
	Deserialize,
)]
pub enum AssetKind {
	Fungible,
	NonFungible,
}

/// A priceable thing.
///
/// `code` is empty for fungible assets and holds the instance id of a non-fungible one, so a
/// collection name alone never collides with one of its instances.
#[derive(
	Encode,
	Decode,
	DecodeWithMemTracking,
	Clone,
	PartialEq,
	Eq,
	PartialOrd,
	Ord,
	RuntimeDebug,
	TypeInfo,
	MaxEncodedLen,
	Serialize,
	Deserialize,
)]
pub struct AssetId {
	pub code: InstanceId,
	pub name: Denom,
}

impl AssetId {
	pub fn fungible(name: Denom) -> Self {
		Self { code: Default::default(), name }
	}

	pub fn non_fungible(name: Denom, instance_id: InstanceId) -> Self {
		Self { code: instance_id, name }
	}

	pub fn kind(&self) -> AssetKind {
		if self.code.is_empty() {
			AssetKind::Fungible
		} else {
			AssetKind::NonFungible
		}
	}
}

/// The kind of collateral locked in a CDP.
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
pub enum CollateralToken {
	/// Interchangeable units of `name`.
	Fungible { name: Denom },
	/// The single token `instance_id` of the collection `name`.
	NonFungible { name: Denom, instance_id: InstanceId },
}

impl CollateralToken {
	/// The collateral name, which is also the key of its parameters.
	pub fn name(&self) -> &Denom {
		match self {
			Self::Fungible { name } | Self::NonFungible { name, .. } => name,
		}
	}

	pub fn instance_id(&self) -> Option<&InstanceId> {
		match self {
			Self::Fungible { .. } => None,
			Self::NonFungible { instance_id, .. } => Some(instance_id),
		}
	}

	/// The asset whose price values this collateral.
	pub fn asset_id(&self) -> AssetId {
		match self {
			Self::Fungible { name } => AssetId::fungible(name.clone()),
			Self::NonFungible { name, instance_id } =>
				AssetId::non_fungible(name.clone(), instance_id.clone()),
		}
	}
}

/// An amount of a single denomination.
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
pub struct Coin<A> {
	pub denom: Denom,
	pub amount: A,
}

impl<A> Coin<A> {
	pub fn new(denom: Denom, amount: A) -> Self {
		Self { denom, amount }
	}
}

/// The canonical price of an asset, as last computed by the aggregator.
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
pub struct CurrentPrice<BlockNumber> {
	pub asset: AssetId,
	pub price: Price,
	pub expiry: BlockNumber,
}

impl<BlockNumber: Zero> CurrentPrice<BlockNumber> {
	/// The record reported for an asset nobody has priced yet.
	pub fn zero(asset: AssetId) -> Self {
		Self { asset, price: Zero::zero(), expiry: Zero::zero() }
	}
}

/// Source of canonical asset prices.
pub trait PriceProvider<BlockNumber> {
	/// The canonical price of `asset`, a zero-valued record if there is none.
	fn current_price(asset: &AssetId) -> CurrentPrice<BlockNumber>;

	/// Signal that a price for `asset` was needed but not available.
	fn request_price(asset: &AssetId);
}

/// Hook invoked after the price of an asset may have changed.
pub trait OnPriceUpdate {
	/// Upper bound of the weight of a single [`Self::on_price_update`] call.
	fn max_weight() -> Weight;

	/// React to a new price of `asset`, returning the weight consumed.
	fn on_price_update(asset: &AssetId) -> Result<Weight, DispatchError>;
}

impl OnPriceUpdate for () {
	fn max_weight() -> Weight {
		Weight::zero()
	}

	fn on_price_update(_asset: &AssetId) -> Result<Weight, DispatchError> {
		Ok(Weight::zero())
	}
}

/// Balances of ordinary accounts, per denomination.
///
/// Each call is atomic on its own; callers are expected to check sufficiency before moving funds.
pub trait BalanceLedger<AccountId> {
	fn balance(who: &AccountId, denom: &Denom) -> Balance;

	fn has_sufficient_balance(who: &AccountId, denom: &Denom, amount: Balance) -> bool {
		Self::balance(who, denom) >= amount
	}

	fn credit(who: &AccountId, denom: &Denom, amount: Balance) -> DispatchResult;

	fn debit(who: &AccountId, denom: &Denom, amount: Balance) -> DispatchResult;
}

/// The protocol-internal staging account used by liquidation to hold seized and minted funds.
///
/// The governance denomination is never tracked here: it is stripped from every amount added or
/// subtracted and is always reported as sufficient.
pub trait StagingLedger {
	/// All non-zero balances held by the staging account.
	fn staged_coins() -> Vec<Coin<Balance>>;

	fn has_coins(coins: &[Coin<Balance>]) -> bool;

	/// Add `coins`, returning the updated holdings.
	fn add_coins(coins: &[Coin<Balance>]) -> Result<Vec<Coin<Balance>>, DispatchError>;

	/// Remove `coins`, returning the updated holdings. Nothing is removed unless all of them
	/// can be.
	fn subtract_coins(coins: &[Coin<Balance>]) -> Result<Vec<Coin<Balance>>, DispatchError>;
}

/// Operations the liquidation subsystem performs on the CDP ledger.
pub trait CdpLiquidation<AccountId> {
	/// Take collateral and debt away from an under-collateralized CDP.
	fn partial_seize_cdp(
		owner: &AccountId,
		token: &CollateralToken,
		collateral_to_seize: Amount,
		debt_to_seize: Amount,
	) -> DispatchResult;

	/// Lower the global debt after debt was annihilated elsewhere.
	fn reduce_global_debt(amount: Amount) -> DispatchResult;
}
