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

//! Records kept by the CDP pallet.

use alloc::vec::Vec;
use codec::{Decode, DecodeWithMemTracking, Encode, MaxEncodedLen};
use core::cmp::Ordering;
use scale_info::TypeInfo;
use serde::{Deserialize, Serialize};
use sp_core::U256;
use sp_lending::{Balance, Coin, CollateralToken, Denom, InstanceId, Price, Ratio};
use sp_runtime::{traits::Zero, ArithmeticError, RuntimeDebug};

/// The collateral side of a CDP.
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
pub struct Collateral {
	pub token: CollateralToken,
	pub amount: Balance,
	/// Price of the collateral when the CDP was opened.
	pub initial_price: Price,
}

/// The debt side of a CDP.
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
pub struct Liquidity {
	pub coin: Coin<Balance>,
	/// Price of the debt denomination when the CDP was opened.
	pub initial_price: Price,
}

/// A collateralized debt position.
///
/// Stored under its collateral name and `(owner, instance id)`; there is no other identifier.
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
pub struct Cdp<AccountId> {
	pub owner: AccountId,
	pub collateral: Collateral,
	pub liquidity: Liquidity,
	/// The collateral valued in units of the debt denomination, as of the last modification or
	/// revaluation.
	pub collateral_value: Balance,
}

impl<AccountId> Cdp<AccountId> {
	/// A position holding nothing, as seen before its first modification.
	pub fn empty(owner: AccountId, token: CollateralToken, debt_denom: Denom) -> Self {
		Self {
			owner,
			collateral: Collateral { token, amount: 0, initial_price: Zero::zero() },
			liquidity: Liquidity { coin: Coin::new(debt_denom, 0), initial_price: Zero::zero() },
			collateral_value: 0,
		}
	}

	pub fn is_empty(&self) -> bool {
		self.collateral.amount.is_zero() && self.liquidity.coin.amount.is_zero()
	}

	pub fn is_under_collateralized(&self, price: Price, liquidation_ratio: Ratio) -> bool {
		is_under_collateralized(
			self.collateral.amount,
			self.liquidity.coin.amount,
			price,
			liquidation_ratio,
		)
	}

	/// Orders by collateral-to-debt ratio, lowest first, without dividing.
	pub fn cmp_collateral_ratio(&self, other: &Self) -> Ordering {
		let lhs = U256::from(self.collateral.amount) * U256::from(other.liquidity.coin.amount);
		let rhs = U256::from(other.collateral.amount) * U256::from(self.liquidity.coin.amount);
		lhs.cmp(&rhs)
	}
}

impl<AccountId: Clone> Cdp<AccountId> {
	/// The second half of the storage key.
	pub fn owner_key(&self) -> (AccountId, Option<InstanceId>) {
		(self.owner.clone(), self.collateral.token.instance_id().cloned())
	}
}

/// Whether `collateral` units priced at `price` are worth strictly less than `liquidation_ratio`
/// times `debt`. Exactly at the ratio is solvent.
pub fn is_under_collateralized(
	collateral: Balance,
	debt: Balance,
	price: Price,
	liquidation_ratio: Ratio,
) -> bool {
	U256::from(collateral) * U256::from(price.into_inner()) <
		U256::from(debt) * U256::from(liquidation_ratio.into_inner())
}

/// Value of `amount` units priced at `price`, in units priced at `debt_price`, rounded down.
///
/// `debt_price` must not be zero.
pub fn redenominate(
	amount: Balance,
	price: Price,
	debt_price: Price,
) -> Result<Balance, ArithmeticError> {
	if debt_price.is_zero() {
		return Err(ArithmeticError::DivisionByZero)
	}
	let value = U256::from(amount) * U256::from(price.into_inner()) /
		U256::from(debt_price.into_inner());
	if value > U256::from(Balance::MAX) {
		return Err(ArithmeticError::Overflow)
	}
	Ok(value.low_u128())
}

/// Risk parameters of one authorized collateral kind.
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
pub struct CollateralParams {
	pub denom: Denom,
	/// Minimum collateral value per unit of debt.
	pub liquidation_ratio: Ratio,
	/// Maximum total debt drawn against this collateral kind.
	pub debt_limit: Balance,
}

/// Aggregate debt drawn against one collateral kind.
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
pub struct CollateralState {
	pub denom: Denom,
	pub total_debt: Balance,
}

/// All parameters of the pallet, as returned to queries.
#[derive(Encode, Decode, Clone, PartialEq, Eq, RuntimeDebug, TypeInfo, Serialize, Deserialize)]
pub struct ModuleParams {
	pub global_debt_limit: Balance,
	pub collateral_params: Vec<CollateralParams>,
}

#[cfg(test)]
mod tests {
	use super::*;
	use sp_runtime::{traits::One, FixedPointNumber};

	#[test]
	fn solvency_boundary_is_solvent() {
		let ratio = Ratio::saturating_from_rational(3, 2);
		// 100 * 1.5 == 150 * 1
		assert!(!is_under_collateralized(150, 100, Price::one(), ratio));
		assert!(is_under_collateralized(149, 100, Price::one(), ratio));
		// nothing owed, nothing to cover, even without a price
		assert!(!is_under_collateralized(0, 0, Price::zero(), ratio));
		assert!(is_under_collateralized(1_000, 1, Price::zero(), ratio));
	}

	#[test]
	fn redenomination_truncates() {
		let price = Price::saturating_from_rational(10_345, 1_000);
		assert_eq!(redenominate(10, price, Price::one()), Ok(103));
		assert_eq!(redenominate(10, price, Price::saturating_from_integer(2)), Ok(51));
		assert_eq!(redenominate(1, price, Price::zero()), Err(ArithmeticError::DivisionByZero));
		assert_eq!(
			redenominate(Balance::MAX, Price::saturating_from_integer(2), Price::one()),
			Err(ArithmeticError::Overflow)
		);
	}
}
