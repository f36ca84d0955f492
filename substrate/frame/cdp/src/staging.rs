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

//! The staging ledger: coins held by the pallet for the liquidation subsystem.
//!
//! The governance denomination is never held. It is dropped from additions and subtractions, and
//! any amount of it counts as available.

use crate::*;
use sp_lending::StagingLedger;

impl<T: Config> Pallet<T> {
	/// Credit seized collateral to the staging ledger.
	pub(crate) fn stage(denom: &Denom, amount: Balance) -> DispatchResult {
		Self::add_coins(&[Coin::new(denom.clone(), amount)]).map(|_| ())
	}

	/// `coins` without the governance denomination, once checked to be non-zero and listed once
	/// per denomination.
	fn spendable(coins: &[Coin<Balance>]) -> Result<Vec<&Coin<Balance>>, DispatchError> {
		for (i, coin) in coins.iter().enumerate() {
			ensure!(!coin.amount.is_zero(), Error::<T>::InvalidCoins);
			ensure!(
				coins.iter().skip(i + 1).all(|other| other.denom != coin.denom),
				Error::<T>::InvalidCoins
			);
		}
		let gov = T::GovDenom::get();
		Ok(coins.iter().filter(|coin| coin.denom != gov).collect())
	}
}

impl<T: Config> StagingLedger for Pallet<T> {
	fn staged_coins() -> Vec<Coin<Balance>> {
		let mut coins: Vec<Coin<Balance>> = StagingBalances::<T>::iter()
			.map(|(denom, amount)| Coin::new(denom, amount))
			.collect();
		coins.sort_by(|a, b| a.denom.cmp(&b.denom));
		coins
	}

	fn has_coins(coins: &[Coin<Balance>]) -> bool {
		let gov = T::GovDenom::get();
		coins
			.iter()
			.filter(|coin| coin.denom != gov)
			.all(|coin| StagingBalances::<T>::get(&coin.denom) >= coin.amount)
	}

	fn add_coins(coins: &[Coin<Balance>]) -> Result<Vec<Coin<Balance>>, DispatchError> {
		let updated = Self::spendable(coins)?
			.into_iter()
			.map(|coin| {
				StagingBalances::<T>::get(&coin.denom)
					.checked_add(coin.amount)
					.map(|balance| (coin.denom.clone(), balance))
					.ok_or(DispatchError::from(ArithmeticError::Overflow))
			})
			.collect::<Result<Vec<_>, DispatchError>>()?;

		for (denom, balance) in updated {
			StagingBalances::<T>::insert(denom, balance);
		}
		Ok(Self::staged_coins())
	}

	fn subtract_coins(coins: &[Coin<Balance>]) -> Result<Vec<Coin<Balance>>, DispatchError> {
		let updated = Self::spendable(coins)?
			.into_iter()
			.map(|coin| {
				StagingBalances::<T>::get(&coin.denom)
					.checked_sub(coin.amount)
					.map(|balance| (coin.denom.clone(), balance))
					.ok_or(DispatchError::from(Error::<T>::InsufficientStagingFunds))
			})
			.collect::<Result<Vec<_>, DispatchError>>()?;

		for (denom, balance) in updated {
			if balance.is_zero() {
				StagingBalances::<T>::remove(denom);
			} else {
				StagingBalances::<T>::insert(denom, balance);
			}
		}
		Ok(Self::staged_coins())
	}
}
