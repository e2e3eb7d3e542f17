// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2025 Daniel Negri
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! In-memory account store.
//!
//! The [`AccountStore`] owns every account and is the single place where
//! they are mutated. Callers address accounts by [`AccountNumber`]; each
//! operation looks the account up and dispatches to it.
//!
//! # Ordering
//!
//! Accounts are kept in creation order. Listing and persistence both walk
//! the store in that order, so a saved file lists accounts the way they
//! were opened.

use crate::BankError;
use crate::account::{Account, AccountDetails, AccountKind};
use crate::base::AccountNumber;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use tracing::{debug, warn};

/// Collection of accounts keyed by account number.
///
/// # Invariants
///
/// - Account numbers are unique.
/// - `index[number]` is the position of that account in `accounts`.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct AccountStore {
    /// Accounts in creation order.
    accounts: Vec<Account>,
    index: HashMap<AccountNumber, usize>,
}

impl AccountStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a new account and adds it to the store.
    ///
    /// # Errors
    ///
    /// - [`BankError::DuplicateAccount`] - the number is already in use.
    /// - [`BankError::InvalidHolderName`] / [`BankError::InvalidAmount`] - see [`Account::new`].
    pub fn create(
        &mut self,
        number: AccountNumber,
        holder: impl Into<String>,
        opening_balance: Decimal,
        kind: AccountKind,
    ) -> Result<&Account, BankError> {
        if self.index.contains_key(&number) {
            return Err(BankError::DuplicateAccount(number));
        }
        let account = Account::new(number, holder, opening_balance, kind)?;
        debug!(account = %number, kind = kind.name(), "account opened");
        self.insert(account)
    }

    /// Adds an already built account, keeping creation order.
    pub fn insert(&mut self, account: Account) -> Result<&Account, BankError> {
        let position = self.accounts.len();
        match self.index.entry(account.number()) {
            Entry::Occupied(entry) => Err(BankError::DuplicateAccount(*entry.key())),
            Entry::Vacant(entry) => {
                entry.insert(position);
                self.accounts.push(account);
                Ok(&self.accounts[position])
            }
        }
    }

    /// Looks up an account by number.
    pub fn find(&self, number: AccountNumber) -> Result<&Account, BankError> {
        self.index
            .get(&number)
            .map(|&position| &self.accounts[position])
            .ok_or(BankError::NotFound(number))
    }

    fn find_mut(&mut self, number: AccountNumber) -> Result<&mut Account, BankError> {
        let position = *self.index.get(&number).ok_or(BankError::NotFound(number))?;
        Ok(&mut self.accounts[position])
    }

    /// Deposits into the account and returns the new balance.
    pub fn deposit_to(
        &mut self,
        number: AccountNumber,
        amount: Decimal,
    ) -> Result<Decimal, BankError> {
        let account = self.find_mut(number)?;
        account.deposit(amount)?;
        debug!(account = %number, %amount, balance = %account.balance(), "deposit applied");
        Ok(account.balance())
    }

    /// Withdraws from the account and returns the new balance.
    ///
    /// A rejected withdrawal is still recorded in the account history.
    pub fn withdraw_from(
        &mut self,
        number: AccountNumber,
        amount: Decimal,
    ) -> Result<Decimal, BankError> {
        let account = self.find_mut(number)?;
        if let Err(error) = account.withdraw(amount) {
            warn!(account = %number, %amount, %error, "withdrawal rejected");
            return Err(error);
        }
        debug!(account = %number, %amount, balance = %account.balance(), "withdrawal applied");
        Ok(account.balance())
    }

    pub fn details_of(&self, number: AccountNumber) -> Result<AccountDetails, BankError> {
        self.find(number).map(Account::describe)
    }

    /// History of the account; `None` when it has no entries yet.
    pub fn history_of(&self, number: AccountNumber) -> Result<Option<&[String]>, BankError> {
        self.find(number).map(Account::list_history)
    }

    /// Applies interest to every account in creation order.
    ///
    /// Returns the number of accounts that accrued interest.
    pub fn apply_interest_to_all(&mut self) -> usize {
        let mut accrued = 0;
        for account in &mut self.accounts {
            if let Some(interest) = account.apply_interest() {
                debug!(account = %account.number(), %interest, "interest added");
                accrued += 1;
            }
        }
        accrued
    }

    /// Iterates over accounts in creation order.
    pub fn accounts(&self) -> impl ExactSizeIterator<Item = &Account> {
        self.accounts.iter()
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}
