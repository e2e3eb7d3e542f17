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

//! Account management.
//!
//! An [`Account`] is one shared record (number, holder, balance, history)
//! plus an [`AccountKind`] that decides how withdrawals and interest behave:
//!
//! | Kind | Withdraw rule | Interest |
//! |------|---------------|----------|
//! | Savings | never below zero | 3% of the current balance |
//! | Current | never below `-overdraft_limit` | none |
//!
//! Rejected withdrawals are appended to the history before the error is
//! returned, so the history is a full audit trail.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use bank_ledger_rs::{Account, AccountKind, AccountNumber};
//!
//! let mut account =
//!     Account::new(AccountNumber(101), "Asha", dec!(1000), AccountKind::Savings).unwrap();
//! account.deposit(dec!(500)).unwrap();
//! assert_eq!(account.balance(), dec!(1500));
//! assert_eq!(account.list_history().unwrap(), ["Deposited: 500"]);
//! ```

use crate::BankError;
use crate::base::AccountNumber;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::ser::{Serialize, SerializeStruct, Serializer};
use std::fmt;

/// Fixed rate applied by [`Account::apply_interest`] on savings accounts.
pub const SAVINGS_INTEREST_RATE: Decimal = dec!(0.03);

/// The closed set of account kinds, with kind-specific data inline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccountKind {
    Savings,
    Current { overdraft_limit: Decimal },
}

impl AccountKind {
    pub const SAVINGS_TAG: &str = "SAV";
    pub const CURRENT_TAG: &str = "CUR";

    /// Tag used in the persisted record.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Savings => Self::SAVINGS_TAG,
            Self::Current { .. } => Self::CURRENT_TAG,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Savings => "Savings",
            Self::Current { .. } => "Current",
        }
    }

    pub fn overdraft_limit(&self) -> Option<Decimal> {
        match self {
            Self::Savings => None,
            Self::Current { overdraft_limit } => Some(*overdraft_limit),
        }
    }
}

/// Bank account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    number: AccountNumber,
    holder: String,
    balance: Decimal,
    /// Chronological, append-only.
    history: Vec<String>,
    kind: AccountKind,
}

impl Account {
    /// Precision used for interest and for the tabular snapshot.
    pub const DECIMAL_PRECISION: u32 = 4;

    /// Opens an account with an empty history.
    ///
    /// # Errors
    ///
    /// - [`BankError::InvalidHolderName`] - holder is empty or contains whitespace.
    /// - [`BankError::InvalidAmount`] - negative opening balance or overdraft limit.
    pub fn new(
        number: AccountNumber,
        holder: impl Into<String>,
        opening_balance: Decimal,
        kind: AccountKind,
    ) -> Result<Self, BankError> {
        if opening_balance < Decimal::ZERO {
            return Err(BankError::InvalidAmount);
        }
        Self::restore(number, holder, opening_balance, kind, Vec::new())
    }

    /// Rebuilds an account from persisted state.
    ///
    /// Unlike [`Account::new`] the balance may be negative, as long as it
    /// is within what the kind allows.
    pub(crate) fn restore(
        number: AccountNumber,
        holder: impl Into<String>,
        balance: Decimal,
        kind: AccountKind,
        history: Vec<String>,
    ) -> Result<Self, BankError> {
        let holder = holder.into();
        if holder.is_empty() || holder.chars().any(char::is_whitespace) {
            return Err(BankError::InvalidHolderName);
        }
        if let AccountKind::Current { overdraft_limit } = kind {
            if overdraft_limit < Decimal::ZERO {
                return Err(BankError::InvalidAmount);
            }
        }
        let account = Self {
            number,
            holder,
            balance,
            history,
            kind,
        };
        if account.balance < account.floor() {
            return Err(BankError::InvalidAmount);
        }
        Ok(account)
    }

    pub fn number(&self) -> AccountNumber {
        self.number
    }

    pub fn holder(&self) -> &str {
        &self.holder
    }

    pub fn balance(&self) -> Decimal {
        self.balance
    }

    pub fn kind(&self) -> AccountKind {
        self.kind
    }

    pub fn overdraft_limit(&self) -> Option<Decimal> {
        self.kind.overdraft_limit()
    }

    /// Lowest balance a withdrawal may leave behind.
    fn floor(&self) -> Decimal {
        match self.kind {
            AccountKind::Savings => Decimal::ZERO,
            AccountKind::Current { overdraft_limit } => -overdraft_limit,
        }
    }

    fn assert_invariants(&self) {
        debug_assert!(
            self.balance >= self.floor(),
            "Invariant violated: balance {} below floor {} for account {}",
            self.balance,
            self.floor(),
            self.number
        );
    }

    fn record(&mut self, label: &str, amount: Decimal) {
        self.history.push(format!("{label}: {}", amount.normalize()));
    }

    /// Increases the balance.
    ///
    /// # Errors
    ///
    /// [`BankError::InvalidAmount`] when the amount is zero or negative, or
    /// when the new balance would not be representable. Neither is recorded.
    pub fn deposit(&mut self, amount: Decimal) -> Result<(), BankError> {
        if amount <= Decimal::ZERO {
            return Err(BankError::InvalidAmount);
        }
        self.balance = self
            .balance
            .checked_add(amount)
            .ok_or(BankError::InvalidAmount)?;
        self.record("Deposited", amount);
        self.assert_invariants();
        Ok(())
    }

    /// Decreases the balance, down to the floor allowed by the kind.
    ///
    /// # Errors
    ///
    /// - [`BankError::InvalidAmount`] - amount is zero or negative (not recorded).
    /// - [`BankError::InsufficientFunds`] - savings withdrawal above the balance.
    /// - [`BankError::OverdraftExceeded`] - current withdrawal past the overdraft limit.
    ///
    /// The last two leave the balance untouched but append a
    /// `Failed Withdraw` entry to the history.
    pub fn withdraw(&mut self, amount: Decimal) -> Result<(), BankError> {
        if amount <= Decimal::ZERO {
            return Err(BankError::InvalidAmount);
        }

        let (rejection, label) = match self.kind {
            AccountKind::Savings => (BankError::InsufficientFunds, "Withdrawn"),
            AccountKind::Current { .. } => (BankError::OverdraftExceeded, "Withdrawn (OD)"),
        };

        let remaining = match self.balance.checked_sub(amount) {
            Some(remaining) if remaining >= self.floor() => remaining,
            _ => {
                self.record("Failed Withdraw", amount);
                return Err(rejection);
            }
        };

        self.balance = remaining;
        self.record(label, amount);
        self.assert_invariants();
        Ok(())
    }

    /// Accrues interest on savings accounts and returns the amount added.
    ///
    /// Each call compounds on the balance at the time of the call. Current
    /// accounts never accrue interest and return `None`, as does a savings
    /// balance too large to grow any further; neither is recorded.
    pub fn apply_interest(&mut self) -> Option<Decimal> {
        match self.kind {
            AccountKind::Savings => {
                let interest = self
                    .balance
                    .checked_mul(SAVINGS_INTEREST_RATE)?
                    .round_dp(Self::DECIMAL_PRECISION);
                self.balance = self.balance.checked_add(interest)?;
                self.record("Interest added", interest);
                self.assert_invariants();
                Some(interest)
            }
            AccountKind::Current { .. } => None,
        }
    }

    /// Snapshot of the account for display.
    pub fn describe(&self) -> AccountDetails {
        AccountDetails {
            kind: self.kind,
            number: self.number,
            holder: self.holder.clone(),
            balance: self.balance,
        }
    }

    /// History entries in chronological order, or `None` when there are none.
    pub fn list_history(&self) -> Option<&[String]> {
        if self.history.is_empty() {
            None
        } else {
            Some(&self.history)
        }
    }

    /// Canonical persisted form: the record line, the history count, then
    /// each history entry on its own line.
    pub fn to_record(&self) -> String {
        let mut record = format!(
            "{} {} {} {}",
            self.kind.tag(),
            self.number,
            self.holder,
            self.balance.normalize()
        );
        if let Some(limit) = self.kind.overdraft_limit() {
            record.push(' ');
            record.push_str(&limit.normalize().to_string());
        }
        record.push('\n');
        record.push_str(&self.history.len().to_string());
        record.push('\n');
        for entry in &self.history {
            record.push_str(entry);
            record.push('\n');
        }
        record
    }
}

/// Read-only snapshot returned by [`Account::describe`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountDetails {
    pub kind: AccountKind,
    pub number: AccountNumber,
    pub holder: String,
    pub balance: Decimal,
}

impl fmt::Display for AccountDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "({} Account)", self.kind.name())?;
        writeln!(f, "Account No : {}", self.number)?;
        writeln!(f, "Name       : {}", self.holder)?;
        write!(f, "Balance    : {}", self.balance.normalize())?;
        if let Some(limit) = self.kind.overdraft_limit() {
            write!(f, "\nOverdraft Limit : {}", limit.normalize())?;
        }
        Ok(())
    }
}

impl Serialize for AccountDetails {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut state = serializer.serialize_struct("AccountDetails", 5)?;
        state.serialize_field("kind", self.kind.tag())?;
        state.serialize_field("account", &self.number)?;
        state.serialize_field("holder", &self.holder)?;
        state.serialize_field(
            "balance",
            &self.balance.round_dp(Account::DECIMAL_PRECISION),
        )?;
        state.serialize_field(
            "overdraft_limit",
            &self
                .kind
                .overdraft_limit()
                .map(|limit| limit.round_dp(Account::DECIMAL_PRECISION)),
        )?;
        state.end()
    }
}
