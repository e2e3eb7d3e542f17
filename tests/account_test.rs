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

//! Account public API integration tests.

use bank_ledger_rs::{Account, AccountKind, AccountNumber, BankError};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

// === Helper Functions ===

fn make_savings(number: u32, balance: Decimal) -> Account {
    Account::new(AccountNumber(number), "Asha", balance, AccountKind::Savings).unwrap()
}

fn make_current(number: u32, balance: Decimal, overdraft_limit: Decimal) -> Account {
    Account::new(
        AccountNumber(number),
        "Ravi",
        balance,
        AccountKind::Current { overdraft_limit },
    )
    .unwrap()
}

// === Basic Account Tests ===

#[test]
fn new_account_has_opening_balance_and_no_history() {
    let account = make_savings(101, dec!(1000));
    assert_eq!(account.number(), AccountNumber(101));
    assert_eq!(account.holder(), "Asha");
    assert_eq!(account.balance(), dec!(1000));
    assert_eq!(account.kind(), AccountKind::Savings);
    assert_eq!(account.overdraft_limit(), None);
    assert!(account.list_history().is_none());
}

#[test]
fn deposit_increases_balance_and_records_history() {
    let mut account = make_savings(101, dec!(1000));
    account.deposit(dec!(500)).unwrap();
    assert_eq!(account.balance(), dec!(1500));
    assert_eq!(account.list_history().unwrap(), ["Deposited: 500"]);
}

#[test]
fn multiple_deposits_accumulate() {
    let mut account = make_savings(1, Decimal::ZERO);
    account.deposit(dec!(100.00)).unwrap();
    account.deposit(dec!(50.00)).unwrap();
    account.deposit(dec!(25.50)).unwrap();
    assert_eq!(account.balance(), dec!(175.50));
}

#[test]
fn savings_withdrawal_decreases_balance() {
    let mut account = make_savings(1, dec!(100));
    account.withdraw(dec!(30)).unwrap();
    assert_eq!(account.balance(), dec!(70));
    assert_eq!(account.list_history().unwrap(), ["Withdrawn: 30"]);
}

#[test]
fn withdraw_exact_balance_succeeds() {
    let mut account = make_savings(1, dec!(100));
    account.withdraw(dec!(100)).unwrap();
    assert_eq!(account.balance(), Decimal::ZERO);
}

// === Error Cases ===

#[test]
fn savings_overdraw_is_rejected_and_recorded() {
    let mut account = make_savings(1, dec!(50));
    let result = account.withdraw(dec!(100));
    assert_eq!(result, Err(BankError::InsufficientFunds));
    assert_eq!(account.balance(), dec!(50));
    assert_eq!(account.list_history().unwrap(), ["Failed Withdraw: 100"]);
}

#[test]
fn deposit_zero_returns_invalid_amount() {
    let mut account = make_savings(1, dec!(10));
    assert_eq!(account.deposit(Decimal::ZERO), Err(BankError::InvalidAmount));
    assert!(account.list_history().is_none());
}

#[test]
fn deposit_negative_returns_invalid_amount() {
    let mut account = make_savings(1, dec!(10));
    assert_eq!(account.deposit(dec!(-10)), Err(BankError::InvalidAmount));
    assert_eq!(account.balance(), dec!(10));
}

#[test]
fn withdrawal_zero_returns_invalid_amount_without_history() {
    let mut account = make_current(1, dec!(10), dec!(10));
    assert_eq!(account.withdraw(Decimal::ZERO), Err(BankError::InvalidAmount));
    assert!(account.list_history().is_none());
}

// === Current Accounts ===

#[test]
fn current_withdraw_into_overdraft() {
    let mut account = make_current(202, dec!(200), dec!(100));
    account.withdraw(dec!(250)).unwrap();
    assert_eq!(account.balance(), dec!(-50));
    assert_eq!(account.list_history().unwrap(), ["Withdrawn (OD): 250"]);
}

#[test]
fn current_withdraw_past_limit_fails() {
    let mut account = make_current(202, dec!(200), dec!(100));
    account.withdraw(dec!(250)).unwrap();

    let result = account.withdraw(dec!(100));
    assert_eq!(result, Err(BankError::OverdraftExceeded));
    assert_eq!(account.balance(), dec!(-50));
    assert_eq!(
        account.list_history().unwrap(),
        ["Withdrawn (OD): 250", "Failed Withdraw: 100"]
    );
}

#[test]
fn current_withdraw_down_to_exact_limit() {
    let mut account = make_current(1, dec!(0), dec!(100));
    account.withdraw(dec!(100)).unwrap();
    assert_eq!(account.balance(), dec!(-100));
}

#[test]
fn current_without_overdraft_behaves_like_plain_balance() {
    let mut account = make_current(1, dec!(20), Decimal::ZERO);
    assert_eq!(account.withdraw(dec!(20.01)), Err(BankError::OverdraftExceeded));
    account.withdraw(dec!(20)).unwrap();
    assert_eq!(account.balance(), Decimal::ZERO);
}

// === Interest ===

#[test]
fn savings_interest_scenario() {
    let mut account = make_savings(101, dec!(1000));
    account.deposit(dec!(500)).unwrap();
    let interest = account.apply_interest();

    assert_eq!(interest, Some(dec!(45)));
    assert_eq!(account.balance(), dec!(1545));
    assert_eq!(
        account.list_history().unwrap(),
        ["Deposited: 500", "Interest added: 45"]
    );
}

#[test]
fn savings_interest_compounds() {
    let mut account = make_savings(1, dec!(1000));
    account.apply_interest();
    account.apply_interest();
    // 1000 -> 1030 -> 1060.9
    assert_eq!(account.balance(), dec!(1060.9));
}

#[test]
fn current_accounts_do_not_accrue_interest() {
    let mut account = make_current(1, dec!(1000), dec!(100));
    assert_eq!(account.apply_interest(), None);
    assert_eq!(account.balance(), dec!(1000));
    assert!(account.list_history().is_none());
}

// === Details ===

#[test]
fn describe_current_account() {
    let account = make_current(202, dec!(200), dec!(100));
    let details = account.describe();
    assert_eq!(details.number, AccountNumber(202));
    assert_eq!(details.holder, "Ravi");
    assert_eq!(details.balance, dec!(200));
    assert_eq!(details.kind.overdraft_limit(), Some(dec!(100)));
}

#[test]
fn describe_does_not_mutate() {
    let account = make_savings(1, dec!(10));
    let before = account.clone();
    let _ = account.describe();
    let _ = account.to_record();
    assert_eq!(account, before);
}
