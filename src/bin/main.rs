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

use anyhow::Context;
use bank_ledger_rs::codec::DEFAULT_DATA_FILE;
use bank_ledger_rs::{AccountKind, AccountNumber, AccountStore, PersistentStore};
use clap::{Parser, Subcommand};
use csv::Writer;
use rust_decimal::Decimal;
use std::io::Write;
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

/// Bank Ledger - Manage savings and current accounts
///
/// Each invocation loads the data file, runs one operation, and saves the
/// accounts back to the same file.
#[derive(Parser, Debug)]
#[command(name = "bank-ledger")]
#[command(about = "Savings and current accounts backed by a flat file", long_about = None)]
struct Args {
    /// Path to the accounts data file
    #[arg(short, long, value_name = "FILE", default_value = DEFAULT_DATA_FILE)]
    data_file: PathBuf,

    /// Log applied operations to stderr (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Open a new account
    #[command(subcommand)]
    Open(OpenCommand),

    /// Deposit into an account
    Deposit {
        number: AccountNumber,
        amount: Decimal,
    },

    /// Withdraw from an account
    Withdraw {
        number: AccountNumber,
        amount: Decimal,
    },

    /// Show account details
    Show { number: AccountNumber },

    /// Show the transaction history of an account
    History { number: AccountNumber },

    /// Add interest to every savings account
    Interest,

    /// Write all accounts as CSV to stdout
    List,
}

#[derive(Subcommand, Debug)]
enum OpenCommand {
    /// Savings account, earns 3% per interest run
    Savings {
        number: AccountNumber,
        holder: String,
        /// Opening balance
        balance: Decimal,
    },

    /// Current account with an overdraft limit
    Current {
        number: AccountNumber,
        holder: String,
        /// Opening balance
        balance: Decimal,
        /// How far below zero the balance may go
        #[arg(long)]
        overdraft: Decimal,
    },
}

fn main() {
    let args = Args::parse();
    init_tracing(args.verbose);

    if let Err(e) = run(args) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

impl Command {
    /// Commands that only report on the store and never change it.
    fn is_read_only(&self) -> bool {
        matches!(
            self,
            Command::Show { .. } | Command::History { .. } | Command::List
        )
    }
}

/// Loads the store, runs the command, and saves whatever state it left.
///
/// The store is saved even when the command fails, so rejected withdrawals
/// keep their history entry. Read-only commands leave the file untouched.
fn run(args: Args) -> anyhow::Result<()> {
    let mut bank = PersistentStore::open(&args.data_file)
        .with_context(|| format!("failed to load '{}'", args.data_file.display()))?;

    let read_only = args.command.is_read_only();
    let outcome = execute(&mut bank, args.command, std::io::stdout().lock());

    if read_only {
        bank.into_inner();
    } else {
        bank.close()
            .with_context(|| format!("failed to save '{}'", args.data_file.display()))?;
    }
    outcome
}

/// Runs one command against the store, writing its report to `out`.
fn execute<W: Write>(
    store: &mut AccountStore,
    command: Command,
    mut out: W,
) -> anyhow::Result<()> {
    match command {
        Command::Open(open) => {
            let (number, holder, balance, kind) = match open {
                OpenCommand::Savings {
                    number,
                    holder,
                    balance,
                } => (number, holder, balance, AccountKind::Savings),
                OpenCommand::Current {
                    number,
                    holder,
                    balance,
                    overdraft,
                } => (
                    number,
                    holder,
                    balance,
                    AccountKind::Current {
                        overdraft_limit: overdraft,
                    },
                ),
            };
            store
                .create(number, holder, balance, kind)
                .with_context(|| format!("cannot open account {number}"))?;
            writeln!(out, "Account {number} created.")?;
        }
        Command::Deposit { number, amount } => {
            let balance = store.deposit_to(number, amount)?;
            writeln!(out, "Amount deposited. Balance: {}", balance.normalize())?;
        }
        Command::Withdraw { number, amount } => {
            let balance = store.withdraw_from(number, amount)?;
            writeln!(out, "Amount withdrawn. Balance: {}", balance.normalize())?;
        }
        Command::Show { number } => {
            writeln!(out, "{}", store.details_of(number)?)?;
        }
        Command::History { number } => {
            writeln!(out, "Transaction History:")?;
            match store.history_of(number)? {
                Some(entries) => {
                    for entry in entries {
                        writeln!(out, " - {entry}")?;
                    }
                }
                None => writeln!(out, "No transactions.")?,
            }
        }
        Command::Interest => {
            let accrued = store.apply_interest_to_all();
            writeln!(out, "Interest applied to {accrued} account(s).")?;
        }
        Command::List => write_accounts(store, out)?,
    }
    Ok(())
}

/// Write account details to a CSV writer
///
/// Columns: `kind, account, holder, balance, overdraft_limit`
///
/// # Example
///
/// ```csv
/// kind,account,holder,balance,overdraft_limit
/// SAV,101,Asha,1545,
/// CUR,202,Ravi,-50,100
/// ```
pub fn write_accounts<W: Write>(store: &AccountStore, writer: W) -> Result<(), csv::Error> {
    let mut wtr = Writer::from_writer(writer);

    for account in store.accounts() {
        wtr.serialize(account.describe())?;
    }

    wtr.flush()?;
    Ok(())
}
